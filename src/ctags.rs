//! Single-shot ctags invocation
//!
//! Each extraction writes the document text into its own scratch
//! directory, runs the external tool against it and parses the captured
//! stdout. The scratch directory is exclusive to the call and removed when
//! the `TempDir` drops, on success and failure alike.

use crate::tags::{parse_with_ignored, ParseError, TagForest};
use ahash::AHashSet;
use std::fmt;
use std::path::Path;
use std::process::{Command, ExitStatus, Stdio};

/// Default executable name; overridable through `NavigatorConfig`.
pub const DEFAULT_CTAGS_PATH: &str = "ctags";

/// Tool invocation or output failure. The previously displayed tree is
/// left unchanged when this surfaces.
#[derive(Debug)]
pub enum ExtractionError {
    /// Scratch dir, write or spawn failure.
    Io(std::io::Error),
    /// The tool exited with a non-zero status.
    ToolFailed(ExitStatus),
    /// The tool produced unparsable output.
    Parse(ParseError),
}

impl fmt::Display for ExtractionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExtractionError::Io(err) => write!(f, "ctags invocation failed: {}", err),
            ExtractionError::ToolFailed(status) => write!(f, "ctags exited with {}", status),
            ExtractionError::Parse(err) => write!(f, "bad ctags output: {}", err),
        }
    }
}

impl std::error::Error for ExtractionError {}

impl From<std::io::Error> for ExtractionError {
    fn from(err: std::io::Error) -> Self {
        ExtractionError::Io(err)
    }
}

impl From<ParseError> for ExtractionError {
    fn from(err: ParseError) -> Self {
        ExtractionError::Parse(err)
    }
}

/// Run ctags over `text` and parse the result.
///
/// The file name matters: ctags picks its language parser from the
/// extension. Only the final path component is used inside the scratch
/// directory.
pub fn extract_tags(
    ctags_path: &str,
    file_name: &str,
    text: &str,
    ignored: &AHashSet<String>,
) -> Result<TagForest, ExtractionError> {
    let scratch = tempfile::tempdir()?;
    let base = Path::new(file_name)
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_else(|| "untitled".into());
    let path = scratch.path().join(base);
    std::fs::write(&path, text)?;

    let output = Command::new(ctags_path)
        .args(["-f", "-", "-u", "--fields=nKs"])
        .arg(&path)
        .stdin(Stdio::null())
        .output()?;
    if !output.status.success() {
        return Err(ExtractionError::ToolFailed(output.status));
    }

    let raw = String::from_utf8_lossy(&output.stdout);
    Ok(parse_with_ignored(&raw, ignored)?)
}
