//! Background tag extraction with debounce and latest-wins delivery
//!
//! One persistent worker thread services all extraction requests. Text
//! edits are debounced inside the worker loop (updating the tree on every
//! keystroke makes the GUI thread redraw the tree far too often); document
//! switches schedule immediately. While an extraction runs, newer requests
//! replace the pending slot; after each run the worker re-checks that slot
//! and, if newer input arrived, discards its result and processes the
//! newest input instead. Only the request that is still current at
//! completion time is ever emitted, and the worker is never idle while
//! unprocessed newer input exists.

use crate::config::NavigatorConfig;
use crate::ctags::{extract_tags, ExtractionError};
use crate::tags::TagForest;
use ahash::AHashSet;
use std::sync::mpsc;
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

/// Extraction requests for the background thread.
pub enum TagRequest {
    /// Text edited; restarts the debounce window.
    TextEdited { file_name: String, text: String },
    /// Document switched; extracted without debounce.
    DocumentSwitched { file_name: String, text: String },
    Shutdown,
}

/// A freshly extracted forest, polled from the main thread.
pub struct TagUpdate {
    pub file_name: String,
    pub forest: TagForest,
}

/// Extraction function, injectable so tests can substitute the subprocess.
pub type Extractor = Arc<dyn Fn(&str, &str) -> Result<TagForest, ExtractionError> + Send + Sync>;

pub struct CtagsManager {
    tx: mpsc::Sender<TagRequest>,
    results_rx: mpsc::Receiver<TagUpdate>,
    handle: Option<JoinHandle<()>>,
}

impl CtagsManager {
    /// Worker backed by the real ctags subprocess, per the configuration.
    pub fn new(config: &NavigatorConfig) -> Self {
        let ctags_path = config.ctags_path.clone();
        let ignored: AHashSet<String> = config.ignored_kinds.iter().cloned().collect();
        let extractor: Extractor = Arc::new(move |file_name, text| {
            extract_tags(&ctags_path, file_name, text, &ignored)
        });
        Self::with_extractor(Duration::from_millis(config.update_interval_ms), extractor)
    }

    /// Worker with an injected extraction function.
    pub fn with_extractor(debounce: Duration, extractor: Extractor) -> Self {
        let (tx, rx) = mpsc::channel::<TagRequest>();
        let (results_tx, results_rx) = mpsc::channel::<TagUpdate>();
        let handle = thread::spawn(move || run_worker(rx, results_tx, debounce, extractor));
        Self {
            tx,
            results_rx,
            handle: Some(handle),
        }
    }

    pub fn request(&self, request: TagRequest) {
        let _ = self.tx.send(request);
    }

    /// Check for a finished extraction (non-blocking).
    pub fn poll_update(&self) -> Option<TagUpdate> {
        self.results_rx.try_recv().ok()
    }

    pub fn shutdown(&mut self) {
        let _ = self.tx.send(TagRequest::Shutdown);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

impl Drop for CtagsManager {
    fn drop(&mut self) {
        let _ = self.tx.send(TagRequest::Shutdown);
    }
}

struct Pending {
    file_name: String,
    text: String,
    not_before: Instant,
}

/// Fold a request into the pending slot. Returns true on shutdown.
fn accept(pending: &mut Option<Pending>, request: TagRequest, debounce: Duration) -> bool {
    match request {
        TagRequest::TextEdited { file_name, text } => {
            *pending = Some(Pending {
                file_name,
                text,
                not_before: Instant::now() + debounce,
            });
            false
        }
        TagRequest::DocumentSwitched { file_name, text } => {
            *pending = Some(Pending {
                file_name,
                text,
                not_before: Instant::now(),
            });
            false
        }
        TagRequest::Shutdown => true,
    }
}

/// Drain everything queued right now into the pending slot.
fn drain(
    rx: &mpsc::Receiver<TagRequest>,
    pending: &mut Option<Pending>,
    debounce: Duration,
) -> bool {
    loop {
        match rx.try_recv() {
            Ok(request) => {
                if accept(pending, request, debounce) {
                    return true;
                }
            }
            Err(mpsc::TryRecvError::Empty) => return false,
            Err(mpsc::TryRecvError::Disconnected) => return true,
        }
    }
}

fn run_worker(
    rx: mpsc::Receiver<TagRequest>,
    results_tx: mpsc::Sender<TagUpdate>,
    debounce: Duration,
    extractor: Extractor,
) {
    let mut pending: Option<Pending> = None;

    loop {
        // Run the pending extraction once its debounce deadline has passed.
        if pending
            .as_ref()
            .map(|p| Instant::now() >= p.not_before)
            .unwrap_or(false)
        {
            loop {
                let current = pending.take().unwrap();
                let result = extractor(&current.file_name, &current.text);

                if drain(&rx, &mut pending, debounce) {
                    return;
                }
                if pending.is_some() {
                    // Newer input superseded this pass; discard and go
                    // straight to the newest request.
                    continue;
                }
                match result {
                    Ok(forest) => {
                        let _ = results_tx.send(TagUpdate {
                            file_name: current.file_name,
                            forest,
                        });
                    }
                    Err(err) => {
                        eprintln!("CTAGS: extraction failed for {}: {}", current.file_name, err);
                    }
                }
                break;
            }
        }

        match rx.recv_timeout(Duration::from_millis(50)) {
            Ok(request) => {
                if accept(&mut pending, request, debounce) {
                    break;
                }
            }
            Err(mpsc::RecvTimeoutError::Timeout) => {
                // Re-check the debounce deadline.
            }
            Err(mpsc::RecvTimeoutError::Disconnected) => break,
        }
    }
}
