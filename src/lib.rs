//! Host-driven editor plugins: tag navigator and preview synchronization.
//!
//! Two independent subsystems share one pattern, background computation on
//! a stream of bursty events with latest-wins delivery:
//!
//! * [`Navigator`] parses source symbols through an external `ctags`
//!   process on a worker thread and projects them as a tree model for the
//!   host's dock widget.
//! * [`PreviewSync`] keeps a rendered web preview and the text editor
//!   scrolled and highlighted in correspondence, using approximate text
//!   matching computed off the interactive path.
//!
//! The host editor supplies its document and web widgets through the
//! [`host::EditorView`] and [`host::PreviewView`] traits and pumps the
//! plugins' `poll` methods once per frame; all view mutation happens
//! inside those calls, on the main thread.

pub mod approx_match;
pub mod config;
pub mod ctags;
pub mod ctags_manager;
pub mod host;
pub mod navigator;
pub mod preview_sync;
pub mod scroll;
pub mod tags;

pub use approx_match::{ApproxMatcher, WindowedMatcher};
pub use config::{NavigatorConfig, PluginsConfig, SyncConfig};
pub use ctags::ExtractionError;
pub use ctags_manager::{CtagsManager, TagRequest, TagUpdate};
pub use host::{EditorView, PreviewView, Rect, SelectionAnchor};
pub use navigator::Navigator;
pub use preview_sync::{PreviewSync, SyncAction};
pub use scroll::{align_scroll_amount, ScrollAlignment};
pub use tags::{parse, ParseError, Tag, TagForest, TagId, TagModel};
