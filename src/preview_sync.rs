//! Preview synchronization coordinator
//!
//! Two one-way pipelines keep the text editor and the rendered preview
//! scrolled and highlighted in correspondence:
//!
//! * text → preview: cursor movement arms a debounce deadline; on expiry
//!   the preview's plain text is snapshotted, an approximate match runs on
//!   the background worker, and the result highlights and scroll-aligns
//!   the preview.
//! * preview → text: a click in the preview maps straight to a match job
//!   (clicks are discrete, no debounce); the result moves the editor
//!   cursor and scroll-aligns the editor.
//!
//! Each pipeline is an explicit state machine rather than scattered
//! booleans, so "currently applying" is an inspectable state the opposite
//! direction's event handler checks to avoid feedback oscillation. Every
//! pipeline run takes a fresh generation number; a completion carrying a
//! stale generation, or arriving after the pipeline has moved on (a
//! re-armed debounce counts), is dropped. That is the whole cancellation
//! story: jobs run to completion in the background, only delivery is
//! gated.
//!
//! The host pumps [`PreviewSync::poll`] once per frame; all view mutation
//! happens there, on the main thread. Background work only ever hands an
//! immutable result back over a channel.

use crate::approx_match::ApproxMatcher;
use crate::config::SyncConfig;
use crate::host::{EditorView, PreviewView, SelectionAnchor};
use crate::scroll::{align_scroll_amount, ScrollAlignment};
use parking_lot::{Condvar, Mutex};
use std::sync::{mpsc, Arc};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    TextToPreview,
    PreviewToText,
}

/// View mutations performed by `poll`, reported so the host (or a test)
/// can observe completed sync actions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SyncAction {
    /// A text → preview pass finished (highlight applied).
    TextToPreviewSynced,
    /// The preview was scrolled by this delta.
    PreviewScrolled { delta: f32 },
    /// The editor cursor was moved to this offset.
    CursorMoved { offset: usize },
    /// The editor scroll bar moved by this many lines.
    EditorScrolled { lines: f32 },
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum TextPipeline {
    Idle,
    /// Timer running; every cursor movement restarts the deadline.
    Debouncing { deadline: Instant },
    /// Waiting for the preview's plain-text snapshot.
    AwaitingText { generation: u64 },
    /// Background match job in flight.
    Matching { generation: u64 },
    /// Result accepted; highlight/scroll callbacks outstanding.
    Applying { generation: u64 },
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum ClickPipeline {
    Idle,
    Matching { generation: u64 },
    Applying { generation: u64 },
}

struct MatchJob {
    generation: u64,
    direction: Direction,
    source: String,
    offset: usize,
    target: String,
}

enum Event {
    PlainText {
        generation: u64,
        text: String,
    },
    MatchDone {
        generation: u64,
        direction: Direction,
        result: Option<usize>,
        target: String,
    },
    HighlightDone {
        generation: u64,
        found: bool,
    },
    Anchor {
        generation: u64,
        direction: Direction,
        anchor: Option<SelectionAnchor>,
    },
}

/// Single background worker for approximate matching. Submitting a job
/// overwrites the slot, so an unstarted older job is simply never run;
/// a started one finishes and its stale result is dropped at delivery.
struct MatchWorker {
    shared: Arc<(Mutex<WorkerSlot>, Condvar)>,
    handle: Option<JoinHandle<()>>,
}

#[derive(Default)]
struct WorkerSlot {
    job: Option<MatchJob>,
    shutdown: bool,
}

impl MatchWorker {
    fn spawn(matcher: Arc<dyn ApproxMatcher>, events: mpsc::Sender<Event>) -> Self {
        let shared = Arc::new((Mutex::new(WorkerSlot::default()), Condvar::new()));
        let worker_shared = shared.clone();
        let handle = thread::spawn(move || {
            let (lock, cvar) = &*worker_shared;
            loop {
                let job = {
                    let mut slot = lock.lock();
                    loop {
                        if slot.shutdown {
                            return;
                        }
                        if let Some(job) = slot.job.take() {
                            break job;
                        }
                        cvar.wait(&mut slot);
                    }
                };
                let result = matcher.locate(&job.source, job.offset, &job.target);
                let sent = events.send(Event::MatchDone {
                    generation: job.generation,
                    direction: job.direction,
                    result,
                    target: job.target,
                });
                if sent.is_err() {
                    return;
                }
            }
        });
        Self {
            shared,
            handle: Some(handle),
        }
    }

    fn submit(&self, job: MatchJob) {
        let (lock, cvar) = &*self.shared;
        lock.lock().job = Some(job);
        cvar.notify_one();
    }
}

impl Drop for MatchWorker {
    fn drop(&mut self) {
        let (lock, cvar) = &*self.shared;
        lock.lock().shutdown = true;
        cvar.notify_one();
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

pub struct PreviewSync {
    config: SyncConfig,
    worker: Option<MatchWorker>,
    events_tx: mpsc::Sender<Event>,
    events_rx: mpsc::Receiver<Event>,
    generation: u64,
    text_state: TextPipeline,
    click_state: ClickPipeline,
    /// Editor snapshot taken at debounce expiry, held until the preview's
    /// plain text arrives.
    pending_source: Option<(String, usize)>,
}

impl PreviewSync {
    /// Build the coordinator. Without a matcher the whole sync feature
    /// self-disables: every handler becomes a no-op.
    pub fn new(matcher: Option<Arc<dyn ApproxMatcher>>, config: SyncConfig) -> Self {
        let (events_tx, events_rx) = mpsc::channel();
        let worker = match matcher {
            Some(matcher) => Some(MatchWorker::spawn(matcher, events_tx.clone())),
            None => {
                eprintln!("SYNC: approximate matcher unavailable, preview sync disabled");
                None
            }
        };
        Self {
            config,
            worker,
            events_tx,
            events_rx,
            generation: 0,
            text_state: TextPipeline::Idle,
            click_state: ClickPipeline::Idle,
            pending_source: None,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.worker.is_some()
    }

    /// True while either direction is applying a current result; the
    /// opposite direction's triggers are ignored during that window.
    fn applying(&self) -> bool {
        matches!(self.text_state, TextPipeline::Applying { generation } if generation == self.generation)
            || matches!(self.click_state, ClickPipeline::Applying { generation } if generation == self.generation)
    }

    /// Cursor moved in the text editor: (re)start the debounce window.
    pub fn on_cursor_position_changed(&mut self, preview: &dyn PreviewView) {
        if !self.is_enabled() || self.applying() || !preview.is_visible() {
            return;
        }
        self.text_state = TextPipeline::Debouncing {
            deadline: Instant::now() + Duration::from_millis(self.config.debounce_ms),
        };
    }

    /// Click in the preview at `index` within its plain-text rendering.
    pub fn on_preview_click(&mut self, editor: &dyn EditorView, page_text: String, index: usize) {
        if !self.is_enabled() || self.applying() {
            return;
        }
        self.generation += 1;
        let generation = self.generation;
        self.text_state = TextPipeline::Idle;
        self.pending_source = None;
        if let Some(worker) = &self.worker {
            worker.submit(MatchJob {
                generation,
                direction: Direction::PreviewToText,
                source: page_text,
                offset: index,
                target: editor.text(),
            });
        }
        self.click_state = ClickPipeline::Matching { generation };
    }

    /// Active document switched: cancel both pipelines.
    pub fn on_document_changed(&mut self) {
        self.cancel();
    }

    /// Preview closed or hidden: cancel both pipelines.
    pub fn on_preview_hidden(&mut self) {
        self.cancel();
    }

    fn cancel(&mut self) {
        self.generation += 1;
        self.text_state = TextPipeline::Idle;
        self.click_state = ClickPipeline::Idle;
        self.pending_source = None;
    }

    /// Frame pump: advances expired debounce deadlines, consumes completed
    /// background work and performs the resulting view mutations. Returns
    /// the sync actions applied this cycle.
    pub fn poll(
        &mut self,
        editor: &mut dyn EditorView,
        preview: &mut dyn PreviewView,
    ) -> Vec<SyncAction> {
        let mut actions = Vec::new();
        if !self.is_enabled() {
            return actions;
        }

        if let TextPipeline::Debouncing { deadline } = self.text_state {
            if Instant::now() >= deadline {
                self.start_text_to_preview(editor, preview);
            }
        }

        while let Ok(event) = self.events_rx.try_recv() {
            self.handle_event(event, editor, preview, &mut actions);
        }
        actions
    }

    fn start_text_to_preview(&mut self, editor: &dyn EditorView, preview: &dyn PreviewView) {
        if !preview.is_visible() {
            self.text_state = TextPipeline::Idle;
            return;
        }
        self.generation += 1;
        let generation = self.generation;
        self.click_state = ClickPipeline::Idle;
        self.pending_source = Some((editor.text(), editor.cursor_offset()));
        let tx = self.events_tx.clone();
        preview.plain_text(Box::new(move |text| {
            let _ = tx.send(Event::PlainText { generation, text });
        }));
        self.text_state = TextPipeline::AwaitingText { generation };
    }

    fn handle_event(
        &mut self,
        event: Event,
        editor: &mut dyn EditorView,
        preview: &mut dyn PreviewView,
        actions: &mut Vec<SyncAction>,
    ) {
        match event {
            Event::PlainText { generation, text } => {
                if generation != self.generation {
                    return;
                }
                if !matches!(self.text_state, TextPipeline::AwaitingText { .. }) {
                    return;
                }
                let Some((source, offset)) = self.pending_source.take() else {
                    self.text_state = TextPipeline::Idle;
                    return;
                };
                if let Some(worker) = &self.worker {
                    worker.submit(MatchJob {
                        generation,
                        direction: Direction::TextToPreview,
                        source,
                        offset,
                        target: text,
                    });
                }
                self.text_state = TextPipeline::Matching { generation };
            }
            Event::MatchDone {
                generation,
                direction,
                result,
                target,
            } => {
                if generation != self.generation {
                    return;
                }
                match direction {
                    Direction::TextToPreview => {
                        // A cursor movement may have re-armed the debounce
                        // while this job was in flight; the newer position
                        // supersedes this result, so only a pipeline still
                        // in Matching may accept it.
                        let current = matches!(self.text_state,
                            TextPipeline::Matching { generation: g } if g == generation);
                        if !current {
                            return;
                        }
                        match result {
                            Some(web_index) => {
                                self.text_state = TextPipeline::Applying { generation };
                                let prefix: String = target.chars().take(web_index).collect();
                                let tx = self.events_tx.clone();
                                preview.highlight_find(
                                    &prefix,
                                    Box::new(move |found| {
                                        let _ =
                                            tx.send(Event::HighlightDone { generation, found });
                                    }),
                                );
                            }
                            // No adequate correspondence: skip this cycle.
                            None => self.text_state = TextPipeline::Idle,
                        }
                    }
                    Direction::PreviewToText => {
                        let current = matches!(self.click_state,
                            ClickPipeline::Matching { generation: g } if g == generation);
                        if !current {
                            return;
                        }
                        match result {
                            Some(text_index) => {
                                self.click_state = ClickPipeline::Applying { generation };
                                editor.set_cursor_offset(text_index);
                                editor.ensure_cursor_visible();
                                actions.push(SyncAction::CursorMoved { offset: text_index });
                                let tx = self.events_tx.clone();
                                preview.selection_anchor(Box::new(move |anchor| {
                                    let _ = tx.send(Event::Anchor {
                                        generation,
                                        direction: Direction::PreviewToText,
                                        anchor,
                                    });
                                }));
                            }
                            None => self.click_state = ClickPipeline::Idle,
                        }
                    }
                }
            }
            Event::HighlightDone { generation, found } => {
                if generation != self.generation {
                    return;
                }
                if !matches!(self.text_state,
                    TextPipeline::Applying { generation: g } if g == generation)
                {
                    return;
                }
                if !found {
                    self.text_state = TextPipeline::Idle;
                    return;
                }
                let tx = self.events_tx.clone();
                preview.selection_anchor(Box::new(move |anchor| {
                    let _ = tx.send(Event::Anchor {
                        generation,
                        direction: Direction::TextToPreview,
                        anchor,
                    });
                }));
            }
            Event::Anchor {
                generation,
                direction,
                anchor,
            } => {
                if generation != self.generation {
                    return;
                }
                match direction {
                    Direction::TextToPreview => {
                        if !matches!(self.text_state,
                            TextPipeline::Applying { generation: g } if g == generation)
                        {
                            return;
                        }
                        if let Some(anchor) = anchor {
                            let delta = self.align_preview_to_editor(editor, preview, anchor);
                            // Small deltas are not worth disturbing the
                            // preview for.
                            if delta.abs() > self.config.scroll_tolerance_px {
                                preview.scroll_by(delta);
                                preview.clear_selection();
                                actions.push(SyncAction::PreviewScrolled { delta });
                            }
                            actions.push(SyncAction::TextToPreviewSynced);
                        }
                        self.text_state = TextPipeline::Idle;
                    }
                    Direction::PreviewToText => {
                        if !matches!(self.click_state,
                            ClickPipeline::Applying { generation: g } if g == generation)
                        {
                            return;
                        }
                        if let Some(anchor) = anchor {
                            let delta = self.align_editor_to_preview(editor, preview, anchor);
                            let cursor_height = editor.cursor_rect().height;
                            if cursor_height > 0.0 {
                                // The editor scroll bar works in line
                                // units; assume uniform line heights.
                                let lines = (delta / cursor_height).round();
                                editor.set_vertical_scroll_value(
                                    editor.vertical_scroll_value() - lines,
                                );
                                actions.push(SyncAction::EditorScrolled { lines });
                            }
                        }
                        editor.focus();
                        self.click_state = ClickPipeline::Idle;
                    }
                }
            }
        }
    }

    /// Scroll delta aligning the preview's cursor with the editor's.
    fn align_preview_to_editor(
        &self,
        editor: &dyn EditorView,
        preview: &dyn PreviewView,
        anchor: SelectionAnchor,
    ) -> f32 {
        let cursor = editor.cursor_rect();
        align_scroll_amount(&ScrollAlignment {
            source_global_top: editor.global_rect().y,
            source_cursor_bottom: cursor.bottom(),
            target_global_top: preview.global_rect().y,
            target_cursor_bottom: anchor.top + anchor.height,
            target_height: preview.global_rect().height,
            target_cursor_height: anchor.height,
            padding: self.config.scroll_tolerance_px,
        })
    }

    /// Scroll delta aligning the editor's cursor with the preview's.
    fn align_editor_to_preview(
        &self,
        editor: &dyn EditorView,
        preview: &dyn PreviewView,
        anchor: SelectionAnchor,
    ) -> f32 {
        let cursor = editor.cursor_rect();
        // The widget height includes the horizontal scroll bar; subtract
        // it only when it is actually visible.
        let mut height = editor.global_rect().height;
        if let Some(scrollbar) = editor.horizontal_scrollbar_height() {
            height -= scrollbar;
        }
        align_scroll_amount(&ScrollAlignment {
            source_global_top: preview.global_rect().y,
            source_cursor_bottom: anchor.top + anchor.height,
            target_global_top: editor.global_rect().y,
            target_cursor_bottom: cursor.bottom(),
            target_height: height,
            target_cursor_height: cursor.height,
            padding: 0.0,
        })
    }
}
