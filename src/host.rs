//! Host collaborator interfaces consumed by both plugins
//!
//! The host editor implements these traits; the plugins never draw or own
//! widgets themselves. All methods are called on the main thread. Methods
//! taking a callback model operations the embedded web widget can only
//! answer asynchronously (plain-text extraction, script results); the
//! callback may fire on any thread and must marshal back through a channel.

/// Axis-aligned rectangle in pixels. `x`/`y` are the top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Bottom (y) edge.
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }
}

/// Anchor of the current selection in the preview, in widget coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SelectionAnchor {
    /// Top of the selection anchor, measured from the top of the widget.
    pub top: f32,
    /// Height of the text at the anchor.
    pub height: f32,
}

pub type TextCallback = Box<dyn FnOnce(String) + Send>;
pub type AnchorCallback = Box<dyn FnOnce(Option<SelectionAnchor>) + Send>;
pub type FoundCallback = Box<dyn FnOnce(bool) + Send>;

/// The host's text editor widget for the current document.
pub trait EditorView {
    /// Full document text.
    fn text(&self) -> String;

    /// File name of the current document, if it has one.
    fn file_name(&self) -> Option<String>;

    /// Cursor position as a character offset into `text()`.
    fn cursor_offset(&self) -> usize;

    /// Move the cursor to a character offset. The host may synchronously
    /// dispatch a cursor-position-changed event from inside this call.
    fn set_cursor_offset(&mut self, offset: usize);

    /// Cursor rectangle in widget coordinates.
    fn cursor_rect(&self) -> Rect;

    /// Widget geometry with the origin in global (screen) coordinates.
    fn global_rect(&self) -> Rect;

    /// Height of the horizontal scroll bar, if it is currently visible.
    fn horizontal_scrollbar_height(&self) -> Option<f32>;

    /// Vertical scroll bar value, in line units.
    fn vertical_scroll_value(&self) -> f32;

    fn set_vertical_scroll_value(&mut self, value: f32);

    /// Scroll so the cursor is on screen.
    fn ensure_cursor_visible(&mut self);

    /// Give the editor keyboard focus.
    fn focus(&mut self);
}

/// The host's embedded web-rendering widget showing the preview.
pub trait PreviewView {
    fn is_visible(&self) -> bool;

    /// Widget geometry with the origin in global (screen) coordinates.
    fn global_rect(&self) -> Rect;

    /// Plain-text rendering of the page, delivered through the callback.
    fn plain_text(&self, done: TextCallback);

    /// Coordinates of the current selection anchor, or `None` if there is
    /// no selection.
    fn selection_anchor(&self, done: AnchorCallback);

    /// Find `prefix` from the top of the page and highlight the line on
    /// which it ends. Reports whether the text was found.
    fn highlight_find(&mut self, prefix: &str, done: FoundCallback);

    /// Scroll so the page content moves down by `delta_y` pixels (negative
    /// values move it up).
    fn scroll_by(&mut self, delta_y: f32);

    /// Clear the current selection, if any.
    fn clear_selection(&mut self);
}
