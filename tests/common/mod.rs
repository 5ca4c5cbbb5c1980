//! Mock host views shared by the integration tests.
#![allow(dead_code)]

use navsync::host::{
    AnchorCallback, EditorView, FoundCallback, PreviewView, Rect, SelectionAnchor, TextCallback,
};
use std::cell::Cell;

pub struct MockEditor {
    pub text: String,
    pub file_name: Option<String>,
    pub cursor: usize,
    pub cursor_rect: Rect,
    pub rect: Rect,
    pub hsb_height: Option<f32>,
    pub scroll: f32,
    pub ensure_visible_calls: usize,
    pub focus_calls: usize,
}

impl MockEditor {
    pub fn new(text: &str) -> Self {
        Self {
            text: text.to_string(),
            file_name: Some("sample.py".to_string()),
            cursor: 0,
            cursor_rect: Rect::new(0.0, 80.0, 8.0, 20.0),
            rect: Rect::new(0.0, 0.0, 800.0, 500.0),
            hsb_height: None,
            scroll: 0.0,
            ensure_visible_calls: 0,
            focus_calls: 0,
        }
    }
}

impl EditorView for MockEditor {
    fn text(&self) -> String {
        self.text.clone()
    }

    fn file_name(&self) -> Option<String> {
        self.file_name.clone()
    }

    fn cursor_offset(&self) -> usize {
        self.cursor
    }

    fn set_cursor_offset(&mut self, offset: usize) {
        self.cursor = offset;
    }

    fn cursor_rect(&self) -> Rect {
        self.cursor_rect
    }

    fn global_rect(&self) -> Rect {
        self.rect
    }

    fn horizontal_scrollbar_height(&self) -> Option<f32> {
        self.hsb_height
    }

    fn vertical_scroll_value(&self) -> f32 {
        self.scroll
    }

    fn set_vertical_scroll_value(&mut self, value: f32) {
        self.scroll = value;
    }

    fn ensure_cursor_visible(&mut self) {
        self.ensure_visible_calls += 1;
    }

    fn focus(&mut self) {
        self.focus_calls += 1;
    }
}

pub struct MockPreview {
    pub text: String,
    pub visible: bool,
    pub rect: Rect,
    pub anchor: Option<SelectionAnchor>,
    pub highlights: Vec<String>,
    pub scrolls: Vec<f32>,
    pub clear_calls: usize,
    /// When set, highlight_find callbacks are parked in `deferred` instead
    /// of completing immediately.
    pub defer_finds: bool,
    pub deferred: Vec<FoundCallback>,
    pub plain_text_calls: Cell<usize>,
}

impl MockPreview {
    pub fn new(text: &str) -> Self {
        Self {
            text: text.to_string(),
            visible: true,
            rect: Rect::new(0.0, 0.0, 800.0, 500.0),
            anchor: Some(SelectionAnchor {
                top: 30.0,
                height: 20.0,
            }),
            highlights: Vec::new(),
            scrolls: Vec::new(),
            clear_calls: 0,
            defer_finds: false,
            deferred: Vec::new(),
            plain_text_calls: Cell::new(0),
        }
    }
}

impl PreviewView for MockPreview {
    fn is_visible(&self) -> bool {
        self.visible
    }

    fn global_rect(&self) -> Rect {
        self.rect
    }

    fn plain_text(&self, done: TextCallback) {
        self.plain_text_calls.set(self.plain_text_calls.get() + 1);
        done(self.text.clone());
    }

    fn selection_anchor(&self, done: AnchorCallback) {
        done(self.anchor);
    }

    fn highlight_find(&mut self, prefix: &str, done: FoundCallback) {
        self.highlights.push(prefix.to_string());
        if self.defer_finds {
            self.deferred.push(done);
        } else {
            done(true);
        }
    }

    fn scroll_by(&mut self, delta_y: f32) {
        self.scrolls.push(delta_y);
    }

    fn clear_selection(&mut self) {
        self.clear_calls += 1;
    }
}
