mod common;

use common::MockEditor;
use navsync::ctags::ExtractionError;
use navsync::ctags_manager::{CtagsManager, Extractor, TagRequest};
use navsync::navigator::Navigator;
use navsync::tags::{parse, TagForest};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread::sleep;
use std::time::Duration;

fn forest_named(name: &str) -> TagForest {
    let raw = format!("{}\tsample.py\t/^x/;\"\tfunction\tline:1", name);
    parse(&raw).unwrap()
}

fn root_name(forest: &TagForest) -> String {
    forest.get(forest.roots()[0]).name.clone()
}

#[test]
fn test_latest_wins_emits_only_newest_request() {
    let runs = Arc::new(AtomicUsize::new(0));
    let extractor: Extractor = {
        let runs = runs.clone();
        Arc::new(move |_file_name, text| {
            runs.fetch_add(1, Ordering::SeqCst);
            sleep(Duration::from_millis(100));
            Ok(forest_named(text))
        })
    };
    let mut manager = CtagsManager::with_extractor(Duration::ZERO, extractor);

    manager.request(TagRequest::DocumentSwitched {
        file_name: "a.py".to_string(),
        text: "first".to_string(),
    });
    // Let the first extraction start, then supersede it.
    sleep(Duration::from_millis(40));
    manager.request(TagRequest::TextEdited {
        file_name: "a.py".to_string(),
        text: "second".to_string(),
    });
    sleep(Duration::from_millis(500));

    let mut updates = Vec::new();
    while let Some(update) = manager.poll_update() {
        updates.push(update);
    }
    assert_eq!(updates.len(), 1, "only the newest request may emit");
    assert_eq!(root_name(&updates[0].forest), "second");
    // The first pass ran to completion before being discarded.
    assert_eq!(runs.load(Ordering::SeqCst), 2);
    manager.shutdown();
}

#[test]
fn test_debounce_coalesces_edit_bursts() {
    let runs = Arc::new(AtomicUsize::new(0));
    let extractor: Extractor = {
        let runs = runs.clone();
        Arc::new(move |_file_name, text| {
            runs.fetch_add(1, Ordering::SeqCst);
            Ok(forest_named(text))
        })
    };
    let mut manager = CtagsManager::with_extractor(Duration::from_millis(150), extractor);

    manager.request(TagRequest::TextEdited {
        file_name: "a.py".to_string(),
        text: "one".to_string(),
    });
    sleep(Duration::from_millis(50));
    manager.request(TagRequest::TextEdited {
        file_name: "a.py".to_string(),
        text: "two".to_string(),
    });
    sleep(Duration::from_millis(450));

    let mut updates = Vec::new();
    while let Some(update) = manager.poll_update() {
        updates.push(update);
    }
    assert_eq!(updates.len(), 1);
    assert_eq!(root_name(&updates[0].forest), "two");
    assert_eq!(runs.load(Ordering::SeqCst), 1, "burst must coalesce to one run");
    manager.shutdown();
}

#[test]
fn test_failure_preserves_displayed_tree() {
    let extractor: Extractor = Arc::new(|_file_name, text| {
        if text == "good" {
            Ok(forest_named("kept"))
        } else {
            Err(ExtractionError::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "ctags missing",
            )))
        }
    });
    let manager = CtagsManager::with_extractor(Duration::ZERO, extractor);
    let mut navigator = Navigator::with_manager(manager);
    let mut editor = MockEditor::new("good");

    navigator.on_document_changed(&editor);
    sleep(Duration::from_millis(150));
    assert!(navigator.poll());
    assert_eq!(navigator.model().child_count(None), 1);
    let revision = navigator.model().revision();

    editor.text = "broken".to_string();
    navigator.on_text_changed(&editor);
    sleep(Duration::from_millis(150));
    assert!(!navigator.poll(), "a failed extraction must not refresh");
    assert_eq!(navigator.model().revision(), revision);
    assert_eq!(navigator.model().child_count(None), 1);
    navigator.shutdown();
}

#[test]
fn test_untaggable_document_clears_tree() {
    let extractor: Extractor = Arc::new(|_file_name, _text| Ok(forest_named("any")));
    let manager = CtagsManager::with_extractor(Duration::ZERO, extractor);
    let mut navigator = Navigator::with_manager(manager);
    let mut editor = MockEditor::new("body");

    navigator.on_document_changed(&editor);
    sleep(Duration::from_millis(150));
    assert!(navigator.poll());
    assert_eq!(navigator.model().child_count(None), 1);

    editor.file_name = None;
    navigator.on_document_changed(&editor);
    assert_eq!(navigator.model().child_count(None), 0);
    navigator.shutdown();
}

#[test]
fn test_unnamed_document_edits_are_ignored() {
    let runs = Arc::new(AtomicUsize::new(0));
    let extractor: Extractor = {
        let runs = runs.clone();
        Arc::new(move |_file_name, _text| {
            runs.fetch_add(1, Ordering::SeqCst);
            Ok(forest_named("any"))
        })
    };
    let manager = CtagsManager::with_extractor(Duration::ZERO, extractor);
    let navigator = Navigator::with_manager(manager);
    let mut editor = MockEditor::new("body");
    editor.file_name = None;

    navigator.on_text_changed(&editor);
    sleep(Duration::from_millis(150));
    assert_eq!(runs.load(Ordering::SeqCst), 0);
}
