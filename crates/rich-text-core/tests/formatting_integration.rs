//! End-to-end formatting scenarios.
//!
//! Drives the editor shell the way a host page would: content in, selection
//! events, toolbar clicks, content back out.

use rich_text_core::{
    DomRange, Format, KeyEvent, RangeBound, RichTextEditor, RichTextOptions, ZERO_WIDTH_MARKER,
};

fn mounted() -> RichTextEditor {
    let mut editor = RichTextEditor::new(RichTextOptions::default());
    editor.mount().unwrap();
    editor
}

fn select_text(editor: &mut RichTextEditor, index: usize, from: usize, to: usize) {
    let text = editor.dom().text_nodes_in(editor.dom().root())[index];
    editor
        .select(DomRange::new(
            RangeBound {
                node: text,
                offset: from,
            },
            RangeBound {
                node: text,
                offset: to,
            },
        ))
        .unwrap();
}

#[test]
fn test_select_hello_click_bold() {
    let mut editor = mounted();
    editor.set_content("<p>Hello</p>").unwrap();
    select_text(&mut editor, 0, 0, 5);

    editor.toolbar_click("bold").unwrap();

    let content = editor.get_content().unwrap();
    assert_eq!(content.html, "<p><b>Hello</b></p>");
    assert_eq!(content.text, "Hello");
    assert!(editor.toolbar().is_active(Format::Bold));
}

#[test]
fn test_active_states_recompute_is_referentially_transparent() {
    let mut editor = mounted();
    editor.set_content("<b><i>styled</i></b> plain").unwrap();
    select_text(&mut editor, 0, 0, 3);

    let first = editor.active_states().clone();
    editor.selection_change().unwrap();
    let second = editor.active_states().clone();
    assert_eq!(first, second);
    assert!(first.contains(Format::Bold));
    assert!(first.contains(Format::Italic));
}

#[test]
fn test_caret_toggle_round_trip_leaves_no_residue() {
    let mut editor = mounted();
    editor.set_content("around").unwrap();
    let text = editor.dom().text_nodes_in(editor.dom().root())[0];
    editor.place_caret(text, 3).unwrap();

    // Activate bold at the caret: a marker-backed wrapper appears.
    editor.toolbar_click("bold").unwrap();
    assert!(editor.get_content().unwrap().html.contains("<b>"));

    // Deactivate at the same caret: wrapper and marker vanish entirely.
    editor.selection_change().unwrap();
    assert!(editor.active_states().contains(Format::Bold));
    editor.toolbar_click("bold").unwrap();

    let html = editor.get_content().unwrap().html;
    assert_eq!(html, "around");
    assert!(!html.contains(ZERO_WIDTH_MARKER));
}

#[test]
fn test_caret_toggle_then_typing_strips_marker() {
    let mut editor = mounted();
    editor.set_content("ab").unwrap();
    let text = editor.dom().text_nodes_in(editor.dom().root())[0];
    editor.place_caret(text, 1).unwrap();

    editor.toolbar_click("underline").unwrap();
    editor.key_down(KeyEvent::typing('x')).unwrap();
    editor.key_up(KeyEvent::typing('x')).unwrap();

    let html = editor.get_content().unwrap().html;
    assert_eq!(html, "a<u>x</u>b");
    assert!(!html.contains("caret-marker"));
    assert!(!html.contains("&#65279;"));
}

#[test]
fn test_alignment_is_idempotent() {
    let mut editor = mounted();
    editor.set_content("<p>centered text</p>").unwrap();
    select_text(&mut editor, 0, 0, 8);

    editor.toolbar_click("justifyCenter").unwrap();
    let first = editor.get_content().unwrap().html;
    assert!(first.contains("text-align: center"));

    select_text(&mut editor, 0, 0, 8);
    editor.toolbar_click("justifyCenter").unwrap();
    let second = editor.get_content().unwrap().html;
    assert_eq!(first, second);
    // Exactly one alignment declaration survives.
    assert_eq!(second.matches("text-align").count(), 1);
}

#[test]
fn test_toolbar_with_alignment_buttons() {
    let mut editor = RichTextEditor::new(RichTextOptions {
        toolbar: Some(vec![
            "bold".to_string(),
            "justifyLeft".to_string(),
            "justifyCenter".to_string(),
            "justifyRight".to_string(),
        ]),
        ..RichTextOptions::default()
    });
    editor.mount().unwrap();
    editor.set_content("<p>words</p>").unwrap();
    select_text(&mut editor, 0, 0, 5);

    editor.toolbar_click("justifyRight").unwrap();
    editor.selection_change().unwrap();
    assert!(editor.active_states().contains(Format::JustifyRight));
    assert!(!editor.active_states().contains(Format::JustifyCenter));

    // Switching alignment replaces the old override rather than stacking.
    select_text(&mut editor, 0, 0, 5);
    editor.toolbar_click("justifyCenter").unwrap();
    let html = editor.get_content().unwrap().html;
    assert!(html.contains("text-align: center"));
    assert!(!html.contains("text-align: right"));
}

#[test]
fn test_color_submission_applies_font_color() {
    let mut editor = mounted();
    editor.set_content("tinted").unwrap();
    select_text(&mut editor, 0, 0, 6);

    editor.toolbar_click("color").unwrap();
    editor.submit_color("#ff4541").unwrap();

    let html = editor.get_content().unwrap().html;
    assert_eq!(html, "<font color=\"#ff4541\">tinted</font>");
    assert_eq!(editor.toolbar().color_fill(), Some("#ff4541"));
}

#[test]
fn test_highlight_submission_and_removal() {
    let mut editor = mounted();
    editor.set_content("marked").unwrap();
    select_text(&mut editor, 0, 0, 6);

    editor.toolbar_click("highlight").unwrap();
    editor.submit_highlight("#f3f315").unwrap();
    let html = editor.get_content().unwrap().html;
    assert_eq!(html, "<span style=\"background-color: #f3f315\">marked</span>");

    // Clicking highlight while active strips the formatting instead of
    // reopening the popover.
    editor.selection_change().unwrap();
    assert!(editor.active_states().contains(Format::Highlight));
    editor.toolbar_click("highlight").unwrap();
    assert_eq!(editor.get_content().unwrap().html, "marked");
}

#[test]
fn test_list_round_trip_via_toolbar() {
    let mut editor = mounted();
    editor.set_content("item one").unwrap();
    select_text(&mut editor, 0, 0, 8);

    editor.toolbar_click("orderedList").unwrap();
    assert_eq!(
        editor.get_content().unwrap().html,
        "<ol><li>item one</li></ol>"
    );
    editor.selection_change().unwrap();
    assert!(editor.active_states().contains(Format::OrderedList));
}

#[test]
fn test_undo_redo_buttons() {
    let mut editor = RichTextEditor::new(RichTextOptions {
        toolbar: Some(vec![
            "bold".to_string(),
            "undo".to_string(),
            "redo".to_string(),
        ]),
        ..RichTextOptions::default()
    });
    editor.mount().unwrap();
    editor.set_content("Hello").unwrap();
    select_text(&mut editor, 0, 0, 5);

    editor.toolbar_click("bold").unwrap();
    assert_eq!(editor.get_content().unwrap().html, "<b>Hello</b>");

    editor.toolbar_click("undo").unwrap();
    assert_eq!(editor.get_content().unwrap().html, "Hello");

    editor.toolbar_click("redo").unwrap();
    assert_eq!(editor.get_content().unwrap().html, "<b>Hello</b>");
}

#[test]
fn test_unsupported_caret_format_is_silent() {
    let mut editor = RichTextEditor::new(RichTextOptions {
        toolbar: Some(vec!["subscript".to_string()]),
        ..RichTextOptions::default()
    });
    editor.mount().unwrap();
    editor.set_content("baseline").unwrap();
    let text = editor.dom().text_nodes_in(editor.dom().root())[0];
    editor.place_caret(text, 4).unwrap();

    editor.toolbar_click("subscript").unwrap();
    assert_eq!(editor.get_content().unwrap().html, "baseline");
}
