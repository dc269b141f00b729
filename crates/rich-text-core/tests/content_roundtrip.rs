//! Content get/set round-trip behavior.

use rich_text_core::{RichTextEditor, RichTextOptions};

fn mounted() -> RichTextEditor {
    let mut editor = RichTextEditor::new(RichTextOptions::default());
    editor.mount().unwrap();
    editor
}

#[test]
fn test_round_trip_is_stable_after_one_cycle() {
    let mut editor = mounted();
    editor
        .set_content("<p>Hello <b>world</b></p><br><i style='font-style: italic'>tail</i>")
        .unwrap();
    let first = editor.get_content().unwrap().html;

    editor.set_content(&first).unwrap();
    let second = editor.get_content().unwrap().html;
    assert_eq!(first, second);

    editor.set_content(&second).unwrap();
    let third = editor.get_content().unwrap().html;
    assert_eq!(second, third);
}

#[test]
fn test_nbsp_entities_normalize_to_spaces() {
    let mut editor = mounted();
    editor.set_content("one&nbsp;two&nbsp;three").unwrap();
    let content = editor.get_content().unwrap();
    assert_eq!(content.html, "one two three");
    assert!(!content.html.contains("&nbsp;"));
}

#[test]
fn test_text_and_html_views_agree() {
    let mut editor = mounted();
    editor
        .set_content("<p>line one</p>line two<br>line three")
        .unwrap();
    let content = editor.get_content().unwrap();
    assert_eq!(content.text, "line one\nline two\nline three");
    assert!(content.html.contains("<p>line one</p>"));
}

#[test]
fn test_set_content_replaces_previous_content() {
    let mut editor = mounted();
    editor.set_content("<b>old</b>").unwrap();
    editor.set_content("new").unwrap();
    let content = editor.get_content().unwrap();
    assert_eq!(content.html, "new");
    assert_eq!(content.text, "new");
}

#[test]
fn test_entities_survive_round_trip() {
    let mut editor = mounted();
    editor.set_content("a &amp; b &lt;tag&gt;").unwrap();
    let content = editor.get_content().unwrap();
    assert_eq!(content.text, "a & b <tag>");
    assert_eq!(content.html, "a &amp; b &lt;tag&gt;");
}

#[test]
fn test_empty_round_trip() {
    let mut editor = mounted();
    editor.set_content("").unwrap();
    let content = editor.get_content().unwrap();
    assert_eq!(content.text, "");
    assert_eq!(content.html, "");
    assert!(editor.is_empty());
}
