//! Full link-creation flow: editor shell + link popover component together.

use rich_text_core::{
    LinkActionKind, PopoverState, RichTextEditor, RichTextOptions,
};
use rich_text_popovers::LinkPopover;

#[test]
fn test_caret_link_creation_end_to_end() {
    // Host: empty editor, caret at the end, link button clicked.
    let mut editor = RichTextEditor::new(RichTextOptions::default());
    editor.mount().unwrap();
    editor.set_content("").unwrap();
    let root = editor.dom().root();
    editor.place_caret(root, 0).unwrap();
    editor.toolbar_click("link").unwrap();

    // The popover opens in creating mode with an empty URL field.
    let PopoverState::Link { anchor, mode } = editor.popover_state() else {
        panic!("expected an open link popover");
    };
    assert_eq!(mode, rich_text_core::LinkMode::Creating);
    let href = editor.dom().attr(anchor, "href").map(str::to_string);
    let mut popover = LinkPopover::new(href, None, true);
    assert_eq!(popover.url_input(), "");

    // User types a bare host name and presses Enter.
    popover.set_url_input("foo.com");
    let action = popover.enter_pressed();
    assert_eq!(action.action, LinkActionKind::Edit);
    editor.link_action(action).unwrap();

    // The anchor got a normalized href and the popover closed.
    assert_eq!(editor.dom().attr(anchor, "href"), Some("http://foo.com"));
    assert_eq!(editor.popover_state(), PopoverState::None);
    let content = editor.get_content().unwrap();
    assert!(content.html.contains("href=\"http://foo.com\""));
    assert_eq!(content.text, "foo.com");
}

#[test]
fn test_abandoned_popover_emits_destroy_and_editor_cleans_up() {
    let mut editor = RichTextEditor::new(RichTextOptions::default());
    editor.mount().unwrap();
    editor.set_content("before after").unwrap();
    let text = editor.dom().text_nodes_in(editor.dom().root())[0];
    editor.place_caret(text, 6).unwrap();
    editor.toolbar_click("link").unwrap();

    let PopoverState::Link { anchor, .. } = editor.popover_state() else {
        panic!("expected an open link popover");
    };
    let href = editor.dom().attr(anchor, "href").map(str::to_string);
    let mut popover = LinkPopover::new(href, None, true);

    // The popover unloads without a submission: it reports destroy, and the
    // editor removes the abandoned anchor.
    let action = popover.teardown().expect("implicit destroy");
    assert_eq!(action.action, LinkActionKind::Destroy);
    editor.link_action(action).unwrap();

    assert_eq!(editor.popover_state(), PopoverState::None);
    assert_eq!(editor.get_content().unwrap().html, "before after");
}

#[test]
fn test_edit_existing_link_updates_text_and_url() {
    let mut editor = RichTextEditor::new(RichTextOptions::default());
    editor.mount().unwrap();
    editor
        .set_content("<a href=\"http://old.example\" target=\"_blank\">old label</a>")
        .unwrap();
    let text = editor.dom().text_nodes_in(editor.dom().root())[0];
    editor.place_caret(text, 3).unwrap();

    let PopoverState::Link { anchor, mode } = editor.popover_state() else {
        panic!("expected an open link popover");
    };
    assert_eq!(mode, rich_text_core::LinkMode::Editing);

    let href = editor.dom().attr(anchor, "href").map(str::to_string);
    let label = editor.dom().inner_text(anchor);
    let mut popover = LinkPopover::new(href, Some(label), false);
    assert_eq!(popover.url_input(), "http://old.example");
    assert!(!popover.shows_text_input());

    popover.set_url_input("https://new.example");
    let action = popover.enter_pressed();
    editor.link_action(action).unwrap();

    let html = editor.get_content().unwrap().html;
    assert!(html.contains("href=\"https://new.example\""));
    assert!(html.contains(">old label</a>"));
}
