//! Toolbar visibility across focus transitions and the blur debounce.

use rich_text_core::{
    DomRange, RangeBound, RichTextEditor, RichTextOptions, ShowToolbar,
};

fn on_select_editor() -> RichTextEditor {
    let mut editor = RichTextEditor::new(RichTextOptions {
        show_toolbar: ShowToolbar::OnSelect,
        ..RichTextOptions::default()
    });
    editor.mount().unwrap();
    editor
}

#[test]
fn test_on_select_toolbar_shows_on_focus() {
    let mut editor = on_select_editor();
    assert_eq!(
        editor.toolbar().visibility().class_names(),
        vec!["selection"]
    );

    editor.focus().unwrap();
    assert_eq!(
        editor.toolbar().visibility().class_names(),
        vec!["selection", "show"]
    );
}

#[test]
fn test_blur_hides_after_debounce_window() {
    let mut editor = on_select_editor();
    editor.focus().unwrap();
    editor.blur().unwrap();

    // Still visible until the debounce timer fires.
    assert!(editor.toolbar().visibility().show);

    assert!(editor.blur_timer_fired());
    assert_eq!(
        editor.toolbar().visibility().class_names(),
        vec!["selection"]
    );
}

#[test]
fn test_refocus_within_debounce_cancels_teardown() {
    let mut editor = on_select_editor();
    editor.focus().unwrap();
    editor.blur().unwrap();
    editor.focus().unwrap();

    // The pending teardown was cancelled by the refocus.
    assert!(!editor.blur_timer_fired());
    assert!(editor.toolbar().visibility().show);
}

#[test]
fn test_open_popover_blocks_teardown() {
    let mut editor = on_select_editor();
    editor.set_content("words").unwrap();
    let text = editor.dom().text_nodes_in(editor.dom().root())[0];
    editor
        .select(DomRange::new(
            RangeBound {
                node: text,
                offset: 0,
            },
            RangeBound {
                node: text,
                offset: 5,
            },
        ))
        .unwrap();
    editor.focus().unwrap();
    editor.toolbar_click("color").unwrap();
    editor.blur().unwrap();

    // A popover is open when the timer fires: teardown is cancelled.
    assert!(!editor.blur_timer_fired());
    assert!(editor.toolbar().visibility().show);
}

#[test]
fn test_on_hover_mode_uses_phantom_class() {
    let mut editor = RichTextEditor::new(RichTextOptions {
        show_toolbar: ShowToolbar::OnHover,
        ..RichTextOptions::default()
    });
    editor.mount().unwrap();
    assert_eq!(editor.toolbar().visibility().class_names(), vec!["phantom"]);
}

#[test]
fn test_always_mode_has_no_visibility_classes() {
    let mut editor = RichTextEditor::new(RichTextOptions::default());
    editor.mount().unwrap();
    assert!(editor.toolbar().visibility().class_names().is_empty());
}
