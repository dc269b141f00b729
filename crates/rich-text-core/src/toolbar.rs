//! Toolbar controller.
//!
//! Parses the host's ordered identifier list into toolbar items (dropping
//! duplicates and unknown identifiers outside the allow-list), derives
//! tooltips, and mirrors the active-state set onto per-button classes after
//! every recomputation. The controller renders nothing itself; the host reads
//! the item list and class names.

use crate::format::Format;
use crate::inspect::{ActiveStates, AnchorColors};
use crate::options::ShowToolbar;
use crate::popover::ColorTarget;

/// Identifier for the vertical separator token.
pub const VERTICAL_DIVIDER: &str = "|";
/// Identifier for the horizontal separator token.
pub const HORIZONTAL_DIVIDER: &str = "-";

/// Block-level actions with dedicated buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolbarAction {
    /// Wrap the current line(s) in an ordered list.
    OrderedList,
    /// Wrap the current line(s) in an unordered list.
    UnorderedList,
    /// Undo the last mutation.
    Undo,
    /// Redo the last undone mutation.
    Redo,
}

impl ToolbarAction {
    /// Native command name the action forwards to.
    pub fn command_name(self) -> &'static str {
        match self {
            Self::OrderedList => "insertOrderedList",
            Self::UnorderedList => "insertUnorderedList",
            Self::Undo => "undo",
            Self::Redo => "redo",
        }
    }
}

/// Separator tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Separator {
    /// Vertical divider (`|`).
    Vertical,
    /// Horizontal divider (`-`).
    Horizontal,
}

/// Buttons that open a popover instead of running a command directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PopoverButton {
    /// Text-color popover.
    Color,
    /// Highlight popover.
    Highlight,
    /// Link popover.
    Link,
}

impl PopoverButton {
    /// The color-popover target, for the two palette buttons.
    pub fn color_target(self) -> Option<ColorTarget> {
        match self {
            Self::Color => Some(ColorTarget::Color),
            Self::Highlight => Some(ColorTarget::Highlight),
            Self::Link => None,
        }
    }
}

/// One materialized toolbar entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolbarItem {
    /// Inline formatting toggle routed through the format executor.
    Toggle(Format),
    /// Alignment action: strips any inline `text-align` override, then runs
    /// the native alignment command.
    Alignment(Format),
    /// Block action routed straight to the native primitive.
    Action(ToolbarAction),
    /// Popover-backed button.
    Popover(PopoverButton),
    /// Structural separator.
    Separator(Separator),
    /// Allow-listed native command forwarded verbatim.
    Passthrough(String),
}

impl ToolbarItem {
    /// The identifier the item was parsed from.
    pub fn identifier(&self) -> String {
        match self {
            Self::Toggle(format) | Self::Alignment(format) => format.identifier().to_string(),
            Self::Action(ToolbarAction::OrderedList) => "orderedList".to_string(),
            Self::Action(ToolbarAction::UnorderedList) => "unorderedList".to_string(),
            Self::Action(ToolbarAction::Undo) => "undo".to_string(),
            Self::Action(ToolbarAction::Redo) => "redo".to_string(),
            Self::Popover(PopoverButton::Color) => "color".to_string(),
            Self::Popover(PopoverButton::Highlight) => "highlight".to_string(),
            Self::Popover(PopoverButton::Link) => "link".to_string(),
            Self::Separator(Separator::Vertical) => VERTICAL_DIVIDER.to_string(),
            Self::Separator(Separator::Horizontal) => HORIZONTAL_DIVIDER.to_string(),
            Self::Passthrough(name) => name.clone(),
        }
    }

    /// The format whose active state backs this button, if any.
    pub fn format(&self) -> Option<Format> {
        match self {
            Self::Toggle(format) | Self::Alignment(format) => Some(*format),
            Self::Action(ToolbarAction::OrderedList) => Some(Format::OrderedList),
            Self::Action(ToolbarAction::UnorderedList) => Some(Format::UnorderedList),
            Self::Popover(PopoverButton::Color) => Some(Format::Color),
            Self::Popover(PopoverButton::Highlight) => Some(Format::Highlight),
            Self::Popover(PopoverButton::Link) => Some(Format::Link),
            _ => None,
        }
    }
}

fn parse_item(identifier: &str, allowed: &[String]) -> Option<ToolbarItem> {
    let item = match identifier {
        VERTICAL_DIVIDER => ToolbarItem::Separator(Separator::Vertical),
        HORIZONTAL_DIVIDER => ToolbarItem::Separator(Separator::Horizontal),
        "color" => ToolbarItem::Popover(PopoverButton::Color),
        "highlight" => ToolbarItem::Popover(PopoverButton::Highlight),
        "link" => ToolbarItem::Popover(PopoverButton::Link),
        "orderedList" => ToolbarItem::Action(ToolbarAction::OrderedList),
        "unorderedList" => ToolbarItem::Action(ToolbarAction::UnorderedList),
        "undo" => ToolbarItem::Action(ToolbarAction::Undo),
        "redo" => ToolbarItem::Action(ToolbarAction::Redo),
        other => match Format::from_identifier(other) {
            Some(format) if format.is_alignment() => ToolbarItem::Alignment(format),
            Some(format) => ToolbarItem::Toggle(format),
            None if allowed.iter().any(|name| name == other) => {
                ToolbarItem::Passthrough(other.to_string())
            }
            None => return None,
        },
    };
    Some(item)
}

/// Human-readable tooltip derived from a camelCase identifier.
pub fn title_for(identifier: &str) -> String {
    let mut words: Vec<String> = Vec::new();
    let mut current = String::new();
    for ch in identifier.chars() {
        if ch.is_uppercase() && !current.is_empty() {
            words.push(current.clone());
            current.clear();
        }
        current.push(ch);
    }
    if !current.is_empty() {
        words.push(current);
    }
    words
        .iter()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}

/// Toolbar visibility classes derived from the `showToolbar` mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToolbarVisibility {
    /// Configured mode.
    pub mode: ShowToolbar,
    /// Whether the toolbar currently has the `show` state (onSelect mode).
    pub show: bool,
}

impl ToolbarVisibility {
    /// Visibility for the configured mode, initially hidden for onSelect.
    pub fn new(mode: ShowToolbar) -> Self {
        Self { mode, show: false }
    }

    /// CSS classes the host applies to the toolbar container.
    pub fn class_names(&self) -> Vec<&'static str> {
        match self.mode {
            ShowToolbar::Always => Vec::new(),
            ShowToolbar::OnHover => vec!["phantom"],
            ShowToolbar::OnSelect => {
                if self.show {
                    vec!["selection", "show"]
                } else {
                    vec!["selection"]
                }
            }
        }
    }
}

/// The toolbar: materialized items plus the visual state mirrored from the
/// inspector after every recomputation.
#[derive(Debug)]
pub struct Toolbar {
    items: Vec<ToolbarItem>,
    active: ActiveStates,
    color_fill: Option<String>,
    highlight_fill: Option<String>,
    visibility: ToolbarVisibility,
}

impl Toolbar {
    /// Materialize the configured identifier sequence.
    ///
    /// Identifiers are de-duplicated (separators excepted); unrecognized ones
    /// are dropped unless allow-listed.
    pub fn build(identifiers: &[String], allowed: &[String], mode: ShowToolbar) -> Self {
        let mut items = Vec::new();
        let mut seen: Vec<String> = Vec::new();
        for identifier in identifiers {
            let Some(item) = parse_item(identifier, allowed) else {
                continue;
            };
            let is_separator = matches!(item, ToolbarItem::Separator(_));
            if !is_separator {
                if seen.iter().any(|s| s == identifier) {
                    continue;
                }
                seen.push(identifier.clone());
            }
            items.push(item);
        }
        Self {
            items,
            active: ActiveStates::new(),
            color_fill: None,
            highlight_fill: None,
            visibility: ToolbarVisibility::new(mode),
        }
    }

    /// The materialized items in order.
    pub fn items(&self) -> &[ToolbarItem] {
        &self.items
    }

    /// Find the item parsed from `identifier`.
    pub fn item(&self, identifier: &str) -> Option<&ToolbarItem> {
        self.items
            .iter()
            .find(|item| item.identifier() == identifier)
    }

    /// Formats with a button on this toolbar, in item order. This is the
    /// `enabled` set handed to the inspector.
    pub fn enabled_formats(&self) -> Vec<Format> {
        let mut formats = Vec::new();
        for item in &self.items {
            if let Some(format) = item.format() {
                if !formats.contains(&format) {
                    formats.push(format);
                }
            }
        }
        formats
    }

    /// Mirror a freshly computed active-state set (and anchor colors) onto the
    /// buttons.
    pub fn sync(&mut self, active: ActiveStates, colors: AnchorColors) {
        self.active = active;
        self.color_fill = colors.color;
        self.highlight_fill = colors.highlight;
    }

    /// `true` if the button for `format` is in the active visual state.
    pub fn is_active(&self, format: Format) -> bool {
        self.active.contains(format)
    }

    /// Class string for the button of `format`.
    pub fn button_class(&self, format: Format) -> String {
        if self.is_active(format) {
            format!("{} button active", format.identifier())
        } else {
            format!("{} button", format.identifier())
        }
    }

    /// Fill color for the text-color button, mirroring the anchor.
    pub fn color_fill(&self) -> Option<&str> {
        self.color_fill.as_deref()
    }

    /// Fill color for the highlight button, mirroring the anchor.
    pub fn highlight_fill(&self) -> Option<&str> {
        self.highlight_fill.as_deref()
    }

    /// Visibility state.
    pub fn visibility(&self) -> ToolbarVisibility {
        self.visibility
    }

    /// Set the onSelect `show` state.
    pub fn set_show(&mut self, show: bool) {
        self.visibility.show = show;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn identifiers(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_build_recognizes_default_layout() {
        let toolbar = Toolbar::build(
            &identifiers(&[
                "bold",
                "italic",
                "|",
                "color",
                "highlight",
                "|",
                "link",
                "orderedList",
            ]),
            &[],
            ShowToolbar::Always,
        );
        assert_eq!(toolbar.items().len(), 8);
        assert_eq!(
            toolbar.item("bold"),
            Some(&ToolbarItem::Toggle(Format::Bold))
        );
        assert_eq!(
            toolbar.item("orderedList"),
            Some(&ToolbarItem::Action(ToolbarAction::OrderedList))
        );
    }

    #[test]
    fn test_duplicates_materialize_once() {
        let toolbar = Toolbar::build(
            &identifiers(&["bold", "bold", "|", "|", "bold"]),
            &[],
            ShowToolbar::Always,
        );
        // One bold button; separators are exempt from dedup.
        assert_eq!(toolbar.items().len(), 3);
    }

    #[test]
    fn test_unknown_identifiers_dropped_unless_allowed() {
        let toolbar = Toolbar::build(
            &identifiers(&["bold", "marquee", "removeFormat"]),
            &["removeFormat".to_string()],
            ShowToolbar::Always,
        );
        assert_eq!(toolbar.items().len(), 2);
        assert_eq!(
            toolbar.item("removeFormat"),
            Some(&ToolbarItem::Passthrough("removeFormat".to_string()))
        );
        assert_eq!(toolbar.item("marquee"), None);
    }

    #[test]
    fn test_alignment_identifiers_parse_as_alignment() {
        let toolbar = Toolbar::build(
            &identifiers(&["justifyCenter", "justifyLeft"]),
            &[],
            ShowToolbar::Always,
        );
        assert_eq!(
            toolbar.item("justifyCenter"),
            Some(&ToolbarItem::Alignment(Format::JustifyCenter))
        );
    }

    #[test]
    fn test_title_derivation() {
        assert_eq!(title_for("bold"), "Bold");
        assert_eq!(title_for("justifyCenter"), "Justify Center");
        assert_eq!(title_for("unorderedList"), "Unordered List");
    }

    #[test]
    fn test_enabled_formats_follow_items() {
        let toolbar = Toolbar::build(
            &identifiers(&["bold", "link", "highlight", "undo"]),
            &[],
            ShowToolbar::Always,
        );
        assert_eq!(
            toolbar.enabled_formats(),
            vec![Format::Bold, Format::Link, Format::Highlight]
        );
    }

    #[test]
    fn test_button_class_reflects_active_state() {
        let mut toolbar = Toolbar::build(&identifiers(&["bold"]), &[], ShowToolbar::Always);
        assert_eq!(toolbar.button_class(Format::Bold), "bold button");

        let mut dom = crate::dom::Dom::new();
        let root = dom.root();
        crate::html::set_inner_html(&mut dom, root, "<b>x</b>");
        let text = dom.text_nodes_in(root)[0];
        let active = crate::inspect::compute_active_states(&dom, text, &[Format::Bold]);
        toolbar.sync(active, Default::default());
        assert_eq!(toolbar.button_class(Format::Bold), "bold button active");
    }

    #[test]
    fn test_visibility_classes() {
        let mut visibility = ToolbarVisibility::new(ShowToolbar::OnSelect);
        assert_eq!(visibility.class_names(), vec!["selection"]);
        visibility.show = true;
        assert_eq!(visibility.class_names(), vec!["selection", "show"]);

        assert_eq!(
            ToolbarVisibility::new(ShowToolbar::OnHover).class_names(),
            vec!["phantom"]
        );
        assert!(ToolbarVisibility::new(ShowToolbar::Always)
            .class_names()
            .is_empty());
    }
}
