//! Style State Inspector.
//!
//! Pure queries that derive which formats apply at a given anchor node. The
//! inspector never caches: the active-state set is a function of the anchor
//! node and its ancestor chain at the moment of computation, recomputed
//! wholesale after every selection change or structural edit.

use crate::dom::{Dom, NodeId};
use crate::format::{Format, FormatSpec};

/// Ordered set of formats active at the current anchor.
///
/// Recomputed wholesale, never patched incrementally.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActiveStates {
    states: Vec<Format>,
}

impl ActiveStates {
    /// The empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// `true` if `format` is active.
    pub fn contains(&self, format: Format) -> bool {
        self.states.contains(&format)
    }

    /// Active formats in registry order.
    pub fn iter(&self) -> impl Iterator<Item = Format> + '_ {
        self.states.iter().copied()
    }

    /// Number of active formats.
    pub fn len(&self) -> usize {
        self.states.len()
    }

    /// `true` if nothing is active.
    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    fn push(&mut self, format: Format) {
        if !self.states.contains(&format) {
            self.states.push(format);
        }
    }
}

/// Colors found at the anchor, used to tint the color/highlight buttons.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnchorColors {
    /// Inline or `<font color>` text color on the immediate node.
    pub color: Option<String>,
    /// Inline background color on the immediate node.
    pub highlight: Option<String>,
}

/// The element inspected for a selection anchored at `anchor`.
///
/// Selections anchor at text nodes; style inspection happens on the enclosing
/// element. An element anchor is inspected directly.
pub fn inspection_target(dom: &Dom, anchor: NodeId) -> Option<NodeId> {
    if dom.is_element(anchor) {
        Some(anchor)
    } else {
        dom.parent(anchor)
    }
}

/// Compute the formats active at `anchor` out of `enabled`.
///
/// Each format is tested with two strategies combined with OR: tag ancestry
/// (bounded walk toward the editing root, which never matches) and the
/// immediate node's inline style. Alignment formats instead require the exact
/// `text-align` value from their registry entry.
pub fn compute_active_states(dom: &Dom, anchor: NodeId, enabled: &[Format]) -> ActiveStates {
    let mut active = ActiveStates::new();
    let Some(target) = inspection_target(dom, anchor) else {
        return active;
    };

    for &format in enabled {
        if is_format_active(dom, target, format.spec()) {
            active.push(format);
        }
    }
    active
}

fn is_format_active(dom: &Dom, node: NodeId, spec: &FormatSpec) -> bool {
    if let Some(expected) = spec.align_value {
        let property = spec.style_property.unwrap_or("text-align");
        return dom.style(node, property) == Some(expected);
    }

    for tag in spec.tags {
        if has_tag_in_ancestry(dom, node, tag) {
            return true;
        }
    }

    if let Some(property) = spec.style_property {
        if dom
            .style(node, property)
            .is_some_and(|value| !value.is_empty())
        {
            return true;
        }
    }

    false
}

/// Bounded ancestor walk: `true` if `node` or an ancestor has tag `tag`.
///
/// The walk stops at the editing-root sentinel (root element, editing-root id,
/// `html`/`body`) and returns `false` there; an anchor that itself carries the
/// root id therefore never matches.
pub fn has_tag_in_ancestry(dom: &Dom, node: NodeId, tag: &str) -> bool {
    let mut current = Some(node);
    while let Some(candidate) = current {
        if dom.is_element(candidate) {
            if dom.is_editing_root(candidate) {
                return false;
            }
            if dom.tag(candidate) == Some(tag) {
                return true;
            }
        }
        current = dom.parent(candidate);
    }
    false
}

/// Report the text and background colors on the immediate inspected node.
pub fn anchor_colors(dom: &Dom, anchor: NodeId) -> AnchorColors {
    let Some(target) = inspection_target(dom, anchor) else {
        return AnchorColors::default();
    };

    // <font color="..."> is how the color primitive writes text color.
    let color = dom
        .style(target, "color")
        .map(str::to_string)
        .or_else(|| dom.attr(target, "color").map(str::to_string));
    let highlight = dom.style(target, "background-color").map(str::to_string);

    AnchorColors { color, highlight }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::html::set_inner_html;

    fn dom_with(html: &str) -> Dom {
        let mut dom = Dom::new();
        let root = dom.root();
        set_inner_html(&mut dom, root, html);
        dom
    }

    fn first_text(dom: &Dom) -> NodeId {
        dom.text_nodes_in(dom.root())[0]
    }

    #[test]
    fn test_tag_ancestry_detects_nested_bold() {
        let dom = dom_with("<b><i>hi</i></b>");
        let text = first_text(&dom);
        let active = compute_active_states(&dom, text, &[Format::Bold, Format::Italic]);
        assert!(active.contains(Format::Bold));
        assert!(active.contains(Format::Italic));
    }

    #[test]
    fn test_strong_and_em_alias_tags() {
        let dom = dom_with("<strong><em>hi</em></strong>");
        let text = first_text(&dom);
        let active = compute_active_states(&dom, text, &[Format::Bold, Format::Italic]);
        assert!(active.contains(Format::Bold));
        assert!(active.contains(Format::Italic));
    }

    #[test]
    fn test_root_never_matches() {
        let dom = dom_with("plain");
        let text = first_text(&dom);
        let active = compute_active_states(&dom, text, &[Format::Bold, Format::Link]);
        assert!(active.is_empty());
    }

    #[test]
    fn test_inline_style_only_on_immediate_node() {
        // The style sits on the outer span; the inner span is the immediate
        // parent of the text and carries nothing.
        let dom = dom_with("<span style=\"text-decoration: underline\"><span>hi</span></span>");
        let text = first_text(&dom);
        let active = compute_active_states(&dom, text, &[Format::Underline]);
        assert!(!active.contains(Format::Underline));

        let dom = dom_with("<span style=\"text-decoration: underline\">hi</span>");
        let text = first_text(&dom);
        let active = compute_active_states(&dom, text, &[Format::Underline]);
        assert!(active.contains(Format::Underline));
    }

    #[test]
    fn test_alignment_requires_exact_value() {
        let dom = dom_with("<div style=\"text-align: center\">hi</div>");
        let text = first_text(&dom);
        let active = compute_active_states(
            &dom,
            text,
            &[Format::JustifyCenter, Format::JustifyLeft, Format::JustifyFull],
        );
        assert!(active.contains(Format::JustifyCenter));
        assert!(!active.contains(Format::JustifyLeft));
        assert!(!active.contains(Format::JustifyFull));
    }

    #[test]
    fn test_referential_transparency() {
        let dom = dom_with("<b>hi</b>");
        let text = first_text(&dom);
        let enabled: Vec<Format> = Format::all().collect();
        let first = compute_active_states(&dom, text, &enabled);
        let second = compute_active_states(&dom, text, &enabled);
        assert_eq!(first, second);
    }

    #[test]
    fn test_anchor_colors_from_font_tag_and_style() {
        let dom = dom_with("<font color=\"#ff4541\">hi</font>");
        let text = first_text(&dom);
        let colors = anchor_colors(&dom, text);
        assert_eq!(colors.color.as_deref(), Some("#ff4541"));
        assert_eq!(colors.highlight, None);

        let dom = dom_with("<span style=\"background-color: #f3f315\">hi</span>");
        let text = first_text(&dom);
        let colors = anchor_colors(&dom, text);
        assert_eq!(colors.highlight.as_deref(), Some("#f3f315"));
    }

    #[test]
    fn test_link_detection_through_ancestry() {
        let dom = dom_with("<a href=\"http://x.dev\"><b>hi</b></a>");
        let text = first_text(&dom);
        let active = compute_active_states(&dom, text, &[Format::Link]);
        assert!(active.contains(Format::Link));
    }
}
