//! Popover lifecycle.
//!
//! At most one popover is open at any time; the state is a single tagged
//! value, so "two popovers open" is unrepresentable rather than merely
//! avoided. The color and highlight popovers share one family (they differ
//! only in their palette target); the link popover carries its own small
//! machine: it opens in *creating* mode when synthesized at a collapsed caret
//! and in *editing* mode when attached to an existing anchor, and every user
//! resolution — destroy, edit, unlink, open — returns it to closed and clears
//! the anchor reference.

use crate::commands::{Surface, insert_node_at};
use crate::dom::{Dom, NodeId};

/// Base vertical offset between a link anchor and its popover.
pub const LINK_POPOVER_TOP_OFFSET: i32 = 40;

/// Horizontal nudge between a link anchor and its popover.
pub const LINK_POPOVER_LEFT_OFFSET: i32 = 5;

/// Which palette a color popover edits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorTarget {
    /// Text color.
    Color,
    /// Highlight (background) color.
    Highlight,
}

impl ColorTarget {
    /// Toolbar identifier for the target.
    pub fn identifier(self) -> &'static str {
        match self {
            Self::Color => "color",
            Self::Highlight => "highlight",
        }
    }
}

/// Link popover mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkMode {
    /// The anchor was synthesized at a collapsed caret and has no text yet.
    Creating,
    /// The popover is attached to an existing anchor.
    Editing,
}

/// The single popover slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PopoverState {
    /// Nothing open.
    #[default]
    None,
    /// A color popover is open for `target`.
    Color {
        /// Palette the popover edits.
        target: ColorTarget,
    },
    /// The link popover is open, attached to `anchor`.
    Link {
        /// The anchor element the popover edits.
        anchor: NodeId,
        /// Creation vs. editing mode.
        mode: LinkMode,
    },
}

/// User resolution delivered by the link popover.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkActionKind {
    /// Remove the anchor entirely.
    Destroy,
    /// Commit a new URL/text onto the anchor.
    Edit,
    /// Replace the anchor with its plain text.
    Unlink,
    /// Navigate to the anchor's URL in a new browsing context.
    Open,
}

/// A link popover resolution with its submitted fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkAction {
    /// What the user chose.
    pub action: LinkActionKind,
    /// Submitted URL, if any.
    pub url: Option<String>,
    /// Submitted display text, if any.
    pub text: Option<String>,
}

/// What the shell should do after a link resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkResolution {
    /// Popover closed; nothing further.
    Closed,
    /// Popover closed; the host should open `url` in a new browsing context.
    OpenUrl(String),
}

/// Screen placement for a popover.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PopoverPlacement {
    /// Offset from the surface top, in pixels.
    pub top: i32,
    /// Offset from the surface left, in pixels.
    pub left: i32,
}

/// Host-provided layout query for popover placement.
///
/// The engine is headless and has no box model; the host that renders the
/// tree answers where an element landed. The defaults position everything at
/// the origin, which keeps placement meaningful but inert in tests.
pub trait SurfaceLayout {
    /// Vertical offset of `node` within the rendered surface.
    fn offset_top(&self, _dom: &Dom, _node: NodeId) -> i32 {
        0
    }

    /// Horizontal offset of `node` within the rendered surface.
    fn offset_left(&self, _dom: &Dom, _node: NodeId) -> i32 {
        0
    }
}

/// Layout that reports every node at the origin.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullLayout;

impl SurfaceLayout for NullLayout {}

/// Prefix bare host names with `http://` when no scheme is present.
pub fn normalize_url(url: &str) -> String {
    if url.starts_with("http://") || url.starts_with("https://") {
        url.to_string()
    } else {
        format!("http://{}", url)
    }
}

/// Owns the single popover slot and the link anchor reference.
#[derive(Debug)]
pub struct PopoverLifecycle {
    state: PopoverState,
    /// Vertical placement offset; includes the toolbar height when the
    /// toolbar sits above the content.
    top_offset: i32,
}

impl Default for PopoverLifecycle {
    fn default() -> Self {
        Self::new()
    }
}

impl PopoverLifecycle {
    /// New manager with nothing open.
    pub fn new() -> Self {
        Self {
            state: PopoverState::None,
            top_offset: LINK_POPOVER_TOP_OFFSET,
        }
    }

    /// Add the toolbar height to the placement offset (toolbar above content).
    pub fn set_toolbar_height(&mut self, height: i32) {
        self.top_offset = LINK_POPOVER_TOP_OFFSET + height;
    }

    /// Current state.
    pub fn state(&self) -> PopoverState {
        self.state
    }

    /// `true` if any popover is open.
    pub fn is_open(&self) -> bool {
        self.state != PopoverState::None
    }

    /// `true` if the color popover for `target` is open.
    pub fn color_open(&self, target: ColorTarget) -> bool {
        matches!(self.state, PopoverState::Color { target: open } if open == target)
    }

    /// `true` if the link popover is open.
    pub fn link_open(&self) -> bool {
        matches!(self.state, PopoverState::Link { .. })
    }

    /// The anchor the link popover is attached to, if open.
    pub fn link_anchor(&self) -> Option<NodeId> {
        match self.state {
            PopoverState::Link { anchor, .. } => Some(anchor),
            _ => None,
        }
    }

    /// The link popover mode, if open.
    pub fn link_mode(&self) -> Option<LinkMode> {
        match self.state {
            PopoverState::Link { mode, .. } => Some(mode),
            _ => None,
        }
    }

    /// Open the color popover for `target`, force-closing anything else.
    pub fn open_color(&mut self, surface: &mut Surface, target: ColorTarget) {
        self.close_all(surface);
        self.state = PopoverState::Color { target };
    }

    /// Synthesize an anchor at the collapsed caret and open the link popover
    /// in creating mode. Returns the new anchor.
    pub fn open_link_creating(&mut self, surface: &mut Surface, placeholder_url: &str) -> Option<NodeId> {
        self.close_all(surface);

        let caret = surface.selection().copied()?;
        let anchor = surface.dom.create_element("a");
        surface.dom.set_attr(anchor, "href", placeholder_url);
        surface.dom.set_attr(anchor, "target", "_blank");
        if !insert_node_at(surface, caret.start, anchor) {
            return None;
        }
        self.state = PopoverState::Link {
            anchor,
            mode: LinkMode::Creating,
        };
        Some(anchor)
    }

    /// Attach the link popover to an existing anchor.
    pub fn attach_link(&mut self, surface: &mut Surface, anchor: NodeId, mode: LinkMode) {
        self.close_all(surface);
        self.state = PopoverState::Link { anchor, mode };
    }

    /// Close everything, applying the implicit-destroy cleanup to an
    /// abandoned link anchor. Returns `true` when the tree changed.
    pub fn close_all(&mut self, surface: &mut Surface) -> bool {
        let changed = match self.state {
            PopoverState::Link { anchor, .. } => implicit_destroy(surface, anchor),
            _ => false,
        };
        self.state = PopoverState::None;
        changed
    }

    /// Close only the color/highlight popovers, except the listed target.
    ///
    /// The link popover is left alone here; its teardown carries cleanup and
    /// is driven by [`close_all`](Self::close_all) or a resolution.
    pub fn close_color(&mut self, exclude: Option<ColorTarget>) {
        if let PopoverState::Color { target } = self.state {
            if exclude != Some(target) {
                self.state = PopoverState::None;
            }
        }
    }

    /// Apply a user resolution from the link popover.
    ///
    /// All resolutions transition back to closed and clear the anchor
    /// reference. Empty submitted text destroys the anchor; a missing URL
    /// downgrades it to plain text; `edit` commits normalized URL and text and
    /// re-homes the caret inside the anchor.
    pub fn resolve_link(&mut self, surface: &mut Surface, action: &LinkAction) -> LinkResolution {
        let PopoverState::Link { anchor, .. } = self.state else {
            return LinkResolution::Closed;
        };
        self.state = PopoverState::None;

        let text = action.text.as_deref().unwrap_or_default();
        let url = action.url.as_deref().unwrap_or_default();

        if text.is_empty() && action.action != LinkActionKind::Open {
            surface.dom.detach(anchor);
            return LinkResolution::Closed;
        }
        if url.is_empty() && action.action == LinkActionKind::Edit {
            surface.dom.replace_with_text(anchor);
            return LinkResolution::Closed;
        }

        match action.action {
            LinkActionKind::Destroy => {
                surface.dom.detach(anchor);
                LinkResolution::Closed
            }
            LinkActionKind::Edit => {
                let url = normalize_url(url);
                surface.dom.clear_children(anchor);
                let label = surface.dom.create_text(text);
                surface.dom.append_child(anchor, label);
                surface.dom.set_attr(anchor, "href", &url);
                surface.dom.set_attr(anchor, "target", "_blank");
                surface.set_selection(crate::selection::DomRange::caret(anchor, 1));
                LinkResolution::Closed
            }
            LinkActionKind::Unlink => {
                surface.dom.replace_with_text(anchor);
                LinkResolution::Closed
            }
            LinkActionKind::Open => {
                let href = surface
                    .dom
                    .attr(anchor, "href")
                    .unwrap_or_default()
                    .to_string();
                LinkResolution::OpenUrl(href)
            }
        }
    }

    /// Placement for a popover attached to `node`.
    pub fn placement(&self, dom: &Dom, node: NodeId, layout: &dyn SurfaceLayout) -> PopoverPlacement {
        PopoverPlacement {
            top: layout.offset_top(dom, node) + self.top_offset,
            left: layout.offset_left(dom, node) + LINK_POPOVER_LEFT_OFFSET,
        }
    }
}

/// Cleanup for a link popover torn down without an explicit action: a newly
/// created anchor (no text) is removed, and an anchor without a usable URL is
/// downgraded to plain text.
fn implicit_destroy(surface: &mut Surface, anchor: NodeId) -> bool {
    if surface.dom.parent(anchor).is_none() {
        return false;
    }
    let text = surface.dom.inner_text(anchor);
    if text.is_empty() {
        surface.dom.detach(anchor);
        return true;
    }
    let href = surface.dom.attr(anchor, "href").unwrap_or_default();
    if href.is_empty() {
        surface.dom.replace_with_text(anchor);
        return true;
    }
    false
}
