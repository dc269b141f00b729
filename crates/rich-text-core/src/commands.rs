//! Format command execution.
//!
//! This module is the mutation layer of the engine. [`Surface`] bundles the
//! document tree with the live selection and focus flag — the analogue of the
//! sandboxed editable frame. [`ExecCommand`] is the native "apply formatting
//! command to the current selection" primitive, and [`CommandExecutor`] wraps
//! it with the guards the toolbar needs: empty-selection no-ops, the
//! zero-width-marker technique for collapsed carets, and a snapshot-based
//! undo/redo stack.
//!
//! Every mutating operation either changes the tree and reports `true`, or
//! leaves it untouched and reports `false`. Missing selections and unsupported
//! caret formats are normal steady-state conditions, not errors.

use crate::dom::{Dom, NodeId, is_block_tag};
use crate::format::Format;
use crate::html;
use crate::inspect::{ActiveStates, has_tag_in_ancestry};
use crate::selection::{DomRange, RangeBound, range_text, resolve_to_text};

/// Class carried by the transient caret-marker span.
pub const CARET_MARKER_CLASS: &str = "caret-marker";

/// Zero-width placeholder character held by the caret marker.
pub const ZERO_WIDTH_MARKER: char = '\u{feff}';

/// Tags stripped by `removeFormat`.
const STRIP_TAGS: &[&str] = &[
    "b", "strong", "i", "em", "u", "strike", "sub", "sup", "font",
];

/// Style properties whose presence makes a `span` subject to `removeFormat`.
const STRIP_STYLE_PROPERTIES: &[&str] = &[
    "background-color",
    "color",
    "font-weight",
    "font-style",
    "text-decoration",
];

/// The editable surface: document tree, live selection, and focus flag.
///
/// The tree is the document model; the selection object is the shared
/// resource every handler reads and only one handler at a time writes.
#[derive(Debug)]
pub struct Surface {
    /// The live document tree.
    pub dom: Dom,
    selection: Option<DomRange>,
    focused: bool,
}

impl Surface {
    /// An empty surface.
    pub fn new() -> Self {
        Self {
            dom: Dom::new(),
            selection: None,
            focused: false,
        }
    }

    /// The live selection, if any.
    pub fn selection(&self) -> Option<&DomRange> {
        self.selection.as_ref()
    }

    /// Replace the live selection.
    pub fn set_selection(&mut self, range: DomRange) {
        self.selection = Some(range);
    }

    /// Collapse the selection to a caret.
    pub fn collapse_to(&mut self, node: NodeId, offset: usize) {
        self.selection = Some(DomRange::caret(node, offset));
    }

    /// Drop the live selection.
    pub fn clear_selection(&mut self) {
        self.selection = None;
    }

    /// Serialized text of the live selection.
    pub fn selected_text(&self) -> String {
        self.selection
            .as_ref()
            .map(|range| range_text(&self.dom, range))
            .unwrap_or_default()
    }

    /// Whether the surface currently holds focus.
    pub fn focused(&self) -> bool {
        self.focused
    }

    /// Record a focus transition.
    pub fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
    }

    /// Serialized content of the surface.
    pub fn inner_html(&self) -> String {
        html::inner_html(&self.dom, self.dom.root())
    }

    /// Replace the surface content; the selection is dropped since its nodes
    /// no longer exist.
    pub fn set_inner_html(&mut self, content: &str) {
        let root = self.dom.root();
        html::set_inner_html(&mut self.dom, root, content);
        self.selection = None;
    }

    /// Plain-text content of the surface.
    pub fn inner_text(&self) -> String {
        self.dom.inner_text(self.dom.root())
    }

    /// `true` when the surface has no content at all.
    pub fn is_empty(&self) -> bool {
        self.dom.children(self.dom.root()).is_empty()
    }
}

impl Default for Surface {
    fn default() -> Self {
        Self::new()
    }
}

/// The native formatting primitive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExecCommand {
    /// Toggle bold on the selection.
    Bold,
    /// Toggle italic on the selection.
    Italic,
    /// Toggle underline on the selection.
    Underline,
    /// Toggle strikethrough on the selection.
    Strikethrough,
    /// Toggle subscript on the selection.
    Subscript,
    /// Toggle superscript on the selection.
    Superscript,
    /// Set the text color of the selection.
    ForeColor(String),
    /// Set the highlight (background) color of the selection.
    HiliteColor(String),
    /// Wrap the selection in a hyperlink.
    CreateLink(String),
    /// Replace the enclosing hyperlink with its plain text.
    Unlink,
    /// Strip inline formatting from the selection.
    RemoveFormat,
    /// Wrap the current line(s) in an ordered list, or unwrap them.
    InsertOrderedList,
    /// Wrap the current line(s) in an unordered list, or unwrap them.
    InsertUnorderedList,
    /// Align the current block left.
    JustifyLeft,
    /// Center the current block.
    JustifyCenter,
    /// Align the current block right.
    JustifyRight,
    /// Justify the current block.
    JustifyFull,
    /// Insert an HTML fragment at the caret.
    InsertHtml(String),
    /// Undo the last mutation.
    Undo,
    /// Redo the last undone mutation.
    Redo,
}

impl ExecCommand {
    /// Map a native command name (the allow-list escape hatch) to a command.
    pub fn from_name(name: &str, value: Option<&str>) -> Option<Self> {
        let command = match name {
            "bold" => Self::Bold,
            "italic" => Self::Italic,
            "underline" => Self::Underline,
            "strikethrough" | "strikeThrough" => Self::Strikethrough,
            "subscript" => Self::Subscript,
            "superscript" => Self::Superscript,
            "foreColor" => Self::ForeColor(value?.to_string()),
            "hiliteColor" | "backColor" => Self::HiliteColor(value?.to_string()),
            "createLink" => Self::CreateLink(value?.to_string()),
            "unlink" => Self::Unlink,
            "removeFormat" => Self::RemoveFormat,
            "insertOrderedList" => Self::InsertOrderedList,
            "insertUnorderedList" => Self::InsertUnorderedList,
            "justifyLeft" => Self::JustifyLeft,
            "justifyCenter" => Self::JustifyCenter,
            "justifyRight" => Self::JustifyRight,
            "justifyFull" => Self::JustifyFull,
            "insertHTML" => Self::InsertHtml(value?.to_string()),
            "undo" => Self::Undo,
            "redo" => Self::Redo,
            _ => return None,
        };
        Some(command)
    }

    /// The command a [`Format`] maps to on a range selection.
    pub fn for_format(format: Format, value: Option<&str>) -> Option<Self> {
        let command = match format {
            Format::Bold => Self::Bold,
            Format::Italic => Self::Italic,
            Format::Underline => Self::Underline,
            Format::Strikethrough => Self::Strikethrough,
            Format::Subscript => Self::Subscript,
            Format::Superscript => Self::Superscript,
            Format::OrderedList => Self::InsertOrderedList,
            Format::UnorderedList => Self::InsertUnorderedList,
            Format::JustifyLeft => Self::JustifyLeft,
            Format::JustifyCenter => Self::JustifyCenter,
            Format::JustifyRight => Self::JustifyRight,
            Format::JustifyFull => Self::JustifyFull,
            Format::Link => Self::CreateLink(value?.to_string()),
            Format::Color => Self::ForeColor(value?.to_string()),
            Format::Highlight => Self::HiliteColor(value?.to_string()),
        };
        Some(command)
    }
}

/// Wraps the native primitive with selection guards, the collapsed-caret
/// marker technique, and snapshot undo/redo.
#[derive(Debug, Default)]
pub struct CommandExecutor {
    undo_stack: Vec<String>,
    redo_stack: Vec<String>,
}

impl CommandExecutor {
    /// New executor with empty history.
    pub fn new() -> Self {
        Self::default()
    }

    /// `true` if an undo snapshot is available.
    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    /// `true` if a redo snapshot is available.
    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// Execute a native command. Returns `true` when the surface changed.
    pub fn exec_command(&mut self, surface: &mut Surface, command: ExecCommand) -> bool {
        match command {
            ExecCommand::Undo => return self.undo(surface),
            ExecCommand::Redo => return self.redo(surface),
            _ => {}
        }

        let before = surface.inner_html();
        let changed = run_command(surface, command);
        if changed && surface.inner_html() != before {
            self.undo_stack.push(before);
            self.redo_stack.clear();
            true
        } else {
            changed
        }
    }

    fn undo(&mut self, surface: &mut Surface) -> bool {
        let Some(previous) = self.undo_stack.pop() else {
            return false;
        };
        self.redo_stack.push(surface.inner_html());
        surface.set_inner_html(&previous);
        true
    }

    fn redo(&mut self, surface: &mut Surface) -> bool {
        let Some(next) = self.redo_stack.pop() else {
            return false;
        };
        self.undo_stack.push(surface.inner_html());
        surface.set_inner_html(&next);
        true
    }

    /// Apply a format to the current selection: ranges go through the native
    /// primitive, collapsed carets use the marker technique for the four
    /// supported toggles, and everything else resolves silently.
    ///
    /// `active` is the current active-state set at the caret; the caller
    /// recomputes it (and emits its style-change notification) afterwards.
    pub fn apply_format(
        &mut self,
        surface: &mut Surface,
        format: Format,
        active: &ActiveStates,
        value: Option<&str>,
    ) -> bool {
        let Some(selection) = surface.selection().copied() else {
            return false;
        };

        if selection.is_caret() {
            let Some(caret_tag) = format.spec().caret_tag else {
                return false;
            };
            if !active.contains(format) {
                insert_caret_marker(surface, caret_tag)
            } else if let Some(marker) = find_caret_marker(&surface.dom) {
                remove_caret_wrapper(surface, marker)
            } else {
                ExecCommand::for_format(format, value)
                    .map(|command| self.exec_command(surface, command))
                    .unwrap_or(false)
            }
        } else {
            if surface.selected_text().is_empty() {
                return false;
            }
            ExecCommand::for_format(format, value)
                .map(|command| self.exec_command(surface, command))
                .unwrap_or(false)
        }
    }
}

// -- collapsed-caret marker technique ---------------------------------------

/// Find the transient caret-marker span, if present.
pub fn find_caret_marker(dom: &Dom) -> Option<NodeId> {
    dom.find_by_class(dom.root(), CARET_MARKER_CLASS)
}

/// Synthesize `<tag><span class="caret-marker">\u{FEFF}</span></tag>` at the
/// caret and move the caret inside the placeholder. One synchronous block: the
/// caret is never observable outside the marker.
fn insert_caret_marker(surface: &mut Surface, tag: &str) -> bool {
    let Some(selection) = surface.selection().copied() else {
        return false;
    };

    let wrapper = surface.dom.create_element(tag);
    let marker = surface.dom.create_element("span");
    surface
        .dom
        .set_attr(marker, "class", CARET_MARKER_CLASS);
    let placeholder = surface.dom.create_text(&ZERO_WIDTH_MARKER.to_string());
    surface.dom.append_child(marker, placeholder);
    surface.dom.append_child(wrapper, marker);

    if !insert_node_at(surface, selection.start, wrapper) {
        return false;
    }
    surface.collapse_to(placeholder, 1);
    true
}

/// Deactivation at a caret: remove the marker's wrapper element entirely,
/// collapsing back to plain text at the wrapper's old position.
fn remove_caret_wrapper(surface: &mut Surface, marker: NodeId) -> bool {
    let Some(wrapper) = surface.dom.parent(marker) else {
        return false;
    };
    let Some(parent) = surface.dom.parent(wrapper) else {
        return false;
    };
    let index = surface.dom.child_index(wrapper).unwrap_or(0);
    surface.dom.detach(wrapper);
    surface.set_selection(DomRange::caret(parent, index));
    true
}

/// Key-up cleanup: once real text was typed inside the placeholder, strip the
/// zero-width markers, drop the marker span, and re-home the caret right after
/// the typed text. A marker still holding only the placeholder is left alone.
pub fn clear_caret_marker(surface: &mut Surface) -> bool {
    let Some(marker) = find_caret_marker(&surface.dom) else {
        return false;
    };
    let content: String = surface
        .dom
        .inner_text(marker)
        .chars()
        .filter(|&ch| ch != ZERO_WIDTH_MARKER)
        .collect();
    if content.is_empty() {
        return false;
    }

    let text = surface.dom.create_text(&content);
    surface.dom.replace_with(marker, text);
    let caret_offset = surface.dom.text_len(text);
    surface.collapse_to(text, caret_offset);
    true
}

// -- native primitive -------------------------------------------------------

fn run_command(surface: &mut Surface, command: ExecCommand) -> bool {
    match command {
        ExecCommand::Bold => toggle_inline(surface, &["b", "strong"], "b"),
        ExecCommand::Italic => toggle_inline(surface, &["i", "em"], "i"),
        ExecCommand::Underline => toggle_inline(surface, &["u"], "u"),
        ExecCommand::Strikethrough => toggle_inline(surface, &["strike"], "strike"),
        ExecCommand::Subscript => toggle_inline(surface, &["sub"], "sub"),
        ExecCommand::Superscript => toggle_inline(surface, &["sup"], "sup"),
        ExecCommand::ForeColor(color) => wrap_selection(surface, move |dom| {
            let font = dom.create_element("font");
            dom.set_attr(font, "color", &color);
            font
        }),
        ExecCommand::HiliteColor(color) => wrap_selection(surface, move |dom| {
            let span = dom.create_element("span");
            dom.set_style(span, "background-color", &color);
            span
        }),
        ExecCommand::CreateLink(url) => create_link(surface, &url),
        ExecCommand::Unlink => unlink(surface),
        ExecCommand::RemoveFormat => remove_format(surface),
        ExecCommand::InsertOrderedList => toggle_list(surface, "ol"),
        ExecCommand::InsertUnorderedList => toggle_list(surface, "ul"),
        ExecCommand::JustifyLeft => apply_alignment(surface, "left"),
        ExecCommand::JustifyCenter => apply_alignment(surface, "center"),
        ExecCommand::JustifyRight => apply_alignment(surface, "right"),
        ExecCommand::JustifyFull => apply_alignment(surface, "justify"),
        ExecCommand::InsertHtml(fragment) => insert_html(surface, &fragment),
        ExecCommand::Undo | ExecCommand::Redo => false,
    }
}

/// Split boundary text nodes so the selection covers whole text nodes, and
/// return the covered nodes in document order. Empty on a caret or when the
/// bounds cannot be resolved.
fn covered_text_nodes(surface: &mut Surface) -> Vec<NodeId> {
    let Some(range) = surface.selection().copied() else {
        return Vec::new();
    };
    if range.is_caret() {
        return Vec::new();
    }
    let Some(start) = resolve_to_text(&surface.dom, range.start, true) else {
        return Vec::new();
    };
    let Some(end) = resolve_to_text(&surface.dom, range.end, false) else {
        return Vec::new();
    };

    let (first, last) = if start.node == end.node {
        // Trim the tail first so the head split offsets stay valid.
        surface.dom.split_text(end.node, end.offset);
        let covered = if start.offset > 0 {
            surface.dom.split_text(start.node, start.offset)
        } else {
            start.node
        };
        (covered, covered)
    } else {
        let last = if end.offset == 0 {
            previous_text_node(&surface.dom, end.node).unwrap_or(end.node)
        } else {
            surface.dom.split_text(end.node, end.offset);
            end.node
        };
        let first = if start.offset > 0 {
            surface.dom.split_text(start.node, start.offset)
        } else {
            start.node
        };
        (first, last)
    };

    let texts = surface.dom.text_nodes_in(surface.dom.root());
    let Some(first_index) = texts.iter().position(|&n| n == first) else {
        return Vec::new();
    };
    let Some(last_index) = texts.iter().position(|&n| n == last) else {
        return Vec::new();
    };
    if first_index > last_index {
        return Vec::new();
    }

    let covered: Vec<NodeId> = texts[first_index..=last_index]
        .iter()
        .copied()
        .filter(|&n| surface.dom.text_len(n) > 0)
        .collect();

    // Re-anchor the selection on the (possibly re-split) covered span.
    if let (Some(&first), Some(&last)) = (covered.first(), covered.last()) {
        surface.set_selection(DomRange::new(
            RangeBound {
                node: first,
                offset: 0,
            },
            RangeBound {
                node: last,
                offset: surface.dom.text_len(last),
            },
        ));
    }
    covered
}

fn previous_text_node(dom: &Dom, node: NodeId) -> Option<NodeId> {
    let texts = dom.text_nodes_in(dom.root());
    let index = texts.iter().position(|&n| n == node)?;
    index.checked_sub(1).map(|i| texts[i])
}

/// Split `ancestor` so the returned element (at `ancestor`'s tree position)
/// contains exactly the chain down to `node`. Siblings before and after the
/// chain end up in shallow clones on either side.
fn isolate_in(dom: &mut Dom, ancestor: NodeId, node: NodeId) -> NodeId {
    let mut current = node;
    loop {
        let Some(parent) = dom.parent(current) else {
            return current;
        };
        let index = dom.child_index(current).unwrap_or(0);
        let child_count = dom.children(parent).len();

        if index + 1 < child_count {
            let tail = dom.shallow_clone(parent);
            let following: Vec<NodeId> = dom.children(parent)[index + 1..].to_vec();
            dom.insert_after(parent, tail);
            for sibling in following {
                dom.append_child(tail, sibling);
            }
        }

        let container = if index > 0 {
            let holder = dom.shallow_clone(parent);
            dom.insert_after(parent, holder);
            dom.append_child(holder, current);
            holder
        } else {
            parent
        };

        if parent == ancestor {
            return container;
        }
        current = container;
    }
}

/// Group covered nodes into contiguous sibling runs and wrap each run.
fn wrap_nodes<F>(dom: &mut Dom, nodes: &[NodeId], mut make_wrapper: F)
where
    F: FnMut(&mut Dom) -> NodeId,
{
    let mut index = 0;
    while index < nodes.len() {
        let Some(parent) = dom.parent(nodes[index]) else {
            index += 1;
            continue;
        };
        let mut run = vec![nodes[index]];
        while index + 1 < nodes.len()
            && dom.parent(nodes[index + 1]) == Some(parent)
            && dom.child_index(nodes[index + 1])
                == dom.child_index(*run.last().expect("non-empty run")).map(|i| i + 1)
        {
            index += 1;
            run.push(nodes[index]);
        }

        let position = dom.child_index(run[0]).unwrap_or(0);
        let wrapper = make_wrapper(dom);
        dom.insert_child_at(parent, position, wrapper);
        for node in run {
            dom.append_child(wrapper, node);
        }
        index += 1;
    }
}

fn toggle_inline(surface: &mut Surface, tags: &[&str], wrap_tag: &str) -> bool {
    let covered = covered_text_nodes(surface);
    if covered.is_empty() {
        return false;
    }

    let all_active = covered
        .iter()
        .all(|&node| tags.iter().any(|tag| has_tag_in_ancestry(&surface.dom, node, tag)));

    if all_active {
        for &node in &covered {
            let Some(ancestor) = surface
                .dom
                .closest(node, |dom, n| tags.contains(&dom.tag(n).unwrap_or_default()))
            else {
                continue;
            };
            let isolated = isolate_in(&mut surface.dom, ancestor, node);
            surface.dom.unwrap_element(isolated);
        }
    } else {
        let missing: Vec<NodeId> = covered
            .iter()
            .copied()
            .filter(|&node| !tags.iter().any(|tag| has_tag_in_ancestry(&surface.dom, node, tag)))
            .collect();
        let tag = wrap_tag.to_string();
        wrap_nodes(&mut surface.dom, &missing, |dom| dom.create_element(&tag));
    }

    reselect(surface, &covered);
    true
}

fn wrap_selection<F>(surface: &mut Surface, mut make_wrapper: F) -> bool
where
    F: FnMut(&mut Dom) -> NodeId,
{
    let covered = covered_text_nodes(surface);
    if covered.is_empty() {
        return false;
    }
    wrap_nodes(&mut surface.dom, &covered, &mut make_wrapper);
    reselect(surface, &covered);
    true
}

fn create_link(surface: &mut Surface, url: &str) -> bool {
    let covered = covered_text_nodes(surface);
    if covered.is_empty() {
        return false;
    }

    // Inside one existing anchor: retarget it instead of nesting.
    let anchors: Vec<Option<NodeId>> = covered
        .iter()
        .map(|&node| surface.dom.closest(node, |dom, n| dom.tag(n) == Some("a")))
        .collect();
    if let Some(Some(anchor)) = anchors.first() {
        if anchors.iter().all(|a| a.as_ref() == Some(anchor)) {
            surface.dom.set_attr(*anchor, "href", url);
            reselect(surface, &covered);
            return true;
        }
    }

    let url = url.to_string();
    wrap_nodes(&mut surface.dom, &covered, |dom| {
        let anchor = dom.create_element("a");
        dom.set_attr(anchor, "href", &url);
        dom.set_attr(anchor, "target", "_blank");
        anchor
    });
    reselect(surface, &covered);
    true
}

fn unlink(surface: &mut Surface) -> bool {
    let Some(range) = surface.selection().copied() else {
        return false;
    };
    let anchor_node = range.start.node;
    let Some(anchor) = surface
        .dom
        .closest(anchor_node, |dom, n| dom.tag(n) == Some("a"))
    else {
        return false;
    };
    let replacement = surface.dom.replace_with_text(anchor);
    if let Some(text) = replacement {
        let end = surface.dom.text_len(text);
        surface.set_selection(DomRange::new(
            RangeBound {
                node: text,
                offset: 0,
            },
            RangeBound {
                node: text,
                offset: end,
            },
        ));
    }
    true
}

fn remove_format(surface: &mut Surface) -> bool {
    let covered = covered_text_nodes(surface);
    if covered.is_empty() {
        return false;
    }

    for &node in &covered {
        loop {
            let Some(ancestor) = surface.dom.closest(node, |dom, n| {
                let tag = dom.tag(n).unwrap_or_default();
                STRIP_TAGS.contains(&tag)
                    || (tag == "span"
                        && STRIP_STYLE_PROPERTIES
                            .iter()
                            .any(|property| dom.style(n, property).is_some()))
            }) else {
                break;
            };
            let isolated = isolate_in(&mut surface.dom, ancestor, node);
            surface.dom.unwrap_element(isolated);
        }
    }

    reselect(surface, &covered);
    true
}

fn reselect(surface: &mut Surface, covered: &[NodeId]) {
    let attached: Vec<NodeId> = covered
        .iter()
        .copied()
        .filter(|&n| surface.dom.parent(n).is_some())
        .collect();
    if let (Some(&first), Some(&last)) = (attached.first(), attached.last()) {
        let end = surface.dom.text_len(last);
        surface.set_selection(DomRange::new(
            RangeBound {
                node: first,
                offset: 0,
            },
            RangeBound {
                node: last,
                offset: end,
            },
        ));
    }
}

// -- block commands ---------------------------------------------------------

/// Top-level child of the editing root containing `node`.
fn top_level_ancestor(dom: &Dom, node: NodeId) -> Option<NodeId> {
    let root = dom.root();
    if node == root {
        return None;
    }
    let mut current = node;
    while let Some(parent) = dom.parent(current) {
        if parent == root {
            return Some(current);
        }
        current = parent;
    }
    None
}

/// The run of root children forming the line(s) around the selection,
/// expanded outward to the nearest `<br>` boundaries (exclusive).
fn line_run(dom: &Dom, range: &DomRange) -> Option<(usize, usize)> {
    let start_top = top_level_ancestor(dom, range.start.node)?;
    let end_top = top_level_ancestor(dom, range.end.node)?;
    let children = dom.children(dom.root());
    let mut first = children.iter().position(|&c| c == start_top)?;
    let mut last = children.iter().position(|&c| c == end_top)?;

    while first > 0 && dom.tag(children[first - 1]) != Some("br") {
        first -= 1;
    }
    while last + 1 < children.len() && dom.tag(children[last + 1]) != Some("br") {
        last += 1;
    }
    Some((first, last))
}

fn toggle_list(surface: &mut Surface, list_tag: &str) -> bool {
    let Some(range) = surface.selection().copied() else {
        return false;
    };

    // Already inside a list item: unwrap the whole list back to br-separated
    // lines (same list kind) or convert the list container (other kind).
    if let Some(item) = surface
        .dom
        .closest(range.start.node, |dom, n| dom.tag(n) == Some("li"))
    {
        let Some(list) = surface.dom.parent(item) else {
            return false;
        };
        if surface.dom.tag(list) == Some(list_tag) {
            unwrap_list(&mut surface.dom, list);
            surface.clear_selection();
        } else {
            let replacement = surface.dom.create_element(list_tag);
            let items: Vec<NodeId> = surface.dom.children(list).to_vec();
            surface.dom.replace_with(list, replacement);
            for item in items {
                surface.dom.append_child(replacement, item);
            }
        }
        return true;
    }

    let Some((first, last)) = line_run(&surface.dom, &range) else {
        return false;
    };
    let children = surface.dom.children(surface.dom.root()).to_vec();
    let run: Vec<NodeId> = children[first..=last].to_vec();

    let list = surface.dom.create_element(list_tag);
    let root = surface.dom.root();
    surface.dom.insert_child_at(root, first, list);

    // One item per br-separated group; the separators themselves are dropped.
    let mut item = surface.dom.create_element("li");
    surface.dom.append_child(list, item);
    let mut item_used = false;
    for node in run {
        if surface.dom.tag(node) == Some("br") {
            if item_used {
                item = surface.dom.create_element("li");
                surface.dom.append_child(list, item);
                item_used = false;
            }
            surface.dom.detach(node);
        } else {
            surface.dom.append_child(item, node);
            item_used = true;
        }
    }
    true
}

fn unwrap_list(dom: &mut Dom, list: NodeId) {
    let Some(parent) = dom.parent(list) else {
        return;
    };
    let mut position = dom.child_index(list).unwrap_or(0);
    let items: Vec<NodeId> = dom.children(list).to_vec();
    dom.detach(list);

    for (item_index, item) in items.iter().enumerate() {
        if item_index > 0 {
            let br = dom.create_element("br");
            dom.insert_child_at(parent, position, br);
            position += 1;
        }
        let contents: Vec<NodeId> = dom.children(*item).to_vec();
        for node in contents {
            dom.insert_child_at(parent, position, node);
            position += 1;
        }
    }
}

fn apply_alignment(surface: &mut Surface, value: &str) -> bool {
    let Some(range) = surface.selection().copied() else {
        return false;
    };

    if let Some(block) = surface
        .dom
        .closest(range.start.node, |dom, n| {
            dom.tag(n).map(is_block_tag).unwrap_or(false)
        })
    {
        surface.dom.set_style(block, "text-align", value);
        return true;
    }

    // Top-level inline content: wrap the line in an aligned div.
    let Some((first, last)) = line_run(&surface.dom, &range) else {
        return false;
    };
    let children = surface.dom.children(surface.dom.root()).to_vec();
    let run: Vec<NodeId> = children[first..=last].to_vec();
    let wrapper = surface.dom.create_element("div");
    surface.dom.set_style(wrapper, "text-align", value);
    let root = surface.dom.root();
    surface.dom.insert_child_at(root, first, wrapper);
    for node in run {
        surface.dom.append_child(wrapper, node);
    }
    true
}

// -- caret editing primitives -----------------------------------------------

/// Insert a detached node at a range bound.
pub(crate) fn insert_node_at(surface: &mut Surface, bound: RangeBound, node: NodeId) -> bool {
    if surface.dom.is_text(bound.node) {
        let len = surface.dom.text_len(bound.node);
        if bound.offset == 0 {
            surface.dom.insert_before(bound.node, node);
        } else if bound.offset >= len {
            surface.dom.insert_after(bound.node, node);
        } else {
            let tail = surface.dom.split_text(bound.node, bound.offset);
            surface.dom.insert_before(tail, node);
        }
        true
    } else if surface.dom.is_element(bound.node) {
        surface.dom.insert_child_at(bound.node, bound.offset, node);
        true
    } else {
        false
    }
}

fn insert_html(surface: &mut Surface, fragment: &str) -> bool {
    let Some(range) = surface.selection().copied() else {
        return false;
    };
    if !range.is_caret() {
        delete_selection(surface);
    }
    let Some(range) = surface.selection().copied() else {
        return false;
    };

    let nodes = html::parse_fragment(&mut surface.dom, fragment);
    let mut changed = false;
    let mut position = range.start;
    for node in nodes {
        if insert_node_at(surface, position, node) {
            changed = true;
            // Subsequent siblings land right after the one just placed.
            if let Some(parent) = surface.dom.parent(node) {
                let index = surface.dom.child_index(node).map(|i| i + 1).unwrap_or(0);
                position = RangeBound {
                    node: parent,
                    offset: index,
                };
            }
        }
    }
    if changed {
        surface.set_selection(DomRange::new(position, position));
    }
    changed
}

/// Insert plain text at the caret, replacing the selection if one exists.
pub fn insert_text(surface: &mut Surface, text: &str) -> bool {
    if text.is_empty() {
        return false;
    }
    if surface.selection().is_none() {
        // Unfocused typing lands at the end of the document.
        let root = surface.dom.root();
        let node = surface.dom.create_text(text);
        surface.dom.append_child(root, node);
        let end = surface.dom.text_len(node);
        surface.collapse_to(node, end);
        return true;
    }

    if let Some(range) = surface.selection().copied() {
        if !range.is_caret() {
            delete_selection(surface);
        }
    }
    let Some(range) = surface.selection().copied() else {
        return false;
    };
    let bound = range.start;

    if surface.dom.is_text(bound.node) {
        let existing = surface.dom.text(bound.node).unwrap_or_default();
        let chars: Vec<char> = existing.chars().collect();
        let offset = bound.offset.min(chars.len());
        let mut updated: String = chars[..offset].iter().collect();
        updated.push_str(text);
        updated.extend(&chars[offset..]);
        surface.dom.set_text(bound.node, &updated);
        surface.collapse_to(bound.node, offset + text.chars().count());
    } else {
        let node = surface.dom.create_text(text);
        if !insert_node_at(surface, bound, node) {
            return false;
        }
        let end = surface.dom.text_len(node);
        surface.collapse_to(node, end);
    }
    true
}

/// Delete the selected content, collapsing the caret at the deletion site.
pub fn delete_selection(surface: &mut Surface) -> bool {
    let covered = covered_text_nodes(surface);
    if covered.is_empty() {
        return false;
    }
    let first = covered[0];
    let caret_parent = surface.dom.parent(first);
    let caret_index = surface.dom.child_index(first).unwrap_or(0);
    for node in covered {
        surface.dom.detach(node);
    }
    match caret_parent {
        Some(parent) => surface.set_selection(DomRange::caret(parent, caret_index)),
        None => surface.clear_selection(),
    }
    true
}

/// Backspace: delete the selection, or the character before the caret.
pub fn delete_before_caret(surface: &mut Surface) -> bool {
    let Some(range) = surface.selection().copied() else {
        return false;
    };
    if !range.is_caret() {
        return delete_selection(surface);
    }

    let bound = range.start;
    if surface.dom.is_text(bound.node) && bound.offset > 0 {
        let text = surface.dom.text(bound.node).unwrap_or_default();
        let chars: Vec<char> = text.chars().collect();
        let offset = bound.offset.min(chars.len());
        let updated: String = chars[..offset - 1]
            .iter()
            .chain(&chars[offset..])
            .collect();
        surface.dom.set_text(bound.node, &updated);
        surface.collapse_to(bound.node, offset - 1);
        return true;
    }

    // Caret at a node boundary: eat the last character of the previous text
    // node in document order.
    let target = if surface.dom.is_text(bound.node) {
        previous_text_node(&surface.dom, bound.node)
    } else {
        resolve_to_text(&surface.dom, bound, false).map(|b| b.node)
    };
    let Some(target) = target else {
        return false;
    };
    let len = surface.dom.text_len(target);
    if len == 0 {
        return false;
    }
    let text = surface.dom.text(target).unwrap_or_default();
    let updated: String = text.chars().take(len - 1).collect();
    surface.dom.set_text(target, &updated);
    surface.collapse_to(target, len - 1);
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    fn surface_with(html: &str) -> Surface {
        let mut surface = Surface::new();
        surface.set_inner_html(html);
        surface
    }

    fn select_all_of_first_text(surface: &mut Surface) -> NodeId {
        let text = surface.dom.text_nodes_in(surface.dom.root())[0];
        let len = surface.dom.text_len(text);
        surface.set_selection(DomRange::new(
            RangeBound {
                node: text,
                offset: 0,
            },
            RangeBound {
                node: text,
                offset: len,
            },
        ));
        text
    }

    #[test]
    fn test_bold_wraps_selection() {
        let mut surface = surface_with("Hello");
        select_all_of_first_text(&mut surface);
        let mut executor = CommandExecutor::new();
        assert!(executor.exec_command(&mut surface, ExecCommand::Bold));
        assert_eq!(surface.inner_html(), "<b>Hello</b>");
    }

    #[test]
    fn test_bold_partial_selection_splits_text() {
        let mut surface = surface_with("Hello world");
        let text = surface.dom.text_nodes_in(surface.dom.root())[0];
        surface.set_selection(DomRange::new(
            RangeBound {
                node: text,
                offset: 0,
            },
            RangeBound {
                node: text,
                offset: 5,
            },
        ));
        let mut executor = CommandExecutor::new();
        executor.exec_command(&mut surface, ExecCommand::Bold);
        assert_eq!(surface.inner_html(), "<b>Hello</b> world");
    }

    #[test]
    fn test_bold_toggles_off() {
        let mut surface = surface_with("<b>Hello</b>");
        select_all_of_first_text(&mut surface);
        let mut executor = CommandExecutor::new();
        executor.exec_command(&mut surface, ExecCommand::Bold);
        assert_eq!(surface.inner_html(), "Hello");
    }

    #[test]
    fn test_bold_toggle_off_keeps_sibling_formatting() {
        let mut surface = surface_with("<b>one two</b>");
        let text = surface.dom.text_nodes_in(surface.dom.root())[0];
        surface.set_selection(DomRange::new(
            RangeBound {
                node: text,
                offset: 0,
            },
            RangeBound {
                node: text,
                offset: 3,
            },
        ));
        let mut executor = CommandExecutor::new();
        executor.exec_command(&mut surface, ExecCommand::Bold);
        assert_eq!(surface.inner_html(), "one<b> two</b>");
    }

    #[test]
    fn test_fore_color_wraps_in_font() {
        let mut surface = surface_with("Hello");
        select_all_of_first_text(&mut surface);
        let mut executor = CommandExecutor::new();
        executor.exec_command(&mut surface, ExecCommand::ForeColor("#ff4541".to_string()));
        assert_eq!(
            surface.inner_html(),
            "<font color=\"#ff4541\">Hello</font>"
        );
    }

    #[test]
    fn test_hilite_color_wraps_in_span_style() {
        let mut surface = surface_with("Hello");
        select_all_of_first_text(&mut surface);
        let mut executor = CommandExecutor::new();
        executor.exec_command(&mut surface, ExecCommand::HiliteColor("#f3f315".to_string()));
        assert_eq!(
            surface.inner_html(),
            "<span style=\"background-color: #f3f315\">Hello</span>"
        );
    }

    #[test]
    fn test_create_and_unlink() {
        let mut surface = surface_with("click here");
        select_all_of_first_text(&mut surface);
        let mut executor = CommandExecutor::new();
        executor.exec_command(
            &mut surface,
            ExecCommand::CreateLink("http://example.com".to_string()),
        );
        assert_eq!(
            surface.inner_html(),
            "<a href=\"http://example.com\" target=\"_blank\">click here</a>"
        );

        executor.exec_command(&mut surface, ExecCommand::Unlink);
        assert_eq!(surface.inner_html(), "click here");
    }

    #[test]
    fn test_create_link_retargets_existing_anchor() {
        let mut surface = surface_with("<a href=\"http://old.example\" target=\"_blank\">x</a>");
        select_all_of_first_text(&mut surface);
        let mut executor = CommandExecutor::new();
        executor.exec_command(
            &mut surface,
            ExecCommand::CreateLink("http://new.example".to_string()),
        );
        assert_eq!(
            surface.inner_html(),
            "<a href=\"http://new.example\" target=\"_blank\">x</a>"
        );
    }

    #[test]
    fn test_remove_format_strips_nested_wrappers() {
        let mut surface = surface_with("<b><i>Hello</i></b>");
        select_all_of_first_text(&mut surface);
        let mut executor = CommandExecutor::new();
        executor.exec_command(&mut surface, ExecCommand::RemoveFormat);
        assert_eq!(surface.inner_html(), "Hello");
    }

    #[test]
    fn test_ordered_list_wraps_line() {
        let mut surface = surface_with("first item");
        select_all_of_first_text(&mut surface);
        let mut executor = CommandExecutor::new();
        executor.exec_command(&mut surface, ExecCommand::InsertOrderedList);
        assert_eq!(surface.inner_html(), "<ol><li>first item</li></ol>");
    }

    #[test]
    fn test_list_toggle_back_to_lines() {
        let mut surface = surface_with("<ul><li>a</li><li>b</li></ul>");
        select_all_of_first_text(&mut surface);
        let mut executor = CommandExecutor::new();
        executor.exec_command(&mut surface, ExecCommand::InsertUnorderedList);
        assert_eq!(surface.inner_html(), "a<br>b");
    }

    #[test]
    fn test_list_conversion_between_kinds() {
        let mut surface = surface_with("<ul><li>a</li></ul>");
        select_all_of_first_text(&mut surface);
        let mut executor = CommandExecutor::new();
        executor.exec_command(&mut surface, ExecCommand::InsertOrderedList);
        assert_eq!(surface.inner_html(), "<ol><li>a</li></ol>");
    }

    #[test]
    fn test_multi_line_list_items() {
        let mut surface = surface_with("a<br>b");
        let texts = surface.dom.text_nodes_in(surface.dom.root());
        surface.set_selection(DomRange::new(
            RangeBound {
                node: texts[0],
                offset: 0,
            },
            RangeBound {
                node: texts[1],
                offset: 1,
            },
        ));
        let mut executor = CommandExecutor::new();
        executor.exec_command(&mut surface, ExecCommand::InsertOrderedList);
        assert_eq!(surface.inner_html(), "<ol><li>a</li><li>b</li></ol>");
    }

    #[test]
    fn test_alignment_sets_block_style() {
        let mut surface = surface_with("<p>Hello</p>");
        select_all_of_first_text(&mut surface);
        let mut executor = CommandExecutor::new();
        executor.exec_command(&mut surface, ExecCommand::JustifyCenter);
        assert_eq!(
            surface.inner_html(),
            "<p style=\"text-align: center\">Hello</p>"
        );
    }

    #[test]
    fn test_alignment_idempotent() {
        let mut surface = surface_with("<p>Hello</p>");
        select_all_of_first_text(&mut surface);
        let mut executor = CommandExecutor::new();
        executor.exec_command(&mut surface, ExecCommand::JustifyCenter);
        let first = surface.inner_html();
        select_all_of_first_text(&mut surface);
        executor.exec_command(&mut surface, ExecCommand::JustifyCenter);
        assert_eq!(surface.inner_html(), first);
    }

    #[test]
    fn test_alignment_wraps_bare_line() {
        let mut surface = surface_with("Hello");
        select_all_of_first_text(&mut surface);
        let mut executor = CommandExecutor::new();
        executor.exec_command(&mut surface, ExecCommand::JustifyRight);
        assert_eq!(
            surface.inner_html(),
            "<div style=\"text-align: right\">Hello</div>"
        );
    }

    #[test]
    fn test_undo_redo_round_trip() {
        let mut surface = surface_with("Hello");
        select_all_of_first_text(&mut surface);
        let mut executor = CommandExecutor::new();
        executor.exec_command(&mut surface, ExecCommand::Bold);
        assert!(executor.can_undo());

        executor.exec_command(&mut surface, ExecCommand::Undo);
        assert_eq!(surface.inner_html(), "Hello");
        assert!(executor.can_redo());

        executor.exec_command(&mut surface, ExecCommand::Redo);
        assert_eq!(surface.inner_html(), "<b>Hello</b>");
    }

    #[test]
    fn test_exec_without_selection_is_silent_noop() {
        let mut surface = surface_with("Hello");
        let mut executor = CommandExecutor::new();
        assert!(!executor.exec_command(&mut surface, ExecCommand::Bold));
        assert_eq!(surface.inner_html(), "Hello");
        assert!(!executor.can_undo());
    }

    #[test]
    fn test_caret_marker_activation_and_removal() {
        let mut surface = surface_with("ab");
        let text = surface.dom.text_nodes_in(surface.dom.root())[0];
        surface.collapse_to(text, 1);
        let mut executor = CommandExecutor::new();

        let active = ActiveStates::new();
        assert!(executor.apply_format(&mut surface, Format::Bold, &active, None));
        let html = surface.inner_html();
        assert!(html.contains("<b><span class=\"caret-marker\">"));
        assert!(html.contains("&#65279;"));

        // Deactivating at the same caret removes wrapper and marker entirely.
        let active = crate::inspect::compute_active_states(
            &surface.dom,
            surface.selection().unwrap().start.node,
            &[Format::Bold],
        );
        assert!(active.contains(Format::Bold));
        assert!(executor.apply_format(&mut surface, Format::Bold, &active, None));
        assert_eq!(surface.inner_html(), "ab");
    }

    #[test]
    fn test_caret_marker_cleanup_after_typing() {
        let mut surface = surface_with("");
        let root = surface.dom.root();
        surface.set_selection(DomRange::caret(root, 0));
        let mut executor = CommandExecutor::new();
        executor.apply_format(&mut surface, Format::Bold, &ActiveStates::new(), None);

        // Type inside the placeholder, then run the key-up cleanup.
        assert!(insert_text(&mut surface, "x"));
        assert!(clear_caret_marker(&mut surface));
        assert_eq!(surface.inner_html(), "<b>x</b>");

        let caret = surface.selection().unwrap();
        assert!(caret.is_caret());
        assert_eq!(surface.dom.text(caret.start.node), Some("x"));
        assert_eq!(caret.start.offset, 1);
    }

    #[test]
    fn test_unsupported_caret_format_is_noop() {
        let mut surface = surface_with("ab");
        let text = surface.dom.text_nodes_in(surface.dom.root())[0];
        surface.collapse_to(text, 1);
        let mut executor = CommandExecutor::new();
        assert!(!executor.apply_format(
            &mut surface,
            Format::Subscript,
            &ActiveStates::new(),
            None
        ));
        assert_eq!(surface.inner_html(), "ab");
    }

    #[test]
    fn test_insert_and_delete_text() {
        let mut surface = surface_with("ac");
        let text = surface.dom.text_nodes_in(surface.dom.root())[0];
        surface.collapse_to(text, 1);
        assert!(insert_text(&mut surface, "b"));
        assert_eq!(surface.inner_html(), "abc");

        assert!(delete_before_caret(&mut surface));
        assert_eq!(surface.inner_html(), "ac");
    }

    #[test]
    fn test_typing_over_selection_replaces_it() {
        let mut surface = surface_with("Hello");
        select_all_of_first_text(&mut surface);
        assert!(insert_text(&mut surface, "x"));
        assert_eq!(surface.inner_html(), "x");
    }

    #[test]
    fn test_insert_html_at_caret() {
        let mut surface = surface_with("ab");
        let text = surface.dom.text_nodes_in(surface.dom.root())[0];
        surface.collapse_to(text, 1);
        let mut executor = CommandExecutor::new();
        executor.exec_command(&mut surface, ExecCommand::InsertHtml("<br><br>".to_string()));
        assert_eq!(surface.inner_html(), "a<br><br>b");
    }

    #[test]
    fn test_from_name_passthrough() {
        assert_eq!(
            ExecCommand::from_name("insertOrderedList", None),
            Some(ExecCommand::InsertOrderedList)
        );
        assert_eq!(
            ExecCommand::from_name("foreColor", Some("#fff")),
            Some(ExecCommand::ForeColor("#fff".to_string()))
        );
        assert_eq!(ExecCommand::from_name("shoutLoudly", None), None);
    }
}
