//! Selection tracking.
//!
//! The tracker is the sole writer of the selection snapshot. It observes
//! pointer-down and selection-change input, captures the live selection
//! wholesale (the snapshot is replaced, never mutated), and decides whether a
//! range is worth saving for later restoration: a pure caret is not persisted,
//! so refocusing after a blur does not replay a stale selection.

use crate::dom::{Dom, NodeId};

/// One end of a range: a node and a character (or child) offset inside it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RangeBound {
    /// The node the bound sits in. Text nodes use character offsets, element
    /// nodes use child indices.
    pub node: NodeId,
    /// Offset within the node.
    pub offset: usize,
}

/// A selection range over the document tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DomRange {
    /// Start bound (document order).
    pub start: RangeBound,
    /// End bound (document order).
    pub end: RangeBound,
}

impl DomRange {
    /// A range spanning `start..end`.
    pub fn new(start: RangeBound, end: RangeBound) -> Self {
        Self { start, end }
    }

    /// A collapsed range (caret) at the given position.
    pub fn caret(node: NodeId, offset: usize) -> Self {
        let bound = RangeBound { node, offset };
        Self {
            start: bound,
            end: bound,
        }
    }

    /// `true` if the range is collapsed.
    pub fn is_caret(&self) -> bool {
        self.start == self.end
    }
}

/// Serialized text covered by a range.
pub fn range_text(dom: &Dom, range: &DomRange) -> String {
    if range.is_caret() {
        return String::new();
    }

    let Some(start) = resolve_to_text(dom, range.start, true) else {
        return String::new();
    };
    let Some(end) = resolve_to_text(dom, range.end, false) else {
        return String::new();
    };

    let texts = dom.text_nodes_in(dom.root());
    let Some(start_index) = texts.iter().position(|&n| n == start.node) else {
        return String::new();
    };
    let Some(end_index) = texts.iter().position(|&n| n == end.node) else {
        return String::new();
    };
    if start_index > end_index {
        return String::new();
    }

    let mut out = String::new();
    for (index, &node) in texts[start_index..=end_index].iter().enumerate() {
        let text = dom.text(node).unwrap_or_default();
        let chars: Vec<char> = text.chars().collect();
        let from = if index == 0 { start.offset.min(chars.len()) } else { 0 };
        let to = if start_index + index == end_index {
            end.offset.min(chars.len())
        } else {
            chars.len()
        };
        if from < to {
            out.extend(&chars[from..to]);
        }
    }
    out
}

/// Resolve an element-anchored bound to a text-node bound.
///
/// `leading` picks the first text node at or after the bound; otherwise the
/// last text node before it.
pub fn resolve_to_text(dom: &Dom, bound: RangeBound, leading: bool) -> Option<RangeBound> {
    if dom.is_text(bound.node) {
        return Some(bound);
    }

    let children = dom.children(bound.node);
    if leading {
        for &child in children.iter().skip(bound.offset) {
            if let Some(&text) = dom.text_nodes_in(child).first() {
                return Some(RangeBound {
                    node: text,
                    offset: 0,
                });
            }
        }
        None
    } else {
        for &child in children.iter().take(bound.offset).rev() {
            if let Some(&text) = dom.text_nodes_in(child).last() {
                return Some(RangeBound {
                    node: text,
                    offset: dom.text_len(text),
                });
            }
        }
        None
    }
}

/// Snapshot of the most recent settled selection.
///
/// Replaced wholesale on every selection change; invalidated after
/// popover-driven mutations so the next focus re-captures from the live tree.
#[derive(Debug, Clone, Default)]
pub struct SelectionSnapshot {
    /// Node the selection anchors at.
    pub anchor_node: Option<NodeId>,
    /// `true` when the selection is a collapsed caret.
    pub is_caret: bool,
    /// Serialized text covered by the selection.
    pub range_text: String,
    /// Range saved for restoration on refocus. Only persisted for non-empty
    /// selections.
    pub saved_range: Option<DomRange>,
}

/// Tracker phases: pointer press observed, selection not yet settled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TrackerPhase {
    /// No pointer activity since the last selection change.
    #[default]
    Idle,
    /// A mouse/touch press was observed; the selection has not settled yet.
    PointerDown,
    /// A selection-change event fired after a pointer-down; snapshot captured.
    Settled,
}

/// Selection/Caret Tracker.
#[derive(Debug, Default)]
pub struct SelectionTracker {
    phase: TrackerPhase,
    snapshot: SelectionSnapshot,
}

impl SelectionTracker {
    /// New tracker in the idle phase.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current phase.
    pub fn phase(&self) -> TrackerPhase {
        self.phase
    }

    /// Current snapshot.
    pub fn snapshot(&self) -> &SelectionSnapshot {
        &self.snapshot
    }

    /// Saved range, if the last settled selection was non-empty.
    pub fn saved_range(&self) -> Option<DomRange> {
        self.snapshot.saved_range
    }

    /// A pointer press was observed on the surface.
    pub fn pointer_down(&mut self) {
        self.phase = TrackerPhase::PointerDown;
    }

    /// The live selection changed; capture a fresh snapshot.
    pub fn selection_changed(&mut self, dom: &Dom, live: Option<&DomRange>) -> &SelectionSnapshot {
        let snapshot = match live {
            Some(range) => {
                let text = range_text(dom, range);
                SelectionSnapshot {
                    anchor_node: Some(range.start.node),
                    is_caret: range.is_caret(),
                    saved_range: if text.is_empty() { None } else { Some(*range) },
                    range_text: text,
                }
            }
            None => SelectionSnapshot::default(),
        };
        self.snapshot = snapshot;
        self.phase = TrackerPhase::Settled;
        &self.snapshot
    }

    /// Drop the snapshot after a popover-driven mutation completed, forcing a
    /// re-capture on the next focus.
    pub fn invalidate(&mut self) {
        self.snapshot = SelectionSnapshot::default();
        self.phase = TrackerPhase::Idle;
    }
}
