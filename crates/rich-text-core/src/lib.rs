#![warn(missing_docs)]
//! Rich Text Core - Headless Rich-Text Editing Engine
//!
//! # Overview
//!
//! `rich-text-core` is a headless rich-text editing engine focused on
//! selection tracking, formatting state, and popover lifecycle. It does not
//! render anything: the engine owns the editable surface as a live document
//! tree, and the host provides the view layer, feeding input events in and
//! reading toolbar/button/popover state back out.
//!
//! # Core Features
//!
//! - **Selection-driven formatting state**: the active-format set is derived
//!   wholesale from the anchor node's ancestor chain on every selection change
//! - **Format commands**: bold/italic/underline/strikethrough, sub/superscript,
//!   lists, alignment, text/highlight color, hyperlinks
//! - **Collapsed-caret formatting**: zero-width-marker technique for toggling
//!   inline formats with no selected text
//! - **Popover lifecycle**: at most one color/highlight/link popover open,
//!   mutual exclusion by construction
//! - **Content round-trip**: HTML in, plain text + normalized HTML out
//!
//! # Architecture Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │  Editor Shell (RichTextEditor)              │  ← Public API
//! ├─────────────────────────────────────────────┤
//! │  Toolbar Controller & Popover Lifecycle     │  ← Visual State
//! ├─────────────────────────────────────────────┤
//! │  Format Executor & Style Inspector          │  ← Formatting State Machine
//! ├─────────────────────────────────────────────┤
//! │  Selection Tracker (snapshot + restoration) │  ← Input Tracking
//! ├─────────────────────────────────────────────┤
//! │  Document Tree + HTML Codec                 │  ← Surface Storage
//! └─────────────────────────────────────────────┘
//! ```
//!
//! # Quick Start
//!
//! ```rust
//! use rich_text_core::{RichTextEditor, RichTextOptions};
//!
//! let mut editor = RichTextEditor::new(RichTextOptions::default());
//! editor.mount().unwrap();
//!
//! editor.set_content("<p>Hello</p>").unwrap();
//! let content = editor.get_content().unwrap();
//! assert_eq!(content.text, "Hello");
//! assert_eq!(content.html, "<p>Hello</p>");
//! ```
//!
//! Formatting follows the user's selection:
//!
//! ```rust
//! use rich_text_core::{
//!     DomRange, Format, RangeBound, RichTextEditor, RichTextOptions,
//! };
//!
//! let mut editor = RichTextEditor::new(RichTextOptions::default());
//! editor.mount().unwrap();
//! editor.set_content("Hello").unwrap();
//!
//! let text = editor.dom().text_nodes_in(editor.dom().root())[0];
//! editor
//!     .select(DomRange::new(
//!         RangeBound { node: text, offset: 0 },
//!         RangeBound { node: text, offset: 5 },
//!     ))
//!     .unwrap();
//!
//! editor.toolbar_click("bold").unwrap();
//! assert!(editor.toolbar().is_active(Format::Bold));
//! assert_eq!(editor.get_content().unwrap().html, "<b>Hello</b>");
//! ```
//!
//! # Module Description
//!
//! - [`dom`] - arena document tree (the editable surface's storage)
//! - [`html`] - HTML fragment parser and serializer
//! - [`format`] - format registry (tags, style properties, caret wrappers)
//! - [`inspect`] - Style State Inspector (active-format derivation)
//! - [`selection`] - selection ranges, snapshot, and tracker state machine
//! - [`commands`] - native formatting primitive and format executor
//! - [`popover`] - popover lifecycle (color/highlight/link, mutual exclusion)
//! - [`toolbar`] - toolbar controller (identifier parsing, button state)
//! - [`editor`] - editor shell composing everything
//! - [`options`] - host configuration
//! - [`events`] - event subscriptions
//! - [`keys`] - key-code helpers
//! - [`font`] - `@font-face` CSS generation

pub mod commands;
pub mod dom;
pub mod editor;
pub mod error;
pub mod events;
pub mod font;
pub mod format;
pub mod html;
pub mod inspect;
pub mod keys;
pub mod options;
pub mod popover;
pub mod selection;
pub mod toolbar;

pub use commands::{
    CARET_MARKER_CLASS, CommandExecutor, ExecCommand, Surface, ZERO_WIDTH_MARKER,
    clear_caret_marker, find_caret_marker,
};
pub use dom::{Dom, EDITING_ROOT_ID, Element, NodeId};
pub use editor::{BLUR_DEBOUNCE_MS, Content, RichTextEditor, TOOLBAR_HEIGHT};
pub use error::EditorError;
pub use events::{EditorEvent, EventHub, StyleChangePayload, SubscriptionId};
pub use font::font_faces_css;
pub use format::{Format, FormatSpec, REGISTRY};
pub use html::{inner_html, parse_fragment, set_inner_html, visible_len};
pub use inspect::{ActiveStates, AnchorColors, anchor_colors, compute_active_states};
pub use keys::{KeyEvent, is_os_key, is_special_key};
pub use options::{
    DEFAULT_COLORS, DEFAULT_HIGHLIGHTS, DEFAULT_PLACEHOLDER, DEFAULT_TOOLBAR, FontFace,
    FontOptions, FontSource, FontWeight, RichTextOptions, ShowToolbar, ToolbarPosition,
};
pub use popover::{
    ColorTarget, LinkAction, LinkActionKind, LinkMode, LinkResolution, NullLayout,
    PopoverLifecycle, PopoverPlacement, PopoverState, SurfaceLayout, normalize_url,
};
pub use selection::{DomRange, RangeBound, SelectionSnapshot, SelectionTracker, TrackerPhase};
pub use toolbar::{
    PopoverButton, Separator, Toolbar, ToolbarAction, ToolbarItem, ToolbarVisibility, title_for,
};
