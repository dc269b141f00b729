//! Editor error type.
//!
//! Most failure modes of the engine are *not* errors: an empty selection, an
//! unsupported format at a collapsed caret, or a popover teardown with nothing
//! open all resolve silently (see the crate docs on error taxonomy). The only
//! hard error is the structural precondition that the editor shell must be
//! mounted before its surface is touched.

use thiserror::Error;

/// Errors surfaced by the editor shell.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EditorError {
    /// A shell method was called before [`mount`](crate::RichTextEditor::mount)
    /// initialized the editable surface.
    #[error("editor is not mounted; call mount() before using the surface")]
    NotMounted,
    /// The host-supplied options JSON could not be deserialized.
    #[error("invalid options: {0}")]
    InvalidOptions(String),
}
