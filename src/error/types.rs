use indextree::NodeId;
use thiserror::Error;

/// Unified result type for the layout editor crate.
pub type Result<T> = std::result::Result<T, EditorError>;

/// Protocol and integration errors surfaced by the layout editor.
///
/// Expected refusals (deleting a templated element, expanding a column past
/// the grid) are never reported here; those are answered by the `can_*`
/// predicates and the actions quietly do nothing.
#[derive(Debug, Error)]
pub enum EditorError {
    #[error("no element with type \"{0}\" was found")]
    UnknownElementType(String),
    #[error("element record is missing its `type`")]
    MissingType,
    #[error("element {0:?} does not belong to this editor")]
    UnknownElement(NodeId),
    #[error("element {0:?} is not a container")]
    NotAContainer(NodeId),
    #[error("element {0:?} is not a row")]
    NotARow(NodeId),
    #[error("element {0:?} is not a column")]
    NotAColumn(NodeId),
    #[error("column add operation is already in progress")]
    AddColumnInProgress,
    #[error("no column add operation in progress")]
    NoAddColumnInProgress,
    #[error("column already has a pending change")]
    PendingChangeExists,
    #[error("column has no pending change")]
    NoPendingChange,
    #[error("tree structure error: {0}")]
    Tree(#[from] indextree::NodeError),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error("serialized record is not UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}
