use thiserror::Error;

use crate::scene::ObjectId;

/// Reasons an editing operation was refused.
///
/// None of these are fatal. The view-facing operations on [`crate::editor::Editor`]
/// log and swallow them; the `try_*` variants hand them back for callers that care.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EditError {
    #[error("no object is selected")]
    NoSelection,
    #[error("object {0} is not a mesh")]
    NotAMesh(ObjectId),
    #[error("operation requires vertex edit mode")]
    WrongEditMode,
    #[error("no vertex drag is in progress")]
    NotDragging,
    #[error("vertex {index} is out of range (mesh has {count} vertices)")]
    VertexOutOfRange { index: usize, count: usize },
    #[error("pointer ray does not meet the constraint plane")]
    DegenerateIntersection,
    #[error("object transform is not invertible")]
    SingularTransform,
    #[error("malformed color: {0:?}")]
    MalformedColor(String),
    #[error("unknown object {0}")]
    UnknownObject(ObjectId),
}
