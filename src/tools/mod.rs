pub mod edit;

/// Which transform gizmo is attached to the selected object.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GizmoMode {
    Translate,
    Rotate,
    Scale,
}

/// Which mesh sub-element pointer input manipulates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditMode {
    Vertex,
    Edge,
    Face,
}

/// Where a pointer-down on the viewport should go.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerRoute {
    /// Pick a vertex handle and start dragging it.
    VertexDrag,
    /// Edge or face mode: selection writes only, no drag.
    ElementSelect(EditMode),
    /// Hand the pointer to the transform gizmo.
    Gizmo(GizmoMode),
    /// Plain click-to-select on objects.
    ObjectSelect,
}
