pub mod drag;

use std::collections::BTreeSet;

use crate::tools::{EditMode, GizmoMode, PointerRoute};
use drag::DragSession;

/// The three kinds of mesh sub-element that can be selected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementKind {
    Vertices,
    Edges,
    Faces,
}

/// Selected sub-elements of the currently selected object, by index.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    pub vertices: BTreeSet<usize>,
    pub edges: BTreeSet<usize>,
    pub faces: BTreeSet<usize>,
}

impl Selection {
    pub fn clear(&mut self) {
        self.vertices.clear();
        self.edges.clear();
        self.faces.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty() && self.edges.is_empty() && self.faces.is_empty()
    }

    pub fn get(&self, kind: ElementKind) -> &BTreeSet<usize> {
        match kind {
            ElementKind::Vertices => &self.vertices,
            ElementKind::Edges => &self.edges,
            ElementKind::Faces => &self.faces,
        }
    }

    /// Replace one of the three sets wholesale; the other two are untouched.
    pub fn set(&mut self, kind: ElementKind, indices: impl IntoIterator<Item = usize>) {
        let target = match kind {
            ElementKind::Vertices => &mut self.vertices,
            ElementKind::Edges => &mut self.edges,
            ElementKind::Faces => &mut self.faces,
        };
        *target = indices.into_iter().collect();
    }
}

/// Interaction-mode state: transform gizmo mode, edit mode, element selection,
/// and the single in-flight vertex drag.
///
/// The two mode setters are independent. Clearing the sibling mode is up to the
/// caller (the toolbar does both); if both end up set, edit mode wins routing.
#[derive(Default)]
pub struct EditState {
    transform_mode: Option<GizmoMode>,
    edit_mode: Option<EditMode>,
    pub selection: Selection,
    drag: Option<DragSession>,
}

impl EditState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn transform_mode(&self) -> Option<GizmoMode> {
        self.transform_mode
    }

    pub fn edit_mode(&self) -> Option<EditMode> {
        self.edit_mode
    }

    pub fn set_transform_mode(&mut self, mode: Option<GizmoMode>) {
        self.transform_mode = mode;
    }

    /// Change edit mode. Leaving vertex mode closes any open drag, keeping the
    /// geometry as last written; the closed session is returned.
    pub fn set_edit_mode(&mut self, mode: Option<EditMode>) -> Option<DragSession> {
        self.edit_mode = mode;
        if mode != Some(EditMode::Vertex) {
            self.end_drag()
        } else {
            None
        }
    }

    /// Where pointer-down goes, given whether the selected object (if any) is a mesh.
    pub fn route(&self, selected_is_mesh: Option<bool>) -> PointerRoute {
        match (self.edit_mode, selected_is_mesh) {
            (Some(EditMode::Vertex), Some(true)) => PointerRoute::VertexDrag,
            (Some(mode), Some(true)) => PointerRoute::ElementSelect(mode),
            // Edit mode without an editable mesh shows no handles; object picking still works.
            (Some(_), _) => PointerRoute::ObjectSelect,
            (None, Some(_)) => match self.transform_mode {
                Some(mode) => PointerRoute::Gizmo(mode),
                None => PointerRoute::ObjectSelect,
            },
            (None, None) => PointerRoute::ObjectSelect,
        }
    }

    /// Gizmo to show on the selected object, if any. Suppressed while editing.
    pub fn active_gizmo(&self) -> Option<GizmoMode> {
        match self.edit_mode {
            Some(_) => None,
            None => self.transform_mode,
        }
    }

    pub fn drag(&self) -> Option<&DragSession> {
        self.drag.as_ref()
    }

    pub fn drag_mut(&mut self) -> Option<&mut DragSession> {
        self.drag.as_mut()
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    /// Install a new drag and select its vertex class in one step.
    pub fn begin_drag(&mut self, session: DragSession) {
        self.selection.set(ElementKind::Vertices, session.indices().iter().copied());
        self.drag = Some(session);
    }

    pub fn end_drag(&mut self) -> Option<DragSession> {
        self.drag.take()
    }

    /// Called when the selected object changes: stale element indices and any
    /// drag on the previous object are dropped.
    pub fn reset_for_new_selection(&mut self) -> Option<DragSession> {
        self.selection.clear();
        self.end_drag()
    }
}
