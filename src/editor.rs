use std::collections::BTreeSet;

use glam::Vec3;

use crate::error::EditError;
use crate::input::{PointerEvent, PointerInput};
use crate::scene::primitives::PrimitiveKind;
use crate::scene::{Mesh, ObjectId, Renderable, Scene, SceneObject, Transform, rgb_from_hex};
use crate::settings::Settings;
use crate::tools::edit::drag::DragSession;
use crate::tools::edit::{EditState, ElementKind, Selection};
use crate::tools::{EditMode, GizmoMode, PointerRoute};
use crate::util::color::parse_color;
use crate::util::picking::{self, HandleHit, Ray};

/// Change notifications for the view layer, drained once per frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorEvent {
    /// Objects were added, removed, renamed or shown/hidden.
    ObjectsChanged,
    /// Selected object or selected elements changed.
    SelectionChanged,
    /// Transform or edit mode changed.
    ModeChanged,
    GeometryChanged(ObjectId),
    MaterialChanged(ObjectId),
    TransformChanged(ObjectId),
}

/// A vertex marker for the view to draw in vertex mode.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VertexHandle {
    pub index: usize,
    pub world_position: Vec3,
    pub selected: bool,
}

/// Owner of all editor state. The view reads through the accessors and mutates
/// only through the named operations below.
///
/// The view-facing operations never fail: refused requests are logged and
/// dropped. Each has a `try_` twin that reports why.
pub struct Editor {
    scene: Scene,
    edit: EditState,
    settings: Settings,
    events: Vec<EditorEvent>,
}

impl Default for Editor {
    fn default() -> Self {
        Self::new(Settings::default())
    }
}

impl Editor {
    pub fn new(settings: Settings) -> Self {
        Self {
            scene: Scene::new(),
            edit: EditState::new(),
            settings,
            events: Vec::new(),
        }
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn objects(&self) -> &[SceneObject] {
        self.scene.objects()
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn selected_object(&self) -> Option<ObjectId> {
        self.scene.selected()
    }

    pub fn selection(&self) -> &Selection {
        &self.edit.selection
    }

    pub fn transform_mode(&self) -> Option<GizmoMode> {
        self.edit.transform_mode()
    }

    pub fn edit_mode(&self) -> Option<EditMode> {
        self.edit.edit_mode()
    }

    pub fn active_gizmo(&self) -> Option<GizmoMode> {
        self.scene.selected().and(self.edit.active_gizmo())
    }

    pub fn drag(&self) -> Option<&DragSession> {
        self.edit.drag()
    }

    /// Take the events queued since the last call.
    pub fn drain_events(&mut self) -> Vec<EditorEvent> {
        std::mem::take(&mut self.events)
    }

    fn emit(&mut self, event: EditorEvent) {
        if !self.events.contains(&event) {
            self.events.push(event);
        }
    }

    // --- Scene graph ---

    pub fn add_object(&mut self, renderable: Renderable, name: &str) -> ObjectId {
        let id = self.scene.add(renderable, name);
        self.emit(EditorEvent::ObjectsChanged);
        id
    }

    /// Build a primitive with the configured default material and add it.
    pub fn add_primitive(&mut self, kind: PrimitiveKind) -> ObjectId {
        let mut mesh = kind.build();
        mesh.material.color = rgb_from_hex(self.settings.material.default_color);
        mesh.material.set_opacity(self.settings.material.default_opacity);
        self.add_object(Renderable::Mesh(mesh), kind.label())
    }

    pub fn remove_object(&mut self, id: ObjectId) {
        let previous = self.scene.selected();
        if self.scene.remove(id).is_some() {
            self.emit(EditorEvent::ObjectsChanged);
            self.after_selection_change(previous);
        } else {
            log::debug!("remove_object ignored: {}", EditError::UnknownObject(id));
        }
    }

    pub fn update_object_name(&mut self, id: ObjectId, name: &str) {
        if name.trim().is_empty() {
            log::debug!("update_object_name ignored: blank name for {id}");
            return;
        }
        if self.scene.rename(id, name) {
            self.emit(EditorEvent::ObjectsChanged);
        } else {
            log::debug!("update_object_name ignored: {}", EditError::UnknownObject(id));
        }
    }

    pub fn toggle_visibility(&mut self, id: ObjectId) {
        let previous = self.scene.selected();
        if self.scene.toggle_visibility(id) {
            self.emit(EditorEvent::ObjectsChanged);
            self.after_selection_change(previous);
        } else {
            log::debug!("toggle_visibility ignored: {}", EditError::UnknownObject(id));
        }
    }

    pub fn set_visible(&mut self, id: ObjectId, visible: bool) {
        let previous = self.scene.selected();
        if self.scene.set_visible(id, visible) {
            self.emit(EditorEvent::ObjectsChanged);
            self.after_selection_change(previous);
        } else {
            log::debug!("set_visible ignored: {}", EditError::UnknownObject(id));
        }
    }

    pub fn set_selected_object(&mut self, id: Option<ObjectId>) {
        let previous = self.scene.selected();
        if self.scene.select(id) {
            self.after_selection_change(previous);
        }
    }

    /// Drops element selection and force-commits any drag when the selected
    /// object has changed.
    fn after_selection_change(&mut self, previous: Option<ObjectId>) {
        let current = self.scene.selected();
        if current == previous {
            return;
        }
        if let Some(session) = self.edit.reset_for_new_selection() {
            log::info!("Selection changed mid-drag; committed drag on {}", session.object());
        }
        log::debug!("Selected object: {current:?}");
        self.emit(EditorEvent::SelectionChanged);
    }

    // --- Modes ---

    pub fn set_transform_mode(&mut self, mode: Option<GizmoMode>) {
        if self.edit.transform_mode() != mode {
            self.edit.set_transform_mode(mode);
            self.emit(EditorEvent::ModeChanged);
        }
    }

    /// Leaving vertex mode mid-drag commits the drag.
    pub fn set_edit_mode(&mut self, mode: Option<EditMode>) {
        if self.edit.edit_mode() == mode {
            return;
        }
        if let Some(session) = self.edit.set_edit_mode(mode) {
            log::info!("Edit mode changed mid-drag; committed drag on {}", session.object());
        }
        self.emit(EditorEvent::ModeChanged);
    }

    /// Toolbar transform button: pick a gizmo and leave edit mode.
    pub fn activate_transform_tool(&mut self, mode: GizmoMode) {
        self.set_transform_mode(Some(mode));
        self.set_edit_mode(None);
    }

    /// Toolbar edit button: enter an edit mode and drop the gizmo.
    pub fn activate_edit_tool(&mut self, mode: EditMode) {
        self.set_edit_mode(Some(mode));
        self.set_transform_mode(None);
    }

    pub fn route_pointer(&self) -> PointerRoute {
        let selected_is_mesh = self
            .scene
            .selected_object()
            .map(|o| matches!(o.renderable, Renderable::Mesh(_)));
        self.edit.route(selected_is_mesh)
    }

    // --- Element selection ---

    pub fn set_selected_elements(&mut self, kind: ElementKind, indices: impl IntoIterator<Item = usize>) {
        self.edit.selection.set(kind, indices);
        self.emit(EditorEvent::SelectionChanged);
    }

    // --- Vertex drag ---

    fn selected_mesh(&self) -> Result<(ObjectId, &Mesh), EditError> {
        let object = self.scene.selected_object().ok_or(EditError::NoSelection)?;
        let mesh = object.renderable.as_mesh().ok_or(EditError::NotAMesh(object.id))?;
        Ok((object.id, mesh))
    }

    fn selected_mesh_mut(&mut self) -> Result<(ObjectId, &mut Mesh), EditError> {
        let object = self.scene.selected_object_mut().ok_or(EditError::NoSelection)?;
        let id = object.id;
        let mesh = object.renderable.as_mesh_mut().ok_or(EditError::NotAMesh(id))?;
        Ok((id, mesh))
    }

    /// Begin dragging vertex `index` of the selected mesh, grabbed at `world_position`.
    ///
    /// Coincidence search, vertex selection and session creation happen as one
    /// step; nothing changes if any part is refused. An already open drag is
    /// committed first.
    pub fn try_start_vertex_drag(&mut self, index: usize, world_position: Vec3) -> Result<(), EditError> {
        if self.edit.edit_mode() != Some(EditMode::Vertex) {
            return Err(EditError::WrongEditMode);
        }
        let (id, mesh) = self.selected_mesh()?;
        let session = DragSession::begin(id, mesh, index, world_position, self.settings.edit.coincidence_epsilon)?;
        log::debug!("Vertex drag start on {id}: {:?}", session.indices());
        self.edit.begin_drag(session);
        self.emit(EditorEvent::SelectionChanged);
        Ok(())
    }

    pub fn start_vertex_drag(&mut self, index: usize, world_position: Vec3) {
        if let Err(e) = self.try_start_vertex_drag(index, world_position) {
            log::debug!("start_vertex_drag ignored: {e}");
        }
    }

    /// Move the dragged vertex class to `local_position` in the object's frame.
    pub fn try_update_vertex_drag(&mut self, local_position: Vec3) -> Result<(), EditError> {
        let session = self.edit.drag_mut().ok_or(EditError::NotDragging)?;
        let id = session.object();
        let mesh = self
            .scene
            .get_mut(id)
            .and_then(|o| o.renderable.as_mesh_mut())
            .ok_or(EditError::UnknownObject(id))?;
        session.apply(mesh, local_position)?;
        self.emit(EditorEvent::GeometryChanged(id));
        Ok(())
    }

    pub fn update_vertex_drag(&mut self, local_position: Vec3) {
        if let Err(e) = self.try_update_vertex_drag(local_position) {
            log::debug!("update_vertex_drag ignored: {e}");
        }
    }

    /// Pointer-move during a drag: intersect the pointer ray with the
    /// camera-facing plane through the dragged point, convert to local space,
    /// and write. A ray that misses the plane leaves the position as it was.
    pub fn try_drag_vertex(&mut self, pointer: &PointerInput) -> Result<(), EditError> {
        let session = self.edit.drag().ok_or(EditError::NotDragging)?;
        let id = session.object();
        let mesh = self
            .scene
            .get(id)
            .and_then(|o| o.renderable.as_mesh())
            .ok_or(EditError::UnknownObject(id))?;
        let local = session.resolve(mesh, pointer)?;
        self.try_update_vertex_drag(local)
    }

    pub fn drag_vertex(&mut self, pointer: &PointerInput) {
        if let Err(e) = self.try_drag_vertex(pointer) {
            log::debug!("drag_vertex skipped: {e}");
        }
    }

    /// Close the drag, keeping whatever was last written.
    pub fn end_vertex_drag(&mut self) {
        match self.edit.end_drag() {
            Some(session) => log::debug!(
                "Vertex drag end on {}: {} -> {}",
                session.object(),
                session.initial_position(),
                session.position()
            ),
            None => log::debug!("end_vertex_drag ignored: {}", EditError::NotDragging),
        }
    }

    /// Local-space position of the dragged vertices, for the coordinate readout.
    pub fn dragged_vertex_position(&self) -> Option<Vec3> {
        self.edit.drag().map(|s| s.position())
    }

    pub fn dragged_vertex_world_position(&self) -> Option<Vec3> {
        let session = self.edit.drag()?;
        let mesh = self.scene.get(session.object())?.renderable.as_mesh()?;
        Some(mesh.local_to_world(session.position()))
    }

    /// Markers for every vertex of the selected mesh, in vertex mode only.
    pub fn vertex_handles(&self) -> Vec<VertexHandle> {
        if self.edit.edit_mode() != Some(EditMode::Vertex) {
            return Vec::new();
        }
        let Ok((_, mesh)) = self.selected_mesh() else {
            return Vec::new();
        };
        let selected = &self.edit.selection.vertices;
        mesh.positions()
            .iter()
            .enumerate()
            .map(|(index, &p)| VertexHandle {
                index,
                world_position: mesh.local_to_world(p),
                selected: selected.contains(&index),
            })
            .collect()
    }

    pub fn pick_vertex_handle(&self, ray: &Ray) -> Option<HandleHit> {
        let handles = self.vertex_handles();
        picking::pick_handle(ray, handles.iter().map(|h| h.world_position), self.settings.edit.vertex_handle_radius)
    }

    /// Dispatch one pointer event. Returns the route taken for pointer-down so the
    /// host knows when to hand the gesture to its gizmo.
    pub fn handle_pointer(&mut self, event: PointerEvent) -> Option<PointerRoute> {
        match event {
            PointerEvent::Down(input) => {
                let route = self.route_pointer();
                match route {
                    PointerRoute::VertexDrag => match self.pick_vertex_handle(&input.ray) {
                        Some(hit) => self.start_vertex_drag(hit.index, hit.world_position),
                        None => self.select_under_pointer(&input.ray),
                    },
                    PointerRoute::ElementSelect(_) | PointerRoute::ObjectSelect => {
                        self.select_under_pointer(&input.ray)
                    }
                    PointerRoute::Gizmo(_) => {}
                }
                Some(route)
            }
            PointerEvent::Move(input) => {
                if self.edit.is_dragging() {
                    self.drag_vertex(&input);
                }
                None
            }
            PointerEvent::Up => {
                if self.edit.is_dragging() {
                    self.end_vertex_drag();
                }
                None
            }
        }
    }

    /// Clicking empty space keeps the current selection.
    fn select_under_pointer(&mut self, ray: &Ray) {
        if let Some(id) = picking::pick_object(ray, &self.scene) {
            self.set_selected_object(Some(id));
        }
    }

    // --- Properties panel ---

    pub fn try_update_object_color(&mut self, color: &str) -> Result<(), EditError> {
        let rgb = parse_color(color)?;
        let (id, mesh) = self.selected_mesh_mut()?;
        mesh.material.color = rgb;
        self.emit(EditorEvent::MaterialChanged(id));
        Ok(())
    }

    /// Malformed colors leave the material unchanged.
    pub fn update_object_color(&mut self, color: &str) {
        match self.try_update_object_color(color) {
            Ok(()) => {}
            Err(e @ EditError::MalformedColor(_)) => log::warn!("{e}"),
            Err(e) => log::debug!("update_object_color ignored: {e}"),
        }
    }

    pub fn try_update_object_opacity(&mut self, opacity: f32) -> Result<(), EditError> {
        let (id, mesh) = self.selected_mesh_mut()?;
        mesh.material.set_opacity(opacity);
        self.emit(EditorEvent::MaterialChanged(id));
        Ok(())
    }

    pub fn update_object_opacity(&mut self, opacity: f32) {
        if let Err(e) = self.try_update_object_opacity(opacity) {
            log::debug!("update_object_opacity ignored: {e}");
        }
    }

    fn edit_selected_transform(&mut self, op: &str, f: impl FnOnce(&mut Transform)) {
        match self.scene.selected_object_mut() {
            Some(object) => {
                f(object.renderable.transform_mut());
                let id = object.id;
                self.emit(EditorEvent::TransformChanged(id));
            }
            None => log::debug!("{op} ignored: {}", EditError::NoSelection),
        }
    }

    pub fn set_object_position(&mut self, position: Vec3) {
        self.edit_selected_transform("set_object_position", |t| t.position = position);
    }

    /// Rotation is given in degrees and stored in radians (XYZ order).
    pub fn set_object_rotation_degrees(&mut self, degrees: Vec3) {
        let radians = Vec3::new(degrees.x.to_radians(), degrees.y.to_radians(), degrees.z.to_radians());
        self.edit_selected_transform("set_object_rotation_degrees", |t| t.rotation = radians);
    }

    /// Each component is clamped to the configured minimum so the object stays invertible.
    pub fn set_object_scale(&mut self, scale: Vec3) {
        let scale = scale.max(Vec3::splat(self.settings.edit.min_scale));
        self.edit_selected_transform("set_object_scale", |t| t.scale = scale);
    }

    /// Vertex indices currently moving together, if a drag is open.
    pub fn dragged_indices(&self) -> Option<&BTreeSet<usize>> {
        self.edit.drag().map(|s| s.indices())
    }
}
