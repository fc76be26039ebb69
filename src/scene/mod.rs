mod object;
pub mod mesh;
pub mod primitives;

pub use mesh::Mesh;
pub use object::{DEFAULT_COLOR, Material, ObjectId, Renderable, SceneObject, Transform, rgb_from_hex};

/// Registry of every object in the scene, in insertion order, plus the one
/// selected object.
///
/// Every mutation keeps `selected` pointing at an object that is present and
/// visible, or at nothing.
#[derive(Default)]
pub struct Scene {
    objects: Vec<SceneObject>,
    selected: Option<ObjectId>,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn objects(&self) -> &[SceneObject] {
        &self.objects
    }

    pub fn selected(&self) -> Option<ObjectId> {
        self.selected
    }

    pub fn get(&self, id: ObjectId) -> Option<&SceneObject> {
        self.objects.iter().find(|o| o.id == id)
    }

    pub fn get_mut(&mut self, id: ObjectId) -> Option<&mut SceneObject> {
        self.objects.iter_mut().find(|o| o.id == id)
    }

    pub fn selected_object(&self) -> Option<&SceneObject> {
        self.selected.and_then(|id| self.get(id))
    }

    pub fn selected_object_mut(&mut self) -> Option<&mut SceneObject> {
        let id = self.selected?;
        self.get_mut(id)
    }

    /// Append a new visible object under a fresh id.
    pub fn add(&mut self, renderable: Renderable, name: impl Into<String>) -> ObjectId {
        let object = SceneObject::new(renderable, name.into());
        let id = object.id;
        log::info!("Added object {:?} ({id})", object.name);
        self.objects.push(object);
        id
    }

    /// Drop an object, deselecting it if it was selected.
    pub fn remove(&mut self, id: ObjectId) -> Option<SceneObject> {
        let pos = self.objects.iter().position(|o| o.id == id)?;
        let removed = self.objects.remove(pos);
        if self.selected == Some(id) {
            self.selected = None;
        }
        log::info!("Removed object {:?} ({id})", removed.name);
        Some(removed)
    }

    /// Rename an object. The name is trimmed; blank names are refused.
    pub fn rename(&mut self, id: ObjectId, name: &str) -> bool {
        let name = name.trim();
        if name.is_empty() {
            return false;
        }
        match self.get_mut(id) {
            Some(object) => {
                object.name = name.to_string();
                true
            }
            None => false,
        }
    }

    /// Show or hide an object. Hiding the selected object deselects it.
    pub fn set_visible(&mut self, id: ObjectId, visible: bool) -> bool {
        let Some(object) = self.get_mut(id) else {
            return false;
        };
        object.visible = visible;
        if !visible && self.selected == Some(id) {
            self.selected = None;
        }
        true
    }

    pub fn toggle_visibility(&mut self, id: ObjectId) -> bool {
        match self.get(id).map(|o| o.visible) {
            Some(visible) => self.set_visible(id, !visible),
            None => false,
        }
    }

    /// Change the selection. Unknown or hidden objects cannot be selected;
    /// the request is refused and the current selection kept.
    pub fn select(&mut self, id: Option<ObjectId>) -> bool {
        match id {
            None => {
                self.selected = None;
                true
            }
            Some(id) if self.get(id).is_some_and(|o| o.visible) => {
                self.selected = Some(id);
                true
            }
            Some(id) => {
                log::debug!("Refusing to select missing or hidden object {id}");
                false
            }
        }
    }
}
