pub mod animation;
pub mod mesh;
pub mod modifier;
pub mod object;
pub mod shape_key;

pub use animation::{
    ActionCurve, ActionData, ActionId, AnimationData, Driver, DriverType, DriverVariable,
    TransformSpace, TransformType, VariableKind, VariableTarget,
};
pub use mesh::{MeshData, MeshId};
pub use modifier::{Modifier, ModifierKind};
pub use object::{ObjectData, ObjectId};
pub use shape_key::{KeyInterpolation, ShapeKey, ShapeKeyCollection, ShapeKeyId};

use crate::error::SceneError;
use slotmap::SlotMap;

/// Central arena that owns all scene entities.
///
/// Entities reference each other via typed IDs (generational indices),
/// avoiding self-referential structures and enabling safe mutation.
/// Every temporary entity a pipeline creates must be removed again before
/// the pipeline returns, or it lingers here as orphaned data.
#[derive(Debug, Default)]
pub struct SceneStore {
    objects: SlotMap<ObjectId, ObjectData>,
    meshes: SlotMap<MeshId, MeshData>,
    actions: SlotMap<ActionId, ActionData>,
}

impl SceneStore {
    /// Creates a new, empty scene store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // --- Object operations ---

    /// Inserts an object and returns its ID.
    pub fn add_object(&mut self, data: ObjectData) -> ObjectId {
        self.objects.insert(data)
    }

    /// Returns a reference to the object data, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity is not found in the store.
    pub fn object(&self, id: ObjectId) -> Result<&ObjectData, SceneError> {
        self.objects
            .get(id)
            .ok_or_else(|| SceneError::EntityNotFound("object".into()))
    }

    /// Returns a mutable reference to the object data, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity is not found in the store.
    pub fn object_mut(&mut self, id: ObjectId) -> Result<&mut ObjectData, SceneError> {
        self.objects
            .get_mut(id)
            .ok_or_else(|| SceneError::EntityNotFound("object".into()))
    }

    /// Removes an object, returning its data if it existed.
    pub fn remove_object(&mut self, id: ObjectId) -> Option<ObjectData> {
        self.objects.remove(id)
    }

    /// Number of live objects.
    #[must_use]
    pub fn object_count(&self) -> usize {
        self.objects.len()
    }

    // --- Mesh operations ---

    /// Inserts a geometry block and returns its ID.
    pub fn add_mesh(&mut self, data: MeshData) -> MeshId {
        self.meshes.insert(data)
    }

    /// Returns a reference to the mesh data, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity is not found in the store.
    pub fn mesh(&self, id: MeshId) -> Result<&MeshData, SceneError> {
        self.meshes
            .get(id)
            .ok_or_else(|| SceneError::EntityNotFound("mesh".into()))
    }

    /// Returns a mutable reference to the mesh data, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity is not found in the store.
    pub fn mesh_mut(&mut self, id: MeshId) -> Result<&mut MeshData, SceneError> {
        self.meshes
            .get_mut(id)
            .ok_or_else(|| SceneError::EntityNotFound("mesh".into()))
    }

    /// Removes a geometry block, returning its data if it existed.
    pub fn remove_mesh(&mut self, id: MeshId) -> Option<MeshData> {
        self.meshes.remove(id)
    }

    /// Number of live geometry blocks.
    #[must_use]
    pub fn mesh_count(&self) -> usize {
        self.meshes.len()
    }

    // --- Action operations ---

    /// Inserts an action and returns its ID.
    pub fn add_action(&mut self, data: ActionData) -> ActionId {
        self.actions.insert(data)
    }

    /// Returns a reference to the action data, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity is not found in the store.
    pub fn action(&self, id: ActionId) -> Result<&ActionData, SceneError> {
        self.actions
            .get(id)
            .ok_or_else(|| SceneError::EntityNotFound("action".into()))
    }

    // --- Lifetime helpers ---

    /// Deep-copies an object and its geometry block (shape keys and
    /// animation data included) and returns the copy's ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the object or its mesh is not found.
    pub fn duplicate_object(&mut self, id: ObjectId) -> Result<ObjectId, SceneError> {
        let mut copy = self.object(id)?.clone();
        let mut mesh_copy = self.mesh(copy.mesh)?.clone();
        copy.name = format!("{}.001", copy.name);
        mesh_copy.name = format!("{}.001", mesh_copy.name);
        copy.mesh = self.meshes.insert(mesh_copy);
        Ok(self.objects.insert(copy))
    }

    /// Removes an object together with its geometry block.
    ///
    /// # Errors
    ///
    /// Returns an error if the object is not found. A missing mesh is
    /// ignored; the object is removed regardless.
    pub fn release_object(&mut self, id: ObjectId) -> Result<(), SceneError> {
        let data = self
            .remove_object(id)
            .ok_or_else(|| SceneError::EntityNotFound("object".into()))?;
        self.meshes.remove(data.mesh);
        Ok(())
    }
}
