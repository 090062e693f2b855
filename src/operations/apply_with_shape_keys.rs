use std::collections::HashMap;

use tracing::debug;

use crate::error::{OperationError, Result};
use crate::operations::apply::apply_modifiers_to_object;
use crate::operations::relink::{
    relink_shape_key_action, restore_shape_key_drivers, snapshot_shape_key_drivers,
};
use crate::operations::snapshot::{restore_shape_keys, snapshot_shape_keys};
use crate::scene::{ObjectId, SceneStore, ShapeKeyCollection};

/// A shape key omitted from the result because its rebake changed the
/// vertex count.
#[derive(Debug, Clone)]
pub struct SkippedShape {
    pub name: String,
    pub expected: usize,
    pub actual: usize,
}

/// Outcome of a successful [`ApplyModifiersWithShapeKeys`] run.
///
/// A run that skipped individual shapes still counts as a success; the
/// skips are listed here and summarized by [`BakeReport::message`].
#[derive(Debug, Default)]
pub struct BakeReport {
    pub skipped: Vec<SkippedShape>,
}

impl BakeReport {
    /// True when every shape key survived the rebake.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.skipped.is_empty()
    }

    /// Human-readable warning naming every skipped shape, or `None` on a
    /// clean run.
    #[must_use]
    pub fn message(&self) -> Option<String> {
        if self.skipped.is_empty() {
            return None;
        }
        let names: Vec<&str> = self.skipped.iter().map(|s| s.name.as_str()).collect();
        Some(format!(
            "{} failed because the mesh no longer has the same number of vertices \
             after applying the selected modifier(s)",
            names.join(", ")
        ))
    }
}

/// Applies a subset of an object's modifiers while preserving its shape
/// keys, their settings, their drivers and their keyframe action.
///
/// The host refuses to apply modifiers on a keyed mesh, so the pipeline
/// reconstructs each shape by hand: bake the base mesh once, then rebake
/// every shape key on a disposable duplicate with that one key pinned,
/// and merge the frozen positions back in by vertex index. One duplicate
/// is alive at a time, and a shape whose bake drifts in vertex count is
/// skipped rather than aborting the run.
pub struct ApplyModifiersWithShapeKeys {
    object: ObjectId,
    selected: Vec<String>,
}

impl ApplyModifiersWithShapeKeys {
    /// Creates the operation for an object and an ordered list of
    /// modifier names to apply.
    #[must_use]
    pub fn new(object: ObjectId, selected: Vec<String>) -> Self {
        Self { object, selected }
    }

    /// Runs the pipeline, mutating the object in place.
    ///
    /// # Errors
    ///
    /// Returns an error if the object is missing, a selected modifier is
    /// not on the object, or the baseline (no shape keys) bake fails.
    /// Per-shape vertex-count mismatches are not errors; they surface in
    /// the returned [`BakeReport`].
    pub fn execute(&self, store: &mut SceneStore) -> Result<BakeReport> {
        let object = store.object(self.object)?;
        for name in &self.selected {
            if object.modifier(name).is_none() {
                return Err(OperationError::ModifierNotFound { name: name.clone() }.into());
            }
        }
        let mesh_id = object.mesh;
        let key_count = store
            .mesh(mesh_id)?
            .shape_keys
            .as_ref()
            .map_or(0, ShapeKeyCollection::len);

        // Baseline: nothing to reconstruct, bake the base mesh directly.
        if key_count <= 1 {
            if key_count == 1 {
                store.mesh_mut(mesh_id)?.shape_keys = None;
            }
            apply_modifiers_to_object(store, self.object, &self.selected)?;
            return Ok(BakeReport::default());
        }

        let (pin, active_index) = {
            let obj = store.object(self.object)?;
            (obj.show_only_shape_key, obj.active_shape_key_index)
        };

        // The reference duplicate keeps the keys, drivers and animation
        // alive through the destructive steps below.
        let reference = store.duplicate_object(self.object)?;
        let reference_mesh = store.object(reference)?.mesh;

        let settings = {
            let mesh = store.mesh(mesh_id)?;
            mesh.shape_keys.as_ref().map(snapshot_shape_keys).unwrap_or_default()
        };
        let saved_drivers = {
            let mesh = store.mesh(reference_mesh)?;
            mesh.shape_keys
                .as_ref()
                .map(snapshot_shape_key_drivers)
                .unwrap_or_default()
        };
        let basis_name = {
            let mesh = store.mesh(reference_mesh)?;
            let keys = mesh
                .shape_keys
                .as_ref()
                .ok_or_else(|| OperationError::InvalidInput("duplicate lost its shape keys".into()))?;
            let basis = keys
                .basis()
                .ok_or_else(|| OperationError::InvalidInput("shape key collection is empty".into()))?;
            keys.key(basis)?.name.clone()
        };

        // Drop all keys on the original and bake its base mesh.
        store.mesh_mut(mesh_id)?.shape_keys = None;
        apply_modifiers_to_object(store, self.object, &self.selected)?;

        // Baking swapped the geometry block; re-read it and seed the new
        // collection with the baked positions as the Basis.
        let baked_mesh = store.object(self.object)?.mesh;
        let baked_vertices = store.mesh(baked_mesh)?.vertices.clone();
        let baked_count = baked_vertices.len();
        store
            .mesh_mut(baked_mesh)?
            .shape_keys_or_default()
            .add_key(&basis_name, baked_vertices);

        let mut skipped = Vec::new();
        for (i, entry) in settings.iter().enumerate() {
            // One disposable duplicate per shape key; released before the
            // next iteration no matter what.
            let temp = store.duplicate_object(reference)?;
            {
                let obj = store.object_mut(temp)?;
                obj.show_only_shape_key = true;
                obj.active_shape_key_index = i + 1;
                for modifier in &mut obj.modifiers {
                    modifier.show_viewport = false;
                }
            }
            apply_modifiers_to_object(store, temp, &self.selected)?;

            let frozen = store.mesh(store.object(temp)?.mesh)?;
            if frozen.vertex_count() != baked_count {
                debug!(
                    shape_key = %entry.name,
                    expected = baked_count,
                    actual = frozen.vertex_count(),
                    "skipping shape key: vertex count changed under the modifier subset"
                );
                skipped.push(SkippedShape {
                    name: entry.name.clone(),
                    expected: baked_count,
                    actual: frozen.vertex_count(),
                });
                store.release_object(temp)?;
                continue;
            }

            // Merge by direct vertex-index correspondence.
            let points = frozen.vertices.clone();
            store
                .mesh_mut(baked_mesh)?
                .shape_keys_or_default()
                .add_key(&entry.name, points);
            store.release_object(temp)?;
        }

        // Restore once, after the whole loop.
        restore_shape_keys(store.mesh_mut(baked_mesh)?.shape_keys_or_default(), &settings)?;

        relink_shape_key_action(store, reference_mesh, baked_mesh)?;

        let remap: HashMap<ObjectId, ObjectId> = [(reference, self.object)].into_iter().collect();
        restore_shape_key_drivers(
            store.mesh_mut(baked_mesh)?.shape_keys_or_default(),
            &saved_drivers,
            &remap,
        );

        store.release_object(reference)?;

        let obj = store.object_mut(self.object)?;
        obj.show_only_shape_key = pin;
        obj.active_shape_key_index = active_index;

        Ok(BakeReport { skipped })
    }
}
