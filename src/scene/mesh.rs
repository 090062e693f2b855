use super::shape_key::ShapeKeyCollection;
use crate::math::Point3;

slotmap::new_key_type! {
    /// Unique identifier for a geometry block in the scene store.
    pub struct MeshId;
}

/// A geometry block: vertices, edges, and an optional shape key collection.
///
/// Invariant: every shape key in `shape_keys` has exactly
/// `vertices.len()` points.
#[derive(Debug, Clone)]
pub struct MeshData {
    pub name: String,
    pub vertices: Vec<Point3>,
    /// Vertex-index pairs; drives subdivision.
    pub edges: Vec<[usize; 2]>,
    pub shape_keys: Option<ShapeKeyCollection>,
}

impl MeshData {
    /// Creates a geometry block without shape keys.
    #[must_use]
    pub fn new(name: impl Into<String>, vertices: Vec<Point3>, edges: Vec<[usize; 2]>) -> Self {
        Self {
            name: name.into(),
            vertices,
            edges,
            shape_keys: None,
        }
    }

    /// Number of vertices in the block.
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Returns the shape key collection, creating an empty one if absent.
    pub fn shape_keys_or_default(&mut self) -> &mut ShapeKeyCollection {
        self.shape_keys.get_or_insert_with(ShapeKeyCollection::new)
    }
}
