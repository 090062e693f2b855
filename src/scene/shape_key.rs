use slotmap::SlotMap;

use super::animation::AnimationData;
use crate::error::SceneError;
use crate::math::Point3;

slotmap::new_key_type! {
    /// Unique identifier for a shape key within its collection.
    pub struct ShapeKeyId;
}

/// Blend interpolation mode for a shape key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum KeyInterpolation {
    #[default]
    Linear,
    Cardinal,
    CatmullRom,
    BSpline,
}

/// A named per-vertex morph target blended against a base mesh.
#[derive(Debug, Clone)]
pub struct ShapeKey {
    pub name: String,
    /// Absolute per-vertex positions; same length as the Basis and the
    /// owning geometry block.
    pub points: Vec<Point3>,
    pub value: f64,
    pub slider_min: f64,
    pub slider_max: f64,
    pub mute: bool,
    /// Optional vertex-group mask name limiting the key's influence.
    pub vertex_group: Option<String>,
    /// Key this one blends relative to; `None` means the Basis.
    pub relative_key: Option<ShapeKeyId>,
    pub interpolation: KeyInterpolation,
}

impl ShapeKey {
    fn new(name: String, points: Vec<Point3>) -> Self {
        Self {
            name,
            points,
            value: 0.0,
            slider_min: 0.0,
            slider_max: 1.0,
            mute: false,
            vertex_group: None,
            relative_key: None,
            interpolation: KeyInterpolation::default(),
        }
    }

    /// Blend weight after clamping to the slider range.
    #[must_use]
    pub fn effective_value(&self) -> f64 {
        self.value.clamp(self.slider_min, self.slider_max)
    }
}

/// Ordered collection of shape keys attached to a geometry block.
///
/// Index 0 of the order is the Basis (reference pose); indices >= 1 are
/// deltas against their relative key. Keys are owned by a slotmap so
/// cross-references ([`ShapeKey::relative_key`], driver bindings) survive
/// renames; name lookup is confined to the external boundary.
#[derive(Debug, Clone, Default)]
pub struct ShapeKeyCollection {
    keys: SlotMap<ShapeKeyId, ShapeKey>,
    order: Vec<ShapeKeyId>,
    /// Animation data owned by the collection (drivers + keyframe action).
    pub animation: Option<AnimationData>,
}

impl ShapeKeyCollection {
    /// Creates a new, empty collection.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a shape key and returns its ID.
    ///
    /// A clashing name gets a numeric `.001`-style suffix so names stay
    /// unique within the collection.
    pub fn add_key(&mut self, name: &str, points: Vec<Point3>) -> ShapeKeyId {
        let name = self.unique_name(name);
        let id = self.keys.insert(ShapeKey::new(name, points));
        self.order.push(id);
        id
    }

    /// Returns a reference to the shape key, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is not in the collection.
    pub fn key(&self, id: ShapeKeyId) -> Result<&ShapeKey, SceneError> {
        self.keys
            .get(id)
            .ok_or_else(|| SceneError::EntityNotFound("shape key".into()))
    }

    /// Returns a mutable reference to the shape key, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is not in the collection.
    pub fn key_mut(&mut self, id: ShapeKeyId) -> Result<&mut ShapeKey, SceneError> {
        self.keys
            .get_mut(id)
            .ok_or_else(|| SceneError::EntityNotFound("shape key".into()))
    }

    /// Looks a key up by name.
    #[must_use]
    pub fn key_by_name(&self, name: &str) -> Option<ShapeKeyId> {
        self.order
            .iter()
            .copied()
            .find(|&id| self.keys.get(id).is_some_and(|k| k.name == name))
    }

    /// Collection order; index 0 is the Basis.
    #[must_use]
    pub fn order(&self) -> &[ShapeKeyId] {
        &self.order
    }

    /// The Basis key, if the collection is non-empty.
    #[must_use]
    pub fn basis(&self) -> Option<ShapeKeyId> {
        self.order.first().copied()
    }

    /// Number of keys, Basis included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Iterates keys in collection order.
    pub fn iter(&self) -> impl Iterator<Item = (ShapeKeyId, &ShapeKey)> {
        self.order
            .iter()
            .filter_map(|&id| self.keys.get(id).map(|k| (id, k)))
    }

    fn unique_name(&self, base: &str) -> String {
        if self.key_by_name(base).is_none() {
            return base.to_string();
        }
        let mut n = 1;
        loop {
            let candidate = format!("{base}.{n:03}");
            if self.key_by_name(&candidate).is_none() {
                return candidate;
            }
            n += 1;
        }
    }
}
