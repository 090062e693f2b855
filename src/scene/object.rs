use super::mesh::MeshId;
use super::modifier::Modifier;

slotmap::new_key_type! {
    /// Unique identifier for an object in the scene store.
    pub struct ObjectId;
}

/// A scene entity owning one geometry block and an ordered modifier stack.
#[derive(Debug, Clone)]
pub struct ObjectData {
    pub name: String,
    /// The geometry block this object deforms and renders.
    pub mesh: MeshId,
    /// Ordered, named, independently toggleable modifier stack.
    pub modifiers: Vec<Modifier>,
    /// Host UI state: show only the active shape key, ignoring the blend.
    pub show_only_shape_key: bool,
    /// Host UI state: index of the active shape key in collection order.
    pub active_shape_key_index: usize,
}

impl ObjectData {
    /// Creates an object wrapping an existing geometry block.
    #[must_use]
    pub fn new(name: impl Into<String>, mesh: MeshId) -> Self {
        Self {
            name: name.into(),
            mesh,
            modifiers: Vec::new(),
            show_only_shape_key: false,
            active_shape_key_index: 0,
        }
    }

    /// Returns the modifier with the given name, if present.
    #[must_use]
    pub fn modifier(&self, name: &str) -> Option<&Modifier> {
        self.modifiers.iter().find(|m| m.name == name)
    }

    /// Returns a mutable reference to the modifier with the given name.
    pub fn modifier_mut(&mut self, name: &str) -> Option<&mut Modifier> {
        self.modifiers.iter_mut().find(|m| m.name == name)
    }

    /// Removes the named modifier from the stack, returning it if found.
    pub fn remove_modifier(&mut self, name: &str) -> Option<Modifier> {
        let idx = self.modifiers.iter().position(|m| m.name == name)?;
        Some(self.modifiers.remove(idx))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::Vector3;
    use crate::scene::modifier::{Modifier, ModifierKind};
    use slotmap::SlotMap;

    fn mesh_id() -> MeshId {
        let mut keys: SlotMap<MeshId, ()> = SlotMap::with_key();
        keys.insert(())
    }

    #[test]
    fn remove_modifier_keeps_stack_order() {
        let mut obj = ObjectData::new("Cube", mesh_id());
        obj.modifiers.push(Modifier::new(
            "A",
            ModifierKind::Displace {
                offset: Vector3::new(1.0, 0.0, 0.0),
            },
        ));
        obj.modifiers.push(Modifier::new("B", ModifierKind::Scale { factor: 2.0 }));
        obj.modifiers.push(Modifier::new("C", ModifierKind::Subdivide { levels: 1 }));

        let removed = obj.remove_modifier("B");
        assert!(removed.is_some());
        let names: Vec<&str> = obj.modifiers.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, ["A", "C"]);
        assert!(obj.remove_modifier("B").is_none());
    }
}
