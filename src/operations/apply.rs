use crate::error::{OperationError, Result};
use crate::eval::evaluate_object;
use crate::operations::isolate::{isolate_modifiers, restore_modifiers};
use crate::scene::{ObjectId, SceneStore};

/// Bakes the selected modifiers into an object's geometry block.
///
/// Isolates the stack to the selected subset, evaluates the object, swaps
/// the evaluated block in for the old one (the new block inherits the old
/// block's name and the old one is removed from the store), deletes the
/// now-baked-in modifiers from the stack and restores the visibility of
/// whatever the isolation step disabled.
///
/// Vertex-count drift between separate bakes of the same stack is not
/// detected here; callers needing index correspondence check it themselves.
///
/// # Errors
///
/// Returns [`OperationError::ModifierNotFound`] if a selected modifier is
/// not on the object, or a scene error if the object or mesh is missing.
pub fn apply_modifiers_to_object(
    store: &mut SceneStore,
    object_id: ObjectId,
    selected: &[String],
) -> Result<()> {
    {
        let object = store.object(object_id)?;
        for name in selected {
            if object.modifier(name).is_none() {
                return Err(OperationError::ModifierNotFound { name: name.clone() }.into());
            }
        }
    }

    let disabled = {
        let object = store.object_mut(object_id)?;
        let disabled = isolate_modifiers(object, selected);
        // The subset itself may have been hidden by the caller.
        for name in selected {
            if let Some(modifier) = object.modifier_mut(name) {
                modifier.show_viewport = true;
            }
        }
        disabled
    };

    let evaluated = evaluate_object(store, object_id)?;

    let old_mesh_id = store.object(object_id)?.mesh;
    let new_mesh_id = store.add_mesh(evaluated);
    store.object_mut(object_id)?.mesh = new_mesh_id;
    store.remove_mesh(old_mesh_id);

    let object = store.object_mut(object_id)?;
    for name in selected {
        object.remove_modifier(name);
    }
    restore_modifiers(object, &disabled);
    Ok(())
}
