use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;
use tracing::{debug, warn};

use crate::error::Result;
use crate::scene::{AnimationData, Driver, MeshId, ObjectId, SceneStore, ShapeKeyCollection};

/// Driver data paths look like `key_blocks["Smile"].value`.
#[allow(clippy::expect_used)]
static SHAPE_KEY_PATH: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"^key_blocks\["(.+?)"\]\.([A-Za-z_]+)$"#).expect("pattern is valid")
});

/// Scalar shape-key properties a driver may bind to.
const DRIVABLE_PROPERTIES: &[&str] = &["value", "slider_min", "slider_max", "mute"];

/// One driver captured before the shape keys it targets are destroyed.
#[derive(Debug, Clone)]
pub struct SavedDriver {
    /// Shape key name parsed out of the driver's data path.
    pub key_name: String,
    /// Driven property name, e.g. `value` or `slider_min`.
    pub property: String,
    pub driver: Driver,
}

/// Captures every driver bound to a shape-key property, in driver order.
///
/// Drivers whose data path does not name a shape key are left alone; they
/// belong to whatever else the animation data drives.
#[must_use]
pub fn snapshot_shape_key_drivers(collection: &ShapeKeyCollection) -> Vec<SavedDriver> {
    let Some(animation) = &collection.animation else {
        return Vec::new();
    };
    let mut saved = Vec::new();
    for driver in &animation.drivers {
        let Some((key_name, property)) = parse_shape_key_path(&driver.data_path) else {
            continue;
        };
        saved.push(SavedDriver {
            key_name,
            property,
            driver: driver.clone(),
        });
    }
    saved
}

fn parse_shape_key_path(path: &str) -> Option<(String, String)> {
    let caps = SHAPE_KEY_PATH.captures(path)?;
    Some((caps.get(1)?.as_str().to_string(), caps.get(2)?.as_str().to_string()))
}

/// Recreates captured drivers on a rebuilt shape key collection.
///
/// Each driver is re-pointed at the same-named key, copying type,
/// expression and every variable. `remap` is the object-identity
/// substitution applied to variable targets, re-pointing self-references
/// that went through a temporary duplicate back at the original object.
///
/// Failures are per-driver and silent to the caller: a driver whose key
/// is gone or whose property is not drivable is logged and skipped.
pub fn restore_shape_key_drivers(
    collection: &mut ShapeKeyCollection,
    saved: &[SavedDriver],
    remap: &HashMap<ObjectId, ObjectId>,
) {
    for entry in saved {
        if collection.key_by_name(&entry.key_name).is_none() {
            debug!(
                shape_key = %entry.key_name,
                "dropping driver: shape key no longer exists"
            );
            continue;
        }
        if !DRIVABLE_PROPERTIES.contains(&entry.property.as_str()) {
            warn!(
                shape_key = %entry.key_name,
                property = %entry.property,
                "failed to restore driver: property is not drivable"
            );
            continue;
        }

        let mut driver = entry.driver.clone();
        driver.data_path = format!("key_blocks[\"{}\"].{}", entry.key_name, entry.property);
        for variable in &mut driver.variables {
            for target in &mut variable.targets {
                if let Some(replacement) = target.object.and_then(|o| remap.get(&o)) {
                    target.object = Some(*replacement);
                }
            }
        }
        collection
            .animation
            .get_or_insert_with(AnimationData::new)
            .drivers
            .push(driver);
    }
}

/// Attaches the source collection's keyframe action (and action slot) to
/// the target mesh's shape keys, creating animation data if absent.
///
/// A no-op if the source has no animation data or no action.
///
/// # Errors
///
/// Returns an error if either mesh is not found.
pub fn relink_shape_key_action(
    store: &mut SceneStore,
    source_mesh: MeshId,
    target_mesh: MeshId,
) -> Result<()> {
    let source = store.mesh(source_mesh)?;
    let Some((action, slot)) = source
        .shape_keys
        .as_ref()
        .and_then(|keys| keys.animation.as_ref())
        .map(|anim| (anim.action, anim.action_slot))
    else {
        return Ok(());
    };
    let Some(action) = action else {
        return Ok(());
    };

    let target = store.mesh_mut(target_mesh)?;
    let Some(keys) = target.shape_keys.as_mut() else {
        return Ok(());
    };
    let animation = keys.animation.get_or_insert_with(AnimationData::new);
    animation.action = Some(action);
    animation.action_slot = slot;
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::math::Point3;
    use crate::scene::{
        ActionData, DriverType, DriverVariable, MeshData, ObjectData, VariableKind, VariableTarget,
    };

    fn collection(names: &[&str]) -> ShapeKeyCollection {
        let mut col = ShapeKeyCollection::new();
        col.add_key("Basis", vec![Point3::origin()]);
        for name in names {
            col.add_key(name, vec![Point3::origin()]);
        }
        col
    }

    fn scripted_driver(path: &str, target_object: Option<ObjectId>) -> Driver {
        Driver {
            data_path: path.to_string(),
            driver_type: DriverType::Scripted,
            expression: "var * 2".to_string(),
            variables: vec![DriverVariable {
                name: "var".to_string(),
                kind: VariableKind::SingleProp,
                targets: vec![VariableTarget {
                    object: target_object,
                    data_path: "location.x".to_string(),
                    ..VariableTarget::default()
                }],
            }],
        }
    }

    #[test]
    fn snapshot_keeps_shape_key_drivers_only() {
        let mut col = collection(&["Smile"]);
        let anim = col.animation.get_or_insert_with(AnimationData::new);
        anim.drivers.push(scripted_driver("key_blocks[\"Smile\"].value", None));
        anim.drivers.push(scripted_driver("eval_time", None));

        let saved = snapshot_shape_key_drivers(&col);
        assert_eq!(saved.len(), 1);
        assert_eq!(saved[0].key_name, "Smile");
        assert_eq!(saved[0].property, "value");
    }

    #[test]
    fn snapshot_handles_awkward_key_names() {
        let mut col = collection(&["Mouth.Corner L"]);
        col.animation
            .get_or_insert_with(AnimationData::new)
            .drivers
            .push(scripted_driver("key_blocks[\"Mouth.Corner L\"].slider_min", None));

        let saved = snapshot_shape_key_drivers(&col);
        assert_eq!(saved.len(), 1);
        assert_eq!(saved[0].key_name, "Mouth.Corner L");
        assert_eq!(saved[0].property, "slider_min");
    }

    #[test]
    fn restore_rewrites_duplicate_references() {
        let mut store = SceneStore::new();
        let mesh = store.add_mesh(MeshData::new("M", vec![Point3::origin()], vec![]));
        let original = store.add_object(ObjectData::new("Orig", mesh));
        let duplicate = store.duplicate_object(original).unwrap();

        let source = {
            let mut col = collection(&["Smile"]);
            col.animation
                .get_or_insert_with(AnimationData::new)
                .drivers
                .push(scripted_driver("key_blocks[\"Smile\"].value", Some(duplicate)));
            col
        };
        let saved = snapshot_shape_key_drivers(&source);

        let mut rebuilt = collection(&["Smile"]);
        let remap: HashMap<ObjectId, ObjectId> = [(duplicate, original)].into_iter().collect();
        restore_shape_key_drivers(&mut rebuilt, &saved, &remap);

        let drivers = &rebuilt.animation.as_ref().unwrap().drivers;
        assert_eq!(drivers.len(), 1);
        assert_eq!(drivers[0].driver_type, DriverType::Scripted);
        assert_eq!(drivers[0].expression, "var * 2");
        assert_eq!(drivers[0].variables.len(), 1);
        assert_eq!(drivers[0].variables[0].targets[0].object, Some(original));
    }

    #[test]
    fn restore_skips_missing_keys_and_bad_properties() {
        let source = {
            let mut col = collection(&["Gone", "Kept"]);
            let anim = col.animation.get_or_insert_with(AnimationData::new);
            anim.drivers.push(scripted_driver("key_blocks[\"Gone\"].value", None));
            anim.drivers.push(scripted_driver("key_blocks[\"Kept\"].points", None));
            anim.drivers.push(scripted_driver("key_blocks[\"Kept\"].slider_max", None));
            col
        };
        let saved = snapshot_shape_key_drivers(&source);
        assert_eq!(saved.len(), 3);

        let mut rebuilt = collection(&["Kept"]);
        restore_shape_key_drivers(&mut rebuilt, &saved, &HashMap::new());
        let drivers = &rebuilt.animation.as_ref().unwrap().drivers;
        assert_eq!(drivers.len(), 1);
        assert_eq!(drivers[0].data_path, "key_blocks[\"Kept\"].slider_max");
    }

    #[test]
    fn action_relink_copies_action_and_slot() {
        let mut store = SceneStore::new();
        let action = store.add_action(ActionData {
            name: "KeyAction".to_string(),
            curves: vec![],
        });

        let mut source_mesh = MeshData::new("Src", vec![Point3::origin()], vec![]);
        {
            let keys = source_mesh.shape_keys_or_default();
            keys.add_key("Basis", vec![Point3::origin()]);
            let anim = keys.animation.get_or_insert_with(AnimationData::new);
            anim.action = Some(action);
            anim.action_slot = Some(4);
        }
        let source = store.add_mesh(source_mesh);

        let mut target_mesh = MeshData::new("Dst", vec![Point3::origin()], vec![]);
        target_mesh.shape_keys_or_default().add_key("Basis", vec![Point3::origin()]);
        let target = store.add_mesh(target_mesh);

        relink_shape_key_action(&mut store, source, target).unwrap();

        let keys = store.mesh(target).unwrap().shape_keys.as_ref().unwrap();
        let anim = keys.animation.as_ref().unwrap();
        assert_eq!(anim.action, Some(action));
        assert_eq!(anim.action_slot, Some(4));
    }

    #[test]
    fn action_relink_without_action_is_a_no_op() {
        let mut store = SceneStore::new();
        let mut source_mesh = MeshData::new("Src", vec![Point3::origin()], vec![]);
        source_mesh.shape_keys_or_default().add_key("Basis", vec![Point3::origin()]);
        let source = store.add_mesh(source_mesh);

        let mut target_mesh = MeshData::new("Dst", vec![Point3::origin()], vec![]);
        target_mesh.shape_keys_or_default().add_key("Basis", vec![Point3::origin()]);
        let target = store.add_mesh(target_mesh);

        relink_shape_key_action(&mut store, source, target).unwrap();
        let keys = store.mesh(target).unwrap().shape_keys.as_ref().unwrap();
        assert!(keys.animation.is_none());
    }
}
