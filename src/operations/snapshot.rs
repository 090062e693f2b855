use crate::error::{OperationError, Result};
use crate::scene::{KeyInterpolation, ShapeKeyCollection, ShapeKeyId};

/// Writable scalar properties of one shape key, keyed by its name.
#[derive(Debug, Clone)]
pub struct ShapeKeySettings {
    pub name: String,
    pub value: f64,
    pub slider_min: f64,
    pub slider_max: f64,
    pub mute: bool,
    pub vertex_group: Option<String>,
    /// Relative key captured by name; resolved back to an ID on restore.
    pub relative_key: Option<String>,
    pub interpolation: KeyInterpolation,
}

/// Captures the settings of every non-Basis key, in collection order.
#[must_use]
pub fn snapshot_shape_keys(collection: &ShapeKeyCollection) -> Vec<ShapeKeySettings> {
    collection
        .iter()
        .skip(1)
        .map(|(_, key)| ShapeKeySettings {
            name: key.name.clone(),
            value: key.value,
            slider_min: key.slider_min,
            slider_max: key.slider_max,
            mute: key.mute,
            vertex_group: key.vertex_group.clone(),
            relative_key: key
                .relative_key
                .and_then(|id| collection.key(id).ok())
                .map(|k| k.name.clone()),
            interpolation: key.interpolation,
        })
        .collect()
}

/// Reassigns captured settings onto a rebuilt collection.
///
/// Walks the collection's non-Basis keys in order and matches snapshot
/// entries by name without ever stepping backwards, so a rebuilt
/// collection that omits some keys (skipped rebakes) still restores
/// cleanly, while a reordered or renamed collection is rejected instead
/// of silently misapplying values.
///
/// # Errors
///
/// Returns [`OperationError::SnapshotMismatch`] naming the first key that
/// has no snapshot entry at or after the current position.
pub fn restore_shape_keys(
    collection: &mut ShapeKeyCollection,
    snapshot: &[ShapeKeySettings],
) -> Result<()> {
    let order: Vec<ShapeKeyId> = collection.order().iter().skip(1).copied().collect();
    let mut cursor = 0;
    for id in order {
        let name = collection.key(id)?.name.clone();
        let offset = snapshot[cursor..]
            .iter()
            .position(|entry| entry.name == name)
            .ok_or_else(|| OperationError::SnapshotMismatch { name: name.clone() })?;
        let entry = &snapshot[cursor + offset];
        cursor += offset + 1;

        let relative = entry
            .relative_key
            .as_deref()
            .and_then(|n| collection.key_by_name(n));
        let key = collection.key_mut(id)?;
        key.value = entry.value;
        key.slider_min = entry.slider_min;
        key.slider_max = entry.slider_max;
        key.mute = entry.mute;
        key.vertex_group = entry.vertex_group.clone();
        key.relative_key = relative;
        key.interpolation = entry.interpolation;
    }
    Ok(())
}
