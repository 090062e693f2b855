use crate::scene::ObjectData;

/// Disables every visible modifier whose name is not in `selected`.
///
/// Returns exactly the names it disabled, so [`restore_modifiers`] can
/// re-enable those and leave unrelated, already-disabled modifiers
/// untouched. A no-op if visibility already matches the subset.
pub fn isolate_modifiers(object: &mut ObjectData, selected: &[String]) -> Vec<String> {
    let mut disabled = Vec::new();
    for modifier in &mut object.modifiers {
        if modifier.show_viewport && !selected.iter().any(|s| *s == modifier.name) {
            modifier.show_viewport = false;
            disabled.push(modifier.name.clone());
        }
    }
    disabled
}

/// Re-enables the modifiers previously disabled by [`isolate_modifiers`].
pub fn restore_modifiers(object: &mut ObjectData, disabled: &[String]) {
    for name in disabled {
        if let Some(modifier) = object.modifier_mut(name) {
            modifier.show_viewport = true;
        }
    }
}
