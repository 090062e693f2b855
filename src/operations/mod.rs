pub mod apply;
pub mod apply_with_shape_keys;
pub mod isolate;
pub mod relink;
pub mod snapshot;

pub use apply::apply_modifiers_to_object;
pub use apply_with_shape_keys::{ApplyModifiersWithShapeKeys, BakeReport, SkippedShape};
pub use isolate::{isolate_modifiers, restore_modifiers};
pub use relink::{
    relink_shape_key_action, restore_shape_key_drivers, snapshot_shape_key_drivers, SavedDriver,
};
pub use snapshot::{restore_shape_keys, snapshot_shape_keys, ShapeKeySettings};
