use super::object::ObjectId;

slotmap::new_key_type! {
    /// Unique identifier for a keyframe action in the scene store.
    pub struct ActionId;
}

/// A keyframed action: named curves over scene properties.
#[derive(Debug, Clone)]
pub struct ActionData {
    pub name: String,
    pub curves: Vec<ActionCurve>,
}

/// One keyframed curve inside an action.
#[derive(Debug, Clone, PartialEq)]
pub struct ActionCurve {
    /// Path of the driven property, e.g. `key_blocks["Smile"].value`.
    pub data_path: String,
    /// `(frame, value)` pairs in frame order.
    pub keyframes: Vec<(f64, f64)>,
}

/// Animation data owned by a shape key collection.
#[derive(Debug, Clone, Default)]
pub struct AnimationData {
    /// Procedural bindings onto scalar shape-key properties.
    pub drivers: Vec<Driver>,
    /// Keyframe action attached to the collection, if any.
    pub action: Option<ActionId>,
    /// Action slot handle, on hosts that bind actions through slots.
    pub action_slot: Option<u32>,
}

impl AnimationData {
    /// Creates empty animation data.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

/// A procedural binding from external data sources to one scalar property.
#[derive(Debug, Clone)]
pub struct Driver {
    /// Path of the driven property, e.g. `key_blocks["Smile"].value`.
    pub data_path: String,
    pub driver_type: DriverType,
    /// Expression evaluated for [`DriverType::Scripted`]; empty otherwise.
    pub expression: String,
    pub variables: Vec<DriverVariable>,
}

/// How a driver combines its variables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DriverType {
    #[default]
    Average,
    Sum,
    Min,
    Max,
    Scripted,
}

/// One named input of a driver.
#[derive(Debug, Clone)]
pub struct DriverVariable {
    pub name: String,
    pub kind: VariableKind,
    pub targets: Vec<VariableTarget>,
}

/// What a driver variable samples.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VariableKind {
    #[default]
    SingleProp,
    Transforms,
    RotationDiff,
    LocationDiff,
}

/// One sampling target of a driver variable.
#[derive(Debug, Clone, Default)]
pub struct VariableTarget {
    /// Object the sample is read from. Rewritten during relink when it
    /// points at a temporary duplicate.
    pub object: Option<ObjectId>,
    pub data_path: String,
    pub bone_target: String,
    pub transform_type: TransformType,
    pub transform_space: TransformSpace,
}

/// Transform channel sampled by [`VariableKind::Transforms`] variables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TransformType {
    #[default]
    LocX,
    LocY,
    LocZ,
    RotX,
    RotY,
    RotZ,
    ScaleX,
    ScaleY,
    ScaleZ,
}

/// Space the transform channel is sampled in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TransformSpace {
    #[default]
    World,
    Transform,
    Local,
}
