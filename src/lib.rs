pub mod error;
pub mod eval;
pub mod math;
pub mod operations;
pub mod scene;

pub use error::{Result, ShapeBakeError};
pub use operations::apply_with_shape_keys::{ApplyModifiersWithShapeKeys, BakeReport};
