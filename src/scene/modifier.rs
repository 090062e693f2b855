use crate::math::Vector3;

/// A named, ordered, non-destructive geometry transformation step.
///
/// "Applying" a modifier bakes its effect permanently into the base mesh
/// and removes it from the stack.
#[derive(Debug, Clone)]
pub struct Modifier {
    pub name: String,
    pub kind: ModifierKind,
    /// Whether the modifier participates in mesh evaluation.
    pub show_viewport: bool,
}

impl Modifier {
    /// Creates a visible modifier.
    #[must_use]
    pub fn new(name: impl Into<String>, kind: ModifierKind) -> Self {
        Self {
            name: name.into(),
            kind,
            show_viewport: true,
        }
    }
}

/// The geometric effect of a modifier.
#[derive(Debug, Clone)]
pub enum ModifierKind {
    /// Translates every vertex by a fixed offset. Count-preserving.
    Displace { offset: Vector3 },
    /// Uniform scale about the origin. Count-preserving.
    Scale { factor: f64 },
    /// Edge-midpoint subdivision; grows the vertex count deterministically.
    Subdivide { levels: u32 },
    /// Replicates the geometry `count` times along an offset.
    Array { count: u32, offset: Vector3 },
    /// Merges vertices closer than `distance`. The resulting vertex count
    /// depends on positions, so different shapes of one mesh can bake to
    /// different counts.
    Weld { distance: f64 },
}
