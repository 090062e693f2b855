use crate::error::Result;
use crate::math::{Point3, Vector3, TOLERANCE};
use crate::scene::{MeshData, ModifierKind, ObjectData, ObjectId, SceneStore};

/// Evaluates an object through its visible modifier stack.
///
/// Stand-in for the host's dependency-graph evaluation: blends the shape
/// keys into a single set of positions (honoring mute, slider clamping and
/// the pin setting), then folds every `show_viewport` modifier over the
/// result in stack order. The evaluated block carries no shape keys and no
/// animation data.
///
/// # Errors
///
/// Returns an error if the object or its geometry block is not found.
pub fn evaluate_object(store: &SceneStore, object_id: ObjectId) -> Result<MeshData> {
    let object = store.object(object_id)?;
    let mesh = store.mesh(object.mesh)?;

    let vertices = blended_positions(object, mesh)?;
    let mut evaluated = MeshData::new(mesh.name.clone(), vertices, mesh.edges.clone());

    for modifier in &object.modifiers {
        if modifier.show_viewport {
            apply_modifier(&modifier.kind, &mut evaluated);
        }
    }
    Ok(evaluated)
}

/// Mixes the shape key collection down to one position per vertex.
///
/// With the pin setting on, the active key's positions are used directly;
/// otherwise each non-muted key contributes `w * (key - relative_key)` on
/// top of the Basis.
fn blended_positions(object: &ObjectData, mesh: &MeshData) -> Result<Vec<Point3>> {
    let Some(keys) = &mesh.shape_keys else {
        return Ok(mesh.vertices.clone());
    };
    let Some(basis_id) = keys.basis() else {
        return Ok(mesh.vertices.clone());
    };

    if object.show_only_shape_key {
        if let Some(&active) = keys.order().get(object.active_shape_key_index) {
            return Ok(keys.key(active)?.points.clone());
        }
    }

    let basis = keys.key(basis_id)?;
    let mut out = basis.points.clone();
    for (_, key) in keys.iter().skip(1) {
        if key.mute {
            continue;
        }
        let weight = key.effective_value();
        if weight.abs() < TOLERANCE {
            continue;
        }
        let relative = keys.key(key.relative_key.unwrap_or(basis_id))?;
        let n = out.len().min(key.points.len()).min(relative.points.len());
        for i in 0..n {
            out[i] += weight * (key.points[i] - relative.points[i]);
        }
    }
    Ok(out)
}

/// Applies one modifier's effect to a geometry block in place.
pub(crate) fn apply_modifier(kind: &ModifierKind, mesh: &mut MeshData) {
    match kind {
        ModifierKind::Displace { offset } => {
            for v in &mut mesh.vertices {
                *v += *offset;
            }
        }
        ModifierKind::Scale { factor } => {
            for v in &mut mesh.vertices {
                v.coords *= *factor;
            }
        }
        ModifierKind::Subdivide { levels } => {
            for _ in 0..*levels {
                subdivide_once(mesh);
            }
        }
        ModifierKind::Array { count, offset } => array(mesh, *count, *offset),
        ModifierKind::Weld { distance } => weld(mesh, *distance),
    }
}

/// Splits every edge at its midpoint. Midpoints are appended after the
/// existing vertices in edge order, so equal topologies subdivide to equal
/// vertex orderings regardless of positions.
fn subdivide_once(mesh: &mut MeshData) {
    let old_edges = std::mem::take(&mut mesh.edges);
    let mut edges = Vec::with_capacity(old_edges.len() * 2);
    for [a, b] in old_edges {
        let mid = Point3::from((mesh.vertices[a].coords + mesh.vertices[b].coords) * 0.5);
        let m = mesh.vertices.len();
        mesh.vertices.push(mid);
        edges.push([a, m]);
        edges.push([m, b]);
    }
    mesh.edges = edges;
}

/// Replicates the geometry `count` times, shifting each copy by `offset`.
#[allow(clippy::cast_possible_truncation)]
fn array(mesh: &mut MeshData, count: u32, offset: Vector3) {
    if count <= 1 {
        return;
    }
    let base_vertices = mesh.vertices.clone();
    let base_edges = mesh.edges.clone();
    let n = base_vertices.len();
    for rep in 1..count {
        let shift = offset * f64::from(rep);
        let start = n * rep as usize;
        mesh.vertices.extend(base_vertices.iter().map(|v| *v + shift));
        mesh.edges
            .extend(base_edges.iter().map(|&[a, b]| [a + start, b + start]));
    }
}

/// Merges vertices closer than `distance`, keeping the first occurrence.
/// Edges are remapped; degenerate edges are dropped.
fn weld(mesh: &mut MeshData, distance: f64) {
    let mut kept: Vec<Point3> = Vec::new();
    let mut remap = Vec::with_capacity(mesh.vertices.len());
    for v in &mesh.vertices {
        match kept.iter().position(|k| (*k - *v).norm() <= distance) {
            Some(i) => remap.push(i),
            None => {
                kept.push(*v);
                remap.push(kept.len() - 1);
            }
        }
    }
    mesh.vertices = kept;

    let old_edges = std::mem::take(&mut mesh.edges);
    let mut edges = Vec::with_capacity(old_edges.len());
    for [a, b] in old_edges {
        let (a, b) = (remap[a], remap[b]);
        if a != b {
            edges.push([a, b]);
        }
    }
    mesh.edges = edges;
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::scene::{Modifier, ObjectData};
    use approx::assert_relative_eq;

    fn line_mesh() -> MeshData {
        MeshData::new(
            "Line",
            vec![
                Point3::new(0.0, 0.0, 0.0),
                Point3::new(1.0, 0.0, 0.0),
                Point3::new(2.0, 0.0, 0.0),
            ],
            vec![[0, 1], [1, 2]],
        )
    }

    fn store_with(mesh: MeshData) -> (SceneStore, ObjectId) {
        let mut store = SceneStore::new();
        let mesh_id = store.add_mesh(mesh);
        let object = store.add_object(ObjectData::new("Line", mesh_id));
        (store, object)
    }

    #[test]
    fn blend_offsets_basis_by_weighted_delta() {
        let mut mesh = line_mesh();
        let basis = mesh.vertices.clone();
        let raised: Vec<Point3> = basis.iter().map(|v| Point3::new(v.x, v.y, v.z + 1.0)).collect();
        {
            let keys = mesh.shape_keys_or_default();
            keys.add_key("Basis", basis);
            let id = keys.add_key("Raise", raised);
            keys.key_mut(id).unwrap().value = 0.5;
        }

        let (store, object) = store_with(mesh);
        let evaluated = evaluate_object(&store, object).unwrap();
        for v in &evaluated.vertices {
            assert_relative_eq!(v.z, 0.5, epsilon = 1e-12);
        }
    }

    #[test]
    fn muted_keys_and_zero_weights_do_not_contribute() {
        let mut mesh = line_mesh();
        let basis = mesh.vertices.clone();
        let moved: Vec<Point3> = basis.iter().map(|v| Point3::new(v.x + 5.0, v.y, v.z)).collect();
        {
            let keys = mesh.shape_keys_or_default();
            keys.add_key("Basis", basis.clone());
            let muted = keys.add_key("Muted", moved.clone());
            keys.key_mut(muted).unwrap().value = 1.0;
            keys.key_mut(muted).unwrap().mute = true;
            let zero = keys.add_key("Zero", moved);
            keys.key_mut(zero).unwrap().value = 0.0;
        }
        let (store, object) = store_with(mesh);
        let evaluated = evaluate_object(&store, object).unwrap();
        for (v, b) in evaluated.vertices.iter().zip(&basis) {
            assert_relative_eq!(v.x, b.x, epsilon = 1e-12);
        }
    }

    #[test]
    fn pinned_object_uses_active_key_verbatim() {
        let mut mesh = line_mesh();
        let basis = mesh.vertices.clone();
        let moved: Vec<Point3> = basis.iter().map(|v| Point3::new(v.x, v.y + 3.0, v.z)).collect();
        {
            let keys = mesh.shape_keys_or_default();
            keys.add_key("Basis", basis);
            let id = keys.add_key("Moved", moved);
            // Value stays 0: pinning must bypass the blend entirely.
            keys.key_mut(id).unwrap().value = 0.0;
        }
        let (mut store, object) = store_with(mesh);
        {
            let obj = store.object_mut(object).unwrap();
            obj.show_only_shape_key = true;
            obj.active_shape_key_index = 1;
        }
        let evaluated = evaluate_object(&store, object).unwrap();
        for v in &evaluated.vertices {
            assert_relative_eq!(v.y, 3.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn subdivide_adds_one_vertex_per_edge() {
        let mut mesh = line_mesh();
        apply_modifier(&ModifierKind::Subdivide { levels: 1 }, &mut mesh);
        assert_eq!(mesh.vertex_count(), 5);
        assert_eq!(mesh.edges.len(), 4);
        // Midpoint of the first edge lands right after the original vertices.
        assert_relative_eq!(mesh.vertices[3].x, 0.5, epsilon = 1e-12);
    }

    #[test]
    fn array_replicates_with_offset() {
        let mut mesh = line_mesh();
        apply_modifier(
            &ModifierKind::Array {
                count: 3,
                offset: Vector3::new(10.0, 0.0, 0.0),
            },
            &mut mesh,
        );
        assert_eq!(mesh.vertex_count(), 9);
        assert_eq!(mesh.edges.len(), 6);
        assert_relative_eq!(mesh.vertices[6].x, 20.0, epsilon = 1e-12);
        assert_eq!(mesh.edges[4], [6, 7]);
    }

    #[test]
    fn weld_merges_only_close_vertices() {
        let mut mesh = MeshData::new(
            "Pair",
            vec![
                Point3::new(0.0, 0.0, 0.0),
                Point3::new(0.005, 0.0, 0.0),
                Point3::new(1.0, 0.0, 0.0),
            ],
            vec![[0, 1], [1, 2]],
        );
        apply_modifier(&ModifierKind::Weld { distance: 0.01 }, &mut mesh);
        assert_eq!(mesh.vertex_count(), 2);
        // The degenerate 0-1 edge is gone; 1-2 got remapped to 0-1.
        assert_eq!(mesh.edges, vec![[0, 1]]);
    }

    #[test]
    fn full_evaluation_folds_visible_modifiers_in_order() {
        let (mut store, object) = store_with(line_mesh());
        {
            let obj = store.object_mut(object).unwrap();
            obj.modifiers.push(Modifier::new(
                "Move",
                ModifierKind::Displace {
                    offset: Vector3::new(0.0, 0.0, 1.0),
                },
            ));
            obj.modifiers
                .push(Modifier::new("Double", ModifierKind::Scale { factor: 2.0 }));
            let mut hidden = Modifier::new(
                "Hidden",
                ModifierKind::Displace {
                    offset: Vector3::new(100.0, 0.0, 0.0),
                },
            );
            hidden.show_viewport = false;
            obj.modifiers.push(hidden);
        }
        let evaluated = evaluate_object(&store, object).unwrap();
        // Displace then scale: z = (0 + 1) * 2.
        assert_relative_eq!(evaluated.vertices[0].z, 2.0, epsilon = 1e-12);
        assert_relative_eq!(evaluated.vertices[2].x, 4.0, epsilon = 1e-12);
        assert!(evaluated.shape_keys.is_none());
    }
}
