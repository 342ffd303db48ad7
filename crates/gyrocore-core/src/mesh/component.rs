//! Largest-connected-component extraction
//!
//! Builds vertex→face adjacency and flood-fills the face graph (two
//! faces are neighbours iff they share at least one vertex) to find
//! connected components, keeping the one with the most faces. Applied
//! only in Shell mode; in Frame mode the beam network and the gyroid
//! wall are legitimately separate components.

use std::collections::VecDeque;

use super::marching_cubes::Triangulation;

/// Skip extraction below this face count (too few faces for the
/// distinction to matter, and noisy on tiny test fixtures).
const MIN_FACES_FOR_EXTRACTION: usize = 100;

/// Keep only the largest connected component of the triangle mesh,
/// compacting vertices and remapping indices while preserving winding.
pub fn keep_largest_component(positions: &[f32], indices: &[u32]) -> (Vec<f32>, Vec<u32>) {
    let face_count = indices.len() / 3;
    if face_count < MIN_FACES_FOR_EXTRACTION {
        return (positions.to_vec(), indices.to_vec());
    }

    let vertex_count = positions.len() / 3;

    // vertex -> faces incident to it
    let mut vertex_faces: Vec<Vec<u32>> = vec![Vec::new(); vertex_count];
    for (face_idx, tri) in indices.chunks(3).enumerate() {
        for &v in tri {
            vertex_faces[v as usize].push(face_idx as u32);
        }
    }

    let mut face_component = vec![u32::MAX; face_count];
    let mut component_sizes: Vec<usize> = Vec::new();

    for start_face in 0..face_count {
        if face_component[start_face] != u32::MAX {
            continue;
        }
        let component_id = component_sizes.len() as u32;
        let mut size = 0usize;
        let mut queue = VecDeque::new();
        queue.push_back(start_face as u32);
        face_component[start_face as usize] = component_id;

        while let Some(face) = queue.pop_front() {
            size += 1;
            for &v in &indices[face as usize * 3..face as usize * 3 + 3] {
                for &neighbour in &vertex_faces[v as usize] {
                    if face_component[neighbour as usize] == u32::MAX {
                        face_component[neighbour as usize] = component_id;
                        queue.push_back(neighbour);
                    }
                }
            }
        }

        component_sizes.push(size);
    }

    let largest = component_sizes
        .iter()
        .enumerate()
        .max_by_key(|&(_, &size)| size)
        .map(|(id, _)| id as u32)
        .unwrap_or(0);

    tracing::debug!(
        components = component_sizes.len(),
        kept_faces = component_sizes.get(largest as usize).copied().unwrap_or(0),
        "component extraction"
    );

    let mut remap = vec![u32::MAX; vertex_count];
    let mut new_positions = Vec::new();
    let mut new_indices = Vec::with_capacity(component_sizes[largest as usize] * 3);

    for (face_idx, tri) in indices.chunks(3).enumerate() {
        if face_component[face_idx] != largest {
            continue;
        }
        for &v in tri {
            let vi = v as usize;
            if remap[vi] == u32::MAX {
                remap[vi] = (new_positions.len() / 3) as u32;
                new_positions.push(positions[vi * 3]);
                new_positions.push(positions[vi * 3 + 1]);
                new_positions.push(positions[vi * 3 + 2]);
            }
            new_indices.push(remap[vi]);
        }
    }

    (new_positions, new_indices)
}

/// Extend a [`Triangulation`] in place, if extraction applies.
pub fn apply(tri: Triangulation) -> Triangulation {
    let (positions, indices) = keep_largest_component(&tri.positions, &tri.indices);
    Triangulation { positions, indices }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_disjoint_triangles_plus_padding() -> (Vec<f32>, Vec<u32>) {
        // Component A: a fan of 40 triangles sharing vertex 0 (enough
        // faces to clear MIN_FACES_FOR_EXTRACTION together with B).
        let mut positions = vec![0.0f32, 0.0, 0.0];
        let mut indices = Vec::new();
        for i in 0..60u32 {
            let a = positions.len() as u32 / 3;
            positions.extend_from_slice(&[i as f32, 1.0, 0.0]);
            positions.extend_from_slice(&[i as f32, 0.0, 1.0]);
            indices.extend_from_slice(&[0, a, a + 1]);
        }

        // Component B: a single disconnected triangle, far away.
        let b0 = positions.len() as u32 / 3;
        positions.extend_from_slice(&[1000.0, 0.0, 0.0]);
        positions.extend_from_slice(&[1001.0, 0.0, 0.0]);
        positions.extend_from_slice(&[1000.0, 1.0, 0.0]);
        indices.extend_from_slice(&[b0, b0 + 1, b0 + 2]);

        (positions, indices)
    }

    #[test]
    fn keeps_largest_component_only() {
        let (positions, indices) = two_disjoint_triangles_plus_padding();
        let total_faces_before = indices.len() / 3;
        let (_new_positions, new_indices) = keep_largest_component(&positions, &indices);
        let faces_after = new_indices.len() / 3;
        assert!(faces_after < total_faces_before);
        assert_eq!(faces_after, 60);
    }

    #[test]
    fn skips_extraction_below_face_threshold() {
        let positions = vec![0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0];
        let indices = vec![0u32, 1, 2];
        let (new_positions, new_indices) = keep_largest_component(&positions, &indices);
        assert_eq!(new_positions, positions);
        assert_eq!(new_indices, indices);
    }
}
