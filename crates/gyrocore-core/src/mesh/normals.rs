//! Area-weighted per-vertex normal estimation

use glam::Vec3;

/// Accumulate the non-normalised cross product of each triangle into
/// its three vertices, then normalise. A vertex with accumulated
/// length below `1e-8` is left at the zero vector (degenerate).
pub fn estimate_normals(positions: &[f32], indices: &[u32]) -> Vec<f32> {
    let vertex_count = positions.len() / 3;
    let mut accum = vec![Vec3::ZERO; vertex_count];

    for tri in indices.chunks(3) {
        let (i0, i1, i2) = (tri[0] as usize, tri[1] as usize, tri[2] as usize);
        let a = Vec3::new(positions[i0 * 3], positions[i0 * 3 + 1], positions[i0 * 3 + 2]);
        let b = Vec3::new(positions[i1 * 3], positions[i1 * 3 + 1], positions[i1 * 3 + 2]);
        let c = Vec3::new(positions[i2 * 3], positions[i2 * 3 + 1], positions[i2 * 3 + 2]);

        let face_normal = (b - a).cross(c - a);
        accum[i0] += face_normal;
        accum[i1] += face_normal;
        accum[i2] += face_normal;
    }

    let mut out = Vec::with_capacity(positions.len());
    for n in accum {
        let normalized = if n.length() < 1e-8 { Vec3::ZERO } else { n.normalize() };
        out.push(normalized.x);
        out.push(normalized.y);
        out.push(normalized.z);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unit_or_zero_length() {
        let positions = vec![0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0, -1.0, -1.0, 0.0];
        let indices = vec![0u32, 1, 2, 0, 2, 3];
        let normals = estimate_normals(&positions, &indices);
        for chunk in normals.chunks(3) {
            let len = (chunk[0] * chunk[0] + chunk[1] * chunk[1] + chunk[2] * chunk[2]).sqrt();
            assert!(len < 1e-6 || (len - 1.0).abs() < 1e-4);
        }
    }

    #[test]
    fn matches_positions_length() {
        let positions = vec![0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0];
        let indices = vec![0u32, 1, 2];
        let normals = estimate_normals(&positions, &indices);
        assert_eq!(normals.len(), positions.len());
    }

    #[test]
    fn isolated_vertex_is_zero() {
        // Vertex 3 is not referenced by any triangle.
        let positions = vec![0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 9.0, 9.0, 9.0];
        let indices = vec![0u32, 1, 2];
        let normals = estimate_normals(&positions, &indices);
        assert_eq!(&normals[9..12], &[0.0, 0.0, 0.0]);
    }
}
