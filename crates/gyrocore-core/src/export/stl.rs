//! Binary STL export
//!
//! STL (stereolithography) is the de facto mesh interchange format for
//! 3D printing. This implementation emits binary STL directly into an
//! in-memory buffer — there is no I/O inside the core; the caller
//! decides where the bytes go.
//!
//! Binary STL layout:
//! - 80 bytes: header (zeroed)
//! - 4 bytes: triangle count (u32 little-endian)
//! - per triangle (50 bytes): face normal (3x f32 LE), three vertices
//!   (3x f32 LE each), 2-byte attribute count (always 0)

use crate::mesh::MeshData;
use glam::Vec3;

/// De-index `mesh` into a triangle soup and encode it as binary STL.
/// The face normal is recomputed from the positions (not interpolated
/// from the vertex normals); a zero-area triangle emits a zero normal.
pub fn export_stl(mesh: &MeshData) -> Vec<u8> {
    let triangle_count = mesh.triangle_count();
    let mut buf = Vec::with_capacity(84 + triangle_count * 50);

    // 80-byte header, zeroed.
    buf.extend_from_slice(&[0u8; 80]);
    buf.extend_from_slice(&(triangle_count as u32).to_le_bytes());

    for tri in mesh.indices.chunks(3) {
        let v0 = vertex(mesh, tri[0]);
        let v1 = vertex(mesh, tri[1]);
        let v2 = vertex(mesh, tri[2]);

        let normal = (v1 - v0).cross(v2 - v0).normalize_or_zero();

        write_vec3(&mut buf, normal);
        write_vec3(&mut buf, v0);
        write_vec3(&mut buf, v1);
        write_vec3(&mut buf, v2);
        buf.extend_from_slice(&0u16.to_le_bytes());
    }

    buf
}

#[inline]
fn vertex(mesh: &MeshData, index: u32) -> Vec3 {
    let i = index as usize * 3;
    Vec3::new(mesh.positions[i], mesh.positions[i + 1], mesh.positions[i + 2])
}

#[inline]
fn write_vec3(buf: &mut Vec<u8>, v: Vec3) {
    buf.extend_from_slice(&v.x.to_le_bytes());
    buf.extend_from_slice(&v.y.to_le_bytes());
    buf.extend_from_slice(&v.z.to_le_bytes());
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triangle_mesh() -> MeshData {
        MeshData {
            positions: vec![0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0],
            normals: vec![0.0, 0.0, 1.0, 0.0, 0.0, 1.0, 0.0, 0.0, 1.0],
            indices: vec![0, 1, 2],
        }
    }

    #[test]
    fn single_triangle_byte_size() {
        let mesh = triangle_mesh();
        let bytes = export_stl(&mesh);
        assert_eq!(bytes.len(), 84 + 50);
    }

    #[test]
    fn triangle_count_round_trips() {
        let mesh = triangle_mesh();
        let bytes = export_stl(&mesh);
        let count = u32::from_le_bytes(bytes[80..84].try_into().unwrap());
        assert_eq!(count as usize, mesh.triangle_count());
        assert_eq!(bytes.len(), 84 + 50 * mesh.triangle_count());
    }

    #[test]
    fn empty_mesh_is_header_only() {
        let mesh = MeshData::default();
        let bytes = export_stl(&mesh);
        assert_eq!(bytes.len(), 84);
    }

    #[test]
    fn degenerate_triangle_emits_zero_normal() {
        let mesh = MeshData {
            positions: vec![0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0],
            normals: vec![0.0; 9],
            indices: vec![0, 1, 2],
        };
        let bytes = export_stl(&mesh);
        let normal = [
            f32::from_le_bytes(bytes[84..88].try_into().unwrap()),
            f32::from_le_bytes(bytes[88..92].try_into().unwrap()),
            f32::from_le_bytes(bytes[92..96].try_into().unwrap()),
        ];
        assert_eq!(normal, [0.0, 0.0, 0.0]);
    }
}
