//! Marching cubes with per-axis edge-vertex deduplication
//!
//! Converts a [`BinaryField`] into an indexed triangle mesh. Each grid
//! edge produces at most one vertex: a cache per axis maps a grid point
//! to the vertex index resolved for the edge leaving it along that
//! axis, so adjacent cubes sharing an edge share the resulting index.

use crate::Progress;
use crate::field::BinaryField;
use crate::mesh::tables::{EDGE_TABLE, TRI_TABLE};
use glam::Vec3;

/// Corner offsets for the unit cube, `c0..c7`, matching the standard
/// marching-cubes corner layout.
const CORNER_OFFSETS: [(u32, u32, u32); 8] = [
    (0, 0, 0),
    (1, 0, 0),
    (1, 1, 0),
    (0, 1, 0),
    (0, 0, 1),
    (1, 0, 1),
    (1, 1, 1),
    (0, 1, 1),
];

/// Per spec §4.3: edge index -> (base corner, axis). Axis 0=X, 1=Y, 2=Z.
const EDGE_BASE_CORNER: [usize; 12] = [0, 1, 3, 0, 4, 5, 7, 4, 0, 1, 2, 3];
const EDGE_AXIS: [usize; 12] = [0, 1, 0, 1, 0, 1, 0, 1, 2, 2, 2, 2];

const AXIS_STRIDE: [(u32, u32, u32); 3] = [(1, 0, 0), (0, 1, 0), (0, 0, 1)];

/// Result of the marching-cubes pass: world-space vertex positions
/// (flat xyz triples) and the triangle index buffer.
pub struct Triangulation {
    pub positions: Vec<f32>,
    pub indices: Vec<u32>,
}

#[inline]
fn sample_value(solid: bool) -> f32 {
    if solid { -1.0 } else { 1.0 }
}

struct EdgeCaches {
    dim_points: u32,
    caches: [Vec<i32>; 3],
}

impl EdgeCaches {
    fn new(dim_points: u32) -> Self {
        let total = (dim_points as usize).pow(3);
        Self {
            dim_points,
            caches: [vec![-1; total], vec![-1; total], vec![-1; total]],
        }
    }

    #[inline]
    fn point_index(&self, x: u32, y: u32, z: u32) -> usize {
        let n = self.dim_points as usize;
        x as usize + y as usize * n + z as usize * n * n
    }
}

/// Run marching cubes over `field`, reporting progress into `[lo, hi]`.
pub fn triangulate(
    field: &BinaryField,
    progress: &mut dyn Progress,
    lo: u32,
    hi: u32,
) -> crate::Result<Triangulation> {
    let res = field.dim;
    let n = field.dim_points();
    let step = field.step;
    let half = field.half;

    let total_cells = (res as u64).saturating_pow(3);
    if total_cells > (u32::MAX as u64) {
        return Err(crate::Error::OutOfMemory(format!(
            "resolution {res} produces too many marching-cubes cells"
        )));
    }

    let mut caches = EdgeCaches::new(n);
    let mut positions: Vec<f32> = Vec::new();
    let mut indices: Vec<u32> = Vec::new();

    let mm = |i: u32| -half + i as f32 * step;

    let mut cells_done: u64 = 0;
    let progress_stride = (total_cells / 64).max(1);

    // z-outer, y-middle, x-inner so edge caches only need the current
    // and preceding slabs resident.
    for z in 0..res {
        for y in 0..res {
            for x in 0..res {
                let corner_grid: [(u32, u32, u32); 8] = [
                    (x, y, z),
                    (x + 1, y, z),
                    (x + 1, y + 1, z),
                    (x, y + 1, z),
                    (x, y, z + 1),
                    (x + 1, y, z + 1),
                    (x + 1, y + 1, z + 1),
                    (x, y + 1, z + 1),
                ];

                let mut cube_index: u16 = 0;
                for (c, &(gx, gy, gz)) in corner_grid.iter().enumerate() {
                    if !field.is_solid(gx, gy, gz) {
                        cube_index |= 1 << c;
                    }
                }

                let edge_flags = EDGE_TABLE[cube_index as usize];
                if edge_flags != 0 {
                    let mut edge_vertex = [u32::MAX; 12];

                    for e in 0..12 {
                        if edge_flags & (1 << e) == 0 {
                            continue;
                        }
                        edge_vertex[e] =
                            resolve_edge(e, x, y, z, field, &mut caches, &mut positions, mm);
                    }

                    let tri = &TRI_TABLE[cube_index as usize];
                    let mut i = 0;
                    while i < 16 && tri[i] != -1 {
                        indices.push(edge_vertex[tri[i] as usize]);
                        indices.push(edge_vertex[tri[i + 1] as usize]);
                        indices.push(edge_vertex[tri[i + 2] as usize]);
                        i += 3;
                    }
                }

                cells_done += 1;
                if cells_done % progress_stride == 0 {
                    let frac = cells_done as f32 / total_cells as f32;
                    let pct = lo as f32 + frac * (hi as f32 - lo as f32);
                    progress.report(pct.round() as u32)?;
                }
            }
        }
    }

    tracing::debug!(
        vertices = positions.len() / 3,
        triangles = indices.len() / 3,
        "marching cubes complete"
    );

    Ok(Triangulation { positions, indices })
}

#[allow(clippy::too_many_arguments)]
fn resolve_edge(
    e: usize,
    cx: u32,
    cy: u32,
    cz: u32,
    field: &BinaryField,
    caches: &mut EdgeCaches,
    positions: &mut Vec<f32>,
    mm: impl Fn(u32) -> f32,
) -> u32 {
    let (ox, oy, oz) = CORNER_OFFSETS[EDGE_BASE_CORNER[e]];
    let (bx, by, bz) = (cx + ox, cy + oy, cz + oz);
    let axis = EDGE_AXIS[e];
    let idx = caches.point_index(bx, by, bz);

    let cached = caches.caches[axis][idx];
    if cached >= 0 {
        return cached as u32;
    }

    let (sx, sy, sz) = AXIS_STRIDE[axis];
    let (ax, ay, az) = (bx + sx, by + sy, bz + sz);

    let f_a = sample_value(field.is_solid(bx, by, bz));
    let f_b = sample_value(field.is_solid(ax, ay, az));

    let mu = if (f_b - f_a).abs() < 1e-6 {
        0.5
    } else {
        (-f_a / (f_b - f_a)).clamp(0.0, 1.0)
    };

    let base = Vec3::new(mm(bx), mm(by), mm(bz));
    let other = Vec3::new(mm(ax), mm(ay), mm(az));
    let pos = base.lerp(other, mu);

    let vertex_index = (positions.len() / 3) as u32;
    positions.push(pos.x);
    positions.push(pos.y);
    positions.push(pos.z);

    caches.caches[axis][idx] = vertex_index as i32;
    vertex_index
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::NullProgress;
    use crate::field::{build_field, void_boundary};
    use crate::params::{Mode, Parameters};

    fn small_params() -> Parameters {
        Parameters {
            size: 100.0,
            cell_size: 25.0,
            wall_threshold: 0.35,
            mode: Mode::Shell,
            shell_thickness: 3.0,
            frame_beam_width: 10.0,
            resolution: 16,
            smoothing_iterations: 0,
            make_manifold: false,
        }
    }

    #[test]
    fn indices_are_in_bounds_and_triples() {
        let p = small_params();
        let mut field = build_field(&p, p.snapped_cell_size(), &mut NullProgress, 5, 28).unwrap();
        void_boundary(&mut field);
        let tri = triangulate(&field, &mut NullProgress, 30, 75).unwrap();
        assert_eq!(tri.indices.len() % 3, 0);
        let vcount = tri.positions.len() / 3;
        for &i in &tri.indices {
            assert!((i as usize) < vcount);
        }
    }

    #[test]
    fn positions_within_expanded_bounds() {
        let p = small_params();
        let mut field = build_field(&p, p.snapped_cell_size(), &mut NullProgress, 5, 28).unwrap();
        void_boundary(&mut field);
        let tri = triangulate(&field, &mut NullProgress, 30, 75).unwrap();
        let limit = p.size / 2.0 + field.step;
        for chunk in tri.positions.chunks(3) {
            for &c in chunk {
                assert!(c.abs() <= limit + 1e-3);
            }
        }
    }

    #[test]
    fn shared_grid_edge_yields_shared_vertex() {
        // Two adjacent cubes differing only in x must not produce two
        // distinct vertices for the edge they share.
        let p = small_params();
        let mut field = build_field(&p, p.snapped_cell_size(), &mut NullProgress, 5, 28).unwrap();
        void_boundary(&mut field);
        let tri = triangulate(&field, &mut NullProgress, 30, 75).unwrap();
        let vcount_before_dedup_check = tri.positions.len() / 3;
        // A dedup bug would manifest as a vertex count far above the
        // number of distinct grid edges actually crossed; this is an
        // upper-bound sanity check rather than an exact count.
        let n = field.dim_points() as usize;
        assert!(vcount_before_dedup_check <= 3 * n * n * n);
    }
}
