//! Renderable forms derived from a parsed [`Mesh`]: wireframe edges, a
//! flat-shaded triangle buffer, and an area-weighted surface point cloud.

use crate::{
    mesh::{triangle_area, Mesh},
    palette::Palette,
};
use glam::Vec3;
use hashbrown::HashSet;
use rand::Rng;

/// Unique undirected edges, flattened to endpoint coordinates
/// (two consecutive entries per edge).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EdgeSet {
    pub endpoints: Vec<[f32; 3]>,
}

impl EdgeSet {
    pub fn edge_count(&self) -> usize {
        self.endpoints.len() / 2
    }
}

/// Collects every unique undirected edge, in first-seen order.
///
/// The dedup key is `min·K + max` with `K` = the vertex count. Edges touching
/// a reference that does not resolve are dropped, so every keyed index is
/// below `K` and the key is collision-free for any mesh size.
pub fn extract_edges(mesh: &Mesh) -> EdgeSet {
    let k = mesh.positions.len() as u64;
    let mut seen: HashSet<u64> = HashSet::with_capacity(mesh.faces.len() * 2);
    let mut endpoints = Vec::with_capacity(mesh.faces.len() * 4);

    for &[a, b, c] in &mesh.faces {
        for (i, j) in [(a, b), (b, c), (c, a)] {
            let (Some(pi), Some(pj)) = (mesh.position(i), mesh.position(j)) else {
                continue;
            };

            // Resolvable references are in 0..K.
            let (lo, hi) = (i.min(j) as u64, i.max(j) as u64);
            if seen.insert(lo * k + hi) {
                endpoints.push(pi.to_array());
                endpoints.push(pj.to_array());
            }
        }
    }

    EdgeSet { endpoints }
}

/// One vertex of the flat-shaded triangle buffer.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct SolidVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
}

/// Unit face normal from the winding `a → b → c`, or zero for a degenerate
/// triangle.
#[inline]
pub fn face_normal(t: &[Vec3; 3]) -> Vec3 {
    let n = (t[1] - t[0]).cross(t[2] - t[0]);
    let len = n.length();
    if len > 1e-8 {
        n / len
    } else {
        Vec3::ZERO
    }
}

/// Three records per resolvable triangle, all carrying that triangle's
/// face normal. Triangles with an unresolvable reference are skipped.
pub fn build_solid_mesh(mesh: &Mesh) -> Vec<SolidVertex> {
    let mut out = Vec::with_capacity(mesh.faces.len() * 3);

    for tri in mesh.faces.iter().filter_map(|f| mesh.triangle(f)) {
        let normal = face_normal(&tri).to_array();
        out.extend(tri.iter().map(|p| SolidVertex {
            position: p.to_array(),
            normal,
        }));
    }

    out
}

/// Parallel per-point arrays, each uploaded as its own vertex stream.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PointCloud {
    pub positions: Vec<[f32; 3]>,
    pub colors: Vec<[f32; 3]>,
    pub sizes: Vec<f32>,
    pub phases: Vec<f32>,
}

impl PointCloud {
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    fn with_capacity(n: usize) -> Self {
        Self {
            positions: Vec::with_capacity(n),
            colors: Vec::with_capacity(n),
            sizes: Vec::with_capacity(n),
            phases: Vec::with_capacity(n),
        }
    }
}

/// Prefix sums of triangle area, one slot per face.
///
/// Faces that do not resolve keep their slot with zero area (and a
/// placeholder triangle that can never be drawn).
#[derive(Debug, Clone)]
pub struct AreaTable {
    cumulative: Vec<f64>,
    triangles: Vec<[Vec3; 3]>,
}

impl AreaTable {
    pub fn new(mesh: &Mesh) -> Self {
        let mut total = 0.0;
        let mut cumulative = Vec::with_capacity(mesh.faces.len());
        let mut triangles = Vec::with_capacity(mesh.faces.len());

        for face in &mesh.faces {
            match mesh.triangle(face) {
                Some(t) => {
                    let area = triangle_area(&t);
                    if area.is_finite() {
                        total += area;
                    }
                    triangles.push(t);
                }
                None => triangles.push([Vec3::ZERO; 3]),
            }
            cumulative.push(total);
        }

        Self {
            cumulative,
            triangles,
        }
    }

    pub fn total(&self) -> f64 {
        self.cumulative.last().copied().unwrap_or(0.0)
    }

    /// First slot whose cumulative area is `>= r` (ties go to the earliest).
    pub fn lower_bound(&self, r: f64) -> usize {
        self.cumulative
            .partition_point(|&c| c < r)
            .min(self.cumulative.len().saturating_sub(1))
    }

    /// Draws one face index with probability proportional to its area.
    ///
    /// `r` is drawn from `(0, total]`, so a zero-area slot can never win the
    /// lower-bound search.
    pub fn pick<R: Rng + ?Sized>(&self, rng: &mut R) -> usize {
        let r = (1.0 - rng.gen::<f64>()) * self.total();
        self.lower_bound(r)
    }

    pub fn triangle(&self, slot: usize) -> &[Vec3; 3] {
        &self.triangles[slot]
    }
}

/// Uniform point inside a triangle: `w·A + u·B + v·C`, folding `(u, v)`
/// back into the triangle when `u + v > 1`.
#[inline]
pub fn sample_in_triangle<R: Rng + ?Sized>(t: &[Vec3; 3], rng: &mut R) -> Vec3 {
    let (mut u, mut v): (f32, f32) = (rng.gen(), rng.gen());
    if u + v > 1.0 {
        u = 1.0 - u;
        v = 1.0 - v;
    }
    let w = 1.0 - u - v;
    t[0] * w + t[1] * u + t[2] * v
}

/// Samples `count` points over the mesh surface, area-weighted, and tags
/// each with a palette color (by height within the mesh's Y extent), a size
/// in `[0.4, 1.8)` and a phase in `[0, 2π)`.
///
/// A mesh with no sampleable area yields an empty cloud.
pub fn sample_point_cloud<R: Rng + ?Sized>(
    mesh: &Mesh,
    count: usize,
    palette: &Palette,
    rng: &mut R,
) -> PointCloud {
    let table = AreaTable::new(mesh);
    let total = table.total();
    if total <= 0.0 || !total.is_finite() {
        log::warn!(
            "no sampleable surface ({} faces, total area {})",
            mesh.faces.len(),
            total
        );
        return PointCloud::default();
    }

    let (min_y, max_y) = mesh.y_extent().unwrap_or((0.0, 1.0));
    let range_y = if max_y - min_y > 0.0 { max_y - min_y } else { 1.0 };

    let mut cloud = PointCloud::with_capacity(count);
    for _ in 0..count {
        let tri = table.triangle(table.pick(rng));
        let p = sample_in_triangle(tri, rng);

        let height = (p.y - min_y) / range_y;
        cloud.positions.push(p.to_array());
        cloud.colors.push(palette.color_at(height, rng));
        cloud.sizes.push(0.4 + rng.gen::<f32>() * 1.4);
        cloud.phases.push(rng.gen::<f32>() * std::f32::consts::TAU);
    }

    log::debug!(
        "sampled {} points over {} faces (area {:.3})",
        cloud.len(),
        mesh.faces.len(),
        total
    );

    cloud
}

/// Resolvable face count; handy for logging.
pub fn resolvable_faces(mesh: &Mesh) -> usize {
    mesh.faces
        .iter()
        .filter(|f| mesh.triangle(f).is_some())
        .count()
}
