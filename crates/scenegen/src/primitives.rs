//! Procedural building blocks. Each [`Shape`] indexes its own vertices from
//! zero; [`Shape::merge`] rebases indices when shapes are combined.

use glam::{Vec2, Vec3};
use smallvec::SmallVec;
use std::f32::consts::{PI, TAU};

/// A polygon as 0-based vertex indices. Quads stay inline.
pub type Face = SmallVec<[u32; 4]>;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Shape {
    pub vertices: Vec<Vec3>,
    pub faces: Vec<Face>,
}

impl Shape {
    fn new(vertices: Vec<Vec3>, faces: Vec<Face>) -> Self {
        Self { vertices, faces }
    }

    /// Appends `other`, offsetting its indices past the current vertices.
    pub fn merge(&mut self, other: Shape) {
        let base = self.vertices.len() as u32;
        self.vertices.extend(other.vertices);
        self.faces.extend(
            other
                .faces
                .into_iter()
                .map(|f| f.into_iter().map(|i| i + base).collect::<Face>()),
        );
    }

    /// True when every face has at least three corners and all of them
    /// reference an existing vertex.
    pub fn is_well_formed(&self) -> bool {
        let n = self.vertices.len() as u32;
        self.faces
            .iter()
            .all(|f| f.len() >= 3 && f.iter().all(|&i| i < n))
    }
}

fn face(indices: &[u32]) -> Face {
    SmallVec::from_slice(indices)
}

fn polar(center: Vec3, radius: f32, angle: f32) -> Vec3 {
    center + Vec3::new(angle.cos() * radius, 0.0, angle.sin() * radius)
}

/// Joins two rings of equal length with side quads and closes both ends
/// with triangle fans.
fn capped_tube(first: Vec<Vec3>, second: Vec<Vec3>) -> Shape {
    let segs = first.len() as u32;
    debug_assert_eq!(first.len(), second.len());

    let mut faces = Vec::with_capacity(segs as usize * 3);
    for i in 0..segs {
        let j = (i + 1) % segs;
        faces.push(face(&[i, j, j + segs, i + segs]));
    }
    for i in 0..segs.saturating_sub(2) {
        faces.push(face(&[0, i + 1, i + 2]));
    }
    for i in 0..segs.saturating_sub(2) {
        faces.push(face(&[segs, segs + i + 2, segs + i + 1]));
    }

    let mut vertices = first;
    vertices.extend(second);
    Shape::new(vertices, faces)
}

/// Axis-aligned box around `center` with half extents `half`.
pub fn cuboid(center: Vec3, half: Vec3) -> Shape {
    let corner = |sx: f32, sy: f32, sz: f32| center + half * Vec3::new(sx, sy, sz);
    let vertices = vec![
        corner(-1.0, -1.0, -1.0),
        corner(1.0, -1.0, -1.0),
        corner(1.0, 1.0, -1.0),
        corner(-1.0, 1.0, -1.0),
        corner(-1.0, -1.0, 1.0),
        corner(1.0, -1.0, 1.0),
        corner(1.0, 1.0, 1.0),
        corner(-1.0, 1.0, 1.0),
    ];
    let faces = [
        [0u32, 1, 2, 3],
        [5, 4, 7, 6],
        [4, 0, 3, 7],
        [1, 5, 6, 2],
        [3, 2, 6, 7],
        [4, 5, 1, 0],
    ]
    .iter()
    .map(|f| face(f))
    .collect();
    Shape::new(vertices, faces)
}

/// Upright capped cylinder standing on `base`.
pub fn cylinder(base: Vec3, radius: f32, height: f32, segs: u32) -> Shape {
    let top = base + Vec3::Y * height;
    let ring = |c: Vec3| -> Vec<Vec3> {
        (0..segs)
            .map(|i| polar(c, radius, TAU / segs as f32 * i as f32))
            .collect()
    };
    capped_tube(ring(top), ring(base))
}

/// Latitude/longitude sphere with single-vertex poles.
pub fn sphere(center: Vec3, radius: f32, rings: u32, segs: u32) -> Shape {
    let mut vertices = Vec::with_capacity(((rings - 1) * segs + 2) as usize);
    vertices.push(center + Vec3::Y * radius);
    for i in 1..rings {
        let phi = PI * i as f32 / rings as f32;
        for j in 0..segs {
            let theta = TAU * j as f32 / segs as f32;
            vertices.push(
                center
                    + radius
                        * Vec3::new(phi.sin() * theta.cos(), phi.cos(), phi.sin() * theta.sin()),
            );
        }
    }
    vertices.push(center - Vec3::Y * radius);

    let mut faces = Vec::new();
    for j in 0..segs {
        faces.push(face(&[0, 1 + j, 1 + (j + 1) % segs]));
    }
    for i in 0..rings.saturating_sub(2) {
        let r1 = 1 + i * segs;
        let r2 = 1 + (i + 1) * segs;
        for j in 0..segs {
            let j2 = (j + 1) % segs;
            faces.push(face(&[r1 + j, r1 + j2, r2 + j2, r2 + j]));
        }
    }
    let bottom = 1 + (rings - 1) * segs;
    let last = 1 + (rings - 2) * segs;
    for j in 0..segs {
        faces.push(face(&[bottom, last + (j + 1) % segs, last + j]));
    }

    Shape::new(vertices, faces)
}

/// Capped tube from `from` to `to`. `None` for a zero-length segment.
pub fn pipe(from: Vec3, to: Vec3, radius: f32, segs: u32) -> Option<Shape> {
    let delta = to - from;
    if delta.length() < 1e-6 {
        return None;
    }
    let dir = delta.normalize();
    let up = if dir.y.abs() < 0.9 { Vec3::Y } else { Vec3::X };
    let p = dir.cross(up).normalize();
    let q = dir.cross(p);

    let ring = |c: Vec3| -> Vec<Vec3> {
        (0..segs)
            .map(|i| {
                let a = TAU * i as f32 / segs as f32;
                c + radius * (a.cos() * p + a.sin() * q)
            })
            .collect()
    };
    Some(capped_tube(ring(from), ring(to)))
}

/// Small tetrahedron "particle" with apex above `center`.
pub fn tetrahedron(center: Vec3, size: f32) -> Shape {
    let low = center.y - size * 0.5;
    let vertices = vec![
        center + Vec3::Y * size,
        Vec3::new(center.x + size, low, center.z),
        Vec3::new(center.x - size * 0.5, low, center.z + size),
        Vec3::new(center.x - size * 0.5, low, center.z - size),
    ];
    let faces = vec![
        face(&[0, 1, 2]),
        face(&[0, 2, 3]),
        face(&[0, 3, 1]),
        face(&[1, 3, 2]),
    ];
    Shape::new(vertices, faces)
}

/// Regular grid over `[min, max]` in XZ with `cells.0 × cells.1` quads,
/// lifted by `height(x, z)`.
pub fn height_field(
    min: Vec2,
    max: Vec2,
    cells: (u32, u32),
    height: impl Fn(f32, f32) -> f32,
) -> Shape {
    let (nx, nz) = cells;
    let mut vertices = Vec::with_capacity(((nx + 1) * (nz + 1)) as usize);
    for iz in 0..=nz {
        for ix in 0..=nx {
            let x = min.x + (max.x - min.x) * ix as f32 / nx as f32;
            let z = min.y + (max.y - min.y) * iz as f32 / nz as f32;
            vertices.push(Vec3::new(x, height(x, z), z));
        }
    }

    let mut faces = Vec::with_capacity((nx * nz) as usize);
    for iz in 0..nz {
        for ix in 0..nx {
            let i = iz * (nx + 1) + ix;
            faces.push(face(&[i, i + 1, i + nx + 2, i + nx + 1]));
        }
    }
    Shape::new(vertices, faces)
}

/// Single quad from four corners in winding order.
pub fn quad(corners: [Vec3; 4]) -> Shape {
    Shape::new(corners.to_vec(), vec![face(&[0, 1, 2, 3])])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cuboid_spans_half_extents() {
        let b = cuboid(Vec3::new(1.0, 2.0, 3.0), Vec3::new(0.5, 1.0, 2.0));
        assert_eq!(b.vertices.len(), 8);
        assert_eq!(b.faces.len(), 6);
        assert!(b.is_well_formed());
        assert_eq!(b.vertices[0], Vec3::new(0.5, 1.0, 1.0));
        assert_eq!(b.vertices[6], Vec3::new(1.5, 3.0, 5.0));
    }

    #[test]
    fn cylinder_has_sides_and_fan_caps() {
        let c = cylinder(Vec3::ZERO, 1.0, 2.0, 8);
        assert_eq!(c.vertices.len(), 16);
        // 8 side quads + 6 + 6 cap triangles
        assert_eq!(c.faces.len(), 20);
        assert!(c.is_well_formed());
        assert!(c.vertices[..8].iter().all(|v| (v.y - 2.0).abs() < 1e-6));
        assert!(c.vertices[8..].iter().all(|v| v.y.abs() < 1e-6));
    }

    #[test]
    fn sphere_vertices_lie_on_radius() {
        let center = Vec3::new(0.0, 1.0, 0.0);
        let s = sphere(center, 2.0, 5, 8);
        assert_eq!(s.vertices.len(), 4 * 8 + 2);
        assert_eq!(s.faces.len(), 8 + 3 * 8 + 8);
        assert!(s.is_well_formed());
        for v in &s.vertices {
            assert!(((*v - center).length() - 2.0).abs() < 1e-4);
        }
    }

    #[test]
    fn pipe_rings_surround_the_axis() {
        let from = Vec3::new(-1.0, 0.0, 0.0);
        let to = Vec3::new(1.0, 0.5, 0.0);
        let p = pipe(from, to, 0.25, 6).unwrap();
        assert_eq!(p.vertices.len(), 12);
        assert!(p.is_well_formed());
        for v in &p.vertices[..6] {
            assert!(((*v - from).length() - 0.25).abs() < 1e-4);
        }
        for v in &p.vertices[6..] {
            assert!(((*v - to).length() - 0.25).abs() < 1e-4);
        }
    }

    #[test]
    fn vertical_pipe_uses_alternate_up() {
        let p = pipe(Vec3::ZERO, Vec3::Y * 3.0, 0.1, 6).unwrap();
        assert!(p.vertices.iter().all(|v| v.is_finite()));
    }

    #[test]
    fn zero_length_pipe_is_skipped() {
        assert!(pipe(Vec3::ONE, Vec3::ONE, 0.1, 6).is_none());
    }

    #[test]
    fn height_field_grid_topology() {
        let g = height_field(Vec2::splat(-1.0), Vec2::splat(1.0), (4, 2), |x, _| x);
        assert_eq!(g.vertices.len(), 5 * 3);
        assert_eq!(g.faces.len(), 8);
        assert!(g.is_well_formed());
        assert_eq!(g.vertices[4], Vec3::new(1.0, 1.0, -1.0));
    }

    #[test]
    fn merge_rebases_indices() {
        let mut scene = tetrahedron(Vec3::ZERO, 1.0);
        scene.merge(tetrahedron(Vec3::X * 4.0, 1.0));
        assert_eq!(scene.vertices.len(), 8);
        assert_eq!(scene.faces[4].as_slice(), &[4, 5, 6]);
        assert!(scene.is_well_formed());
    }
}
