//! Wavefront-OBJ style triangle mesh parsing.
//!
//! Only `v` and `f` records are interpreted. Everything else (normals,
//! texture coordinates, groups, materials, comments) is ignored.

use crate::error::MeshError;
use glam::Vec3;
use std::path::Path;

/// A resolved vertex reference. May be out of range (or negative) when the
/// source referenced a vertex that does not exist; consumers look positions
/// up through [`Mesh::position`] and drop whatever does not resolve.
pub type VertexIndex = i64;

/// Vertex positions plus a triangle list into them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mesh {
    pub positions: Vec<Vec3>,
    /// Always exactly three references per face; polygons are fan-split.
    pub faces: Vec<[VertexIndex; 3]>,
}

impl Mesh {
    /// Parses mesh text. Never fails: malformed lines are skipped.
    pub fn parse(text: &str) -> Self {
        let mut mesh = Mesh::default();

        for (line_no, line) in text.lines().enumerate() {
            let mut tokens = line.split_whitespace();

            match tokens.next() {
                Some("v") => {
                    if let Some(p) = parse_vertex(tokens) {
                        mesh.positions.push(p);
                    } else {
                        log::trace!("skipping malformed vertex on line {}", line_no + 1);
                    }
                }
                Some("f") => {
                    if !mesh.push_face(tokens) {
                        log::trace!("skipping malformed face on line {}", line_no + 1);
                    }
                }
                _ => {}
            }
        }

        mesh
    }

    /// Reads and parses a mesh file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, MeshError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| MeshError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        Ok(Self::parse(&text))
    }

    /// Resolves one face line into triangles. Returns false (and pushes
    /// nothing) when the line has fewer than three references or one of them
    /// is not an integer.
    fn push_face<'a>(&mut self, tokens: impl Iterator<Item = &'a str>) -> bool {
        let count = self.positions.len() as VertexIndex;
        let mut refs: Vec<VertexIndex> = Vec::new();

        for token in tokens {
            // "7", "7/2", "7//3", "7/2/3": only the position reference matters.
            let head = token.split('/').next().unwrap_or(token);
            let Ok(v) = head.parse::<VertexIndex>() else {
                return false;
            };
            refs.push(if v > 0 { v - 1 } else { count + v });
        }

        if refs.len() < 3 {
            return false;
        }

        let v0 = refs[0];
        self.faces
            .extend(refs.windows(2).skip(1).map(|w| [v0, w[0], w[1]]));
        true
    }

    /// Position for a (possibly invalid) vertex reference.
    #[inline]
    pub fn position(&self, index: VertexIndex) -> Option<Vec3> {
        usize::try_from(index)
            .ok()
            .and_then(|i| self.positions.get(i))
            .copied()
    }

    /// Corner positions of a face, or `None` if any reference is invalid.
    #[inline]
    pub fn triangle(&self, face: &[VertexIndex; 3]) -> Option<[Vec3; 3]> {
        Some([
            self.position(face[0])?,
            self.position(face[1])?,
            self.position(face[2])?,
        ])
    }

    /// `(min_y, max_y)` over all finite positions, `None` when there are none.
    pub fn y_extent(&self) -> Option<(f32, f32)> {
        self.positions
            .iter()
            .filter(|p| p.is_finite())
            .fold(None, |acc, p| match acc {
                None => Some((p.y, p.y)),
                Some((lo, hi)) => Some((lo.min(p.y), hi.max(p.y))),
            })
    }

    /// Total area of all resolvable triangles.
    pub fn surface_area(&self) -> f64 {
        self.faces
            .iter()
            .filter_map(|f| self.triangle(f))
            .map(|t| triangle_area(&t))
            .sum()
    }
}

fn parse_vertex<'a>(mut tokens: impl Iterator<Item = &'a str>) -> Option<Vec3> {
    let mut xyz = [0.0f32; 3];
    for c in &mut xyz {
        *c = tokens.next()?.parse().ok()?;
    }
    // "nan" and "inf" parse as floats but are no more usable than "abc".
    let p = Vec3::from_array(xyz);
    p.is_finite().then_some(p)
}

/// Half the length of the edge cross product.
#[inline]
pub fn triangle_area(t: &[Vec3; 3]) -> f64 {
    let cross = (t[1] - t[0]).cross(t[2] - t[0]);
    f64::from(cross.length()) * 0.5
}

#[cfg(test)]
mod tests {
    use super::*;

    const QUAD_AND_TRI: &str = "\
# two faces
v 0 0 0
v 1 0 0
v 1 1 0
v 0 1 0
vn 0 0 1
vt 0 0
f 1 2 3 4
f 1/1/1 2/1/1 3/1/1
o ignored
s off
";

    #[test]
    fn parses_vertices_and_fan_triangulates() {
        let mesh = Mesh::parse(QUAD_AND_TRI);
        assert_eq!(mesh.positions.len(), 4);
        assert_eq!(mesh.faces, vec![[0, 1, 2], [0, 2, 3], [0, 1, 2]]);
    }

    #[test]
    fn triangle_only_mesh_has_one_face_per_line() {
        let text = "v 0 0 0\nv 1 0 0\nv 0 1 0\nv 0 0 1\nf 1 2 3\nf 1 3 4\nf 2 3 4\n";
        assert_eq!(Mesh::parse(text).faces.len(), 3);
    }

    #[test]
    fn ngon_contributes_n_minus_two_triangles() {
        for n in 3..12usize {
            let mut text = String::new();
            for i in 0..n {
                let a = i as f32 / n as f32 * std::f32::consts::TAU;
                text.push_str(&format!("v {} 0 {}\n", a.cos(), a.sin()));
            }
            text.push('f');
            for i in 1..=n {
                text.push_str(&format!(" {i}"));
            }
            let mesh = Mesh::parse(&text);
            assert_eq!(mesh.faces.len(), n - 2);
            for (k, f) in mesh.faces.iter().enumerate() {
                assert_eq!(*f, [0, k as i64 + 1, k as i64 + 2]);
            }
        }
    }

    #[test]
    fn negative_reference_is_relative_to_current_count() {
        for prior in 1..20 {
            let mut text = String::new();
            for i in 0..prior {
                text.push_str(&format!("v {i} 0 0\n"));
            }
            text.push_str("f -1 -1 -1\n");
            if prior >= 3 {
                text.push_str("f -3 -2 -1\n");
            }
            let mesh = Mesh::parse(&text);
            let last = prior as i64 - 1;
            assert_eq!(mesh.faces[0], [last; 3], "prior count {prior}");
            assert_eq!(mesh.position(mesh.faces[0][0]), Some(Vec3::new(last as f32, 0.0, 0.0)));
            if prior >= 3 {
                assert_eq!(mesh.faces[1], [last - 2, last - 1, last]);
            }
        }

        // -1 resolves to the latest vertex declared *before* the face line.
        let mesh = Mesh::parse("v 0 0 0\nv 1 0 0\nv 0 1 0\nf -1 1 2\nv 5 5 5\n");
        assert_eq!(mesh.faces[0][0], 2);
    }

    #[test]
    fn malformed_lines_are_skipped() {
        let text = "v 1 2\nv a b c\nv 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2\nf 1 x 3\nf 1 2 3\n";
        let mesh = Mesh::parse(text);
        assert_eq!(mesh.positions.len(), 3);
        assert_eq!(mesh.faces, vec![[0, 1, 2]]);
    }

    #[test]
    fn non_finite_vertices_are_skipped() {
        let text = "v 0 0 0\nv nan 1 0\nv 1 inf 0\nv 1 0 0\nv 0 -inf 1\nv 0 1 0\nf 1 2 3\n";
        let mesh = Mesh::parse(text);
        assert_eq!(mesh.positions.len(), 3);
        assert!(mesh.positions.iter().all(|p| p.is_finite()));
        assert_eq!(mesh.y_extent(), Some((0.0, 1.0)));
    }

    #[test]
    fn extent_ignores_non_finite_positions() {
        let mesh = Mesh {
            positions: vec![
                Vec3::new(0.0, -2.0, 0.0),
                Vec3::new(0.0, f32::NAN, 0.0),
                Vec3::new(0.0, 3.0, 0.0),
            ],
            faces: Vec::new(),
        };
        assert_eq!(mesh.y_extent(), Some((-2.0, 3.0)));
    }

    #[test]
    fn out_of_range_references_survive_parse_but_do_not_resolve() {
        let mesh = Mesh::parse("v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 9\nf 0 1 2\n");
        assert_eq!(mesh.faces.len(), 2);
        assert!(mesh.triangle(&mesh.faces[0]).is_none());
        // "0" is non-positive: count + 0 is one past the end.
        assert_eq!(mesh.faces[1][0], 3);
        assert!(mesh.triangle(&mesh.faces[1]).is_none());
        assert!(mesh.position(-1).is_none());
    }

    #[test]
    fn extent_and_area() {
        let mesh = Mesh::parse(QUAD_AND_TRI);
        assert_eq!(mesh.y_extent(), Some((0.0, 1.0)));
        assert!((mesh.surface_area() - 1.5).abs() < 1e-9);
        assert_eq!(Mesh::default().y_extent(), None);
    }

    #[test]
    fn load_reports_missing_file() {
        let err = Mesh::load("definitely/not/here.obj").unwrap_err();
        assert!(matches!(err, MeshError::Io { .. }));
    }
}
