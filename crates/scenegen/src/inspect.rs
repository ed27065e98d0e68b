//! Mesh statistics, computed with the same geometry routines the viewer
//! uses at load time.

use anyhow::{Context, Result};
use pointscape::{
    geometry::{build_solid_mesh, extract_edges, resolvable_faces, sample_point_cloud},
    Mesh, DEFAULT_PALETTE,
};
use rand::{rngs::StdRng, SeedableRng};
use std::{
    fmt,
    path::{Path, PathBuf},
};

#[derive(Debug, Clone, PartialEq)]
pub struct MeshReport {
    pub path: PathBuf,
    pub vertices: usize,
    pub triangles: usize,
    pub resolvable: usize,
    pub edges: usize,
    pub solid_vertices: usize,
    pub surface_area: f64,
    pub y_extent: Option<(f32, f32)>,
    /// Sampled points per palette height band, bottom first.
    pub band_histogram: Option<Vec<usize>>,
}

impl fmt::Display for MeshReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} vertices, {} triangles ({} resolvable), {} edges, {} solid vertices, area {:.3}",
            self.path.display(),
            self.vertices,
            self.triangles,
            self.resolvable,
            self.edges,
            self.solid_vertices,
            self.surface_area,
        )?;
        if let Some((lo, hi)) = self.y_extent {
            write!(f, ", y [{lo:.3}, {hi:.3}]")?;
        }
        if let Some(bands) = &self.band_histogram {
            write!(f, ", bands {bands:?}")?;
        }
        Ok(())
    }
}

/// Builds a report for an already-parsed mesh. With `samples`, also draws a
/// point cloud and counts points per palette band.
pub fn report(path: &Path, mesh: &Mesh, samples: Option<usize>, seed: u64) -> MeshReport {
    let y_extent = mesh.y_extent();

    let band_histogram = samples.map(|count| {
        let cloud = sample_point_cloud(mesh, count, &DEFAULT_PALETTE, &mut StdRng::seed_from_u64(seed));
        let (lo, hi) = y_extent.unwrap_or((0.0, 1.0));
        let range = if hi - lo > 0.0 { hi - lo } else { 1.0 };

        let mut bands = vec![0usize; DEFAULT_PALETTE.bands.len()];
        for p in &cloud.positions {
            if let Some(slot) = bands.get_mut(DEFAULT_PALETTE.band_index((p[1] - lo) / range)) {
                *slot += 1;
            }
        }
        bands
    });

    MeshReport {
        path: path.to_path_buf(),
        vertices: mesh.positions.len(),
        triangles: mesh.faces.len(),
        resolvable: resolvable_faces(mesh),
        edges: extract_edges(mesh).edge_count(),
        solid_vertices: build_solid_mesh(mesh).len(),
        surface_area: mesh.surface_area(),
        y_extent,
        band_histogram,
    }
}

pub fn inspect_file(path: &Path, samples: Option<usize>, seed: u64) -> Result<MeshReport> {
    let mesh = Mesh::load(path).with_context(|| format!("reading {}", path.display()))?;
    Ok(report(path, &mesh, samples, seed))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{obj::write_obj, scenes::logo};

    fn logo_mesh() -> Mesh {
        let mut buf = Vec::new();
        write_obj(&mut buf, &logo(), "logo").unwrap();
        Mesh::parse(std::str::from_utf8(&buf).unwrap())
    }

    #[test]
    fn logo_report_counts() {
        let r = report(Path::new("logo.obj"), &logo_mesh(), None, 0);
        assert_eq!(r.vertices, 24);
        assert_eq!(r.triangles, 56);
        assert_eq!(r.resolvable, 56);
        assert_eq!(r.solid_vertices, 56 * 3);
        assert!(r.edges > 24);
        assert_eq!(r.y_extent, Some((-0.35, 0.35)));
        assert!(r.band_histogram.is_none());
        assert!(r.surface_area > 0.0);
    }

    #[test]
    fn histogram_covers_every_sample() {
        let r = report(Path::new("logo.obj"), &logo_mesh(), Some(2_000), 3);
        let bands = r.band_histogram.unwrap();
        assert_eq!(bands.len(), DEFAULT_PALETTE.bands.len());
        assert_eq!(bands.iter().sum::<usize>(), 2_000);
        assert!(bands.iter().all(|&n| n > 0));
    }

    #[test]
    fn missing_file_is_an_error() {
        let err = inspect_file(Path::new("/nonexistent/scene.obj"), None, 0).unwrap_err();
        assert!(format!("{err:#}").contains("/nonexistent/scene.obj"));
    }

    #[test]
    fn display_mentions_counts() {
        let text = report(Path::new("logo.obj"), &logo_mesh(), Some(10), 1).to_string();
        assert!(text.starts_with("logo.obj: 24 vertices, 56 triangles"));
        assert!(text.contains("bands ["));
    }
}
