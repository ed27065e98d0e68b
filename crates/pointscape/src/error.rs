use std::path::PathBuf;

/// Failures that keep a scene from becoming renderable.
///
/// Parsing itself never fails; malformed records are skipped. These errors
/// cover the edges around it: reading the source and finding nothing to
/// sample on.
#[derive(Debug, thiserror::Error)]
pub enum MeshError {
    #[error("failed to read mesh '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("mesh '{label}' has no surface area to sample ({triangles} triangles)")]
    NoSurface { label: String, triangles: usize },
}
