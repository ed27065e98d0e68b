//! Background loading of the two scene meshes.
//!
//! Both meshes are read, parsed and sampled in parallel on a worker thread;
//! the render thread polls for the single result once per frame.

use anyhow::{anyhow, Result};
use crossbeam_channel::{Receiver, TryRecvError};
use pointscape::{
    geometry::{resolvable_faces, sample_point_cloud},
    Mesh, MeshError, PointCloud, DEFAULT_PALETTE,
};
use rand::{rngs::StdRng, SeedableRng};
use std::{
    path::{Path, PathBuf},
    thread,
    time::Instant,
};

/// Offset mixed into the seed for the environment cloud so the two clouds
/// do not share a random stream.
const ENVIRONMENT_SEED_SALT: u64 = 0x9E37_79B9_7F4A_7C15;

/// Both point clouds, same length, ready for upload.
#[derive(Debug)]
pub struct LoadedScene {
    pub object: PointCloud,
    pub environment: PointCloud,
}

#[derive(Debug, Clone)]
pub struct LoadRequest {
    pub object_mesh: PathBuf,
    pub environment_mesh: PathBuf,
    pub samples: usize,
    pub seed: Option<u64>,
}

/// Handle to an in-flight load. Yields exactly one result.
pub struct SceneLoader {
    rx: Receiver<Result<LoadedScene>>,
    _worker: thread::JoinHandle<()>,
}

impl SceneLoader {
    /// Starts loading on a new thread. No timeout, no cancellation.
    pub fn spawn(request: LoadRequest) -> Self {
        let (tx, rx) = crossbeam_channel::bounded(1);

        let worker = thread::spawn(move || {
            let result = load_scene(&request).map_err(anyhow::Error::from);
            if tx.send(result).is_err() {
                log::debug!("scene loaded after the viewer stopped listening");
            }
        });

        Self {
            rx,
            _worker: worker,
        }
    }

    /// Non-blocking check for the result. `None` while still loading.
    pub fn try_take(&self) -> Option<Result<LoadedScene>> {
        match self.rx.try_recv() {
            Ok(result) => Some(result),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => {
                Some(Err(anyhow!("scene loader exited without a result")))
            }
        }
    }
}

/// Loads and samples both meshes, in parallel.
pub fn load_scene(request: &LoadRequest) -> Result<LoadedScene, MeshError> {
    let started = Instant::now();
    let (object_seed, environment_seed) = match request.seed {
        Some(s) => (Some(s), Some(s ^ ENVIRONMENT_SEED_SALT)),
        None => (None, None),
    };

    let (object, environment) = rayon::join(
        || load_cloud(&request.object_mesh, "object", request.samples, object_seed),
        || {
            load_cloud(
                &request.environment_mesh,
                "environment",
                request.samples,
                environment_seed,
            )
        },
    );

    let scene = LoadedScene {
        object: object?,
        environment: environment?,
    };

    log::info!(
        "scene ready: {} points per cloud in {:.2?}",
        scene.object.len(),
        started.elapsed()
    );

    Ok(scene)
}

fn load_cloud(path: &Path, label: &str, samples: usize, seed: Option<u64>) -> Result<PointCloud, MeshError> {
    let mesh = Mesh::load(path)?;
    log::info!(
        "{label} mesh '{}': {} vertices, {} triangles",
        path.display(),
        mesh.positions.len(),
        mesh.faces.len()
    );

    let mut rng = match seed {
        Some(s) => StdRng::seed_from_u64(s),
        None => StdRng::from_entropy(),
    };

    let cloud = sample_point_cloud(&mesh, samples, &DEFAULT_PALETTE, &mut rng);
    if cloud.is_empty() {
        return Err(MeshError::NoSurface {
            label: label.to_string(),
            triangles: resolvable_faces(&mesh),
        });
    }

    Ok(cloud)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    const TETRA: &str = "v 0 0 0\nv 1 0 0\nv 0 1 0\nv 0 0 1\nf 1 3 2\nf 1 2 4\nf 1 4 3\nf 2 3 4\n";
    const FLAT: &str = "v 0 0 0\nv 1 0 0\nv 2 0 0\nf 1 2 3\n";

    fn write_temp(name: &str, text: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!(
            "scroll_viewer_{}_{}.obj",
            name,
            std::process::id()
        ));
        std::fs::write(&path, text).unwrap();
        path
    }

    fn request(object: PathBuf, environment: PathBuf) -> LoadRequest {
        LoadRequest {
            object_mesh: object,
            environment_mesh: environment,
            samples: 500,
            seed: Some(9),
        }
    }

    #[test]
    fn loads_both_clouds_with_equal_length() {
        let obj = write_temp("tetra_a", TETRA);
        let env = write_temp("tetra_b", TETRA);
        let scene = load_scene(&request(obj, env)).unwrap();
        assert_eq!(scene.object.len(), 500);
        assert_eq!(scene.environment.len(), 500);
        // Separate random streams even with one seed.
        assert_ne!(scene.object.positions, scene.environment.positions);
    }

    #[test]
    fn seeded_load_is_reproducible() {
        let obj = write_temp("repro_a", TETRA);
        let env = write_temp("repro_b", TETRA);
        let a = load_scene(&request(obj.clone(), env.clone())).unwrap();
        let b = load_scene(&request(obj, env)).unwrap();
        assert_eq!(a.object, b.object);
        assert_eq!(a.environment, b.environment);
    }

    #[test]
    fn missing_file_fails() {
        let obj = write_temp("present", TETRA);
        let err = load_scene(&request(obj, PathBuf::from("no/such/environment.obj"))).unwrap_err();
        assert!(matches!(err, MeshError::Io { .. }));
    }

    #[test]
    fn zero_area_mesh_fails() {
        let obj = write_temp("flat", FLAT);
        let env = write_temp("flat_env", TETRA);
        let err = load_scene(&request(obj, env)).unwrap_err();
        assert!(matches!(err, MeshError::NoSurface { ref label, triangles: 1 } if label == "object"));
    }

    #[test]
    fn loader_delivers_once() {
        let obj = write_temp("thread_a", TETRA);
        let env = write_temp("thread_b", TETRA);
        let loader = SceneLoader::spawn(request(obj, env));

        let result = loader.rx.recv_timeout(Duration::from_secs(30)).unwrap();
        assert!(result.is_ok());

        // Once the worker exits, the closed channel reads as a failure.
        let deadline = Instant::now() + Duration::from_secs(30);
        let after = loop {
            if let Some(r) = loader.try_take() {
                break r;
            }
            assert!(Instant::now() < deadline, "worker never exited");
            thread::sleep(Duration::from_millis(10));
        };
        assert!(after.is_err());
    }
}
