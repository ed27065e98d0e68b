mod inspect;
mod obj;
mod primitives;
mod scenes;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use log::{info, warn};
use rand::{rngs::StdRng, SeedableRng};
use rayon::prelude::*;
use scenes::SceneKind;
use std::{
    fs::{self, File},
    io::{BufWriter, Write},
    path::PathBuf,
    time::Instant,
};

#[derive(Parser, Debug)]
#[command(name = "scenegen", version, about = "Generate and inspect OBJ scenes")]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Write one of the built-in scenes as an OBJ file.
    Generate {
        #[arg(long, value_enum)]
        scene: SceneKind,

        /// Seed for the scene's random placement.
        #[arg(long, default_value_t = 42)]
        seed: u64,

        /// Output path; defaults to `<scene>.obj` in the working directory.
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Parse OBJ files and report geometry statistics.
    Inspect {
        #[arg(required = true)]
        paths: Vec<PathBuf>,

        /// Also sample this many points and report the color band histogram.
        #[arg(long)]
        samples: Option<usize>,

        #[arg(long, default_value_t = 1)]
        seed: u64,
    },
}

fn generate(scene: SceneKind, seed: u64, output: Option<PathBuf>) -> Result<()> {
    let path = output.unwrap_or_else(|| PathBuf::from(scene.file_name()));
    let start = Instant::now();

    let shape = scene.build(&mut StdRng::seed_from_u64(seed));
    debug_assert!(shape.is_well_formed());

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("creating {}", parent.display()))?;
    }
    let file = File::create(&path).with_context(|| format!("creating {}", path.display()))?;
    let mut out = BufWriter::new(file);
    obj::write_obj(&mut out, &shape, scene.title())
        .and_then(|()| out.flush())
        .with_context(|| format!("writing {}", path.display()))?;

    info!(
        "Wrote {}: {} vertices, {} faces in {:.2?}",
        path.display(),
        shape.vertices.len(),
        shape.faces.len(),
        start.elapsed()
    );
    Ok(())
}

fn inspect_all(paths: &[PathBuf], samples: Option<usize>, seed: u64) -> Result<()> {
    info!("Inspecting {} meshes...", paths.len());

    let results: Vec<_> = paths
        .par_iter()
        .map(|path| (path, inspect::inspect_file(path, samples, seed)))
        .collect();

    let mut failed = 0;
    for (path, result) in results {
        match result {
            Ok(report) => {
                if report.resolvable < report.triangles {
                    warn!(
                        "{}: {} faces reference missing vertices",
                        path.display(),
                        report.triangles - report.resolvable
                    );
                }
                info!("{report}");
            }
            Err(err) => {
                warn!("Error inspecting {}: {:#}", path.display(), err);
                failed += 1;
            }
        }
    }

    if failed > 0 {
        bail!("{failed} of {} meshes could not be inspected", paths.len());
    }
    Ok(())
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    match Args::parse().command {
        Command::Generate {
            scene,
            seed,
            output,
        } => generate(scene, seed, output),
        Command::Inspect {
            paths,
            samples,
            seed,
        } => inspect_all(&paths, samples, seed),
    }
}
