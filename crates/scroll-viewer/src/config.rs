use clap::Parser;
use std::path::PathBuf;

/// `scroll-viewer` - renders the scroll-driven point-cloud scene.
///
/// The mouse wheel (or Home/End) drives scroll progress; the pointer adds a
/// little camera parallax. Escape quits.
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None)]
pub struct Config {
    /// OBJ mesh for the focal object (the "logo").
    #[arg(long, env = "SCROLL_OBJECT_MESH", default_value = "assets/logo.obj")]
    pub object_mesh: PathBuf,

    /// OBJ mesh for the surrounding environment.
    #[arg(long, env = "SCROLL_ENVIRONMENT_MESH", default_value = "assets/environment.obj")]
    pub environment_mesh: PathBuf,

    /// Points sampled per mesh. Both clouds use the same count so they can
    /// morph point-for-point.
    #[arg(long, default_value_t = 45_000, value_parser = clap::value_parser!(u32).range(1..))]
    pub samples: u32,

    /// Initial window width in logical pixels.
    #[arg(long, default_value_t = 1280)]
    pub width: u32,

    /// Initial window height in logical pixels.
    #[arg(long, default_value_t = 720)]
    pub height: u32,

    /// Scroll progress added per wheel line.
    #[arg(long, default_value_t = 0.02)]
    pub scroll_step: f32,

    /// Seed for point sampling. Random when omitted.
    #[arg(long)]
    pub seed: Option<u64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let cfg = Config::try_parse_from(["scroll-viewer"]).unwrap();
        assert_eq!(cfg.samples, 45_000);
        assert_eq!((cfg.width, cfg.height), (1280, 720));
        assert!((cfg.scroll_step - 0.02).abs() < 1e-9);
        assert_eq!(cfg.seed, None);
    }

    #[test]
    fn overrides() {
        let cfg = Config::try_parse_from([
            "scroll-viewer",
            "--object-mesh",
            "a.obj",
            "--environment-mesh",
            "b.obj",
            "--samples",
            "1000",
            "--seed",
            "42",
        ])
        .unwrap();
        assert_eq!(cfg.object_mesh, PathBuf::from("a.obj"));
        assert_eq!(cfg.environment_mesh, PathBuf::from("b.obj"));
        assert_eq!(cfg.samples, 1000);
        assert_eq!(cfg.seed, Some(42));
    }

    #[test]
    fn zero_samples_rejected() {
        assert!(Config::try_parse_from(["scroll-viewer", "--samples", "0"]).is_err());
    }
}
