//! Pointscape: the GPU-free core of the scroll viewer.
//!
//! Parses triangle meshes, turns them into edge lists, flat-shaded solids
//! and area-weighted point clouds, and evaluates the scroll-driven camera
//! and object animation into a per-frame [`FrameState`].
//!
//! ```
//! use pointscape::{AnimationState, FrameState, Viewport};
//!
//! let mut state = AnimationState::default();
//! state.set_scroll_progress(0.5);
//! let frame = FrameState::evaluate(&state, &Viewport::new(1280, 720, 1.0)).unwrap();
//! assert_eq!(frame.morph, 1.0);
//! ```

pub mod animation;
mod error;
pub mod frame;
pub mod geometry;
pub mod math;
pub mod mesh;
pub mod palette;
pub mod projection;

pub use animation::{AnimationState, CameraPose};
pub use error::MeshError;
pub use frame::{FrameState, PassKind, Viewport};
pub use geometry::{PointCloud, SolidVertex};
pub use mesh::Mesh;
pub use palette::{Palette, DEFAULT_PALETTE};
pub use projection::project_to_screen;
