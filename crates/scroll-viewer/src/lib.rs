//! Native host for the scroll-driven point-cloud scene.
//!
//! Owns the window loop, loads the two meshes on a worker thread, and draws
//! the volumetric light, point cloud and pulse ring passes with wgpu.

pub mod app;
pub mod config;
pub mod loader;
pub mod renderer;
