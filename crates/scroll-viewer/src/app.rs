use crate::{
    config::Config,
    loader::{LoadRequest, SceneLoader},
    renderer::{resources::RenderResources, Renderer},
};
use anyhow::Result;
use glam::Vec2;
use pointscape::{AnimationState, FrameState, Viewport};
use std::{sync::Arc, time::Instant};
use winit::{
    dpi::{PhysicalPosition, PhysicalSize},
    event::{ElementState, MouseScrollDelta, WindowEvent},
    keyboard::{KeyCode, PhysicalKey},
    window::Window,
};

/// Pixel scroll deltas per wheel line.
const PIXELS_PER_LINE: f64 = 120.0;

/// Wheel movement in lines; positive means scrolling down the page.
pub fn wheel_lines(delta: &MouseScrollDelta) -> f32 {
    match *delta {
        MouseScrollDelta::LineDelta(_, y) => -y,
        MouseScrollDelta::PixelDelta(p) => (-p.y / PIXELS_PER_LINE) as f32,
    }
}

/// Cursor position as `[0, 1]²`, x left→right and y bottom→top.
pub fn normalized_pointer(pos: PhysicalPosition<f64>, size: PhysicalSize<u32>) -> Vec2 {
    if size.width == 0 || size.height == 0 {
        return Vec2::splat(0.5);
    }
    Vec2::new(
        (pos.x / size.width as f64) as f32,
        1.0 - (pos.y / size.height as f64) as f32,
    )
}

/// Scene lifecycle. `Loading` moves to `Ready` or `Failed` exactly once.
pub enum SceneStatus {
    Loading(SceneLoader),
    Ready(RenderResources),
    Failed,
}

pub struct App {
    pub renderer: Renderer,
    pub animation: AnimationState,
    status: SceneStatus,
    scale_factor: f64,
    scroll_step: f32,
    started: Instant,
}

impl App {
    pub async fn new(window: Arc<Window>, config: &Config) -> Result<Self> {
        let renderer = Renderer::new(window.clone()).await?;

        let loader = SceneLoader::spawn(LoadRequest {
            object_mesh: config.object_mesh.clone(),
            environment_mesh: config.environment_mesh.clone(),
            samples: config.samples as usize,
            seed: config.seed,
        });
        log::info!(
            "loading '{}' and '{}'",
            config.object_mesh.display(),
            config.environment_mesh.display()
        );

        Ok(Self {
            renderer,
            animation: AnimationState::default(),
            status: SceneStatus::Loading(loader),
            scale_factor: window.scale_factor(),
            scroll_step: config.scroll_step,
            started: Instant::now(),
        })
    }

    pub fn resize(&mut self, new_size: PhysicalSize<u32>) {
        self.renderer.resize(new_size);
    }

    /// Applies input to the animation state. Returns true when consumed.
    pub fn handle_event(&mut self, event: &WindowEvent) -> bool {
        match event {
            WindowEvent::Resized(size) => {
                self.resize(*size);
                true
            }
            WindowEvent::ScaleFactorChanged { scale_factor, .. } => {
                self.scale_factor = *scale_factor;
                true
            }
            WindowEvent::MouseWheel { delta, .. } => {
                self.animation.scroll_by(wheel_lines(delta) * self.scroll_step);
                true
            }
            WindowEvent::CursorMoved { position, .. } => {
                self.animation
                    .set_pointer(normalized_pointer(*position, self.renderer.gfx.size));
                true
            }
            WindowEvent::KeyboardInput { event, .. } if event.state == ElementState::Pressed => {
                match event.physical_key {
                    PhysicalKey::Code(KeyCode::Home) => {
                        self.animation.set_scroll_progress(0.0);
                        true
                    }
                    PhysicalKey::Code(KeyCode::End) => {
                        self.animation.set_scroll_progress(1.0);
                        true
                    }
                    _ => false,
                }
            }
            _ => false,
        }
    }

    /// Moves out of `Loading` once the worker has answered.
    fn poll_loader(&mut self) {
        let outcome = match &self.status {
            SceneStatus::Loading(loader) => loader.try_take(),
            _ => None,
        };

        let Some(result) = outcome else {
            return;
        };

        self.status = match result {
            Ok(scene) => {
                let resources = RenderResources::initialize(
                    &self.renderer.gfx.device,
                    self.renderer.color_format(),
                    self.renderer.targets.depth_fmt,
                    &scene,
                );
                log::info!("scene ready ({} points)", resources.point_count());
                SceneStatus::Ready(resources)
            }
            Err(err) => {
                log::error!("scene failed to load: {err:#}");
                SceneStatus::Failed
            }
        };
    }

    pub fn render(&mut self) -> Result<(), wgpu::SurfaceError> {
        self.poll_loader();
        self.animation
            .set_elapsed(self.started.elapsed().as_secs_f32());

        let size = self.renderer.gfx.size;
        let viewport = Viewport::new(size.width, size.height, self.scale_factor);
        if viewport.is_empty() {
            log::trace!("zero-sized viewport, skipping frame");
            return Ok(());
        }

        match &self.status {
            SceneStatus::Ready(resources) => match FrameState::evaluate(&self.animation, &viewport) {
                Some(frame) => self.renderer.render_frame(&frame, resources),
                None => Ok(()),
            },
            SceneStatus::Loading(_) | SceneStatus::Failed => self.renderer.clear_frame(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wheel_down_advances() {
        assert_eq!(wheel_lines(&MouseScrollDelta::LineDelta(0.0, -3.0)), 3.0);
        assert_eq!(wheel_lines(&MouseScrollDelta::LineDelta(0.0, 1.0)), -1.0);
    }

    #[test]
    fn pixel_deltas_are_normalized_to_lines() {
        let d = MouseScrollDelta::PixelDelta(PhysicalPosition::new(0.0, -240.0));
        assert!((wheel_lines(&d) - 2.0).abs() < 1e-6);
    }

    #[test]
    fn pointer_is_bottom_up() {
        let size = PhysicalSize::new(800, 600);
        let top_left = normalized_pointer(PhysicalPosition::new(0.0, 0.0), size);
        assert_eq!(top_left, Vec2::new(0.0, 1.0));
        let center = normalized_pointer(PhysicalPosition::new(400.0, 300.0), size);
        assert_eq!(center, Vec2::splat(0.5));
    }

    #[test]
    fn pointer_on_empty_window_is_centered() {
        let p = normalized_pointer(PhysicalPosition::new(10.0, 10.0), PhysicalSize::new(0, 0));
        assert_eq!(p, Vec2::splat(0.5));
    }

    #[test]
    fn wheel_scroll_is_clamped_by_state() {
        let mut state = AnimationState::default();
        for _ in 0..100 {
            state.scroll_by(wheel_lines(&MouseScrollDelta::LineDelta(0.0, -1.0)) * 0.02);
        }
        assert_eq!(state.scroll_progress(), 1.0);
    }
}
