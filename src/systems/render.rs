//! Render system
//!
//! Couples the wgpu surface with the [`SceneRenderer`] and turns surface
//! failures into [`RenderError`]s the event loop can act on.

use std::sync::Arc;
use winit::{dpi::PhysicalSize, window::Window};
use diorama_core::SceneGraph;
use diorama_render::{Camera3D, ContextError, Lighting, RenderContext, SceneRenderer};
use crate::config::RenderingConfig;

/// Frames between draw-count debug logs
const STATS_INTERVAL: u64 = 600;

#[derive(Debug)]
pub enum RenderError {
    /// Surface lost or outdated; reconfigure and try the next frame
    SurfaceLost,
    /// The GPU ran out of memory; not recoverable
    OutOfMemory,
    /// Setup failure or transient surface error
    Other(String),
}

impl std::fmt::Display for RenderError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RenderError::SurfaceLost => f.write_str("surface lost"),
            RenderError::OutOfMemory => f.write_str("GPU out of memory"),
            RenderError::Other(msg) => write!(f, "render error: {}", msg),
        }
    }
}

impl std::error::Error for RenderError {}

impl From<ContextError> for RenderError {
    fn from(e: ContextError) -> Self {
        RenderError::Other(e.to_string())
    }
}

impl From<wgpu::SurfaceError> for RenderError {
    fn from(e: wgpu::SurfaceError) -> Self {
        match e {
            wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated => RenderError::SurfaceLost,
            wgpu::SurfaceError::OutOfMemory => RenderError::OutOfMemory,
            other => RenderError::Other(format!("{:?}", other)),
        }
    }
}

/// Draws the scene graph into the window surface
pub struct RenderSystem {
    context: RenderContext,
    renderer: SceneRenderer,
    clear: wgpu::Color,
    frames: u64,
}

impl RenderSystem {
    /// Set up the GPU for `window`, blocking until the device is ready
    pub fn new(window: Arc<Window>, config: RenderingConfig) -> Result<Self, RenderError> {
        let context = pollster::block_on(RenderContext::with_vsync(window, config.vsync))?;
        let mut renderer = SceneRenderer::new(&context.device, &context.queue, context.config.format);
        renderer.resize(&context.device, context.config.width, context.config.height);

        Ok(Self {
            context,
            renderer,
            clear: clear_color(&config),
            frames: 0,
        })
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.context.resize(PhysicalSize::new(width, height));
        let config = &self.context.config;
        self.renderer.resize(&self.context.device, config.width, config.height);
    }

    /// Configure the surface again at its current size
    pub fn reconfigure(&mut self) {
        let size = self.context.size;
        self.resize(size.width, size.height);
    }

    pub fn render_frame(&mut self, graph: &SceneGraph, camera: &Camera3D, lighting: &Lighting) -> Result<(), RenderError> {
        let frame = self.context.surface.get_current_texture()?;
        let view = frame.texture.create_view(&wgpu::TextureViewDescriptor::default());

        let device = &self.context.device;
        let queue = &self.context.queue;
        self.renderer.prepare(device, queue, graph, camera, lighting);

        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("Diorama Frame"),
        });
        self.renderer.render(&mut encoder, &view, self.clear);
        queue.submit(std::iter::once(encoder.finish()));
        frame.present();

        self.frames += 1;
        if self.frames % STATS_INTERVAL == 0 {
            log::debug!("Frame {}: {} draws", self.frames, self.renderer.draw_count());
        }
        Ok(())
    }

    /// Surface size in physical pixels
    pub fn size(&self) -> (u32, u32) {
        (self.context.size.width, self.context.size.height)
    }

    pub fn aspect_ratio(&self) -> f32 {
        self.context.aspect_ratio()
    }
}

fn clear_color(config: &RenderingConfig) -> wgpu::Color {
    let [r, g, b, a] = config.background_color.map(f64::from);
    wgpu::Color { r, g, b, a }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        assert_eq!(RenderError::SurfaceLost.to_string(), "surface lost");
        assert_eq!(RenderError::OutOfMemory.to_string(), "GPU out of memory");
        assert_eq!(RenderError::Other("timeout".into()).to_string(), "render error: timeout");
    }

    #[test]
    fn test_surface_errors_classified() {
        assert!(matches!(RenderError::from(wgpu::SurfaceError::Lost), RenderError::SurfaceLost));
        assert!(matches!(RenderError::from(wgpu::SurfaceError::Outdated), RenderError::SurfaceLost));
        assert!(matches!(RenderError::from(wgpu::SurfaceError::OutOfMemory), RenderError::OutOfMemory));
        assert!(matches!(RenderError::from(wgpu::SurfaceError::Timeout), RenderError::Other(_)));
    }

    #[test]
    fn test_context_errors_are_other() {
        let err = RenderError::from(ContextError::NoAdapter);
        assert!(matches!(err, RenderError::Other(_)));
        assert!(err.to_string().starts_with("render error: "));
    }

    #[test]
    fn test_clear_color_from_config() {
        let config = RenderingConfig {
            vsync: true,
            background_color: [0.25, 0.5, 1.0, 1.0],
        };
        let c = clear_color(&config);
        assert_eq!((c.r, c.g, c.b, c.a), (0.25, 0.5, 1.0, 1.0));
    }
}
