//! Window management system
//!
//! Owns the winit window. The title doubles as a status line showing
//! whether the animation is paused and how many assets are still loading.

use std::sync::Arc;
use winit::{
    dpi::LogicalSize,
    event_loop::ActiveEventLoop,
    window::{Fullscreen, Window, WindowAttributes},
};
use crate::config::WindowConfig;

/// What the title bar reports
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TitleStatus {
    pub paused: bool,
    /// Assets requested but not yet attached
    pub loading: usize,
}

/// The application window
pub struct WindowSystem {
    window: Arc<Window>,
    base_title: String,
    status: TitleStatus,
}

impl WindowSystem {
    pub fn create(event_loop: &ActiveEventLoop, config: &WindowConfig) -> Result<Self, WindowError> {
        let window = event_loop
            .create_window(attributes(config))
            .map_err(|e| WindowError::CreationFailed(e.to_string()))?;

        log::info!("Created {}x{} window '{}'", config.width, config.height, config.title);
        Ok(Self {
            window: Arc::new(window),
            base_title: config.title.clone(),
            status: TitleStatus::default(),
        })
    }

    /// Shared handle, for creating the render surface
    pub fn window(&self) -> &Arc<Window> {
        &self.window
    }

    pub fn is_fullscreen(&self) -> bool {
        self.window.fullscreen().is_some()
    }

    /// Switch between borderless fullscreen and windowed
    pub fn toggle_fullscreen(&self) {
        let next = if self.is_fullscreen() { None } else { Some(Fullscreen::Borderless(None)) };
        self.window.set_fullscreen(next);
    }

    /// Update the title if the status changed
    pub fn set_status(&mut self, status: TitleStatus) {
        if status != self.status {
            self.status = status;
            self.window.set_title(&format_title(&self.base_title, status));
        }
    }

    pub fn status(&self) -> TitleStatus {
        self.status
    }

    pub fn request_redraw(&self) {
        self.window.request_redraw();
    }
}

fn attributes(config: &WindowConfig) -> WindowAttributes {
    let attrs = Window::default_attributes()
        .with_title(format_title(&config.title, TitleStatus::default()))
        .with_inner_size(LogicalSize::new(config.width, config.height));
    if config.fullscreen {
        attrs.with_fullscreen(Some(Fullscreen::Borderless(None)))
    } else {
        attrs
    }
}

fn format_title(base: &str, status: TitleStatus) -> String {
    let mut title = base.to_string();
    if status.loading > 0 {
        title.push_str(&format!(" - loading {} assets", status.loading));
    }
    if status.paused {
        title.push_str(" [paused, P to resume]");
    }
    title
}

#[derive(Debug)]
pub enum WindowError {
    CreationFailed(String),
}

impl std::fmt::Display for WindowError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WindowError::CreationFailed(msg) => write!(f, "Window creation failed: {}", msg),
        }
    }
}

impl std::error::Error for WindowError {}
