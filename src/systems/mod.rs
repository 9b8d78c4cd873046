//! Per-concern application systems driven by the event loop
//!
//! - [`WindowSystem`]: the window and its status title
//! - [`RenderSystem`]: GPU context and frame submission
//! - [`AnimationSystem`]: the pausable clock feeding the animation update

mod animation;
mod render;
mod window;

pub use animation::{AnimationClock, AnimationSystem};
pub use render::{RenderError, RenderSystem};
pub use window::{TitleStatus, WindowError, WindowSystem};
