//! Keyboard bindings
//!
//! The camera is fixed, so the keyboard only drives application-level
//! actions. Each binding is one row of [`BINDINGS`].

use winit::event::ElementState;
use winit::keyboard::KeyCode;

/// Something the user asked the application to do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputAction {
    Exit,
    ToggleFullscreen,
    /// Freeze or resume the animation clock
    TogglePause,
}

impl InputAction {
    /// Short label for the controls help line
    pub fn label(self) -> &'static str {
        match self {
            InputAction::Exit => "quit",
            InputAction::ToggleFullscreen => "fullscreen",
            InputAction::TogglePause => "pause",
        }
    }
}

/// Key, printable key name, action
pub const BINDINGS: &[(KeyCode, &str, InputAction)] = &[
    (KeyCode::Escape, "Esc", InputAction::Exit),
    (KeyCode::KeyF, "F", InputAction::ToggleFullscreen),
    (KeyCode::KeyP, "P", InputAction::TogglePause),
];

/// Translates key events into [`InputAction`]s
pub struct InputMapper;

impl InputMapper {
    /// Action bound to `key`, reported on press only
    pub fn map_keyboard(key: KeyCode, state: ElementState) -> Option<InputAction> {
        if !state.is_pressed() {
            return None;
        }
        BINDINGS
            .iter()
            .find(|(bound, _, _)| *bound == key)
            .map(|&(_, _, action)| action)
    }

    /// One-line summary such as `Esc: quit, F: fullscreen, P: pause`
    pub fn help() -> String {
        BINDINGS
            .iter()
            .map(|(_, name, action)| format!("{}: {}", name, action.label()))
            .collect::<Vec<_>>()
            .join(", ")
    }
}
