//! Button input seam.
//!
//! The button is sampled by level on every idle poll: no debounce, no edge
//! detection, no interrupt. Pressed means the pin reads logic-low through
//! its internal pull-up.

/// Button pin configuration.
#[derive(Debug, Clone, Copy)]
pub struct ButtonConfig {
    pub pin: i32,
    pub active_low: bool,
}

impl Default for ButtonConfig {
    fn default() -> Self {
        Self {
            pin: crate::config::BUTTON_GPIO,
            active_low: true,
        }
    }
}

/// Level-triggered button input.
///
/// Implemented by the GPIO driver on target and by scripted mocks in host
/// tests. The read is assumed to always succeed once the pin is configured.
pub trait ButtonInput {
    /// Sample the current level. True while the button is held.
    fn is_pressed(&mut self) -> bool;
}
