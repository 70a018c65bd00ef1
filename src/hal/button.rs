//! Button GPIO driver.
//!
//! Input with internal pull-up; pressed reads logic-low. Sampled by level
//! on every idle poll, no interrupt.

use esp_idf_svc::hal::gpio::{AnyInputPin, Input, PinDriver};
use esp_idf_svc::sys::{esp, EspError};

use crate::button::{ButtonConfig, ButtonInput};

/// Pulled-up input pin implementing the [`ButtonInput`] seam.
pub struct ButtonDriver<'d> {
    pin: PinDriver<'d, AnyInputPin, Input>,
    active_low: bool,
}

impl<'d> ButtonDriver<'d> {
    /// Configure the pin as a pulled-up input.
    ///
    /// The pull request goes through the raw driver call: GPIO34-39 are
    /// input-only and have no internal pull hardware, so the call is
    /// accepted but inert there.
    pub fn new(pin: AnyInputPin, config: &ButtonConfig) -> Result<Self, EspError> {
        let pin = PinDriver::input(pin)?;
        esp!(unsafe {
            esp_idf_svc::sys::gpio_set_pull_mode(
                config.pin,
                esp_idf_svc::sys::gpio_pull_mode_t_GPIO_PULLUP_ONLY,
            )
        })?;

        Ok(Self {
            pin,
            active_low: config.active_low,
        })
    }
}

impl<'d> ButtonInput for ButtonDriver<'d> {
    fn is_pressed(&mut self) -> bool {
        if self.active_low {
            self.pin.is_low()
        } else {
            self.pin.is_high()
        }
    }
}
