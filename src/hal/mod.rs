//! Hardware Abstraction Layer for the loopback firmware.
//!
//! Thin wrappers around ESP-IDF peripherals. Sequencing and policy stay in
//! the core modules; the HAL is just I/O. Only built on target: host tests
//! drive the core through the `ButtonInput`/`AudioBus` seams instead.

#[cfg(target_os = "espidf")]
pub mod button;
#[cfg(target_os = "espidf")]
pub mod i2s;

#[cfg(target_os = "espidf")]
pub use button::ButtonDriver;
#[cfg(target_os = "espidf")]
pub use i2s::{BusPins, I2sAudioBus};
