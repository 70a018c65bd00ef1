//! # RustAudioLoopback
//!
//! Button-triggered audio loopback for ESP32: hold the button, a 5-second
//! mono clip is captured from the PDM microphone, then played straight back
//! through the I2S speaker. Both directions share the single I2S0
//! peripheral, torn down and rebuilt between roles.
//!
//! ## Architecture
//!
//! - One worker task owns the button, the bus and the clip; it polls the
//!   button level and runs each record/playback cycle to completion.
//! - The bus is modeled as a three-mode resource (closed, receiving,
//!   transmitting) whose transitions enforce uninstall-before-reconfigure.
//! - Transfers are bounded; a wedged peripheral latches the [`FaultState`]
//!   instead of hanging the worker forever.
//! - Logging is a lock-free ring drained to UART by a separate task.
//!
//! Hardware lives behind the `ButtonInput`/`AudioBus` seams in [`hal`];
//! everything else runs under host tests.

#![cfg_attr(not(test), no_std)]

pub mod bus;
pub mod button;
pub mod clip;
pub mod config;
pub mod fault;
pub mod hal;
pub mod log_globals;
pub mod logging;
pub mod loopback;
pub mod uart_logger;

pub use bus::{AudioBus, BusConfig, BusDirection, BusError, BusMode, TransferError};
pub use button::{ButtonConfig, ButtonInput};
pub use clip::ClipBuffer;
pub use fault::{FaultCode, FaultState};
pub use log_globals::LOG_STREAM;
pub use loopback::{LoopState, LoopbackController, PollOutcome};
