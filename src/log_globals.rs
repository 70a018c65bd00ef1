//! Global log stream instance.
//!
//! One ring is enough here: the control-loop worker and the bootstrap path
//! are the only producers, and the UART drain task is the single consumer.

use crate::logging::LogStream;

/// Firmware-wide log stream.
///
/// Producers: bootstrap (main task) and the loopback worker.
/// Consumer: the UART drain task.
pub static LOG_STREAM: LogStream = LogStream::new();
