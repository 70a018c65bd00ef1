//! Module: config
//!
//! Purpose: Compile-time hardware map and sizing for the loopback firmware.
//!
//! Everything here is fixed at build time: pin assignments, sample format,
//! clip length, poll interval, transfer timeouts and task geometry. There is
//! no runtime configuration surface.

/// Button input pin (pulled up, active-low).
pub const BUTTON_GPIO: i32 = 39;

/// I2S bit clock pin.
pub const I2S_BCK_GPIO: i32 = 19;

/// I2S word select pin. Doubles as the PDM clock in receive mode.
pub const I2S_WS_GPIO: i32 = 33;

/// I2S data out pin (speaker).
pub const I2S_DO_GPIO: i32 = 22;

/// I2S data in pin (microphone).
pub const I2S_DI_GPIO: i32 = 23;

/// Audio sample rate in Hz.
pub const SAMPLE_RATE_HZ: u32 = 16_000;

/// Bits per audio sample.
pub const SAMPLE_BITS: u32 = 16;

/// Recorded clip length in seconds.
pub const RECORD_SECONDS: u32 = 5;

/// Clip buffer size in bytes: rate * bytes-per-sample * duration.
pub const CLIP_BYTES: usize =
    (SAMPLE_RATE_HZ as usize) * (SAMPLE_BITS as usize / 8) * (RECORD_SECONDS as usize);

/// Button poll interval while idle, in milliseconds.
pub const POLL_INTERVAL_MS: u32 = 100;

/// Upper bound on a single record or playback transfer, in milliseconds.
///
/// The full clip takes `RECORD_SECONDS` to move in either direction; the
/// margin covers DMA start-up and scheduling jitter. A transfer that has not
/// completed within this window is reported as a timeout, never waited on
/// forever.
pub const TRANSFER_TIMEOUT_MS: u32 = RECORD_SECONDS * 1000 + 2000;

/// Number of DMA buffers for the I2S driver.
pub const DMA_BUFFER_COUNT: u32 = 6;

/// Frames per DMA buffer.
pub const DMA_FRAMES_PER_BUFFER: u32 = 60;

/// Control-loop task stack size in bytes.
pub const LOOPBACK_TASK_STACK: u32 = 4096;

/// Control-loop task priority.
pub const LOOPBACK_TASK_PRIORITY: u32 = 5;

/// Log drain task stack size in bytes.
pub const LOG_TASK_STACK: u32 = 3072;

/// Log drain task priority. Low: logging must never starve audio.
pub const LOG_TASK_PRIORITY: u32 = 2;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clip_size_matches_format() {
        // 16 kHz * 2 bytes * 5 s
        assert_eq!(CLIP_BYTES, 160_000);
    }

    #[test]
    fn test_transfer_timeout_covers_clip() {
        assert!(TRANSFER_TIMEOUT_MS > RECORD_SECONDS * 1000);
    }
}
