//! Shared serial audio bus model.
//!
//! One physical I2S peripheral serves both the microphone and the speaker,
//! so it is reconfigured between roles rather than duplicated. The rules:
//!
//! - The bus is in exactly one of three modes: closed, receiving,
//!   transmitting.
//! - A direction can only be opened from the closed mode. Switching
//!   direction requires a full close (driver uninstall) first.
//!
//! [`BusMode`] encodes those rules as explicit transitions so an
//! out-of-order open is an error, not undefined peripheral behavior.
//! The hardware driver lives in `hal::i2s`; everything here is pure state
//! and is shared with the host tests.

use crate::clip::ClipBuffer;

/// Transfer direction of the shared bus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BusDirection {
    /// Microphone capture (PDM demodulated input).
    Receive,
    /// Speaker output (standard frame format).
    Transmit,
}

/// Current mode of the shared bus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BusMode {
    /// No driver installed. The only mode a direction may be opened from.
    #[default]
    Closed,
    /// Driver installed for microphone capture.
    Receiving,
    /// Driver installed for speaker output.
    Transmitting,
}

impl BusMode {
    /// Attempt the transition into `direction`.
    ///
    /// Fails unless the bus is closed: the peripheral cannot run two
    /// directions at once and cannot be reconfigured in place.
    pub fn open(self, direction: BusDirection) -> Result<BusMode, BusError> {
        match self {
            BusMode::Closed => Ok(match direction {
                BusDirection::Receive => BusMode::Receiving,
                BusDirection::Transmit => BusMode::Transmitting,
            }),
            busy => Err(BusError::AlreadyOpen(busy)),
        }
    }

    /// Transition back to closed. Valid from any mode.
    pub fn close(self) -> BusMode {
        BusMode::Closed
    }

    /// Check if a driver is currently installed.
    #[inline]
    pub fn is_open(self) -> bool {
        self != BusMode::Closed
    }
}

/// Ephemeral bus configuration, built fresh for every mode switch.
///
/// There is no persistent bus identity: the driver is fully torn down and
/// rebuilt from one of these on each direction change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BusConfig {
    pub direction: BusDirection,
    /// Sample rate in Hz.
    pub sample_rate_hz: u32,
    /// Bits per sample.
    pub sample_bits: u32,
    /// PDM demodulation on the input path (receive only).
    pub pdm_input: bool,
    /// Fractional clock generator (APLL). Off for transmit.
    pub use_apll: bool,
    /// Clear the output DMA buffers automatically on underrun.
    pub auto_clear_on_underrun: bool,
    /// DMA buffer count.
    pub dma_buffer_count: u32,
    /// Frames per DMA buffer.
    pub dma_frames_per_buffer: u32,
}

impl BusConfig {
    /// Microphone capture: mono PDM input at the configured rate.
    pub fn receive(sample_rate_hz: u32, sample_bits: u32) -> Self {
        Self {
            direction: BusDirection::Receive,
            sample_rate_hz,
            sample_bits,
            pdm_input: true,
            use_apll: false,
            auto_clear_on_underrun: false,
            dma_buffer_count: crate::config::DMA_BUFFER_COUNT,
            dma_frames_per_buffer: crate::config::DMA_FRAMES_PER_BUFFER,
        }
    }

    /// Speaker output: standard two-channel frame driven mono, APLL off,
    /// output buffers cleared on underrun.
    pub fn transmit(sample_rate_hz: u32, sample_bits: u32) -> Self {
        Self {
            direction: BusDirection::Transmit,
            sample_rate_hz,
            sample_bits,
            pdm_input: false,
            use_apll: false,
            auto_clear_on_underrun: true,
            dma_buffer_count: crate::config::DMA_BUFFER_COUNT,
            dma_frames_per_buffer: crate::config::DMA_FRAMES_PER_BUFFER,
        }
    }

    /// Build the configuration for `direction` with the firmware's fixed
    /// sample format.
    pub fn for_direction(direction: BusDirection) -> Self {
        match direction {
            BusDirection::Receive => {
                Self::receive(crate::config::SAMPLE_RATE_HZ, crate::config::SAMPLE_BITS)
            }
            BusDirection::Transmit => {
                Self::transmit(crate::config::SAMPLE_RATE_HZ, crate::config::SAMPLE_BITS)
            }
        }
    }
}

/// Bus configuration failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BusError {
    /// Driver install rejected by the peripheral layer. Carries the raw
    /// driver error code.
    Install(i32),
    /// Open attempted while a driver is still installed.
    AlreadyOpen(BusMode),
}

/// Outcome of a single bounded transfer.
///
/// Transfers are bounded and report what actually happened instead of
/// blocking forever on a wedged peripheral.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferError {
    /// The bus could not be configured for the transfer.
    Bus(BusError),
    /// The bounded wait expired before the transfer completed.
    Timeout,
    /// The driver moved fewer bytes than requested. The caller decides
    /// whether the partial data is usable.
    Short { expected: usize, actual: usize },
    /// Driver-level transfer failure. Carries the raw driver error code.
    Hardware(i32),
}

impl From<BusError> for TransferError {
    fn from(err: BusError) -> Self {
        TransferError::Bus(err)
    }
}

/// The record/playback seam between the control loop and the hardware.
///
/// The I2S driver implements this on target; host tests script it.
pub trait AudioBus {
    /// Fill the clip from the microphone: open receive, one bounded blocking
    /// read of the full clip capacity, close. On success and on short
    /// transfers the clip's captured length reflects the bytes filled.
    fn record(&mut self, clip: &mut ClipBuffer<'_>) -> Result<usize, TransferError>;

    /// Drain the clip's captured audio to the speaker: open transmit, one
    /// bounded blocking write, close.
    fn play(&mut self, clip: &ClipBuffer<'_>) -> Result<usize, TransferError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_from_closed() {
        assert_eq!(
            BusMode::Closed.open(BusDirection::Receive),
            Ok(BusMode::Receiving)
        );
        assert_eq!(
            BusMode::Closed.open(BusDirection::Transmit),
            Ok(BusMode::Transmitting)
        );
    }

    #[test]
    fn test_open_while_open_is_rejected() {
        let receiving = BusMode::Closed.open(BusDirection::Receive).unwrap();
        assert_eq!(
            receiving.open(BusDirection::Transmit),
            Err(BusError::AlreadyOpen(BusMode::Receiving))
        );
        // Same direction twice is just as illegal: no in-place reconfigure.
        assert_eq!(
            receiving.open(BusDirection::Receive),
            Err(BusError::AlreadyOpen(BusMode::Receiving))
        );
    }

    #[test]
    fn test_close_then_reopen_other_direction() {
        let mode = BusMode::Closed.open(BusDirection::Receive).unwrap();
        let mode = mode.close();
        assert_eq!(mode, BusMode::Closed);
        assert_eq!(mode.open(BusDirection::Transmit), Ok(BusMode::Transmitting));
    }

    #[test]
    fn test_close_is_idempotent() {
        assert_eq!(BusMode::Closed.close(), BusMode::Closed);
        assert_eq!(BusMode::Transmitting.close(), BusMode::Closed);
    }

    #[test]
    fn test_receive_config_uses_pdm_mono() {
        let cfg = BusConfig::for_direction(BusDirection::Receive);
        assert_eq!(cfg.sample_rate_hz, 16_000);
        assert_eq!(cfg.sample_bits, 16);
        assert!(cfg.pdm_input);
        assert!(!cfg.auto_clear_on_underrun);
    }

    #[test]
    fn test_transmit_config_disables_apll_and_clears_underruns() {
        let cfg = BusConfig::for_direction(BusDirection::Transmit);
        assert!(!cfg.pdm_input);
        assert!(!cfg.use_apll);
        assert!(cfg.auto_clear_on_underrun);
    }
}
