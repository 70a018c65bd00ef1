//! Fault latch for the loopback worker.
//!
//! Playing garbage through the speaker is worse than silence: once the bus
//! misbehaves in a way the loop cannot recover from, the fault latches and
//! the worker stops servicing button presses. The latch keeps code, data
//! and a lifetime count for diagnostics over the log stream.

use core::sync::atomic::{AtomicBool, AtomicU32, AtomicU8, Ordering};

/// Fault codes indicating why audio activity stopped.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum FaultCode {
    /// No fault (normal operation).
    None = 0,

    /// The I2S driver refused to install for the requested direction.
    BusInstall = 1,

    /// A bounded record or playback transfer did not complete in time.
    /// The peripheral is presumed wedged.
    TransferTimeout = 2,

    /// Driver-level transfer failure.
    HardwareFault = 3,
}

impl FaultCode {
    /// Convert from raw u8 value.
    pub fn from_u8(value: u8) -> Self {
        match value {
            1 => FaultCode::BusInstall,
            2 => FaultCode::TransferTimeout,
            3 => FaultCode::HardwareFault,
            _ => FaultCode::None,
        }
    }
}

/// Thread-safe sticky fault state.
///
/// Set by the control-loop task, readable from anywhere. Clearing is only
/// used by tests: the firmware has no runtime recovery path, matching the
/// no-supervisor process model.
pub struct FaultState {
    /// True if fault is active.
    active: AtomicBool,

    /// Fault code (reason audio stopped).
    code: AtomicU8,

    /// Additional data (e.g. raw driver error code, bytes transferred).
    data: AtomicU32,

    /// Total fault count since boot (never cleared).
    count: AtomicU32,
}

impl FaultState {
    /// Create new fault state (no fault).
    pub const fn new() -> Self {
        Self {
            active: AtomicBool::new(false),
            code: AtomicU8::new(0),
            data: AtomicU32::new(0),
            count: AtomicU32::new(0),
        }
    }

    /// Latch a fault with the given code and data.
    #[inline]
    pub fn set(&self, code: FaultCode, data: u32) {
        self.code.store(code as u8, Ordering::Release);
        self.data.store(data, Ordering::Release);
        self.count.fetch_add(1, Ordering::Relaxed);
        self.active.store(true, Ordering::Release);
    }

    /// Check if a fault is currently latched.
    #[inline]
    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::Acquire)
    }

    /// Get fault code (only meaningful if `is_active()` is true).
    #[inline]
    pub fn code(&self) -> FaultCode {
        FaultCode::from_u8(self.code.load(Ordering::Acquire))
    }

    /// Get fault data (meaning depends on fault code).
    #[inline]
    pub fn data(&self) -> u32 {
        self.data.load(Ordering::Acquire)
    }

    /// Get total fault count since boot.
    #[inline]
    pub fn count(&self) -> u32 {
        self.count.load(Ordering::Relaxed)
    }

    /// Clear the active flag. The counter is preserved for diagnostics.
    #[inline]
    pub fn clear(&self) {
        self.active.store(false, Ordering::Release);
    }
}

impl Default for FaultState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fault_state_basic() {
        let fault = FaultState::new();

        assert!(!fault.is_active());
        assert_eq!(fault.code(), FaultCode::None);
        assert_eq!(fault.count(), 0);

        fault.set(FaultCode::TransferTimeout, 42);

        assert!(fault.is_active());
        assert_eq!(fault.code(), FaultCode::TransferTimeout);
        assert_eq!(fault.data(), 42);
        assert_eq!(fault.count(), 1);

        fault.clear();

        assert!(!fault.is_active());
        assert_eq!(fault.count(), 1); // Count preserved
    }

    #[test]
    fn test_fault_count_accumulates() {
        let fault = FaultState::new();

        fault.set(FaultCode::BusInstall, 1);
        fault.clear();
        fault.set(FaultCode::HardwareFault, 2);
        fault.clear();
        fault.set(FaultCode::TransferTimeout, 3);

        assert_eq!(fault.count(), 3);
    }

    #[test]
    fn test_fault_code_roundtrip() {
        for code in [
            FaultCode::None,
            FaultCode::BusInstall,
            FaultCode::TransferTimeout,
            FaultCode::HardwareFault,
        ] {
            assert_eq!(FaultCode::from_u8(code as u8), code);
        }
        assert_eq!(FaultCode::from_u8(0xFF), FaultCode::None);
    }
}
