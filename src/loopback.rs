//! Button-gated record/playback control loop.
//!
//! One worker owns the button, the bus and the clip for the process
//! lifetime. It polls the button level every 100 ms; a pressed poll runs a
//! full cycle (record the clip, then play it back), blocking the worker
//! for the duration of both transfers. The button is not sampled during a
//! cycle, so releases or re-presses mid-cycle are never observed, and the
//! loop returns to idle unconditionally once playback finishes.
//!
//! Error policy: a short transfer is tolerated (the captured prefix is
//! played and a warning logged); a timeout or hardware error latches the
//! fault state, after which presses are ignored.

use crate::bus::{AudioBus, BusError, TransferError};
use crate::button::ButtonInput;
use crate::clip::ClipBuffer;
use crate::fault::{FaultCode, FaultState};
use crate::logging::{timestamp_us, LogStream};
use crate::{rt_error, rt_info, rt_warn};

/// Control loop state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    /// Waiting for a pressed poll.
    Idle,
    /// Running a record/playback cycle.
    Active,
}

/// What a single poll did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollOutcome {
    /// Button not pressed, or fault latched: nothing happened.
    Idle,
    /// A full cycle ran. `recorded` and `played` are byte counts.
    Completed { recorded: usize, played: usize },
    /// The cycle aborted and the fault latched.
    Faulted(FaultCode),
}

/// The control loop worker.
///
/// Owns its inputs for the process lifetime; nothing else touches the clip
/// or the bus. Generic over the two hardware seams so the sequencing runs
/// under host tests with scripted mocks.
pub struct LoopbackController<'a, B, A> {
    button: B,
    bus: A,
    clip: ClipBuffer<'a>,
    fault: &'a FaultState,
    log: &'a LogStream,
    state: LoopState,
    cycles: u32,
}

impl<'a, B: ButtonInput, A: AudioBus> LoopbackController<'a, B, A> {
    /// Create the controller. Ownership of the clip moves in here and never
    /// leaves.
    pub fn new(button: B, bus: A, clip: ClipBuffer<'a>, fault: &'a FaultState, log: &'a LogStream) -> Self {
        Self {
            button,
            bus,
            clip,
            fault,
            log,
            state: LoopState::Idle,
            cycles: 0,
        }
    }

    /// Current loop state.
    #[inline]
    pub fn state(&self) -> LoopState {
        self.state
    }

    /// Completed record/playback cycles since boot.
    #[inline]
    pub fn cycles(&self) -> u32 {
        self.cycles
    }

    /// One poll iteration: sample the button level and, if pressed, run a
    /// full record-then-play cycle before returning.
    ///
    /// Blocks for the duration of both transfers (~5 s record plus playback
    /// of whatever was captured). The caller sleeps the poll interval
    /// between invocations.
    pub fn poll(&mut self) -> PollOutcome {
        if self.fault.is_active() {
            return PollOutcome::Idle;
        }

        if !self.button.is_pressed() {
            return PollOutcome::Idle;
        }

        self.state = LoopState::Active;
        rt_info!(self.log, timestamp_us(), "Button pressed, start recording");

        let recorded = match self.bus.record(&mut self.clip) {
            Ok(n) => {
                rt_info!(self.log, timestamp_us(), "Finished recording: {} bytes", n);
                n
            }
            Err(TransferError::Short { expected, actual }) => {
                // Tolerated: play back only what was captured.
                rt_warn!(
                    self.log,
                    timestamp_us(),
                    "Short recording: {}/{} bytes captured",
                    actual,
                    expected
                );
                actual
            }
            Err(err) => return self.fail(err),
        };

        rt_info!(self.log, timestamp_us(), "Start playback");

        let played = match self.bus.play(&self.clip) {
            Ok(n) => {
                rt_info!(self.log, timestamp_us(), "Finished playback: {} bytes", n);
                n
            }
            Err(TransferError::Short { expected, actual }) => {
                rt_warn!(
                    self.log,
                    timestamp_us(),
                    "Short playback: {}/{} bytes written",
                    actual,
                    expected
                );
                actual
            }
            Err(err) => return self.fail(err),
        };

        self.state = LoopState::Idle;
        self.cycles = self.cycles.wrapping_add(1);
        PollOutcome::Completed { recorded, played }
    }

    /// Latch the fault for an unrecoverable transfer error and go idle.
    fn fail(&mut self, err: TransferError) -> PollOutcome {
        let (code, data) = match err {
            TransferError::Bus(BusError::Install(raw)) => (FaultCode::BusInstall, raw as u32),
            TransferError::Bus(BusError::AlreadyOpen(_)) => (FaultCode::BusInstall, 0),
            TransferError::Timeout => (FaultCode::TransferTimeout, 0),
            TransferError::Hardware(raw) => (FaultCode::HardwareFault, raw as u32),
            TransferError::Short { actual, .. } => (FaultCode::HardwareFault, actual as u32),
        };

        self.fault.set(code, data);
        rt_error!(
            self.log,
            timestamp_us(),
            "Loopback fault: {:?} (data={})",
            code,
            data
        );

        self.state = LoopState::Idle;
        PollOutcome::Faulted(code)
    }
}
