//! RustAudioLoopback - Main entry point
//!
//! Bootstrap sequence:
//! 1. Start the UART log drain task
//! 2. Configure the button input
//! 3. Allocate the audio clip from internal RAM
//! 4. Hand button + bus + clip to the loopback worker and spawn it
//!
//! On clip allocation failure the worker is never started: the firmware
//! stays idle with only the log drain running.

#![cfg_attr(target_os = "espidf", no_std)]
#![cfg_attr(target_os = "espidf", no_main)]

#[cfg(target_os = "espidf")]
mod firmware {
    use esp_idf_svc::sys as esp_idf_sys;

    use core::ffi::c_void;

    use esp_idf_svc::hal::delay::FreeRtos;
    use esp_idf_svc::hal::gpio::InputPin;
    use esp_idf_svc::hal::peripherals::Peripherals;
    use esp_idf_svc::hal::uart::UartTxDriver;

    use rust_audio_loopback::{
        button::ButtonConfig,
        clip::ClipBuffer,
        config,
        fault::FaultState,
        hal::{BusPins, ButtonDriver, I2sAudioBus},
        log_globals::LOG_STREAM,
        logging::timestamp_us,
        loopback::LoopbackController,
        rt_error, rt_info,
        uart_logger::{self, UartLoggerConfig},
    };

    /// Fault latch shared between the worker and diagnostics.
    static FAULT_STATE: FaultState = FaultState::new();

    type Worker = LoopbackController<'static, ButtonDriver<'static>, I2sAudioBus>;

    // Initialized by bootstrap, then owned exclusively by the spawned tasks.
    static mut WORKER: Option<Worker> = None;
    static mut LOG_UART: Option<UartTxDriver<'static>> = None;

    extern "C" fn log_drain_entry(_arg: *mut c_void) {
        // SAFETY: set before the task is spawned; no other access afterwards.
        let uart = unsafe { LOG_UART.as_mut().expect("log uart not initialized") };
        uart_logger::uart_logger_task(uart);
    }

    extern "C" fn loopback_entry(_arg: *mut c_void) {
        // SAFETY: set before the task is spawned; no other access afterwards.
        let worker = unsafe { WORKER.as_mut().expect("worker not initialized") };

        loop {
            worker.poll();
            FreeRtos::delay_ms(config::POLL_INTERVAL_MS);
        }
    }

    fn spawn_task(
        entry: extern "C" fn(*mut c_void),
        name: &'static [u8],
        stack: u32,
        priority: u32,
        core_id: i32,
    ) -> bool {
        let rc = unsafe {
            esp_idf_sys::xTaskCreatePinnedToCore(
                Some(entry),
                name.as_ptr().cast(),
                stack,
                core::ptr::null_mut(),
                priority,
                core::ptr::null_mut(),
                core_id,
            )
        };
        rc == 1
    }

    #[no_mangle]
    fn main() {
        // Initialize ESP-IDF
        esp_idf_sys::link_patches();

        let peripherals = Peripherals::take().expect("peripherals already taken");
        let pins = peripherals.pins;

        // Log drain goes up first so every later failure is visible.
        let uart = uart_logger::init_uart_logger(
            peripherals.uart0,
            pins.gpio1,
            &UartLoggerConfig::default(),
        )
        .expect("uart logger init failed");
        unsafe {
            LOG_UART = Some(uart);
        }
        if !spawn_task(
            log_drain_entry,
            b"log_drain\0",
            config::LOG_TASK_STACK,
            config::LOG_TASK_PRIORITY,
            1,
        ) {
            // No log sink; nothing left worth starting.
            return;
        }

        rt_info!(LOG_STREAM, timestamp_us(), "Audio loopback starting");

        let button =
            match ButtonDriver::new(pins.gpio39.downgrade_input(), &ButtonConfig::default()) {
                Ok(button) => button,
                Err(err) => {
                    rt_error!(LOG_STREAM, timestamp_us(), "Button init failed: {}", err);
                    return;
                }
            };

        let bus = I2sAudioBus::new(
            peripherals.i2s0,
            BusPins {
                bclk: pins.gpio19,
                ws: pins.gpio33,
                dout: pins.gpio22,
                din: pins.gpio23,
            },
        );

        // The clip must sit in internal, byte-addressable RAM: the I2S DMA
        // path cannot be fed from external memory.
        let raw = unsafe {
            esp_idf_sys::heap_caps_malloc(
                config::CLIP_BYTES,
                esp_idf_sys::MALLOC_CAP_INTERNAL | esp_idf_sys::MALLOC_CAP_8BIT,
            )
        } as *mut u8;
        if raw.is_null() {
            rt_error!(
                LOG_STREAM,
                timestamp_us(),
                "Failed to allocate {} byte audio clip",
                config::CLIP_BYTES
            );
            return;
        }
        // SAFETY: freshly allocated region of exactly CLIP_BYTES, never
        // freed; ownership moves into the worker below and never leaves it.
        let clip =
            ClipBuffer::new(unsafe { core::slice::from_raw_parts_mut(raw, config::CLIP_BYTES) });

        unsafe {
            WORKER = Some(LoopbackController::new(
                button,
                bus,
                clip,
                &FAULT_STATE,
                &LOG_STREAM,
            ));
        }

        if spawn_task(
            loopback_entry,
            b"loopback\0",
            config::LOOPBACK_TASK_STACK,
            config::LOOPBACK_TASK_PRIORITY,
            0,
        ) {
            rt_info!(LOG_STREAM, timestamp_us(), "Loopback worker started");
        } else {
            rt_error!(LOG_STREAM, timestamp_us(), "Failed to start loopback worker");
        }
    }
}

/// The firmware entry point only exists for the espidf target; host builds
/// of this binary are compile-check stubs.
#[cfg(not(target_os = "espidf"))]
fn main() {}
