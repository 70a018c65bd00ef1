//! I2S bus driver: the shared peripheral behind both audio directions.
//!
//! The I2S0 peripheral and its four pins live here for the process
//! lifetime. Each record or playback installs a fresh driver for the
//! needed direction (PDM demodulated RX for the microphone, standard
//! Philips TX for the speaker), runs one bounded blocking transfer for the
//! whole clip, and uninstalls the driver again by dropping it. The
//! [`BusMode`] machine guards the sequence so a direction can never be
//! opened over a live driver.

use esp_idf_svc::hal::delay::TickType;
use esp_idf_svc::hal::gpio::{AnyIOPin, Gpio19, Gpio22, Gpio23, Gpio33};
use esp_idf_svc::hal::i2s::config::{
    Config, DataBitWidth, PdmRxClkConfig, PdmRxConfig, PdmRxGpioConfig, PdmRxSlotConfig, SlotMode,
    StdClkConfig, StdConfig, StdGpioConfig, StdSlotConfig,
};
use esp_idf_svc::hal::i2s::{I2sDriver, I2S0};
use esp_idf_svc::sys::{EspError, ESP_ERR_TIMEOUT};

use crate::bus::{AudioBus, BusConfig, BusDirection, BusError, BusMode, TransferError};
use crate::clip::ClipBuffer;
use crate::config;

/// Fixed I2S pin assignment.
///
/// The word-select line doubles as the PDM clock in receive mode.
pub struct BusPins {
    pub bclk: Gpio19,
    pub ws: Gpio33,
    pub dout: Gpio22,
    pub din: Gpio23,
}

/// The shared audio bus.
pub struct I2sAudioBus {
    i2s: I2S0,
    pins: BusPins,
    mode: BusMode,
    timeout: u32,
}

impl I2sAudioBus {
    /// Take ownership of the peripheral and pins. The bus starts closed.
    pub fn new(i2s: I2S0, pins: BusPins) -> Self {
        Self {
            i2s,
            pins,
            mode: BusMode::Closed,
            timeout: TickType::new_millis(config::TRANSFER_TIMEOUT_MS as u64).ticks(),
        }
    }

    /// Current bus mode.
    pub fn mode(&self) -> BusMode {
        self.mode
    }

    fn receive_config(cfg: &BusConfig) -> PdmRxConfig {
        PdmRxConfig::new(
            Config::default()
                .dma_desc(cfg.dma_buffer_count)
                .frames(cfg.dma_frames_per_buffer),
            PdmRxClkConfig::from_sample_rate_hz(cfg.sample_rate_hz),
            PdmRxSlotConfig::from_bits_per_sample_and_slot_mode(
                DataBitWidth::Bits16,
                SlotMode::Mono,
            ),
            PdmRxGpioConfig::default(),
        )
    }

    fn transmit_config(cfg: &BusConfig) -> StdConfig {
        // Stereo-capable Philips frame driven as a mono slot; APLL stays
        // off (the default PLL clock source).
        StdConfig::new(
            Config::default()
                .auto_clear(cfg.auto_clear_on_underrun)
                .dma_desc(cfg.dma_buffer_count)
                .frames(cfg.dma_frames_per_buffer),
            StdClkConfig::from_sample_rate_hz(cfg.sample_rate_hz),
            StdSlotConfig::philips_slot_default(DataBitWidth::Bits16, SlotMode::Mono),
            StdGpioConfig::default(),
        )
    }

    /// One bounded capture of the full clip capacity.
    fn read_clip(&mut self, clip: &mut ClipBuffer<'_>) -> Result<usize, TransferError> {
        let cfg = BusConfig::for_direction(BusDirection::Receive);
        let pdm_config = Self::receive_config(&cfg);

        let mut driver =
            I2sDriver::new_pdm_rx(&mut self.i2s, &pdm_config, &mut self.pins.ws, &mut self.pins.din)
                .map_err(install_error)?;
        driver.rx_enable().map_err(hardware_error)?;

        let expected = clip.capacity();
        match driver.read(clip.record_target(), self.timeout) {
            Ok(actual) => {
                clip.set_captured(actual);
                if actual < expected {
                    Err(TransferError::Short { expected, actual })
                } else {
                    Ok(actual)
                }
            }
            Err(err) => {
                clip.clear();
                Err(transfer_error(err))
            }
        }
    }

    /// One bounded playback of the clip's captured bytes.
    fn write_clip(&mut self, clip: &ClipBuffer<'_>) -> Result<usize, TransferError> {
        let cfg = BusConfig::for_direction(BusDirection::Transmit);
        let std_config = Self::transmit_config(&cfg);

        let mut driver = I2sDriver::new_std_tx(
            &mut self.i2s,
            &std_config,
            &mut self.pins.bclk,
            &mut self.pins.dout,
            Option::<AnyIOPin>::None,
            &mut self.pins.ws,
        )
        .map_err(install_error)?;
        driver.tx_enable().map_err(hardware_error)?;

        let expected = clip.captured();
        let actual = driver.write(clip.audio(), self.timeout).map_err(transfer_error)?;

        if actual < expected {
            Err(TransferError::Short { expected, actual })
        } else {
            Ok(actual)
        }
    }
}

impl AudioBus for I2sAudioBus {
    fn record(&mut self, clip: &mut ClipBuffer<'_>) -> Result<usize, TransferError> {
        self.mode = self.mode.open(BusDirection::Receive)?;
        let result = self.read_clip(clip);
        // Driver already dropped (uninstalled); release the mode too.
        self.mode = self.mode.close();
        result
    }

    fn play(&mut self, clip: &ClipBuffer<'_>) -> Result<usize, TransferError> {
        self.mode = self.mode.open(BusDirection::Transmit)?;
        let result = self.write_clip(clip);
        self.mode = self.mode.close();
        result
    }
}

fn install_error(err: EspError) -> TransferError {
    TransferError::Bus(BusError::Install(err.code()))
}

fn hardware_error(err: EspError) -> TransferError {
    TransferError::Hardware(err.code())
}

fn transfer_error(err: EspError) -> TransferError {
    if err.code() == ESP_ERR_TIMEOUT as i32 {
        TransferError::Timeout
    } else {
        TransferError::Hardware(err.code())
    }
}
