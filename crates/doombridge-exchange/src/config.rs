//! Bridge configuration, validation, and error types.
//!
//! [`BridgeConfig`] is the builder input for a [`Bridge`](crate::Bridge).
//! [`validate()`](BridgeConfig::validate) checks every value once at
//! startup; nothing here is renegotiated while the bridge runs.

use std::error::Error;
use std::fmt;
use std::time::Duration;

/// The engine's native simulation rate.
pub const DEFAULT_TICK_RATE_HZ: f64 = 35.0;

// ── AudioConfig ───────────────────────────────────────────────────

/// Output format of the audio backend.
///
/// The engine mixes interleaved signed 16-bit samples; this describes how
/// the backend clocks them out. Defaults match the engine's mixer: 11025 Hz
/// stereo.
#[derive(Clone, Debug, PartialEq)]
pub struct AudioConfig {
    /// Playback rate in frames per second. Default: 11025.
    pub sample_rate: u32,
    /// Interleaved channel count. Default: 2.
    pub channels: u16,
    /// Bits per sample. Only 16 is supported. Default: 16.
    pub bits_per_sample: u16,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            sample_rate: 11_025,
            channels: 2,
            bits_per_sample: 16,
        }
    }
}

impl AudioConfig {
    /// Bytes per interleaved frame (one sample for every channel).
    pub fn bytes_per_frame(&self) -> usize {
        usize::from(self.channels) * usize::from(self.bits_per_sample / 8)
    }

    /// How long a chunk of `byte_size` bytes lasts at this format.
    ///
    /// This is the period of the backend's drain callback.
    pub fn chunk_period(&self, byte_size: usize) -> Duration {
        let frames = byte_size / self.bytes_per_frame().max(1);
        Duration::from_secs_f64(frames as f64 / f64::from(self.sample_rate.max(1)))
    }

    /// Validate the format.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.sample_rate == 0 {
            return Err(ConfigError::InvalidSampleRate {
                value: self.sample_rate,
            });
        }
        if self.channels == 0 {
            return Err(ConfigError::InvalidChannelCount {
                value: self.channels,
            });
        }
        if self.bits_per_sample != 16 {
            return Err(ConfigError::UnsupportedSampleFormat {
                bits: self.bits_per_sample,
            });
        }
        Ok(())
    }
}

// ── ConfigError ────────────────────────────────────────────────────

/// Errors detected while configuring or starting a bridge.
#[derive(Debug, PartialEq)]
pub enum ConfigError {
    /// tick_rate_hz is NaN, infinite, zero, or negative.
    InvalidTickRate {
        /// The invalid value.
        value: f64,
    },
    /// Audio sample rate is zero.
    InvalidSampleRate {
        /// The invalid value.
        value: u32,
    },
    /// Audio channel count is zero.
    InvalidChannelCount {
        /// The invalid value.
        value: u16,
    },
    /// Only 16-bit samples are mixed by the engine.
    UnsupportedSampleFormat {
        /// The configured bit depth.
        bits: u16,
    },
    /// An engine thread is already running on this bridge.
    EngineAlreadyRunning,
    /// The bridge has been shut down.
    ShutDown,
    /// A background thread could not be spawned.
    ThreadSpawnFailed {
        /// Description of which thread failed.
        reason: String,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidTickRate { value } => {
                write!(f, "tick_rate_hz must be finite and positive, got {value}")
            }
            Self::InvalidSampleRate { value } => {
                write!(f, "sample_rate must be positive, got {value}")
            }
            Self::InvalidChannelCount { value } => {
                write!(f, "channel count must be positive, got {value}")
            }
            Self::UnsupportedSampleFormat { bits } => {
                write!(f, "unsupported sample format: {bits}-bit (only 16-bit is mixed)")
            }
            Self::EngineAlreadyRunning => write!(f, "engine thread already running"),
            Self::ShutDown => write!(f, "bridge has been shut down"),
            Self::ThreadSpawnFailed { reason } => {
                write!(f, "thread spawn failed: {reason}")
            }
        }
    }
}

impl Error for ConfigError {}

// ── BridgeConfig ───────────────────────────────────────────────────

/// Complete configuration for constructing a bridge.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct BridgeConfig {
    /// Target tick rate of the engine driver thread. `None` = 35 Hz.
    pub tick_rate_hz: Option<f64>,
    /// Audio backend format.
    pub audio: AudioConfig,
}

impl BridgeConfig {
    /// Validate all values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        // tick_rate_hz, if present, must be finite and positive, and its
        // reciprocal must also be finite (rejects subnormals where
        // 1.0/hz = inf, which would panic in Duration::from_secs_f64).
        if let Some(hz) = self.tick_rate_hz {
            if !hz.is_finite() || hz <= 0.0 || !(1.0 / hz).is_finite() {
                return Err(ConfigError::InvalidTickRate { value: hz });
            }
        }
        self.audio.validate()
    }

    /// The effective tick rate.
    pub fn resolved_tick_rate_hz(&self) -> f64 {
        self.tick_rate_hz.unwrap_or(DEFAULT_TICK_RATE_HZ)
    }
}
