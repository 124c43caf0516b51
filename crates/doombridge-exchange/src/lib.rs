//! Thread-safe exchange between an engine thread and a presentation thread.
//!
//! Four independent exchange points carry data across the boundary, each
//! with the delivery policy its data needs:
//!
//! - [`FrameExchange`]: latest-wins, never torn.
//! - [`PaletteTable`]: copy-on-write, one generation per read pass.
//! - [`InputQueue`]: lossless and ordered.
//! - [`AudioBridge`]: fixed-size chunk slot, silence on underrun.
//!
//! The engine talks to them through an [`EngineAdapter`]; the UI through a
//! [`Presenter`]. A [`Bridge`] owns all of it and can drive a
//! [`Simulation`](doombridge_core::Simulation) on its own thread.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod adapter;
pub mod audio;
pub mod audio_clock;
pub mod bridge;
pub mod config;
pub mod frame;
pub mod input;
pub mod metrics;
pub mod palette;
pub mod presenter;
pub(crate) mod tick_thread;

pub use adapter::EngineAdapter;
pub use audio::{AudioBridge, AudioState, DrainOutcome};
pub use audio_clock::{AudioClock, AudioSink, NullAudioSink};
pub use bridge::{Bridge, ShutdownReport};
pub use config::{AudioConfig, BridgeConfig, ConfigError, DEFAULT_TICK_RATE_HZ};
pub use frame::{Frame, FrameExchange};
pub use input::{EventBatch, InputQueue};
pub use metrics::BridgeMetrics;
pub use palette::PaletteTable;
pub use presenter::{Presenter, RgbImage};
