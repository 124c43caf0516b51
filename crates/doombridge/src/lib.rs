//! doombridge: hand frames, palettes, input and audio between a game
//! engine thread and a presentation thread.
//!
//! This is the facade crate that re-exports the public API of the
//! sub-crates. Adding `doombridge` as a single dependency is sufficient.
//!
//! # Quick start
//!
//! ```rust
//! use doombridge::prelude::*;
//!
//! // A one-pixel engine that paints index 7 and quits.
//! struct OnePixel;
//! impl Simulation for OnePixel {
//!     fn start(&mut self, cb: &dyn EngineCallbacks) {
//!         cb.on_dimensions_known(1, 1);
//!         let mut raw = [0u8; 768];
//!         raw[21] = 255;
//!         cb.on_palette_changed(&raw);
//!     }
//!     fn tick(&mut self, cb: &dyn EngineCallbacks) -> TickOutcome {
//!         cb.on_tick_start(&mut Vec::<KeyEvent>::new());
//!         cb.on_frame_ready(&[7]);
//!         TickOutcome::Quit
//!     }
//! }
//!
//! let mut bridge = Bridge::new(BridgeConfig::default()).unwrap();
//! let mut presenter = bridge.presenter();
//! bridge.spawn_engine(Box::new(OnePixel)).unwrap();
//! while bridge.engine_running() {
//!     std::thread::yield_now();
//! }
//! bridge.shutdown();
//!
//! let mut image = RgbImage::new();
//! assert!(presenter.render(&mut image));
//! assert_eq!(image.pixel(0, 0), Rgb::new(255, 0, 0));
//! ```
//!
//! # Modules
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `doombridge-core` | Frame dimensions, palette, key events, callback traits |
//! | [`exchange`] | `doombridge-exchange` | Exchange points, adapter, presenter, bridge |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Value types, key codes and the callback contract (`doombridge-core`).
pub use doombridge_core as types;

/// Exchange points, audio clock, adapter, presenter and bridge
/// (`doombridge-exchange`).
pub use doombridge_exchange as exchange;

/// Common imports for typical doombridge usage.
///
/// ```rust
/// use doombridge::prelude::*;
/// ```
pub mod prelude {
    // Core types and traits
    pub use doombridge_core::{
        EngineCallbacks, EventSink, FrameDims, FrameSeq, HostKey, KeyCode, KeyDirection,
        KeyEvent, Palette, Rgb, Simulation, TickOutcome,
    };

    // Exchange points
    pub use doombridge_exchange::{
        AudioBridge, DrainOutcome, FrameExchange, InputQueue, PaletteTable,
    };

    // Wiring
    pub use doombridge_exchange::{
        AudioConfig, AudioSink, Bridge, BridgeConfig, ConfigError, EngineAdapter,
        NullAudioSink, Presenter, RgbImage, ShutdownReport,
    };
}
