//! Core types and traits for the doombridge exchange.
//!
//! This is the leaf crate with zero internal dependencies. It defines the
//! value types that cross the engine/UI boundary (frame dimensions, palette,
//! key events), the callback contract the engine thread drives, and the
//! single fatal path used for precondition violations.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod event;
pub mod id;
pub mod keys;
pub mod palette;
pub mod traits;
pub mod violation;

pub use event::{KeyCode, KeyDirection, KeyEvent};
pub use id::{FrameDims, FrameSeq, TickId};
pub use keys::HostKey;
pub use palette::{Palette, Rgb, PALETTE_BYTES, PALETTE_ENTRIES};
pub use traits::{EngineCallbacks, EventSink, Simulation, TickOutcome};
pub use violation::{fatal, Violation};
