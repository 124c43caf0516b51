//! The engine-facing callback contract.
//!
//! The engine thread holds a handle to one [`EngineCallbacks`]
//! implementation for its whole lifetime and calls into it synchronously.
//! The [`Simulation`] trait is the opaque producer side: whatever computes
//! frames, palettes and audio drives the callbacks from its tick loop.

use crate::event::KeyEvent;

/// Receiver for input events on the engine side.
///
/// The engine implements this to accept key events into its own event
/// queue at the start of each tick.
pub trait EventSink {
    /// Deliver one event to the engine.
    fn post_event(&mut self, event: KeyEvent);
}

impl EventSink for Vec<KeyEvent> {
    fn post_event(&mut self, event: KeyEvent) {
        self.push(event);
    }
}

/// One handler per callback kind, registered once before the engine's
/// main loop starts.
///
/// Every method is called from the engine thread and must return in
/// bounded time, independent of how fast the presentation side consumes.
pub trait EngineCallbacks: Send + Sync {
    /// The engine's screen size, announced once before any frame.
    fn on_dimensions_known(&self, width: i32, height: i32);

    /// A new palette: 256 raw `(r, g, b)` triples (768 bytes).
    fn on_palette_changed(&self, rgb_triples: &[u8]);

    /// Start of a simulated tick.
    ///
    /// All input accumulated since the previous tick is delivered to `sink`
    /// in production order before this returns.
    fn on_tick_start(&self, sink: &mut dyn EventSink);

    /// A complete frame of `width * height` palette indices.
    fn on_frame_ready(&self, indices: &[u8]);

    /// The sound system came up. `mix_buffer` is the engine-owned
    /// interleaved 16-bit buffer; its length is fixed from here on.
    fn on_audio_init(&self, mix_buffer: &[i16]);

    /// `mix_buffer` now holds the next chunk to play.
    fn on_audio_submit(&self, mix_buffer: &[i16]);
}

/// What the engine driver should do after a tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TickOutcome {
    /// Keep ticking.
    Continue,
    /// The simulation asked to quit.
    Quit,
}

/// The opaque producer: game logic that talks to the bridge only through
/// [`EngineCallbacks`].
pub trait Simulation: Send {
    /// One-time startup (dimension announcement, initial palette, sound
    /// initialization). Called on the engine thread before the first tick.
    fn start(&mut self, callbacks: &dyn EngineCallbacks) {
        let _ = callbacks;
    }

    /// Advance one tick.
    fn tick(&mut self, callbacks: &dyn EngineCallbacks) -> TickOutcome;
}
