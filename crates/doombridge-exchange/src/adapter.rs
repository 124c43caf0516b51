//! Engine-side callback surface.
//!
//! [`EngineAdapter`] is the one [`EngineCallbacks`] implementation the
//! engine thread talks to. Each callback forwards synchronously to the
//! matching exchange point; the adapter itself buffers nothing and never
//! waits on the presentation side.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use doombridge_core::{EngineCallbacks, EventSink, FrameDims, TickId};

use crate::audio::AudioBridge;
use crate::frame::FrameExchange;
use crate::input::InputQueue;
use crate::palette::PaletteTable;

/// Forwards engine callbacks to the four exchange points.
pub struct EngineAdapter {
    frames: Arc<FrameExchange>,
    palette: Arc<PaletteTable>,
    input: Arc<InputQueue>,
    audio: Arc<AudioBridge>,
    ticks: AtomicU64,
}

// Compile-time assertion: EngineAdapter must be Send + Sync.
const _: fn() = || {
    fn assert<T: Send + Sync>() {}
    assert::<EngineAdapter>();
};

impl EngineAdapter {
    /// Wire an adapter to existing exchange points.
    pub fn new(
        frames: Arc<FrameExchange>,
        palette: Arc<PaletteTable>,
        input: Arc<InputQueue>,
        audio: Arc<AudioBridge>,
    ) -> Self {
        Self {
            frames,
            palette,
            input,
            audio,
            ticks: AtomicU64::new(0),
        }
    }

    /// Number of ticks started so far.
    pub fn current_tick(&self) -> TickId {
        TickId(self.ticks.load(Ordering::Acquire))
    }

    /// The frame exchange this adapter writes.
    pub fn frames(&self) -> &Arc<FrameExchange> {
        &self.frames
    }

    /// The palette table this adapter writes.
    pub fn palette(&self) -> &Arc<PaletteTable> {
        &self.palette
    }

    /// The input queue this adapter drains.
    pub fn input(&self) -> &Arc<InputQueue> {
        &self.input
    }

    /// The audio bridge this adapter feeds.
    pub fn audio(&self) -> &Arc<AudioBridge> {
        &self.audio
    }
}

impl EngineCallbacks for EngineAdapter {
    fn on_dimensions_known(&self, width: i32, height: i32) {
        self.frames.announce_dimensions(FrameDims::from_engine(width, height));
    }

    fn on_palette_changed(&self, rgb_triples: &[u8]) {
        self.palette.set_palette_raw(rgb_triples);
    }

    fn on_tick_start(&self, sink: &mut dyn EventSink) {
        let tick = self.ticks.fetch_add(1, Ordering::AcqRel) + 1;
        let delivered = self.input.drain_into(sink);
        if delivered > 0 {
            tracing::trace!(tick, delivered, "input delivered to engine");
        }
    }

    fn on_frame_ready(&self, indices: &[u8]) {
        self.frames.submit_frame(indices);
    }

    fn on_audio_init(&self, mix_buffer: &[i16]) {
        self.audio.initialize(std::mem::size_of_val(mix_buffer));
    }

    fn on_audio_submit(&self, mix_buffer: &[i16]) {
        self.audio.submit(mix_buffer);
    }
}
