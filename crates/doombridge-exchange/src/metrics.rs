//! Counter snapshot across the four exchange points.
//!
//! [`BridgeMetrics`] is a plain value taken at one moment; the counters it
//! copies are cumulative since the bridge was created. Fields are read one
//! after another, so a snapshot taken while both threads run is not a
//! single consistent cut.

use crate::adapter::EngineAdapter;

/// Cumulative bridge counters.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BridgeMetrics {
    /// Ticks started by the engine.
    pub ticks: u64,
    /// Frames submitted by the engine.
    pub frames_submitted: u64,
    /// Frame reads served to the presenter.
    pub frames_read: u64,
    /// Palette replacements (0 = startup black).
    pub palette_generation: u64,
    /// Key events queued by the presenter.
    pub events_pushed: u64,
    /// Key events delivered to the engine.
    pub events_drained: u64,
    /// Audio chunks submitted by the engine.
    pub audio_submits: u64,
    /// Audio drains performed by the backend.
    pub audio_drains: u64,
    /// Drains that found no fresh chunk and played silence.
    pub audio_underruns: u64,
}

impl BridgeMetrics {
    pub(crate) fn collect(adapter: &EngineAdapter) -> Self {
        Self {
            ticks: adapter.current_tick().0,
            frames_submitted: adapter.frames().frames_submitted(),
            frames_read: adapter.frames().frames_read(),
            palette_generation: adapter.palette().generation(),
            events_pushed: adapter.input().pushed(),
            events_drained: adapter.input().drained(),
            audio_submits: adapter.audio().submits(),
            audio_drains: adapter.audio().drains(),
            audio_underruns: adapter.audio().underruns(),
        }
    }

    /// Events queued but not yet delivered.
    pub fn events_pending(&self) -> u64 {
        self.events_pushed.saturating_sub(self.events_drained)
    }
}
