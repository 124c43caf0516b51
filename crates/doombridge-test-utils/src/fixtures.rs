//! A configurable stand-in for the engine.
//!
//! [`ScriptedSimulation`] announces its dimensions and optional palette and
//! sound setup on start, then each tick:
//!
//! 1. drains input and records it,
//! 2. submits a uniform frame whose value is the tick number (mod 256),
//! 3. submits an audio chunk whose samples are the tick number, if sound
//!    was initialized,
//! 4. quits once its tick limit is reached.

use std::sync::Arc;

use doombridge_core::{EngineCallbacks, KeyEvent, Simulation, TickOutcome};
use parking_lot::Mutex;

pub struct ScriptedSimulation {
    width: i32,
    height: i32,
    palette: Option<Vec<u8>>,
    audio_samples: Option<usize>,
    quit_after: Option<u64>,
    ticks: u64,
    frame: Vec<u8>,
    mix: Vec<i16>,
    received: Arc<Mutex<Vec<KeyEvent>>>,
}

impl ScriptedSimulation {
    pub fn new(width: i32, height: i32) -> Self {
        Self {
            width,
            height,
            palette: None,
            audio_samples: None,
            quit_after: None,
            ticks: 0,
            frame: Vec::new(),
            mix: Vec::new(),
            received: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Publish this raw palette on start.
    pub fn with_palette(mut self, rgb_triples: &[u8]) -> Self {
        self.palette = Some(rgb_triples.to_vec());
        self
    }

    /// Initialize sound with a mix buffer of `samples` 16-bit samples.
    pub fn with_audio(mut self, samples: usize) -> Self {
        self.audio_samples = Some(samples);
        self
    }

    /// Return [`TickOutcome::Quit`] from tick number `ticks`.
    pub fn quit_after(mut self, ticks: u64) -> Self {
        self.quit_after = Some(ticks);
        self
    }

    /// Shared log of every event the simulation received, in order.
    pub fn received_events(&self) -> Arc<Mutex<Vec<KeyEvent>>> {
        Arc::clone(&self.received)
    }

    /// Ticks run so far.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }
}

impl Simulation for ScriptedSimulation {
    fn start(&mut self, callbacks: &dyn EngineCallbacks) {
        callbacks.on_dimensions_known(self.width, self.height);
        self.frame = vec![0; (self.width.max(0) * self.height.max(0)) as usize];
        if let Some(raw) = &self.palette {
            callbacks.on_palette_changed(raw);
        }
        if let Some(samples) = self.audio_samples {
            self.mix = vec![0; samples];
            callbacks.on_audio_init(&self.mix);
        }
    }

    fn tick(&mut self, callbacks: &dyn EngineCallbacks) -> TickOutcome {
        self.ticks += 1;

        let mut events: Vec<KeyEvent> = Vec::new();
        callbacks.on_tick_start(&mut events);
        self.received.lock().extend(events);

        self.frame.fill(self.ticks as u8);
        callbacks.on_frame_ready(&self.frame);

        if !self.mix.is_empty() {
            self.mix.fill(self.ticks as i16);
            callbacks.on_audio_submit(&self.mix);
        }

        match self.quit_after {
            Some(limit) if self.ticks >= limit => TickOutcome::Quit,
            _ => TickOutcome::Continue,
        }
    }
}
