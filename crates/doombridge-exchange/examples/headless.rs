//! Headless end-to-end run.
//!
//! Demonstrates: configure → spawn a toy engine on its own thread → render
//! frames and feed key presses from the "UI" thread → shut down → report.
//!
//! Run with `cargo run -p doombridge-exchange --example headless`.

use std::thread;
use std::time::Duration;

use doombridge_core::{EngineCallbacks, HostKey, KeyDirection, KeyEvent, Simulation, TickOutcome};
use doombridge_exchange::{AudioSink, Bridge, BridgeConfig, RgbImage};

/// Scrolls a diagonal stripe pattern; each key press shifts the palette.
struct Stripes {
    frame: Vec<u8>,
    mix: Vec<i16>,
    offset: usize,
    hue: u8,
}

impl Stripes {
    const WIDTH: usize = 320;
    const HEIGHT: usize = 200;

    fn new() -> Self {
        Self {
            frame: vec![0; Self::WIDTH * Self::HEIGHT],
            mix: vec![0; 1024],
            offset: 0,
            hue: 0,
        }
    }

    fn palette(&self) -> Vec<u8> {
        (0..=255u8)
            .flat_map(|i| [i, i.wrapping_add(self.hue), 255 - i])
            .collect()
    }
}

impl Simulation for Stripes {
    fn start(&mut self, callbacks: &dyn EngineCallbacks) {
        callbacks.on_dimensions_known(Self::WIDTH as i32, Self::HEIGHT as i32);
        callbacks.on_palette_changed(&self.palette());
        callbacks.on_audio_init(&self.mix);
    }

    fn tick(&mut self, callbacks: &dyn EngineCallbacks) -> TickOutcome {
        let mut events: Vec<KeyEvent> = Vec::new();
        callbacks.on_tick_start(&mut events);
        let presses = events
            .iter()
            .filter(|e| e.direction == KeyDirection::Pressed)
            .count();
        if presses > 0 {
            self.hue = self.hue.wrapping_add((presses as u8).wrapping_mul(32));
            callbacks.on_palette_changed(&self.palette());
        }

        self.offset = self.offset.wrapping_add(1);
        for (i, px) in self.frame.iter_mut().enumerate() {
            let (x, y) = (i % Self::WIDTH, i / Self::WIDTH);
            *px = (x + y + self.offset) as u8;
        }
        callbacks.on_frame_ready(&self.frame);

        // Square wave, 16 samples per half period.
        for (i, s) in self.mix.iter_mut().enumerate() {
            *s = if (i / 16) % 2 == 0 { 2_000 } else { -2_000 };
        }
        callbacks.on_audio_submit(&self.mix);
        TickOutcome::Continue
    }
}

/// Counts loud and silent chunks instead of playing them.
#[derive(Default)]
struct Meter {
    loud: u64,
    silent: u64,
}

impl AudioSink for Meter {
    fn play(&mut self, samples: &[i16]) {
        if samples.iter().all(|&s| s == 0) {
            self.silent += 1;
        } else {
            self.loud += 1;
        }
    }
}

impl Drop for Meter {
    fn drop(&mut self) {
        println!("audio: {} loud chunks, {} silent chunks", self.loud, self.silent);
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_thread_names(true)
        .init();

    println!("=== doombridge headless example ===\n");

    let sink = Box::<Meter>::default();
    let mut bridge = match Bridge::with_audio_sink(BridgeConfig::default(), sink) {
        Ok(bridge) => bridge,
        Err(e) => {
            eprintln!("invalid configuration: {e}");
            return;
        }
    };
    let mut presenter = bridge.presenter();
    if let Err(e) = bridge.spawn_engine(Box::new(Stripes::new())) {
        eprintln!("could not start engine: {e}");
        return;
    }

    let mut image = RgbImage::new();
    let mut rendered = 0;
    for frame in 0..60 {
        if presenter.needs_redraw() && presenter.render(&mut image) {
            rendered += 1;
        }
        if frame % 15 == 0 {
            presenter.host_key_transition(HostKey::Char(' '), KeyDirection::Pressed, false);
        } else if frame % 15 == 5 {
            presenter.host_key_transition(HostKey::Char(' '), KeyDirection::Released, false);
        }
        if frame % 20 == 0 {
            if let Some(dims) = image.dims() {
                println!(
                    "ui frame {frame:2}: {dims} image, top-left {:?}",
                    image.pixel(0, 0)
                );
            }
        }
        thread::sleep(Duration::from_millis(1000 / 60));
    }

    let report = bridge.shutdown();
    let m = &report.metrics;
    println!("\nshutdown in {} ms", report.total_ms);
    println!("ticks:    {}", m.ticks);
    println!(
        "frames:   {} submitted, {} read, {} rendered",
        m.frames_submitted, m.frames_read, rendered
    );
    println!("palette:  generation {}", m.palette_generation);
    println!("input:    {} pushed, {} drained", m.events_pushed, m.events_drained);
    println!(
        "audio:    {} submits, {} drains, {} underruns",
        m.audio_submits, m.audio_drains, m.audio_underruns
    );
}
