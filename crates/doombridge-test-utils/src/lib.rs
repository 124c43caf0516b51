//! Test utilities for doombridge development.
//!
//! Provides a recording [`AudioSink`], palette and frame builders, byte
//! helpers for audio payloads, and a [`ScriptedSimulation`] in
//! [`fixtures`] for driving a bridge end to end.

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod fixtures;

pub use fixtures::ScriptedSimulation;

use std::sync::Arc;
use std::time::{Duration, Instant};

use doombridge_core::{FrameDims, Palette, Rgb, PALETTE_BYTES};
use doombridge_exchange::AudioSink;
use parking_lot::Mutex;
use rand::prelude::*;
use rand_chacha::ChaCha8Rng;

/// Audio sink that keeps every chunk it is handed.
///
/// Clones share the same recording: box one clone into the bridge and keep
/// another for assertions.
#[derive(Clone, Default)]
pub struct RecordingSink {
    chunks: Arc<Mutex<Vec<Vec<i16>>>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of every chunk played so far, oldest first.
    pub fn chunks(&self) -> Vec<Vec<i16>> {
        self.chunks.lock().clone()
    }

    /// Number of chunks played.
    pub fn len(&self) -> usize {
        self.chunks.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl AudioSink for RecordingSink {
    fn play(&mut self, samples: &[i16]) {
        self.chunks.lock().push(samples.to_vec());
    }
}

/// Raw 768-byte table that is black except for `index`.
pub fn raw_palette_with(index: u8, color: Rgb) -> [u8; PALETTE_BYTES] {
    let mut raw = [0u8; PALETTE_BYTES];
    let i = usize::from(index) * 3;
    raw[i..i + 3].copy_from_slice(&[color.r, color.g, color.b]);
    raw
}

/// Grey ramp: entry `i` is `(i, i, i)`.
pub fn gradient_palette() -> Palette {
    let mut raw = [0u8; PALETTE_BYTES];
    for (i, triple) in raw.chunks_exact_mut(3).enumerate() {
        triple.fill(i as u8);
    }
    Palette::from_raw(&raw)
}

/// Palette whose every entry is `color`.
pub fn solid_palette(color: Rgb) -> Palette {
    Palette::from_entries([color; 256])
}

/// A frame where every pixel is `value`.
pub fn uniform_frame(dims: FrameDims, value: u8) -> Vec<u8> {
    vec![value; dims.pixel_count()]
}

/// A reproducible frame of random palette indices.
pub fn noise_frame(dims: FrameDims, seed: u64) -> Vec<u8> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut frame = vec![0u8; dims.pixel_count()];
    rng.fill(frame.as_mut_slice());
    frame
}

/// Reinterpret little-endian bytes as 16-bit samples.
///
/// # Panics
///
/// Panics on an odd byte count.
pub fn samples_from_le_bytes(bytes: &[u8]) -> Vec<i16> {
    assert!(bytes.len() % 2 == 0, "odd byte count {}", bytes.len());
    bytes
        .chunks_exact(2)
        .map(|b| i16::from_le_bytes([b[0], b[1]]))
        .collect()
}

/// Poll `cond` every millisecond until it holds or `timeout` elapses.
pub fn wait_until(timeout: Duration, mut cond: impl FnMut() -> bool) -> bool {
    let deadline = Instant::now() + timeout;
    loop {
        if cond() {
            return true;
        }
        if Instant::now() >= deadline {
            return false;
        }
        std::thread::sleep(Duration::from_millis(1));
    }
}
