//! Consumer-side handle: frame/palette reads, rendering, and key capture.
//!
//! A [`Presenter`] is what the UI thread holds. Reads copy out of the
//! exchange points and release their locks before any per-pixel work, so
//! rendering never holds up the engine. Key capture turns the backend's
//! notifications into edge transitions before they reach the queue.

use std::collections::HashSet;
use std::sync::Arc;

use doombridge_core::keys::{self, HostKey};
use doombridge_core::{FrameDims, FrameSeq, KeyCode, KeyDirection, KeyEvent, Palette, Rgb};

use crate::frame::{Frame, FrameExchange};
use crate::input::InputQueue;
use crate::palette::PaletteTable;

// ── RgbImage ─────────────────────────────────────────────────────

/// A resolved true-color image, one packed `0x00RRGGBB` word per pixel.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RgbImage {
    dims: Option<FrameDims>,
    pixels: Vec<u32>,
}

impl RgbImage {
    /// An empty image; sized by the first [`Presenter::render`].
    pub fn new() -> Self {
        Self::default()
    }

    /// Size of the last rendered frame.
    pub fn dims(&self) -> Option<FrameDims> {
        self.dims
    }

    /// Color at `(x, y)`.
    ///
    /// # Panics
    ///
    /// Panics if the image is empty or `(x, y)` is outside it.
    pub fn pixel(&self, x: u32, y: u32) -> Rgb {
        let i = self
            .dims
            .and_then(|d| d.offset(x, y))
            .unwrap_or_else(|| panic!("pixel ({x}, {y}) outside image"));
        let p = self.pixels[i];
        Rgb::new((p >> 16) as u8, (p >> 8) as u8, p as u8)
    }

    /// Row-major packed pixels.
    pub fn as_packed(&self) -> &[u32] {
        &self.pixels
    }

    fn resolve(&mut self, dims: FrameDims, indices: &[u8], palette: &Palette) {
        self.dims = Some(dims);
        self.pixels.clear();
        self.pixels.extend(indices.iter().map(|&i| palette.color(i).to_u32()));
    }
}

// ── Presenter ────────────────────────────────────────────────────

/// The UI thread's view of a bridge.
pub struct Presenter {
    frames: Arc<FrameExchange>,
    palette: Arc<PaletteTable>,
    input: Arc<InputQueue>,
    held: HashSet<KeyCode>,
    scratch: Vec<u8>,
    rendered_seq: FrameSeq,
    rendered_generation: Option<u64>,
}

impl Presenter {
    /// Attach a presenter to existing exchange points.
    pub fn new(
        frames: Arc<FrameExchange>,
        palette: Arc<PaletteTable>,
        input: Arc<InputQueue>,
    ) -> Self {
        Self {
            frames,
            palette,
            input,
            held: HashSet::new(),
            scratch: Vec::new(),
            rendered_seq: FrameSeq::NONE,
            rendered_generation: None,
        }
    }

    /// Copy of the latest complete frame, or `None` before the first one.
    pub fn read_frame(&self) -> Option<Frame> {
        self.frames.read_frame()
    }

    /// Snapshot of the current palette.
    pub fn current_palette(&self) -> Arc<Palette> {
        self.palette.snapshot()
    }

    /// Queue a transition as-is, with no filtering.
    ///
    /// Presses queued here are not tracked as held, so
    /// [`release_all`](Self::release_all) will not release them.
    pub fn push_key_event(&self, direction: KeyDirection, code: KeyCode) {
        self.input.push_key(direction, code);
    }

    /// Queue a transition reported by the windowing backend.
    ///
    /// Auto-repeat notifications and presses of a key already held are
    /// dropped. Releases are always forwarded, even for a key this
    /// presenter never saw go down. Returns whether an event was queued.
    pub fn key_transition(
        &mut self,
        direction: KeyDirection,
        code: KeyCode,
        is_repeat: bool,
    ) -> bool {
        if is_repeat {
            return false;
        }
        let edge = match direction {
            KeyDirection::Pressed => self.held.insert(code),
            KeyDirection::Released => {
                self.held.remove(&code);
                true
            }
        };
        if edge {
            self.input.push_key(direction, code);
        }
        edge
    }

    /// Translate a host key and queue it through [`key_transition`](Self::key_transition).
    ///
    /// Keys with no engine code are ignored.
    pub fn host_key_transition(
        &mut self,
        key: HostKey,
        direction: KeyDirection,
        is_repeat: bool,
    ) -> bool {
        match keys::translate(key) {
            Some(code) => self.key_transition(direction, code, is_repeat),
            None => false,
        }
    }

    /// Release every held key, e.g. when the window loses focus.
    ///
    /// Returns the number of release events queued.
    pub fn release_all(&mut self) -> usize {
        let mut codes: Vec<KeyCode> = self.held.drain().collect();
        codes.sort_unstable();
        for &code in &codes {
            self.input.push(KeyEvent::released(code));
        }
        codes.len()
    }

    /// Keys currently held down.
    pub fn is_held(&self, code: KeyCode) -> bool {
        self.held.contains(&code)
    }

    /// Whether the frame or the palette changed since the last render.
    pub fn needs_redraw(&self) -> bool {
        self.frames.latest_seq() != self.rendered_seq
            || self.rendered_generation != Some(self.palette.generation())
    }

    /// Render the latest frame through the current palette into `out`.
    ///
    /// The frame and palette are copied out first; no lock is held while
    /// colors are resolved. Returns `false`, leaving `out` untouched, when
    /// no frame has been produced yet.
    pub fn render(&mut self, out: &mut RgbImage) -> bool {
        let Some((dims, seq)) = self.frames.read_frame_into(&mut self.scratch) else {
            return false;
        };
        let (palette, generation) = self.palette.snapshot_with_generation();
        out.resolve(dims, &self.scratch, &palette);
        self.rendered_seq = seq;
        self.rendered_generation = Some(generation);
        true
    }
}
