//! Latest-wins exchange of indexed-color frames.
//!
//! [`FrameExchange`] holds one backing buffer sized `width * height`,
//! allocated on the dimension announcement. The producer overwrites it in
//! full under a short-held mutex (one memory copy); the consumer copies it
//! out under the same mutex and renders from its private copy with no lock
//! held. A slow consumer skips frames but never sees a torn one, and never
//! stalls the producer beyond the copy.

use std::sync::atomic::{AtomicU64, Ordering};

use doombridge_core::{fatal, FrameDims, FrameSeq, Violation};
use parking_lot::Mutex;

/// A consumer-owned snapshot of one complete frame.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Frame {
    dims: FrameDims,
    seq: FrameSeq,
    pixels: Vec<u8>,
}

impl Frame {
    /// Screen size of this frame.
    pub fn dims(&self) -> FrameDims {
        self.dims
    }

    /// Submission number of this frame.
    pub fn seq(&self) -> FrameSeq {
        self.seq
    }

    /// Row-major palette indices, exactly `dims().pixel_count()` long.
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Palette index at `(x, y)`, or `None` outside the frame.
    pub fn pixel(&self, x: u32, y: u32) -> Option<u8> {
        self.dims.offset(x, y).map(|i| self.pixels[i])
    }

    /// Take the pixel buffer.
    pub fn into_pixels(self) -> Vec<u8> {
        self.pixels
    }
}

struct FrameStore {
    dims: Option<FrameDims>,
    pixels: Vec<u8>,
    seq: FrameSeq,
}

/// Shared frame slot between the engine thread and the presenter.
pub struct FrameExchange {
    store: Mutex<FrameStore>,
    frames_read: AtomicU64,
}

// Compile-time assertion: FrameExchange must be Send + Sync.
const _: fn() = || {
    fn assert<T: Send + Sync>() {}
    assert::<FrameExchange>();
};

impl Default for FrameExchange {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameExchange {
    /// Create an exchange with no dimensions and no frame.
    pub fn new() -> Self {
        Self {
            store: Mutex::new(FrameStore {
                dims: None,
                pixels: Vec::new(),
                seq: FrameSeq::NONE,
            }),
            frames_read: AtomicU64::new(0),
        }
    }

    /// Fix the screen size and allocate the backing buffer.
    ///
    /// Repeating the announcement with identical dimensions is a no-op.
    ///
    /// # Panics
    ///
    /// Announcing different dimensions after the first call is a
    /// precondition violation.
    pub fn announce_dimensions(&self, dims: FrameDims) {
        let mut store = self.store.lock();
        let current = store.dims;
        match current {
            None => {
                store.pixels = vec![0; dims.pixel_count()];
                store.dims = Some(dims);
                drop(store);
                tracing::debug!(%dims, "frame dimensions announced");
            }
            Some(announced) if announced == dims => {}
            Some(announced) => fatal(Violation::DimensionsChanged {
                announced: (announced.width(), announced.height()),
                requested: (dims.width(), dims.height()),
            }),
        }
    }

    /// Overwrite the shared frame with `indices` and return its sequence
    /// number.
    ///
    /// Cost is one `width * height` copy plus acquiring the mutex.
    ///
    /// # Panics
    ///
    /// Submitting before [`announce_dimensions`](Self::announce_dimensions)
    /// or with a buffer whose length is not `width * height` is a
    /// precondition violation.
    pub fn submit_frame(&self, indices: &[u8]) -> FrameSeq {
        let mut store = self.store.lock();
        if store.dims.is_none() {
            fatal(Violation::FrameBeforeDimensions);
        }
        if indices.len() != store.pixels.len() {
            fatal(Violation::FrameSizeMismatch {
                expected: store.pixels.len(),
                actual: indices.len(),
            });
        }
        store.pixels.copy_from_slice(indices);
        store.seq = store.seq.next();
        store.seq
    }

    /// Copy out the latest frame.
    ///
    /// Returns `None` until the first frame is submitted; the consumer
    /// treats that as "nothing to draw".
    pub fn read_frame(&self) -> Option<Frame> {
        let mut pixels = Vec::new();
        let (dims, seq) = self.read_frame_into(&mut pixels)?;
        Some(Frame { dims, seq, pixels })
    }

    /// Copy out the latest frame only if it is newer than `seen`.
    pub fn read_frame_if_newer(&self, seen: FrameSeq) -> Option<Frame> {
        let store = self.store.lock();
        let dims = store.dims?;
        if store.seq <= seen {
            return None;
        }
        let frame = Frame {
            dims,
            seq: store.seq,
            pixels: store.pixels.clone(),
        };
        drop(store);
        self.frames_read.fetch_add(1, Ordering::Relaxed);
        Some(frame)
    }

    /// Copy the latest frame into a caller-owned buffer.
    ///
    /// `out` is cleared and refilled; once it has grown to `width * height`
    /// the read path performs no allocation. Returns `None` (leaving `out`
    /// untouched) until the first frame is submitted.
    pub fn read_frame_into(&self, out: &mut Vec<u8>) -> Option<(FrameDims, FrameSeq)> {
        let store = self.store.lock();
        let dims = store.dims?;
        if store.seq == FrameSeq::NONE {
            return None;
        }
        out.clear();
        out.extend_from_slice(&store.pixels);
        let seq = store.seq;
        drop(store);
        self.frames_read.fetch_add(1, Ordering::Relaxed);
        Some((dims, seq))
    }

    /// Announced dimensions, if any.
    pub fn dims(&self) -> Option<FrameDims> {
        self.store.lock().dims
    }

    /// Sequence number of the latest submitted frame
    /// ([`FrameSeq::NONE`] before the first).
    pub fn latest_seq(&self) -> FrameSeq {
        self.store.lock().seq
    }

    /// Number of frames submitted so far.
    pub fn frames_submitted(&self) -> u64 {
        self.latest_seq().0
    }

    /// Number of successful reads (any read method).
    pub fn frames_read(&self) -> u64 {
        self.frames_read.load(Ordering::Relaxed)
    }
}
