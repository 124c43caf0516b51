//! Copy-on-write palette holder.
//!
//! [`PaletteTable`] keeps the current palette behind an `Arc` and replaces
//! the whole `Arc` on every change. A reader clones the `Arc` under the
//! mutex and then reads all 256 entries with no lock held, so one read pass
//! always sees a single palette generation.

use std::sync::Arc;

use doombridge_core::{Palette, Rgb};
use parking_lot::Mutex;

struct Current {
    palette: Arc<Palette>,
    generation: u64,
}

/// Shared palette between the engine thread and the presenter.
pub struct PaletteTable {
    current: Mutex<Current>,
}

// Compile-time assertion: PaletteTable must be Send + Sync.
const _: fn() = || {
    fn assert<T: Send + Sync>() {}
    assert::<PaletteTable>();
};

impl Default for PaletteTable {
    fn default() -> Self {
        Self::new()
    }
}

impl PaletteTable {
    /// Create a table holding the all-black palette (generation 0).
    pub fn new() -> Self {
        Self {
            current: Mutex::new(Current {
                palette: Arc::new(Palette::black()),
                generation: 0,
            }),
        }
    }

    /// Replace the whole palette. Returns the new generation.
    pub fn set_palette(&self, palette: Palette) -> u64 {
        // Allocate outside the lock; the critical section is a pointer swap.
        let fresh = Arc::new(palette);
        let (old, generation) = {
            let mut current = self.current.lock();
            current.generation += 1;
            (std::mem::replace(&mut current.palette, fresh), current.generation)
        };
        // The old table may be the last reference; free it after unlocking.
        drop(old);
        generation
    }

    /// Replace the palette from the engine's raw 768-byte table.
    ///
    /// # Panics
    ///
    /// A table of any other length is a precondition violation.
    pub fn set_palette_raw(&self, rgb_triples: &[u8]) -> u64 {
        self.set_palette(Palette::from_slice(rgb_triples))
    }

    /// The current palette as an immutable snapshot.
    pub fn snapshot(&self) -> Arc<Palette> {
        Arc::clone(&self.current.lock().palette)
    }

    /// The current palette together with its generation.
    pub fn snapshot_with_generation(&self) -> (Arc<Palette>, u64) {
        let current = self.current.lock();
        (Arc::clone(&current.palette), current.generation)
    }

    /// One entry of the current palette.
    ///
    /// # Panics
    ///
    /// An index above 255 is a precondition violation.
    pub fn get_color(&self, index: usize) -> Rgb {
        self.snapshot().get(index)
    }

    /// Number of palette replacements so far (0 = startup black).
    pub fn generation(&self) -> u64 {
        self.current.lock().generation
    }
}
