//! Benchmark profiles for the doombridge exchange points.
//!
//! - [`SCREEN`]: the engine's native 320x200 screen.
//! - [`frame_profile`]: a wired frame exchange plus a set of pre-generated
//!   frames, so the measured loop does no random generation.
//! - [`random_palette`]: a deterministic 768-byte palette table.

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use std::sync::Arc;

use doombridge_core::{FrameDims, PALETTE_BYTES};
use doombridge_exchange::{FrameExchange, InputQueue, PaletteTable, Presenter};
use rand::prelude::*;
use rand_chacha::ChaCha8Rng;

/// Native screen size.
pub const SCREEN: (u32, u32) = (320, 200);

/// Pre-built state for frame benchmarks.
pub struct FrameProfile {
    /// Exchange with [`SCREEN`] already announced.
    pub exchange: Arc<FrameExchange>,
    /// Palette table with a random palette installed.
    pub palette: Arc<PaletteTable>,
    /// Presenter attached to `exchange` and `palette`.
    pub presenter: Presenter,
    /// Distinct random frames to cycle through.
    pub frames: Vec<Vec<u8>>,
}

/// Build a [`FrameProfile`] with `count` random frames.
pub fn frame_profile(count: usize, seed: u64) -> FrameProfile {
    let dims = screen_dims();
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let frames = (0..count)
        .map(|_| {
            let mut f = vec![0u8; dims.pixel_count()];
            rng.fill(f.as_mut_slice());
            f
        })
        .collect();

    let exchange = Arc::new(FrameExchange::new());
    exchange.announce_dimensions(dims);
    let palette = Arc::new(PaletteTable::new());
    palette.set_palette_raw(&random_palette(seed));
    let presenter = Presenter::new(
        Arc::clone(&exchange),
        Arc::clone(&palette),
        Arc::new(InputQueue::new()),
    );
    FrameProfile {
        exchange,
        palette,
        presenter,
        frames,
    }
}

/// A deterministic random palette table.
pub fn random_palette(seed: u64) -> [u8; PALETTE_BYTES] {
    let mut raw = [0u8; PALETTE_BYTES];
    ChaCha8Rng::seed_from_u64(seed).fill(&mut raw[..]);
    raw
}

/// [`SCREEN`] as [`FrameDims`].
pub fn screen_dims() -> FrameDims {
    FrameDims::from_engine(SCREEN.0 as i32, SCREEN.1 as i32)
}
