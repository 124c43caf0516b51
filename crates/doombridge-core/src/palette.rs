//! The 256-entry color lookup table.

use crate::violation::{fatal, Violation};

/// Number of entries in a palette.
pub const PALETTE_ENTRIES: usize = 256;

/// Size of the engine's raw palette table: 256 RGB triples.
pub const PALETTE_BYTES: usize = PALETTE_ENTRIES * 3;

/// One 8-bit-per-channel color.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Rgb {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
}

impl Rgb {
    /// Opaque black, the startup value of every palette entry.
    pub const BLACK: Rgb = Rgb { r: 0, g: 0, b: 0 };

    /// Build a color from its channels.
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Pack as `0x00RRGGBB`.
    pub fn to_u32(self) -> u32 {
        (u32::from(self.r) << 16) | (u32::from(self.g) << 8) | u32::from(self.b)
    }
}

/// A complete palette: exactly 256 colors.
///
/// Always replaced as a whole; see `PaletteTable` in `doombridge-exchange`
/// for the shared, generation-tracked holder.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Palette {
    entries: [Rgb; PALETTE_ENTRIES],
}

impl Default for Palette {
    fn default() -> Self {
        Self::black()
    }
}

impl Palette {
    /// All-black palette.
    pub fn black() -> Self {
        Self {
            entries: [Rgb::BLACK; PALETTE_ENTRIES],
        }
    }

    /// Build from 256 colors.
    pub fn from_entries(entries: [Rgb; PALETTE_ENTRIES]) -> Self {
        Self { entries }
    }

    /// Decode the engine's raw table of 256 `(r, g, b)` triples.
    pub fn from_raw(raw: &[u8; PALETTE_BYTES]) -> Self {
        let mut entries = [Rgb::BLACK; PALETTE_ENTRIES];
        for (entry, rgb) in entries.iter_mut().zip(raw.chunks_exact(3)) {
            *entry = Rgb::new(rgb[0], rgb[1], rgb[2]);
        }
        Self { entries }
    }

    /// Decode a raw table of unchecked length.
    ///
    /// # Panics
    ///
    /// Anything other than exactly [`PALETTE_BYTES`] bytes is a precondition
    /// violation.
    pub fn from_slice(raw: &[u8]) -> Self {
        match <&[u8; PALETTE_BYTES]>::try_from(raw) {
            Ok(table) => Self::from_raw(table),
            Err(_) => fatal(Violation::PaletteSizeMismatch { actual: raw.len() }),
        }
    }

    /// Color of an in-range index.
    #[inline]
    pub fn color(&self, index: u8) -> Rgb {
        self.entries[index as usize]
    }

    /// Color of an unchecked index.
    ///
    /// # Panics
    ///
    /// An index above 255 means a pixel value was corrupted somewhere
    /// between producer and consumer; it is never clamped or wrapped.
    pub fn get(&self, index: usize) -> Rgb {
        match self.entries.get(index) {
            Some(rgb) => *rgb,
            None => fatal(Violation::PaletteIndexOutOfRange { index }),
        }
    }

    /// All entries in index order.
    pub fn entries(&self) -> &[Rgb; PALETTE_ENTRIES] {
        &self.entries
    }

    /// Encode back into the engine's raw triple layout.
    pub fn to_raw(&self) -> [u8; PALETTE_BYTES] {
        let mut raw = [0u8; PALETTE_BYTES];
        for (chunk, rgb) in raw.chunks_exact_mut(3).zip(self.entries.iter()) {
            chunk.copy_from_slice(&[rgb.r, rgb.g, rgb.b]);
        }
        raw
    }
}
