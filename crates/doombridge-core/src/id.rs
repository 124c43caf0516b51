//! Strongly-typed counters and the [`FrameDims`] pair.

use std::fmt;

use crate::violation::{fatal, Violation};

/// Monotonically increasing engine tick counter.
///
/// Incremented each time the engine thread starts a simulated tick.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TickId(pub u64);

impl fmt::Display for TickId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for TickId {
    fn from(v: u64) -> Self {
        Self(v)
    }
}

/// Submission number of a frame.
///
/// The first submitted frame is `FrameSeq(1)`; `FrameSeq(0)` means
/// "nothing submitted yet" and is never attached to a readable frame.
/// Consumers compare sequence numbers to detect skipped frames or to
/// avoid redrawing an unchanged screen.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FrameSeq(pub u64);

impl FrameSeq {
    /// The sequence value before any frame was submitted.
    pub const NONE: FrameSeq = FrameSeq(0);

    /// The sequence number following this one.
    pub fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl fmt::Display for FrameSeq {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Width and height of the indexed-color screen, in pixels.
///
/// Both components are strictly positive. Fixed for the process lifetime
/// once the engine has announced them.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FrameDims {
    width: u32,
    height: u32,
}

impl FrameDims {
    /// Build dimensions, returning `None` if either component is zero.
    pub fn new(width: u32, height: u32) -> Option<Self> {
        if width == 0 || height == 0 {
            return None;
        }
        Some(Self { width, height })
    }

    /// Convert the engine's signed dimension announcement.
    ///
    /// # Panics
    ///
    /// Non-positive values are a precondition violation and abort via
    /// [`fatal`].
    pub fn from_engine(width: i32, height: i32) -> Self {
        match (u32::try_from(width), u32::try_from(height)) {
            (Ok(w), Ok(h)) if w > 0 && h > 0 => Self {
                width: w,
                height: h,
            },
            _ => fatal(Violation::InvalidDimensions { width, height }),
        }
    }

    /// Screen width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Screen height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Number of palette indices in one frame (`width * height`).
    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Row-major offset of `(x, y)`, or `None` if out of bounds.
    pub fn offset(&self, x: u32, y: u32) -> Option<usize> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(y as usize * self.width as usize + x as usize)
    }
}

impl fmt::Display for FrameDims {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}
