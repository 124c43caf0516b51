//! Precondition violations and the single fatal path.
//!
//! Cross-thread desynchronization between the engine and the UI is a
//! programming error, not a transient fault. Every broken precondition in
//! the workspace is named by a [`Violation`] variant and terminates through
//! [`fatal`]. Expected "no data" conditions (empty frame, empty input batch,
//! audio underrun) are never routed here.

use std::fmt;

/// A broken producer/consumer precondition.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Violation {
    /// The engine announced a non-positive screen size.
    InvalidDimensions {
        /// Announced width.
        width: i32,
        /// Announced height.
        height: i32,
    },
    /// A second dimension announcement disagreed with the first.
    DimensionsChanged {
        /// Dimensions fixed by the first announcement.
        announced: (u32, u32),
        /// Dimensions in the conflicting announcement.
        requested: (u32, u32),
    },
    /// A frame was submitted before any dimension announcement.
    FrameBeforeDimensions,
    /// A submitted frame's length disagrees with `width * height`.
    FrameSizeMismatch {
        /// `width * height` of the announced dimensions.
        expected: usize,
        /// Length of the submitted buffer.
        actual: usize,
    },
    /// A palette table was not exactly 768 bytes.
    PaletteSizeMismatch {
        /// Length of the supplied table.
        actual: usize,
    },
    /// A palette index outside `[0, 255]` reached color resolution.
    PaletteIndexOutOfRange {
        /// The offending index.
        index: usize,
    },
    /// Audio was submitted or drained before the bridge was initialized.
    AudioNotInitialized,
    /// The audio bridge was initialized twice.
    AudioAlreadyInitialized,
    /// The requested audio buffer size is zero or not a whole number of
    /// interleaved frames.
    InvalidAudioBufferSize {
        /// Requested size in bytes.
        bytes: usize,
    },
    /// A mix buffer or drain target disagrees with the initialized size.
    AudioSizeMismatch {
        /// Initialized size in bytes.
        expected_bytes: usize,
        /// Size of the offered buffer in bytes.
        actual_bytes: usize,
    },
    /// A buffer or thread required at initialization could not be created.
    ResourceExhausted {
        /// What could not be created, and why.
        what: String,
    },
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidDimensions { width, height } => {
                write!(f, "invalid frame dimensions {width}x{height}")
            }
            Self::DimensionsChanged {
                announced,
                requested,
            } => write!(
                f,
                "frame dimensions changed from {}x{} to {}x{}",
                announced.0, announced.1, requested.0, requested.1
            ),
            Self::FrameBeforeDimensions => {
                write!(f, "frame submitted before dimensions were announced")
            }
            Self::FrameSizeMismatch { expected, actual } => {
                write!(f, "frame size mismatch: expected {expected} bytes, got {actual}")
            }
            Self::PaletteSizeMismatch { actual } => {
                write!(f, "palette size mismatch: expected 768 bytes, got {actual}")
            }
            Self::PaletteIndexOutOfRange { index } => {
                write!(f, "palette index {index} out of range [0, 255]")
            }
            Self::AudioNotInitialized => write!(f, "audio used before initialization"),
            Self::AudioAlreadyInitialized => write!(f, "audio bridge initialized twice"),
            Self::InvalidAudioBufferSize { bytes } => {
                write!(f, "invalid audio buffer size of {bytes} bytes")
            }
            Self::AudioSizeMismatch {
                expected_bytes,
                actual_bytes,
            } => write!(
                f,
                "audio buffer size mismatch: initialized with {expected_bytes} bytes, got {actual_bytes}"
            ),
            Self::ResourceExhausted { what } => write!(f, "resource exhausted: {what}"),
        }
    }
}

impl std::error::Error for Violation {}

/// Abort on a broken precondition.
///
/// Emits an error-level `tracing` record so the cause survives in logs
/// even when the panic message is swallowed by the application shell,
/// then panics with the violation's message.
#[cold]
#[track_caller]
pub fn fatal(violation: Violation) -> ! {
    tracing::error!(%violation, "precondition violation");
    panic!("{violation}");
}
