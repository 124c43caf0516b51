//! Underrun-tolerant audio exchange.
//!
//! The engine mixes into a buffer it owns and signals "the next chunk is
//! ready" with [`AudioBridge::submit`], which copies the mix into the
//! bridge's playback buffer. The backend drains on its own clock. If no
//! submission arrived since the previous drain, the drain yields silence:
//! never a replay of the stale chunk, and never a wait for the engine.
//!
//! # State machine
//!
//! ```text
//! Uninitialized --initialize()--> Ready(silent) <--drain()-- Ready(filled)
//!                                      |  --submit()-->          |
//!                                      +------stop()------> Stopped
//! ```
//!
//! The playback buffer is only touched under the bridge's mutex, so the
//! engine's copy-in and the backend's copy-out never overlap.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use doombridge_core::{fatal, Violation};
use parking_lot::Mutex;

use crate::audio_clock::{AudioClock, AudioSink};
use crate::config::AudioConfig;

/// Lifecycle state of an [`AudioBridge`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AudioState {
    /// No buffer yet; submits are precondition violations.
    Uninitialized,
    /// Buffer allocated; `filled` is true while a submitted chunk awaits
    /// its drain.
    Ready {
        /// A fresh chunk is waiting.
        filled: bool,
    },
    /// Shut down; drains yield silence and submits are discarded.
    Stopped,
}

/// What a drain produced.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DrainOutcome {
    /// The chunk submitted since the previous drain.
    Fresh,
    /// All-zero samples: underrun, or the bridge is stopped.
    Silence,
}

struct AudioInner {
    state: AudioState,
    playback: Vec<i16>,
}

enum Backend {
    /// A sink waiting for `initialize` to start its clock.
    Pending(Box<dyn AudioSink>),
    Running(AudioClock),
    None,
}

/// Shared audio chunk slot between the engine thread and the audio clock.
pub struct AudioBridge {
    inner: Mutex<AudioInner>,
    // Lifecycle only; never held while `inner` is locked.
    backend: Mutex<Backend>,
    config: AudioConfig,
    submits: AtomicU64,
    drains: AtomicU64,
    underruns: AtomicU64,
}

// Compile-time assertion: AudioBridge must be Send + Sync.
const _: fn() = || {
    fn assert<T: Send + Sync>() {}
    assert::<AudioBridge>();
};

impl AudioBridge {
    /// Create a bridge with no backend; drains happen only when a caller
    /// invokes [`drain_into`](Self::drain_into) itself.
    pub fn new(config: AudioConfig) -> Self {
        Self::with_backend(config, Backend::None)
    }

    /// Create a bridge whose [`initialize`](Self::initialize) starts an
    /// [`AudioClock`] feeding `sink`.
    pub fn with_sink(config: AudioConfig, sink: Box<dyn AudioSink>) -> Self {
        Self::with_backend(config, Backend::Pending(sink))
    }

    fn with_backend(config: AudioConfig, backend: Backend) -> Self {
        Self {
            inner: Mutex::new(AudioInner {
                state: AudioState::Uninitialized,
                playback: Vec::new(),
            }),
            backend: Mutex::new(backend),
            config,
            submits: AtomicU64::new(0),
            drains: AtomicU64::new(0),
            underruns: AtomicU64::new(0),
        }
    }

    /// Allocate the fixed-size playback buffer and, if a sink was supplied,
    /// start the backend clock.
    ///
    /// Initializing a stopped bridge is ignored.
    ///
    /// # Panics
    ///
    /// A `byte_size` that is zero or not a whole number of interleaved
    /// frames is fatal, as is a second initialization or failure to spawn
    /// the clock thread.
    pub fn initialize(self: &Arc<Self>, byte_size: usize) {
        let frame_bytes = self.config.bytes_per_frame().max(2);
        if byte_size == 0 || byte_size % frame_bytes != 0 {
            fatal(Violation::InvalidAudioBufferSize { bytes: byte_size });
        }
        {
            let mut inner = self.inner.lock();
            let state = inner.state;
            match state {
                AudioState::Uninitialized => {}
                AudioState::Ready { .. } => fatal(Violation::AudioAlreadyInitialized),
                AudioState::Stopped => {
                    tracing::trace!("audio initialize after stop ignored");
                    return;
                }
            }
            inner.playback = vec![0; byte_size / 2];
            inner.state = AudioState::Ready { filled: false };
        }
        tracing::debug!(byte_size, "audio bridge initialized");
        self.start_backend(byte_size);
    }

    fn start_backend(self: &Arc<Self>, byte_size: usize) {
        let mut backend = self.backend.lock();
        let sink = match std::mem::replace(&mut *backend, Backend::None) {
            Backend::Pending(sink) => sink,
            other => {
                *backend = other;
                return;
            }
        };
        let period = self.config.chunk_period(byte_size);
        match AudioClock::start(Arc::downgrade(self), sink, period) {
            Ok(clock) => *backend = Backend::Running(clock),
            Err(e) => fatal(Violation::ResourceExhausted {
                what: format!("audio clock thread: {e}"),
            }),
        }
    }

    /// Copy the engine's mix buffer into the playback buffer.
    ///
    /// # Panics
    ///
    /// Submitting before [`initialize`](Self::initialize), or with a mix
    /// buffer of a different size, is a precondition violation.
    pub fn submit(&self, mix_buffer: &[i16]) {
        let mut inner = self.inner.lock();
        let state = inner.state;
        match state {
            AudioState::Uninitialized => fatal(Violation::AudioNotInitialized),
            AudioState::Stopped => {
                drop(inner);
                tracing::trace!("audio submit after stop discarded");
                return;
            }
            AudioState::Ready { .. } => {}
        }
        if mix_buffer.len() != inner.playback.len() {
            fatal(Violation::AudioSizeMismatch {
                expected_bytes: inner.playback.len() * 2,
                actual_bytes: mix_buffer.len() * 2,
            });
        }
        inner.playback.copy_from_slice(mix_buffer);
        inner.state = AudioState::Ready { filled: true };
        drop(inner);
        self.submits.fetch_add(1, Ordering::Relaxed);
    }

    /// Fill `out` with the next chunk: the fresh submission if there is one,
    /// silence otherwise.
    ///
    /// # Panics
    ///
    /// Draining before [`initialize`](Self::initialize), or into a buffer of
    /// a different size, is a precondition violation.
    pub fn drain_into(&self, out: &mut [i16]) -> DrainOutcome {
        let mut inner = self.inner.lock();
        let state = inner.state;
        let outcome = match state {
            AudioState::Uninitialized => fatal(Violation::AudioNotInitialized),
            AudioState::Stopped => {
                out.fill(0);
                DrainOutcome::Silence
            }
            AudioState::Ready { filled } => {
                if out.len() != inner.playback.len() {
                    fatal(Violation::AudioSizeMismatch {
                        expected_bytes: inner.playback.len() * 2,
                        actual_bytes: out.len() * 2,
                    });
                }
                if filled {
                    out.copy_from_slice(&inner.playback);
                    inner.state = AudioState::Ready { filled: false };
                    DrainOutcome::Fresh
                } else {
                    out.fill(0);
                    self.underruns.fetch_add(1, Ordering::Relaxed);
                    DrainOutcome::Silence
                }
            }
        };
        drop(inner);
        self.drains.fetch_add(1, Ordering::Relaxed);
        if outcome == DrainOutcome::Silence {
            tracing::trace!("audio drain produced silence");
        }
        outcome
    }

    /// Drain into a freshly allocated chunk.
    pub fn drain(&self) -> (Vec<i16>, DrainOutcome) {
        let mut out = vec![0; self.sample_count()];
        let outcome = self.drain_into(&mut out);
        (out, outcome)
    }

    /// Stop the bridge and join the backend clock, if one is running.
    ///
    /// Idempotent. Returns `true` if a clock thread was joined.
    pub fn stop(&self) -> bool {
        self.inner.lock().state = AudioState::Stopped;
        let backend = std::mem::replace(&mut *self.backend.lock(), Backend::None);
        let joined = match backend {
            Backend::Running(clock) => clock.stop(),
            Backend::Pending(_) | Backend::None => false,
        };
        tracing::debug!(clock_joined = joined, "audio bridge stopped");
        joined
    }

    /// Current lifecycle state.
    pub fn state(&self) -> AudioState {
        self.inner.lock().state
    }

    /// Size of the exchange buffer in bytes (0 before initialization).
    pub fn byte_size(&self) -> usize {
        self.sample_count() * 2
    }

    /// Size of the exchange buffer in 16-bit samples.
    pub fn sample_count(&self) -> usize {
        self.inner.lock().playback.len()
    }

    /// Backend format.
    pub fn config(&self) -> &AudioConfig {
        &self.config
    }

    /// Number of accepted submissions.
    pub fn submits(&self) -> u64 {
        self.submits.load(Ordering::Relaxed)
    }

    /// Number of drains, fresh or silent.
    pub fn drains(&self) -> u64 {
        self.drains.load(Ordering::Relaxed)
    }

    /// Number of drains that found no fresh submission while ready.
    pub fn underruns(&self) -> u64 {
        self.underruns.load(Ordering::Relaxed)
    }
}

impl Drop for AudioBridge {
    fn drop(&mut self) {
        // The clock only holds a weak reference; disconnecting its shutdown
        // channel is enough to end it. Joining here could run on the clock
        // thread itself.
        if let Backend::Running(clock) = std::mem::replace(self.backend.get_mut(), Backend::None) {
            clock.detach();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ready(bytes: usize) -> Arc<AudioBridge> {
        let bridge = Arc::new(AudioBridge::new(AudioConfig::default()));
        bridge.initialize(bytes);
        bridge
    }

    #[test]
    fn starts_uninitialized() {
        let bridge = AudioBridge::new(AudioConfig::default());
        assert_eq!(bridge.state(), AudioState::Uninitialized);
        assert_eq!(bridge.byte_size(), 0);
    }

    #[test]
    fn initialize_allocates_silent_buffer() {
        let bridge = ready(4096);
        assert_eq!(bridge.state(), AudioState::Ready { filled: false });
        assert_eq!(bridge.byte_size(), 4096);
        assert_eq!(bridge.sample_count(), 2048);
    }

    #[test]
    fn fresh_then_underrun() {
        let bridge = ready(8);
        bridge.submit(&[1, -2, 3, -4]);
        assert_eq!(bridge.state(), AudioState::Ready { filled: true });

        let (chunk, outcome) = bridge.drain();
        assert_eq!(outcome, DrainOutcome::Fresh);
        assert_eq!(chunk, vec![1, -2, 3, -4]);

        let (chunk, outcome) = bridge.drain();
        assert_eq!(outcome, DrainOutcome::Silence);
        assert_eq!(chunk, vec![0; 4]);
        assert_eq!(bridge.underruns(), 1);
        assert_eq!(bridge.drains(), 2);
    }

    #[test]
    fn underrun_overwrites_stale_target() {
        let bridge = ready(8);
        let mut out = [7i16; 4];
        assert_eq!(bridge.drain_into(&mut out), DrainOutcome::Silence);
        assert_eq!(out, [0; 4]);
    }

    #[test]
    fn resubmit_before_drain_keeps_latest() {
        let bridge = ready(4);
        bridge.submit(&[1, 1]);
        bridge.submit(&[2, 2]);
        assert_eq!(bridge.drain(), (vec![2, 2], DrainOutcome::Fresh));
        assert_eq!(bridge.submits(), 2);
    }

    #[test]
    fn stopped_bridge_is_silent_and_discards() {
        let bridge = ready(4);
        bridge.submit(&[5, 5]);
        assert!(!bridge.stop(), "no clock to join");
        assert_eq!(bridge.state(), AudioState::Stopped);
        bridge.submit(&[6, 6]);
        assert_eq!(bridge.drain(), (vec![0, 0], DrainOutcome::Silence));
        assert_eq!(bridge.submits(), 1);
        // Idempotent.
        bridge.stop();
    }

    #[test]
    #[should_panic(expected = "audio used before initialization")]
    fn submit_before_initialize_is_fatal() {
        AudioBridge::new(AudioConfig::default()).submit(&[0; 4]);
    }

    #[test]
    #[should_panic(expected = "audio used before initialization")]
    fn drain_before_initialize_is_fatal() {
        AudioBridge::new(AudioConfig::default()).drain_into(&mut [0; 4]);
    }

    #[test]
    #[should_panic(expected = "audio bridge initialized twice")]
    fn double_initialize_is_fatal() {
        let bridge = ready(4);
        bridge.initialize(4);
    }

    #[test]
    #[should_panic(expected = "invalid audio buffer size of 3 bytes")]
    fn odd_buffer_size_is_fatal() {
        ready(3);
    }

    #[test]
    #[should_panic(expected = "invalid audio buffer size of 2 bytes")]
    fn buffer_shorter_than_one_stereo_frame_is_fatal() {
        ready(2);
    }

    #[test]
    #[should_panic(expected = "invalid audio buffer size of 4098 bytes")]
    fn partial_trailing_frame_is_fatal() {
        ready(4098);
    }

    #[test]
    fn mono_accepts_single_sample_buffer() {
        let bridge = Arc::new(AudioBridge::new(AudioConfig {
            channels: 1,
            ..Default::default()
        }));
        bridge.initialize(2);
        assert_eq!(bridge.sample_count(), 1);
        assert!(!bridge.config().chunk_period(2).is_zero());
    }

    #[test]
    #[should_panic(expected = "initialized with 8 bytes, got 6")]
    fn mismatched_submit_is_fatal() {
        ready(8).submit(&[0; 3]);
    }

    #[test]
    #[should_panic(expected = "initialized with 8 bytes, got 16")]
    fn mismatched_drain_target_is_fatal() {
        ready(8).drain_into(&mut [0; 8]);
    }

    // ── proptest ───────────────────────────────────────────────

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        #[derive(Clone, Debug)]
        enum Op {
            Submit(i16),
            Drain,
        }

        fn arb_op() -> impl Strategy<Value = Op> {
            prop_oneof![any::<i16>().prop_map(Op::Submit), Just(Op::Drain)]
        }

        proptest! {
            #[test]
            fn drain_is_latest_submit_or_silence(ops in prop::collection::vec(arb_op(), 0..64)) {
                let bridge = ready(16);
                let mut pending: Option<i16> = None;
                for op in ops {
                    match op {
                        Op::Submit(v) => {
                            bridge.submit(&[v; 8]);
                            pending = Some(v);
                        }
                        Op::Drain => {
                            let (chunk, outcome) = bridge.drain();
                            match pending.take() {
                                Some(v) => {
                                    prop_assert_eq!(outcome, DrainOutcome::Fresh);
                                    prop_assert_eq!(chunk, vec![v; 8]);
                                }
                                None => {
                                    prop_assert_eq!(outcome, DrainOutcome::Silence);
                                    prop_assert_eq!(chunk, vec![0; 8]);
                                }
                            }
                        }
                    }
                }
            }
        }
    }
}
