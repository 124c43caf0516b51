//! The owning context object.
//!
//! A [`Bridge`] creates the four exchange points, hands out the engine-side
//! [`EngineAdapter`] and any number of UI-side [`Presenter`]s, and
//! optionally runs a [`Simulation`] on its own engine thread. Dropping the
//! bridge shuts everything down.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use doombridge_core::Simulation;

use crate::adapter::EngineAdapter;
use crate::audio::AudioBridge;
use crate::audio_clock::AudioSink;
use crate::config::{BridgeConfig, ConfigError};
use crate::frame::FrameExchange;
use crate::input::InputQueue;
use crate::metrics::BridgeMetrics;
use crate::palette::PaletteTable;
use crate::presenter::Presenter;
use crate::tick_thread::TickThreadState;

// ── ShutdownReport ───────────────────────────────────────────────

/// Report from [`Bridge::shutdown`].
#[derive(Debug)]
pub struct ShutdownReport {
    /// Total time spent in the shutdown sequence.
    pub total_ms: u64,
    /// Whether the engine thread was joined without panicking
    /// (`true` when no engine thread was running).
    pub engine_joined: bool,
    /// Whether an audio clock thread was joined.
    pub audio_clock_joined: bool,
    /// Metrics at the moment shutdown completed.
    pub metrics: BridgeMetrics,
}

// ── ShutdownState ────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ShutdownState {
    Running,
    Stopped,
}

// ── Bridge ───────────────────────────────────────────────────────

/// Frame, palette, input and audio exchange between one engine thread
/// and one presentation thread.
pub struct Bridge {
    adapter: Arc<EngineAdapter>,
    shutdown_flag: Arc<AtomicBool>,
    engine_stopped: Arc<AtomicBool>,
    engine_thread: Option<JoinHandle<Box<dyn Simulation>>>,
    recovered: Option<Box<dyn Simulation>>,
    tick_rate_hz: f64,
    state: ShutdownState,
}

impl Bridge {
    /// Create a bridge whose audio is drained only by explicit
    /// [`AudioBridge::drain_into`] calls.
    pub fn new(config: BridgeConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let audio = AudioBridge::new(config.audio.clone());
        Ok(Self::assemble(&config, audio))
    }

    /// Create a bridge that starts an audio clock feeding `sink` as soon as
    /// the engine initializes sound.
    pub fn with_audio_sink(
        config: BridgeConfig,
        sink: Box<dyn AudioSink>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let audio = AudioBridge::with_sink(config.audio.clone(), sink);
        Ok(Self::assemble(&config, audio))
    }

    fn assemble(config: &BridgeConfig, audio: AudioBridge) -> Self {
        let adapter = Arc::new(EngineAdapter::new(
            Arc::new(FrameExchange::new()),
            Arc::new(PaletteTable::new()),
            Arc::new(InputQueue::new()),
            Arc::new(audio),
        ));
        Self {
            adapter,
            shutdown_flag: Arc::new(AtomicBool::new(false)),
            engine_stopped: Arc::new(AtomicBool::new(false)),
            engine_thread: None,
            recovered: None,
            tick_rate_hz: config.resolved_tick_rate_hz(),
            state: ShutdownState::Running,
        }
    }

    /// The engine-facing callbacks. Register this with an engine that
    /// runs on a thread the caller owns, or let
    /// [`spawn_engine`](Self::spawn_engine) drive one.
    pub fn adapter(&self) -> Arc<EngineAdapter> {
        Arc::clone(&self.adapter)
    }

    /// A new UI-side handle. Each presenter tracks its own held keys and
    /// redraw state.
    pub fn presenter(&self) -> Presenter {
        Presenter::new(
            Arc::clone(self.adapter.frames()),
            Arc::clone(self.adapter.palette()),
            Arc::clone(self.adapter.input()),
        )
    }

    /// The shared audio bridge, for backends that drain it themselves.
    pub fn audio(&self) -> &Arc<AudioBridge> {
        self.adapter.audio()
    }

    /// Run `simulation` on a dedicated engine thread.
    ///
    /// A previous simulation that has already quit is joined and can be
    /// recovered with [`take_simulation`](Self::take_simulation).
    pub fn spawn_engine(&mut self, simulation: Box<dyn Simulation>) -> Result<(), ConfigError> {
        if self.state == ShutdownState::Stopped {
            return Err(ConfigError::ShutDown);
        }
        if let Some(handle) = &self.engine_thread {
            if !handle.is_finished() {
                return Err(ConfigError::EngineAlreadyRunning);
            }
            self.join_engine();
        }

        self.engine_stopped.store(false, Ordering::Release);
        let state = TickThreadState::new(
            simulation,
            Arc::clone(&self.adapter),
            Arc::clone(&self.shutdown_flag),
            Arc::clone(&self.engine_stopped),
            self.tick_rate_hz,
        );
        let handle = thread::Builder::new()
            .name("doombridge-engine".into())
            .spawn(move || state.run())
            .map_err(|e| ConfigError::ThreadSpawnFailed {
                reason: format!("doombridge-engine: {e}"),
            })?;
        self.engine_thread = Some(handle);
        Ok(())
    }

    /// Whether an engine thread is currently running.
    pub fn engine_running(&self) -> bool {
        self.engine_thread.is_some() && !self.engine_stopped.load(Ordering::Acquire)
    }

    /// Recover the simulation from a finished engine thread.
    pub fn take_simulation(&mut self) -> Option<Box<dyn Simulation>> {
        if self
            .engine_thread
            .as_ref()
            .is_some_and(JoinHandle::is_finished)
        {
            self.join_engine();
        }
        self.recovered.take()
    }

    /// Snapshot of all counters.
    pub fn metrics(&self) -> BridgeMetrics {
        BridgeMetrics::collect(&self.adapter)
    }

    /// Stop the engine thread and the audio clock.
    ///
    /// Idempotent: later calls return an empty report. Frames and the
    /// palette stay readable after shutdown.
    pub fn shutdown(&mut self) -> ShutdownReport {
        if self.state == ShutdownState::Stopped {
            return ShutdownReport {
                total_ms: 0,
                engine_joined: true,
                audio_clock_joined: false,
                metrics: self.metrics(),
            };
        }
        let start = Instant::now();
        self.state = ShutdownState::Stopped;
        self.shutdown_flag.store(true, Ordering::Release);

        // Wake the engine thread if it's parked in a budget sleep.
        if let Some(handle) = &self.engine_thread {
            handle.thread().unpark();
        }
        let engine_joined = self.join_engine();

        // The engine is gone, so nothing submits after this point.
        let audio_clock_joined = self.adapter.audio().stop();

        let total_ms = start.elapsed().as_millis() as u64;
        tracing::debug!(total_ms, engine_joined, audio_clock_joined, "bridge shut down");
        ShutdownReport {
            total_ms,
            engine_joined,
            audio_clock_joined,
            metrics: self.metrics(),
        }
    }

    /// Join the engine thread, if any. Returns `false` if it panicked.
    fn join_engine(&mut self) -> bool {
        let Some(handle) = self.engine_thread.take() else {
            return true;
        };
        // A parked thread may have missed the first unpark.
        while !handle.is_finished() {
            handle.thread().unpark();
            thread::sleep(Duration::from_millis(1));
        }
        match handle.join() {
            Ok(simulation) => {
                self.recovered = Some(simulation);
                true
            }
            Err(_) => {
                tracing::error!("engine thread panicked");
                false
            }
        }
    }
}

impl Drop for Bridge {
    fn drop(&mut self) {
        if self.state != ShutdownState::Stopped {
            self.shutdown();
        }
    }
}
