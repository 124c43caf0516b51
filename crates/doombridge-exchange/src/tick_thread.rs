//! Engine driver loop.
//!
//! The driver thread owns the [`Simulation`] exclusively (moved in on
//! spawn) and calls it at a fixed tick rate, passing the shared
//! [`EngineAdapter`] as its callbacks. The remaining tick budget is slept
//! with `park_timeout`, so a shutdown `unpark` wakes it immediately.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use doombridge_core::{Simulation, TickOutcome};

use crate::adapter::EngineAdapter;

/// State held by the engine thread's main loop.
pub(crate) struct TickThreadState {
    simulation: Box<dyn Simulation>,
    adapter: Arc<EngineAdapter>,
    shutdown_flag: Arc<AtomicBool>,
    engine_stopped: Arc<AtomicBool>,
    tick_budget: Duration,
}

impl TickThreadState {
    pub fn new(
        simulation: Box<dyn Simulation>,
        adapter: Arc<EngineAdapter>,
        shutdown_flag: Arc<AtomicBool>,
        engine_stopped: Arc<AtomicBool>,
        tick_rate_hz: f64,
    ) -> Self {
        Self {
            simulation,
            adapter,
            shutdown_flag,
            engine_stopped,
            tick_budget: Duration::from_secs_f64(1.0 / tick_rate_hz),
        }
    }

    /// Main loop. Runs until the simulation quits or `shutdown_flag` is set.
    ///
    /// Consumes self and returns the simulation so the owner can recover
    /// it through the `JoinHandle`.
    pub fn run(mut self) -> Box<dyn Simulation> {
        tracing::debug!(budget = ?self.tick_budget, "engine thread started");
        let _stopped = StoppedOnExit(Arc::clone(&self.engine_stopped));
        self.simulation.start(self.adapter.as_ref());

        let mut ticks = 0u64;
        let quit = loop {
            if self.shutdown_flag.load(Ordering::Acquire) {
                break false;
            }
            let tick_start = Instant::now();
            let outcome = self.simulation.tick(self.adapter.as_ref());
            ticks += 1;
            tracing::trace!(ticks, elapsed = ?tick_start.elapsed(), "tick complete");
            if outcome == TickOutcome::Quit {
                break true;
            }
            self.sleep_until(tick_start + self.tick_budget);
        };

        tracing::debug!(ticks, quit, "engine thread stopped");
        self.simulation
    }

    /// Park until `deadline` or until shutdown is requested.
    fn sleep_until(&self, deadline: Instant) {
        loop {
            if self.shutdown_flag.load(Ordering::Acquire) {
                return;
            }
            let now = Instant::now();
            match deadline.checked_duration_since(now) {
                Some(remaining) if !remaining.is_zero() => thread::park_timeout(remaining),
                _ => return,
            }
        }
    }
}

/// Raises the stopped flag when the engine thread exits, including by
/// unwinding out of a fatal violation.
struct StoppedOnExit(Arc<AtomicBool>);

impl Drop for StoppedOnExit {
    fn drop(&mut self) {
        if thread::panicking() {
            tracing::error!("engine thread unwinding");
        }
        self.0.store(true, Ordering::Release);
    }
}
