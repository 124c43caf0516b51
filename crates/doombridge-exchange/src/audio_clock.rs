//! Backend-driven drain loop for the [`AudioBridge`].
//!
//! An [`AudioClock`] owns one named thread that wakes once per chunk
//! period (`crossbeam_channel::tick`), drains the bridge into a reusable
//! buffer and hands the chunk to an [`AudioSink`]. The engine has no say in
//! when this happens; that independence is what makes underruns possible,
//! and silence is what the sink receives when one occurs.

use std::sync::Weak;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossbeam_channel::{select, Receiver, Sender};

use crate::audio::AudioBridge;

/// Destination for drained chunks: a sound device, a file, a test recorder.
///
/// `play` is called from the audio clock thread once per period with
/// exactly one chunk of interleaved samples. Implementations should not
/// block for longer than one period.
pub trait AudioSink: Send {
    /// Consume one chunk.
    fn play(&mut self, samples: &[i16]);
}

/// Sink that discards all audio.
///
/// Useful when validating engine behavior without an output device.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullAudioSink;

impl AudioSink for NullAudioSink {
    fn play(&mut self, _samples: &[i16]) {}
}

/// Handle to a running audio clock thread.
pub struct AudioClock {
    shutdown_tx: Option<Sender<()>>,
    thread: Option<JoinHandle<()>>,
    period: Duration,
}

impl AudioClock {
    /// Spawn the clock thread.
    ///
    /// The thread holds only a weak reference to the bridge and exits when
    /// the bridge is dropped, when [`stop`](Self::stop) is called, or when
    /// this handle is dropped.
    pub fn start(
        bridge: Weak<AudioBridge>,
        mut sink: Box<dyn AudioSink>,
        period: Duration,
    ) -> std::io::Result<Self> {
        let (shutdown_tx, shutdown_rx) = crossbeam_channel::bounded(1);
        let thread = thread::Builder::new()
            .name("doombridge-audio".into())
            .spawn(move || run(bridge, sink.as_mut(), period, shutdown_rx))?;
        tracing::debug!(?period, "audio clock started");
        Ok(Self {
            shutdown_tx: Some(shutdown_tx),
            thread: Some(thread),
            period,
        })
    }

    /// Drain period.
    pub fn period(&self) -> Duration {
        self.period
    }

    /// Signal the thread and wait for it to exit.
    ///
    /// Returns `true` if the thread was joined cleanly.
    pub fn stop(mut self) -> bool {
        if let Some(tx) = self.shutdown_tx.take() {
            // Disconnect wakes the thread even if the signal is never read.
            let _ = tx.try_send(());
        }
        match self.thread.take() {
            Some(handle) => handle.join().is_ok(),
            None => false,
        }
    }

    /// Signal the thread without waiting for it.
    pub fn detach(mut self) {
        self.shutdown_tx.take();
        self.thread.take();
    }
}

impl Drop for AudioClock {
    fn drop(&mut self) {
        // Dropping the sender disconnects the shutdown channel; the thread
        // notices on its next select.
        self.shutdown_tx.take();
    }
}

fn run(
    bridge: Weak<AudioBridge>,
    sink: &mut dyn AudioSink,
    period: Duration,
    shutdown_rx: Receiver<()>,
) {
    let ticker = crossbeam_channel::tick(period);
    let mut chunk: Vec<i16> = Vec::new();
    loop {
        select! {
            recv(ticker) -> _ => {
                let Some(bridge) = bridge.upgrade() else { break };
                chunk.resize(bridge.sample_count(), 0);
                bridge.drain_into(&mut chunk);
                drop(bridge);
                sink.play(&chunk);
            }
            recv(shutdown_rx) -> _ => break,
        }
    }
    tracing::debug!("audio clock stopped");
}
