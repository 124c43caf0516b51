//! The audio backend clock draining on its own schedule.
//!
//! The engine here is driven by hand, so the test controls exactly when
//! submissions happen relative to the clock's drains.

use std::time::Duration;

use doombridge_core::EngineCallbacks;
use doombridge_exchange::{AudioConfig, AudioState, Bridge, BridgeConfig};
use doombridge_test_utils::{wait_until, RecordingSink, ScriptedSimulation};

const TIMEOUT: Duration = Duration::from_secs(5);

/// Stereo 16-bit at 2000 Hz: a 400-byte chunk lasts 50 ms.
fn slow_clock() -> BridgeConfig {
    BridgeConfig {
        audio: AudioConfig {
            sample_rate: 2_000,
            ..Default::default()
        },
        ..Default::default()
    }
}

#[test]
fn clock_starts_on_initialize_and_plays_silence_on_underrun() {
    let sink = RecordingSink::new();
    let config = BridgeConfig {
        audio: AudioConfig {
            sample_rate: 4_000,
            channels: 2,
            bits_per_sample: 16,
        },
        ..Default::default()
    };
    let mut bridge = Bridge::with_audio_sink(config, Box::new(sink.clone())).unwrap();
    let engine = bridge.adapter();

    // No clock before the engine brings sound up.
    std::thread::sleep(Duration::from_millis(10));
    assert!(sink.is_empty());

    // 40 bytes = 10 stereo frames = 2.5 ms per drain.
    engine.on_audio_init(&[0i16; 20]);
    assert_eq!(bridge.audio().state(), AudioState::Ready { filled: false });
    assert!(wait_until(TIMEOUT, || sink.len() >= 3));

    let report = bridge.shutdown();
    assert!(report.audio_clock_joined);
    assert_eq!(bridge.audio().state(), AudioState::Stopped);

    let chunks = sink.chunks();
    assert!(chunks.iter().all(|c| c.len() == 20));
    assert!(chunks.iter().all(|c| c.iter().all(|&s| s == 0)));
    assert_eq!(report.metrics.audio_underruns, report.metrics.audio_drains);
}

#[test]
fn submitted_chunk_is_played_exactly_once() {
    let sink = RecordingSink::new();
    let mut bridge = Bridge::with_audio_sink(slow_clock(), Box::new(sink.clone())).unwrap();
    let engine = bridge.adapter();

    engine.on_audio_init(&[0i16; 200]);
    engine.on_audio_submit(&[0x0505i16; 200]);
    assert!(wait_until(TIMEOUT, || sink.len() >= 2));
    bridge.shutdown();

    let chunks = sink.chunks();
    assert_eq!(chunks[0], vec![0x0505; 200]);
    assert!(chunks[1..].iter().all(|c| c.iter().all(|&s| s == 0)));
}

#[test]
fn engine_thread_feeds_the_clock() {
    let sink = RecordingSink::new();
    let config = BridgeConfig {
        tick_rate_hz: Some(200.0),
        audio: AudioConfig {
            sample_rate: 4_000,
            ..Default::default()
        },
    };
    let mut bridge = Bridge::with_audio_sink(config, Box::new(sink.clone())).unwrap();
    bridge
        .spawn_engine(Box::new(ScriptedSimulation::new(4, 4).with_audio(40)))
        .unwrap();

    assert!(wait_until(TIMEOUT, || sink
        .chunks()
        .iter()
        .any(|c| c.iter().any(|&s| s != 0))));
    let report = bridge.shutdown();
    assert!(report.engine_joined);
    assert!(report.audio_clock_joined);
    assert!(report.metrics.audio_submits > 0);

    // Every chunk is either one whole submission or silence.
    for chunk in sink.chunks() {
        let first = chunk[0];
        assert!(chunk.iter().all(|&s| s == first));
    }
    assert!(bridge.take_simulation().is_some());
}

#[test]
fn dropping_the_bridge_stops_the_clock() {
    let sink = RecordingSink::new();
    let bridge = Bridge::with_audio_sink(BridgeConfig::default(), Box::new(sink.clone())).unwrap();
    bridge.adapter().on_audio_init(&[0i16; 64]);
    assert!(wait_until(TIMEOUT, || !sink.is_empty()));
    drop(bridge);

    let played = sink.len();
    std::thread::sleep(Duration::from_millis(50));
    assert_eq!(sink.len(), played, "clock kept running after drop");
}

#[test]
#[should_panic(expected = "invalid audio buffer size of 2 bytes")]
fn sub_frame_mix_buffer_never_starts_the_clock() {
    let sink = RecordingSink::new();
    let bridge = Bridge::with_audio_sink(BridgeConfig::default(), Box::new(sink)).unwrap();
    bridge.adapter().on_audio_init(&[0i16; 1]);
}
