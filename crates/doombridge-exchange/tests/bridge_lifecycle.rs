//! Full bridge lifecycle with a scripted engine on its own thread.

use std::time::Duration;

use doombridge_core::keys;
use doombridge_core::{FrameDims, HostKey, KeyDirection, KeyEvent, Rgb};
use doombridge_exchange::{Bridge, BridgeConfig, RgbImage};
use doombridge_test_utils::{raw_palette_with, wait_until, ScriptedSimulation};

const TIMEOUT: Duration = Duration::from_secs(5);

fn fast() -> BridgeConfig {
    BridgeConfig {
        tick_rate_hz: Some(500.0),
        ..Default::default()
    }
}

#[test]
fn engine_output_reaches_presenter_and_input_reaches_engine() {
    let mut bridge = Bridge::new(fast()).unwrap();
    let mut presenter = bridge.presenter();

    let sim = ScriptedSimulation::new(8, 4).with_palette(&raw_palette_with(1, Rgb::new(0, 255, 0)));
    let received = sim.received_events();
    bridge.spawn_engine(Box::new(sim)).unwrap();

    assert!(wait_until(TIMEOUT, || presenter.read_frame().is_some()));
    let frame = presenter.read_frame().unwrap();
    assert_eq!(frame.dims(), FrameDims::new(8, 4).unwrap());

    presenter.host_key_transition(HostKey::Up, KeyDirection::Pressed, false);
    presenter.host_key_transition(HostKey::Up, KeyDirection::Pressed, true);
    presenter.host_key_transition(HostKey::Up, KeyDirection::Released, false);
    assert!(wait_until(TIMEOUT, || received.lock().len() == 2));
    assert_eq!(
        received.lock().as_slice(),
        &[
            KeyEvent::pressed(keys::UP_ARROW),
            KeyEvent::released(keys::UP_ARROW)
        ]
    );

    let report = bridge.shutdown();
    assert!(report.engine_joined);
    assert_eq!(report.metrics.events_pushed, 2);
    assert_eq!(report.metrics.events_drained, 2);
    assert_eq!(report.metrics.palette_generation, 1);
    assert!(report.metrics.ticks >= report.metrics.frames_submitted);

    // Frames and the palette stay readable after shutdown.
    assert_eq!(presenter.current_palette().color(1), Rgb::new(0, 255, 0));
    let mut image = RgbImage::new();
    assert!(presenter.render(&mut image));
    assert_eq!(image.dims(), Some(FrameDims::new(8, 4).unwrap()));
}

#[test]
fn simulation_quit_ends_engine_thread() {
    let mut bridge = Bridge::new(fast()).unwrap();
    bridge
        .spawn_engine(Box::new(ScriptedSimulation::new(2, 2).quit_after(5)))
        .unwrap();
    assert!(wait_until(TIMEOUT, || !bridge.engine_running()));
    assert_eq!(bridge.metrics().frames_submitted, 5);
    assert_eq!(bridge.metrics().ticks, 5);

    let frame = bridge.presenter().read_frame().unwrap();
    assert_eq!(frame.pixels(), &[5; 4]);
    assert_eq!(frame.seq().0, 5);
    assert!(bridge.take_simulation().is_some());
}

#[test]
fn shutdown_is_fast_at_slow_tick_rate() {
    let mut bridge = Bridge::new(BridgeConfig {
        tick_rate_hz: Some(0.5),
        ..Default::default()
    })
    .unwrap();
    bridge
        .spawn_engine(Box::new(ScriptedSimulation::new(2, 2)))
        .unwrap();
    assert!(wait_until(TIMEOUT, || bridge.metrics().ticks == 1));

    let report = bridge.shutdown();
    assert!(report.engine_joined);
    assert!(
        report.total_ms < 1_000,
        "shutdown waited out the tick budget: {} ms",
        report.total_ms
    );
}

#[test]
fn redraw_follows_engine_progress() {
    let mut bridge = Bridge::new(fast()).unwrap();
    let mut presenter = bridge.presenter();
    bridge
        .spawn_engine(Box::new(ScriptedSimulation::new(2, 2).quit_after(1)))
        .unwrap();
    assert!(wait_until(TIMEOUT, || !bridge.engine_running()));

    assert!(presenter.needs_redraw());
    presenter.render(&mut RgbImage::new());
    assert!(!presenter.needs_redraw());
    bridge.shutdown();
}
