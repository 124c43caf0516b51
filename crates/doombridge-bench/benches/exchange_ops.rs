//! Criterion micro-benchmarks for palette swap, input queue and audio slot.

use std::sync::Arc;

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, Criterion};
use doombridge_bench::random_palette;
use doombridge_core::{KeyEvent, Palette};
use doombridge_exchange::{AudioBridge, AudioConfig, InputQueue, PaletteTable};

fn bench_palette_swap(c: &mut Criterion) {
    let table = PaletteTable::new();
    let a = Palette::from_raw(&random_palette(1));
    let b = Palette::from_raw(&random_palette(2));
    let mut flip = false;
    c.bench_function("palette_swap", |bench| {
        bench.iter(|| {
            flip = !flip;
            let next = if flip { a.clone() } else { b.clone() };
            black_box(table.set_palette(next));
        });
    });
}

fn bench_palette_snapshot(c: &mut Criterion) {
    let table = PaletteTable::new();
    table.set_palette_raw(&random_palette(1));
    c.bench_function("palette_snapshot", |b| {
        b.iter(|| black_box(table.snapshot()));
    });
}

fn bench_input_tick(c: &mut Criterion) {
    let queue = InputQueue::new();
    c.bench_function("input_push8_drain", |b| {
        b.iter(|| {
            for code in 0..4 {
                queue.push(KeyEvent::pressed(code));
                queue.push(KeyEvent::released(code));
            }
            black_box(queue.drain_all());
        });
    });
}

fn bench_audio_submit_drain(c: &mut Criterion) {
    let bridge = Arc::new(AudioBridge::new(AudioConfig::default()));
    bridge.initialize(4096);
    let mix = vec![0x0505i16; 2048];
    let mut out = vec![0i16; 2048];
    c.bench_function("audio_submit_drain_4096", |b| {
        b.iter(|| {
            bridge.submit(&mix);
            black_box(bridge.drain_into(&mut out));
        });
    });
}

fn bench_audio_underrun(c: &mut Criterion) {
    let bridge = Arc::new(AudioBridge::new(AudioConfig::default()));
    bridge.initialize(4096);
    let mut out = vec![0i16; 2048];
    c.bench_function("audio_underrun_4096", |b| {
        b.iter(|| black_box(bridge.drain_into(&mut out)));
    });
}

criterion_group!(
    benches,
    bench_palette_swap,
    bench_palette_snapshot,
    bench_input_tick,
    bench_audio_submit_drain,
    bench_audio_underrun
);
criterion_main!(benches);
