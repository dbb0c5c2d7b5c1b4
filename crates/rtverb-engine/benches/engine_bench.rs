//! Criterion benchmarks for the rtverb engine
//!
//! Run with: cargo bench -p rtverb-engine
#![allow(missing_docs)]

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use rtverb_engine::{EngineConfig, PredelayMode, Preset, ReverbEngine, ReverbParameters, Tuning};

const SAMPLE_RATE: f32 = 48000.0;
const BLOCK_SIZES: &[usize] = &[64, 128, 256, 512, 1024];

fn generate_test_signal(size: usize) -> Vec<f32> {
    (0..size)
        .map(|i| {
            let t = i as f32 / SAMPLE_RATE;
            (2.0 * std::f32::consts::PI * 440.0 * t).sin() * 0.5
        })
        .collect()
}

fn bench_engine(c: &mut Criterion, name: &str, config: EngineConfig) {
    let mut group = c.benchmark_group(name);

    for &block_size in BLOCK_SIZES {
        let input = generate_test_signal(block_size);

        group.bench_with_input(
            BenchmarkId::from_parameter(block_size),
            &block_size,
            |b, _| {
                let Ok(mut engine) = ReverbEngine::with_config(config.clone()) else {
                    return;
                };
                engine.set_room_size(0.8);
                engine.set_predelay(0.02);
                let mut out_l = vec![0.0; block_size];
                let mut out_r = vec![0.0; block_size];
                b.iter(|| {
                    engine.process(
                        black_box(&input),
                        black_box(&input),
                        &mut out_l,
                        &mut out_r,
                        block_size,
                        1,
                    );
                    black_box(out_l[0])
                })
            },
        );
    }

    group.finish();
}

fn bench_default(c: &mut Criterion) {
    bench_engine(c, "Engine/default", EngineConfig::new(SAMPLE_RATE));
}

fn bench_crossfade(c: &mut Criterion) {
    bench_engine(
        c,
        "Engine/crossfade",
        EngineConfig::new(SAMPLE_RATE).with_predelay(PredelayMode::Crossfade),
    );
}

fn bench_eight_combs(c: &mut Criterion) {
    bench_engine(
        c,
        "Engine/8_combs",
        EngineConfig::new(SAMPLE_RATE)
            .with_tuning(Tuning::freeverb(8, SAMPLE_RATE))
            .with_predelay(PredelayMode::Simple),
    );
}

fn bench_interleaved(c: &mut Criterion) {
    let mut group = c.benchmark_group("Engine/interleaved");

    for &block_size in BLOCK_SIZES {
        let mono = generate_test_signal(block_size);
        let input: Vec<f32> = mono.iter().flat_map(|&s| [s, s]).collect();

        group.bench_with_input(
            BenchmarkId::from_parameter(block_size),
            &block_size,
            |b, _| {
                let mut engine = ReverbEngine::new(SAMPLE_RATE);
                let mut output = vec![0.0; block_size * 2];
                b.iter(|| {
                    engine.process_interleaved(black_box(&input), &mut output);
                    black_box(output[0])
                })
            },
        );
    }

    group.finish();
}

// Preset handoff cost as seen by the processing thread: one queued preset per block
fn bench_preset_handoff(c: &mut Criterion) {
    let hall = Preset::new(
        "Hall",
        ReverbParameters {
            room_size: 0.8,
            cutoff: 6000.0,
            ..ReverbParameters::DEFAULT
        },
    );
    let input = generate_test_signal(64);

    c.bench_function("Engine/preset_handoff_64", |b| {
        let mut engine = ReverbEngine::new(SAMPLE_RATE);
        let queue = engine.preset_queue();
        let mut out_l = vec![0.0; 64];
        let mut out_r = vec![0.0; 64];
        b.iter(|| {
            queue.queue(black_box(&hall));
            engine.process(&input, &input, &mut out_l, &mut out_r, 64, 1);
            black_box(out_l[0])
        });
    });
}

criterion_group!(
    benches,
    bench_default,
    bench_crossfade,
    bench_eight_combs,
    bench_interleaved,
    bench_preset_handoff,
);
criterion_main!(benches);
