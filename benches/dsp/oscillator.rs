//! Benchmarks for oscillator waveform generation.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use kick_synth::dsp::{OscillatorBlock, Waveform};
use kick_synth::SAMPLE_RATE;

use crate::BUFFER_SIZES;

pub fn bench_oscillator(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/oscillator");

    for &size in BUFFER_SIZES {
        let time: Vec<f64> = (0..size).map(|i| i as f64 / SAMPLE_RATE as f64).collect();
        let mut buffer = vec![0.0f32; size];

        for waveform in Waveform::ALL {
            // Sine uses sin(); the others are phase arithmetic, square adds a sin() + sign
            let osc = OscillatorBlock::new(waveform, 60.0);
            group.bench_with_input(BenchmarkId::new(waveform.name(), size), &size, |b, _| {
                b.iter(|| {
                    osc.render(black_box(&time), black_box(&mut buffer));
                })
            });
        }
    }

    group.finish();
}
