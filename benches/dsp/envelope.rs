//! Benchmarks for the ADSR envelope builder.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use kick_synth::dsp::{DecayCurve, EnvelopeBuilder, EnvelopeParams};
use kick_synth::SAMPLE_RATE;

use crate::BUFFER_SIZES;

pub fn bench_envelope(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/envelope");

    for &size in BUFFER_SIZES {
        // Linear decay - ramps only
        let env = EnvelopeBuilder::new(
            EnvelopeParams::new(0.01, 0.1, 0.3, 0.2, DecayCurve::Linear),
            SAMPLE_RATE,
        );
        group.bench_with_input(BenchmarkId::new("linear", size), &size, |b, &size| {
            b.iter(|| black_box(env.build(black_box(size))))
        });

        // Exponential decay - one exp() per decay sample
        let env = EnvelopeBuilder::new(
            EnvelopeParams::new(0.01, 0.1, 0.3, 0.2, DecayCurve::Exponential),
            SAMPLE_RATE,
        );
        group.bench_with_input(BenchmarkId::new("exponential", size), &size, |b, &size| {
            b.iter(|| black_box(env.build(black_box(size))))
        });

        // Mostly sustain - the cheapest stage
        let env = EnvelopeBuilder::new(EnvelopeParams::flat(), SAMPLE_RATE);
        group.bench_with_input(BenchmarkId::new("sustain", size), &size, |b, &size| {
            b.iter(|| black_box(env.build(black_box(size))))
        });
    }

    group.finish();
}
