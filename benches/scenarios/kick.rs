//! Benchmarks for complete kick renders.
//!
//! Each case is what one edit in the TUI costs: a full render, and for
//! export the PCM conversion on top.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use kick_synth::dsp::{DecayCurve, EnvelopeParams, Waveform};
use kick_synth::io::to_pcm_i16;
use kick_synth::synth::{KickSynth, OscillatorParams};

pub fn bench_kick(c: &mut Criterion) {
    let mut group = c.benchmark_group("scenarios/kick");

    let oscillator = OscillatorParams {
        waveform: Waveform::Sine,
        frequency: 60.0,
        volume: 0.8,
    };

    // === DEFAULT KICK ===
    // 1.31s: short attack, exponential decay into a low sustain
    let default_kick = KickSynth::new(oscillator, EnvelopeParams::default());

    // === LONG BOOM ===
    // 808-style: slow decay and release, ~3s render
    let long_kick = KickSynth::new(
        oscillator,
        EnvelopeParams::new(0.005, 1.0, 0.6, 1.0, DecayCurve::Exponential),
    );

    for (name, synth) in [("default", &default_kick), ("long", &long_kick)] {
        let samples = synth.total_samples();
        group.bench_with_input(BenchmarkId::new("generate", name), &samples, |b, _| {
            b.iter(|| black_box(synth.generate()))
        });

        let signal = synth.generate();
        group.bench_with_input(BenchmarkId::new("to_pcm_i16", name), &samples, |b, _| {
            b.iter(|| black_box(to_pcm_i16(black_box(&signal.amplitude))))
        });
    }

    group.finish();
}
