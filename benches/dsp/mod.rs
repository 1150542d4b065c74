//! Benchmarks for the oscillator and envelope builder.

mod envelope;
mod oscillator;

pub use envelope::bench_envelope;
pub use oscillator::bench_oscillator;
