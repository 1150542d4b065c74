//! Signal-generation primitives used by the kick renderer.
//!
//! Both modules work on whole buffers: the oscillator is a pure function of
//! the time axis and the envelope is built in one pass from its stage
//! lengths. Neither keeps state between calls.

/// Attack/decay/sustain/release envelope builder with selectable decay curve.
pub mod envelope;
/// Canonical oscillator waveforms.
pub mod oscillator;

pub use envelope::{DecayCurve, EnvelopeBuilder, EnvelopeParams, Stage, StageLengths};
pub use oscillator::{OscillatorBlock, Waveform};
