//! Offline kick drum synthesis.
//!
//! The core lives in [`dsp`] (oscillator and ADSR envelope math) and
//! [`synth`] (the kick renderer that combines them). [`io`] and [`engine`]
//! hold the collaborators around it: PCM/WAV export, presets and the
//! continuous playback scheduler.

pub mod dsp;
pub mod engine;
pub mod error;
pub mod io;
pub mod synth; // Kick rendering and its parameter model

pub use error::KickError;
pub use synth::kick::{KickSynth, RenderedSignal};
pub use synth::params::KickParams;

/// Session sample rate in Hz. Every render and export uses it.
pub const SAMPLE_RATE: u32 = 44_100;
