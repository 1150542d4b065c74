#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use std::{f64::consts::TAU, fmt, str::FromStr};

/*
Kick Oscillator
===============

The oscillator is evaluated directly from the time axis instead of carrying
a running phase. For sample i at time t = i / sample_rate the phase, in
cycles, is simply `freq * t`, so every sample is independent of the previous
one and a render is reproducible bit for bit.

Waveforms (phase p = freq * t):

  Sine       sin(2π p)
  Square     sign(sin(2π p))            sign(0) = 0
  Triangle   2 |2 (p - floor(p + ½))| - 1
  Sawtooth   2 (p - floor(p + ½))

  Sine      ╭─╮   ╭─╮      Square   ┌──┐  ┌──┐
           ╯   ╰─╯   ╰              ┘  └──┘  └

  Triangle  ╲  ╱╲  ╱       Sawtooth   ╱│ ╱│ ╱
             ╲╱  ╲╱                  ╱ │╱ │╱

Triangle and sawtooth are centred on the nearest integer cycle, which puts
the sawtooth zero crossing at p = 0 and the triangle trough there as well
(a kick rendered with a triangle starts at -1 before the envelope is
applied).

The time axis and the phase math are f64; only the output sample is narrowed
to f32.
*/

/// Oscillator waveform shape.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Waveform {
    #[default]
    Sine,
    Square,
    Triangle,
    Sawtooth,
}

impl Waveform {
    pub const ALL: [Waveform; 4] = [
        Waveform::Sine,
        Waveform::Square,
        Waveform::Triangle,
        Waveform::Sawtooth,
    ];

    /// Evaluate the waveform at `cycles` (frequency times time).
    #[inline]
    pub fn sample_at(self, cycles: f64) -> f64 {
        match self {
            Waveform::Sine => (TAU * cycles).sin(),
            Waveform::Square => sign((TAU * cycles).sin()),
            Waveform::Triangle => 2.0 * (2.0 * centred_fraction(cycles)).abs() - 1.0,
            Waveform::Sawtooth => 2.0 * centred_fraction(cycles),
        }
    }

    /// One unit period sampled at `points` evenly spaced positions in `[0, 1)`.
    ///
    /// Used for the waveform thumbnail in the front-end.
    pub fn preview(self, points: usize) -> Vec<f32> {
        (0..points)
            .map(|i| self.sample_at(i as f64 / points as f64) as f32)
            .collect()
    }

    /// The next waveform in [`Waveform::ALL`], wrapping around.
    pub fn next(self) -> Self {
        let index = Self::ALL.iter().position(|w| *w == self).unwrap_or(0);
        Self::ALL[(index + 1) % Self::ALL.len()]
    }

    pub fn name(self) -> &'static str {
        match self {
            Waveform::Sine => "sine",
            Waveform::Square => "square",
            Waveform::Triangle => "triangle",
            Waveform::Sawtooth => "sawtooth",
        }
    }
}

impl fmt::Display for Waveform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown waveform `{0}` (expected sine, square, triangle or sawtooth)")]
pub struct UnknownWaveform(pub String);

impl FromStr for Waveform {
    type Err = UnknownWaveform;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sine" | "sin" => Ok(Waveform::Sine),
            "square" | "sqr" => Ok(Waveform::Square),
            "triangle" | "tri" => Ok(Waveform::Triangle),
            "sawtooth" | "saw" => Ok(Waveform::Sawtooth),
            _ => Err(UnknownWaveform(s.to_string())),
        }
    }
}

/// `x - round_half_up(x)`, in `[-0.5, 0.5)`.
#[inline]
fn centred_fraction(x: f64) -> f64 {
    x - (x + 0.5).floor()
}

/// Sign with `sign(±0) = 0`; NaN passes through. `f64::signum` maps zero to ±1.
#[inline]
fn sign(x: f64) -> f64 {
    if x > 0.0 {
        1.0
    } else if x < 0.0 {
        -1.0
    } else {
        x
    }
}

/// A fixed-frequency oscillator evaluated over a time axis.
#[derive(Debug, Clone, Copy)]
pub struct OscillatorBlock {
    pub waveform: Waveform,
    /// Hz. Not validated; negative or non-finite values render as-is.
    pub frequency: f32,
}

impl OscillatorBlock {
    pub fn new(waveform: Waveform, frequency: f32) -> Self {
        Self {
            waveform,
            frequency,
        }
    }

    /// Write one sample per entry of `time` (seconds) into `out`.
    ///
    /// Only `min(time.len(), out.len())` samples are written.
    pub fn render(&self, time: &[f64], out: &mut [f32]) {
        let freq = self.frequency as f64;
        for (sample, &t) in out.iter_mut().zip(time) {
            *sample = self.waveform.sample_at(freq * t) as f32;
        }
    }

    /// Allocate and render a buffer the length of `time`.
    pub fn render_vec(&self, time: &[f64]) -> Vec<f32> {
        let mut out = vec![0.0; time.len()];
        self.render(time, &mut out);
        out
    }
}
