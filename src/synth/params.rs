//! The full parameter surface of a kick, with UI ranges.

use rand::Rng;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use std::{fmt, time::Duration};

use crate::{
    dsp::{DecayCurve, EnvelopeParams, Waveform},
    engine::scheduler::interval_for_bpm,
    synth::kick::{KickSynth, OscillatorParams},
};

/// Everything the front-end can edit.
///
/// `bpm` is only read by the continuous playback scheduler, never by the
/// renderer.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KickParams {
    pub bpm: f32,
    pub oscillator: OscillatorParams,
    pub envelope: EnvelopeParams,
}

impl Default for KickParams {
    fn default() -> Self {
        Self {
            bpm: 120.0,
            oscillator: OscillatorParams::default(),
            envelope: EnvelopeParams::default(),
        }
    }
}

impl KickParams {
    pub fn synth(&self) -> KickSynth {
        KickSynth::from_params(self)
    }

    /// Time between kicks in continuous playback; `None` for unusable tempos.
    pub fn interval(&self) -> Option<Duration> {
        interval_for_bpm(self.bpm)
    }

    /// Draw frequency, volume, the ADSR values and the decay curve uniformly
    /// from their ranges. Waveform and tempo are left alone.
    pub fn randomize<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.oscillator.frequency = Param::Frequency.range().sample(rng) as f32;
        self.oscillator.volume = Param::Volume.range().sample(rng) as f32;
        self.envelope.attack = Param::Attack.range().sample(rng);
        self.envelope.decay = Param::Decay.range().sample(rng);
        self.envelope.sustain = Param::Sustain.range().sample(rng);
        self.envelope.release = Param::Release.range().sample(rng);
        self.envelope.decay_curve = if rng.gen_bool(0.5) {
            DecayCurve::Linear
        } else {
            DecayCurve::Exponential
        };
    }
}

/// Inclusive range a slider covers. Kept in f64 so envelope durations are
/// never narrowed; f32 fields convert on the way in and out.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParamRange {
    pub min: f64,
    pub max: f64,
}

impl ParamRange {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn clamp(&self, value: f64) -> f64 {
        value.clamp(self.min, self.max)
    }

    /// One hundredth of the span; the nudge size in the front-end.
    pub fn step(&self) -> f64 {
        (self.max - self.min) / 100.0
    }

    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        rng.gen_range(self.min..=self.max)
    }
}

/// Identifies one editable parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Param {
    Frequency,
    Volume,
    Waveform,
    Attack,
    Decay,
    Sustain,
    Release,
    DecayCurve,
    Bpm,
}

impl Param {
    pub const ALL: [Param; 9] = [
        Param::Frequency,
        Param::Volume,
        Param::Waveform,
        Param::Attack,
        Param::Decay,
        Param::Sustain,
        Param::Release,
        Param::DecayCurve,
        Param::Bpm,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Param::Frequency => "Frequency (Hz)",
            Param::Volume => "Volume",
            Param::Waveform => "Waveform",
            Param::Attack => "Attack (s)",
            Param::Decay => "Decay (s)",
            Param::Sustain => "Sustain (0-1)",
            Param::Release => "Release (s)",
            Param::DecayCurve => "Decay curve",
            Param::Bpm => "BPM",
        }
    }

    /// Short name used on the command line and in text updates.
    pub fn key(self) -> &'static str {
        match self {
            Param::Frequency => "frequency",
            Param::Volume => "volume",
            Param::Waveform => "waveform",
            Param::Attack => "attack",
            Param::Decay => "decay",
            Param::Sustain => "sustain",
            Param::Release => "release",
            Param::DecayCurve => "decay_curve",
            Param::Bpm => "bpm",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        let key = key.trim().to_ascii_lowercase().replace('-', "_");
        Self::ALL.into_iter().find(|p| p.key() == key)
    }

    /// Slider range. Waveform and decay curve are choices, not numbers;
    /// their range is the index span of their variants.
    pub fn range(self) -> ParamRange {
        match self {
            Param::Frequency => ParamRange::new(20.0, 200.0),
            Param::Volume => ParamRange::new(0.0, 1.0),
            Param::Attack | Param::Decay | Param::Sustain | Param::Release => {
                ParamRange::new(0.0, 1.0)
            }
            Param::Bpm => ParamRange::new(1.0, 400.0),
            Param::Waveform => ParamRange::new(0.0, (Waveform::ALL.len() - 1) as f64),
            Param::DecayCurve => ParamRange::new(0.0, (DecayCurve::ALL.len() - 1) as f64),
        }
    }

    pub fn is_choice(self) -> bool {
        matches!(self, Param::Waveform | Param::DecayCurve)
    }

    /// Current numeric value, `None` for choices.
    pub fn value(self, params: &KickParams) -> Option<f64> {
        match self {
            Param::Frequency => Some(params.oscillator.frequency as f64),
            Param::Volume => Some(params.oscillator.volume as f64),
            Param::Attack => Some(params.envelope.attack),
            Param::Decay => Some(params.envelope.decay),
            Param::Sustain => Some(params.envelope.sustain),
            Param::Release => Some(params.envelope.release),
            Param::Bpm => Some(params.bpm as f64),
            Param::Waveform | Param::DecayCurve => None,
        }
    }

    /// Store a numeric value as given. Choices ignore it.
    pub fn set(self, params: &mut KickParams, value: f64) {
        match self {
            Param::Frequency => params.oscillator.frequency = value as f32,
            Param::Volume => params.oscillator.volume = value as f32,
            Param::Attack => params.envelope.attack = value,
            Param::Decay => params.envelope.decay = value,
            Param::Sustain => params.envelope.sustain = value,
            Param::Release => params.envelope.release = value,
            Param::Bpm => params.bpm = value as f32,
            Param::Waveform | Param::DecayCurve => {}
        }
    }

    /// Current value formatted for display.
    pub fn display(self, params: &KickParams) -> String {
        match self {
            Param::Waveform => params.oscillator.waveform.to_string(),
            Param::DecayCurve => params.envelope.decay_curve.to_string(),
            Param::Frequency | Param::Bpm => format!("{:.1}", self.value(params).unwrap_or(0.0)),
            _ => format!("{:.3}", self.value(params).unwrap_or(0.0)),
        }
    }

    /// Move the value one step up (`direction > 0`) or down, staying in range.
    /// Choices cycle through their variants instead.
    pub fn nudge(self, params: &mut KickParams, direction: i32) {
        match self {
            Param::Waveform => {
                params.oscillator.waveform = cycle(&Waveform::ALL, params.oscillator.waveform, direction);
            }
            Param::DecayCurve => {
                params.envelope.decay_curve = params.envelope.decay_curve.toggle();
            }
            _ => {
                let range = self.range();
                let delta = range.step() * direction.signum() as f64;
                if let Some(value) = self.value(params) {
                    self.set(params, range.clamp(value + delta));
                }
            }
        }
    }
}

impl fmt::Display for Param {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

fn cycle<T: Copy + PartialEq>(all: &[T], current: T, direction: i32) -> T {
    let len = all.len() as i32;
    let index = all.iter().position(|v| *v == current).unwrap_or(0) as i32;
    all[(index + direction.signum()).rem_euclid(len) as usize]
}
