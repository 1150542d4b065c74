#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/*
ADSR Envelope Builder
=====================

This module builds the amplitude envelope of a kick in one pass: given the
stage durations and the number of samples the render will have, it returns
the whole gain curve as a buffer.

Vocabulary
----------

  level       The envelope value at one sample (0.0 to 1.0). It multiplies
              the oscillator output.

  stage       One of Attack, Decay, Sustain or Release. Each stage is a
              contiguous run of samples.

  stage length
              Number of samples in a stage: round(seconds * sample_rate),
              rounded per stage. Sustain has no duration of its own; it
              fills whatever the other three leave of the render.


The Shape
---------

  Level
    1.0 ┐    ╱╲
        │   ╱  ╲___________
    S   │  ╱               ╲
        │ ╱                 ╲
    0.0 └╱───────────────────╲──→ Samples
        Attack Decay Sustain Release
         (A)    (D)    (S)     (R)

  Attack    0 → 1, linear. The last attack sample is one step short of 1;
            the first decay sample supplies the peak.
  Decay     1 → S, linear or exponential (see below). The last decay sample
            is one step short of S.
  Sustain   S held for the remaining samples.
  Release   S → 0, linear, hitting both S and 0 exactly.

The asymmetry at the ends of the ramps matters: attack and decay never emit
their end value, release emits both of its ends.


Decay Curves
------------

  Linear       level[k] = 1 + (S - 1) * k / n

  Exponential  level[k] = e^(-5 k / n) * (1 - S) + S

The exponential curve samples e^x over x in [0, -5) across the stage and
rescales it onto [S, 1]. It drops fast and flattens out near S, which is the
"punch then tail" of a drum, where the linear ramp keeps a constant slope.

  Level
    1.0 ┐╲╲
        │ ╲ ╲        linear
        │  ╲  ╲
        │   ╲_  ╲    exponential
    S   │     ‾‾──────
        └────────────→ k


Length Bookkeeping
------------------

  attack_n  = round(attack  * sr)
  decay_n   = round(decay   * sr)
  release_n = round(release * sr)
  sustain_n = max(0, total - attack_n - decay_n - release_n)

The four stages are concatenated and cut to exactly `total` samples. When
attack + decay + release already exceed the render, sustain is empty and the
tail of release is cut off. The concatenation is never shorter than `total`
(sustain absorbs the difference); should that ever change, the buffer is
padded with its last value rather than indexed out of range.

Negative and NaN durations convert to zero-length stages: a float-to-usize
cast saturates, so garbage parameters give a garbage shape but never a panic.
*/

/// Shape of the decay stage.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DecayCurve {
    Linear,
    #[default]
    Exponential,
}

impl DecayCurve {
    pub const ALL: [DecayCurve; 2] = [DecayCurve::Linear, DecayCurve::Exponential];

    /// The other curve.
    pub fn toggle(self) -> Self {
        match self {
            DecayCurve::Linear => DecayCurve::Exponential,
            DecayCurve::Exponential => DecayCurve::Linear,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            DecayCurve::Linear => "linear",
            DecayCurve::Exponential => "exponential",
        }
    }
}

impl fmt::Display for DecayCurve {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown decay curve `{0}` (expected linear or exponential)")]
pub struct UnknownDecayCurve(pub String);

impl FromStr for DecayCurve {
    type Err = UnknownDecayCurve;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "linear" | "lin" => Ok(DecayCurve::Linear),
            "exponential" | "exp" => Ok(DecayCurve::Exponential),
            _ => Err(UnknownDecayCurve(s.to_string())),
        }
    }
}

/// ADSR parameters. Durations are in seconds, `sustain` is a level.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnvelopeParams {
    pub attack: f64,
    pub decay: f64,
    /// Level held between decay and release (0.0 - 1.0).
    pub sustain: f64,
    pub release: f64,
    pub decay_curve: DecayCurve,
}

impl EnvelopeParams {
    pub fn new(attack: f64, decay: f64, sustain: f64, release: f64, decay_curve: DecayCurve) -> Self {
        Self {
            attack,
            decay,
            sustain,
            release,
            decay_curve,
        }
    }

    /// No shaping at all: the envelope is a flat 1.0.
    pub fn flat() -> Self {
        Self::new(0.0, 0.0, 1.0, 0.0, DecayCurve::Linear)
    }
}

impl Default for EnvelopeParams {
    fn default() -> Self {
        Self {
            attack: 0.01,
            decay: 0.1,
            sustain: 0.3,
            release: 0.2,
            decay_curve: DecayCurve::Exponential,
        }
    }
}

/// A stage of the envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Attack,
    Decay,
    Sustain,
    Release,
}

/// Sample counts of the four stages for one render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StageLengths {
    pub attack: usize,
    pub decay: usize,
    pub sustain: usize,
    pub release: usize,
}

impl StageLengths {
    pub fn new(params: &EnvelopeParams, sample_rate: u32, total_samples: usize) -> Self {
        let attack = seconds_to_samples(params.attack, sample_rate);
        let decay = seconds_to_samples(params.decay, sample_rate);
        let release = seconds_to_samples(params.release, sample_rate);
        let sustain = total_samples
            .saturating_sub(attack)
            .saturating_sub(decay)
            .saturating_sub(release);

        Self {
            attack,
            decay,
            sustain,
            release,
        }
    }

    /// Sum of all four stages. May exceed the render length.
    pub fn total(&self) -> usize {
        self.attack
            .saturating_add(self.decay)
            .saturating_add(self.sustain)
            .saturating_add(self.release)
    }

    /// Which stage sample `index` falls in, or `None` past the release.
    pub fn stage_at(&self, index: usize) -> Option<Stage> {
        let mut end = self.attack;
        if index < end {
            return Some(Stage::Attack);
        }
        end = end.saturating_add(self.decay);
        if index < end {
            return Some(Stage::Decay);
        }
        end = end.saturating_add(self.sustain);
        if index < end {
            return Some(Stage::Sustain);
        }
        end = end.saturating_add(self.release);
        if index < end {
            return Some(Stage::Release);
        }
        None
    }
}

/// Per-stage rounding; negative and NaN saturate to 0.
fn seconds_to_samples(seconds: f64, sample_rate: u32) -> usize {
    (seconds * sample_rate as f64).round() as usize
}

/// Builds envelope buffers for a fixed parameter set.
#[derive(Debug, Clone, Copy)]
pub struct EnvelopeBuilder {
    params: EnvelopeParams,
    sample_rate: u32,
}

impl EnvelopeBuilder {
    pub fn new(params: EnvelopeParams, sample_rate: u32) -> Self {
        Self {
            params,
            sample_rate,
        }
    }

    pub fn stage_lengths(&self, total_samples: usize) -> StageLengths {
        StageLengths::new(&self.params, self.sample_rate, total_samples)
    }

    /// Build the envelope, exactly `total_samples` long.
    pub fn build(&self, total_samples: usize) -> Vec<f32> {
        let lengths = self.stage_lengths(total_samples);
        let sustain = self.params.sustain;

        let decay: Box<dyn Iterator<Item = f32>> = match self.params.decay_curve {
            DecayCurve::Linear => Box::new(ramp_exclusive(1.0, sustain, lengths.decay)),
            DecayCurve::Exponential => Box::new(exp_decay(sustain, lengths.decay)),
        };

        // Stages longer than the render are only evaluated up to the cut.
        let mut env: Vec<f32> = ramp_exclusive(0.0, 1.0, lengths.attack)
            .chain(decay)
            .chain(std::iter::repeat(sustain as f32).take(lengths.sustain))
            .chain(ramp_inclusive(sustain, 0.0, lengths.release))
            .take(total_samples)
            .collect();

        if env.len() < total_samples {
            let last = env.last().copied().unwrap_or(0.0);
            env.resize(total_samples, last);
        }
        env
    }
}

/// `n` samples from `start` towards `end`, stopping one step short of `end`.
fn ramp_exclusive(start: f64, end: f64, n: usize) -> impl Iterator<Item = f32> {
    let step = (end - start) / n as f64;
    (0..n).map(move |k| (start + step * k as f64) as f32)
}

/// `n` samples from `start` to `end`, both included. One sample is just `start`.
fn ramp_inclusive(start: f64, end: f64, n: usize) -> impl Iterator<Item = f32> {
    let step = (end - start) / n.saturating_sub(1).max(1) as f64;
    (0..n).map(move |k| {
        if n > 1 && k == n - 1 {
            end as f32
        } else {
            (start + step * k as f64) as f32
        }
    })
}

/// e^(-5 k / n) rescaled from [0, 1] onto [sustain, 1].
fn exp_decay(sustain: f64, n: usize) -> impl Iterator<Item = f32> {
    (0..n).map(move |k| {
        let shape = (-5.0 * k as f64 / n as f64).exp();
        (shape * (1.0 - sustain) + sustain) as f32
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_RATE: u32 = 1_000;

    fn build(params: EnvelopeParams, total: usize) -> Vec<f32> {
        EnvelopeBuilder::new(params, SAMPLE_RATE).build(total)
    }

    #[test]
    fn length_matches_and_levels_stay_in_range() {
        for curve in DecayCurve::ALL {
            for total in [0, 1, 17, 250, 1_000, 3_000] {
                let env = build(EnvelopeParams::new(0.05, 0.1, 0.4, 0.2, curve), total);
                assert_eq!(env.len(), total);
                assert!(
                    env.iter().all(|l| (0.0..=1.0).contains(l)),
                    "{curve} envelope left [0, 1] at total={total}"
                );
            }
        }
    }

    #[test]
    fn stage_lengths_round_per_stage() {
        let params = EnvelopeParams::new(0.0104, 0.0106, 0.5, 0.0026, DecayCurve::Linear);
        let lengths = StageLengths::new(&params, SAMPLE_RATE, 100);
        assert_eq!(lengths.attack, 10);
        assert_eq!(lengths.decay, 11);
        assert_eq!(lengths.release, 3);
        assert_eq!(lengths.sustain, 76);
        assert_eq!(lengths.total(), 100);
    }

    #[test]
    fn sustain_clamps_to_zero_when_stages_overflow() {
        let params = EnvelopeParams::new(0.05, 0.05, 0.5, 0.05, DecayCurve::Linear);
        let lengths = StageLengths::new(&params, SAMPLE_RATE, 120);
        assert_eq!(lengths.sustain, 0);

        let env = build(params, 120);
        assert_eq!(env.len(), 120);
        // Release is cut 20 samples in; it never reached 0.
        assert!(env[119] > 0.0);
    }

    #[test]
    fn attack_never_reaches_peak() {
        let params = EnvelopeParams::new(0.02, 0.05, 0.5, 0.1, DecayCurve::Linear);
        let env = build(params, 1_000);
        let attack_n = 20;

        assert_eq!(env[0], 0.0);
        assert!(env[attack_n - 1] < 1.0);
        assert!((env[attack_n - 1] - 0.95).abs() < 1e-6);
        // Decay starts at the peak.
        assert_eq!(env[attack_n], 1.0);
    }

    #[test]
    fn stages_join_within_one_step() {
        let params = EnvelopeParams::new(0.02, 0.05, 0.5, 0.1, DecayCurve::Linear);
        let env = build(params, 1_000);
        let lengths = StageLengths::new(&params, SAMPLE_RATE, 1_000);

        // decay → sustain
        let decay_end = lengths.attack + lengths.decay;
        let decay_step = (1.0 - 0.5) / lengths.decay as f32;
        assert!((env[decay_end - 1] - env[decay_end]).abs() <= decay_step + 1e-6);
        assert_eq!(env[decay_end], 0.5);

        // sustain → release: release starts exactly at sustain
        let release_start = decay_end + lengths.sustain;
        assert_eq!(env[release_start - 1], 0.5);
        assert_eq!(env[release_start], 0.5);

        // release ends exactly at 0
        assert_eq!(env[999], 0.0);
    }

    #[test]
    fn linear_and_exponential_decay_differ_in_shape() {
        let linear = build(EnvelopeParams::new(0.0, 0.1, 0.3, 0.0, DecayCurve::Linear), 500);
        let exp = build(
            EnvelopeParams::new(0.0, 0.1, 0.3, 0.0, DecayCurve::Exponential),
            500,
        );

        // Same start.
        assert_eq!(linear[0], 1.0);
        assert!((exp[0] - 1.0).abs() < 1e-6);

        // Both approach the sustain level at the end of decay.
        assert!((linear[99] - 0.3).abs() < 0.01);
        assert!((exp[99] - 0.3).abs() < 0.01);

        // Exponential falls faster early on: at a quarter of the stage it is
        // already below the straight line.
        let expected_exp = (-5.0f64 * 25.0 / 100.0).exp() * 0.7 + 0.3;
        assert!((exp[25] as f64 - expected_exp).abs() < 1e-6);
        assert!((linear[25] - (1.0 - 0.7 * 0.25)).abs() < 1e-6);
        assert!(exp[25] < linear[25] - 0.1);

        // Both hold sustain afterwards.
        assert_eq!(linear[100], 0.3);
        assert_eq!(exp[100], 0.3);
    }

    #[test]
    fn flat_envelope_is_constant_one() {
        let env = build(EnvelopeParams::flat(), 1_000);
        assert!(env.iter().all(|&l| l == 1.0));
    }

    #[test]
    fn release_includes_both_ends() {
        let out: Vec<f32> = ramp_inclusive(0.6, 0.0, 4).collect();
        assert_eq!(out.len(), 4);
        assert_eq!(out[0], 0.6);
        assert!((out[1] - 0.4).abs() < 1e-6);
        assert_eq!(out[3], 0.0);

        let single: Vec<f32> = ramp_inclusive(0.6, 0.0, 1).collect();
        assert_eq!(single, vec![0.6]);
    }

    #[test]
    fn zero_length_stages_add_nothing() {
        let params = EnvelopeParams::new(0.0, 0.0, 0.5, 0.0, DecayCurve::Exponential);
        let env = build(params, 10);
        assert_eq!(env, vec![0.5; 10]);
    }

    #[test]
    fn garbage_durations_do_not_panic() {
        let params = EnvelopeParams::new(-1.0, f64::NAN, 0.5, f64::NEG_INFINITY, DecayCurve::Linear);
        let lengths = StageLengths::new(&params, SAMPLE_RATE, 8);
        assert_eq!((lengths.attack, lengths.decay, lengths.release), (0, 0, 0));
        assert_eq!(build(params, 8), vec![0.5; 8]);

        // An endless attack is only evaluated as far as the render reaches.
        let params = EnvelopeParams::new(f64::INFINITY, 0.1, 0.5, 0.1, DecayCurve::Linear);
        let env = build(params, 8);
        assert_eq!(env.len(), 8);
        assert_eq!(env[0], 0.0);
        assert!(env.iter().all(|&l| l < 1e-6));
    }

    #[test]
    fn stage_lookup() {
        let lengths = StageLengths {
            attack: 2,
            decay: 3,
            sustain: 1,
            release: 2,
        };
        assert_eq!(lengths.stage_at(0), Some(Stage::Attack));
        assert_eq!(lengths.stage_at(2), Some(Stage::Decay));
        assert_eq!(lengths.stage_at(5), Some(Stage::Sustain));
        assert_eq!(lengths.stage_at(7), Some(Stage::Release));
        assert_eq!(lengths.stage_at(8), None);
    }
}
