//! Kick drum renderer.
//!
//! A kick here is one oscillator shaped by one ADSR envelope and rendered in
//! full, not streamed:
//!
//! 1. The buffer lasts `attack + decay + release + 1` seconds. The extra
//!    second keeps room for sustain and release even when attack and decay
//!    are near zero.
//! 2. The time axis is `i / sample_rate` for every sample of that buffer.
//! 3. The oscillator is evaluated on the time axis.
//! 4. The envelope is built for the same number of samples.
//! 5. `amplitude = wave * envelope * volume`.
//!
//! Rendering is a pure function of the parameters. Nothing is validated:
//! out-of-range and non-finite inputs flow through the arithmetic unchanged.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    dsp::{EnvelopeBuilder, EnvelopeParams, OscillatorBlock, Waveform},
    synth::params::KickParams,
    SAMPLE_RATE,
};

/// Seconds appended to the envelope stages to get the render length.
pub const TAIL_PADDING: f64 = 1.0;

/// Oscillator settings of a kick.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OscillatorParams {
    pub waveform: Waveform,
    /// Hz
    pub frequency: f32,
    /// Linear gain, nominally 0.0 - 1.0. Not clamped.
    pub volume: f32,
}

impl Default for OscillatorParams {
    fn default() -> Self {
        Self {
            waveform: Waveform::Sine,
            frequency: 60.0,
            volume: 0.8,
        }
    }
}

/// The output of one render. All three vectors have the same length.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedSignal {
    /// Seconds, `i / sample_rate`.
    pub time: Vec<f64>,
    /// The audio: oscillator times envelope times volume.
    pub amplitude: Vec<f32>,
    /// The gain curve alone, for display.
    pub envelope: Vec<f32>,
    pub sample_rate: u32,
}

impl RenderedSignal {
    pub fn len(&self) -> usize {
        self.amplitude.len()
    }

    pub fn is_empty(&self) -> bool {
        self.amplitude.is_empty()
    }

    /// Length in seconds.
    pub fn duration(&self) -> f64 {
        self.len() as f64 / self.sample_rate as f64
    }

    /// Largest absolute amplitude; 0 for an empty render.
    pub fn peak(&self) -> f32 {
        self.amplitude.iter().fold(0.0f32, |acc, &x| acc.max(x.abs()))
    }
}

/// Renders kicks from an oscillator and an envelope.
///
/// The fields are plain state for the caller to change between renders;
/// [`KickSynth::generate`] reads them and nothing else.
#[derive(Debug, Clone)]
pub struct KickSynth {
    pub oscillator: OscillatorParams,
    pub envelope: EnvelopeParams,
    sample_rate: u32,
}

impl KickSynth {
    pub fn new(oscillator: OscillatorParams, envelope: EnvelopeParams) -> Self {
        Self {
            oscillator,
            envelope,
            sample_rate: SAMPLE_RATE,
        }
    }

    pub fn from_params(params: &KickParams) -> Self {
        Self::new(params.oscillator, params.envelope)
    }

    /// Render at a different sample rate. The session default is [`SAMPLE_RATE`].
    pub fn with_sample_rate(mut self, sample_rate: u32) -> Self {
        self.sample_rate = sample_rate;
        self
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// `attack + decay + release + 1` seconds.
    pub fn total_duration(&self) -> f64 {
        let env = &self.envelope;
        env.attack + env.decay + env.release + TAIL_PADDING
    }

    /// `floor(sample_rate * total_duration)`; 0 when that is negative or not finite.
    pub fn total_samples(&self) -> usize {
        let samples = (self.sample_rate as f64 * self.total_duration()).floor();
        if samples.is_finite() && samples > 0.0 {
            samples as usize
        } else {
            0
        }
    }

    /// Render the kick for the current parameters.
    pub fn generate(&self) -> RenderedSignal {
        let total = self.total_samples();
        let sr = self.sample_rate as f64;

        let time: Vec<f64> = (0..total).map(|i| i as f64 / sr).collect();

        let osc = OscillatorBlock::new(self.oscillator.waveform, self.oscillator.frequency);
        let mut amplitude = osc.render_vec(&time);

        let envelope = EnvelopeBuilder::new(self.envelope, self.sample_rate).build(total);

        let volume = self.oscillator.volume;
        for (sample, &level) in amplitude.iter_mut().zip(&envelope) {
            *sample *= level * volume;
        }

        debug!(
            samples = total,
            waveform = %self.oscillator.waveform,
            frequency = self.oscillator.frequency,
            decay_curve = %self.envelope.decay_curve,
            "rendered kick"
        );

        RenderedSignal {
            time,
            amplitude,
            envelope,
            sample_rate: self.sample_rate,
        }
    }
}

impl Default for KickSynth {
    fn default() -> Self {
        Self::new(OscillatorParams::default(), EnvelopeParams::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dsp::DecayCurve;

    fn kick(waveform: Waveform, envelope: EnvelopeParams) -> KickSynth {
        KickSynth::new(
            OscillatorParams {
                waveform,
                frequency: 60.0,
                volume: 0.8,
            },
            envelope,
        )
    }

    #[test]
    fn default_kick_renders_expected_length() {
        let synth = kick(
            Waveform::Sine,
            EnvelopeParams::new(0.01, 0.1, 0.3, 0.2, DecayCurve::Exponential),
        );
        assert!((synth.total_duration() - 1.31).abs() < 1e-6);
        assert_eq!(synth.total_samples(), 57_771);

        let out = synth.generate();
        assert_eq!(out.time.len(), 57_771);
        assert_eq!(out.amplitude.len(), 57_771);
        assert_eq!(out.envelope.len(), 57_771);
        assert_eq!(out.amplitude[0], 0.0);
        assert!(out.amplitude.iter().all(|s| s.is_finite()));
        assert!(out.envelope.iter().all(|s| s.is_finite()));
        assert!(out.time.iter().all(|t| t.is_finite()));
    }

    #[test]
    fn total_samples_floor_the_summed_durations() {
        // floor(44100 * (a + d + r + 1)) with the sum taken in f64
        for (attack, decay, release, expected) in [
            (0.01, 0.0, 0.0, 44_541),
            (0.7, 0.0, 0.0, 74_970),
            (0.01, 0.1, 0.02, 49_832),
            (0.0, 0.0, 0.0, 44_100),
        ] {
            let synth = kick(
                Waveform::Sine,
                EnvelopeParams::new(attack, decay, 0.3, release, DecayCurve::Linear),
            );
            assert_eq!(synth.total_samples(), expected, "a={attack} d={decay} r={release}");
            assert_eq!(synth.generate().len(), expected);
        }
    }

    #[test]
    fn time_axis_is_half_open() {
        let out = kick(Waveform::Sine, EnvelopeParams::flat()).generate();
        assert_eq!(out.len(), 44_100);
        assert_eq!(out.time[0], 0.0);
        assert!((out.time[1] - 1.0 / 44_100.0).abs() < 1e-12);
        assert!(*out.time.last().unwrap() < 1.0);
        assert!((out.duration() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn amplitude_is_wave_times_envelope_times_volume() {
        let synth = kick(
            Waveform::Sawtooth,
            EnvelopeParams::new(0.05, 0.05, 0.5, 0.1, DecayCurve::Linear),
        );
        let out = synth.generate();
        let wave = OscillatorBlock::new(Waveform::Sawtooth, 60.0).render_vec(&out.time);

        for i in [0, 100, 3_000, 20_000, out.len() - 1] {
            let expected = wave[i] * (out.envelope[i] * 0.8);
            assert_eq!(out.amplitude[i], expected, "sample {i}");
        }
        assert!(out.peak() <= 0.8);
    }

    #[test]
    fn flat_envelope_leaves_only_volume() {
        let out = kick(Waveform::Square, EnvelopeParams::flat()).generate();
        assert!(out.envelope.iter().all(|&l| l == 1.0));
        assert!(out
            .amplitude
            .iter()
            .all(|&s| s == 0.0 || (s.abs() - 0.8).abs() < 1e-6));
    }

    #[test]
    fn generate_is_idempotent() {
        let synth = kick(Waveform::Triangle, EnvelopeParams::default());
        let a = synth.generate();
        let b = synth.generate();
        assert_eq!(a, b);
    }

    #[test]
    fn pathological_durations_render_empty() {
        let synth = kick(
            Waveform::Sine,
            EnvelopeParams::new(-1.0, -0.5, 0.3, 0.0, DecayCurve::Linear),
        );
        assert_eq!(synth.total_samples(), 0);
        let out = synth.generate();
        assert!(out.is_empty());
        assert!(out.time.is_empty() && out.envelope.is_empty());
        assert_eq!(out.peak(), 0.0);

        let synth = kick(
            Waveform::Sine,
            EnvelopeParams::new(f64::NAN, 0.1, 0.3, 0.2, DecayCurve::Linear),
        );
        assert!(synth.generate().is_empty());
    }

    #[test]
    fn nan_volume_propagates() {
        let mut synth = kick(Waveform::Sine, EnvelopeParams::default());
        synth.oscillator.volume = f32::NAN;
        let out = synth.generate();
        assert!(!out.is_empty());
        assert!(out.amplitude.iter().all(|s| s.is_nan()));
        assert!(out.envelope.iter().all(|l| l.is_finite()));
    }

    #[test]
    fn custom_sample_rate() {
        let synth = KickSynth::default().with_sample_rate(8_000);
        assert_eq!(synth.sample_rate(), 8_000);
        assert_eq!(synth.generate().len(), synth.total_samples());
        assert_eq!(synth.total_samples(), 10_480);
    }
}
