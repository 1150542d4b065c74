use std::str::FromStr;

use tracing::warn;

use crate::{
    dsp::{DecayCurve, Waveform},
    synth::params::{KickParams, Param},
};

/// A single parameter update.
///
/// Callers apply these to their [`KickParams`] and render again; the synth
/// never watches for changes on its own.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum ParamChange {
    Frequency(f32),
    Volume(f32),
    Waveform(Waveform),
    Attack(f64),
    Decay(f64),
    Sustain(f64),
    Release(f64),
    DecayCurve(DecayCurve),
    Bpm(f32),
}

impl ParamChange {
    /// Parse a typed entry for `param`.
    ///
    /// Returns `None` when the text is not a finite number (or not a known
    /// variant for choices). Such updates are meant to be dropped.
    pub fn parse(param: Param, text: &str) -> Option<Self> {
        let change = match param {
            Param::Frequency => number(text).map(ParamChange::Frequency),
            Param::Volume => number(text).map(ParamChange::Volume),
            Param::Waveform => text.parse().ok().map(ParamChange::Waveform),
            Param::Attack => number(text).map(ParamChange::Attack),
            Param::Decay => number(text).map(ParamChange::Decay),
            Param::Sustain => number(text).map(ParamChange::Sustain),
            Param::Release => number(text).map(ParamChange::Release),
            Param::DecayCurve => text.parse().ok().map(ParamChange::DecayCurve),
            Param::Bpm => number(text).map(ParamChange::Bpm),
        };

        if change.is_none() {
            warn!(param = param.key(), text, "ignoring malformed parameter update");
        }
        change
    }

    /// Parse a `name=value` pair, e.g. `attack=0.02`.
    pub fn parse_assignment(assignment: &str) -> Option<Self> {
        let (name, value) = assignment.split_once('=')?;
        let param = Param::from_key(name)?;
        Self::parse(param, value)
    }

    pub fn param(&self) -> Param {
        match self {
            ParamChange::Frequency(_) => Param::Frequency,
            ParamChange::Volume(_) => Param::Volume,
            ParamChange::Waveform(_) => Param::Waveform,
            ParamChange::Attack(_) => Param::Attack,
            ParamChange::Decay(_) => Param::Decay,
            ParamChange::Sustain(_) => Param::Sustain,
            ParamChange::Release(_) => Param::Release,
            ParamChange::DecayCurve(_) => Param::DecayCurve,
            ParamChange::Bpm(_) => Param::Bpm,
        }
    }
}

/// A finite number, or `None`.
fn number<T: FromStr + Into<f64> + Copy>(text: &str) -> Option<T> {
    text.trim().parse::<T>().ok().filter(|v| (*v).into().is_finite())
}

impl KickParams {
    /// Apply one update in place. Values are stored as given, not clamped.
    pub fn apply(&mut self, change: ParamChange) {
        match change {
            ParamChange::Frequency(v) => self.oscillator.frequency = v,
            ParamChange::Volume(v) => self.oscillator.volume = v,
            ParamChange::Waveform(w) => self.oscillator.waveform = w,
            ParamChange::Attack(v) => self.envelope.attack = v,
            ParamChange::Decay(v) => self.envelope.decay = v,
            ParamChange::Sustain(v) => self.envelope.sustain = v,
            ParamChange::Release(v) => self.envelope.release = v,
            ParamChange::DecayCurve(c) => self.envelope.decay_curve = c,
            ParamChange::Bpm(v) => self.bpm = v,
        }
    }
}
