// Purpose: Kick rendering and the parameter model the front-end edits
// The renderer is the core; params and message sit beside it for callers

pub mod kick;
pub mod message;
pub mod params;

pub use kick::{KickSynth, OscillatorParams, RenderedSignal};
pub use message::ParamChange;
pub use params::{KickParams, Param, ParamRange};
