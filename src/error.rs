use std::io;

/// Errors raised by the collaborators around the synthesis core.
///
/// Rendering itself never fails; only file export and presets do.
#[derive(Debug, thiserror::Error)]
pub enum KickError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("failed to write WAV: {0}")]
    Wav(#[from] hound::Error),

    #[cfg(feature = "serde")]
    #[error("invalid preset: {0}")]
    PresetParse(#[from] toml::de::Error),

    #[cfg(feature = "serde")]
    #[error("failed to encode preset: {0}")]
    PresetEncode(#[from] toml::ser::Error),
}
