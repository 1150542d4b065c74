//! Mono 16-bit PCM WAV export.

use std::path::Path;

use hound::{SampleFormat, WavSpec, WavWriter};
use tracing::info;

use crate::{io::converter::to_pcm_i16, synth::kick::RenderedSignal, KickError};

fn spec(sample_rate: u32) -> WavSpec {
    WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 16,
        sample_format: SampleFormat::Int,
    }
}

/// Write PCM samples to a mono 16-bit WAV file, replacing any existing file.
pub fn write_wav(path: impl AsRef<Path>, samples: &[i16], sample_rate: u32) -> Result<(), KickError> {
    let path = path.as_ref();
    let mut writer = WavWriter::create(path, spec(sample_rate))?;
    for &sample in samples {
        writer.write_sample(sample)?;
    }
    writer.finalize()?;

    info!(path = %path.display(), samples = samples.len(), sample_rate, "wrote WAV");
    Ok(())
}

/// Export the amplitude of a render, saturating to 16-bit PCM.
pub fn export_kick(path: impl AsRef<Path>, signal: &RenderedSignal) -> Result<(), KickError> {
    write_wav(path, &to_pcm_i16(&signal.amplitude), signal.sample_rate)
}
