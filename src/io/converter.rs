/// Full-scale value of a 16-bit sample.
pub const PCM16_SCALE: f32 = i16::MAX as f32;

/// Convert one float sample to 16-bit PCM.
///
/// The sample is clamped to [-1, 1] before scaling, so out-of-range input
/// saturates instead of wrapping. NaN becomes silence.
#[inline]
pub fn sample_to_pcm_i16(sample: f32) -> i16 {
    if sample.is_nan() {
        return 0;
    }
    (sample.clamp(-1.0, 1.0) * PCM16_SCALE).round() as i16
}

/// Convert float samples to 16-bit PCM: `round(clamp(s, -1, 1) * 32767)`.
pub fn to_pcm_i16(samples: &[f32]) -> Vec<i16> {
    samples.iter().map(|&s| sample_to_pcm_i16(s)).collect()
}

/// Inverse of [`to_pcm_i16`], up to quantisation.
pub fn from_pcm_i16(samples: &[i16]) -> Vec<f32> {
    samples.iter().map(|&s| s as f32 / PCM16_SCALE).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scales_and_rounds() {
        assert_eq!(to_pcm_i16(&[0.0, 1.0, -1.0, 0.5]), vec![0, 32767, -32767, 16384]);
    }

    #[test]
    fn saturates_out_of_range() {
        assert_eq!(
            to_pcm_i16(&[1.5, -3.0, f32::INFINITY, f32::NEG_INFINITY, f32::NAN]),
            vec![32767, -32767, 32767, -32767, 0]
        );
    }

    #[test]
    fn quantisation_error_is_small() {
        let samples = [0.123, -0.777, 0.999];
        let back = from_pcm_i16(&to_pcm_i16(&samples));
        for (a, b) in samples.iter().zip(&back) {
            assert!((a - b).abs() <= 0.5 / PCM16_SCALE + 1e-7);
        }
    }
}
