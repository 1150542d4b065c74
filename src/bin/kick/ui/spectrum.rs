//! Spectrum analyzer widget
//!
//! FFT of the start of the kick (its body) with log-spaced bins. The input is
//! zero-padded up to the FFT size, so short kicks still get a full-resolution
//! spectrum.

use ratatui::{
    layout::Rect,
    style::{Color, Style},
    symbols,
    widgets::{Axis, Block, Borders, Chart, Dataset, GraphType},
    Frame,
};
use rustfft::{num_complex::Complex, Fft, FftPlanner};
use std::sync::Arc;

/// Number of frequency bins to display
const SPECTRUM_BINS: usize = 64;
/// Floor of the magnitude axis
const MIN_DB: f64 = -100.0;

/// Spectrum analyzer with FFT processing
pub struct SpectrumAnalyzer {
    /// Hann window coefficients
    window: Vec<f32>,
    /// Frequency values for each bin (Hz)
    freq_bins: Vec<f64>,
    /// FFT bin indices corresponding to each frequency
    bin_indices: Vec<usize>,
    fft: Arc<dyn Fft<f32>>,
    scratch: Vec<Complex<f32>>,
    /// Current spectrum data: (frequency_hz, magnitude_db)
    spectrum: Vec<(f64, f64)>,
}

impl SpectrumAnalyzer {
    /// # Arguments
    /// * `fft_len` - FFT size; longer inputs are truncated, shorter ones padded
    /// * `sample_rate` - Audio sample rate in Hz
    /// * `max_freq` - Highest displayed frequency, capped at Nyquist
    pub fn new(fft_len: usize, sample_rate: f32, max_freq: f32) -> Self {
        let fft_len = fft_len.max(2);
        let mut planner = FftPlanner::new();
        let fft = planner.plan_fft_forward(fft_len);

        // Hann window - reduces spectral leakage
        let window: Vec<f32> = (0..fft_len).map(|i| hann(i, fft_len)).collect();

        // Log-spaced frequency bins (20 Hz to max_freq)
        let max_freq = max_freq.min(sample_rate / 2.0).max(1.0);
        let min_freq = 20.0f32.min(max_freq);
        let ratio = (max_freq / min_freq) as f64;
        let half = fft_len / 2;

        let mut freq_bins = Vec::with_capacity(SPECTRUM_BINS);
        let mut bin_indices = Vec::with_capacity(SPECTRUM_BINS);
        for i in 0..SPECTRUM_BINS {
            let t = i as f64 / (SPECTRUM_BINS - 1) as f64;
            let freq = min_freq as f64 * ratio.powf(t);
            let index = ((freq * fft_len as f64 / sample_rate as f64).round() as usize).min(half - 1);
            freq_bins.push(freq);
            bin_indices.push(index);
        }

        let scratch = vec![Complex::new(0.0, 0.0); fft_len];
        let spectrum = freq_bins.iter().map(|&f| (f, MIN_DB)).collect();

        Self {
            window,
            freq_bins,
            bin_indices,
            fft,
            scratch,
            spectrum,
        }
    }

    /// Recompute the spectrum from the start of `signal`.
    pub fn update(&mut self, signal: &[f32]) {
        let len = self.window.len();
        let used = signal.len().min(len);

        // Window only the real samples; the padding stays zero
        let padded = used < len;
        for (i, slot) in self.scratch.iter_mut().enumerate() {
            let sample = match signal.get(i) {
                Some(&s) if i < used && s.is_finite() => {
                    s * if padded { hann(i, used) } else { self.window[i] }
                }
                _ => 0.0,
            };
            *slot = Complex::new(sample, 0.0);
        }

        self.fft.process(&mut self.scratch);

        for (i, &index) in self.bin_indices.iter().enumerate() {
            let bin = self.scratch[index];
            let power = (bin.re * bin.re + bin.im * bin.im).max(1e-12);
            self.spectrum[i] = (self.freq_bins[i], (10.0 * (power as f64).log10()).max(MIN_DB));
        }
    }

    /// Get the current spectrum data
    pub fn data(&self) -> &[(f64, f64)] {
        &self.spectrum
    }
}

fn hann(i: usize, len: usize) -> f32 {
    if len < 2 {
        return 1.0;
    }
    0.5 * (1.0 - (2.0 * std::f32::consts::PI * i as f32 / (len - 1) as f32).cos())
}

/// Render the spectrum analyzer widget
pub fn render_spectrum(frame: &mut Frame, area: Rect, spectrum: &[(f64, f64)]) {
    let block = Block::default().title(" Spectrum ").borders(Borders::ALL);

    let dataset = Dataset::default()
        .marker(symbols::Marker::Braille)
        .graph_type(GraphType::Line)
        .style(Style::default().fg(Color::Green))
        .data(spectrum);

    let max_freq = spectrum.iter().map(|(f, _)| *f).fold(0.0, f64::max).max(1.0);
    let max_db = spectrum.iter().map(|(_, db)| *db).fold(MIN_DB, f64::max);

    let chart = Chart::new(vec![dataset])
        .block(block)
        .x_axis(
            Axis::default()
                .bounds([0.0, max_freq])
                .labels(vec!["0".to_string(), format!("{max_freq:.0} Hz")])
                .style(Style::default().fg(Color::DarkGray)),
        )
        .y_axis(
            Axis::default()
                .bounds([MIN_DB, max_db.max(0.0) + 10.0])
                .labels(vec!["-100", "-60", "-20", "0"])
                .style(Style::default().fg(Color::DarkGray)),
        );

    frame.render_widget(chart, area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sine_peaks_near_its_frequency() {
        let sr = 44_100.0;
        let signal: Vec<f32> = (0..4096)
            .map(|i| (2.0 * std::f32::consts::PI * 100.0 * i as f32 / sr).sin())
            .collect();

        let mut analyzer = SpectrumAnalyzer::new(4096, sr, 2_000.0);
        analyzer.update(&signal);

        let (peak_freq, _) = analyzer
            .data()
            .iter()
            .copied()
            .fold((0.0, f64::MIN), |best, bin| if bin.1 > best.1 { bin } else { best });
        assert!((70.0..140.0).contains(&peak_freq), "peak at {peak_freq} Hz");
    }

    #[test]
    fn short_and_empty_inputs_are_padded() {
        let mut analyzer = SpectrumAnalyzer::new(1024, 44_100.0, 2_000.0);
        analyzer.update(&[]);
        assert!(analyzer.data().iter().all(|&(_, db)| db == MIN_DB));

        analyzer.update(&[0.5; 100]);
        assert_eq!(analyzer.data().len(), SPECTRUM_BINS);
        assert!(analyzer.data().iter().all(|&(_, db)| db.is_finite()));
    }
}
