//! Transport bar widget - shows BPM, loop state, render length and audio stats

use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use super::View;

/// Audio statistics for display
pub struct AudioStats {
    pub peak: f32,
    pub rms: f32,
}

impl AudioStats {
    /// Compute audio stats from a buffer
    pub fn from_buffer(buffer: &[f32]) -> Self {
        if buffer.is_empty() {
            return Self { peak: 0.0, rms: 0.0 };
        }
        let peak = buffer.iter().fold(0.0f32, |acc, &x| acc.max(x.abs()));
        let rms = (buffer.iter().map(|&x| x * x).sum::<f32>() / buffer.len() as f32).sqrt();
        Self { peak, rms }
    }
}

/// Render the transport bar
pub fn render_transport(frame: &mut Frame, area: Rect, view: &View) {
    let block = Block::default().title(" kick ").borders(Borders::ALL);

    let (loop_symbol, loop_str) = if view.looping {
        ("▶", "Looping")
    } else {
        ("■", "Stopped")
    };

    let sample_rate_khz = view.signal.sample_rate as f64 / 1000.0;

    let line = Line::from(vec![
        Span::styled(
            format!(" BPM: {:.1}  ", view.params.bpm),
            Style::default().fg(Color::Cyan),
        ),
        Span::styled(
            format!("{} {}  ", loop_symbol, loop_str),
            Style::default().fg(if view.looping {
                Color::Green
            } else {
                Color::Yellow
            }),
        ),
        Span::styled(
            format!("{:.2}s / {} samples  ", view.signal.duration(), view.signal.len()),
            Style::default().fg(Color::White),
        ),
        Span::styled(
            format!("{:.1}kHz  ", sample_rate_khz),
            Style::default().fg(Color::DarkGray),
        ),
        Span::styled(
            format!("Peak: {:.2}  RMS: {:.2}", view.stats.peak, view.stats.rms),
            Style::default().fg(Color::Magenta),
        ),
    ]);

    let paragraph = Paragraph::new(line).block(block);
    frame.render_widget(paragraph, area);
}
