//! TUI layout for the kick editor
//!
//! ```text
//!   ┌ kick ─────────────── transport ──────────────────────────┐
//!   ├ Parameters ──┬ Kick ─────────────────────────────────────┤
//!   │              │  amplitude + envelope over the full render │
//!   │              │                                            │
//!   ├ Shape ───────┼ Spectrum ──────────────────────────────────┤
//!   └──────────────┴────────────────────────────────────────────┘
//!    help / status
//! ```

mod params;
pub mod spectrum;
pub mod transport;
mod waveform;

use kick_synth::{dsp::Stage, KickParams, RenderedSignal};
use ratatui::{
    layout::{Constraint, Direction, Layout},
    style::{Color, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use params::render_params;
use spectrum::render_spectrum;
use transport::{render_transport, AudioStats};
use waveform::{render_kick, render_shape};

/// Everything one frame draws, borrowed from the app
pub struct View<'a> {
    pub params: &'a KickParams,
    pub selected: usize,
    pub entry: &'a str,
    pub signal: &'a RenderedSignal,
    pub stats: &'a AudioStats,
    pub spectrum: &'a [(f64, f64)],
    pub looping: bool,
    /// Playhead of the last preview, 0-1
    pub progress: f64,
    pub stage: Option<Stage>,
    pub status: &'a str,
}

pub fn render(frame: &mut Frame, view: &View) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),      // Transport bar
            Constraint::Percentage(55), // Parameters + kick chart
            Constraint::Min(8),         // Shape + spectrum
            Constraint::Length(1),      // Help bar
        ])
        .split(frame.area());

    render_transport(frame, rows[0], view);

    let top = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(32), Constraint::Min(20)])
        .split(rows[1]);
    render_params(frame, top[0], view.params, view.selected, view.entry);
    render_kick(frame, top[1], view.signal, view.progress, view.stage);

    let bottom = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(32), Constraint::Min(20)])
        .split(rows[2]);
    render_shape(frame, bottom[0], view.params.oscillator.waveform);
    render_spectrum(frame, bottom[1], view.spectrum);

    let help = Line::from(vec![
        Span::styled(
            " [↑↓] Select [←→] Adjust [0-9 Enter] Type [W]ave [C]urve [P]lay [L]oop [R]andom [E]xport [Q]uit  ",
            Style::default().fg(Color::DarkGray),
        ),
        Span::styled(view.status, Style::default().fg(Color::Yellow)),
    ]);
    frame.render_widget(Paragraph::new(help), rows[3]);
}
