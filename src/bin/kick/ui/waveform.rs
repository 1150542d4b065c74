//! Kick and waveform-shape charts

use kick_synth::{
    dsp::{Stage, Waveform},
    RenderedSignal,
};
use ratatui::{
    layout::Rect,
    style::{Color, Style},
    symbols,
    widgets::{Axis, Block, Borders, Chart, Dataset, GraphType},
    Frame,
};

/// Points plotted per chart; braille cells can't show more than this anyway
const MAX_POINTS: usize = 2048;

/// Keep every n-th sample so long renders stay cheap to draw
fn decimate<T: Copy>(time: &[f64], values: &[T], to_f64: impl Fn(T) -> f64) -> Vec<(f64, f64)> {
    let step = (values.len() / MAX_POINTS).max(1);
    time.iter()
        .zip(values)
        .step_by(step)
        .map(|(&t, &v)| (t, to_f64(v)))
        .collect()
}

/// Render amplitude and envelope over the whole kick, with the preview playhead
pub fn render_kick(
    frame: &mut Frame,
    area: Rect,
    signal: &RenderedSignal,
    progress: f64,
    stage: Option<Stage>,
) {
    let title = match stage {
        Some(stage) => format!(" Kick [{stage:?}] "),
        None => String::from(" Kick "),
    };
    let block = Block::default().title(title).borders(Borders::ALL);

    let amplitude = decimate(&signal.time, &signal.amplitude, |s: f32| s as f64);
    let envelope = decimate(&signal.time, &signal.envelope, |s: f32| s as f64);

    let duration = signal.duration().max(1e-3);
    let head = progress.clamp(0.0, 1.0) * duration;
    let playhead = [(head, -1.0), (head, 1.0)];

    let mut datasets = vec![
        Dataset::default()
            .name("amplitude")
            .marker(symbols::Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(Color::Cyan))
            .data(&amplitude),
        Dataset::default()
            .name("envelope")
            .marker(symbols::Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(Color::Yellow))
            .data(&envelope),
    ];
    if progress > 0.0 && progress < 1.0 {
        datasets.push(
            Dataset::default()
                .marker(symbols::Marker::Braille)
                .graph_type(GraphType::Line)
                .style(Style::default().fg(Color::Red))
                .data(&playhead),
        );
    }

    let chart = Chart::new(datasets)
        .block(block)
        .x_axis(
            Axis::default()
                .bounds([0.0, duration])
                .labels(vec!["0s".to_string(), format!("{duration:.2}s")])
                .style(Style::default().fg(Color::DarkGray)),
        )
        .y_axis(
            Axis::default()
                .bounds([-1.0, 1.0])
                .labels(vec!["-1", "0", "1"])
                .style(Style::default().fg(Color::DarkGray)),
        );

    frame.render_widget(chart, area);
}

/// Render one period of the selected waveform
pub fn render_shape(frame: &mut Frame, area: Rect, waveform: Waveform) {
    let block = Block::default()
        .title(format!(" Shape: {waveform} "))
        .borders(Borders::ALL);

    let preview = waveform.preview(128);
    let data: Vec<(f64, f64)> = preview
        .iter()
        .enumerate()
        .map(|(i, &sample)| (i as f64 / preview.len() as f64, sample as f64))
        .collect();

    let dataset = Dataset::default()
        .marker(symbols::Marker::Braille)
        .graph_type(GraphType::Line)
        .style(Style::default().fg(Color::Cyan))
        .data(&data);

    let chart = Chart::new(vec![dataset])
        .block(block)
        .x_axis(
            Axis::default()
                .bounds([0.0, 1.0])
                .style(Style::default().fg(Color::DarkGray)),
        )
        .y_axis(
            Axis::default()
                .bounds([-1.0, 1.0])
                .style(Style::default().fg(Color::DarkGray)),
        );

    frame.render_widget(chart, area);
}
