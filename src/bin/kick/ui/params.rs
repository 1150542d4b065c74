//! Parameter list widget

use kick_synth::{synth::Param, KickParams};
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem},
    Frame,
};

pub fn render_params(frame: &mut Frame, area: Rect, params: &KickParams, selected: usize, entry: &str) {
    let block = Block::default().title(" Parameters ").borders(Borders::ALL);

    let items: Vec<ListItem> = Param::ALL
        .iter()
        .enumerate()
        .map(|(i, &param)| {
            let is_selected = i == selected;
            let value = if is_selected && !entry.is_empty() {
                format!("{entry}_")
            } else {
                param.display(params)
            };

            let style = if is_selected {
                Style::default().fg(Color::Black).bg(Color::Cyan).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::White)
            };

            ListItem::new(Line::from(vec![
                Span::styled(format!(" {:<15}", param.label()), style),
                Span::styled(format!("{value:>12} "), style),
            ]))
        })
        .collect();

    frame.render_widget(List::new(items).block(block), area);
}
