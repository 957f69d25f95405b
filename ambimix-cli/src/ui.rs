use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
    Terminal,
};

use crate::controls::StatusSnapshot;

const CONTROLS: &str = "↑/↓ select  space=on/off  ←/→ sound ±5  -/= master ±5  m=mute  f=fade\np=next preset  s=save preset  x=stop all  *=favorite  a=alarm  y=source  q=quit";

pub fn draw(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    sound_rows: &[String],
    selected: usize,
    status: &StatusSnapshot,
    log_lines: &[String],
) {
    let _ = terminal.draw(|f| {
        let status_height = status.text.lines().count() as u16 + 2;
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .margin(1)
            .constraints([
                Constraint::Length(4),
                Constraint::Length(status_height),
                Constraint::Min(6),
                Constraint::Length(8),
            ])
            .split(f.size());

        let controls = Paragraph::new(CONTROLS)
            .style(Style::default().fg(Color::Blue))
            .block(Block::default().borders(Borders::ALL).title("Ambimix"));
        f.render_widget(controls, chunks[0]);

        let status_widget = Paragraph::new(status.text.as_str())
            .style(
                Style::default()
                    .fg(Color::Green)
                    .add_modifier(Modifier::BOLD),
            )
            .block(Block::default().borders(Borders::ALL).title("Mix"));
        f.render_widget(status_widget, chunks[1]);

        let items: Vec<ListItem> = sound_rows
            .iter()
            .map(|row| ListItem::new(row.as_str()))
            .collect();
        let list = List::new(items)
            .block(Block::default().borders(Borders::ALL).title("Sounds"))
            .highlight_style(Style::default().fg(Color::Black).bg(Color::Cyan))
            .highlight_symbol("> ");
        let mut list_state = ListState::default().with_selected(Some(selected));
        f.render_stateful_widget(list, chunks[2], &mut list_state);

        let log_height = chunks[3].height.saturating_sub(2) as usize;
        let start = log_lines.len().saturating_sub(log_height);
        let log_text = if log_lines.is_empty() {
            "No logs yet.".to_string()
        } else {
            log_lines[start..].join("\n")
        };

        let log_widget = Paragraph::new(log_text)
            .style(Style::default().fg(Color::DarkGray))
            .block(Block::default().borders(Borders::ALL).title("Logs"));
        f.render_widget(log_widget, chunks[3]);
    });
}
