//! Centered popups: the blocking service alert and shared layout helper.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use crate::theme::{C_ACCENT, C_MUTED, C_OVERLAY_BG, C_PRIMARY};

pub fn centered_rect(percent_x: u16, height: u16, r: Rect) -> Rect {
    let vert = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),
            Constraint::Length(height),
            Constraint::Min(0),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vert[1])[1]
}

pub fn draw_alert(frame: &mut Frame, area: Rect, message: &str, service_url: &str) {
    let popup = centered_rect(50, 7, area);
    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            format!(" {}", message),
            Style::default().fg(C_ACCENT).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(format!(" {}", service_url), Style::default().fg(C_PRIMARY))),
        Line::from(""),
        Line::from(Span::styled(" press q to quit", Style::default().fg(C_MUTED))),
    ];

    frame.render_widget(Clear, popup);
    frame.render_widget(
        Paragraph::new(lines)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(C_ACCENT))
                    .style(Style::default().bg(C_OVERLAY_BG)),
            )
            .wrap(Wrap { trim: false }),
        popup,
    );
}
