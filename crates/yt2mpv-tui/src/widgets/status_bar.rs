//! Status bar: service state, last refresh and the last warning, plus the
//! keybindings footer.

use chrono::{DateTime, Local};
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};
use yt2mpv_proto::config::ControlButton;
use yt2mpv_tui::controller::Phase;

use crate::theme::{
    C_ACCENT, C_BUSY, C_MODE_NORMAL, C_MODE_PROMPT, C_MUTED, C_PLAYING, C_SECONDARY, C_SEPARATOR,
};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputMode {
    Normal,
    /// The "add URL" prompt has the keyboard.
    Prompt,
}

impl InputMode {
    pub fn label(self) -> &'static str {
        match self {
            Self::Normal => "NORMAL",
            Self::Prompt => "ADD",
        }
    }

    pub fn color(self) -> ratatui::style::Color {
        match self {
            Self::Normal => C_MODE_NORMAL,
            Self::Prompt => C_MODE_PROMPT,
        }
    }
}

/// Human label for a space-bound key.
pub fn key_label(key: char) -> String {
    match key {
        ' ' => "space".to_string(),
        c => c.to_string(),
    }
}

pub fn draw_status_bar(
    frame: &mut Frame,
    area: Rect,
    phase: Phase,
    busy: bool,
    service_url: &str,
    last_refreshed: Option<DateTime<Local>>,
    last_log: Option<&str>,
) {
    let (dot, color) = match (phase, busy) {
        (Phase::Unavailable, _) => ("○", C_ACCENT),
        (Phase::Probing, _) | (Phase::Ready, true) => ("◌", C_BUSY),
        (Phase::Ready, false) => ("●", C_PLAYING),
    };

    let refreshed = match last_refreshed {
        Some(t) => format!("refreshed {}", t.format("%H:%M:%S")),
        None => "never refreshed".to_string(),
    };

    let line = Line::from(vec![
        Span::styled(dot, Style::default().fg(color)),
        Span::raw(" "),
        Span::styled(service_url.to_string(), Style::default().fg(C_SECONDARY)),
        Span::styled("  ·  ", Style::default().fg(C_SEPARATOR)),
        Span::styled(refreshed, Style::default().fg(C_SECONDARY)),
        Span::styled("  ", Style::default()),
        Span::styled(last_log.unwrap_or("").to_string(), Style::default().fg(C_MUTED)),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}

pub fn draw_keys_bar(frame: &mut Frame, area: Rect, mode: InputMode, controls: &[ControlButton]) {
    let mut spans = vec![Span::styled(
        format!(" {} ", mode.label()),
        Style::default().fg(mode.color()).add_modifier(Modifier::BOLD),
    )];

    let keys = match mode {
        InputMode::Normal => {
            let transport: Vec<String> = controls
                .iter()
                .map(|c| format!("{} {}", key_label(c.key), c.label))
                .collect();
            format!(
                " ↑↓/jk select  Enter play  d remove  r refresh  {}  a add  v paste  Tab focus  ? help  q quit",
                transport.join("  ")
            )
        }
        InputMode::Prompt => " paste or type a URL  Enter add  Esc cancel".to_string(),
    };
    spans.push(Span::styled(keys, Style::default().fg(C_MUTED)));
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}
