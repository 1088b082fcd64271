//! UrlInput: single-line tui-input prompt for the "add URL" flow.

use ratatui::crossterm::event::{Event, KeyCode, KeyEvent};
use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};
use tui_input::{backend::crossterm::EventHandler, Input};

use crate::theme::{C_MUTED, C_PROMPT_BG, C_PROMPT_FG};

const PREFIX: &str = "+ ";

#[derive(Debug, PartialEq)]
pub enum PromptAction {
    Submitted(String),
    Cancelled,
    Editing,
}

pub struct UrlInput {
    input: Input,
    active: bool,
    placeholder: String,
}

impl UrlInput {
    pub fn new(placeholder: impl Into<String>) -> Self {
        Self {
            input: Input::default(),
            active: false,
            placeholder: placeholder.into(),
        }
    }

    pub fn activate(&mut self) {
        self.input = Input::default();
        self.active = true;
    }

    pub fn deactivate(&mut self) {
        self.active = false;
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    #[cfg(test)]
    pub fn text(&self) -> &str {
        self.input.value()
    }

    /// Esc closes the prompt; Enter submits the trimmed text (an empty
    /// prompt just closes).
    pub fn handle_key(&mut self, key: KeyEvent) -> PromptAction {
        match key.code {
            KeyCode::Esc => {
                self.deactivate();
                PromptAction::Cancelled
            }
            KeyCode::Enter => {
                self.deactivate();
                let url = self.input.value().trim().to_string();
                if url.is_empty() {
                    PromptAction::Cancelled
                } else {
                    PromptAction::Submitted(url)
                }
            }
            _ => {
                self.input.handle_event(&Event::Key(key));
                PromptAction::Editing
            }
        }
    }

    pub fn draw(&self, frame: &mut Frame, area: Rect) {
        let width = area.width.saturating_sub(PREFIX.len() as u16 + 1) as usize;
        let scroll = self.input.visual_scroll(width);
        let value = self.input.value();
        let display = if value.is_empty() {
            Span::styled(format!("{}{}", PREFIX, self.placeholder), Style::default().fg(C_MUTED))
        } else {
            let visible: String = value.chars().skip(scroll).collect();
            Span::styled(format!("{}{}", PREFIX, visible), Style::default().fg(C_PROMPT_FG))
        };

        frame.render_widget(
            Paragraph::new(Line::from(display)).style(Style::default().bg(C_PROMPT_BG)),
            area,
        );

        if self.active && area.width > 0 {
            let cursor_x =
                area.x + PREFIX.len() as u16 + self.input.visual_cursor().saturating_sub(scroll) as u16;
            frame.set_cursor_position((cursor_x.min(area.x + area.width - 1), area.y));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::crossterm::event::KeyModifiers;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_typing_then_enter_submits() {
        let mut p = UrlInput::new("paste a URL");
        p.activate();
        for c in " abc ".chars() {
            assert_eq!(p.handle_key(key(KeyCode::Char(c))), PromptAction::Editing);
        }
        assert_eq!(p.handle_key(key(KeyCode::Enter)), PromptAction::Submitted("abc".into()));
        assert!(!p.is_active());
    }

    #[test]
    fn test_empty_enter_and_esc_cancel() {
        let mut p = UrlInput::new("");
        p.activate();
        assert_eq!(p.handle_key(key(KeyCode::Enter)), PromptAction::Cancelled);
        p.activate();
        p.handle_key(key(KeyCode::Char('x')));
        assert_eq!(p.handle_key(key(KeyCode::Esc)), PromptAction::Cancelled);
    }

    #[test]
    fn test_activate_clears_previous_text() {
        let mut p = UrlInput::new("");
        p.activate();
        p.handle_key(key(KeyCode::Char('x')));
        p.activate();
        assert_eq!(p.text(), "");
    }
}
