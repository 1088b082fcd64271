//! ControlBar: refresh button followed by the configured transport buttons.
//! Every button is dimmed and inert while the controller is busy.

use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyEventKind, MouseButton, MouseEvent, MouseEventKind};
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};
use unicode_width::UnicodeWidthStr;

use crate::{
    action::{Action, ComponentId},
    app_state::AppState,
    component::Component,
    theme::style_button,
    widgets::pane_chrome::pane_chrome,
    widgets::status_bar::key_label,
};

const GAP: u16 = 2;

pub struct ControlBar {
    selected: usize,
    /// Hit rects from the last draw, one per button.
    hit_areas: Vec<Rect>,
}

impl ControlBar {
    pub fn new() -> Self {
        Self {
            selected: 0,
            hit_areas: Vec::new(),
        }
    }

    /// Labels and actions in display order; index 0 is refresh.
    fn buttons(state: &AppState) -> Vec<(String, Action)> {
        let mut out = vec![("⟳ refresh (r)".to_string(), Action::Refresh)];
        out.extend(state.controls.iter().map(|c| {
            (
                format!("{} ({})", c.label, key_label(c.key)),
                Action::Control(c.action.clone()),
            )
        }));
        out
    }

    fn activate(&self, index: usize, state: &AppState) -> Vec<Action> {
        if !state.controls_enabled() {
            return vec![];
        }
        Self::buttons(state)
            .into_iter()
            .nth(index)
            .map(|(_, a)| vec![a])
            .unwrap_or_default()
    }
}

impl Default for ControlBar {
    fn default() -> Self {
        Self::new()
    }
}

impl Component for ControlBar {
    fn id(&self) -> ComponentId {
        ComponentId::Controls
    }

    fn handle_key(&mut self, key: KeyEvent, state: &AppState) -> Vec<Action> {
        if key.kind == KeyEventKind::Release {
            return vec![];
        }
        let count = Self::buttons(state).len();
        match key.code {
            KeyCode::Left | KeyCode::Char('h') => self.selected = self.selected.saturating_sub(1),
            KeyCode::Right | KeyCode::Char('l') => {
                self.selected = (self.selected + 1).min(count.saturating_sub(1))
            }
            KeyCode::Enter => return self.activate(self.selected, state),
            _ => {}
        }
        vec![]
    }

    fn handle_mouse(&mut self, event: MouseEvent, _area: Rect, state: &AppState) -> Vec<Action> {
        if !matches!(event.kind, MouseEventKind::Down(MouseButton::Left)) {
            return vec![];
        }
        let hit = self.hit_areas.iter().position(|r| {
            event.column >= r.x && event.column < r.x + r.width && event.row >= r.y && event.row < r.y + r.height
        });
        match hit {
            Some(i) => {
                self.selected = i;
                self.activate(i, state)
            }
            None => vec![],
        }
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect, focused: bool, state: &AppState) {
        let block = pane_chrome("controls", Some('2'), focused, None);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let enabled = state.controls_enabled();
        let mut spans = Vec::new();
        self.hit_areas.clear();
        let mut x = inner.x + 1;
        spans.push(Span::raw(" "));

        for (i, (label, _)) in Self::buttons(state).into_iter().enumerate() {
            let text = format!("[ {} ]", label);
            let width = text.width() as u16;
            self.hit_areas.push(Rect {
                x,
                y: inner.y,
                width,
                height: 1,
            });
            spans.push(Span::styled(text, style_button(enabled, focused && i == self.selected)));
            spans.push(Span::raw(" ".repeat(GAP as usize)));
            x += width + GAP;
        }

        frame.render_widget(Paragraph::new(Line::from(spans)), inner);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::crossterm::event::KeyModifiers;
    use yt2mpv_proto::config::ControlButton;
    use yt2mpv_tui::controller::Phase;

    fn state(busy: bool) -> AppState {
        let mut s = AppState::new(
            vec![
                ControlButton::new("prev", "prev", 'p'),
                ControlButton::new("pause", "pause", ' '),
            ],
            "http://x".into(),
        );
        s.phase = Phase::Ready;
        s.busy = busy;
        s
    }

    #[test]
    fn test_buttons_map_to_actions() {
        let s = state(false);
        let mut bar = ControlBar::new();
        let key = |c| KeyEvent::new(c, KeyModifiers::NONE);
        assert_eq!(bar.handle_key(key(KeyCode::Enter), &s), vec![Action::Refresh]);
        bar.handle_key(key(KeyCode::Right), &s);
        bar.handle_key(key(KeyCode::Right), &s);
        bar.handle_key(key(KeyCode::Right), &s);
        assert_eq!(
            bar.handle_key(key(KeyCode::Enter), &s),
            vec![Action::Control("pause".into())]
        );
    }

    #[test]
    fn test_disabled_while_busy() {
        let s = state(true);
        let mut bar = ControlBar::new();
        assert!(bar
            .handle_key(KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE), &s)
            .is_empty());
    }
}
