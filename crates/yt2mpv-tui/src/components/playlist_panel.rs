//! PlaylistPanel: one row per snapshot entry, with play and remove
//! affordances.

use std::time::Instant;

use ratatui::crossterm::event::{
    KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{List, ListItem, ListState, Paragraph},
    Frame,
};
use unicode_width::UnicodeWidthStr;
use yt2mpv_tui::controller::{EntryRow, Phase};

use crate::{
    action::{Action, ComponentId},
    app_state::AppState,
    component::Component,
    theme::{C_ACCENT, C_BUSY, C_MUTED, C_NUMBER_HINT, C_PLAYING, C_PRIMARY, C_SECONDARY, C_SELECTION_BG},
    widgets::{
        pane_chrome::{pane_chrome, Badge},
        scrollable_list::ScrollableList,
    },
};

const REMOVE_MARKER: &str = " ✕ ";
const DOUBLE_CLICK_MS: u128 = 400;

pub struct PlaylistPanel {
    pub list: ScrollableList<EntryRow>,
    list_state: ListState,
    last_click: Option<(usize, Instant)>,
}

impl PlaylistPanel {
    pub fn new() -> Self {
        Self {
            list: ScrollableList::new(),
            list_state: ListState::default(),
            last_click: None,
        }
    }

    /// Rebuild from the latest rows.
    pub fn sync(&mut self, state: &AppState) {
        self.list.set_items(state.rows.clone());
    }

    fn play_selected(&self, state: &AppState) -> Vec<Action> {
        if !state.controls_enabled() {
            return vec![];
        }
        match self.list.selected_item().and_then(|r| r.play) {
            Some(ordinal) => vec![Action::PlayIndex(ordinal)],
            None => vec![],
        }
    }

    fn remove_selected(&self, state: &AppState) -> Vec<Action> {
        if !state.controls_enabled() {
            return vec![];
        }
        match self.list.selected_item() {
            Some(row) => vec![Action::Remove(row.remove.clone())],
            None => vec![],
        }
    }

    fn render_row<'a>(row: &'a EntryRow, is_selected: bool, enabled: bool, width: u16) -> ListItem<'a> {
        let (icon, icon_color) = if row.current {
            ("▶", C_PLAYING)
        } else {
            ("·", C_MUTED)
        };

        let title_color = if !enabled {
            C_MUTED
        } else if row.current {
            C_PLAYING
        } else if is_selected {
            C_PRIMARY
        } else {
            C_SECONDARY
        };
        let mut title_style = Style::default().fg(title_color);
        if row.current || is_selected {
            title_style = title_style.add_modifier(Modifier::BOLD);
        }

        let ordinal = match row.play {
            Some(i) => format!("{:>3} ", i),
            None => "    ".to_string(),
        };

        let used = 2 + ordinal.width() + row.title.width() + REMOVE_MARKER.width();
        let pad = (width as usize).saturating_sub(used);
        let remove_color = if enabled { C_ACCENT } else { C_MUTED };

        let line = Line::from(vec![
            Span::styled(icon, Style::default().fg(icon_color)),
            Span::raw(" "),
            Span::styled(ordinal, Style::default().fg(C_NUMBER_HINT)),
            Span::styled(row.title.as_str(), title_style),
            Span::raw(" ".repeat(pad)),
            Span::styled(REMOVE_MARKER, Style::default().fg(remove_color)),
        ]);

        let bg = if is_selected {
            Style::default().bg(C_SELECTION_BG)
        } else {
            Style::default()
        };
        ListItem::new(line).style(bg)
    }
}

impl Default for PlaylistPanel {
    fn default() -> Self {
        Self::new()
    }
}

impl Component for PlaylistPanel {
    fn id(&self) -> ComponentId {
        ComponentId::Playlist
    }

    fn handle_key(&mut self, key: KeyEvent, state: &AppState) -> Vec<Action> {
        if key.kind == KeyEventKind::Release {
            return vec![];
        }
        let step = if key.modifiers.contains(KeyModifiers::SHIFT) { 5 } else { 1 };
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => self.list.select_up(step),
            KeyCode::Down | KeyCode::Char('j') => self.list.select_down(step),
            KeyCode::PageUp => self.list.select_up(10),
            KeyCode::PageDown => self.list.select_down(10),
            KeyCode::Home | KeyCode::Char('g') => self.list.select_first(),
            KeyCode::End | KeyCode::Char('G') => self.list.select_last(),
            KeyCode::Enter => return self.play_selected(state),
            KeyCode::Char('d') | KeyCode::Delete => return self.remove_selected(state),
            _ => {}
        }
        vec![]
    }

    fn handle_mouse(&mut self, event: MouseEvent, area: Rect, state: &AppState) -> Vec<Action> {
        // +1 for the top border
        let rel_row = event.row.saturating_sub(area.y + 1) as usize;
        match event.kind {
            MouseEventKind::ScrollUp => self.list.select_up(1),
            MouseEventKind::ScrollDown => self.list.select_down(1),
            MouseEventKind::Down(MouseButton::Left) => {
                let now = Instant::now();
                let is_double = self
                    .last_click
                    .is_some_and(|(row, t)| row == rel_row && t.elapsed().as_millis() < DOUBLE_CLICK_MS);

                if !self.list.handle_click(rel_row) {
                    self.last_click = None;
                    return vec![];
                }

                let remove_col = area.x + area.width.saturating_sub(1 + REMOVE_MARKER.width() as u16);
                if event.column >= remove_col {
                    self.last_click = None;
                    return self.remove_selected(state);
                }
                if is_double {
                    self.last_click = None;
                    return self.play_selected(state);
                }
                self.last_click = Some((rel_row, now));
            }
            _ => {}
        }
        vec![]
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect, focused: bool, state: &AppState) {
        let badge = match (state.phase, state.busy) {
            (Phase::Unavailable, _) => Some(Badge { text: "DOWN", color: C_ACCENT }),
            (_, true) => Some(Badge { text: "BUSY", color: C_BUSY }),
            _ => None,
        };
        let title = format!("playlist ({})", self.list.len());
        let block = pane_chrome(&title, Some('1'), focused, badge);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        if self.list.is_empty() {
            let msg = match state.phase {
                Phase::Probing => "  contacting service…",
                Phase::Unavailable => "  service unavailable",
                Phase::Ready if state.last_refreshed.is_none() => "  loading playlist…",
                Phase::Ready => "  playlist is empty  (a to add a URL)",
            };
            frame.render_widget(
                Paragraph::new(Span::styled(msg, Style::default().fg(C_MUTED))),
                inner,
            );
            return;
        }

        let height = inner.height as usize;
        self.list.ensure_visible(height);
        let enabled = state.controls_enabled();
        let selected = self.list.selected;
        let items: Vec<ListItem> = self
            .list
            .visible_items(height)
            .into_iter()
            .map(|(i, row)| Self::render_row(row, i == selected, enabled, inner.width))
            .collect();

        self.list_state
            .select(Some(selected.saturating_sub(self.list.scroll_offset)));
        frame.render_stateful_widget(
            List::new(items).highlight_style(Style::default()),
            inner,
            &mut self.list_state,
        );
    }
}
