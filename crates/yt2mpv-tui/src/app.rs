//! App: the interactive playlist panel.
//!
//! - `App` owns the `PlaylistController`, all components and `AppState`.
//! - A `tokio::mpsc` channel carries `AppMessage`s in from background tasks
//!   (terminal events, request results, enqueue outcomes).
//! - Every controller transition returns effects; `apply_effects` turns them
//!   into a view sync, a spawned request, a toast or the blocking alert.
//! - Components return `Vec<Action>`; App dispatches each Action.

use std::io;
use std::sync::Arc;
use std::time::Duration;

use ratatui::crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
        KeyModifiers, MouseEvent, MouseEventKind,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    Terminal,
};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use yt2mpv_proto::config::{Config, ControlButton};
use yt2mpv_proto::protocol::Request;
use yt2mpv_tui::client::{execute as execute_request, Service};
use yt2mpv_tui::controller::{Effect, PlaylistController, Response};
use yt2mpv_tui::enqueue::{add_to_queue, EnqueueOutcome};
use yt2mpv_tui::notify::{ChannelNotifier, Notification, Urgency};

use crate::{
    action::{Action, ComponentId},
    app_state::AppState,
    component::Component,
    components::{control_bar::ControlBar, help_overlay::HelpOverlay, playlist_panel::PlaylistPanel},
    widgets::{
        modal,
        status_bar::{self, InputMode},
        toast::{Severity, ToastManager},
        url_input::{PromptAction, UrlInput},
    },
};

/// Keys the panel handles itself, globally or in a pane.  They win over
/// configured controls.
const RESERVED_KEYS: &[char] = &['q', '?', '1', '2', 'r', 'a', 'v', 'j', 'k', 'g', 'G', 'd', 'h', 'l'];

// ── Internal event bus ────────────────────────────────────────────────────────

enum AppMessage {
    Event(Event),
    /// Result of the request the controller has in flight.
    Response(Response),
    Enqueued(EnqueueOutcome),
}

/// Last-drawn layout rects, used for mouse hit-testing.
#[derive(Default, Clone)]
struct PaneAreas {
    playlist: Rect,
    controls: Rect,
}

// ── App ───────────────────────────────────────────────────────────────────────

pub struct App {
    controller: PlaylistController,
    service: Arc<dyn Service>,
    notify_title: String,

    // ── Shared state (passed read-only to components) ─────────────────────────
    pub state: AppState,

    // ── Components ────────────────────────────────────────────────────────────
    playlist: PlaylistPanel,
    controls: ControlBar,
    help_overlay: HelpOverlay,
    prompt: UrlInput,
    toast: ToastManager,

    focused: ComponentId,
    pane_areas: PaneAreas,
    tx: Option<mpsc::Sender<AppMessage>>,
    notifier: Option<Arc<ChannelNotifier>>,
    should_quit: bool,
}

impl App {
    pub fn new(config: &Config, service: Arc<dyn Service>) -> Self {
        for button in config.shadowed_controls(RESERVED_KEYS) {
            warn!(
                "control {:?} is bound to {:?}, which the panel already uses; click it instead",
                button.label, button.key
            );
        }
        Self {
            controller: PlaylistController::new(),
            service,
            notify_title: config.notifications.app_name.clone(),
            state: AppState::new(config.controls.clone(), config.service.base_url()),
            playlist: PlaylistPanel::new(),
            controls: ControlBar::new(),
            help_overlay: HelpOverlay::new(),
            prompt: UrlInput::new("paste a YouTube or Twitch URL"),
            toast: ToastManager::new(),
            focused: ComponentId::Playlist,
            pane_areas: PaneAreas::default(),
            tx: None,
            notifier: None,
            should_quit: false,
        }
    }

    pub async fn run(mut self, mut log_rx: mpsc::UnboundedReceiver<String>) -> anyhow::Result<()> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
        let mut terminal = Terminal::new(CrosstermBackend::new(stdout))?;
        debug!("run(): terminal ready, size={:?}", terminal.size());

        let result = self.event_loop(&mut terminal, &mut log_rx).await;

        // ── Teardown ──────────────────────────────────────────────────────────
        disable_raw_mode()?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture)?;
        terminal.show_cursor()?;
        result
    }

    async fn event_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
        log_rx: &mut mpsc::UnboundedReceiver<String>,
    ) -> anyhow::Result<()> {
        let (tx, mut rx) = mpsc::channel::<AppMessage>(256);
        self.tx = Some(tx.clone());

        let (notify_tx, mut notify_rx) = mpsc::unbounded_channel::<Notification>();
        self.notifier = Some(Arc::new(ChannelNotifier::new(notify_tx)));

        // ── Background task: keyboard/mouse events ────────────────────────────
        let event_tx = tx.clone();
        tokio::task::spawn_blocking(move || {
            while let Ok(ev) = event::read() {
                if event_tx.blocking_send(AppMessage::Event(ev)).is_err() {
                    break;
                }
            }
        });

        info!("panel: probing {}", self.state.service_url);
        let effects = self.controller.start();
        self.apply_effects(effects);

        // Toast expiry + spinner animation
        let mut ui_tick = tokio::time::interval(Duration::from_millis(100));
        ui_tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

        loop {
            terminal.draw(|f| self.draw(f))?;
            if self.should_quit {
                break;
            }

            tokio::select! {
                Some(msg) = rx.recv() => {
                    self.handle_message(msg);
                    while let Ok(next) = rx.try_recv() {
                        self.handle_message(next);
                    }
                }
                Some(line) = log_rx.recv() => {
                    self.state.last_log = Some(line);
                }
                Some(n) = notify_rx.recv() => {
                    self.show_notification(n);
                }
                _ = ui_tick.tick() => {
                    self.toast.tick();
                }
            }
        }

        info!("panel: quit");
        Ok(())
    }

    fn handle_message(&mut self, msg: AppMessage) {
        match msg {
            AppMessage::Event(ev) => match ev {
                Event::Key(key) => {
                    if key.kind == KeyEventKind::Release {
                        return;
                    }
                    for a in self.handle_key(key) {
                        self.dispatch(a);
                    }
                }
                Event::Mouse(mouse) => {
                    for a in self.handle_mouse(mouse) {
                        self.dispatch(a);
                    }
                }
                Event::Resize(w, h) => self.dispatch(Action::Resize(w, h)),
                _ => {}
            },
            AppMessage::Response(response) => {
                if matches!(response, Response::Playlist(Ok(_))) {
                    self.state.last_refreshed = Some(chrono::Local::now());
                }
                let effects = self.controller.on_response(response);
                self.apply_effects(effects);
            }
            AppMessage::Enqueued(outcome) => {
                if outcome.is_queued() {
                    // Show the new entry when nothing else is running.
                    if let Some(effects) = self.controller.refresh() {
                        self.apply_effects(effects);
                    }
                }
            }
        }
    }

    fn show_notification(&mut self, notification: Notification) {
        match severity_for(notification.urgency) {
            Severity::Success => self.toast.success(notification.message),
            Severity::Warning => self.toast.warning(notification.message),
            Severity::Error => self.toast.error(notification.message),
            Severity::Info => self.toast.info(notification.message),
        }
    }

    // ── Controller effects ────────────────────────────────────────────────────

    fn apply_effects(&mut self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::Render => self.sync_view(),
                Effect::Send(request) => self.spawn_request(request),
                Effect::Alert(msg) => {
                    warn!("panel: {}", msg);
                    self.state.alert = Some(msg);
                    self.prompt.deactivate();
                    self.state.input_mode = InputMode::Normal;
                }
                Effect::RequestFailed(msg) => self.toast.warning(msg),
            }
        }
    }

    fn sync_view(&mut self) {
        self.state.sync(&self.controller);
        self.playlist.sync(&self.state);
        match self.controller.in_flight() {
            Some(request) => self.toast.spinner(spinner_label(request)),
            None => self.toast.dismiss_spinner(),
        }
    }

    fn spawn_request(&self, request: Request) {
        let Some(tx) = self.tx.clone() else {
            return;
        };
        let service = Arc::clone(&self.service);
        tokio::spawn(async move {
            let response = execute_request(service.as_ref(), &request).await;
            if tx.send(AppMessage::Response(response)).await.is_err() {
                debug!("panel: closed before {} answered", request.route());
            }
        });
    }

    fn spawn_enqueue(&self, url: String) {
        let (Some(tx), Some(notifier)) = (self.tx.clone(), self.notifier.clone()) else {
            return;
        };
        let service = Arc::clone(&self.service);
        let title = self.notify_title.clone();
        tokio::spawn(async move {
            let outcome =
                add_to_queue(service.as_ref(), notifier.as_ref(), &title, Some(&url), None).await;
            let _ = tx.send(AppMessage::Enqueued(outcome)).await;
        });
    }

    // ── Key handling ──────────────────────────────────────────────────────────

    fn handle_key(&mut self, key: KeyEvent) -> Vec<Action> {
        if key.code == KeyCode::Char('c') && key.modifiers == KeyModifiers::CONTROL {
            return vec![Action::Quit];
        }

        // The service alert is terminal: only quitting remains.
        if self.state.alert.is_some() {
            return match key.code {
                KeyCode::Char('q') | KeyCode::Esc => vec![Action::Quit],
                _ => vec![],
            };
        }

        if self.prompt.is_active() {
            return match self.prompt.handle_key(key) {
                PromptAction::Submitted(url) => vec![Action::ClosePrompt, Action::Enqueue(url)],
                PromptAction::Cancelled => vec![Action::ClosePrompt],
                PromptAction::Editing => vec![],
            };
        }

        if self.help_overlay.visible {
            return self.help_overlay.handle_key(key, &self.state);
        }

        match key.code {
            KeyCode::Char('q') => return vec![Action::Quit],
            KeyCode::Char('?') => return vec![Action::ToggleHelp],
            KeyCode::Tab | KeyCode::BackTab => return vec![Action::FocusNext],
            KeyCode::Char('1') => return vec![Action::FocusPane(ComponentId::Playlist)],
            KeyCode::Char('2') => return vec![Action::FocusPane(ComponentId::Controls)],
            KeyCode::Char('r') => return vec![Action::Refresh],
            KeyCode::Char('a') => return vec![Action::OpenPrompt],
            KeyCode::Char('v') => return vec![Action::EnqueueClipboard],
            KeyCode::Char(c) => {
                if let Some(button) = control_for_key(&self.state.controls, c) {
                    return vec![Action::Control(button.action.clone())];
                }
            }
            _ => {}
        }

        let s = &self.state;
        match self.focused {
            ComponentId::Playlist => self.playlist.handle_key(key, s),
            ComponentId::Controls => self.controls.handle_key(key, s),
            ComponentId::HelpOverlay => self.help_overlay.handle_key(key, s),
        }
    }

    // ── Mouse handling ────────────────────────────────────────────────────────

    fn handle_mouse(&mut self, event: MouseEvent) -> Vec<Action> {
        let is_click = matches!(
            event.kind,
            MouseEventKind::Down(_) | MouseEventKind::ScrollUp | MouseEventKind::ScrollDown
        );
        if !is_click || self.state.alert.is_some() || self.help_overlay.visible {
            return vec![];
        }

        fn hit(r: Rect, col: u16, row: u16) -> bool {
            r.width > 0 && r.height > 0 && col >= r.x && col < r.x + r.width && row >= r.y && row < r.y + r.height
        }

        let areas = self.pane_areas.clone();
        let s = &self.state;
        let (id, mut actions) = if hit(areas.playlist, event.column, event.row) {
            (self.playlist.id(), self.playlist.handle_mouse(event, areas.playlist, s))
        } else if hit(areas.controls, event.column, event.row) {
            (self.controls.id(), self.controls.handle_mouse(event, areas.controls, s))
        } else {
            return vec![];
        };
        if self.focused != id {
            actions.insert(0, Action::FocusPane(id));
        }
        actions
    }

    // ── Action dispatcher ─────────────────────────────────────────────────────

    fn dispatch(&mut self, action: Action) {
        let secondary = self.help_overlay.on_action(&action, &self.state);
        self.apply_action(action);
        for a in secondary {
            self.apply_action(a);
        }
    }

    fn apply_action(&mut self, action: Action) {
        if action != Action::Noop {
            debug!("apply_action: {:?}", action);
        }
        let effects = match action {
            Action::Refresh => self.controller.refresh(),
            Action::PlayIndex(ordinal) => self.controller.play_index(ordinal),
            Action::Control(name) => self.controller.control(&name),
            Action::Remove(id) => self.controller.remove(&id),

            Action::OpenPrompt => {
                self.prompt.activate();
                self.state.input_mode = InputMode::Prompt;
                None
            }
            Action::ClosePrompt => {
                self.prompt.deactivate();
                self.state.input_mode = InputMode::Normal;
                None
            }
            Action::Enqueue(url) => {
                self.spawn_enqueue(url);
                None
            }
            Action::EnqueueClipboard => {
                match arboard::Clipboard::new().and_then(|mut cb| cb.get_text()) {
                    Ok(text) if !text.trim().is_empty() => self.spawn_enqueue(text.trim().to_string()),
                    Ok(_) => self.toast.warning("clipboard is empty"),
                    Err(e) => {
                        warn!("clipboard error: {}", e);
                        self.toast.error(format!("clipboard error: {}", e));
                    }
                }
                None
            }

            Action::FocusNext => {
                self.focused = match self.focused {
                    ComponentId::Playlist => ComponentId::Controls,
                    _ => ComponentId::Playlist,
                };
                None
            }
            Action::FocusPane(id) => {
                self.focused = id;
                None
            }
            Action::Quit => {
                self.should_quit = true;
                None
            }
            Action::ToggleHelp | Action::Resize(..) | Action::Noop => None,
        };

        if let Some(effects) = effects {
            self.apply_effects(effects);
        }
    }

    // ── Rendering ─────────────────────────────────────────────────────────────

    fn draw(&mut self, frame: &mut ratatui::Frame) {
        use crate::theme::C_BG;
        use ratatui::widgets::Block;

        let area = frame.area();
        frame.render_widget(Block::default().style(ratatui::style::Style::default().bg(C_BG)), area);

        let prompt_h = if self.prompt.is_active() { 1 } else { 0 };
        let outer = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(3),
                Constraint::Length(3),
                Constraint::Length(prompt_h),
                Constraint::Length(1),
                Constraint::Length(1),
            ])
            .split(area);

        self.pane_areas.playlist = outer[0];
        self.pane_areas.controls = outer[1];

        let s = &self.state;
        self.playlist
            .draw(frame, outer[0], self.focused == ComponentId::Playlist, s);
        self.controls
            .draw(frame, outer[1], self.focused == ComponentId::Controls, s);
        if self.prompt.is_active() {
            self.prompt.draw(frame, outer[2]);
        }
        status_bar::draw_status_bar(
            frame,
            outer[3],
            s.phase,
            s.busy,
            &s.service_url,
            s.last_refreshed,
            s.last_log.as_deref(),
        );
        status_bar::draw_keys_bar(frame, outer[4], s.input_mode, &s.controls);

        self.help_overlay.draw(frame, area, false, s);

        if let Some(msg) = s.alert.as_deref() {
            modal::draw_alert(frame, area, msg, &s.service_url);
        }

        self.toast.draw(frame, area);
    }
}

fn severity_for(urgency: Urgency) -> Severity {
    match urgency {
        Urgency::Low => Severity::Success,
        Urgency::Normal => Severity::Warning,
        Urgency::Critical => Severity::Error,
    }
}

/// Configured control for `key`, unless the panel reserves that key.
fn control_for_key(controls: &[ControlButton], key: char) -> Option<&ControlButton> {
    if RESERVED_KEYS.contains(&key) {
        return None;
    }
    controls.iter().find(|b| b.key == key)
}

fn spinner_label(request: &Request) -> String {
    match request {
        Request::Healthz => "contacting service".to_string(),
        Request::Playlist => "refreshing playlist".to_string(),
        Request::Play { index } => format!("playing #{}", index),
        Request::Control { action } => format!("sending {}", action),
        Request::Remove { .. } => "removing entry".to_string(),
        Request::Enqueue { .. } => "adding to queue".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spinner_labels() {
        assert_eq!(spinner_label(&Request::Play { index: 3 }), "playing #3");
        assert_eq!(
            spinner_label(&Request::Control { action: "pause".into() }),
            "sending pause"
        );
    }

    #[test]
    fn test_enqueue_outcomes_get_distinct_toast_colours() {
        assert_eq!(severity_for(Urgency::Low), Severity::Success);
        assert_eq!(severity_for(Urgency::Normal), Severity::Warning);
        assert_eq!(severity_for(Urgency::Critical), Severity::Error);
    }

    #[test]
    fn test_reserved_keys_win_over_configured_controls() {
        let controls = vec![
            ControlButton::new("stop", "stop", 'q'),
            ControlButton::new("down", "volume-down", 'j'),
            ControlButton::new("pause", "pause", ' '),
        ];
        assert!(control_for_key(&controls, 'q').is_none());
        assert!(control_for_key(&controls, 'j').is_none());
        assert_eq!(control_for_key(&controls, ' ').map(|b| b.action.as_str()), Some("pause"));
        assert!(control_for_key(&controls, 'x').is_none());
    }
}
