//! AppState: read-only data handed to components during render/event.
//!
//! Only the App event loop writes it, right after every controller
//! transition.

use chrono::{DateTime, Local};
use yt2mpv_proto::config::ControlButton;

use crate::widgets::status_bar::InputMode;
use yt2mpv_tui::controller::{EntryRow, Phase, PlaylistController};

pub struct AppState {
    // ── Mirror of the controller ────────────────────────────────────────────
    pub rows: Vec<EntryRow>,
    pub phase: Phase,
    /// Controls are disabled while set.
    pub busy: bool,
    /// Blocking modal; only quitting is possible once shown.
    pub alert: Option<String>,
    pub last_refreshed: Option<DateTime<Local>>,

    // ── Static ──────────────────────────────────────────────────────────────
    pub controls: Vec<ControlButton>,
    pub service_url: String,

    // ── UI ──────────────────────────────────────────────────────────────────
    pub input_mode: InputMode,
    /// Last WARN/ERROR line from the log.
    pub last_log: Option<String>,
}

impl AppState {
    pub fn new(controls: Vec<ControlButton>, service_url: String) -> Self {
        Self {
            rows: Vec::new(),
            phase: Phase::Probing,
            busy: false,
            alert: None,
            last_refreshed: None,
            controls,
            service_url,
            input_mode: InputMode::Normal,
            last_log: None,
        }
    }

    /// Copy everything the view needs out of the controller.
    pub fn sync(&mut self, controller: &PlaylistController) {
        self.rows = controller.rows();
        self.phase = controller.phase();
        self.busy = controller.is_busy();
    }

    /// True when a playlist control would do something.
    pub fn controls_enabled(&self) -> bool {
        self.phase == Phase::Ready && !self.busy
    }
}
