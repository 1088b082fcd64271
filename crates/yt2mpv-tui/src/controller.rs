//! PlaylistController: single-owner state machine mirroring the service's
//! playlist.
//!
//! The controller performs no I/O.  Every user trigger and every response is
//! a transition that returns the `Effect`s its owner must carry out, in
//! order: a `Render` that disables the controls always precedes the `Send`
//! that starts a request, and at most one request is ever in flight.
//!
//! ```text
//!  Probing ──204──▶ Ready ◀──────────────┐
//!     │               │ trigger (busy)   │ response (idle)
//!     └─other──▶ Unavailable   └──▶ request in flight
//! ```

use tracing::{debug, info, warn};
use yt2mpv_proto::protocol::{PlaylistItem, Reply, Request};

use crate::client::ServiceError;

/// Status the health probe must answer with.
pub const HEALTHY_STATUS: u16 = 204;

/// Alert shown once when the health probe fails.
pub const SERVICE_DOWN: &str = "server is down";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Health probe not answered yet.
    Probing,
    Ready,
    /// Terminal: the probe failed and nothing else will be attempted.
    Unavailable,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaylistEntry {
    pub id: String,
    pub display_name: String,
    pub thumbnail_url: Option<String>,
    pub is_current: bool,
    pub ordinal: usize,
}

/// Server playlist at one point in time.  Never patched, only replaced.
pub type Snapshot = Vec<PlaylistEntry>;

/// Map a `/playlist` payload to a snapshot, keeping server order.
pub fn snapshot_from(items: Vec<PlaylistItem>) -> Snapshot {
    items
        .into_iter()
        .enumerate()
        .map(|(ordinal, item)| {
            let display_name = match item.title {
                Some(title) if !title.is_empty() => title,
                _ => item.filename,
            };
            PlaylistEntry {
                id: item.id,
                display_name,
                thumbnail_url: item.thumbnail.filter(|t| !t.is_empty()),
                is_current: item.current,
                ordinal,
            }
        })
        .collect()
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ControllerState {
    pub snapshot: Option<Snapshot>,
    /// The busy gate: no user trigger starts a request while set.
    pub busy: bool,
    pub service_healthy: Option<bool>,
}

/// One rendered playlist row, rebuilt from the snapshot on every change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryRow {
    pub id: String,
    pub title: String,
    pub thumbnail: Option<String>,
    pub current: bool,
    /// Ordinal to send with `/play`; `None` for the entry already playing.
    pub play: Option<usize>,
    /// Entry id to send with `/remove`.
    pub remove: String,
}

pub fn rows(snapshot: Option<&Snapshot>) -> Vec<EntryRow> {
    snapshot
        .map(|entries| {
            entries
                .iter()
                .map(|e| EntryRow {
                    id: e.id.clone(),
                    title: e.display_name.clone(),
                    thumbnail: e.thumbnail_url.clone(),
                    current: e.is_current,
                    play: (!e.is_current).then_some(e.ordinal),
                    remove: e.id.clone(),
                })
                .collect()
        })
        .unwrap_or_default()
}

/// What the owner of the controller must do next.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Rebuild the view from the controller state.
    Render,
    /// Issue this request; feed the result back through `on_response`.
    Send(Request),
    /// Blocking, session-ending message.
    Alert(String),
    /// A request failed or was refused; controls are usable again.
    RequestFailed(String),
}

/// Result of a request, as handed back to the controller.
#[derive(Debug)]
pub enum Response {
    Health(Result<u16, ServiceError>),
    Playlist(Result<Vec<PlaylistItem>, ServiceError>),
    Command(Result<Reply, ServiceError>),
}

#[derive(Debug)]
pub struct PlaylistController {
    state: ControllerState,
    phase: Phase,
    in_flight: Option<Request>,
}

impl Default for PlaylistController {
    fn default() -> Self {
        Self::new()
    }
}

impl PlaylistController {
    pub fn new() -> Self {
        Self {
            state: ControllerState::default(),
            phase: Phase::Probing,
            in_flight: None,
        }
    }

    pub fn state(&self) -> &ControllerState {
        &self.state
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_busy(&self) -> bool {
        self.state.busy
    }

    pub fn snapshot(&self) -> Option<&Snapshot> {
        self.state.snapshot.as_ref()
    }

    pub fn in_flight(&self) -> Option<&Request> {
        self.in_flight.as_ref()
    }

    /// True when a user trigger would start a request.
    pub fn accepts_input(&self) -> bool {
        self.phase == Phase::Ready && !self.state.busy
    }

    pub fn rows(&self) -> Vec<EntryRow> {
        rows(self.state.snapshot.as_ref())
    }

    /// Kick off the health probe.  Only the first call does anything.
    pub fn start(&mut self) -> Vec<Effect> {
        if self.phase != Phase::Probing || self.in_flight.is_some() {
            return Vec::new();
        }
        self.send(Request::Healthz)
    }

    pub fn refresh(&mut self) -> Option<Vec<Effect>> {
        self.trigger(Request::Playlist)
    }

    /// Play the entry at `ordinal`.  Only entries that are not already
    /// current expose a play affordance.
    pub fn play_index(&mut self, ordinal: usize) -> Option<Vec<Effect>> {
        let playable = self
            .state
            .snapshot
            .as_ref()
            .and_then(|s| s.get(ordinal))
            .is_some_and(|e| !e.is_current);
        if !playable {
            debug!("controller: no play affordance for ordinal {}", ordinal);
            return None;
        }
        self.trigger(Request::Play { index: ordinal })
    }

    pub fn control(&mut self, action: &str) -> Option<Vec<Effect>> {
        if action.is_empty() {
            return None;
        }
        self.trigger(Request::Control {
            action: action.to_string(),
        })
    }

    pub fn remove(&mut self, id: &str) -> Option<Vec<Effect>> {
        let known = self
            .state
            .snapshot
            .as_ref()
            .is_some_and(|s| s.iter().any(|e| e.id == id));
        if !known {
            debug!("controller: no entry with id {:?}", id);
            return None;
        }
        self.trigger(Request::Remove { id: id.to_string() })
    }

    /// Feed back the result of the request in flight.
    pub fn on_response(&mut self, response: Response) -> Vec<Effect> {
        let Some(request) = self.in_flight.take() else {
            warn!("controller: response with nothing in flight, ignored");
            return Vec::new();
        };
        debug!("controller: {} answered", request.route());

        match response {
            Response::Health(result) => self.on_health(result),
            Response::Playlist(result) => self.on_playlist(result),
            Response::Command(result) => self.on_command(&request, result),
        }
    }

    fn trigger(&mut self, request: Request) -> Option<Vec<Effect>> {
        if !self.accepts_input() {
            debug!(
                "controller: {} ignored (phase={:?} busy={})",
                request.route(),
                self.phase,
                self.state.busy
            );
            return None;
        }
        Some(self.send(request))
    }

    fn send(&mut self, request: Request) -> Vec<Effect> {
        self.state.busy = true;
        self.in_flight = Some(request.clone());
        vec![Effect::Render, Effect::Send(request)]
    }

    fn settle(&mut self) {
        self.state.busy = false;
    }

    fn on_health(&mut self, result: Result<u16, ServiceError>) -> Vec<Effect> {
        match result {
            Ok(HEALTHY_STATUS) => {
                info!("controller: service healthy");
                self.phase = Phase::Ready;
                self.state.service_healthy = Some(true);
                // Mirror the playlist right away.
                self.send(Request::Playlist)
            }
            other => {
                match other {
                    Ok(status) => warn!("controller: health probe answered {}", status),
                    Err(e) => warn!("controller: health probe failed: {}", e),
                }
                self.phase = Phase::Unavailable;
                self.state.service_healthy = Some(false);
                self.settle();
                vec![Effect::Render, Effect::Alert(SERVICE_DOWN.to_string())]
            }
        }
    }

    fn on_playlist(&mut self, result: Result<Vec<PlaylistItem>, ServiceError>) -> Vec<Effect> {
        self.settle();
        match result {
            Ok(items) => {
                let snapshot = snapshot_from(items);
                debug!("controller: new snapshot with {} entries", snapshot.len());
                self.state.snapshot = Some(snapshot);
                vec![Effect::Render]
            }
            Err(e) => {
                warn!("controller: playlist fetch failed: {}", e);
                vec![
                    Effect::Render,
                    Effect::RequestFailed(format!("playlist refresh failed: {}", e)),
                ]
            }
        }
    }

    fn on_command(&mut self, request: &Request, result: Result<Reply, ServiceError>) -> Vec<Effect> {
        let failure = match result {
            Ok(reply) if reply.is_success() => {
                // Stay busy through the implicit refresh.
                return self.send(Request::Playlist);
            }
            Ok(reply) => format!("{} refused: {}", request.route(), reply.reason()),
            Err(e) => format!("{} failed: {}", request.route(), e),
        };
        warn!("controller: {}", failure);
        self.settle();
        vec![Effect::Render, Effect::RequestFailed(failure)]
    }
}
