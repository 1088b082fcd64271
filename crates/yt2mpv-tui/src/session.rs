//! Sequential driver for the playlist controller.
//!
//! Used by the one-shot subcommands and the integration tests: each
//! operation runs every request the controller asks for, in order, before
//! returning.  The interactive panel drives the same controller from its
//! event loop instead.

use std::collections::VecDeque;

use tracing::debug;

use crate::client::{execute, Service};
use crate::controller::{Effect, EntryRow, PlaylistController, Snapshot};

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum SessionError {
    /// The trigger was not accepted (busy, unavailable, no such entry).
    #[error("nothing to do")]
    Inert,
    #[error("{0}")]
    Failed(String),
    #[error("{0}")]
    Unavailable(String),
}

pub struct Session<S: Service> {
    service: S,
    controller: PlaylistController,
}

impl<S: Service> Session<S> {
    /// Probe the service and, when healthy, load the first snapshot.
    pub async fn open(service: S) -> Result<Self, SessionError> {
        let mut session = Self {
            service,
            controller: PlaylistController::new(),
        };
        let effects = session.controller.start();
        session.drive(effects).await?;
        Ok(session)
    }

    pub fn controller(&self) -> &PlaylistController {
        &self.controller
    }

    pub fn service(&self) -> &S {
        &self.service
    }

    pub fn snapshot(&self) -> Option<&Snapshot> {
        self.controller.snapshot()
    }

    pub fn rows(&self) -> Vec<EntryRow> {
        self.controller.rows()
    }

    pub async fn refresh(&mut self) -> Result<(), SessionError> {
        let effects = self.controller.refresh();
        self.run(effects).await
    }

    pub async fn play_index(&mut self, ordinal: usize) -> Result<(), SessionError> {
        let effects = self.controller.play_index(ordinal);
        self.run(effects).await
    }

    pub async fn control(&mut self, action: &str) -> Result<(), SessionError> {
        let effects = self.controller.control(action);
        self.run(effects).await
    }

    pub async fn remove(&mut self, id: &str) -> Result<(), SessionError> {
        let effects = self.controller.remove(id);
        self.run(effects).await
    }

    async fn run(&mut self, effects: Option<Vec<Effect>>) -> Result<(), SessionError> {
        match effects {
            Some(effects) => self.drive(effects).await,
            None => Err(SessionError::Inert),
        }
    }

    async fn drive(&mut self, effects: Vec<Effect>) -> Result<(), SessionError> {
        let mut queue: VecDeque<Effect> = effects.into();
        let mut outcome = Ok(());

        while let Some(effect) = queue.pop_front() {
            match effect {
                Effect::Render => {}
                Effect::Send(request) => {
                    debug!("session: {}", request.path_and_query());
                    let response = execute(&self.service, &request).await;
                    queue.extend(self.controller.on_response(response));
                }
                Effect::Alert(msg) => outcome = Err(SessionError::Unavailable(msg)),
                Effect::RequestFailed(msg) => outcome = Err(SessionError::Failed(msg)),
            }
        }

        outcome
    }
}
