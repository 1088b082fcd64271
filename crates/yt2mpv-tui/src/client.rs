//! HTTP client for the mpv queue service.
//!
//! `Service` is the seam the controller driver and the enqueue flow talk to;
//! `ServiceClient` is the reqwest implementation used by the binary.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use tracing::{debug, warn};
use yt2mpv_proto::config::ServiceConfig;
use yt2mpv_proto::protocol::{PlaylistItem, Reply, Request};

use crate::controller::Response;

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("could not reach {url}: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("{url} answered HTTP {status}")]
    Status { url: String, status: u16 },
    #[error("unreadable reply from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}

#[async_trait]
pub trait Service: Send + Sync {
    /// `GET /healthz`; returns the raw status code.
    async fn health(&self) -> Result<u16, ServiceError>;

    /// `GET /playlist`.
    async fn playlist(&self) -> Result<Vec<PlaylistItem>, ServiceError>;

    /// Any of the command routes (`/req`, `/play`, `/control`, `/remove`).
    async fn command(&self, request: &Request) -> Result<Reply, ServiceError>;
}

/// Run `request` against `service` and wrap the result for the controller.
pub async fn execute<S: Service + ?Sized>(service: &S, request: &Request) -> Response {
    match request {
        Request::Healthz => Response::Health(service.health().await),
        Request::Playlist => Response::Playlist(service.playlist().await),
        other => Response::Command(service.command(other).await),
    }
}

pub struct ServiceClient {
    base_url: String,
    /// Health probe and enqueue.
    quick: reqwest::Client,
    /// Playlist operations: no client-side timeout.
    patient: reqwest::Client,
}

impl ServiceClient {
    pub fn new(config: &ServiceConfig) -> Result<Self, ServiceError> {
        Self::with_base_url(
            config.base_url(),
            Duration::from_secs(config.request_timeout_secs.max(1)),
        )
    }

    pub fn with_base_url(base_url: impl Into<String>, timeout: Duration) -> Result<Self, ServiceError> {
        let user_agent = concat!("yt2mpv/", env!("CARGO_PKG_VERSION"));
        let quick = reqwest::Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .build()?;
        let patient = reqwest::Client::builder().user_agent(user_agent).build()?;
        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            quick,
            patient,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url_for(&self, request: &Request) -> String {
        format!("{}{}", self.base_url, request.path_and_query())
    }

    fn client_for(&self, request: &Request) -> &reqwest::Client {
        match request {
            Request::Healthz | Request::Enqueue { .. } => &self.quick,
            _ => &self.patient,
        }
    }

    async fn get(&self, request: &Request) -> Result<(String, reqwest::Response), ServiceError> {
        let url = self.url_for(request);
        debug!(url = %url, "HTTP GET start");
        match self.client_for(request).get(&url).send().await {
            Ok(resp) => Ok((url, resp)),
            Err(source) => {
                warn!(url = %url, error = %source, "HTTP GET failed");
                Err(ServiceError::Transport { url, source })
            }
        }
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, request: &Request) -> Result<T, ServiceError> {
        let (url, resp) = self.get(request).await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(ServiceError::Status {
                url,
                status: status.as_u16(),
            });
        }
        resp.json::<T>()
            .await
            .map_err(|source| ServiceError::Decode { url, source })
    }
}

#[async_trait]
impl Service for ServiceClient {
    async fn health(&self) -> Result<u16, ServiceError> {
        let (url, resp) = self.get(&Request::Healthz).await?;
        let status = resp.status();
        if status != StatusCode::NO_CONTENT {
            debug!(url = %url, status = status.as_u16(), "health probe not ok");
        }
        Ok(status.as_u16())
    }

    async fn playlist(&self) -> Result<Vec<PlaylistItem>, ServiceError> {
        self.get_json(&Request::Playlist).await
    }

    async fn command(&self, request: &Request) -> Result<Reply, ServiceError> {
        self.get_json(request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_building() {
        let client =
            ServiceClient::with_base_url("http://localhost:5000/", Duration::from_secs(1)).unwrap();
        assert_eq!(client.base_url(), "http://localhost:5000");
        assert_eq!(
            client.url_for(&Request::Play { index: 2 }),
            "http://localhost:5000/play?index=2"
        );
        assert_eq!(
            client.url_for(&Request::Enqueue {
                url: "https://www.twitch.tv/videos/1234567890".into()
            }),
            "http://localhost:5000/req?u=https%3A%2F%2Fwww.twitch.tv%2Fvideos%2F1234567890"
        );
    }

    #[test]
    fn test_config_base_url() {
        let cfg = ServiceConfig {
            host: "127.0.0.1".into(),
            port: 5055,
            request_timeout_secs: 0,
        };
        let client = ServiceClient::new(&cfg).unwrap();
        assert_eq!(client.base_url(), "http://127.0.0.1:5055");
    }
}
