//! Wire contract of the mpv queue service.
//!
//! Every route is a plain `GET`; everything except `/healthz` answers with
//! JSON.  Command routes reply `{"error": "success"}` on success and either a
//! different string or `{"error": true, "message": ...}` otherwise.

use serde::{Deserialize, Deserializer, Serialize};

/// Value of the `error` field that means the command went through.
pub const SUCCESS: &str = "success";

/// One request the client can make against the service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    Healthz,
    Enqueue { url: String },
    Playlist,
    Play { index: usize },
    Control { action: String },
    Remove { id: String },
}

impl Request {
    /// Route path without the query string.
    pub fn route(&self) -> &'static str {
        match self {
            Request::Healthz => "/healthz",
            Request::Enqueue { .. } => "/req",
            Request::Playlist => "/playlist",
            Request::Play { .. } => "/play",
            Request::Control { .. } => "/control",
            Request::Remove { .. } => "/remove",
        }
    }

    /// Path plus percent-encoded query, ready to append to the base URL.
    pub fn path_and_query(&self) -> String {
        match self {
            Request::Healthz | Request::Playlist => self.route().to_string(),
            Request::Enqueue { url } => format!("/req?u={}", urlencoding::encode(url)),
            Request::Play { index } => format!("/play?index={}", index),
            Request::Control { action } => {
                format!("/control?action={}", urlencoding::encode(action))
            }
            Request::Remove { id } => format!("/remove?id={}", urlencoding::encode(id)),
        }
    }
}

/// The `error` field comes in two shapes depending on which layer answered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ErrorField {
    Status(String),
    Flag(bool),
}

/// Reply body of `/req`, `/play`, `/control` and `/remove`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Reply {
    #[serde(default)]
    pub error: Option<ErrorField>,
    #[serde(default)]
    pub message: Option<String>,
}

impl Reply {
    pub fn success() -> Self {
        Self {
            error: Some(ErrorField::Status(SUCCESS.to_string())),
            message: None,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(&self.error, Some(ErrorField::Status(s)) if s == SUCCESS)
    }

    /// Human-readable reason for a non-success reply.
    pub fn reason(&self) -> String {
        if let Some(msg) = self.message.as_deref().filter(|m| !m.is_empty()) {
            return msg.to_string();
        }
        match &self.error {
            Some(ErrorField::Status(s)) => s.clone(),
            Some(ErrorField::Flag(_)) => "service reported an error".to_string(),
            None => "missing status".to_string(),
        }
    }
}

/// One element of the `/playlist` array, in server order.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PlaylistItem {
    #[serde(deserialize_with = "id_as_string")]
    pub id: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub filename: String,
    #[serde(default)]
    pub thumbnail: Option<String>,
    #[serde(default)]
    pub current: bool,
    #[serde(default)]
    pub playing: bool,
}

/// The service hands out numeric ids; the client treats them as opaque text.
fn id_as_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Int(i64),
        Text(String),
    }

    Ok(match RawId::deserialize(deserializer)? {
        RawId::Int(n) => n.to_string(),
        RawId::Text(s) => s,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enqueue_url_is_percent_encoded() {
        let req = Request::Enqueue {
            url: "https://www.youtube.com/watch?v=dQw4w9WgXcQ&t=1 s".to_string(),
        };
        assert_eq!(
            req.path_and_query(),
            "/req?u=https%3A%2F%2Fwww.youtube.com%2Fwatch%3Fv%3DdQw4w9WgXcQ%26t%3D1%20s"
        );
    }

    #[test]
    fn test_command_paths() {
        assert_eq!(Request::Play { index: 3 }.path_and_query(), "/play?index=3");
        assert_eq!(
            Request::Control { action: "pause".into() }.path_and_query(),
            "/control?action=pause"
        );
        assert_eq!(Request::Playlist.path_and_query(), "/playlist");
    }

    #[test]
    fn test_reply_shapes() {
        let ok: Reply = serde_json::from_str(r#"{"error":"success","request_id":0}"#).unwrap();
        assert!(ok.is_success());

        let mpv_err: Reply = serde_json::from_str(r#"{"error":"invalid parameter"}"#).unwrap();
        assert!(!mpv_err.is_success());
        assert_eq!(mpv_err.reason(), "invalid parameter");

        let svc_err: Reply =
            serde_json::from_str(r#"{"error":true,"message":"invalid index"}"#).unwrap();
        assert!(!svc_err.is_success());
        assert_eq!(svc_err.reason(), "invalid index");

        let empty: Reply = serde_json::from_str("{}").unwrap();
        assert!(!empty.is_success());
    }

    #[test]
    fn test_playlist_item_accepts_numeric_and_text_ids() {
        let items: Vec<PlaylistItem> = serde_json::from_str(
            r#"[
                {"id":1,"filename":"x.mp4","current":true,"playing":true,"title":"","thumbnail":""},
                {"id":"b","title":"Y","current":false}
            ]"#,
        )
        .unwrap();
        assert_eq!(items[0].id, "1");
        assert!(items[0].current);
        assert_eq!(items[1].id, "b");
        assert_eq!(items[1].title.as_deref(), Some("Y"));
        assert_eq!(items[1].filename, "");
    }
}
