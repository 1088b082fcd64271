//! User-visible notifications for the enqueue flow.

use std::path::PathBuf;

use async_trait::async_trait;
use tokio::sync::mpsc;
use tracing::{debug, warn};
use yt2mpv_proto::classify::Icon;
use yt2mpv_proto::config::NotificationsConfig;
use yt2mpv_proto::platform;

/// Mirrors the `notify-send --urgency` levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Urgency {
    Low,
    Normal,
    Critical,
}

impl Urgency {
    pub fn as_arg(self) -> &'static str {
        match self {
            Urgency::Low => "low",
            Urgency::Normal => "normal",
            Urgency::Critical => "critical",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub title: String,
    pub message: String,
    pub icon: Icon,
    pub urgency: Urgency,
}

#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, notification: Notification);
}

/// Desktop popups through `notify-send`.
pub struct DesktopNotifier {
    binary: Option<PathBuf>,
    app_name: String,
    icons_dir: PathBuf,
    enabled: bool,
}

impl DesktopNotifier {
    pub fn new(config: &NotificationsConfig) -> Self {
        let binary = if config.enabled {
            platform::find_notify_send_binary()
        } else {
            None
        };
        if config.enabled && binary.is_none() {
            warn!("notify: notify-send not found, notifications go to the log only");
        }
        Self {
            binary,
            app_name: config.app_name.clone(),
            icons_dir: config.icons_dir.clone(),
            enabled: config.enabled,
        }
    }

    /// Asset path when present, otherwise a themed icon name.
    fn icon_arg(&self, icon: Icon) -> String {
        let asset = self.icons_dir.join(icon.file_name());
        if asset.exists() {
            asset.to_string_lossy().into_owned()
        } else {
            icon.fallback_name().to_string()
        }
    }

    /// `notify-send` arguments; title and message always follow `--`.
    fn command_args(&self, notification: &Notification) -> Vec<String> {
        vec![
            "-a".to_string(),
            self.app_name.clone(),
            "-i".to_string(),
            self.icon_arg(notification.icon),
            "-u".to_string(),
            notification.urgency.as_arg().to_string(),
            "--".to_string(),
            notification.title.clone(),
            notification.message.clone(),
        ]
    }
}

#[async_trait]
impl Notifier for DesktopNotifier {
    async fn notify(&self, notification: Notification) {
        debug!("notify: {} ({:?})", notification.message, notification.icon);
        let Some(binary) = self.binary.as_ref().filter(|_| self.enabled) else {
            return;
        };

        let status = tokio::process::Command::new(binary)
            .args(self.command_args(&notification))
            .stdout(std::process::Stdio::null())
            .stderr(std::process::Stdio::null())
            .status()
            .await;

        match status {
            Ok(s) if s.success() => {}
            Ok(s) => warn!("notify: notify-send exited with {}", s),
            Err(e) => warn!("notify: failed to run {:?}: {}", binary, e),
        }
    }
}

/// Hands notifications to the panel, which shows them as toasts.
pub struct ChannelNotifier {
    sender: mpsc::UnboundedSender<Notification>,
}

impl ChannelNotifier {
    pub fn new(sender: mpsc::UnboundedSender<Notification>) -> Self {
        Self { sender }
    }
}

#[async_trait]
impl Notifier for ChannelNotifier {
    async fn notify(&self, notification: Notification) {
        if self.sender.send(notification).is_err() {
            debug!("notify: receiver dropped");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_channel_notifier_forwards() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let n = Notification {
            title: "Add to MPV".into(),
            message: "unknown url".into(),
            icon: Icon::Mpv,
            urgency: Urgency::Normal,
        };
        ChannelNotifier::new(tx).notify(n.clone()).await;
        assert_eq!(rx.recv().await, Some(n));
    }

    #[test]
    fn test_icon_falls_back_to_theme_name() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("yt48.png"), b"png").unwrap();
        let notifier = DesktopNotifier::new(&NotificationsConfig {
            enabled: false,
            app_name: "Add to MPV".into(),
            icons_dir: dir.path().to_path_buf(),
        });
        assert!(notifier.icon_arg(Icon::YouTube).ends_with("yt48.png"));
        assert_eq!(notifier.icon_arg(Icon::Twitch), "video-x-generic");
    }

    #[test]
    fn test_positional_args_follow_option_terminator() {
        let dir = tempfile::tempdir().unwrap();
        let notifier = DesktopNotifier::new(&NotificationsConfig {
            enabled: false,
            app_name: "Add to MPV".into(),
            icons_dir: dir.path().to_path_buf(),
        });
        let args = notifier.command_args(&Notification {
            title: "Add to MPV".into(),
            message: "-youtube.com/watch?v=x: unknown url".into(),
            icon: Icon::Mpv,
            urgency: Urgency::Critical,
        });
        assert_eq!(
            args,
            vec![
                "-a",
                "Add to MPV",
                "-i",
                "mpv",
                "-u",
                "critical",
                "--",
                "Add to MPV",
                "-youtube.com/watch?v=x: unknown url",
            ]
        );
    }
}
