use std::path::{Path, PathBuf};

use tokio::sync::mpsc;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

pub const DEFAULT_FILTER: &str =
    "info,yt2mpv=debug,yt2mpv_tui=debug,yt2mpv_proto=debug,hyper_util=warn,reqwest=warn";

/// Log file inside `data_dir`.
pub fn log_path(data_dir: &Path) -> PathBuf {
    data_dir.join("yt2mpv.log")
}

/// Forwards WARN and ERROR events to the panel's status bar.
pub struct ForwardLayer {
    sender: mpsc::UnboundedSender<String>,
}

impl ForwardLayer {
    pub fn new(sender: mpsc::UnboundedSender<String>) -> Self {
        Self { sender }
    }
}

impl<S> tracing_subscriber::Layer<S> for ForwardLayer
where
    S: tracing::Subscriber,
{
    fn on_event(&self, event: &tracing::Event<'_>, _ctx: tracing_subscriber::layer::Context<'_, S>) {
        let level = event.metadata().level();
        if !matches!(*level, tracing::Level::WARN | tracing::Level::ERROR) {
            return;
        }

        let mut message = format!("{} [{}] ", chrono::Local::now().format("%H:%M:%S"), level);
        event.record(&mut MessageVisitor(&mut message));

        // Receiver gone means the panel is shutting down
        let _ = self.sender.send(message);
    }
}

struct MessageVisitor<'a>(&'a mut String);

impl tracing::field::Visit for MessageVisitor<'_> {
    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        if field.name() == "message" {
            self.0.push_str(&format!("{:?}", value));
        } else {
            self.0.push_str(&format!(" {}={:?}", field.name(), value));
        }
    }
}

/// Install the global subscriber: an append-only file writer plus, for the
/// interactive panel, the forwarding layer.  Returns the log file path.
pub fn init(data_dir: &Path, forward: Option<mpsc::UnboundedSender<String>>) -> anyhow::Result<PathBuf> {
    std::fs::create_dir_all(data_dir)?;
    let path = log_path(data_dir);

    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)?;

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(log_file)
        .with_ansi(false);

    tracing_subscriber::registry()
        .with(fmt_layer)
        .with(forward.map(ForwardLayer::new))
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(DEFAULT_FILTER)),
        )
        .try_init()?;

    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing_subscriber::layer::SubscriberExt;

    #[test]
    fn test_forward_layer_only_passes_warnings() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let subscriber = tracing_subscriber::registry().with(ForwardLayer::new(tx));

        tracing::subscriber::with_default(subscriber, || {
            tracing::info!("quiet");
            tracing::warn!(route = "/play", "play refused");
            tracing::error!("boom");
        });

        let first = rx.try_recv().unwrap();
        assert!(first.contains("[WARN] play refused route=\"/play\""), "{first}");
        assert!(rx.try_recv().unwrap().contains("[ERROR] boom"));
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_log_path() {
        assert!(log_path(Path::new("/tmp/x")).ends_with("yt2mpv.log"));
    }
}
