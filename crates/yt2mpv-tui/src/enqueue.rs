//! The "add to queue" flow: classify, enqueue, notify once.

use tracing::{info, warn};
use yt2mpv_proto::classify::{classify, Classification};
use yt2mpv_proto::protocol::Request;

use crate::client::Service;
use crate::notify::{Notification, Notifier, Urgency};

/// The link under the pointer wins over the page it sits on.
pub fn pick_target<'a>(link: Option<&'a str>, page: Option<&'a str>) -> &'a str {
    link.filter(|l| !l.is_empty())
        .or(page.filter(|p| !p.is_empty()))
        .unwrap_or("")
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnqueueOutcome {
    /// Classification refused the URL; nothing was sent.
    Rejected(Classification),
    Queued(Classification),
    /// The service refused or could not be reached.
    Failed {
        classification: Classification,
        reason: String,
    },
}

impl EnqueueOutcome {
    pub fn is_queued(&self) -> bool {
        matches!(self, EnqueueOutcome::Queued(_))
    }

    pub fn classification(&self) -> &Classification {
        match self {
            EnqueueOutcome::Rejected(c)
            | EnqueueOutcome::Queued(c)
            | EnqueueOutcome::Failed { classification: c, .. } => c,
        }
    }

    pub fn message(&self) -> String {
        match self {
            EnqueueOutcome::Rejected(c) | EnqueueOutcome::Queued(c) => c.message().to_string(),
            EnqueueOutcome::Failed {
                classification,
                reason,
            } => format!("failed to add {}: {}", classification.canonical_url(), reason),
        }
    }

    /// Queued links are routine; a refused or unreachable service is not.
    pub fn urgency(&self) -> Urgency {
        match self {
            EnqueueOutcome::Queued(_) => Urgency::Low,
            EnqueueOutcome::Rejected(_) => Urgency::Normal,
            EnqueueOutcome::Failed { .. } => Urgency::Critical,
        }
    }

    pub fn notification(&self, title: &str) -> Notification {
        Notification {
            title: title.to_string(),
            message: self.message(),
            icon: self.classification().icon(),
            urgency: self.urgency(),
        }
    }
}

/// Classify the target and, when accepted, ask the service to queue it.
/// Emits exactly one notification per call.
pub async fn add_to_queue<S, N>(
    service: &S,
    notifier: &N,
    title: &str,
    link: Option<&str>,
    page: Option<&str>,
) -> EnqueueOutcome
where
    S: Service + ?Sized,
    N: Notifier + ?Sized,
{
    let outcome = enqueue(service, pick_target(link, page)).await;
    notifier.notify(outcome.notification(title)).await;
    outcome
}

async fn enqueue<S: Service + ?Sized>(service: &S, target: &str) -> EnqueueOutcome {
    let classification = classify(target);
    if !classification.accepted() {
        info!("enqueue: rejected {:?}: {}", target, classification.message());
        return EnqueueOutcome::Rejected(classification);
    }

    let request = Request::Enqueue {
        url: classification.canonical_url().to_string(),
    };
    match service.command(&request).await {
        Ok(reply) if reply.is_success() => {
            info!("enqueue: queued {}", classification.canonical_url());
            EnqueueOutcome::Queued(classification)
        }
        Ok(reply) => {
            let reason = reply.reason();
            warn!("enqueue: service refused {}: {}", classification.canonical_url(), reason);
            EnqueueOutcome::Failed {
                classification,
                reason,
            }
        }
        Err(e) => {
            warn!("enqueue: {}", e);
            EnqueueOutcome::Failed {
                classification,
                reason: e.to_string(),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use yt2mpv_proto::classify::Icon;

    #[test]
    fn test_link_takes_precedence() {
        assert_eq!(pick_target(Some("l"), Some("p")), "l");
        assert_eq!(pick_target(None, Some("p")), "p");
        assert_eq!(pick_target(Some(""), Some("p")), "p");
        assert_eq!(pick_target(None, None), "");
    }

    #[test]
    fn test_failed_message_names_url_and_reason() {
        let outcome = EnqueueOutcome::Failed {
            classification: classify("https://www.twitch.tv/videos/1234567890"),
            reason: "invalid parameter".into(),
        };
        let n = outcome.notification("Add to MPV");
        assert_eq!(
            n.message,
            "failed to add https://www.twitch.tv/videos/1234567890: invalid parameter"
        );
        assert_eq!(n.icon, Icon::Twitch);
        assert_eq!(n.urgency, Urgency::Critical);
        assert_eq!(n.title, "Add to MPV");
        assert!(!outcome.is_queued());
    }

    #[test]
    fn test_queued_message_is_classification_message() {
        let url = "https://youtube.com/shorts/abcdefghijk";
        let outcome = EnqueueOutcome::Queued(classify(url));
        assert_eq!(outcome.message(), format!("{url} video just added"));
        assert_eq!(outcome.urgency(), Urgency::Low);
        assert!(outcome.is_queued());
        assert_eq!(EnqueueOutcome::Rejected(classify("")).urgency(), Urgency::Normal);
    }
}
