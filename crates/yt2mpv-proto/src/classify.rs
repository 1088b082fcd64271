//! Link classification: decides whether a URL is something the queue
//! service can play and what to tell the user about it.
//!
//! The rule table is ordered data: the first rule whose pattern matches
//! decides the outcome, later rules are never consulted.  Rules with an
//! expected identifier length reject matches whose first capture group has a
//! different length.

use std::sync::LazyLock;

use regex::Regex;

/// Icon shown alongside a classification message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Icon {
    YouTube,
    Twitch,
    Mpv,
}

impl Icon {
    /// Asset file name inside the configured icons directory.
    pub fn file_name(self) -> &'static str {
        match self {
            Icon::YouTube => "yt48.png",
            Icon::Twitch => "tw48.png",
            Icon::Mpv => "mpv48.png",
        }
    }

    /// Freedesktop icon name used when the asset file is missing.
    pub fn fallback_name(self) -> &'static str {
        match self {
            Icon::YouTube | Icon::Twitch => "video-x-generic",
            Icon::Mpv => "mpv",
        }
    }
}

#[derive(Debug, Clone)]
pub struct ClassificationRule {
    pub icon: Icon,
    pub pattern: Regex,
    pub expected_id_len: Option<usize>,
}

impl ClassificationRule {
    pub fn new(icon: Icon, pattern: &str, expected_id_len: Option<usize>) -> Result<Self, regex::Error> {
        Ok(Self {
            icon,
            pattern: Regex::new(pattern)?,
            expected_id_len,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    /// No rule matched.
    Unknown,
    /// A rule matched but the identifier had the wrong length.
    InvalidId,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classification {
    Accepted {
        canonical_url: String,
        message: String,
        icon: Icon,
    },
    Rejected {
        url: String,
        reason: RejectReason,
        message: String,
        icon: Icon,
    },
}

impl Classification {
    pub fn accepted(&self) -> bool {
        matches!(self, Classification::Accepted { .. })
    }

    /// Matched URL when accepted, the input unchanged when rejected.
    pub fn canonical_url(&self) -> &str {
        match self {
            Classification::Accepted { canonical_url, .. } => canonical_url,
            Classification::Rejected { url, .. } => url,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            Classification::Accepted { message, .. } | Classification::Rejected { message, .. } => {
                message
            }
        }
    }

    pub fn icon(&self) -> Icon {
        match self {
            Classification::Accepted { icon, .. } | Classification::Rejected { icon, .. } => *icon,
        }
    }
}

const DEFAULT_RULES: &[(Icon, &str, Option<usize>)] = &[
    // youtube.com/watch?v=<id>[&... | #... | ?...]
    (Icon::YouTube, r"^.*youtube\.com/watch\?v=([a-zA-Z0-9_-]+)(?:[^a-zA-Z0-9_-].*)?$", Some(11)),
    // youtube.com/shorts/<id>
    (Icon::YouTube, r"^.*youtube\.com/shorts/([a-zA-Z0-9_-]+)$", Some(11)),
    // twitch.tv/<channel>
    (Icon::Twitch, r"^.*twitch\.tv/([^?/]+)$", None),
    // twitch.tv/videos/<digits>
    (Icon::Twitch, r"^.*twitch\.tv/videos/(\d+)$", Some(10)),
    // twitch.tv/<channel>/clip/<slug>
    (Icon::Twitch, r"^(.*twitch.tv/[^/]+/clip/.+)$", None),
];

static DEFAULT_CLASSIFIER: LazyLock<Classifier> = LazyLock::new(|| {
    let rules = DEFAULT_RULES
        .iter()
        .filter_map(|(icon, pattern, len)| match ClassificationRule::new(*icon, pattern, *len) {
            Ok(rule) => Some(rule),
            Err(e) => {
                tracing::error!("classify: bad built-in pattern {:?}: {}", pattern, e);
                None
            }
        })
        .collect();
    Classifier::new(rules)
});

/// Ordered rule evaluator.
#[derive(Debug, Clone)]
pub struct Classifier {
    rules: Vec<ClassificationRule>,
}

impl Classifier {
    pub fn new(rules: Vec<ClassificationRule>) -> Self {
        Self { rules }
    }

    /// The built-in YouTube/Twitch table.
    pub fn builtin() -> &'static Classifier {
        &DEFAULT_CLASSIFIER
    }

    pub fn rules(&self) -> &[ClassificationRule] {
        &self.rules
    }

    pub fn classify(&self, url: &str) -> Classification {
        for rule in &self.rules {
            let Some(caps) = rule.pattern.captures(url) else {
                continue;
            };

            if let Some(expected) = rule.expected_id_len {
                let id_len = caps.get(1).map(|m| m.as_str().chars().count());
                if id_len != Some(expected) {
                    let message = format!("invalid url({})", url);
                    tracing::debug!("classify: {}", message);
                    return Classification::Rejected {
                        url: url.to_string(),
                        reason: RejectReason::InvalidId,
                        message,
                        icon: rule.icon,
                    };
                }
            }

            // Group 0 always exists for a successful match.
            let canonical_url = caps.get(0).map_or(url, |m| m.as_str()).to_string();
            let message = format!("{} video just added", canonical_url);
            tracing::debug!("classify: {}", message);
            return Classification::Accepted {
                canonical_url,
                message,
                icon: rule.icon,
            };
        }

        Classification::Rejected {
            url: url.to_string(),
            reason: RejectReason::Unknown,
            message: "unknown url".to_string(),
            icon: Icon::Mpv,
        }
    }
}

/// Classify `url` against the built-in rule table.
pub fn classify(url: &str) -> Classification {
    Classifier::builtin().classify(url)
}
