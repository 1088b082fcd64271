use yt2mpv_proto::classify::{classify, Classification, Icon, RejectReason};

const ID_ALPHABET: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789-_";

/// Deterministic identifier of `len` characters drawn from the YouTube alphabet.
fn youtube_id(seed: usize, len: usize) -> String {
    let alphabet: Vec<char> = ID_ALPHABET.chars().collect();
    (0..len)
        .map(|i| alphabet[(seed * 7 + i * 13) % alphabet.len()])
        .collect()
}

fn watch_prefixes() -> Vec<&'static str> {
    vec![
        "https://www.youtube.com/watch?v=",
        "http://youtube.com/watch?v=",
        "https://m.youtube.com/watch?v=",
        "youtube.com/watch?v=",
    ]
}

#[test]
fn watch_urls_with_eleven_char_ids_are_accepted_verbatim() {
    for (seed, prefix) in watch_prefixes().into_iter().enumerate() {
        for suffix in ["", "&t=10s", "&list=PL123&index=4", "&"] {
            let url = format!("{}{}{}", prefix, youtube_id(seed, 11), suffix);
            let c = classify(&url);
            assert!(c.accepted(), "expected accept: {url}");
            assert_eq!(c.canonical_url(), url);
            assert_eq!(c.icon(), Icon::YouTube);
        }
    }
}

#[test]
fn watch_urls_followed_by_fragment_or_stray_query_are_accepted() {
    for (seed, prefix) in watch_prefixes().into_iter().enumerate() {
        for suffix in ["#t=30", "?si=abc", "/", "#"] {
            let url = format!("{}{}{}", prefix, youtube_id(seed, 11), suffix);
            let c = classify(&url);
            assert!(c.accepted(), "expected accept: {url}");
            assert_eq!(c.canonical_url(), url);
            assert_eq!(c.icon(), Icon::YouTube);
        }
    }

    // The separator ends the id; its length is still checked.
    let long = classify("https://www.youtube.com/watch?v=dQw4w9WgXcQQ#t=30");
    assert!(matches!(
        long,
        Classification::Rejected { reason: RejectReason::InvalidId, .. }
    ));
}

#[test]
fn watch_urls_with_other_id_lengths_are_rejected_with_url_in_message() {
    for (seed, prefix) in watch_prefixes().into_iter().enumerate() {
        for len in [1, 5, 10, 12, 20] {
            let url = format!("{}{}&t=3", prefix, youtube_id(seed, len));
            let c = classify(&url);
            assert!(!c.accepted(), "expected reject: {url}");
            assert!(c.message().contains(&url), "message {:?}", c.message());
        }
    }
}

#[test]
fn urls_matching_no_rule_are_unknown() {
    for url in [
        "https://example.com/",
        "https://vimeo.com/76979871",
        "https://www.youtube.com/playlist?list=PL123",
        "https://www.twitch.tv/",
        "ftp://files.local/movie.mkv",
        "",
    ] {
        match classify(url) {
            Classification::Rejected {
                reason: RejectReason::Unknown,
                message,
                icon,
                url: echoed,
            } => {
                assert_eq!(message, "unknown url");
                assert_eq!(icon, Icon::Mpv);
                assert_eq!(echoed, url);
            }
            other => panic!("{url}: unexpected {other:?}"),
        }
    }
}

#[test]
fn twitch_video_permalinks() {
    let ok = classify("https://www.twitch.tv/videos/1234567890");
    assert!(ok.accepted());
    assert_eq!(ok.canonical_url(), "https://www.twitch.tv/videos/1234567890");
    assert_eq!(ok.icon(), Icon::Twitch);

    let short = classify("https://www.twitch.tv/videos/12345");
    assert!(!short.accepted());
}

#[test]
fn classification_is_deterministic() {
    let url = "https://www.twitch.tv/somechannel/clip/Slug";
    assert_eq!(classify(url), classify(url));
}
