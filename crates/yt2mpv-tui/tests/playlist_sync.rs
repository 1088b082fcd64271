//! Drives `Session` against the fake service over real HTTP.

mod common;

use serde_json::json;
use yt2mpv_tui::controller::Phase;
use yt2mpv_tui::session::{Session, SessionError};

use common::{client, dead_url, spawn_fake, two_entries};

#[tokio::test]
async fn healthy_service_loads_playlist_once() {
    let (url, fake) = spawn_fake().await;
    fake.set_playlist(two_entries());

    let session = Session::open(client(&url)).await.unwrap();
    assert_eq!(session.controller().phase(), Phase::Ready);
    assert_eq!(fake.hits("/healthz"), 1);
    assert_eq!(fake.hits("/playlist"), 1);

    let rows = session.rows();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].id, "1");
    assert_eq!(rows[0].title, "x.mp4");
    assert!(rows[0].current);
    assert_eq!(rows[0].play, None);
    assert_eq!(rows[1].title, "Y");
    assert_eq!(rows[1].thumbnail.as_deref(), Some("https://i.ytimg.com/vi/y/hq.jpg"));
    assert_eq!(rows[1].play, Some(1));
}

#[tokio::test]
async fn unhealthy_service_never_touches_playlist() {
    let (url, fake) = spawn_fake().await;
    fake.set_health(500);

    let err = Session::open(client(&url)).await.err();
    assert_eq!(err, Some(SessionError::Unavailable("server is down".into())));
    assert_eq!(fake.hits("/healthz"), 1);
    assert_eq!(fake.hits("/playlist"), 0);
}

#[tokio::test]
async fn health_200_is_not_healthy() {
    let (url, fake) = spawn_fake().await;
    fake.set_health(200);
    assert!(Session::open(client(&url)).await.is_err());
    assert_eq!(fake.hits("/playlist"), 0);
}

#[tokio::test]
async fn unreachable_service_is_unavailable() {
    let url = dead_url().await;
    let err = Session::open(client(&url)).await.err();
    assert!(matches!(err, Some(SessionError::Unavailable(_))));
}

#[tokio::test]
async fn refresh_replaces_snapshot() {
    let (url, fake) = spawn_fake().await;
    fake.set_playlist(two_entries());
    let mut session = Session::open(client(&url)).await.unwrap();

    fake.set_playlist(json!([{"id": 9, "filename": "z.mkv", "current": true}]));
    session.refresh().await.unwrap();

    let ids: Vec<String> = session.rows().into_iter().map(|r| r.id).collect();
    assert_eq!(ids, vec!["9"]);
    assert_eq!(fake.hits("/playlist"), 2);
}

#[tokio::test]
async fn failed_refresh_keeps_previous_rows() {
    let (url, fake) = spawn_fake().await;
    fake.set_playlist(two_entries());
    let mut session = Session::open(client(&url)).await.unwrap();
    let before = session.rows();

    fake.set_playlist_status(500);
    let err = session.refresh().await.unwrap_err();
    assert!(matches!(err, SessionError::Failed(_)));
    assert_eq!(session.rows(), before);
    assert!(!session.controller().is_busy());
}

#[tokio::test]
async fn successful_play_triggers_exactly_one_refresh() {
    let (url, fake) = spawn_fake().await;
    fake.set_playlist(two_entries());
    let mut session = Session::open(client(&url)).await.unwrap();

    session.play_index(1).await.unwrap();
    assert_eq!(fake.hits("/play"), 1);
    assert_eq!(fake.hits("/playlist"), 2);
    assert_eq!(fake.queries(), vec!["/play?index=1"]);
}

#[tokio::test]
async fn refused_play_triggers_no_refresh() {
    let (url, fake) = spawn_fake().await;
    fake.set_playlist(two_entries());
    let mut session = Session::open(client(&url)).await.unwrap();

    fake.set_reply(json!({"error": true, "message": "invalid index"}));
    let err = session.play_index(1).await.unwrap_err();
    assert_eq!(err, SessionError::Failed("/play refused: invalid index".into()));
    assert_eq!(fake.hits("/play"), 1);
    assert_eq!(fake.hits("/playlist"), 1);
    assert!(session.controller().accepts_input());
}

#[tokio::test]
async fn control_and_remove_encode_their_parameters() {
    let (url, fake) = spawn_fake().await;
    fake.set_playlist(two_entries());
    let mut session = Session::open(client(&url)).await.unwrap();

    session.control("pause").await.unwrap();
    session.remove("2").await.unwrap();
    assert_eq!(fake.queries(), vec!["/control?action=pause", "/remove?id=2"]);
    assert_eq!(fake.hits("/playlist"), 3);
}

#[tokio::test]
async fn inert_triggers_make_no_requests() {
    let (url, fake) = spawn_fake().await;
    fake.set_playlist(two_entries());
    let mut session = Session::open(client(&url)).await.unwrap();
    let before = fake.total_hits();

    // Current entry has no play affordance; unknown ids cannot be removed.
    assert_eq!(session.play_index(0).await, Err(SessionError::Inert));
    assert_eq!(session.play_index(5).await, Err(SessionError::Inert));
    assert_eq!(session.remove("77").await, Err(SessionError::Inert));
    assert_eq!(fake.total_hits(), before);
}
