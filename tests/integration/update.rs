//! End-to-end updates through the real HTTP transport

use super::common::{get_count, publish, publish_manifest, serve_file, Published};
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;
use updater::checksum::checksum_bytes;
use updater::core::UpdaterError;
use updater::di::mocks::RecordingObserver;
use updater::http::HttpTransport;
use updater::{DependencyEntry, UpdateSession};
use wiremock::MockServer;

fn session(server: &MockServer) -> UpdateSession {
    let transport =
        HttpTransport::with_settings(&format!("{}/", server.uri()), Duration::from_secs(5))
            .unwrap();
    UpdateSession::new(Arc::new(transport))
}

fn entry(repo: &str, root: &TempDir) -> DependencyEntry {
    DependencyEntry::new("octo", repo, "assets").with_install_root(root.path())
}

#[tokio::test]
async fn test_update_downloads_and_verifies() {
    let server = MockServer::start().await;
    let temp = TempDir::new().unwrap();
    publish(
        &server,
        "octo",
        "game",
        "master",
        "assets",
        &[
            Published::new("/cdn/assets/a.txt", b"first"),
            Published::new("/cdn/assets/img/b.png", &[0u8, 1, 2, 3, 4, 5]),
        ],
    )
    .await;

    let observer = Arc::new(RecordingObserver::new());
    let session = session(&server);
    session
        .register(entry("game", &temp).with_observer(observer.clone()))
        .unwrap();

    let report = session.try_update(2).await.unwrap();
    assert_eq!(report.total_files(), 2);
    assert_eq!(report.downloaded(), 2);

    assert_eq!(
        std::fs::read(temp.path().join("assets/a.txt")).unwrap(),
        b"first"
    );
    assert_eq!(
        std::fs::read(temp.path().join("assets/img/b.png")).unwrap(),
        vec![0u8, 1, 2, 3, 4, 5]
    );
    assert!(!observer
        .events_for(&temp.path().join("assets/img/b.png"))
        .is_empty());
}

#[tokio::test]
async fn test_second_run_is_a_no_op() {
    let server = MockServer::start().await;
    let temp = TempDir::new().unwrap();
    publish(
        &server,
        "octo",
        "game",
        "master",
        "assets",
        &[Published::new("/cdn/assets/a.txt", b"stable content")],
    )
    .await;

    let session = session(&server);
    session.register(entry("game", &temp)).unwrap();

    assert!(session.update(2).await);
    let first = std::fs::read(temp.path().join("assets/a.txt")).unwrap();

    let report = session.try_update(2).await.unwrap();
    assert_eq!(report.downloaded(), 0);
    assert_eq!(
        std::fs::read(temp.path().join("assets/a.txt")).unwrap(),
        first
    );
    assert_eq!(get_count(&server, "/cdn/assets/a.txt").await, 1);
}

#[tokio::test]
async fn test_relative_urls_resolve_against_base() {
    let server = MockServer::start().await;
    let temp = TempDir::new().unwrap();
    let body = b"relative";

    publish_manifest(
        &server,
        "/octo/game/master/assets.json",
        &format!(
            r#"[{{"sha": "{}", "url": "cdn/assets/r.txt"}}]"#,
            checksum_bytes(body)
        ),
    )
    .await;
    serve_file(&server, "/cdn/assets/r.txt", body).await;

    let session = session(&server);
    session.register(entry("game", &temp)).unwrap();

    assert!(session.update(2).await);
    assert_eq!(
        std::fs::read(temp.path().join("assets/r.txt")).unwrap(),
        body
    );
}

#[tokio::test]
async fn test_missing_manifest_stops_the_run() {
    let server = MockServer::start().await;
    let temp = TempDir::new().unwrap();
    publish(
        &server,
        "octo",
        "one",
        "master",
        "assets",
        &[Published::new("/cdn/one/assets/a.txt", b"a")],
    )
    .await;
    publish(
        &server,
        "octo",
        "three",
        "master",
        "assets",
        &[Published::new("/cdn/three/assets/c.txt", b"c")],
    )
    .await;

    let session = session(&server);
    for repo in ["one", "two", "three"] {
        session.register(entry(repo, &temp)).unwrap();
    }

    let err = session.try_update(2).await.unwrap_err();
    assert!(matches!(err, UpdaterError::ManifestNotFound(name) if name == "assets"));

    assert!(temp.path().join("assets/a.txt").exists());
    assert!(!temp.path().join("assets/c.txt").exists());
    assert_eq!(get_count(&server, "/octo/three/master/assets.json").await, 0);
}

#[tokio::test]
async fn test_malformed_manifest() {
    let server = MockServer::start().await;
    let temp = TempDir::new().unwrap();
    publish_manifest(&server, "/octo/game/master/assets.json", r#"{"not": "a list"}"#).await;

    let session = session(&server);
    session.register(entry("game", &temp)).unwrap();

    let err = session.try_update(2).await.unwrap_err();
    assert!(matches!(err, UpdaterError::InvalidManifestSchema(_)));
}

#[tokio::test]
async fn test_unreachable_origin() {
    let temp = TempDir::new().unwrap();
    let transport =
        HttpTransport::with_settings("http://127.0.0.1:9/", Duration::from_secs(2)).unwrap();
    let session = UpdateSession::new(Arc::new(transport));
    session.register(entry("game", &temp)).unwrap();

    let err = session.try_update(2).await.unwrap_err();
    assert!(matches!(err, UpdaterError::ServiceUnavailable));
}

#[tokio::test]
async fn test_corrupted_file_keeps_previous_version() {
    let server = MockServer::start().await;
    let temp = TempDir::new().unwrap();

    // Manifest promises one payload, the origin serves another
    publish_manifest(
        &server,
        "/octo/game/master/assets.json",
        &format!(
            r#"[{{"sha": "{}", "url": "{}/cdn/assets/a.txt"}}]"#,
            checksum_bytes(b"promised"),
            server.uri()
        ),
    )
    .await;
    serve_file(&server, "/cdn/assets/a.txt", b"tampered").await;

    std::fs::create_dir_all(temp.path().join("assets")).unwrap();
    std::fs::write(temp.path().join("assets/a.txt"), b"previous").unwrap();

    let session = session(&server);
    session.register(entry("game", &temp)).unwrap();

    let err = session.try_update(2).await.unwrap_err();
    assert!(matches!(err, UpdaterError::ChecksumMismatch(_)));
    assert_eq!(
        std::fs::read(temp.path().join("assets/a.txt")).unwrap(),
        b"previous"
    );
}
