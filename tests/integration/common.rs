//! Common utilities for integration tests

use assert_cmd::Command;
use std::path::Path;
use updater::checksum::checksum_bytes;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub fn updater_command(config: &Path) -> Command {
    let mut cmd = Command::cargo_bin("updater").unwrap();
    cmd.env_remove("UPDATER_CONFIG")
        .env_remove("RUST_LOG")
        .arg("--config")
        .arg(config);
    cmd
}

/// A file published by the test origin
pub struct Published {
    /// URL path below the origin, e.g. `/cdn/assets/a.txt`
    pub path: String,
    pub body: Vec<u8>,
}

impl Published {
    pub fn new(path: &str, body: &[u8]) -> Self {
        Self {
            path: path.to_string(),
            body: body.to_vec(),
        }
    }
}

/// Serve a manifest at `/{user}/{repo}/{branch}/{manifest}.json` listing
/// `files` by absolute URL, and serve every file body.
pub async fn publish(
    server: &MockServer,
    user: &str,
    repo: &str,
    branch: &str,
    manifest: &str,
    files: &[Published],
) {
    let entries: Vec<String> = files
        .iter()
        .map(|file| {
            format!(
                r#"{{"sha": "{}", "url": "{}{}"}}"#,
                checksum_bytes(&file.body),
                server.uri(),
                file.path
            )
        })
        .collect();
    publish_manifest(
        server,
        &format!("/{}/{}/{}/{}.json", user, repo, branch, manifest),
        &format!("[{}]", entries.join(",")),
    )
    .await;

    for file in files {
        serve_file(server, &file.path, &file.body).await;
    }
}

/// Serve a file body at `url_path`.
pub async fn serve_file(server: &MockServer, url_path: &str, body: &[u8]) {
    Mock::given(method("GET"))
        .and(path(url_path))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(body.to_vec()))
        .mount(server)
        .await;
}

/// Serve a raw manifest body for HEAD and GET at `manifest_path`.
pub async fn publish_manifest(server: &MockServer, manifest_path: &str, body: &str) {
    Mock::given(method("HEAD"))
        .and(path(manifest_path))
        .respond_with(ResponseTemplate::new(200))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path(manifest_path))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .mount(server)
        .await;
}

/// Number of GET requests the origin received for `url_path`.
pub async fn get_count(server: &MockServer, url_path: &str) -> usize {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .iter()
        .filter(|request| request.method.as_str() == "GET" && request.url.path() == url_path)
        .count()
}
