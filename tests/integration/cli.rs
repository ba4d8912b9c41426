//! Tests for the `updater` command line

use super::common::{publish, updater_command, Published};
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;
use updater::checksum::checksum_bytes;
use updater::config::Config;
use wiremock::MockServer;

#[test]
fn test_list_creates_default_config() {
    let temp = TempDir::new().unwrap();
    let config = temp.path().join("config.yaml");

    updater_command(&config)
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("No dependencies configured."));

    assert!(config.exists());
}

#[test]
fn test_add_then_list() {
    let temp = TempDir::new().unwrap();
    let config = temp.path().join("config.yaml");

    updater_command(&config)
        .args(["add", "octo", "game", "assets", "--env", "assets/img"])
        .assert()
        .success()
        .stdout(predicate::str::contains("octo/game@master:assets"));

    updater_command(&config)
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("octo/game@master:assets [assets/img]"));

    let saved = Config::load_from(&config).unwrap();
    assert_eq!(saved.dependencies.len(), 1);
    assert_eq!(
        saved.dependencies[0].environment,
        Some(vec!["assets/img".to_string()])
    );
}

#[test]
fn test_add_duplicate_fails() {
    let temp = TempDir::new().unwrap();
    let config = temp.path().join("config.yaml");

    updater_command(&config)
        .args(["add", "octo", "game", "assets"])
        .assert()
        .success();

    updater_command(&config)
        .args(["add", "octo", "game", "assets"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already registered"));

    // A different branch is a different dependency
    updater_command(&config)
        .args(["add", "octo", "game", "assets", "--branch", "dev"])
        .assert()
        .success();
}

#[test]
fn test_update_without_dependencies_fails() {
    let temp = TempDir::new().unwrap();
    let config = temp.path().join("config.yaml");

    updater_command(&config)
        .arg("update")
        .assert()
        .failure()
        .stderr(predicate::str::contains("No dependencies registered"))
        .stderr(predicate::str::contains("updater add"));
}

#[test]
fn test_checksum_prints_hex_digest() {
    let temp = TempDir::new().unwrap();
    let config = temp.path().join("config.yaml");
    let file = temp.path().join("data.bin");
    fs::write(&file, b"abc").unwrap();

    updater_command(&config)
        .arg("checksum")
        .arg(&file)
        .assert()
        .success()
        .stdout(predicate::str::starts_with(checksum_bytes(b"abc")));
}

#[test]
fn test_checksum_of_missing_file_fails() {
    let temp = TempDir::new().unwrap();
    let config = temp.path().join("config.yaml");

    updater_command(&config)
        .arg("checksum")
        .arg(temp.path().join("absent.bin"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("is not a file"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_update_end_to_end() {
    let server = MockServer::start().await;
    publish(
        &server,
        "octo",
        "game",
        "master",
        "assets",
        &[Published::new("/cdn/assets/a.txt", b"hello")],
    )
    .await;

    let temp = TempDir::new().unwrap();
    let install_root = temp.path().join("install");
    let config = temp.path().join("config.yaml");
    fs::write(
        &config,
        format!(
            r#"base_url: "{}/"
install_root: '{}'
dependencies:
  - username: octo
    repository: game
    manifest: assets
"#,
            server.uri(),
            install_root.display()
        ),
    )
    .unwrap();

    updater_command(&config)
        .args(["update", "-j", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("1 downloaded"));

    assert_eq!(
        fs::read(install_root.join("assets/a.txt")).unwrap(),
        b"hello"
    );

    // Nothing changed remotely, so nothing is downloaded again
    updater_command(&config)
        .arg("update")
        .assert()
        .success()
        .stdout(predicate::str::contains("0 downloaded"));
}
