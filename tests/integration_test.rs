use assert_cmd::Command;
use assert_cmd::cargo;
use mockito::Server;
use predicates::prelude::*;
use std::path::Path;
use tempfile::tempdir;

const OFFICIAL: &str = "https://github.com/zen-browser/desktop/releases/latest/download";

/// A zen-dl command whose history and downloads stay inside `dir`.
fn zen_dl(dir: &Path) -> Command {
    let mut cmd = Command::new(cargo::cargo_bin!("zen-dl"));
    cmd.env_remove("ZEN_DL_BASE_URL")
        .env_remove("ZEN_DL_CATALOG")
        .env("ZEN_DL_HISTORY", dir.join("downloads.jsonl"))
        .env("ZEN_DL_OUTPUT_DIR", dir.join("out"));
    cmd
}

#[test]
fn test_targets_lists_every_download() {
    let dir = tempdir().unwrap();

    zen_dl(dir.path())
        .arg("targets")
        .assert()
        .success()
        .stdout(predicate::str::contains(format!("{}/zen.installer.exe", OFFICIAL)))
        .stdout(predicate::str::contains("Linux 32-bit AppImage"))
        .stdout(predicate::str::contains("zen.macos-aarch64.dmg"))
        .stdout(predicate::str::contains("zen.flatpak"));
}

#[test]
fn test_resolve_prints_url() {
    let dir = tempdir().unwrap();

    zen_dl(dir.path())
        .args(["resolve", "--platform", "macos", "--arch", "aarch64"])
        .assert()
        .success()
        .stdout(format!("{}/zen.macos-aarch64.dmg\n", OFFICIAL));
}

#[test]
fn test_resolve_flatpak_on_32_bit_falls_back_to_portable() {
    let dir = tempdir().unwrap();

    zen_dl(dir.path())
        .args([
            "resolve", "--platform", "linux", "--arch", "32-bit", "--package", "flatpak",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("zen.linux-generic.tar.bz2"))
        .stderr(predicate::str::contains("only available for 64-bit"));
}

#[test]
fn test_resolve_rejects_unknown_architecture_for_platform() {
    let dir = tempdir().unwrap();

    zen_dl(dir.path())
        .args(["resolve", "--platform", "windows", "--arch", "aarch64"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("aarch64 is not available for Windows"));
}

#[test]
fn test_resolve_uses_base_url_env() {
    let dir = tempdir().unwrap();

    zen_dl(dir.path())
        .env("ZEN_DL_BASE_URL", "https://mirror.example.com/zen/")
        .args(["resolve", "-p", "windows", "-a", "32-bit", "-t", "portable"])
        .assert()
        .success()
        .stdout("https://mirror.example.com/zen/zen.win-generic.zip\n");
}

#[test]
fn test_custom_catalog_with_gap_fails() {
    let dir = tempdir().unwrap();
    let catalog = dir.path().join("catalog.json");
    std::fs::write(
        &catalog,
        r#"{"releases": {"macos": {"arm": "macos-aarch64", "x64": "macos-x64"}}, "files": {}}"#,
    )
    .unwrap();

    zen_dl(dir.path())
        .arg("--catalog")
        .arg(&catalog)
        .arg("targets")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Configuration gap"));
}

#[test]
fn test_wizard_from_stdin() {
    let dir = tempdir().unwrap();

    // Windows, default 64-bit, then portable
    zen_dl(dir.path())
        .args(["wizard", "--no-download"])
        .write_stdin("1\n\n\n2\n\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Choose the platform you want to download Zen for."))
        .stdout(predicate::str::contains(format!("{}/zen.win-specific.zip", OFFICIAL)))
        .stdout(predicate::str::contains("Downloaded!"));

    zen_dl(dir.path())
        .arg("history")
        .assert()
        .success()
        .stdout(predicate::str::contains("windows-specific"));
}

#[test]
fn test_wizard_seeded_from_user_agent() {
    let dir = tempdir().unwrap();

    // Accept the detected MacOS and the default Intel build
    zen_dl(dir.path())
        .args(["wizard", "--no-download", "--user-agent"])
        .arg("Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) Gecko/20100101 Firefox/128.0")
        .write_stdin("\n\n")
        .assert()
        .success()
        .stdout(predicate::str::contains(format!("{}/zen.macos-x64.dmg", OFFICIAL)));
}

#[test]
fn test_wizard_quit() {
    let dir = tempdir().unwrap();

    zen_dl(dir.path())
        .args(["wizard", "--no-download"])
        .write_stdin("2\nq\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("No download selected."));

    zen_dl(dir.path())
        .arg("history")
        .assert()
        .success()
        .stdout(predicate::str::contains("No downloads recorded."));
}

#[test]
fn test_end_to_end_download() {
    let mut server = Server::new();
    let mock = server
        .mock("GET", "/zen-specific.AppImage")
        .with_status(200)
        .with_body("appimage bytes")
        .create();
    let dir = tempdir().unwrap();

    zen_dl(dir.path())
        .arg("--base-url")
        .arg(server.url())
        .args(["resolve", "-p", "linux", "-t", "AppImage", "--download"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Saved to"));

    mock.assert();
    let saved = dir.path().join("out").join("zen-specific.AppImage");
    assert_eq!(std::fs::read_to_string(saved).unwrap(), "appimage bytes");
    assert!(!dir.path().join("out").join("zen-specific.AppImage.part").exists());

    zen_dl(dir.path())
        .arg("history")
        .assert()
        .success()
        .stdout(predicate::str::contains("linux-appimage-specific"));
}

#[test]
fn test_download_not_found_fails_without_leftovers() {
    let mut server = Server::new();
    let _mock = server
        .mock("GET", "/zen.macos-x64.dmg")
        .with_status(404)
        .create();
    let dir = tempdir().unwrap();

    zen_dl(dir.path())
        .arg("--base-url")
        .arg(server.url())
        .args(["resolve", "-p", "macos", "--download"])
        .assert()
        .failure();

    assert!(!dir.path().join("out").join("zen.macos-x64.dmg").exists());
    assert!(!dir.path().join("out").join("zen.macos-x64.dmg.part").exists());
}
