use std::process::Command;
use std::time::{SystemTime, UNIX_EPOCH};

/// `git describe` without the leading `v`; dirty trees get a build stamp.
fn git_version() -> Option<String> {
    let output = Command::new("git")
        .args(["describe", "--tags", "--always", "--dirty"])
        .output()
        .ok()
        .filter(|o| o.status.success())?;

    let described = String::from_utf8(output.stdout).ok()?;
    let described = described.trim();
    let version = described.strip_prefix('v').unwrap_or(described);
    if version.is_empty() {
        return None;
    }

    if version.ends_with("-dirty") {
        let stamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or_default();
        Some(format!("{}-{}", version, stamp))
    } else {
        Some(version.to_string())
    }
}

fn main() {
    println!("cargo:rerun-if-changed=.git/HEAD");
    println!("cargo:rerun-if-changed=.git/index");
    println!("cargo:rerun-if-changed=src/release/releases.json");

    // Source tarballs have no git metadata
    let version = git_version().unwrap_or_else(|| env!("CARGO_PKG_VERSION").to_string());
    println!("cargo:rustc-env=ZEN_DL_VERSION={}", version);
}
