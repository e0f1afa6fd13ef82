//! Stamps the build with the commit it was made from and when it was made.

use std::process::Command;

fn main() {
    let commit = git_commit().unwrap_or_else(|| "unknown".to_string());
    let timestamp = chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Secs, true);

    println!("cargo:rustc-env=IMAGEVIEWER_COMMIT_HASH={}", commit);
    println!("cargo:rustc-env=IMAGEVIEWER_BUILD_TIMESTAMP={}", timestamp);

    println!("cargo:rerun-if-env-changed=IMAGEVIEWER_COMMIT_HASH");
    println!("cargo:rerun-if-changed=../../.git/HEAD");
    println!("cargo:rerun-if-changed=../../.git/refs");
}

fn git_commit() -> Option<String> {
    if let Ok(hash) = std::env::var("IMAGEVIEWER_COMMIT_HASH") {
        if !hash.trim().is_empty() {
            return Some(hash.trim().to_string());
        }
    }

    let output = Command::new("git")
        .args(["rev-parse", "--short=10", "HEAD"])
        .output()
        .ok()?;
    if !output.status.success() {
        return None;
    }
    let hash = String::from_utf8(output.stdout).ok()?;
    let hash = hash.trim();
    (!hash.is_empty()).then(|| hash.to_string())
}
