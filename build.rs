//! Build metadata for `litebatch --version` and `BuildInfo`.
//!
//! Emits `GIT_HASH`, `BUILD_TIME` (unix seconds, `SOURCE_DATE_EPOCH` when set)
//! and `RUST_VERSION`.

use std::env;
use std::process::Command;
use std::time::{SystemTime, UNIX_EPOCH};

const UNKNOWN: &str = "unknown";

fn main() {
    let git_hash = run("git", &["rev-parse", "--short=10", "HEAD"]);
    println!("cargo:rustc-env=GIT_HASH={}", git_hash.as_deref().unwrap_or(UNKNOWN));

    println!("cargo:rustc-env=BUILD_TIME={}", build_time());

    // Cargo hands build scripts the compiler it will use.
    let rustc = env::var("RUSTC").unwrap_or_else(|_| "rustc".to_string());
    let rust_version = run(&rustc, &["--version"]);
    println!(
        "cargo:rustc-env=RUST_VERSION={}",
        rust_version.as_deref().unwrap_or(UNKNOWN)
    );

    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-changed=.git/HEAD");
    println!("cargo:rerun-if-env-changed=SOURCE_DATE_EPOCH");
}

fn build_time() -> u64 {
    env::var("SOURCE_DATE_EPOCH")
        .ok()
        .and_then(|epoch| epoch.trim().parse().ok())
        .unwrap_or_else(|| {
            SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|elapsed| elapsed.as_secs())
                .unwrap_or_default()
        })
}

/// First line of a successful command's stdout
fn run(program: &str, args: &[&str]) -> Option<String> {
    let output = Command::new(program).args(args).output().ok()?;
    if !output.status.success() {
        return None;
    }
    let stdout = String::from_utf8(output.stdout).ok()?;
    stdout
        .lines()
        .next()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
}
