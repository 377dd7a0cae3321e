//! Embeds the short commit hash and build date for `overworld --version`.

use std::env;
use std::fs;
use std::io;
use std::path::PathBuf;
use std::process::Command;

fn git_short_commit() -> Option<String> {
    let output = Command::new("git")
        .args(["rev-parse", "--short=7", "HEAD"])
        .output()
        .ok()?;
    if !output.status.success() {
        return None;
    }
    let commit = String::from_utf8(output.stdout).ok()?;
    let commit = commit.trim();
    (!commit.is_empty()).then(|| commit.to_string())
}

fn main() -> io::Result<()> {
    // CI sets these explicitly; local builds ask git and the clock.
    let commit = env::var("OVERWORLD_BUILD_COMMIT")
        .ok()
        .or_else(git_short_commit)
        .unwrap_or_else(|| "unknown".to_string());
    let date = env::var("OVERWORLD_BUILD_DATE")
        .unwrap_or_else(|_| chrono::Utc::now().format("%Y-%m-%d").to_string());

    let out_dir = env::var("OUT_DIR").map_err(io::Error::other)?;
    let dest = PathBuf::from(out_dir).join("build_info.rs");
    fs::write(
        dest,
        format!(
            "pub const BUILD_COMMIT: &str = {:?};\npub const BUILD_DATE: &str = {:?};\n",
            commit, date
        ),
    )?;

    println!("cargo:rerun-if-changed=.git/HEAD");
    println!("cargo:rerun-if-env-changed=OVERWORLD_BUILD_COMMIT");
    println!("cargo:rerun-if-env-changed=OVERWORLD_BUILD_DATE");
    Ok(())
}
