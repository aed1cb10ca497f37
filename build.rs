use std::env;
use std::process::Command;

fn main() {
    println!("cargo:rerun-if-env-changed=SVER_COMMIT");
    println!("cargo:rerun-if-env-changed=SVER_BUILD_DATE");
    println!("cargo:rerun-if-changed=.git/HEAD");

    let commit = env::var("SVER_COMMIT")
        .ok()
        .filter(|c| !c.trim().is_empty())
        .or_else(git_short_hash)
        .unwrap_or_default();
    println!("cargo:rustc-env=SVER_COMMIT={commit}");

    let date = env::var("SVER_BUILD_DATE").unwrap_or_default();
    println!("cargo:rustc-env=SVER_BUILD_DATE={date}");
}

fn git_short_hash() -> Option<String> {
    let output = Command::new("git")
        .args(["rev-parse", "--short=8", "HEAD"])
        .output()
        .ok()?;

    if !output.status.success() {
        return None;
    }

    let hash = String::from_utf8(output.stdout).ok()?;
    let hash = hash.trim();
    if hash.is_empty() {
        None
    } else {
        Some(hash.to_string())
    }
}
