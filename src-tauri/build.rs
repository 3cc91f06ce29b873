use std::process::Command;

fn main() {
    // Capture git commit hash at build time for the About box
    let git_hash = get_git_commit_hash();
    println!("cargo:rustc-env=GIT_COMMIT_HASH={}", git_hash);

    // Cache-busting: rerun when git state changes
    println!("cargo:rerun-if-changed=.git/HEAD");
    println!("cargo:rerun-if-changed=.git/refs/heads/");

    tauri_build::build();
}

fn get_git_commit_hash() -> String {
    let output = Command::new("git")
        .args(["rev-parse", "--short=7", "HEAD"])
        .output();

    match output {
        Ok(output) if output.status.success() => {
            String::from_utf8_lossy(&output.stdout).trim().to_string()
        }
        // Fallback for CI or non-git environments
        _ => env!("CARGO_PKG_VERSION").to_string(),
    }
}
