use std::env;
use std::path::PathBuf;

fn main() {
    // CARGO_MANIFEST_DIR for bracket-core is crates/bracket-core, so we go up two levels.
    let manifest_dir = env::var("CARGO_MANIFEST_DIR").unwrap_or_default();
    let crate_path = PathBuf::from(&manifest_dir);

    let repo_root = crate_path
        .parent() // crates/
        .and_then(|p| p.parent()) // workspace root
        .map_or_else(|| crate_path.clone(), std::path::Path::to_path_buf);

    // Development mode resolves the backend binary relative to this checkout
    println!(
        "cargo:rustc-env=BRACKET_REPO_ROOT={}",
        repo_root.to_string_lossy()
    );

    println!("cargo:rerun-if-changed=build.rs");
}
