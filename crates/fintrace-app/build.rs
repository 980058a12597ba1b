//! Injects the workspace `VERSION` into the app as `FINTRACE_VERSION`.

use std::path::{Path, PathBuf};

fn workspace_version_file(manifest_dir: &Path) -> PathBuf {
    manifest_dir
        .ancestors()
        .nth(2)
        .expect("app crate lives two levels below the workspace root")
        .join("VERSION")
}

fn main() {
    let manifest_dir = PathBuf::from(std::env::var("CARGO_MANIFEST_DIR").expect("manifest dir"));
    let version_file = workspace_version_file(&manifest_dir);
    println!("cargo:rerun-if-changed={}", version_file.display());

    let contents = std::fs::read_to_string(&version_file).unwrap_or_else(|error| {
        panic!("unable to read '{}': {error}", version_file.display())
    });
    let version = contents.lines().next().unwrap_or_default().trim();
    assert!(!version.is_empty(), "VERSION must start with a version line");

    println!("cargo:rustc-env=FINTRACE_VERSION={version}");
}
