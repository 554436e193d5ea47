#![cfg(target_os = "windows")]

use std::{path::Path, process::Command};

/// The linker stores the manifest resource as plain UTF-8, so the exe bytes contain it verbatim.
fn exe_contains(exe: &[u8], needle: &str) -> bool {
    exe.windows(needle.len()).any(|window| window == needle.as_bytes())
}

#[test]
fn tray_exe_embeds_manifest_from_assets() {
    if !cfg!(target_env = "msvc") {
        return;
    }

    let crate_dir = Path::new(env!("CARGO_MANIFEST_DIR"));
    let target = tempfile::tempdir().expect("create tempdir");
    let cargo = std::env::var("CARGO").unwrap_or_else(|_| "cargo".to_owned());

    let status = Command::new(cargo)
        .current_dir(crate_dir)
        .args(["build", "--bin", "HQLinker", "--release", "--target-dir"])
        .arg(target.path())
        .status()
        .expect("run cargo build");
    assert!(status.success(), "building HQLinker failed: {status}");

    let exe = std::fs::read(target.path().join("release").join("HQLinker.exe"))
        .expect("read HQLinker.exe");

    for needle in [
        "Microsoft.Windows.Common-Controls",
        "version=\"6.0.0.0\"",
        "PerMonitorV2",
    ] {
        assert!(exe_contains(&exe, needle), "manifest lacks {needle}");
    }
}
