use std::path::PathBuf;

fn main() {
    let manifest_path: PathBuf = [env!("CARGO_MANIFEST_DIR"), "assets", "app.manifest"]
        .iter()
        .collect();

    println!("cargo:rerun-if-changed={}", manifest_path.display());

    let target_os = std::env::var("CARGO_CFG_TARGET_OS").unwrap_or_default();
    let target_env = std::env::var("CARGO_CFG_TARGET_ENV").unwrap_or_default();
    if target_os != "windows" || target_env != "msvc" {
        return;
    }

    // Embed the manifest via the MSVC linker so builds don't depend on `rc.exe`.
    // Common Controls v6 is needed for tray balloon icons.
    println!("cargo:rustc-link-arg-bin=HQLinker=/MANIFEST:EMBED");
    println!(
        "cargo:rustc-link-arg-bin=HQLinker=/MANIFESTINPUT:{}",
        manifest_path.display()
    );
}
