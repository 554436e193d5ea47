pub mod cli;
pub mod logging;

#[cfg(target_os = "windows")]
pub mod win32;
