use thiserror::Error;

/// Failure reported by a platform binding (clipboard, process, window or shell call).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PlatformError {
    #[error("clipboard listener registration failed (win32 error {code})")]
    ListenerRegistration { code: u32 },
    #[error("clipboard listener window is not available")]
    ListenerWindowMissing,
    #[error("window query failed: {0}")]
    WindowQuery(String),
    #[error("shell open of {target} failed with code {code}")]
    Launch { target: String, code: isize },
    #[error("link contains an interior NUL")]
    InteriorNul,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("scheme prefix must not be empty")]
    EmptyScheme,
    #[error("scheme prefix must not contain whitespace")]
    SchemeWhitespace,
    #[error("client process name must not be empty")]
    EmptyClientName,
    #[error("settle delay must be between {min} and {max} ms, got {got}")]
    SettleDelayOutOfRange { got: u64, min: u64, max: u64 },
}
