//! Platform-neutral logic for the HQLinker tray utility: recognizing `hq://` links on the
//! clipboard, deciding whether to hand them to the client, and focusing the client afterwards.

pub mod config;
pub mod dispatch;
pub mod error;
pub mod link;
pub mod monitor;
pub mod session;
pub mod settle;

pub use config::{
    DEFAULT_SETTLE_DELAY_MS, LinkerConfig, MAX_SETTLE_DELAY_MS, MIN_SETTLE_DELAY_MS,
};
pub use dispatch::{
    ClipboardOwner, DispatchHost, DispatchOutcome, LinkDispatcher, Notice, NoticeSeverity,
    UnknownOwnerPolicy,
};
pub use error::{ConfigError, PlatformError};
pub use link::{
    DEFAULT_CLIENT_PROCESS, DEFAULT_SCHEME_PREFIX, is_link, normalize_clipboard_text,
    process_name_matches,
};
pub use monitor::{
    ClipboardSubscription, DOUBLE_CLICK_THRESHOLD_MS, DoubleClickDetector, MonitorState,
    MonitorSwitch,
};
pub use session::{DeferredEvent, DeferredEvents, LinkSession};
pub use settle::{
    FocusHost, FocusOutcome, FocusSettler, OneShotTimer, ShowCommand, ShowState, WindowCandidate,
    focus_client, select_main_window, show_command_for,
};
