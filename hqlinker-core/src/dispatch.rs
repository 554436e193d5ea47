//! Per-event decision routine: filter, de-duplicate, check the owner, launch.

use tracing::{debug, info, warn};

use crate::{
    config::LinkerConfig,
    error::PlatformError,
    link::{is_link, normalize_clipboard_text, process_name_matches},
};

/// Process that set the current clipboard content, as far as it could be resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClipboardOwner {
    Known(String),
    /// No owner window, no process id, or the process already exited.
    Unknown,
}

/// What to do with a link whose clipboard owner could not be resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UnknownOwnerPolicy {
    /// Treat the link as coming from an external application and launch it.
    #[default]
    Proceed,
    /// Ignore the link.
    Suppress,
}

/// Platform queries and actions the dispatcher depends on.
pub trait DispatchHost {
    fn clipboard_owner(&mut self) -> ClipboardOwner;
    fn is_client_running(&mut self, client_process: &str) -> bool;
    fn open_link(&mut self, link: &str) -> Result<(), PlatformError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    NoText,
    Duplicate,
    NotALink,
    ClientNotRunning { link: String },
    OwnClipboard,
    UnknownOwnerSuppressed,
    Launched { link: String },
    LaunchFailed { link: String, error: PlatformError },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeSeverity {
    Info,
    Warning,
}

/// User-facing message for the tray balloon.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub severity: NoticeSeverity,
    pub text: String,
}

impl DispatchOutcome {
    /// Only launches and launch blockers are surfaced; every ignore path stays silent.
    pub fn notice(&self, client_process: &str) -> Option<Notice> {
        match self {
            DispatchOutcome::Launched { link } => Some(Notice {
                severity: NoticeSeverity::Info,
                text: format!("Opened {link}"),
            }),
            DispatchOutcome::ClientNotRunning { .. } => Some(Notice {
                severity: NoticeSeverity::Warning,
                text: format!("{client_process} is not running. Start it and copy the link again."),
            }),
            DispatchOutcome::LaunchFailed { link, .. } => Some(Notice {
                severity: NoticeSeverity::Warning,
                text: format!("Could not open {link}"),
            }),
            _ => None,
        }
    }

    pub fn arms_focus(&self) -> bool {
        matches!(self, DispatchOutcome::Launched { .. })
    }
}

#[derive(Debug, Clone)]
pub struct LinkDispatcher {
    scheme_prefix: String,
    client_process: String,
    unknown_owner: UnknownOwnerPolicy,
    last_text: Option<String>,
}

impl LinkDispatcher {
    pub fn new(
        scheme_prefix: impl Into<String>,
        client_process: impl Into<String>,
        unknown_owner: UnknownOwnerPolicy,
    ) -> Self {
        Self {
            scheme_prefix: scheme_prefix.into(),
            client_process: client_process.into(),
            unknown_owner,
            last_text: None,
        }
    }

    pub fn from_config(config: &LinkerConfig) -> Self {
        Self::new(
            config.scheme_prefix.clone(),
            config.client_process.clone(),
            config.unknown_owner,
        )
    }

    pub fn client_process(&self) -> &str {
        &self.client_process
    }

    pub fn last_text(&self) -> Option<&str> {
        self.last_text.as_deref()
    }

    /// Drops the de-dup memory so the next copy of the same text is processed again.
    pub fn forget(&mut self) {
        self.last_text = None;
    }

    pub fn dispatch<H: DispatchHost>(
        &mut self,
        clipboard_text: Option<&str>,
        host: &mut H,
    ) -> DispatchOutcome {
        let Some(text) = clipboard_text.and_then(normalize_clipboard_text) else {
            return DispatchOutcome::NoText;
        };

        if self.last_text.as_deref() == Some(text) {
            return DispatchOutcome::Duplicate;
        }
        self.last_text = Some(text.to_owned());

        if !is_link(text, &self.scheme_prefix) {
            return DispatchOutcome::NotALink;
        }

        let owner = host.clipboard_owner();
        debug!(link = text, ?owner, "clipboard link detected");

        if !host.is_client_running(&self.client_process) {
            warn!(client = %self.client_process, "client not running; link not opened");
            self.forget();
            return DispatchOutcome::ClientNotRunning {
                link: text.to_owned(),
            };
        }

        match owner {
            ClipboardOwner::Known(name) if process_name_matches(&name, &self.client_process) => {
                debug!("clipboard set by the client itself; ignoring");
                return DispatchOutcome::OwnClipboard;
            }
            ClipboardOwner::Unknown if self.unknown_owner == UnknownOwnerPolicy::Suppress => {
                debug!("clipboard owner unknown; suppressed by policy");
                return DispatchOutcome::UnknownOwnerSuppressed;
            }
            _ => {}
        }

        match host.open_link(text) {
            Ok(()) => {
                info!(link = text, "opened link");
                DispatchOutcome::Launched {
                    link: text.to_owned(),
                }
            }
            Err(error) => {
                warn!(link = text, %error, "opening link failed");
                DispatchOutcome::LaunchFailed {
                    link: text.to_owned(),
                    error,
                }
            }
        }
    }
}
