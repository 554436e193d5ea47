use std::time::Duration;

use clap::{Parser, ValueEnum};
use hqlinker_core::{
    DEFAULT_CLIENT_PROCESS, DEFAULT_SCHEME_PREFIX, DEFAULT_SETTLE_DELAY_MS, LinkerConfig,
    UnknownOwnerPolicy,
};

#[derive(Parser, Debug, Clone)]
#[command(name = "hqlinker", about = "Opens hq:// links copied to the clipboard in HQClient")]
pub struct ClientArgs {
    /// Prefix that marks clipboard text as a client link.
    #[arg(long, default_value = DEFAULT_SCHEME_PREFIX)]
    pub scheme: String,

    /// Process name of the client application (with or without `.exe`).
    #[arg(long, default_value = DEFAULT_CLIENT_PROCESS)]
    pub client_process: String,

    /// Delay between opening a link and focusing the client window.
    #[arg(long, default_value_t = DEFAULT_SETTLE_DELAY_MS)]
    pub settle_delay_ms: u64,

    /// What to do when the process that set the clipboard cannot be determined.
    #[arg(long, value_enum, default_value_t = OwnerPolicyArg::Proceed)]
    pub unknown_owner: OwnerPolicyArg,

    /// Start with clipboard monitoring switched off.
    #[arg(long, default_value_t = false)]
    pub paused: bool,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OwnerPolicyArg {
    Proceed,
    Suppress,
}

impl From<OwnerPolicyArg> for UnknownOwnerPolicy {
    fn from(arg: OwnerPolicyArg) -> Self {
        match arg {
            OwnerPolicyArg::Proceed => UnknownOwnerPolicy::Proceed,
            OwnerPolicyArg::Suppress => UnknownOwnerPolicy::Suppress,
        }
    }
}

impl ClientArgs {
    pub fn into_config(self) -> LinkerConfig {
        LinkerConfig {
            scheme_prefix: self.scheme,
            client_process: self.client_process.trim().to_owned(),
            settle_delay: Duration::from_millis(self.settle_delay_ms),
            unknown_owner: self.unknown_owner.into(),
            start_monitoring: !self.paused,
        }
    }
}
