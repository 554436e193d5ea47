use std::time::Duration;

use crate::{
    dispatch::UnknownOwnerPolicy,
    error::ConfigError,
    link::{DEFAULT_CLIENT_PROCESS, DEFAULT_SCHEME_PREFIX},
};

pub const DEFAULT_SETTLE_DELAY_MS: u64 = 500;
pub const MIN_SETTLE_DELAY_MS: u64 = 1;
pub const MAX_SETTLE_DELAY_MS: u64 = 10_000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkerConfig {
    pub scheme_prefix: String,
    pub client_process: String,
    pub settle_delay: Duration,
    pub unknown_owner: UnknownOwnerPolicy,
    pub start_monitoring: bool,
}

impl Default for LinkerConfig {
    fn default() -> Self {
        Self {
            scheme_prefix: DEFAULT_SCHEME_PREFIX.to_owned(),
            client_process: DEFAULT_CLIENT_PROCESS.to_owned(),
            settle_delay: Duration::from_millis(DEFAULT_SETTLE_DELAY_MS),
            unknown_owner: UnknownOwnerPolicy::default(),
            start_monitoring: true,
        }
    }
}

impl LinkerConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.scheme_prefix.is_empty() {
            return Err(ConfigError::EmptyScheme);
        }
        if self.scheme_prefix.chars().any(char::is_whitespace) {
            return Err(ConfigError::SchemeWhitespace);
        }
        if self.client_process.trim().is_empty() {
            return Err(ConfigError::EmptyClientName);
        }

        let delay_ms = u64::try_from(self.settle_delay.as_millis()).unwrap_or(u64::MAX);
        if !(MIN_SETTLE_DELAY_MS..=MAX_SETTLE_DELAY_MS).contains(&delay_ms) {
            return Err(ConfigError::SettleDelayOutOfRange {
                got: delay_ms,
                min: MIN_SETTLE_DELAY_MS,
                max: MAX_SETTLE_DELAY_MS,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let cfg = LinkerConfig::default();
        assert_eq!(cfg.validate(), Ok(()));
        assert_eq!(cfg.scheme_prefix, "hq://");
        assert_eq!(cfg.client_process, "HQClient");
        assert_eq!(cfg.settle_delay, Duration::from_millis(500));
        assert_eq!(cfg.unknown_owner, UnknownOwnerPolicy::Proceed);
    }

    #[test]
    fn rejects_bad_scheme_and_client() {
        let mut cfg = LinkerConfig {
            scheme_prefix: String::new(),
            ..Default::default()
        };
        assert_eq!(cfg.validate(), Err(ConfigError::EmptyScheme));
        cfg.scheme_prefix = "hq ://".to_owned();
        assert_eq!(cfg.validate(), Err(ConfigError::SchemeWhitespace));
        cfg.scheme_prefix = "hq://".to_owned();
        cfg.client_process = "  ".to_owned();
        assert_eq!(cfg.validate(), Err(ConfigError::EmptyClientName));
    }

    #[test]
    fn settle_delay_bounds() {
        let mut cfg = LinkerConfig {
            settle_delay: Duration::ZERO,
            ..Default::default()
        };
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::SettleDelayOutOfRange { got: 0, .. })
        ));
        cfg.settle_delay = Duration::from_millis(MAX_SETTLE_DELAY_MS);
        assert_eq!(cfg.validate(), Ok(()));
        cfg.settle_delay = Duration::from_millis(MAX_SETTLE_DELAY_MS + 1);
        assert!(cfg.validate().is_err());
    }
}
