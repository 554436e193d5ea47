//! Monitoring on/off switch and tray double-click detection.

use tracing::{info, warn};

use crate::{dispatch::LinkDispatcher, error::PlatformError};

pub const DOUBLE_CLICK_THRESHOLD_MS: u64 = 450;

/// Registration with the platform's clipboard-change facility.
pub trait ClipboardSubscription {
    fn subscribe(&mut self) -> Result<(), PlatformError>;
    fn unsubscribe(&mut self);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MonitorState {
    Monitoring,
    #[default]
    Paused,
}

impl MonitorState {
    pub fn tip(self) -> &'static str {
        match self {
            MonitorState::Monitoring => "Monitoring clipboard",
            MonitorState::Paused => "Not monitoring clipboard",
        }
    }
}

#[derive(Debug, Default)]
pub struct MonitorSwitch {
    state: MonitorState,
}

impl MonitorSwitch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> MonitorState {
        self.state
    }

    pub fn is_monitoring(&self) -> bool {
        self.state == MonitorState::Monitoring
    }

    /// Subscribes to clipboard changes. On failure monitoring stays off.
    pub fn start<S: ClipboardSubscription>(
        &mut self,
        subscription: &mut S,
    ) -> Result<MonitorState, PlatformError> {
        if self.is_monitoring() {
            return Ok(self.state);
        }
        if let Err(err) = subscription.subscribe() {
            warn!(%err, "clipboard monitoring could not start");
            return Err(err);
        }
        self.state = MonitorState::Monitoring;
        info!("clipboard monitoring started");
        Ok(self.state)
    }

    pub fn stop<S: ClipboardSubscription>(
        &mut self,
        subscription: &mut S,
        dispatcher: &mut LinkDispatcher,
    ) -> MonitorState {
        if self.is_monitoring() {
            subscription.unsubscribe();
            info!("clipboard monitoring stopped");
        }
        dispatcher.forget();
        self.state = MonitorState::Paused;
        self.state
    }

    pub fn toggle<S: ClipboardSubscription>(
        &mut self,
        subscription: &mut S,
        dispatcher: &mut LinkDispatcher,
    ) -> Result<MonitorState, PlatformError> {
        if self.is_monitoring() {
            Ok(self.stop(subscription, dispatcher))
        } else {
            self.start(subscription)
        }
    }
}

/// Pairs left-button releases on the tray icon into double-clicks.
#[derive(Debug, Clone)]
pub struct DoubleClickDetector {
    threshold_ms: u64,
    last_click_ms: Option<u64>,
}

impl Default for DoubleClickDetector {
    fn default() -> Self {
        Self::new(DOUBLE_CLICK_THRESHOLD_MS)
    }
}

impl DoubleClickDetector {
    pub fn new(threshold_ms: u64) -> Self {
        Self {
            threshold_ms,
            last_click_ms: None,
        }
    }

    /// Records a click at `now_ms`; true when it completes a double-click.
    pub fn click(&mut self, now_ms: u64) -> bool {
        let is_double = self
            .last_click_ms
            .is_some_and(|prev| now_ms.saturating_sub(prev) <= self.threshold_ms);
        self.last_click_ms = if is_double { None } else { Some(now_ms) };
        is_double
    }
}
