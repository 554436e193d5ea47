//! The tray app's state behind its event handlers: monitoring switch, dispatcher and settler,
//! plus the bookkeeping for events that arrive while another handler is running.

use std::cell::{Cell, RefCell};

use tracing::debug;

use crate::{
    config::LinkerConfig,
    dispatch::{DispatchHost, DispatchOutcome, LinkDispatcher},
    error::PlatformError,
    monitor::{ClipboardSubscription, MonitorState, MonitorSwitch},
    settle::{FocusHost, FocusOutcome, FocusSettler, OneShotTimer},
};

#[derive(Debug)]
pub struct LinkSession<T> {
    dispatcher: LinkDispatcher,
    settler: FocusSettler<T>,
    monitor: MonitorSwitch,
}

impl<T: OneShotTimer> LinkSession<T> {
    pub fn new(config: &LinkerConfig, settle_timer: T) -> Self {
        Self {
            dispatcher: LinkDispatcher::from_config(config),
            settler: FocusSettler::new(settle_timer),
            monitor: MonitorSwitch::new(),
        }
    }

    pub fn dispatcher(&self) -> &LinkDispatcher {
        &self.dispatcher
    }

    pub fn settler(&self) -> &FocusSettler<T> {
        &self.settler
    }

    pub fn monitor_state(&self) -> MonitorState {
        self.monitor.state()
    }

    pub fn start_monitoring<S: ClipboardSubscription>(
        &mut self,
        subscription: &mut S,
    ) -> Result<MonitorState, PlatformError> {
        self.monitor.start(subscription)
    }

    pub fn toggle_monitoring<S: ClipboardSubscription>(
        &mut self,
        subscription: &mut S,
    ) -> Result<MonitorState, PlatformError> {
        self.monitor.toggle(subscription, &mut self.dispatcher)
    }

    /// Handles one clipboard change. While paused nothing is read and `None` is returned.
    pub fn on_clipboard_change<H: DispatchHost>(
        &mut self,
        read_text: impl FnOnce() -> Option<String>,
        host: &mut H,
    ) -> Option<DispatchOutcome> {
        if !self.monitor.is_monitoring() {
            debug!("clipboard change ignored while paused");
            return None;
        }

        let text = read_text();
        let outcome = self.dispatcher.dispatch(text.as_deref(), host);
        if outcome.arms_focus() {
            self.settler.arm();
        }
        Some(outcome)
    }

    pub fn on_settle_elapsed<H: FocusHost>(&mut self, host: &mut H) -> FocusOutcome {
        self.settler.fire(host, self.dispatcher.client_process())
    }

    /// Stops monitoring and cancels a pending focus.
    pub fn shutdown<S: ClipboardSubscription>(&mut self, subscription: &mut S) {
        self.monitor.stop(subscription, &mut self.dispatcher);
        self.settler.disarm();
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeferredEvent {
    ClipboardChange,
    SettleElapsed,
}

/// Events that found the app already borrowed. Repeats of one kind collapse into a single
/// pending event; the clipboard is read when the event is drained, so only its latest text counts.
#[derive(Debug, Default)]
pub struct DeferredEvents {
    clipboard: Cell<bool>,
    settle: Cell<bool>,
}

impl DeferredEvents {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn defer(&self, event: DeferredEvent) {
        match event {
            DeferredEvent::ClipboardChange => self.clipboard.set(true),
            DeferredEvent::SettleElapsed => self.settle.set(true),
        }
    }

    pub fn is_empty(&self) -> bool {
        !self.clipboard.get() && !self.settle.get()
    }

    /// Runs the pending events against `app` once it can be borrowed. Leaves them pending
    /// when `app` is still in use further up the stack.
    pub fn drain<A>(&self, app: &RefCell<A>, mut handle: impl FnMut(&mut A, DeferredEvent)) {
        while !self.is_empty() {
            let Ok(mut app) = app.try_borrow_mut() else {
                return;
            };
            if self.clipboard.replace(false) {
                handle(&mut app, DeferredEvent::ClipboardChange);
            }
            if self.settle.replace(false) {
                handle(&mut app, DeferredEvent::SettleElapsed);
            }
        }
    }
}
