//! Delayed one-shot focus of the client's main window after a launch.

use tracing::{debug, warn};

use crate::error::PlatformError;

/// A restartable one-shot timer. `start` begins a fresh delay, `stop` cancels a pending one.
pub trait OneShotTimer {
    fn start(&mut self);
    fn stop(&mut self);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShowState {
    Normal,
    Maximized,
    Minimized,
    Hidden,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShowCommand {
    Restore,
    Show,
}

pub fn show_command_for(state: ShowState) -> ShowCommand {
    match state {
        ShowState::Minimized => ShowCommand::Restore,
        ShowState::Normal | ShowState::Maximized | ShowState::Hidden => ShowCommand::Show,
    }
}

/// Window operations used by the focus step.
pub trait FocusHost {
    type Window: Copy;

    fn find_main_window(&mut self, client_process: &str) -> Option<Self::Window>;
    fn show_state(&mut self, window: Self::Window) -> Result<ShowState, PlatformError>;
    fn show(&mut self, window: Self::Window, command: ShowCommand) -> Result<(), PlatformError>;
    fn set_foreground(&mut self, window: Self::Window) -> Result<(), PlatformError>;
}

/// A top-level window seen while enumerating, in enumeration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowCandidate<W> {
    pub window: W,
    pub owned: bool,
    pub visible: bool,
}

/// Picks the client's main window: the first unowned visible window, else the first unowned one.
pub fn select_main_window<W: Copy>(
    candidates: impl IntoIterator<Item = WindowCandidate<W>>,
) -> Option<W> {
    let mut hidden = None;
    for candidate in candidates.into_iter().filter(|c| !c.owned) {
        if candidate.visible {
            return Some(candidate.window);
        }
        hidden.get_or_insert(candidate.window);
    }
    hidden
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FocusOutcome {
    NotArmed,
    ClientGone,
    Focused(ShowCommand),
    Failed(PlatformError),
}

/// Brings the client's main window forward: restore if minimized, show otherwise, then focus.
pub fn focus_client<H: FocusHost>(host: &mut H, client_process: &str) -> FocusOutcome {
    let Some(window) = host.find_main_window(client_process) else {
        debug!(client = client_process, "no client window to focus");
        return FocusOutcome::ClientGone;
    };

    // Unreadable placement is treated as a normal window.
    let state = host.show_state(window).unwrap_or_else(|err| {
        warn!(%err, "reading client window state failed");
        ShowState::Normal
    });
    let command = show_command_for(state);

    if let Err(err) = host.show(window, command) {
        warn!(%err, ?command, "showing client window failed");
        return FocusOutcome::Failed(err);
    }
    if let Err(err) = host.set_foreground(window) {
        warn!(%err, "foregrounding client window failed");
        return FocusOutcome::Failed(err);
    }

    FocusOutcome::Focused(command)
}

#[derive(Debug)]
pub struct FocusSettler<T> {
    timer: T,
    armed: bool,
}

impl<T: OneShotTimer> FocusSettler<T> {
    pub fn new(timer: T) -> Self {
        Self {
            timer,
            armed: false,
        }
    }

    pub fn timer(&self) -> &T {
        &self.timer
    }

    pub fn is_armed(&self) -> bool {
        self.armed
    }

    /// Starts the settle delay, cancelling a pending one so only the latest arm fires.
    pub fn arm(&mut self) {
        if self.armed {
            self.timer.stop();
        }
        self.timer.start();
        self.armed = true;
    }

    pub fn disarm(&mut self) {
        if self.armed {
            self.timer.stop();
            self.armed = false;
        }
    }

    /// Handles the timer tick. Fires at most once per arm.
    pub fn fire<H: FocusHost>(&mut self, host: &mut H, client_process: &str) -> FocusOutcome {
        if !self.armed {
            return FocusOutcome::NotArmed;
        }
        self.disarm();
        focus_client(host, client_process)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Default)]
    struct CountingTimer {
        starts: usize,
        stops: usize,
    }

    impl OneShotTimer for CountingTimer {
        fn start(&mut self) {
            self.starts += 1;
        }

        fn stop(&mut self) {
            self.stops += 1;
        }
    }

    #[derive(Default)]
    struct FakeWindows {
        window: Option<u32>,
        state: Option<ShowState>,
        fail_show: bool,
        calls: Vec<String>,
    }

    impl FocusHost for FakeWindows {
        type Window = u32;

        fn find_main_window(&mut self, client_process: &str) -> Option<u32> {
            self.calls.push(format!("find {client_process}"));
            self.window
        }

        fn show_state(&mut self, _window: u32) -> Result<ShowState, PlatformError> {
            self.state
                .ok_or_else(|| PlatformError::WindowQuery("GetWindowPlacement".to_owned()))
        }

        fn show(&mut self, window: u32, command: ShowCommand) -> Result<(), PlatformError> {
            self.calls.push(format!("show {window} {command:?}"));
            if self.fail_show {
                Err(PlatformError::WindowQuery("ShowWindow".to_owned()))
            } else {
                Ok(())
            }
        }

        fn set_foreground(&mut self, window: u32) -> Result<(), PlatformError> {
            self.calls.push(format!("foreground {window}"));
            Ok(())
        }
    }

    fn candidate(window: u32, owned: bool, visible: bool) -> WindowCandidate<u32> {
        WindowCandidate {
            window,
            owned,
            visible,
        }
    }

    #[test]
    fn visible_unowned_window_is_preferred() {
        let windows = [
            candidate(1, false, false),
            candidate(2, true, true),
            candidate(3, false, true),
        ];
        assert_eq!(select_main_window(windows), Some(3));
    }

    #[test]
    fn first_hidden_window_is_used_when_none_is_visible() {
        let windows = [
            candidate(1, true, true),
            candidate(2, false, false),
            candidate(3, false, false),
        ];
        assert_eq!(select_main_window(windows), Some(2));
        assert_eq!(select_main_window([candidate(4, true, false)]), None);
        assert_eq!(select_main_window(Vec::<WindowCandidate<u32>>::new()), None);
    }

    #[test]
    fn minimized_windows_are_restored_everything_else_shown() {
        assert_eq!(show_command_for(ShowState::Minimized), ShowCommand::Restore);
        assert_eq!(show_command_for(ShowState::Normal), ShowCommand::Show);
        assert_eq!(show_command_for(ShowState::Maximized), ShowCommand::Show);
        assert_eq!(show_command_for(ShowState::Hidden), ShowCommand::Show);
    }

    #[test]
    fn rearming_restarts_instead_of_stacking() {
        let mut settler = FocusSettler::new(CountingTimer::default());
        settler.arm();
        settler.arm();
        settler.arm();
        assert_eq!(settler.timer().starts, 3);
        assert_eq!(settler.timer().stops, 2);

        let mut host = FakeWindows {
            window: Some(7),
            state: Some(ShowState::Normal),
            ..Default::default()
        };
        assert_eq!(
            settler.fire(&mut host, "HQClient"),
            FocusOutcome::Focused(ShowCommand::Show)
        );
        assert_eq!(settler.fire(&mut host, "HQClient"), FocusOutcome::NotArmed);
        assert_eq!(
            host.calls,
            vec!["find HQClient", "show 7 Show", "foreground 7"]
        );
    }

    #[test]
    fn stray_tick_without_arm_does_nothing() {
        let mut settler = FocusSettler::new(CountingTimer::default());
        let mut host = FakeWindows::default();
        assert_eq!(settler.fire(&mut host, "HQClient"), FocusOutcome::NotArmed);
        assert!(host.calls.is_empty());
        assert_eq!(settler.timer().stops, 0);
    }

    #[test]
    fn missing_client_is_not_retried() {
        let mut settler = FocusSettler::new(CountingTimer::default());
        settler.arm();
        let mut host = FakeWindows::default();
        assert_eq!(settler.fire(&mut host, "HQClient"), FocusOutcome::ClientGone);
        assert!(!settler.is_armed());
        assert_eq!(settler.fire(&mut host, "HQClient"), FocusOutcome::NotArmed);
    }

    #[test]
    fn minimized_client_is_restored_then_focused() {
        let mut host = FakeWindows {
            window: Some(3),
            state: Some(ShowState::Minimized),
            ..Default::default()
        };
        assert_eq!(
            focus_client(&mut host, "HQClient"),
            FocusOutcome::Focused(ShowCommand::Restore)
        );
        assert_eq!(host.calls[1..], ["show 3 Restore", "foreground 3"]);
    }

    #[test]
    fn unreadable_state_falls_back_to_show() {
        let mut host = FakeWindows {
            window: Some(3),
            state: None,
            ..Default::default()
        };
        assert_eq!(
            focus_client(&mut host, "HQClient"),
            FocusOutcome::Focused(ShowCommand::Show)
        );
    }

    #[test]
    fn show_failure_skips_foreground() {
        let mut host = FakeWindows {
            window: Some(3),
            state: Some(ShowState::Normal),
            fail_show: true,
            ..Default::default()
        };
        assert!(matches!(
            focus_client(&mut host, "HQClient"),
            FocusOutcome::Failed(_)
        ));
        assert!(!host.calls.iter().any(|c| c.starts_with("foreground")));
    }

    #[test]
    fn disarm_cancels_pending_fire() {
        let mut settler = FocusSettler::new(CountingTimer::default());
        settler.arm();
        settler.disarm();
        settler.disarm();
        assert_eq!(settler.timer().stops, 1);
        let mut host = FakeWindows::default();
        assert_eq!(settler.fire(&mut host, "HQClient"), FocusOutcome::NotArmed);
    }
}
