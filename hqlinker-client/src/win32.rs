//! Win32 bindings behind the platform traits of `hqlinker-core`.

use std::{ffi::OsStr, os::windows::ffi::OsStrExt};

use arboard::Clipboard;
use hqlinker_core::{
    ClipboardOwner, ClipboardSubscription, DispatchHost, FocusHost, PlatformError, ShowCommand,
    ShowState, WindowCandidate, process_name_matches, select_main_window,
};
use sysinfo::{Pid, ProcessRefreshKind, ProcessesToUpdate, System};
use tracing::debug;
use windows_sys::Win32::{
    Foundation::{BOOL, GetLastError, HWND, LPARAM},
    System::DataExchange::{
        AddClipboardFormatListener, GetClipboardOwner, RemoveClipboardFormatListener,
    },
    UI::{
        Shell::ShellExecuteW,
        WindowsAndMessaging::{
            EnumWindows, GW_OWNER, GetWindow, GetWindowPlacement, GetWindowThreadProcessId,
            IsWindowVisible, SW_MINIMIZE, SW_RESTORE, SW_SHOW, SW_SHOWMAXIMIZED, SW_SHOWMINIMIZED,
            SW_SHOWMINNOACTIVE, SW_SHOWNORMAL, SetForegroundWindow, ShowWindow, WINDOWPLACEMENT,
            WM_CLIPBOARDUPDATE,
        },
    },
};

pub fn is_clipboard_update(msg: u32) -> bool {
    msg == WM_CLIPBOARDUPDATE
}

/// Current clipboard text, or `None` when the clipboard holds no text or can't be opened.
pub fn read_clipboard_text() -> Option<String> {
    let mut clipboard = match Clipboard::new() {
        Ok(clipboard) => clipboard,
        Err(err) => {
            debug!(%err, "clipboard open failed");
            return None;
        }
    };
    match clipboard.get_text() {
        Ok(text) => Some(text),
        Err(err) => {
            debug!(%err, "clipboard has no readable text");
            None
        }
    }
}

/// `AddClipboardFormatListener` registration for a (message-only) window.
#[derive(Debug)]
pub struct ClipboardListener {
    hwnd: HWND,
    registered: bool,
}

impl ClipboardListener {
    pub fn new(hwnd: HWND) -> Self {
        Self {
            hwnd,
            registered: false,
        }
    }
}

impl ClipboardSubscription for ClipboardListener {
    fn subscribe(&mut self) -> Result<(), PlatformError> {
        if self.registered {
            return Ok(());
        }
        if self.hwnd == 0 {
            return Err(PlatformError::ListenerWindowMissing);
        }
        if unsafe { AddClipboardFormatListener(self.hwnd) } == 0 {
            let code = unsafe { GetLastError() };
            return Err(PlatformError::ListenerRegistration { code });
        }
        self.registered = true;
        Ok(())
    }

    fn unsubscribe(&mut self) {
        if self.registered {
            unsafe { RemoveClipboardFormatListener(self.hwnd) };
            self.registered = false;
        }
    }
}

impl Drop for ClipboardListener {
    fn drop(&mut self) {
        self.unsubscribe();
    }
}

/// Process, window and shell access for the dispatcher and the focus step.
pub struct Win32Desktop {
    system: System,
}

impl Default for Win32Desktop {
    fn default() -> Self {
        Self::new()
    }
}

impl Win32Desktop {
    pub fn new() -> Self {
        Self {
            system: System::new(),
        }
    }

    fn process_name(&mut self, pid: u32) -> Option<String> {
        let pid = Pid::from_u32(pid);
        self.system.refresh_processes_specifics(
            ProcessesToUpdate::Some(&[pid]),
            true,
            ProcessRefreshKind::nothing(),
        );
        self.system
            .process(pid)
            .map(|process| process.name().to_string_lossy().into_owned())
    }

    fn client_pids(&mut self, client_process: &str) -> Vec<u32> {
        self.system.refresh_processes_specifics(
            ProcessesToUpdate::All,
            true,
            ProcessRefreshKind::nothing(),
        );
        self.system
            .processes()
            .iter()
            .filter(|(_, process)| {
                process_name_matches(&process.name().to_string_lossy(), client_process)
            })
            .map(|(pid, _)| pid.as_u32())
            .collect()
    }
}

impl DispatchHost for Win32Desktop {
    fn clipboard_owner(&mut self) -> ClipboardOwner {
        let hwnd = unsafe { GetClipboardOwner() };
        if hwnd == 0 {
            return ClipboardOwner::Unknown;
        }

        let mut pid: u32 = 0;
        unsafe { GetWindowThreadProcessId(hwnd, &mut pid) };
        if pid == 0 {
            return ClipboardOwner::Unknown;
        }

        self.process_name(pid)
            .map(ClipboardOwner::Known)
            .unwrap_or(ClipboardOwner::Unknown)
    }

    fn is_client_running(&mut self, client_process: &str) -> bool {
        !self.client_pids(client_process).is_empty()
    }

    fn open_link(&mut self, link: &str) -> Result<(), PlatformError> {
        if link.contains('\0') {
            return Err(PlatformError::InteriorNul);
        }
        let operation = wide_null(OsStr::new("open"));
        let file = wide_null(OsStr::new(link));
        let result = unsafe {
            ShellExecuteW(
                0,
                operation.as_ptr(),
                file.as_ptr(),
                std::ptr::null(),
                std::ptr::null(),
                SW_SHOWNORMAL as _,
            )
        };
        // Values above 32 mean success.
        if result <= 32 {
            return Err(PlatformError::Launch {
                target: link.to_owned(),
                code: result,
            });
        }
        Ok(())
    }
}

struct MainWindowSearch {
    pids: Vec<u32>,
    candidates: Vec<WindowCandidate<HWND>>,
}

unsafe extern "system" fn collect_client_window(hwnd: HWND, lparam: LPARAM) -> BOOL {
    let search = unsafe { &mut *(lparam as *mut MainWindowSearch) };

    let mut pid: u32 = 0;
    unsafe { GetWindowThreadProcessId(hwnd, &mut pid) };
    if search.pids.contains(&pid) {
        search.candidates.push(WindowCandidate {
            window: hwnd,
            owned: unsafe { GetWindow(hwnd, GW_OWNER) } != 0,
            visible: unsafe { IsWindowVisible(hwnd) } != 0,
        });
    }
    1
}

impl FocusHost for Win32Desktop {
    type Window = HWND;

    fn find_main_window(&mut self, client_process: &str) -> Option<HWND> {
        let pids = self.client_pids(client_process);
        if pids.is_empty() {
            return None;
        }

        let mut search = MainWindowSearch {
            pids,
            candidates: Vec::new(),
        };
        unsafe {
            EnumWindows(
                Some(collect_client_window),
                &mut search as *mut MainWindowSearch as LPARAM,
            )
        };
        select_main_window(search.candidates)
    }

    fn show_state(&mut self, window: HWND) -> Result<ShowState, PlatformError> {
        let mut placement: WINDOWPLACEMENT = unsafe { std::mem::zeroed() };
        placement.length = std::mem::size_of::<WINDOWPLACEMENT>() as u32;
        if unsafe { GetWindowPlacement(window, &mut placement) } == 0 {
            let code = unsafe { GetLastError() };
            return Err(PlatformError::WindowQuery(format!(
                "GetWindowPlacement failed: {code}"
            )));
        }

        let state = match placement.showCmd {
            SW_SHOWMINIMIZED | SW_MINIMIZE | SW_SHOWMINNOACTIVE => ShowState::Minimized,
            _ if unsafe { IsWindowVisible(window) } == 0 => ShowState::Hidden,
            SW_SHOWMAXIMIZED => ShowState::Maximized,
            _ => ShowState::Normal,
        };
        Ok(state)
    }

    fn show(&mut self, window: HWND, command: ShowCommand) -> Result<(), PlatformError> {
        let cmd = match command {
            ShowCommand::Restore => SW_RESTORE,
            ShowCommand::Show => SW_SHOW,
        };
        // The return value is the previous visibility, not an error flag.
        unsafe { ShowWindow(window, cmd) };
        Ok(())
    }

    fn set_foreground(&mut self, window: HWND) -> Result<(), PlatformError> {
        if unsafe { SetForegroundWindow(window) } == 0 {
            return Err(PlatformError::WindowQuery(
                "SetForegroundWindow was refused".to_owned(),
            ));
        }
        Ok(())
    }
}

fn wide_null(s: &OsStr) -> Vec<u16> {
    let mut v: Vec<u16> = s.encode_wide().collect();
    v.push(0);
    v
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wide_null_has_trailing_nul() {
        let v = wide_null(OsStr::new("hq://x"));
        assert_eq!(v.len(), 7);
        assert_eq!(v.last().copied(), Some(0));
    }

    #[test]
    fn only_clipboard_update_is_recognized() {
        assert!(is_clipboard_update(0x031D));
        assert!(!is_clipboard_update(0x0308));
    }

    #[test]
    fn listener_without_window_refuses_to_subscribe() {
        let mut listener = ClipboardListener::new(0);
        assert_eq!(
            listener.subscribe(),
            Err(PlatformError::ListenerWindowMissing)
        );
        listener.unsubscribe();
    }

    #[test]
    fn open_link_rejects_interior_nul() {
        let mut desktop = Win32Desktop::new();
        assert_eq!(
            desktop.open_link("hq://x\0y"),
            Err(PlatformError::InteriorNul)
        );
    }

    #[test]
    fn absent_client_has_no_window() {
        let mut desktop = Win32Desktop::new();
        let name = "hqlinker-no-such-process-7f3a";
        assert!(!desktop.is_client_running(name));
        assert_eq!(desktop.find_main_window(name), None);
    }
}
