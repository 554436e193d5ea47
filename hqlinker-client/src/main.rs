#![cfg_attr(target_os = "windows", windows_subsystem = "windows")]

#[cfg(not(target_os = "windows"))]
fn main() {
    eprintln!("HQLinker is a Windows tray utility and does not run on this platform");
}

#[cfg(target_os = "windows")]
fn main() {
    windows_client::run();
}

#[cfg(target_os = "windows")]
mod windows_client {
    use std::{
        cell::RefCell,
        rc::{Rc, Weak},
        time::{Duration, SystemTime, UNIX_EPOCH},
    };

    use clap::Parser;
    use hqlinker_core::{
        DeferredEvent, DeferredEvents, DoubleClickDetector, LinkSession, LinkerConfig,
        MonitorState, Notice, NoticeSeverity, OneShotTimer,
    };
    use native_windows_gui as nwg;
    use tracing::{debug, error, info, warn};

    use hqlinker_client::{
        cli::ClientArgs,
        logging::init_logging,
        win32::{self, ClipboardListener, Win32Desktop},
    };

    static ICON_LINK_BYTES: &[u8] = include_bytes!("../assets/link.ico");
    static ICON_LINK_BROKEN_BYTES: &[u8] = include_bytes!("../assets/link-broken.ico");

    const APP_TITLE: &str = "HQLinker";

    struct SettleTimer {
        timer: nwg::AnimationTimer,
    }

    impl OneShotTimer for SettleTimer {
        fn start(&mut self) {
            self.timer.start();
        }

        fn stop(&mut self) {
            self.timer.stop();
        }
    }

    struct HqLinkerTrayApp {
        app_window: nwg::MessageWindow,
        tray: nwg::TrayNotification,
        icon_monitoring: nwg::Icon,
        icon_paused: nwg::Icon,

        tray_exit_item: nwg::MenuItem,

        event_handlers: Vec<nwg::EventHandler>,
        raw_handlers: Vec<nwg::RawEventHandler>,

        desktop: Win32Desktop,
        listener: ClipboardListener,
        session: LinkSession<SettleTimer>,
        double_click: DoubleClickDetector,
    }

    impl HqLinkerTrayApp {
        fn build(config: LinkerConfig) -> Result<Rc<RefCell<Self>>, String> {
            let mut app_window = nwg::MessageWindow::default();
            let mut tray = nwg::TrayNotification::default();
            let icon_monitoring =
                nwg::Icon::from_bin(ICON_LINK_BYTES).map_err(|err| err.to_string())?;
            let icon_paused =
                nwg::Icon::from_bin(ICON_LINK_BROKEN_BYTES).map_err(|err| err.to_string())?;

            let mut tray_menu = nwg::Menu::default();
            let mut tray_exit_item = nwg::MenuItem::default();
            let mut settle_timer = nwg::AnimationTimer::default();

            nwg::MessageWindow::builder()
                .build(&mut app_window)
                .map_err(|err| err.to_string())?;

            nwg::TrayNotification::builder()
                .parent(&app_window)
                .icon(Some(&icon_paused))
                .tip(Some(MonitorState::Paused.tip()))
                .flags(
                    nwg::TrayNotificationFlags::USER_ICON | nwg::TrayNotificationFlags::LARGE_ICON,
                )
                .build(&mut tray)
                .map_err(|err| err.to_string())?;

            nwg::Menu::builder()
                .popup(true)
                .parent(&app_window)
                .build(&mut tray_menu)
                .map_err(|err| err.to_string())?;

            nwg::MenuItem::builder()
                .text("Exit")
                .parent(&tray_menu)
                .build(&mut tray_exit_item)
                .map_err(|err| err.to_string())?;

            nwg::AnimationTimer::builder()
                .parent(&app_window)
                .interval(config.settle_delay)
                .max_tick(Some(1))
                .active(false)
                .build(&mut settle_timer)
                .map_err(|err| err.to_string())?;

            let hwnd = app_window
                .handle
                .hwnd()
                .map(|hwnd| hwnd as isize)
                .unwrap_or(0);

            let tray_handle = tray.handle.clone();
            let settle_handle = settle_timer.handle.clone();
            let tray_menu = Rc::new(tray_menu);
            let deferred = Rc::new(DeferredEvents::new());

            let app = Rc::new(RefCell::new(Self {
                app_window,
                tray,
                icon_monitoring,
                icon_paused,
                tray_exit_item,
                event_handlers: Vec::new(),
                raw_handlers: Vec::new(),
                desktop: Win32Desktop::new(),
                listener: ClipboardListener::new(hwnd),
                session: LinkSession::new(
                    &config,
                    SettleTimer {
                        timer: settle_timer,
                    },
                ),
                double_click: DoubleClickDetector::default(),
            }));

            let weak: Weak<RefCell<Self>> = Rc::downgrade(&app);
            let window_handle = app.borrow().app_window.handle.clone();

            let event_handler = {
                let weak = weak.clone();
                let deferred = Rc::clone(&deferred);
                nwg::full_bind_event_handler(&window_handle, move |event, _evt_data, handle| {
                    let Some(app) = weak.upgrade() else {
                        return;
                    };
                    match event {
                        // The popup runs a modal message loop; the app must stay unborrowed.
                        nwg::Event::OnContextMenu if handle == tray_handle => {
                            let (x, y) = nwg::GlobalCursor::position();
                            tray_menu.popup(x, y);
                        }
                        _ => match app.try_borrow_mut() {
                            Ok(mut app_mut) => app_mut.handle_event(event, handle),
                            Err(_) if matches!(event, nwg::Event::OnTimerTick)
                                && handle == settle_handle =>
                            {
                                debug!("settle tick deferred");
                                deferred.defer(DeferredEvent::SettleElapsed);
                            }
                            Err(_) => {}
                        },
                    }
                    Self::drain_deferred(&app, &deferred);
                })
            };

            let clipboard_hook = nwg::bind_raw_event_handler(
                &window_handle,
                // Raw handler ids must stay above 0xFFFF.
                0x1_031D,
                move |_hwnd, msg, _w, _l| {
                    if win32::is_clipboard_update(msg) {
                        if let Some(app) = weak.upgrade() {
                            match app.try_borrow_mut() {
                                Ok(mut app_mut) => app_mut.on_clipboard_update(),
                                Err(_) => {
                                    debug!("clipboard update deferred");
                                    deferred.defer(DeferredEvent::ClipboardChange);
                                }
                            }
                            Self::drain_deferred(&app, &deferred);
                        }
                    }
                    None
                },
            )
            .map_err(|err| err.to_string())?;

            {
                let mut app_mut = app.borrow_mut();
                app_mut.event_handlers.push(event_handler);
                app_mut.raw_handlers.push(clipboard_hook);
                if config.start_monitoring {
                    app_mut.start_monitoring();
                } else {
                    app_mut.refresh_tray();
                }
            }

            Ok(app)
        }

        fn drain_deferred(app: &RefCell<Self>, deferred: &DeferredEvents) {
            deferred.drain(app, |app, event| match event {
                DeferredEvent::ClipboardChange => app.on_clipboard_update(),
                DeferredEvent::SettleElapsed => app.on_settle_elapsed(),
            });
        }

        fn handle_event(&mut self, event: nwg::Event, handle: nwg::ControlHandle) {
            match event {
                nwg::Event::OnTimerTick
                    if handle == self.session.settler().timer().timer.handle =>
                {
                    self.on_settle_elapsed();
                }
                nwg::Event::OnMousePress(nwg::MousePressEvent::MousePressLeftUp)
                    if handle == self.tray.handle =>
                {
                    // native-windows-gui has no dependable tray double-click event.
                    if self.double_click.click(now_unix_ms()) {
                        self.toggle_monitoring();
                    }
                }
                nwg::Event::OnMenuItemSelected if handle == self.tray_exit_item.handle => {
                    self.exit();
                }
                _ => {}
            }
        }

        fn on_clipboard_update(&mut self) {
            let Some(outcome) = self
                .session
                .on_clipboard_change(win32::read_clipboard_text, &mut self.desktop)
            else {
                return;
            };
            debug!(?outcome, "clipboard change handled");

            if let Some(notice) = outcome.notice(self.session.dispatcher().client_process()) {
                self.show_notice(&notice);
            }
        }

        fn on_settle_elapsed(&mut self) {
            let outcome = self.session.on_settle_elapsed(&mut self.desktop);
            debug!(?outcome, "settle delay elapsed");
        }

        fn start_monitoring(&mut self) {
            if let Err(err) = self.session.start_monitoring(&mut self.listener) {
                error!(%err, "clipboard listener unavailable");
                self.show_notice(&Notice {
                    severity: NoticeSeverity::Warning,
                    text: "Clipboard monitoring is unavailable".to_owned(),
                });
            }
            self.refresh_tray();
        }

        fn toggle_monitoring(&mut self) {
            match self.session.toggle_monitoring(&mut self.listener) {
                Ok(state) => info!(?state, "monitoring toggled"),
                Err(err) => {
                    warn!(%err, "monitoring could not be switched on");
                    self.show_notice(&Notice {
                        severity: NoticeSeverity::Warning,
                        text: "Clipboard monitoring is unavailable".to_owned(),
                    });
                }
            }
            self.refresh_tray();
        }

        fn refresh_tray(&self) {
            let state = self.session.monitor_state();
            self.tray.set_icon(self.icon_for_state(state));
            self.tray.set_tip(state.tip());
        }

        fn icon_for_state(&self, state: MonitorState) -> &nwg::Icon {
            match state {
                MonitorState::Monitoring => &self.icon_monitoring,
                MonitorState::Paused => &self.icon_paused,
            }
        }

        fn show_notice(&self, notice: &Notice) {
            match notice.severity {
                NoticeSeverity::Info => {
                    let icon = self.icon_for_state(self.session.monitor_state());
                    let flags = nwg::TrayNotificationFlags::USER_ICON
                        | nwg::TrayNotificationFlags::LARGE_ICON;
                    self.tray
                        .show(&notice.text, Some(APP_TITLE), Some(flags), Some(icon));
                }
                NoticeSeverity::Warning => {
                    self.tray.show(
                        &notice.text,
                        Some(APP_TITLE),
                        Some(nwg::TrayNotificationFlags::WARNING_ICON),
                        None,
                    );
                }
            }
        }

        fn exit(&mut self) {
            self.session.shutdown(&mut self.listener);
            nwg::stop_thread_dispatch();
        }
    }

    impl Drop for HqLinkerTrayApp {
        fn drop(&mut self) {
            for handler in self.raw_handlers.drain(..) {
                if let Err(err) = nwg::unbind_raw_event_handler(&handler) {
                    warn!("unbinding clipboard hook failed: {}", err);
                }
            }
            for handler in self.event_handlers.drain(..) {
                nwg::unbind_event_handler(&handler);
            }
        }
    }

    pub fn run() {
        init_logging();

        if let Err(err) = nwg::init() {
            error!("native-windows-gui init failed: {}", err);
            std::process::exit(1);
        }

        let args = match ClientArgs::try_parse() {
            Ok(args) => args,
            Err(err) => {
                error!("arg parse failed: {}", err);
                nwg::simple_message(APP_TITLE, &err.to_string());
                std::process::exit(2);
            }
        };

        let config = args.into_config();
        if let Err(err) = config.validate() {
            error!("invalid configuration: {}", err);
            nwg::simple_message(APP_TITLE, &format!("Invalid configuration:\n\n{err}"));
            std::process::exit(2);
        }
        info!(
            scheme = %config.scheme_prefix,
            client = %config.client_process,
            settle_ms = config.settle_delay.as_millis() as u64,
            "starting"
        );

        let _app = match HqLinkerTrayApp::build(config) {
            Ok(app) => app,
            Err(err) => {
                error!("failed to build tray app: {}", err);
                nwg::simple_message(APP_TITLE, &format!("Failed to start:\n\n{err}"));
                std::process::exit(1);
            }
        };

        nwg::dispatch_thread_events();
        info!("exiting");
    }

    fn now_unix_ms() -> u64 {
        let duration = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_else(|_| Duration::from_secs(0));
        duration.as_millis() as u64
    }
}
