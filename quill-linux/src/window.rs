use std::cell::{Cell, RefCell};
use std::rc::Rc;

use gtk4::prelude::*;
use gtk4::{gio, glib};
use libadwaita as adw;
use libadwaita::prelude::*;
use webkit6::prelude::*;

use quill_core::bridge;
use quill_core::host::PrivilegedHost;
use quill_core::keybindings::Keymap;
use quill_core::session::{Intent, SessionController};
use quill_core::settings;
use quill_editor::protocol::MESSAGE_HANDLER;
use quill_editor::{assets, EventRouter, ScriptSurface};

use crate::dialogs::{AlertConfirm, GtkShell};

pub fn build_window(app: &adw::Application) {
    let settings = Rc::new(RefCell::new(settings::load()));

    let window = {
        let s = settings.borrow();
        adw::ApplicationWindow::builder()
            .application(app)
            .title("Quill")
            .default_width(s.window_width)
            .default_height(s.window_height)
            .build()
    };

    // Set by the host once a quit is confirmed, so the close handler lets
    // the window go without asking again.
    let quitting = Rc::new(Cell::new(false));

    // --- Privileged side: file dialogs, disk I/O, process exit ---
    let (file_bridge, endpoint) = bridge::channel();
    let host = Rc::new(
        PrivilegedHost::new(GtkShell::new(&window, quitting.clone()))
            .with_last_directory(settings.borrow().last_directory_path()),
    );
    {
        let host = host.clone();
        glib::spawn_future_local(async move {
            host.serve(endpoint).await;
        });
    }

    // --- Editor page ---
    let user_content_manager = webkit6::UserContentManager::new();
    let webview = webkit6::WebView::builder()
        .user_content_manager(&user_content_manager)
        .hexpand(true)
        .vexpand(true)
        .build();

    if let Some(wk_settings) = webkit6::prelude::WebViewExt::settings(&webview) {
        wk_settings.set_enable_javascript(true);
        wk_settings.set_enable_developer_extras(cfg!(debug_assertions));
        wk_settings.set_allow_file_access_from_file_urls(false);
        wk_settings.set_allow_universal_access_from_file_urls(false);
    }

    let surface = {
        let webview = webview.clone();
        ScriptSurface::new(move |script: &str| {
            webview.evaluate_javascript(script, None, None, None::<&gio::Cancellable>, |_| {});
        })
    };

    let router = {
        let s = settings.borrow();
        let session = SessionController::new(file_bridge, AlertConfirm::new(&window), surface)
            .with_open_confirmation(s.confirm_discard_on_open);
        Rc::new(EventRouter::new(
            session,
            Keymap::new(s.platform(), &s.keybinding_overrides),
        ))
    };

    user_content_manager.register_script_message_handler(MESSAGE_HANDLER, None);
    {
        let router = router.clone();
        user_content_manager.connect_script_message_received(
            Some(MESSAGE_HANDLER),
            move |_ucm, value| {
                let json_str = value.to_str().to_string();
                let router = router.clone();
                glib::spawn_future_local(async move {
                    if let Some(outcome) = router.handle_json(&json_str).await {
                        log::debug!("Page action finished: {:?}", outcome);
                    }
                });
            },
        );
    }

    webview.load_html(&assets::editor_page(), None);

    let toolbar_view = adw::ToolbarView::new();
    toolbar_view.add_top_bar(&adw::HeaderBar::new());
    toolbar_view.set_content(Some(&webview));
    window.set_content(Some(&toolbar_view));

    // --- Close: unsaved changes go through the same Quit path as the page ---
    {
        let router = router.clone();
        let host = host.clone();
        let settings = settings.clone();
        let quitting = quitting.clone();
        window.connect_close_request(move |window| {
            if !quitting.get() && router.session().is_dirty() {
                let router = router.clone();
                glib::spawn_future_local(async move {
                    let outcome = router.session().run(Intent::Quit).await;
                    log::debug!("Close request: {:?}", outcome);
                });
                return glib::Propagation::Stop;
            }

            {
                let mut s = settings.borrow_mut();
                s.window_width = window.width();
                s.window_height = window.height();
                s.last_directory = host
                    .last_directory()
                    .map(|dir| dir.to_string_lossy().into_owned())
                    .unwrap_or_default();
            }
            if let Err(e) = settings::save(&settings.borrow()) {
                log::error!("{}", e);
            }
            glib::Propagation::Proceed
        });
    }

    window.present();
}
