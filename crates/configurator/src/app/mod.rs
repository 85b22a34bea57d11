//! Main application module

mod keyboard;
mod menus;
mod styles;

use std::time::{Duration, Instant};

use eframe::egui;
use shared::ConfigurationPayload;

use crate::i18n::set_lang;
use crate::state::{AppSettings, AppState, AutosaveTimer, SessionState};
use crate::ui::{admin, notifications, saved_configs, status_bar, steps};
use crate::viewport::ViewportPanel;

/// Main application
pub struct DeskApp {
    state: AppState,
    viewport: ViewportPanel,
    /// Last applied font size (to detect changes)
    last_font_size: f32,
    autosave: AutosaveTimer,
}

impl DeskApp {
    pub fn new(cc: &eframe::CreationContext<'_>, initial: Option<ConfigurationPayload>) -> Self {
        let mut state = AppState::new(AppSettings::load());
        set_lang(state.settings.ui.language);

        let autosave = if initial.is_none() {
            SessionState::load_autosave()
        } else {
            None
        };
        state.bootstrap(initial, autosave);

        styles::configure_styles(&cc.egui_ctx, state.settings.ui.font_size);

        let last_font_size = state.settings.ui.font_size;
        let version = state.session.version();
        tracing::info!(
            cloud = state.cloud_configured(),
            version,
            "Session started"
        );

        Self {
            state,
            viewport: ViewportPanel::new(),
            last_font_size,
            autosave: AutosaveTimer::new(version),
        }
    }

    fn flush_autosave(&mut self) {
        self.state.session.autosave();
        self.autosave.mark_saved(self.state.session.version());
    }
}

impl eframe::App for DeskApp {
    /// Called periodically and on shutdown; writes edits still in the quiet period
    fn save(&mut self, _storage: &mut dyn eframe::Storage) {
        self.autosave.tick(self.state.session.version(), Instant::now());
        if self.autosave.is_pending() {
            self.flush_autosave();
        }
    }

    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Apply finished background work before anything reads the session
        self.state.poll();
        if self.state.pending() > 0 {
            ctx.request_repaint_after(Duration::from_millis(100));
        }

        if self.state.settings.ui.font_size != self.last_font_size {
            styles::apply_font_size(ctx, self.state.settings.ui.font_size);
            self.last_font_size = self.state.settings.ui.font_size;
        }

        // Autosave once edits settle
        let version = self.state.session.version();
        if self.autosave.tick(version, Instant::now()) {
            self.flush_autosave();
        } else if self.autosave.is_pending() {
            ctx.request_repaint_after(AutosaveTimer::DELAY);
        }

        keyboard::handle_keyboard(ctx, &mut self.state, &mut self.viewport);

        // ── Menu bar ──────────────────────────────────────────
        egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| {
            egui::menu::bar(ui, |ui| {
                menus::file_menu(ui, &mut self.state);
                menus::view_menu(ui, &mut self.state, &mut self.viewport);
                menus::settings_menu(ui, &mut self.state);
            });
        });

        // ── Windows ──────────────────────────────────────────
        menus::settings_window(ctx, &mut self.state);
        saved_configs::save_window(ctx, &mut self.state);
        saved_configs::load_window(ctx, &mut self.state);
        notifications::show(ctx, &mut self.state);

        // ── Status bar ───────────────────────────────────────
        egui::TopBottomPanel::bottom("status_bar")
            .exact_height(24.0)
            .frame(egui::Frame::side_top_panel(&ctx.style()).inner_margin(egui::Margin::symmetric(8, 2)))
            .show(ctx, |ui| {
                status_bar::show(ui, &self.state);
            });

        // ── Left panel: configuration steps ──────────────────
        if self.state.panels.configuration {
            egui::SidePanel::left("configuration")
                .default_width(300.0)
                .width_range(240.0..=460.0)
                .resizable(true)
                .frame(egui::Frame::side_top_panel(&ctx.style()).inner_margin(egui::Margin::same(8)))
                .show(ctx, |ui| {
                    egui::ScrollArea::vertical()
                        .id_salt("steps_scroll")
                        .show(ui, |ui| steps::show(ui, &mut self.state));
                });
        }

        // ── Right panel: admin overrides ─────────────────────
        if self.state.panels.admin {
            egui::SidePanel::right("admin")
                .default_width(320.0)
                .width_range(240.0..=520.0)
                .resizable(true)
                .frame(egui::Frame::side_top_panel(&ctx.style()).inner_margin(egui::Margin::same(8)))
                .show(ctx, |ui| {
                    egui::ScrollArea::vertical()
                        .id_salt("admin_scroll")
                        .show(ui, |ui| admin::show(ui, &mut self.state));
                });
        }

        // ── Central panel: 3D viewport ───────────────────────
        egui::CentralPanel::default()
            .frame(egui::Frame::NONE)
            .show(ctx, |ui| {
                self.viewport.show(ui, &mut self.state);
            });
    }
}
