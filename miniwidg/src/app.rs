//! eframe application driving a root panel

use crate::config::PanelConfig;
use crate::panel::Panel;
use crate::utils::Result;
use eframe::egui;
use egui::ViewportCommand;
use log::{error, info, warn};
use std::time::Duration;

/// Per-frame hook run after `refresh` and before drawing
pub type RefreshHook = Box<dyn FnMut(&mut Panel) -> Result<()>>;

/// Main egui application
pub struct PanelApp {
    panel: Panel,
    config: PanelConfig,
    hook: Option<RefreshHook>,
    /// Root visibility last sent to the window
    shown: bool,
}

impl PanelApp {
    pub fn new(panel: Panel, config: PanelConfig, hook: Option<RefreshHook>) -> Self {
        Self {
            panel,
            config,
            hook,
            shown: true,
        }
    }

    pub fn panel(&self) -> &Panel {
        &self.panel
    }

    pub fn panel_mut(&mut self) -> &mut Panel {
        &mut self.panel
    }

    fn sync_root_visibility(&mut self, ctx: &egui::Context) {
        let visible = self.panel.is_visible();
        if visible != self.shown {
            ctx.send_viewport_cmd(ViewportCommand::Visible(visible));
            self.shown = visible;
        }
    }

    fn handle_close_request(&mut self, ctx: &egui::Context) {
        if !ctx.input(|i| i.viewport().close_requested()) {
            return;
        }

        if self.panel.has_exit_callback() {
            ctx.send_viewport_cmd(ViewportCommand::CancelClose);
            self.panel.on_closing();
        } else {
            info!("Closing panel '{}'", self.panel.title());
        }
    }
}

impl eframe::App for PanelApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if let Err(e) = self.panel.refresh() {
            error!("Refresh of panel '{}' failed: {}", self.panel.title(), e);
        }

        if self.panel.is_destroyed() {
            ctx.send_viewport_cmd(ViewportCommand::Close);
            return;
        }

        if let Some(hook) = &mut self.hook {
            if let Err(e) = hook(&mut self.panel) {
                warn!("Refresh hook failed: {}", e);
            }
        }

        self.sync_root_visibility(ctx);

        if let Err(e) = self.panel.show(ctx, &self.config.window) {
            error!("Failed to draw panel '{}': {}", self.panel.title(), e);
        }

        self.handle_close_request(ctx);

        // keep refreshing without input so hotkeys are picked up
        ctx.request_repaint_after(Duration::from_millis(self.config.refresh.interval_ms));
    }
}

/// Run `panel` until its window is closed, with configuration loaded from
/// the user's config directory
pub fn run(panel: Panel) -> Result<()> {
    run_with_config(panel, load_config(), None)
}

/// Like [`run`], calling `hook` every frame after the panel refreshed
pub fn run_with<F>(panel: Panel, hook: F) -> Result<()>
where
    F: FnMut(&mut Panel) -> Result<()> + 'static,
{
    run_with_config(panel, load_config(), Some(Box::new(hook)))
}

pub fn run_with_config(
    panel: Panel,
    mut config: PanelConfig,
    hook: Option<RefreshHook>,
) -> Result<()> {
    config.validate()?;

    let native_options = eframe::NativeOptions {
        viewport: panel.viewport_builder(&config.window),
        vsync: true,
        ..Default::default()
    };

    let title = panel.title().to_string();
    info!("Starting panel '{}'", title);

    eframe::run_native(
        &title,
        native_options,
        Box::new(move |cc| {
            cc.egui_ctx.set_zoom_factor(config.window.scale_factor);
            info!("Application created successfully");
            Ok(Box::new(PanelApp::new(panel, config, hook)))
        }),
    )?;

    info!("Panel '{}' exited", title);
    Ok(())
}

fn load_config() -> PanelConfig {
    PanelConfig::load().unwrap_or_else(|e| {
        warn!("Using default configuration: {}", e);
        PanelConfig::default()
    })
}
