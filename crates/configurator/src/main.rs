mod app;
pub mod i18n;
mod ui;
mod viewport;

// Re-export library modules so `crate::state` etc. resolve to the lib crate
// everywhere in the binary.
pub use desk_configurator_lib::state;

use app::DeskApp;
use shared::ConfigurationPayload;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "desk_configurator=info,desk_configurator_lib=info".into()),
        )
        .init();

    // Parse --config <path> argument
    let initial = parse_config_arg();

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Desk Configurator")
            .with_inner_size([1400.0, 900.0])
            .with_min_inner_size([900.0, 560.0]),
        ..Default::default()
    };

    if let Err(e) = eframe::run_native(
        "desk-configurator",
        native_options,
        Box::new(move |cc| Ok(Box::new(DeskApp::new(cc, initial)))),
    ) {
        tracing::error!("Failed to start application: {e}");
    }
}

fn parse_config_arg() -> Option<ConfigurationPayload> {
    let args: Vec<String> = std::env::args().collect();
    let i = args.iter().position(|a| a == "--config")?;
    let Some(path) = args.get(i + 1) else {
        tracing::error!("--config needs a file path");
        return None;
    };
    match state::SessionState::load_from_file(std::path::Path::new(path)) {
        Ok(payload) => {
            tracing::info!(
                "Loaded configuration from {path} ({} overrides)",
                payload.overrides.len()
            );
            Some(payload)
        }
        Err(e) => {
            tracing::error!("Failed to load configuration from {path}: {e}");
            None
        }
    }
}
