mod app;
mod config;
mod error;
mod event;
mod service;
mod session;
mod theme;
mod ui;
mod widget;

use app::PalmsApp;
use config::Config;
use eframe::egui;
use service::sheets::LeadLogger;
use service::ChatServiceClient;
use session::SessionId;
use std::path::PathBuf;
use std::sync::mpsc;
use std::time::Instant;
use tracing_subscriber::EnvFilter;
use widget::layout::Viewport;
use widget::WidgetState;

const INITIAL_SIZE: [f32; 2] = [1280.0, 800.0];

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .init();
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    let config = Config::discover(std::env::args().nth(1).map(PathBuf::from))?;
    let (tx, rx) = mpsc::channel();

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .thread_name("palms-runtime")
        .build()?;

    let session_id = SessionId::generate();
    tracing::info!(%session_id, api_url = %config.service.api_url, "starting chat widget");

    let service = ChatServiceClient::new(
        config.service.api_url.clone(),
        session_id.clone(),
        LeadLogger::new(&config.sheets),
        tx,
        runtime.handle().clone(),
    );
    let mut state = WidgetState::new(
        session_id,
        config.widget.clone(),
        config.timing,
        Viewport {
            width: INITIAL_SIZE[0],
            height: INITIAL_SIZE[1],
        },
    );

    let _runtime = runtime;

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size(INITIAL_SIZE)
            .with_min_inner_size([360.0, 480.0]),
        ..Default::default()
    };

    eframe::run_native(
        "PALMS",
        native_options,
        Box::new(move |creation_context| {
            let service = service.with_repaint(creation_context.egui_ctx.clone());
            state.start(Instant::now());
            Ok(Box::new(PalmsApp::new(rx, service, state)))
        }),
    )?;

    Ok(())
}
