use std::sync::Arc;

use eframe::egui;
use mindmate::{
    backend::HttpStudyApi,
    core::{
        config::AppConfig,
        logging::init_logging,
        session::{
            FileTokenStorage,
            Session,
        },
    },
    gui::StudyApp,
    persistence::DataDir,
};
use tracing::info;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging();

    let config = AppConfig::from_env()?;
    let data_dir = DataDir::app_default();
    info!("Backend: {}, data directory: {}", config.backend_url, data_dir.root().display());

    let session = Session::new(Arc::new(FileTokenStorage::new(data_dir.clone())));
    let api = Arc::new(HttpStudyApi::new(&config, session.clone())?);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("MindMate")
            .with_inner_size([1280.0, 800.0])
            .with_min_inner_size([800.0, 560.0]),
        ..Default::default()
    };

    eframe::run_native(
        "MindMate",
        options,
        Box::new(move |cc| {
            let app = StudyApp::new(cc, &config, data_dir, session, api)?;
            Ok(Box::new(app))
        }),
    )?;

    Ok(())
}
