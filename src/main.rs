mod app;
mod color;
mod data;
mod predict;
mod state;
mod ui;

use std::path::PathBuf;

use anyhow::{Context, Result};
use app::FailsightApp;
use eframe::egui;

use predict::classifier::ForestClassifier;
use state::AppState;

const DEFAULT_DATASET: &str = "assets/predictive_maintenance.csv";
const DEFAULT_MODEL: &str = "assets/model.json";

/// Load the dataset and model artifact named on the command line (or the
/// defaults). Both are required; there is no recovery path for a missing
/// file.
fn load_startup_state() -> Result<AppState> {
    let mut args = std::env::args().skip(1);
    let dataset_path = PathBuf::from(args.next().unwrap_or_else(|| DEFAULT_DATASET.to_string()));
    let model_path = PathBuf::from(args.next().unwrap_or_else(|| DEFAULT_MODEL.to_string()));

    let dataset = data::loader::load_file(&dataset_path)
        .with_context(|| format!("loading dataset from {}", dataset_path.display()))?;
    log::info!(
        "Loaded {} observations with failure types {:?}",
        dataset.len(),
        dataset.failure_types
    );

    let classifier = ForestClassifier::load(&model_path)
        .with_context(|| format!("loading model artifact from {}", model_path.display()))?;
    log::info!("Loaded classifier expecting {} features", classifier.n_features());

    Ok(AppState::new(dataset, classifier))
}

fn main() -> eframe::Result {
    env_logger::init();

    let state = match load_startup_state() {
        Ok(state) => state,
        Err(e) => {
            log::error!("startup failed: {e:#}");
            eprintln!("Error: {e:#}");
            std::process::exit(1);
        }
    };

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 800.0])
            .with_min_inner_size([600.0, 400.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Failsight – Predictive Maintenance",
        options,
        Box::new(|cc| {
            // Install image loaders so egui can render png/jpg/etc.
            egui_extras::install_image_loaders(&cc.egui_ctx);
            Ok(Box::new(FailsightApp::new(state)))
        }),
    )
}
