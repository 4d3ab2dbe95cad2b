mod app;
mod cli;
mod color;
mod data;
mod state;
mod ui;

use anyhow::Context;
use app::EsgLensApp;
use clap::Parser;
use eframe::egui;

use crate::cli::Args;
use crate::data::loader::load_dataset;
use crate::state::AppState;

pub const APP_TITLE: &str =
    "Decoding ESG: Measuring Clarity and Greenwashing in Corporate Disclosures";

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(args.log_level()))
        .init();

    // Input problems are fatal before any window opens.
    let dataset = match load_dataset(&args.scores, &args.topics).with_context(|| {
        format!(
            "loading {} and {}",
            args.scores.display(),
            args.topics.display()
        )
    }) {
        Ok(dataset) => dataset,
        Err(e) => {
            log::error!("{e:#}");
            std::process::exit(1);
        }
    };
    log::info!(
        "Loaded {} filings: {} sectors, {} companies, {} years",
        dataset.len(),
        dataset.sectors.len(),
        dataset.tickers.len(),
        dataset.years.len()
    );
    if dataset.is_empty() {
        log::warn!("No filing matched between the two tables; every chart will be empty");
    }

    let mut state = AppState::new(args.preferred_sector.clone());
    state.set_dataset(dataset);
    state.sources = Some((args.scores.clone(), args.topics.clone()));

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1400.0, 900.0])
            .with_min_inner_size([800.0, 500.0]),
        ..Default::default()
    };

    eframe::run_native(
        APP_TITLE,
        options,
        Box::new(|cc| Ok(Box::new(EsgLensApp::new(cc, state)))),
    )
    .map_err(|e| anyhow::anyhow!("running the dashboard window: {e}"))
}
