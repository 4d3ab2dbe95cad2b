use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use crate::color::ColorMap;
use crate::data::charts::{build_charts, ChartSet};
use crate::data::filter::{sync_filter_options, FilterOptions, FilterSelection};
use crate::data::loader::load_dataset;
use crate::data::model::EsgDataset;

/// One of the three multi-select filters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterDimension {
    Sector,
    Company,
    Year,
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    /// Loaded dataset (None until a load succeeds).
    pub dataset: Option<EsgDataset>,

    /// Choices and defaults of the three filters.
    pub options: FilterOptions,

    /// Current filter values.
    pub selection: FilterSelection,

    /// Chart data for `selection` (cached between repaints).
    pub charts: ChartSet,

    /// Stable colours per company name.
    pub company_colors: ColorMap,

    /// Stable colours per topic combination.
    pub topic_colors: ColorMap,

    /// Sector chosen when the sector filter is cleared.
    pub preferred_sector: String,

    /// Source files of the current dataset, for reloading.
    pub sources: Option<(PathBuf, PathBuf)>,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl AppState {
    pub fn new(preferred_sector: impl Into<String>) -> Self {
        Self {
            dataset: None,
            options: FilterOptions::default(),
            selection: FilterSelection::default(),
            charts: ChartSet::NoData,
            company_colors: ColorMap::default(),
            topic_colors: ColorMap::default(),
            preferred_sector: preferred_sector.into(),
            sources: None,
            status_message: None,
        }
    }

    /// Ingest a newly loaded dataset and reset the filters to their defaults.
    pub fn set_dataset(&mut self, dataset: EsgDataset) {
        self.company_colors = ColorMap::new(dataset.company_names.iter().cloned());
        self.topic_colors = ColorMap::new(
            dataset
                .dominant_topic_per_year
                .iter()
                .map(|t| t.topic.clone()),
        );
        self.dataset = Some(dataset);
        self.status_message = None;
        self.set_sectors(BTreeSet::new());
    }

    /// Load both tables and replace the dataset. Failures are reported in
    /// the status line and the previous dataset is kept.
    pub fn load(&mut self, scores: &Path, topics: &Path) {
        match load_dataset(scores, topics) {
            Ok(dataset) => {
                log::info!(
                    "Loaded {} filings across {} sectors from {} and {}",
                    dataset.len(),
                    dataset.sectors.len(),
                    scores.display(),
                    topics.display()
                );
                self.set_dataset(dataset);
                self.sources = Some((scores.to_path_buf(), topics.to_path_buf()));
            }
            Err(e) => {
                log::error!("Failed to load data: {e:#}");
                self.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }

    /// Reload from the files the current dataset came from.
    pub fn reload(&mut self) {
        if let Some((scores, topics)) = self.sources.clone() {
            self.load(&scores, &topics);
        }
    }

    /// Change the sector selection. Companies and years are reset to the
    /// defaults for the new sectors.
    pub fn set_sectors(&mut self, sectors: BTreeSet<String>) {
        let Some(ds) = &self.dataset else {
            return;
        };
        self.options = sync_filter_options(ds, &sectors, &self.preferred_sector);
        self.selection = self.options.default_selection();
        self.refresh_charts();
    }

    /// Recompute `charts` after a filter change.
    pub fn refresh_charts(&mut self) {
        self.charts = match &self.dataset {
            Some(ds) => build_charts(ds, &self.selection),
            None => ChartSet::NoData,
        };
    }

    pub fn toggle_sector(&mut self, sector: &str) {
        let mut sectors = self.selection.sectors.clone();
        if !sectors.remove(sector) {
            sectors.insert(sector.to_string());
        }
        self.set_sectors(sectors);
    }

    pub fn toggle_company(&mut self, ticker: &str) {
        if !self.selection.companies.remove(ticker) {
            self.selection.companies.insert(ticker.to_string());
        }
        self.refresh_charts();
    }

    pub fn toggle_year(&mut self, year: i32) {
        if !self.selection.years.remove(&year) {
            self.selection.years.insert(year);
        }
        self.refresh_charts();
    }

    /// Select every option of a filter.
    pub fn select_all(&mut self, dimension: FilterDimension) {
        match dimension {
            FilterDimension::Sector => {
                let all = self.options.sector_options.iter().cloned().collect();
                self.set_sectors(all);
            }
            FilterDimension::Company => {
                self.selection.companies = self.options.company_options.iter().cloned().collect();
                self.refresh_charts();
            }
            FilterDimension::Year => {
                self.selection.years = self.options.year_options.iter().copied().collect();
                self.refresh_charts();
            }
        }
    }

    /// Clear a filter. An empty company or year filter shows everything;
    /// an empty sector filter falls back to the default sector.
    pub fn select_none(&mut self, dimension: FilterDimension) {
        match dimension {
            FilterDimension::Sector => self.set_sectors(BTreeSet::new()),
            FilterDimension::Company => {
                self.selection.companies.clear();
                self.refresh_charts();
            }
            FilterDimension::Year => {
                self.selection.years.clear();
                self.refresh_charts();
            }
        }
    }
}
