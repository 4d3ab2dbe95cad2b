use super::aggregate::{
    most_frequent, pillar_composition, top_topics_per_pillar, yearly_mean, yearly_mean_by_company,
};
use super::filter::{filtered_records, resolve_selection, FilterSelection};
use super::model::{EsgDataset, FilingRecord, Pillar, PillarTopTopic, PillarValues, TopicCount};

/// Placeholder shown by every panel when the filters match nothing.
pub const NO_DATA_MESSAGE: &str = "No data available for selected filters";

/// Legend name of the unfiltered yearly mean series.
pub const OVERALL_AVERAGE: &str = "Overall Average";

/// Card text when a dimension has no labels at all.
pub const NOT_AVAILABLE: &str = "N/A";

// ---------------------------------------------------------------------------
// Chart data
// ---------------------------------------------------------------------------

/// A named line of `[year, value]` points.
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    pub name: String,
    pub points: Vec<[f64; 2]>,
}

/// Per-company yearly means plus the global yearly mean for reference.
#[derive(Debug, Clone, PartialEq)]
pub struct TrendChart {
    pub companies: Vec<Series>,
    pub overall_average: Series,
}

/// Most frequent themes over the filtered filings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThemeCards {
    pub environmental: String,
    pub social: String,
    pub governance: String,
    pub combined: String,
}

/// Everything the central panel draws for one selection.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardCharts {
    pub filing_count: usize,
    pub esg_trend: TrendChart,
    pub gri_trend: TrendChart,
    pub pillar_topics: Vec<PillarTopTopic>,
    pub dominant_topics: Vec<TopicCount>,
    pub cards: ThemeCards,
    /// Mean percentage-of-report per pillar.
    pub composition: PillarValues<Option<f64>>,
}

impl DashboardCharts {
    /// Each pillar's share of the three means, missing means counted as 0.
    /// All zeros when nothing was reported.
    pub fn composition_shares(&self) -> PillarValues<f64> {
        let [e, s, g] = Pillar::ALL.map(|p| self.composition.get(p).unwrap_or(0.0).max(0.0));
        let total = e + s + g;
        if total <= 0.0 {
            return PillarValues::new(0.0, 0.0, 0.0);
        }
        PillarValues::new(e / total, s / total, g / total)
    }
}

/// Result of one recomputation: either placeholders or chart data.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum ChartSet {
    #[default]
    NoData,
    Ready(Box<DashboardCharts>),
}

// ---------------------------------------------------------------------------
// Building
// ---------------------------------------------------------------------------

/// Filter the dataset and compute every panel's data from scratch.
pub fn build_charts(dataset: &EsgDataset, selection: &FilterSelection) -> ChartSet {
    let rows = filtered_records(dataset, selection);
    log::debug!(
        "Rebuilding charts: {} sectors, {} companies, {} years selected → {} filings",
        selection.sectors.len(),
        selection.companies.len(),
        selection.years.len(),
        rows.len()
    );
    if rows.is_empty() {
        return ChartSet::NoData;
    }

    let resolved = resolve_selection(dataset, selection);
    let dominant_topics = dataset
        .dominant_topic_per_year
        .iter()
        .filter(|t| resolved.years.contains(&t.year))
        .cloned()
        .collect();

    ChartSet::Ready(Box::new(DashboardCharts {
        filing_count: rows.len(),
        esg_trend: trend_chart(dataset, &rows, |r| r.overall_esg_content),
        gri_trend: trend_chart(dataset, &rows, |r| Some(r.gri)),
        pillar_topics: top_topics_per_pillar(&rows),
        dominant_topics,
        cards: theme_cards(&rows),
        composition: pillar_composition(&rows),
    }))
}

fn trend_chart<F>(dataset: &EsgDataset, rows: &[&FilingRecord], metric: F) -> TrendChart
where
    F: Fn(&FilingRecord) -> Option<f64>,
{
    let companies = yearly_mean_by_company(rows.iter().copied(), &metric)
        .into_iter()
        .map(|(name, points)| Series { name, points })
        .collect();
    // The reference line ignores the filters.
    let overall_average = Series {
        name: OVERALL_AVERAGE.to_string(),
        points: yearly_mean(&dataset.records, &metric),
    };
    TrendChart {
        companies,
        overall_average,
    }
}

fn theme_cards(rows: &[&FilingRecord]) -> ThemeCards {
    let pillar = |p: Pillar| {
        most_frequent(rows.iter().map(|r| r.topic(p))).unwrap_or_else(|| NOT_AVAILABLE.to_string())
    };
    ThemeCards {
        environmental: pillar(Pillar::Environmental),
        social: pillar(Pillar::Social),
        governance: pillar(Pillar::Governance),
        combined: most_frequent(rows.iter().map(|r| r.esg_topic_combination.as_deref()))
            .unwrap_or_else(|| NOT_AVAILABLE.to_string()),
    }
}
