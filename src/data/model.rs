use std::collections::BTreeSet;
use std::fmt;

use chrono::{Datelike, NaiveDate};

// ---------------------------------------------------------------------------
// Pillar – E, S or G
// ---------------------------------------------------------------------------

/// One of the three ESG disclosure pillars.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Pillar {
    Environmental,
    Social,
    Governance,
}

impl Pillar {
    /// All pillars in display order.
    pub const ALL: [Pillar; 3] = [Pillar::Environmental, Pillar::Social, Pillar::Governance];

    /// Single-letter code used in legends and column names.
    pub fn code(self) -> &'static str {
        match self {
            Pillar::Environmental => "E",
            Pillar::Social => "S",
            Pillar::Governance => "G",
        }
    }

    fn index(self) -> usize {
        match self {
            Pillar::Environmental => 0,
            Pillar::Social => 1,
            Pillar::Governance => 2,
        }
    }
}

impl fmt::Display for Pillar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Per-pillar values stored in E, S, G order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PillarValues<T>(pub [T; 3]);

impl<T> PillarValues<T> {
    pub fn new(e: T, s: T, g: T) -> Self {
        Self([e, s, g])
    }

    pub fn get(&self, pillar: Pillar) -> &T {
        &self.0[pillar.index()]
    }
}

// ---------------------------------------------------------------------------
// TopicAssignment – one row of the topic table
// ---------------------------------------------------------------------------

/// Topic labels assigned to a single filing upstream.
#[derive(Debug, Clone)]
pub struct TopicAssignment {
    pub ticker: String,
    pub filing_date: NaiveDate,
    pub company_name: Option<String>,
    pub sector: Option<String>,
    pub pillar_topics: PillarValues<Option<String>>,
    pub esg_topic_combination: Option<String>,
}

impl TopicAssignment {
    pub fn filing_year(&self) -> i32 {
        self.filing_date.year()
    }
}

// ---------------------------------------------------------------------------
// ScoreRecord – one row of the score table
// ---------------------------------------------------------------------------

/// Concreteness scores computed upstream for a single filing.
#[derive(Debug, Clone)]
pub struct ScoreRecord {
    pub ticker: String,
    pub filing_date: NaiveDate,
    pub overall_esg_content: Option<f64>,
    /// Already coerced: missing or non-numeric values are `0.0`.
    pub gri: f64,
    pub pillar_percentages: PillarValues<Option<f64>>,
}

// ---------------------------------------------------------------------------
// FilingRecord – one row of the merged table
// ---------------------------------------------------------------------------

/// A filing present in both source tables.
#[derive(Debug, Clone)]
pub struct FilingRecord {
    pub ticker: String,
    pub filing_date: NaiveDate,
    pub filing_year: i32,
    pub company_name: Option<String>,
    pub sector: Option<String>,
    pub overall_esg_content: Option<f64>,
    pub gri: f64,
    pub pillar_percentages: PillarValues<Option<f64>>,
    pub pillar_topics: PillarValues<Option<String>>,
    pub esg_topic_combination: Option<String>,
}

impl FilingRecord {
    /// Combine a score row with its matching topic row.
    pub fn merge(score: &ScoreRecord, topic: &TopicAssignment) -> Self {
        Self {
            ticker: score.ticker.clone(),
            filing_date: score.filing_date,
            filing_year: score.filing_date.year(),
            company_name: topic.company_name.clone(),
            sector: topic.sector.clone(),
            overall_esg_content: score.overall_esg_content,
            gri: score.gri,
            pillar_percentages: score.pillar_percentages.clone(),
            pillar_topics: topic.pillar_topics.clone(),
            esg_topic_combination: topic.esg_topic_combination.clone(),
        }
    }

    pub fn topic(&self, pillar: Pillar) -> Option<&str> {
        self.pillar_topics.get(pillar).as_deref()
    }

    pub fn percentage(&self, pillar: Pillar) -> Option<f64> {
        *self.pillar_percentages.get(pillar)
    }
}

// ---------------------------------------------------------------------------
// Aggregate rows
// ---------------------------------------------------------------------------

/// The most frequent label of a year together with its row count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopicCount {
    pub year: i32,
    pub topic: String,
    pub count: usize,
}

/// [`TopicCount`] tagged with the pillar it was computed for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PillarTopTopic {
    pub pillar: Pillar,
    pub year: i32,
    pub topic: String,
    pub count: usize,
}

// ---------------------------------------------------------------------------
// EsgDataset – the complete loaded dataset
// ---------------------------------------------------------------------------

/// The merged table plus the views that are computed once at load time.
#[derive(Debug, Clone, Default)]
pub struct EsgDataset {
    /// Merged rows in join order.
    pub records: Vec<FilingRecord>,
    /// Most frequent topic combination per year over the full topic table.
    pub dominant_topic_per_year: Vec<TopicCount>,
    /// Distinct non-missing sectors, sorted.
    pub sectors: BTreeSet<String>,
    /// Distinct tickers, sorted.
    pub tickers: BTreeSet<String>,
    /// Distinct filing years, sorted.
    pub years: BTreeSet<i32>,
    /// Distinct non-missing company names, sorted.
    pub company_names: BTreeSet<String>,
}

impl EsgDataset {
    /// Build the column indices from merged records.
    pub fn from_records(
        records: Vec<FilingRecord>,
        dominant_topic_per_year: Vec<TopicCount>,
    ) -> Self {
        let mut sectors = BTreeSet::new();
        let mut tickers = BTreeSet::new();
        let mut years = BTreeSet::new();
        let mut company_names = BTreeSet::new();

        for rec in &records {
            if let Some(sector) = &rec.sector {
                sectors.insert(sector.clone());
            }
            if let Some(name) = &rec.company_name {
                company_names.insert(name.clone());
            }
            tickers.insert(rec.ticker.clone());
            years.insert(rec.filing_year);
        }

        EsgDataset {
            records,
            dominant_topic_per_year,
            sectors,
            tickers,
            years,
            company_names,
        }
    }

    /// Number of merged filings.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the merged table is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
