use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use thiserror::Error;

use super::aggregate::top_label_per_year;
use super::model::{EsgDataset, FilingRecord, PillarValues, ScoreRecord, TopicAssignment};

/// Columns the score table must provide.
pub const SCORE_COLUMNS: &[&str] = &[
    "ticker",
    "filing_date",
    "Overall_ESG_content",
    "GRI",
    "E_percentage_in_report",
    "S_percentage_in_report",
    "G_percentage_in_report",
];

/// Columns the topic table must provide.
pub const TOPIC_COLUMNS: &[&str] = &[
    "ticker",
    "filing_date",
    "Company Name",
    "Sector",
    "E_topic_name",
    "S_topic_name",
    "G_topic_name",
    "ESG_topic_combination",
];

/// Problems with the shape or content of an input table.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("{source_name}: missing required column '{column}'")]
    MissingColumn {
        source_name: String,
        column: &'static str,
    },
    #[error("{source_name}, row {row}: cannot parse filing date '{value}'")]
    InvalidDate {
        source_name: String,
        row: usize,
        value: String,
    },
}

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Load both tables from disk, join them and precompute the yearly views.
pub fn load_dataset(scores_path: &Path, topics_path: &Path) -> Result<EsgDataset> {
    let scores_file = File::open(scores_path)
        .with_context(|| format!("opening score table {}", scores_path.display()))?;
    let topics_file = File::open(topics_path)
        .with_context(|| format!("opening topic table {}", topics_path.display()))?;

    load_from_readers(
        scores_file,
        &scores_path.display().to_string(),
        topics_file,
        &topics_path.display().to_string(),
    )
}

/// Same as [`load_dataset`] for already opened sources.
pub fn load_from_readers<S: Read, T: Read>(
    scores: S,
    scores_name: &str,
    topics: T,
    topics_name: &str,
) -> Result<EsgDataset> {
    let scores = read_scores(scores, scores_name)?;
    let topics = read_topics(topics, topics_name)?;

    let records = inner_join(&scores, &topics);
    log::info!(
        "Merged {} score rows with {} topic rows into {} filings",
        scores.len(),
        topics.len(),
        records.len(),
    );

    let dominant = top_label_per_year(
        topics
            .iter()
            .map(|t| (t.filing_year(), t.esg_topic_combination.as_deref())),
    );

    Ok(EsgDataset::from_records(records, dominant))
}

/// Inner join on (ticker, filing_date). Rows without a partner on the other
/// side are dropped; duplicate keys produce every pairing in score row order.
pub fn inner_join(scores: &[ScoreRecord], topics: &[TopicAssignment]) -> Vec<FilingRecord> {
    let mut index: HashMap<(&str, NaiveDate), Vec<&TopicAssignment>> = HashMap::new();
    for topic in topics {
        index
            .entry((topic.ticker.as_str(), topic.filing_date))
            .or_default()
            .push(topic);
    }

    scores
        .iter()
        .flat_map(|score| {
            index
                .get(&(score.ticker.as_str(), score.filing_date))
                .into_iter()
                .flatten()
                .map(move |topic| FilingRecord::merge(score, topic))
        })
        .collect()
}

/// Parse a filing date, dropping any time-of-day component.
pub fn parse_filing_date(value: &str) -> Option<NaiveDate> {
    const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y"];
    const DATETIME_FORMATS: &[&str] = &[
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%d %H:%M",
    ];

    let s = value.trim();
    DATE_FORMATS
        .iter()
        .find_map(|f| NaiveDate::parse_from_str(s, f).ok())
        .or_else(|| {
            DATETIME_FORMATS
                .iter()
                .find_map(|f| NaiveDateTime::parse_from_str(s, f).ok())
                .map(|dt| dt.date())
        })
        .or_else(|| DateTime::parse_from_rfc3339(s).ok().map(|dt| dt.date_naive()))
}

// ---------------------------------------------------------------------------
// Score table
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct RawScoreRow {
    ticker: String,
    filing_date: String,
    #[serde(rename = "Overall_ESG_content", deserialize_with = "csv::invalid_option")]
    overall_esg_content: Option<f64>,
    #[serde(rename = "GRI", deserialize_with = "csv::invalid_option")]
    gri: Option<f64>,
    #[serde(rename = "E_percentage_in_report", deserialize_with = "csv::invalid_option")]
    e_percentage: Option<f64>,
    #[serde(rename = "S_percentage_in_report", deserialize_with = "csv::invalid_option")]
    s_percentage: Option<f64>,
    #[serde(rename = "G_percentage_in_report", deserialize_with = "csv::invalid_option")]
    g_percentage: Option<f64>,
}

fn read_scores<R: Read>(reader: R, source_name: &str) -> Result<Vec<ScoreRecord>> {
    let rows: Vec<RawScoreRow> = read_table(reader, source_name, SCORE_COLUMNS)?;
    let mut scores = Vec::with_capacity(rows.len());

    for (i, row) in rows.into_iter().enumerate() {
        let filing_date = date_or_error(&row.filing_date, source_name, i + 1)?;
        scores.push(ScoreRecord {
            ticker: row.ticker,
            filing_date,
            overall_esg_content: row.overall_esg_content,
            // Non-numeric GRI counts as no disclosure.
            gri: row.gri.filter(|v| !v.is_nan()).unwrap_or(0.0),
            pillar_percentages: PillarValues::new(
                row.e_percentage,
                row.s_percentage,
                row.g_percentage,
            ),
        });
    }

    log::debug!("{source_name}: {} score rows", scores.len());
    Ok(scores)
}

// ---------------------------------------------------------------------------
// Topic table
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct RawTopicRow {
    ticker: String,
    filing_date: String,
    #[serde(rename = "Company Name")]
    company_name: Option<String>,
    #[serde(rename = "Sector")]
    sector: Option<String>,
    #[serde(rename = "E_topic_name")]
    e_topic: Option<String>,
    #[serde(rename = "S_topic_name")]
    s_topic: Option<String>,
    #[serde(rename = "G_topic_name")]
    g_topic: Option<String>,
    #[serde(rename = "ESG_topic_combination")]
    esg_topic_combination: Option<String>,
}

fn read_topics<R: Read>(reader: R, source_name: &str) -> Result<Vec<TopicAssignment>> {
    let rows: Vec<RawTopicRow> = read_table(reader, source_name, TOPIC_COLUMNS)?;
    let mut topics = Vec::with_capacity(rows.len());

    for (i, row) in rows.into_iter().enumerate() {
        let filing_date = date_or_error(&row.filing_date, source_name, i + 1)?;
        topics.push(TopicAssignment {
            ticker: row.ticker,
            filing_date,
            company_name: non_blank(row.company_name),
            sector: non_blank(row.sector),
            pillar_topics: PillarValues::new(
                non_blank(row.e_topic),
                non_blank(row.s_topic),
                non_blank(row.g_topic),
            ),
            esg_topic_combination: non_blank(row.esg_topic_combination),
        });
    }

    log::debug!("{source_name}: {} topic rows", topics.len());
    Ok(topics)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Read a headed CSV into typed rows after checking the required columns.
fn read_table<T, R>(reader: R, source_name: &str, required: &[&'static str]) -> Result<Vec<T>>
where
    T: DeserializeOwned,
    R: Read,
{
    let mut rdr = csv::ReaderBuilder::new().flexible(true).from_reader(reader);
    let headers = rdr
        .headers()
        .with_context(|| format!("{source_name}: reading CSV headers"))?
        .clone();

    if let Some(&column) = required
        .iter()
        .find(|&&col| !headers.iter().any(|h| h == col))
    {
        return Err(LoadError::MissingColumn {
            source_name: source_name.to_string(),
            column,
        }
        .into());
    }

    rdr.deserialize()
        .enumerate()
        .map(|(i, row)| row.with_context(|| format!("{source_name}: CSV row {}", i + 1)))
        .collect()
}

fn date_or_error(value: &str, source_name: &str, row: usize) -> Result<NaiveDate, LoadError> {
    parse_filing_date(value).ok_or_else(|| LoadError::InvalidDate {
        source_name: source_name.to_string(),
        row,
        value: value.to_string(),
    })
}

/// Cell spellings that exporters write for a missing label.
const NA_MARKERS: &[&str] = &[
    "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN", "<NA>",
    "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|s| {
        let s = s.trim();
        !s.is_empty() && !NA_MARKERS.contains(&s)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::{Pillar, TopicCount};
    use std::io::Write;

    const SCORES: &str = "\
ticker,filing_date,Overall_ESG_content,GRI,E_percentage_in_report,S_percentage_in_report,G_percentage_in_report,extra
AAA,2021-03-04,0.61,12,40,35,25,x
AAA,2022-03-02 08:15:00,0.64,n/a,42,33,25,x
BBB,2021-02-10,0.40,,30,40,30,x
ZZZ,2021-05-05,0.10,3,10,10,80,x
";

    const TOPICS: &str = "\
ticker,filing_date,Company Name,Sector,E_topic_name,S_topic_name,G_topic_name,ESG_topic_combination
AAA,2021-03-04,Alpha Corp,Energy,Emissions,Safety,Board,Climate Transition
AAA,2022-03-02,Alpha Corp,Energy,Emissions,Safety,Board,Climate Transition
BBB,2021-02-10,Beta Inc,Information Technology,Data Centers,Privacy,Ethics,Digital Trust
CCC,2020-01-15,Gamma plc,Utilities,Water,Community,Audit,Water Stewardship
";

    fn load(scores: &str, topics: &str) -> Result<EsgDataset> {
        load_from_readers(scores.as_bytes(), "scores.csv", topics.as_bytes(), "topics.csv")
    }

    #[test]
    fn test_inner_join_drops_unmatched_rows() {
        let ds = load(SCORES, TOPICS).unwrap();
        assert_eq!(ds.len(), 3);
        assert!(ds.records.iter().all(|r| r.ticker != "ZZZ" && r.ticker != "CCC"));
        let tickers: Vec<&str> = ds.records.iter().map(|r| r.ticker.as_str()).collect();
        assert_eq!(tickers, vec!["AAA", "AAA", "BBB"]);
    }

    #[test]
    fn test_timestamp_joins_on_calendar_day() {
        let ds = load(SCORES, TOPICS).unwrap();
        let second = &ds.records[1];
        assert_eq!(second.filing_date, NaiveDate::from_ymd_opt(2022, 3, 2).unwrap());
        assert_eq!(second.filing_year, 2022);
        assert_eq!(second.company_name.as_deref(), Some("Alpha Corp"));
    }

    #[test]
    fn test_gri_coerced_to_zero() {
        let ds = load(SCORES, TOPICS).unwrap();
        assert_eq!(ds.records[0].gri, 12.0);
        assert_eq!(ds.records[1].gri, 0.0);
        assert_eq!(ds.records[2].gri, 0.0);
    }

    #[test]
    fn test_dominant_topic_view_uses_full_topic_table() {
        let ds = load(SCORES, TOPICS).unwrap();
        let years: Vec<i32> = ds.dominant_topic_per_year.iter().map(|t| t.year).collect();
        // 2020 only exists in the topic table
        assert_eq!(years, vec![2020, 2021, 2022]);
        assert_eq!(ds.dominant_topic_per_year[1].topic, "Climate Transition");
    }

    #[test]
    fn test_indices_built_from_merged_rows() {
        let ds = load(SCORES, TOPICS).unwrap();
        assert_eq!(
            ds.sectors.iter().cloned().collect::<Vec<_>>(),
            vec!["Energy".to_string(), "Information Technology".to_string()]
        );
        assert_eq!(ds.years.iter().copied().collect::<Vec<_>>(), vec![2021, 2022]);
        assert!(!ds.tickers.contains("CCC"));
    }

    #[test]
    fn test_duplicate_keys_produce_every_pairing() {
        let topics =
            format!("{TOPICS}AAA,2021-03-04,Alpha Corp,Energy,Waste,Safety,Board,Circularity\n");
        let ds = load(SCORES, &topics).unwrap();
        assert_eq!(ds.len(), 4);
        assert_eq!(ds.records[0].topic(Pillar::Environmental), Some("Emissions"));
        assert_eq!(ds.records[1].topic(Pillar::Environmental), Some("Waste"));
    }

    #[test]
    fn test_na_markers_are_missing_labels() {
        let topics = "\
ticker,filing_date,Company Name,Sector,E_topic_name,S_topic_name,G_topic_name,ESG_topic_combination
AAA,2021-03-04,Alpha Corp,Energy,N/A,Safety,null,NA
BBB,2021-02-10,Beta Inc,NaN,n/a,<NA>,Ethics,z
";
        let ds = load(SCORES, topics).unwrap();

        assert_eq!(ds.sectors.iter().cloned().collect::<Vec<_>>(), vec!["Energy".to_string()]);
        assert!(ds.records.iter().all(|r| r.topic(Pillar::Environmental).is_none()));
        assert_eq!(ds.records[0].topic(Pillar::Governance), None);
        assert_eq!(ds.records[1].topic(Pillar::Social), None);
        assert_eq!(
            ds.dominant_topic_per_year,
            vec![TopicCount {
                year: 2021,
                topic: "z".to_string(),
                count: 1,
            }]
        );
    }

    #[test]
    fn test_invalid_date_is_an_error() {
        let scores = SCORES.replace("2021-02-10", "tenth of feb");
        let err = load(&scores, TOPICS).unwrap_err();
        match err.downcast_ref::<LoadError>() {
            Some(LoadError::InvalidDate { row, value, .. }) => {
                assert_eq!(*row, 3);
                assert_eq!(value, "tenth of feb");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_missing_column_is_an_error() {
        let topics = TOPICS.replace("Sector", "Industry");
        let err = load(SCORES, &topics).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<LoadError>(),
            Some(LoadError::MissingColumn { column: "Sector", .. })
        ));
    }

    #[test]
    fn test_parse_filing_date_formats() {
        let expected = NaiveDate::from_ymd_opt(2023, 7, 9);
        for s in [
            "2023-07-09",
            "2023/07/09",
            "07/09/2023",
            " 2023-07-09 ",
            "2023-07-09 13:45:00",
            "2023-07-09 13:45:00.250",
            "2023-07-09T13:45:00",
            "2023-07-09T13:45:00+02:00",
        ] {
            assert_eq!(parse_filing_date(s), expected, "{s}");
        }
        assert_eq!(parse_filing_date("2023-13-40"), None);
        assert_eq!(parse_filing_date(""), None);
    }

    #[test]
    fn test_load_dataset_from_files() {
        let dir = tempfile::tempdir().unwrap();
        let scores_path = dir.path().join("scores.csv");
        let topics_path = dir.path().join("topics.csv");
        File::create(&scores_path).unwrap().write_all(SCORES.as_bytes()).unwrap();
        File::create(&topics_path).unwrap().write_all(TOPICS.as_bytes()).unwrap();

        let ds = load_dataset(&scores_path, &topics_path).unwrap();
        assert_eq!(ds.len(), 3);

        let missing = dir.path().join("nope.csv");
        assert!(load_dataset(&missing, &topics_path).is_err());
    }
}
