use std::collections::BTreeSet;

use super::model::{EsgDataset, FilingRecord};

/// How many companies are pre-selected after a sector change.
pub const DEFAULT_COMPANY_COUNT: usize = 3;

// ---------------------------------------------------------------------------
// Selection and options
// ---------------------------------------------------------------------------

/// Selected sectors, tickers and years.
/// An empty set in any dimension means "everything in that dimension".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterSelection {
    pub sectors: BTreeSet<String>,
    pub companies: BTreeSet<String>,
    pub years: BTreeSet<i32>,
}

/// Choices offered by the three filters plus their default values.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterOptions {
    pub sector_options: Vec<String>,
    pub sector_defaults: Vec<String>,
    pub company_options: Vec<String>,
    pub company_defaults: Vec<String>,
    pub year_options: Vec<i32>,
    pub year_defaults: Vec<i32>,
}

impl FilterOptions {
    /// The selection the filters are reset to.
    pub fn default_selection(&self) -> FilterSelection {
        FilterSelection {
            sectors: self.sector_defaults.iter().cloned().collect(),
            companies: self.company_defaults.iter().cloned().collect(),
            years: self.year_defaults.iter().copied().collect(),
        }
    }
}

/// Recompute the company and year choices for a sector selection.
///
/// With no sectors selected the preferred sector is used if it exists,
/// otherwise the first sector in sort order.
pub fn sync_filter_options(
    dataset: &EsgDataset,
    selected_sectors: &BTreeSet<String>,
    preferred_sector: &str,
) -> FilterOptions {
    let sector_options: Vec<String> = dataset.sectors.iter().cloned().collect();

    let sector_defaults: Vec<String> = if !selected_sectors.is_empty() {
        selected_sectors.iter().cloned().collect()
    } else if dataset.sectors.contains(preferred_sector) {
        vec![preferred_sector.to_string()]
    } else {
        sector_options.iter().take(1).cloned().collect()
    };

    let mut companies = BTreeSet::new();
    let mut years = BTreeSet::new();
    for rec in &dataset.records {
        let in_sectors = rec
            .sector
            .as_ref()
            .is_some_and(|s| sector_defaults.contains(s));
        if in_sectors {
            companies.insert(rec.ticker.as_str());
            years.insert(rec.filing_year);
        }
    }

    let company_options: Vec<String> = companies.into_iter().map(str::to_string).collect();
    let company_defaults = company_options
        .iter()
        .take(DEFAULT_COMPANY_COUNT)
        .cloned()
        .collect();
    let year_options: Vec<i32> = years.into_iter().collect();

    FilterOptions {
        sector_options,
        sector_defaults,
        company_options,
        company_defaults,
        year_defaults: year_options.clone(),
        year_options,
    }
}

// ---------------------------------------------------------------------------
// Row filtering
// ---------------------------------------------------------------------------

/// Replace every empty dimension with all of that dimension's values.
pub fn resolve_selection(dataset: &EsgDataset, selection: &FilterSelection) -> FilterSelection {
    fn or_all<T: Clone + Ord>(selected: &BTreeSet<T>, all: &BTreeSet<T>) -> BTreeSet<T> {
        if selected.is_empty() {
            all.clone()
        } else {
            selected.clone()
        }
    }

    FilterSelection {
        sectors: or_all(&selection.sectors, &dataset.sectors),
        companies: or_all(&selection.companies, &dataset.tickers),
        years: or_all(&selection.years, &dataset.years),
    }
}

/// Return indices of records whose sector, ticker and year are all selected.
/// Records without a sector never pass.
pub fn filtered_indices(dataset: &EsgDataset, selection: &FilterSelection) -> Vec<usize> {
    let resolved = resolve_selection(dataset, selection);
    dataset
        .records
        .iter()
        .enumerate()
        .filter(|(_, rec)| passes(rec, &resolved))
        .map(|(i, _)| i)
        .collect()
}

/// Borrow the records that pass the selection, in table order.
pub fn filtered_records<'a>(
    dataset: &'a EsgDataset,
    selection: &FilterSelection,
) -> Vec<&'a FilingRecord> {
    filtered_indices(dataset, selection)
        .into_iter()
        .map(|i| &dataset.records[i])
        .collect()
}

fn passes(rec: &FilingRecord, resolved: &FilterSelection) -> bool {
    let sector_ok = rec
        .sector
        .as_ref()
        .is_some_and(|s| resolved.sectors.contains(s));
    sector_ok
        && resolved.companies.contains(&rec.ticker)
        && resolved.years.contains(&rec.filing_year)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::PillarValues;
    use chrono::NaiveDate;

    fn record(ticker: &str, sector: Option<&str>, year: i32) -> FilingRecord {
        FilingRecord {
            ticker: ticker.to_string(),
            filing_date: NaiveDate::from_ymd_opt(year, 6, 30).unwrap(),
            filing_year: year,
            company_name: Some(format!("{ticker} Holdings")),
            sector: sector.map(str::to_string),
            overall_esg_content: Some(0.5),
            gri: 1.0,
            pillar_percentages: PillarValues::default(),
            pillar_topics: PillarValues::default(),
            esg_topic_combination: None,
        }
    }

    fn dataset() -> EsgDataset {
        let records = vec![
            record("MSFT", Some("Information Technology"), 2021),
            record("AAPL", Some("Information Technology"), 2022),
            record("NVDA", Some("Information Technology"), 2022),
            record("ORCL", Some("Information Technology"), 2023),
            record("XOM", Some("Energy"), 2020),
            record("CVX", Some("Energy"), 2021),
            record("NOSEC", None, 2021),
        ];
        EsgDataset::from_records(records, Vec::new())
    }

    fn set<T: Ord + Clone>(items: &[T]) -> BTreeSet<T> {
        items.iter().cloned().collect()
    }

    #[test]
    fn test_sync_defaults_to_preferred_sector() {
        let ds = dataset();
        let opts = sync_filter_options(&ds, &BTreeSet::new(), "Information Technology");
        assert_eq!(opts.sector_options, vec!["Energy", "Information Technology"]);
        assert_eq!(opts.sector_defaults, vec!["Information Technology"]);
        assert_eq!(opts.company_options, vec!["AAPL", "MSFT", "NVDA", "ORCL"]);
        assert_eq!(opts.company_defaults, vec!["AAPL", "MSFT", "NVDA"]);
        assert_eq!(opts.year_options, vec![2021, 2022, 2023]);
        assert_eq!(opts.year_defaults, opts.year_options);
    }

    #[test]
    fn test_sync_falls_back_to_first_sector() {
        let ds = dataset();
        let opts = sync_filter_options(&ds, &BTreeSet::new(), "Utilities");
        assert_eq!(opts.sector_defaults, vec!["Energy"]);
        assert_eq!(opts.company_options, vec!["CVX", "XOM"]);
        assert_eq!(opts.company_defaults, vec!["CVX", "XOM"]);
        assert_eq!(opts.year_options, vec![2020, 2021]);
    }

    #[test]
    fn test_sync_uses_explicit_sectors() {
        let ds = dataset();
        let selected = set(&["Energy".to_string(), "Information Technology".to_string()]);
        let opts = sync_filter_options(&ds, &selected, "Information Technology");
        assert_eq!(opts.sector_defaults.len(), 2);
        assert_eq!(opts.company_options.len(), 6);
        assert_eq!(opts.year_options, vec![2020, 2021, 2022, 2023]);
    }

    #[test]
    fn test_sync_on_empty_dataset() {
        let ds = EsgDataset::default();
        let opts = sync_filter_options(&ds, &BTreeSet::new(), "Information Technology");
        assert_eq!(opts, FilterOptions::default());
    }

    #[test]
    fn test_empty_selection_equals_all() {
        let ds = dataset();
        let all = FilterSelection {
            sectors: ds.sectors.clone(),
            companies: ds.tickers.clone(),
            years: ds.years.clone(),
        };
        assert_eq!(
            filtered_indices(&ds, &FilterSelection::default()),
            filtered_indices(&ds, &all)
        );

        let only_years_empty = FilterSelection {
            sectors: set(&["Energy".to_string()]),
            companies: BTreeSet::new(),
            years: BTreeSet::new(),
        };
        let explicit = FilterSelection {
            sectors: set(&["Energy".to_string()]),
            companies: ds.tickers.clone(),
            years: ds.years.clone(),
        };
        assert_eq!(
            filtered_indices(&ds, &only_years_empty),
            filtered_indices(&ds, &explicit)
        );
    }

    #[test]
    fn test_missing_sector_never_matches() {
        let ds = dataset();
        let rows = filtered_records(&ds, &FilterSelection::default());
        assert_eq!(rows.len(), 6);
        assert!(rows.iter().all(|r| r.ticker != "NOSEC"));
    }

    #[test]
    fn test_filtered_rows_are_within_selection() {
        let ds = dataset();
        let selections = [
            FilterSelection {
                sectors: set(&["Information Technology".to_string()]),
                companies: set(&["AAPL".to_string(), "MSFT".to_string(), "XOM".to_string()]),
                years: set(&[2021, 2022]),
            },
            FilterSelection {
                sectors: set(&["Energy".to_string(), "Information Technology".to_string()]),
                companies: set(&["CVX".to_string(), "ORCL".to_string()]),
                years: set(&[2021, 2023]),
            },
        ];
        for sel in &selections {
            let rows = filtered_records(&ds, sel);
            assert!(!rows.is_empty());
            for r in rows {
                assert!(sel.sectors.contains(r.sector.as_ref().unwrap()));
                assert!(sel.companies.contains(&r.ticker));
                assert!(sel.years.contains(&r.filing_year));
            }
        }
    }

    #[test]
    fn test_disjoint_selection_is_empty() {
        let ds = dataset();
        let sel = FilterSelection {
            sectors: set(&["Energy".to_string()]),
            companies: set(&["MSFT".to_string()]),
            years: BTreeSet::new(),
        };
        assert!(filtered_indices(&ds, &sel).is_empty());
    }
}
