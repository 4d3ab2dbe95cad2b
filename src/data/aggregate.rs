use std::collections::{BTreeMap, HashMap};

use super::model::{FilingRecord, Pillar, PillarTopTopic, PillarValues, TopicCount};

// ---------------------------------------------------------------------------
// Mode helpers
// ---------------------------------------------------------------------------

/// Most frequent label per year, years ascending.
///
/// Labels are grouped in ascending order within a year and the first one to
/// reach the highest count wins, so ties go to the smallest label. Missing
/// labels are not counted; a year with no labels at all is absent.
pub fn top_label_per_year<'a, I>(rows: I) -> Vec<TopicCount>
where
    I: IntoIterator<Item = (i32, Option<&'a str>)>,
{
    let mut counts: BTreeMap<i32, BTreeMap<&'a str, usize>> = BTreeMap::new();
    for (year, label) in rows {
        let Some(label) = label else {
            continue;
        };
        *counts.entry(year).or_default().entry(label).or_default() += 1;
    }

    counts
        .into_iter()
        .filter_map(|(year, labels)| {
            let mut best: Option<(&str, usize)> = None;
            for (label, count) in labels {
                if best.map_or(true, |(_, best_count)| count > best_count) {
                    best = Some((label, count));
                }
            }
            best.map(|(topic, count)| TopicCount {
                year,
                topic: topic.to_string(),
                count,
            })
        })
        .collect()
}

/// Top topic per (year, pillar): all E rows first, then S, then G.
pub fn top_topics_per_pillar(records: &[&FilingRecord]) -> Vec<PillarTopTopic> {
    Pillar::ALL
        .iter()
        .flat_map(|&pillar| {
            top_label_per_year(records.iter().map(|r| (r.filing_year, r.topic(pillar))))
                .into_iter()
                .map(move |tc| PillarTopTopic {
                    pillar,
                    year: tc.year,
                    topic: tc.topic,
                    count: tc.count,
                })
        })
        .collect()
}

/// The most frequent label overall. Ties go to the label seen first.
pub fn most_frequent<'a, I>(labels: I) -> Option<String>
where
    I: IntoIterator<Item = Option<&'a str>>,
{
    let mut seen: Vec<(&str, usize)> = Vec::new();
    let mut position: HashMap<&str, usize> = HashMap::new();

    for label in labels.into_iter().flatten() {
        match position.get(label) {
            Some(&i) => seen[i].1 += 1,
            None => {
                position.insert(label, seen.len());
                seen.push((label, 1));
            }
        }
    }

    let mut best: Option<(&str, usize)> = None;
    for (label, count) in seen {
        if best.map_or(true, |(_, best_count)| count > best_count) {
            best = Some((label, count));
        }
    }
    best.map(|(label, _)| label.to_string())
}

// ---------------------------------------------------------------------------
// Means
// ---------------------------------------------------------------------------

/// Running mean that skips missing and NaN values.
#[derive(Debug, Clone, Copy, Default)]
struct MeanAccumulator {
    sum: f64,
    n: usize,
}

impl MeanAccumulator {
    fn push(&mut self, value: Option<f64>) {
        if let Some(v) = value.filter(|v| !v.is_nan()) {
            self.sum += v;
            self.n += 1;
        }
    }

    fn mean(&self) -> Option<f64> {
        (self.n > 0).then(|| self.sum / self.n as f64)
    }
}

/// Mean of the present values, `None` when there are none.
pub fn mean<I>(values: I) -> Option<f64>
where
    I: IntoIterator<Item = Option<f64>>,
{
    let mut acc = MeanAccumulator::default();
    for v in values {
        acc.push(v);
    }
    acc.mean()
}

/// `[year, mean]` points, years ascending.
pub fn yearly_mean<'a, I, F>(records: I, metric: F) -> Vec<[f64; 2]>
where
    I: IntoIterator<Item = &'a FilingRecord>,
    F: Fn(&FilingRecord) -> Option<f64>,
{
    let mut by_year: BTreeMap<i32, MeanAccumulator> = BTreeMap::new();
    for rec in records {
        by_year.entry(rec.filing_year).or_default().push(metric(rec));
    }
    by_year
        .into_iter()
        .filter_map(|(year, acc)| acc.mean().map(|m| [f64::from(year), m]))
        .collect()
}

/// Per company name, `[year, mean]` points. Rows without a company name are
/// left out.
pub fn yearly_mean_by_company<'a, I, F>(records: I, metric: F) -> BTreeMap<String, Vec<[f64; 2]>>
where
    I: IntoIterator<Item = &'a FilingRecord>,
    F: Fn(&FilingRecord) -> Option<f64>,
{
    let mut groups: BTreeMap<&str, BTreeMap<i32, MeanAccumulator>> = BTreeMap::new();
    for rec in records {
        let Some(name) = rec.company_name.as_deref() else {
            continue;
        };
        groups
            .entry(name)
            .or_default()
            .entry(rec.filing_year)
            .or_default()
            .push(metric(rec));
    }

    groups
        .into_iter()
        .map(|(name, by_year)| {
            let points = by_year
                .into_iter()
                .filter_map(|(year, acc)| acc.mean().map(|m| [f64::from(year), m]))
                .collect();
            (name.to_string(), points)
        })
        .collect()
}

/// Mean percentage-of-report per pillar.
pub fn pillar_composition(records: &[&FilingRecord]) -> PillarValues<Option<f64>> {
    let [e, s, g] = Pillar::ALL.map(|p| mean(records.iter().map(|r| r.percentage(p))));
    PillarValues::new(e, s, g)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn record(ticker: &str, year: i32, name: &str, e_topic: &str, esg: f64) -> FilingRecord {
        FilingRecord {
            ticker: ticker.to_string(),
            filing_date: NaiveDate::from_ymd_opt(year, 3, 1).unwrap(),
            filing_year: year,
            company_name: Some(name.to_string()),
            sector: Some("Energy".to_string()),
            overall_esg_content: Some(esg),
            gri: 0.0,
            pillar_percentages: PillarValues::new(Some(40.0), Some(35.0), Some(25.0)),
            pillar_topics: PillarValues::new(
                Some(e_topic.to_string()),
                Some("Workforce".to_string()),
                Some("Board".to_string()),
            ),
            esg_topic_combination: Some("Climate + Workforce".to_string()),
        }
    }

    #[test]
    fn test_top_label_per_year_picks_highest_count() {
        let rows = vec![
            (2020, Some("Water")),
            (2020, Some("Climate")),
            (2020, Some("Water")),
            (2021, Some("Climate")),
            (2021, None),
            (2021, None),
        ];
        let top = top_label_per_year(rows);
        assert_eq!(
            top,
            vec![
                TopicCount { year: 2020, topic: "Water".into(), count: 2 },
                TopicCount { year: 2021, topic: "Climate".into(), count: 1 },
            ]
        );
    }

    #[test]
    fn test_top_label_per_year_tie_goes_to_smallest_label() {
        let rows = vec![(2022, Some("Water")), (2022, Some("Climate"))];
        let top = top_label_per_year(rows);
        assert_eq!(top[0].topic, "Climate");
        assert_eq!(top[0].count, 1);
    }

    #[test]
    fn test_year_with_only_missing_labels_is_absent() {
        let top = top_label_per_year(vec![(2019, None), (2020, Some("Board"))]);
        assert_eq!(top.len(), 1);
        assert_eq!(top[0].year, 2020);
    }

    #[test]
    fn test_pillar_top_counts_are_group_maximum() {
        let recs = vec![
            record("AAA", 2020, "Alpha", "Water", 1.0),
            record("BBB", 2020, "Beta", "Climate", 1.0),
            record("CCC", 2020, "Gamma", "Climate", 1.0),
            record("AAA", 2021, "Alpha", "Waste", 1.0),
        ];
        let refs: Vec<&FilingRecord> = recs.iter().collect();
        let top = top_topics_per_pillar(&refs);

        // three pillars × two years
        assert_eq!(top.len(), 6);
        for t in &top {
            let max = refs
                .iter()
                .filter(|r| r.filing_year == t.year)
                .filter_map(|r| r.topic(t.pillar))
                .fold(HashMap::<&str, usize>::new(), |mut m, topic| {
                    *m.entry(topic).or_default() += 1;
                    m
                })
                .into_values()
                .max()
                .unwrap();
            assert_eq!(t.count, max, "{} {}", t.pillar, t.year);
        }
        assert_eq!(top[0].pillar, Pillar::Environmental);
        assert_eq!(top[0].topic, "Climate");
        assert_eq!(top[0].count, 2);
    }

    #[test]
    fn test_most_frequent_ties_go_to_first_seen() {
        let labels = vec![Some("Water"), Some("Climate"), None, Some("Climate"), Some("Water")];
        assert_eq!(most_frequent(labels), Some("Water".to_string()));
        assert_eq!(most_frequent(vec![None, None]), None);
    }

    #[test]
    fn test_mean_skips_missing_and_nan() {
        assert_eq!(mean(vec![Some(1.0), None, Some(f64::NAN), Some(3.0)]), Some(2.0));
        assert_eq!(mean(vec![None]), None);
    }

    #[test]
    fn test_yearly_mean_by_company() {
        let recs = vec![
            record("AAA", 2020, "Alpha", "Water", 10.0),
            record("AAA", 2020, "Alpha", "Water", 20.0),
            record("AAA", 2021, "Alpha", "Water", 30.0),
            record("BBB", 2021, "Beta", "Water", 5.0),
        ];
        let series = yearly_mean_by_company(&recs, |r| r.overall_esg_content);
        assert_eq!(series["Alpha"], vec![[2020.0, 15.0], [2021.0, 30.0]]);
        assert_eq!(series["Beta"], vec![[2021.0, 5.0]]);

        let overall = yearly_mean(&recs, |r| r.overall_esg_content);
        assert_eq!(overall, vec![[2020.0, 15.0], [2021.0, 17.5]]);
    }

    #[test]
    fn test_pillar_composition_means() {
        let mut a = record("AAA", 2020, "Alpha", "Water", 1.0);
        a.pillar_percentages = PillarValues::new(Some(50.0), Some(30.0), None);
        let b = record("BBB", 2020, "Beta", "Water", 1.0);
        let comp = pillar_composition(&[&a, &b]);
        assert_eq!(comp, PillarValues::new(Some(45.0), Some(32.5), Some(25.0)));
    }
}
