use anyhow::{Context, Result};
use serde::Serialize;

const SCORES_PATH: &str = "ESG_Topic_Modeling_Concreteness_Scores.csv";
const TOPICS_PATH: &str = "Final_mapped_topics.csv";

#[derive(Serialize)]
struct ScoreRow {
    ticker: String,
    filing_date: String,
    #[serde(rename = "Overall_ESG_content")]
    overall_esg_content: f64,
    #[serde(rename = "GRI")]
    gri: String,
    #[serde(rename = "E_percentage_in_report")]
    e_percentage: f64,
    #[serde(rename = "S_percentage_in_report")]
    s_percentage: f64,
    #[serde(rename = "G_percentage_in_report")]
    g_percentage: f64,
}

#[derive(Serialize)]
struct TopicRow {
    ticker: String,
    filing_date: String,
    #[serde(rename = "Company Name")]
    company_name: String,
    #[serde(rename = "Sector")]
    sector: String,
    #[serde(rename = "E_topic_name")]
    e_topic: String,
    #[serde(rename = "S_topic_name")]
    s_topic: String,
    #[serde(rename = "G_topic_name")]
    g_topic: String,
    #[serde(rename = "ESG_topic_combination")]
    esg_topic_combination: String,
}

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    fn uniform(&mut self, lo: f64, hi: f64) -> f64 {
        lo + (hi - lo) * self.next_f64()
    }

    fn pick<'a>(&mut self, items: &[&'a str]) -> &'a str {
        items[(self.next_u64() % items.len() as u64) as usize]
    }
}

struct Company {
    ticker: &'static str,
    name: &'static str,
    sector: &'static str,
}

const COMPANIES: &[Company] = &[
    Company { ticker: "AAPL", name: "Apple Inc.", sector: "Information Technology" },
    Company { ticker: "MSFT", name: "Microsoft Corp.", sector: "Information Technology" },
    Company { ticker: "NVDA", name: "NVIDIA Corp.", sector: "Information Technology" },
    Company { ticker: "ORCL", name: "Oracle Corp.", sector: "Information Technology" },
    Company { ticker: "XOM", name: "Exxon Mobil Corp.", sector: "Energy" },
    Company { ticker: "CVX", name: "Chevron Corp.", sector: "Energy" },
    Company { ticker: "JNJ", name: "Johnson & Johnson", sector: "Health Care" },
    Company { ticker: "PFE", name: "Pfizer Inc.", sector: "Health Care" },
    Company { ticker: "NEE", name: "NextEra Energy", sector: "Utilities" },
];

const E_TOPICS: &[&str] = &[
    "Emissions Reduction",
    "Renewable Energy",
    "Water Management",
    "Waste & Circularity",
];
const S_TOPICS: &[&str] = &[
    "Workforce Diversity",
    "Health & Safety",
    "Data Privacy",
    "Community Engagement",
];
const G_TOPICS: &[&str] = &[
    "Board Oversight",
    "Executive Compensation",
    "Business Ethics",
    "Risk Management",
];

fn main() -> Result<()> {
    let mut rng = SimpleRng::new(42);
    let years = 2019..=2023;

    let mut scores = csv::Writer::from_path(SCORES_PATH).context("creating score table")?;
    let mut topics = csv::Writer::from_path(TOPICS_PATH).context("creating topic table")?;
    let mut n_scores = 0usize;
    let mut n_topics = 0usize;

    for (ci, company) in COMPANIES.iter().enumerate() {
        for year in years.clone() {
            let month = 2 + (ci % 9);
            let day = 1 + (ci * 3 + year as usize) % 27;
            let date = format!("{year}-{month:02}-{day:02}");

            let e_topic = rng.pick(E_TOPICS);
            let s_topic = rng.pick(S_TOPICS);
            let g_topic = rng.pick(G_TOPICS);

            // Every seventh filing only exists in the topic table and every
            // eleventh only in the score table, so the join drops them.
            let idx = ci * 5 + (year as usize - 2019);
            if idx % 11 != 5 {
                topics
                    .serialize(TopicRow {
                        ticker: company.ticker.to_string(),
                        filing_date: date.clone(),
                        company_name: company.name.to_string(),
                        sector: company.sector.to_string(),
                        e_topic: e_topic.to_string(),
                        s_topic: s_topic.to_string(),
                        g_topic: g_topic.to_string(),
                        esg_topic_combination: format!("{e_topic} + {s_topic}"),
                    })
                    .context("writing topic row")?;
                n_topics += 1;
            }

            if idx % 7 != 3 {
                let e = rng.uniform(20.0, 50.0);
                let s = rng.uniform(15.0, 40.0);
                let g = rng.uniform(10.0, 35.0);
                // Some score exports carry a timestamp and a non-numeric GRI.
                let score_date = if idx % 4 == 0 {
                    format!("{date} 00:00:00")
                } else {
                    date.clone()
                };
                let gri = if idx % 9 == 0 {
                    "not disclosed".to_string()
                } else {
                    format!("{:.0}", rng.uniform(5.0, 60.0))
                };

                scores
                    .serialize(ScoreRow {
                        ticker: company.ticker.to_string(),
                        filing_date: score_date,
                        overall_esg_content: (rng.uniform(0.2, 0.9) * 1000.0).round() / 1000.0,
                        gri,
                        e_percentage: (e * 10.0).round() / 10.0,
                        s_percentage: (s * 10.0).round() / 10.0,
                        g_percentage: (g * 10.0).round() / 10.0,
                    })
                    .context("writing score row")?;
                n_scores += 1;
            }
        }
    }

    scores.flush().context("flushing score table")?;
    topics.flush().context("flushing topic table")?;

    println!(
        "Wrote {n_scores} score rows to {SCORES_PATH} and {n_topics} topic rows to {TOPICS_PATH}"
    );
    Ok(())
}
