//! Command-line arguments.

use clap::Parser;
use std::path::PathBuf;

/// ESG Lens - clarity and greenwashing dashboard for ESG disclosures
///
/// Joins the concreteness score table with the topic table on
/// (ticker, filing_date) and opens an interactive dashboard.
///
/// Examples:
///   esg-lens
///   esg-lens --scores data/scores.csv --topics data/topics.csv
///   esg-lens --preferred-sector Energy -v
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// CSV with concreteness and GRI scores per filing
    #[arg(
        long,
        value_name = "FILE",
        default_value = "ESG_Topic_Modeling_Concreteness_Scores.csv",
        env = "ESG_LENS_SCORES"
    )]
    pub scores: PathBuf,

    /// CSV with company, sector and topic labels per filing
    #[arg(
        long,
        value_name = "FILE",
        default_value = "Final_mapped_topics.csv",
        env = "ESG_LENS_TOPICS"
    )]
    pub topics: PathBuf,

    /// Sector selected when the sector filter is cleared
    #[arg(long, default_value = "Information Technology", env = "ESG_LENS_SECTOR")]
    pub preferred_sector: String,

    /// Enable debug logging (RUST_LOG takes precedence)
    #[arg(short, long)]
    pub verbose: bool,
}

impl Args {
    /// Log level used when RUST_LOG is not set.
    pub fn log_level(&self) -> &'static str {
        if self.verbose {
            "debug"
        } else {
            "info"
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let args = Args::parse_from(["esg-lens"]);
        assert_eq!(args.scores, PathBuf::from("ESG_Topic_Modeling_Concreteness_Scores.csv"));
        assert_eq!(args.topics, PathBuf::from("Final_mapped_topics.csv"));
        assert_eq!(args.preferred_sector, "Information Technology");
        assert_eq!(args.log_level(), "info");
    }

    #[test]
    fn test_explicit_arguments() {
        let args = Args::parse_from([
            "esg-lens",
            "--scores",
            "s.csv",
            "--topics",
            "t.csv",
            "--preferred-sector",
            "Energy",
            "-v",
        ]);
        assert_eq!(args.scores, PathBuf::from("s.csv"));
        assert_eq!(args.topics, PathBuf::from("t.csv"));
        assert_eq!(args.preferred_sector, "Energy");
        assert_eq!(args.log_level(), "debug");
    }
}
