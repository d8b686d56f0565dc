// Pattern-based slicing of TimeTree result pages; callers only see extract_statistics.

use crate::domain::model::{display_taxon, DivergenceRecord, PLACEHOLDER};
use regex::Regex;
use std::sync::OnceLock;

const MEAN_MARKER: &str = ">Mean:<";
const MEDIAN_MARKER: &str = ">Median:<";
const EXPERT_MARKER: &str = ">Expert Result:<";

// The closing boundary stops at `</tr` without the final `>`, matching the
// fragments the service emits.
fn row_pattern() -> &'static Regex {
    static ROW: OnceLock<Regex> = OnceLock::new();
    ROW.get_or_init(|| Regex::new(r"<tr.*?</tr").expect("row pattern is valid"))
}

fn age_pattern() -> &'static Regex {
    static AGE: OnceLock<Regex> = OnceLock::new();
    AGE.get_or_init(|| Regex::new(r"(\d+\.\d*) Mya").expect("age pattern is valid"))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Statistic {
    Mean,
    Median,
    Expert,
}

fn classify(row: &str) -> Option<Statistic> {
    if row.contains(MEAN_MARKER) {
        Some(Statistic::Mean)
    } else if row.contains(MEDIAN_MARKER) {
        Some(Statistic::Median)
    } else if row.contains(EXPERT_MARKER) {
        Some(Statistic::Expert)
    } else {
        None
    }
}

/// Builds a record from one response body. Never fails: any statistic that
/// cannot be found stays at the placeholder.
pub fn extract_statistics(html: &str, taxon_a: &str, taxon_b: &str) -> DivergenceRecord {
    let body: String = html.chars().filter(|&c| c != '\n').collect();

    let mut mean = PLACEHOLDER.to_string();
    let mut median = PLACEHOLDER.to_string();
    let mut expert = PLACEHOLDER.to_string();

    for row in row_pattern().find_iter(&body).map(|m| m.as_str()) {
        let Some(age) = age_pattern().captures(row).and_then(|c| c.get(1)) else {
            continue;
        };

        // Last matching row wins.
        match classify(row) {
            Some(Statistic::Mean) => mean = age.as_str().to_string(),
            Some(Statistic::Median) => median = age.as_str().to_string(),
            Some(Statistic::Expert) => expert = age.as_str().to_string(),
            None => {}
        }
    }

    let record = DivergenceRecord {
        taxon_a: display_taxon(taxon_a),
        taxon_b: display_taxon(taxon_b),
        mean,
        median,
        expert,
    };
    tracing::debug!("Extracted record: {}", record.to_tsv());
    record
}
