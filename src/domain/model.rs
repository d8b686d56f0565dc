use serde::{Deserialize, Serialize};

/// Token the service expects in place of spaces inside a taxon name.
pub const SEPARATOR: char = '+';

/// Value emitted when a statistic is missing from a response.
pub const PLACEHOLDER: &str = "-";

pub const HEADER: [&str; 5] = ["taxon_a", "taxon_b", "mean", "median", "expert"];

/// Rewrites spaces and underscores to the separator token.
pub fn normalize_taxon(name: &str) -> String {
    name.trim()
        .chars()
        .map(|c| if c == ' ' || c == '_' { SEPARATOR } else { c })
        .collect()
}

/// Reverse of [`normalize_taxon`] for display.
pub fn display_taxon(name: &str) -> String {
    name.replace(SEPARATOR, "_")
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxonPairRequest {
    pub taxon_a: String,
    pub taxon_b: String,
}

impl TaxonPairRequest {
    pub fn new(taxon_a: &str, taxon_b: &str) -> Self {
        Self {
            taxon_a: normalize_taxon(taxon_a),
            taxon_b: normalize_taxon(taxon_b),
        }
    }

    /// Names are embedded as-is so the literal `+` reaches the service.
    pub fn query_url(&self, endpoint: &str) -> String {
        format!(
            "{}?taxon_a={}&taxon_b={}&submit=Search",
            endpoint, self.taxon_a, self.taxon_b
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DivergenceRecord {
    pub taxon_a: String,
    pub taxon_b: String,
    pub mean: String,
    pub median: String,
    pub expert: String,
}

impl DivergenceRecord {
    pub fn fields(&self) -> [&str; 5] {
        [
            self.taxon_a.as_str(),
            self.taxon_b.as_str(),
            self.mean.as_str(),
            self.median.as_str(),
            self.expert.as_str(),
        ]
    }

    pub fn to_tsv(&self) -> String {
        self.fields().join("\t")
    }
}
