use crate::domain::model::TaxonPairRequest;
use crate::utils::error::{Result, RetrieverError};
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Taxon pairs from a tab-delimited source, in file order.
///
/// Extra columns are ignored. Blank lines and lines with a single field are
/// skipped.
pub struct TaxonPairReader<R: Read> {
    records: csv::StringRecordsIntoIter<R>,
}

impl<R: Read> TaxonPairReader<R> {
    pub fn new(reader: R) -> Self {
        let records = csv::ReaderBuilder::new()
            .delimiter(b'\t')
            .has_headers(false)
            .flexible(true)
            .quoting(false)
            .from_reader(reader)
            .into_records();
        Self { records }
    }
}

impl<R: Read> Iterator for TaxonPairReader<R> {
    type Item = Result<TaxonPairRequest>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let record = match self.records.next()? {
                Ok(record) => record,
                Err(e) => return Some(Err(RetrieverError::CsvError(e))),
            };

            let line = record.position().map(|p| p.line()).unwrap_or_default();
            match (record.get(0), record.get(1)) {
                (Some(a), Some(b)) if !a.trim().is_empty() && !b.trim().is_empty() => {
                    return Some(Ok(TaxonPairRequest::new(a, b)));
                }
                _ if record.iter().all(|f| f.trim().is_empty()) => continue,
                _ => {
                    tracing::warn!("Skipping line {}: expected two tab-separated taxa", line);
                    continue;
                }
            }
        }
    }
}

/// Where taxon pairs come from for one run.
pub enum PairSource {
    Single(Option<TaxonPairRequest>),
    Batch(TaxonPairReader<Box<dyn Read + Send>>),
}

impl PairSource {
    /// Exactly two positional taxa, or a usage error.
    pub fn from_args(taxa: &[String]) -> Result<Self> {
        match taxa {
            [a, b] => Ok(Self::Single(Some(TaxonPairRequest::new(a, b)))),
            _ => Err(RetrieverError::usage(format!(
                "expected exactly two taxa, got {}",
                taxa.len()
            ))),
        }
    }

    /// `-` reads standard input.
    pub fn from_path(path: &Path) -> Result<Self> {
        let reader: Box<dyn Read + Send> = if path == Path::new("-") {
            Box::new(std::io::stdin())
        } else {
            Box::new(File::open(path)?)
        };
        Ok(Self::from_reader(reader))
    }

    pub fn from_reader(reader: Box<dyn Read + Send>) -> Self {
        Self::Batch(TaxonPairReader::new(reader))
    }
}

impl Iterator for PairSource {
    type Item = Result<TaxonPairRequest>;

    fn next(&mut self) -> Option<Self::Item> {
        match self {
            Self::Single(pair) => pair.take().map(Ok),
            Self::Batch(reader) => reader.next(),
        }
    }
}
