pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::cli::CliConfig;

pub use adapters::{http::HttpFetcher, output::RecordWriter};
pub use config::RetrieverConfig;
pub use crate::core::{engine::RetrievalEngine, extractor::extract_statistics, input::PairSource};
pub use domain::model::{DivergenceRecord, TaxonPairRequest};
pub use utils::error::{Result, RetrieverError};
