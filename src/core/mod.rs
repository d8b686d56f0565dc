pub mod engine;
pub mod extractor;
pub mod input;

pub use crate::domain::model::{DivergenceRecord, TaxonPairRequest};
pub use crate::domain::ports::{ConfigProvider, PageFetcher};
pub use crate::utils::error::Result;
