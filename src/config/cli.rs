use crate::config::{RetrieverConfig, Settings};
use crate::core::input::PairSource;
use crate::utils::error::{Result, RetrieverError};
use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(name = "timetree-retriever")]
#[command(version)]
#[command(about = "Retrieves divergence times from TimeTree")]
pub struct CliConfig {
    /// Two taxon names, e.g. "Homo sapiens" "Pan troglodytes"
    #[arg(value_name = "TAXON", conflicts_with = "file_input")]
    pub taxa: Vec<String>,

    /// Tab-delimited file of taxon pairs ("-" for stdin)
    #[arg(short = 'f', long = "file-input", value_name = "PATH")]
    pub file_input: Option<PathBuf>,

    /// Print a header row before batch output
    #[arg(short = 'd', long)]
    pub header: bool,

    /// Seconds to wait between requests in batch mode
    #[arg(short = 's', long, value_name = "N")]
    pub sleep: Option<u64>,

    /// Cache directory name
    #[arg(long, value_name = "DIR")]
    pub cache: Option<PathBuf>,

    /// Print HTTP response headers to stderr
    #[arg(long = "print_http")]
    pub print_http: bool,

    /// Service endpoint queried for each pair
    #[arg(long, value_name = "URL")]
    pub endpoint: Option<String>,

    /// Request timeout in seconds
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// TOML settings file
    #[arg(short = 'c', long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short = 'v', long)]
    pub verbose: bool,
}

impl CliConfig {
    /// Command-line values win over the settings file, which wins over defaults.
    pub fn resolve(&self) -> Result<RetrieverConfig> {
        let settings = match &self.config {
            Some(path) => Settings::from_file(path)?,
            None => Settings::default(),
        };
        let mut config = RetrieverConfig::from_settings(settings);

        if let Some(endpoint) = &self.endpoint {
            config.endpoint = endpoint.clone();
        }
        if let Some(timeout) = self.timeout {
            config.timeout_seconds = timeout;
        }
        if let Some(cache) = &self.cache {
            config.cache_dir = Some(cache.clone());
        }
        if let Some(sleep) = self.sleep {
            config.sleep_seconds = sleep;
        }
        config.header |= self.header;
        config.print_http = self.print_http;

        // Header and sleep only apply to file input.
        if self.file_input.is_none() {
            config.header = false;
            config.sleep_seconds = 0;
        }

        Ok(config)
    }

    pub fn pair_source(&self) -> Result<PairSource> {
        match &self.file_input {
            Some(path) => PairSource::from_path(path),
            None if self.taxa.len() == 2 => PairSource::from_args(&self.taxa),
            None => Err(RetrieverError::usage(format!(
                "provide two taxa or --file-input (got {} taxon argument{})",
                self.taxa.len(),
                if self.taxa.len() == 1 { "" } else { "s" }
            ))),
        }
    }
}
