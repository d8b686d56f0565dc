use clap::{CommandFactory, Parser};
use std::process::ExitCode;
use timetree_retriever::core::ConfigProvider;
use timetree_retriever::utils::{logger, validation::Validate};
use timetree_retriever::{
    CliConfig, HttpFetcher, RecordWriter, RetrievalEngine, Result, RetrieverError,
};

async fn run(cli: CliConfig) -> Result<usize> {
    let config = cli.resolve()?;
    config.validate()?;
    tracing::debug!("Resolved config: {:?}", config);

    let pairs = cli.pair_source()?;
    let fetcher = HttpFetcher::new(&config)?;
    let engine = RetrievalEngine::new(fetcher, config.endpoint()).with_sleep(config.sleep());

    let mut output = RecordWriter::new(std::io::stdout().lock());
    engine.run(pairs, &mut output, config.header()).await
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = CliConfig::parse();

    logger::init_cli_logger(cli.verbose);
    tracing::debug!("CLI config: {:?}", cli);

    match run(cli).await {
        Ok(_) => ExitCode::SUCCESS,
        Err(e @ RetrieverError::UsageError { .. }) => {
            eprintln!("{}", e);
            eprintln!("{}", CliConfig::command().render_usage());
            ExitCode::from(e.exit_code() as u8)
        }
        Err(e) => {
            tracing::error!("Retrieval failed: {}", e);
            eprintln!("❌ {}", e);
            ExitCode::from(e.exit_code() as u8)
        }
    }
}
