//! Refreshes `boot/loader.conf`, `etc/sysctl.conf` and `etc/rc.conf` from the
//! calomel.org FreeBSD network tuning page.

mod cli;

use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use engine_logging::{engine_error, engine_info, LogDestination, DEFAULT_LOG_FILE};
use log::LevelFilter;
use tuning_engine::{run_update, Fetcher, FileFetcher, HttpFetcher};

use crate::cli::Args;

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(&args);

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            // Debug formatting prints the whole cause chain.
            engine_error!("{err:?}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> anyhow::Result<()> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to start the async runtime")?;

    let config = args.update_config();
    let fetcher: Box<dyn Fetcher> = match &args.from_file {
        Some(path) => Box::new(FileFetcher::new(path)),
        None => Box::new(
            HttpFetcher::new(&args.fetch_settings()).context("failed to build the HTTP client")?,
        ),
    };

    let report = runtime
        .block_on(run_update(fetcher.as_ref(), &config))
        .with_context(|| format!("updating from {}", config.url))?;

    for file in &report.written {
        engine_info!("{} <- {:?}", file.path.display(), file.marker);
    }
    Ok(())
}

fn init_logging(args: &Args) {
    let level = if args.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    let destination = if args.log_file {
        LogDestination::Both(DEFAULT_LOG_FILE.into())
    } else {
        LogDestination::Terminal
    };
    engine_logging::initialize(destination, level);
}
