use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use tuning_engine::{FetchSettings, UpdateConfig, DEFAULT_SOURCE_URL};

#[derive(Debug, Parser)]
#[command(
    name = "freebsd-tuning-update",
    version,
    about = "Extract the recommended FreeBSD network tuning snippets into their config files"
)]
pub struct Args {
    /// Page to fetch.
    #[arg(long, default_value = DEFAULT_SOURCE_URL)]
    pub url: String,

    /// Read a saved copy of the page instead of fetching it.
    #[arg(long, value_name = "PATH")]
    pub from_file: Option<PathBuf>,

    /// Directory that `boot/` and `etc/` live in.
    #[arg(long, value_name = "DIR", default_value = ".")]
    pub output_root: PathBuf,

    /// Request timeout in seconds.
    #[arg(long, value_name = "SECS", default_value_t = 30)]
    pub timeout: u64,

    /// Log at debug level.
    #[arg(short, long)]
    pub verbose: bool,

    /// Also write the log to ./engine.log.
    #[arg(long)]
    pub log_file: bool,
}

impl Args {
    pub fn fetch_settings(&self) -> FetchSettings {
        FetchSettings {
            request_timeout: Duration::from_secs(self.timeout),
            ..FetchSettings::default()
        }
    }

    pub fn update_config(&self) -> UpdateConfig {
        UpdateConfig {
            url: self.url.clone(),
            output_root: self.output_root.clone(),
            ..UpdateConfig::default()
        }
    }
}
