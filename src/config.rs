//! Command-line configuration.

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

#[derive(Debug, Parser)]
#[command(name = "river-view", version)]
#[command(about = "Browse the rivers listed in a river manifest", long_about = None)]
pub struct Cli {
    /// Manifest URL or path (manifest.json, or JSONP manifest.js)
    #[arg(default_value = "manifest.json")]
    pub manifest: String,

    /// Re-fetch the selected river every SECS seconds (0 disables)
    #[arg(short, long, value_name = "SECS", default_value_t = 0)]
    pub refresh: u64,

    /// Per-request timeout in seconds
    #[arg(short, long, value_name = "SECS", default_value_t = 10)]
    pub timeout: u64,

    /// Where log output goes; the terminal belongs to the UI
    #[arg(long, default_value = "river-view.log")]
    pub log_file: PathBuf,
}

impl Cli {
    pub fn refresh_interval(&self) -> Option<Duration> {
        (self.refresh > 0).then(|| Duration::from_secs(self.refresh))
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.timeout.max(1))
    }
}
