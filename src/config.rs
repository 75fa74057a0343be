use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

pub const SNAPSHOT_FILE: &str = "posts.json";
pub const INDEX_PAGE: &str = "index.html";
pub const SOURCES_PAGE: &str = "sources.html";

#[derive(Parser, Debug)]
#[command(author, version, about = "Fetch RSS/Atom feeds into a JSON snapshot and static pages", long_about = None)]
pub struct Args {
    /// Source list (JSON, or YAML by extension)
    #[arg(short, long, env = "FEEDSNAP_FEEDS", default_value = "feeds.json")]
    pub feeds: PathBuf,

    /// Directory receiving posts.json
    #[arg(short, long, env = "FEEDSNAP_DATA_DIR", default_value = "data")]
    pub data_dir: PathBuf,

    /// Directory receiving the rendered HTML pages
    #[arg(short, long, env = "FEEDSNAP_OUTPUT_DIR", default_value = ".")]
    pub output_dir: PathBuf,

    #[arg(long, env = "MAX_ITEMS_PER_SOURCE", default_value_t = 50)]
    pub max_items_per_source: usize,

    #[arg(long, env = "MAX_TOTAL_ITEMS", default_value_t = 400)]
    pub max_total_items: usize,

    /// Per-request timeout in seconds
    #[arg(long, env = "FEEDSNAP_TIMEOUT_SECS", default_value_t = 20)]
    pub timeout_secs: u64,

    #[arg(long, env = "FEEDSNAP_USER_AGENT", default_value = "CyberSecRSS/1.0")]
    pub user_agent: String,

    #[arg(long, env = "FEEDSNAP_LOG", default_value = "info")]
    pub log_level: String,

    /// Also log to this file at debug level
    #[arg(long, env = "FEEDSNAP_LOG_FILE")]
    pub log_file: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Limits {
    pub per_source: usize,
    pub total: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            per_source: 50,
            total: 400,
        }
    }
}

/// Everything a run needs, resolved once at startup.
#[derive(Debug, Clone)]
pub struct Settings {
    pub feeds_path: PathBuf,
    pub snapshot_path: PathBuf,
    pub output_dir: PathBuf,
    pub limits: Limits,
    pub timeout: Duration,
    pub user_agent: String,
}

impl From<&Args> for Settings {
    fn from(args: &Args) -> Self {
        Self {
            feeds_path: args.feeds.clone(),
            snapshot_path: args.data_dir.join(SNAPSHOT_FILE),
            output_dir: args.output_dir.clone(),
            limits: Limits {
                per_source: args.max_items_per_source,
                total: args.max_total_items,
            },
            timeout: Duration::from_secs(args.timeout_secs),
            user_agent: args.user_agent.clone(),
        }
    }
}
