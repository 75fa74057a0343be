use thiserror::Error;

/// Failures loading the source list. Always fatal for a run.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read source config {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid JSON in source config: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid YAML in source config: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("duplicate source name: {0}")]
    DuplicateSource(String),
}

/// Failures fetching or parsing a single feed. Never escapes the aggregator.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected status {0}")]
    Status(reqwest::StatusCode),

    #[error("failed to parse feed: {0}")]
    Parse(#[from] feed_rs::parser::ParseFeedError),
}

/// Failures writing the snapshot or rendered pages.
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl OutputError {
    pub fn io(path: &std::path::Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.display().to_string(),
            source,
        }
    }
}
