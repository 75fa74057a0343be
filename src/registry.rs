use std::collections::HashSet;
use std::fs;
use std::path::Path;

use log::{debug, info};
use serde::Deserialize;

use crate::error::ConfigError;
use crate::models::Source;

#[derive(Debug, Deserialize)]
struct SourcesConfig {
    sources: Vec<Source>,
}

fn is_yaml(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|e| e.to_str()).map(str::to_ascii_lowercase).as_deref(),
        Some("yaml" | "yml")
    )
}

/// Parse a `{ "sources": [...] }` document. YAML when `yaml` is set, JSON otherwise.
pub fn parse_sources(contents: &str, yaml: bool) -> Result<Vec<Source>, ConfigError> {
    let config: SourcesConfig = if yaml {
        serde_yaml::from_str(contents)?
    } else {
        serde_json::from_str(contents)?
    };

    {
        let mut seen = HashSet::new();
        for source in &config.sources {
            if !seen.insert(source.name.as_str()) {
                return Err(ConfigError::DuplicateSource(source.name.clone()));
            }
            debug!("Loaded source: {} ({})", source.name, source.category);
        }
    }

    Ok(config.sources)
}

/// Load the configured feed sources, in file order.
pub fn load_sources(path: &Path) -> Result<Vec<Source>, ConfigError> {
    info!("Loading sources from {}", path.display());

    let contents = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.display().to_string(),
        source,
    })?;
    let sources = parse_sources(&contents, is_yaml(path))?;

    info!("Loaded {} sources", sources.len());
    Ok(sources)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_parse_json_with_default_category() {
        let sources = parse_sources(
            r#"{"sources": [
                {"name": "Krebs", "url": "https://krebsonsecurity.com/feed/", "category": "News"},
                {"name": "SANS", "url": "https://isc.sans.edu/rssfeed.xml"}
            ]}"#,
            false,
        )
        .unwrap();

        assert_eq!(sources.len(), 2);
        assert_eq!(sources[0].category, "News");
        assert_eq!(sources[1].name, "SANS");
        assert_eq!(sources[1].category, "General");
    }

    #[test]
    fn test_parse_yaml() {
        let sources = parse_sources(
            "sources:\n  - name: Krebs\n    url: https://krebsonsecurity.com/feed/\n",
            true,
        )
        .unwrap();
        assert_eq!(sources[0].url, "https://krebsonsecurity.com/feed/");
        assert_eq!(sources[0].category, "General");
    }

    #[test]
    fn test_duplicate_names_rejected() {
        let err = parse_sources(
            r#"{"sources": [
                {"name": "A", "url": "https://a.example/1"},
                {"name": "A", "url": "https://a.example/2"}
            ]}"#,
            false,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::DuplicateSource(name) if name == "A"));
    }

    #[test]
    fn test_missing_url_rejected() {
        assert!(matches!(
            parse_sources(r#"{"sources": [{"name": "A"}]}"#, false),
            Err(ConfigError::Json(_))
        ));
    }

    #[test]
    fn test_load_sources_from_file() {
        let mut file = tempfile::Builder::new().suffix(".yml").tempfile().unwrap();
        writeln!(file, "sources:\n  - name: A\n    url: https://a.example/rss\n    category: Blogs").unwrap();

        let sources = load_sources(file.path()).unwrap();
        assert_eq!(sources[0].category, "Blogs");
    }

    #[test]
    fn test_load_sources_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_sources(&dir.path().join("feeds.json")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn test_load_sources_unparsable_file() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        write!(file, "{{ not json").unwrap();
        assert!(matches!(load_sources(file.path()), Err(ConfigError::Json(_))));
    }
}
