use chrono::Utc;
use log::{info, warn};

use crate::config::Limits;
use crate::error::FetchError;
use crate::feed::{parse_entries, Transport};
use crate::models::{AggregateResult, RawEntry, Source};
use crate::normalize::normalize;

/// Fetch and parse one source, trying the lenient path once if the normal one fails.
pub async fn fetch_entries<T: Transport>(
    transport: &T,
    source: &Source,
) -> Result<Vec<RawEntry>, FetchError> {
    let primary = match transport.fetch(&source.url).await {
        Ok(bytes) => parse_entries(&bytes),
        Err(e) => Err(e),
    };

    match primary {
        Ok(entries) => Ok(entries),
        Err(e) => {
            warn!("Fetch of {} failed ({}), retrying leniently", source.name, e);
            let bytes = transport.fetch_lenient(&source.url).await?;
            parse_entries(&bytes)
        }
    }
}

/// Fetch every source in order and merge them into one ranked, capped result.
///
/// A failing source contributes an empty list; nothing here aborts the run.
pub async fn aggregate<T: Transport>(
    transport: &T,
    sources: &[Source],
    limits: Limits,
) -> AggregateResult {
    let mut result = AggregateResult::default();

    for source in sources {
        let entries = match fetch_entries(transport, source).await {
            Ok(entries) => entries,
            Err(e) => {
                warn!("Skipping {}: {}", source.name, e);
                result.failed_sources.push(source.name.clone());
                Vec::new()
            }
        };

        let now = Utc::now().timestamp();
        let normalized: Vec<_> = entries
            .iter()
            .take(limits.per_source)
            .map(|entry| normalize(entry, source, now))
            .collect();

        info!(
            "{}: {} entries, kept {}",
            source.name,
            entries.len(),
            normalized.len()
        );

        result.items.extend(normalized.iter().cloned());
        result.per_source.insert(source.name.clone(), normalized);
    }

    // Stable, so equal timestamps keep source-then-feed order.
    result.items.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
    result.items.truncate(limits.total);
    result.generated_at = Utc::now().timestamp();

    result
}
