use chrono::{Local, NaiveDateTime, TimeZone, Utc};
use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;
use sha1::{Digest, Sha1};

use crate::models::{CalendarTime, Item, RawEntry, Source};

pub const UNTITLED: &str = "(untitled)";

/// Cap used by `strip_html` when a caller has no opinion.
pub const DEFAULT_STRIP_LEN: usize = 300;

/// Cap applied to stored item summaries.
pub const SUMMARY_MAX_LEN: usize = 500;

const PUBLISHED_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

static RE_TAGS: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]+>").unwrap());
static RE_WS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

/// Reduce an HTML fragment to plain text of at most `max_len` characters.
///
/// Tags are dropped first, then entities are decoded, so an escaped `&lt;b&gt;`
/// survives as literal text.
pub fn strip_html(text: &str, max_len: usize) -> String {
    if text.is_empty() {
        return String::new();
    }
    let text = RE_TAGS.replace_all(text, "");
    let text = html_escape::decode_html_entities(&text);
    let text = RE_WS.replace_all(&text, " ");
    text.trim().chars().take(max_len).collect()
}

/// First value that is present and non-empty.
fn first_non_empty<'a>(candidates: &[Option<&'a str>]) -> Option<&'a str> {
    candidates.iter().flatten().copied().find(|s| !s.is_empty())
}

pub fn resolve_title(entry: &RawEntry) -> String {
    match entry.title.as_deref().map(str::trim) {
        Some(title) if !title.is_empty() => title.to_string(),
        _ => UNTITLED.to_string(),
    }
}

pub fn resolve_summary(entry: &RawEntry) -> &str {
    first_non_empty(&[entry.summary.as_deref(), entry.description.as_deref()]).unwrap_or("")
}

/// Guid hint: the entry id, then its link, then its raw title.
pub fn resolve_guid(entry: &RawEntry) -> &str {
    first_non_empty(&[
        entry.id.as_deref(),
        entry.link.as_deref(),
        entry.title.as_deref(),
    ])
    .unwrap_or(UNTITLED)
}

/// Published date falling back to updated. Invalid calendar fields count as absent.
pub fn resolve_date(entry: &RawEntry) -> Option<NaiveDateTime> {
    [entry.published, entry.updated]
        .iter()
        .flatten()
        .find_map(CalendarTime::to_naive)
}

/// Epoch seconds for calendar fields read in `tz`.
pub fn epoch_in<Tz: TimeZone>(tz: &Tz, naive: &NaiveDateTime) -> i64 {
    match tz.from_local_datetime(naive).earliest() {
        Some(dt) => dt.timestamp(),
        // Skipped by a DST transition; keep the date rather than dropping it.
        None => Utc.from_utc_datetime(naive).timestamp(),
    }
}

/// Epoch seconds for calendar fields read as local time.
pub fn local_epoch(naive: &NaiveDateTime) -> i64 {
    epoch_in(&Local, naive)
}

pub fn item_id(source_name: &str, guid: &str) -> String {
    let mut hasher = Sha1::new();
    hasher.update(source_name.as_bytes());
    hasher.update(guid.as_bytes());
    hasher
        .finalize()
        .iter()
        .map(|b| format!("{:02x}", b))
        .collect()
}

/// Turn one parsed entry into an `Item`. Never fails; `now` stands in for a
/// missing date.
pub fn normalize(entry: &RawEntry, source: &Source, now: i64) -> Item {
    let (published, timestamp) = match resolve_date(entry) {
        Some(naive) => (naive.format(PUBLISHED_FORMAT).to_string(), local_epoch(&naive)),
        None => (String::new(), now),
    };

    let id = item_id(&source.name, resolve_guid(entry));
    debug!("Normalized entry {} from {}", id, source.name);

    Item {
        id,
        source: source.name.clone(),
        source_category: source.category.clone(),
        title: resolve_title(entry),
        link: entry.link.clone().unwrap_or_default(),
        summary: strip_html(resolve_summary(entry), SUMMARY_MAX_LEN),
        published,
        timestamp,
    }
}

pub fn normalize_now(entry: &RawEntry, source: &Source) -> Item {
    normalize(entry, source, Utc::now().timestamp())
}
