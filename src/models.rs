use std::collections::HashMap;

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, Timelike, Utc};
use serde::{Deserialize, Serialize};

pub const DEFAULT_CATEGORY: &str = "General";

fn default_category() -> String {
    DEFAULT_CATEGORY.to_string()
}

/// One configured feed.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Source {
    pub name: String,
    pub url: String,
    #[serde(default = "default_category")]
    pub category: String,
}

/// Calendar fields of a feed date, kept loose so bad dates survive until
/// normalization decides what to do with them.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CalendarTime {
    pub year: i32,
    pub month: u32,
    pub day: u32,
    pub hour: u32,
    pub minute: u32,
    pub second: u32,
}

impl CalendarTime {
    /// `None` when the fields don't form a real date and time.
    pub fn to_naive(&self) -> Option<NaiveDateTime> {
        NaiveDate::from_ymd_opt(self.year, self.month, self.day)?
            .and_hms_opt(self.hour, self.minute, self.second)
    }
}

impl From<DateTime<Utc>> for CalendarTime {
    fn from(dt: DateTime<Utc>) -> Self {
        Self {
            year: dt.year(),
            month: dt.month(),
            day: dt.day(),
            hour: dt.hour(),
            minute: dt.minute(),
            second: dt.second(),
        }
    }
}

/// A feed entry as handed over by the parser. Anything may be missing.
#[derive(Debug, Clone, Default)]
pub struct RawEntry {
    pub id: Option<String>,
    pub link: Option<String>,
    pub title: Option<String>,
    pub summary: Option<String>,
    pub description: Option<String>,
    pub published: Option<CalendarTime>,
    pub updated: Option<CalendarTime>,
}

/// Canonical, normalized entry. Field names are part of the snapshot format.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Item {
    pub id: String,
    pub source: String,
    pub source_category: String,
    pub title: String,
    pub link: String,
    pub summary: String,
    pub published: String,
    pub timestamp: i64,
}

#[derive(Debug, Clone, Default)]
pub struct AggregateResult {
    /// Merged items, newest first, capped to the total limit.
    pub items: Vec<Item>,
    /// Items per source name, capped to the per-source limit.
    pub per_source: HashMap<String, Vec<Item>>,
    pub generated_at: i64,
    /// Sources that yielded nothing because both fetch attempts failed.
    pub failed_sources: Vec<String>,
}
