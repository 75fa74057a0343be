//! Fetch a fixed list of RSS/Atom feeds, normalize their entries, and publish
//! the merged result as a JSON snapshot plus two static HTML pages.

pub mod aggregate;
pub mod config;
pub mod error;
pub mod feed;
pub mod logger;
pub mod models;
pub mod normalize;
pub mod registry;
pub mod render;
pub mod snapshot;
