use std::collections::HashMap;
use std::fs;
use std::path::Path;

use chrono::{Local, TimeZone};
use html_escape::{encode_double_quoted_attribute as attr, encode_text as text};
use log::info;

use crate::config::{INDEX_PAGE, SOURCES_PAGE};
use crate::error::OutputError;
use crate::models::{AggregateResult, Item, Source};

const STYLE: &str = "body{font-family:system-ui,sans-serif;max-width:52rem;margin:2rem auto;padding:0 1rem;line-height:1.5}\
li{margin-bottom:1rem}.meta{color:#666;font-size:.85rem}.summary{margin:.25rem 0 0}nav a{margin-right:1rem}";

fn format_generated(generated_at: i64) -> String {
    Local
        .timestamp_opt(generated_at, 0)
        .single()
        .map(|dt| dt.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_default()
}

fn page(title: &str, generated_at: i64, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n\
<title>{title}</title>\n<style>{STYLE}</style>\n</head>\n<body>\n\
<nav><a href=\"{INDEX_PAGE}\">Latest</a><a href=\"{SOURCES_PAGE}\">By source</a></nav>\n\
<h1>{title}</h1>\n<p class=\"meta\">Updated {updated}</p>\n{body}</body>\n</html>\n",
        title = text(title),
        updated = format_generated(generated_at),
    )
}

fn item_entry(item: &Item, show_source: bool) -> String {
    let heading = if item.link.is_empty() {
        text(&item.title).into_owned()
    } else {
        format!(
            "<a href=\"{}\">{}</a>",
            attr(&item.link),
            text(&item.title)
        )
    };

    let mut meta = Vec::new();
    if show_source {
        meta.push(format!(
            "{} &middot; {}",
            text(&item.source),
            text(&item.source_category)
        ));
    }
    if !item.published.is_empty() {
        meta.push(text(&item.published).into_owned());
    }

    let mut out = format!("<li>{}", heading);
    if !meta.is_empty() {
        out.push_str(&format!("<div class=\"meta\">{}</div>", meta.join(" &middot; ")));
    }
    if !item.summary.is_empty() {
        out.push_str(&format!("<p class=\"summary\">{}</p>", text(&item.summary)));
    }
    out.push_str("</li>\n");
    out
}

fn item_list(items: &[Item], show_source: bool) -> String {
    let mut out = String::from("<ol>\n");
    for item in items {
        out.push_str(&item_entry(item, show_source));
    }
    out.push_str("</ol>\n");
    out
}

/// Combined feed, in ranked order.
pub fn render_index(items: &[Item], generated_at: i64) -> String {
    let body = if items.is_empty() {
        "<p>No items yet.</p>\n".to_string()
    } else {
        item_list(items, true)
    };
    page("Latest posts", generated_at, &body)
}

/// One section per configured source, in configuration order.
pub fn render_sources(
    sources: &[Source],
    per_source: &HashMap<String, Vec<Item>>,
    generated_at: i64,
) -> String {
    let mut body = String::new();
    for source in sources {
        let items = per_source.get(&source.name).map(Vec::as_slice).unwrap_or(&[]);
        body.push_str(&format!(
            "<section>\n<h2><a href=\"{}\">{}</a></h2>\n<p class=\"meta\">{} &middot; {} items</p>\n",
            attr(&source.url),
            text(&source.name),
            text(&source.category),
            items.len()
        ));
        if items.is_empty() {
            body.push_str("<p>Nothing fetched from this source.</p>\n");
        } else {
            body.push_str(&item_list(items, false));
        }
        body.push_str("</section>\n");
    }
    page("Sources", generated_at, &body)
}

/// Write `index.html` and `sources.html` into `output_dir`.
pub fn write_pages(
    result: &AggregateResult,
    sources: &[Source],
    output_dir: &Path,
) -> Result<(), OutputError> {
    fs::create_dir_all(output_dir).map_err(|e| OutputError::io(output_dir, e))?;

    let pages = [
        (INDEX_PAGE, render_index(&result.items, result.generated_at)),
        (
            SOURCES_PAGE,
            render_sources(sources, &result.per_source, result.generated_at),
        ),
    ];
    for (name, html) in pages {
        let path = output_dir.join(name);
        fs::write(&path, html).map_err(|e| OutputError::io(&path, e))?;
        info!("Rendered {}", path.display());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(title: &str, source: &str, link: &str) -> Item {
        Item {
            id: format!("{}-{}", source, title),
            source: source.to_string(),
            source_category: "Research".to_string(),
            title: title.to_string(),
            link: link.to_string(),
            summary: "a < b".to_string(),
            published: "2024-01-02 03:04:05".to_string(),
            timestamp: 1,
        }
    }

    fn source(name: &str) -> Source {
        Source {
            name: name.to_string(),
            url: format!("https://{}.example/rss", name.to_lowercase()),
            category: "Research".to_string(),
        }
    }

    #[test]
    fn test_index_escapes_content() {
        let html = render_index(
            &[item("<script>alert(1)</script>", "A", "https://a.example/?x=\"1\"")],
            0,
        );
        assert!(html.contains("&lt;script&gt;alert(1)&lt;/script&gt;"));
        assert!(!html.contains("<script>"));
        assert!(html.contains("href=\"https://a.example/?x=&quot;1&quot;\""));
        assert!(html.contains("a &lt; b"));
    }

    #[test]
    fn test_index_keeps_ranked_order() {
        let html = render_index(
            &[item("newer", "A", "https://a.example/2"), item("older", "B", "")],
            0,
        );
        let newer = html.find("newer").unwrap();
        let older = html.find("older").unwrap();
        assert!(newer < older);
        assert!(html.contains("<li>older<div"));
    }

    #[test]
    fn test_index_empty() {
        assert!(render_index(&[], 0).contains("No items yet."));
    }

    #[test]
    fn test_sources_grouped_in_config_order() {
        let mut per_source = HashMap::new();
        per_source.insert("Beta".to_string(), vec![item("beta post", "Beta", "")]);
        per_source.insert("Alpha".to_string(), Vec::new());

        let html = render_sources(&[source("Beta"), source("Alpha"), source("Gamma")], &per_source, 0);
        let beta = html.find(">Beta<").unwrap();
        let alpha = html.find(">Alpha<").unwrap();
        let gamma = html.find(">Gamma<").unwrap();
        assert!(beta < alpha && alpha < gamma);
        assert!(html.contains("beta post"));
        assert_eq!(html.matches("Nothing fetched from this source.").count(), 2);
    }

    #[test]
    fn test_write_pages() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("site");
        let result = AggregateResult {
            items: vec![item("hello", "A", "https://a.example/1")],
            ..Default::default()
        };

        write_pages(&result, &[source("A")], &out).unwrap();
        assert!(fs::read_to_string(out.join("index.html")).unwrap().contains("hello"));
        assert!(fs::read_to_string(out.join("sources.html")).unwrap().contains(">A<"));
    }
}
