use serde_json::{Map, Value};
use tracing::debug;

use common::models::NewsArticle;

use crate::NormalizeError;
use crate::normalizer::extract_json;

/// A lone object is read as a batch of one.
pub fn normalize_news(raw: &str) -> Result<Vec<NewsArticle>, NormalizeError> {
    let items = match extract_json(raw)? {
        Value::Array(items) => items,
        object @ Value::Object(_) => vec![object],
        _ => Vec::new(),
    };

    let total = items.len();
    let articles: Vec<NewsArticle> = items
        .iter()
        .filter_map(Value::as_object)
        .filter_map(article_from_fields)
        .collect();

    if articles.len() < total {
        debug!("Dropped {} malformed news items", total - articles.len());
    }
    Ok(articles)
}

fn article_from_fields(fields: &Map<String, Value>) -> Option<NewsArticle> {
    let text = |key: &str| fields.get(key).and_then(Value::as_str).map(str::trim);

    let title = text("title").filter(|t| !t.is_empty())?;
    let url = text("url").filter(|u| !u.is_empty())?;

    Some(NewsArticle {
        title: title.to_string(),
        snippet: text("snippet").unwrap_or_default().to_string(),
        url: url.to_string(),
        source_name: text("sourceName").unwrap_or_default().to_string(),
    })
}
