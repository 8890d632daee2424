use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use url::Url;

use super::SignalSource;

/// Grounding redirect links carry no information about the real publisher.
const EXCLUDED_HOSTS: &[&str] = &["vertexaisearch.cloud.google.com"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataSource {
    pub name: String,
    pub url: String,
}

fn site_key(raw: &str) -> Option<String> {
    let url = Url::parse(raw).ok()?;
    let host = url.host_str()?;
    Some(host.strip_prefix("www.").unwrap_or(host).to_string())
}

/// `Some` only when a new host was found.
pub fn merge_featured_sites(
    current: &[DataSource],
    sources: &[SignalSource],
) -> Option<Vec<DataSource>> {
    let fresh = sources.iter().filter_map(|source| {
        let url = Url::parse(&source.uri).ok()?;
        let host = url.host_str()?;
        if EXCLUDED_HOSTS.contains(&host) {
            return None;
        }
        Some(DataSource {
            name: source.title.clone(),
            url: source.uri.clone(),
        })
    });

    let mut seen = HashSet::new();
    let merged: Vec<DataSource> = current
        .iter()
        .cloned()
        .chain(fresh)
        .filter(|site| site_key(&site.url).is_some_and(|key| seen.insert(key)))
        .collect();

    (merged.len() > current.len()).then_some(merged)
}
