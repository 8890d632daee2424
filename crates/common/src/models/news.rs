use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewsArticle {
    pub title: String,
    pub snippet: String,
    pub url: String,
    pub source_name: String,
}

pub const NEWS_CATEGORIES: [&str; 5] = ["All", "Forex", "Crypto", "Indices", "Commodities"];
