use tracing::{error, info};

use common::models::NewsArticle;

use super::signal_service::log_normalize_failure;
use super::{RetryPolicy, call_with_retry};
use crate::news::normalize_news;
use crate::traits::AnalysisOracle;
use crate::{AdvisorError, prompts};

pub struct NewsService<O> {
    oracle: O,
    retry: RetryPolicy,
}

impl<O: AnalysisOracle> NewsService<O> {
    pub fn new(oracle: O) -> Self {
        Self {
            oracle,
            retry: RetryPolicy::default(),
        }
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub async fn fetch_news(&self, category: &str) -> Result<Vec<NewsArticle>, AdvisorError> {
        let prompt = prompts::news_prompt(category);

        let reply = call_with_retry(&self.oracle, &prompt, &self.retry)
            .await
            .inspect_err(|e| error!("News request for {} failed [{}]: {}", category, e.category(), e))?;

        let articles = normalize_news(&reply.text)
            .inspect_err(|e| log_normalize_failure(&format!("{category} news"), e))?;

        info!("Fetched {} {} news articles", articles.len(), category);
        Ok(articles)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::NormalizeError;
    use crate::traits::{MockAnalysisOracle, OracleReply};

    #[tokio::test]
    async fn returns_well_formed_articles() {
        let mut oracle = MockAnalysisOracle::new();
        oracle
            .expect_generate()
            .withf(|prompt| prompt.contains("Commodities"))
            .times(1)
            .returning(|_| {
                Ok(OracleReply {
                    text: r#"Sure! [{"title": "Gold hits record", "snippet": "Safe-haven demand.", "url": "https://kitco.com/g", "sourceName": "Kitco"}, {"snippet": "orphan"}]"#.to_string(),
                    citations: vec![],
                })
            });

        let articles = NewsService::new(oracle)
            .with_retry(RetryPolicy::none())
            .fetch_news("Commodities")
            .await
            .unwrap();

        assert_eq!(articles.len(), 1);
        assert_eq!(articles[0].source_name, "Kitco");
    }

    #[tokio::test]
    async fn prose_only_reply_fails_with_structure_not_found() {
        let mut oracle = MockAnalysisOracle::new();
        oracle.expect_generate().returning(|_| {
            Ok(OracleReply {
                text: "I could not find any news.".to_string(),
                citations: vec![],
            })
        });

        let err = NewsService::new(oracle)
            .with_retry(RetryPolicy::none())
            .fetch_news("All")
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            AdvisorError::Normalize(NormalizeError::NoStructureFound)
        ));
    }
}
