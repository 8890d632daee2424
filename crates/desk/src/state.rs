use thiserror::Error;
use tracing::{debug, error, info, warn};

use advisor::{AdvisorError, AnalysisOracle, SignalService};
use common::assets::INITIAL_WATCHLIST;
use common::models::{DataSource, Signal, merge_featured_sites};
use storage::KeyValueStore;
use storage::repositories::{
    FeaturedSitesRepository, SignalHistoryRepository, WatchlistRepository,
};

#[derive(Error, Debug)]
pub enum AppError {
    #[error("an analysis request is already in progress")]
    Busy,
    #[error(transparent)]
    Advisor(#[from] AdvisorError),
}

/// Storage failures are logged, never returned; memory stays authoritative.
pub struct AppState<S> {
    store: S,
    history: Vec<Signal>,
    watchlist: Vec<String>,
    featured_sites: Vec<DataSource>,
    busy: bool,
}

impl<S: KeyValueStore> AppState<S> {
    pub async fn hydrate(store: S) -> Self {
        let history = SignalHistoryRepository::load(&store)
            .await
            .unwrap_or_else(|e| {
                error!("Could not read signal history, starting empty: {}", e);
                Vec::new()
            });

        let featured_sites = FeaturedSitesRepository::load(&store)
            .await
            .unwrap_or_else(|e| {
                error!("Could not read featured sites, starting empty: {}", e);
                Vec::new()
            });

        let watchlist = match WatchlistRepository::load(&store).await {
            Ok(Some(list)) => list,
            Ok(None) => {
                let initial: Vec<String> = INITIAL_WATCHLIST.iter().map(|s| s.to_string()).collect();
                debug!("No saved watchlist, seeding {} assets", initial.len());
                if let Err(e) = WatchlistRepository::save(&store, &initial).await {
                    error!("Could not persist initial watchlist: {}", e);
                }
                initial
            }
            Err(e) => {
                error!("Could not read watchlist, starting empty: {}", e);
                Vec::new()
            }
        };

        debug!(
            "Hydrated desk: {} signals, {} watchlist assets, {} featured sites",
            history.len(),
            watchlist.len(),
            featured_sites.len()
        );

        Self {
            store,
            history,
            watchlist,
            featured_sites,
            busy: false,
        }
    }

    /// Newest first.
    pub fn history(&self) -> &[Signal] {
        &self.history
    }

    pub fn current_signal(&self) -> Option<&Signal> {
        self.history.first()
    }

    pub fn watchlist(&self) -> &[String] {
        &self.watchlist
    }

    pub fn featured_sites(&self) -> &[DataSource] {
        &self.featured_sites
    }

    pub fn is_busy(&self) -> bool {
        self.busy
    }

    pub fn begin_request(&mut self) -> Result<(), AppError> {
        if self.busy {
            return Err(AppError::Busy);
        }
        self.busy = true;
        Ok(())
    }

    pub fn finish_request(&mut self) {
        self.busy = false;
    }

    pub async fn analyze<O: AnalysisOracle>(
        &mut self,
        service: &SignalService<O>,
        asset_name: &str,
    ) -> Result<&Signal, AppError> {
        self.begin_request()?;
        let outcome = service.generate_signal(asset_name).await;
        self.finish_request();

        self.add_signal(outcome?).await;
        Ok(&self.history[0])
    }

    pub async fn add_signal(&mut self, signal: Signal) {
        let sources = signal.sources.clone();
        self.history.insert(0, signal);
        if let Err(e) = SignalHistoryRepository::save(&self.store, &self.history).await {
            error!("Could not persist signal history: {}", e);
        }

        if let Some(merged) = merge_featured_sites(&self.featured_sites, &sources) {
            info!(
                "Featured sites grew from {} to {}",
                self.featured_sites.len(),
                merged.len()
            );
            self.featured_sites = merged;
            if let Err(e) = FeaturedSitesRepository::save(&self.store, &self.featured_sites).await {
                error!("Could not persist featured sites: {}", e);
            }
        }
    }

    pub async fn clear_history(&mut self) {
        self.history.clear();
        if let Err(e) = SignalHistoryRepository::clear(&self.store).await {
            error!("Could not persist cleared history: {}", e);
        }
    }

    /// Returns `false` when the asset is already listed.
    pub async fn add_to_watchlist(&mut self, asset_name: &str) -> bool {
        if self.watchlist.iter().any(|a| a == asset_name) {
            return false;
        }
        self.watchlist.push(asset_name.to_string());
        self.persist_watchlist().await;
        true
    }

    /// Returns `false` when the asset was not listed.
    pub async fn remove_from_watchlist(&mut self, asset_name: &str) -> bool {
        let before = self.watchlist.len();
        self.watchlist.retain(|a| a != asset_name);
        if self.watchlist.len() == before {
            warn!("{} is not on the watchlist", asset_name);
            return false;
        }
        self.persist_watchlist().await;
        true
    }

    async fn persist_watchlist(&self) {
        if let Err(e) = WatchlistRepository::save(&self.store, &self.watchlist).await {
            error!("Could not persist watchlist: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use advisor::{OracleReply, RetryPolicy};
    use async_trait::async_trait;
    use chrono::{TimeZone, Utc};
    use common::models::{Direction, PivotPoints, Rsi, SignalSource, Sma};
    use storage::repositories::keys;
    use storage::{MemoryStore, StorageError};

    struct BrokenStore;

    #[async_trait]
    impl KeyValueStore for BrokenStore {
        async fn read(&self, _key: &str) -> Result<Option<String>, StorageError> {
            Err(StorageError::Io(std::io::Error::other("disk unavailable")))
        }

        async fn write(&self, _key: &str, _value: &str) -> Result<(), StorageError> {
            Err(StorageError::Io(std::io::Error::other("disk unavailable")))
        }
    }

    struct CannedOracle(&'static str);

    #[async_trait]
    impl AnalysisOracle for CannedOracle {
        async fn generate(&self, _prompt: &str) -> Result<OracleReply, AdvisorError> {
            Ok(OracleReply {
                text: self.0.to_string(),
                citations: vec![],
            })
        }
    }

    fn signal(asset: &str, sources: &[(&str, &str)]) -> Signal {
        Signal {
            asset_name: asset.to_string(),
            update_time: Utc.with_ymd_and_hms(2025, 6, 2, 14, 0, 0).unwrap(),
            direction: Direction::Buy,
            confidence: 81,
            entry_price: "64,250".to_string(),
            tp1: "66,000".to_string(),
            tp2: "68,000".to_string(),
            sl: "61,500".to_string(),
            pivot_points: PivotPoints::default(),
            rsi: Rsi::default(),
            sma: Sma::default(),
            strategy_description: "Breakout above range [1].".to_string(),
            risk_tip: String::new(),
            sources: sources
                .iter()
                .map(|(title, uri)| SignalSource {
                    title: title.to_string(),
                    uri: uri.to_string(),
                })
                .collect(),
        }
    }

    #[tokio::test]
    async fn fresh_store_seeds_and_persists_initial_watchlist() {
        let state = AppState::hydrate(MemoryStore::new()).await;

        assert_eq!(state.watchlist().len(), INITIAL_WATCHLIST.len());
        assert!(state.history().is_empty());
        assert!(state.featured_sites().is_empty());

        let saved = WatchlistRepository::load(&state.store).await.unwrap();
        assert_eq!(saved.as_deref(), Some(state.watchlist()));
    }

    #[tokio::test]
    async fn saved_empty_watchlist_is_respected() {
        let store = MemoryStore::with_entries([(keys::WATCHLIST, "[]")]);
        let state = AppState::hydrate(store).await;
        assert!(state.watchlist().is_empty());
    }

    #[tokio::test]
    async fn corrupt_values_hydrate_as_empty() {
        let store = MemoryStore::with_entries([
            (keys::SIGNAL_HISTORY, "{broken"),
            (keys::WATCHLIST, "\"not a list\""),
        ]);
        let state = AppState::hydrate(store).await;

        assert!(state.history().is_empty());
        assert!(state.watchlist().is_empty());
    }

    #[tokio::test]
    async fn add_signal_prepends_and_persists() {
        let mut state = AppState::hydrate(MemoryStore::new()).await;
        state.add_signal(signal("EUR/USD", &[])).await;
        state.add_signal(signal("Gold (XAU/USD)", &[])).await;

        assert_eq!(state.current_signal().unwrap().asset_name, "Gold (XAU/USD)");

        let reloaded = AppState::hydrate(state.store).await;
        let assets: Vec<_> = reloaded.history().iter().map(|s| s.asset_name.as_str()).collect();
        assert_eq!(assets, vec!["Gold (XAU/USD)", "EUR/USD"]);
    }

    #[tokio::test]
    async fn add_signal_merges_featured_sites_by_host() {
        let mut state = AppState::hydrate(MemoryStore::new()).await;
        state
            .add_signal(signal(
                "EUR/USD",
                &[
                    ("Reuters", "https://www.reuters.com/markets"),
                    ("Grounding", "https://vertexaisearch.cloud.google.com/redirect/x"),
                ],
            ))
            .await;
        state
            .add_signal(signal(
                "EUR/USD",
                &[
                    ("Reuters again", "https://reuters.com/other"),
                    ("FXStreet", "https://fxstreet.com/eur"),
                ],
            ))
            .await;

        let names: Vec<_> = state.featured_sites().iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["Reuters", "FXStreet"]);

        let saved = FeaturedSitesRepository::load(&state.store).await.unwrap();
        assert_eq!(saved, state.featured_sites());
    }

    #[tokio::test]
    async fn cleared_history_stays_cleared_after_reload() {
        let mut state = AppState::hydrate(MemoryStore::new()).await;
        state.add_signal(signal("EUR/USD", &[])).await;
        state.clear_history().await;
        assert!(state.history().is_empty());

        let reloaded = AppState::hydrate(state.store).await;
        assert!(reloaded.history().is_empty());
    }

    #[tokio::test]
    async fn watchlist_rejects_duplicates_and_unknown_removals() {
        let mut state = AppState::hydrate(MemoryStore::with_entries([(keys::WATCHLIST, "[]")])).await;

        assert!(state.add_to_watchlist("EUR/USD").await);
        assert!(!state.add_to_watchlist("EUR/USD").await);
        assert!(!state.remove_from_watchlist("GBP/USD").await);
        assert!(state.remove_from_watchlist("EUR/USD").await);

        let saved = WatchlistRepository::load(&state.store).await.unwrap();
        assert_eq!(saved, Some(vec![]));
    }

    #[tokio::test]
    async fn storage_failures_do_not_surface() {
        let mut state = AppState::hydrate(BrokenStore).await;
        assert!(state.watchlist().is_empty());

        state.add_signal(signal("EUR/USD", &[("FXStreet", "https://fxstreet.com")])).await;
        assert!(state.add_to_watchlist("EUR/USD").await);
        state.clear_history().await;

        assert!(state.history().is_empty());
        assert_eq!(state.watchlist().to_vec(), vec!["EUR/USD".to_string()]);
        assert_eq!(state.featured_sites().len(), 1);
    }

    #[tokio::test]
    async fn second_request_is_rejected_while_busy() {
        let mut state = AppState::hydrate(MemoryStore::new()).await;

        state.begin_request().unwrap();
        assert!(state.is_busy());
        assert!(matches!(state.begin_request(), Err(AppError::Busy)));

        state.finish_request();
        assert!(state.begin_request().is_ok());
    }

    #[tokio::test]
    async fn analyze_records_signal_and_clears_busy_flag() {
        let mut state = AppState::hydrate(MemoryStore::new()).await;
        let service = SignalService::new(CannedOracle(
            r#"{"direction": "BUY", "confidence": 88, "entryPrice": "2,915.40"}"#,
        ))
        .with_retry(RetryPolicy::none());

        let signal = state.analyze(&service, "Gold (XAU/USD)").await.unwrap();
        assert_eq!(signal.asset_name, "Gold (XAU/USD)");
        assert_eq!(signal.confidence, 88);

        assert!(!state.is_busy());
        assert_eq!(state.history().len(), 1);
    }

    #[tokio::test]
    async fn failed_analysis_leaves_history_untouched() {
        let mut state = AppState::hydrate(MemoryStore::new()).await;
        let service = SignalService::new(CannedOracle("")).with_retry(RetryPolicy::none());

        let err = state.analyze(&service, "EUR/USD").await.unwrap_err();
        assert!(matches!(err, AppError::Advisor(AdvisorError::Normalize(_))));
        assert!(!state.is_busy());
        assert!(state.history().is_empty());
    }
}
