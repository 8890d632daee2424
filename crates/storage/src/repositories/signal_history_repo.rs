use common::models::Signal;

use super::{keys, load_list, save_list};
use crate::{KeyValueStore, StorageError};

pub struct SignalHistoryRepository;

impl SignalHistoryRepository {
    /// Newest first, exactly as saved.
    pub async fn load(store: &dyn KeyValueStore) -> Result<Vec<Signal>, StorageError> {
        Ok(load_list(store, keys::SIGNAL_HISTORY)
            .await?
            .unwrap_or_default())
    }

    pub async fn save(store: &dyn KeyValueStore, history: &[Signal]) -> Result<(), StorageError> {
        save_list(store, keys::SIGNAL_HISTORY, history).await
    }

    pub async fn clear(store: &dyn KeyValueStore) -> Result<(), StorageError> {
        Self::save(store, &[]).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MemoryStore;
    use crate::kv::MockKeyValueStore;
    use chrono::{TimeZone, Utc};
    use common::models::{Direction, PivotPoints, Rsi, Sma};

    fn signal(asset: &str) -> Signal {
        Signal {
            asset_name: asset.to_string(),
            update_time: Utc.with_ymd_and_hms(2025, 6, 2, 14, 0, 0).unwrap(),
            direction: Direction::Buy,
            confidence: 77,
            entry_price: "1.0842".to_string(),
            tp1: "1.0880".to_string(),
            tp2: "1.0915".to_string(),
            sl: "1.0805".to_string(),
            pivot_points: PivotPoints::default(),
            rsi: Rsi::default(),
            sma: Sma::default(),
            strategy_description: "Breakout above the range [1].".to_string(),
            risk_tip: "ECB speakers today.".to_string(),
            sources: vec![],
        }
    }

    #[tokio::test]
    async fn round_trips_history_in_order() {
        let store = MemoryStore::new();
        let history = vec![signal("EUR/USD"), signal("GBP/USD")];

        SignalHistoryRepository::save(&store, &history).await.unwrap();
        let loaded = SignalHistoryRepository::load(&store).await.unwrap();

        assert_eq!(loaded, history);
    }

    #[tokio::test]
    async fn clear_leaves_an_empty_list() {
        let store = MemoryStore::new();
        SignalHistoryRepository::save(&store, &[signal("EUR/USD")])
            .await
            .unwrap();

        SignalHistoryRepository::clear(&store).await.unwrap();

        assert_eq!(store.read(keys::SIGNAL_HISTORY).await.unwrap().as_deref(), Some("[]"));
        assert!(SignalHistoryRepository::load(&store).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn corrupt_value_is_a_json_error() {
        let mut store = MockKeyValueStore::new();
        store
            .expect_read()
            .times(1)
            .returning(|_| Ok(Some("{not a list".to_string())));

        let err = SignalHistoryRepository::load(&store).await.unwrap_err();
        assert!(matches!(err, StorageError::Json { ref key, .. } if key == keys::SIGNAL_HISTORY));
    }

    #[tokio::test]
    async fn write_failure_propagates() {
        let mut store = MockKeyValueStore::new();
        store
            .expect_write()
            .times(1)
            .returning(|_, _| Err(StorageError::Io(std::io::Error::other("disk full"))));

        let err = SignalHistoryRepository::save(&store, &[signal("EUR/USD")])
            .await
            .unwrap_err();
        assert!(matches!(err, StorageError::Io(_)));
    }
}
