pub mod featured_sites_repo;
pub mod signal_history_repo;
pub mod watchlist_repo;

pub use featured_sites_repo::FeaturedSitesRepository;
pub use signal_history_repo::SignalHistoryRepository;
pub use watchlist_repo::WatchlistRepository;

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::{KeyValueStore, StorageError};

pub mod keys {
    pub const SIGNAL_HISTORY: &str = "signalHistory";
    pub const WATCHLIST: &str = "watchlist";
    pub const FEATURED_SITES: &str = "featuredSites";
}

async fn load_list<T: DeserializeOwned>(
    store: &dyn KeyValueStore,
    key: &str,
) -> Result<Option<Vec<T>>, StorageError> {
    let Some(raw) = store.read(key).await? else {
        return Ok(None);
    };
    serde_json::from_str(&raw)
        .map(Some)
        .map_err(|source| StorageError::Json {
            key: key.to_string(),
            source,
        })
}

async fn save_list<T: Serialize>(
    store: &dyn KeyValueStore,
    key: &str,
    items: &[T],
) -> Result<(), StorageError> {
    let raw = serde_json::to_string(items).map_err(|source| StorageError::Json {
        key: key.to_string(),
        source,
    })?;
    store.write(key, &raw).await
}
