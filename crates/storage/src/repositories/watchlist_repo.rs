use super::{keys, load_list, save_list};
use crate::{KeyValueStore, StorageError};

pub struct WatchlistRepository;

impl WatchlistRepository {
    /// `None` when no watchlist was ever saved, as opposed to a saved empty one.
    pub async fn load(store: &dyn KeyValueStore) -> Result<Option<Vec<String>>, StorageError> {
        load_list(store, keys::WATCHLIST).await
    }

    pub async fn save(store: &dyn KeyValueStore, watchlist: &[String]) -> Result<(), StorageError> {
        save_list(store, keys::WATCHLIST, watchlist).await
    }
}
