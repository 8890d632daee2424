use common::models::DataSource;

use super::{keys, load_list, save_list};
use crate::{KeyValueStore, StorageError};

pub struct FeaturedSitesRepository;

impl FeaturedSitesRepository {
    pub async fn load(store: &dyn KeyValueStore) -> Result<Vec<DataSource>, StorageError> {
        Ok(load_list(store, keys::FEATURED_SITES)
            .await?
            .unwrap_or_default())
    }

    pub async fn save(store: &dyn KeyValueStore, sites: &[DataSource]) -> Result<(), StorageError> {
        save_list(store, keys::FEATURED_SITES, sites).await
    }
}
