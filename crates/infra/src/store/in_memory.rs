use std::collections::BTreeMap;
use std::sync::RwLock;

use async_trait::async_trait;

use sellerhub_catalog::{Product, ProductStore, RecordStore, Seller, StoreError};
use sellerhub_core::{Entity, SellerId};

pub type InMemorySellerStore = InMemoryRecordStore<Seller>;
pub type InMemoryProductStore = InMemoryRecordStore<Product>;

/// In-memory record store for tests/dev.
///
/// Keyed by the (time-ordered) entity id, so `find_all` returns records in
/// creation order.
#[derive(Debug)]
pub struct InMemoryRecordStore<E: Entity> {
    inner: RwLock<BTreeMap<E::Id, E>>,
}

impl<E: Entity> InMemoryRecordStore<E> {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(BTreeMap::new()),
        }
    }

    pub fn len(&self) -> Result<usize, StoreError> {
        Ok(self.inner.read().map_err(|_| poisoned("len"))?.len())
    }

    pub fn is_empty(&self) -> Result<bool, StoreError> {
        Ok(self.len()? == 0)
    }
}

impl<E: Entity> Default for InMemoryRecordStore<E> {
    fn default() -> Self {
        Self::new()
    }
}

fn poisoned(operation: &'static str) -> StoreError {
    StoreError::backend(operation, "in-memory store lock poisoned")
}

#[async_trait]
impl<E> RecordStore<E> for InMemoryRecordStore<E>
where
    E: Entity + Clone + Send + Sync + 'static,
{
    async fn create(&self, record: E) -> Result<E, StoreError> {
        let mut map = self.inner.write().map_err(|_| poisoned("create"))?;
        let id = *record.id();
        if map.contains_key(&id) {
            return Err(StoreError::Duplicate(id.to_string()));
        }
        map.insert(id, record.clone());
        Ok(record)
    }

    async fn find_by_id(&self, id: E::Id) -> Result<Option<E>, StoreError> {
        let map = self.inner.read().map_err(|_| poisoned("find_by_id"))?;
        Ok(map.get(&id).cloned())
    }

    async fn find_all(&self) -> Result<Vec<E>, StoreError> {
        let map = self.inner.read().map_err(|_| poisoned("find_all"))?;
        Ok(map.values().cloned().collect())
    }

    async fn save(&self, record: E) -> Result<E, StoreError> {
        let mut map = self.inner.write().map_err(|_| poisoned("save"))?;
        map.insert(*record.id(), record.clone());
        Ok(record)
    }

    async fn delete(&self, id: E::Id) -> Result<(), StoreError> {
        let mut map = self.inner.write().map_err(|_| poisoned("delete"))?;
        map.remove(&id);
        Ok(())
    }
}

#[async_trait]
impl ProductStore for InMemoryRecordStore<Product> {
    async fn find_by_seller(&self, seller_id: SellerId) -> Result<Vec<Product>, StoreError> {
        let map = self.inner.read().map_err(|_| poisoned("find_by_seller"))?;
        Ok(map
            .values()
            .filter(|p| p.seller_id() == seller_id)
            .cloned()
            .collect())
    }
}
