use crate::domain::ports::SessionStore;
use crate::error::{KycError, Result};
use async_trait::async_trait;
use rocksdb::{ColumnFamilyDescriptor, DB, Options};
use std::path::Path;
use std::sync::Arc;

/// Column Family holding session entries.
pub const CF_SESSION: &str = "session";

/// A persistent session store backed by RocksDB.
///
/// `Clone` shares the underlying `Arc<DB>`.
#[derive(Clone)]
pub struct RocksDbSessionStore {
    db: Arc<DB>,
}

impl RocksDbSessionStore {
    /// Opens or creates a RocksDB instance at `path` with the session column family.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut opts = Options::default();
        opts.create_if_missing(true);
        opts.create_missing_column_families(true);

        let cf_session = ColumnFamilyDescriptor::new(CF_SESSION, Options::default());
        let db = DB::open_cf_descriptors(&opts, path, vec![cf_session])
            .map_err(|e| KycError::Storage(e.to_string()))?;

        Ok(Self { db: Arc::new(db) })
    }

    fn with_cf<T>(&self, f: impl FnOnce(&rocksdb::ColumnFamily) -> Result<T>) -> Result<T> {
        let cf = self
            .db
            .cf_handle(CF_SESSION)
            .ok_or_else(|| KycError::Storage("Session column family not found".to_string()))?;
        f(cf)
    }
}

#[async_trait]
impl SessionStore for RocksDbSessionStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        self.with_cf(|cf| {
            let bytes = self
                .db
                .get_cf(cf, key.as_bytes())
                .map_err(|e| KycError::Storage(e.to_string()))?;
            bytes
                .map(|b| String::from_utf8(b).map_err(|e| KycError::Storage(e.to_string())))
                .transpose()
        })
    }

    async fn set(&self, key: &str, value: String) -> Result<()> {
        self.with_cf(|cf| {
            self.db
                .put_cf(cf, key.as_bytes(), value.as_bytes())
                .map_err(|e| KycError::Storage(e.to_string()))
        })
    }

    async fn remove(&self, key: &str) -> Result<()> {
        self.with_cf(|cf| {
            self.db
                .delete_cf(cf, key.as_bytes())
                .map_err(|e| KycError::Storage(e.to_string()))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_rocksdb_open_cf() {
        let dir = tempdir().unwrap();
        let store = RocksDbSessionStore::open(dir.path()).expect("Failed to open RocksDB");
        assert!(store.db.cf_handle(CF_SESSION).is_some());
    }

    #[tokio::test]
    async fn test_rocksdb_session_store() {
        let dir = tempdir().unwrap();
        let store = RocksDbSessionStore::open(dir.path()).unwrap();

        store.set("kycFormData", "{}".into()).await.unwrap();
        assert_eq!(store.get("kycFormData").await.unwrap().as_deref(), Some("{}"));

        store.remove("kycFormData").await.unwrap();
        assert!(store.get("kycFormData").await.unwrap().is_none());
    }
}
