use std::{
    collections::HashMap,
    io::ErrorKind,
    path::{Path, PathBuf},
    sync::Mutex,
};

use async_trait::async_trait;
use tracing::{debug, instrument};

use crate::error::StoreError;

pub const WATER_INTAKE_KEY: &str = "@water_intake";
pub const DAILY_TARGET_KEY: &str = "@daily_target";
pub const CUP_SIZES_KEY: &str = "@cup_sizes";
pub const SELECTED_WATER_CUP_KEY: &str = "@selected_water_cup";
pub const WEIGHT_KEY: &str = "@user_weight";
pub const CLIMATE_KEY: &str = "@user_climate";
pub const GENDER_KEY: &str = "@user_gender";
pub const THEME_KEY: &str = "theme";

/// Durable string-keyed storage. Every key is read and written on its own,
/// there is no grouping of writes.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// `Ok(None)` when nothing was ever stored under `key`.
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    async fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;
}

/// Keeps one file per key inside a data directory.
#[derive(Debug, Clone)]
pub struct FileStore {
    data_dir: PathBuf,
}

impl FileStore {
    /// Creates the data directory when it's missing.
    pub async fn open(data_dir: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let data_dir = data_dir.into();
        if !tokio::fs::try_exists(&data_dir).await? {
            tokio::fs::create_dir_all(&data_dir).await?;
        }
        debug!("Data path: {:?}", data_dir);

        Ok(Self { data_dir })
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// `@water_intake` lives in `water_intake.txt`
    fn path_for(&self, key: &str) -> Result<PathBuf, StoreError> {
        let name = key.trim_start_matches('@');
        let valid = !name.is_empty()
            && name
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !valid {
            return Err(StoreError::InvalidKey(key.to_string()));
        }

        Ok(self.data_dir.join(format!("{name}.txt")))
    }
}

#[async_trait]
impl KeyValueStore for FileStore {
    #[instrument(skip(self))]
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let path = self.path_for(key)?;
        match tokio::fs::read_to_string(&path).await {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    #[instrument(skip(self, value))]
    async fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let path = self.path_for(key)?;

        // Write next to the target and rename so a crash never leaves half a value
        let staging = path.with_extension("txt.tmp");
        tokio::fs::write(&staging, value).await?;
        tokio::fs::rename(&staging, &path).await?;

        Ok(())
    }
}

/// Store that lives only as long as the process.
#[derive(Debug, Default)]
pub struct MemoryStore(Mutex<HashMap<String, String>>);

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn entries(&self) -> std::sync::MutexGuard<'_, HashMap<String, String>> {
        // A poisoned map is still a valid map
        self.0.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.entries().get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.entries().insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[async_trait]
impl<S: KeyValueStore + ?Sized> KeyValueStore for std::sync::Arc<S> {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        (**self).get(key).await
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        (**self).set(key, value).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn file_store_round_trips_values() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::open(dir.path().join("nested")).await.unwrap();

        assert_eq!(store.get(WATER_INTAKE_KEY).await.unwrap(), None);

        store.set(WATER_INTAKE_KEY, "[]").await.unwrap();
        store.set(WATER_INTAKE_KEY, "[1]").await.unwrap();
        store.set(THEME_KEY, "dark").await.unwrap();

        assert_eq!(
            store.get(WATER_INTAKE_KEY).await.unwrap().as_deref(),
            Some("[1]")
        );
        assert_eq!(store.get(THEME_KEY).await.unwrap().as_deref(), Some("dark"));
        assert_eq!(store.data_dir(), dir.path().join("nested").as_path());
        assert!(store.data_dir().join("water_intake.txt").exists());
    }

    #[tokio::test]
    async fn file_store_rejects_path_like_keys() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::open(dir.path()).await.unwrap();

        for key in ["../escape", "@", "a/b", ""] {
            assert!(matches!(
                store.set(key, "x").await,
                Err(StoreError::InvalidKey(_))
            ));
        }
    }

    #[tokio::test]
    async fn memory_store_is_shared_through_arc() {
        let store = std::sync::Arc::new(MemoryStore::new());
        let handle = store.clone();

        handle.set(GENDER_KEY, "female").await.unwrap();
        assert_eq!(store.get(GENDER_KEY).await.unwrap().as_deref(), Some("female"));
    }
}
