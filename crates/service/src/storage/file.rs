use std::{
    collections::HashMap,
    path::{Path, PathBuf},
    sync::Arc,
};

use async_trait::async_trait;
use common::metrics::STORAGE_SAVES_TOTAL;
use tokio::{fs, sync::RwLock};
use tracing::debug;

use super::{Kind, Record, Storage};
use crate::errors::ServiceError;

/// JSON file-backed engine.
///
/// Keeps every record in memory keyed by `<Class>.<id>` and writes the whole map
/// to `file_path` on [`Storage::save`]. A missing file is an empty store.
pub struct FileStorage {
    objects: RwLock<HashMap<String, Record>>,
    file_path: PathBuf,
}

impl FileStorage {
    /// Load the store from `path`. The file is created on first save.
    pub async fn open<P: Into<PathBuf>>(path: P) -> Result<Arc<Self>, ServiceError> {
        let file_path = path.into();
        if let Some(parent) = file_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).await.map_err(ServiceError::storage)?;
        }
        let objects = Self::load(&file_path).await?;
        debug!(path = %file_path.display(), count = objects.len(), "file storage loaded");
        Ok(Arc::new(Self { objects: RwLock::new(objects), file_path }))
    }

    async fn load(file_path: &Path) -> Result<HashMap<String, Record>, ServiceError> {
        match fs::read(file_path).await {
            Ok(bytes) if bytes.iter().all(u8::is_ascii_whitespace) => Ok(HashMap::new()),
            Ok(bytes) => serde_json::from_slice(&bytes).map_err(|e| {
                ServiceError::Storage(format!("{}: {e}", file_path.display()))
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(HashMap::new()),
            Err(e) => Err(ServiceError::storage(e)),
        }
    }
}

#[async_trait]
impl Storage for FileStorage {
    async fn all(&self, kind: Option<Kind>) -> Result<Vec<Record>, ServiceError> {
        let map = self.objects.read().await;
        Ok(map
            .values()
            .filter(|r| kind.map_or(true, |k| r.kind() == k))
            .cloned()
            .collect())
    }

    async fn get(&self, kind: Kind, id: &str) -> Result<Option<Record>, ServiceError> {
        let map = self.objects.read().await;
        Ok(map.get(&kind.key(id)).cloned())
    }

    async fn new(&self, record: Record) -> Result<(), ServiceError> {
        let mut map = self.objects.write().await;
        map.insert(record.key(), record);
        Ok(())
    }

    async fn save(&self) -> Result<(), ServiceError> {
        let data = {
            let map = self.objects.read().await;
            serde_json::to_vec(&*map).map_err(ServiceError::storage)?
        };
        fs::write(&self.file_path, data).await.map_err(ServiceError::storage)?;
        STORAGE_SAVES_TOTAL.inc();
        debug!(path = %self.file_path.display(), "file storage saved");
        Ok(())
    }

    async fn delete(&self, kind: Kind, id: &str) -> Result<(), ServiceError> {
        let mut map = self.objects.write().await;
        map.remove(&kind.key(id));
        Ok(())
    }

    /// Re-read the file, discarding anything staged since the last save.
    async fn close(&self) -> Result<(), ServiceError> {
        let reloaded = Self::load(&self.file_path).await?;
        *self.objects.write().await = reloaded;
        Ok(())
    }
}
