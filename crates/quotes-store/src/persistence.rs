//! Persistence adapters for the settings document.

use crate::error::{StorageError, StorageResult};
use crate::settings::QuoteSettings;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::RwLock;

/// Loads and saves the settings document.
#[async_trait]
pub trait SettingsPersistence: Send + Sync {
    /// Read the stored document, `None` when nothing was saved yet.
    async fn load(&self) -> StorageResult<Option<QuoteSettings>>;

    async fn save(&self, settings: &QuoteSettings) -> StorageResult<()>;
}

/// Pretty-printed JSON file, replaced atomically on save.
#[derive(Debug, Clone)]
pub struct JsonFilePersistence {
    path: PathBuf,
}

impl JsonFilePersistence {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "settings.json".into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

#[async_trait]
impl SettingsPersistence for JsonFilePersistence {
    async fn load(&self) -> StorageResult<Option<QuoteSettings>> {
        let raw = match tokio::fs::read_to_string(&self.path).await {
            Ok(raw) => raw,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(err.into()),
        };
        let settings = serde_json::from_str(&raw)?;
        Ok(Some(settings))
    }

    async fn save(&self, settings: &QuoteSettings) -> StorageResult<()> {
        let serialized = serde_json::to_vec_pretty(settings)?;

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }

        let temp = self.temp_path();
        tokio::fs::write(&temp, serialized).await?;
        tokio::fs::rename(&temp, &self.path).await?;
        tracing::debug!(path = %self.path.display(), "settings written");
        Ok(())
    }
}

/// In-memory persistence for tests, with save-failure injection.
#[derive(Debug, Default)]
pub struct InMemoryPersistence {
    stored: RwLock<Option<QuoteSettings>>,
    fail_saves: AtomicBool,
    save_count: AtomicUsize,
}

impl InMemoryPersistence {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every following `save` fail until switched back.
    pub fn set_fail_saves(&self, fail: bool) {
        self.fail_saves.store(fail, Ordering::SeqCst);
    }

    /// Number of successful saves.
    pub fn save_count(&self) -> usize {
        self.save_count.load(Ordering::SeqCst)
    }

    /// Last successfully saved document.
    pub fn stored(&self) -> Option<QuoteSettings> {
        self.stored.read().ok().and_then(|guard| guard.clone())
    }
}

#[async_trait]
impl SettingsPersistence for InMemoryPersistence {
    async fn load(&self) -> StorageResult<Option<QuoteSettings>> {
        let guard = self
            .stored
            .read()
            .map_err(|_| StorageError::Backend("persistence lock poisoned".to_string()))?;
        Ok(guard.clone())
    }

    async fn save(&self, settings: &QuoteSettings) -> StorageResult<()> {
        if self.fail_saves.load(Ordering::SeqCst) {
            return Err(StorageError::Unavailable("save rejected".to_string()));
        }
        let mut guard = self
            .stored
            .write()
            .map_err(|_| StorageError::Backend("persistence lock poisoned".to_string()))?;
        *guard = Some(settings.clone());
        self.save_count.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
