//! Shared access to the settings document
//!
//! A single `RwLock` guards the whole document. Resolvers hold the write guard
//! for their entire lookup-then-mutate sequence, and bulk clears take the same
//! lock, so a clear can never land between a lookup and its write-back.
//!
//! Mutations bump `revision`; `flush` saves a snapshot whenever it is ahead of
//! `saved_revision`. A failed save leaves the document dirty for the next flush.
//! Flushes run one at a time, so a slow save can never land after a newer one.

use crate::error::{StorageError, StorageResult};
use crate::keyed::BlockStore;
use crate::persistence::SettingsPersistence;
use crate::settings::QuoteSettings;
use std::sync::{Arc, RwLock, RwLockWriteGuard};
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;

struct SettingsState {
    settings: QuoteSettings,
    revision: u64,
    saved_revision: u64,
}

pub struct SettingsHandle {
    state: RwLock<SettingsState>,
    persistence: Arc<dyn SettingsPersistence>,
    flush_lock: Mutex<()>,
}

impl SettingsHandle {
    pub fn new(settings: QuoteSettings, persistence: Arc<dyn SettingsPersistence>) -> Self {
        Self {
            state: RwLock::new(SettingsState {
                settings,
                revision: 0,
                saved_revision: 0,
            }),
            persistence,
            flush_lock: Mutex::new(()),
        }
    }

    /// Load the stored document, or start from defaults when none exists.
    pub async fn load(persistence: Arc<dyn SettingsPersistence>) -> StorageResult<Self> {
        let settings = match persistence.load().await? {
            Some(settings) => settings,
            None => {
                tracing::info!("no stored settings, starting from defaults");
                QuoteSettings::default()
            }
        };
        Ok(Self::new(settings, persistence))
    }

    /// Exclusive access for one resolution or edit.
    pub fn lock(&self) -> StorageResult<SettingsGuard<'_>> {
        let state = self
            .state
            .write()
            .map_err(|_| StorageError::Backend("settings lock poisoned".to_string()))?;
        Ok(SettingsGuard { state })
    }

    /// Run `f` against a read view of the document.
    pub fn read<T>(&self, f: impl FnOnce(&QuoteSettings) -> T) -> StorageResult<T> {
        let state = self
            .state
            .read()
            .map_err(|_| StorageError::Backend("settings lock poisoned".to_string()))?;
        Ok(f(&state.settings))
    }

    /// Cloned snapshot of the document.
    pub fn snapshot(&self) -> StorageResult<QuoteSettings> {
        self.read(|settings| settings.clone())
    }

    pub fn is_dirty(&self) -> StorageResult<bool> {
        let state = self
            .state
            .read()
            .map_err(|_| StorageError::Backend("settings lock poisoned".to_string()))?;
        Ok(state.revision > state.saved_revision)
    }

    /// Remove every recurring block state.
    pub fn clear_recurring(&self) -> StorageResult<usize> {
        let mut guard = self.lock()?;
        let removed = guard.settings_mut().block_metadata.clear();
        guard.mark_dirty();
        tracing::info!(removed, "block metadata cleared");
        Ok(removed)
    }

    /// Remove every one-time block state.
    pub fn clear_one_time(&self) -> StorageResult<usize> {
        let mut guard = self.lock()?;
        let removed = guard.settings_mut().one_time_blocks.clear();
        guard.mark_dirty();
        tracing::info!(removed, "one-time blocks cleared");
        Ok(removed)
    }

    /// Save the document if it changed since the last successful save.
    ///
    /// Returns `Ok(true)` when a save happened.
    pub async fn flush(&self) -> StorageResult<bool> {
        let _flushing = self.flush_lock.lock().await;

        let (snapshot, revision) = {
            let state = self
                .state
                .read()
                .map_err(|_| StorageError::Backend("settings lock poisoned".to_string()))?;
            if state.revision <= state.saved_revision {
                return Ok(false);
            }
            (state.settings.clone(), state.revision)
        };

        self.persistence.save(&snapshot).await?;

        let mut state = self
            .state
            .write()
            .map_err(|_| StorageError::Backend("settings lock poisoned".to_string()))?;
        state.saved_revision = revision;
        tracing::debug!(revision, "settings flushed");
        Ok(true)
    }
}

/// Write access to the settings document.
pub struct SettingsGuard<'a> {
    state: RwLockWriteGuard<'a, SettingsState>,
}

impl SettingsGuard<'_> {
    pub fn settings(&self) -> &QuoteSettings {
        &self.state.settings
    }

    /// Mutable access; call [`mark_dirty`](Self::mark_dirty) after changing anything durable.
    pub fn settings_mut(&mut self) -> &mut QuoteSettings {
        &mut self.state.settings
    }

    pub fn mark_dirty(&mut self) {
        self.state.revision += 1;
    }
}

/// Flush `handle` every `every` until the task is aborted.
pub fn spawn_flush_task(handle: Arc<SettingsHandle>, every: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(every);
        loop {
            ticker.tick().await;
            if let Err(err) = handle.flush().await {
                tracing::warn!(error = %err, "settings flush failed, will retry");
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::InMemoryPersistence;
    use quotes_types::{BlockId, QuoteContent, RecurringBlockState};

    fn handle_with(persistence: Arc<InMemoryPersistence>) -> SettingsHandle {
        SettingsHandle::new(QuoteSettings::default(), persistence)
    }

    fn insert_block(handle: &SettingsHandle, id: &str) {
        let mut guard = handle.lock().unwrap();
        guard.settings_mut().block_metadata.upsert(RecurringBlockState {
            id: BlockId::new(id),
            search: "*".to_string(),
            content: QuoteContent::new("Seneca", "Begin at once to live."),
            custom_class: None,
            refresh: None,
            last_update: 0,
        });
        guard.mark_dirty();
    }

    #[tokio::test]
    async fn test_flush_is_noop_when_clean() {
        let persistence = Arc::new(InMemoryPersistence::new());
        let handle = handle_with(persistence.clone());
        assert!(!handle.flush().await.unwrap());
        assert_eq!(persistence.save_count(), 0);
    }

    #[tokio::test]
    async fn test_flush_saves_once_per_change() {
        let persistence = Arc::new(InMemoryPersistence::new());
        let handle = handle_with(persistence.clone());

        insert_block(&handle, "a");
        assert!(handle.is_dirty().unwrap());
        assert!(handle.flush().await.unwrap());
        assert!(!handle.is_dirty().unwrap());
        assert!(!handle.flush().await.unwrap());
        assert_eq!(persistence.save_count(), 1);
        assert_eq!(persistence.stored().unwrap().block_metadata.len(), 1);
    }

    #[tokio::test]
    async fn test_failed_save_keeps_serving_and_stays_dirty() {
        let persistence = Arc::new(InMemoryPersistence::new());
        let handle = handle_with(persistence.clone());

        insert_block(&handle, "a");
        persistence.set_fail_saves(true);
        assert!(handle.flush().await.is_err());
        assert!(handle.is_dirty().unwrap());
        assert_eq!(handle.read(|s| s.block_metadata.len()).unwrap(), 1);

        persistence.set_fail_saves(false);
        assert!(handle.flush().await.unwrap());
        assert!(!handle.is_dirty().unwrap());
    }

    #[tokio::test]
    async fn test_clear_marks_dirty() {
        let persistence = Arc::new(InMemoryPersistence::new());
        let handle = handle_with(persistence.clone());
        insert_block(&handle, "a");
        insert_block(&handle, "b");
        handle.flush().await.unwrap();

        assert_eq!(handle.clear_recurring().unwrap(), 2);
        assert_eq!(handle.clear_one_time().unwrap(), 0);
        assert!(handle.is_dirty().unwrap());
    }

    #[tokio::test]
    async fn test_load_falls_back_to_defaults() {
        let persistence = Arc::new(InMemoryPersistence::new());
        let handle = SettingsHandle::load(persistence).await.unwrap();
        assert_eq!(handle.read(|s| s.default_reload_interval).unwrap(), 86_400);
        assert!(!handle.is_dirty().unwrap());
    }

    /// Holds the first save until released.
    struct GatedPersistence {
        inner: InMemoryPersistence,
        gate_first: std::sync::atomic::AtomicBool,
        entered: tokio::sync::Notify,
        release: tokio::sync::Semaphore,
    }

    impl GatedPersistence {
        fn new() -> Self {
            Self {
                inner: InMemoryPersistence::new(),
                gate_first: std::sync::atomic::AtomicBool::new(true),
                entered: tokio::sync::Notify::new(),
                release: tokio::sync::Semaphore::new(0),
            }
        }
    }

    #[async_trait::async_trait]
    impl SettingsPersistence for GatedPersistence {
        async fn load(&self) -> StorageResult<Option<QuoteSettings>> {
            self.inner.load().await
        }

        async fn save(&self, settings: &QuoteSettings) -> StorageResult<()> {
            if self.gate_first.swap(false, std::sync::atomic::Ordering::SeqCst) {
                self.entered.notify_one();
                self.release.acquire().await.unwrap().forget();
            }
            self.inner.save(settings).await
        }
    }

    #[tokio::test]
    async fn test_overlapping_flushes_save_in_order() {
        let persistence = Arc::new(GatedPersistence::new());
        let handle = Arc::new(SettingsHandle::new(QuoteSettings::default(), persistence.clone()));

        insert_block(&handle, "a");
        let first = tokio::spawn({
            let handle = handle.clone();
            async move { handle.flush().await }
        });
        persistence.entered.notified().await;

        insert_block(&handle, "b");
        let second = tokio::spawn({
            let handle = handle.clone();
            async move { handle.flush().await }
        });
        tokio::task::yield_now().await;

        persistence.release.add_permits(1);
        assert!(first.await.unwrap().unwrap());
        assert!(second.await.unwrap().unwrap());

        assert!(!handle.is_dirty().unwrap());
        assert_eq!(persistence.inner.stored().unwrap().block_metadata.len(), 2);
        assert_eq!(persistence.inner.save_count(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_flush_task_retries_until_saved() {
        let persistence = Arc::new(InMemoryPersistence::new());
        let handle = Arc::new(handle_with(persistence.clone()));
        insert_block(&handle, "a");
        persistence.set_fail_saves(true);

        let task = spawn_flush_task(handle.clone(), Duration::from_secs(5));
        tokio::time::sleep(Duration::from_secs(6)).await;
        assert_eq!(persistence.save_count(), 0);

        persistence.set_fail_saves(false);
        tokio::time::sleep(Duration::from_secs(5)).await;
        assert_eq!(persistence.save_count(), 1);
        assert!(!handle.is_dirty().unwrap());
        task.abort();
    }
}
