//! Engine facade over the shared settings document.

use crate::clock::{Clock, SystemClock};
use crate::error::{EngineError, EngineResult};
use crate::one_time::OneTimeResolver;
use crate::recurring::RecurringResolver;
use crate::resolution::ResolveOutcome;
use crate::vault::Vault;
use quotes_select::Strategy;
use quotes_store::{QuoteSettings, SettingsHandle, StorageResult};
use quotes_types::{
    BlockId, OneTimeBlockState, OneTimeDescriptor, Quote, RecurringBlockState, RecurringDescriptor,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex, MutexGuard};

/// Which strategy recurring blocks draw with.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecurringWeighting {
    /// Always uniform, whatever `useWeightedRandom` says. Matches existing vaults.
    #[default]
    Never,
    /// Honor `useWeightedRandom` like one-time blocks do.
    FollowSettings,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EngineOptions {
    pub recurring_weighting: RecurringWeighting,
}

/// Resolves blocks against one settings document.
///
/// Every resolution holds the settings write lock for its whole
/// lookup-then-mutate sequence; the random source is locked second.
pub struct QuoteEngine<C: Clock = SystemClock> {
    settings: Arc<SettingsHandle>,
    clock: C,
    rng: Mutex<StdRng>,
    options: EngineOptions,
}

impl QuoteEngine<SystemClock> {
    pub fn new(settings: Arc<SettingsHandle>) -> Self {
        Self::with_clock(settings, SystemClock)
    }
}

impl<C: Clock> QuoteEngine<C> {
    pub fn with_clock(settings: Arc<SettingsHandle>, clock: C) -> Self {
        Self {
            settings,
            clock,
            rng: Mutex::new(StdRng::from_entropy()),
            options: EngineOptions::default(),
        }
    }

    /// Replace the random source, e.g. with a seeded one.
    pub fn with_rng(mut self, rng: StdRng) -> Self {
        self.rng = Mutex::new(rng);
        self
    }

    pub fn with_options(mut self, options: EngineOptions) -> Self {
        self.options = options;
        self
    }

    pub fn settings(&self) -> &Arc<SettingsHandle> {
        &self.settings
    }

    pub fn options(&self) -> EngineOptions {
        self.options
    }

    fn rng(&self) -> EngineResult<MutexGuard<'_, StdRng>> {
        self.rng.lock().map_err(|_| EngineError::RngPoisoned)
    }

    fn recurring_strategy(&self, settings: &QuoteSettings) -> Strategy {
        match self.options.recurring_weighting {
            RecurringWeighting::Never => Strategy::Uniform,
            RecurringWeighting::FollowSettings => Strategy::from_weighted(settings.use_weighted_random),
        }
    }

    /// Resolve a recurring block, creating or refreshing its stored state.
    pub fn resolve_recurring(
        &self,
        descriptor: &RecurringDescriptor,
    ) -> EngineResult<ResolveOutcome<RecurringBlockState>> {
        let mut guard = self.settings.lock()?;
        let mut rng = self.rng()?;
        let now = self.clock.now_secs();
        let strategy = self.recurring_strategy(guard.settings());

        let QuoteSettings {
            default_reload_interval,
            minimal_quote_length,
            quote_vault,
            block_metadata,
            ..
        } = guard.settings_mut();

        let outcome = RecurringResolver {
            store: block_metadata,
            vault: Vault::new(quote_vault, *minimal_quote_length),
            default_ttl: *default_reload_interval,
            strategy,
            now,
            rng: &mut *rng,
        }
        .resolve(descriptor);

        if outcome.mutated {
            guard.mark_dirty();
        }
        Ok(outcome)
    }

    /// Resolve a one-time block hosted by the document at `context_path`.
    pub fn resolve_one_time(
        &self,
        descriptor: &OneTimeDescriptor,
        context_path: &str,
    ) -> EngineResult<ResolveOutcome<OneTimeBlockState>> {
        let mut guard = self.settings.lock()?;
        let mut rng = self.rng()?;

        let settings = guard.settings_mut();
        let strategy = Strategy::from_weighted(settings.use_weighted_random);
        let template_folder = settings.template_folder().map(str::to_owned);

        let QuoteSettings {
            minimal_quote_length,
            quote_vault,
            one_time_blocks,
            ..
        } = settings;

        let outcome = OneTimeResolver {
            store: one_time_blocks,
            vault: Vault::new(quote_vault, *minimal_quote_length),
            template_folder: template_folder.as_deref(),
            strategy,
            rng: &mut *rng,
        }
        .resolve(descriptor, context_path);

        if outcome.mutated {
            guard.mark_dirty();
        }
        Ok(outcome)
    }

    /// Drop every recurring block state; returns how many were removed.
    pub fn clear_recurring(&self) -> EngineResult<usize> {
        Ok(self.settings.clear_recurring()?)
    }

    /// Drop every one-time block state; returns how many were removed.
    pub fn clear_one_time(&self) -> EngineResult<usize> {
        Ok(self.settings.clear_one_time()?)
    }

    /// Append a quote to the vault. Existing block states keep their content.
    pub fn add_quote(&self, quote: Quote) -> EngineResult<usize> {
        let mut guard = self.settings.lock()?;
        let vault = &mut guard.settings_mut().quote_vault;
        vault.push(quote);
        let len = vault.len();
        guard.mark_dirty();
        tracing::info!(vault_size = len, "quote added");
        Ok(len)
    }

    /// Fresh id for a new recurring block, sized by `autoGeneratedIdLength`.
    pub fn generate_block_id(&self) -> EngineResult<BlockId> {
        let len = self.settings.read(|s| s.auto_generated_id_length)?;
        let mut rng = self.rng()?;
        Ok(BlockId::generate(len, &mut *rng))
    }

    /// Persist pending changes; see [`SettingsHandle::flush`].
    pub async fn flush(&self) -> StorageResult<bool> {
        self.settings.flush().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::resolution::PlaceholderReason;
    use quotes_store::{BlockStore, InMemoryPersistence};

    const T0: i64 = 1_700_000_000;

    fn engine_with(settings: QuoteSettings) -> (QuoteEngine<Arc<ManualClock>>, Arc<ManualClock>, Arc<InMemoryPersistence>) {
        let persistence = Arc::new(InMemoryPersistence::new());
        let handle = Arc::new(SettingsHandle::new(settings, persistence.clone()));
        let clock = Arc::new(ManualClock::new(T0));
        let engine = QuoteEngine::with_clock(handle, clock.clone()).with_rng(StdRng::seed_from_u64(42));
        (engine, clock, persistence)
    }

    fn stocked() -> QuoteSettings {
        let mut settings = QuoteSettings::default();
        settings.default_reload_interval = 60;
        settings.template_folder = "Templates/".to_string();
        settings.quote_vault = vec![
            Quote::new("Seneca", "Begin at once to live.").with_tag("stoic"),
            Quote::new("Marcus Aurelius", "The best revenge is not to be like your enemy.").with_tag("stoic"),
            Quote::new("Basho", "The journey itself is my home.").with_tag("travel"),
        ];
        settings
    }

    #[tokio::test]
    async fn test_resolution_marks_dirty_only_on_change() {
        let (engine, clock, persistence) = engine_with(stocked());
        let descriptor = RecurringDescriptor::new("q1", "#stoic");

        assert!(engine.resolve_recurring(&descriptor).unwrap().mutated);
        assert!(engine.flush().await.unwrap());

        clock.advance(30);
        assert!(!engine.resolve_recurring(&descriptor).unwrap().mutated);
        assert!(!engine.flush().await.unwrap());
        assert_eq!(persistence.save_count(), 1);

        clock.advance(31);
        assert!(engine.resolve_recurring(&descriptor).unwrap().mutated);
        assert!(engine.flush().await.unwrap());
        let stored = persistence.stored().unwrap();
        assert_eq!(stored.block_metadata.all()[0].last_update, T0 + 61);
    }

    #[test]
    fn test_placeholders_leave_document_clean() {
        let (engine, _clock, _) = engine_with(stocked());
        let outcome = engine
            .resolve_one_time(&OneTimeDescriptor::new("#stoic"), "Templates/daily.md")
            .unwrap();
        assert_eq!(
            outcome.resolution.placeholder_reason(),
            Some(PlaceholderReason::InsideTemplateFolder)
        );
        assert!(!engine.settings().is_dirty().unwrap());
    }

    #[test]
    fn test_recurring_weighting_option() {
        let mut settings = stocked();
        settings.use_weighted_random = true;
        let (engine, _, _) = engine_with(settings.clone());
        assert_eq!(engine.recurring_strategy(&settings), Strategy::Uniform);

        let engine = engine.with_options(EngineOptions {
            recurring_weighting: RecurringWeighting::FollowSettings,
        });
        assert_eq!(engine.recurring_strategy(&settings), Strategy::AuthorWeighted);
    }

    #[test]
    fn test_generated_id_length_follows_settings() {
        let mut settings = stocked();
        settings.auto_generated_id_length = 8;
        let (engine, _, _) = engine_with(settings);
        let id = engine.generate_block_id().unwrap();
        assert_eq!(id.as_str().len(), 8);
        assert!(id.as_str().chars().all(|c| c.is_ascii_alphanumeric()));
    }

    #[test]
    fn test_clear_and_add_quote() {
        let (engine, _, _) = engine_with(stocked());
        engine.resolve_recurring(&RecurringDescriptor::new("q1", "*")).unwrap();
        engine.resolve_one_time(&OneTimeDescriptor::new("*"), "Daily/a.md").unwrap();

        assert_eq!(engine.clear_recurring().unwrap(), 1);
        assert_eq!(engine.clear_one_time().unwrap(), 1);
        assert_eq!(engine.add_quote(Quote::new("Lao Tzu", "Nature does not hurry.")).unwrap(), 4);
    }
}
