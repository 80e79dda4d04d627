use super::ads::AdCreative;
use super::assembler::{AssemblySettings, FeedAssembler};
use super::pagination::{CursorState, PaginationCursorStore, RegisteredSource};
use super::ranking::RankingWeights;
use crate::config::FeedConfig;
use crate::models::{FeedItem, SourceBatch, SourceId};
use crate::sources::ContentSourceClient;
use futures::future::join_all;
use parking_lot::RwLock;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(10);

/// Feed orchestrator
///
/// Each load fans out one fetch per registered source, gathers them, and
/// assembles the round. The engine returns only the round's items; keeping
/// the concatenation of rounds (and deduplicating by key across rounds) is
/// the caller's job.
///
/// Top Picks lead every initial load, so a refresh through
/// [`FeedEngine::load_initial_page`] shows the block again. Next pages never
/// carry it.
///
/// Fetches run on their own tasks, so a caller that drops a load future does
/// not cancel them: they complete and advance their cursors as usual.
/// Concurrent loads are not queued. A second load issued while a source is
/// still in flight gets nothing from that source.
pub struct FeedEngine {
    cursors: Arc<PaginationCursorStore>,
    settings: RwLock<AssemblySettings>,
}

impl FeedEngine {
    pub fn builder() -> FeedEngineBuilder {
        FeedEngineBuilder::new()
    }

    /// Reset pagination and load the first page of every source
    pub async fn load_initial_page(&self) -> Vec<FeedItem> {
        self.reset_pagination();
        let batches = self.fetch_round().await;
        self.assemble(batches, true)
    }

    /// Load the page after each source's stored cursor
    pub async fn load_next_page(&self) -> Vec<FeedItem> {
        let batches = self.fetch_round().await;
        self.assemble(batches, false)
    }

    pub fn reset_pagination(&self) {
        self.cursors.reset();
    }

    pub fn cursor_state(&self, source: &SourceId) -> Option<CursorState> {
        self.cursors.snapshot(source)
    }

    pub fn settings(&self) -> AssemblySettings {
        self.settings.read().clone()
    }

    pub fn set_ads_enabled(&self, enabled: bool) {
        self.settings.write().enable_ads = enabled;
    }

    /// Zero is stored as-is and behaves as an interval of one
    pub fn set_ad_interval(&self, interval: usize) {
        self.settings.write().ad_interval = interval;
    }

    pub fn set_derive_reels(&self, enabled: bool) {
        self.settings.write().derive_reels = enabled;
    }

    pub fn set_ranking_weights(&self, weights: RankingWeights) {
        self.settings.write().weights = weights;
    }

    async fn fetch_round(&self) -> Vec<SourceBatch> {
        let ids: Vec<SourceId> = self.cursors.source_ids().cloned().collect();

        let handles = ids.iter().cloned().map(|id| {
            let store = Arc::clone(&self.cursors);
            tokio::spawn(async move {
                let items = store.fetch_next(&id).await;
                SourceBatch::new(id, items)
            })
        });

        join_all(handles)
            .await
            .into_iter()
            .zip(ids)
            .map(|(joined, id)| match joined {
                Ok(batch) => batch,
                Err(e) => {
                    warn!(source = %id, error = %e, "Source fetch task failed");
                    SourceBatch::new(id, Vec::new())
                }
            })
            .collect()
    }

    fn assemble(&self, batches: Vec<SourceBatch>, is_initial_load: bool) -> Vec<FeedItem> {
        let settings = self.settings();
        FeedAssembler::new(&settings).assemble(batches, is_initial_load)
    }
}

pub struct FeedEngineBuilder {
    sources: Vec<RegisteredSource>,
    settings: AssemblySettings,
    fetch_timeout: Duration,
}

impl Default for FeedEngineBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl FeedEngineBuilder {
    pub fn new() -> Self {
        Self {
            sources: Vec::new(),
            settings: AssemblySettings::default(),
            fetch_timeout: DEFAULT_FETCH_TIMEOUT,
        }
    }

    /// Assembly settings and fetch timeout taken from `config`; sources are added separately
    pub fn from_config(config: &FeedConfig) -> Self {
        Self {
            sources: Vec::new(),
            settings: AssemblySettings::from(config),
            fetch_timeout: config.fetch_timeout(),
        }
    }

    /// Register a source; registration order is the merge order (primary first)
    pub fn source(
        mut self,
        id: impl Into<SourceId>,
        client: Arc<dyn ContentSourceClient>,
        page_size: usize,
    ) -> Self {
        self.sources
            .push(RegisteredSource::new(id, client, page_size.max(1)));
        self
    }

    pub fn settings(mut self, settings: AssemblySettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn ad_interval(mut self, interval: usize) -> Self {
        self.settings.ad_interval = interval;
        self
    }

    pub fn enable_ads(mut self, enabled: bool) -> Self {
        self.settings.enable_ads = enabled;
        self
    }

    pub fn derive_reels(mut self, enabled: bool) -> Self {
        self.settings.derive_reels = enabled;
        self
    }

    pub fn ranking_weights(mut self, weights: RankingWeights) -> Self {
        self.settings.weights = weights;
        self
    }

    pub fn ad_creatives(mut self, creatives: Vec<AdCreative>) -> Self {
        self.settings.ad_creatives = creatives;
        self
    }

    pub fn fetch_timeout(mut self, timeout: Duration) -> Self {
        self.fetch_timeout = timeout;
        self
    }

    pub fn build(self) -> FeedEngine {
        info!(
            sources = self.sources.len(),
            ad_interval = self.settings.ad_interval,
            enable_ads = self.settings.enable_ads,
            derive_reels = self.settings.derive_reels,
            "Feed engine initialized"
        );

        FeedEngine {
            cursors: Arc::new(PaginationCursorStore::new(self.sources, self.fetch_timeout)),
            settings: RwLock::new(self.settings),
        }
    }
}
