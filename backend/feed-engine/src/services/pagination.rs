/// Per-source pagination cursors with an in-flight debounce
///
/// Each registered source owns one slot: a continuation token, an in-flight
/// flag and an exhaustion flag. Only `fetch_next` and `reset` mutate a slot.
/// A fetch requested while another is in flight for the same source returns
/// an empty page without contacting the client.
///
/// `reset` bumps a per-slot generation. A fetch that started before the reset
/// neither writes its token back nor clears a newer fetch's in-flight flag.
use crate::error::SourceError;
use crate::metrics;
use crate::models::{RawItem, SourceId};
use crate::sources::ContentSourceClient;
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Snapshot of one source's pagination state
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CursorState {
    pub continuation_token: Option<String>,
    pub in_flight: bool,
    /// Set once a non-empty page arrives without a next cursor
    pub exhausted: bool,
}

/// A source as registered with the store
#[derive(Clone)]
pub struct RegisteredSource {
    pub id: SourceId,
    pub client: Arc<dyn ContentSourceClient>,
    pub page_size: usize,
}

impl RegisteredSource {
    pub fn new(
        id: impl Into<SourceId>,
        client: Arc<dyn ContentSourceClient>,
        page_size: usize,
    ) -> Self {
        Self {
            id: id.into(),
            client,
            page_size,
        }
    }
}

#[derive(Debug, Default)]
struct CursorSlot {
    state: CursorState,
    generation: u64,
}

struct SourceEntry {
    source: RegisteredSource,
    slot: Mutex<CursorSlot>,
}

/// Clears the in-flight flag when the fetch finishes, fails, panics or is dropped
struct InFlightGuard<'a> {
    slot: &'a Mutex<CursorSlot>,
    generation: u64,
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        let mut slot = self.slot.lock();
        if slot.generation == self.generation {
            slot.state.in_flight = false;
        }
    }
}

pub struct PaginationCursorStore {
    entries: Vec<SourceEntry>,
    fetch_timeout: Duration,
}

impl PaginationCursorStore {
    pub fn new(sources: Vec<RegisteredSource>, fetch_timeout: Duration) -> Self {
        let entries = sources
            .into_iter()
            .map(|source| SourceEntry {
                source,
                slot: Mutex::new(CursorSlot::default()),
            })
            .collect();

        Self {
            entries,
            fetch_timeout,
        }
    }

    /// Registered sources in registration order
    pub fn source_ids(&self) -> impl Iterator<Item = &SourceId> {
        self.entries.iter().map(|e| &e.source.id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn snapshot(&self, source: &SourceId) -> Option<CursorState> {
        self.entry(source).map(|e| e.slot.lock().state.clone())
    }

    /// Fetch the next page for `source`, advancing its cursor
    ///
    /// Never fails: debounced, exhausted, unknown and failing sources all
    /// yield an empty page.
    pub async fn fetch_next(&self, source: &SourceId) -> Vec<RawItem> {
        let Some(entry) = self.entry(source) else {
            warn!(source = %source, "Fetch requested for unregistered source");
            return Vec::new();
        };

        let (cursor, generation) = {
            let mut slot = entry.slot.lock();
            if slot.state.in_flight {
                debug!(source = %source, "Fetch already in flight, returning empty page");
                metrics::record_source_fetch(source.as_str(), "debounced");
                return Vec::new();
            }
            if slot.state.exhausted {
                debug!(source = %source, "Source exhausted, returning empty page");
                metrics::record_source_fetch(source.as_str(), "exhausted");
                return Vec::new();
            }
            slot.state.in_flight = true;
            (slot.state.continuation_token.clone(), slot.generation)
        };
        let _guard = InFlightGuard {
            slot: &entry.slot,
            generation,
        };

        let page_size = entry.source.page_size;
        let result = tokio::time::timeout(
            self.fetch_timeout,
            entry.source.client.fetch_page(cursor, page_size),
        )
        .await
        .unwrap_or_else(|_| Err(SourceError::Timeout(self.fetch_timeout)));

        match result {
            Ok(page) => {
                let mut slot = entry.slot.lock();
                if slot.generation != generation {
                    debug!(source = %source, "Pagination was reset during fetch, cursor left untouched");
                } else if !page.items.is_empty() {
                    match page.next_cursor {
                        Some(token) => slot.state.continuation_token = Some(token),
                        None => slot.state.exhausted = true,
                    }
                }
                debug!(
                    source = %source,
                    items = page.items.len(),
                    exhausted = slot.state.exhausted,
                    "Fetched source page"
                );
                metrics::record_source_fetch(source.as_str(), "ok");
                page.items
            }
            Err(e) => {
                warn!(source = %source, error = %e, "Source fetch failed, treating as empty page");
                metrics::record_source_fetch(source.as_str(), e.outcome());
                Vec::new()
            }
        }
    }

    /// Clear every token and flag; in-flight fetches become stale
    pub fn reset(&self) {
        for entry in &self.entries {
            let mut slot = entry.slot.lock();
            slot.state = CursorState::default();
            slot.generation = slot.generation.wrapping_add(1);
        }
        debug!(sources = self.entries.len(), "Pagination reset");
    }

    fn entry(&self, source: &SourceId) -> Option<&SourceEntry> {
        self.entries.iter().find(|e| &e.source.id == source)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RawReel;
    use crate::sources::{MockContentSourceClient, SourcePage};

    fn reel(id: &str, created_at_ms: i64) -> RawItem {
        RawItem::Reel(RawReel {
            id: Some(id.to_string()),
            media_url: Some("https://cdn.example.com/r.mp4".to_string()),
            thumbnail_url: None,
            created_at_ms,
        })
    }

    fn store_with(mock: MockContentSourceClient, page_size: usize) -> PaginationCursorStore {
        PaginationCursorStore::new(
            vec![RegisteredSource::new("reels", Arc::new(mock), page_size)],
            Duration::from_secs(5),
        )
    }

    #[tokio::test]
    async fn test_fetch_passes_stored_token_and_page_size() {
        let mut mock = MockContentSourceClient::new();
        let mut seq = mockall::Sequence::new();
        mock.expect_fetch_page()
            .withf(|cursor, limit| cursor.is_none() && *limit == 3)
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _| Ok(SourcePage::new(vec![reel("a", 3)], Some("t1".to_string()))));
        mock.expect_fetch_page()
            .withf(|cursor, limit| cursor.as_deref() == Some("t1") && *limit == 3)
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _| Ok(SourcePage::new(vec![reel("b", 2)], Some("t2".to_string()))));

        let store = store_with(mock, 3);
        let id = SourceId::new("reels");

        assert_eq!(store.fetch_next(&id).await.len(), 1);
        assert_eq!(store.fetch_next(&id).await.len(), 1);
        let state = store.snapshot(&id).unwrap();
        assert_eq!(state.continuation_token.as_deref(), Some("t2"));
        assert!(!state.in_flight);
    }

    #[tokio::test]
    async fn test_in_flight_source_is_not_contacted() {
        let mut mock = MockContentSourceClient::new();
        mock.expect_fetch_page().times(0);

        let store = store_with(mock, 10);
        store.entries[0].slot.lock().state.in_flight = true;

        let items = store.fetch_next(&SourceId::new("reels")).await;
        assert!(items.is_empty());
        assert!(store.snapshot(&SourceId::new("reels")).unwrap().in_flight);
    }

    #[tokio::test]
    async fn test_empty_page_keeps_token() {
        let mut mock = MockContentSourceClient::new();
        let mut seq = mockall::Sequence::new();
        mock.expect_fetch_page()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _| Ok(SourcePage::new(vec![reel("a", 1)], Some("t1".to_string()))));
        mock.expect_fetch_page()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _| Ok(SourcePage::new(Vec::new(), Some("bogus".to_string()))));

        let store = store_with(mock, 10);
        let id = SourceId::new("reels");
        store.fetch_next(&id).await;
        assert!(store.fetch_next(&id).await.is_empty());
        assert_eq!(
            store.snapshot(&id).unwrap().continuation_token.as_deref(),
            Some("t1")
        );
    }

    #[tokio::test]
    async fn test_last_page_marks_source_exhausted() {
        let mut mock = MockContentSourceClient::new();
        mock.expect_fetch_page()
            .times(1)
            .returning(|_, _| Ok(SourcePage::new(vec![reel("a", 1)], None)));

        let store = store_with(mock, 10);
        let id = SourceId::new("reels");
        assert_eq!(store.fetch_next(&id).await.len(), 1);
        assert!(store.snapshot(&id).unwrap().exhausted);
        // client expectation is times(1): the exhausted source is not asked again
        assert!(store.fetch_next(&id).await.is_empty());
    }

    #[tokio::test]
    async fn test_failure_yields_empty_page_and_clears_flag() {
        let mut mock = MockContentSourceClient::new();
        mock.expect_fetch_page()
            .times(1)
            .returning(|_, _| Err(SourceError::Unavailable("permission denied".to_string())));

        let store = store_with(mock, 10);
        let id = SourceId::new("reels");
        assert!(store.fetch_next(&id).await.is_empty());
        assert_eq!(store.snapshot(&id).unwrap(), CursorState::default());
    }

    #[tokio::test]
    async fn test_reset_clears_tokens_and_exhaustion() {
        let mut mock = MockContentSourceClient::new();
        mock.expect_fetch_page()
            .times(2)
            .returning(|_, _| Ok(SourcePage::new(vec![reel("a", 1)], None)));

        let store = store_with(mock, 10);
        let id = SourceId::new("reels");
        store.fetch_next(&id).await;
        assert!(store.snapshot(&id).unwrap().exhausted);

        store.reset();
        assert_eq!(store.snapshot(&id).unwrap(), CursorState::default());
        assert_eq!(store.fetch_next(&id).await.len(), 1);
    }

    #[tokio::test]
    async fn test_unknown_source_returns_empty() {
        let store = PaginationCursorStore::new(Vec::new(), Duration::from_secs(1));
        assert!(store.fetch_next(&SourceId::new("nope")).await.is_empty());
        assert!(store.snapshot(&SourceId::new("nope")).is_none());
    }
}
