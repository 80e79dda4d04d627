use super::{ContentSourceClient, SourcePage};
use crate::error::{SourceError, SourceResult};
use crate::models::RawItem;
use async_trait::async_trait;
use base64::{engine::general_purpose, Engine as _};
use std::cmp::Ordering;

/// Source backed by a fixed set of raw items
///
/// Pages are cut with a keyset cursor `base64("{created_at_ms}:{id}")` over
/// items sorted by `(created_at_ms, id)` descending, so a cursor keeps
/// pointing at the same boundary no matter how many times it is replayed.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    items: Vec<RawItem>,
}

impl MemorySource {
    pub fn new(mut items: Vec<RawItem>) -> Self {
        items.sort_by(|a, b| sort_key(b).cmp(&sort_key(a)));
        Self { items }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    fn encode_cursor(item: &RawItem) -> String {
        let cursor_str = format!("{}:{}", item.created_at_ms(), item.id().unwrap_or_default());
        general_purpose::STANDARD.encode(cursor_str)
    }

    fn decode_cursor(cursor: &str) -> SourceResult<(i64, String)> {
        let decoded = general_purpose::STANDARD
            .decode(cursor)
            .map_err(|_| SourceError::Decode("invalid cursor format".to_string()))?;
        let cursor_str = String::from_utf8(decoded)
            .map_err(|_| SourceError::Decode("invalid cursor encoding".to_string()))?;
        let (ts_str, id) = cursor_str
            .split_once(':')
            .ok_or_else(|| SourceError::Decode("invalid cursor value".to_string()))?;
        let timestamp = ts_str
            .parse::<i64>()
            .map_err(|_| SourceError::Decode("invalid cursor timestamp".to_string()))?;
        Ok((timestamp, id.to_string()))
    }
}

fn sort_key(item: &RawItem) -> (i64, &str) {
    (item.created_at_ms(), item.id().unwrap_or_default())
}

#[async_trait]
impl ContentSourceClient for MemorySource {
    async fn fetch_page(&self, cursor: Option<String>, limit: usize) -> SourceResult<SourcePage> {
        let start = match cursor.as_deref() {
            Some(cursor) => {
                let (timestamp, id) = Self::decode_cursor(cursor)?;
                let boundary = (timestamp, id.as_str());
                self.items
                    .iter()
                    .position(|item| sort_key(item).cmp(&boundary) == Ordering::Less)
                    .unwrap_or(self.items.len())
            }
            None => 0,
        };

        let end = start.saturating_add(limit).min(self.items.len());
        let items = self.items[start..end].to_vec();
        let next_cursor = if end < self.items.len() {
            items.last().map(Self::encode_cursor)
        } else {
            None
        };

        Ok(SourcePage::new(items, next_cursor))
    }
}
