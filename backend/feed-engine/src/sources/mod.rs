//! Content source clients
//!
//! The engine only consumes sources through [`ContentSourceClient`]. A source
//! must return items strictly descending by creation time (ties broken by a
//! stable key) and must be idempotent for a given cursor.

mod http;
mod memory;

pub use http::HttpContentSource;
pub use memory::MemorySource;

use crate::error::SourceResult;
use crate::models::RawItem;
use async_trait::async_trait;
use serde::{Deserialize, Deserializer, Serialize};
use tracing::debug;

/// One page returned by a source
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SourcePage {
    #[serde(default, deserialize_with = "skip_malformed_items")]
    pub items: Vec<RawItem>,
    #[serde(default)]
    pub next_cursor: Option<String>,
}

impl SourcePage {
    pub fn new(items: Vec<RawItem>, next_cursor: Option<String>) -> Self {
        Self { items, next_cursor }
    }
}

/// Decode each item on its own; an item that fails to decode is dropped
/// without failing the page
fn skip_malformed_items<'de, D>(deserializer: D) -> Result<Vec<RawItem>, D::Error>
where
    D: Deserializer<'de>,
{
    let values = Vec::<serde_json::Value>::deserialize(deserializer)?;
    Ok(values
        .into_iter()
        .filter_map(|value| match serde_json::from_value::<RawItem>(value) {
            Ok(item) => Some(item),
            Err(e) => {
                debug!(error = %e, "Dropping malformed raw item");
                None
            }
        })
        .collect())
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ContentSourceClient: Send + Sync {
    /// Fetch the page following `cursor`; `None` means the first page
    async fn fetch_page(&self, cursor: Option<String>, limit: usize) -> SourceResult<SourcePage>;
}
