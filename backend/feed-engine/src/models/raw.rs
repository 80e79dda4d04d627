use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a content source registered with the engine ("posts", "reels", ...)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SourceId(String);

impl SourceId {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SourceId {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

/// Item as delivered by a content source, before conversion
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RawItem {
    Post(RawPost),
    Reel(RawReel),
}

impl RawItem {
    pub fn id(&self) -> Option<&str> {
        match self {
            RawItem::Post(p) => p.id.as_deref(),
            RawItem::Reel(r) => r.id.as_deref(),
        }
    }

    pub fn created_at_ms(&self) -> i64 {
        match self {
            RawItem::Post(p) => p.created_at_ms,
            RawItem::Reel(r) => r.created_at_ms,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawPost {
    pub id: Option<String>,
    #[serde(default)]
    pub author_id: String,
    #[serde(default)]
    pub author_name: Option<String>,
    #[serde(default)]
    pub author_is_premium: bool,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub media_urls: Vec<String>,
    /// Short-form video attached to the post; source of derived reels
    #[serde(default)]
    pub video_url: Option<String>,
    pub created_at_ms: i64,
    #[serde(default)]
    pub like_count: u32,
    #[serde(default)]
    pub comment_count: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawReel {
    pub id: Option<String>,
    #[serde(default)]
    pub media_url: Option<String>,
    #[serde(default)]
    pub thumbnail_url: Option<String>,
    pub created_at_ms: i64,
}

/// Raw items fetched from one source in one round
#[derive(Debug, Clone)]
pub struct SourceBatch {
    pub source: SourceId,
    pub items: Vec<RawItem>,
}

impl SourceBatch {
    pub fn new(source: SourceId, items: Vec<RawItem>) -> Self {
        Self { source, items }
    }
}
