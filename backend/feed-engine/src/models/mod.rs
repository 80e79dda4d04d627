mod raw;

pub use raw::{RawItem, RawPost, RawReel, SourceBatch, SourceId};

use serde::{Deserialize, Serialize};

/// One entry of an assembled feed page
///
/// `key()` is stable and unique within a page; callers use it for list diffing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FeedItem {
    Post(PostItem),
    Reel(ReelItem),
    Ad(AdItem),
    TopPicks(TopPicks),
    Evergreen(EvergreenCard),
    Loading,
    Error(ErrorBlock),
}

impl FeedItem {
    pub fn key(&self) -> String {
        match self {
            FeedItem::Post(post) => format!("post_{}", post.id),
            FeedItem::Reel(reel) => reel.key(),
            FeedItem::Ad(ad) => format!("ad_{}", ad.ad_id),
            FeedItem::TopPicks(_) => "top_picks".to_string(),
            FeedItem::Evergreen(_) => "evergreen".to_string(),
            FeedItem::Loading => "loading".to_string(),
            FeedItem::Error(_) => "error".to_string(),
        }
    }

    /// Posts and reels, i.e. items backed by real content
    pub fn is_organic(&self) -> bool {
        matches!(self, FeedItem::Post(_) | FeedItem::Reel(_))
    }

    pub fn kind(&self) -> &'static str {
        match self {
            FeedItem::Post(_) => "post",
            FeedItem::Reel(_) => "reel",
            FeedItem::Ad(_) => "ad",
            FeedItem::TopPicks(_) => "top_picks",
            FeedItem::Evergreen(_) => "evergreen",
            FeedItem::Loading => "loading",
            FeedItem::Error(_) => "error",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostItem {
    pub id: String,
    pub author: Author,
    pub text: String,
    pub media_urls: Vec<String>,
    pub video_url: Option<String>,
    pub created_at_ms: i64,
    pub like_count: u32,
    pub comment_count: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Author {
    pub id: String,
    pub display_name: Option<String>,
    pub is_premium: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReelItem {
    pub id: String,
    pub media_url: String,
    pub thumbnail_url: Option<String>,
    pub created_at_ms: i64,
    /// Id of the post this reel was synthesized from
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub derived_from: Option<String>,
}

impl ReelItem {
    pub fn key(&self) -> String {
        match &self.derived_from {
            Some(post_id) => format!("derived_{}", post_id),
            None => format!("reel_{}", self.id),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdItem {
    pub ad_id: String,
    pub image_url: String,
    pub click_url: Option<String>,
    /// Reserved for weighted creative selection; not read by the injector
    pub weight: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopPicks {
    pub entries: Vec<TopPick>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopPick {
    pub id: String,
    pub title: String,
    pub image_url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvergreenCard {
    pub title: String,
    pub caption: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorBlock {
    pub message: String,
}
