pub mod config;
pub mod error;
pub mod metrics;
pub mod models;
pub mod services;
pub mod sources;
pub mod utils;

pub use config::FeedConfig;
pub use error::{ConfigError, SourceError, SourceResult};
pub use models::{
    AdItem, Author, ErrorBlock, EvergreenCard, FeedItem, PostItem, RawItem, RawPost, RawReel,
    ReelItem, SourceBatch, SourceId, TopPick, TopPicks,
};
pub use services::{
    AdCreative, AdInjector, AssemblySettings, CursorState, FeedAssembler, FeedEngine,
    FeedEngineBuilder, PaginationCursorStore, RankingEngine, RankingWeights, RegisteredSource,
};
pub use sources::{ContentSourceClient, HttpContentSource, MemorySource, SourcePage};
