//! Service layer for feed-engine
//!
//! - pagination: per-source cursors and in-flight debounce
//! - ranking: normalized weighted scoring
//! - ads: sponsored item injection
//! - assembler: merge, derive, rank, inject, fall back
//! - engine: fan-out/gather orchestration

pub mod ads;
pub mod assembler;
pub mod engine;
pub mod pagination;
pub mod ranking;

pub use ads::{AdCreative, AdInjector};
pub use assembler::{default_top_picks, evergreen_card, AssemblySettings, FeedAssembler};
pub use engine::{FeedEngine, FeedEngineBuilder};
pub use pagination::{CursorState, PaginationCursorStore, RegisteredSource};
pub use ranking::{RankingEngine, RankingWeights, RawMetrics};
