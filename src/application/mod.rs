// アプリケーション層 - 探索の実行と進捗集約

pub mod search;
pub mod service;

pub use search::{SearchEngine, SearchEvent, SearchProgress, StatDelta, ResultTracker};
pub use service::ForestSearchService;
