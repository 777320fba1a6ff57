// 森の総当たり探索

pub mod aggregator;
pub mod engine;
pub mod event;
pub mod expand;
pub mod tracker;

pub use engine::SearchEngine;
pub use event::{SearchEvent, SearchProgress, StatDelta};
pub use tracker::ResultTracker;
