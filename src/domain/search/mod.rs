// 検索関連のドメインモデル

pub mod config;
pub mod objective;
pub mod result;

pub use config::{MaxNodes, SearchConfig, WorkerCount};
pub use objective::{Objective, ObjectiveSet};
pub use result::{ForestRecords, SearchOutcome, SearchSummary};
