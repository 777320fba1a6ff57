// 経路和が全て異なる重み付き森の総当たり - ライブラリモジュール

pub mod constants;
pub mod domain;         // ドメイン層
pub mod application;    // アプリケーション層
pub mod infrastructure; // インフラ層
pub mod presentation;   // プレゼンテーション層
pub mod profiling;
pub mod logging;

// 外部クレートの再エクスポート
pub use anyhow::{anyhow, Context, Result};

// 主要な型を再エクスポート
pub use application::{ForestSearchService, ResultTracker, SearchEngine, SearchEvent};
pub use constants::{NodeId, Weight};
pub use domain::forest::{ComponentId, Forest, Node, SumSet, Tree};
pub use domain::search::{
    ForestRecords, MaxNodes, Objective, ObjectiveSet, SearchConfig, SearchOutcome, SearchSummary,
    WorkerCount,
};
