// 検索結果の定義

use crate::domain::forest::Forest;
use crate::domain::search::config::SearchConfig;
use crate::domain::search::objective::Objective;
use crate::profiling::ProfileTotals;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// 1 つの評価基準についての記録（ノード数 → 記録保持者）
#[derive(Clone, Debug)]
pub struct ForestRecords {
    objective: Objective,
    buckets: BTreeMap<usize, Vec<Forest>>,
}

impl ForestRecords {
    pub fn new(objective: Objective) -> Self {
        Self {
            objective,
            buckets: BTreeMap::new(),
        }
    }

    pub fn objective(&self) -> Objective {
        self.objective
    }

    /// ノード数 `nodes` の記録保持者（無ければ空）
    pub fn get(&self, nodes: usize) -> &[Forest] {
        self.buckets.get(&nodes).map(Vec::as_slice).unwrap_or(&[])
    }

    /// ノード数 `nodes` の記録スコア
    pub fn best_score(&self, nodes: usize) -> Option<usize> {
        self.get(nodes).first().and_then(|f| self.objective.score(f))
    }

    /// ノード数の昇順に列挙
    pub fn iter(&self) -> impl Iterator<Item = (usize, &[Forest])> + '_ {
        self.buckets.iter().map(|(&n, v)| (n, v.as_slice()))
    }

    /// 保持している森の総数
    pub fn total(&self) -> usize {
        self.buckets.values().map(Vec::len).sum()
    }

    /// バケットを設定する。探索順に依存しないよう正規キーで並べる。
    pub fn set_bucket(&mut self, nodes: usize, mut forests: Vec<Forest>) {
        forests.sort_by_cached_key(Forest::canonical_key);
        self.buckets.insert(nodes, forests);
    }
}

/// 検索サマリー
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchSummary {
    pub forests_evaluated: u64,
    pub leaves_accepted: u64,
    pub leaves_rejected: u64,
    pub merges_accepted: u64,
    pub merges_rejected: u64,
    pub seedlings_planted: u64,
    pub elapsed_seconds: f64,
    pub forests_per_second: f64,
}

impl SearchSummary {
    pub fn new() -> Self {
        Self::default()
    }

    /// 生成した後続状態の数
    pub fn successors(&self) -> u64 {
        self.leaves_accepted + self.merges_accepted + self.seedlings_planted
    }

    /// 経路和の重複で棄却した候補の数
    pub fn rejected(&self) -> u64 {
        self.leaves_rejected + self.merges_rejected
    }
}

/// 探索全体の結果
#[derive(Clone, Debug)]
pub struct SearchOutcome {
    pub config: SearchConfig,
    pub records: Vec<ForestRecords>,
    pub summary: SearchSummary,
    /// 計測が有効な場合のフェーズ別時間
    pub profile: Option<ProfileTotals>,
}

impl SearchOutcome {
    /// 評価基準の記録（無効な基準なら `None`）
    pub fn records(&self, objective: Objective) -> Option<&ForestRecords> {
        self.records.iter().find(|r| r.objective() == objective)
    }
}
