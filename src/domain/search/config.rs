// 検索設定のValue Objects

use crate::constants::{MAX_NODES_LIMIT, MIN_NODES};
use crate::domain::search::objective::ObjectiveSet;
use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};

/// 探索する最大ノード数を表すValue Object
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MaxNodes(usize);

impl MaxNodes {
    pub fn new(n: usize) -> Result<Self> {
        if n < MIN_NODES {
            return Err(anyhow!("最大ノード数は{}以上である必要があります: {}", MIN_NODES, n));
        }
        if n > MAX_NODES_LIMIT {
            return Err(anyhow!("最大ノード数が大きすぎます: {}（上限 {}）", n, MAX_NODES_LIMIT));
        }
        Ok(Self(n))
    }

    pub fn get(&self) -> usize {
        self.0
    }

    /// 記録を保持するノード数の範囲
    pub fn buckets(&self) -> std::ops::RangeInclusive<usize> {
        MIN_NODES..=self.0
    }
}

/// 並列探索のワーカー数を表すValue Object
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkerCount(usize);

impl WorkerCount {
    pub fn new(n: usize) -> Result<Self> {
        if n == 0 {
            return Err(anyhow!("ワーカー数は1以上"));
        }
        if n > 512 {
            return Err(anyhow!("ワーカー数が大きすぎます: {}", n));
        }
        Ok(Self(n))
    }

    /// 論理 CPU 数
    pub fn available() -> Self {
        Self(num_cpus::get().clamp(1, 512))
    }

    pub fn get(&self) -> usize {
        self.0
    }
}

/// 検索設定のValue Object
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SearchConfig {
    pub max_nodes: MaxNodes,
    pub objectives: ObjectiveSet,
    /// `Some` なら並列探索
    pub parallel: Option<WorkerCount>,
    pub profile_enabled: bool,
}

impl SearchConfig {
    pub fn new(max_nodes: MaxNodes, objectives: ObjectiveSet) -> Self {
        Self {
            max_nodes,
            objectives,
            parallel: None,
            profile_enabled: false,
        }
    }

    pub fn with_parallel(mut self, workers: WorkerCount) -> Self {
        self.parallel = Some(workers);
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.objectives.is_empty() {
            return Err(anyhow!("評価基準が1つも選ばれていません"));
        }
        Ok(())
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            max_nodes: MaxNodes(10),
            objectives: ObjectiveSet::all(),
            parallel: None,
            profile_enabled: false,
        }
    }
}
