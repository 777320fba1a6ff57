// 記録の追跡 - ノード数ごとに各評価基準の記録保持者を残す

use nohash_hasher::BuildNoHashHasher;
use std::cmp::Ordering;

use crate::constants::DCountMap;
use crate::domain::forest::Forest;
use crate::domain::search::{ForestRecords, MaxNodes, Objective, ObjectiveSet};

/// 1 つのノード数に対する記録
#[derive(Clone, Debug, Default)]
struct RecordBucket {
    best: Option<usize>,
    forests: Vec<Forest>,
}

impl RecordBucket {
    /// 良ければ置き換え、同等なら追加、悪ければ無視。変化があれば true。
    fn offer(&mut self, objective: Objective, score: usize, forest: &Forest) -> bool {
        match self.best.map(|best| objective.compare(score, best)) {
            None | Some(Ordering::Greater) => {
                self.best = Some(score);
                self.forests.clear();
                self.forests.push(forest.clone());
                true
            }
            Some(Ordering::Equal) => {
                self.forests.push(forest.clone());
                true
            }
            Some(Ordering::Less) => false,
        }
    }
}

/// 評価した森を記録と比べ、記録保持者だけを保持する。
///
/// バケットは `DashMap` に置き、更新はシャードの書き込みロックを
/// 保持したまま「比較→置換」を行うので、並列探索からも共有できる。
/// 無効な評価基準はバケットを持たない。
pub struct ResultTracker {
    max_nodes: MaxNodes,
    boards: Vec<(Objective, DCountMap<RecordBucket>)>,
}

impl ResultTracker {
    pub fn new(max_nodes: MaxNodes, objectives: ObjectiveSet) -> Self {
        let boards = objectives
            .iter()
            .map(|o| (o, DCountMap::with_hasher(BuildNoHashHasher::default())))
            .collect();
        Self { max_nodes, boards }
    }

    pub fn objectives(&self) -> ObjectiveSet {
        self.boards.iter().map(|(o, _)| *o).collect()
    }

    /// 森を評価する。どれかの記録が変われば true。
    /// 森は変更せず、残す場合は複製を保持する。
    pub fn evaluate(&self, forest: &Forest) -> bool {
        let nodes = forest.node_count();
        if !self.max_nodes.buckets().contains(&nodes) {
            return false;
        }

        let mut changed = false;
        for (objective, board) in &self.boards {
            let Some(score) = objective.score(forest) else {
                continue;
            };
            let mut bucket = board.entry(nodes).or_default();
            changed |= bucket.offer(*objective, score, forest);
        }
        changed
    }

    /// 現時点の記録のスナップショット
    pub fn records(&self, objective: Objective) -> Option<ForestRecords> {
        let (_, board) = self.boards.iter().find(|(o, _)| *o == objective)?;
        let mut records = ForestRecords::new(objective);
        for nodes in self.max_nodes.buckets() {
            let forests = board
                .get(&nodes)
                .map(|b| b.forests.clone())
                .unwrap_or_default();
            records.set_bucket(nodes, forests);
        }
        Some(records)
    }

    /// 有効な評価基準ごとの記録（定義順）
    pub fn into_records(self) -> Vec<ForestRecords> {
        let max_nodes = self.max_nodes;
        self.boards
            .into_iter()
            .map(|(objective, board)| {
                let mut records = ForestRecords::new(objective);
                for nodes in max_nodes.buckets() {
                    let forests = board.remove(&nodes).map(|(_, b)| b.forests).unwrap_or_default();
                    records.set_bucket(nodes, forests);
                }
                records
            })
            .collect()
    }
}
