// 経路和の集合 - 常に昇順を保つ

use crate::constants::Weight;
use serde::{Deserialize, Serialize};

/// 実現済みの経路和（昇順・重複なし）
///
/// 森全体のプールとして使うため、重複を持たないことを型の不変条件とする。
/// 候補の検証と確定は `is_disjoint` / `try_extend` を通して行う。
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SumSet {
    values: Vec<Weight>,
}

impl SumSet {
    pub fn new() -> Self {
        Self { values: Vec::new() }
    }

    /// 単一の和から構築
    pub fn single(value: Weight) -> Self {
        Self {
            values: vec![value],
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn contains(&self, value: Weight) -> bool {
        self.values.binary_search(&value).is_ok()
    }

    /// 最大の経路和
    pub fn max(&self) -> Option<Weight> {
        self.values.last().copied()
    }

    pub fn as_slice(&self) -> &[Weight] {
        &self.values
    }

    pub fn iter(&self) -> impl Iterator<Item = Weight> + '_ {
        self.values.iter().copied()
    }

    /// 候補のどれもまだ含まれていないか
    pub fn is_disjoint(&self, candidate: &[Weight]) -> bool {
        candidate.iter().all(|&v| !self.contains(v))
    }

    /// 1 つ挿入（既に存在すれば false で何もしない）
    pub fn insert(&mut self, value: Weight) -> bool {
        match self.values.binary_search(&value) {
            Ok(_) => false,
            Err(pos) => {
                self.values.insert(pos, value);
                true
            }
        }
    }

    /// 候補をまとめて追加する。
    /// 候補内の重複、または既存の和との衝突があれば何も変更せず false。
    pub fn try_extend(&mut self, candidate: &[Weight]) -> bool {
        let mut incoming = candidate.to_vec();
        incoming.sort_unstable();
        if incoming.windows(2).any(|w| w[0] == w[1]) || !self.is_disjoint(&incoming) {
            return false;
        }

        let mut merged = Vec::with_capacity(self.values.len() + incoming.len());
        let (mut i, mut j) = (0, 0);
        while i < self.values.len() && j < incoming.len() {
            if self.values[i] < incoming[j] {
                merged.push(self.values[i]);
                i += 1;
            } else {
                merged.push(incoming[j]);
                j += 1;
            }
        }
        merged.extend_from_slice(&self.values[i..]);
        merged.extend_from_slice(&incoming[j..]);
        self.values = merged;
        true
    }

    /// `start` 以上で含まれていない最小の値
    pub fn smallest_absent_from(&self, start: Weight) -> Weight {
        let mut x = start;
        let from = self.values.partition_point(|&v| v < start);
        for &v in &self.values[from..] {
            if v != x {
                break;
            }
            x += 1;
        }
        x
    }

    /// 先頭から 1, 2, 3, ... と連続している長さ
    pub fn consecutive_run(&self) -> usize {
        self.values
            .iter()
            .zip(1..)
            .take_while(|&(&v, expected)| v == expected)
            .count()
    }
}

impl From<Vec<Weight>> for SumSet {
    /// 重複は 1 つにまとめる
    fn from(mut values: Vec<Weight>) -> Self {
        values.sort_unstable();
        values.dedup();
        Self { values }
    }
}

/// 候補の中に同じ値が 2 回以上あるか
pub fn has_internal_duplicate(candidate: &[Weight]) -> bool {
    let mut sorted = candidate.to_vec();
    sorted.sort_unstable();
    sorted.windows(2).any(|w| w[0] == w[1])
}
