// 記録を競う 3 つの評価基準

use crate::domain::forest::Forest;
use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// 評価基準
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Objective {
    /// 単一の木で最大の経路和が最小
    MinMaxPath,
    /// 単一の木で 1, 2, 3, ... の連続が最長
    NearPerfect,
    /// 完全な森のうち成分数が最小
    PerfectForest,
}

impl Objective {
    pub const ALL: [Objective; 3] = [
        Objective::MinMaxPath,
        Objective::NearPerfect,
        Objective::PerfectForest,
    ];

    fn bit(self) -> u8 {
        match self {
            Objective::MinMaxPath => 0b001,
            Objective::NearPerfect => 0b010,
            Objective::PerfectForest => 0b100,
        }
    }

    /// CLI・JSON で使う名前
    pub fn key(self) -> &'static str {
        match self {
            Objective::MinMaxPath => "min-max-path",
            Objective::NearPerfect => "near-perfect",
            Objective::PerfectForest => "perfect-forest",
        }
    }

    /// レポートの見出し
    pub fn heading(self) -> &'static str {
        match self {
            Objective::MinMaxPath => "Minimum max path on n nodes",
            Objective::NearPerfect => "Nearest to perfect path on n nodes",
            Objective::PerfectForest => "Perfect forest on n nodes, minimizing number of trees",
        }
    }

    /// 森のスコア。対象外なら `None`。
    pub fn score(self, forest: &Forest) -> Option<usize> {
        match self {
            Objective::MinMaxPath if forest.is_single_component() => {
                forest.sums().max().map(|m| m as usize)
            }
            Objective::NearPerfect if forest.is_single_component() => {
                Some(forest.sums().consecutive_run())
            }
            Objective::PerfectForest if forest.is_perfect() => Some(forest.component_count()),
            _ => None,
        }
    }

    /// 候補が現記録より良ければ `Greater`、同等なら `Equal`
    pub fn compare(self, candidate: usize, incumbent: usize) -> Ordering {
        match self {
            Objective::MinMaxPath | Objective::PerfectForest => incumbent.cmp(&candidate),
            Objective::NearPerfect => candidate.cmp(&incumbent),
        }
    }
}

impl fmt::Display for Objective {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Objective {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        Objective::ALL
            .into_iter()
            .find(|o| o.key() == s)
            .ok_or_else(|| anyhow!("不明な評価基準: {}", s))
    }
}

/// 有効な評価基準の集合
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ObjectiveSet(u8);

impl ObjectiveSet {
    pub fn empty() -> Self {
        Self(0)
    }

    pub fn all() -> Self {
        Objective::ALL.into_iter().collect()
    }

    pub fn with(mut self, objective: Objective) -> Self {
        self.insert(objective);
        self
    }

    pub fn insert(&mut self, objective: Objective) {
        self.0 |= objective.bit();
    }

    pub fn contains(&self, objective: Objective) -> bool {
        self.0 & objective.bit() != 0
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub fn len(&self) -> usize {
        self.0.count_ones() as usize
    }

    /// 定義順に列挙
    pub fn iter(&self) -> impl Iterator<Item = Objective> {
        let set = *self;
        Objective::ALL.into_iter().filter(move |o| set.contains(*o))
    }
}

impl Default for ObjectiveSet {
    fn default() -> Self {
        Self::all()
    }
}

impl FromIterator<Objective> for ObjectiveSet {
    fn from_iter<I: IntoIterator<Item = Objective>>(iter: I) -> Self {
        let mut set = Self::empty();
        for o in iter {
            set.insert(o);
        }
        set
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::forest::ComponentId;

    #[test]
    fn objective_parses_from_key() {
        for o in Objective::ALL {
            assert_eq!(o.key().parse::<Objective>().unwrap(), o);
        }
        assert!("fastest".parse::<Objective>().is_err());
    }

    #[test]
    fn set_tracks_membership() {
        let set = ObjectiveSet::empty().with(Objective::PerfectForest);
        assert!(set.contains(Objective::PerfectForest));
        assert!(!set.contains(Objective::MinMaxPath));
        assert_eq!(set.len(), 1);
        assert_eq!(ObjectiveSet::all().len(), 3);
        assert!(ObjectiveSet::empty().is_empty());
    }

    #[test]
    fn set_iterates_in_definition_order() {
        let set: ObjectiveSet = [Objective::PerfectForest, Objective::MinMaxPath]
            .into_iter()
            .collect();
        assert_eq!(
            set.iter().collect::<Vec<_>>(),
            vec![Objective::MinMaxPath, Objective::PerfectForest]
        );
    }

    #[test]
    fn single_tree_objectives_skip_forests() {
        let mut f = Forest::new();
        let w = f.missing_sum();
        f.add_disjoint_component(w);
        assert_eq!(Objective::MinMaxPath.score(&f), None);
        assert_eq!(Objective::NearPerfect.score(&f), None);
        assert_eq!(Objective::PerfectForest.score(&f), Some(2));
    }

    #[test]
    fn scores_for_three_node_path() {
        let mut f = Forest::new();
        assert!(f.add_leaf(ComponentId::Main, 0, 2));
        assert_eq!(Objective::MinMaxPath.score(&f), Some(3));
        assert_eq!(Objective::NearPerfect.score(&f), Some(3));
        assert_eq!(Objective::PerfectForest.score(&f), Some(1));
    }

    #[test]
    fn compare_direction_per_objective() {
        assert_eq!(Objective::MinMaxPath.compare(5, 6), Ordering::Greater);
        assert_eq!(Objective::NearPerfect.compare(5, 6), Ordering::Less);
        assert_eq!(Objective::PerfectForest.compare(1, 2), Ordering::Greater);
        assert_eq!(Objective::NearPerfect.compare(4, 4), Ordering::Equal);
    }
}
