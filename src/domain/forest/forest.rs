// 森 - 探索状態そのもの

use crate::constants::{n_choose_2, NodeId, Weight, FIRST_FREE_SUM, SEED_WEIGHT};
use crate::domain::forest::sums::{has_internal_duplicate, SumSet};
use crate::domain::forest::tree::Tree;
use serde::{Deserialize, Serialize};
use std::fmt;

/// 森の中の成分を指す
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ComponentId {
    /// 主木（常に親側）
    Main,
    /// 苗木（`seedlings` 内の位置）
    Seedling(usize),
}

/// 並べ替え用の正規キー（経路和, 成分ごとの辺リスト）
pub type CanonicalKey = (Vec<Weight>, Vec<Vec<(NodeId, NodeId, Weight)>>);

/// 主木と苗木からなる森。
///
/// `sums` は全成分の経路和をまとめたプールで、まだつながっていない成分同士でも
/// 共有する。将来の結合で必ず衝突する状態を早めに落とすための保守的な枝刈り。
///
/// 変更は必ず複製に対して行う。各操作は検証に失敗すると `false` を返し、
/// その場合は何も変更しない。
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Forest {
    main_tree: Tree,
    seedlings: Vec<Tree>,
    sums: SumSet,
    next_node: NodeId,
}

impl Forest {
    /// 重み 1 の 2 ノード木から始まる初期状態
    pub fn new() -> Self {
        let main_tree = Tree::seed(0, 1, SEED_WEIGHT);
        let sums = main_tree.sums().clone();
        Self {
            main_tree,
            seedlings: Vec::new(),
            sums,
            next_node: 2,
        }
    }

    pub fn main_tree(&self) -> &Tree {
        &self.main_tree
    }

    pub fn seedlings(&self) -> &[Tree] {
        &self.seedlings
    }

    pub fn sums(&self) -> &SumSet {
        &self.sums
    }

    pub fn next_node(&self) -> NodeId {
        self.next_node
    }

    /// 全成分のノード数の合計
    pub fn node_count(&self) -> usize {
        self.next_node as usize
    }

    /// 主木を含めた成分数
    pub fn component_count(&self) -> usize {
        self.seedlings.len() + 1
    }

    pub fn is_single_component(&self) -> bool {
        self.seedlings.is_empty()
    }

    pub fn component(&self, id: ComponentId) -> Option<&Tree> {
        match id {
            ComponentId::Main => Some(&self.main_tree),
            ComponentId::Seedling(i) => self.seedlings.get(i),
        }
    }

    fn component_mut(&mut self, id: ComponentId) -> Option<&mut Tree> {
        match id {
            ComponentId::Main => Some(&mut self.main_tree),
            ComponentId::Seedling(i) => self.seedlings.get_mut(i),
        }
    }

    /// 主木を先頭に全成分を列挙
    pub fn components(&self) -> impl Iterator<Item = (ComponentId, &Tree)> + '_ {
        std::iter::once((ComponentId::Main, &self.main_tree)).chain(
            self.seedlings
                .iter()
                .enumerate()
                .map(|(i, t)| (ComponentId::Seedling(i), t)),
        )
    }

    /// 2 以上で未使用の最小の和。新しい辺の重みは常にこれ。
    pub fn missing_sum(&self) -> Weight {
        self.sums.smallest_absent_from(FIRST_FREE_SUM)
    }

    /// 候補がどれもプールに無いか
    pub fn are_sums_unique(&self, candidate: &[Weight]) -> bool {
        self.sums.is_disjoint(candidate)
    }

    /// 成分 `component` のノード `attach_node` に重み `weight` の葉を付ける
    pub fn add_leaf(&mut self, component: ComponentId, attach_node: NodeId, weight: Weight) -> bool {
        let new_index = self.next_node;
        let Some(predicted) = self
            .component(component)
            .and_then(|tree| tree.leaf_sums(attach_node, weight))
        else {
            return false;
        };
        if !self.are_sums_unique(&predicted) || !self.sums.try_extend(&predicted) {
            return false;
        }

        let attached = self
            .component_mut(component)
            .and_then(|tree| tree.attach_leaf(attach_node, new_index, weight));
        debug_assert_eq!(attached.map(|s| s.len()), Some(predicted.len()));

        self.next_node += 1;
        true
    }

    /// 重み `weight` の 2 ノード苗木を追加する。
    /// `weight` は現在の欠番であることが前提。
    pub fn add_disjoint_component(&mut self, weight: Weight) {
        let a = self.next_node;
        let inserted = self.sums.insert(weight);
        debug_assert!(inserted, "苗木の重み {} は既に使われています", weight);

        self.seedlings.push(Tree::seed(a, a + 1, weight));
        self.next_node += 2;
    }

    /// 苗木 `child` を重み `bridge_weight` の橋で `parent` に結合する。
    ///
    /// 1. 子側の和（子の接続点から各ノードまで + 橋）を求め、重複とプールとの衝突を確認
    /// 2. その各値から親の接続点を起点に親側の全ノードへの和を求める
    /// 3. 全てをプールに入れて重複が無いか確認
    /// 4. 橋を張り、子の全ノードを親へ移し、苗木リストから子を外す
    pub fn merge_components(
        &mut self,
        parent: ComponentId,
        parent_node: NodeId,
        child: ComponentId,
        child_node: NodeId,
        bridge_weight: Weight,
    ) -> bool {
        let ComponentId::Seedling(child_pos) = child else {
            return false;
        };
        if parent == child {
            return false;
        }
        let (Some(parent_tree), Some(child_tree)) = (self.component(parent), self.component(child))
        else {
            return false;
        };

        let Some(mut child_weights) = child_tree.path_sums_from(child_node, bridge_weight) else {
            return false;
        };
        child_weights.push(bridge_weight);
        if !self.are_sums_unique(&child_weights) || has_internal_duplicate(&child_weights) {
            return false;
        }

        let mut bridge_sums = child_weights.clone();
        for &v in &child_weights {
            match parent_tree.path_sums_from(parent_node, v) {
                Some(cross) => bridge_sums.extend(cross),
                None => return false,
            }
        }

        if !self.sums.try_extend(&bridge_sums) {
            return false;
        }

        let absorbed = self.seedlings.remove(child_pos);
        let parent = match parent {
            ComponentId::Seedling(i) if i > child_pos => ComponentId::Seedling(i - 1),
            other => other,
        };
        if let Some(tree) = self.component_mut(parent) {
            tree.absorb(absorbed, parent_node, child_node, bridge_weight, &bridge_sums);
        }
        true
    }

    /// 成分サイズの分割に対する経路和の上限 Σ C(size, 2)
    pub fn perfect_ceiling(&self) -> usize {
        self.components().map(|(_, t)| n_choose_2(t.len())).sum()
    }

    /// 最大の経路和が上限に一致するか
    pub fn is_perfect(&self) -> bool {
        self.sums.max().map(|m| m as usize) == Some(self.perfect_ceiling())
    }

    /// 結果を決定的に並べるためのキー
    pub fn canonical_key(&self) -> CanonicalKey {
        (
            self.sums.as_slice().to_vec(),
            self.components().map(|(_, t)| t.edges()).collect(),
        )
    }
}

impl Default for Forest {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for Forest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sums: Vec<String> = self.sums.iter().map(|s| s.to_string()).collect();
        writeln!(f, "Forest sums: {}", sums.join(" "))?;
        writeln!(f, " from {} trees", self.component_count())?;
        for (i, (_, tree)) in self.components().enumerate() {
            writeln!(f, "{}.", i + 1)?;
            write!(f, "{}", tree)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// {1} の主木と {2} の苗木
    fn two_seeds() -> Forest {
        let mut f = Forest::new();
        let w = f.missing_sum();
        f.add_disjoint_component(w);
        f
    }

    #[test]
    fn new_forest_is_seed_edge() {
        let f = Forest::new();
        assert_eq!(f.sums().as_slice(), &[1]);
        assert_eq!(f.node_count(), 2);
        assert_eq!(f.component_count(), 1);
        assert_eq!(f.missing_sum(), 2);
        assert!(f.is_perfect());
    }

    #[test]
    fn add_leaf_pools_one_sum_per_existing_node() {
        let mut f = Forest::new();
        assert!(f.add_leaf(ComponentId::Main, 0, 2));
        assert_eq!(f.node_count(), 3);
        assert_eq!(f.sums().as_slice(), &[1, 2, 3]);
        assert_eq!(f.main_tree().len(), 3);
        assert_eq!(f.missing_sum(), 4);
    }

    #[test]
    fn add_leaf_rejects_collision_and_leaves_forest_unchanged() {
        let mut f = Forest::new();
        assert!(f.add_leaf(ComponentId::Main, 0, 2));
        let before = f.clone();
        // 1 に重み 2 を付けると 0-1-3 が 3 で衝突
        assert!(!f.add_leaf(ComponentId::Main, 1, 2));
        assert_eq!(f, before);
    }

    #[test]
    fn add_leaf_rejects_unknown_attach_node() {
        let mut f = Forest::new();
        assert!(!f.add_leaf(ComponentId::Main, 9, 2));
        assert!(!f.add_leaf(ComponentId::Seedling(0), 0, 2));
    }

    #[test]
    fn add_disjoint_component_appends_seedling() {
        let f = two_seeds();
        assert_eq!(f.component_count(), 2);
        assert_eq!(f.node_count(), 4);
        assert_eq!(f.seedlings()[0].node_ids().collect::<Vec<_>>(), vec![2, 3]);
        assert_eq!(f.sums().as_slice(), &[1, 2]);
        assert_eq!(f.missing_sum(), 3);
    }

    #[test]
    fn merge_into_main_makes_perfect_tree() {
        let mut f = two_seeds();
        assert!(f.merge_components(ComponentId::Main, 0, ComponentId::Seedling(0), 2, 3));
        assert!(f.is_single_component());
        assert_eq!(f.main_tree().len(), 4);
        assert_eq!(f.sums().as_slice(), &[1, 2, 3, 4, 5, 6]);
        assert!(f.is_perfect());
        assert_eq!(f.main_tree().sums(), f.sums());
        assert_eq!(f.main_tree().edges(), vec![(0, 1, 1), (0, 2, 3), (2, 3, 2)]);
    }

    #[test]
    fn merge_rejects_main_as_child() {
        let mut f = two_seeds();
        assert!(!f.merge_components(ComponentId::Seedling(0), 2, ComponentId::Main, 0, 3));
        assert!(!f.merge_components(ComponentId::Seedling(0), 2, ComponentId::Seedling(0), 3, 3));
    }

    #[test]
    fn merge_rejects_collision_without_change() {
        let mut f = two_seeds();
        let before = f.clone();
        // 橋 1 は既存の和と衝突
        assert!(!f.merge_components(ComponentId::Main, 0, ComponentId::Seedling(0), 2, 1));
        assert_eq!(f, before);
    }

    #[test]
    fn merge_between_seedlings_keeps_parent_position() {
        let mut f = two_seeds();
        let w = f.missing_sum();
        f.add_disjoint_component(w);
        assert_eq!(f.sums().as_slice(), &[1, 2, 3]);

        // 苗木 0 (2-3, 重み 2) に苗木 1 (4-5, 重み 3) を橋 4 で結合
        assert!(f.merge_components(ComponentId::Seedling(0), 2, ComponentId::Seedling(1), 4, 4));
        assert_eq!(f.component_count(), 2);
        assert_eq!(f.seedlings()[0].len(), 4);
        assert_eq!(f.node_count(), 6);
        // 子側 {4, 7}, 親側 {6, 9}
        assert_eq!(f.sums().as_slice(), &[1, 2, 3, 4, 6, 7, 9]);
    }

    #[test]
    fn merge_with_parent_after_child_adjusts_index() {
        let mut f = two_seeds();
        let w = f.missing_sum();
        f.add_disjoint_component(w);

        // 親が子より後ろにあっても結合できる
        assert!(f.merge_components(ComponentId::Seedling(1), 4, ComponentId::Seedling(0), 2, 4));
        assert_eq!(f.component_count(), 2);
        assert_eq!(f.seedlings()[0].len(), 4);
        assert!(f.seedlings()[0].contains(2));
    }

    #[test]
    fn perfect_ceiling_sums_each_component() {
        let f = two_seeds();
        assert_eq!(f.perfect_ceiling(), 2);
        assert!(f.is_perfect());
    }

    #[test]
    fn display_lists_components_main_first() {
        let f = two_seeds();
        let text = f.to_string();
        assert!(text.starts_with("Forest sums: 1 2\n from 2 trees\n1.\n"));
        assert!(text.contains("2.\nsums: 2\n2 -> (3, 2)\n3 -> (2, 2)\n"));
    }
}
