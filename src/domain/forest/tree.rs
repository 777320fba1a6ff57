// 木 - ノード集合と木内で実現済みの経路和

use crate::constants::{NodeId, Weight};
use crate::domain::forest::node::Node;
use crate::domain::forest::sums::SumSet;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// 連結で閉路のない重み付き木
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tree {
    nodes: BTreeMap<NodeId, Node>,
    sums: SumSet,
}

impl Tree {
    /// 2 ノード 1 辺の苗木を作成
    pub fn seed(a: NodeId, b: NodeId, weight: Weight) -> Self {
        let mut nodes = BTreeMap::new();
        nodes.insert(a, Node::new(a, b, weight));
        nodes.insert(b, Node::new(b, a, weight));
        Self {
            nodes,
            sums: SumSet::single(weight),
        }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node(&self, index: NodeId) -> Option<&Node> {
        self.nodes.get(&index)
    }

    pub fn contains(&self, index: NodeId) -> bool {
        self.nodes.contains_key(&index)
    }

    /// ノードを番号順に列挙
    pub fn nodes(&self) -> impl Iterator<Item = &Node> + '_ {
        self.nodes.values()
    }

    pub fn node_ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes.keys().copied()
    }

    pub fn sums(&self) -> &SumSet {
        &self.sums
    }

    /// 葉や橋を付ける候補ノード。
    /// 2 ノードの木は両端が対称なので先頭の 1 つだけ。
    pub fn attach_points(&self) -> Vec<NodeId> {
        if self.nodes.len() == 2 {
            self.node_ids().take(1).collect()
        } else {
            self.node_ids().collect()
        }
    }

    /// `start` から各ノードへの経路和に `starting_weight` を足したもの。
    ///
    /// 明示的なスタックで辿り、直前のノードへ戻る辺だけを除外する。
    /// 新たに到達したノード 1 つにつき和を 1 つ記録するので、結果の長さは
    /// `len() - 1`。`start` が存在しなければ `None`。
    pub fn path_sums_from(&self, start: NodeId, starting_weight: Weight) -> Option<Vec<Weight>> {
        let mut out = Vec::with_capacity(self.nodes.len().saturating_sub(1));
        let mut stack: Vec<(NodeId, Option<NodeId>, Weight)> = vec![(start, None, starting_weight)];

        while let Some((at, previous, acc)) = stack.pop() {
            let node = self.nodes.get(&at)?;
            for link in node.adjacency() {
                if Some(link.to) == previous {
                    continue;
                }
                let sum = acc + link.weight;
                out.push(sum);
                stack.push((link.to, Some(at), sum));
            }
        }
        Some(out)
    }

    /// `parent` に重み `weight` の葉を付けた場合に生まれる経路和（変更はしない）
    pub fn leaf_sums(&self, parent: NodeId, weight: Weight) -> Option<Vec<Weight>> {
        let mut sums = self.path_sums_from(parent, weight)?;
        sums.push(weight);
        Some(sums)
    }

    /// 葉を追加し、新しい葉から既存ノードへの経路和を返す。
    /// 既存ノード同士の和は変わらないので再計算しない。
    pub fn attach_leaf(&mut self, parent: NodeId, new_index: NodeId, weight: Weight) -> Option<Vec<Weight>> {
        if self.nodes.contains_key(&new_index) {
            return None;
        }
        self.nodes.get_mut(&parent)?.link(new_index, weight);
        self.nodes.insert(new_index, Node::new(new_index, parent, weight));

        let sums = self.path_sums_from(new_index, 0)?;
        self.record_sums(&sums);
        Some(sums)
    }

    /// 別の木を橋でつないで吸収する。
    /// `bridge_sums` は橋によって新たに生まれた全ての和。
    pub(crate) fn absorb(
        &mut self,
        child: Tree,
        parent_node: NodeId,
        child_node: NodeId,
        bridge_weight: Weight,
        bridge_sums: &[Weight],
    ) {
        let Tree {
            nodes: child_nodes,
            sums: child_sums,
        } = child;

        self.nodes.extend(child_nodes);
        if let Some(node) = self.nodes.get_mut(&parent_node) {
            node.link(child_node, bridge_weight);
        }
        if let Some(node) = self.nodes.get_mut(&child_node) {
            node.link(parent_node, bridge_weight);
        }

        let inherited: Vec<Weight> = child_sums.iter().collect();
        self.record_sums(&inherited);
        self.record_sums(bridge_sums);
    }

    fn record_sums(&mut self, sums: &[Weight]) {
        let accepted = self.sums.try_extend(sums);
        debug_assert!(accepted, "木の中で経路和が重複しました: {:?}", sums);
    }

    /// 全ての辺 (小さい番号, 大きい番号, 重み) を番号順に
    pub fn edges(&self) -> Vec<(NodeId, NodeId, Weight)> {
        let mut edges: Vec<_> = self
            .nodes()
            .flat_map(|n| {
                n.adjacency()
                    .iter()
                    .filter(move |l| n.index() < l.to)
                    .map(move |l| (n.index(), l.to, l.weight))
            })
            .collect();
        edges.sort_unstable();
        edges
    }
}

impl fmt::Display for Tree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sums: Vec<String> = self.sums.iter().map(|s| s.to_string()).collect();
        writeln!(f, "sums: {}", sums.join(", "))?;
        for node in self.nodes() {
            writeln!(f, "{}", node)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 0 -1- 1 -3- 2 -2- 3 の道
    fn path_tree() -> Tree {
        let mut t = Tree::seed(0, 1, 1);
        t.attach_leaf(1, 2, 3).unwrap();
        t.attach_leaf(2, 3, 2).unwrap();
        t
    }

    #[test]
    fn seed_has_single_sum() {
        let t = Tree::seed(4, 5, 7);
        assert_eq!(t.len(), 2);
        assert_eq!(t.sums().as_slice(), &[7]);
        assert_eq!(t.attach_points(), vec![4]);
    }

    #[test]
    fn path_sums_from_end_of_path() {
        let t = path_tree();
        let mut sums = t.path_sums_from(0, 0).unwrap();
        sums.sort_unstable();
        assert_eq!(sums, vec![1, 4, 6]);
    }

    #[test]
    fn path_sums_from_adds_starting_weight() {
        let t = path_tree();
        let mut sums = t.path_sums_from(2, 10).unwrap();
        sums.sort_unstable();
        // 2->1 = 3, 2->3 = 2, 2->0 = 4
        assert_eq!(sums, vec![12, 13, 14]);
    }

    #[test]
    fn path_sums_from_unknown_start_is_none() {
        assert!(path_tree().path_sums_from(9, 0).is_none());
    }

    #[test]
    fn attach_leaf_returns_sums_to_existing_nodes() {
        let mut t = Tree::seed(0, 1, 1);
        let mut sums = t.attach_leaf(0, 2, 2).unwrap();
        sums.sort_unstable();
        assert_eq!(sums, vec![2, 3]);
        assert_eq!(t.sums().as_slice(), &[1, 2, 3]);
        assert_eq!(t.node(0).unwrap().degree(), 2);
    }

    #[test]
    fn leaf_sums_predicts_attach_leaf() {
        let t = path_tree();
        let mut predicted = t.leaf_sums(1, 7).unwrap();
        let mut grown = t.clone();
        let mut actual = grown.attach_leaf(1, 4, 7).unwrap();
        predicted.sort_unstable();
        actual.sort_unstable();
        assert_eq!(predicted, actual);
        assert_eq!(actual, vec![7, 8, 10, 12]);
        // 元の木は変わらない
        assert_eq!(t.len(), 4);
    }

    #[test]
    fn attach_leaf_to_missing_parent_fails() {
        let mut t = Tree::seed(0, 1, 1);
        assert!(t.attach_leaf(7, 2, 2).is_none());
        assert_eq!(t.len(), 2);
    }

    #[test]
    fn attach_points_cover_all_nodes_when_larger() {
        assert_eq!(path_tree().attach_points(), vec![0, 1, 2, 3]);
    }

    #[test]
    fn edges_are_listed_once() {
        assert_eq!(path_tree().edges(), vec![(0, 1, 1), (1, 2, 3), (2, 3, 2)]);
    }

    #[test]
    fn display_renders_sums_and_nodes() {
        let t = Tree::seed(0, 1, 1);
        assert_eq!(t.to_string(), "sums: 1\n0 -> (1, 1)\n1 -> (0, 1)\n");
    }
}
