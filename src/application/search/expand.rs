// 後続状態の生成 - 葉の追加・成分の結合・苗木の追加

use crate::application::search::event::StatDelta;
use crate::constants::Weight;
use crate::domain::forest::{ComponentId, Forest};
use crate::prof;

/// 結合を試す (親, 子) の組。主木は常に親、苗木同士は前にある方が親。
pub fn component_pairs(forest: &Forest) -> Vec<(ComponentId, ComponentId)> {
    let n = forest.seedlings().len();
    let mut pairs = Vec::with_capacity(n + n * n.saturating_sub(1) / 2);
    for j in 0..n {
        pairs.push((ComponentId::Main, ComponentId::Seedling(j)));
    }
    for i in 0..n {
        for k in (i + 1)..n {
            pairs.push((ComponentId::Seedling(i), ComponentId::Seedling(k)));
        }
    }
    pairs
}

/// 全成分の各接続点に重み `weight` の葉を付けた森
pub fn grow_leaves(forest: &Forest, weight: Weight, stats: &mut StatDelta) -> Vec<Forest> {
    let mut out = Vec::new();
    for (id, tree) in forest.components() {
        for node in tree.attach_points() {
            let mut next = forest.clone();
            if next.add_leaf(id, node, weight) {
                stats.leaves_accepted += 1;
                out.push(next);
            } else {
                stats.leaves_rejected += 1;
            }
        }
    }
    out
}

/// 全ての成分の組を重み `weight` の橋で結合した森
pub fn join_components(forest: &Forest, weight: Weight, stats: &mut StatDelta) -> Vec<Forest> {
    let mut out = Vec::new();
    for (parent, child) in component_pairs(forest) {
        let (Some(parent_tree), Some(child_tree)) = (forest.component(parent), forest.component(child))
        else {
            continue;
        };
        let child_points = child_tree.attach_points();
        for parent_node in parent_tree.attach_points() {
            for &child_node in &child_points {
                let mut next = forest.clone();
                if next.merge_components(parent, parent_node, child, child_node, weight) {
                    stats.merges_accepted += 1;
                    out.push(next);
                } else {
                    stats.merges_rejected += 1;
                }
            }
        }
    }
    out
}

/// 重み `weight` の苗木を 1 つ追加した森
pub fn plant_seedling(forest: &Forest, weight: Weight, stats: &mut StatDelta) -> Forest {
    let mut next = forest.clone();
    next.add_disjoint_component(weight);
    stats.seedlings_planted += 1;
    next
}

/// 1 つの状態から生まれる全ての後続状態。
/// スタックに積む順（葉 → 結合 → 苗木）で返す。
pub fn expand(forest: &Forest, max_nodes: usize, profile: bool, stats: &mut StatDelta) -> Vec<Forest> {
    let nodes = forest.node_count();
    let weight = forest.missing_sum();
    let mut out = Vec::new();

    if nodes < max_nodes {
        let leaves = prof!(profile, stats.times.leaves, grow_leaves(forest, weight, stats));
        out.extend(leaves);
    }
    if nodes <= max_nodes && !forest.is_single_component() {
        let joined = prof!(profile, stats.times.merges, join_components(forest, weight, stats));
        out.extend(joined);
    }
    if nodes + 1 < max_nodes {
        let planted = prof!(profile, stats.times.seedlings, plant_seedling(forest, weight, stats));
        out.push(planted);
    }
    out
}
