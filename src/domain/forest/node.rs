// ノード - 番号と重み付き隣接リスト

use crate::constants::{NodeId, Weight};
use serde::{Deserialize, Serialize};
use std::fmt;

/// 隣接ノードへの重み付き辺
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Link {
    pub to: NodeId,
    pub weight: Weight,
}

/// 木の頂点
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Node {
    index: NodeId,
    adjacency: Vec<Link>,
}

impl Node {
    /// 1 本の辺を持つノードを作成
    pub fn new(index: NodeId, to: NodeId, weight: Weight) -> Self {
        Self {
            index,
            adjacency: vec![Link { to, weight }],
        }
    }

    pub fn index(&self) -> NodeId {
        self.index
    }

    pub fn adjacency(&self) -> &[Link] {
        &self.adjacency
    }

    pub fn degree(&self) -> usize {
        self.adjacency.len()
    }

    pub(crate) fn link(&mut self, to: NodeId, weight: Weight) {
        self.adjacency.push(Link { to, weight });
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> ", self.index)?;
        for link in &self.adjacency {
            write!(f, "({}, {})", link.to, link.weight)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_lists_every_link() {
        let mut node = Node::new(0, 1, 1);
        node.link(2, 3);
        assert_eq!(node.to_string(), "0 -> (1, 1)(2, 3)");
        assert_eq!(node.degree(), 2);
    }
}
