// 森の状態表現 - ノード・木・森と経路和の集合

pub mod forest;
pub mod node;
pub mod sums;
pub mod tree;

pub use forest::{CanonicalKey, ComponentId, Forest};
pub use node::{Link, Node};
pub use sums::{has_internal_duplicate, SumSet};
pub use tree::Tree;
