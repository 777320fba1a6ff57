// 探索定数とユーティリティ型定義

use nohash_hasher::BuildNoHashHasher;
pub use dashmap::DashMap;

/// ノード番号（森全体で一意）
pub type NodeId = u32;
/// 辺の重み・経路和
pub type Weight = u32;

/// 初期木（2ノード）の辺の重み
pub const SEED_WEIGHT: Weight = 1;
/// 欠番探索の開始値（1 は初期辺が必ず使う）
pub const FIRST_FREE_SUM: Weight = 2;

/// 探索可能なノード数の範囲
pub const MIN_NODES: usize = 2;
pub const MAX_NODES_LIMIT: usize = 24;

/// 統計を集約スレッドへ送る間隔（評価した森の数）
pub const STAT_FLUSH_INTERVAL: u64 = 4096;

// ノード数キー専用のノーハッシュ
pub type DCountMap<V> = DashMap<usize, V, BuildNoHashHasher<usize>>;

/// n 個の中から 2 個選ぶ組合せ数
pub const fn n_choose_2(n: usize) -> usize {
    if n < 2 {
        0
    } else {
        n * (n - 1) / 2
    }
}
