// 並列実行管理

use anyhow::{Context, Result};
use rayon::{ThreadPool, ThreadPoolBuilder};

/// 並列実行設定
#[derive(Clone, Debug)]
pub struct ParallelConfig {
    /// ワーカースレッド数
    pub num_workers: usize,
    /// ワーカー 1 つあたりに用意する初期状態の数
    pub frontier_per_worker: usize,
}

impl Default for ParallelConfig {
    fn default() -> Self {
        Self {
            num_workers: num_cpus::get(),
            frontier_per_worker: 8,
        }
    }
}

impl ParallelConfig {
    pub fn new(num_workers: usize) -> Self {
        Self {
            num_workers,
            ..Self::default()
        }
    }

    pub fn with_frontier_per_worker(mut self, frontier_per_worker: usize) -> Self {
        self.frontier_per_worker = frontier_per_worker;
        self
    }

    /// 並列に入る前に集める状態数の目安
    pub fn frontier_target(&self) -> usize {
        (self.num_workers * self.frontier_per_worker).max(1)
    }
}

/// 専用の rayon プールで探索を実行するエグゼキューター
pub struct ParallelExecutor {
    config: ParallelConfig,
    pool: ThreadPool,
}

impl ParallelExecutor {
    pub fn new(config: ParallelConfig) -> Result<Self> {
        let pool = ThreadPoolBuilder::new()
            .num_threads(config.num_workers.max(1))
            .thread_name(|i| format!("forest-search-{}", i))
            .build()
            .context("探索スレッドプールを作成できません")?;
        Ok(Self { config, pool })
    }

    /// プール内で処理を実行
    pub fn install<R, F>(&self, op: F) -> R
    where
        F: FnOnce() -> R + Send,
        R: Send,
    {
        self.pool.install(op)
    }

    /// ワーカー数を取得
    pub fn num_workers(&self) -> usize {
        self.pool.current_num_threads()
    }

    /// 設定を取得
    pub fn config(&self) -> &ParallelConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rayon::prelude::*;

    #[test]
    fn parallel_config_default() {
        let config = ParallelConfig::default();
        assert!(config.num_workers > 0);
        assert_eq!(config.frontier_per_worker, 8);
    }

    #[test]
    fn parallel_config_frontier_target() {
        let config = ParallelConfig::new(4).with_frontier_per_worker(16);
        assert_eq!(config.num_workers, 4);
        assert_eq!(config.frontier_target(), 64);
        assert_eq!(ParallelConfig::new(0).with_frontier_per_worker(0).frontier_target(), 1);
    }

    #[test]
    fn executor_uses_requested_workers() {
        let executor = ParallelExecutor::new(ParallelConfig::new(3)).unwrap();
        assert_eq!(executor.num_workers(), 3);
        let inside = executor.install(rayon::current_num_threads);
        assert_eq!(inside, 3);
    }

    #[test]
    fn executor_runs_parallel_work() {
        let executor = ParallelExecutor::new(ParallelConfig::new(2)).unwrap();
        let total: u64 = executor.install(|| (1..=100u64).into_par_iter().sum());
        assert_eq!(total, 5050);
    }
}
