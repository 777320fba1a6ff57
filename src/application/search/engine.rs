// 探索エンジン

use anyhow::{anyhow, Result};
use crossbeam_channel::Sender;
use rayon::prelude::*;
use std::collections::VecDeque;

use crate::application::search::aggregator::spawn_aggregator_thread;
use crate::application::search::event::{SearchEvent, StatDelta};
use crate::application::search::expand::expand;
use crate::application::search::tracker::ResultTracker;
use crate::constants::STAT_FLUSH_INTERVAL;
use crate::domain::forest::Forest;
use crate::domain::search::{SearchConfig, SearchOutcome, WorkerCount};
use crate::infrastructure::executor::{ParallelConfig, ParallelExecutor};
use crate::prof;
use crate::vlog;

/// 深さ優先の作業リストで森を列挙し、各状態を記録と比べる。
///
/// 作業リストから取り出した状態を評価し、葉の追加・成分の結合・苗木の追加で
/// 得られる後続状態を積む。後続状態は全て独立した複製なので、
/// 並列探索でも枝同士が状態を共有することはない。
pub struct SearchEngine {
    config: SearchConfig,
    tracker: ResultTracker,
    events: Option<Sender<SearchEvent>>,
}

impl SearchEngine {
    pub fn new(config: SearchConfig) -> Self {
        let tracker = ResultTracker::new(config.max_nodes, config.objectives);
        Self {
            config,
            tracker,
            events: None,
        }
    }

    /// 進捗イベントの送信先を設定
    pub fn with_events(mut self, tx: Sender<SearchEvent>) -> Self {
        self.events = Some(tx);
        self
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    pub fn tracker(&self) -> &ResultTracker {
        &self.tracker
    }

    /// 探索を最後まで実行して記録を返す（ブロッキング）
    pub fn run(self) -> Result<SearchOutcome> {
        self.config.validate()?;
        let (stx, agg_handle) = spawn_aggregator_thread(self.events.clone());

        let searched = match self.config.parallel {
            Some(workers) => self.run_parallel(workers, &stx),
            None => {
                self.run_sequential(&stx);
                Ok(())
            }
        };

        drop(stx);
        let (summary, profile) = agg_handle
            .join()
            .map_err(|_| anyhow!("集約スレッドの終了に失敗しました"))?;
        searched?;

        vlog!(
            "探索完了: 評価 {} / 後続 {} / 棄却 {} / {:.3} 秒",
            summary.forests_evaluated,
            summary.successors(),
            summary.rejected(),
            summary.elapsed_seconds
        );

        let Self { config, tracker, .. } = self;
        let profile = (config.profile_enabled && profile.has_any()).then_some(profile);
        Ok(SearchOutcome {
            config,
            records: tracker.into_records(),
            summary,
            profile,
        })
    }

    /// 初期状態から逐次に深さ優先探索
    fn run_sequential(&self, stx: &Sender<StatDelta>) {
        self.log(format!(
            "逐次探索: 最大ノード数={} / 評価基準={}",
            self.config.max_nodes.get(),
            self.objective_names()
        ));
        self.dfs(Forest::new(), stx);
    }

    /// 幅優先でフロンティアを集めてから、各状態を並列に深さ優先探索
    fn run_parallel(&self, workers: WorkerCount, stx: &Sender<StatDelta>) -> Result<()> {
        let executor = ParallelExecutor::new(ParallelConfig::new(workers.get()))?;
        let target = executor.config().frontier_target();

        let mut frontier = VecDeque::from([Forest::new()]);
        let mut batch = StatDelta::default();
        while frontier.len() < target {
            let Some(forest) = frontier.pop_front() else {
                break;
            };
            frontier.extend(self.visit(&forest, &mut batch));
        }
        if batch.has_any() {
            let _ = stx.send(batch.take());
        }

        self.log(format!(
            "並列探索: 最大ノード数={} / 評価基準={} / ワーカー={} / 初期状態={}",
            self.config.max_nodes.get(),
            self.objective_names(),
            executor.num_workers(),
            frontier.len()
        ));

        let roots: Vec<Forest> = frontier.into();
        executor.install(|| {
            roots
                .into_par_iter()
                .for_each_with(stx.clone(), |stx, root| self.dfs(root, stx));
        });
        Ok(())
    }

    /// `root` 以下を作業リストで深さ優先に探索
    fn dfs(&self, root: Forest, stx: &Sender<StatDelta>) {
        let mut worklist = vec![root];
        let mut batch = StatDelta::default();

        while let Some(forest) = worklist.pop() {
            let successors = self.visit(&forest, &mut batch);
            worklist.extend(successors);

            if batch.evaluated >= STAT_FLUSH_INTERVAL {
                let _ = stx.send(batch.take());
            }
        }

        if batch.has_any() {
            let _ = stx.send(batch.take());
        }
    }

    /// 1 状態を評価し、後続状態を返す
    fn visit(&self, forest: &Forest, batch: &mut StatDelta) -> Vec<Forest> {
        let profile = self.config.profile_enabled;
        batch.evaluated += 1;
        prof!(profile, batch.times.evaluate, {
            self.tracker.evaluate(forest)
        });
        expand(forest, self.config.max_nodes.get(), profile, batch)
    }

    fn objective_names(&self) -> String {
        self.config
            .objectives
            .iter()
            .map(|o| o.key())
            .collect::<Vec<_>>()
            .join(",")
    }

    fn log(&self, message: String) {
        vlog!("{}", message);
        if let Some(tx) = &self.events {
            let _ = tx.send(SearchEvent::Log(message));
        }
    }
}
