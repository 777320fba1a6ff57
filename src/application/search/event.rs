// 探索のイベント定義（表示層に依存しない）

use crate::domain::search::SearchSummary;
use crate::profiling::PhaseTimes;

/// 統計の増分（探索エンジン内部で使用）
#[derive(Clone, Copy, Default, Debug, PartialEq)]
pub struct StatDelta {
    pub evaluated: u64,
    pub leaves_accepted: u64,
    pub leaves_rejected: u64,
    pub merges_accepted: u64,
    pub merges_rejected: u64,
    pub seedlings_planted: u64,
    pub times: PhaseTimes,
}

impl StatDelta {
    pub fn has_any(&self) -> bool {
        self.evaluated > 0
            || self.leaves_accepted > 0
            || self.leaves_rejected > 0
            || self.merges_accepted > 0
            || self.merges_rejected > 0
            || self.seedlings_planted > 0
            || self.times.has_any()
    }

    /// 中身を取り出してゼロに戻す
    pub fn take(&mut self) -> Self {
        std::mem::take(self)
    }

    /// サマリーに加算
    pub fn apply_to(&self, summary: &mut SearchSummary) {
        summary.forests_evaluated += self.evaluated;
        summary.leaves_accepted += self.leaves_accepted;
        summary.leaves_rejected += self.leaves_rejected;
        summary.merges_accepted += self.merges_accepted;
        summary.merges_rejected += self.merges_rejected;
        summary.seedlings_planted += self.seedlings_planted;
    }
}

/// 検索進捗の統計情報
#[derive(Clone, Debug, Default)]
pub struct SearchProgress {
    pub searching: bool,
    pub forests_evaluated: u64,
    pub successors: u64,
    pub rejected: u64,
    pub elapsed_seconds: f64,
    pub search_rate: f64,
}

impl SearchProgress {
    pub fn from_summary(summary: &SearchSummary, searching: bool) -> Self {
        Self {
            searching,
            forests_evaluated: summary.forests_evaluated,
            successors: summary.successors(),
            rejected: summary.rejected(),
            elapsed_seconds: summary.elapsed_seconds,
            search_rate: summary.forests_per_second,
        }
    }
}

/// 検索エンジンからのイベント
#[derive(Clone, Debug)]
pub enum SearchEvent {
    /// ログメッセージ
    Log(String),
    /// 進捗更新
    Progress(SearchProgress),
    /// 検索完了
    Finished(SearchProgress),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn take_resets_delta() {
        let mut d = StatDelta {
            evaluated: 3,
            merges_rejected: 2,
            ..StatDelta::default()
        };
        assert!(d.has_any());
        let out = d.take();
        assert_eq!(out.evaluated, 3);
        assert!(!d.has_any());
    }

    #[test]
    fn apply_to_accumulates_summary() {
        let d = StatDelta {
            evaluated: 5,
            leaves_accepted: 2,
            leaves_rejected: 1,
            seedlings_planted: 1,
            ..StatDelta::default()
        };
        let mut summary = SearchSummary::default();
        d.apply_to(&mut summary);
        d.apply_to(&mut summary);
        assert_eq!(summary.forests_evaluated, 10);
        assert_eq!(summary.successors(), 6);
        assert_eq!(summary.rejected(), 2);

        let progress = SearchProgress::from_summary(&summary, true);
        assert!(progress.searching);
        assert_eq!(progress.successors, 6);
    }
}
