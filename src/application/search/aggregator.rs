// 進捗集約スレッド

use crossbeam_channel::{unbounded, Receiver, RecvTimeoutError, Sender};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crate::application::search::event::{SearchEvent, SearchProgress, StatDelta};
use crate::domain::search::SearchSummary;
use crate::profiling::ProfileTotals;

const PROGRESS_INTERVAL: Duration = Duration::from_millis(500);

/// 集約スレッドの最終結果
pub type AggregateResult = (SearchSummary, ProfileTotals);

/// 進捗集約スレッドを起動。
/// 全ての `Sender<StatDelta>` が破棄されると `Finished` を送って終了する。
pub fn spawn_aggregator_thread(
    event_tx: Option<Sender<SearchEvent>>,
) -> (Sender<StatDelta>, JoinHandle<AggregateResult>) {
    let (stx, srx) = unbounded::<StatDelta>();

    let handle = thread::spawn(move || aggregator_thread_main(srx, event_tx));

    (stx, handle)
}

/// 集約スレッドのメイン処理
fn aggregator_thread_main(srx: Receiver<StatDelta>, tx: Option<Sender<SearchEvent>>) -> AggregateResult {
    let t0 = Instant::now();
    let mut summary = SearchSummary::new();
    let mut profile = ProfileTotals::default();
    let mut last_send = Instant::now();

    loop {
        match srx.recv_timeout(PROGRESS_INTERVAL) {
            Ok(d) => {
                d.apply_to(&mut summary);
                profile.add_delta(&d.times);
            }
            Err(RecvTimeoutError::Timeout) => {}
            Err(RecvTimeoutError::Disconnected) => {
                // 全探索スレッドが終了
                stamp_elapsed(&mut summary, t0);
                if let Some(tx) = &tx {
                    let _ = tx.send(SearchEvent::Finished(SearchProgress::from_summary(&summary, false)));
                }
                break;
            }
        }

        // 定期的な進捗通知
        if last_send.elapsed() >= PROGRESS_INTERVAL {
            if let Some(tx) = &tx {
                stamp_elapsed(&mut summary, t0);
                let _ = tx.send(SearchEvent::Progress(SearchProgress::from_summary(&summary, true)));
            }
            last_send = Instant::now();
        }
    }

    (summary, profile)
}

fn stamp_elapsed(summary: &mut SearchSummary, t0: Instant) {
    let dt = t0.elapsed().as_secs_f64();
    summary.elapsed_seconds = dt;
    summary.forests_per_second = if dt > 0.0 {
        summary.forests_evaluated as f64 / dt
    } else {
        0.0
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aggregates_until_senders_drop() {
        let (etx, erx) = unbounded();
        let (stx, handle) = spawn_aggregator_thread(Some(etx));

        let worker = stx.clone();
        worker
            .send(StatDelta {
                evaluated: 10,
                leaves_accepted: 4,
                ..StatDelta::default()
            })
            .unwrap();
        stx.send(StatDelta {
            evaluated: 5,
            merges_rejected: 2,
            ..StatDelta::default()
        })
        .unwrap();
        drop(worker);
        drop(stx);

        let (summary, profile) = handle.join().unwrap();
        assert_eq!(summary.forests_evaluated, 15);
        assert_eq!(summary.successors(), 4);
        assert_eq!(summary.rejected(), 2);
        assert!(!profile.has_any());

        let finished = erx
            .iter()
            .find_map(|e| match e {
                SearchEvent::Finished(p) => Some(p),
                _ => None,
            })
            .unwrap();
        assert!(!finished.searching);
        assert_eq!(finished.forests_evaluated, 15);
    }

    #[test]
    fn runs_without_event_sink() {
        let (stx, handle) = spawn_aggregator_thread(None);
        stx.send(StatDelta {
            evaluated: 1,
            ..StatDelta::default()
        })
        .unwrap();
        drop(stx);
        let (summary, _) = handle.join().unwrap();
        assert_eq!(summary.forests_evaluated, 1);
    }
}
