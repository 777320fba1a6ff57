// 計測モジュール

use std::time::Duration;

/// 探索フェーズごとの処理時間
#[derive(Default, Clone, Copy, Debug, PartialEq)]
pub struct PhaseTimes {
    /// 記録との比較
    pub evaluate: Duration,
    /// 葉の追加候補の生成と検証
    pub leaves: Duration,
    /// 成分の結合候補の生成と検証
    pub merges: Duration,
    /// 苗木の追加
    pub seedlings: Duration,
}

impl PhaseTimes {
    pub fn total(&self) -> Duration {
        self.evaluate + self.leaves + self.merges + self.seedlings
    }

    pub fn has_any(&self) -> bool {
        self.total() != Duration::ZERO
    }
}

/// 計測結果の合計
#[derive(Default, Clone, Debug, PartialEq)]
pub struct ProfileTotals {
    pub phases: PhaseTimes,
    /// 計測値を受け取ったバッチ数
    pub batches: u64,
}

impl ProfileTotals {
    /// 増分を加算
    pub fn add_delta(&mut self, d: &PhaseTimes) {
        if !d.has_any() {
            return;
        }
        self.phases.evaluate += d.evaluate;
        self.phases.leaves += d.leaves;
        self.phases.merges += d.merges;
        self.phases.seedlings += d.seedlings;
        self.batches += 1;
    }

    pub fn has_any(&self) -> bool {
        self.phases.has_any()
    }

    /// (フェーズ名, 時間) の一覧
    pub fn rows(&self) -> [(&'static str, Duration); 4] {
        [
            ("evaluate", self.phases.evaluate),
            ("leaves", self.phases.leaves),
            ("merges", self.phases.merges),
            ("seedlings", self.phases.seedlings),
        ]
    }
}

/// 計測マクロ：enabled 時のみ計測
#[macro_export]
macro_rules! prof {
    ($enabled:expr, $slot:expr, $e:expr) => {{
        if $enabled {
            let __t0 = std::time::Instant::now();
            let __r = $e;
            $slot += __t0.elapsed();
            __r
        } else {
            $e
        }
    }};
}

/// Duration をミリ秒文字列に整形
pub fn fmt_dur_ms(d: Duration) -> String {
    let ms = d.as_secs_f64() * 1000.0;
    if ms < 1.0 {
        format!("{:.3} ms", ms)
    } else {
        format!("{:.1} ms", ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_delta_accumulates_phases() {
        let mut totals = ProfileTotals::default();
        let d = PhaseTimes {
            evaluate: Duration::from_millis(2),
            merges: Duration::from_millis(3),
            ..PhaseTimes::default()
        };
        totals.add_delta(&d);
        totals.add_delta(&d);
        totals.add_delta(&PhaseTimes::default());
        assert_eq!(totals.phases.evaluate, Duration::from_millis(4));
        assert_eq!(totals.phases.total(), Duration::from_millis(10));
        assert_eq!(totals.batches, 2);
    }

    #[test]
    fn prof_macro_only_measures_when_enabled() {
        let mut slot = Duration::ZERO;
        let v = prof!(false, slot, 1 + 1);
        assert_eq!(v, 2);
        assert_eq!(slot, Duration::ZERO);

        let v = prof!(true, slot, {
            std::thread::sleep(Duration::from_millis(2));
            3
        });
        assert_eq!(v, 3);
        assert!(slot >= Duration::from_millis(2));
    }

    #[test]
    fn fmt_dur_ms_precision() {
        assert_eq!(fmt_dur_ms(Duration::from_micros(500)), "0.500 ms");
        assert_eq!(fmt_dur_ms(Duration::from_millis(12)), "12.0 ms");
    }
}
