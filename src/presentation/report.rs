// 結果レポートの整形

use anyhow::{anyhow, Result};
use serde::Serialize;
use std::fmt::Write as _;
use std::str::FromStr;

use crate::application::search::SearchProgress;
use crate::constants::{NodeId, Weight};
use crate::domain::forest::Forest;
use crate::domain::search::{ForestRecords, SearchOutcome, SearchSummary};
use crate::profiling::{fmt_dur_ms, ProfileTotals};

const BUCKET_RULE: &str = "***********----------------****************";
const FOREST_RULE: &str = "*********************************";

/// 出力フォーマット
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// 人が読むテキスト
    #[default]
    Text,
    /// JSON Lines形式（1行1森）
    JsonLines,
}

impl FromStr for OutputFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "text" | "txt" => Ok(OutputFormat::Text),
            "json" | "jsonl" => Ok(OutputFormat::JsonLines),
            _ => Err(anyhow!("不明な出力フォーマット: {}", s)),
        }
    }
}

/// 指定フォーマットでレポート全体を整形
pub fn render(outcome: &SearchOutcome, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Text => Ok(render_text_report(outcome)),
        OutputFormat::JsonLines => render_json_lines(outcome),
    }
}

/// 実行時間の見出し
pub fn runtime_header(elapsed_seconds: f64) -> String {
    let secs = elapsed_seconds.max(0.0) as u64;
    format!(
        "Runtime: {} seconds = {} minutes = {} hours",
        secs,
        secs / 60,
        secs / 3600
    )
}

/// テキストレポート（有効な評価基準ごとに 1 節）
pub fn render_text_report(outcome: &SearchOutcome) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}\n", runtime_header(outcome.summary.elapsed_seconds));
    for records in &outcome.records {
        render_section(&mut out, records);
    }
    out
}

fn render_section(out: &mut String, records: &ForestRecords) {
    let _ = writeln!(out, "{}\n", records.objective().heading());
    for (nodes, forests) in records.iter() {
        let _ = writeln!(out, "{} nodes\n\n{}\n", nodes, BUCKET_RULE);
        for forest in forests {
            let _ = write!(out, "{}", forest);
            let _ = writeln!(out, "\n{}", FOREST_RULE);
        }
    }
    out.push_str("\n\n");
}

/// JSON Lines の 1 行（記録保持者 1 つ）
#[derive(Debug, Serialize)]
struct ForestLine<'a> {
    objective: &'static str,
    nodes: usize,
    score: Option<usize>,
    sums: &'a [Weight],
    components: Vec<Vec<(NodeId, NodeId, Weight)>>,
}

/// JSON Lines の先頭行
#[derive(Debug, Serialize)]
struct SummaryLine<'a> {
    max_nodes: usize,
    objectives: Vec<&'static str>,
    summary: &'a SearchSummary,
}

/// JSON Lines レポート（先頭にサマリー、以降 1 行 1 森）
pub fn render_json_lines(outcome: &SearchOutcome) -> Result<String> {
    let mut out = String::new();
    let head = SummaryLine {
        max_nodes: outcome.config.max_nodes.get(),
        objectives: outcome.records.iter().map(|r| r.objective().key()).collect(),
        summary: &outcome.summary,
    };
    out.push_str(&serde_json::to_string(&head)?);
    out.push('\n');

    for records in &outcome.records {
        for (nodes, forests) in records.iter() {
            for forest in forests {
                let line = forest_line(records, nodes, forest);
                out.push_str(&serde_json::to_string(&line)?);
                out.push('\n');
            }
        }
    }
    Ok(out)
}

fn forest_line<'a>(records: &ForestRecords, nodes: usize, forest: &'a Forest) -> ForestLine<'a> {
    ForestLine {
        objective: records.objective().key(),
        nodes,
        score: records.objective().score(forest),
        sums: forest.sums().as_slice(),
        components: forest.components().map(|(_, t)| t.edges()).collect(),
    }
}

/// 探索サマリーの表示
pub fn format_summary(summary: &SearchSummary) -> String {
    format!(
        "評価 {} / 後続 {} (葉 {}, 結合 {}, 苗木 {}) / 棄却 {} / {:.3} 秒 / {:.0} 森/秒",
        summary.forests_evaluated,
        summary.successors(),
        summary.leaves_accepted,
        summary.merges_accepted,
        summary.seedlings_planted,
        summary.rejected(),
        summary.elapsed_seconds,
        summary.forests_per_second
    )
}

/// 進捗 1 行
pub fn format_progress(p: &SearchProgress) -> String {
    let state = if p.searching { "探索中" } else { "完了" };
    format!(
        "[{}] 評価 {} / 後続 {} / 棄却 {} / {:.1} 秒 / {:.0} 森/秒",
        state, p.forests_evaluated, p.successors, p.rejected, p.elapsed_seconds, p.search_rate
    )
}

/// フェーズ別時間の表
pub fn format_profile(profile: &ProfileTotals) -> String {
    let total = profile.phases.total().as_secs_f64();
    let mut out = String::from("フェーズ別時間:\n");
    for (name, d) in profile.rows() {
        let ratio = if total > 0.0 {
            d.as_secs_f64() / total * 100.0
        } else {
            0.0
        };
        let _ = writeln!(out, "  {:<10} {:>12} ({:5.1}%)", name, fmt_dur_ms(d), ratio);
    }
    out
}
