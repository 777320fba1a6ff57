use std::path::PathBuf;
use std::process;
use std::thread;

use anyhow::{Context, Result};
use clap::Parser;
use crossbeam_channel::unbounded;

use distinct_forest::application::{ForestSearchService, SearchEvent};
use distinct_forest::domain::search::{
    MaxNodes, Objective, ObjectiveSet, SearchConfig, WorkerCount,
};
use distinct_forest::infrastructure::{write_with_fallback, WriteTarget};
use distinct_forest::logging;
use distinct_forest::presentation::{
    format_profile, format_progress, format_summary, render, OutputFormat,
};
use distinct_forest::vlog;

/// 経路和が全て異なる重み付き森を総当たりで探す
#[derive(Parser, Debug)]
#[command(name = "distinct-forest")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// 最大ノード数
    #[arg(short = 'n', long, default_value_t = 10)]
    max_nodes: usize,

    /// 評価基準（min-max-path / near-perfect / perfect-forest、複数指定可。省略時は全て）
    #[arg(long = "objective")]
    objectives: Vec<String>,

    /// 並列探索
    #[arg(short, long)]
    parallel: bool,

    /// 並列探索のワーカー数（省略時は論理 CPU 数）
    #[arg(short, long)]
    workers: Option<usize>,

    /// 出力ファイル（省略時は perfectForestUniques<n>nodes.txt）
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// 出力フォーマット（text / json）
    #[arg(short, long, default_value = "text")]
    format: String,

    /// 詳細ログの出力先
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// 詳細ログを有効にする
    #[arg(short, long)]
    verbose: bool,

    /// フェーズ別時間を計測する
    #[arg(long)]
    profile: bool,
}

impl Cli {
    fn search_config(&self) -> Result<SearchConfig> {
        let max_nodes = MaxNodes::new(self.max_nodes).context("--max-nodes が不正です")?;

        let objectives = if self.objectives.is_empty() {
            ObjectiveSet::all()
        } else {
            self.objectives
                .iter()
                .map(|s| s.parse::<Objective>())
                .collect::<Result<ObjectiveSet>>()
                .context("--objective が不正です")?
        };

        let mut config = SearchConfig::new(max_nodes, objectives);
        config.profile_enabled = self.profile;
        if self.parallel || self.workers.is_some() {
            let workers = match self.workers {
                Some(n) => WorkerCount::new(n).context("--workers が不正です")?,
                None => WorkerCount::available(),
            };
            config = config.with_parallel(workers);
        }
        Ok(config)
    }

    fn output_path(&self, format: OutputFormat) -> PathBuf {
        self.output.clone().unwrap_or_else(|| {
            let ext = match format {
                OutputFormat::Text => "txt",
                OutputFormat::JsonLines => "jsonl",
            };
            PathBuf::from(format!("perfectForestUniques{}nodes.{}", self.max_nodes, ext))
        })
    }
}

fn main() {
    let cli = Cli::parse();
    if let Err(e) = run(&cli) {
        eprintln!("エラー: {:#}", e);
        logging::close_log_file();
        process::exit(1);
    }
    logging::close_log_file();
}

fn run(cli: &Cli) -> Result<()> {
    logging::set_verbose(cli.verbose || cli.log_file.is_some());
    if let Some(path) = &cli.log_file {
        logging::init_log_file(path)?;
    }

    let config = cli.search_config()?;
    let format: OutputFormat = cli.format.parse().context("--format が不正です")?;
    let output = cli.output_path(format);
    vlog!("設定: {:?} / 出力: {}", config, output.display());

    let (tx, rx) = unbounded::<SearchEvent>();
    let service = ForestSearchService::new().with_events(tx);
    service.validate_inputs(&config, Some(&output))?;

    // 進捗表示スレッド
    let printer = thread::spawn(move || {
        for event in rx {
            match event {
                SearchEvent::Log(message) => eprintln!("{}", message),
                SearchEvent::Progress(p) => eprintln!("{}", format_progress(&p)),
                SearchEvent::Finished(p) => {
                    eprintln!("{}", format_progress(&p));
                    break;
                }
            }
        }
    });

    let outcome = service.run(config);
    drop(service);
    let _ = printer.join();
    let outcome = outcome?;

    eprintln!("{}", format_summary(&outcome.summary));
    if let Some(profile) = &outcome.profile {
        eprintln!("{}", format_profile(profile));
    }

    let report = render(&outcome, format)?;
    match write_with_fallback(&output, &report)? {
        WriteTarget::File(path) => eprintln!("結果を書き込みました: {}", path.display()),
        WriteTarget::Console => eprintln!("結果を標準出力に書き出しました"),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_objectives_and_workers() {
        let cli = Cli::parse_from([
            "distinct-forest",
            "-n",
            "6",
            "--objective",
            "perfect-forest",
            "--objective",
            "min-max-path",
            "--workers",
            "2",
        ]);
        let config = cli.search_config().unwrap();
        assert_eq!(config.max_nodes.get(), 6);
        assert_eq!(config.objectives.len(), 2);
        assert!(!config.objectives.contains(Objective::NearPerfect));
        assert_eq!(config.parallel.map(|w| w.get()), Some(2));
    }

    #[test]
    fn rejects_unknown_objective() {
        let cli = Cli::parse_from(["distinct-forest", "--objective", "shortest"]);
        assert!(cli.search_config().is_err());
    }

    #[test]
    fn default_output_names_node_count() {
        let cli = Cli::parse_from(["distinct-forest", "-n", "12"]);
        assert_eq!(
            cli.output_path(OutputFormat::Text),
            PathBuf::from("perfectForestUniques12nodes.txt")
        );
        assert!(cli.search_config().unwrap().parallel.is_none());
    }
}
