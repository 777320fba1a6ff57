// 森探索サービス

use anyhow::{anyhow, Context, Result};
use crossbeam_channel::Sender;
use std::path::Path;

use crate::application::search::{SearchEngine, SearchEvent};
use crate::domain::search::{SearchConfig, SearchOutcome};

/// 探索を管理するサービス
pub struct ForestSearchService {
    events: Option<Sender<SearchEvent>>,
}

impl ForestSearchService {
    pub fn new() -> Self {
        Self { events: None }
    }

    /// 進捗イベントの送信先を設定
    pub fn with_events(mut self, tx: Sender<SearchEvent>) -> Self {
        self.events = Some(tx);
        self
    }

    /// 入力の検証
    pub fn validate_inputs(&self, config: &SearchConfig, output_path: Option<&Path>) -> Result<()> {
        config.validate().context("検索設定が不正です")?;

        // 出力パスのディレクトリが存在するかチェック
        if let Some(parent) = output_path.and_then(Path::parent) {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                return Err(anyhow!(
                    "出力ディレクトリが存在しません: {}",
                    parent.display()
                ));
            }
        }

        Ok(())
    }

    /// 探索を実行（メインユースケース）
    pub fn run(&self, config: SearchConfig) -> Result<SearchOutcome> {
        self.validate_inputs(&config, None)
            .context("入力の検証に失敗しました")?;

        self.log(format!(
            "探索開始: 最大ノード数={} / {}",
            config.max_nodes.get(),
            match config.parallel {
                Some(w) => format!("並列 {} ワーカー", w.get()),
                None => "逐次".to_string(),
            }
        ));

        let mut engine = SearchEngine::new(config);
        if let Some(tx) = &self.events {
            engine = engine.with_events(tx.clone());
        }
        engine.run().context("探索に失敗しました")
    }

    fn log(&self, message: String) {
        if let Some(tx) = &self.events {
            let _ = tx.send(SearchEvent::Log(message));
        }
    }
}

impl Default for ForestSearchService {
    fn default() -> Self {
        Self::new()
    }
}
