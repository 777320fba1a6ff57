// 詳細ログ（ファイル出力）

use anyhow::{Context, Result};
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, OnceLock};
use std::time::Instant;

/// グローバルな詳細ログフラグ
pub static VERBOSE_LOGGING: AtomicBool = AtomicBool::new(false);

/// ログファイルのグローバルハンドル
static LOG_FILE: Mutex<Option<File>> = Mutex::new(None);

/// 経過時間の基準
static STARTED: OnceLock<Instant> = OnceLock::new();

/// ログファイルを初期化する（既存の内容は消える）
pub fn init_log_file(path: &Path) -> Result<()> {
    let file = OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(path)
        .with_context(|| format!("ログファイルを開けません: {}", path.display()))?;

    STARTED.get_or_init(Instant::now);
    let mut log_file = LOG_FILE
        .lock()
        .map_err(|_| anyhow::anyhow!("ログファイルのロックが壊れています"))?;
    *log_file = Some(file);
    Ok(())
}

/// ログファイルを閉じる
pub fn close_log_file() {
    if let Ok(mut log_file) = LOG_FILE.lock() {
        if let Some(mut file) = log_file.take() {
            let _ = file.flush();
        }
    }
}

/// ログをファイルに書き込む（ファイル未設定なら標準エラー）
pub fn write_log(message: &str) {
    let elapsed = STARTED.get_or_init(Instant::now).elapsed().as_secs_f64();
    let line = format!("[{:>9.3}s] {}", elapsed, message);

    if let Ok(mut log_file) = LOG_FILE.lock() {
        if let Some(ref mut file) = *log_file {
            let _ = writeln!(file, "{}", line);
            let _ = file.flush();
            return;
        }
    }
    eprintln!("{}", line);
}

/// 詳細ログの有効・無効を切り替える
pub fn set_verbose(enabled: bool) {
    VERBOSE_LOGGING.store(enabled, Ordering::Relaxed);
}

/// 詳細ログが有効かチェック
pub fn is_verbose() -> bool {
    VERBOSE_LOGGING.load(Ordering::Relaxed)
}

/// 詳細ログ出力マクロ
#[macro_export]
macro_rules! vlog {
    ($($arg:tt)*) => {
        if $crate::logging::is_verbose() {
            let message = format!($($arg)*);
            $crate::logging::write_log(&message);
        }
    };
}
