// レポートの書き込み

use anyhow::{Context, Result};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::vlog;

/// 整形済みレポートを書き込むためのtrait
pub trait ReportWriter: Send {
    /// 文字列をそのまま書き込む
    fn write_chunk(&mut self, chunk: &str) -> Result<()>;

    /// 複数行をまとめて書き込む
    fn write_lines(&mut self, lines: &[String]) -> Result<()> {
        for line in lines {
            self.write_chunk(line)?;
            self.write_chunk("\n")?;
        }
        Ok(())
    }

    /// 書き込みを完了（フラッシュ）
    fn flush(&mut self) -> Result<()>;

    /// 書き込んだバイト数
    fn bytes_written(&self) -> u64;
}

/// ファイルへの書き込み実装
pub struct FileReportWriter {
    writer: BufWriter<File>,
    path: PathBuf,
    bytes: u64,
}

impl FileReportWriter {
    /// 新しいファイルライターを作成
    pub fn create(path: &Path) -> Result<Self> {
        let file = File::create(path)
            .with_context(|| format!("出力ファイルを作成できません: {}", path.display()))?;
        Ok(Self {
            writer: BufWriter::new(file),
            path: path.to_path_buf(),
            bytes: 0,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ReportWriter for FileReportWriter {
    fn write_chunk(&mut self, chunk: &str) -> Result<()> {
        self.writer
            .write_all(chunk.as_bytes())
            .with_context(|| format!("書き込みに失敗しました: {}", self.path.display()))?;
        self.bytes += chunk.len() as u64;
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        self.writer
            .flush()
            .with_context(|| format!("フラッシュに失敗しました: {}", self.path.display()))?;
        Ok(())
    }

    fn bytes_written(&self) -> u64 {
        self.bytes
    }
}

impl Drop for FileReportWriter {
    fn drop(&mut self) {
        let _ = self.writer.flush();
    }
}

/// 標準出力への書き込み実装
#[derive(Default)]
pub struct ConsoleReportWriter {
    bytes: u64,
}

impl ConsoleReportWriter {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ReportWriter for ConsoleReportWriter {
    fn write_chunk(&mut self, chunk: &str) -> Result<()> {
        io::stdout()
            .lock()
            .write_all(chunk.as_bytes())
            .context("標準出力への書き込みに失敗しました")?;
        self.bytes += chunk.len() as u64;
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        io::stdout().flush().context("標準出力のフラッシュに失敗しました")?;
        Ok(())
    }

    fn bytes_written(&self) -> u64 {
        self.bytes
    }
}

/// メモリ内書き込み実装（テスト用）
#[derive(Default)]
pub struct MemoryReportWriter {
    buffer: String,
}

impl MemoryReportWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contents(&self) -> &str {
        &self.buffer
    }
}

impl ReportWriter for MemoryReportWriter {
    fn write_chunk(&mut self, chunk: &str) -> Result<()> {
        self.buffer.push_str(chunk);
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        Ok(())
    }

    fn bytes_written(&self) -> u64 {
        self.buffer.len() as u64
    }
}

/// 実際に書き込んだ先
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum WriteTarget {
    File(PathBuf),
    Console,
}

/// ファイルに書き込み、失敗したら標準出力に書き出す
pub fn write_with_fallback(path: &Path, report: &str) -> Result<WriteTarget> {
    write_with_fallback_to(path, report, &mut ConsoleReportWriter::new())
}

/// ファイルに書き込み、失敗したら `fallback` に書き出す
pub fn write_with_fallback_to<W: ReportWriter>(
    path: &Path,
    report: &str,
    fallback: &mut W,
) -> Result<WriteTarget> {
    match write_file(path, report) {
        Ok(()) => Ok(WriteTarget::File(path.to_path_buf())),
        Err(e) => {
            vlog!("ファイル出力に失敗したため標準出力に書き出します: {:#}", e);
            eprintln!("警告: {:#}", e);
            fallback.write_chunk(report)?;
            fallback.flush()?;
            Ok(WriteTarget::Console)
        }
    }
}

fn write_file(path: &Path, report: &str) -> Result<()> {
    let mut writer = FileReportWriter::create(path)?;
    writer.write_chunk(report)?;
    writer.flush()
}
