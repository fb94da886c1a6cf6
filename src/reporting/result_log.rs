//! # Result Log Module / 结果日志模块
//!
//! The CSV result log: a header row `test_case,seconds` followed by one row
//! per completed test case. A `ResultLog` is owned by a single run and every
//! row is flushed as soon as it is written, so an interrupted run still
//! leaves all completed rows on disk.
//!
//! CSV 结果日志：表头 `test_case,seconds`，之后每个已完成的测试用例一行。
//! `ResultLog` 由单次运行独占，每行写入后立即刷新，
//! 因此即使运行被中断，所有已完成的行仍保留在磁盘上。

use anyhow::{Context, Result};
use csv::{Writer, WriterBuilder};
use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::core::models::RunRecord;
use crate::infra::fs::ensure_parent_dir;

/// Column names of the result log.
pub const HEADER: [&str; 2] = ["test_case", "seconds"];

pub struct ResultLog<W: Write> {
    writer: Writer<W>,
    rows: usize,
}

impl ResultLog<File> {
    /// Creates or truncates the log file and writes the header row.
    /// Any previous content is discarded.
    ///
    /// 创建或截断日志文件并写入表头。之前的内容将被丢弃。
    pub fn create(path: &Path) -> Result<Self> {
        ensure_parent_dir(path)?;
        let file = File::create(path)
            .with_context(|| format!("Failed to create result log: {}", path.display()))?;
        Self::from_writer(file)
    }
}

impl<W: Write> ResultLog<W> {
    /// Wraps any writer and writes the header row to it.
    pub fn from_writer(inner: W) -> Result<Self> {
        let mut writer = WriterBuilder::new().has_headers(false).from_writer(inner);
        writer
            .write_record(HEADER)
            .context("Failed to write result log header")?;
        writer.flush().context("Failed to flush result log")?;
        Ok(Self { writer, rows: 0 })
    }

    /// Appends one row and flushes it.
    pub fn append(&mut self, record: &RunRecord) -> Result<()> {
        self.writer
            .write_record([record.test_case.as_str(), record.seconds().as_str()])
            .with_context(|| format!("Failed to write result row for {}", record.test_case))?;
        self.writer.flush().context("Failed to flush result log")?;
        self.rows += 1;
        Ok(())
    }

    /// Number of data rows written so far, header excluded.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Flushes and returns the underlying writer.
    pub fn into_inner(self) -> Result<W> {
        self.writer
            .into_inner()
            .map_err(|e| anyhow::anyhow!("Failed to flush result log: {}", e.error()))
    }
}
