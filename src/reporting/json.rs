//! # JSON Reporting Module / JSON 报告模块
//!
//! Writes the batch report as pretty-printed JSON for other tools to consume.

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

use crate::core::models::BatchReport;
use crate::infra::fs::ensure_parent_dir;

/// Serializes `report` to `output_path`, replacing any existing file.
///
/// 将 `report` 序列化到 `output_path`，替换已存在的文件。
pub fn write_json_report(report: &BatchReport, output_path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(report).context("Failed to serialize JSON report")?;
    ensure_parent_dir(output_path)?;
    fs::write(output_path, json)
        .with_context(|| format!("Failed to write JSON report: {}", output_path.display()))
}
