//! # HTML Reporting Module / HTML 报告模块
//!
//! This module renders a self-contained HTML page for a batch: totals, a row
//! per test case with its status and elapsed time, and the captured driver
//! output of failed cases in collapsible blocks.
//!
//! 此模块为批处理渲染一个独立的 HTML 页面：汇总数据、每个测试用例一行
//! （包含状态和耗时），以及失败用例的驱动输出（可折叠）。

use anyhow::{Context, Result};
use maud::{html, Markup, PreEscaped, DOCTYPE};
use std::fs;
use std::path::Path;

use crate::core::models::{format_elapsed, BatchReport, RunResult};
use crate::infra::fs::ensure_parent_dir;
use crate::infra::t;

/// Embedded CSS styles for HTML reports / HTML 报告的嵌入式 CSS 样式
const HTML_STYLE: &str = r#"
body { font-family: -apple-system, "Segoe UI", Helvetica, Arial, sans-serif; margin: 2rem; color: #222; }
h1 { font-size: 1.6rem; }
.meta { color: #666; margin-bottom: 1rem; }
.summary-container { display: flex; gap: 1rem; margin-bottom: 1.5rem; }
.summary-item { border: 1px solid #ddd; border-radius: 6px; padding: 0.6rem 1rem; text-align: center; }
.summary-item .count { display: block; font-size: 1.4rem; font-weight: bold; }
.passed-text { color: #2e7d32; }
.failed-text { color: #c62828; }
.skipped-text { color: #757575; }
table { border-collapse: collapse; width: 100%; }
th, td { border-bottom: 1px solid #eee; padding: 0.4rem 0.6rem; text-align: left; }
.seconds-cell { text-align: right; font-family: monospace; }
.status-cell { display: inline-block; padding: 0.1rem 0.5rem; border-radius: 4px; color: #fff; }
.status-passed { background: #2e7d32; }
.status-failed { background: #c62828; }
.status-skipped { background: #9e9e9e; }
details pre { background: #f6f8fa; padding: 0.6rem; overflow-x: auto; }
"#;

/// Renders the report page.
pub fn render_html_report(report: &BatchReport, locale: &str) -> Markup {
    html! {
        (DOCTYPE)
        html {
            head {
                meta charset="utf-8";
                title { (t!("html_report.title", locale = locale)) }
                style { (PreEscaped(HTML_STYLE)) }
            }
            body {
                h1 { (t!("html_report.main_header", locale = locale)) }
                p class="meta" {
                    (t!(
                        "html_report.generated",
                        locale = locale,
                        started = report.started_at.format("%Y-%m-%d %H:%M:%S"),
                        finished = report.finished_at.format("%Y-%m-%d %H:%M:%S")
                    ))
                }
                div class="summary-container" {
                    (summary_item(report.results.len(), "", &t!("html_report.summary.total", locale = locale)))
                    (summary_item(report.passed_count(), "passed-text", &t!("html_report.summary.passed", locale = locale)))
                    (summary_item(report.failed_count(), "failed-text", &t!("html_report.summary.failed", locale = locale)))
                    (summary_item(report.skipped_count(), "skipped-text", &t!("html_report.summary.skipped", locale = locale)))
                }
                table {
                    thead {
                        tr {
                            th { (t!("html_report.table.header.name", locale = locale)) }
                            th { (t!("html_report.table.header.status", locale = locale)) }
                            th class="seconds-cell" { (t!("html_report.table.header.seconds", locale = locale)) }
                        }
                    }
                    tbody {
                        @for result in &report.results {
                            (result_row(result, locale))
                        }
                    }
                }
            }
        }
    }
}

fn summary_item(count: usize, class: &str, label: &str) -> Markup {
    html! {
        div class="summary-item" {
            span class={ "count " (class) } { (count) }
            span class="label" { (label) }
        }
    }
}

fn result_row(result: &RunResult, locale: &str) -> Markup {
    let seconds = result
        .duration()
        .map(format_elapsed)
        .unwrap_or_else(|| "N/A".to_string());

    html! {
        tr {
            td { (result.case_name()) }
            td {
                span class={ "status-cell " (result.status_class()) } { (result.status_str(locale)) }
                @if let RunResult::Failed { output, .. } = result {
                    details {
                        summary { (t!("html_report.toggle_output", locale = locale)) }
                        pre { (output) }
                    }
                }
            }
            td class="seconds-cell" { (seconds) }
        }
    }
}

/// Generates the HTML report for a batch and writes it to `output_path`.
///
/// 为批处理生成 HTML 报告并写入 `output_path`。
///
/// # Errors / 错误
/// Fails if the file or its parent directory cannot be written.
pub fn generate_html_report(report: &BatchReport, output_path: &Path, locale: &str) -> Result<()> {
    let markup = render_html_report(report, locale);
    ensure_parent_dir(output_path)?;
    fs::write(output_path, markup.into_string())
        .with_context(|| format!("Failed to write HTML report: {}", output_path.display()))
}
