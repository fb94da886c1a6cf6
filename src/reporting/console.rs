//! # Console Reporting Module / 控制台报告模块
//!
//! This module prints the end-of-run summary table and the captured output
//! of failed cases, with colors and localized text.
//!
//! 此模块打印运行结束时的摘要表格以及失败用例的捕获输出，
//! 带有颜色和本地化文本。

use colored::*;

use crate::core::models::{format_elapsed, BatchReport, RunResult};
use crate::infra::t;

/// Prints a formatted summary of a batch to the console.
///
/// 在控制台打印批处理的格式化摘要。
///
/// # Output Format / 输出格式
/// ```text
/// --- Benchmark Summary ---
///   - Passed     | a.txt                                    |       0.52s
///   - Failed     | b.txt                                    |       1.07s
///   - Skipped    | c.txt                                    |         N/A
/// ```
pub fn print_summary(report: &BatchReport, locale: &str) {
    println!("\n{}", t!("report.summary_banner", locale = locale).bold());

    for result in &report.results {
        let status_str = result.status_str(locale);
        let duration_str = result
            .duration()
            .map(|d| format!("{}s", format_elapsed(d)))
            .unwrap_or_else(|| "N/A".to_string());

        let status_colored = match result {
            RunResult::Passed { .. } => status_str.green(),
            RunResult::Failed { .. } => status_str.red(),
            RunResult::Skipped { .. } => status_str.dimmed(),
        };

        println!(
            "  - {:<10} | {:<40} | {:>11}",
            status_colored,
            result.case_name(),
            duration_str
        );
    }

    println!(
        "\n{}",
        t!(
            "report.totals",
            locale = locale,
            passed = report.passed_count(),
            failed = report.failed_count(),
            skipped = report.skipped_count(),
            seconds = format_elapsed(report.total_elapsed())
        )
    );
}

/// Prints the captured output of every failed case.
/// Returns early if there are none.
///
/// 打印每个失败用例的捕获输出。如果没有失败则提前返回。
pub fn print_failure_details(failures: &[&RunResult], locale: &str) {
    if failures.is_empty() {
        return;
    }

    println!("\n{}", t!("report.failure_banner", locale = locale).red().bold());
    println!("{}", "-".repeat(80));

    for (i, result) in failures.iter().enumerate() {
        let status = match result {
            RunResult::Failed {
                exit_code: Some(code),
                ..
            } => t!("report.exit_code", locale = locale, code = code).to_string(),
            _ => t!("report.killed_by_signal", locale = locale).to_string(),
        };
        println!(
            "[{}/{}] '{}' ({})",
            i + 1,
            failures.len(),
            result.case_name().cyan(),
            status
        );

        let output = result.output().trim();
        if output.is_empty() {
            println!("{}", t!("report.no_output", locale = locale).dimmed());
        } else {
            println!("\n--- {} ---\n", t!("report.driver_log", locale = locale).yellow());
            println!("{}", output);
        }
        println!("\n{}", "-".repeat(80));
    }
}
