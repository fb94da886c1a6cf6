//! # Test Case Planner Module / 测试用例计划模块
//!
//! This module discovers test case files and turns them into an execution
//! plan, including name filtering and splitting the cases across several
//! runner machines.
//!
//! 此模块发现测试用例文件并将其转换为执行计划，
//! 包括按名称过滤以及将用例分配到多个运行器机器上。

use anyhow::{Context, bail, Result};
use std::fs;
use std::path::Path;

use crate::core::models::{BenchError, TestCase};

/// Represents a complete execution plan for a batch.
/// 表示一次批处理的完整执行计划。
#[derive(Debug)]
pub struct ExecutionPlan {
    /// The cases to run, in execution order.
    /// 要运行的用例，按执行顺序排列。
    pub cases_to_run: Vec<TestCase>,
    /// How many discovered cases the name filter removed.
    /// 被名称过滤器移除的已发现用例数量。
    pub filtered_count: usize,
    /// Whether the cases are split across multiple runners.
    /// 用例是否被分配到多个运行器上。
    pub is_distributed: bool,
}

/// Lists the test case files in `dir` whose extension equals `extension`.
///
/// Only regular files are considered and the comparison is case-sensitive.
/// The result is sorted by file name so every run processes the cases in
/// the same order. An empty directory yields an empty list.
///
/// 列出 `dir` 中扩展名等于 `extension` 的测试用例文件。
/// 仅考虑普通文件，比较区分大小写。结果按文件名排序，
/// 以保证每次运行的处理顺序一致。空目录返回空列表。
pub fn discover_cases(dir: &Path, extension: &str) -> Result<Vec<TestCase>> {
    if !dir.is_dir() {
        return Err(BenchError::CasesDirNotFound(dir.to_path_buf()).into());
    }

    let extension = extension.trim_start_matches('.');
    let entries = fs::read_dir(dir)
        .with_context(|| format!("Failed to read test case directory: {}", dir.display()))?;

    let mut cases = Vec::new();
    for entry in entries {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                tracing::warn!(dir = %dir.display(), error = %e, "skipping unreadable directory entry");
                continue;
            }
        };
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        if path.extension().and_then(|s| s.to_str()) != Some(extension) {
            continue;
        }
        match TestCase::from_path(&path) {
            Some(case) => cases.push(case),
            None => tracing::warn!(path = %path.display(), "skipping file with a non UTF-8 name"),
        }
    }

    cases.sort_by(|a, b| a.name.cmp(&b.name));
    tracing::debug!(dir = %dir.display(), count = cases.len(), "discovered test cases");
    Ok(cases)
}

/// Creates an execution plan from discovered cases.
///
/// # Arguments
/// * `cases` - Discovered cases, already in execution order
/// * `filter` - Optional substring a case name must contain
/// * `total_runners` - Optional total number of runners for distributed execution
/// * `runner_index` - Optional index of this runner (0-based)
///
/// Case `i` (after filtering) belongs to runner `i % total_runners`, so the
/// runners partition the cases without overlap.
pub fn plan_execution(
    cases: Vec<TestCase>,
    filter: Option<&str>,
    total_runners: Option<usize>,
    runner_index: Option<usize>,
) -> Result<ExecutionPlan> {
    let discovered = cases.len();
    let filtered_cases: Vec<_> = match filter {
        Some(pattern) => cases
            .into_iter()
            .filter(|case| case.name.contains(pattern))
            .collect(),
        None => cases,
    };
    let filtered_count = discovered - filtered_cases.len();

    let (cases_to_run, is_distributed) = match (total_runners, runner_index) {
        (Some(total), Some(index)) => {
            if total == 0 {
                bail!("Total runners must be at least 1.");
            }
            if index >= total {
                bail!("Runner index must be less than total runners.");
            }
            let distributed_cases: Vec<_> = filtered_cases
                .into_iter()
                .enumerate()
                .filter(|(i, _)| i % total == index)
                .map(|(_, case)| case)
                .collect();
            (distributed_cases, true)
        }
        (None, None) => (filtered_cases, false),
        _ => bail!("Both --total-runners and --runner-index must be provided."),
    };

    Ok(ExecutionPlan {
        cases_to_run,
        filtered_count,
        is_distributed,
    })
}
