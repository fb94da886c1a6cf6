//! # Data Models Module / 数据模型模块
//!
//! This module defines the core data structures used throughout the harness:
//! test cases, per-case run results, log records, the batch report and the
//! error taxonomy.
//!
//! 此模块定义了整个工具中使用的核心数据结构：
//! 测试用例、单个用例的运行结果、日志记录、批处理报告以及错误分类。

use chrono::{DateTime, Local};
use serde::{Serialize, Serializer};
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::infra::t;

/// A single input file handed to the driver.
/// The harness never looks inside it.
///
/// 交给驱动程序的单个输入文件。
/// 本工具从不检查其内容。
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TestCase {
    /// The file name, used as the case identifier in logs and reports.
    /// 文件名，在日志和报告中用作用例标识。
    pub name: String,
    /// The full path of the file.
    /// 文件的完整路径。
    pub path: PathBuf,
}

impl TestCase {
    /// Builds a case from a path, taking its file name as the identifier.
    /// Returns `None` for paths without a UTF-8 file name.
    pub fn from_path(path: &Path) -> Option<Self> {
        let name = path.file_name()?.to_str()?.to_string();
        Some(Self {
            name,
            path: path.to_path_buf(),
        })
    }
}

impl fmt::Display for TestCase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// One row of the result log: a case identifier and its elapsed wall-clock time.
/// 结果日志中的一行：用例标识及其实际耗时。
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunRecord {
    pub test_case: String,
    #[serde(rename = "seconds", serialize_with = "serialize_elapsed")]
    pub elapsed: Duration,
}

impl RunRecord {
    pub fn new(test_case: impl Into<String>, elapsed: Duration) -> Self {
        Self {
            test_case: test_case.into(),
            elapsed,
        }
    }

    /// The elapsed time in `seconds.hundredths` form.
    pub fn seconds(&self) -> String {
        format_elapsed(self.elapsed)
    }
}

fn serialize_elapsed<S: Serializer>(elapsed: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&format_elapsed(*elapsed))
}

const NANOS_PER_CENTI: u128 = 10_000_000;

/// Formats a duration as `seconds.hundredths`.
///
/// Rounds half up on the exact nanosecond count, so `3.005s` renders as
/// `3.01` and `3.004999999s` as `3.00`. Floating point is never involved.
///
/// 将时长格式化为 `秒.百分之一秒` 的形式。
/// 基于精确的纳秒数进行四舍五入（半数进位），不涉及浮点运算。
pub fn format_elapsed(elapsed: Duration) -> String {
    let centis = (elapsed.as_nanos() + NANOS_PER_CENTI / 2) / NANOS_PER_CENTI;
    format!("{}.{:02}", centis / 100, centis % 100)
}

/// Represents the outcome of a single test case.
///
/// 表示单个测试用例的结果。
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RunResult {
    /// The driver exited with status 0.
    /// 驱动程序以状态 0 退出。
    Passed {
        case: TestCase,
        #[serde(skip)]
        output: String,
        #[serde(serialize_with = "serialize_elapsed")]
        duration: Duration,
    },
    /// The driver exited with a non-zero status or was killed by a signal.
    /// 驱动程序以非零状态退出或被信号终止。
    Failed {
        case: TestCase,
        output: String,
        #[serde(serialize_with = "serialize_elapsed")]
        duration: Duration,
        /// `None` when the process was terminated by a signal.
        /// 进程被信号终止时为 `None`。
        exit_code: Option<i32>,
    },
    /// The case never started because the run stopped early.
    /// 由于运行提前停止，该用例从未开始。
    Skipped { case: TestCase },
}

impl RunResult {
    pub fn case(&self) -> &TestCase {
        match self {
            RunResult::Passed { case, .. }
            | RunResult::Failed { case, .. }
            | RunResult::Skipped { case } => case,
        }
    }

    pub fn case_name(&self) -> &str {
        &self.case().name
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, RunResult::Failed { .. })
    }

    pub fn is_skipped(&self) -> bool {
        matches!(self, RunResult::Skipped { .. })
    }

    /// Gets the duration of the run. Returns None for skipped cases.
    /// 获取运行时长。对于跳过的用例返回 None。
    pub fn duration(&self) -> Option<Duration> {
        match self {
            RunResult::Passed { duration, .. } | RunResult::Failed { duration, .. } => {
                Some(*duration)
            }
            RunResult::Skipped { .. } => None,
        }
    }

    pub fn output(&self) -> &str {
        match self {
            RunResult::Passed { output, .. } | RunResult::Failed { output, .. } => output,
            RunResult::Skipped { .. } => "",
        }
    }

    /// The log row for this result, if the driver ran to completion.
    pub fn record(&self) -> Option<RunRecord> {
        self.duration()
            .map(|duration| RunRecord::new(self.case_name(), duration))
    }

    /// Gets the status of the result as a localized string for display.
    /// 以本地化字符串形式获取结果状态以供显示。
    pub fn status_str(&self, locale: &str) -> String {
        match self {
            RunResult::Passed { .. } => t!("report.status_passed", locale = locale).to_string(),
            RunResult::Failed { .. } => t!("report.status_failed", locale = locale).to_string(),
            RunResult::Skipped { .. } => t!("report.status_skipped", locale = locale).to_string(),
        }
    }

    /// Gets the CSS class for the status, used by the HTML report.
    pub fn status_class(&self) -> &'static str {
        match self {
            RunResult::Passed { .. } => "status-passed",
            RunResult::Failed { .. } => "status-failed",
            RunResult::Skipped { .. } => "status-skipped",
        }
    }
}

/// Everything a finished batch produced.
/// 一次批处理运行产生的全部结果。
#[derive(Debug, Clone, Serialize)]
pub struct BatchReport {
    pub results: Vec<RunResult>,
    /// `true` if the run ended before every planned case was attempted.
    pub stopped_early: bool,
    /// `true` if the operator interrupted the run.
    pub interrupted: bool,
    pub started_at: DateTime<Local>,
    pub finished_at: DateTime<Local>,
}

impl BatchReport {
    pub fn passed_count(&self) -> usize {
        self.results
            .iter()
            .filter(|r| matches!(r, RunResult::Passed { .. }))
            .count()
    }

    pub fn failed_count(&self) -> usize {
        self.results.iter().filter(|r| r.is_failure()).count()
    }

    pub fn skipped_count(&self) -> usize {
        self.results.iter().filter(|r| r.is_skipped()).count()
    }

    pub fn failures(&self) -> Vec<&RunResult> {
        self.results.iter().filter(|r| r.is_failure()).collect()
    }

    /// Sum of the elapsed time of every case that ran.
    pub fn total_elapsed(&self) -> Duration {
        self.results.iter().filter_map(RunResult::duration).sum()
    }
}

/// Errors that end a run. Each maps to a process exit status.
///
/// 终止运行的错误。每种错误对应一个进程退出状态。
#[derive(Debug, thiserror::Error)]
pub enum BenchError {
    #[error("driver script not found: {}", .0.display())]
    MissingDriver(PathBuf),

    #[error("no driver command configured; set [driver].command or pass --driver")]
    NoDriverConfigured,

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("test case directory not found: {}", .0.display())]
    CasesDirNotFound(PathBuf),

    #[error("failed to start driver `{program}`: {source}")]
    SpawnFailed {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("test case `{case}` failed ({})", describe_exit(.exit_code))]
    CaseFailed {
        case: String,
        exit_code: Option<i32>,
    },

    #[error("run interrupted")]
    Interrupted,
}

fn describe_exit(exit_code: &Option<i32>) -> String {
    match exit_code {
        Some(code) => format!("exit code {code}"),
        None => "terminated by signal".to_string(),
    }
}

impl BenchError {
    /// The exit status the harness should end with.
    ///
    /// A failed case propagates the driver's own code when it fits in 1..=255.
    pub fn exit_code(&self) -> u8 {
        match self {
            BenchError::CaseFailed {
                exit_code: Some(code),
                ..
            } => u8::try_from(*code).ok().filter(|c| *c != 0).unwrap_or(1),
            BenchError::Interrupted => 130,
            _ => 1,
        }
    }
}
