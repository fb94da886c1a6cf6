//! # Execution Engine Module / 执行引擎模块
//!
//! Runs the driver against each test case, one at a time, measures the
//! wall-clock time of every invocation and records it in the result log.
//! No timeout is ever applied to a case.
//!
//! 针对每个测试用例逐一运行驱动程序，测量每次调用的实际耗时并记录到结果日志中。
//! 不会对任何用例施加超时限制。

use anyhow::Result;
use chrono::Local;
use colored::*;
use std::io::Write;
use std::time::Instant;
use tokio_util::sync::CancellationToken;

use crate::{
    core::{
        config::{FailurePolicy, RunSettings},
        models::{format_elapsed, BatchReport, BenchError, RunResult, TestCase},
    },
    infra::{
        command::{spawn_and_capture, DriverCommand},
        t,
    },
    reporting::result_log::ResultLog,
};

/// Runs the driver once for a single test case.
///
/// Prints the advisory warning first when the case has one, then the
/// progress lines around the invocation. The timer brackets only the child
/// process, from just before spawn until it exits.
///
/// # Arguments
/// * `case` - The test case to run
/// * `driver` - The parsed driver command
/// * `settings` - Resolved run settings (input mode, working directory, advisories)
/// * `echo` - Whether to forward the driver's output to the console live
///
/// # Errors
/// `BenchError::SpawnFailed` if the driver cannot be started. A driver that
/// starts and exits non-zero is not an error; it yields `RunResult::Failed`.
///
/// 为单个测试用例运行一次驱动程序。
/// 如果用例配置了提示，先打印提示，然后在调用前后打印进度信息。
/// 计时器仅覆盖子进程，从派生前一刻到其退出。
pub async fn run_test_case(
    case: TestCase,
    driver: &DriverCommand,
    settings: &RunSettings,
    echo: bool,
) -> Result<RunResult> {
    if let Some(advisory) = settings.advisory_for(&case.name) {
        let message = advisory
            .message
            .clone()
            .unwrap_or_else(|| t!("run.advisory_default", name = &case.name).to_string());
        println!(
            "{} {}",
            t!("run.advisory_prefix").yellow().bold(),
            message.yellow()
        );
    }

    println!("{}", t!("run.running_test", name = &case.name).blue());

    let cmd = driver.build(&case, settings.input_mode, &settings.work_dir)?;
    tracing::debug!(
        case = %case.name,
        command = %driver.display_for(&case, settings.input_mode),
        "spawning driver"
    );

    let start_time = Instant::now();
    let captured = spawn_and_capture(cmd, echo)
        .await
        .map_err(|source| BenchError::SpawnFailed {
            program: driver.program.clone(),
            source,
        })?;
    let duration = captured.exited_at.duration_since(start_time);

    let seconds = format_elapsed(duration);
    if captured.status.success() {
        println!(
            "{}",
            t!("run.test_done", name = &case.name, seconds = &seconds).green()
        );
        Ok(RunResult::Passed {
            case,
            output: captured.output,
            duration,
        })
    } else {
        let exit_code = captured.status.code();
        println!(
            "{}",
            t!(
                "run.test_failed",
                name = &case.name,
                seconds = &seconds,
                status = captured.status
            )
            .red()
        );
        Ok(RunResult::Failed {
            case,
            output: captured.output,
            duration,
            exit_code,
        })
    }
}

/// Runs every case in order and appends a row to `log` after each completed
/// invocation.
///
/// The loop stops early when the failure policy is `Stop` and a case fails,
/// or when `stop` is cancelled (the running child is killed and no row is
/// written for it). Cases that never ran are reported as `Skipped`.
///
/// A driver that cannot be started aborts the batch with an error whatever
/// the policy; rows already written stay in the log.
///
/// 按顺序运行每个用例，每次调用完成后向 `log` 追加一行。
/// 当失败策略为 `Stop` 且某个用例失败，或 `stop` 被取消时（正在运行的子进程被终止，
/// 且不为其写入任何行），循环提前结束。从未运行的用例被报告为 `Skipped`。
pub async fn run_batch<W: Write>(
    cases: Vec<TestCase>,
    driver: &DriverCommand,
    settings: &RunSettings,
    log: &mut ResultLog<W>,
    stop: &CancellationToken,
    echo: bool,
) -> Result<BatchReport> {
    let started_at = Local::now();
    let mut results = Vec::with_capacity(cases.len());
    let mut stopped_early = false;
    let mut interrupted = false;
    let mut pending = cases.into_iter();

    while let Some(case) = pending.next() {
        if stop.is_cancelled() {
            results.push(RunResult::Skipped { case });
            stopped_early = true;
            interrupted = true;
            break;
        }

        let outcome = tokio::select! {
            biased;
            _ = stop.cancelled() => None,
            res = run_test_case(case.clone(), driver, settings, echo) => Some(res),
        };

        let Some(result) = outcome else {
            println!("{}", t!("run.case_interrupted", name = &case.name).yellow());
            results.push(RunResult::Skipped { case });
            stopped_early = true;
            interrupted = true;
            break;
        };

        let result = result?;
        if let Some(record) = result.record() {
            log.append(&record)?;
        }

        let halt = result.is_failure() && settings.on_failure == FailurePolicy::Stop;
        results.push(result);
        if halt {
            println!("{}", t!("run.stopping_on_failure").red().bold());
            stopped_early = true;
            break;
        }
    }

    if stopped_early {
        results.extend(pending.map(|case| RunResult::Skipped { case }));
    }

    Ok(BatchReport {
        results,
        stopped_early,
        interrupted,
        started_at,
        finished_at: Local::now(),
    })
}

/// The error a finished batch should end the process with, if any.
///
/// An interrupt always wins. Under the `Stop` policy the first failed case
/// propagates its exit code. Under `Continue` failures are only reported.
pub fn batch_error(report: &BatchReport, policy: FailurePolicy) -> Option<BenchError> {
    if report.interrupted {
        return Some(BenchError::Interrupted);
    }
    if policy != FailurePolicy::Stop {
        return None;
    }
    report.results.iter().find_map(|result| match result {
        RunResult::Failed {
            case, exit_code, ..
        } => Some(BenchError::CaseFailed {
            case: case.name.clone(),
            exit_code: *exit_code,
        }),
        _ => None,
    })
}
