//! # Run Command Module / 运行命令模块
//!
//! This module implements the `run` command: resolve the configuration,
//! validate the driver, discover the test cases, reset the result log and
//! run the batch.
//!
//! 此模块实现 `run` 命令：解析配置、验证驱动程序、发现测试用例、
//! 重置结果日志并运行批处理。

use anyhow::{Context, Result};
use colored::*;
use std::path::PathBuf;
use tokio::signal;
use tokio_util::sync::CancellationToken;

use crate::{
    core::{
        config::{self, ConfigOverrides, RunSettings},
        execution::{batch_error, run_batch},
        models::BenchError,
        planner,
    },
    infra::{command::DriverCommand, fs::absolute_path, t},
    reporting::{
        console::{print_failure_details, print_summary},
        html::generate_html_report,
        json::write_json_report,
        result_log::ResultLog,
    },
};

/// Arguments of the `run` command after command-line parsing.
#[derive(Debug, Clone)]
pub struct RunArgs {
    pub config: PathBuf,
    /// Whether `--config` was given explicitly. An explicit file must exist.
    pub config_explicit: bool,
    pub work_dir: PathBuf,
    pub overrides: ConfigOverrides,
    pub filter: Option<String>,
    pub total_runners: Option<usize>,
    pub runner_index: Option<usize>,
    pub html: Option<PathBuf>,
    pub json: Option<PathBuf>,
    /// Forward the driver's output to the console while it runs.
    pub echo: bool,
    /// The `--lang` value, which takes precedence over the config file.
    pub lang: Option<String>,
}

/// Executes the run command with the provided arguments.
///
/// # Returns
/// `Ok(())` on normal completion, including an empty case directory and
/// failures tolerated by the `continue` policy. Otherwise an error whose
/// `BenchError` (if any) selects the exit status.
pub async fn execute(args: RunArgs) -> Result<()> {
    let work_dir = absolute_path(&args.work_dir).with_context(|| {
        t!("run.work_dir_not_found", path = args.work_dir.display()).to_string()
    })?;

    let (settings, locale) = setup_and_resolve_config(&args, &work_dir)?;
    let driver = DriverCommand::parse(&settings.driver_command)
        .map_err(|e| BenchError::InvalidConfig(format!("driver command: {e:#}")))?;

    settings.check_driver()?;
    tracing::debug!(?settings, "resolved run settings");

    println!("{}", t!("run.work_dir", path = work_dir.display()));
    println!(
        "{}",
        t!("run.driver", command = settings.driver_command.yellow())
    );
    println!(
        "{}",
        t!(
            "run.scanning_cases",
            path = settings.cases_dir.display(),
            ext = &settings.extension
        )
    );

    let discovered = planner::discover_cases(&settings.cases_dir, &settings.extension)?;
    let plan = planner::plan_execution(
        discovered,
        args.filter.as_deref(),
        args.total_runners,
        args.runner_index,
    )?;

    if plan.filtered_count > 0 {
        println!(
            "{}",
            t!("run.filtered_cases", filtered = plan.filtered_count).cyan()
        );
    }
    if let (true, Some(total), Some(index)) =
        (plan.is_distributed, args.total_runners, args.runner_index)
    {
        println!(
            "{}",
            t!(
                "run.split_runner",
                index = index + 1,
                total = total,
                count = plan.cases_to_run.len()
            )
            .bold()
        );
    }

    let mut log = ResultLog::create(&settings.log_path)?;
    println!("{}", t!("run.log_initialized", path = settings.log_path.display()));

    if plan.cases_to_run.is_empty() {
        println!("{}", t!("run.no_cases", path = settings.cases_dir.display()).green());
        return Ok(());
    }

    println!(
        "{}",
        t!("run.case_count", count = plan.cases_to_run.len()).bold()
    );

    let stop_token = setup_signal_handler();
    let report = run_batch(
        plan.cases_to_run,
        &driver,
        &settings,
        &mut log,
        &stop_token,
        args.echo,
    )
    .await?;

    print_summary(&report, &locale);
    print_failure_details(&report.failures(), &locale);
    println!(
        "\n{}",
        t!("run.log_written", rows = log.rows(), path = settings.log_path.display())
    );

    let html_path = args.html.as_deref().map(|p| config::resolve_path(&work_dir, p));
    let json_path = args.json.as_deref().map(|p| config::resolve_path(&work_dir, p));

    if let Some(report_path) = &html_path {
        println!("{}", t!("run.generating_html", path = report_path.display()));
        if let Err(e) = generate_html_report(&report, report_path, &locale) {
            eprintln!("{} {:#}", t!("run.html_failed").red(), e);
        }
    }
    if let Some(report_path) = &json_path {
        println!("{}", t!("run.generating_json", path = report_path.display()));
        if let Err(e) = write_json_report(&report, report_path) {
            eprintln!("{} {:#}", t!("run.json_failed").red(), e);
        }
    }

    match batch_error(&report, settings.on_failure) {
        Some(error) => Err(error.into()),
        None => {
            if report.failed_count() == 0 {
                println!("\n{}", t!("run.all_done").green().bold());
            } else {
                println!(
                    "\n{}",
                    t!("run.done_with_failures", count = report.failed_count()).yellow().bold()
                );
            }
            Ok(())
        }
    }
}

/// Loads the config file, applies command-line overrides and settles the UI
/// language. Returns the resolved settings and the active locale.
fn setup_and_resolve_config(
    args: &RunArgs,
    work_dir: &std::path::Path,
) -> Result<(RunSettings, String)> {
    let config_path = config::resolve_path(work_dir, &args.config);

    let mut bench_config = config::load_config(&config_path, args.config_explicit)?;

    let locale = match (&args.lang, &bench_config.language) {
        (Some(lang), _) => crate::init_locale(Some(lang)),
        (None, Some(lang)) => crate::init_locale(Some(lang)),
        (None, None) => rust_i18n::locale().to_string(),
    };

    if config_path.exists() {
        println!("{}", t!("run.loading_config", path = config_path.display()));
    }

    bench_config.apply_overrides(args.overrides.clone());
    let settings = bench_config.into_settings(work_dir)?;
    Ok((settings, locale))
}

/// Sets up a Ctrl-C handler that cancels the returned token.
fn setup_signal_handler() -> CancellationToken {
    let token = CancellationToken::new();
    let token_clone = token.clone();

    tokio::spawn(async move {
        match signal::ctrl_c().await {
            Ok(()) => {
                println!("\n{}", t!("run.shutdown_signal").yellow());
                token_clone.cancel();
            }
            Err(e) => tracing::warn!(error = %e, "failed to listen for Ctrl-C"),
        }
    });

    token
}
