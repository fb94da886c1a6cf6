//! # Init Command Module / 初始化命令模块
//!
//! This module implements the `init` command, which writes a starter
//! `BenchConfig.toml`. With `--non-interactive` a commented template is
//! written as is; otherwise a short wizard asks for the driver command, the
//! test case directory, the input mode and the failure policy.
//!
//! 此模块实现 `init` 命令，用于生成初始的 `BenchConfig.toml`。
//! 使用 `--non-interactive` 时直接写入带注释的模板；
//! 否则通过简短的向导询问驱动命令、测试用例目录、输入方式和失败策略。

use anyhow::{Context, Result};
use colored::*;
use dialoguer::{theme::ColorfulTheme, Confirm, Input, Select};
use std::{fs, path::Path, path::PathBuf};

use crate::core::config::{BenchConfig, DriverConfig, FailurePolicy, InputMode};
use crate::infra::fs::ensure_parent_dir;
use crate::infra::t;

const DEFAULT_CONFIG: &str = r#"# Solver Bench Configuration / 基准测试配置

# Language for console messages / 控制台消息的语言
language = "en"

# Directory holding the test case files / 存放测试用例文件的目录
cases_dir = "test_cases"
# Only files with this extension are run / 仅运行具有此扩展名的文件
extension = "txt"
# CSV result log, reset at the start of every run / CSV 结果日志，每次运行开始时重置
log_path = "results.csv"
# "stdin" feeds the file on standard input, "argument" passes its path
# "stdin" 通过标准输入提供文件，"argument" 传递文件路径
input_mode = "stdin"
# "stop" aborts on the first failing case, "continue" runs every case
# "stop" 在第一个失败用例处中止，"continue" 运行所有用例
on_failure = "continue"

[driver]
# Command run once per test case / 每个测试用例运行一次的命令
command = "python3 cs412_mingraphcolor_exact.py"
# Required file; the run refuses to start without it / 必需文件；缺少时拒绝运行
script = "cs412_mingraphcolor_exact.py"

# Cases known to run for a long time get a warning before they start
# 已知运行时间很长的用例会在开始前收到警告
# [[advisory]]
# case = "test_case_large.txt"
# message = "This case is expected to run for more than 20 minutes."
"#;

/// Executes the init command.
///
/// # Arguments
/// * `output` - Path for the new configuration file
/// * `force` - Whether to overwrite an existing file without asking
/// * `non_interactive` - Write the template without prompting
/// * `language` - Language recorded in the generated file (wizard only)
pub fn execute(output: &Path, force: bool, non_interactive: bool, language: &str) -> Result<()> {
    if non_interactive {
        if output.exists() && !force {
            println!("{}", t!("init.file_exists", path = output.display()).red());
            println!("{}", t!("init.use_force").yellow());
            return Ok(());
        }
        return write_file(output, DEFAULT_CONFIG);
    }

    run_wizard(output, force, language)
}

/// Runs the interactive wizard and writes the resulting configuration.
///
/// 运行交互式向导并写入生成的配置。
fn run_wizard(output: &Path, force: bool, language: &str) -> Result<()> {
    let theme = ColorfulTheme::default();

    println!("\n{}", t!("init.wizard_welcome").cyan().bold());
    println!("{}", t!("init.wizard_description"));

    if output.exists() && !force {
        let confirmation = Confirm::with_theme(&theme)
            .with_prompt(t!("init.overwrite_prompt", path = output.display()))
            .default(false)
            .interact()
            .context(t!("init.user_confirmation_failed").to_string())?;
        if !confirmation {
            println!("{}", t!("init.aborted"));
            return Ok(());
        }
    }

    let command: String = Input::with_theme(&theme)
        .with_prompt(t!("init.driver_prompt"))
        .default("python3 cs412_mingraphcolor_exact.py".to_string())
        .interact_text()
        .context(t!("init.user_confirmation_failed").to_string())?;

    let script = guess_script(&command);

    let cases_dir: String = Input::with_theme(&theme)
        .with_prompt(t!("init.cases_dir_prompt"))
        .default("test_cases".to_string())
        .interact_text()
        .context(t!("init.user_confirmation_failed").to_string())?;

    let input_modes = [t!("init.input_mode_stdin"), t!("init.input_mode_argument")];
    let input_mode = match Select::with_theme(&theme)
        .with_prompt(t!("init.input_mode_prompt"))
        .items(&input_modes)
        .default(0)
        .interact()
        .context(t!("init.user_confirmation_failed").to_string())?
    {
        0 => InputMode::Stdin,
        _ => InputMode::Argument,
    };

    let policies = [t!("init.policy_continue"), t!("init.policy_stop")];
    let on_failure = match Select::with_theme(&theme)
        .with_prompt(t!("init.policy_prompt"))
        .items(&policies)
        .default(0)
        .interact()
        .context(t!("init.user_confirmation_failed").to_string())?
    {
        0 => FailurePolicy::Continue,
        _ => FailurePolicy::Stop,
    };

    let config = BenchConfig {
        language: Some(language.to_string()),
        cases_dir: PathBuf::from(cases_dir),
        input_mode,
        on_failure,
        driver: DriverConfig { command, script },
        ..BenchConfig::default()
    };

    let toml_string =
        toml::to_string_pretty(&config).context(t!("init.serialize_failed").to_string())?;
    write_file(output, &toml_string)
}

/// Picks the first argument of a driver command that names an existing
/// file, so the generated config checks for it before running.
pub fn guess_script(command: &str) -> Option<PathBuf> {
    shlex::split(command)?
        .into_iter()
        .skip(1)
        .map(PathBuf::from)
        .find(|path| path.is_file())
}

fn write_file(path: &Path, content: &str) -> Result<()> {
    ensure_parent_dir(path)
        .with_context(|| t!("init.create_parent_dir_failed", path = path.display()).to_string())?;
    fs::write(path, content)
        .with_context(|| t!("init.write_failed", path = path.display()).to_string())?;

    println!(
        "\n{} {}",
        "✔".green(),
        t!("init.success", path = path.display()).bold()
    );
    println!("{}", t!("init.next_steps"));
    Ok(())
}
