//! # Configuration Module / 配置模块
//!
//! Loads `BenchConfig.toml`, applies command-line overrides and resolves every
//! relative path against the working directory. The result is a
//! `RunSettings` value that the run loop consumes without touching the
//! file system again.
//!
//! 加载 `BenchConfig.toml`，应用命令行覆盖，并将所有相对路径解析为相对于工作目录的路径。
//! 结果是一个 `RunSettings` 值，运行循环直接使用它而无需再次访问文件系统。

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::core::models::BenchError;
use crate::infra::t;

/// The default configuration file name, looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "BenchConfig.toml";

/// How a test case file is handed to the driver.
/// 测试用例文件交给驱动程序的方式。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InputMode {
    /// The file is opened and attached to the driver's standard input.
    /// 打开文件并连接到驱动程序的标准输入。
    #[default]
    Stdin,
    /// The file path is appended as the driver's last argument.
    /// 文件路径作为驱动程序的最后一个参数追加。
    Argument,
}

impl std::str::FromStr for InputMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "stdin" => Ok(InputMode::Stdin),
            "argument" | "arg" => Ok(InputMode::Argument),
            other => Err(format!("unknown input mode '{other}' (expected 'stdin' or 'argument')")),
        }
    }
}

/// What the run loop does when the driver exits with a non-zero status.
/// 驱动程序以非零状态退出时运行循环的行为。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailurePolicy {
    /// Abort the batch on the first failing case.
    /// 在第一个失败的用例处中止批处理。
    Stop,
    /// Keep going with the next case.
    /// 继续运行下一个用例。
    #[default]
    Continue,
}

impl std::str::FromStr for FailurePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "stop" => Ok(FailurePolicy::Stop),
            "continue" => Ok(FailurePolicy::Continue),
            other => Err(format!("unknown failure policy '{other}' (expected 'stop' or 'continue')")),
        }
    }
}

/// The external program invoked once per test case.
/// 每个测试用例调用一次的外部程序。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DriverConfig {
    /// The command line, e.g. `python3 solver.py`. Split with shell quoting
    /// rules after `~` and `$VAR` expansion.
    /// 命令行，例如 `python3 solver.py`。先展开 `~` 和 `$VAR`，再按 shell 引号规则拆分。
    #[serde(default)]
    pub command: String,
    /// A file the command depends on. When set, it must exist before any
    /// case runs.
    /// 命令依赖的文件。设置后，必须在任何用例运行之前存在。
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub script: Option<PathBuf>,
}

/// A case known to take unusually long, announced before it starts.
/// 已知运行时间异常长的用例，在开始之前发出提示。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdvisoryCase {
    /// The case's file name.
    pub case: String,
    /// Custom warning text. A built-in message is used when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// The configuration file model.
/// 配置文件模型。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BenchConfig {
    /// The language for the runner's output messages (e.g., "en", "zh-CN").
    /// When absent, the system locale is used.
    ///
    /// 运行器输出消息的语言（例如 "en", "zh-CN"）。
    /// 未指定时使用系统语言。
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,

    #[serde(default = "default_cases_dir")]
    pub cases_dir: PathBuf,

    /// File extension of test case files, without the dot.
    #[serde(default = "default_extension")]
    pub extension: String,

    #[serde(default = "default_log_path")]
    pub log_path: PathBuf,

    #[serde(default)]
    pub input_mode: InputMode,

    #[serde(default)]
    pub on_failure: FailurePolicy,

    #[serde(default)]
    pub driver: DriverConfig,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub advisory: Vec<AdvisoryCase>,
}

fn default_cases_dir() -> PathBuf {
    PathBuf::from("test_cases")
}

fn default_extension() -> String {
    "txt".to_string()
}

fn default_log_path() -> PathBuf {
    PathBuf::from("results.csv")
}

impl Default for BenchConfig {
    fn default() -> Self {
        Self {
            language: None,
            cases_dir: default_cases_dir(),
            extension: default_extension(),
            log_path: default_log_path(),
            input_mode: InputMode::default(),
            on_failure: FailurePolicy::default(),
            driver: DriverConfig::default(),
            advisory: vec![],
        }
    }
}

impl BenchConfig {
    /// Applies command-line overrides on top of the file values.
    pub fn apply_overrides(&mut self, overrides: ConfigOverrides) {
        if let Some(cases_dir) = overrides.cases_dir {
            self.cases_dir = cases_dir;
        }
        if let Some(extension) = overrides.extension {
            self.extension = extension;
        }
        if let Some(log_path) = overrides.log_path {
            self.log_path = log_path;
        }
        if let Some(input_mode) = overrides.input_mode {
            self.input_mode = input_mode;
        }
        if let Some(on_failure) = overrides.on_failure {
            self.on_failure = on_failure;
        }
        if let Some(command) = overrides.driver_command {
            self.driver.command = command;
        }
        if let Some(script) = overrides.driver_script {
            self.driver.script = Some(script);
        }
    }

    /// Checks the values that cannot be caught by deserialization alone.
    pub fn validate(&self) -> Result<(), BenchError> {
        if self.driver.command.trim().is_empty() {
            return Err(BenchError::NoDriverConfigured);
        }
        let extension = self.extension.trim_start_matches('.');
        if extension.is_empty() {
            return Err(BenchError::InvalidConfig(
                "extension must not be empty".to_string(),
            ));
        }
        if let Some(advisory) = self.advisory.iter().find(|a| a.case.trim().is_empty()) {
            return Err(BenchError::InvalidConfig(format!(
                "advisory entry has an empty case name (message: {:?})",
                advisory.message
            )));
        }
        Ok(())
    }

    /// Resolves every relative path against `work_dir` and freezes the result.
    pub fn into_settings(self, work_dir: &Path) -> Result<RunSettings, BenchError> {
        self.validate()?;
        Ok(RunSettings {
            cases_dir: resolve_path(work_dir, &self.cases_dir),
            extension: self.extension.trim_start_matches('.').to_string(),
            log_path: resolve_path(work_dir, &self.log_path),
            input_mode: self.input_mode,
            on_failure: self.on_failure,
            driver_command: self.driver.command,
            driver_script: self.driver.script.map(|s| resolve_path(work_dir, &s)),
            advisory: self.advisory,
            work_dir: work_dir.to_path_buf(),
        })
    }
}

/// Values given on the command line. `None` keeps the file value.
/// 命令行给出的值。`None` 表示保留配置文件中的值。
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub cases_dir: Option<PathBuf>,
    pub extension: Option<String>,
    pub log_path: Option<PathBuf>,
    pub input_mode: Option<InputMode>,
    pub on_failure: Option<FailurePolicy>,
    pub driver_command: Option<String>,
    pub driver_script: Option<PathBuf>,
}

/// Fully resolved settings for a single run.
/// 单次运行的完全解析后的设置。
#[derive(Debug, Clone)]
pub struct RunSettings {
    pub work_dir: PathBuf,
    pub cases_dir: PathBuf,
    pub extension: String,
    pub log_path: PathBuf,
    pub input_mode: InputMode,
    pub on_failure: FailurePolicy,
    pub driver_command: String,
    pub driver_script: Option<PathBuf>,
    pub advisory: Vec<AdvisoryCase>,
}

impl RunSettings {
    /// Returns the advisory entry for a case, if it has one.
    pub fn advisory_for(&self, case_name: &str) -> Option<&AdvisoryCase> {
        self.advisory.iter().find(|a| a.case == case_name)
    }

    /// Fails with `MissingDriver` when a required driver script is absent.
    pub fn check_driver(&self) -> Result<(), BenchError> {
        match &self.driver_script {
            Some(script) if !script.is_file() => Err(BenchError::MissingDriver(script.clone())),
            _ => Ok(()),
        }
    }
}

/// Joins a relative `path` onto `base`; absolute paths are returned as is.
pub fn resolve_path(base: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}

/// Parses a configuration from TOML text.
pub fn parse_config(content: &str) -> Result<BenchConfig> {
    toml::from_str(content).with_context(|| t!("config.parse_failed").to_string())
}

/// Loads the configuration file at `path`.
///
/// When `explicit` is false and the file does not exist, the built-in
/// defaults are returned instead. An explicitly requested file must exist.
///
/// 加载位于 `path` 的配置文件。
/// 当 `explicit` 为 false 且文件不存在时，返回内置默认值。显式指定的文件必须存在。
pub fn load_config(path: &Path, explicit: bool) -> Result<BenchConfig> {
    if !explicit && !path.exists() {
        tracing::debug!(path = %path.display(), "no config file, using defaults");
        return Ok(BenchConfig::default());
    }

    let content = fs::read_to_string(path)
        .with_context(|| t!("config.read_failed", path = path.display()).to_string())?;
    parse_config(&content)
}
