//! # Solver Bench Library / Solver Bench 库
//!
//! This library provides the core functionality for the Solver Bench tool,
//! a sequential benchmark harness that runs an external solver against a
//! directory of test cases and records wall-clock times to a CSV log.
//!
//! 此库为 Solver Bench 工具提供核心功能，
//! 这是一个顺序执行的基准测试工具，它针对测试用例目录运行外部求解器，
//! 并将实际耗时记录到 CSV 日志中。
//!
//! ## Modules / 模块
//!
//! - `core` - Configuration, data models, planning and the run loop
//! - `infra` - Process spawning and file system helpers
//! - `reporting` - Result log, console summary, HTML and JSON reports
//! - `cli` - Command-line interface and commands
//!
//! - `core` - 配置、数据模型、执行计划和运行循环
//! - `infra` - 进程派生和文件系统辅助功能
//! - `reporting` - 结果日志、控制台摘要、HTML 和 JSON 报告
//! - `cli` - 命令行接口和命令

pub mod cli;
pub mod core;
pub mod infra;
pub mod reporting;

// Re-export commonly used items
pub use self::core::config;
pub use self::core::execution;
pub use self::core::models;

/// Picks the UI language and makes it the active locale.
///
/// An explicit `preferred` language wins. Otherwise the system locale is
/// detected. Each candidate is matched in full first (e.g. "zh-CN"), then by
/// its language part (e.g. "en" from "en-US"), and finally "en" is used.
///
/// Returns the locale that was activated.
pub fn init_locale(preferred: Option<&str>) -> String {
    let requested = preferred
        .map(str::to_string)
        .or_else(sys_locale::get_locale)
        .unwrap_or_else(|| "en".to_string());

    let lang = resolve_locale(&requested);
    rust_i18n::set_locale(&lang);
    lang
}

/// Maps a requested locale onto one of the bundled locales.
pub fn resolve_locale(requested: &str) -> String {
    let available_locales = rust_i18n::available_locales!();

    if available_locales.contains(&requested) {
        return requested.to_string();
    }

    requested
        .split(['-', '_'])
        .next()
        .and_then(|lang_code| {
            available_locales
                .iter()
                .find(|available| {
                    available.eq_ignore_ascii_case(lang_code)
                        || available
                            .split('-')
                            .next()
                            .is_some_and(|prefix| prefix.eq_ignore_ascii_case(lang_code))
                })
                .map(|found| found.to_string())
        })
        .unwrap_or_else(|| "en".to_string())
}

// Initialize i18n
rust_i18n::i18n!("locales", fallback = "en");
