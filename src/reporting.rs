//! # Reporting Module / 报告模块
//!
//! This module persists and presents benchmark results. The CSV result log is
//! written incrementally during a run; the console summary and the optional
//! HTML and JSON reports are produced once the run is over.
//!
//! 此模块负责持久化和展示基准测试结果。CSV 结果日志在运行期间增量写入；
//! 控制台摘要以及可选的 HTML 和 JSON 报告在运行结束后生成。

pub mod console;
pub mod html;
pub mod json;
pub mod result_log;

// Re-export common reporting functions
pub use console::{print_failure_details, print_summary};
pub use html::generate_html_report;
pub use json::write_json_report;
pub use result_log::ResultLog;
