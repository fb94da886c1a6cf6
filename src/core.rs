//! # Core Module / 核心模块
//!
//! This module contains the core functionality of Solver Bench,
//! including configuration, data models, planning and the run loop.
//!
//! 此模块包含 Solver Bench 的核心功能，
//! 包括配置、数据模型、执行计划和运行循环。

pub mod config;
pub mod execution;
pub mod models;
pub mod planner;

// Re-exports
pub use config::BenchConfig;
pub use execution::{run_batch, run_test_case};
pub use models::{BenchError, RunRecord, RunResult, TestCase};
