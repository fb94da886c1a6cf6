//! # Command Execution Module / 命令执行模块
//!
//! Turns the configured driver command line into a process for one test case
//! and runs it, streaming its output to the console while capturing it.
//!
//! 将配置的驱动命令行转换为针对单个测试用例的进程并运行它，
//! 在捕获输出的同时将其实时输出到控制台。

use anyhow::{Context, Result, anyhow};
use std::path::Path;
use std::process::{ExitStatus, Stdio};
use std::time::{Duration, Instant};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::Command;
use tokio_stream::{Stream, StreamExt};
use tokio_stream::wrappers::SplitStream;

use crate::core::config::InputMode;
use crate::core::models::TestCase;

/// A parsed driver command line: the program and its fixed arguments.
/// 解析后的驱动命令行：程序及其固定参数。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DriverCommand {
    pub program: String,
    pub args: Vec<String>,
}

impl DriverCommand {
    /// Expands `~` and environment variables, then splits the line with
    /// shell quoting rules.
    ///
    /// 展开 `~` 和环境变量，然后按 shell 引号规则拆分命令行。
    pub fn parse(command: &str) -> Result<Self> {
        let expanded = shellexpand::full(command)
            .with_context(|| format!("Failed to expand command: {command}"))?
            .to_string();

        let mut parts = shlex::split(&expanded)
            .ok_or_else(|| anyhow!("Failed to parse command: {}", expanded))?
            .into_iter();

        let program = parts
            .next()
            .ok_or_else(|| anyhow!("Empty command after parsing."))?;

        Ok(Self {
            program,
            args: parts.collect(),
        })
    }

    /// Builds the process for one test case.
    ///
    /// In `Stdin` mode the case file is opened and becomes the child's standard
    /// input. In `Argument` mode its path is appended to the arguments and
    /// standard input is closed.
    pub fn build(&self, case: &TestCase, mode: InputMode, work_dir: &Path) -> Result<Command> {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args).current_dir(work_dir).kill_on_drop(true);

        match mode {
            InputMode::Stdin => {
                let file = std::fs::File::open(&case.path).with_context(|| {
                    format!("Failed to open test case file: {}", case.path.display())
                })?;
                cmd.stdin(Stdio::from(file));
            }
            InputMode::Argument => {
                cmd.arg(&case.path).stdin(Stdio::null());
            }
        }

        Ok(cmd)
    }

    /// A shell-like rendering of the invocation for operator messages.
    pub fn display_for(&self, case: &TestCase, mode: InputMode) -> String {
        let mut line = std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .map(|part| shlex::try_quote(part).map(|q| q.into_owned()).unwrap_or_else(|_| part.to_string()))
            .collect::<Vec<_>>()
            .join(" ");
        let path = case.path.display().to_string();
        match mode {
            InputMode::Stdin => line.push_str(&format!(" < {path}")),
            InputMode::Argument => line.push_str(&format!(" {path}")),
        }
        line
    }
}

/// The exit status and the combined output of a finished process.
/// 已结束进程的退出状态和合并输出。
#[derive(Debug)]
pub struct ProcessOutput {
    pub status: ExitStatus,
    pub output: String,
    /// When `wait` observed the child's exit, before any leftover output
    /// was drained.
    /// `wait` 观察到子进程退出的时刻（在读取剩余输出之前）。
    pub exited_at: Instant,
}

#[derive(Clone, Copy)]
enum Channel {
    Stdout,
    Stderr,
}

/// How long output may keep arriving after the driver has exited.
/// A background process that inherited the pipes can hold them open far
/// longer; whatever it writes after this is dropped.
const OUTPUT_DRAIN_GRACE: Duration = Duration::from_millis(500);

/// Spawns a command and waits for it, capturing stdout and stderr.
///
/// The child is awaited while both pipes are drained, so a chatty child never
/// blocks on a full pipe and the exit is observed as soon as it happens, even
/// if a grandchild still holds the pipes. Lines are kept in arrival order in
/// the returned output. With `echo` set, each line is also forwarded to this
/// process's matching stream as soon as it arrives.
///
/// No timeout is applied to the child: the call returns only when it exits.
///
/// 派生一个命令并等待其结束，捕获 stdout 和 stderr。
/// 在读取两个管道的同时等待子进程，子进程不会因管道写满而阻塞，
/// 且即使孙进程仍持有管道，也能在子进程退出时立即察觉。输出按到达顺序保存。
/// 设置 `echo` 时，每一行在到达后也会立即转发到本进程对应的输出流。
/// 不对子进程设置超时：仅当其退出时才返回。
///
/// # Errors
/// Returns the `io::Error` from spawning (e.g. program not found) or from
/// waiting on the child.
pub async fn spawn_and_capture(mut cmd: Command, echo: bool) -> std::io::Result<ProcessOutput> {
    let mut child = cmd
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()?;

    let stdout = child
        .stdout
        .take()
        .ok_or_else(|| std::io::Error::other("failed to capture stdout"))?;
    let stderr = child
        .stderr
        .take()
        .ok_or_else(|| std::io::Error::other("failed to capture stderr"))?;

    let stdout_lines = SplitStream::new(BufReader::new(stdout).split(b'\n'))
        .map(|line| (Channel::Stdout, line));
    let stderr_lines = SplitStream::new(BufReader::new(stderr).split(b'\n'))
        .map(|line| (Channel::Stderr, line));
    let mut lines = Some(stdout_lines.merge(stderr_lines));

    let mut output = String::new();
    let status = loop {
        tokio::select! {
            status = child.wait() => break status?,
            item = next_line(lines.as_mut()), if lines.is_some() => {
                // EOF or a read error: close our ends so nothing can block on them.
                if !item.is_some_and(|line| push_line(&mut output, line, echo)) {
                    lines = None;
                }
            }
        }
    };
    let exited_at = Instant::now();

    if let Some(mut stream) = lines {
        let deadline = tokio::time::Instant::now() + OUTPUT_DRAIN_GRACE;
        while let Ok(Some(line)) = tokio::time::timeout_at(deadline, stream.next()).await {
            if !push_line(&mut output, line, echo) {
                break;
            }
        }
    }

    Ok(ProcessOutput {
        status,
        output,
        exited_at,
    })
}

async fn next_line<S: Stream + Unpin>(lines: Option<&mut S>) -> Option<S::Item> {
    match lines {
        Some(stream) => stream.next().await,
        None => None,
    }
}

/// Appends one decoded line to `output`. Returns `false` on a read error.
fn push_line(
    output: &mut String,
    (channel, line): (Channel, std::io::Result<Vec<u8>>),
    echo: bool,
) -> bool {
    let line = match line {
        Ok(bytes) => String::from_utf8_lossy(&bytes).trim_end_matches('\r').to_string(),
        Err(e) => {
            tracing::warn!(error = %e, "failed to read driver output");
            return false;
        }
    };
    if echo {
        match channel {
            Channel::Stdout => println!("{line}"),
            Channel::Stderr => eprintln!("{line}"),
        }
    }
    output.push_str(&line);
    output.push('\n');
    true
}
