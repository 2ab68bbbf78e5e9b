//! External process invocation for the setwise CLI.
//!
//! Command lines are built as token lists and rendered deterministically; the
//! process itself is spawned without a shell so quoted tokens reach the tool
//! as single arguments.
use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use std::env;
use std::fmt;
use std::path::Path;
use std::process::Stdio;
use std::time::Instant;
use tokio::process::Command;

/// Environment override for the tool invocation (parsed via shell-words).
pub const TOOL_COMMAND_ENV: &str = "SETWISE_COMMAND";

const DEFAULT_TOOL_PROGRAM: &str = "setwise";

/// One argument of a command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    Bare(String),
    /// Always rendered inside double quotes (file paths, directories).
    Quoted(String),
}

impl Token {
    fn value(&self) -> &str {
        match self {
            Token::Bare(value) | Token::Quoted(value) => value,
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Bare(value) => f.write_str(value),
            Token::Quoted(value) => write!(f, "\"{value}\""),
        }
    }
}

/// Program prefix plus ordered argument tokens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandLine {
    program: Vec<String>,
    args: Vec<Token>,
}

impl CommandLine {
    pub fn new(program: Vec<String>) -> Self {
        Self {
            program,
            args: Vec::new(),
        }
    }

    pub fn arg(mut self, value: impl Into<String>) -> Self {
        self.args.push(Token::Bare(value.into()));
        self
    }

    pub fn quoted(mut self, value: impl Into<String>) -> Self {
        self.args.push(Token::Quoted(value.into()));
        self
    }

    pub fn program(&self) -> &[String] {
        &self.program
    }

    /// Rendered arguments without the program prefix.
    pub fn args_text(&self) -> String {
        self.args
            .iter()
            .map(Token::to_string)
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Argument values as passed to the process (quotes stripped).
    pub fn argv(&self) -> Vec<String> {
        self.args
            .iter()
            .map(|token| token.value().to_string())
            .collect()
    }
}

impl fmt::Display for CommandLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let program = self.program.join(" ");
        let args = self.args_text();
        match (program.is_empty(), args.is_empty()) {
            (_, true) => f.write_str(&program),
            (true, false) => f.write_str(&args),
            (false, false) => write!(f, "{program} {args}"),
        }
    }
}

/// Resolve the program prefix for the setwise tool.
pub fn resolve_tool_program() -> Result<Vec<String>> {
    match env::var(TOOL_COMMAND_ENV) {
        Ok(raw) => parse_tool_program(&raw),
        Err(_) => Ok(vec![DEFAULT_TOOL_PROGRAM.to_string()]),
    }
}

fn parse_tool_program(raw: &str) -> Result<Vec<String>> {
    let argv =
        shell_words::split(raw).with_context(|| format!("parse {TOOL_COMMAND_ENV}: {raw}"))?;
    if argv.is_empty() {
        return Err(anyhow!("{TOOL_COMMAND_ENV} is empty"));
    }
    Ok(argv)
}

/// Captured outcome of a finished process.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ProcessResult {
    pub stdout: String,
    pub stderr: String,
    pub success: bool,
    pub code: Option<i32>,
}

impl ProcessResult {
    /// Text explaining a failed run: stderr when present, else the exit status.
    pub fn failure_text(&self) -> String {
        let stderr = self.stderr.trim();
        if !stderr.is_empty() {
            return stderr.to_string();
        }
        match self.code {
            Some(code) => format!("command exited with status {code}"),
            None => "command terminated by signal".to_string(),
        }
    }
}

/// Runs command lines to completion.
///
/// `Err` means the process could not be started; a non-zero exit is an `Ok`
/// result with `success == false`.
#[async_trait]
pub trait ProcessInvoker: Send + Sync {
    async fn run(&self, line: &CommandLine, cwd: Option<&Path>) -> Result<ProcessResult>;
}

/// Spawns processes on the tokio runtime. No timeout is applied.
#[derive(Debug, Default, Clone, Copy)]
pub struct TokioInvoker;

#[async_trait]
impl ProcessInvoker for TokioInvoker {
    async fn run(&self, line: &CommandLine, cwd: Option<&Path>) -> Result<ProcessResult> {
        let (program, prefix) = line
            .program()
            .split_first()
            .ok_or_else(|| anyhow!("tool command is empty"))?;

        let mut command = Command::new(program);
        command
            .args(prefix)
            .args(line.argv())
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        if let Some(cwd) = cwd {
            command.current_dir(cwd);
        }

        let start = Instant::now();
        let output = command
            .output()
            .await
            .with_context(|| format!("spawn {program}"))?;
        let elapsed_ms = start.elapsed().as_millis();

        tracing::info!(
            elapsed_ms,
            code = ?output.status.code(),
            stdout_bytes = output.stdout.len(),
            stderr_bytes = output.stderr.len(),
            command = %line,
            "process complete"
        );

        Ok(ProcessResult {
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            success: output.status.success(),
            code: output.status.code(),
        })
    }
}
