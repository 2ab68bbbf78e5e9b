//! Shared test infrastructure for integration tests.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use tempfile::TempDir;

/// Stand-in for the setwise tool: records its arguments and answers the
/// `questions` subcommands with canned output.
const FAKE_TOOL: &str = r#"#!/bin/sh
printf '%s\n' "$*" >> "$SETWISE_FAKE_LOG"
case "$*" in
  *broken*) echo "cannot parse questions" >&2; exit 2 ;;
esac
case "$1 $2" in
  "questions validate") echo "Questions file is Valid" ;;
  "questions stats") echo "Questions: 3" ;;
esac
exit 0
"#;

/// Scratch workspace with a fake tool on the command override.
pub struct Workspace {
    dir: TempDir,
}

impl Workspace {
    pub fn new() -> anyhow::Result<Self> {
        let dir = TempDir::new()?;
        fs::write(dir.path().join("setwise.sh"), FAKE_TOOL)?;
        Ok(Self { dir })
    }

    /// Check that `sh` is available; skip test if not.
    pub fn skip_if_shell_missing() -> bool {
        let missing = Command::new("sh")
            .arg("-c")
            .arg("true")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .is_err();
        if missing {
            eprintln!("Skipping: sh not available");
        }
        missing
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Write the workspace settings file.
    pub fn write_settings(&self, json: &str) -> anyhow::Result<()> {
        let dir = self.path().join(".setwise");
        fs::create_dir_all(&dir)?;
        fs::write(dir.join("settings.json"), json)?;
        Ok(())
    }

    fn log_path(&self) -> PathBuf {
        self.path().join("calls.log")
    }

    /// Argument lines the fake tool was called with, in order.
    pub fn tool_calls(&self) -> Vec<String> {
        fs::read_to_string(self.log_path())
            .map(|text| text.lines().map(str::to_string).collect())
            .unwrap_or_default()
    }

    /// The binary under test, run inside the workspace.
    pub fn command(&self) -> Command {
        let mut command = Command::new(env!("CARGO_BIN_EXE_setwise-assist"));
        let script = self.path().join("setwise.sh");
        command
            .current_dir(self.path())
            .env("SETWISE_COMMAND", format!("sh '{}'", script.display()))
            .env("SETWISE_FAKE_LOG", self.log_path())
            .env("XDG_CONFIG_HOME", self.path().join("config"))
            .env("RUST_LOG", "off");
        command
    }
}
