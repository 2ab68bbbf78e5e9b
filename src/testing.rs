//! Test doubles for the host, invoker and settings seams.
use crate::host::{Host, InputRequest, PickRequest, ProgressEvent};
use crate::invoker::{CommandLine, ProcessInvoker, ProcessResult};
use crate::present::{NotifyLevel, Presentation};
use crate::settings::{Settings, SettingsSource};
use anyhow::{anyhow, Result};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Prompt {
    Pick(PickRequest),
    Input(InputRequest),
}

/// Host that answers prompts from a script and records everything shown.
#[derive(Default)]
pub struct FakeHost {
    active: Option<PathBuf>,
    answers: Mutex<VecDeque<Option<String>>>,
    prompts_unavailable: bool,
    prompts: Mutex<Vec<Prompt>>,
    shown: Mutex<Vec<Presentation>>,
    progress: Mutex<Vec<ProgressEvent>>,
}

impl FakeHost {
    pub fn with_active(path: &str) -> Self {
        Self {
            active: Some(PathBuf::from(path)),
            ..Self::default()
        }
    }

    /// Queue prompt answers in order; `None` dismisses the prompt.
    pub fn answering(self, answers: &[Option<&str>]) -> Self {
        *self.answers.lock().expect("answers lock") = answers
            .iter()
            .map(|answer| answer.map(str::to_string))
            .collect();
        self
    }

    /// Every prompt fails as if no terminal were attached.
    pub fn without_prompts(self) -> Self {
        Self {
            prompts_unavailable: true,
            ..self
        }
    }

    pub fn prompts(&self) -> Vec<Prompt> {
        self.prompts.lock().expect("prompts lock").clone()
    }

    pub fn shown(&self) -> Vec<Presentation> {
        self.shown.lock().expect("shown lock").clone()
    }

    pub fn progress_events(&self) -> Vec<ProgressEvent> {
        self.progress.lock().expect("progress lock").clone()
    }

    fn next_answer(&self) -> Result<Option<String>> {
        if self.prompts_unavailable {
            return Err(anyhow!("not a terminal"));
        }
        Ok(self
            .answers
            .lock()
            .expect("answers lock")
            .pop_front()
            .flatten())
    }

    fn show(&self, presentation: Presentation) -> Result<()> {
        self.shown.lock().expect("shown lock").push(presentation);
        Ok(())
    }
}

#[async_trait]
impl Host for FakeHost {
    fn active_file(&self) -> Option<PathBuf> {
        self.active.clone()
    }

    async fn pick(&self, request: PickRequest) -> Result<Option<String>> {
        self.prompts
            .lock()
            .expect("prompts lock")
            .push(Prompt::Pick(request));
        self.next_answer()
    }

    async fn input(&self, request: InputRequest) -> Result<Option<String>> {
        self.prompts
            .lock()
            .expect("prompts lock")
            .push(Prompt::Input(request));
        self.next_answer()
    }

    async fn notify(&self, level: NotifyLevel, message: &str) -> Result<()> {
        self.show(Presentation::Notify {
            level,
            message: message.to_string(),
        })
    }

    async fn open_file(&self, path: &Path) -> Result<()> {
        self.show(Presentation::OpenFile(path.to_path_buf()))
    }

    async fn open_document(&self, content: &str, language: &str) -> Result<()> {
        self.show(Presentation::OpenDocument {
            content: content.to_string(),
            language: language.to_string(),
        })
    }

    async fn reload(&self, path: &Path) -> Result<()> {
        self.show(Presentation::Reload(path.to_path_buf()))
    }

    async fn insert_text(&self, text: &str) -> Result<()> {
        self.show(Presentation::InsertText(text.to_string()))
    }

    async fn progress(&self, event: ProgressEvent) -> Result<()> {
        self.progress.lock().expect("progress lock").push(event);
        Ok(())
    }
}

enum Reply {
    Finished(ProcessResult),
    SpawnError(String),
}

/// Invoker that records command lines and returns a canned outcome.
pub struct RecordingInvoker {
    reply: Reply,
    calls: Mutex<Vec<(CommandLine, Option<PathBuf>)>>,
}

impl RecordingInvoker {
    pub fn succeeding(stdout: &str) -> Self {
        Self::finished(ProcessResult {
            stdout: stdout.to_string(),
            stderr: String::new(),
            success: true,
            code: Some(0),
        })
    }

    pub fn failing(stderr: &str) -> Self {
        Self::finished(ProcessResult {
            stdout: String::new(),
            stderr: stderr.to_string(),
            success: false,
            code: Some(1),
        })
    }

    pub fn unspawnable(message: &str) -> Self {
        Self {
            reply: Reply::SpawnError(message.to_string()),
            calls: Mutex::new(Vec::new()),
        }
    }

    fn finished(result: ProcessResult) -> Self {
        Self {
            reply: Reply::Finished(result),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<(CommandLine, Option<PathBuf>)> {
        self.calls.lock().expect("calls lock").clone()
    }

    /// Rendered argument text of every invocation, in order.
    pub fn commands(&self) -> Vec<String> {
        self.calls()
            .iter()
            .map(|(line, _)| line.args_text())
            .collect()
    }
}

#[async_trait]
impl ProcessInvoker for RecordingInvoker {
    async fn run(&self, line: &CommandLine, cwd: Option<&Path>) -> Result<ProcessResult> {
        self.calls
            .lock()
            .expect("calls lock")
            .push((line.clone(), cwd.map(Path::to_path_buf)));
        match &self.reply {
            Reply::Finished(result) => Ok(result.clone()),
            Reply::SpawnError(message) => Err(anyhow!("{message}")),
        }
    }
}

/// In-memory settings that tests can change between events.
pub struct MemorySettings {
    current: Mutex<Option<Settings>>,
}

impl MemorySettings {
    pub fn new(settings: Settings) -> Self {
        Self {
            current: Mutex::new(Some(settings)),
        }
    }

    /// Settings whose every read fails.
    pub fn broken() -> Self {
        Self {
            current: Mutex::new(None),
        }
    }

    pub fn set(&self, settings: Settings) {
        *self.current.lock().expect("settings lock") = Some(settings);
    }
}

impl SettingsSource for MemorySettings {
    fn snapshot(&self) -> Result<Settings> {
        self.current
            .lock()
            .expect("settings lock")
            .clone()
            .ok_or_else(|| anyhow!("parse settings: expected value at line 1 column 1"))
    }
}

pub fn program() -> Vec<String> {
    vec!["setwise".to_string()]
}
