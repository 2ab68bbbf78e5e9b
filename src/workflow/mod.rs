//! Workflow orchestration for the setwise commands.
//!
//! Every workflow walks the same lifecycle:
//! collect parameters, build the command line, run the tool, interpret the
//! result, present it. Only collection ([`collect`]) and interpretation
//! ([`interpret`]) vary by [`WorkflowKind`]; the rest lives once in
//! [`Engine::run_workflow`], the single entry point shared by direct
//! commands, panel messages and triggers.
mod collect;
mod command;
mod interpret;

use crate::eligibility::is_questions_file;
use crate::host::{Host, ProgressEvent};
use crate::invoker::ProcessInvoker;
use crate::panel::PanelMessage;
use crate::present::{present, present_all, Presentation};
use crate::settings::SettingsSource;
use crate::templates;
use crate::trigger::{self, TriggerEvent};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// The five tool-backed workflows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WorkflowKind {
    Preview,
    Generate,
    Validate,
    FixLatex,
    Stats,
}

impl WorkflowKind {
    pub fn name(self) -> &'static str {
        match self {
            WorkflowKind::Preview => "preview",
            WorkflowKind::Generate => "generate",
            WorkflowKind::Validate => "validate",
            WorkflowKind::FixLatex => "fix-latex",
            WorkflowKind::Stats => "stats",
        }
    }

    fn progress_title(self) -> &'static str {
        match self {
            WorkflowKind::Preview => "Generating quiz preview...",
            WorkflowKind::Generate => "Generating quiz...",
            WorkflowKind::Validate => "Validating questions...",
            WorkflowKind::FixLatex => "Fixing LaTeX...",
            WorkflowKind::Stats => "Collecting statistics...",
        }
    }

    fn ineligible_message(self) -> &'static str {
        match self {
            WorkflowKind::Preview => "Please open a Setwise questions file (e.g., *questions.py)",
            _ => "Please open a Setwise questions file",
        }
    }
}

impl fmt::Display for WorkflowKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Zero-argument commands the host exposes to the user.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "kebab-case")]
pub enum HostCommand {
    PreviewQuiz,
    GenerateQuiz,
    ValidateQuestions,
    FixLatex,
    InsertMcqTemplate,
    InsertSubjectiveTemplate,
    ShowStats,
}

enum CommandTarget {
    Workflow(WorkflowKind),
    Insert(&'static str),
}

impl HostCommand {
    fn target(self) -> CommandTarget {
        match self {
            HostCommand::PreviewQuiz => CommandTarget::Workflow(WorkflowKind::Preview),
            HostCommand::GenerateQuiz => CommandTarget::Workflow(WorkflowKind::Generate),
            HostCommand::ValidateQuestions => CommandTarget::Workflow(WorkflowKind::Validate),
            HostCommand::FixLatex => CommandTarget::Workflow(WorkflowKind::FixLatex),
            HostCommand::ShowStats => CommandTarget::Workflow(WorkflowKind::Stats),
            HostCommand::InsertMcqTemplate => CommandTarget::Insert(templates::MCQ_TEMPLATE),
            HostCommand::InsertSubjectiveTemplate => {
                CommandTarget::Insert(templates::SUBJECTIVE_TEMPLATE)
            }
        }
    }
}

/// Terminal state of one workflow instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    /// The tool ran and its result was presented.
    Success,
    /// The tool failed or could not be started; the error was presented.
    Failure,
    /// The user dismissed a prompt; nothing ran.
    Cancelled,
    /// The command was refused before anything ran (no eligible file).
    Rejected,
}

impl Completion {
    pub fn is_failure(self) -> bool {
        matches!(self, Completion::Failure | Completion::Rejected)
    }
}

#[derive(Debug, Clone, Copy)]
enum Lifecycle {
    Idle,
    CollectingInput,
    Running,
    Completed,
}

/// Shared entry points into the workflows.
///
/// Cloning is cheap; each clone drives independent workflow instances.
#[derive(Clone)]
pub struct Engine {
    host: Arc<dyn Host>,
    invoker: Arc<dyn ProcessInvoker>,
    settings: Arc<dyn SettingsSource>,
    program: Vec<String>,
}

impl Engine {
    pub fn new(
        host: Arc<dyn Host>,
        invoker: Arc<dyn ProcessInvoker>,
        settings: Arc<dyn SettingsSource>,
        program: Vec<String>,
    ) -> Self {
        Self {
            host,
            invoker,
            settings,
            program,
        }
    }

    /// Run a host command against the active file.
    pub async fn run_command(&self, command: HostCommand) -> Completion {
        tracing::debug!(?command, "host command");
        let active = self.host.active_file();
        match command.target() {
            CommandTarget::Insert(text) => {
                if active.is_none() {
                    return Completion::Rejected;
                }
                present(self.host.as_ref(), &Presentation::InsertText(text.to_string())).await;
                Completion::Success
            }
            CommandTarget::Workflow(kind) => match active {
                Some(path) => self.run_workflow(kind, &path).await,
                None => self.reject(kind).await,
            },
        }
    }

    /// Dispatch a control-surface message exactly like the matching command.
    pub async fn handle_panel(&self, message: PanelMessage) -> Completion {
        self.run_command(message.command()).await
    }

    /// Apply the trigger policy to an editor event.
    ///
    /// Settings are read at fire time; `None` means no workflow was started.
    pub async fn handle_trigger(&self, event: TriggerEvent) -> Option<Completion> {
        let settings = match self.settings.snapshot() {
            Ok(settings) => settings,
            Err(err) => {
                let message = format!("Setwise settings are invalid: {err:#}");
                present(self.host.as_ref(), &Presentation::error(message)).await;
                return None;
            }
        };
        let (kind, path) = trigger::decide(&event, &settings)?;
        tracing::debug!(%kind, path = %path.display(), "trigger fired");
        Some(self.run_workflow(kind, path).await)
    }

    /// Canonical entry point: run one workflow instance on `file`.
    pub async fn run_workflow(&self, kind: WorkflowKind, file: &Path) -> Completion {
        if !is_questions_file(&file.to_string_lossy()) {
            return self.reject(kind).await;
        }

        let mut instance = Instance::new(kind, file);
        instance.advance(Lifecycle::CollectingInput);
        let params = match collect::collect(kind, self.host.as_ref(), self.settings.as_ref()).await
        {
            Ok(Some(params)) => params,
            Ok(None) => return instance.finish(Completion::Cancelled),
            Err(err) => {
                let failure = interpret::failure_message(kind, &format!("{err:#}"));
                present(self.host.as_ref(), &failure).await;
                return instance.finish(Completion::Failure);
            }
        };

        let invocation = command::build(&params, file, &self.program);
        instance.advance(Lifecycle::Running);
        tracing::info!(workflow = %kind, command = %invocation.line, "invoking tool");

        let title = kind.progress_title().to_string();
        self.progress(ProgressEvent::Begin {
            title: title.clone(),
            cancellable: false,
        })
        .await;
        let outcome = self
            .invoker
            .run(&invocation.line, invocation.cwd.as_deref())
            .await;
        self.progress(ProgressEvent::End { title }).await;

        let interpretation = interpret::interpret(&params, file, outcome);
        present_all(self.host.as_ref(), &interpretation.presentations).await;
        instance.finish(interpretation.completion)
    }

    async fn reject(&self, kind: WorkflowKind) -> Completion {
        tracing::debug!(%kind, "no eligible questions file");
        present(
            self.host.as_ref(),
            &Presentation::error(kind.ineligible_message()),
        )
        .await;
        Completion::Rejected
    }

    async fn progress(&self, event: ProgressEvent) {
        if let Err(err) = self.host.progress(event).await {
            tracing::warn!(error = %format!("{err:#}"), "progress update failed");
        }
    }
}

/// Lifecycle bookkeeping for a single run.
struct Instance {
    kind: WorkflowKind,
    file: PathBuf,
    state: Lifecycle,
}

impl Instance {
    fn new(kind: WorkflowKind, file: &Path) -> Self {
        Self {
            kind,
            file: file.to_path_buf(),
            state: Lifecycle::Idle,
        }
    }

    fn advance(&mut self, next: Lifecycle) {
        tracing::debug!(
            workflow = %self.kind,
            file = %self.file.display(),
            from = ?self.state,
            to = ?next,
            "workflow transition"
        );
        self.state = next;
    }

    fn finish(mut self, completion: Completion) -> Completion {
        self.advance(Lifecycle::Completed);
        tracing::debug!(workflow = %self.kind, ?completion, "workflow finished");
        completion
    }
}

#[cfg(test)]
#[path = "engine_tests.rs"]
mod tests;
