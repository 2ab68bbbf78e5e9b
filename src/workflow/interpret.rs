//! Result interpretation, the second strategy keyed by workflow kind.
use super::collect::Params;
use super::command::preview_output_dir;
use super::{Completion, WorkflowKind};
use crate::invoker::ProcessResult;
use crate::present::Presentation;
use anyhow::Result;
use std::path::Path;

/// Literal substring in validate's stdout that marks a clean file.
///
/// This is free-text matching against the tool's wording; if the tool ever
/// reports validity through its exit code or a tagged line, switch to that.
pub const VALID_MARKER: &str = "Valid";

/// First artifact written by a preview run.
pub const PREVIEW_ARTIFACT: &str = "quiz_set_1.pdf";

/// What to show for a finished run, and how the run ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Interpretation {
    pub completion: Completion,
    pub presentations: Vec<Presentation>,
}

impl Interpretation {
    fn success(presentations: Vec<Presentation>) -> Self {
        Self {
            completion: Completion::Success,
            presentations,
        }
    }

    fn failure(presentation: Presentation) -> Self {
        Self {
            completion: Completion::Failure,
            presentations: vec![presentation],
        }
    }
}

fn kind_of(params: &Params) -> WorkflowKind {
    match params {
        Params::Preview { .. } => WorkflowKind::Preview,
        Params::Generate(_) => WorkflowKind::Generate,
        Params::Validate => WorkflowKind::Validate,
        Params::FixLatex { .. } => WorkflowKind::FixLatex,
        Params::Stats => WorkflowKind::Stats,
    }
}

/// Error banner for a failed run of `kind`.
pub(super) fn failure_message(kind: WorkflowKind, detail: &str) -> Presentation {
    let prefix = match kind {
        WorkflowKind::Preview => "Preview failed",
        WorkflowKind::Generate => "Generation failed",
        WorkflowKind::Validate => "Validation failed",
        WorkflowKind::FixLatex => "Fix failed",
        WorkflowKind::Stats => "Stats failed",
    };
    Presentation::error(format!("{prefix}: {detail}"))
}

/// Map a process outcome to presentations.
///
/// `Err` (could not start) and non-zero exits both end in an error banner
/// carrying stderr, or the invocation error when stderr is empty.
pub(super) fn interpret(
    params: &Params,
    file: &Path,
    outcome: Result<ProcessResult>,
) -> Interpretation {
    let kind = kind_of(params);
    let result = match outcome {
        Ok(result) if result.success => result,
        Ok(result) => {
            tracing::info!(workflow = %kind, code = ?result.code, "tool reported failure");
            return Interpretation::failure(failure_message(kind, &result.failure_text()));
        }
        Err(err) => {
            tracing::warn!(workflow = %kind, error = %format!("{err:#}"), "tool did not run");
            return Interpretation::failure(failure_message(kind, &format!("{err:#}")));
        }
    };

    match params {
        Params::Preview { .. } => Interpretation::success(vec![
            Presentation::OpenFile(preview_output_dir(file).join(PREVIEW_ARTIFACT)),
            Presentation::info("Quiz preview generated successfully!"),
        ]),
        Params::Generate(_) => Interpretation::success(vec![Presentation::info(
            "Quiz generated successfully! Check the output folder.",
        )]),
        Params::Validate => {
            let summary = result.stdout.trim();
            let presentation = if result.stdout.contains(VALID_MARKER) {
                Presentation::info(format!("✅ {summary}"))
            } else {
                Presentation::warning(format!("⚠️ {summary}"))
            };
            Interpretation::success(vec![presentation])
        }
        Params::FixLatex { dry_run: true } => Interpretation::success(vec![Presentation::info(
            format!("LaTeX fixes preview:\n{}", result.stdout),
        )]),
        Params::FixLatex { dry_run: false } => Interpretation::success(vec![
            Presentation::info("LaTeX errors fixed successfully!"),
            Presentation::Reload(file.to_path_buf()),
        ]),
        Params::Stats => Interpretation::success(vec![Presentation::plain_text(result.stdout)]),
    }
}
