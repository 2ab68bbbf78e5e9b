//! Reactive rules that start workflows from editor events.
use crate::eligibility::is_questions_file;
use crate::settings::Settings;
use crate::workflow::WorkflowKind;
use std::path::{Path, PathBuf};

/// An editor notification. Each event is decided once and never queued.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TriggerEvent {
    /// A document was written to disk.
    Saved(PathBuf),
    /// Focus moved to another editor; `None` when no editor is focused.
    ActiveChanged(Option<PathBuf>),
}

/// Decide which workflow, if any, `event` starts under `settings`.
pub fn decide<'a>(
    event: &'a TriggerEvent,
    settings: &Settings,
) -> Option<(WorkflowKind, &'a Path)> {
    match event {
        TriggerEvent::Saved(path) if settings.auto_validate && eligible(path) => {
            Some((WorkflowKind::Validate, path.as_path()))
        }
        TriggerEvent::ActiveChanged(Some(path)) if settings.auto_preview && eligible(path) => {
            Some((WorkflowKind::Preview, path.as_path()))
        }
        _ => None,
    }
}

fn eligible(path: &Path) -> bool {
    is_questions_file(&path.to_string_lossy())
}
