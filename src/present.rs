//! Presentation routing.
//!
//! Workflows describe what the user should see as [`Presentation`] values;
//! [`present`] hands each one to the host. The router keeps no state.
use crate::host::Host;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Severity of a transient banner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotifyLevel {
    Info,
    Warning,
    Error,
}

/// A single action on the host's presentation surfaces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Presentation {
    /// Auto-dismissing banner.
    Notify { level: NotifyLevel, message: String },
    /// Hand a generated file to the host's file-open action.
    OpenFile(PathBuf),
    /// Ephemeral untitled buffer pre-filled with `content`.
    OpenDocument { content: String, language: String },
    /// Re-read this file from disk, discarding in-memory edits.
    Reload(PathBuf),
    /// Insert text at the cursor of the active editor.
    InsertText(String),
}

impl Presentation {
    pub fn info(message: impl Into<String>) -> Self {
        Self::Notify {
            level: NotifyLevel::Info,
            message: message.into(),
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::Notify {
            level: NotifyLevel::Warning,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::Notify {
            level: NotifyLevel::Error,
            message: message.into(),
        }
    }

    pub fn plain_text(content: impl Into<String>) -> Self {
        Self::OpenDocument {
            content: content.into(),
            language: "plaintext".to_string(),
        }
    }
}

/// Forward one presentation to the host.
///
/// Host-side failures are logged and never reach the workflow.
pub async fn present(host: &dyn Host, presentation: &Presentation) {
    let result = match presentation {
        Presentation::Notify { level, message } => host.notify(*level, message).await,
        Presentation::OpenFile(path) => host.open_file(path).await,
        Presentation::OpenDocument { content, language } => {
            host.open_document(content, language).await
        }
        Presentation::Reload(path) => host.reload(path).await,
        Presentation::InsertText(text) => host.insert_text(text).await,
    };
    if let Err(err) = result {
        tracing::warn!(error = %format!("{err:#}"), ?presentation, "presentation failed");
    }
}

/// Present each action in order.
pub async fn present_all(host: &dyn Host, presentations: &[Presentation]) {
    for presentation in presentations {
        present(host, presentation).await;
    }
}
