//! Editor host abstraction.
//!
//! The workflow engine never talks to an editor directly. Everything it needs
//! from one (prompts, banners, opening files, the active file) goes through
//! [`Host`], implemented by the interactive terminal and by the stdio bridge.
pub mod bridge;
pub mod terminal;

use crate::present::NotifyLevel;
use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// One entry of a quick-pick list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PickItem {
    pub label: String,
    pub description: String,
}

impl PickItem {
    pub fn new(label: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            description: description.into(),
        }
    }
}

/// Ask the user to choose one label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PickRequest {
    pub placeholder: String,
    pub items: Vec<PickItem>,
}

/// Ask the user for free text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputRequest {
    pub prompt: String,
    pub initial: String,
    /// Set when re-prompting after a rejected answer.
    pub validation_message: Option<String>,
}

/// Progress indicator transitions around a process run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "lowercase")]
pub enum ProgressEvent {
    Begin { title: String, cancellable: bool },
    End { title: String },
}

/// Editor-side capabilities used by workflows and the presentation router.
///
/// Prompt methods return `Ok(None)` when the user dismisses the prompt and
/// `Err` when the prompt could not be shown at all.
#[async_trait]
pub trait Host: Send + Sync {
    /// File shown in the focused editor, if any.
    fn active_file(&self) -> Option<PathBuf>;

    async fn pick(&self, request: PickRequest) -> Result<Option<String>>;

    async fn input(&self, request: InputRequest) -> Result<Option<String>>;

    async fn notify(&self, level: NotifyLevel, message: &str) -> Result<()>;

    async fn open_file(&self, path: &Path) -> Result<()>;

    async fn open_document(&self, content: &str, language: &str) -> Result<()>;

    /// Re-read `path` from disk in any editor showing it.
    async fn reload(&self, path: &Path) -> Result<()>;

    async fn insert_text(&self, text: &str) -> Result<()>;

    async fn progress(&self, event: ProgressEvent) -> Result<()>;
}
