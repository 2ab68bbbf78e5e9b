//! Interactive terminal host.
//!
//! Used by `run` and `trigger`: prompts go through dialoguer on the
//! controlling terminal, banners go to stdout/stderr, and generated files are
//! handed to the platform opener when one is on `PATH`.
use super::{Host, InputRequest, PickRequest, ProgressEvent};
use crate::present::NotifyLevel;
use anyhow::{Context, Result};
use async_trait::async_trait;
use dialoguer::theme::ColorfulTheme;
use dialoguer::{Input, Select};
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::Command;
use tokio::task::spawn_blocking;

/// Openers tried in order for generated files.
const OPENERS: [&str; 2] = ["xdg-open", "open"];

pub struct TerminalHost {
    active: Option<PathBuf>,
}

impl TerminalHost {
    pub fn new(active: Option<PathBuf>) -> Self {
        Self { active }
    }
}

#[async_trait]
impl Host for TerminalHost {
    fn active_file(&self) -> Option<PathBuf> {
        self.active.clone()
    }

    async fn pick(&self, request: PickRequest) -> Result<Option<String>> {
        let labels: Vec<String> = request.items.iter().map(|item| item.label.clone()).collect();
        let rows: Vec<String> = request
            .items
            .iter()
            .map(|item| {
                if item.description.is_empty() {
                    item.label.clone()
                } else {
                    format!("{}  ({})", item.label, item.description)
                }
            })
            .collect();
        let placeholder = request.placeholder;
        let selected = spawn_blocking(move || {
            Select::with_theme(&ColorfulTheme::default())
                .with_prompt(placeholder)
                .items(&rows)
                .default(0)
                .interact_opt()
        })
        .await
        .context("join pick prompt")?
        .context("show pick prompt")?;
        Ok(selected.and_then(|index| labels.get(index).cloned()))
    }

    async fn input(&self, request: InputRequest) -> Result<Option<String>> {
        if let Some(message) = &request.validation_message {
            eprintln!("{message}");
        }
        let prompt = format!("{} (leave empty to cancel)", request.prompt);
        let initial = request.initial;
        let answer = spawn_blocking(move || {
            Input::<String>::with_theme(&ColorfulTheme::default())
                .with_prompt(prompt)
                .with_initial_text(initial)
                .allow_empty(true)
                .interact_text()
        })
        .await
        .context("join input prompt")?
        .context("show input prompt")?;
        Ok((!answer.trim().is_empty()).then_some(answer))
    }

    async fn notify(&self, level: NotifyLevel, message: &str) -> Result<()> {
        match level {
            NotifyLevel::Info => println!("{message}"),
            NotifyLevel::Warning => eprintln!("warning: {message}"),
            NotifyLevel::Error => eprintln!("error: {message}"),
        }
        Ok(())
    }

    async fn open_file(&self, path: &Path) -> Result<()> {
        let Some(opener) = OPENERS.iter().find_map(|name| which::which(name).ok()) else {
            println!("Generated {}", path.display());
            return Ok(());
        };
        let status = Command::new(&opener)
            .arg(path)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .await
            .with_context(|| format!("run {}", opener.display()))?;
        tracing::debug!(opener = %opener.display(), ?status, "opened generated file");
        Ok(())
    }

    async fn open_document(&self, content: &str, _language: &str) -> Result<()> {
        print!("{content}");
        if !content.ends_with('\n') {
            println!();
        }
        Ok(())
    }

    async fn reload(&self, path: &Path) -> Result<()> {
        println!("{} was rewritten on disk; reload it in your editor.", path.display());
        Ok(())
    }

    async fn insert_text(&self, text: &str) -> Result<()> {
        print!("{text}");
        if !text.ends_with('\n') {
            println!();
        }
        Ok(())
    }

    async fn progress(&self, event: ProgressEvent) -> Result<()> {
        if let ProgressEvent::Begin { title, .. } = event {
            eprintln!("{title}");
        }
        Ok(())
    }
}
