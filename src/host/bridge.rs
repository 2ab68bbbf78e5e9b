//! Stdio bridge host for editor plugins.
//!
//! The plugin and this process exchange newline-delimited JSON. The plugin
//! sends commands, panel messages, editor events and prompt replies
//! ([`ClientMessage`]); this side sends presentation actions, progress and
//! prompt requests ([`HostMessage`]). Prompts are correlated by a numeric id.
//!
//! ```text
//! -> {"type":"activeChanged","path":"/course/quiz_questions.py"}
//! -> {"type":"command","command":"generate-quiz"}
//! <- {"type":"pick","id":1,"placeholder":"How many quiz sets to generate?","items":[...]}
//! -> {"type":"reply","id":1,"value":"3 sets"}
//! <- {"type":"progress","state":"begin","title":"Generating quiz...","cancellable":false}
//! ```
use super::{Host, InputRequest, PickItem, PickRequest, ProgressEvent};
use crate::invoker::ProcessInvoker;
use crate::panel::{PanelMessage, VIEW_TYPE};
use crate::present::NotifyLevel;
use crate::settings::SettingsSource;
use crate::trigger::TriggerEvent;
use crate::workflow::{Engine, HostCommand};
use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinSet;

/// Messages read from the plugin.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ClientMessage {
    Command { command: HostCommand },
    Panel { message: PanelMessage },
    Saved { path: PathBuf },
    ActiveChanged { path: Option<PathBuf> },
    Reply { id: u64, value: Option<String> },
}

/// Messages written to the plugin.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum HostMessage {
    #[serde(rename_all = "camelCase")]
    Ready {
        panel_view: String,
        commands: Vec<HostCommand>,
    },
    Notify {
        level: NotifyLevel,
        message: String,
    },
    OpenFile {
        path: PathBuf,
    },
    OpenDocument {
        language: String,
        content: String,
    },
    Reload {
        path: PathBuf,
    },
    InsertText {
        text: String,
    },
    Progress(ProgressEvent),
    Pick {
        id: u64,
        placeholder: String,
        items: Vec<PickItem>,
    },
    #[serde(rename_all = "camelCase")]
    Input {
        id: u64,
        prompt: String,
        value: String,
        validation_message: Option<String>,
    },
}

/// Upper bound on replies held for prompts not yet issued.
const MAX_EARLY_REPLIES: usize = 64;

struct Replies {
    /// Id the next prompt will use.
    next_id: u64,
    pending: HashMap<u64, oneshot::Sender<Option<String>>>,
    /// Replies that arrived before their request was registered.
    early: HashMap<u64, Option<String>>,
}

/// [`Host`] that speaks the bridge protocol.
pub struct BridgeHost {
    outgoing: mpsc::UnboundedSender<HostMessage>,
    replies: Mutex<Replies>,
    closed: AtomicBool,
    active: Mutex<Option<PathBuf>>,
}

impl BridgeHost {
    pub fn new(outgoing: mpsc::UnboundedSender<HostMessage>) -> Self {
        Self {
            outgoing,
            replies: Mutex::new(Replies {
                next_id: 1,
                pending: HashMap::new(),
                early: HashMap::new(),
            }),
            closed: AtomicBool::new(false),
            active: Mutex::new(None),
        }
    }

    fn send(&self, message: HostMessage) -> Result<()> {
        self.outgoing
            .send(message)
            .map_err(|_| anyhow!("bridge output closed"))
    }

    fn set_active(&self, path: Option<PathBuf>) {
        if let Ok(mut active) = self.active.lock() {
            *active = path;
        }
    }

    /// Route a reply to the prompt waiting on `id`.
    fn resolve(&self, id: u64, value: Option<String>) {
        let Ok(mut replies) = self.replies.lock() else {
            return;
        };
        if let Some(waiter) = replies.pending.remove(&id) {
            if waiter.send(value).is_err() {
                tracing::debug!(id, "prompt reply arrived after its workflow ended");
            }
        } else if id < replies.next_id {
            tracing::debug!(id, "dropping reply for a prompt that is no longer open");
        } else if replies.early.len() >= MAX_EARLY_REPLIES {
            tracing::warn!(id, "dropping reply: too many replies ahead of their prompts");
        } else {
            replies.early.insert(id, value);
        }
    }

    /// Stop waiting for replies: pending and future prompts resolve as cancelled.
    fn close(&self) {
        self.closed.store(true, Ordering::SeqCst);
        if let Ok(mut replies) = self.replies.lock() {
            replies.pending.clear();
        }
    }

    /// Issue a prompt and wait for its reply. A dropped waiter (end of
    /// input) resolves as a dismissal.
    async fn request(&self, build: impl FnOnce(u64) -> HostMessage) -> Result<Option<String>> {
        let (id, receiver) = {
            let mut replies = self
                .replies
                .lock()
                .map_err(|_| anyhow!("prompt replies lock poisoned"))?;
            let id = replies.next_id;
            replies.next_id += 1;
            if let Some(value) = replies.early.remove(&id) {
                return Ok(value);
            }
            if self.closed.load(Ordering::SeqCst) {
                return Ok(None);
            }
            let (sender, receiver) = oneshot::channel();
            replies.pending.insert(id, sender);
            (id, receiver)
        };
        if let Err(err) = self.send(build(id)) {
            if let Ok(mut replies) = self.replies.lock() {
                replies.pending.remove(&id);
            }
            return Err(err.context(format!("deliver prompt {id}")));
        }
        Ok(receiver.await.ok().flatten())
    }
}

#[async_trait]
impl Host for BridgeHost {
    fn active_file(&self) -> Option<PathBuf> {
        self.active.lock().ok().and_then(|active| active.clone())
    }

    async fn pick(&self, request: PickRequest) -> Result<Option<String>> {
        self.request(|id| HostMessage::Pick {
            id,
            placeholder: request.placeholder,
            items: request.items,
        })
        .await
    }

    async fn input(&self, request: InputRequest) -> Result<Option<String>> {
        self.request(|id| HostMessage::Input {
            id,
            prompt: request.prompt,
            value: request.initial,
            validation_message: request.validation_message,
        })
        .await
    }

    async fn notify(&self, level: NotifyLevel, message: &str) -> Result<()> {
        self.send(HostMessage::Notify {
            level,
            message: message.to_string(),
        })
    }

    async fn open_file(&self, path: &Path) -> Result<()> {
        self.send(HostMessage::OpenFile {
            path: path.to_path_buf(),
        })
    }

    async fn open_document(&self, content: &str, language: &str) -> Result<()> {
        self.send(HostMessage::OpenDocument {
            language: language.to_string(),
            content: content.to_string(),
        })
    }

    async fn reload(&self, path: &Path) -> Result<()> {
        self.send(HostMessage::Reload {
            path: path.to_path_buf(),
        })
    }

    async fn insert_text(&self, text: &str) -> Result<()> {
        self.send(HostMessage::InsertText {
            text: text.to_string(),
        })
    }

    async fn progress(&self, event: ProgressEvent) -> Result<()> {
        self.send(HostMessage::Progress(event))
    }
}

const ALL_COMMANDS: [HostCommand; 7] = [
    HostCommand::PreviewQuiz,
    HostCommand::GenerateQuiz,
    HostCommand::ValidateQuestions,
    HostCommand::FixLatex,
    HostCommand::InsertMcqTemplate,
    HostCommand::InsertSubjectiveTemplate,
    HostCommand::ShowStats,
];

/// Serve the bridge protocol until `reader` reaches end of input.
///
/// Every command and event runs as its own task, so workflows overlap
/// freely. At end of input, outstanding prompts resolve as cancelled and the
/// call returns once in-flight workflows have presented their results.
pub async fn serve<R, W>(
    reader: R,
    writer: W,
    invoker: Arc<dyn ProcessInvoker>,
    settings: Arc<dyn SettingsSource>,
    program: Vec<String>,
) -> Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin + Send + 'static,
{
    let (outgoing, incoming) = mpsc::unbounded_channel();
    let host = Arc::new(BridgeHost::new(outgoing));
    let writer_task = tokio::spawn(write_messages(incoming, writer));

    host.send(HostMessage::Ready {
        panel_view: VIEW_TYPE.to_string(),
        commands: ALL_COMMANDS.to_vec(),
    })?;

    let engine = Engine::new(host.clone(), invoker, settings, program);
    let mut workflows = JoinSet::new();
    let mut lines = reader.lines();
    while let Some(line) = lines.next_line().await.context("read bridge input")? {
        if line.trim().is_empty() {
            continue;
        }
        let message: ClientMessage = match serde_json::from_str(&line) {
            Ok(message) => message,
            Err(err) => {
                tracing::warn!(error = %err, %line, "ignoring malformed bridge message");
                continue;
            }
        };
        tracing::debug!(?message, "bridge message");
        reap_finished(&mut workflows);
        match message {
            ClientMessage::Reply { id, value } => host.resolve(id, value),
            ClientMessage::Command { command } => {
                let engine = engine.clone();
                workflows.spawn(async move {
                    engine.run_command(command).await;
                });
            }
            ClientMessage::Panel { message } => {
                let engine = engine.clone();
                workflows.spawn(async move {
                    engine.handle_panel(message).await;
                });
            }
            ClientMessage::Saved { path } => {
                let engine = engine.clone();
                workflows.spawn(async move {
                    engine.handle_trigger(TriggerEvent::Saved(path)).await;
                });
            }
            ClientMessage::ActiveChanged { path } => {
                host.set_active(path.clone());
                let engine = engine.clone();
                workflows.spawn(async move {
                    engine
                        .handle_trigger(TriggerEvent::ActiveChanged(path))
                        .await;
                });
            }
        }
    }

    host.close();
    while let Some(joined) = workflows.join_next().await {
        if let Err(err) = joined {
            tracing::warn!(error = %err, "workflow task failed");
        }
    }
    drop(engine);
    drop(host);
    writer_task.await.context("join bridge writer")?
}

/// Collect workflows that already finished so the set only holds live ones.
fn reap_finished(workflows: &mut JoinSet<()>) {
    while let Some(joined) = workflows.try_join_next() {
        if let Err(err) = joined {
            tracing::warn!(error = %err, "workflow task failed");
        }
    }
}

async fn write_messages<W>(
    mut incoming: mpsc::UnboundedReceiver<HostMessage>,
    mut writer: W,
) -> Result<()>
where
    W: AsyncWrite + Unpin,
{
    while let Some(message) = incoming.recv().await {
        let mut line = serde_json::to_string(&message).context("serialize bridge message")?;
        line.push('\n');
        writer
            .write_all(line.as_bytes())
            .await
            .context("write bridge message")?;
        writer.flush().await.context("flush bridge output")?;
    }
    Ok(())
}

#[cfg(test)]
#[path = "bridge_tests.rs"]
mod tests;
