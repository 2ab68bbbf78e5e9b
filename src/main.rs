use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

mod cli;
mod eligibility;
mod host;
mod invoker;
mod panel;
mod present;
mod settings;
mod templates;
#[cfg(test)]
mod testing;
mod trigger;
mod workflow;

use cli::{Command, PanelArgs, RootArgs, RunArgs, ServeArgs, TriggerArgs, TriggerKind};
use host::terminal::TerminalHost;
use invoker::{resolve_tool_program, TokioInvoker};
use settings::FileSettings;
use trigger::TriggerEvent;
use workflow::{Completion, Engine};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<ExitCode> {
    init_tracing();
    let args = RootArgs::parse();
    match args.command {
        Command::Run(args) => run_command(args).await,
        Command::Trigger(args) => run_trigger(args).await,
        Command::Serve(args) => run_serve(args).await,
        Command::Panel(args) => run_panel(args),
    }
}

/// Logs go to stderr so stdout stays free for banners and the bridge.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("setwise_assist=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn terminal_engine(active: Option<PathBuf>, settings: Option<PathBuf>) -> Result<Engine> {
    let settings = FileSettings::resolve(settings.as_deref())?;
    tracing::debug!(path = %settings.path().display(), "settings file");
    Ok(Engine::new(
        Arc::new(TerminalHost::new(active)),
        Arc::new(TokioInvoker),
        Arc::new(settings),
        resolve_tool_program()?,
    ))
}

fn exit_code(completion: Completion) -> ExitCode {
    if completion.is_failure() {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

async fn run_command(args: RunArgs) -> Result<ExitCode> {
    let engine = terminal_engine(args.file, args.settings)?;
    Ok(exit_code(engine.run_command(args.command).await))
}

async fn run_trigger(args: TriggerArgs) -> Result<ExitCode> {
    let engine = terminal_engine(Some(args.file.clone()), args.settings)?;
    let event = match args.event {
        TriggerKind::Saved => TriggerEvent::Saved(args.file),
        TriggerKind::Focused => TriggerEvent::ActiveChanged(Some(args.file)),
    };
    match engine.handle_trigger(event).await {
        Some(completion) => Ok(exit_code(completion)),
        None => {
            tracing::debug!("trigger policy did not fire");
            Ok(ExitCode::SUCCESS)
        }
    }
}

async fn run_serve(args: ServeArgs) -> Result<ExitCode> {
    let settings = FileSettings::resolve(args.settings.as_deref())?;
    tracing::info!(settings = %settings.path().display(), "serving editor bridge");
    host::bridge::serve(
        tokio::io::BufReader::new(tokio::io::stdin()),
        tokio::io::stdout(),
        Arc::new(TokioInvoker),
        Arc::new(settings),
        resolve_tool_program()?,
    )
    .await?;
    Ok(ExitCode::SUCCESS)
}

fn run_panel(args: PanelArgs) -> Result<ExitCode> {
    match args.out {
        Some(path) => std::fs::write(&path, panel::markup())
            .with_context(|| format!("write {}", path.display()))?,
        None => print!("{}", panel::markup()),
    }
    Ok(ExitCode::SUCCESS)
}
