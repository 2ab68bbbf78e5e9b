//! CLI argument parsing for the editor integration.
//!
//! `run` and `trigger` drive one workflow from a terminal, `serve` speaks the
//! JSON bridge to an editor plugin, and `panel` emits the control-surface markup.
use crate::workflow::HostCommand;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Root CLI entrypoint.
#[derive(Parser, Debug)]
#[command(
    name = "setwise-assist",
    version,
    about = "Editor integration for the setwise quiz generator",
    after_help = "Commands:\n  run <command> --file <path>          Run one command against a questions file\n  trigger <saved|focused> --file <p>   Apply the auto-validate/auto-preview policy\n  serve                                Serve the JSON bridge on stdin/stdout\n  panel                                Print the control panel markup\n\nExamples:\n  setwise-assist run generate-quiz --file quiz_questions.py\n  setwise-assist trigger saved --file quiz_questions.py\n  setwise-assist serve --settings .setwise/settings.json",
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct RootArgs {
    #[command(subcommand)]
    pub command: Command,
}

/// Top-level commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    Run(RunArgs),
    Trigger(TriggerArgs),
    Serve(ServeArgs),
    Panel(PanelArgs),
}

/// Run command inputs for a single host command.
#[derive(Parser, Debug)]
#[command(about = "Run a host command against a questions file")]
pub struct RunArgs {
    /// Command to run
    #[arg(value_enum)]
    pub command: HostCommand,

    /// File treated as the active editor document
    #[arg(long, value_name = "PATH")]
    pub file: Option<PathBuf>,

    /// Settings file (defaults to the workspace, then the user config dir)
    #[arg(long, value_name = "PATH")]
    pub settings: Option<PathBuf>,
}

/// Editor events the trigger policy reacts to.
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum TriggerKind {
    /// A document was saved
    Saved,
    /// The active editor changed to this file
    Focused,
}

/// Trigger command inputs.
#[derive(Parser, Debug)]
#[command(about = "Apply the automatic trigger policy to an editor event")]
pub struct TriggerArgs {
    /// Event that happened
    #[arg(value_enum)]
    pub event: TriggerKind,

    /// File the event refers to
    #[arg(long, value_name = "PATH")]
    pub file: PathBuf,

    /// Settings file (defaults to the workspace, then the user config dir)
    #[arg(long, value_name = "PATH")]
    pub settings: Option<PathBuf>,
}

/// Serve command inputs.
#[derive(Parser, Debug)]
#[command(about = "Serve the editor bridge protocol on stdin/stdout")]
pub struct ServeArgs {
    /// Settings file (defaults to the workspace, then the user config dir)
    #[arg(long, value_name = "PATH")]
    pub settings: Option<PathBuf>,
}

#[derive(Parser, Debug)]
#[command(about = "Print the control panel markup")]
pub struct PanelArgs {
    /// Write the markup here instead of stdout
    #[arg(long, value_name = "PATH")]
    pub out: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_run_with_kebab_case_command() {
        let args = RootArgs::try_parse_from([
            "setwise-assist",
            "run",
            "generate-quiz",
            "--file",
            "quiz_questions.py",
        ])
        .expect("parse");
        let Command::Run(run) = args.command else {
            panic!("expected run");
        };
        assert_eq!(run.command, HostCommand::GenerateQuiz);
        assert_eq!(run.file, Some(PathBuf::from("quiz_questions.py")));
        assert_eq!(run.settings, None);
    }

    #[test]
    fn trigger_requires_a_file() {
        assert!(RootArgs::try_parse_from(["setwise-assist", "trigger", "saved"]).is_err());
        let args = RootArgs::try_parse_from([
            "setwise-assist",
            "trigger",
            "focused",
            "--file",
            "a_questions.py",
        ])
        .expect("parse");
        assert!(matches!(
            args.command,
            Command::Trigger(TriggerArgs {
                event: TriggerKind::Focused,
                ..
            })
        ));
    }
}
