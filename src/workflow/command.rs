//! Command-line construction for each workflow.
use super::collect::{GenerateChoice, Params};
use crate::invoker::CommandLine;
use std::path::{Path, PathBuf};

/// Hidden directory, next to the questions file, that receives previews.
pub const PREVIEW_DIR: &str = ".setwise-preview";

/// Fixed seed so repeated previews of unchanged questions are identical.
pub const PREVIEW_SEED: u64 = 42;

/// A command line plus the directory to run it in (`None` inherits ours).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub line: CommandLine,
    pub cwd: Option<PathBuf>,
}

/// Directory containing `file`; empty for bare file names.
pub(super) fn parent_dir(file: &Path) -> PathBuf {
    file.parent().map(Path::to_path_buf).unwrap_or_default()
}

pub(super) fn preview_output_dir(file: &Path) -> PathBuf {
    parent_dir(file).join(PREVIEW_DIR)
}

/// Build the tool invocation. Same inputs always render the same text.
pub(super) fn build(params: &Params, file: &Path, program: &[String]) -> Invocation {
    let base = CommandLine::new(program.to_vec());
    let path = file.display().to_string();
    match params {
        Params::Preview { sets, template } => Invocation {
            line: base
                .arg("generate")
                .arg("--questions-file")
                .quoted(path)
                .arg("--output-dir")
                .quoted(preview_output_dir(file).display().to_string())
                .arg("--sets")
                .arg(sets.to_string())
                .arg("--template")
                .arg(template.as_str())
                .arg("--seed")
                .arg(PREVIEW_SEED.to_string()),
            cwd: None,
        },
        Params::Generate(choice) => {
            let parent = parent_dir(file);
            let cwd = (!parent.as_os_str().is_empty()).then_some(parent);
            // The tool resolves a relative path against `cwd`, the file's own directory.
            let path = match (&cwd, file.file_name()) {
                (Some(_), Some(name)) if file.is_relative() => {
                    Path::new(name).display().to_string()
                }
                _ => path,
            };
            let line = base.arg("generate").arg("--questions-file").quoted(path);
            let line = match choice {
                GenerateChoice::Preset(sets) => line.arg("--sets").arg(sets.to_string()),
                GenerateChoice::Custom { sets, template } => line
                    .arg("--sets")
                    .arg(sets.to_string())
                    .arg("--template")
                    .arg(template.as_str()),
            };
            Invocation { line, cwd }
        }
        Params::Validate => questions_subcommand(base, "validate", path),
        Params::FixLatex { dry_run } => {
            let mut invocation = questions_subcommand(base, "fix-latex", path);
            if *dry_run {
                invocation.line = invocation.line.arg("--dry-run");
            }
            invocation
        }
        Params::Stats => questions_subcommand(base, "stats", path),
    }
}

fn questions_subcommand(base: CommandLine, name: &str, path: String) -> Invocation {
    Invocation {
        line: base.arg("questions").arg(name).quoted(path),
        cwd: None,
    }
}
