//! Parameter collection, the first strategy keyed by workflow kind.
use super::WorkflowKind;
use crate::host::{Host, InputRequest, PickItem, PickRequest};
use crate::settings::{SettingsSource, MAX_SETS, MIN_SETS, TEMPLATES};
use anyhow::Result;

/// Quick-pick presets for generate: label, description, set count.
const GENERATE_PRESETS: [(&str, &str, u32); 3] = [
    ("1 set", "Generate 1 quiz set", 1),
    ("3 sets", "Generate 3 quiz sets", 3),
    ("5 sets", "Generate 5 quiz sets", 5),
];
const CUSTOM_LABEL: &str = "Custom...";
const CUSTOM_INITIAL_SETS: &str = "3";

const PREVIEW_FIXES_LABEL: &str = "Preview fixes";
const APPLY_FIXES_LABEL: &str = "Apply fixes";

pub(super) const SET_COUNT_MESSAGE: &str = "Please enter a number between 1 and 10";

/// Parameters gathered for one workflow run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Params {
    Preview { sets: u32, template: String },
    Generate(GenerateChoice),
    Validate,
    FixLatex { dry_run: bool },
    Stats,
}

/// How the user sized a generate run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerateChoice {
    Preset(u32),
    Custom { sets: u32, template: String },
}

/// Gather parameters for `kind`. `Ok(None)` means the user cancelled; `Err`
/// means settings or a prompt were unavailable.
pub(super) async fn collect(
    kind: WorkflowKind,
    host: &dyn Host,
    settings: &dyn SettingsSource,
) -> Result<Option<Params>> {
    match kind {
        WorkflowKind::Preview => {
            let settings = settings.snapshot()?;
            Ok(Some(Params::Preview {
                sets: settings.preview_sets,
                template: settings.default_template,
            }))
        }
        WorkflowKind::Generate => Ok(collect_generate(host).await?.map(Params::Generate)),
        WorkflowKind::Validate => Ok(Some(Params::Validate)),
        WorkflowKind::FixLatex => collect_fix(host).await,
        WorkflowKind::Stats => Ok(Some(Params::Stats)),
    }
}

async fn collect_generate(host: &dyn Host) -> Result<Option<GenerateChoice>> {
    let mut items: Vec<PickItem> = GENERATE_PRESETS
        .iter()
        .map(|(label, description, _)| PickItem::new(*label, *description))
        .collect();
    items.push(PickItem::new(CUSTOM_LABEL, "Specify custom parameters"));

    let Some(choice) = host
        .pick(PickRequest {
            placeholder: "How many quiz sets to generate?".to_string(),
            items,
        })
        .await?
    else {
        return Ok(None);
    };

    if choice == CUSTOM_LABEL {
        let Some(sets) = prompt_set_count(host).await? else {
            return Ok(None);
        };
        let Some(template) = prompt_template(host).await? else {
            return Ok(None);
        };
        return Ok(Some(GenerateChoice::Custom { sets, template }));
    }

    let preset = GENERATE_PRESETS
        .iter()
        .find(|(label, _, _)| *label == choice)
        .map(|(_, _, sets)| *sets);
    if preset.is_none() {
        tracing::warn!(%choice, "unknown generate choice; treating as cancelled");
    }
    Ok(preset.map(GenerateChoice::Preset))
}

/// Ask for a custom set count until the answer is valid or the user cancels.
async fn prompt_set_count(host: &dyn Host) -> Result<Option<u32>> {
    let mut request = InputRequest {
        prompt: "Number of quiz sets".to_string(),
        initial: CUSTOM_INITIAL_SETS.to_string(),
        validation_message: None,
    };
    loop {
        let Some(answer) = host.input(request.clone()).await? else {
            return Ok(None);
        };
        match parse_set_count(&answer) {
            Ok(sets) => return Ok(Some(sets)),
            Err(message) => {
                request.initial = answer;
                request.validation_message = Some(message.to_string());
            }
        }
    }
}

async fn prompt_template(host: &dyn Host) -> Result<Option<String>> {
    let items = TEMPLATES
        .iter()
        .map(|template| PickItem::new(*template, ""))
        .collect();
    host.pick(PickRequest {
        placeholder: "Select template".to_string(),
        items,
    })
    .await
}

async fn collect_fix(host: &dyn Host) -> Result<Option<Params>> {
    let Some(choice) = host
        .pick(PickRequest {
            placeholder: "LaTeX error fixing options".to_string(),
            items: vec![
                PickItem::new(PREVIEW_FIXES_LABEL, "Show what fixes would be applied"),
                PickItem::new(APPLY_FIXES_LABEL, "Apply fixes to the file"),
            ],
        })
        .await?
    else {
        return Ok(None);
    };
    match choice.as_str() {
        PREVIEW_FIXES_LABEL => Ok(Some(Params::FixLatex { dry_run: true })),
        APPLY_FIXES_LABEL => Ok(Some(Params::FixLatex { dry_run: false })),
        other => {
            tracing::warn!(choice = other, "unknown fix choice; treating as cancelled");
            Ok(None)
        }
    }
}

/// Validate a custom set count: an integer in `[MIN_SETS, MAX_SETS]`.
pub(super) fn parse_set_count(value: &str) -> Result<u32, &'static str> {
    let sets: i64 = value.trim().parse().map_err(|_| SET_COUNT_MESSAGE)?;
    if sets < i64::from(MIN_SETS) || sets > i64::from(MAX_SETS) {
        return Err(SET_COUNT_MESSAGE);
    }
    u32::try_from(sets).map_err(|_| SET_COUNT_MESSAGE)
}
