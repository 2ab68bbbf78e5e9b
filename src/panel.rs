//! Control surface: a static side panel with shortcut buttons.
//!
//! The markup is fixed at load time and only ever sends messages to the
//! host; it never reflects the state of the open document.
use crate::templates::PANEL_HTML;
use crate::workflow::HostCommand;
use serde::{Deserialize, Serialize};

/// Identifier the editor plugin registers the panel view under.
pub const VIEW_TYPE: &str = "setwise.previewView";

/// Message posted by a panel button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "camelCase")]
pub enum PanelMessage {
    PreviewQuiz,
    GenerateQuiz,
    ValidateQuestions,
    FixLatex,
}

impl PanelMessage {
    /// The host command this button stands in for.
    pub fn command(self) -> HostCommand {
        match self {
            PanelMessage::PreviewQuiz => HostCommand::PreviewQuiz,
            PanelMessage::GenerateQuiz => HostCommand::GenerateQuiz,
            PanelMessage::ValidateQuestions => HostCommand::ValidateQuestions,
            PanelMessage::FixLatex => HostCommand::FixLatex,
        }
    }
}

pub fn markup() -> &'static str {
    PANEL_HTML
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Commands the markup's buttons send, in document order.
    fn button_commands(html: &str) -> Vec<&str> {
        html.split("send('")
            .skip(1)
            .filter_map(|rest| rest.split_once('\'').map(|(command, _)| command))
            .collect()
    }

    #[test]
    fn every_button_posts_a_known_message() {
        let commands = button_commands(markup());
        assert_eq!(
            commands,
            vec!["previewQuiz", "generateQuiz", "validateQuestions", "fixLatex"]
        );
        for command in commands {
            let json = format!(r#"{{"command":"{command}"}}"#);
            let message: PanelMessage = serde_json::from_str(&json).expect("panel message");
            assert_eq!(serde_json::to_string(&message).expect("serialize"), json);
        }
    }

    #[test]
    fn messages_map_to_host_commands() {
        let message: PanelMessage =
            serde_json::from_str(r#"{"command":"fixLatex"}"#).expect("parse");
        assert_eq!(message.command(), HostCommand::FixLatex);
        assert!(serde_json::from_str::<PanelMessage>(r#"{"command":"showStats"}"#).is_err());
    }
}
