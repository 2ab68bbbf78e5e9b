pub const MCQ_TEMPLATE: &str = include_str!("../templates/mcq_question.py");
pub const SUBJECTIVE_TEMPLATE: &str = include_str!("../templates/subjective_question.py");
pub const PANEL_HTML: &str = include_str!("../templates/panel.html");
