//! Questions-file detection.
//!
//! Every trigger and every file-bound command is gated on this predicate.

/// Substring the base name must contain.
pub const QUESTIONS_MARKER: &str = "questions";

/// Extension of the question-definition source format.
pub const SOURCE_EXTENSION: &str = ".py";

/// Return true when `path` names a setwise questions file.
///
/// Both `/` and `\` are treated as separators so editor-supplied Windows
/// paths classify the same way as POSIX ones.
pub fn is_questions_file(path: &str) -> bool {
    base_name(path).contains(QUESTIONS_MARKER) && path.ends_with(SOURCE_EXTENSION)
}

fn base_name(path: &str) -> &str {
    path.rsplit(['/', '\\']).next().unwrap_or(path)
}
