//! Error types for rung compilation.

use thiserror::Error;

/// Result type for rung parsing and lowering.
pub type RungResult<T> = Result<T, RungError>;

/// A syntax error in rung text.
///
/// Syntax errors are recoverable per rung: the caller replaces the offending
/// rung and continues with the next one.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RungError {
    /// The parser met a token it cannot use here
    #[error("syntax error at position {pos}: expected {expected}, found '{found}'")]
    Unexpected {
        expected: &'static str,
        found: String,
        line: u32,
        pos: usize,
    },

    /// Input ended where more rung was required
    #[error("syntax error: expected {expected} at end of input")]
    UnexpectedEof { expected: &'static str },

    /// A level of an output branch has no output instruction (covers empty
    /// levels and doubled commas)
    #[error("syntax error at position {pos}: output branch level without output instruction")]
    LevelWithoutOutput { line: u32, pos: usize },
}

impl RungError {
    /// Byte position of the error in the rung text, if known.
    pub fn position(&self) -> Option<usize> {
        match self {
            RungError::Unexpected { pos, .. } => Some(*pos),
            RungError::UnexpectedEof { .. } => None,
            RungError::LevelWithoutOutput { pos, .. } => Some(*pos),
        }
    }

    /// Format the error with the offending line and a caret marker.
    pub fn format_with_context(&self, source: &str) -> String {
        let mut result = format!("error: {}\n", self);
        if let Some(pos) = self.position() {
            if pos < source.len() {
                let line_start = source[..pos].rfind('\n').map(|i| i + 1).unwrap_or(0);
                let line_end = source[line_start..]
                    .find('\n')
                    .map(|i| line_start + i)
                    .unwrap_or(source.len());
                let line_num = source[..pos].matches('\n').count() + 1;
                let col = pos - line_start;

                let gutter = format!("{} | ", line_num);
                result.push_str(&gutter);
                result.push_str(&source[line_start..line_end]);
                result.push('\n');
                result.push_str(&" ".repeat(gutter.len() + col));
                result.push_str("^ here");
            }
        }
        result
    }
}
