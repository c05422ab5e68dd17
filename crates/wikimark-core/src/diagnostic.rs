use crate::span::Span;

pub const W_UNCLOSED_LINK: &str = "W_UNCLOSED_LINK";
pub const W_UNCLOSED_BOLD: &str = "W_UNCLOSED_BOLD";
pub const W_UNCLOSED_ITALIC: &str = "W_UNCLOSED_ITALIC";

/// A malformed construct that was rendered as literal text.
///
/// Conversion never fails, so every diagnostic is advisory.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Diagnostic {
    pub span: Span,
    pub code: &'static str,
    pub message: String,
}

impl Diagnostic {
    pub fn new(span: Span, code: &'static str, message: impl Into<String>) -> Self {
        Self {
            span,
            code,
            message: message.into(),
        }
    }
}
