mod article;
mod ast;
mod diagnostic;
mod emit;
mod outline;
mod parser;
mod runs;
mod section;
mod source_map;
mod span;

pub use article::Article;
pub use ast::{
    Block, BlockKind, Document, Inline, InlineKind, InlineSeq, Line, LineKind, plain_text,
};
pub use diagnostic::{Diagnostic, W_UNCLOSED_BOLD, W_UNCLOSED_ITALIC, W_UNCLOSED_LINK};
pub use emit::{
    HtmlEmitOptions, emit_html, emit_html_sanitized, emit_html_sanitized_with_options,
    emit_html_with_options,
};
pub use outline::{OutlineEntry, outline, slugify};
pub use parser::{ParseResult, parse};
pub use runs::{Attributes, Run, WIKI_LINK_TARGET, emit_runs};
pub use section::build_blocks;
pub use source_map::{Position, Range, SourceMap};
pub use span::Span;

/// Converts markup to the article HTML fragment.
pub fn to_html(source: &str) -> String {
    emit_html(&parse(source).document)
}

/// Converts markup to editor runs, without a title run.
pub fn to_runs(source: &str) -> Vec<Run> {
    emit_runs(&parse(source).document)
}
