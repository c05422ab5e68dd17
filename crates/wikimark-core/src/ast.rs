use crate::span::Span;

pub type InlineSeq = Vec<Inline>;

/// Line-level parse of a markup source.
///
/// Both emitters read this: the run emitter walks `lines` directly, the HTML
/// emitter first groups them into [`Block`]s.
#[derive(Clone, Debug, PartialEq)]
pub struct Document {
    pub span: Span,
    pub lines: Vec<Line>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Line {
    /// Span of the trimmed line text.
    pub span: Span,
    pub text: String,
    pub kind: LineKind,
}

#[derive(Clone, Debug, PartialEq)]
pub enum LineKind {
    Blank,
    Heading {
        level: u8,
        /// Title exactly as written between the `==` markers.
        raw: String,
        title: InlineSeq,
    },
    ListItem {
        content: InlineSeq,
    },
    Text {
        content: InlineSeq,
    },
}

impl Line {
    /// Segments led by one of these lines are emitted without `<p>` wrapping.
    pub fn leads_unwrapped_segment(&self) -> bool {
        match self.kind {
            LineKind::Heading { .. } | LineKind::ListItem { .. } => true,
            LineKind::Text { .. } => self.text.starts_with('*') || self.text.starts_with("{{"),
            LineKind::Blank => false,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Inline {
    pub span: Span,
    pub kind: InlineKind,
}

#[derive(Clone, Debug, PartialEq)]
pub enum InlineKind {
    Text(String),
    Strong(String),
    Emph(String),
    WikiLink { target: String, display: String },
    ExternalLink { url: String, display: String },
}

impl InlineKind {
    /// Text a reader sees for this inline.
    pub fn display_text(&self) -> &str {
        match self {
            InlineKind::Text(text) | InlineKind::Strong(text) | InlineKind::Emph(text) => text,
            InlineKind::WikiLink { display, .. } | InlineKind::ExternalLink { display, .. } => {
                display
            }
        }
    }
}

pub fn plain_text(inlines: &[Inline]) -> String {
    inlines
        .iter()
        .map(|inline| inline.kind.display_text())
        .collect()
}

/// Block tree consumed by the HTML emitter.
#[derive(Clone, Debug, PartialEq)]
pub struct Block {
    pub span: Span,
    pub kind: BlockKind,
}

#[derive(Clone, Debug, PartialEq)]
pub enum BlockKind {
    Section {
        title: InlineSeq,
        children: Vec<Block>,
    },
    Heading {
        level: u8,
        title: InlineSeq,
    },
    Paragraph {
        lines: Vec<InlineSeq>,
    },
    /// Text lines that belong to an unwrapped segment.
    Plain {
        lines: Vec<InlineSeq>,
    },
    List {
        items: Vec<InlineSeq>,
    },
}
