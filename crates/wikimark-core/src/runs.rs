use crate::ast::{Document, Inline, InlineKind, LineKind};
use serde::Serialize;
use tracing::debug;

/// Placeholder target for internal links; the page has no article routing.
pub const WIKI_LINK_TARGET: &str = "#";

/// Formatting carried by a run. Unset fields are omitted when serialized.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize)]
pub struct Attributes {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub header: Option<u8>,
    #[serde(skip_serializing_if = "is_false")]
    pub bold: bool,
    #[serde(skip_serializing_if = "is_false")]
    pub italic: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
}

fn is_false(value: &bool) -> bool {
    !*value
}

/// One span of editor text. Serializes as a delta insert op.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct Run {
    #[serde(rename = "insert")]
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attributes: Option<Attributes>,
}

impl Run {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            attributes: None,
        }
    }

    pub fn styled(text: impl Into<String>, attributes: Attributes) -> Self {
        Self {
            text: text.into(),
            attributes: Some(attributes),
        }
    }

    pub fn header(text: impl Into<String>, level: u8) -> Self {
        Self::styled(
            text,
            Attributes {
                header: Some(level),
                ..Attributes::default()
            },
        )
    }
}

/// Emits the editor run sequence, one run group per source line.
pub fn emit_runs(document: &Document) -> Vec<Run> {
    let mut runs = Vec::new();
    for line in &document.lines {
        match &line.kind {
            LineKind::Blank => runs.push(Run::plain("\n")),
            LineKind::Heading { level, raw, .. } => {
                runs.push(Run::header(format!("{}\n", raw), *level));
            }
            LineKind::ListItem { content } => {
                push_line(&mut runs, "* ", content);
                runs.push(Run::plain("\n"));
            }
            LineKind::Text { content } => {
                push_line(&mut runs, "", content);
                runs.push(Run::plain("\n"));
            }
        }
    }
    debug!(runs = runs.len(), "emitted editor runs");
    runs
}

fn push_line(runs: &mut Vec<Run>, prefix: &str, content: &[Inline]) {
    let mut pending = prefix.to_string();
    for inline in content {
        let attributes = match &inline.kind {
            InlineKind::Text(text) => {
                pending.push_str(text);
                continue;
            }
            InlineKind::Strong(_) => Attributes {
                bold: true,
                ..Attributes::default()
            },
            InlineKind::Emph(_) => Attributes {
                italic: true,
                ..Attributes::default()
            },
            InlineKind::WikiLink { .. } => Attributes {
                link: Some(WIKI_LINK_TARGET.to_string()),
                ..Attributes::default()
            },
            InlineKind::ExternalLink { url, .. } => Attributes {
                link: Some(url.clone()),
                ..Attributes::default()
            },
        };
        if !pending.is_empty() {
            runs.push(Run::plain(std::mem::take(&mut pending)));
        }
        runs.push(Run::styled(inline.kind.display_text(), attributes));
    }
    if !pending.is_empty() {
        runs.push(Run::plain(pending));
    }
}
