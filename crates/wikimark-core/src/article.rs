use crate::emit::{HtmlEmitOptions, emit_html_with_options};
use crate::parser::{ParseResult, parse};
use crate::runs::{Run, emit_runs};
use serde::{Deserialize, Serialize};

/// An article record as the reading page loads it.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct Article {
    #[serde(default)]
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub content: String,
}

impl Article {
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
            ..Self::default()
        }
    }

    pub fn parse(&self) -> ParseResult {
        parse(&self.content)
    }

    /// Title shown in the page heading.
    pub fn display_title(&self) -> &str {
        if self.title.trim().is_empty() {
            "Article"
        } else {
            &self.title
        }
    }

    pub fn to_html(&self) -> String {
        self.to_html_with_options(&HtmlEmitOptions::default())
    }

    pub fn to_html_with_options(&self, options: &HtmlEmitOptions) -> String {
        emit_html_with_options(&self.parse().document, options)
    }

    /// Editor runs: a level-1 title run followed by the content runs.
    pub fn to_runs(&self) -> Vec<Run> {
        let mut runs = vec![Run::header(format!("{}\n", self.title), 1)];
        runs.extend(emit_runs(&self.parse().document));
        runs
    }
}
