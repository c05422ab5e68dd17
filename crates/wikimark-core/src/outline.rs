use crate::ast::{Document, LineKind, plain_text};
use serde::Serialize;
use std::collections::HashSet;

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct OutlineEntry {
    pub level: u8,
    pub text: String,
    pub slug: String,
    /// Zero-based source line of the heading.
    pub line: usize,
}

/// Lists every section and subsection heading in document order.
///
/// Slugs are unique within the outline: repeats get `-2`, `-3`, ... appended.
pub fn outline(document: &Document) -> Vec<OutlineEntry> {
    let mut seen = HashSet::new();
    let mut entries = Vec::new();
    for (line_no, line) in document.lines.iter().enumerate() {
        let LineKind::Heading { level, title, .. } = &line.kind else {
            continue;
        };
        let text = plain_text(title).trim().to_string();
        let base = slugify(&text);
        let mut slug = base.clone();
        let mut n = 2;
        while !seen.insert(slug.clone()) {
            slug = format!("{}-{}", base, n);
            n += 1;
        }
        entries.push(OutlineEntry {
            level: *level,
            text,
            slug,
            line: line_no,
        });
    }
    entries
}

/// Lowercases `text`, keeps `a-z`, digits and separators, then joins words with `-`.
pub fn slugify(text: &str) -> String {
    let kept: String = text
        .to_lowercase()
        .chars()
        .filter(|ch| ch.is_ascii_lowercase() || ch.is_ascii_digit() || ch.is_whitespace() || *ch == '-')
        .collect();

    let mut slug = String::new();
    let mut in_separator = false;
    for ch in kept.trim().chars() {
        if ch.is_whitespace() || ch == '-' {
            if !in_separator {
                slug.push('-');
            }
            in_separator = true;
        } else {
            slug.push(ch);
            in_separator = false;
        }
    }

    if slug.is_empty() {
        "section".to_string()
    } else {
        slug
    }
}
