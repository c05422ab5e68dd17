use crate::ast::{Document, Inline, InlineKind, InlineSeq, Line, LineKind};
use crate::diagnostic::{Diagnostic, W_UNCLOSED_BOLD, W_UNCLOSED_ITALIC, W_UNCLOSED_LINK};
use crate::source_map::SourceMap;
use crate::span::Span;
use tracing::{debug, trace};

pub struct ParseResult {
    pub document: Document,
    pub diagnostics: Vec<Diagnostic>,
    pub source_map: SourceMap,
}

/// Parses markup into line tokens with inline content.
///
/// Never fails: unterminated constructs stay literal text and are reported in
/// `diagnostics`.
pub fn parse(source: &str) -> ParseResult {
    let mut parser = Parser::new(source);
    let document = parser.parse_document();
    debug!(
        lines = document.lines.len(),
        diagnostics = parser.diagnostics.len(),
        "parsed markup"
    );
    ParseResult {
        document,
        diagnostics: parser.diagnostics,
        source_map: SourceMap::new(source),
    }
}

struct Parser<'a> {
    source: &'a str,
    diagnostics: Vec<Diagnostic>,
    // Absolute offset below which quote markers were already reported.
    quiet_until: usize,
}

impl<'a> Parser<'a> {
    fn new(source: &'a str) -> Self {
        Self {
            source,
            diagnostics: Vec::new(),
            quiet_until: 0,
        }
    }

    fn parse_document(&mut self) -> Document {
        let source = self.source;
        let mut lines = Vec::new();
        let mut start = 0;
        for raw in source.split('\n') {
            let text = raw.trim();
            let lead = raw.len() - raw.trim_start().len();
            let span = Span::new(start + lead, start + lead + text.len());
            lines.push(self.parse_line(text, span));
            start += raw.len() + 1;
        }
        Document {
            span: Span::new(0, source.len()),
            lines,
        }
    }

    fn parse_line(&mut self, text: &str, span: Span) -> Line {
        let kind = if text.is_empty() {
            LineKind::Blank
        } else if let Some(raw) = heading_title(text, "=== ", " ===") {
            LineKind::Heading {
                level: 3,
                raw: raw.to_string(),
                title: self.parse_inlines(raw, span.start + 4),
            }
        } else if let Some(raw) = heading_title(text, "== ", " ==") {
            LineKind::Heading {
                level: 2,
                raw: raw.to_string(),
                title: self.parse_inlines(raw, span.start + 3),
            }
        } else if let Some(item) = text.strip_prefix("* ").filter(|item| !item.is_empty()) {
            LineKind::ListItem {
                content: self.parse_inlines(item, span.start + 2),
            }
        } else {
            LineKind::Text {
                content: self.parse_inlines(text, span.start),
            }
        };
        Line {
            span,
            text: text.to_string(),
            kind,
        }
    }

    /// Left-to-right scan of one line; `base` is the line's source offset.
    fn parse_inlines(&mut self, line: &str, base: usize) -> InlineSeq {
        let mut out = Vec::new();
        let mut text_start = 0;
        let mut i = 0;
        while i < line.len() {
            if let Some((kind, len)) = self.scan_construct(line, i, base) {
                push_text(&mut out, line, text_start, i, base);
                out.push(Inline {
                    span: Span::new(base + i, base + i + len),
                    kind,
                });
                i += len;
                text_start = i;
                continue;
            }
            // Literal fallback: keep the character and move on.
            i += line[i..].chars().next().map_or(1, char::len_utf8);
        }
        push_text(&mut out, line, text_start, line.len(), base);
        out
    }

    /// Recognizes the construct starting at `at`, returning it and its byte length.
    fn scan_construct(&mut self, line: &str, at: usize, base: usize) -> Option<(InlineKind, usize)> {
        let rest = &line[at..];

        if rest.starts_with("[[") {
            return match rest[2..].find("]]") {
                Some(end) => {
                    let (target, display) = split_wiki_link(&rest[2..2 + end]);
                    Some((
                        InlineKind::WikiLink {
                            target: target.to_string(),
                            display: display.to_string(),
                        },
                        end + 4,
                    ))
                }
                None => {
                    self.warn(base + at, 2, W_UNCLOSED_LINK, "internal link has no closing `]]`");
                    None
                }
            };
        }

        if rest.starts_with('[') && rest.contains(' ') && rest.contains(']') {
            let end = rest[1..].find(']')?;
            let (url, display) = rest[1..1 + end].split_once(' ')?;
            return Some((
                InlineKind::ExternalLink {
                    url: url.to_string(),
                    display: display.to_string(),
                },
                end + 2,
            ));
        }

        if rest.starts_with("'''") {
            return match rest[3..].find("'''") {
                Some(end) => Some((InlineKind::Strong(rest[3..3 + end].to_string()), end + 6)),
                None => {
                    self.warn(base + at, 3, W_UNCLOSED_BOLD, "bold text has no closing `'''`");
                    None
                }
            };
        }

        if rest.starts_with("''") {
            return match rest[2..].find("''") {
                Some(end) => Some((InlineKind::Emph(rest[2..2 + end].to_string()), end + 4)),
                None => {
                    self.warn(base + at, 2, W_UNCLOSED_ITALIC, "italic text has no closing `''`");
                    None
                }
            };
        }

        None
    }

    fn warn(&mut self, start: usize, len: usize, code: &'static str, message: &str) {
        if start < self.quiet_until {
            return;
        }
        self.quiet_until = start + len;
        let diagnostic = Diagnostic::new(Span::new(start, start + len), code, message);
        trace!(code, start, "malformed markup kept literal");
        self.diagnostics.push(diagnostic);
    }
}

fn push_text(out: &mut InlineSeq, line: &str, start: usize, end: usize, base: usize) {
    if start < end {
        out.push(Inline {
            span: Span::new(base + start, base + end),
            kind: InlineKind::Text(line[start..end].to_string()),
        });
    }
}

fn heading_title<'t>(text: &'t str, open: &str, close: &str) -> Option<&'t str> {
    text.strip_prefix(open)?
        .strip_suffix(close)
        .filter(|title| !title.is_empty())
}

/// `Target|Display|ignored` splits into target and display; a missing or
/// empty display falls back to the target.
fn split_wiki_link(content: &str) -> (&str, &str) {
    let mut parts = content.split('|');
    let target = parts.next().unwrap_or_default();
    let display = parts.next().filter(|display| !display.is_empty());
    (target, display.unwrap_or(target))
}

#[cfg(test)]
mod tests {
    use super::parse;
    use crate::ast::{InlineKind, LineKind};
    use crate::diagnostic::{W_UNCLOSED_BOLD, W_UNCLOSED_ITALIC, W_UNCLOSED_LINK};

    fn inline_kinds(source: &str) -> Vec<InlineKind> {
        let parsed = parse(source);
        match &parsed.document.lines[0].kind {
            LineKind::Text { content } | LineKind::ListItem { content } => {
                content.iter().map(|inline| inline.kind.clone()).collect()
            }
            other => panic!("expected inline content, got {:?}", other),
        }
    }

    #[test]
    fn classifies_lines() {
        let parsed = parse("== A ==\n=== B ===\n* item\n\nplain");
        let lines = &parsed.document.lines;
        assert_eq!(lines.len(), 5);
        assert!(matches!(&lines[0].kind, LineKind::Heading { level: 2, raw, .. } if raw == "A"));
        assert!(matches!(&lines[1].kind, LineKind::Heading { level: 3, raw, .. } if raw == "B"));
        assert!(matches!(lines[2].kind, LineKind::ListItem { .. }));
        assert!(matches!(lines[3].kind, LineKind::Blank));
        assert!(matches!(lines[4].kind, LineKind::Text { .. }));
    }

    #[test]
    fn heading_needs_both_markers_and_a_title() {
        for source in ["== A", "==  ==", "=== A ==", "==A=="] {
            let parsed = parse(source);
            assert!(
                matches!(parsed.document.lines[0].kind, LineKind::Text { .. }),
                "{:?} should be text",
                source
            );
        }
    }

    #[test]
    fn lines_are_trimmed_before_classification() {
        let parsed = parse("   == Indented ==  \r");
        assert!(matches!(
            &parsed.document.lines[0].kind,
            LineKind::Heading { level: 2, raw, .. } if raw == "Indented"
        ));
        assert_eq!(parsed.document.lines[0].span.start, 3);
    }

    #[test]
    fn bare_star_is_not_a_list_item() {
        let parsed = parse("*\n*x");
        assert!(matches!(parsed.document.lines[0].kind, LineKind::Text { .. }));
        assert!(matches!(parsed.document.lines[1].kind, LineKind::Text { .. }));
        assert!(parsed.document.lines[1].leads_unwrapped_segment());
    }

    #[test]
    fn wiki_link_display_falls_back_to_target() {
        assert_eq!(
            inline_kinds("[[Cat]] [[Dog|Canine]] [[Fox|]]"),
            vec![
                InlineKind::WikiLink {
                    target: "Cat".into(),
                    display: "Cat".into()
                },
                InlineKind::Text(" ".into()),
                InlineKind::WikiLink {
                    target: "Dog".into(),
                    display: "Canine".into()
                },
                InlineKind::Text(" ".into()),
                InlineKind::WikiLink {
                    target: "Fox".into(),
                    display: "Fox".into()
                },
            ]
        );
    }

    #[test]
    fn wiki_link_ignores_extra_pipes() {
        assert_eq!(
            inline_kinds("[[A|b|c]]"),
            vec![InlineKind::WikiLink {
                target: "A".into(),
                display: "b".into()
            }]
        );
    }

    #[test]
    fn external_link_needs_a_space_inside_the_brackets() {
        assert_eq!(
            inline_kinds("[note] then"),
            vec![InlineKind::Text("[note] then".into())]
        );
        assert_eq!(
            inline_kinds("see [http://x.org X Org]"),
            vec![
                InlineKind::Text("see ".into()),
                InlineKind::ExternalLink {
                    url: "http://x.org".into(),
                    display: "X Org".into()
                },
            ]
        );
    }

    #[test]
    fn bold_wins_over_italic() {
        assert_eq!(
            inline_kinds("'''b''' ''i''"),
            vec![
                InlineKind::Strong("b".into()),
                InlineKind::Text(" ".into()),
                InlineKind::Emph("i".into()),
            ]
        );
    }

    #[test]
    fn unterminated_markers_stay_in_one_text_run() {
        let parsed = parse("a [[b '''c");
        let LineKind::Text { content } = &parsed.document.lines[0].kind else {
            panic!("expected text line");
        };
        assert_eq!(content.len(), 1);
        assert_eq!(content[0].kind, InlineKind::Text("a [[b '''c".into()));

        let codes: Vec<_> = parsed.diagnostics.iter().map(|diag| diag.code).collect();
        assert_eq!(codes, vec![W_UNCLOSED_LINK, W_UNCLOSED_BOLD]);
    }

    #[test]
    fn trailing_quote_pair_reports_italic_once() {
        let parsed = parse("it ends ''");
        assert_eq!(parsed.diagnostics.len(), 1);
        assert_eq!(parsed.diagnostics[0].code, W_UNCLOSED_ITALIC);
        assert_eq!(parsed.diagnostics[0].span.start, 8);
    }

    #[test]
    fn inline_spans_point_into_source() {
        let source = "x\n* ''em''";
        let parsed = parse(source);
        let LineKind::ListItem { content } = &parsed.document.lines[1].kind else {
            panic!("expected list item");
        };
        let span = content[0].span;
        assert_eq!(&source[span.start..span.end], "''em''");
    }
}
