use crate::ast::{Block, BlockKind, Document, Inline, InlineKind, InlineSeq};
use crate::outline::outline;
use crate::section::build_blocks;
use ammonia::Builder;
use std::collections::{HashMap, HashSet};
use tracing::debug;

#[derive(Clone, Debug, Default)]
pub struct HtmlEmitOptions {
    /// Give every `h2`/`h3` an `id` equal to its outline slug.
    pub heading_ids: bool,
}

/// Emits the article fragment: sections, subsection headings, paragraphs and lists.
pub fn emit_html(document: &Document) -> String {
    emit_html_with_options(document, &HtmlEmitOptions::default())
}

pub fn emit_html_with_options(document: &Document, options: &HtmlEmitOptions) -> String {
    let blocks = build_blocks(&document.lines);
    let ids = if options.heading_ids {
        outline(document).into_iter().map(|entry| entry.slug).collect()
    } else {
        Vec::new()
    };
    let mut writer = HtmlWriter::new(ids);
    for block in &blocks {
        emit_block(&mut writer, block);
    }
    debug!(blocks = blocks.len(), "emitted html fragment");
    writer.finish()
}

/// Emits the fragment and passes it through an allow-list limited to the
/// markup this emitter produces.
pub fn emit_html_sanitized(document: &Document) -> String {
    sanitize(&emit_html(document))
}

pub fn emit_html_sanitized_with_options(document: &Document, options: &HtmlEmitOptions) -> String {
    sanitize(&emit_html_with_options(document, options))
}

fn sanitize(raw_html: &str) -> String {
    let tags: HashSet<&'static str> = [
        "a", "div", "em", "h2", "h3", "li", "p", "section", "strong", "ul",
    ]
    .iter()
    .copied()
    .collect();

    let mut generic_attributes: HashSet<&'static str> = HashSet::new();
    generic_attributes.insert("class");

    let mut tag_attributes = HashMap::new();
    tag_attributes.insert("a", ["href"].iter().copied().collect());
    tag_attributes.insert("h2", ["id"].iter().copied().collect());
    tag_attributes.insert("h3", ["id"].iter().copied().collect());

    Builder::new()
        .tags(tags)
        .generic_attributes(generic_attributes)
        .tag_attributes(tag_attributes)
        .link_rel(None)
        .clean(raw_html)
        .to_string()
}

struct HtmlWriter {
    out: String,
    indent: usize,
    heading_ids: std::vec::IntoIter<String>,
}

impl HtmlWriter {
    fn new(heading_ids: Vec<String>) -> Self {
        Self {
            out: String::new(),
            indent: 0,
            heading_ids: heading_ids.into_iter(),
        }
    }

    fn line(&mut self, line: &str) {
        for _ in 0..self.indent {
            self.out.push_str("  ");
        }
        self.out.push_str(line);
        self.out.push('\n');
    }

    fn next_id_attr(&mut self) -> String {
        self.heading_ids
            .next()
            .map(|id| format!(" id=\"{}\"", escape_attr(&id)))
            .unwrap_or_default()
    }

    fn finish(mut self) -> String {
        if self.out.ends_with('\n') {
            self.out.pop();
        }
        self.out
    }
}

fn emit_block(writer: &mut HtmlWriter, block: &Block) {
    match &block.kind {
        BlockKind::Section { title, children } => {
            let id = writer.next_id_attr();
            writer.line("<section class=\"article-section\">");
            writer.indent += 1;
            writer.line(&format!(
                "<h2 class=\"article-section__title\"{}>{}</h2>",
                id,
                render_inlines(title)
            ));
            writer.line("<div class=\"article-section__content\">");
            writer.indent += 1;
            for child in children {
                emit_block(writer, child);
            }
            writer.indent -= 1;
            writer.line("</div>");
            writer.indent -= 1;
            writer.line("</section>");
        }
        BlockKind::Heading { level, title } => {
            let id = writer.next_id_attr();
            let class = if *level == 2 {
                "article-section__title"
            } else {
                "article-subsection__title"
            };
            writer.line(&format!(
                "<h{} class=\"{}\"{}>{}</h{}>",
                level,
                class,
                id,
                render_inlines(title),
                level
            ));
        }
        BlockKind::Paragraph { lines } => {
            writer.line(&format!("<p>{}</p>", render_lines(lines)));
        }
        BlockKind::Plain { lines } => {
            for line in lines {
                writer.line(&render_inlines(line));
            }
        }
        BlockKind::List { items } => {
            writer.line("<ul>");
            writer.indent += 1;
            for item in items {
                writer.line(&format!("<li>{}</li>", render_inlines(item)));
            }
            writer.indent -= 1;
            writer.line("</ul>");
        }
    }
}

fn render_lines(lines: &[InlineSeq]) -> String {
    lines
        .iter()
        .map(|line| render_inlines(line))
        .collect::<Vec<_>>()
        .join("\n")
}

fn render_inlines(inlines: &[Inline]) -> String {
    let mut out = String::new();
    for inline in inlines {
        match &inline.kind {
            InlineKind::Text(text) => out.push_str(&escape_html(text)),
            InlineKind::Strong(text) => {
                out.push_str("<strong>");
                out.push_str(&escape_html(text));
                out.push_str("</strong>");
            }
            InlineKind::Emph(text) => {
                out.push_str("<em>");
                out.push_str(&escape_html(text));
                out.push_str("</em>");
            }
            // The target is dropped: wiki links are placeholders on this page.
            InlineKind::WikiLink { display, .. } => {
                out.push_str("<a href=\"#\" class=\"wiki-link\">");
                out.push_str(&escape_html(display));
                out.push_str("</a>");
            }
            InlineKind::ExternalLink { url, display } => {
                out.push_str("<a href=\"");
                out.push_str(&escape_url_attr(url));
                out.push_str("\" class=\"external-link\">");
                out.push_str(&escape_html(display));
                out.push_str("</a>");
            }
        }
    }
    out
}

fn escape_html(text: &str) -> String {
    let mut out = String::new();
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(ch),
        }
    }
    out
}

fn escape_attr(text: &str) -> String {
    let mut out = String::new();
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(ch),
        }
    }
    out
}

fn escape_url_attr(text: &str) -> String {
    let mut encoded = String::new();
    for &byte in text.as_bytes() {
        match byte {
            b'\\' => encoded.push_str("%5C"),
            0x00..=0x1F | 0x7F..=0xFF => {
                encoded.push_str(&format!("%{:02X}", byte));
            }
            _ => encoded.push(byte as char),
        }
    }
    escape_attr(&encoded)
}
