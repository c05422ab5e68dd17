use crate::ast::{Block, BlockKind, InlineSeq, Line, LineKind};
use crate::span::Span;

/// Groups parsed lines into the block tree the HTML emitter renders.
pub fn build_blocks(lines: &[Line]) -> Vec<Block> {
    let mut grouper = SegmentGrouper::default();
    for line in lines {
        grouper.push(line);
    }
    build_sections(grouper.finish())
}

#[derive(Default)]
struct SegmentGrouper {
    out: Vec<Block>,
    // None until the first non-blank line of the current segment is seen.
    unwrapped: Option<bool>,
    paragraph: Pending,
    list: Pending,
}

#[derive(Default)]
struct Pending {
    span: Option<Span>,
    lines: Vec<InlineSeq>,
}

impl Pending {
    fn push(&mut self, span: Span, content: &InlineSeq) {
        self.span = Some(self.span.map_or(span, |open| open.cover(span)));
        self.lines.push(content.clone());
    }

    fn take(&mut self) -> Option<(Span, Vec<InlineSeq>)> {
        let span = self.span.take()?;
        Some((span, std::mem::take(&mut self.lines)))
    }
}

impl SegmentGrouper {
    fn push(&mut self, line: &Line) {
        if let LineKind::Blank = line.kind {
            self.flush_paragraph();
            self.flush_list();
            self.unwrapped = None;
            return;
        }
        if self.unwrapped.is_none() {
            self.unwrapped = Some(line.leads_unwrapped_segment());
        }

        match &line.kind {
            LineKind::Heading { level, title, .. } => {
                self.flush_paragraph();
                self.flush_list();
                self.out.push(Block {
                    span: line.span,
                    kind: BlockKind::Heading {
                        level: *level,
                        title: title.clone(),
                    },
                });
            }
            LineKind::ListItem { content } => {
                self.flush_paragraph();
                self.list.push(line.span, content);
            }
            LineKind::Text { content } => {
                self.flush_list();
                self.paragraph.push(line.span, content);
            }
            LineKind::Blank => {}
        }
    }

    fn flush_paragraph(&mut self) {
        if let Some((span, lines)) = self.paragraph.take() {
            let kind = if self.unwrapped == Some(true) {
                BlockKind::Plain { lines }
            } else {
                BlockKind::Paragraph { lines }
            };
            self.out.push(Block { span, kind });
        }
    }

    fn flush_list(&mut self) {
        if let Some((span, items)) = self.list.take() {
            self.out.push(Block {
                span,
                kind: BlockKind::List { items },
            });
        }
    }

    fn finish(mut self) -> Vec<Block> {
        self.flush_paragraph();
        self.flush_list();
        self.out
    }
}

/// Folds every block after a level-2 heading into that heading's section.
fn build_sections(blocks: Vec<Block>) -> Vec<Block> {
    let mut iter = blocks.into_iter().peekable();
    let mut out = Vec::new();

    while let Some(block) = iter.next() {
        if let BlockKind::Heading { level: 2, title } = block.kind {
            let mut children = Vec::new();
            while let Some(next) = iter.peek() {
                if opens_section(next) {
                    break;
                }
                if let Some(child) = iter.next() {
                    children.push(child);
                }
            }
            let end = children
                .last()
                .map(|child| child.span.end)
                .unwrap_or(block.span.end);
            out.push(Block {
                span: Span::new(block.span.start, end),
                kind: BlockKind::Section { title, children },
            });
            continue;
        }

        out.push(block);
    }

    out
}

fn opens_section(block: &Block) -> bool {
    matches!(block.kind, BlockKind::Heading { level: 2, .. })
}

#[cfg(test)]
mod tests {
    use super::build_blocks;
    use crate::ast::{Block, BlockKind};
    use crate::parser::parse;

    fn kinds(source: &str) -> Vec<BlockKind> {
        build_blocks(&parse(source).document.lines)
            .into_iter()
            .map(|block| block.kind)
            .collect()
    }

    fn child_kinds(children: &[Block]) -> Vec<BlockKind> {
        children.iter().map(|block| block.kind.clone()).collect()
    }

    fn names(kinds: &[BlockKind]) -> Vec<&'static str> {
        kinds
            .iter()
            .map(|kind| match kind {
                BlockKind::Section { .. } => "section",
                BlockKind::Heading { .. } => "heading",
                BlockKind::Paragraph { .. } => "paragraph",
                BlockKind::Plain { .. } => "plain",
                BlockKind::List { .. } => "list",
            })
            .collect()
    }

    #[test]
    fn preamble_stays_outside_sections() {
        let blocks = kinds("Lead text.\n\n== One ==\nBody\n\n== Two ==\n\nMore");
        assert_eq!(names(&blocks), vec!["paragraph", "section", "section"]);

        let BlockKind::Section { children, .. } = &blocks[1] else {
            panic!("expected section");
        };
        assert_eq!(names(&child_kinds(children)), vec!["plain"]);

        let BlockKind::Section { children, .. } = &blocks[2] else {
            panic!("expected section");
        };
        assert_eq!(names(&child_kinds(children)), vec!["paragraph"]);
    }

    #[test]
    fn subsections_do_not_open_sections() {
        let blocks = kinds("== A ==\n\n=== B ===\n\ntext");
        assert_eq!(names(&blocks), vec!["section"]);
        let BlockKind::Section { children, .. } = &blocks[0] else {
            panic!("expected section");
        };
        assert_eq!(names(&child_kinds(children)), vec!["heading", "paragraph"]);
    }

    #[test]
    fn template_and_star_lines_lead_unwrapped_segments() {
        assert_eq!(names(&kinds("{{Infobox}}\nrest")), vec!["plain"]);
        assert_eq!(names(&kinds("*not a list\nrest")), vec!["plain"]);
    }

    #[test]
    fn headings_and_lists_break_paragraphs() {
        let blocks = kinds("one\n* a\n* b\ntwo\n== S ==");
        assert_eq!(names(&blocks), vec!["paragraph", "list", "paragraph", "section"]);
    }

    #[test]
    fn blank_lines_split_list_runs() {
        let blocks = kinds("* a\n* b\n\n* c");
        assert_eq!(names(&blocks), vec!["list", "list"]);
        let BlockKind::List { items } = &blocks[0] else {
            panic!("expected list");
        };
        assert_eq!(items.len(), 2);
    }
}
