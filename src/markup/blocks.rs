//! Line-oriented block scanner.
//!
//! [`scan`] folds a [`Scanner`] over the lines of a document. The scanner
//! holds the finished blocks plus at most one open block ([`Open`]); every
//! line either extends the open block, closes it, or emits a block directly.
//! There is no lookahead and no backtracking, so a document is scanned in a
//! single linear pass and malformed input degrades to plainer structure
//! instead of failing.
//!
//! ## Line rules (first match wins)
//!
//! | State / line | Effect |
//! |--------------|--------|
//! | code open, closing fence | emit `CodeBlock` |
//! | code open, anything else | append raw line to code |
//! | `{{youtube:<id>}}` | flush, emit `Embed` |
//! | quote open, quote line | append to quote |
//! | quote open, other non-blank | flush quote, re-evaluate the line |
//! | opening fence | flush, open code |
//! | blank | flush |
//! | quote line | flush, open quote |
//! | `##`..`####` heading | flush, emit `Heading` |
//! | `- ` / `* ` item | flush paragraph/quote, append item |
//! | anything else | flush list/quote, append paragraph line |
//!
//! A fence left open at the end of the document becomes a `CodeBlock`
//! holding every remaining line. Blocks flushed before the fence opened are
//! never touched by it.

use super::inline::{self, Span};
use serde::Serialize;

const FENCE: &str = "```";
const DEFAULT_LANGUAGE: &str = "text";

/// A structurally distinct unit of document content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Block {
    /// `##` to `####` heading; `level` is the number of `#`.
    Heading { level: u8, text: String },
    /// Consecutive plain lines. Each line is formatted and displayed on its own.
    Paragraph { lines: Vec<String> },
    /// A paragraph wholly wrapped in `*...*` or `_..._`, markers stripped.
    /// Rendered as a callout rather than body text.
    Emphasis { text: String },
    /// Consecutive `- ` / `* ` items, markers stripped.
    List { items: Vec<String> },
    /// Fenced code, lines verbatim.
    CodeBlock { language: String, lines: Vec<String> },
    /// Consecutive `> ` lines, markers stripped.
    Blockquote { lines: Vec<String> },
    /// A `{{youtube:<id>}}` line.
    Embed { kind: EmbedKind, video_id: String },
}

/// Video providers recognised by embed tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EmbedKind {
    Youtube,
}

impl Block {
    /// Inline spans for each text line of the block.
    ///
    /// Paragraph lines, list items and quote lines are formatted; headings,
    /// emphasis callouts, code and embeds carry no spans.
    pub fn spans(&self) -> Vec<Vec<Span<'_>>> {
        match self {
            Block::Paragraph { lines } | Block::Blockquote { lines } => {
                lines.iter().map(|l| inline::format(l)).collect()
            }
            Block::List { items } => items.iter().map(|i| inline::format(i)).collect(),
            Block::Heading { .. }
            | Block::Emphasis { .. }
            | Block::CodeBlock { .. }
            | Block::Embed { .. } => Vec::new(),
        }
    }
}

/// The block currently accumulating lines.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub enum Open {
    #[default]
    None,
    Paragraph(Vec<String>),
    List(Vec<String>),
    Quote(Vec<String>),
    Code { language: String, lines: Vec<String> },
}

/// Scanner state threaded through the fold over document lines.
#[derive(Debug, Default, Clone)]
pub struct Scanner {
    blocks: Vec<Block>,
    open: Open,
}

impl Scanner {
    pub fn new() -> Self {
        Self::default()
    }

    /// The block currently open, if any.
    pub fn open(&self) -> &Open {
        &self.open
    }

    /// Blocks completed so far.
    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    /// Consume one line.
    pub fn feed(mut self, line: &str) -> Self {
        self.push_line(line);
        self
    }

    /// Flush whatever is still open and return the blocks.
    pub fn finish(mut self) -> Vec<Block> {
        if let Open::Code { language, .. } = &self.open {
            log::warn!("unterminated ```{language} fence runs to the end of the document");
        }
        self.flush();
        self.blocks
    }

    fn push_line(&mut self, raw: &str) {
        let line = raw.strip_suffix('\r').unwrap_or(raw);

        if let Open::Code { lines, .. } = &mut self.open {
            if line.trim() == FENCE {
                self.flush();
            } else {
                lines.push(line.to_string());
            }
            return;
        }

        let trimmed = line.trim();

        if let Some(video_id) = embed_token(trimmed) {
            self.flush();
            self.blocks.push(Block::Embed {
                kind: EmbedKind::Youtube,
                video_id: video_id.to_string(),
            });
            return;
        }

        if let Open::Quote(lines) = &mut self.open {
            if let Some(text) = quote_text(trimmed) {
                lines.push(text.to_string());
                return;
            }
            if !trimmed.is_empty() {
                // Close the quote and treat this line afresh.
                self.flush();
            }
        }

        if let Some(language) = opening_fence(trimmed) {
            self.flush();
            self.open = Open::Code {
                language,
                lines: Vec::new(),
            };
        } else if trimmed.is_empty() {
            self.flush();
        } else if let Some(text) = quote_text(trimmed) {
            self.flush();
            self.open = Open::Quote(vec![text.to_string()]);
        } else if let Some((level, text)) = heading(trimmed) {
            self.flush();
            self.blocks.push(Block::Heading {
                level,
                text: text.to_string(),
            });
        } else if let Some(item) = list_item(trimmed) {
            if !matches!(self.open, Open::List(_)) {
                self.flush();
            }
            match &mut self.open {
                Open::List(items) => items.push(item.to_string()),
                open => *open = Open::List(vec![item.to_string()]),
            }
        } else {
            if !matches!(self.open, Open::Paragraph(_)) {
                self.flush();
            }
            match &mut self.open {
                Open::Paragraph(lines) => lines.push(trimmed.to_string()),
                open => *open = Open::Paragraph(vec![trimmed.to_string()]),
            }
        }
    }

    /// Close the open block, if any, and append it to the output.
    fn flush(&mut self) {
        let block = match std::mem::take(&mut self.open) {
            Open::None => return,
            Open::Paragraph(lines) => paragraph_block(lines),
            Open::List(items) => Block::List { items },
            Open::Quote(lines) if lines.iter().all(|l| l.is_empty()) => return,
            Open::Quote(lines) => Block::Blockquote { lines },
            Open::Code { language, lines } => Block::CodeBlock { language, lines },
        };
        self.blocks.push(block);
    }
}

/// Scan a document into blocks.
pub fn scan(document: &str) -> Vec<Block> {
    document
        .lines()
        .fold(Scanner::new(), |scanner, line| scanner.feed(line))
        .finish()
}

/// Classify a finished paragraph: emphasis-only callout or plain paragraph.
fn paragraph_block(lines: Vec<String>) -> Block {
    let joined = lines.join("\n");
    match emphasis_text(joined.trim()) {
        Some(text) => Block::Emphasis {
            text: text.to_string(),
        },
        None => Block::Paragraph { lines },
    }
}

/// Interior of a paragraph wrapped in matching single `*` or `_` markers.
///
/// Paragraphs containing `**` are never emphasis-only, even when wrapped.
fn emphasis_text(text: &str) -> Option<&str> {
    if text.contains("**") {
        return None;
    }
    ['*', '_'].into_iter().find_map(|marker| {
        let inner = text.strip_prefix(marker)?.strip_suffix(marker)?.trim();
        (!inner.is_empty()).then_some(inner)
    })
}

/// Language tag of an opening fence line, or `None` if not a fence.
///
/// Runs of more than three backticks are not fences.
fn opening_fence(line: &str) -> Option<String> {
    let tag = line.strip_prefix(FENCE)?;
    if tag.starts_with('`') {
        return None;
    }
    let language = tag
        .split_whitespace()
        .next()
        .map(str::to_lowercase)
        .unwrap_or_else(|| DEFAULT_LANGUAGE.to_string());
    Some(language)
}

/// Text of a quote line: `> text` or a bare `>`.
fn quote_text(line: &str) -> Option<&str> {
    if line == ">" {
        return Some("");
    }
    line.strip_prefix("> ").map(str::trim)
}

/// Level and text of a `##`..`####` heading.
fn heading(line: &str) -> Option<(u8, &str)> {
    let hashes = line.bytes().take_while(|&b| b == b'#').count();
    if !(2..=4).contains(&hashes) {
        return None;
    }
    let rest = &line[hashes..];
    if !rest.starts_with(char::is_whitespace) {
        return None;
    }
    Some((hashes as u8, rest.trim()))
}

/// Item text of a `- ` or `* ` list line.
fn list_item(line: &str) -> Option<&str> {
    line.strip_prefix("- ")
        .or_else(|| line.strip_prefix("* "))
        .map(str::trim)
}

/// Video ID of a `{{youtube:<id>}}` line.
pub(crate) fn embed_token(line: &str) -> Option<&str> {
    let id = line.strip_prefix("{{youtube:")?.strip_suffix("}}")?.trim();
    if is_video_id(id) {
        Some(id)
    } else {
        log::warn!("ignoring embed with invalid video id: {line}");
        None
    }
}

/// YouTube IDs are URL-safe base64 characters.
pub(crate) fn is_video_id(id: &str) -> bool {
    !id.is_empty()
        && id
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_')
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn lines(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| s.to_string()).collect()
    }

    fn para(v: &[&str]) -> Block {
        Block::Paragraph { lines: lines(v) }
    }

    // =========================================================================
    // Single-block documents
    // =========================================================================

    #[test]
    fn empty_document_has_no_blocks() {
        assert!(scan("").is_empty());
        assert!(scan("   \n\n \t\n").is_empty());
    }

    #[test]
    fn single_heading() {
        assert_eq!(
            scan("## Title"),
            vec![Block::Heading {
                level: 2,
                text: "Title".into()
            }]
        );
    }

    #[test]
    fn heading_levels() {
        let blocks = scan("## Two\n### Three\n#### Four");
        let levels: Vec<u8> = blocks
            .iter()
            .map(|b| match b {
                Block::Heading { level, .. } => *level,
                other => panic!("expected heading, got {other:?}"),
            })
            .collect();
        assert_eq!(levels, vec![2, 3, 4]);
    }

    #[test]
    fn one_and_five_hashes_are_paragraphs() {
        assert_eq!(
            scan("# Top\n##### Deep\n##nospace"),
            vec![para(&["# Top", "##### Deep", "##nospace"])]
        );
    }

    #[test]
    fn list_grouping() {
        assert_eq!(
            scan("- a\n- b\n- c"),
            vec![Block::List {
                items: lines(&["a", "b", "c"])
            }]
        );
    }

    #[test]
    fn star_items_join_dash_items() {
        assert_eq!(
            scan("- a\n* b"),
            vec![Block::List {
                items: lines(&["a", "b"])
            }]
        );
    }

    #[test]
    fn code_fence_is_atomic() {
        assert_eq!(
            scan("```js\nconst x = 1;\n## not a heading\n```"),
            vec![Block::CodeBlock {
                language: "js".into(),
                lines: lines(&["const x = 1;", "## not a heading"])
            }]
        );
    }

    #[test]
    fn code_preserves_indentation_and_blank_lines() {
        assert_eq!(
            scan("```\nfn main() {\n\n    println!();\n}\n```"),
            vec![Block::CodeBlock {
                language: "text".into(),
                lines: lines(&["fn main() {", "", "    println!();", "}"])
            }]
        );
    }

    #[test]
    fn fence_language_is_lowercased_first_word() {
        assert_eq!(
            scan("```Python title=x\npass\n```"),
            vec![Block::CodeBlock {
                language: "python".into(),
                lines: lines(&["pass"])
            }]
        );
    }

    #[test]
    fn nested_fence_with_language_does_not_close() {
        assert_eq!(
            scan("```md\n```rust\nlet a = 1;\n```"),
            vec![Block::CodeBlock {
                language: "md".into(),
                lines: lines(&["```rust", "let a = 1;"])
            }]
        );
    }

    #[test]
    fn four_backticks_are_not_a_fence() {
        assert_eq!(scan("````"), vec![para(&["````"])]);
        assert_eq!(
            scan("````rust
let x = 1;"),
            vec![para(&["````rust", "let x = 1;"])]
        );
    }

    #[test]
    fn unterminated_fence_runs_to_end() {
        assert_eq!(
            scan("```py\nprint(1)"),
            vec![Block::CodeBlock {
                language: "py".into(),
                lines: lines(&["print(1)"])
            }]
        );
    }

    #[test]
    fn unterminated_fence_keeps_prior_blocks() {
        assert_eq!(
            scan("Intro line\n- item\n```sh\nls\n\n## inside"),
            vec![
                para(&["Intro line"]),
                Block::List {
                    items: lines(&["item"])
                },
                Block::CodeBlock {
                    language: "sh".into(),
                    lines: lines(&["ls", "", "## inside"])
                }
            ]
        );
    }

    // =========================================================================
    // Emphasis-only paragraphs
    // =========================================================================

    #[test]
    fn emphasis_only_paragraph() {
        assert_eq!(
            scan("*Question for readers?*"),
            vec![Block::Emphasis {
                text: "Question for readers?".into()
            }]
        );
    }

    #[test]
    fn underscore_emphasis_paragraph() {
        assert_eq!(
            scan("_Closing thought._"),
            vec![Block::Emphasis {
                text: "Closing thought.".into()
            }]
        );
    }

    #[test]
    fn bold_only_is_not_emphasis() {
        assert_eq!(scan("**Bold only**"), vec![para(&["**Bold only**"])]);
    }

    #[test]
    fn mismatched_markers_are_not_emphasis() {
        assert_eq!(scan("*half_"), vec![para(&["*half_"])]);
        assert_eq!(scan("_"), vec![para(&["_"])]);
    }

    #[test]
    fn multi_line_emphasis_paragraph() {
        assert_eq!(
            scan("*What challenges are you facing?\nI'd love to hear.*"),
            vec![Block::Emphasis {
                text: "What challenges are you facing?\nI'd love to hear.".into()
            }]
        );
    }

    // =========================================================================
    // Blockquotes
    // =========================================================================

    #[test]
    fn blockquote_termination() {
        assert_eq!(
            scan("> line one\n> line two\nNormal text"),
            vec![
                Block::Blockquote {
                    lines: lines(&["line one", "line two"])
                },
                para(&["Normal text"])
            ]
        );
    }

    #[test]
    fn bare_marker_continues_quote() {
        assert_eq!(
            scan("> first\n>\n> second"),
            vec![Block::Blockquote {
                lines: lines(&["first", "", "second"])
            }]
        );
    }

    #[test]
    fn lone_marker_after_paragraph_adds_nothing() {
        assert_eq!(scan("text\n>"), vec![para(&["text"])]);
        assert_eq!(scan(">\n>\n\nafter"), vec![para(&["after"])]);
    }

    #[test]
    fn embed_splits_a_quote() {
        assert_eq!(
            scan("> q\n{{youtube:abc}}\n> r"),
            vec![
                Block::Blockquote {
                    lines: lines(&["q"])
                },
                Block::Embed {
                    kind: EmbedKind::Youtube,
                    video_id: "abc".into()
                },
                Block::Blockquote {
                    lines: lines(&["r"])
                }
            ]
        );
    }

    #[test]
    fn list_after_quote_closes_it() {
        assert_eq!(
            scan("> q\n- a"),
            vec![
                Block::Blockquote {
                    lines: lines(&["q"])
                },
                Block::List {
                    items: lines(&["a"])
                }
            ]
        );
    }

    #[test]
    fn quote_wins_over_list_marker() {
        assert_eq!(
            scan("> - item"),
            vec![Block::Blockquote {
                lines: lines(&["- item"])
            }]
        );
    }

    #[test]
    fn heading_after_quote_closes_it() {
        assert_eq!(
            scan("> quoted\n## Next"),
            vec![
                Block::Blockquote {
                    lines: lines(&["quoted"])
                },
                Block::Heading {
                    level: 2,
                    text: "Next".into()
                }
            ]
        );
    }

    #[test]
    fn fence_after_quote_closes_it() {
        assert_eq!(
            scan("> quoted\n```\ncode\n```"),
            vec![
                Block::Blockquote {
                    lines: lines(&["quoted"])
                },
                Block::CodeBlock {
                    language: "text".into(),
                    lines: lines(&["code"])
                }
            ]
        );
    }

    // =========================================================================
    // Mixed content
    // =========================================================================

    #[test]
    fn heading_interrupts_paragraph_and_list() {
        assert_eq!(
            scan("text\n## H\n- a\n### I\nmore"),
            vec![
                para(&["text"]),
                Block::Heading {
                    level: 2,
                    text: "H".into()
                },
                Block::List {
                    items: lines(&["a"])
                },
                Block::Heading {
                    level: 3,
                    text: "I".into()
                },
                para(&["more"])
            ]
        );
    }

    #[test]
    fn heading_followed_by_list_without_blank_line() {
        assert_eq!(
            scan("### CAD File Processing\n- Streaming uploads\n- Background processing"),
            vec![
                Block::Heading {
                    level: 3,
                    text: "CAD File Processing".into()
                },
                Block::List {
                    items: lines(&["Streaming uploads", "Background processing"])
                }
            ]
        );
    }

    #[test]
    fn paragraph_then_list_then_paragraph() {
        assert_eq!(
            scan("We implemented:\n- one\n- two\nDone."),
            vec![
                para(&["We implemented:"]),
                Block::List {
                    items: lines(&["one", "two"])
                },
                para(&["Done."])
            ]
        );
    }

    #[test]
    fn blank_line_separates_paragraphs() {
        assert_eq!(
            scan("first\nstill first\n\nsecond"),
            vec![para(&["first", "still first"]), para(&["second"])]
        );
    }

    #[test]
    fn embed_line_becomes_embed_block() {
        assert_eq!(
            scan("Watch this:\n{{youtube:dQw4w9WgXcQ}}\nThanks."),
            vec![
                para(&["Watch this:"]),
                Block::Embed {
                    kind: EmbedKind::Youtube,
                    video_id: "dQw4w9WgXcQ".into()
                },
                para(&["Thanks."])
            ]
        );
    }

    #[test]
    fn invalid_embed_is_paragraph_text() {
        assert_eq!(
            scan("{{youtube:not valid}}"),
            vec![para(&["{{youtube:not valid}}"])]
        );
    }

    #[test]
    fn embed_inside_code_is_verbatim() {
        assert_eq!(
            scan("```\n{{youtube:abc}}\n```"),
            vec![Block::CodeBlock {
                language: "text".into(),
                lines: lines(&["{{youtube:abc}}"])
            }]
        );
    }

    #[test]
    fn crlf_line_endings() {
        assert_eq!(
            scan("## Title\r\n\r\n- a\r\n- b\r\n"),
            vec![
                Block::Heading {
                    level: 2,
                    text: "Title".into()
                },
                Block::List {
                    items: lines(&["a", "b"])
                }
            ]
        );
    }

    #[test]
    fn emphasis_line_after_list_is_its_own_block() {
        assert_eq!(
            scan("- a\n*x*"),
            vec![
                Block::List {
                    items: lines(&["a"])
                },
                Block::Emphasis { text: "x".into() }
            ]
        );
    }

    #[test]
    fn every_content_line_lands_in_one_block() {
        let doc = "## Intro\ntext one\ntext two\n- a\n* b\n> q1\n>\n> q2\n\
                   {{youtube:abc}}\n> r\n- c\n*callout*\n```rust\nlet x = 1;\n```\n\
                   ### Tail\n\nlast";
        let blocks = scan(doc);

        let covered: usize = blocks
            .iter()
            .map(|block| match block {
                Block::Heading { .. } | Block::Embed { .. } => 1,
                Block::Paragraph { lines } | Block::Blockquote { lines } => lines.len(),
                Block::List { items } => items.len(),
                Block::Emphasis { text } => text.lines().count(),
                // Content plus both fence lines.
                Block::CodeBlock { lines, .. } => lines.len() + 2,
            })
            .sum();
        let non_blank = doc.lines().filter(|l| !l.trim().is_empty()).count();
        assert_eq!(covered, non_blank);
        assert_eq!(blocks.len(), 11);
    }

    #[test]
    fn rescan_is_identical() {
        let doc = "## A\n\ntext **b**\n\n- x\n\n```rs\nfn f() {}\n```\n\n> q\n\n*end*";
        assert_eq!(scan(doc), scan(doc));
    }

    #[test]
    fn scanner_can_be_fed_partially() {
        let scanner = Scanner::new().feed("- one").feed("- two");
        assert!(scanner.blocks().is_empty());
        assert_eq!(scanner.open(), &Open::List(lines(&["one", "two"])));

        let scanner = scanner.feed("");
        assert_eq!(scanner.open(), &Open::None);
        assert_eq!(scanner.blocks().len(), 1);
    }

    #[test]
    fn spans_only_for_text_blocks() {
        let blocks = scan("## **H**\n\n- **a**\n\n```\n**c**\n```");
        assert!(blocks[0].spans().is_empty());
        assert_eq!(blocks[1].spans(), vec![vec![Span::Bold { text: "a" }]]);
        assert!(blocks[2].spans().is_empty());
    }
}
