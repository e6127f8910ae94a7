//! Markdown-lite content parsing.
//!
//! Blog posts and project descriptions are written in a deliberately small
//! markdown dialect:
//!
//! ```text
//! ## Heading            (## to ####)
//! plain paragraph lines with **bold**, `code` and [links](https://…)
//! - list item           (or "* item")
//! > quoted line
//! ```lang               fenced code, verbatim until the closing fence
//! {{youtube:VIDEO_ID}}  video embed
//! *Closing question?*   emphasis-only paragraph, rendered as a callout
//! ```
//!
//! Parsing is two-level. [`scan`] turns a document into [`Block`]s with a
//! single forward pass over its lines; [`format`] turns one line of a
//! text-bearing block into inline [`Span`]s. Both are pure and total: any
//! string is accepted, and malformed markup degrades to plainer structure.
//!
//! Nothing here knows about HTML. The [`render`](crate::render) module maps
//! blocks and spans to markup, and [`plain_text`] flattens them for excerpts
//! and reading-time estimates.

mod blocks;
mod inline;

pub use blocks::{Block, EmbedKind, Open, Scanner, scan};
pub use inline::{Span, format, to_markdown};

pub(crate) use blocks::is_video_id;

/// Flatten blocks into whitespace-separated plain text.
///
/// Inline delimiters are dropped (only span text is kept); code blocks and
/// embeds contribute nothing.
pub fn plain_text(blocks: &[Block]) -> String {
    let mut lines: Vec<String> = Vec::new();
    for block in blocks {
        match block {
            Block::Heading { text, .. } | Block::Emphasis { text } => lines.push(text.clone()),
            Block::Paragraph { .. } | Block::List { .. } | Block::Blockquote { .. } => {
                lines.extend(
                    block
                        .spans()
                        .iter()
                        .map(|spans| spans.iter().map(Span::text).collect::<String>()),
                );
            }
            Block::CodeBlock { .. } | Block::Embed { .. } => {}
        }
    }
    lines
        .iter()
        .flat_map(|line| line.split_whitespace())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Number of words a reader goes through, code included.
pub fn word_count(blocks: &[Block]) -> usize {
    let code_words: usize = blocks
        .iter()
        .map(|b| match b {
            Block::CodeBlock { lines, .. } => {
                lines.iter().map(|l| l.split_whitespace().count()).sum()
            }
            _ => 0,
        })
        .sum();
    plain_text(blocks).split_whitespace().count() + code_words
}
