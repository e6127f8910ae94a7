//! Blocks and spans to HTML.
//!
//! | Block | Markup |
//! |-------|--------|
//! | `Heading` | `h2`..`h4` |
//! | `Paragraph` | one `p` per line |
//! | `Emphasis` | `p.callout > em` |
//! | `List` | `ul > li` |
//! | `CodeBlock` | `pre > code.language-<lang>` |
//! | `Blockquote` | `blockquote > p` per non-empty line |
//! | `Embed` | `div.video-embed > iframe` |
//!
//! Headings and callouts are shown as plain text; paragraph lines, list
//! items and quote lines are inline-formatted. All text goes through maud's
//! escaping, so no block ever produces raw HTML.

use crate::markup::{self, Block, EmbedKind, Span};
use crate::video;
use maud::{Markup, html};

/// Render a markdown-lite document.
pub fn document(source: &str) -> Markup {
    blocks(&markup::scan(source))
}

/// Render blocks in order. Adjacent blocks are never merged.
pub fn blocks(blocks: &[Block]) -> Markup {
    html! {
        @for block in blocks {
            (self::block(block))
        }
    }
}

pub fn block(block: &Block) -> Markup {
    match block {
        Block::Heading { level, text } => match level {
            2 => html! { h2 { (text) } },
            3 => html! { h3 { (text) } },
            _ => html! { h4 { (text) } },
        },
        Block::Paragraph { lines } => html! {
            @for l in lines {
                p { (line(l)) }
            }
        },
        Block::Emphasis { text } => html! {
            p.callout {
                em {
                    @for (i, l) in text.lines().enumerate() {
                        @if i > 0 { br; }
                        (l)
                    }
                }
            }
        },
        Block::List { items } => html! {
            ul {
                @for item in items {
                    li { (line(item)) }
                }
            }
        },
        Block::CodeBlock { language, lines } => html! {
            pre {
                code class={ "language-" (language) } { (lines.join("\n")) }
            }
        },
        Block::Blockquote { lines } => html! {
            blockquote {
                @for l in lines.iter().filter(|l| !l.trim().is_empty()) {
                    p { (line(l)) }
                }
            }
        },
        Block::Embed {
            kind: EmbedKind::Youtube,
            video_id,
        } => html! {
            div.video-embed {
                iframe
                    src=(video::youtube_embed_url(video_id))
                    title="YouTube video player"
                    loading="lazy"
                    allow="accelerometer; autoplay; clipboard-write; encrypted-media; gyroscope; picture-in-picture"
                    allowfullscreen {}
            }
        },
    }
}

/// Format one line and render its spans.
pub fn line(text: &str) -> Markup {
    spans(&markup::format(text))
}

pub fn spans(spans: &[Span<'_>]) -> Markup {
    html! {
        @for span in spans {
            @match span {
                Span::PlainText { text } => { (text) }
                Span::Bold { text } => { strong { (text) } }
                Span::InlineCode { text } => { code { (text) } }
                Span::Link { label, url } => {
                    @let external = is_external(url);
                    a href=(url)
                        target=[external.then_some("_blank")]
                        rel=[external.then_some("noopener noreferrer")] { (label) }
                }
            }
        }
    }
}

fn is_external(url: &str) -> bool {
    url.starts_with("https://") || url.starts_with("http://") || url.starts_with("//")
}
