//! Inline span formatting.
//!
//! A single left-to-right pass over one line of text. At every position the
//! scanner tries, in this order:
//!
//! 1. inline code: `` `text` `` (non-empty, no backtick inside)
//! 2. bold: `**text**` (non-empty, no `*` inside)
//! 3. link: `[label](url)` (label without `]`, url without `)`)
//!
//! The first pattern that matches at the current position wins and the scan
//! resumes after it. Anything else accumulates into a [`Span::PlainText`] run.
//! Because the match is leftmost-first, a bold marker inside a code span is
//! never reinterpreted, and unmatched delimiters simply stay as plain text.
//!
//! Spans borrow from the input line, so formatting allocates only the output
//! vector.

use serde::Serialize;

/// An inline-formatted fragment of a line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Span<'a> {
    PlainText { text: &'a str },
    Bold { text: &'a str },
    InlineCode { text: &'a str },
    Link { label: &'a str, url: &'a str },
}

impl<'a> Span<'a> {
    /// The visible text of the span, with delimiters stripped.
    pub fn text(&self) -> &'a str {
        match self {
            Span::PlainText { text } | Span::Bold { text } | Span::InlineCode { text } => text,
            Span::Link { label, .. } => label,
        }
    }

    /// Re-wrap the span in the delimiters it was parsed from.
    pub fn to_markdown(&self) -> String {
        match self {
            Span::PlainText { text } => (*text).to_string(),
            Span::Bold { text } => format!("**{text}**"),
            Span::InlineCode { text } => format!("`{text}`"),
            Span::Link { label, url } => format!("[{label}]({url})"),
        }
    }
}

/// Split a line into spans.
///
/// Total: every input produces a span sequence, and joining
/// [`Span::to_markdown`] over the result reproduces `line` exactly.
/// Runs in time linear in the line length, however many delimiters are left
/// unmatched.
pub fn format(line: &str) -> Vec<Span<'_>> {
    let mut spans = Vec::new();
    let mut delims = Delimiters::default();
    let mut plain_start = 0;
    let mut pos = 0;

    while pos < line.len() {
        let matched = match_code(line, pos, &mut delims)
            .or_else(|| match_bold(line, pos, &mut delims))
            .or_else(|| match_link(line, pos, &mut delims));

        match matched {
            Some((span, consumed)) => {
                if plain_start < pos {
                    spans.push(Span::PlainText {
                        text: &line[plain_start..pos],
                    });
                }
                spans.push(span);
                pos += consumed;
                plain_start = pos;
            }
            None => {
                // Advance by one whole character.
                pos += line[pos..].chars().next().map_or(1, char::len_utf8);
            }
        }
    }

    if plain_start < line.len() {
        spans.push(Span::PlainText {
            text: &line[plain_start..],
        });
    }
    spans
}

/// Position of the next occurrence of one delimiter byte.
///
/// Queries arrive with non-decreasing offsets, so each byte of the line is
/// searched at most once per delimiter.
struct NextByte {
    byte: u8,
    found: Option<usize>,
    searched_from: usize,
}

impl NextByte {
    fn new(byte: u8) -> Self {
        NextByte {
            byte,
            found: None,
            searched_from: usize::MAX,
        }
    }

    /// First index `>= from` holding the delimiter.
    fn at_or_after(&mut self, line: &str, from: usize) -> Option<usize> {
        match self.found {
            Some(i) if i >= from => return Some(i),
            None if from >= self.searched_from => return None,
            _ => {}
        }
        let bytes = line.as_bytes();
        self.found = bytes
            .get(from..)
            .and_then(|tail| tail.iter().position(|&b| b == self.byte))
            .map(|i| from + i);
        self.searched_from = from;
        self.found
    }
}

/// Closing-delimiter lookups shared across one line.
struct Delimiters {
    backtick: NextByte,
    star: NextByte,
    close_bracket: NextByte,
    close_paren: NextByte,
}

impl Default for Delimiters {
    fn default() -> Self {
        Delimiters {
            backtick: NextByte::new(b'`'),
            star: NextByte::new(b'*'),
            close_bracket: NextByte::new(b']'),
            close_paren: NextByte::new(b')'),
        }
    }
}

/// `` `text` `` starting at `pos`.
fn match_code<'a>(
    line: &'a str,
    pos: usize,
    delims: &mut Delimiters,
) -> Option<(Span<'a>, usize)> {
    if !line[pos..].starts_with('`') {
        return None;
    }
    let start = pos + 1;
    let end = delims.backtick.at_or_after(line, start)?;
    if end == start {
        return None;
    }
    Some((Span::InlineCode { text: &line[start..end] }, end + 1 - pos))
}

/// `**text**` starting at `pos`.
fn match_bold<'a>(
    line: &'a str,
    pos: usize,
    delims: &mut Delimiters,
) -> Option<(Span<'a>, usize)> {
    if !line[pos..].starts_with("**") {
        return None;
    }
    let start = pos + 2;
    let end = delims.star.at_or_after(line, start)?;
    if end == start || !line[end..].starts_with("**") {
        return None;
    }
    Some((Span::Bold { text: &line[start..end] }, end + 2 - pos))
}

/// `[label](url)` starting at `pos`.
fn match_link<'a>(
    line: &'a str,
    pos: usize,
    delims: &mut Delimiters,
) -> Option<(Span<'a>, usize)> {
    if !line[pos..].starts_with('[') {
        return None;
    }
    let label_start = pos + 1;
    let label_end = delims.close_bracket.at_or_after(line, label_start)?;
    if label_end == label_start || !line[label_end + 1..].starts_with('(') {
        return None;
    }
    let url_start = label_end + 2;
    let url_end = delims.close_paren.at_or_after(line, url_start)?;
    if url_end == url_start {
        return None;
    }
    let label = &line[label_start..label_end];
    let url = &line[url_start..url_end];
    Some((Span::Link { label, url }, url_end + 1 - pos))
}

/// Join a span sequence back into its markdown source.
pub fn to_markdown(spans: &[Span<'_>]) -> String {
    spans.iter().map(Span::to_markdown).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn plain(text: &str) -> Span<'_> {
        Span::PlainText { text }
    }

    #[test]
    fn plain_line_is_one_span() {
        assert_eq!(format("just words"), vec![plain("just words")]);
    }

    #[test]
    fn empty_line_has_no_spans() {
        assert!(format("").is_empty());
    }

    #[test]
    fn bold_in_the_middle() {
        assert_eq!(
            format("a **strong** claim"),
            vec![
                plain("a "),
                Span::Bold { text: "strong" },
                plain(" claim")
            ]
        );
    }

    #[test]
    fn bold_label_followed_by_text() {
        assert_eq!(
            format("**Trust is Everything**: accuracy matters."),
            vec![
                Span::Bold {
                    text: "Trust is Everything"
                },
                plain(": accuracy matters.")
            ]
        );
    }

    #[test]
    fn inline_code_span() {
        assert_eq!(
            format("run `cargo build` first"),
            vec![
                plain("run "),
                Span::InlineCode {
                    text: "cargo build"
                },
                plain(" first")
            ]
        );
    }

    #[test]
    fn link_span() {
        assert_eq!(
            format("see [the docs](https://example.com/docs)."),
            vec![
                plain("see "),
                Span::Link {
                    label: "the docs",
                    url: "https://example.com/docs"
                },
                plain(".")
            ]
        );
    }

    #[test]
    fn code_wins_over_bold_inside_it() {
        assert_eq!(
            format("`a **not bold** b`"),
            vec![Span::InlineCode {
                text: "a **not bold** b"
            }]
        );
    }

    #[test]
    fn bold_containing_link_syntax_stays_bold() {
        assert_eq!(
            format("**[x](y)**"),
            vec![Span::Bold { text: "[x](y)" }]
        );
    }

    #[test]
    fn link_before_bold_wins_by_position() {
        assert_eq!(
            format("[**a**](u) **b**"),
            vec![
                Span::Link {
                    label: "**a**",
                    url: "u"
                },
                plain(" "),
                Span::Bold { text: "b" }
            ]
        );
    }

    #[test]
    fn unmatched_markers_are_plain() {
        for line in ["**open only", "a ` b", "[label] (url)", "[](x)", "``", "****"] {
            assert_eq!(format(line), vec![plain(line)], "line: {line:?}");
        }
    }

    #[test]
    fn long_unmatched_runs_stay_plain() {
        let lines = [
            "[".repeat(200_000),
            format!("`{}", "x".repeat(200_000)),
            "*".repeat(200_000),
            "[a](".repeat(50_000),
            "[a]".repeat(50_000),
        ];
        for line in &lines {
            assert_eq!(format(line), vec![plain(line)]);
        }
    }

    #[test]
    fn matches_after_unmatched_openers() {
        assert_eq!(
            format("[x **a** `b` (c)"),
            vec![
                plain("[x "),
                Span::Bold { text: "a" },
                plain(" "),
                Span::InlineCode { text: "b" },
                plain(" (c)"),
            ]
        );
    }

    #[test]
    fn single_asterisk_inside_bold_breaks_it() {
        // `**a*b**` has a `*` inside, so no bold span starts at 0.
        let spans = format("**a*b**");
        assert!(spans.iter().all(|s| !matches!(s, Span::Bold { .. })));
        assert_eq!(to_markdown(&spans), "**a*b**");
    }

    #[test]
    fn multibyte_text_is_preserved() {
        let line = "café — **naïve** `ß` ✓";
        let spans = format(line);
        assert_eq!(spans[1], Span::Bold { text: "naïve" });
        assert_eq!(to_markdown(&spans), line);
    }

    #[test]
    fn round_trip_reconstructs_line() {
        let lines = [
            "- **Compute**: ECS for containerized services",
            "mix `code` and **bold** and [a link](https://x.y/z?q=1) end",
            "trailing `tick",
            "**bold** `code` [l](u)",
        ];
        for line in lines {
            assert_eq!(to_markdown(&format(line)), line);
        }
    }

    #[test]
    fn span_text_strips_delimiters() {
        let spans = format("**b** `c` [l](u)");
        let texts: Vec<&str> = spans.iter().map(Span::text).collect();
        assert_eq!(texts, vec!["b", " ", "c", " ", "l"]);
    }
}
