//! Rendering hunks into display text.
//!
//! The default [`Style::Markup`] output is a stable contract:
//!
//! | region                  | rendering      |
//! |-------------------------|----------------|
//! | unchanged               | text as-is     |
//! | removed                 | `[-text-]`     |
//! | added                   | `{+text+}`     |
//! | whitespace-only removed | `[~text~]`     |
//! | whitespace-only added   | `{~text~}`     |
//!
//! Inside any content a backslash is written `\\`, and every character that
//! begins one of the eight marker sequences gets a `\` in front of it, so an
//! unescaped marker always delimits a region.
//!
//! Character and word diffs render each hunk as one region. Line diffs render
//! one row per line, with the terminator written after the closing marker.
//! Rows starting with `\ ` are annotations (a missing final newline, hidden
//! unchanged lines) and never carry content. With line numbers each row is
//! prefixed by `{old} {new} | `, right-aligned, with the column of the side a
//! line is absent from left blank.

use crate::diff::{Hunk, Tag};
use crate::tokenize::{Granularity, Token};
use owo_colors::OwoColorize;

/// How highlighted regions are delimited
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Style {
    /// Bracket markers with escaping
    #[default]
    Markup,
    /// Terminal colour escapes, no escaping
    Ansi,
}

/// Rendering switches.
///
/// `show_line_numbers` and `context` only affect line diffs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DiffOptions {
    /// Render whitespace-only insertions and deletions with their own markers
    pub highlight_whitespace: bool,
    /// Prefix every line row with its old and new line numbers
    pub show_line_numbers: bool,
    /// Keep only this many unchanged lines around each change
    pub context: Option<usize>,
    pub style: Style,
}

/// Kind of highlighted region
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mark {
    Removed,
    Added,
    WhitespaceRemoved,
    WhitespaceAdded,
}

impl Mark {
    /// Opening and closing marker in [`Style::Markup`]
    pub const fn delimiters(self) -> (&'static str, &'static str) {
        match self {
            Mark::Removed => ("[-", "-]"),
            Mark::Added => ("{+", "+}"),
            Mark::WhitespaceRemoved => ("[~", "~]"),
            Mark::WhitespaceAdded => ("{~", "~}"),
        }
    }

    /// Marker for a region with the given tag, or `None` for unchanged text
    pub fn classify(tag: Tag, text: &str, highlight_whitespace: bool) -> Option<Mark> {
        let blank = highlight_whitespace && is_blank(text);
        match tag {
            Tag::Keep => None,
            Tag::Delete if blank => Some(Mark::WhitespaceRemoved),
            Tag::Delete => Some(Mark::Removed),
            Tag::Insert if blank => Some(Mark::WhitespaceAdded),
            Tag::Insert => Some(Mark::Added),
        }
    }
}

/// Every delimiter the markup format uses
pub const MARKERS: [&str; 8] = ["[-", "-]", "{+", "+}", "[~", "~]", "{~", "~}"];

fn is_blank(text: &str) -> bool {
    !text.is_empty() && text.chars().all(char::is_whitespace)
}

/// Append `text` to `out`, escaping backslashes and marker sequences
pub(crate) fn escape_into(out: &mut String, text: &str) {
    for (i, c) in text.char_indices() {
        let rest = &text[i..];
        if c == '\\' || MARKERS.iter().any(|m| rest.starts_with(m)) {
            out.push('\\');
        }
        out.push(c);
    }
}

fn paint(out: &mut String, text: &str, mark: Option<Mark>, style: Style) {
    match (style, mark) {
        (Style::Markup, None) => escape_into(out, text),
        (Style::Markup, Some(mark)) => {
            let (open, close) = mark.delimiters();
            out.push_str(open);
            escape_into(out, text);
            out.push_str(close);
        }
        (Style::Ansi, None) => out.push_str(text),
        (Style::Ansi, Some(Mark::Removed)) => out.push_str(&text.red().to_string()),
        (Style::Ansi, Some(Mark::Added)) => out.push_str(&text.green().to_string()),
        (Style::Ansi, Some(Mark::WhitespaceRemoved)) => out.push_str(&text.on_red().to_string()),
        (Style::Ansi, Some(Mark::WhitespaceAdded)) => out.push_str(&text.on_green().to_string()),
    }
}

/// Render hunks produced at `granularity` into a single string.
pub fn render(hunks: &[Hunk<'_>], granularity: Granularity, options: &DiffOptions) -> String {
    match granularity {
        Granularity::Char | Granularity::Word => render_inline(hunks, options),
        Granularity::Line => render_lines(hunks, options),
    }
}

fn render_inline(hunks: &[Hunk<'_>], options: &DiffOptions) -> String {
    let mut out = String::new();
    for hunk in hunks {
        let text = hunk.text();
        let mark = Mark::classify(hunk.tag, &text, options.highlight_whitespace);
        paint(&mut out, &text, mark, options.style);
    }
    out
}

fn render_lines(hunks: &[Hunk<'_>], options: &DiffOptions) -> String {
    let line_count = hunks
        .iter()
        .map(|h| (h.old_start + h.old_len()).max(h.new_start + h.new_len()))
        .max()
        .unwrap_or(0);

    let mut rows = Rows {
        out: String::new(),
        options,
        width: line_count.max(1).to_string().len(),
        pending_break: false,
    };

    let last = hunks.len().saturating_sub(1);
    for (index, hunk) in hunks.iter().enumerate() {
        match hunk.tag {
            Tag::Keep => rows.unchanged(hunk, index == 0, index == last),
            Tag::Delete => {
                for (i, token) in hunk.tokens.iter().enumerate() {
                    rows.line(token, Tag::Delete, Some(hunk.old_start + i + 1), None);
                }
            }
            Tag::Insert => {
                for (i, token) in hunk.tokens.iter().enumerate() {
                    rows.line(token, Tag::Insert, None, Some(hunk.new_start + i + 1));
                }
            }
        }
    }

    rows.out
}

/// Row writer for line diffs
struct Rows<'o> {
    out: String,
    options: &'o DiffOptions,
    /// Digits of the largest line number
    width: usize,
    /// The previous row ended without a line break
    pending_break: bool,
}

impl Rows<'_> {
    fn begin(&mut self, old: Option<usize>, new: Option<usize>) {
        if self.pending_break {
            self.out.push('\n');
            self.pending_break = false;
        }
        if !self.options.show_line_numbers {
            return;
        }

        let width = self.width;
        let column = |n: Option<usize>| match n {
            Some(n) => format!("{n:>width$}"),
            None => " ".repeat(width),
        };
        let prefix = format!("{} {} | ", column(old), column(new));
        match self.options.style {
            Style::Markup => self.out.push_str(&prefix),
            Style::Ansi => self.out.push_str(&prefix.dimmed().to_string()),
        }
    }

    fn line(&mut self, token: &Token<'_>, tag: Tag, old: Option<usize>, new: Option<usize>) {
        self.begin(old, new);

        let (body, terminator) = token.split_terminator();
        let mark = Mark::classify(tag, token.text, self.options.highlight_whitespace);
        paint(&mut self.out, body, mark, self.options.style);

        if !terminator.is_empty() {
            self.out.push_str(terminator);
        } else if tag != Tag::Keep {
            self.pending_break = true;
            self.annotation("No newline at end of file");
        }
    }

    fn annotation(&mut self, note: &str) {
        self.begin(None, None);
        let row = format!("\\ {note}");
        match self.options.style {
            Style::Markup => self.out.push_str(&row),
            Style::Ansi => self.out.push_str(&row.dimmed().to_string()),
        }
        self.pending_break = true;
    }

    /// Write an unchanged run, collapsing it when a context size is set.
    /// A run with no change before it keeps only its tail, one with no change
    /// after it only its head.
    fn unchanged(&mut self, hunk: &Hunk<'_>, is_first: bool, is_last: bool) {
        let len = hunk.tokens.len();
        let (head, tail) = match self.options.context {
            None => (len, 0),
            Some(context) => (
                if is_first { 0 } else { context },
                if is_last { 0 } else { context },
            ),
        };

        if head + tail >= len {
            for i in 0..len {
                self.keep_line(hunk, i);
            }
            return;
        }

        for i in 0..head {
            self.keep_line(hunk, i);
        }
        let hidden = len - head - tail;
        let plural = if hidden == 1 { "" } else { "s" };
        self.annotation(&format!("{hidden} unchanged line{plural}"));
        for i in len - tail..len {
            self.keep_line(hunk, i);
        }
    }

    fn keep_line(&mut self, hunk: &Hunk<'_>, i: usize) {
        self.line(
            &hunk.tokens[i],
            Tag::Keep,
            Some(hunk.old_start + i + 1),
            Some(hunk.new_start + i + 1),
        );
    }
}
