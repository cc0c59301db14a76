//! Reading character and word diffs rendered in [`Style::Markup`].
//!
//! This is the inverse of the renderer for inline output: it splits the
//! text at unescaped markers and removes the escaping again, so both inputs
//! can be recovered from a rendered diff.
//!
//! # Examples
//!
//! ```
//! use pretty_diff::markup::{self, SegmentKind};
//!
//! let rendered = pretty_diff::diff_chars("cat", "cut", false);
//! let segments = markup::parse(&rendered).unwrap();
//! assert_eq!(segments[1].kind, SegmentKind::Removed);
//! assert_eq!(markup::old_text(&segments), "cat");
//! assert_eq!(markup::new_text(&segments), "cut");
//! ```
//!
//! [`Style::Markup`]: crate::render::Style::Markup

use crate::render::{MARKERS, Mark};
use error_set::error_set;
use nom::{
    IResult, Parser,
    branch::alt,
    bytes::complete::tag,
    character::complete::{anychar, char},
    combinator::{all_consuming, map, not},
    multi::{fold_many0, fold_many1, many0},
    sequence::{delimited, preceded},
};

error_set! {
    /// Errors from reading rendered markup
    MarkupError := {
        /// A marker was opened but never closed
        #[display("Malformed markup at byte {offset}")]
        Malformed { offset: usize },
    }
}

/// What a run of text was marked as
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SegmentKind {
    Unchanged,
    Removed,
    Added,
    WhitespaceRemoved,
    WhitespaceAdded,
}

impl From<Mark> for SegmentKind {
    fn from(mark: Mark) -> Self {
        match mark {
            Mark::Removed => SegmentKind::Removed,
            Mark::Added => SegmentKind::Added,
            Mark::WhitespaceRemoved => SegmentKind::WhitespaceRemoved,
            Mark::WhitespaceAdded => SegmentKind::WhitespaceAdded,
        }
    }
}

impl SegmentKind {
    /// Whether the text belongs to the old input
    pub fn in_old(self) -> bool {
        !matches!(self, SegmentKind::Added | SegmentKind::WhitespaceAdded)
    }

    /// Whether the text belongs to the new input
    pub fn in_new(self) -> bool {
        !matches!(self, SegmentKind::Removed | SegmentKind::WhitespaceRemoved)
    }
}

/// An unescaped run of text and how it was marked
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    pub kind: SegmentKind,
    pub text: String,
}

fn push(mut text: String, c: char) -> String {
    text.push(c);
    text
}

/// `\x` stands for a literal `x`
fn escaped(input: &str) -> IResult<&str, char> {
    preceded(char('\\'), anychar).parse(input)
}

fn opener(input: &str) -> IResult<&str, &str> {
    alt((tag(MARKERS[0]), tag(MARKERS[2]), tag(MARKERS[4]), tag(MARKERS[6]))).parse(input)
}

fn unchanged(input: &str) -> IResult<&str, Segment> {
    map(
        fold_many1(alt((escaped, preceded(not(opener), anychar))), String::new, push),
        |text| Segment {
            kind: SegmentKind::Unchanged,
            text,
        },
    )
    .parse(input)
}

fn region<'a>(mark: Mark) -> impl FnMut(&'a str) -> IResult<&'a str, Segment> {
    move |input: &'a str| {
        let (open, close) = mark.delimiters();
        let content = fold_many0(
            alt((escaped, preceded(not(tag(close)), anychar))),
            String::new,
            push,
        );
        map(delimited(tag(open), content, tag(close)), |text| Segment {
            kind: mark.into(),
            text,
        })
        .parse(input)
    }
}

fn segments(input: &str) -> IResult<&str, Vec<Segment>> {
    all_consuming(many0(alt((
        region(Mark::Removed),
        region(Mark::Added),
        region(Mark::WhitespaceRemoved),
        region(Mark::WhitespaceAdded),
        unchanged,
    ))))
    .parse(input)
}

/// Split rendered markup into segments.
///
/// # Errors
///
/// Returns [`MarkupError::Malformed`] when a region is left open.
pub fn parse(rendered: &str) -> Result<Vec<Segment>, MarkupError> {
    match segments(rendered) {
        Ok((_, segments)) => Ok(segments),
        Err(nom::Err::Error(e) | nom::Err::Failure(e)) => Err(MarkupError::Malformed {
            offset: rendered.len() - e.input.len(),
        }),
        Err(nom::Err::Incomplete(_)) => Err(MarkupError::Malformed {
            offset: rendered.len(),
        }),
    }
}

/// Text of the old input: unchanged and removed segments
pub fn old_text(segments: &[Segment]) -> String {
    segments
        .iter()
        .filter(|s| s.kind.in_old())
        .map(|s| s.text.as_str())
        .collect()
}

/// Text of the new input: unchanged and added segments
pub fn new_text(segments: &[Segment]) -> String {
    segments
        .iter()
        .filter(|s| s.kind.in_new())
        .map(|s| s.text.as_str())
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use similar_asserts::assert_eq;

    fn seg(kind: SegmentKind, text: &str) -> Segment {
        Segment {
            kind,
            text: text.to_string(),
        }
    }

    #[test]
    fn parse_empty() {
        assert_eq!(parse("").unwrap(), vec![]);
    }

    #[test]
    fn parse_plain_text() {
        assert_eq!(
            parse("just text").unwrap(),
            vec![seg(SegmentKind::Unchanged, "just text")]
        );
    }

    #[test]
    fn parse_every_region_kind() {
        assert_eq!(
            parse("a[-b-]{+c+}[~ ~]{~\t~}d").unwrap(),
            vec![
                seg(SegmentKind::Unchanged, "a"),
                seg(SegmentKind::Removed, "b"),
                seg(SegmentKind::Added, "c"),
                seg(SegmentKind::WhitespaceRemoved, " "),
                seg(SegmentKind::WhitespaceAdded, "\t"),
                seg(SegmentKind::Unchanged, "d"),
            ]
        );
    }

    #[test]
    fn parse_unescapes_content() {
        assert_eq!(
            parse(r"\[-x\-] [-a\\-]").unwrap(),
            vec![
                seg(SegmentKind::Unchanged, "[-x-] "),
                seg(SegmentKind::Removed, r"a\"),
            ]
        );
    }

    #[test]
    fn parse_region_ending_in_marker_character() {
        assert_eq!(
            parse("[-a--]{+b++}").unwrap(),
            vec![
                seg(SegmentKind::Removed, "a-"),
                seg(SegmentKind::Added, "b+"),
            ]
        );
    }

    #[test]
    fn parse_literal_bracket_before_marker() {
        assert_eq!(
            parse("x[[-y-]").unwrap(),
            vec![
                seg(SegmentKind::Unchanged, "x["),
                seg(SegmentKind::Removed, "y"),
            ]
        );
    }

    #[test]
    fn parse_unclosed_region() {
        let result = parse("ok [-never closed");
        assert!(matches!(result, Err(MarkupError::Malformed { offset: 3 })));
    }

    #[test]
    fn sides_are_reconstructed() {
        let segments = parse("foo [-bar-]{+baz+} {~ ~}qux").unwrap();
        assert_eq!(old_text(&segments), "foo bar qux");
        assert_eq!(new_text(&segments), "foo baz  qux");
    }
}
