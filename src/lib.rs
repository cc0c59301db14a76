use error_set::error_set;
use std::fmt;

pub mod diff;
pub mod markup;
pub mod render;
pub mod tokenize;

pub use markup::MarkupError;
pub use render::{DiffOptions, Style};
pub use tokenize::Granularity;

error_set! {
    /// Top-level error for pretty-diff operations
    PrettyDiffError := {
        #[display("Failed to read {path}: {message}")]
        ReadFailed { path: String, message: String },
        #[display("Failed to write output: {message}")]
        WriteFailed { message: String },
    } || EncodingError

    /// Errors from validating raw input
    EncodingError := {
        #[display("{side} input is not valid UTF-8 (invalid sequence at byte {offset})")]
        InvalidInputEncoding { side: Side, offset: usize },
    }
}

/// Which of the two inputs something refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    Old,
    New,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Old => write!(f, "old"),
            Side::New => write!(f, "new"),
        }
    }
}

/// Diff two texts at `granularity` and render the result.
///
/// # Examples
/// ```
/// use pretty_diff::{DiffOptions, Granularity};
///
/// let out = pretty_diff::diff("a b", "a c", Granularity::Word, &DiffOptions::default());
/// assert_eq!(out, "a [-b-]{+c+}");
/// ```
pub fn diff(old: &str, new: &str, granularity: Granularity, options: &DiffOptions) -> String {
    let old_tokens = tokenize::tokenize(old, granularity);
    let new_tokens = tokenize::tokenize(new, granularity);
    let script = diff::compute_edit_script(&old_tokens, &new_tokens);

    log::debug!(
        "{} diff: {} old tokens, {} new tokens, distance {}",
        granularity,
        old_tokens.len(),
        new_tokens.len(),
        script
            .iter()
            .filter(|op| op.tag() != diff::Tag::Keep)
            .count()
    );

    let hunks = diff::group(&script, &old_tokens, &new_tokens);
    render::render(&hunks, granularity, options)
}

/// Character-level diff
///
/// # Examples
/// ```
/// assert_eq!(pretty_diff::diff_chars("cat", "cut", false), "c[-a-]{+u+}t");
/// ```
pub fn diff_chars(old: &str, new: &str, highlight_whitespace: bool) -> String {
    let options = DiffOptions {
        highlight_whitespace,
        ..DiffOptions::default()
    };
    diff(old, new, Granularity::Char, &options)
}

/// Word-level diff
///
/// # Examples
/// ```
/// let out = pretty_diff::diff_words("foo bar", "foo  bar", true);
/// assert_eq!(out, "foo[~ ~]{~  ~}bar");
/// ```
pub fn diff_words(old: &str, new: &str, highlight_whitespace: bool) -> String {
    let options = DiffOptions {
        highlight_whitespace,
        ..DiffOptions::default()
    };
    diff(old, new, Granularity::Word, &options)
}

/// Line-level diff, one row per line
///
/// # Examples
/// ```
/// let out = pretty_diff::diff_lines("a\nb\n", "a\nc\n", true);
/// assert_eq!(out, "1 1 | a\n2   | [-b-]\n  2 | {+c+}\n");
/// ```
pub fn diff_lines(old: &str, new: &str, show_line_numbers: bool) -> String {
    let options = DiffOptions {
        show_line_numbers,
        ..DiffOptions::default()
    };
    diff(old, new, Granularity::Line, &options)
}

/// Like [`diff`], for raw bytes that must be valid UTF-8.
///
/// # Errors
///
/// Returns [`EncodingError::InvalidInputEncoding`] naming the first input that
/// fails to decode.
pub fn diff_bytes(
    old: &[u8],
    new: &[u8],
    granularity: Granularity,
    options: &DiffOptions,
) -> Result<String, EncodingError> {
    let old = decode(old, Side::Old)?;
    let new = decode(new, Side::New)?;
    Ok(diff(old, new, granularity, options))
}

fn decode(bytes: &[u8], side: Side) -> Result<&str, EncodingError> {
    std::str::from_utf8(bytes).map_err(|e| EncodingError::InvalidInputEncoding {
        side,
        offset: e.valid_up_to(),
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use similar_asserts::assert_eq;

    #[test]
    fn identical_inputs_have_no_markers() {
        assert_eq!(diff_chars("same text", "same text", true), "same text");
        assert_eq!(diff_words("same text", "same text", true), "same text");
        assert_eq!(diff_lines("a\nb\n", "a\nb\n", false), "a\nb\n");
    }

    #[test]
    fn empty_old_is_one_insertion() {
        assert_eq!(diff_chars("", "abc", false), "{+abc+}");
        assert_eq!(diff_words("", "two words", false), "{+two words+}");
    }

    #[test]
    fn empty_new_is_one_deletion() {
        assert_eq!(diff_chars("abc", "", false), "[-abc-]");
        assert_eq!(diff_lines("a\nb\n", "", false), "[-a-]\n[-b-]\n");
    }

    #[test]
    fn both_empty_is_empty() {
        assert_eq!(diff_chars("", "", true), "");
        assert_eq!(diff_words("", "", true), "");
        assert_eq!(diff_lines("", "", true), "");
    }

    #[test]
    fn word_diff_replaces_whole_words() {
        assert_eq!(
            diff_words("the quick fox", "the slow fox", false),
            "the [-quick-]{+slow+} fox"
        );
    }

    #[test]
    fn whitespace_only_change_is_isolated() {
        let out = diff_chars("foo bar", "foo  bar", true);
        assert_eq!(out, "foo {~ ~}bar");
        assert!(!out.contains("{+"));
        assert!(!out.contains("[-"));
    }

    #[test]
    fn line_numbers_count_each_side() {
        let out = diff_lines("a\nb\nc\n", "a\nc\nd\n", true);
        insta::assert_snapshot!(out, @r"
        1 1 | a
        2   | [-b-]
        3 2 | c
          3 | {+d+}
        ");
    }

    #[test]
    fn long_disjoint_texts_render_two_regions() {
        let old = "a".repeat(3000);
        let new = "b".repeat(3000);
        assert_eq!(diff_chars(&old, &new, false), format!("[-{old}-]{{+{new}+}}"));
    }

    #[test]
    fn ansi_style_through_entry_point() {
        let options = DiffOptions {
            style: Style::Ansi,
            ..DiffOptions::default()
        };
        let out = diff("a", "b", Granularity::Char, &options);
        assert!(out.contains("\u{1b}["));
        assert!(!out.contains("[-"));
    }

    #[test]
    fn bytes_are_diffed_when_valid() {
        let out = diff_bytes(b"cat", b"cut", Granularity::Char, &DiffOptions::default()).unwrap();
        assert_eq!(out, "c[-a-]{+u+}t");
    }

    #[test]
    fn invalid_old_bytes_are_reported() {
        let result = diff_bytes(b"ab\xffc", b"abc", Granularity::Char, &DiffOptions::default());
        assert!(matches!(
            result,
            Err(EncodingError::InvalidInputEncoding {
                side: Side::Old,
                offset: 2
            })
        ));
    }

    #[test]
    fn invalid_new_bytes_are_reported() {
        let result = diff_bytes(b"abc", b"\xc3", Granularity::Line, &DiffOptions::default());
        assert!(matches!(
            result,
            Err(EncodingError::InvalidInputEncoding {
                side: Side::New,
                offset: 0
            })
        ));
    }

    #[test]
    fn encoding_error_message() {
        let err = diff_bytes(b"\xff", b"", Granularity::Char, &DiffOptions::default()).unwrap_err();
        assert_eq!(
            err.to_string(),
            "old input is not valid UTF-8 (invalid sequence at byte 0)"
        );
    }

    #[test]
    fn encoding_error_converts_to_top_level() {
        let err: PrettyDiffError = EncodingError::InvalidInputEncoding {
            side: Side::New,
            offset: 4,
        }
        .into();
        assert!(err.to_string().starts_with("new input is not valid UTF-8"));
    }
}
