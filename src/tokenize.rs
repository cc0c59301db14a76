//! Splitting text into comparable tokens.
//!
//! Every [`Granularity`] produces a lossless sequence: concatenating the
//! token texts in order gives back the input exactly, separators and line
//! terminators included.
//!
//! # Examples
//!
//! ```
//! use pretty_diff::tokenize::{tokenize, Granularity};
//!
//! let words: Vec<&str> = tokenize("let x = 1;", Granularity::Word)
//!     .iter()
//!     .map(|t| t.text)
//!     .collect();
//! assert_eq!(words, ["let", " ", "x", " ", "=", " ", "1", ";"]);
//!
//! let lines: Vec<&str> = tokenize("a\r\nb", Granularity::Line)
//!     .iter()
//!     .map(|t| t.text)
//!     .collect();
//! assert_eq!(lines, ["a\r\n", "b"]);
//! ```

use std::fmt;

/// Resolution at which two texts are compared
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Granularity {
    /// One token per Unicode scalar value
    Char,
    /// Word runs, whitespace runs, and single punctuation characters
    Word,
    /// One token per line, terminator included
    Line,
}

impl fmt::Display for Granularity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Granularity::Char => "char",
            Granularity::Word => "word",
            Granularity::Line => "line",
        })
    }
}

/// A slice of the source text.
///
/// Tokens compare equal when their text is equal; where they came from does
/// not matter.
#[derive(Debug, Clone, Copy)]
pub struct Token<'a> {
    pub text: &'a str,
    pub granularity: Granularity,
    /// Byte offset of `text` in the source string
    pub offset: usize,
}

impl PartialEq for Token<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.text == other.text
    }
}

impl Eq for Token<'_> {}

impl<'a> Token<'a> {
    /// Split a line token into its content and its terminator (`""`, `"\n"`
    /// or `"\r\n"`).
    pub fn split_terminator(&self) -> (&'a str, &'a str) {
        let text = self.text;
        let cut = if text.ends_with("\r\n") {
            text.len() - 2
        } else if text.ends_with('\n') {
            text.len() - 1
        } else {
            text.len()
        };
        text.split_at(cut)
    }
}

/// Tokens of one input under one granularity
pub type TokenSequence<'a> = Vec<Token<'a>>;

/// Tokenize `text` at the given granularity.
pub fn tokenize(text: &str, granularity: Granularity) -> TokenSequence<'_> {
    let spans = match granularity {
        Granularity::Char => char_spans(text),
        Granularity::Word => word_spans(text),
        Granularity::Line => line_spans(text),
    };

    spans
        .into_iter()
        .map(|(start, end)| Token {
            text: &text[start..end],
            granularity,
            offset: start,
        })
        .collect()
}

fn char_spans(text: &str) -> Vec<(usize, usize)> {
    text.char_indices()
        .map(|(start, c)| (start, start + c.len_utf8()))
        .collect()
}

/// Character classes that form runs in word mode
#[derive(Clone, Copy, PartialEq, Eq)]
enum Class {
    Word,
    Space,
    Symbol,
}

fn classify(c: char) -> Class {
    if c.is_alphanumeric() || c == '_' {
        Class::Word
    } else if c.is_whitespace() {
        Class::Space
    } else {
        Class::Symbol
    }
}

fn word_spans(text: &str) -> Vec<(usize, usize)> {
    let mut spans = Vec::new();
    let mut chars = text.char_indices().peekable();

    while let Some((start, c)) = chars.next() {
        let class = classify(c);
        let mut end = start + c.len_utf8();

        // Symbols never merge: "=>" is two tokens
        if class != Class::Symbol {
            while let Some(&(next_start, next)) = chars.peek() {
                if classify(next) != class {
                    break;
                }
                chars.next();
                end = next_start + next.len_utf8();
            }
        }

        spans.push((start, end));
    }

    spans
}

fn line_spans(text: &str) -> Vec<(usize, usize)> {
    let mut spans = Vec::new();
    let mut start = 0;

    for (i, _) in text.match_indices('\n') {
        spans.push((start, i + 1));
        start = i + 1;
    }
    if start < text.len() {
        spans.push((start, text.len()));
    }

    spans
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use similar_asserts::assert_eq;

    fn texts(text: &str, granularity: Granularity) -> Vec<&str> {
        tokenize(text, granularity).iter().map(|t| t.text).collect()
    }

    #[test]
    fn empty_input_has_no_tokens() {
        assert!(tokenize("", Granularity::Char).is_empty());
        assert!(tokenize("", Granularity::Word).is_empty());
        assert!(tokenize("", Granularity::Line).is_empty());
    }

    #[test]
    fn chars_split_on_scalar_values() {
        assert_eq!(texts("añ€😀", Granularity::Char), vec!["a", "ñ", "€", "😀"]);
    }

    #[test]
    fn char_offsets_are_byte_offsets() {
        let offsets: Vec<usize> = tokenize("añb", Granularity::Char)
            .iter()
            .map(|t| t.offset)
            .collect();
        assert_eq!(offsets, vec![0, 1, 3]);
    }

    #[test]
    fn words_keep_separators() {
        assert_eq!(
            texts("foo  bar_baz, qux", Granularity::Word),
            vec!["foo", "  ", "bar_baz", ",", " ", "qux"]
        );
    }

    #[test]
    fn words_split_symbol_runs() {
        assert_eq!(
            texts("[name] => John", Granularity::Word),
            vec!["[", "name", "]", " ", "=", ">", " ", "John"]
        );
    }

    #[test]
    fn words_treat_unicode_letters_as_word_characters() {
        assert_eq!(
            texts("naïve café", Granularity::Word),
            vec!["naïve", " ", "café"]
        );
    }

    #[test]
    fn words_group_newlines_with_whitespace() {
        assert_eq!(
            texts("a\n\t b", Granularity::Word),
            vec!["a", "\n\t ", "b"]
        );
    }

    #[test]
    fn lines_keep_terminators() {
        assert_eq!(
            texts("one\ntwo\r\nthree", Granularity::Line),
            vec!["one\n", "two\r\n", "three"]
        );
    }

    #[test]
    fn lines_with_trailing_newline_have_no_empty_tail() {
        assert_eq!(texts("a\nb\n", Granularity::Line), vec!["a\n", "b\n"]);
    }

    #[test]
    fn lines_keep_blank_lines() {
        assert_eq!(texts("\n\nx", Granularity::Line), vec!["\n", "\n", "x"]);
    }

    #[test]
    fn split_terminator_handles_every_ending() {
        let tokens = tokenize("a\nb\r\nc", Granularity::Line);
        assert_eq!(tokens[0].split_terminator(), ("a", "\n"));
        assert_eq!(tokens[1].split_terminator(), ("b", "\r\n"));
        assert_eq!(tokens[2].split_terminator(), ("c", ""));
    }

    #[test]
    fn tokens_compare_by_text_only() {
        let a = tokenize("x x", Granularity::Char);
        assert_eq!(a[0], a[2]);
        assert_ne!(a[0].offset, a[2].offset);
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn arb_granularity() -> impl Strategy<Value = Granularity> {
        prop_oneof![
            Just(Granularity::Char),
            Just(Granularity::Word),
            Just(Granularity::Line),
        ]
    }

    proptest! {
        /// Concatenating tokens always reproduces the input
        #[test]
        fn tokenization_is_lossless(text in "\\PC*", granularity in arb_granularity()) {
            let joined: String = tokenize(&text, granularity).iter().map(|t| t.text).collect();
            prop_assert_eq!(joined, text);
        }

        /// Offsets point at the token text in the source
        #[test]
        fn offsets_locate_tokens(text in "[a-z \\n\\r,.é]*", granularity in arb_granularity()) {
            for token in tokenize(&text, granularity) {
                prop_assert!(!token.text.is_empty());
                prop_assert_eq!(&text[token.offset..token.offset + token.text.len()], token.text);
            }
        }

        /// Only the last line may lack a terminator
        #[test]
        fn only_last_line_is_unterminated(text in "[ab\\n]*") {
            let lines = tokenize(&text, Granularity::Line);
            for line in lines.iter().rev().skip(1) {
                prop_assert!(line.text.ends_with('\n'));
            }
        }
    }
}
