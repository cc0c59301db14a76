use super::{EditOp, Tag};
use crate::tokenize::Token;

/// A maximal run of edit operations sharing one tag
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hunk<'a> {
    pub tag: Tag,
    /// Old-side tokens for Keep and Delete hunks, new-side tokens for Insert
    pub tokens: Vec<Token<'a>>,
    /// Old tokens consumed before this hunk
    pub old_start: usize,
    /// New tokens consumed before this hunk
    pub new_start: usize,
}

impl Hunk<'_> {
    /// Concatenated text of the member tokens
    pub fn text(&self) -> String {
        self.tokens.iter().map(|t| t.text).collect()
    }

    /// Number of member tokens
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Tokens this hunk covers on the old side
    pub fn old_len(&self) -> usize {
        match self.tag {
            Tag::Insert => 0,
            Tag::Keep | Tag::Delete => self.tokens.len(),
        }
    }

    /// Tokens this hunk covers on the new side
    pub fn new_len(&self) -> usize {
        match self.tag {
            Tag::Delete => 0,
            Tag::Keep | Tag::Insert => self.tokens.len(),
        }
    }
}

/// Merge adjacent operations with the same tag into hunks, in order.
///
/// # Panics
///
/// Panics if an operation indexes past the end of `old` or `new`; scripts
/// from [`compute_edit_script`](super::compute_edit_script) never do.
pub fn group<'a>(ops: &[EditOp], old: &[Token<'a>], new: &[Token<'a>]) -> Vec<Hunk<'a>> {
    let mut hunks: Vec<Hunk<'a>> = Vec::new();
    let mut old_pos = 0;
    let mut new_pos = 0;

    for op in ops {
        let token = match *op {
            EditOp::Keep { old: i, .. } | EditOp::Delete { old: i } => old[i],
            EditOp::Insert { new: j } => new[j],
        };

        match hunks.last_mut() {
            Some(hunk) if hunk.tag == op.tag() => hunk.tokens.push(token),
            _ => hunks.push(Hunk {
                tag: op.tag(),
                tokens: vec![token],
                old_start: old_pos,
                new_start: new_pos,
            }),
        }

        match *op {
            EditOp::Keep { old: i, new: j } => {
                old_pos = i + 1;
                new_pos = j + 1;
            }
            EditOp::Delete { old: i } => old_pos = i + 1,
            EditOp::Insert { new: j } => new_pos = j + 1,
        }
    }

    hunks
}
