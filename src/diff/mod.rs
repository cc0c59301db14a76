pub mod hunk;
pub mod myers;

pub use hunk::{Hunk, group};
pub use myers::compute_edit_script;

/// Classification shared by edit operations and hunks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tag {
    Keep,
    Delete,
    Insert,
}

/// One step of an edit script, holding token indices into the old and/or
/// new sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditOp {
    /// Token present on both sides
    Keep { old: usize, new: usize },
    /// Token only in the old sequence
    Delete { old: usize },
    /// Token only in the new sequence
    Insert { new: usize },
}

impl EditOp {
    pub fn tag(&self) -> Tag {
        match self {
            EditOp::Keep { .. } => Tag::Keep,
            EditOp::Delete { .. } => Tag::Delete,
            EditOp::Insert { .. } => Tag::Insert,
        }
    }
}

/// An ordered edit script
pub type EditScript = Vec<EditOp>;
