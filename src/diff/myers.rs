//! Myers' shortest-edit-script search, linear-space variant.
//!
//! Runs in O((N + M) · D) time and O(N + M) space. Rather than recording
//! every round for a backtrack, each region is split at its middle snake,
//! found by searching forward from the top-left corner and backward from the
//! bottom-right corner at once, and both halves are solved recursively.

use super::{EditOp, EditScript};
use std::ops::{Index, IndexMut, Range};

/// Furthest x reached on each diagonal `k`, for `k` in `-max..=max`
struct Frontier {
    offset: isize,
    xs: Vec<usize>,
}

impl Frontier {
    fn new(max: usize) -> Self {
        Self {
            offset: max as isize,
            xs: vec![0; 2 * max + 1],
        }
    }
}

impl Index<isize> for Frontier {
    type Output = usize;

    fn index(&self, k: isize) -> &usize {
        &self.xs[(k + self.offset) as usize]
    }
}

impl IndexMut<isize> for Frontier {
    fn index_mut(&mut self, k: isize) -> &mut usize {
        &mut self.xs[(k + self.offset) as usize]
    }
}

/// Rounds needed before the two searches must overlap
fn max_rounds(n: usize, m: usize) -> usize {
    (n + m + 1) / 2 + 1
}

fn common_prefix<T: PartialEq>(old: &[T], new: &[T]) -> usize {
    old.iter().zip(new).take_while(|(a, b)| a == b).count()
}

fn common_suffix<T: PartialEq>(old: &[T], new: &[T]) -> usize {
    old.iter()
        .rev()
        .zip(new.iter().rev())
        .take_while(|(a, b)| a == b)
        .count()
}

/// Compute a minimal edit script turning `old` into `new`.
///
/// Elements are matched by value, so a token repeated elsewhere can still be
/// kept. Common prefixes and suffixes are always kept, and inside every run
/// of changes deletions come before insertions.
///
/// # Examples
///
/// ```
/// use pretty_diff::diff::{compute_edit_script, EditOp};
///
/// let script = compute_edit_script(&["a", "b", "c"], &["a", "x", "c"]);
/// assert_eq!(script, vec![
///     EditOp::Keep { old: 0, new: 0 },
///     EditOp::Delete { old: 1 },
///     EditOp::Insert { new: 1 },
///     EditOp::Keep { old: 2, new: 2 },
/// ]);
/// ```
pub fn compute_edit_script<T: PartialEq>(old: &[T], new: &[T]) -> EditScript {
    let rounds = max_rounds(old.len(), new.len());
    let mut search = Search {
        old,
        new,
        forward: Frontier::new(rounds),
        backward: Frontier::new(rounds),
        script: Vec::with_capacity(old.len().max(new.len())),
    };
    search.conquer(0..old.len(), 0..new.len());

    let script = deletions_first(search.script);
    log::trace!(
        "myers: {} x {} tokens, edit distance {}",
        old.len(),
        new.len(),
        script
            .iter()
            .filter(|op| !matches!(op, EditOp::Keep { .. }))
            .count()
    );
    script
}

/// Within every run of changes, move the deletions ahead of the insertions.
/// Each side keeps its own order, so the script stays valid and minimal.
fn deletions_first(script: EditScript) -> EditScript {
    let mut ordered = Vec::with_capacity(script.len());
    let mut inserts = Vec::new();

    for op in script {
        match op {
            EditOp::Insert { .. } => inserts.push(op),
            EditOp::Delete { .. } => ordered.push(op),
            EditOp::Keep { .. } => {
                ordered.append(&mut inserts);
                ordered.push(op);
            }
        }
    }
    ordered.append(&mut inserts);
    ordered
}

/// Shared state of one search: the inputs, both frontiers (reused by every
/// region), and the script built so far
struct Search<'s, T> {
    old: &'s [T],
    new: &'s [T],
    forward: Frontier,
    backward: Frontier,
    script: EditScript,
}

impl<T: PartialEq> Search<'_, T> {
    /// Append the script for `old` x `new`, given as index ranges into the
    /// full sequences.
    fn conquer(&mut self, mut old: Range<usize>, mut new: Range<usize>) {
        let prefix = common_prefix(&self.old[old.clone()], &self.new[new.clone()]);
        self.script.extend((0..prefix).map(|i| EditOp::Keep {
            old: old.start + i,
            new: new.start + i,
        }));
        old.start += prefix;
        new.start += prefix;

        let suffix = common_suffix(&self.old[old.clone()], &self.new[new.clone()]);
        old.end -= suffix;
        new.end -= suffix;

        if old.is_empty() {
            self.script.extend(new.clone().map(|j| EditOp::Insert { new: j }));
        } else if new.is_empty() {
            self.script.extend(old.clone().map(|i| EditOp::Delete { old: i }));
        } else if let Some((x, y)) = self.middle_snake(old.clone(), new.clone()) {
            self.conquer(old.start..x, new.start..y);
            self.conquer(x..old.end, y..new.end);
        } else {
            self.script.extend(old.clone().map(|i| EditOp::Delete { old: i }));
            self.script.extend(new.clone().map(|j| EditOp::Insert { new: j }));
        }

        self.script.extend((0..suffix).map(|i| EditOp::Keep {
            old: old.end + i,
            new: new.end + i,
        }));
    }

    /// Find where a shortest path through `old` x `new` crosses its middle,
    /// as the absolute start of the snake found there.
    ///
    /// Both ranges must be non-empty and share no prefix or suffix.
    fn middle_snake(&mut self, old: Range<usize>, new: Range<usize>) -> Option<(usize, usize)> {
        let a = &self.old[old.clone()];
        let b = &self.new[new.clone()];
        let n = a.len();
        let m = b.len();
        let delta = n as isize - m as isize;
        let odd = delta & 1 == 1;

        let forward = &mut self.forward;
        let backward = &mut self.backward;
        forward[1] = 0;
        backward[1] = 0;

        for d in 0..max_rounds(n, m) as isize {
            for k in (-d..=d).rev().step_by(2) {
                let mut x = if k == -d || (k != d && forward[k - 1] < forward[k + 1]) {
                    forward[k + 1]
                } else {
                    forward[k - 1] + 1
                };
                let y = (x as isize - k) as usize;
                let (x0, y0) = (x, y);
                if x < n && y < m {
                    x += common_prefix(&a[x..], &b[y..]);
                }
                forward[k] = x;

                // An odd delta means the paths meet on a forward round
                if odd && (k - delta).abs() < d && forward[k] + backward[delta - k] >= n {
                    return Some((old.start + x0, new.start + y0));
                }
            }

            for k in (-d..=d).rev().step_by(2) {
                let mut x = if k == -d || (k != d && backward[k - 1] < backward[k + 1]) {
                    backward[k + 1]
                } else {
                    backward[k - 1] + 1
                };
                let mut y = (x as isize - k) as usize;
                if x < n && y < m {
                    let run = common_suffix(&a[..n - x], &b[..m - y]);
                    x += run;
                    y += run;
                }
                backward[k] = x;

                if !odd && (k - delta).abs() <= d && backward[k] + forward[delta - k] >= n {
                    return Some((old.start + n - x, new.start + m - y));
                }
            }
        }

        None
    }
}
