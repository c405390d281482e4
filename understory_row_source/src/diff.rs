// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Order-preserving identity diff.

use alloc::vec;
use alloc::vec::Vec;
use core::hash::Hash;

use hashbrown::HashMap;

/// An element that left its old position and reappears at a new one.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Move {
    /// Index in the old sequence.
    pub from: usize,
    /// Index in the new sequence.
    pub to: usize,
}

/// Operations turning one identity sequence into another.
///
/// Elements on the longest common subsequence stay put and are not reported.
/// Indices in `deletions` refer to the old sequence, those in `insertions` to
/// the new one; both are ascending.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EditScript {
    /// Old indices of removed elements.
    pub deletions: Vec<usize>,
    /// New indices of added elements.
    pub insertions: Vec<usize>,
    /// Elements kept but reordered relative to the common subsequence.
    pub moves: Vec<Move>,
}

impl EditScript {
    /// Returns `true` if both sequences were equal.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.deletions.is_empty() && self.insertions.is_empty() && self.moves.is_empty()
    }
}

/// Computes the edit script from `old` to `new`.
///
/// Common prefixes and suffixes are matched first, the remainder by a longest
/// common subsequence table. A deleted element that is also inserted becomes a
/// [`Move`]. Identities are expected to be unique within each sequence.
///
/// ```rust
/// use understory_row_source::diff;
///
/// let script = diff(&["a", "b", "c"], &["b", "c", "d"]);
/// assert_eq!(script.deletions, [0]);
/// assert_eq!(script.insertions, [2]);
/// assert!(script.moves.is_empty());
/// ```
pub fn diff<T>(old: &[T], new: &[T]) -> EditScript
where
    T: Eq + Hash,
{
    let prefix = old.iter().zip(new).take_while(|(a, b)| a == b).count();
    let suffix = old[prefix..]
        .iter()
        .rev()
        .zip(new[prefix..].iter().rev())
        .take_while(|(a, b)| a == b)
        .count();
    let old_mid = &old[prefix..old.len() - suffix];
    let new_mid = &new[prefix..new.len() - suffix];

    let (rows, cols) = (old_mid.len(), new_mid.len());
    // lengths[i * (cols + 1) + j]: LCS length of old_mid[i..] and new_mid[j..].
    let width = cols + 1;
    let mut lengths = vec![0_u32; (rows + 1) * width];
    for i in (0..rows).rev() {
        for j in (0..cols).rev() {
            lengths[i * width + j] = if old_mid[i] == new_mid[j] {
                lengths[(i + 1) * width + j + 1] + 1
            } else {
                lengths[(i + 1) * width + j].max(lengths[i * width + j + 1])
            };
        }
    }

    let mut script = EditScript::default();
    let (mut i, mut j) = (0, 0);
    while i < rows && j < cols {
        if old_mid[i] == new_mid[j] {
            i += 1;
            j += 1;
        } else if lengths[(i + 1) * width + j] >= lengths[i * width + j + 1] {
            script.deletions.push(prefix + i);
            i += 1;
        } else {
            script.insertions.push(prefix + j);
            j += 1;
        }
    }
    script.deletions.extend((i..rows).map(|i| prefix + i));
    script.insertions.extend((j..cols).map(|j| prefix + j));

    pair_moves(old, new, &mut script);
    script
}

fn pair_moves<T>(old: &[T], new: &[T], script: &mut EditScript)
where
    T: Eq + Hash,
{
    if script.deletions.is_empty() || script.insertions.is_empty() {
        return;
    }
    let inserted: HashMap<&T, usize> = script
        .insertions
        .iter()
        .map(|&to| (&new[to], to))
        .collect();
    let mut moved_to = Vec::new();
    script.deletions.retain(|&from| match inserted.get(&old[from]) {
        Some(&to) => {
            script.moves.push(Move { from, to });
            moved_to.push(to);
            false
        }
        None => true,
    });
    script.insertions.retain(|to| !moved_to.contains(to));
}

#[cfg(test)]
mod tests {
    use super::{Move, diff};

    #[test]
    fn shifted_window_keeps_common_run_in_place() {
        let script = diff(&["a", "b", "c"], &["b", "c", "d"]);
        assert_eq!(script.deletions, [0]);
        assert_eq!(script.insertions, [2]);
        assert!(script.moves.is_empty());
    }

    #[test]
    fn equal_sequences_produce_no_edits() {
        assert!(diff(&["a", "b"], &["a", "b"]).is_empty());
        assert!(diff::<&str>(&[], &[]).is_empty());
    }

    #[test]
    fn reordered_element_is_a_move() {
        let script = diff(&["a", "b", "c"], &["c", "a", "b"]);
        assert!(script.deletions.is_empty());
        assert!(script.insertions.is_empty());
        assert_eq!(script.moves, [Move { from: 2, to: 0 }]);
    }

    #[test]
    fn indices_account_for_common_prefix() {
        let script = diff(&["x", "y", "a", "z"], &["x", "y", "b", "z"]);
        assert_eq!(script.deletions, [2]);
        assert_eq!(script.insertions, [2]);
    }

    #[test]
    fn from_and_to_empty() {
        let grow = diff(&[], &["a", "b"]);
        assert_eq!(grow.insertions, [0, 1]);
        let shrink = diff(&["a", "b"], &[]);
        assert_eq!(shrink.deletions, [0, 1]);
    }

    #[test]
    fn mixed_edit() {
        // Delete b, insert e, move d before a.
        let script = diff(&["a", "b", "c", "d"], &["d", "a", "c", "e"]);
        assert_eq!(script.deletions, [1]);
        assert_eq!(script.insertions, [3]);
        assert_eq!(script.moves, [Move { from: 3, to: 0 }]);
    }
}
