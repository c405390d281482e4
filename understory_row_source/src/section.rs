// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Sections: ordered rows with an identity and an optional header.

use alloc::rc::Rc;
use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;
use core::ops::Index;

use hashbrown::HashMap;

use crate::SharedRow;

/// An ordered group of rows.
pub struct Section<V> {
    /// Identity of the section.
    pub id: String,
    /// Rows in display order.
    pub rows: Vec<SharedRow<V>>,
    /// Optional header row.
    pub header: Option<SharedRow<V>>,
}

impl<V> fmt::Debug for Section<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Section")
            .field("id", &self.id)
            .field("rows", &self.row_ids().collect::<Vec<_>>())
            .field("header", &self.header.as_ref().map(|h| h.row_id()))
            .finish()
    }
}

impl<V> Clone for Section<V> {
    fn clone(&self) -> Self {
        Self {
            id: self.id.clone(),
            rows: self.rows.clone(),
            header: self.header.clone(),
        }
    }
}

impl<V> Section<V> {
    /// Creates a section without a header.
    #[must_use]
    pub fn new(id: impl Into<String>, rows: Vec<SharedRow<V>>) -> Self {
        Self {
            id: id.into(),
            rows,
            header: None,
        }
    }

    /// Sets the header row.
    #[must_use]
    pub fn with_header(mut self, header: SharedRow<V>) -> Self {
        self.header = Some(header);
        self
    }

    /// Number of rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns `true` if the section has no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Row at `index`, if any.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&SharedRow<V>> {
        self.rows.get(index)
    }

    /// Iterates rows in display order.
    pub fn iter(&self) -> core::slice::Iter<'_, SharedRow<V>> {
        self.rows.iter()
    }

    /// Iterates row ids in display order.
    pub fn row_ids(&self) -> impl Iterator<Item = &str> + '_ {
        self.rows.iter().map(|row| row.row_id())
    }

    /// Replaces the rows.
    ///
    /// With `reuse_existing`, a new row whose id matches a current row is
    /// replaced by the current instance, so state held by live rows survives
    /// the update.
    pub fn replace_rows(&mut self, rows: Vec<SharedRow<V>>, reuse_existing: bool) {
        if !reuse_existing {
            self.rows = rows;
            return;
        }
        let merged: Vec<SharedRow<V>> = {
            let existing: HashMap<&str, &SharedRow<V>> = self
                .rows
                .iter()
                .map(|row| (row.row_id(), row))
                .collect();
            rows.into_iter()
                .map(|row| match existing.get(row.row_id()) {
                    Some(current) => Rc::clone(current),
                    None => row,
                })
                .collect()
        };
        self.rows = merged;
    }
}

impl<V> Index<usize> for Section<V> {
    type Output = SharedRow<V>;

    fn index(&self, index: usize) -> &Self::Output {
        &self.rows[index]
    }
}

impl<'a, V> IntoIterator for &'a Section<V> {
    type Item = &'a SharedRow<V>;
    type IntoIter = core::slice::Iter<'a, SharedRow<V>>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}

#[cfg(test)]
mod tests {
    use alloc::rc::Rc;
    use alloc::vec;
    use alloc::vec::Vec;

    use super::Section;
    use crate::testing::{Label, TestRow};

    #[test]
    fn replace_without_reuse_takes_new_instances() {
        let old = TestRow::new("a").shared();
        let mut section = Section::<Label>::new("s", vec![Rc::clone(&old)]);
        let fresh = TestRow::new("a").shared();
        section.replace_rows(vec![Rc::clone(&fresh)], false);
        assert!(Rc::ptr_eq(&section[0], &fresh));
    }

    #[test]
    fn replace_with_reuse_keeps_live_instances_by_id() {
        let a = TestRow::new("a").shared();
        let b = TestRow::new("b").shared();
        let mut section = Section::<Label>::new("s", vec![Rc::clone(&a), Rc::clone(&b)]);

        let new_b = TestRow::new("b").shared();
        let c = TestRow::new("c").shared();
        section.replace_rows(vec![Rc::clone(&new_b), Rc::clone(&c)], true);

        assert_eq!(section.row_ids().collect::<Vec<_>>(), ["b", "c"]);
        assert!(Rc::ptr_eq(&section[0], &b));
        assert!(Rc::ptr_eq(&section[1], &c));
    }

    #[test]
    fn header_and_iteration() {
        let section = Section::<Label>::new("s", vec![TestRow::new("a").shared()])
            .with_header(TestRow::new("title").shared());
        assert_eq!(section.header.as_ref().map(|h| h.row_id()), Some("title"));
        assert_eq!((&section).into_iter().count(), 1);
        assert!(section.get(1).is_none());
        assert!(!section.is_empty());
    }
}
