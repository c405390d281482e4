// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Public value types: index paths, line grouping, and computed attributes.

use alloc::string::String;
use core::fmt;
use core::num::NonZeroUsize;

use kurbo::Rect;

/// A `(section, item)` coordinate identifying an item or supplementary element.
///
/// Ordering is section-major, which matches the order the layout visits items.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct IndexPath {
    /// Section index.
    pub section: usize,
    /// Item index within the section.
    pub item: usize,
}

impl IndexPath {
    /// Creates an index path.
    #[must_use]
    pub const fn new(section: usize, item: usize) -> Self {
        Self { section, item }
    }

    /// The path of the previous item in the same section, if any.
    #[must_use]
    pub const fn previous_in_section(self) -> Option<Self> {
        match self.item.checked_sub(1) {
            Some(item) => Some(Self::new(self.section, item)),
            None => None,
        }
    }
}

impl fmt::Display for IndexPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.section, self.item)
    }
}

/// How many items share one line, and the horizontal gap between them.
///
/// Consecutive items whose attributes compare equal are packed into the same
/// line until it holds `items_per_line` items.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct LineAttributes {
    items_per_line: NonZeroUsize,
    spacing: f64,
}

impl LineAttributes {
    /// One item spanning the full width.
    pub const FULL_WIDTH: Self = Self {
        items_per_line: NonZeroUsize::MIN,
        spacing: 0.0,
    };

    /// Creates line attributes; `items_per_line` is clamped to at least one.
    #[must_use]
    pub fn new(items_per_line: usize, spacing: f64) -> Self {
        Self {
            items_per_line: NonZeroUsize::new(items_per_line).unwrap_or(NonZeroUsize::MIN),
            spacing,
        }
    }

    /// Number of items that fit on one line.
    #[must_use]
    pub const fn items_per_line(&self) -> usize {
        self.items_per_line.get()
    }

    /// Horizontal spacing between neighbouring items of a line.
    #[must_use]
    pub const fn spacing(&self) -> f64 {
        self.spacing
    }
}

impl Default for LineAttributes {
    fn default() -> Self {
        Self::FULL_WIDTH
    }
}

/// What kind of element a set of [`LayoutAttributes`] describes.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum ElementCategory {
    /// A regular item cell.
    Cell,
    /// A supplementary view (header, footer, ...) of the given kind.
    Supplementary(String),
    /// A decoration view of the given kind.
    Decoration(String),
}

/// Computed geometry for one element.
#[derive(Clone, Debug, PartialEq)]
pub struct LayoutAttributes {
    /// Element category.
    pub category: ElementCategory,
    /// Position of the element in its category.
    pub index_path: IndexPath,
    /// Frame in content coordinates.
    pub frame: Rect,
    /// Opacity, used by appearance animations.
    pub alpha: f64,
}

impl LayoutAttributes {
    /// Attributes for an item cell.
    #[must_use]
    pub fn cell(index_path: IndexPath, frame: Rect) -> Self {
        Self {
            category: ElementCategory::Cell,
            index_path,
            frame,
            alpha: 1.0,
        }
    }

    /// Attributes for a supplementary view of `kind`.
    #[must_use]
    pub fn supplementary(kind: impl Into<String>, index_path: IndexPath, frame: Rect) -> Self {
        Self {
            category: ElementCategory::Supplementary(kind.into()),
            index_path,
            frame,
            alpha: 1.0,
        }
    }

    /// Attributes for a decoration view of `kind`.
    #[must_use]
    pub fn decoration(kind: impl Into<String>, index_path: IndexPath, frame: Rect) -> Self {
        Self {
            category: ElementCategory::Decoration(kind.into()),
            index_path,
            frame,
            alpha: 1.0,
        }
    }

    /// Returns a copy with `alpha` replaced.
    #[must_use]
    pub fn with_alpha(&self, alpha: f64) -> Self {
        Self {
            alpha,
            ..self.clone()
        }
    }
}

/// Composite key for supplementary and decoration overrides.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct KindKey {
    /// Element kind, for example `"header"`.
    pub kind: String,
    /// Section of the element.
    pub section: usize,
    /// Item of the element.
    pub item: usize,
}

impl KindKey {
    /// Creates a key for `kind` at `index_path`.
    #[must_use]
    pub fn new(kind: impl Into<String>, index_path: IndexPath) -> Self {
        Self {
            kind: kind.into(),
            section: index_path.section,
            item: index_path.item,
        }
    }

    /// The index path part of the key.
    #[must_use]
    pub const fn index_path(&self) -> IndexPath {
        IndexPath::new(self.section, self.item)
    }
}

#[cfg(test)]
mod tests {
    use super::{IndexPath, KindKey, LineAttributes};

    #[test]
    fn line_attributes_clamp_to_one_item() {
        let attrs = LineAttributes::new(0, 8.0);
        assert_eq!(attrs.items_per_line(), 1);
        assert_eq!(attrs.spacing(), 8.0);
        assert_eq!(LineAttributes::default(), LineAttributes::FULL_WIDTH);
    }

    #[test]
    fn line_attributes_compare_by_quota_and_spacing() {
        assert_eq!(LineAttributes::new(3, 4.0), LineAttributes::new(3, 4.0));
        assert_ne!(LineAttributes::new(3, 4.0), LineAttributes::new(2, 4.0));
        assert_ne!(LineAttributes::new(3, 4.0), LineAttributes::new(3, 2.0));
    }

    #[test]
    fn index_paths_order_section_major() {
        assert!(IndexPath::new(0, 9) < IndexPath::new(1, 0));
        assert_eq!(IndexPath::new(2, 0).previous_in_section(), None);
        assert_eq!(
            IndexPath::new(2, 3).previous_in_section(),
            Some(IndexPath::new(2, 2))
        );
    }

    #[test]
    fn kind_keys_distinguish_kinds_at_same_path() {
        let path = IndexPath::new(0, 0);
        assert_ne!(KindKey::new("header", path), KindKey::new("footer", path));
        assert_eq!(KindKey::new("header", path).index_path(), path);
    }
}
