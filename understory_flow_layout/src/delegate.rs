// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Traits the layout consumes: the hosting view and the screen-owned delegate.

use kurbo::{Insets, Rect};

use crate::{IndexPath, LineAttributes};

/// The scrollable view a [`FlowLayout`](crate::FlowLayout) lays out.
///
/// Hosts answer item counts and viewport geometry. Counts are usually
/// forwarded from the data source backing the view.
pub trait LayoutHost {
    /// Number of sections.
    fn section_count(&self) -> usize;

    /// Number of items in `section`.
    fn item_count(&self, section: usize) -> usize;

    /// Current bounds: the origin is the scroll position, the size the viewport.
    fn bounds(&self) -> Rect;

    /// Content insets applied by the scroll view.
    fn content_insets(&self) -> Insets {
        Insets::ZERO
    }

    /// Safe-area insets of the view.
    fn safe_area_insets(&self) -> Insets {
        Insets::ZERO
    }
}

/// Per-item sizing decisions supplied by the owner of the screen.
///
/// Every method is optional. Returning `None` selects the layout-wide default
/// configured on [`FlowLayoutConfig`](crate::FlowLayoutConfig).
///
/// The layout never stores a delegate; it is borrowed for the duration of a
/// single [`FlowLayout::prepare`](crate::FlowLayout::prepare) call.
pub trait FlowLayoutDelegate {
    /// Height of the item at `index_path` when laid out at `width`.
    fn height_for_item(&self, index_path: IndexPath, width: f64) -> Option<f64> {
        let _ = (index_path, width);
        None
    }

    /// Vertical gap inserted between the line ending at `previous` and the line starting at `next`.
    fn spacing_between(&self, previous: IndexPath, next: IndexPath, width: f64) -> Option<f64> {
        let _ = (previous, next, width);
        None
    }

    /// Height of a supplementary element of `kind` at `width`.
    ///
    /// The flow pass itself does not place supplementary elements; this is
    /// consulted by [`CustomPositioning`](crate::CustomPositioning) strategies.
    fn supplementary_height(&self, kind: &str, index_path: IndexPath, width: f64) -> Option<f64> {
        let _ = (kind, index_path, width);
        None
    }

    /// Extra horizontal insets for the line started by `index_path`.
    ///
    /// Only the left (`x0`) and right (`x1`) components are used.
    fn additional_horizontal_insets(&self, index_path: IndexPath) -> Option<Insets> {
        let _ = index_path;
        None
    }

    /// Line grouping for the item at `index_path`.
    fn line_attributes(&self, index_path: IndexPath) -> Option<LineAttributes> {
        let _ = index_path;
        None
    }

    /// Insets of `section`.
    fn section_insets(&self, section: usize) -> Option<Insets> {
        let _ = section;
        None
    }
}
