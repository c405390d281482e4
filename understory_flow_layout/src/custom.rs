// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Injected positioning for rows and supplementary elements that do not follow the flow.

use core::fmt;

use hashbrown::HashMap;
use kurbo::Rect;

use crate::{FlowLayoutDelegate, IndexPath, KindKey, LayoutAttributes};

/// Item attributes keyed by index path.
pub type AttributesMap = HashMap<IndexPath, LayoutAttributes>;

/// Supplementary and decoration attributes keyed by kind and index path.
pub type KindAttributesMap = HashMap<KindKey, LayoutAttributes>;

/// Everything a [`CustomPositioning`] strategy may read or write during one pass.
pub struct CustomPass<'a> {
    /// `true` when the pass runs because the scroll position moved and the
    /// flow attributes were kept. `false` right after a full flow pass.
    pub on_scroll: bool,
    /// Host bounds at the time of the pass.
    pub bounds: Rect,
    /// Attributes computed by the flow pass, read-only.
    pub primary: &'a AttributesMap,
    /// Item overrides. An entry here replaces the flow entry for the same path.
    pub custom_rows: &'a mut AttributesMap,
    /// Supplementary and decoration elements.
    pub custom_kinds: &'a mut KindAttributesMap,
    /// Total content height; strategies may grow it.
    pub content_height: &'a mut f64,
    /// Delegate of the current `prepare` call, if any.
    pub delegate: Option<&'a dyn FlowLayoutDelegate>,
}

impl fmt::Debug for CustomPass<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CustomPass")
            .field("on_scroll", &self.on_scroll)
            .field("bounds", &self.bounds)
            .field("primary", &self.primary.len())
            .field("custom_rows", &self.custom_rows.len())
            .field("custom_kinds", &self.custom_kinds.len())
            .field("content_height", &self.content_height)
            .field("delegate", &self.delegate.is_some())
            .finish()
    }
}

/// Strategy that places elements the flow pass does not handle.
///
/// Typical uses are pinned headers, floating decorations, or rows that stick
/// to the viewport. The strategy runs after every flow pass and, when
/// [`FlowLayoutConfig::invalidate_custom_on_scroll`](crate::FlowLayoutConfig::invalidate_custom_on_scroll)
/// is set, after every scroll.
///
/// Closures taking a [`CustomPass`] implement this trait.
pub trait CustomPositioning {
    /// Populates `pass.custom_rows` and `pass.custom_kinds`.
    fn position(&mut self, pass: CustomPass<'_>);
}

impl<F> CustomPositioning for F
where
    F: FnMut(CustomPass<'_>),
{
    fn position(&mut self, pass: CustomPass<'_>) {
        self(pass);
    }
}
