// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Understory Flow Layout: a vertical, line-based layout for scrollable grids.
//!
//! Items are visited once, section by section, and packed into lines. Each
//! item reports [`LineAttributes`] through a [`FlowLayoutDelegate`]; equal
//! attributes on consecutive items share a line until it is full. This single
//! rule covers full-width lists, uniform grids, and mixed feeds without a
//! separate layout per shape.
//!
//! The core concepts are:
//!
//! - [`FlowLayout`]: the engine. It caches computed [`LayoutAttributes`] and
//!   answers point and region queries until it is invalidated.
//! - [`LayoutHost`]: the scrollable view being laid out (counts and bounds).
//! - [`FlowLayoutDelegate`]: optional per-item heights, spacing, insets, and
//!   line grouping. The layout borrows it only for the duration of
//!   [`FlowLayout::prepare`].
//! - [`CustomPositioning`]: an injected strategy for elements outside the
//!   flow, such as pinned headers. Its output lives in separate caches that
//!   can be dropped on scroll without recomputing the flow.
//! - [`PixelSnapper`]: rounds origins and widths to device pixels.
//! - [`AppearanceInterception`]: opacity rules for elements animating in or
//!   out during batch updates.
//!
//! ## Invalidation
//!
//! [`FlowLayout::invalidate`] drops every cache. Hosts should also forward
//! bounds changes to [`FlowLayout::should_invalidate_for_bounds_change`]: a
//! resize clears everything, while a scroll keeps the flow attributes and at
//! most drops the custom-positioned ones (see
//! [`FlowLayoutConfig::invalidate_custom_on_scroll`]). Either way the
//! invalidation the host performs next does not clear a second time.
//!
//! ## Minimal example
//!
//! ```rust
//! use kurbo::Rect;
//! use understory_flow_layout::{FlowLayout, FlowLayoutConfig, IndexPath, LayoutHost};
//!
//! struct List;
//!
//! impl LayoutHost for List {
//!     fn section_count(&self) -> usize { 1 }
//!     fn item_count(&self, _section: usize) -> usize { 100 }
//!     fn bounds(&self) -> Rect { Rect::new(0.0, 0.0, 320.0, 480.0) }
//! }
//!
//! let mut layout = FlowLayout::new(FlowLayoutConfig {
//!     item_height: 44.0,
//!     line_spacing: 1.0,
//!     ..FlowLayoutConfig::default()
//! });
//! layout.prepare(&List, None);
//!
//! let visible = layout.attributes_in_rect(Rect::new(0.0, 0.0, 320.0, 480.0)).count();
//! assert_eq!(visible, 11);
//! assert_eq!(layout.content_size().height, 100.0 * 44.0 + 99.0);
//! assert_eq!(
//!     layout.attributes_for_item(IndexPath::new(0, 2)).map(|a| a.frame.y0),
//!     Some(90.0),
//! );
//! ```
//!
//! This crate is `no_std` compatible and uses `alloc`. Enable the `libm`
//! feature when building without `std`.

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

mod appearance;
mod custom;
mod delegate;
mod layout;
mod pixel;
mod types;
mod util;

pub use appearance::AppearanceInterception;
pub use custom::{AttributesMap, CustomPass, CustomPositioning, KindAttributesMap};
pub use delegate::{FlowLayoutDelegate, LayoutHost};
pub use layout::{CacheSet, FlowLayout, FlowLayoutConfig, LayoutPhase};
pub use pixel::PixelSnapper;
pub use types::{ElementCategory, IndexPath, KindKey, LayoutAttributes, LineAttributes};
