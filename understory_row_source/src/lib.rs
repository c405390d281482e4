// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Understory Row Source: row models, data sources, and diffed reloads for
//! grids laid out by `understory_flow_layout`.
//!
//! The crate sits between feature code, which describes content as rows, and
//! a host view toolkit, which owns reusable views:
//!
//! - [`RowModel`]: one item of content. Identity, a [`CellTemplate`], and
//!   [`RowModel::configure`] are required; rebinding, self-sizing, display
//!   lifecycle, and height-change notification are optional capabilities
//!   queried at runtime.
//! - [`Section`] and [`DataSource`]: ordered rows, supplementary rows keyed by
//!   kind and index path, and lazy, once-per-key template registration with
//!   the [`HostView`].
//! - [`diff`]: an order-preserving identity diff producing an [`EditScript`].
//! - [`ReloadController`]: swaps rows into a data source and drives either an
//!   animated [`BatchUpdate`] or a full reload, rebinding visible cells when
//!   the transition finishes.
//! - [`RowHeights`]: a [`FlowLayoutDelegate`](understory_flow_layout::FlowLayoutDelegate)
//!   that sizes items from their rows.
//!
//! Integration errors, such as a row without a template, are reported as
//! [`DataSourceError`]. Lookups that may legitimately miss while the host
//! animates, such as [`DataSource::row`], return `Option`.
//!
//! ## Example
//!
//! ```rust
//! use std::rc::Rc;
//! use understory_flow_layout::IndexPath;
//! use understory_row_source::{CellTemplate, DataSource, RowModel, SharedRow};
//!
//! struct Title(&'static str);
//!
//! impl RowModel<String> for Title {
//!     fn row_id(&self) -> &str { self.0 }
//!     fn template(&self) -> Option<CellTemplate> { Some(CellTemplate::resource("title")) }
//!     fn configure(&self, view: &mut String) { view.push_str(self.0); }
//! }
//!
//! let rows: Vec<SharedRow<String>> = ["intro", "body"]
//!     .into_iter()
//!     .map(|title| Rc::new(Title(title)) as SharedRow<String>)
//!     .collect();
//! let mut source = DataSource::new();
//! source.set_rows(rows);
//!
//! assert_eq!(source.item_count(0), 2);
//! assert_eq!(source.row(IndexPath::new(0, 1)).map(|row| row.row_id()), Some("body"));
//! assert!(source.row(IndexPath::new(0, 2)).is_none());
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod datasource;
mod diff;
mod error;
mod host;
mod reload;
mod row;
mod section;
mod template;

#[cfg(test)]
mod testing;

pub use datasource::{DataSource, FLAT_SECTION_ID, RowHeights};
pub use diff::{EditScript, Move, diff};
pub use error::DataSourceError;
pub use host::{BatchId, BatchUpdate, HostView};
pub use reload::{Completion, ReloadController};
pub use row::{
    DisplayLifecycle, HeightChangeHandler, HeightChangeNotifier, Rebind, RowHeight, RowModel,
    SharedRow,
};
pub use section::Section;
pub use template::{CellTemplate, TemplateKey};
