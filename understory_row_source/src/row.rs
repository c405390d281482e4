// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The row model and its optional capabilities.

use alloc::rc::Rc;

use crate::CellTemplate;

/// A row shared between the data source, the reload controller, and feature code.
pub type SharedRow<V> = Rc<dyn RowModel<V>>;

/// Callback a row invokes after its height changed.
pub type HeightChangeHandler = Rc<dyn Fn()>;

/// Data behind one item of the grid, bound into views of type `V`.
///
/// Only identity, template, and [`RowModel::configure`] are required. Optional
/// behaviour is exposed through capability queries: a row that can rebind a
/// visible view returns `Some(self)` from [`RowModel::as_rebind`], and so on.
pub trait RowModel<V> {
    /// Identity of the row, stable across reloads and unique within its section.
    fn row_id(&self) -> &str;

    /// Template used to build the row's view.
    ///
    /// Returning `None` is an integration error reported when the view is requested.
    fn template(&self) -> Option<CellTemplate>;

    /// Binds the row's data into a freshly dequeued view.
    fn configure(&self, view: &mut V);

    /// Rebinding capability.
    fn as_rebind(&self) -> Option<&dyn Rebind<V>> {
        None
    }

    /// Self-sizing capability.
    fn as_height(&self) -> Option<&dyn RowHeight> {
        None
    }

    /// Display lifecycle capability.
    fn as_lifecycle(&self) -> Option<&dyn DisplayLifecycle<V>> {
        None
    }

    /// Height-change notification capability.
    fn as_height_notifier(&self) -> Option<&dyn HeightChangeNotifier> {
        None
    }
}

/// Refreshes a view that is already on screen without dequeuing a new one.
pub trait Rebind<V> {
    /// Reapplies the row's current data to `view`.
    fn rebind(&self, view: &mut V);
}

/// Reports the row's own height.
pub trait RowHeight {
    /// Height of the row laid out at `width`.
    fn height(&self, width: f64) -> f64;
}

/// Hooks invoked as the row's view enters and leaves the screen.
pub trait DisplayLifecycle<V> {
    /// The view is about to be shown.
    fn will_display(&self, view: &mut V) {
        let _ = view;
    }

    /// The view left the screen.
    fn did_hide(&self, view: &mut V) {
        let _ = view;
    }
}

/// Lets a row announce that its height changed after it was displayed.
pub trait HeightChangeNotifier {
    /// Replaces the handler the row calls after its height changes.
    fn set_height_change_handler(&self, handler: HeightChangeHandler);
}
