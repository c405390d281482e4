// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The scrollable view a data source feeds, and the batch updates it animates.

use alloc::vec::Vec;

use understory_flow_layout::IndexPath;

use crate::{CellTemplate, EditScript, HeightChangeHandler, TemplateKey};

/// Insertions, deletions, and moves applied to the host in one animated transition.
///
/// Deletions and move sources use index paths from before the update;
/// insertions and move destinations use index paths from after it.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BatchUpdate {
    /// Removed items.
    pub deletes: Vec<IndexPath>,
    /// Added items.
    pub inserts: Vec<IndexPath>,
    /// Items that changed position, as `(from, to)`.
    pub moves: Vec<(IndexPath, IndexPath)>,
}

impl BatchUpdate {
    /// An update that changes nothing and only asks the host to lay out again.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Maps an edit script over a single section onto index paths.
    #[must_use]
    pub fn from_script(section: usize, script: &EditScript) -> Self {
        let path = |item| IndexPath::new(section, item);
        Self {
            deletes: script.deletions.iter().copied().map(path).collect(),
            inserts: script.insertions.iter().copied().map(path).collect(),
            moves: script
                .moves
                .iter()
                .map(|m| (path(m.from), path(m.to)))
                .collect(),
        }
    }

    /// Returns `true` if the update changes no items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.deletes.is_empty() && self.inserts.is_empty() && self.moves.is_empty()
    }
}

/// Identifies one animated transition started by a
/// [`ReloadController`](crate::ReloadController).
///
/// Hosts hand the id back through
/// [`ReloadController::finish_batch_updates`](crate::ReloadController::finish_batch_updates)
/// so that the end of a superseded animation is not taken for the end of the
/// current one.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct BatchId(pub(crate) u64);

/// The host view contract consumed by [`DataSource`](crate::DataSource) and
/// [`ReloadController`](crate::ReloadController).
///
/// Hosts own view instances and their reuse pools. Registration is keyed by
/// [`TemplateKey`]; the data source guarantees each key is registered once.
pub trait HostView {
    /// Reusable view type.
    type View;

    /// Makes `template` available for [`HostView::dequeue_cell`].
    fn register_cell(&mut self, template: &CellTemplate);

    /// Makes `template` available for supplementary elements of `kind`.
    fn register_supplementary(&mut self, kind: &str, template: &CellTemplate);

    /// Returns a reusable cell view for `key`, positioned at `index_path`.
    fn dequeue_cell(&mut self, key: &TemplateKey, index_path: IndexPath) -> Self::View;

    /// Returns a reusable supplementary view of `kind` for `key`.
    fn dequeue_supplementary(
        &mut self,
        kind: &str,
        key: &TemplateKey,
        index_path: IndexPath,
    ) -> Self::View;

    /// Index paths of the items currently on screen.
    fn visible_index_paths(&self) -> Vec<IndexPath>;

    /// The on-screen view at `index_path`, if it is visible.
    fn visible_view_mut(&mut self, index_path: IndexPath) -> Option<&mut Self::View>;

    /// Starts the animated transition `batch`.
    ///
    /// The host reports the end of the animation, passing `batch` back, through
    /// [`ReloadController::finish_batch_updates`](crate::ReloadController::finish_batch_updates).
    fn perform_batch_updates(&mut self, batch: BatchId, update: &BatchUpdate);

    /// Discards every visible view and reloads all content without animation.
    fn reload_data(&mut self);

    /// A callback that asks the host to lay out again without reloading data,
    /// typically by performing [`BatchUpdate::empty`].
    fn relayout_requester(&self) -> HeightChangeHandler;
}
