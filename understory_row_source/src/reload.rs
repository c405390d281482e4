// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Diff-driven reloads of a [`DataSource`].

use alloc::boxed::Box;
use alloc::rc::Rc;
use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;
use core::hash::Hash;

use crate::{BatchId, BatchUpdate, DataSource, HeightChangeHandler, HostView, SharedRow, diff};

/// Callback told whether a reload's animation ran to completion.
pub type Completion = Box<dyn FnOnce(bool)>;

/// Applies new rows to a [`DataSource`] and drives the matching host transition.
///
/// An animated reload stays pending until the host calls
/// [`ReloadController::finish_batch_updates`] with the [`BatchId`] it was
/// given. Starting another reload while one is pending supersedes it: the
/// pending completion runs immediately with `false` and no rebind happens for
/// it. The host's later report for a superseded batch is ignored.
///
/// After every row replacement, rows exposing
/// [`HeightChangeNotifier`](crate::HeightChangeNotifier) are wired to the
/// custom height-change handler if one is set, or else to the host's
/// relayout requester.
pub struct ReloadController<V> {
    source: DataSource<V>,
    pending: Option<(BatchId, Completion)>,
    next_batch: u64,
    height_change_handler: Option<HeightChangeHandler>,
}

impl<V> fmt::Debug for ReloadController<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReloadController")
            .field("source", &self.source)
            .field("pending", &self.pending.as_ref().map(|(batch, _)| *batch))
            .field("next_batch", &self.next_batch)
            .field(
                "height_change_handler",
                &self.height_change_handler.is_some(),
            )
            .finish()
    }
}

impl<V> ReloadController<V> {
    /// Takes ownership of `source`.
    #[must_use]
    pub fn new(source: DataSource<V>) -> Self {
        Self {
            source,
            pending: None,
            next_batch: 0,
            height_change_handler: None,
        }
    }

    /// The data source.
    #[must_use]
    pub const fn source(&self) -> &DataSource<V> {
        &self.source
    }

    /// Mutable access to the data source.
    pub fn source_mut(&mut self) -> &mut DataSource<V> {
        &mut self.source
    }

    /// Returns the data source.
    #[must_use]
    pub fn into_source(self) -> DataSource<V> {
        self.source
    }

    /// Returns `true` while an animated reload waits for the host to finish.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Sets the handler rows call after their height changed.
    ///
    /// `None` restores the default of asking the host to relayout. Takes
    /// effect at the next reload.
    pub fn set_height_change_handler(&mut self, handler: Option<HeightChangeHandler>) {
        self.height_change_handler = handler;
    }

    /// Reloads from `old_ids` to `new_ids` with an animated batch update.
    ///
    /// `apply` swaps the new rows into the data source before the host is
    /// told about the transition, so data and animation describe the same
    /// change. `completion` runs from
    /// [`ReloadController::finish_batch_updates`] for the returned batch.
    pub fn reload_ids<H, T, A, C>(
        &mut self,
        host: &mut H,
        old_ids: &[T],
        new_ids: &[T],
        apply: A,
        completion: C,
    ) -> BatchId
    where
        H: HostView<View = V> + ?Sized,
        T: Eq + Hash,
        A: FnOnce(&mut DataSource<V>),
        C: FnOnce(bool) + 'static,
    {
        self.supersede_pending();
        let script = diff(old_ids, new_ids);
        tracing::debug!(
            deletes = script.deletions.len(),
            inserts = script.insertions.len(),
            moves = script.moves.len(),
            "animated reload"
        );
        apply(&mut self.source);
        self.wire_height_changes(host);
        let batch = BatchId(self.next_batch);
        self.next_batch = self.next_batch.wrapping_add(1);
        self.pending = Some((batch, Box::new(completion)));
        host.perform_batch_updates(batch, &BatchUpdate::from_script(0, &script));
        batch
    }

    /// Replaces the rows of the data source with `rows`.
    ///
    /// Animated reloads diff the current row ids against the new ones and
    /// complete through [`ReloadController::finish_batch_updates`]. Otherwise
    /// the host reloads all data, visible cells are rebound, and `completion`
    /// runs with `true` before this returns.
    ///
    /// Returns the batch an animated reload started.
    pub fn reload<H, C>(
        &mut self,
        host: &mut H,
        rows: Vec<SharedRow<V>>,
        animated: bool,
        completion: C,
    ) -> Option<BatchId>
    where
        H: HostView<View = V> + ?Sized,
        C: FnOnce(bool) + 'static,
    {
        if animated {
            let old_ids = self.source.row_ids();
            let new_ids: Vec<String> = rows.iter().map(|row| String::from(row.row_id())).collect();
            return Some(self.reload_ids(
                host,
                &old_ids,
                &new_ids,
                move |source| source.set_rows(rows),
                completion,
            ));
        }
        self.supersede_pending();
        tracing::debug!(rows = rows.len(), "full reload");
        self.source.set_rows(rows);
        self.wire_height_changes(host);
        host.reload_data();
        self.complete(host, Box::new(completion), true);
        None
    }

    /// Reports the end of the animation for `batch`.
    ///
    /// When `finished` is `true`, visible cells are rebound before the
    /// completion runs. Does nothing unless `batch` is the pending reload;
    /// superseded batches already completed with `false`.
    pub fn finish_batch_updates<H>(&mut self, host: &mut H, batch: BatchId, finished: bool)
    where
        H: HostView<View = V> + ?Sized,
    {
        match self.pending.take() {
            Some((pending, completion)) if pending == batch => {
                self.complete(host, completion, finished);
            }
            other => {
                tracing::trace!(
                    ?batch,
                    finished,
                    "ignoring report for a batch that is not pending"
                );
                self.pending = other;
            }
        }
    }

    fn complete<H>(&self, host: &mut H, completion: Completion, finished: bool)
    where
        H: HostView<View = V> + ?Sized,
    {
        if finished {
            self.source.rebind_visible_cells(host);
        }
        completion(finished);
    }

    fn supersede_pending(&mut self) {
        if let Some((batch, completion)) = self.pending.take() {
            tracing::warn!(
                ?batch,
                "reload started before the previous one finished; superseding it"
            );
            completion(false);
        }
    }

    fn wire_height_changes<H>(&self, host: &H)
    where
        H: HostView<View = V> + ?Sized,
    {
        let handler = self
            .height_change_handler
            .clone()
            .unwrap_or_else(|| host.relayout_requester());
        let mut wired = 0_usize;
        for row in self.source.sections().iter().flat_map(|section| section.iter()) {
            if let Some(notifier) = row.as_height_notifier() {
                notifier.set_height_change_handler(Rc::clone(&handler));
                wired += 1;
            }
        }
        tracing::trace!(wired, "height change handlers wired");
    }
}
