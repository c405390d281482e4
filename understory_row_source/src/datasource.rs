// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Sections of rows resolved into host views.

use alloc::rc::Rc;
use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

use hashbrown::{HashMap, HashSet};
use kurbo::Insets;
use understory_flow_layout::{FlowLayoutDelegate, IndexPath, KindKey, LineAttributes};

use crate::{DataSourceError, HostView, Section, SharedRow, TemplateKey};

/// Id of the section created by [`DataSource::set_rows`].
pub const FLAT_SECTION_ID: &str = "0";

/// Owns the rows behind a grid and turns index paths into configured views.
///
/// Templates are registered with the host lazily, the first time a view for
/// them is requested, and never twice.
pub struct DataSource<V> {
    sections: Vec<Section<V>>,
    supplementary: HashMap<KindKey, SharedRow<V>>,
    registered_cells: HashSet<TemplateKey>,
    registered_supplementary: HashSet<(String, TemplateKey)>,
}

impl<V> fmt::Debug for DataSource<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DataSource")
            .field("sections", &self.sections)
            .field("supplementary", &self.supplementary.len())
            .field("registered_cells", &self.registered_cells)
            .field("registered_supplementary", &self.registered_supplementary)
            .finish()
    }
}

impl<V> Default for DataSource<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> DataSource<V> {
    /// Creates a data source with no sections.
    #[must_use]
    pub fn new() -> Self {
        Self {
            sections: Vec::new(),
            supplementary: HashMap::new(),
            registered_cells: HashSet::new(),
            registered_supplementary: HashSet::new(),
        }
    }

    /// Creates a data source holding one empty section, so hosts see a
    /// section before the first rows arrive.
    #[must_use]
    pub fn with_empty_section() -> Self {
        let mut source = Self::new();
        source.set_rows(Vec::new());
        source
    }

    /// Number of sections.
    #[must_use]
    pub fn section_count(&self) -> usize {
        self.sections.len()
    }

    /// Number of rows in `section`; zero when the section does not exist.
    #[must_use]
    pub fn item_count(&self, section: usize) -> usize {
        self.sections.get(section).map_or(0, Section::len)
    }

    /// All sections.
    #[must_use]
    pub fn sections(&self) -> &[Section<V>] {
        &self.sections
    }

    /// Mutable access to the sections.
    pub fn sections_mut(&mut self) -> &mut Vec<Section<V>> {
        &mut self.sections
    }

    /// Replaces all sections.
    pub fn set_sections(&mut self, sections: Vec<Section<V>>) {
        self.sections = sections;
    }

    /// Rows of the first section, or nothing when there are no sections.
    #[must_use]
    pub fn rows(&self) -> &[SharedRow<V>] {
        self.sections
            .first()
            .map_or(&[] as &[_], |section| section.rows.as_slice())
    }

    /// Replaces all sections with a single section holding `rows`.
    pub fn set_rows(&mut self, rows: Vec<SharedRow<V>>) {
        self.sections = alloc::vec![Section::new(FLAT_SECTION_ID, rows)];
    }

    /// Ids of [`DataSource::rows`], in order.
    #[must_use]
    pub fn row_ids(&self) -> Vec<String> {
        self.rows().iter().map(|row| String::from(row.row_id())).collect()
    }

    /// Row at `index_path`; `None` when either index is out of range.
    #[must_use]
    pub fn row(&self, index_path: IndexPath) -> Option<&SharedRow<V>> {
        self.sections.get(index_path.section)?.get(index_path.item)
    }

    /// Registers the row backing the supplementary element of `kind` at `index_path`.
    pub fn set_supplementary_row(
        &mut self,
        kind: impl Into<String>,
        index_path: IndexPath,
        row: SharedRow<V>,
    ) {
        self.supplementary.insert(KindKey::new(kind, index_path), row);
    }

    /// Row backing the supplementary element of `kind` at `index_path`.
    #[must_use]
    pub fn supplementary_row(&self, kind: &str, index_path: IndexPath) -> Option<&SharedRow<V>> {
        self.supplementary.get(&KindKey::new(kind, index_path))
    }

    /// Removes every supplementary row.
    pub fn clear_supplementary_rows(&mut self) {
        self.supplementary.clear();
    }

    /// Height reported by the row at `index_path` for `width`, if it is self-sizing.
    #[must_use]
    pub fn height_for_item(&self, index_path: IndexPath, width: f64) -> Option<f64> {
        let height = self.row(index_path)?.as_height()?;
        Some(height.height(width))
    }

    /// A layout delegate answering item heights from the rows.
    #[must_use]
    pub fn row_heights(&self) -> RowHeights<'_, V> {
        RowHeights {
            source: self,
            fallback: None,
        }
    }

    /// Builds and configures the cell view for the row at `index_path`.
    pub fn cell<H>(&mut self, host: &mut H, index_path: IndexPath) -> Result<V, DataSourceError>
    where
        H: HostView<View = V> + ?Sized,
    {
        let row = match self.row(index_path) {
            Some(row) => Rc::clone(row),
            None => return Err(report(DataSourceError::IndexOutOfRange { index_path })),
        };
        let Some(template) = row.template() else {
            return Err(report(DataSourceError::MissingTemplate {
                row_id: String::from(row.row_id()),
            }));
        };
        let key = template.key();
        if !self.registered_cells.contains(&key) {
            tracing::trace!(%template, "registering cell template");
            host.register_cell(&template);
            self.registered_cells.insert(key.clone());
        }
        let mut view = host.dequeue_cell(&key, index_path);
        row.configure(&mut view);
        Ok(view)
    }

    /// Builds and configures the supplementary view of `kind` at `index_path`.
    pub fn supplementary_view<H>(
        &mut self,
        host: &mut H,
        kind: &str,
        index_path: IndexPath,
    ) -> Result<V, DataSourceError>
    where
        H: HostView<View = V> + ?Sized,
    {
        let row = match self.supplementary_row(kind, index_path) {
            Some(row) => Rc::clone(row),
            None => {
                return Err(report(DataSourceError::MissingSupplementaryRow {
                    kind: String::from(kind),
                    index_path,
                }));
            }
        };
        let Some(template) = row.template() else {
            return Err(report(DataSourceError::MissingTemplate {
                row_id: String::from(row.row_id()),
            }));
        };
        let key = template.key();
        let registration = (String::from(kind), key);
        if !self.registered_supplementary.contains(&registration) {
            tracing::trace!(kind, %template, "registering supplementary template");
            host.register_supplementary(kind, &template);
            self.registered_supplementary.insert(registration.clone());
        }
        let mut view = host.dequeue_supplementary(kind, &registration.1, index_path);
        row.configure(&mut view);
        Ok(view)
    }

    /// Reapplies row data to every visible view whose row can rebind.
    ///
    /// Returns how many views were rebound.
    pub fn rebind_visible_cells<H>(&self, host: &mut H) -> usize
    where
        H: HostView<View = V> + ?Sized,
    {
        let mut rebound = 0;
        for index_path in host.visible_index_paths() {
            let Some(rebind) = self.row(index_path).and_then(|row| row.as_rebind()) else {
                continue;
            };
            if let Some(view) = host.visible_view_mut(index_path) {
                rebind.rebind(view);
                rebound += 1;
            }
        }
        tracing::trace!(rebound, "rebound visible cells");
        rebound
    }

    /// Forwards to the row's [`DisplayLifecycle::will_display`](crate::DisplayLifecycle::will_display).
    pub fn will_display(&self, index_path: IndexPath, view: &mut V) {
        if let Some(lifecycle) = self.row(index_path).and_then(|row| row.as_lifecycle()) {
            lifecycle.will_display(view);
        }
    }

    /// Forwards to the row's [`DisplayLifecycle::did_hide`](crate::DisplayLifecycle::did_hide).
    pub fn did_hide(&self, index_path: IndexPath, view: &mut V) {
        if let Some(lifecycle) = self.row(index_path).and_then(|row| row.as_lifecycle()) {
            lifecycle.did_hide(view);
        }
    }
}

fn report(error: DataSourceError) -> DataSourceError {
    tracing::error!(%error, "data source misconfigured");
    error
}

/// [`FlowLayoutDelegate`] that sizes items from rows implementing
/// [`RowHeight`](crate::RowHeight).
///
/// Everything else, and rows without a height, is answered by an optional
/// fallback delegate.
pub struct RowHeights<'a, V> {
    source: &'a DataSource<V>,
    fallback: Option<&'a dyn FlowLayoutDelegate>,
}

impl<V> fmt::Debug for RowHeights<'_, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RowHeights")
            .field("sections", &self.source.section_count())
            .field("fallback", &self.fallback.is_some())
            .finish()
    }
}

impl<'a, V> RowHeights<'a, V> {
    /// Delegates everything rows cannot answer to `fallback`.
    #[must_use]
    pub fn with_fallback(mut self, fallback: &'a dyn FlowLayoutDelegate) -> Self {
        self.fallback = Some(fallback);
        self
    }
}

impl<V> FlowLayoutDelegate for RowHeights<'_, V> {
    fn height_for_item(&self, index_path: IndexPath, width: f64) -> Option<f64> {
        self.source
            .height_for_item(index_path, width)
            .or_else(|| self.fallback?.height_for_item(index_path, width))
    }

    fn spacing_between(&self, previous: IndexPath, next: IndexPath, width: f64) -> Option<f64> {
        self.fallback?.spacing_between(previous, next, width)
    }

    fn supplementary_height(&self, kind: &str, index_path: IndexPath, width: f64) -> Option<f64> {
        self.fallback?.supplementary_height(kind, index_path, width)
    }

    fn additional_horizontal_insets(&self, index_path: IndexPath) -> Option<Insets> {
        self.fallback?.additional_horizontal_insets(index_path)
    }

    fn line_attributes(&self, index_path: IndexPath) -> Option<LineAttributes> {
        self.fallback?.line_attributes(index_path)
    }

    fn section_insets(&self, section: usize) -> Option<Insets> {
        self.fallback?.section_insets(section)
    }
}
