// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! In-memory host and rows shared by the unit tests.

use alloc::rc::Rc;
use alloc::string::String;
use alloc::vec::Vec;
use core::cell::{Cell, RefCell};

use understory_flow_layout::IndexPath;

use crate::{
    BatchId, BatchUpdate, CellTemplate, DisplayLifecycle, HeightChangeHandler,
    HeightChangeNotifier, HostView, Rebind, RowHeight, RowModel, SharedRow, TemplateKey,
};

#[derive(Clone, Debug, PartialEq)]
pub(crate) struct Label {
    pub(crate) template: TemplateKey,
    pub(crate) index_path: IndexPath,
    pub(crate) kind: Option<String>,
    pub(crate) text: String,
    pub(crate) rebinds: usize,
    pub(crate) displayed: bool,
}

#[derive(Default)]
pub(crate) struct MockHost {
    pub(crate) registered_cells: Vec<TemplateKey>,
    pub(crate) registered_supplementary: Vec<(String, TemplateKey)>,
    pub(crate) visible: Vec<(IndexPath, Label)>,
    pub(crate) batches: Vec<BatchUpdate>,
    pub(crate) batch_ids: Vec<BatchId>,
    pub(crate) full_reloads: usize,
    pub(crate) relayouts: Rc<Cell<usize>>,
}

impl MockHost {
    pub(crate) fn show(&mut self, index_path: IndexPath, label: Label) {
        self.visible.push((index_path, label));
    }

    pub(crate) fn visible_label(&self, index_path: IndexPath) -> &Label {
        self.visible
            .iter()
            .find(|(path, _)| *path == index_path)
            .map(|(_, label)| label)
            .expect("index path should be visible")
    }

    fn label(key: &TemplateKey, index_path: IndexPath, kind: Option<&str>) -> Label {
        Label {
            template: key.clone(),
            index_path,
            kind: kind.map(String::from),
            text: String::new(),
            rebinds: 0,
            displayed: false,
        }
    }
}

impl HostView for MockHost {
    type View = Label;

    fn register_cell(&mut self, template: &CellTemplate) {
        self.registered_cells.push(template.key());
    }

    fn register_supplementary(&mut self, kind: &str, template: &CellTemplate) {
        self.registered_supplementary
            .push((String::from(kind), template.key()));
    }

    fn dequeue_cell(&mut self, key: &TemplateKey, index_path: IndexPath) -> Label {
        Self::label(key, index_path, None)
    }

    fn dequeue_supplementary(
        &mut self,
        kind: &str,
        key: &TemplateKey,
        index_path: IndexPath,
    ) -> Label {
        Self::label(key, index_path, Some(kind))
    }

    fn visible_index_paths(&self) -> Vec<IndexPath> {
        self.visible.iter().map(|(path, _)| *path).collect()
    }

    fn visible_view_mut(&mut self, index_path: IndexPath) -> Option<&mut Label> {
        self.visible
            .iter_mut()
            .find(|(path, _)| *path == index_path)
            .map(|(_, label)| label)
    }

    fn perform_batch_updates(&mut self, batch: BatchId, update: &BatchUpdate) {
        self.batch_ids.push(batch);
        self.batches.push(update.clone());
    }

    fn reload_data(&mut self) {
        self.full_reloads += 1;
    }

    fn relayout_requester(&self) -> HeightChangeHandler {
        let relayouts = Rc::clone(&self.relayouts);
        Rc::new(move || relayouts.set(relayouts.get() + 1))
    }
}

pub(crate) struct TestRow {
    id: String,
    template: Option<CellTemplate>,
    rebindable: bool,
    height: Option<f64>,
    notifies: bool,
    handler: RefCell<Option<HeightChangeHandler>>,
}

impl TestRow {
    pub(crate) fn new(id: &str) -> Self {
        Self {
            id: String::from(id),
            template: Some(CellTemplate::resource("label")),
            rebindable: false,
            height: None,
            notifies: false,
            handler: RefCell::new(None),
        }
    }

    pub(crate) fn with_template(mut self, template: CellTemplate) -> Self {
        self.template = Some(template);
        self
    }

    pub(crate) fn without_template(mut self) -> Self {
        self.template = None;
        self
    }

    pub(crate) fn rebindable(mut self) -> Self {
        self.rebindable = true;
        self
    }

    pub(crate) fn with_height(mut self, height: f64) -> Self {
        self.height = Some(height);
        self
    }

    pub(crate) fn notifying(mut self) -> Self {
        self.notifies = true;
        self
    }

    pub(crate) fn shared(self) -> SharedRow<Label> {
        Rc::new(self)
    }

    /// Simulates content that finished loading and changed the row's height.
    pub(crate) fn announce_height_change(&self) {
        let handler = self.handler.borrow().clone();
        if let Some(handler) = handler {
            handler();
        }
    }
}

impl RowModel<Label> for TestRow {
    fn row_id(&self) -> &str {
        &self.id
    }

    fn template(&self) -> Option<CellTemplate> {
        self.template.clone()
    }

    fn configure(&self, view: &mut Label) {
        view.text.clone_from(&self.id);
    }

    fn as_rebind(&self) -> Option<&dyn Rebind<Label>> {
        self.rebindable.then_some(self as &dyn Rebind<Label>)
    }

    fn as_height(&self) -> Option<&dyn RowHeight> {
        self.height.is_some().then_some(self as &dyn RowHeight)
    }

    fn as_lifecycle(&self) -> Option<&dyn DisplayLifecycle<Label>> {
        Some(self)
    }

    fn as_height_notifier(&self) -> Option<&dyn HeightChangeNotifier> {
        self.notifies.then_some(self as &dyn HeightChangeNotifier)
    }
}

impl Rebind<Label> for TestRow {
    fn rebind(&self, view: &mut Label) {
        view.text.clone_from(&self.id);
        view.rebinds += 1;
    }
}

impl RowHeight for TestRow {
    fn height(&self, _width: f64) -> f64 {
        self.height.unwrap_or_default()
    }
}

impl DisplayLifecycle<Label> for TestRow {
    fn will_display(&self, view: &mut Label) {
        view.displayed = true;
    }

    fn did_hide(&self, view: &mut Label) {
        view.displayed = false;
    }
}

impl HeightChangeNotifier for TestRow {
    fn set_height_change_handler(&self, handler: HeightChangeHandler) {
        *self.handler.borrow_mut() = Some(handler);
    }
}
