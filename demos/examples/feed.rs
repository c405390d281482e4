// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A headless feed: `understory_row_source` rows laid out by `understory_flow_layout`.
//!
//! The feed starts with a full-width banner followed by a two-column grid of
//! tiles, with a header pinned to the top of the viewport. The example then
//! scrolls, performs an animated reload, and lets one tile grow after it was
//! displayed.
//!
//! Run:
//! - `RUST_LOG=debug cargo run -p understory_flow_demos --example feed`

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use kurbo::{Insets, Rect};
use tracing_subscriber::EnvFilter;
use understory_flow_layout::{
    CustomPass, ElementCategory, FlowLayout, FlowLayoutConfig, FlowLayoutDelegate, IndexPath,
    KindKey, LayoutAttributes, LayoutHost, LineAttributes,
};
use understory_row_source::{
    BatchId, BatchUpdate, CellTemplate, DataSource, DataSourceError, HeightChangeHandler,
    HeightChangeNotifier, HostView, Rebind, ReloadController, RowHeight, RowModel, SharedRow,
    TemplateKey,
};

const HEADER: &str = "header";

/// A view as the headless host sees it.
#[derive(Debug)]
struct TextView {
    template: TemplateKey,
    text: String,
}

/// Marker type for the tile template.
struct TileCell;

struct Banner {
    id: String,
    title: &'static str,
}

impl RowModel<TextView> for Banner {
    fn row_id(&self) -> &str {
        &self.id
    }

    fn template(&self) -> Option<CellTemplate> {
        Some(CellTemplate::resource("banner"))
    }

    fn configure(&self, view: &mut TextView) {
        view.text = self.title.to_owned();
    }

    fn as_height(&self) -> Option<&dyn RowHeight> {
        Some(self)
    }
}

impl RowHeight for Banner {
    fn height(&self, _width: f64) -> f64 {
        120.0
    }
}

struct Tile {
    id: String,
    expanded: Cell<bool>,
    on_height_change: RefCell<Option<HeightChangeHandler>>,
}

impl Tile {
    fn new(id: &str) -> Rc<Self> {
        Rc::new(Self {
            id: id.to_owned(),
            expanded: Cell::new(false),
            on_height_change: RefCell::new(None),
        })
    }

    fn expand(&self) {
        self.expanded.set(true);
        let handler = self.on_height_change.borrow().clone();
        if let Some(handler) = handler {
            handler();
        }
    }

    fn caption(&self) -> String {
        if self.expanded.get() {
            format!("{} (expanded)", self.id)
        } else {
            self.id.clone()
        }
    }
}

impl RowModel<TextView> for Tile {
    fn row_id(&self) -> &str {
        &self.id
    }

    fn template(&self) -> Option<CellTemplate> {
        Some(CellTemplate::of::<TileCell>())
    }

    fn configure(&self, view: &mut TextView) {
        view.text = self.caption();
    }

    fn as_rebind(&self) -> Option<&dyn Rebind<TextView>> {
        Some(self)
    }

    fn as_height(&self) -> Option<&dyn RowHeight> {
        Some(self)
    }

    fn as_height_notifier(&self) -> Option<&dyn HeightChangeNotifier> {
        Some(self)
    }
}

impl Rebind<TextView> for Tile {
    fn rebind(&self, view: &mut TextView) {
        view.text = self.caption();
    }
}

impl RowHeight for Tile {
    fn height(&self, width: f64) -> f64 {
        if self.expanded.get() { width * 1.5 } else { width }
    }
}

impl HeightChangeNotifier for Tile {
    fn set_height_change_handler(&self, handler: HeightChangeHandler) {
        *self.on_height_change.borrow_mut() = Some(handler);
    }
}

/// The host toolkit: owns views, records transitions, and tracks relayout requests.
struct Screen {
    bounds: Rect,
    visible: Vec<(IndexPath, TextView)>,
    needs_relayout: Rc<Cell<bool>>,
    animating: Option<BatchId>,
}

impl Screen {
    fn animate(&self, update: &BatchUpdate) {
        tracing::info!(
            deletes = ?update.deletes,
            inserts = ?update.inserts,
            moves = ?update.moves,
            "host animating batch update"
        );
    }
}

impl HostView for Screen {
    type View = TextView;

    fn register_cell(&mut self, template: &CellTemplate) {
        tracing::info!(%template, "host registered cell template");
    }

    fn register_supplementary(&mut self, kind: &str, template: &CellTemplate) {
        tracing::info!(kind, %template, "host registered supplementary template");
    }

    fn dequeue_cell(&mut self, key: &TemplateKey, _index_path: IndexPath) -> TextView {
        TextView {
            template: key.clone(),
            text: String::new(),
        }
    }

    fn dequeue_supplementary(
        &mut self,
        _kind: &str,
        key: &TemplateKey,
        _index_path: IndexPath,
    ) -> TextView {
        TextView {
            template: key.clone(),
            text: String::new(),
        }
    }

    fn visible_index_paths(&self) -> Vec<IndexPath> {
        self.visible.iter().map(|(path, _)| *path).collect()
    }

    fn visible_view_mut(&mut self, index_path: IndexPath) -> Option<&mut TextView> {
        self.visible
            .iter_mut()
            .find(|(path, _)| *path == index_path)
            .map(|(_, view)| view)
    }

    fn perform_batch_updates(&mut self, batch: BatchId, update: &BatchUpdate) {
        self.animate(update);
        self.animating = Some(batch);
    }

    fn reload_data(&mut self) {
        self.visible.clear();
    }

    fn relayout_requester(&self) -> HeightChangeHandler {
        let flag = Rc::clone(&self.needs_relayout);
        Rc::new(move || flag.set(true))
    }
}

/// Counts come from the data source, geometry from the screen.
struct Viewport<'a> {
    source: &'a DataSource<TextView>,
    bounds: Rect,
}

impl LayoutHost for Viewport<'_> {
    fn section_count(&self) -> usize {
        self.source.section_count()
    }

    fn item_count(&self, section: usize) -> usize {
        self.source.item_count(section)
    }

    fn bounds(&self) -> Rect {
        self.bounds
    }

    fn safe_area_insets(&self) -> Insets {
        Insets::new(0.0, 24.0, 0.0, 0.0)
    }
}

/// Banners span the width; everything else is a two-column grid.
struct FeedShape<'a> {
    source: &'a DataSource<TextView>,
}

impl FlowLayoutDelegate for FeedShape<'_> {
    fn line_attributes(&self, index_path: IndexPath) -> Option<LineAttributes> {
        let row = self.source.row(index_path)?;
        if row.row_id().starts_with("banner") {
            Some(LineAttributes::FULL_WIDTH)
        } else {
            Some(LineAttributes::new(2, 8.0))
        }
    }

    fn supplementary_height(&self, kind: &str, _index_path: IndexPath, _width: f64) -> Option<f64> {
        (kind == HEADER).then_some(32.0)
    }
}

/// Keeps the header at the top of the viewport; the section top inset leaves room for it.
fn pin_header(pass: CustomPass<'_>) {
    let path = IndexPath::new(0, 0);
    let width = pass.bounds.width();
    let height = pass
        .delegate
        .and_then(|delegate| delegate.supplementary_height(HEADER, path, width))
        .unwrap_or(0.0);
    let top = pass.bounds.y0.max(0.0);
    pass.custom_kinds.insert(
        KindKey::new(HEADER, path),
        LayoutAttributes::supplementary(HEADER, path, Rect::new(0.0, top, width, top + height)),
    );
}

fn layout_pass(layout: &mut FlowLayout, source: &DataSource<TextView>, bounds: Rect) {
    let viewport = Viewport { source, bounds };
    let shape = FeedShape { source };
    let delegate = source.row_heights().with_fallback(&shape);
    layout.prepare(&viewport, Some(&delegate));
}

fn print_visible(layout: &FlowLayout, bounds: Rect) {
    let mut visible: Vec<_> = layout.attributes_in_rect(bounds).collect();
    visible.sort_by(|a, b| {
        a.frame
            .y0
            .total_cmp(&b.frame.y0)
            .then(a.frame.x0.total_cmp(&b.frame.x0))
    });
    println!("content size {:?}, visible in {:?}:", layout.content_size(), bounds);
    for attributes in visible {
        println!(
            "  {:?} {} -> {:?}",
            attributes.category, attributes.index_path, attributes.frame
        );
    }
}

/// Dequeues and shows every visible cell, as a host would after layout.
fn realize(
    controller: &mut ReloadController<TextView>,
    layout: &FlowLayout,
    screen: &mut Screen,
) -> Result<(), DataSourceError> {
    screen.visible.clear();
    let mut paths: Vec<_> = layout
        .attributes_in_rect(screen.bounds)
        .filter(|attributes| attributes.category == ElementCategory::Cell)
        .map(|attributes| attributes.index_path)
        .collect();
    paths.sort();
    for path in paths {
        let mut view = controller.source_mut().cell(screen, path)?;
        controller.source().will_display(path, &mut view);
        screen.visible.push((path, view));
    }
    let header = controller
        .source_mut()
        .supplementary_view(screen, HEADER, IndexPath::new(0, 0))?;
    tracing::info!(header = %header.text, cells = screen.visible.len(), "realized");
    Ok(())
}

fn feed(tiles: &[Rc<Tile>]) -> Vec<SharedRow<TextView>> {
    let mut rows: Vec<SharedRow<TextView>> = vec![Rc::new(Banner {
        id: "banner:welcome".to_owned(),
        title: "Welcome back",
    })];
    rows.extend(tiles.iter().map(|tile| Rc::clone(tile) as SharedRow<TextView>));
    rows
}

fn main() -> Result<(), DataSourceError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let mut screen = Screen {
        bounds: Rect::new(0.0, 0.0, 360.0, 640.0),
        visible: Vec::new(),
        needs_relayout: Rc::new(Cell::new(false)),
        animating: None,
    };

    let tiles: Vec<Rc<Tile>> = ["a", "b", "c", "d", "e"].into_iter().map(Tile::new).collect();
    let mut controller = ReloadController::new(DataSource::with_empty_section());
    controller.source_mut().set_supplementary_row(
        HEADER,
        IndexPath::new(0, 0),
        Rc::new(Banner {
            id: "header".to_owned(),
            title: "Your feed",
        }),
    );
    controller.reload(
        &mut screen,
        feed(&tiles),
        false,
        |finished| tracing::info!(finished, "initial load complete"),
    );

    let mut layout = FlowLayout::new(FlowLayoutConfig {
        section_insets: Insets::new(16.0, 48.0, 16.0, 16.0),
        line_spacing: 12.0,
        pixel_scale: 3.0,
        ..FlowLayoutConfig::default()
    });
    layout.set_custom_positioning(pin_header);
    layout.set_invalidate_custom_on_scroll(true);

    layout_pass(&mut layout, controller.source(), screen.bounds);
    print_visible(&layout, screen.bounds);
    realize(&mut controller, &layout, &mut screen)?;

    // Scroll: the flow is kept, only the pinned header moves.
    screen.bounds = screen.bounds.with_origin((0.0, 300.0));
    if layout.should_invalidate_for_bounds_change(screen.bounds) {
        layout.invalidate();
    }
    layout_pass(&mut layout, controller.source(), screen.bounds);
    print_visible(&layout, screen.bounds);

    // Animated reload: drop "b", add "f" and "g".
    let next: Vec<Rc<Tile>> = vec![
        Rc::clone(&tiles[0]),
        Rc::clone(&tiles[2]),
        Rc::clone(&tiles[3]),
        Rc::clone(&tiles[4]),
        Tile::new("f"),
        Tile::new("g"),
    ];
    controller.reload(
        &mut screen,
        feed(&next),
        true,
        |finished| tracing::info!(finished, "animated reload complete"),
    );
    layout.invalidate();
    layout_pass(&mut layout, controller.source(), screen.bounds);
    if let Some(batch) = screen.animating.take() {
        controller.finish_batch_updates(&mut screen, batch, true);
    }
    realize(&mut controller, &layout, &mut screen)?;
    print_visible(&layout, screen.bounds);

    // A tile grows after display and asks the host to lay out again.
    next[4].expand();
    if screen.needs_relayout.replace(false) {
        screen.animate(&BatchUpdate::empty());
        layout.invalidate();
        layout_pass(&mut layout, controller.source(), screen.bounds);
        controller.source().rebind_visible_cells(&mut screen);
        print_visible(&layout, screen.bounds);
    }

    for (path, view) in &screen.visible {
        println!("  {path} {:?}: {}", view.template, view.text);
    }
    Ok(())
}
