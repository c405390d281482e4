// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The flow layout engine: line packing, caching, and invalidation.

use alloc::boxed::Box;
use core::fmt;

use hashbrown::Equivalent;
use kurbo::{Insets, Rect, Size, Vec2};

use crate::custom::{AttributesMap, CustomPass, CustomPositioning, KindAttributesMap};
use crate::util::intersects;
use crate::{
    AppearanceInterception, FlowLayoutDelegate, IndexPath, KindKey, LayoutAttributes, LayoutHost,
    LineAttributes, PixelSnapper,
};

bitflags::bitflags! {
    /// The attribute caches owned by a [`FlowLayout`].
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct CacheSet: u8 {
        /// Attributes computed by the flow pass.
        const PRIMARY = 0b0000_0001;
        /// Item overrides written by the custom positioning strategy.
        const CUSTOM_ROWS = 0b0000_0010;
        /// Supplementary and decoration attributes written by the strategy.
        const CUSTOM_KINDS = 0b0000_0100;
    }
}

impl CacheSet {
    /// Both caches written by the custom positioning strategy.
    pub const CUSTOM: Self = Self::CUSTOM_ROWS.union(Self::CUSTOM_KINDS);
}

/// Where a [`FlowLayout`] is in its compute cycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LayoutPhase {
    /// No valid flow attributes; the next `prepare` runs a full pass.
    Dirty,
    /// A flow pass is running.
    ///
    /// Held only inside [`FlowLayout::prepare`], which borrows the layout
    /// mutably for the whole pass, so callers never observe it.
    Computing,
    /// Flow attributes are valid and served from the cache.
    Cached,
}

/// Layout-wide defaults and switches.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FlowLayoutConfig {
    /// Section insets used when the delegate does not supply any.
    pub section_insets: Insets,
    /// Vertical gap between lines used when the delegate does not supply one.
    pub line_spacing: f64,
    /// Item height used when the delegate does not supply one.
    pub item_height: f64,
    /// Device pixels per logical unit.
    pub pixel_scale: f64,
    /// Center content vertically when it is shorter than the viewport.
    pub center_content: bool,
    /// Extra vertical offset added to every item when content is centered.
    pub center_content_offset: f64,
    /// Drop custom-positioned elements and rerun the strategy on every scroll.
    pub invalidate_custom_on_scroll: bool,
}

impl Default for FlowLayoutConfig {
    fn default() -> Self {
        Self {
            section_insets: Insets::ZERO,
            line_spacing: 10.0,
            item_height: 50.0,
            pixel_scale: 1.0,
            center_content: false,
            center_content_offset: 0.0,
            invalidate_custom_on_scroll: false,
        }
    }
}

/// A vertical flow layout that packs items into lines of one or more columns.
///
/// Each item asks the delegate for its [`LineAttributes`]. Consecutive items
/// with equal attributes share a line until the line holds
/// [`LineAttributes::items_per_line`] items; any other item starts a new line.
/// Widths divide the section's available width evenly, the last slot of a line
/// is pinned flush right, and every origin and width is pixel-snapped.
///
/// Attributes are computed once by [`FlowLayout::prepare`] and served from a
/// cache until [`FlowLayout::invalidate`] or a bounds change clears it.
///
/// ## Example
///
/// ```rust
/// use kurbo::{Insets, Rect};
/// use understory_flow_layout::{
///     FlowLayout, FlowLayoutConfig, FlowLayoutDelegate, IndexPath, LayoutHost, LineAttributes,
/// };
///
/// struct Screen;
///
/// impl LayoutHost for Screen {
///     fn section_count(&self) -> usize { 1 }
///     fn item_count(&self, _section: usize) -> usize { 3 }
///     fn bounds(&self) -> Rect { Rect::new(0.0, 0.0, 100.0, 400.0) }
/// }
///
/// struct TwoUp;
///
/// impl FlowLayoutDelegate for TwoUp {
///     fn height_for_item(&self, _path: IndexPath, width: f64) -> Option<f64> {
///         Some(width)
///     }
///     fn line_attributes(&self, _path: IndexPath) -> Option<LineAttributes> {
///         Some(LineAttributes::new(2, 10.0))
///     }
/// }
///
/// let mut layout = FlowLayout::new(FlowLayoutConfig {
///     section_insets: Insets::uniform(10.0),
///     ..FlowLayoutConfig::default()
/// });
/// layout.prepare(&Screen, Some(&TwoUp));
///
/// // Two 35-wide squares on the first line, the third item wraps.
/// let first = layout.attributes_for_item(IndexPath::new(0, 0)).unwrap();
/// assert_eq!(first.frame, Rect::new(10.0, 10.0, 45.0, 45.0));
/// let second = layout.attributes_for_item(IndexPath::new(0, 1)).unwrap();
/// assert_eq!(second.frame, Rect::new(55.0, 10.0, 90.0, 45.0));
/// let third = layout.attributes_for_item(IndexPath::new(0, 2)).unwrap();
/// assert_eq!(third.frame.y0, 55.0);
/// assert_eq!(layout.content_size().height, 100.0);
/// ```
pub struct FlowLayout {
    config: FlowLayoutConfig,
    snapper: PixelSnapper,
    phase: LayoutPhase,
    /// Bounds captured by the last flow pass.
    baseline: Rect,
    content_height: f64,
    cache: AttributesMap,
    custom_rows: AttributesMap,
    custom_kinds: KindAttributesMap,
    /// Set when a bounds change already cleared the caches for the invalidation that follows it.
    skip_next_clear: bool,
    positioning: Option<Box<dyn CustomPositioning>>,
    appearance: AppearanceInterception,
}

impl fmt::Debug for FlowLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FlowLayout")
            .field("config", &self.config)
            .field("snapper", &self.snapper)
            .field("phase", &self.phase)
            .field("baseline", &self.baseline)
            .field("content_height", &self.content_height)
            .field("cached", &self.cache.len())
            .field("custom_rows", &self.custom_rows.len())
            .field("custom_kinds", &self.custom_kinds.len())
            .field("skip_next_clear", &self.skip_next_clear)
            .field("positioning", &self.positioning.is_some())
            .field("appearance", &self.appearance)
            .finish()
    }
}

impl Default for FlowLayout {
    fn default() -> Self {
        Self::new(FlowLayoutConfig::default())
    }
}

/// State of the line currently being filled.
#[derive(Clone, Copy, Debug)]
struct Line {
    attributes: LineAttributes,
    insets: Insets,
    y: f64,
    count: usize,
}

impl Line {
    fn accepts(&self, attributes: LineAttributes) -> bool {
        self.attributes == attributes && self.count < attributes.items_per_line()
    }
}

/// Horizontal geometry of one section.
#[derive(Clone, Copy, Debug)]
struct Columns {
    total_width: f64,
    section: Insets,
    snapper: PixelSnapper,
}

impl Columns {
    fn width(&self, line: LineAttributes, custom: Insets, snap: bool) -> f64 {
        let available =
            self.total_width - self.section.x0 - self.section.x1 - custom.x0 - custom.x1;
        let count = line.items_per_line() as f64;
        let width = (available - (count - 1.0) * line.spacing()) / count;
        if snap { self.snapper.round(width) } else { width }
    }

    fn x(&self, line: LineAttributes, custom: Insets, index_in_line: usize) -> f64 {
        let width = self.width(line, custom, false);
        let x = if index_in_line + 1 == line.items_per_line() {
            // Last slot: flush with the right edge regardless of accumulated rounding.
            self.total_width - self.section.x1 - custom.x1 - width
        } else {
            self.section.x0 + custom.x0 + (width + line.spacing()) * index_in_line as f64
        };
        self.snapper.round(x)
    }
}

/// Borrowed lookup key for [`KindKey`] that avoids allocating the kind string.
#[derive(Hash)]
struct KindKeyRef<'a> {
    kind: &'a str,
    section: usize,
    item: usize,
}

impl Equivalent<KindKey> for KindKeyRef<'_> {
    fn equivalent(&self, key: &KindKey) -> bool {
        self.kind == key.kind && self.section == key.section && self.item == key.item
    }
}

impl FlowLayout {
    /// Creates a layout with `config`.
    #[must_use]
    pub fn new(config: FlowLayoutConfig) -> Self {
        Self {
            snapper: PixelSnapper::new(config.pixel_scale),
            config,
            phase: LayoutPhase::Dirty,
            baseline: Rect::ZERO,
            content_height: 0.0,
            cache: AttributesMap::new(),
            custom_rows: AttributesMap::new(),
            custom_kinds: KindAttributesMap::new(),
            skip_next_clear: false,
            positioning: None,
            appearance: AppearanceInterception::default(),
        }
    }

    /// Current configuration.
    #[must_use]
    pub const fn config(&self) -> &FlowLayoutConfig {
        &self.config
    }

    /// Replaces the configuration, invalidating the layout if anything changed.
    ///
    /// Unlike [`FlowLayout::invalidate`], this always clears: a pending
    /// bounds-change marker is left for the host's own invalidation.
    pub fn set_config(&mut self, config: FlowLayoutConfig) {
        if config != self.config {
            self.snapper = PixelSnapper::new(config.pixel_scale);
            self.config = config;
            self.clear(CacheSet::all());
        }
    }

    /// Enables or disables vertical centering of short content.
    pub fn set_center_content(&mut self, center: bool) {
        self.set_config(FlowLayoutConfig {
            center_content: center,
            ..self.config
        });
    }

    /// Sets the extra offset applied to centered content.
    pub fn set_center_content_offset(&mut self, offset: f64) {
        self.set_config(FlowLayoutConfig {
            center_content_offset: offset,
            ..self.config
        });
    }

    /// Controls whether scrolling drops and recomputes custom-positioned elements.
    ///
    /// This does not invalidate the layout.
    pub fn set_invalidate_custom_on_scroll(&mut self, enabled: bool) {
        self.config.invalidate_custom_on_scroll = enabled;
    }

    /// Installs the strategy that positions custom rows and supplementary elements.
    pub fn set_custom_positioning(&mut self, strategy: impl CustomPositioning + 'static) {
        self.positioning = Some(Box::new(strategy));
        self.clear(CacheSet::all());
    }

    /// Removes the custom positioning strategy.
    pub fn clear_custom_positioning(&mut self) {
        if self.positioning.take().is_some() {
            self.clear(CacheSet::all());
        }
    }

    /// Appearance-animation settings.
    #[must_use]
    pub const fn appearance(&self) -> &AppearanceInterception {
        &self.appearance
    }

    /// Mutable appearance-animation settings.
    pub fn appearance_mut(&mut self) -> &mut AppearanceInterception {
        &mut self.appearance
    }

    /// Current phase of the compute cycle.
    #[must_use]
    pub const fn phase(&self) -> LayoutPhase {
        self.phase
    }

    /// Pixel snapper derived from [`FlowLayoutConfig::pixel_scale`].
    #[must_use]
    pub const fn snapper(&self) -> PixelSnapper {
        self.snapper
    }

    /// Total content height from the last pass.
    #[must_use]
    pub const fn content_height(&self) -> f64 {
        self.content_height
    }

    /// Scrollable content size: the width of the laid-out bounds and the content height.
    #[must_use]
    pub fn content_size(&self) -> Size {
        Size::new(self.baseline.width(), self.content_height)
    }

    /// Attributes produced by the flow pass, without overrides.
    #[must_use]
    pub const fn primary_attributes(&self) -> &AttributesMap {
        &self.cache
    }

    /// Item overrides written by the custom positioning strategy.
    #[must_use]
    pub const fn custom_rows(&self) -> &AttributesMap {
        &self.custom_rows
    }

    /// Supplementary and decoration attributes written by the custom positioning strategy.
    #[must_use]
    pub const fn custom_kinds(&self) -> &KindAttributesMap {
        &self.custom_kinds
    }

    /// Computes attributes if the cache is dirty.
    ///
    /// With a valid cache this only reruns the custom positioning strategy, and
    /// only when [`FlowLayoutConfig::invalidate_custom_on_scroll`] is set.
    pub fn prepare<H>(&mut self, host: &H, delegate: Option<&dyn FlowLayoutDelegate>)
    where
        H: LayoutHost + ?Sized,
    {
        if self.phase != LayoutPhase::Dirty {
            if self.config.invalidate_custom_on_scroll {
                self.run_custom_positioning(true, host.bounds(), delegate);
            }
            return;
        }
        self.compute(host, delegate);
    }

    fn compute<H>(&mut self, host: &H, delegate: Option<&dyn FlowLayoutDelegate>)
    where
        H: LayoutHost + ?Sized,
    {
        #[cfg(feature = "std")]
        let started = std::time::Instant::now();

        self.phase = LayoutPhase::Computing;
        let bounds = host.bounds();
        self.baseline = bounds;

        let FlowLayoutConfig {
            section_insets: default_insets,
            line_spacing,
            item_height,
            center_content,
            center_content_offset,
            ..
        } = self.config;
        let snapper = self.snapper;

        let mut y = 0.0_f64;
        let mut item_total = 0_usize;
        let section_count = host.section_count();
        for section in 0..section_count {
            let section_insets = delegate
                .and_then(|d| d.section_insets(section))
                .unwrap_or(default_insets);
            let item_count = host.item_count(section);
            if item_count == 0 {
                continue;
            }
            let columns = Columns {
                total_width: bounds.width(),
                section: section_insets,
                snapper,
            };

            y += section_insets.y0;
            let mut line: Option<Line> = None;
            for item in 0..item_count {
                let path = IndexPath::new(section, item);
                let attributes = delegate
                    .and_then(|d| d.line_attributes(path))
                    .unwrap_or(LineAttributes::FULL_WIDTH);
                let height_of = |width: f64| {
                    delegate
                        .and_then(|d| d.height_for_item(path, width))
                        .unwrap_or(item_height)
                };

                let frame = match line.as_mut().filter(|line| line.accepts(attributes)) {
                    Some(current) => {
                        let x = columns.x(attributes, current.insets, current.count);
                        let width = columns.width(attributes, current.insets, true);
                        let height = height_of(width);
                        current.count += 1;
                        y = y.max(current.y + height);
                        Rect::from_origin_size((x, current.y), (width, height))
                    }
                    None => {
                        let custom = delegate
                            .and_then(|d| d.additional_horizontal_insets(path))
                            .unwrap_or(Insets::ZERO);
                        let x = columns.x(attributes, custom, 0);
                        let width = columns.width(attributes, custom, true);
                        if let Some(previous) = path.previous_in_section() {
                            y += delegate
                                .and_then(|d| d.spacing_between(previous, path, width))
                                .unwrap_or(line_spacing);
                        }
                        let height = height_of(width);
                        line = Some(Line {
                            attributes,
                            insets: custom,
                            y,
                            count: 1,
                        });
                        let frame = Rect::from_origin_size((x, y), (width, height));
                        y += height;
                        frame
                    }
                };
                self.cache.insert(path, LayoutAttributes::cell(path, frame));
            }
            y += section_insets.y1;
            item_total += item_count;
        }
        self.content_height = y;

        if center_content {
            let content_insets = host.content_insets();
            let safe_area = host.safe_area_insets();
            let available = bounds.height()
                - (content_insets.y0 + content_insets.y1 + safe_area.y0 + safe_area.y1);
            if self.content_height <= available {
                let delta = snapper.round((available - self.content_height) / 2.0);
                self.content_height += delta;
                let shift = Vec2::new(0.0, delta + center_content_offset);
                for attributes in self.cache.values_mut() {
                    attributes.frame = attributes.frame + shift;
                }
            }
        }

        self.phase = LayoutPhase::Cached;
        self.run_custom_positioning(false, bounds, delegate);

        #[cfg(feature = "std")]
        tracing::debug!(
            sections = section_count,
            items = item_total,
            content_height = self.content_height,
            elapsed_ms = started.elapsed().as_secs_f64() * 1000.0,
            "flow layout prepared"
        );
        #[cfg(not(feature = "std"))]
        tracing::debug!(
            sections = section_count,
            items = item_total,
            content_height = self.content_height,
            "flow layout prepared"
        );
    }

    fn run_custom_positioning(
        &mut self,
        on_scroll: bool,
        bounds: Rect,
        delegate: Option<&dyn FlowLayoutDelegate>,
    ) {
        if let Some(strategy) = self.positioning.as_mut() {
            strategy.position(CustomPass {
                on_scroll,
                bounds,
                primary: &self.cache,
                custom_rows: &mut self.custom_rows,
                custom_kinds: &mut self.custom_kinds,
                content_height: &mut self.content_height,
                delegate,
            });
        }
    }

    /// Requests a full recomputation on the next [`FlowLayout::prepare`].
    ///
    /// If a bounds change already cleared the caches for this cycle (see
    /// [`FlowLayout::should_invalidate_for_bounds_change`]) this call only
    /// consumes that marker. Returns the caches that were cleared.
    pub fn invalidate(&mut self) -> CacheSet {
        if core::mem::take(&mut self.skip_next_clear) {
            tracing::trace!("invalidation already handled by bounds change");
            return CacheSet::empty();
        }
        self.clear(CacheSet::all())
    }

    /// Reacts to the host's bounds becoming `new_bounds`.
    ///
    /// - A size change clears every cache so the next `prepare` recomputes.
    /// - A pure origin change (scroll) clears only the custom caches, and only
    ///   when [`FlowLayoutConfig::invalidate_custom_on_scroll`] is set.
    ///
    /// Returns `true` when the host should invalidate; the invalidation that
    /// follows will not clear anything a second time.
    pub fn should_invalidate_for_bounds_change(&mut self, new_bounds: Rect) -> bool {
        if new_bounds.size() != self.baseline.size() {
            self.clear(CacheSet::all());
            self.skip_next_clear = true;
            return true;
        }
        if new_bounds.origin() == self.baseline.origin() {
            return false;
        }
        self.baseline = new_bounds;
        if self.config.invalidate_custom_on_scroll {
            self.clear(CacheSet::CUSTOM);
            self.skip_next_clear = true;
            return true;
        }
        false
    }

    fn clear(&mut self, caches: CacheSet) -> CacheSet {
        if caches.contains(CacheSet::PRIMARY) {
            self.cache.clear();
            self.phase = LayoutPhase::Dirty;
        }
        if caches.contains(CacheSet::CUSTOM_ROWS) {
            self.custom_rows.clear();
        }
        if caches.contains(CacheSet::CUSTOM_KINDS) {
            self.custom_kinds.clear();
        }
        tracing::trace!(?caches, "flow layout caches cleared");
        caches
    }

    /// Attributes of the item at `index_path`; custom rows win over the flow pass.
    #[must_use]
    pub fn attributes_for_item(&self, index_path: IndexPath) -> Option<&LayoutAttributes> {
        self.custom_rows
            .get(&index_path)
            .or_else(|| self.cache.get(&index_path))
    }

    /// Attributes of the supplementary element of `kind` at `index_path`.
    #[must_use]
    pub fn attributes_for_supplementary(
        &self,
        kind: &str,
        index_path: IndexPath,
    ) -> Option<&LayoutAttributes> {
        self.custom_kinds.get(&KindKeyRef {
            kind,
            section: index_path.section,
            item: index_path.item,
        })
    }

    /// Attributes of the decoration element of `kind` at `index_path`.
    ///
    /// Decorations share the custom kinds cache with supplementary elements.
    #[must_use]
    pub fn attributes_for_decoration(
        &self,
        kind: &str,
        index_path: IndexPath,
    ) -> Option<&LayoutAttributes> {
        self.attributes_for_supplementary(kind, index_path)
    }

    /// Every element whose frame intersects `rect`, each reported once.
    ///
    /// Flow items replaced by a custom row are reported through the custom row only.
    /// No particular order is guaranteed. Overlap is strict: frames that only
    /// touch an edge of `rect`, including zero-height frames lying on one, are
    /// not reported.
    pub fn attributes_in_rect(&self, rect: Rect) -> impl Iterator<Item = &LayoutAttributes> + '_ {
        let flow = self
            .cache
            .iter()
            .filter(move |(path, attributes)| {
                !self.custom_rows.contains_key(*path) && intersects(attributes.frame, rect)
            })
            .map(|(_, attributes)| attributes);
        let rows = self
            .custom_rows
            .values()
            .filter(move |attributes| intersects(attributes.frame, rect));
        let kinds = self
            .custom_kinds
            .values()
            .filter(move |attributes| intersects(attributes.frame, rect));
        flow.chain(rows).chain(kinds)
    }

    /// Start attributes for an item inserted by a batch update, derived from the host's own.
    #[must_use]
    pub fn initial_attributes_for_appearing_item(
        &self,
        index_path: IndexPath,
        host: Option<&LayoutAttributes>,
    ) -> Option<LayoutAttributes> {
        self.appearance.item(index_path, host)
    }

    /// End attributes for an item removed by a batch update, derived from the host's own.
    #[must_use]
    pub fn final_attributes_for_disappearing_item(
        &self,
        index_path: IndexPath,
        host: Option<&LayoutAttributes>,
    ) -> Option<LayoutAttributes> {
        self.appearance.item(index_path, host)
    }

    /// Start attributes for an appearing supplementary element.
    #[must_use]
    pub fn initial_attributes_for_appearing_supplementary(
        &self,
        host: Option<&LayoutAttributes>,
    ) -> Option<LayoutAttributes> {
        self.appearance.element(host)
    }

    /// End attributes for a disappearing supplementary element.
    #[must_use]
    pub fn final_attributes_for_disappearing_supplementary(
        &self,
        host: Option<&LayoutAttributes>,
    ) -> Option<LayoutAttributes> {
        self.appearance.element(host)
    }

    /// Start attributes for an appearing decoration element.
    #[must_use]
    pub fn initial_attributes_for_appearing_decoration(
        &self,
        host: Option<&LayoutAttributes>,
    ) -> Option<LayoutAttributes> {
        self.appearance.element(host)
    }

    /// End attributes for a disappearing decoration element.
    #[must_use]
    pub fn final_attributes_for_disappearing_decoration(
        &self,
        host: Option<&LayoutAttributes>,
    ) -> Option<LayoutAttributes> {
        self.appearance.element(host)
    }
}
