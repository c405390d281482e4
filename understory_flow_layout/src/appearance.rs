// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Opacity overrides for elements entering or leaving during batch updates.

use smallvec::SmallVec;

use crate::{IndexPath, LayoutAttributes};

/// Rewrites the start and end attributes a host computes for animated elements.
///
/// When interception is on:
/// - items become opaque if appearance animations are disallowed globally or
///   for their index path, and fully transparent otherwise;
/// - supplementary and decoration elements always become opaque.
///
/// When interception is off the host's attributes pass through unchanged.
#[derive(Clone, Debug)]
pub struct AppearanceInterception {
    /// Whether attributes are rewritten at all.
    pub intercept: bool,
    /// Keep every item opaque while it appears or disappears.
    pub disallow_appearance_animation: bool,
    suppressed: SmallVec<[IndexPath; 4]>,
}

impl Default for AppearanceInterception {
    fn default() -> Self {
        Self {
            intercept: true,
            disallow_appearance_animation: true,
            suppressed: SmallVec::new(),
        }
    }
}

impl AppearanceInterception {
    /// Keeps the item at `index_path` opaque during appearance animations.
    pub fn suppress(&mut self, index_path: IndexPath) {
        if !self.suppressed.contains(&index_path) {
            self.suppressed.push(index_path);
        }
    }

    /// Replaces the set of suppressed index paths.
    pub fn set_suppressed(&mut self, paths: impl IntoIterator<Item = IndexPath>) {
        self.suppressed.clear();
        for path in paths {
            self.suppress(path);
        }
    }

    /// Forgets every suppressed index path.
    pub fn clear_suppressed(&mut self) {
        self.suppressed.clear();
    }

    /// Returns `true` if `index_path` is suppressed.
    #[must_use]
    pub fn is_suppressed(&self, index_path: IndexPath) -> bool {
        self.suppressed.contains(&index_path)
    }

    /// Rewrites attributes for an appearing or disappearing item.
    #[must_use]
    pub fn item(
        &self,
        index_path: IndexPath,
        host: Option<&LayoutAttributes>,
    ) -> Option<LayoutAttributes> {
        let host = host?;
        if !self.intercept {
            return Some(host.clone());
        }
        let opaque = self.disallow_appearance_animation || self.is_suppressed(index_path);
        Some(host.with_alpha(if opaque { 1.0 } else { 0.0 }))
    }

    /// Rewrites attributes for an appearing or disappearing supplementary or decoration element.
    #[must_use]
    pub fn element(&self, host: Option<&LayoutAttributes>) -> Option<LayoutAttributes> {
        let host = host?;
        if !self.intercept {
            return Some(host.clone());
        }
        Some(host.with_alpha(1.0))
    }
}

#[cfg(test)]
mod tests {
    use kurbo::Rect;

    use super::AppearanceInterception;
    use crate::{IndexPath, LayoutAttributes};

    fn faded(path: IndexPath) -> LayoutAttributes {
        LayoutAttributes::cell(path, Rect::new(0.0, 0.0, 10.0, 10.0)).with_alpha(0.0)
    }

    #[test]
    fn default_keeps_items_opaque() {
        let interception = AppearanceInterception::default();
        let path = IndexPath::new(0, 1);
        let attrs = interception.item(path, Some(&faded(path))).unwrap();
        assert_eq!(attrs.alpha, 1.0);
    }

    #[test]
    fn items_fade_unless_suppressed() {
        let mut interception = AppearanceInterception {
            disallow_appearance_animation: false,
            ..AppearanceInterception::default()
        };
        let kept = IndexPath::new(0, 0);
        let faded_path = IndexPath::new(0, 1);
        interception.suppress(kept);
        interception.suppress(kept);

        let base = faded(kept).with_alpha(0.5);
        assert_eq!(interception.item(kept, Some(&base)).unwrap().alpha, 1.0);
        assert_eq!(
            interception.item(faded_path, Some(&base)).unwrap().alpha,
            0.0
        );

        interception.clear_suppressed();
        assert!(!interception.is_suppressed(kept));
    }

    #[test]
    fn supplementary_elements_are_forced_opaque() {
        let interception = AppearanceInterception {
            disallow_appearance_animation: false,
            ..AppearanceInterception::default()
        };
        let header = LayoutAttributes::supplementary(
            "header",
            IndexPath::new(0, 0),
            Rect::new(0.0, 0.0, 100.0, 20.0),
        )
        .with_alpha(0.0);
        assert_eq!(interception.element(Some(&header)).unwrap().alpha, 1.0);
    }

    #[test]
    fn disabled_interception_passes_host_attributes_through() {
        let interception = AppearanceInterception {
            intercept: false,
            ..AppearanceInterception::default()
        };
        let path = IndexPath::new(1, 2);
        let base = faded(path);
        assert_eq!(interception.item(path, Some(&base)), Some(base.clone()));
        assert_eq!(interception.element(Some(&base)), Some(base));
        assert_eq!(interception.item(path, None), None);
    }
}
