// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Snapping logical coordinates onto device pixel boundaries.

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;

/// Rounds logical coordinates onto the device pixel grid for a given scale.
///
/// All three operations compute `op(value * scale) / scale`, so a snapped
/// coordinate always lands on a whole device pixel. The layout engine snaps
/// every item origin and width through this type so that neighbouring items
/// never leave a hairline gap or overlap.
///
/// ```rust
/// use understory_flow_layout::PixelSnapper;
///
/// let snapper = PixelSnapper::new(2.0);
/// assert_eq!(snapper.round(10.3), 10.5);
/// assert_eq!(snapper.floor(10.3), 10.0);
/// assert_eq!(snapper.ceil(10.3), 10.5);
/// assert_eq!(snapper.pixel_size(), 0.5);
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PixelSnapper {
    scale: f64,
}

impl PixelSnapper {
    /// Scale used when none is configured.
    pub const IDENTITY: Self = Self { scale: 1.0 };

    /// Creates a snapper for `scale` device pixels per logical unit.
    ///
    /// Scales that are not finite and positive are replaced with `1.0`.
    #[must_use]
    pub fn new(scale: f64) -> Self {
        debug_assert!(
            scale.is_finite() && scale > 0.0,
            "PixelSnapper scale must be finite and positive; got {scale:?}"
        );
        if scale.is_finite() && scale > 0.0 {
            Self { scale }
        } else {
            Self::IDENTITY
        }
    }

    /// Device pixels per logical unit.
    #[must_use]
    pub const fn scale(&self) -> f64 {
        self.scale
    }

    /// Size of one device pixel in logical units.
    #[must_use]
    pub fn pixel_size(&self) -> f64 {
        1.0 / self.scale
    }

    /// Rounds `value` to the nearest device pixel.
    #[must_use]
    pub fn round(&self, value: f64) -> f64 {
        (value * self.scale).round() / self.scale
    }

    /// Rounds `value` down to a device pixel.
    #[must_use]
    pub fn floor(&self, value: f64) -> f64 {
        (value * self.scale).floor() / self.scale
    }

    /// Rounds `value` up to a device pixel.
    #[must_use]
    pub fn ceil(&self, value: f64) -> f64 {
        (value * self.scale).ceil() / self.scale
    }
}

impl Default for PixelSnapper {
    fn default() -> Self {
        Self::IDENTITY
    }
}

#[cfg(test)]
mod tests {
    use super::PixelSnapper;

    #[test]
    fn snaps_to_retina_grid() {
        let snapper = PixelSnapper::new(3.0);
        assert_eq!(snapper.round(1.0 / 3.0 + 0.1), 1.0 / 3.0);
        assert_eq!(snapper.floor(0.9), 2.0 / 3.0);
        assert_eq!(snapper.ceil(0.1), 1.0 / 3.0);
    }

    #[test]
    fn identity_scale_matches_plain_rounding() {
        let snapper = PixelSnapper::default();
        assert_eq!(snapper.round(2.5), 3.0);
        assert_eq!(snapper.floor(2.7), 2.0);
        assert_eq!(snapper.ceil(2.1), 3.0);
        assert_eq!(snapper.pixel_size(), 1.0);
    }

    #[test]
    fn negative_values_snap_symmetrically() {
        let snapper = PixelSnapper::new(2.0);
        assert_eq!(snapper.floor(-0.2), -0.5);
        assert_eq!(snapper.ceil(-0.2), 0.0);
    }

    #[test]
    fn snapping_is_idempotent() {
        let snapper = PixelSnapper::new(2.0);
        let once = snapper.round(17.37);
        assert_eq!(snapper.round(once), once);
    }
}
