// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use kurbo::Rect;

/// Strict overlap test: rectangles that only share an edge do not intersect.
///
/// A degenerate frame, such as an item the delegate sized to height 0, is
/// reported only when it lies strictly inside `b` on that axis. One sitting on
/// an edge of `b` is never reported.
pub(crate) fn intersects(a: Rect, b: Rect) -> bool {
    a.x0 < b.x1 && b.x0 < a.x1 && a.y0 < b.y1 && b.y0 < a.y1
}

#[cfg(test)]
mod tests {
    use kurbo::Rect;

    use super::intersects;

    #[test]
    fn touching_edges_do_not_intersect() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert!(!intersects(a, Rect::new(10.0, 0.0, 20.0, 10.0)));
        assert!(!intersects(a, Rect::new(0.0, 10.0, 10.0, 20.0)));
        assert!(intersects(a, Rect::new(9.5, 9.5, 20.0, 20.0)));
        assert!(intersects(a, Rect::new(2.0, 2.0, 3.0, 3.0)));
    }

    #[test]
    fn zero_height_frames_count_only_strictly_inside() {
        let query = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert!(intersects(Rect::new(0.0, 5.0, 10.0, 5.0), query));
        assert!(!intersects(Rect::new(0.0, 0.0, 10.0, 0.0), query));
        assert!(!intersects(Rect::new(0.0, 10.0, 10.0, 10.0), query));
    }
}
