//! Aspect-preserving viewport placement.
//!
//! `compute_letterbox` picks the largest viewport-shaped rectangle that fits
//! inside a physical framebuffer, centered, leaving pillarbox bars (left and
//! right) or letterbox bars (top and bottom) when the aspect ratios differ.
//! `to_logical` is the inverse mapping used for pointer input.

use super::{Rect, Vec2, Viewport};

/// Computes the centered active rectangle for `viewport` inside a framebuffer
/// of `fb_width` x `fb_height` physical pixels.
///
/// A degenerate framebuffer (either dimension <= 0) returns the framebuffer
/// itself; callers skip rendering for such sizes anyway.
pub fn compute_letterbox(fb_width: f32, fb_height: f32, viewport: Viewport) -> Rect {
    if fb_width <= 0.0 || fb_height <= 0.0 {
        return Rect::new(0.0, 0.0, fb_width, fb_height);
    }

    let fb_aspect = fb_width / fb_height;
    let vp_aspect = viewport.aspect();

    if fb_aspect > vp_aspect {
        // Framebuffer is wider than the viewport: full height, pillarbox bars.
        let h = fb_height;
        let w = h * vp_aspect;
        Rect::new((fb_width - w) * 0.5, 0.0, w, h)
    } else {
        // Full width, letterbox bars (or exact fit).
        let w = fb_width;
        let h = w / vp_aspect;
        Rect::new(0.0, (fb_height - h) * 0.5, w, h)
    }
}

/// Maps a physical input point back into logical viewport coordinates.
///
/// Points inside the bars clamp to the nearest logical edge. If the window or
/// the active rectangle is degenerate the point passes through unmodified
/// (division-by-zero guard).
pub fn to_logical(point: Vec2, active: Rect, window: (f32, f32), viewport: Viewport) -> Vec2 {
    if window.0 <= 0.0 || window.1 <= 0.0 || active.w <= 0.0 || active.h <= 0.0 {
        return point;
    }

    let x = (point.x - active.x) * (viewport.width / active.w);
    let y = (point.y - active.y) * (viewport.height / active.h);

    Vec2::new(x.clamp(0.0, viewport.width), y.clamp(0.0, viewport.height))
}

#[cfg(test)]
mod tests {
    use super::*;

    const VP: Viewport = Viewport::new(400.0, 300.0);

    // ── compute_letterbox ─────────────────────────────────────────────────

    #[test]
    fn matching_aspect_fills_framebuffer() {
        let r = compute_letterbox(800.0, 600.0, VP);
        assert_eq!(r, Rect::new(0.0, 0.0, 800.0, 600.0));
    }

    #[test]
    fn wide_framebuffer_pillarboxes() {
        let r = compute_letterbox(1200.0, 600.0, VP);
        assert_eq!(r, Rect::new(200.0, 0.0, 800.0, 600.0));
    }

    #[test]
    fn tall_framebuffer_letterboxes() {
        let r = compute_letterbox(800.0, 800.0, VP);
        assert_eq!(r, Rect::new(0.0, 100.0, 800.0, 600.0));
    }

    #[test]
    fn degenerate_framebuffer_passes_through() {
        assert_eq!(compute_letterbox(0.0, 600.0, VP), Rect::new(0.0, 0.0, 0.0, 600.0));
        assert_eq!(compute_letterbox(800.0, 0.0, VP), Rect::new(0.0, 0.0, 800.0, 0.0));
    }

    // ── to_logical ────────────────────────────────────────────────────────

    #[test]
    fn active_center_maps_to_viewport_center() {
        let active = compute_letterbox(1200.0, 600.0, VP);
        let p = to_logical(active.center(), active, (1200.0, 600.0), VP);
        assert_eq!(p, Vec2::new(200.0, 150.0));
    }

    #[test]
    fn pillarbox_bar_clamps_to_edge() {
        let active = compute_letterbox(1200.0, 600.0, VP);

        // Left bar: x < active.x maps to logical x = 0.
        let left = to_logical(Vec2::new(50.0, 300.0), active, (1200.0, 600.0), VP);
        assert_eq!(left.x, 0.0);

        // Right bar clamps to the far edge.
        let right = to_logical(Vec2::new(1150.0, 300.0), active, (1200.0, 600.0), VP);
        assert_eq!(right.x, VP.width);
    }

    #[test]
    fn letterbox_bar_clamps_to_edge() {
        let active = compute_letterbox(800.0, 800.0, VP);
        let top = to_logical(Vec2::new(400.0, 20.0), active, (800.0, 800.0), VP);
        assert_eq!(top.y, 0.0);
    }

    #[test]
    fn zero_window_passes_point_through() {
        let p = Vec2::new(123.0, 45.0);
        let active = Rect::new(0.0, 0.0, 800.0, 600.0);
        assert_eq!(to_logical(p, active, (0.0, 0.0), VP), p);
    }

    #[test]
    fn zero_active_rect_passes_point_through() {
        let p = Vec2::new(10.0, 10.0);
        assert_eq!(to_logical(p, Rect::default(), (800.0, 600.0), VP), p);
    }

    #[test]
    fn round_trip_through_active_center() {
        // Mapping the exact center of the active rectangle always yields the
        // logical center, whatever the bars look like.
        for (fw, fh) in [(800.0, 600.0), (1200.0, 600.0), (800.0, 800.0), (1920.0, 1080.0)] {
            let active = compute_letterbox(fw, fh, VP);
            let p = to_logical(active.center(), active, (fw, fh), VP);
            assert!((p.x - VP.width * 0.5).abs() < 1e-3);
            assert!((p.y - VP.height * 0.5).abs() < 1e-3);
        }
    }
}
