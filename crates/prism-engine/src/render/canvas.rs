use crate::coords::{Rect, Vec2};
use crate::paint::Color;

use super::TriangleBatch;

/// Segment count used to tessellate a circle of `radius` logical units.
///
/// Scales with radius so small dots stay cheap and large circles stay round;
/// clamped so pathological radii cannot explode the batch.
pub(crate) fn circle_segments(radius: f32) -> usize {
    ((radius.abs() * 0.6) as usize).clamp(12, 96)
}

/// Shape API handed to applications during `render`.
///
/// Every call lowers to `TriangleBatch::queue_triangle`; the canvas itself
/// owns no GPU state and is valid only for the duration of one frame.
pub struct Canvas<'a> {
    batch: &'a mut TriangleBatch,
}

impl<'a> Canvas<'a> {
    pub fn new(batch: &'a mut TriangleBatch) -> Self {
        Self { batch }
    }

    pub fn fill_triangle(&mut self, a: Vec2, b: Vec2, c: Vec2, color: Color) {
        self.batch.queue_triangle([a, b, c], [color; 3]);
    }

    /// Triangle with one color per corner.
    pub fn fill_triangle_shaded(&mut self, positions: [Vec2; 3], colors: [Color; 3]) {
        self.batch.queue_triangle(positions, colors);
    }

    pub fn fill_rect(&mut self, rect: Rect, color: Color) {
        self.fill_rect_gradient(rect, [color; 4]);
    }

    /// Rectangle with per-corner colors, ordered top-left, top-right,
    /// bottom-right, bottom-left.
    pub fn fill_rect_gradient(&mut self, rect: Rect, corners: [Color; 4]) {
        let tl = Vec2::new(rect.x, rect.y);
        let tr = Vec2::new(rect.x + rect.w, rect.y);
        let br = Vec2::new(rect.x + rect.w, rect.y + rect.h);
        let bl = Vec2::new(rect.x, rect.y + rect.h);

        self.batch
            .queue_triangle([tl, tr, br], [corners[0], corners[1], corners[2]]);
        self.batch
            .queue_triangle([tl, br, bl], [corners[0], corners[2], corners[3]]);
    }

    /// Filled circle as a triangle fan around the center.
    pub fn fill_circle(&mut self, center: Vec2, radius: f32, color: Color) {
        let segments = circle_segments(radius);
        let step = std::f32::consts::TAU / segments as f32;

        let mut prev = center + Vec2::new(radius, 0.0);
        for i in 1..=segments {
            let angle = step * i as f32;
            let next = center + Vec2::new(radius * angle.cos(), radius * angle.sin());
            self.batch.queue_triangle([center, prev, next], [color; 3]);
            prev = next;
        }
    }

    /// Line segment drawn as a quad of the given thickness.
    pub fn draw_line(&mut self, from: Vec2, to: Vec2, thickness: f32, color: Color) {
        let dir = (to - from).normalized();
        if dir == Vec2::zero() {
            return;
        }
        let half = dir.perp() * (thickness * 0.5);

        self.batch
            .queue_triangle([from + half, to + half, to - half], [color; 3]);
        self.batch
            .queue_triangle([from + half, to - half, from - half], [color; 3]);
    }

    /// Open polyline; each segment is drawn as an independent quad.
    pub fn draw_polyline(&mut self, points: &[Vec2], thickness: f32, color: Color) {
        for pair in points.windows(2) {
            self.draw_line(pair[0], pair[1], thickness, color);
        }
    }

    /// Filled convex polygon, fanned from the first vertex.
    ///
    /// Concave input is not rejected; it simply fans incorrectly, matching the
    /// "no validation, degenerate geometry is harmless" batch contract.
    pub fn fill_polygon(&mut self, points: &[Vec2], color: Color) {
        if points.len() < 3 {
            return;
        }
        for i in 1..points.len() - 1 {
            self.batch
                .queue_triangle([points[0], points[i], points[i + 1]], [color; 3]);
        }
    }

    /// Rectangle outline of the given thickness, drawn as four quads.
    pub fn stroke_rect(&mut self, rect: Rect, thickness: f32, color: Color) {
        let t = thickness;
        // Top, bottom, then the two side slices between them.
        self.fill_rect(Rect::new(rect.x, rect.y, rect.w, t), color);
        self.fill_rect(Rect::new(rect.x, rect.y + rect.h - t, rect.w, t), color);
        self.fill_rect(Rect::new(rect.x, rect.y + t, t, rect.h - 2.0 * t), color);
        self.fill_rect(
            Rect::new(rect.x + rect.w - t, rect.y + t, t, rect.h - 2.0 * t),
            color,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triangles(batch: &TriangleBatch) -> usize {
        batch.len() / 3
    }

    #[test]
    fn rect_lowers_to_two_triangles() {
        let mut batch = TriangleBatch::new();
        Canvas::new(&mut batch).fill_rect(Rect::new(0.0, 0.0, 10.0, 10.0), Color::WHITE);
        assert_eq!(triangles(&batch), 2);
    }

    #[test]
    fn circle_lowers_to_segment_count() {
        let mut batch = TriangleBatch::new();
        let radius = 50.0;
        Canvas::new(&mut batch).fill_circle(Vec2::new(0.0, 0.0), radius, Color::RED);
        assert_eq!(triangles(&batch), circle_segments(radius));
    }

    #[test]
    fn line_lowers_to_quad() {
        let mut batch = TriangleBatch::new();
        Canvas::new(&mut batch).draw_line(Vec2::zero(), Vec2::new(10.0, 0.0), 2.0, Color::WHITE);
        assert_eq!(triangles(&batch), 2);
    }

    #[test]
    fn zero_length_line_draws_nothing() {
        let mut batch = TriangleBatch::new();
        Canvas::new(&mut batch).draw_line(Vec2::zero(), Vec2::zero(), 2.0, Color::WHITE);
        assert!(batch.is_empty());
    }

    #[test]
    fn polyline_draws_one_quad_per_segment() {
        let mut batch = TriangleBatch::new();
        let pts = [
            Vec2::new(0.0, 0.0),
            Vec2::new(10.0, 0.0),
            Vec2::new(10.0, 10.0),
            Vec2::new(0.0, 10.0),
        ];
        Canvas::new(&mut batch).draw_polyline(&pts, 1.0, Color::WHITE);
        assert_eq!(triangles(&batch), 2 * 3);
    }

    #[test]
    fn polygon_fans_from_first_vertex() {
        let mut batch = TriangleBatch::new();
        let pts = [
            Vec2::new(0.0, 0.0),
            Vec2::new(10.0, 0.0),
            Vec2::new(12.0, 8.0),
            Vec2::new(5.0, 12.0),
            Vec2::new(-2.0, 6.0),
        ];
        Canvas::new(&mut batch).fill_polygon(&pts, Color::CYAN);
        assert_eq!(triangles(&batch), pts.len() - 2);
    }

    #[test]
    fn degenerate_polygon_draws_nothing() {
        let mut batch = TriangleBatch::new();
        Canvas::new(&mut batch).fill_polygon(&[Vec2::zero(), Vec2::new(1.0, 1.0)], Color::WHITE);
        assert!(batch.is_empty());
    }

    #[test]
    fn stroke_rect_lowers_to_four_quads() {
        let mut batch = TriangleBatch::new();
        Canvas::new(&mut batch).stroke_rect(Rect::new(0.0, 0.0, 20.0, 20.0), 2.0, Color::WHITE);
        assert_eq!(triangles(&batch), 8);
    }

    #[test]
    fn every_shape_keeps_multiple_of_three_invariant() {
        let mut batch = TriangleBatch::new();
        let mut canvas = Canvas::new(&mut batch);
        canvas.fill_triangle(Vec2::zero(), Vec2::new(1.0, 0.0), Vec2::new(0.0, 1.0), Color::RED);
        canvas.fill_rect(Rect::new(0.0, 0.0, 5.0, 5.0), Color::GREEN);
        canvas.fill_circle(Vec2::new(2.0, 2.0), 3.0, Color::BLUE);
        canvas.draw_line(Vec2::zero(), Vec2::new(4.0, 4.0), 1.0, Color::WHITE);
        assert_eq!(batch.len() % 3, 0);
    }
}
