use super::Vec2;

/// Axis-aligned rectangle in a top-left-origin pixel space.
///
/// Used primarily for the letterboxed active rectangle inside a physical
/// framebuffer, so components are plain f32 rather than `Vec2` pairs.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    #[inline]
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    #[inline]
    pub fn center(self) -> Vec2 {
        Vec2::new(self.x + self.w * 0.5, self.y + self.h * 0.5)
    }

    #[inline]
    pub fn is_empty(self) -> bool {
        self.w <= 0.0 || self.h <= 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn center_of_offset_rect() {
        let r = Rect::new(200.0, 0.0, 800.0, 600.0);
        assert_eq!(r.center(), Vec2::new(600.0, 300.0));
    }

    #[test]
    fn is_empty_zero_dimension() {
        assert!(Rect::new(0.0, 0.0, 0.0, 5.0).is_empty());
        assert!(!Rect::new(0.0, 0.0, 1.0, 1.0).is_empty());
    }
}
