/// Fixed logical drawing space, in logical units.
///
/// All shape-API coordinates are expressed in this space. A window resize
/// changes the physical framebuffer, never the viewport; the letterbox mapper
/// decides where the viewport lands inside the framebuffer.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    #[inline]
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    #[inline]
    pub fn aspect(self) -> f32 {
        self.width / self.height
    }

    #[inline]
    pub fn is_valid(self) -> bool {
        self.width > 0.0 && self.height > 0.0 && self.width.is_finite() && self.height.is_finite()
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(400.0, 300.0)
    }
}
