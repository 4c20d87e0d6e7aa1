/// Straight-alpha normalized RGBA color.
///
/// Components are nominally in [0, 1] but are never clamped: callers may push
/// values outside the range intentionally (e.g. for additive blending
/// experiments), and the GPU pipeline consumes whatever it is given.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0.0, 0.0, 0.0);
    pub const WHITE: Color = Color::rgb(1.0, 1.0, 1.0);
    pub const RED: Color = Color::rgb(1.0, 0.0, 0.0);
    pub const GREEN: Color = Color::rgb(0.0, 1.0, 0.0);
    pub const BLUE: Color = Color::rgb(0.0, 0.0, 1.0);
    pub const YELLOW: Color = Color::rgb(1.0, 1.0, 0.0);
    pub const CYAN: Color = Color::rgb(0.0, 1.0, 1.0);
    pub const MAGENTA: Color = Color::rgb(1.0, 0.0, 1.0);
    pub const DARK_GRAY: Color = Color::rgb(0.15, 0.15, 0.15);
    pub const LIGHT_GRAY: Color = Color::rgb(0.75, 0.75, 0.75);

    #[inline]
    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    #[inline]
    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Creates a color from byte components (`0`–`255`), fully opaque.
    #[inline]
    pub fn from_u8(r: u8, g: u8, b: u8) -> Self {
        Self::rgb(r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0)
    }

    /// Creates a color from a `0xRRGGBB` literal, fully opaque.
    #[inline]
    pub fn from_hex(hex: u32) -> Self {
        Self::from_u8((hex >> 16) as u8, (hex >> 8) as u8, hex as u8)
    }

    /// Conversion for wgpu clear operations (f64 components).
    #[inline]
    pub fn to_wgpu(self) -> wgpu::Color {
        wgpu::Color {
            r: self.r as f64,
            g: self.g as f64,
            b: self.b as f64,
            a: self.a as f64,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_hex_decodes_channels() {
        let c = Color::from_hex(0x336699);
        assert!((c.r - 0x33 as f32 / 255.0).abs() < 1e-6);
        assert!((c.g - 0x66 as f32 / 255.0).abs() < 1e-6);
        assert!((c.b - 0x99 as f32 / 255.0).abs() < 1e-6);
        assert_eq!(c.a, 1.0);
    }

    #[test]
    fn from_u8_normalizes() {
        let c = Color::from_u8(255, 0, 127);
        assert_eq!(c.r, 1.0);
        assert_eq!(c.g, 0.0);
        assert!((c.b - 127.0 / 255.0).abs() < 1e-6);
    }

    #[test]
    fn out_of_range_values_are_not_clamped() {
        let c = Color::rgba(2.0, -0.5, 0.0, 1.5);
        assert_eq!(c.r, 2.0);
        assert_eq!(c.g, -0.5);
        assert_eq!(c.a, 1.5);
    }
}
