/// Straight-alpha RGBA color with `f32` channels in `[0, 1]`.
///
/// Values are passed to the GPU unchanged; no sRGB conversion happens here.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    #[inline]
    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    #[inline]
    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self::rgba(r, g, b, 1.0)
    }

    /// Converts to the wgpu clear color representation.
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

impl From<Color> for wgpu::Color {
    fn from(c: Color) -> Self {
        c.to_wgpu()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rgb_is_opaque() {
        assert_eq!(Color::rgb(0.2, 0.3, 0.3).a, 1.0);
    }

    #[test]
    fn converts_to_wgpu() {
        let w: wgpu::Color = Color::rgba(0.25, 0.5, 0.75, 1.0).into();
        assert_eq!(w.r, 0.25);
        assert_eq!(w.g, 0.5);
        assert_eq!(w.b, 0.75);
        assert_eq!(w.a, 1.0);
    }
}
