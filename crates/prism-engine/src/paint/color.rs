/// Straight-alpha RGBA color, components nominally in `[0, 1]`.
///
/// Values are passed to the GPU untouched: whether they are interpreted as
/// linear or sRGB depends on the surface format the application asked for.
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

    /// Opaque color.
    #[inline]
    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self::rgba(r, g, b, 1.0)
    }

    /// Opaque gray with all three channels set to `v`.
    #[inline]
    pub const fn gray(v: f32) -> Self {
        Self::rgb(v, v, v)
    }

    /// RGB channels as laid out in a `vec3<f32>` uniform member.
    #[inline]
    pub const fn to_rgb_array(self) -> [f32; 3] {
        [self.r, self.g, self.b]
    }

    /// Converts to the `f64` color wgpu uses for clear operations.
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
