/// Viewport rectangle in physical pixels.
///
/// Recorded once by an application (usually from the framebuffer size at init)
/// and applied to every render pass it records.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Viewport {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    #[inline]
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }

    /// Viewport covering a whole `width` x `height` framebuffer.
    #[inline]
    pub fn from_size(width: u32, height: u32) -> Self {
        Self::new(0.0, 0.0, width as f32, height as f32)
    }

    #[inline]
    pub fn is_valid(self) -> bool {
        self.width > 0.0 && self.height > 0.0 && self.width.is_finite() && self.height.is_finite()
    }

    /// Returns the part of this viewport that lies inside a `width` x `height`
    /// target, or `None` if nothing does.
    ///
    /// wgpu rejects viewports that extend past the render target, so a viewport
    /// recorded for a larger framebuffer is cut down rather than rescaled.
    pub fn clamped_to(self, width: u32, height: u32) -> Option<Self> {
        let (tw, th) = (width as f32, height as f32);
        let x0 = self.x.clamp(0.0, tw);
        let y0 = self.y.clamp(0.0, th);
        let x1 = (self.x + self.width).clamp(0.0, tw);
        let y1 = (self.y + self.height).clamp(0.0, th);

        let clamped = Self::new(x0, y0, x1 - x0, y1 - y0);
        clamped.is_valid().then_some(clamped)
    }
}
