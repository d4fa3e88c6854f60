//! Framebuffer-space geometry.
//!
//! Everything here is in physical pixels with the origin at the top-left of
//! the render target, which is what `wgpu::RenderPass::set_viewport` expects.

mod viewport;

pub use viewport::Viewport;
