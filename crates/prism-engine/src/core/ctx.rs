use winit::window::{Window, WindowId};

use crate::device::{Gpu, SurfaceErrorAction};
use crate::paint::Color;

use super::app::AppControl;

/// Per-window handles and immutable window metadata.
pub struct WindowCtx<'a> {
    pub id:     WindowId,
    pub window: &'a Window,
}

impl<'a> WindowCtx<'a> {
    /// Returns the logical window size as `(width, height)` in logical pixels.
    pub fn logical_size(&self) -> (f32, f32) {
        let phys  = self.window.inner_size();
        let scale = self.window.scale_factor();
        let logi: winit::dpi::LogicalSize<f64> = phys.to_logical(scale);
        (logi.width as f32, logi.height as f32)
    }
}

/// Context passed once to `core::App::init`.
///
/// Lifetimes:
/// - `'a` is the duration of the callback invocation
/// - `'w` is the window-borrow lifetime carried by `Gpu<'w>`
pub struct InitCtx<'a, 'w> {
    pub window: WindowCtx<'a>,
    pub gpu:    &'a Gpu<'w>,
}

impl<'a, 'w> InitCtx<'a, 'w> {
    #[inline]
    pub fn device(&self) -> &wgpu::Device {
        self.gpu.device()
    }

    #[inline]
    pub fn surface_format(&self) -> wgpu::TextureFormat {
        self.gpu.surface_format()
    }

    /// Returns the drawable size as `(width, height)` in physical pixels.
    pub fn framebuffer_size(&self) -> (u32, u32) {
        let size = self.gpu.size();
        (size.width, size.height)
    }
}

/// Per-frame context passed to `core::App::on_frame`.
pub struct FrameCtx<'a, 'w> {
    pub window: WindowCtx<'a>,
    pub gpu:    &'a mut Gpu<'w>,
}

impl<'a, 'w> FrameCtx<'a, 'w> {
    /// Returns the drawable size as `(width, height)` in physical pixels.
    pub fn framebuffer_size(&self) -> (u32, u32) {
        let size = self.gpu.size();
        (size.width, size.height)
    }

    /// Acquires the next surface frame, opens a single pass that clears to
    /// `clear`, calls `draw` with that pass, then submits and presents.
    ///
    /// Surface errors are handled here. Only a fatal one turns into
    /// [`AppControl::Exit`]; the others skip the frame.
    pub fn render<F>(&mut self, clear: Color, draw: F) -> AppControl
    where
        F: FnOnce(&mut wgpu::RenderPass<'_>),
    {
        let mut frame = match self.gpu.begin_frame() {
            Ok(f) => f,
            Err(err) => {
                let action = self.gpu.handle_surface_error(err);
                if action == SurfaceErrorAction::Fatal {
                    log::error!("surface error is not recoverable; exiting");
                    return AppControl::Exit;
                }
                log::warn!("skipping frame: {action:?}");
                return AppControl::Continue;
            }
        };

        // The pass borrows frame.encoder; dropped before submit() takes frame.
        {
            let mut rpass = frame.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("prism frame pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view:           &frame.view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load:  wgpu::LoadOp::Clear(clear.to_wgpu()),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                timestamp_writes:         None,
                occlusion_query_set:      None,
                multiview_mask:           None,
            });

            draw(&mut rpass);
        }

        self.window.window.pre_present_notify();
        self.gpu.submit(frame);

        AppControl::Continue
    }
}
