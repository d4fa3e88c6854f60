use anyhow::Result;
use winit::event::WindowEvent;
use winit::window::WindowId;

use super::ctx::{FrameCtx, InitCtx};

/// Control directive returned by app callbacks.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum AppControl {
    Continue,
    Exit,
}

/// Application contract implemented by the demos.
pub trait App {
    /// Called exactly once, after the window and GPU device exist and before
    /// the first frame.
    ///
    /// An error here is fatal: the runtime logs it and stops the event loop.
    fn init(&mut self, ctx: &mut InitCtx<'_, '_>) -> Result<()>;

    /// Called for window events.
    fn on_window_event(&mut self, window_id: WindowId, event: &WindowEvent) -> AppControl {
        let _ = (window_id, event);
        AppControl::Continue
    }

    /// Called once per rendered frame.
    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl;
}
