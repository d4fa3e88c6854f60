//! Prism engine crate.
//!
//! This crate owns the platform + GPU runtime pieces used by the demo
//! applications: the window loop, the wgpu device, shader programs and the
//! small set of static GPU resources a demo uploads once at startup.

pub mod device;
pub mod window;
pub mod core;

pub mod logging;
pub mod coords;
pub mod render;
pub mod paint;
