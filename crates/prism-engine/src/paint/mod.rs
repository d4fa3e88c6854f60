//! Color values handed to the GPU (clear colors, uniform colors).

pub mod color;

pub use color::Color;
