//! Host-side copies of the two uniform blocks in `shaders/`.
//!
//! Both are written once at init and never touched again.

use bytemuck::{Pod, Zeroable};
use glam::{Mat2, Vec2};

use prism_engine::paint::Color;

/// Bind group holding both blocks.
pub const UNIFORM_GROUP: u32 = 0;
/// `Shading` slot, read by the fragment stage.
pub const SHADING_BINDING: u32 = 0;
/// `Transform` slot, read by the vertex stage.
pub const TRANSFORM_BINDING: u32 = 1;

/// Color-mixing parameters: `strength` pulls the vertex color toward
/// `mix_color` (0 keeps the vertex color, 1 replaces it).
///
/// Layout (32 bytes): strength @0, mix_color @16.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct ShadingUniform {
    pub strength: f32,
    pub _pad0: [f32; 3], // vec3 is 16-byte aligned
    pub mix_color: [f32; 3],
    pub _pad1: f32, // struct size rounds up to 16
}

impl ShadingUniform {
    pub fn new(strength: f32, mix_color: Color) -> Self {
        Self {
            strength,
            _pad0: [0.0; 3],
            mix_color: mix_color.to_rgb_array(),
            _pad1: 0.0,
        }
    }
}

/// 2D affine transform applied as `rotation * (scale * p) + translation`.
///
/// Layout (64 bytes), every vector on a 16-byte boundary:
/// scale @0, translation @16, rotation column 0 @32, rotation column 1 @48.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct TransformUniform {
    pub scale: [f32; 2],
    pub _pad0: [f32; 2],
    pub translation: [f32; 2],
    pub _pad1: [f32; 2],
    pub rotation_x: [f32; 2],
    pub _pad2: [f32; 2],
    pub rotation_y: [f32; 2],
    pub _pad3: [f32; 2],
}

impl TransformUniform {
    pub fn new(scale: Vec2, translation: Vec2, rotation: Mat2) -> Self {
        Self {
            scale: scale.to_array(),
            _pad0: [0.0; 2],
            translation: translation.to_array(),
            _pad1: [0.0; 2],
            rotation_x: rotation.x_axis.to_array(),
            _pad2: [0.0; 2],
            rotation_y: rotation.y_axis.to_array(),
            _pad3: [0.0; 2],
        }
    }

    /// Counter-clockwise rotation by `angle` radians.
    pub fn rotated(scale: Vec2, translation: Vec2, angle: f32) -> Self {
        Self::new(scale, translation, Mat2::from_angle(angle))
    }

    /// Applies the transform to a point, as the vertex shader does.
    #[cfg(test)]
    pub fn apply(&self, p: Vec2) -> Vec2 {
        let rotation = Mat2::from_cols(self.rotation_x.into(), self.rotation_y.into());
        rotation * (Vec2::from(self.scale) * p) + Vec2::from(self.translation)
    }
}

const _: () = assert!(std::mem::size_of::<ShadingUniform>() == 32);
const _: () = assert!(std::mem::size_of::<TransformUniform>() == 64);

#[cfg(test)]
mod tests {
    use std::f32::consts::FRAC_PI_6;
    use std::mem::offset_of;

    use prism_engine::render::{ProgramSource, ShaderStage, UniformBinding};

    use super::*;
    use crate::config::AppConfig;

    fn approx(a: Vec2, b: Vec2) -> bool {
        (a - b).length() < 1e-6
    }

    fn shipped_uniform(binding: u32) -> UniformBinding {
        let cfg = AppConfig::default();
        let linked = ProgramSource::load(&[
            (ShaderStage::Vertex, &cfg.vertex_shader),
            (ShaderStage::Fragment, &cfg.fragment_shader),
        ])
        .unwrap()
        .link()
        .unwrap();
        linked
            .reflection()
            .uniform(UNIFORM_GROUP, binding)
            .unwrap()
            .clone()
    }

    // ── shading ───────────────────────────────────────────────────────────

    #[test]
    fn shading_layout() {
        assert_eq!(offset_of!(ShadingUniform, strength), 0);
        assert_eq!(offset_of!(ShadingUniform, mix_color), 16);
    }

    #[test]
    fn shading_padding_is_zero() {
        let s = ShadingUniform::new(0.5, Color::rgb(0.0, 0.0, 1.0));
        let floats: &[f32] = bytemuck::cast_slice(bytemuck::bytes_of(&s));
        assert_eq!(floats, &[0.5, 0.0, 0.0, 0.0, 0.0, 0.0, 1.0, 0.0]);
    }

    #[test]
    fn shading_matches_shader_block() {
        let u = shipped_uniform(SHADING_BINDING);
        assert_eq!(u.size, std::mem::size_of::<ShadingUniform>() as u64);
        assert_eq!(u.member_offset("strength"), Some(offset_of!(ShadingUniform, strength) as u32));
        assert_eq!(u.member_offset("mix_color"), Some(offset_of!(ShadingUniform, mix_color) as u32));
        assert_eq!(u.visibility, wgpu::ShaderStages::FRAGMENT);
    }

    // ── transform ─────────────────────────────────────────────────────────

    #[test]
    fn transform_layout() {
        assert_eq!(offset_of!(TransformUniform, scale), 0);
        assert_eq!(offset_of!(TransformUniform, translation), 16);
        assert_eq!(offset_of!(TransformUniform, rotation_x), 32);
        assert_eq!(offset_of!(TransformUniform, rotation_y), 48);
    }

    #[test]
    fn transform_matches_shader_block() {
        let u = shipped_uniform(TRANSFORM_BINDING);
        assert_eq!(u.size, std::mem::size_of::<TransformUniform>() as u64);
        let offsets: Vec<u32> = u.members.iter().map(|m| m.offset).collect();
        assert_eq!(
            offsets,
            vec![
                offset_of!(TransformUniform, scale) as u32,
                offset_of!(TransformUniform, translation) as u32,
                offset_of!(TransformUniform, rotation_x) as u32,
                offset_of!(TransformUniform, rotation_y) as u32,
            ]
        );
        assert_eq!(u.visibility, wgpu::ShaderStages::VERTEX);
    }

    #[test]
    fn rotation_columns() {
        let t = TransformUniform::rotated(Vec2::splat(0.5), Vec2::new(0.0, -0.25), FRAC_PI_6);
        let (c, s) = (FRAC_PI_6.cos(), FRAC_PI_6.sin());
        assert!(approx(t.rotation_x.into(), Vec2::new(c, s)));
        assert!(approx(t.rotation_y.into(), Vec2::new(-s, c)));
        assert_eq!(t._pad0, [0.0; 2]);
        assert_eq!(t._pad3, [0.0; 2]);
    }

    #[test]
    fn apply_scales_then_rotates_then_translates() {
        let t = TransformUniform::rotated(Vec2::splat(2.0), Vec2::new(1.0, 0.0), std::f32::consts::FRAC_PI_2);
        // (1, 0) -> scaled (2, 0) -> rotated (0, 2) -> translated (1, 2)
        assert!(approx(t.apply(Vec2::X), Vec2::new(1.0, 2.0)));
    }

    #[test]
    fn identity_transform_keeps_points() {
        let t = TransformUniform::new(Vec2::ONE, Vec2::ZERO, Mat2::IDENTITY);
        assert!(approx(t.apply(Vec2::new(0.3, -0.7)), Vec2::new(0.3, -0.7)));
    }
}
