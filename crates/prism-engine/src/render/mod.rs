//! GPU rendering subsystem.
//!
//! Everything here is created once at application init and then only bound
//! and drawn: shader programs, static meshes and immutable uniform buffers.
//!
//! Convention:
//! - shader stages are WGSL, one file per stage
//! - uniforms live in bind group 0; the binding number is the slot the
//!   shader declares with `@binding(N)`

pub mod mesh;
pub mod program;
pub mod uniform;

pub use mesh::IndexedMesh;
pub use program::{
    LinkedProgram, ProgramError, ProgramReflection, ProgramSource, ShaderProgram, ShaderStage,
    UniformBinding, UniformMember,
};
pub use uniform::UniformBuffer;
