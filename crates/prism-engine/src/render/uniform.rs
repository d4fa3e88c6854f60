use std::marker::PhantomData;

use bytemuck::Pod;
use wgpu::util::DeviceExt;

use super::program::{ProgramError, ProgramReflection};

/// Immutable uniform buffer holding one `T`, bound to a fixed slot.
///
/// The contents are written once at creation. `T` must already follow the
/// shader's uniform layout (explicit padding fields, 16-byte aligned vectors),
/// which [`UniformBuffer::check`] verifies against a linked program.
pub struct UniformBuffer<T: Pod> {
    buffer: wgpu::Buffer,
    binding: u32,
    _marker: PhantomData<T>,
}

impl<T: Pod> UniformBuffer<T> {
    /// Host-side block size in bytes.
    pub const SIZE: u64 = std::mem::size_of::<T>() as u64;

    pub fn new(device: &wgpu::Device, label: &str, binding: u32, value: &T) -> Self {
        let buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(label),
            contents: bytemuck::bytes_of(value),
            usage: wgpu::BufferUsages::UNIFORM,
        });

        log::debug!("uniform '{label}' at binding {binding}: {} bytes", Self::SIZE);

        Self {
            buffer,
            binding,
            _marker: PhantomData,
        }
    }

    /// Checks this buffer against the program's uniform at
    /// `@group(group) @binding(self.binding)`.
    pub fn check(&self, reflection: &ProgramReflection, group: u32) -> Result<(), ProgramError> {
        check_binding(reflection, group, self.binding, Self::SIZE)
    }

    /// Bind group entry for this buffer's slot.
    pub fn entry(&self) -> wgpu::BindGroupEntry<'_> {
        wgpu::BindGroupEntry {
            binding: self.binding,
            resource: self.buffer.as_entire_binding(),
        }
    }
}

/// Compares a host block size with the shader's uniform at the given slot.
pub(crate) fn check_binding(
    reflection: &ProgramReflection,
    group: u32,
    binding: u32,
    host: u64,
) -> Result<(), ProgramError> {
    let uniform = reflection
        .uniform(group, binding)
        .ok_or(ProgramError::UnknownBinding { group, binding })?;

    if uniform.size != host {
        return Err(ProgramError::BindingSizeMismatch {
            group,
            binding,
            shader: uniform.size,
            host,
        });
    }
    Ok(())
}
