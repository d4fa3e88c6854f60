use std::num::NonZeroU64;

use naga::{AddressSpace, Binding, Handle, Module, Type, TypeInner};

use super::{ProgramError, ShaderStage};

/// Named member of a uniform block and its byte offset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UniformMember {
    pub name: String,
    pub offset: u32,
}

/// A `var<uniform>` declared by one or both stages of a program.
#[derive(Debug, Clone, PartialEq)]
pub struct UniformBinding {
    pub group: u32,
    pub binding: u32,
    /// Variable name in the shader.
    pub name: Option<String>,
    /// Block size in bytes, including trailing padding.
    pub size: u64,
    /// Struct members in declaration order; empty for non-struct uniforms.
    pub members: Vec<UniformMember>,
    pub visibility: wgpu::ShaderStages,
}

impl UniformBinding {
    pub fn member_offset(&self, name: &str) -> Option<u32> {
        self.members.iter().find(|m| m.name == name).map(|m| m.offset)
    }
}

/// Uniform interface of a linked program, sorted by `(group, binding)`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProgramReflection {
    uniforms: Vec<UniformBinding>,
}

impl ProgramReflection {
    pub fn uniforms(&self) -> &[UniformBinding] {
        &self.uniforms
    }

    pub fn uniform(&self, group: u32, binding: u32) -> Option<&UniformBinding> {
        self.uniforms
            .iter()
            .find(|u| u.group == group && u.binding == binding)
    }

    /// Bind group layout entries for every uniform in `group`.
    pub fn bind_group_layout_entries(&self, group: u32) -> Vec<wgpu::BindGroupLayoutEntry> {
        self.uniforms
            .iter()
            .filter(|u| u.group == group)
            .map(|u| wgpu::BindGroupLayoutEntry {
                binding: u.binding,
                visibility: u.visibility,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: NonZeroU64::new(u.size),
                },
                count: None,
            })
            .collect()
    }

    /// Merges the uniforms of one stage into the reflection.
    ///
    /// A slot declared by a previous stage must have the same size; its
    /// visibility is widened to include `stage`.
    pub(super) fn merge_stage(
        &mut self,
        stage: ShaderStage,
        stage_uniforms: Vec<UniformBinding>,
    ) -> Result<(), ProgramError> {
        for u in stage_uniforms {
            match self
                .uniforms
                .iter_mut()
                .find(|e| e.group == u.group && e.binding == u.binding)
            {
                Some(existing) if existing.size != u.size => {
                    let (vertex, fragment) = match stage {
                        ShaderStage::Fragment => (existing.size, u.size),
                        ShaderStage::Vertex => (u.size, existing.size),
                    };
                    return Err(ProgramError::BindingConflict {
                        group: u.group,
                        binding: u.binding,
                        vertex,
                        fragment,
                    });
                }
                Some(existing) => existing.visibility |= stage.to_wgpu(),
                None => self.uniforms.push(u),
            }
        }

        self.uniforms.sort_by_key(|u| (u.group, u.binding));
        Ok(())
    }
}

/// Collects the uniform-space globals of `module`, visible to `stage`.
pub(super) fn uniforms_of(module: &Module, stage: ShaderStage) -> Vec<UniformBinding> {
    module
        .global_variables
        .iter()
        .filter(|(_, var)| var.space == AddressSpace::Uniform)
        .filter_map(|(_, var)| {
            let res = var.binding.as_ref()?;
            let (size, members) = match &module.types[var.ty].inner {
                TypeInner::Struct { members, span } => (
                    *span as u64,
                    members
                        .iter()
                        .map(|m| UniformMember {
                            name: m.name.clone().unwrap_or_default(),
                            offset: m.offset,
                        })
                        .collect(),
                ),
                other => (other.size(module.to_ctx()) as u64, Vec::new()),
            };

            Some(UniformBinding {
                group: res.group,
                binding: res.binding,
                name: var.name.clone(),
                size,
                members,
                visibility: stage.to_wgpu(),
            })
        })
        .collect()
}

/// A user-defined inter-stage value: `@location(N)` and its type.
pub(super) type Varying = (u32, TypeInner);

/// Varyings written by a vertex entry point's result.
pub(super) fn vertex_outputs(module: &Module, function: &naga::Function) -> Vec<Varying> {
    let mut out = Vec::new();
    if let Some(result) = function.result.as_ref() {
        collect_locations(module, result.ty, result.binding.as_ref(), &mut out);
    }
    out
}

/// Varyings read by a fragment entry point's arguments.
pub(super) fn fragment_inputs(module: &Module, function: &naga::Function) -> Vec<Varying> {
    let mut out = Vec::new();
    for arg in &function.arguments {
        collect_locations(module, arg.ty, arg.binding.as_ref(), &mut out);
    }
    out
}

fn collect_locations(
    module: &Module,
    ty: Handle<Type>,
    binding: Option<&Binding>,
    out: &mut Vec<Varying>,
) {
    match binding {
        Some(Binding::Location { location, .. }) => {
            out.push((*location, module.types[ty].inner.clone()));
        }
        Some(_) => {}
        None => {
            if let TypeInner::Struct { members, .. } = &module.types[ty].inner {
                for m in members {
                    collect_locations(module, m.ty, m.binding.as_ref(), out);
                }
            }
        }
    }
}

/// Checks that every fragment input is produced by the vertex stage with the
/// same type. Extra vertex outputs are allowed.
pub(super) fn check_varyings(outputs: &[Varying], inputs: &[Varying]) -> Result<(), ProgramError> {
    for (location, ty) in inputs {
        match outputs.iter().find(|(l, _)| l == location) {
            None => return Err(ProgramError::UnmatchedVarying { location: *location }),
            Some((_, out_ty)) if out_ty != ty => {
                return Err(ProgramError::VaryingTypeMismatch { location: *location });
            }
            Some(_) => {}
        }
    }
    Ok(())
}
