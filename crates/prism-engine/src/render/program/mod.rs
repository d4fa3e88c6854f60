//! Shader programs: one WGSL module per stage, checked together before any GPU
//! object is created.
//!
//! Building a program goes through three steps:
//! 1. [`ProgramSource`] collects the per-stage WGSL text (from files or memory).
//! 2. [`ProgramSource::link`] parses and validates each stage with naga, finds
//!    its entry point and checks the stages against each other. The result is
//!    a [`LinkedProgram`] carrying a [`ProgramReflection`].
//! 3. [`LinkedProgram::create`] turns it into wgpu shader modules.
//!
//! Steps 1 and 2 need no GPU device.

mod error;
mod reflect;

use std::fmt;
use std::path::Path;

use naga::valid::{Capabilities, ValidationFlags, Validator};

pub use error::ProgramError;
pub use reflect::{ProgramReflection, UniformBinding, UniformMember};

/// Pipeline stage a WGSL source belongs to.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

impl ShaderStage {
    pub fn to_wgpu(self) -> wgpu::ShaderStages {
        match self {
            ShaderStage::Vertex => wgpu::ShaderStages::VERTEX,
            ShaderStage::Fragment => wgpu::ShaderStages::FRAGMENT,
        }
    }

    fn to_naga(self) -> naga::ShaderStage {
        match self {
            ShaderStage::Vertex => naga::ShaderStage::Vertex,
            ShaderStage::Fragment => naga::ShaderStage::Fragment,
        }
    }
}

impl fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ShaderStage::Vertex => "vertex",
            ShaderStage::Fragment => "fragment",
        })
    }
}

/// WGSL text for one stage plus where it came from (file path or label).
#[derive(Debug, Clone)]
struct StageSource {
    stage: ShaderStage,
    origin: String,
    source: String,
}

/// Unlinked program: the WGSL sources of its stages.
#[derive(Debug, Clone, Default)]
pub struct ProgramSource {
    stages: Vec<StageSource>,
}

impl ProgramSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads one WGSL file per stage.
    pub fn load<P: AsRef<Path>>(stages: &[(ShaderStage, P)]) -> Result<Self, ProgramError> {
        let mut program = Self::new();
        for (stage, path) in stages {
            let path = path.as_ref();
            let source = std::fs::read_to_string(path).map_err(|source| ProgramError::Io {
                stage: *stage,
                path: path.to_path_buf(),
                source,
            })?;
            log::debug!("loaded {stage} shader '{}' ({} bytes)", path.display(), source.len());
            program = program.stage(*stage, path.display().to_string(), source);
        }
        Ok(program)
    }

    /// Builds a program from in-memory WGSL, one `(stage, source)` pair per
    /// stage. Diagnostics name each stage `<vertex>` / `<fragment>`.
    pub fn from_sources(stages: &[(ShaderStage, &str)]) -> Self {
        stages
            .iter()
            .fold(Self::new(), |program, (stage, source)| {
                program.stage(*stage, format!("<{stage}>"), *source)
            })
    }

    /// Adds an in-memory stage. `origin` is only used in diagnostics.
    pub fn stage(
        mut self,
        stage: ShaderStage,
        origin: impl Into<String>,
        source: impl Into<String>,
    ) -> Self {
        self.stages.push(StageSource {
            stage,
            origin: origin.into(),
            source: source.into(),
        });
        self
    }

    /// Compiles every stage and checks the vertex/fragment interface.
    pub fn link(&self) -> Result<LinkedProgram, ProgramError> {
        let vertex = self.compile(ShaderStage::Vertex)?;
        let fragment = self.compile(ShaderStage::Fragment)?;

        let (outputs, inputs) = (
            reflect::vertex_outputs(&vertex.module, &vertex.entry().function),
            reflect::fragment_inputs(&fragment.module, &fragment.entry().function),
        );
        reflect::check_varyings(&outputs, &inputs)?;

        let mut reflection = ProgramReflection::default();
        reflection.merge_stage(
            ShaderStage::Vertex,
            reflect::uniforms_of(&vertex.module, ShaderStage::Vertex),
        )?;
        reflection.merge_stage(
            ShaderStage::Fragment,
            reflect::uniforms_of(&fragment.module, ShaderStage::Fragment),
        )?;

        for u in reflection.uniforms() {
            log::debug!(
                "uniform @group({}) @binding({}) {:?}: {} bytes, {:?}",
                u.group,
                u.binding,
                u.name.as_deref().unwrap_or("?"),
                u.size,
                u.visibility,
            );
        }

        Ok(LinkedProgram {
            vertex,
            fragment,
            reflection,
        })
    }

    fn compile(&self, stage: ShaderStage) -> Result<CompiledStage, ProgramError> {
        let mut matching = self.stages.iter().filter(|s| s.stage == stage);
        let src = matching.next().ok_or(ProgramError::MissingStage(stage))?;
        if matching.next().is_some() {
            return Err(ProgramError::DuplicateStage(stage));
        }

        let module = naga::front::wgsl::parse_str(&src.source).map_err(|e| ProgramError::Parse {
            stage,
            origin: src.origin.clone(),
            message: e.emit_to_string(&src.source),
        })?;

        Validator::new(ValidationFlags::all(), Capabilities::all())
            .validate(&module)
            .map_err(|e| ProgramError::Validation {
                stage,
                origin: src.origin.clone(),
                message: e.emit_to_string(&src.source),
            })?;

        let mut entries = module
            .entry_points
            .iter()
            .enumerate()
            .filter(|(_, ep)| ep.stage == stage.to_naga())
            .map(|(i, _)| i);
        let entry_index = entries.next().ok_or_else(|| ProgramError::MissingEntryPoint {
            stage,
            origin: src.origin.clone(),
        })?;
        if entries.next().is_some() {
            return Err(ProgramError::AmbiguousEntryPoint {
                stage,
                origin: src.origin.clone(),
            });
        }

        Ok(CompiledStage {
            origin: src.origin.clone(),
            source: src.source.clone(),
            module,
            entry_index,
        })
    }
}

/// A stage that parsed and validated, with its entry point located.
#[derive(Debug)]
struct CompiledStage {
    origin: String,
    source: String,
    module: naga::Module,
    entry_index: usize,
}

impl CompiledStage {
    fn entry(&self) -> &naga::EntryPoint {
        &self.module.entry_points[self.entry_index]
    }

    fn entry_name(&self) -> &str {
        &self.entry().name
    }

    fn create_module(&self, device: &wgpu::Device, stage: ShaderStage) -> wgpu::ShaderModule {
        device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some(&format!("prism {stage} shader ({})", self.origin)),
            source: wgpu::ShaderSource::Wgsl(self.source.as_str().into()),
        })
    }
}

/// A program whose stages compiled and agree with each other.
#[derive(Debug)]
pub struct LinkedProgram {
    vertex: CompiledStage,
    fragment: CompiledStage,
    reflection: ProgramReflection,
}

impl LinkedProgram {
    pub fn reflection(&self) -> &ProgramReflection {
        &self.reflection
    }

    pub fn vertex_entry(&self) -> &str {
        self.vertex.entry_name()
    }

    pub fn fragment_entry(&self) -> &str {
        self.fragment.entry_name()
    }

    /// Creates the wgpu shader modules.
    pub fn create(self, device: &wgpu::Device) -> ShaderProgram {
        let vertex_module = self.vertex.create_module(device, ShaderStage::Vertex);
        let fragment_module = self.fragment.create_module(device, ShaderStage::Fragment);

        log::info!(
            "linked shader program ({} -> {}, {} uniform(s))",
            self.vertex.origin,
            self.fragment.origin,
            self.reflection.uniforms().len(),
        );

        ShaderProgram {
            vertex_entry: self.vertex.entry_name().to_string(),
            fragment_entry: self.fragment.entry_name().to_string(),
            vertex_module,
            fragment_module,
            reflection: self.reflection,
        }
    }
}

/// GPU-side shader program: one module per stage plus its uniform interface.
pub struct ShaderProgram {
    vertex_module: wgpu::ShaderModule,
    vertex_entry: String,
    fragment_module: wgpu::ShaderModule,
    fragment_entry: String,
    reflection: ProgramReflection,
}

impl ShaderProgram {
    /// Loads, links and creates a program from one WGSL file per stage.
    pub fn from_files<P: AsRef<Path>>(
        device: &wgpu::Device,
        stages: &[(ShaderStage, P)],
    ) -> Result<Self, ProgramError> {
        Ok(ProgramSource::load(stages)?.link()?.create(device))
    }

    pub fn reflection(&self) -> &ProgramReflection {
        &self.reflection
    }

    /// Bind group layout for `group`, derived from the program's uniforms.
    pub fn bind_group_layout(&self, device: &wgpu::Device, group: u32) -> wgpu::BindGroupLayout {
        let entries = self.reflection.bind_group_layout_entries(group);
        device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some(&format!("prism program group {group} bgl")),
            entries: &entries,
        })
    }

    pub fn vertex_state<'a>(
        &'a self,
        buffers: &'a [wgpu::VertexBufferLayout<'a>],
    ) -> wgpu::VertexState<'a> {
        wgpu::VertexState {
            module: &self.vertex_module,
            entry_point: Some(self.vertex_entry.as_str()),
            compilation_options: Default::default(),
            buffers,
        }
    }

    pub fn fragment_state<'a>(
        &'a self,
        targets: &'a [Option<wgpu::ColorTargetState>],
    ) -> wgpu::FragmentState<'a> {
        wgpu::FragmentState {
            module: &self.fragment_module,
            entry_point: Some(self.fragment_entry.as_str()),
            compilation_options: Default::default(),
            targets,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VS: &str = r#"
struct Offset {
    value: vec2<f32>,
}
@group(0) @binding(1) var<uniform> offset: Offset;

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) color: vec3<f32>,
}

@vertex
fn vs_main(@location(0) position: vec2<f32>) -> VertexOutput {
    var out: VertexOutput;
    out.clip_position = vec4<f32>(position + offset.value, 0.0, 1.0);
    out.color = vec3<f32>(1.0, 0.0, 0.0);
    return out;
}
"#;

    const FS: &str = r#"
struct Tint {
    strength: f32,
    color: vec3<f32>,
}
@group(0) @binding(0) var<uniform> tint: Tint;

@fragment
fn fs_main(@location(0) color: vec3<f32>) -> @location(0) vec4<f32> {
    return vec4<f32>(mix(color, tint.color, vec3<f32>(tint.strength)), 1.0);
}
"#;

    fn program(vs: &str, fs: &str) -> ProgramSource {
        ProgramSource::from_sources(&[(ShaderStage::Vertex, vs), (ShaderStage::Fragment, fs)])
    }

    // ── link ──────────────────────────────────────────────────────────────

    #[test]
    fn links_matching_stages() {
        let linked = program(VS, FS).link().unwrap();
        assert_eq!(linked.vertex_entry(), "vs_main");
        assert_eq!(linked.fragment_entry(), "fs_main");
    }

    #[test]
    fn reflection_lists_both_stages_uniforms() {
        let linked = program(VS, FS).link().unwrap();
        let refl = linked.reflection();
        assert_eq!(refl.uniforms().len(), 2);

        let tint = refl.uniform(0, 0).unwrap();
        assert_eq!(tint.name.as_deref(), Some("tint"));
        assert_eq!(tint.size, 32);
        assert_eq!(tint.member_offset("strength"), Some(0));
        assert_eq!(tint.member_offset("color"), Some(16));
        assert_eq!(tint.visibility, wgpu::ShaderStages::FRAGMENT);

        let offset = refl.uniform(0, 1).unwrap();
        assert_eq!(offset.size, 8);
        assert_eq!(offset.visibility, wgpu::ShaderStages::VERTEX);
    }

    #[test]
    fn layout_entries_follow_reflection() {
        let linked = program(VS, FS).link().unwrap();
        let entries = linked.reflection().bind_group_layout_entries(0);
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].binding, 0);
        assert_eq!(entries[1].binding, 1);
        match entries[0].ty {
            wgpu::BindingType::Buffer { ty, min_binding_size, .. } => {
                assert_eq!(ty, wgpu::BufferBindingType::Uniform);
                assert_eq!(min_binding_size.map(|s| s.get()), Some(32));
            }
            _ => panic!("expected a buffer binding"),
        }
        assert!(linked.reflection().bind_group_layout_entries(1).is_empty());
    }

    #[test]
    fn shared_binding_widens_visibility() {
        let vs = r#"
@group(0) @binding(0) var<uniform> scale: vec4<f32>;
@vertex
fn main(@location(0) p: vec2<f32>) -> @builtin(position) vec4<f32> {
    return vec4<f32>(p * scale.xy, 0.0, 1.0);
}
"#;
        let fs = r#"
@group(0) @binding(0) var<uniform> scale: vec4<f32>;
@fragment
fn main() -> @location(0) vec4<f32> {
    return scale;
}
"#;
        let linked = program(vs, fs).link().unwrap();
        let u = linked.reflection().uniform(0, 0).unwrap();
        assert_eq!(u.size, 16);
        assert!(u.members.is_empty());
        assert_eq!(u.visibility, wgpu::ShaderStages::VERTEX_FRAGMENT);
    }

    // ── failures ──────────────────────────────────────────────────────────

    #[test]
    fn from_sources_accepts_any_stage_order() {
        let src = ProgramSource::from_sources(&[(ShaderStage::Fragment, FS), (ShaderStage::Vertex, VS)]);
        let linked = src.link().unwrap();
        assert_eq!(linked.vertex_entry(), "vs_main");
        assert_eq!(linked.fragment_entry(), "fs_main");
    }

    #[test]
    fn missing_stage() {
        let src = ProgramSource::from_sources(&[(ShaderStage::Vertex, VS)]);
        assert!(matches!(
            src.link(),
            Err(ProgramError::MissingStage(ShaderStage::Fragment))
        ));
    }

    #[test]
    fn duplicate_stage() {
        let src = program(VS, FS).stage(ShaderStage::Vertex, "vs2", VS);
        assert!(matches!(
            src.link(),
            Err(ProgramError::DuplicateStage(ShaderStage::Vertex))
        ));
    }

    #[test]
    fn parse_error_names_stage_and_origin() {
        let err = program("fn broken( {", FS).link().unwrap_err();
        match &err {
            ProgramError::Parse { stage, origin, .. } => {
                assert_eq!(*stage, ShaderStage::Vertex);
                assert_eq!(origin, "<vertex>");
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(err.to_string().starts_with("vertex shader '<vertex>' failed to parse"));
    }

    #[test]
    fn validation_error_is_reported() {
        // Entry point result without a binding parses but does not validate.
        let fs = r#"
@fragment
fn fs_main() -> vec4<f32> {
    return vec4<f32>(1.0);
}
"#;
        let err = program(VS, fs).link().unwrap_err();
        assert!(
            matches!(err, ProgramError::Validation { stage: ShaderStage::Fragment, .. }),
            "unexpected error: {err}"
        );
    }

    #[test]
    fn missing_entry_point() {
        // A valid module, but its only entry point is a fragment one.
        let err = program(FS, FS).link().unwrap_err();
        assert!(matches!(
            err,
            ProgramError::MissingEntryPoint { stage: ShaderStage::Vertex, .. }
        ));
    }

    #[test]
    fn two_entry_points_for_one_stage() {
        let vs = r#"
@vertex
fn a(@location(0) p: vec2<f32>) -> @builtin(position) vec4<f32> {
    return vec4<f32>(p, 0.0, 1.0);
}

@vertex
fn b(@location(0) p: vec2<f32>) -> @builtin(position) vec4<f32> {
    return vec4<f32>(-p, 0.0, 1.0);
}
"#;
        let fs = r#"
@fragment
fn fs_main() -> @location(0) vec4<f32> {
    return vec4<f32>(1.0);
}
"#;
        let err = program(vs, fs).link().unwrap_err();
        assert!(
            matches!(err, ProgramError::AmbiguousEntryPoint { stage: ShaderStage::Vertex, .. }),
            "unexpected error: {err}"
        );
    }

    #[test]
    fn unmatched_varying() {
        let fs = r#"
@fragment
fn fs_main(@location(1) uv: vec2<f32>) -> @location(0) vec4<f32> {
    return vec4<f32>(uv, 0.0, 1.0);
}
"#;
        let err = program(VS, fs).link().unwrap_err();
        assert!(matches!(err, ProgramError::UnmatchedVarying { location: 1 }));
    }

    #[test]
    fn varying_type_mismatch() {
        let fs = r#"
@fragment
fn fs_main(@location(0) color: vec4<f32>) -> @location(0) vec4<f32> {
    return color;
}
"#;
        let err = program(VS, fs).link().unwrap_err();
        assert!(matches!(err, ProgramError::VaryingTypeMismatch { location: 0 }));
    }

    #[test]
    fn binding_conflict_between_stages() {
        let fs = r#"
@group(0) @binding(1) var<uniform> other: vec4<f32>;
@fragment
fn fs_main(@location(0) color: vec3<f32>) -> @location(0) vec4<f32> {
    return vec4<f32>(color, 1.0) * other;
}
"#;
        let err = program(VS, fs).link().unwrap_err();
        assert!(matches!(
            err,
            ProgramError::BindingConflict { group: 0, binding: 1, vertex: 8, fragment: 16 }
        ));
    }

    #[test]
    fn load_reports_missing_file() {
        let err = ProgramSource::load(&[(ShaderStage::Vertex, "/nonexistent/prism/vs.wgsl")])
            .unwrap_err();
        match err {
            ProgramError::Io { stage, path, .. } => {
                assert_eq!(stage, ShaderStage::Vertex);
                assert!(path.ends_with("vs.wgsl"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn stage_display() {
        assert_eq!(ShaderStage::Vertex.to_string(), "vertex");
        assert_eq!(ShaderStage::Fragment.to_string(), "fragment");
        assert_eq!(ShaderStage::Fragment.to_wgpu(), wgpu::ShaderStages::FRAGMENT);
    }
}
