use std::path::PathBuf;

use thiserror::Error;

use super::ShaderStage;

/// Failure while loading, compiling or linking a shader program.
#[derive(Debug, Error)]
pub enum ProgramError {
    #[error("failed to read {stage} shader '{}'", path.display())]
    Io {
        stage: ShaderStage,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{stage} shader '{origin}' failed to parse:\n{message}")]
    Parse {
        stage: ShaderStage,
        origin: String,
        message: String,
    },

    #[error("{stage} shader '{origin}' failed validation:\n{message}")]
    Validation {
        stage: ShaderStage,
        origin: String,
        message: String,
    },

    #[error("{stage} shader '{origin}' has no @{stage} entry point")]
    MissingEntryPoint { stage: ShaderStage, origin: String },

    #[error("{stage} shader '{origin}' has more than one @{stage} entry point")]
    AmbiguousEntryPoint { stage: ShaderStage, origin: String },

    #[error("program has no {0} stage")]
    MissingStage(ShaderStage),

    #[error("program declares the {0} stage more than once")]
    DuplicateStage(ShaderStage),

    #[error("fragment input @location({location}) is not written by the vertex stage")]
    UnmatchedVarying { location: u32 },

    #[error("fragment input @location({location}) does not match the vertex output type")]
    VaryingTypeMismatch { location: u32 },

    #[error(
        "@group({group}) @binding({binding}) is declared with different sizes \
         ({vertex} bytes in vertex, {fragment} bytes in fragment)"
    )]
    BindingConflict {
        group: u32,
        binding: u32,
        vertex: u64,
        fragment: u64,
    },

    #[error("program has no uniform at @group({group}) @binding({binding})")]
    UnknownBinding { group: u32, binding: u32 },

    #[error(
        "uniform at @group({group}) @binding({binding}) is {shader} bytes in the shader \
         but {host} bytes on the host"
    )]
    BindingSizeMismatch {
        group: u32,
        binding: u32,
        shader: u64,
        host: u64,
    },
}
