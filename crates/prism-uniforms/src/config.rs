use std::path::PathBuf;

use winit::dpi::LogicalSize;

use prism_engine::device::GpuInit;
use prism_engine::logging::LoggingConfig;
use prism_engine::window::RuntimeConfig;

/// Directory holding the WGSL sources, fixed at compile time.
pub const SHADER_DIR: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/shaders");

/// Startup configuration for the uniforms demo.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub title: String,
    pub width: f64,
    pub height: f64,
    pub vertex_shader: PathBuf,
    pub fragment_shader: PathBuf,
    /// `env_logger` filter; `RUST_LOG` applies when unset.
    pub log_filter: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            title: "prism - uniforms".to_string(),
            width: 650.0,
            height: 480.0,
            vertex_shader: PathBuf::from(SHADER_DIR).join("base_vs.wgsl"),
            fragment_shader: PathBuf::from(SHADER_DIR).join("base_fs.wgsl"),
            log_filter: None,
        }
    }
}

impl AppConfig {
    pub fn runtime(&self) -> RuntimeConfig {
        RuntimeConfig {
            title: self.title.clone(),
            initial_size: LogicalSize::new(self.width, self.height),
        }
    }

    /// GPU settings: a non-sRGB surface so colors reach the framebuffer as written.
    pub fn gpu(&self) -> GpuInit {
        GpuInit {
            prefer_srgb: false,
            ..GpuInit::default()
        }
    }

    pub fn logging(&self) -> LoggingConfig {
        LoggingConfig {
            env_filter: self.log_filter.clone(),
            ..LoggingConfig::default()
        }
    }
}
