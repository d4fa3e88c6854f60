mod app;
mod config;
mod mesh;
mod uniforms;

use prism_engine::logging::init_logging;
use prism_engine::window::Runtime;

use crate::app::UniformsApp;
use crate::config::AppConfig;

fn main() {
    let config = AppConfig::default();
    init_logging(config.logging());

    let app = UniformsApp::new(config.clone());
    if let Err(e) = Runtime::run(config.runtime(), config.gpu(), app) {
        log::error!("{e:#}");
        std::process::exit(1);
    }
}
