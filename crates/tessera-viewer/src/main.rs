use std::path::PathBuf;

use anyhow::Result;
use tessera_engine::assets::MaterialSource;
use tessera_engine::logging::{init_logging, LoggingConfig};
use tessera_engine::window::{Runtime, RuntimeConfig};
use tessera_engine::RendererConfig;

const DEFAULT_TEXTURE: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/assets/texture.png");

fn main() -> Result<()> {
    init_logging(LoggingConfig::default());

    // Usage: tessera-viewer [TEXTURE]
    let texture = std::env::args_os()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_TEXTURE));
    log::info!("texture: {}", texture.display());

    let renderer = RendererConfig::default().with_material(MaterialSource::File(texture));
    Runtime::run(RuntimeConfig::default(), renderer)
}
