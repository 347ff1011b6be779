mod app;

use lumen_engine::logging::{init_logging, LoggingConfig};
use lumen_engine::scene::Scene;

use app::Viewer;

fn main() -> anyhow::Result<()> {
    init_logging(LoggingConfig::default());

    // A fixed seed makes the per-frame random channels reproducible.
    let seed = match std::env::var("LUMEN_SEED") {
        Ok(raw) => Some(raw.parse::<u64>().map_err(|e| anyhow::anyhow!("LUMEN_SEED={raw}: {e}"))?),
        Err(_) => None,
    };

    Viewer::new()
        .title("lumen")
        .size(1280, 720)
        .fov(45.0)
        .seed(seed)
        .scene(Scene::default_spheres())
        .run()
}
