use anyhow::Context;
use slicescope::{SlicerApp, ViewerConfig};

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut config = ViewerConfig::from_env();
    if let Some(path) = std::env::args().nth(1) {
        config = config.with_model_path(path);
    }

    let app = SlicerApp::new(config.clone())
        .with_context(|| format!("could not load model '{}'", config.model_path))?;
    app.run()
}
