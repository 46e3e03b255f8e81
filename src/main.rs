use env_logger::Env;
use sketchbook::{demo::SpinningMesh, AppConfig, AppHost};

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let config = AppConfig::default().with_title("sketchbook: spinning icosahedron");
    AppHost::new(config, SpinningMesh::default())?.run()?;
    Ok(())
}
