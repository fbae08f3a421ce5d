mod app;
mod cli;

use anyhow::Context;
use clap::Parser;

use prism_engine::device::GpuInit;
use prism_engine::logging::{init_logging, LoggingConfig};
use prism_engine::shader;
use prism_engine::window::Runtime;

use app::TutorialApp;
use cli::Cli;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    init_logging(LoggingConfig {
        env_filter: cli.log.clone(),
        ..Default::default()
    });

    let sources = cli.sources().context("failed to load shader sources")?;

    if cli.check {
        let linked = shader::check(&sources).context("shader check failed")?;
        log::info!(
            "ok: {} ({}) + {} ({}), {} varying(s)",
            linked.vertex.label,
            linked.vertex_entry(),
            linked.fragment.label,
            linked.fragment_entry(),
            linked.varyings.len()
        );
        return Ok(());
    }

    let gpu_init = GpuInit {
        optional_features: wgpu::Features::POLYGON_MODE_LINE,
        ..Default::default()
    };

    let app = TutorialApp::new(cli.title.clone(), sources, cli.shape, cli.wireframe);
    Runtime::run(cli.runtime_config(), gpu_init, app)
}
