use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use prism_engine::render::Mesh;
use prism_engine::shader::{ProgramSources, ShaderError};
use prism_engine::window::RuntimeConfig;
use winit::dpi::LogicalSize;

#[derive(Parser, Debug)]
#[command(
    name = "prism-tutorial",
    version,
    about = "Draws a shaded quad with a vertex/fragment shader pair"
)]
pub struct Cli {
    /// Vertex shader (WGSL). Requires --fragment; without both, built-in shaders are used.
    #[arg(long, requires = "fragment")]
    pub vertex: Option<PathBuf>,

    /// Fragment shader (WGSL). Requires --vertex.
    #[arg(long, requires = "vertex")]
    pub fragment: Option<PathBuf>,

    /// Geometry to draw.
    #[arg(long, value_enum, default_value_t = Shape::Quad)]
    pub shape: Shape,

    /// Start with polygons drawn as lines.
    #[arg(long)]
    pub wireframe: bool,

    /// Window title.
    #[arg(long, default_value = "Window")]
    pub title: String,

    /// Window width in logical pixels.
    #[arg(long, default_value_t = 1000)]
    pub width: u32,

    /// Window height in logical pixels.
    #[arg(long, default_value_t = 700)]
    pub height: u32,

    /// Allow the window to be resized.
    #[arg(long)]
    pub resizable: bool,

    /// Log filter (env_logger syntax). Overrides RUST_LOG.
    #[arg(long)]
    pub log: Option<String>,

    /// Compile and link the shaders, then exit without opening a window.
    #[arg(long)]
    pub check: bool,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum Shape {
    Quad,
    Triangle,
}

impl Shape {
    pub fn mesh(self) -> Mesh {
        match self {
            Shape::Quad => Mesh::quad(),
            Shape::Triangle => Mesh::triangle(),
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Shape::Quad => Shape::Triangle,
            Shape::Triangle => Shape::Quad,
        }
    }
}

impl Cli {
    /// Shader sources selected on the command line.
    pub fn sources(&self) -> Result<ProgramSources, ShaderError> {
        match (&self.vertex, &self.fragment) {
            (Some(vs), Some(fs)) => ProgramSources::load(vs, fs),
            _ => Ok(ProgramSources::builtin()),
        }
    }

    pub fn runtime_config(&self) -> RuntimeConfig {
        RuntimeConfig {
            title: self.title.clone(),
            initial_size: LogicalSize::new(self.width.max(1) as f64, self.height.max(1) as f64),
            resizable: self.resizable,
        }
    }
}
