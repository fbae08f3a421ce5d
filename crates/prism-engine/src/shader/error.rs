use std::path::PathBuf;

use super::ShaderStage;

/// Failure while loading, compiling or linking a shader program.
///
/// `Compile` and `Link` carry the full diagnostic text.
#[derive(Debug, thiserror::Error)]
pub enum ShaderError {
    #[error("could not open the {stage} shader file: {}", .path.display())]
    Io {
        stage: ShaderStage,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{stage} shader compilation failed ({label}):\n{log}")]
    Compile {
        stage: ShaderStage,
        label: String,
        log: String,
    },

    #[error("no {} entry point in {label}", .stage.attribute())]
    MissingEntryPoint { stage: ShaderStage, label: String },

    #[error("shader program linking failed:\n{log}")]
    Link { log: String },
}
