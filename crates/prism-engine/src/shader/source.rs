use std::path::Path;

use super::{ShaderError, ShaderStage};

/// WGSL source text plus a label used in diagnostics (usually the file path).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShaderSource {
    pub label: String,
    pub code: String,
}

impl ShaderSource {
    pub fn new(label: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            code: code.into(),
        }
    }

    /// Reads a shader from disk. Line endings are normalized to `\n`.
    pub fn from_file(stage: ShaderStage, path: impl AsRef<Path>) -> Result<Self, ShaderError> {
        let path = path.as_ref();

        let raw = std::fs::read_to_string(path).map_err(|source| {
            log::error!("could not open the {stage} shader file: {}", path.display());
            ShaderError::Io {
                stage,
                path: path.to_path_buf(),
                source,
            }
        })?;

        Ok(Self::new(path.display().to_string(), normalize_newlines(&raw)))
    }
}

fn normalize_newlines(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len() + 1);
    for line in raw.lines() {
        out.push_str(line);
        out.push('\n');
    }
    out
}

/// A vertex + fragment source pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgramSources {
    pub vertex: ShaderSource,
    pub fragment: ShaderSource,
}

impl ProgramSources {
    /// Loads both stages from disk.
    pub fn load(
        vertex_path: impl AsRef<Path>,
        fragment_path: impl AsRef<Path>,
    ) -> Result<Self, ShaderError> {
        Ok(Self {
            vertex: ShaderSource::from_file(ShaderStage::Vertex, vertex_path)?,
            fragment: ShaderSource::from_file(ShaderStage::Fragment, fragment_path)?,
        })
    }

    /// Built-in flat shading: positions pass straight through, every fragment
    /// is orange.
    pub fn builtin() -> Self {
        Self {
            vertex: ShaderSource::new("builtin flat.vert", include_str!("wgsl/flat.vert.wgsl")),
            fragment: ShaderSource::new("builtin flat.frag", include_str!("wgsl/flat.frag.wgsl")),
        }
    }
}
