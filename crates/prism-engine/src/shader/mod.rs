//! Shader loading, compilation and linking.
//!
//! Pipeline:
//! - `ShaderSource` / `ProgramSources`: WGSL text, read from disk or built in
//! - `compile`: parse + validate one stage with naga, producing diagnostics
//! - `link`: check the vertex -> fragment interface of two compiled stages
//! - `ShaderProgram`: wgpu render pipelines built from a linked program
//!
//! Compilation and linking need no GPU, so `check` can validate a shader pair
//! headlessly.

mod compile;
mod error;
mod link;
mod program;
mod source;
mod stage;

pub use compile::{compile, CompiledStage};
pub use error::ShaderError;
pub use link::{link, LinkedProgram};
pub use program::ShaderProgram;
pub use source::{ProgramSources, ShaderSource};
pub use stage::ShaderStage;

/// Compiles and links `sources` without touching the GPU.
pub fn check(sources: &ProgramSources) -> Result<LinkedProgram, ShaderError> {
    let vertex = compile(ShaderStage::Vertex, &sources.vertex)?;
    let fragment = compile(ShaderStage::Fragment, &sources.fragment)?;
    link(vertex, fragment)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_pair_checks() {
        let linked = check(&ProgramSources::builtin()).unwrap();
        assert_eq!(linked.vertex_entry(), "vs_main");
        assert_eq!(linked.fragment_entry(), "fs_main");
    }

    #[test]
    fn check_stops_at_first_compile_error() {
        let sources = ProgramSources {
            vertex: ShaderSource::new("broken.vert", "@vertex fn vs_main( {"),
            fragment: ShaderSource::new("also-broken.frag", "nope"),
        };

        match check(&sources) {
            Err(ShaderError::Compile { stage, label, .. }) => {
                assert_eq!(stage, ShaderStage::Vertex);
                assert_eq!(label, "broken.vert");
            }
            other => panic!("expected a vertex compile error, got {other:?}"),
        }
    }
}
