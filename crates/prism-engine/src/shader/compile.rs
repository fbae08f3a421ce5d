use naga::valid::{Capabilities, ValidationFlags, Validator};

use super::{ShaderError, ShaderSource, ShaderStage};

/// A single stage that parsed and validated.
#[derive(Debug, Clone)]
pub struct CompiledStage {
    pub stage: ShaderStage,
    pub label: String,
    /// Source text, kept for creating the GPU shader module.
    pub source: String,
    pub module: naga::Module,
    /// Name of the entry point used for this stage.
    pub entry_point: String,
}

impl CompiledStage {
    pub(crate) fn entry(&self) -> Option<&naga::EntryPoint> {
        self.module
            .entry_points
            .iter()
            .find(|ep| ep.name == self.entry_point)
    }
}

/// Parses and validates `source` as a `stage` shader.
///
/// Diagnostics are logged at error level and returned in the error.
pub fn compile(stage: ShaderStage, source: &ShaderSource) -> Result<CompiledStage, ShaderError> {
    log::info!("compiling {stage} shader: {}", source.label);

    let module = naga::front::wgsl::parse_str(&source.code).map_err(|err| {
        let log = err.emit_to_string_with_path(&source.code, source.label.as_str());
        compile_error(stage, source, log)
    })?;

    let mut validator = Validator::new(ValidationFlags::all(), Capabilities::all());
    validator.validate(&module).map_err(|err| {
        let log = err.emit_to_string_with_path(&source.code, &source.label);
        compile_error(stage, source, log)
    })?;

    let entry_point = module
        .entry_points
        .iter()
        .find(|ep| ep.stage == stage.to_naga())
        .map(|ep| ep.name.clone())
        .ok_or_else(|| {
            log::error!("no {} entry point in {}", stage.attribute(), source.label);
            ShaderError::MissingEntryPoint {
                stage,
                label: source.label.clone(),
            }
        })?;

    let extra = module
        .entry_points
        .iter()
        .filter(|ep| ep.stage == stage.to_naga())
        .count();
    if extra > 1 {
        log::warn!(
            "{} has {extra} {stage} entry points; using `{entry_point}`",
            source.label
        );
    }

    Ok(CompiledStage {
        stage,
        label: source.label.clone(),
        source: source.code.clone(),
        module,
        entry_point,
    })
}

fn compile_error(stage: ShaderStage, source: &ShaderSource, log: String) -> ShaderError {
    log::error!("{stage} shader {} failed to compile:\n{log}", source.label);
    ShaderError::Compile {
        stage,
        label: source.label.clone(),
        log,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VERTEX: &str = r#"
@vertex
fn main_v(@location(0) position: vec3<f32>) -> @builtin(position) vec4<f32> {
    return vec4<f32>(position, 1.0);
}
"#;

    fn src(code: &str) -> ShaderSource {
        ShaderSource::new("test.wgsl", code)
    }

    #[test]
    fn compiles_and_finds_entry_point() {
        let stage = compile(ShaderStage::Vertex, &src(VERTEX)).unwrap();
        assert_eq!(stage.entry_point, "main_v");
        assert!(stage.entry().is_some());
    }

    #[test]
    fn syntax_error_reports_location() {
        let err = compile(ShaderStage::Vertex, &src("@vertex fn broken( -> {")).unwrap_err();
        match err {
            ShaderError::Compile { stage, log, .. } => {
                assert_eq!(stage, ShaderStage::Vertex);
                assert!(log.contains("test.wgsl:1:"), "{log}");
            }
            other => panic!("expected compile error, got {other:?}"),
        }
    }

    #[test]
    fn type_error_fails_validation() {
        let code = r#"
@fragment
fn fs_main() -> @location(0) vec4<f32> {
    let x: f32 = 1.0;
    return x;
}
"#;
        match compile(ShaderStage::Fragment, &src(code)) {
            Err(ShaderError::Compile { stage, log, .. }) => {
                assert_eq!(stage, ShaderStage::Fragment);
                // Diagnostics point into the source, like a GL info log.
                assert!(log.contains("test.wgsl:"), "{log}");
            }
            other => panic!("expected compile error, got {other:?}"),
        }
    }

    #[test]
    fn vertex_without_position_fails_to_compile() {
        let code = r#"
@vertex
fn vs_main(@location(0) position: vec3<f32>) -> @location(0) vec4<f32> {
    return vec4<f32>(position, 1.0);
}
"#;
        match compile(ShaderStage::Vertex, &src(code)) {
            Err(ShaderError::Compile { stage, log, .. }) => {
                assert_eq!(stage, ShaderStage::Vertex);
                assert!(log.contains("position"), "{log}");
            }
            other => panic!("expected compile error, got {other:?}"),
        }
    }

    #[test]
    fn wrong_stage_is_missing_entry_point() {
        let err = compile(ShaderStage::Fragment, &src(VERTEX)).unwrap_err();
        assert!(matches!(
            err,
            ShaderError::MissingEntryPoint { stage: ShaderStage::Fragment, .. }
        ));
        assert_eq!(err.to_string(), "no @fragment entry point in test.wgsl");
    }
}
