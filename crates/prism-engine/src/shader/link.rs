use std::collections::BTreeMap;

use naga::{
    Binding, Handle, Interpolation, Module, Sampling, ScalarKind, Type, TypeInner, VectorSize,
};

use super::{CompiledStage, ShaderError, ShaderStage};
use crate::render::Vertex;

/// A vertex + fragment pair whose stage interfaces agree.
#[derive(Debug, Clone)]
pub struct LinkedProgram {
    pub vertex: CompiledStage,
    pub fragment: CompiledStage,
    /// Locations passed from the vertex to the fragment stage, ascending.
    pub varyings: Vec<u32>,
}

impl LinkedProgram {
    pub fn vertex_entry(&self) -> &str {
        &self.vertex.entry_point
    }

    pub fn fragment_entry(&self) -> &str {
        &self.fragment.entry_point
    }
}

/// Checks that `vertex` and `fragment` can be used together.
///
/// Rules:
/// - the vertex stage reads only attributes that `Vertex` provides
/// - every fragment input location is written by the vertex stage with the same
///   type, interpolation and sampling
/// - the fragment stage writes a float color to location 0 and no other location
///
/// naga already rejects a vertex entry point without `@builtin(position)`.
///
/// All violations are collected into one diagnostic log.
pub fn link(vertex: CompiledStage, fragment: CompiledStage) -> Result<LinkedProgram, ShaderError> {
    log::info!("linking shader program");
    debug_assert_eq!(vertex.stage, ShaderStage::Vertex);
    debug_assert_eq!(fragment.stage, ShaderStage::Fragment);

    let mut problems = Vec::new();

    let (Some(vs), Some(fs)) = (vertex.entry(), fragment.entry()) else {
        return Err(link_error(vec!["entry point vanished from compiled module".into()]));
    };

    let vs_in = Interface::inputs(&vertex.module, &vs.function);
    let vs_out = Interface::output(&vertex.module, &vs.function);
    let fs_in = Interface::inputs(&fragment.module, &fs.function);
    let fs_out = Interface::output(&fragment.module, &fs.function);

    for (&location, input) in &vs_in.locations {
        let attribute = Vertex::ATTRIBUTES
            .iter()
            .find(|a| a.shader_location == location);

        match attribute {
            None => problems.push(format!(
                "{}: vertex input @location({location}) has no matching vertex attribute",
                vertex.label
            )),
            Some(a) if !accepts_attribute(&input.ty, a.format) => problems.push(format!(
                "{}: vertex input @location({location}) is {}, vertex attribute is {:?}",
                vertex.label,
                describe(&input.ty),
                a.format
            )),
            Some(_) => {}
        }
    }

    for (&location, fs_var) in &fs_in.locations {
        match vs_out.locations.get(&location) {
            None => problems.push(format!(
                "{}: fragment input @location({location}) is not written by the vertex stage",
                fragment.label
            )),
            Some(vs_var) if vs_var.ty != fs_var.ty => problems.push(format!(
                "@location({location}) type mismatch: vertex writes {}, fragment reads {}",
                describe(&vs_var.ty),
                describe(&fs_var.ty)
            )),
            Some(vs_var) if !vs_var.same_interpolation(fs_var) => problems.push(format!(
                "@location({location}) interpolation mismatch: vertex {}, fragment {}",
                vs_var.describe_interpolation(),
                fs_var.describe_interpolation()
            )),
            Some(_) => {}
        }
    }

    match fs_out.locations.get(&0) {
        None => problems.push(format!(
            "{}: fragment stage does not write color @location(0)",
            fragment.label
        )),
        Some(color) if !is_float(&color.ty) => problems.push(format!(
            "{}: fragment output @location(0) is {}, color targets need f32 components",
            fragment.label,
            describe(&color.ty)
        )),
        Some(_) => {}
    }
    for &location in fs_out.locations.keys().filter(|&&l| l != 0) {
        problems.push(format!(
            "{}: fragment output @location({location}) has no color target",
            fragment.label
        ));
    }

    for location in vs_out.locations.keys() {
        if !fs_in.locations.contains_key(location) {
            log::debug!("vertex output @location({location}) is unused by the fragment stage");
        }
    }

    if !problems.is_empty() {
        return Err(link_error(problems));
    }

    let varyings = fs_in.locations.keys().copied().collect();

    Ok(LinkedProgram {
        vertex,
        fragment,
        varyings,
    })
}

pub(super) fn link_error(problems: Vec<String>) -> ShaderError {
    let log = problems.join("\n");
    log::error!("shader program failed to link:\n{log}");
    ShaderError::Link { log }
}

/// User-defined locations crossing one side of a stage boundary.
#[derive(Debug, Default)]
struct Interface {
    locations: BTreeMap<u32, Varying>,
}

#[derive(Debug, Clone, PartialEq)]
struct Varying {
    ty: TypeInner,
    interpolation: Option<Interpolation>,
    sampling: Option<Sampling>,
}

impl Varying {
    fn same_interpolation(&self, other: &Varying) -> bool {
        self.interpolation == other.interpolation && self.sampling == other.sampling
    }

    fn describe_interpolation(&self) -> String {
        let mut text = match self.interpolation {
            Some(i) => format!("{i:?}").to_lowercase(),
            None => "no interpolation".to_string(),
        };
        if let Some(s) = self.sampling {
            text.push_str(&format!(" ({})", format!("{s:?}").to_lowercase()));
        }
        text
    }
}

impl Interface {
    fn inputs(module: &Module, function: &naga::Function) -> Self {
        let mut iface = Self::default();
        for arg in &function.arguments {
            iface.collect(module, arg.ty, arg.binding.as_ref());
        }
        iface
    }

    fn output(module: &Module, function: &naga::Function) -> Self {
        let mut iface = Self::default();
        if let Some(result) = &function.result {
            iface.collect(module, result.ty, result.binding.as_ref());
        }
        iface
    }

    fn collect(&mut self, module: &Module, ty: Handle<Type>, binding: Option<&Binding>) {
        match binding {
            Some(Binding::Location {
                location,
                interpolation,
                sampling,
                ..
            }) => {
                let varying = Varying {
                    ty: module.types[ty].inner.clone(),
                    interpolation: *interpolation,
                    sampling: *sampling,
                };
                self.locations.insert(*location, varying);
            }
            Some(Binding::BuiltIn(_)) => {}
            None => {
                if let TypeInner::Struct { members, .. } = &module.types[ty].inner {
                    for member in members {
                        self.collect(module, member.ty, member.binding.as_ref());
                    }
                }
            }
        }
    }
}

/// Float vertex formats feed `f32`/`vecN<f32>` inputs of any width; missing
/// components are filled with (0, 0, 0, 1) and extra ones are dropped.
fn accepts_attribute(input: &TypeInner, format: wgpu::VertexFormat) -> bool {
    let float_format = matches!(
        format,
        wgpu::VertexFormat::Float32
            | wgpu::VertexFormat::Float32x2
            | wgpu::VertexFormat::Float32x3
            | wgpu::VertexFormat::Float32x4
    );

    float_format && is_float(input)
}

/// `f32` scalar or vector.
fn is_float(inner: &TypeInner) -> bool {
    match inner {
        TypeInner::Scalar(s) | TypeInner::Vector { scalar: s, .. } => {
            s.kind == ScalarKind::Float && s.width == 4
        }
        _ => false,
    }
}

fn vector_len(size: VectorSize) -> u8 {
    match size {
        VectorSize::Bi => 2,
        VectorSize::Tri => 3,
        VectorSize::Quad => 4,
    }
}

fn describe(inner: &TypeInner) -> String {
    let scalar_name = |s: &naga::Scalar| match s.kind {
        ScalarKind::Float => format!("f{}", s.width * 8),
        ScalarKind::Sint => format!("i{}", s.width * 8),
        ScalarKind::Uint => format!("u{}", s.width * 8),
        ScalarKind::Bool => "bool".to_string(),
        other => format!("{other:?}"),
    };

    match inner {
        TypeInner::Scalar(s) => scalar_name(s),
        TypeInner::Vector { size, scalar } => {
            format!("vec{}<{}>", vector_len(*size), scalar_name(scalar))
        }
        other => format!("{other:?}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shader::{compile, ShaderSource};

    const VS_COLOR: &str = r#"
struct Out {
    @builtin(position) pos: vec4<f32>,
    @location(0) tint: vec3<f32>,
};

@vertex
fn vs_main(@location(0) position: vec3<f32>) -> Out {
    var out: Out;
    out.pos = vec4<f32>(position, 1.0);
    out.tint = position + vec3<f32>(0.5);
    return out;
}
"#;

    const FS_COLOR: &str = r#"
@fragment
fn fs_main(@location(0) tint: vec3<f32>) -> @location(0) vec4<f32> {
    return vec4<f32>(tint, 1.0);
}
"#;

    const FS_FLAT: &str = r#"
@fragment
fn fs_main() -> @location(0) vec4<f32> {
    return vec4<f32>(1.0, 0.5, 0.2, 1.0);
}
"#;

    fn vs(code: &str) -> CompiledStage {
        compile(ShaderStage::Vertex, &ShaderSource::new("test.vert", code)).unwrap()
    }

    fn fs(code: &str) -> CompiledStage {
        compile(ShaderStage::Fragment, &ShaderSource::new("test.frag", code)).unwrap()
    }

    fn link_log(vertex: &str, fragment: &str) -> String {
        match link(vs(vertex), fs(fragment)) {
            Err(ShaderError::Link { log }) => log,
            other => panic!("expected link error, got {other:?}"),
        }
    }

    #[test]
    fn links_matching_varyings() {
        let linked = link(vs(VS_COLOR), fs(FS_COLOR)).unwrap();
        assert_eq!(linked.varyings, vec![0]);
    }

    #[test]
    fn unused_vertex_output_is_fine() {
        let linked = link(vs(VS_COLOR), fs(FS_FLAT)).unwrap();
        assert!(linked.varyings.is_empty());
    }

    #[test]
    fn missing_varying_fails() {
        let flat_vs = r#"
@vertex
fn vs_main(@location(0) position: vec3<f32>) -> @builtin(position) vec4<f32> {
    return vec4<f32>(position, 1.0);
}
"#;
        let log = link_log(flat_vs, FS_COLOR);
        assert!(log.contains("@location(0) is not written"), "{log}");
    }

    #[test]
    fn varying_type_mismatch_fails() {
        let fs_vec2 = r#"
@fragment
fn fs_main(@location(0) tint: vec2<f32>) -> @location(0) vec4<f32> {
    return vec4<f32>(tint, 0.0, 1.0);
}
"#;
        let log = link_log(VS_COLOR, fs_vec2);
        assert!(log.contains("vertex writes vec3<f32>, fragment reads vec2<f32>"), "{log}");
    }

    #[test]
    fn unknown_vertex_attribute_fails() {
        let vs_uv = r#"
@vertex
fn vs_main(
    @location(0) position: vec3<f32>,
    @location(1) uv: vec2<f32>,
) -> @builtin(position) vec4<f32> {
    return vec4<f32>(position.xy + uv, position.z, 1.0);
}
"#;
        let log = link_log(vs_uv, FS_FLAT);
        assert!(log.contains("@location(1) has no matching vertex attribute"), "{log}");
    }

    #[test]
    fn integer_attribute_input_fails() {
        let vs_uint = r#"
@vertex
fn vs_main(@location(0) position: vec3<u32>) -> @builtin(position) vec4<f32> {
    return vec4<f32>(vec3<f32>(position), 1.0);
}
"#;
        let log = link_log(vs_uint, FS_FLAT);
        assert!(log.contains("is vec3<u32>, vertex attribute is Float32x3"), "{log}");
    }

    #[test]
    fn wider_float_input_is_filled() {
        let vs_vec4 = r#"
@vertex
fn vs_main(@location(0) position: vec4<f32>) -> @builtin(position) vec4<f32> {
    return position;
}
"#;
        assert!(link(vs(vs_vec4), fs(FS_FLAT)).is_ok());
    }

    #[test]
    fn extra_color_output_fails() {
        let fs_mrt = r#"
struct Targets {
    @location(0) color: vec4<f32>,
    @location(1) glow: vec4<f32>,
};

@fragment
fn fs_main() -> Targets {
    var t: Targets;
    t.color = vec4<f32>(1.0);
    t.glow = vec4<f32>(0.0);
    return t;
}
"#;
        let log = link_log(VS_COLOR, fs_mrt);
        assert!(log.contains("@location(1) has no color target"), "{log}");
    }

    #[test]
    fn fragment_without_color_output_fails() {
        let fs_silent = r#"
@fragment
fn fs_main() {}
"#;
        let log = link_log(VS_COLOR, fs_silent);
        assert!(log.contains("does not write color @location(0)"), "{log}");
    }

    #[test]
    fn integer_color_output_fails() {
        let fs_uint = r#"
@fragment
fn fs_main() -> @location(0) vec4<u32> {
    return vec4<u32>(255u, 128u, 51u, 255u);
}
"#;
        let log = link_log(VS_COLOR, fs_uint);
        assert!(log.contains("is vec4<u32>, color targets need f32 components"), "{log}");
    }

    #[test]
    fn interpolation_mismatch_fails() {
        let vs_flat = r#"
struct Out {
    @builtin(position) pos: vec4<f32>,
    @location(0) @interpolate(flat) tint: vec3<f32>,
};

@vertex
fn vs_main(@location(0) position: vec3<f32>) -> Out {
    var out: Out;
    out.pos = vec4<f32>(position, 1.0);
    out.tint = position;
    return out;
}
"#;
        let log = link_log(vs_flat, FS_COLOR);
        assert!(log.contains("@location(0) interpolation mismatch"), "{log}");
        assert!(log.contains("vertex flat"), "{log}");
    }

    #[test]
    fn matching_flat_varyings_link() {
        let vs_flat = r#"
struct Out {
    @builtin(position) pos: vec4<f32>,
    @location(0) @interpolate(flat) tint: vec3<f32>,
};

@vertex
fn vs_main(@location(0) position: vec3<f32>) -> Out {
    var out: Out;
    out.pos = vec4<f32>(position, 1.0);
    out.tint = position;
    return out;
}
"#;
        let fs_flat = r#"
@fragment
fn fs_main(@location(0) @interpolate(flat) tint: vec3<f32>) -> @location(0) vec4<f32> {
    return vec4<f32>(tint, 1.0);
}
"#;
        assert!(link(vs(vs_flat), fs(fs_flat)).is_ok());
    }

    #[test]
    fn describes_common_types() {
        let v = TypeInner::Vector {
            size: VectorSize::Quad,
            scalar: naga::Scalar::F32,
        };
        assert_eq!(describe(&v), "vec4<f32>");
        assert_eq!(describe(&TypeInner::Scalar(naga::Scalar::U32)), "u32");
    }
}
