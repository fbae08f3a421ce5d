use std::borrow::Cow;

use super::link::link_error;
use super::{compile, link, LinkedProgram, ProgramSources, ShaderError, ShaderStage};
use crate::render::Vertex;

/// A linked shader program turned into wgpu render pipelines.
///
/// Always has a filled-polygon pipeline. A line (wireframe) pipeline exists
/// when the device was created with `Features::POLYGON_MODE_LINE`.
pub struct ShaderProgram {
    fill: wgpu::RenderPipeline,
    wireframe: Option<wgpu::RenderPipeline>,
}

impl ShaderProgram {
    /// Compiles, links and builds pipelines targeting `surface_format`.
    pub fn build(
        device: &wgpu::Device,
        sources: &ProgramSources,
        surface_format: wgpu::TextureFormat,
    ) -> Result<Self, ShaderError> {
        let vertex = compile(ShaderStage::Vertex, &sources.vertex)?;
        let fragment = compile(ShaderStage::Fragment, &sources.fragment)?;
        let linked = link(vertex, fragment)?;
        Self::from_linked(device, &linked, surface_format)
    }

    /// Builds pipelines for an already linked program.
    ///
    /// wgpu validation errors raised while creating the modules or pipelines
    /// are captured and returned as `ShaderError::Link`.
    pub fn from_linked(
        device: &wgpu::Device,
        linked: &LinkedProgram,
        surface_format: wgpu::TextureFormat,
    ) -> Result<Self, ShaderError> {
        let label = format!("{} + {}", linked.vertex.label, linked.fragment.label);

        let scope = device.push_error_scope(wgpu::ErrorFilter::Validation);

        let vs_module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some(linked.vertex.label.as_str()),
            source: wgpu::ShaderSource::Wgsl(Cow::Borrowed(linked.vertex.source.as_str())),
        });
        let fs_module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some(linked.fragment.label.as_str()),
            source: wgpu::ShaderSource::Wgsl(Cow::Borrowed(linked.fragment.source.as_str())),
        });

        let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("prism program layout"),
            bind_group_layouts: &[],
            immediate_size: 0,
        });

        let stages = PipelineStages {
            layout: &layout,
            vs_module: &vs_module,
            fs_module: &fs_module,
            linked,
            surface_format,
        };

        let fill = stages.create(device, wgpu::PolygonMode::Fill);
        let wireframe = device
            .features()
            .contains(wgpu::Features::POLYGON_MODE_LINE)
            .then(|| stages.create(device, wgpu::PolygonMode::Line));

        if let Some(err) = pollster::block_on(scope.pop()) {
            return Err(link_error(vec![format!("{label}: {err}")]));
        }

        // Shader modules are released here; the pipelines keep what they need.
        log::debug!(
            "shader program ready: {label} (wireframe: {})",
            wireframe.is_some()
        );

        Ok(Self { fill, wireframe })
    }

    pub fn supports_wireframe(&self) -> bool {
        self.wireframe.is_some()
    }

    /// Pipeline for the requested polygon mode.
    ///
    /// Falls back to the fill pipeline when wireframe is unsupported.
    pub fn pipeline(&self, wireframe: bool) -> &wgpu::RenderPipeline {
        match (&self.wireframe, wireframe) {
            (Some(line), true) => line,
            _ => &self.fill,
        }
    }
}

struct PipelineStages<'a> {
    layout: &'a wgpu::PipelineLayout,
    vs_module: &'a wgpu::ShaderModule,
    fs_module: &'a wgpu::ShaderModule,
    linked: &'a LinkedProgram,
    surface_format: wgpu::TextureFormat,
}

impl PipelineStages<'_> {
    fn create(
        &self,
        device: &wgpu::Device,
        polygon_mode: wgpu::PolygonMode,
    ) -> wgpu::RenderPipeline {
        let label = match polygon_mode {
            wgpu::PolygonMode::Fill => "prism fill pipeline",
            _ => "prism wireframe pipeline",
        };

        device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some(label),
            layout: Some(self.layout),

            vertex: wgpu::VertexState {
                module: self.vs_module,
                entry_point: Some(self.linked.vertex_entry()),
                compilation_options: Default::default(),
                buffers: &[Vertex::layout()],
            },

            fragment: Some(wgpu::FragmentState {
                module: self.fs_module,
                entry_point: Some(self.linked.fragment_entry()),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: self.surface_format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),

            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                polygon_mode,
                unclipped_depth: false,
                conservative: false,
            },

            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview_mask: None,
            cache: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shader::ShaderSource;

    const FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Bgra8Unorm;

    fn device(features: wgpu::Features) -> wgpu::Device {
        let (device, _queue) = wgpu::Device::noop(&wgpu::DeviceDescriptor {
            required_features: features,
            ..Default::default()
        });
        device
    }

    #[test]
    fn builtin_program_builds() {
        let program = ShaderProgram::build(
            &device(wgpu::Features::empty()),
            &ProgramSources::builtin(),
            FORMAT,
        )
        .unwrap();

        assert!(!program.supports_wireframe());
        // Without a line pipeline both modes draw filled.
        assert_eq!(program.pipeline(true), program.pipeline(false));
    }

    #[test]
    fn line_pipeline_with_polygon_mode_line() {
        let program = ShaderProgram::build(
            &device(wgpu::Features::POLYGON_MODE_LINE),
            &ProgramSources::builtin(),
            FORMAT,
        )
        .unwrap();

        assert!(program.supports_wireframe());
        assert_ne!(program.pipeline(true), program.pipeline(false));
    }

    #[test]
    fn pipeline_errors_are_returned_not_raised() {
        // Links cleanly, but uses an f16 output the device did not enable.
        let sources = ProgramSources {
            vertex: ProgramSources::builtin().vertex,
            fragment: ShaderSource::new(
                "half.frag",
                r#"
enable f16;

@fragment
fn fs_main() -> @location(0) vec4<f32> {
    let c = vec4<f16>(1.0h, 0.5h, 0.2h, 1.0h);
    return vec4<f32>(c);
}
"#,
            ),
        };

        match ShaderProgram::build(&device(wgpu::Features::empty()), &sources, FORMAT) {
            Err(ShaderError::Link { log }) => assert!(log.contains("half.frag"), "{log}"),
            Err(other) => panic!("expected a link error, got {other:?}"),
            Ok(_) => panic!("expected a link error"),
        }
    }
}
