use anyhow::Context;

use prism_engine::core::{App, AppControl, FrameCtx};
use prism_engine::device::Gpu;
use prism_engine::input::{InputEvent, Key, KeyState};
use prism_engine::paint::Color;
use prism_engine::render::GpuMesh;
use prism_engine::shader::{ProgramSources, ShaderProgram};
use prism_engine::time::FrameStats;

use crate::cli::Shape;

pub const CLEAR_COLOR: Color = Color::rgb(0.2, 0.3, 0.3);

/// GPU resources created once the device exists.
struct Resources {
    program: ShaderProgram,
    quad: GpuMesh,
    triangle: GpuMesh,
}

impl Resources {
    fn mesh(&self, shape: Shape) -> &GpuMesh {
        match shape {
            Shape::Quad => &self.quad,
            Shape::Triangle => &self.triangle,
        }
    }
}

/// Draws one shape with one shader program until Escape or window close.
///
/// Keys: Space switches quad/triangle, W toggles wireframe.
pub struct TutorialApp {
    title: String,
    sources: ProgramSources,
    shape: Shape,
    wireframe: bool,
    warned_no_wireframe: bool,
    stats: FrameStats,
    resources: Option<Resources>,
}

impl TutorialApp {
    pub fn new(title: String, sources: ProgramSources, shape: Shape, wireframe: bool) -> Self {
        Self {
            title,
            sources,
            shape,
            wireframe,
            warned_no_wireframe: false,
            stats: FrameStats::default(),
            resources: None,
        }
    }

    fn handle_keys(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl {
        for ev in &ctx.input_frame.events {
            if let InputEvent::Key {
                key,
                state: KeyState::Pressed,
                code,
                repeat: false,
                ..
            } = ev
            {
                log::debug!("key pressed: {key} (code {code})");
            }
        }

        let pressed = |key| ctx.input_frame.pressed(key);
        let (escape, space, w) = (pressed(Key::Escape), pressed(Key::Space), pressed(Key::W));

        if escape {
            log::info!("escape pressed, closing");
            return AppControl::Exit;
        }

        let before = (self.shape, self.wireframe);

        if space {
            self.shape = self.shape.toggled();
            log::info!("shape: {:?}", self.shape);
        }

        if w {
            self.toggle_wireframe();
        }

        if before != (self.shape, self.wireframe) {
            ctx.runtime.set_title(self.window_title());
        }

        AppControl::Continue
    }

    fn window_title(&self) -> String {
        match (self.shape, self.wireframe) {
            (Shape::Quad, false) => self.title.clone(),
            (Shape::Quad, true) => format!("{} (wireframe)", self.title),
            (Shape::Triangle, false) => format!("{} (triangle)", self.title),
            (Shape::Triangle, true) => format!("{} (triangle, wireframe)", self.title),
        }
    }

    fn toggle_wireframe(&mut self) {
        let supported = self
            .resources
            .as_ref()
            .is_some_and(|r| r.program.supports_wireframe());

        if supported {
            self.wireframe = !self.wireframe;
            log::info!("wireframe: {}", self.wireframe);
        } else if !self.warned_no_wireframe {
            log::warn!("wireframe needs POLYGON_MODE_LINE, which this device lacks");
            self.warned_no_wireframe = true;
        }
    }
}

impl App for TutorialApp {
    fn on_gpu_ready(&mut self, gpu: &Gpu<'_>) -> anyhow::Result<()> {
        let program = ShaderProgram::build(gpu.device(), &self.sources, gpu.surface_format())
            .context("failed to build shader program")?;

        let line_mode = gpu.features().contains(wgpu::Features::POLYGON_MODE_LINE);
        if self.wireframe && !line_mode {
            log::warn!("wireframe requested but unsupported; drawing filled polygons");
            self.wireframe = false;
            self.warned_no_wireframe = true;
        }

        self.resources = Some(Resources {
            program,
            quad: GpuMesh::upload(gpu.device(), "quad", &Shape::Quad.mesh()),
            triangle: GpuMesh::upload(gpu.device(), "triangle", &Shape::Triangle.mesh()),
        });

        Ok(())
    }

    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl {
        if self.handle_keys(ctx) == AppControl::Exit {
            return AppControl::Exit;
        }

        if let Some(fps) = self.stats.record(ctx.time.dt) {
            log::debug!("frame {}: {fps:.1} fps", ctx.time.frame_index);
        }

        let Some(res) = self.resources.as_ref() else {
            return AppControl::Continue;
        };
        let pipeline = res.program.pipeline(self.wireframe);
        let mesh = res.mesh(self.shape);

        ctx.render(CLEAR_COLOR, |target| {
            let mut pass = target.begin_pass("prism mesh pass");
            pass.set_pipeline(pipeline);
            mesh.draw(&mut pass);
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn app() -> TutorialApp {
        TutorialApp::new("Window".into(), ProgramSources::builtin(), Shape::Quad, false)
    }

    #[test]
    fn title_reflects_mode() {
        let mut app = app();
        assert_eq!(app.window_title(), "Window");

        app.shape = Shape::Triangle;
        app.wireframe = true;
        assert_eq!(app.window_title(), "Window (triangle, wireframe)");
    }

    #[test]
    fn wireframe_toggle_needs_gpu_support() {
        let mut app = app();
        app.toggle_wireframe();
        assert!(!app.wireframe);
        assert!(app.warned_no_wireframe);
    }
}
