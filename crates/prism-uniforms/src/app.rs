use std::f32::consts::PI;

use anyhow::{Context, Result};
use glam::Vec2;
use winit::event::{ElementState, WindowEvent};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::WindowId;

use prism_engine::coords::Viewport;
use prism_engine::core::{App, AppControl, FrameCtx, InitCtx};
use prism_engine::paint::Color;
use prism_engine::render::{IndexedMesh, ShaderProgram, ShaderStage, UniformBuffer};

use crate::config::AppConfig;
use crate::mesh::{Vertex, INDICES, VERTICES};
use crate::uniforms::{
    ShadingUniform, TransformUniform, SHADING_BINDING, TRANSFORM_BINDING, UNIFORM_GROUP,
};

const CLEAR_COLOR: Color = Color::gray(0.81);

const MIX_STRENGTH: f32 = 0.5;
const MIX_COLOR: Color = Color::rgb(0.0, 0.0, 1.0);

const SCALE: Vec2 = Vec2::new(0.5, 0.5);
const TRANSLATION: Vec2 = Vec2::new(0.0, -0.25);
const ROTATION: f32 = PI / 6.0; // 30 degrees

/// GPU state built by `init`, read-only afterwards.
struct Scene {
    pipeline: wgpu::RenderPipeline,
    bind_group: wgpu::BindGroup,
    mesh: IndexedMesh,
    clear: Color,
    viewport: Viewport,

    // Referenced by `bind_group`; kept for the lifetime of the app.
    _shading: UniformBuffer<ShadingUniform>,
    _transform: UniformBuffer<TransformUniform>,
}

/// Draws the two-color house shape, shaded and placed by two uniform blocks.
pub struct UniformsApp {
    config: AppConfig,
    scene: Option<Scene>,
}

impl UniformsApp {
    pub fn new(config: AppConfig) -> Self {
        Self { config, scene: None }
    }
}

impl App for UniformsApp {
    fn init(&mut self, ctx: &mut InitCtx<'_, '_>) -> Result<()> {
        let device = ctx.device();

        let program = ShaderProgram::from_files(
            device,
            &[
                (ShaderStage::Vertex, &self.config.vertex_shader),
                (ShaderStage::Fragment, &self.config.fragment_shader),
            ],
        )
        .context("invalid program")?;

        let mesh = IndexedMesh::upload(device, "house", &VERTICES, &INDICES);

        let shading = UniformBuffer::new(
            device,
            "shading ubo",
            SHADING_BINDING,
            &ShadingUniform::new(MIX_STRENGTH, MIX_COLOR),
        );
        let transform = UniformBuffer::new(
            device,
            "transform ubo",
            TRANSFORM_BINDING,
            &TransformUniform::rotated(SCALE, TRANSLATION, ROTATION),
        );

        shading
            .check(program.reflection(), UNIFORM_GROUP)
            .context("shading block does not match the program")?;
        transform
            .check(program.reflection(), UNIFORM_GROUP)
            .context("transform block does not match the program")?;

        let bind_group_layout = program.bind_group_layout(device, UNIFORM_GROUP);
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("uniforms bind group"),
            layout: &bind_group_layout,
            entries: &[shading.entry(), transform.entry()],
        });

        let pipeline = create_pipeline(
            device,
            &program,
            &bind_group_layout,
            ctx.surface_format(),
        );

        let (width, height) = ctx.framebuffer_size();
        let viewport = Viewport::from_size(width, height);
        log::info!(
            "viewport {width}x{height} ({:.0}x{:.0} logical)",
            ctx.window.logical_size().0,
            ctx.window.logical_size().1,
        );

        self.scene = Some(Scene {
            pipeline,
            bind_group,
            mesh,
            clear: CLEAR_COLOR,
            viewport,
            _shading: shading,
            _transform: transform,
        });

        Ok(())
    }

    fn on_window_event(&mut self, _window_id: WindowId, event: &WindowEvent) -> AppControl {
        match event {
            WindowEvent::KeyboardInput { event, .. }
                if event.state == ElementState::Pressed
                    && event.physical_key == PhysicalKey::Code(KeyCode::Escape) =>
            {
                AppControl::Exit
            }
            _ => AppControl::Continue,
        }
    }

    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl {
        let Some(scene) = self.scene.as_ref() else {
            return AppControl::Continue;
        };

        let (width, height) = ctx.framebuffer_size();
        let viewport = scene.viewport.clamped_to(width, height);

        ctx.render(scene.clear, |pass| {
            // Minimized: nothing to draw into.
            let Some(vp) = viewport else { return };

            pass.set_viewport(vp.x, vp.y, vp.width, vp.height, 0.0, 1.0);
            pass.set_pipeline(&scene.pipeline);
            pass.set_bind_group(UNIFORM_GROUP, &scene.bind_group, &[]);
            scene.mesh.draw(pass);
        })
    }
}

fn create_pipeline(
    device: &wgpu::Device,
    program: &ShaderProgram,
    bind_group_layout: &wgpu::BindGroupLayout,
    format: wgpu::TextureFormat,
) -> wgpu::RenderPipeline {
    let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some("uniforms pipeline layout"),
        bind_group_layouts: &[bind_group_layout],
        immediate_size: 0,
    });

    let buffers = [Vertex::layout()];
    let targets = [Some(wgpu::ColorTargetState {
        format,
        blend: None,
        write_mask: wgpu::ColorWrites::ALL,
    })];

    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some("uniforms pipeline"),
        layout: Some(&layout),
        vertex: program.vertex_state(&buffers),
        fragment: Some(program.fragment_state(&targets)),
        primitive: wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::TriangleList,
            strip_index_format: None,
            front_face: wgpu::FrontFace::Ccw,
            cull_mode: None,
            polygon_mode: wgpu::PolygonMode::Fill,
            unclipped_depth: false,
            conservative: false,
        },
        depth_stencil: None,
        multisample: wgpu::MultisampleState::default(),
        multiview_mask: None,
        cache: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scene_constants() {
        assert_eq!(CLEAR_COLOR, Color::rgba(0.81, 0.81, 0.81, 1.0));
        assert_eq!(MIX_COLOR.to_rgb_array(), [0.0, 0.0, 1.0]);
        assert!((ROTATION.to_degrees() - 30.0).abs() < 1e-4);
    }

    #[test]
    fn shape_lands_below_center() {
        // The roof apex (0, 0.5) is scaled to (0, 0.25), rotated, then moved down.
        let t = TransformUniform::rotated(SCALE, TRANSLATION, ROTATION);
        let apex = t.apply(Vec2::new(0.0, 0.5));
        let expected = Vec2::new(-0.25 * ROTATION.sin(), 0.25 * ROTATION.cos() - 0.25);
        assert!((apex - expected).length() < 1e-6);
    }

    #[test]
    fn no_scene_before_init() {
        let app = UniformsApp::new(AppConfig::default());
        assert!(app.scene.is_none());
    }
}
