use bytemuck::{Pod, Zeroable};

use super::common::{buffer_entry, storage_entry, uniform_entry};
use super::{PresentationView, RenderCtx, RenderTarget};

#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
struct PresentUniform {
    image: [u32; 2],
    surface: [f32; 2],
}

/// Blits the presentation buffer onto the swapchain.
///
/// Pipeline and bindings are built lazily and rebuilt when the surface format
/// or the presentation buffer changes.
#[derive(Default)]
pub struct PresentRenderer {
    pipeline_format: Option<wgpu::TextureFormat>,
    pipeline: Option<wgpu::RenderPipeline>,
    bind_group_layout: Option<wgpu::BindGroupLayout>,
    uniform: Option<wgpu::Buffer>,

    bind_group: Option<wgpu::BindGroup>,
    bound_generation: Option<u64>,
}

impl PresentRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Draws `view`, or clears to black when there is nothing to show yet.
    pub fn render(
        &mut self,
        ctx: &RenderCtx<'_>,
        target: &mut RenderTarget<'_>,
        view: Option<PresentationView<'_>>,
    ) {
        self.ensure_pipeline(ctx);
        if let Some(view) = view.as_ref() {
            self.ensure_bindings(ctx, view);
            self.write_uniform(ctx, view);
        }

        let mut rpass = target.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("lumen present pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: target.color_view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        });

        if view.is_none() {
            return;
        }
        let Some(pipeline) = self.pipeline.as_ref() else { return };
        let Some(bind_group) = self.bind_group.as_ref() else { return };

        rpass.set_pipeline(pipeline);
        rpass.set_bind_group(0, bind_group, &[]);
        rpass.draw(0..3, 0..1);
    }

    fn ensure_pipeline(&mut self, ctx: &RenderCtx<'_>) {
        if self.pipeline_format == Some(ctx.surface_format) && self.pipeline.is_some() {
            return;
        }

        let shader = ctx.device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("lumen present shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/present.wgsl").into()),
        });

        let stage = wgpu::ShaderStages::FRAGMENT;
        let bind_group_layout =
            ctx.device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("lumen present bgl"),
                entries: &[
                    uniform_entry(0, stage, std::mem::size_of::<PresentUniform>() as u64),
                    storage_entry(1, stage, true),
                ],
            });

        let pipeline_layout = ctx.device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("lumen present pipeline layout"),
            bind_group_layouts: &[&bind_group_layout],
            immediate_size: 0,
        });

        let pipeline = ctx.device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("lumen present pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                compilation_options: Default::default(),
                buffers: &[],
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: ctx.surface_format,
                    blend: None,
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),
            primitive: wgpu::PrimitiveState::default(),
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview_mask: None,
            cache: None,
        });

        self.pipeline_format = Some(ctx.surface_format);
        self.pipeline = Some(pipeline);
        self.bind_group_layout = Some(bind_group_layout);
        self.bind_group = None;
        self.bound_generation = None;
    }

    fn ensure_bindings(&mut self, ctx: &RenderCtx<'_>, view: &PresentationView<'_>) {
        if self.bind_group.is_some() && self.bound_generation == Some(view.generation) {
            return;
        }
        let Some(bgl) = self.bind_group_layout.as_ref() else { return };

        let uniform = self.uniform.get_or_insert_with(|| {
            ctx.device.create_buffer(&wgpu::BufferDescriptor {
                label: Some("lumen present ubo"),
                size: std::mem::size_of::<PresentUniform>() as u64,
                usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
                mapped_at_creation: false,
            })
        });

        self.bind_group = Some(ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("lumen present bind group"),
            layout: bgl,
            entries: &[buffer_entry(0, uniform), buffer_entry(1, view.buffer)],
        }));
        self.bound_generation = Some(view.generation);
    }

    fn write_uniform(&self, ctx: &RenderCtx<'_>, view: &PresentationView<'_>) {
        let Some(ubo) = self.uniform.as_ref() else { return };
        let (w, h) = ctx.surface_size;
        ctx.queue.write_buffer(
            ubo,
            0,
            bytemuck::bytes_of(&PresentUniform {
                image: [view.resolution.width, view.resolution.height],
                surface: [w.max(1) as f32, h.max(1) as f32],
            }),
        );
    }
}
