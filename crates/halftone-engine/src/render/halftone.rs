use std::collections::{HashMap, HashSet};
use std::num::NonZeroU64;

use wgpu::util::DeviceExt;

use crate::animation::SceneView;
use crate::material::{HalftoneUniforms, MaterialHandle};
use crate::scene::{GeometryId, MeshData};

use super::{CameraUniform, PartUniform, RenderCtx, RenderTarget};

pub const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

/// Minimum part capacity of the dynamic transform buffer.
const MIN_PART_CAPACITY: usize = 16;

struct GpuMesh {
    vbo: wgpu::Buffer,
    ibo: wgpu::Buffer,
    index_count: u32,
}

struct DepthTarget {
    view: wgpu::TextureView,
    size: (u32, u32),
}

/// Draws every mesh part of a [`SceneView`] with the halftone program.
///
/// The material uniform block is uploaded only when its revision changes.
#[derive(Default)]
pub struct HalftoneRenderer {
    pipeline_format: Option<wgpu::TextureFormat>,
    pipeline: Option<wgpu::RenderPipeline>,

    material_bgl: Option<wgpu::BindGroupLayout>,
    camera_bgl: Option<wgpu::BindGroupLayout>,
    part_bgl: Option<wgpu::BindGroupLayout>,

    material_ubo: Option<wgpu::Buffer>,
    material_bind_group: Option<wgpu::BindGroup>,
    uploaded_revision: Option<u64>,

    camera_ubo: Option<wgpu::Buffer>,
    camera_bind_group: Option<wgpu::BindGroup>,

    part_ubo: Option<wgpu::Buffer>,
    part_bind_group: Option<wgpu::BindGroup>,
    part_capacity: usize,
    part_stride: u64,

    depth: Option<DepthTarget>,
    meshes: HashMap<GeometryId, GpuMesh>,
}

impl HalftoneRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clears `target` to `view.clear_color` and draws every part.
    pub fn render(&mut self, ctx: &RenderCtx<'_>, target: &mut RenderTarget<'_>, view: &SceneView<'_>) {
        self.ensure_pipeline(ctx, view.material);
        self.ensure_bindings(ctx);
        self.ensure_depth(ctx, target.size);

        self.write_material_uniform(ctx, view.material);
        if let Some(ubo) = self.camera_ubo.as_ref() {
            let camera = CameraUniform::from_camera(view.camera);
            ctx.queue.write_buffer(ubo, 0, bytemuck::bytes_of(&camera));
        }

        // One transform slot per part, in draw order.
        let mut draws: Vec<(GeometryId, PartUniform)> = Vec::new();
        let mut live: HashSet<GeometryId> = HashSet::new();
        for object in view.objects {
            let object_model = object.model_matrix();
            for part in &object.parts {
                debug_assert!(part.material.ptr_eq(view.material));
                let id = part.geometry.id;
                self.ensure_mesh(ctx, id, &part.geometry.data);
                live.insert(id);
                draws.push((id, PartUniform::from_model(object_model * part.local)));
            }
        }
        self.meshes.retain(|id, _| live.contains(id));

        self.ensure_part_capacity(ctx, draws.len());
        self.write_part_uniforms(ctx, &draws);

        let Some(pipeline) = self.pipeline.as_ref() else { return };
        let Some(material_bg) = self.material_bind_group.as_ref() else { return };
        let Some(camera_bg) = self.camera_bind_group.as_ref() else { return };
        let Some(part_bg) = self.part_bind_group.as_ref() else { return };
        let Some(depth) = self.depth.as_ref() else { return };

        let mut rpass = target.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("halftone pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: target.color_view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(view.clear_color.to_wgpu()),
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                view: &depth.view,
                depth_ops: Some(wgpu::Operations {
                    load: wgpu::LoadOp::Clear(1.0),
                    store: wgpu::StoreOp::Discard,
                }),
                stencil_ops: None,
            }),
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        });

        rpass.set_pipeline(pipeline);
        rpass.set_bind_group(0, material_bg, &[]);
        rpass.set_bind_group(1, camera_bg, &[]);

        for (slot, (id, _)) in draws.iter().enumerate() {
            let Some(mesh) = self.meshes.get(id) else { continue };
            let offset = (slot as u64 * self.part_stride) as wgpu::DynamicOffset;
            rpass.set_bind_group(2, part_bg, &[offset]);
            rpass.set_vertex_buffer(0, mesh.vbo.slice(..));
            rpass.set_index_buffer(mesh.ibo.slice(..), wgpu::IndexFormat::Uint32);
            rpass.draw_indexed(0..mesh.index_count, 0, 0..1);
        }
    }

    fn ensure_pipeline(&mut self, ctx: &RenderCtx<'_>, material: &MaterialHandle) {
        if self.pipeline_format == Some(ctx.surface_format) && self.pipeline.is_some() {
            return;
        }

        let sources = material.sources();
        let vertex = ctx.device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("halftone vertex shader"),
            source: wgpu::ShaderSource::Wgsl(sources.vertex),
        });
        let fragment = ctx.device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("halftone fragment shader"),
            source: wgpu::ShaderSource::Wgsl(sources.fragment),
        });

        let material_bgl = uniform_layout(
            ctx,
            "halftone material bgl",
            wgpu::ShaderStages::FRAGMENT,
            false,
            HalftoneUniforms::SIZE,
        );
        let camera_bgl = uniform_layout(
            ctx,
            "halftone camera bgl",
            wgpu::ShaderStages::VERTEX,
            false,
            std::mem::size_of::<CameraUniform>() as u64,
        );
        let part_bgl = uniform_layout(
            ctx,
            "halftone part bgl",
            wgpu::ShaderStages::VERTEX,
            true,
            std::mem::size_of::<PartUniform>() as u64,
        );

        let pipeline_layout = ctx.device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("halftone pipeline layout"),
            bind_group_layouts: &[&material_bgl, &camera_bgl, &part_bgl],
            immediate_size: 0,
        });

        let pipeline = ctx.device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("halftone pipeline"),
            layout: Some(&pipeline_layout),

            vertex: wgpu::VertexState {
                module: &vertex,
                entry_point: Some("vs_main"),
                compilation_options: Default::default(),
                buffers: &[crate::scene::Vertex::layout()],
            },

            fragment: Some(wgpu::FragmentState {
                module: &fragment,
                entry_point: Some("fs_main"),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: ctx.surface_format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),

            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: Some(wgpu::Face::Back),
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },

            depth_stencil: Some(wgpu::DepthStencilState {
                format: DEPTH_FORMAT,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState::default(),

            multiview_mask: None,
            cache: None,
        });

        self.pipeline_format = Some(ctx.surface_format);
        self.pipeline = Some(pipeline);
        self.material_bgl = Some(material_bgl);
        self.camera_bgl = Some(camera_bgl);
        self.part_bgl = Some(part_bgl);

        // Bind groups belong to the old layouts.
        self.material_bind_group = None;
        self.material_ubo = None;
        self.uploaded_revision = None;
        self.camera_bind_group = None;
        self.camera_ubo = None;
        self.part_bind_group = None;
        self.part_ubo = None;
        self.part_capacity = 0;
    }

    fn ensure_bindings(&mut self, ctx: &RenderCtx<'_>) {
        if self.material_bind_group.is_none() {
            if let Some(bgl) = self.material_bgl.as_ref() {
                let (ubo, bg) = uniform_binding(ctx, bgl, "halftone material", HalftoneUniforms::SIZE, None);
                self.material_ubo = Some(ubo);
                self.material_bind_group = Some(bg);
                self.uploaded_revision = None;
            }
        }

        if self.camera_bind_group.is_none() {
            if let Some(bgl) = self.camera_bgl.as_ref() {
                let size = std::mem::size_of::<CameraUniform>() as u64;
                let (ubo, bg) = uniform_binding(ctx, bgl, "halftone camera", size, None);
                self.camera_ubo = Some(ubo);
                self.camera_bind_group = Some(bg);
            }
        }
    }

    fn ensure_depth(&mut self, ctx: &RenderCtx<'_>, size: (u32, u32)) {
        let size = (size.0.max(1), size.1.max(1));
        if self.depth.as_ref().is_some_and(|d| d.size == size) {
            return;
        }

        let texture = ctx.device.create_texture(&wgpu::TextureDescriptor {
            label: Some("halftone depth"),
            size: wgpu::Extent3d { width: size.0, height: size.1, depth_or_array_layers: 1 },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: DEPTH_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        self.depth = Some(DepthTarget { view, size });
    }

    fn ensure_mesh(&mut self, ctx: &RenderCtx<'_>, id: GeometryId, data: &MeshData) {
        if self.meshes.contains_key(&id) {
            return;
        }

        let vbo = ctx.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("halftone mesh vbo"),
            contents: bytemuck::cast_slice(&data.vertices()),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let ibo = ctx.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("halftone mesh ibo"),
            contents: bytemuck::cast_slice(&data.indices),
            usage: wgpu::BufferUsages::INDEX,
        });

        log::debug!("uploaded geometry {:?} ({} triangles)", id, data.triangle_count());
        self.meshes.insert(id, GpuMesh { vbo, ibo, index_count: data.indices.len() as u32 });
    }

    fn write_material_uniform(&mut self, ctx: &RenderCtx<'_>, material: &MaterialHandle) {
        let revision = material.revision();
        if self.uploaded_revision == Some(revision) {
            return;
        }
        let Some(ubo) = self.material_ubo.as_ref() else { return };

        ctx.queue.write_buffer(ubo, 0, bytemuck::bytes_of(&material.uniforms()));
        self.uploaded_revision = Some(revision);
    }

    fn ensure_part_capacity(&mut self, ctx: &RenderCtx<'_>, required: usize) {
        if required <= self.part_capacity && self.part_bind_group.is_some() {
            return;
        }
        let Some(bgl) = self.part_bgl.as_ref() else { return };

        let alignment = ctx.device.limits().min_uniform_buffer_offset_alignment as u64;
        let stride = align_to(std::mem::size_of::<PartUniform>() as u64, alignment);
        let capacity = required.next_power_of_two().max(MIN_PART_CAPACITY);

        let (ubo, bg) = uniform_binding(
            ctx,
            bgl,
            "halftone parts",
            stride * capacity as u64,
            Some(std::mem::size_of::<PartUniform>() as u64),
        );

        self.part_stride = stride;
        self.part_capacity = capacity;
        self.part_ubo = Some(ubo);
        self.part_bind_group = Some(bg);
    }

    fn write_part_uniforms(&mut self, ctx: &RenderCtx<'_>, draws: &[(GeometryId, PartUniform)]) {
        let Some(ubo) = self.part_ubo.as_ref() else { return };
        if draws.is_empty() {
            return;
        }

        let stride = self.part_stride as usize;
        let mut bytes = vec![0u8; stride * draws.len()];
        for (slot, (_, part)) in draws.iter().enumerate() {
            let raw = bytemuck::bytes_of(part);
            bytes[slot * stride..slot * stride + raw.len()].copy_from_slice(raw);
        }
        ctx.queue.write_buffer(ubo, 0, &bytes);
    }
}

fn uniform_layout(
    ctx: &RenderCtx<'_>,
    label: &str,
    visibility: wgpu::ShaderStages,
    dynamic: bool,
    size: u64,
) -> wgpu::BindGroupLayout {
    ctx.device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some(label),
        entries: &[wgpu::BindGroupLayoutEntry {
            binding: 0,
            visibility,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: dynamic,
                min_binding_size: NonZeroU64::new(size),
            },
            count: None,
        }],
    })
}

/// Creates a uniform buffer of `size` bytes and a bind group over it.
///
/// `window` limits the bound range for dynamic-offset bindings.
fn uniform_binding(
    ctx: &RenderCtx<'_>,
    layout: &wgpu::BindGroupLayout,
    label: &str,
    size: u64,
    window: Option<u64>,
) -> (wgpu::Buffer, wgpu::BindGroup) {
    let ubo = ctx.device.create_buffer(&wgpu::BufferDescriptor {
        label: Some(label),
        size,
        usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    });

    let resource = match window {
        Some(bytes) => wgpu::BindingResource::Buffer(wgpu::BufferBinding {
            buffer: &ubo,
            offset: 0,
            size: NonZeroU64::new(bytes),
        }),
        None => ubo.as_entire_binding(),
    };

    let bind_group = ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some(label),
        layout,
        entries: &[wgpu::BindGroupEntry { binding: 0, resource }],
    });

    (ubo, bind_group)
}

#[inline]
fn align_to(value: u64, alignment: u64) -> u64 {
    let alignment = alignment.max(1);
    value.div_ceil(alignment) * alignment
}
