use std::{collections::HashMap, mem};

use cgmath::{InnerSpace, Matrix4, Rad, Vector2};
use wgpu::{BindGroupLayout, Device, Queue, Surface};

use crate::{
    chain::Chain,
    context::create_render_pipeline,
    primitives::{
        point::point_vertices, segment::segment_vertices, DrawPrimitive, PrimitiveMesh,
        PrimitiveVertex, Vertex,
    },
};

use super::{Pass, UniformPool};

const POINT_COLOR: [f32; 4] = [1.0, 1.0, 1.0, 1.0];
const LINE_COLOR: [f32; 4] = [1.0, 1.0, 1.0, 1.0];

// Global uniform data
// aka the aspect-correction view matrix shared by both pipelines
#[repr(C)]
#[derive(Clone, Copy, bytemuck::Pod, bytemuck::Zeroable)]
struct Globals {
    view: [[f32; 4]; 4],
}

// Local uniform data
// aka one primitive's placement and color
#[repr(C)]
#[derive(Clone, Copy, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Locals {
    pub model: [[f32; 4]; 4],
    pub color: [f32; 4],
}

pub struct ChainPassConfig {
    /// Side length of the point quad, in the same screen-space units as
    /// node radii.
    pub point_size: f32,
    /// Whether to connect consecutive node positions with line segments.
    pub draw_lines: bool,
}

impl Default for ChainPassConfig {
    fn default() -> Self {
        Self {
            point_size: 0.025,
            draw_lines: false,
        }
    }
}

/// Walks a chain's accumulated positions and issues one point draw per
/// node, plus optional connecting lines, against the shared surface.
pub struct ChainPass {
    pub point_size: f32,
    pub draw_lines: bool,
    // Uniforms
    global_uniform_buffer: wgpu::Buffer,
    global_bind_group: wgpu::BindGroup,
    local_bind_group_layout: BindGroupLayout,
    point_uniforms: UniformPool,
    line_uniforms: UniformPool,
    point_bind_groups: HashMap<usize, wgpu::BindGroup>,
    line_bind_groups: HashMap<usize, wgpu::BindGroup>,
    // Render pipelines
    point_pipeline: wgpu::RenderPipeline,
    line_pipeline: wgpu::RenderPipeline,
    // Unit meshes, uploaded once
    point_mesh: PrimitiveMesh,
    segment_mesh: PrimitiveMesh,
}

impl ChainPass {
    pub fn new(
        chain_config: &ChainPassConfig,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        config: &wgpu::SurfaceConfiguration,
    ) -> ChainPass {
        // Setup the shaders
        // One module per primitive kind, mirroring the two fixed
        // vertex/fragment program pairs of the renderer design
        let point_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Point Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("../point.wgsl").into()),
        });
        let line_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Line Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("../line.wgsl").into()),
        });

        // Setup global uniforms
        let global_size = mem::size_of::<Globals>() as wgpu::BufferAddress;
        let global_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("[Chain] Globals"),
                entries: &[wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: wgpu::BufferSize::new(global_size),
                    },
                    count: None,
                }],
            });
        let globals = Globals {
            view: aspect_matrix(config).into(),
        };
        let global_uniform_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("[Chain] Globals"),
            size: global_size,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let global_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("[Chain] Globals"),
            layout: &global_bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: global_uniform_buffer.as_entire_binding(),
            }],
        });

        // Setup local uniforms
        let local_size = mem::size_of::<Locals>() as wgpu::BufferAddress;
        let local_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("[Chain] Locals"),
                entries: &[wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: wgpu::BufferSize::new(local_size),
                    },
                    count: None,
                }],
            });

        // Setup the render pipelines
        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("[Chain] Pipeline"),
            bind_group_layouts: &[&global_bind_group_layout, &local_bind_group_layout],
            push_constant_ranges: &[],
        });
        let vertex_buffers = [PrimitiveVertex::desc()];
        let point_pipeline = create_render_pipeline(
            device,
            "[Chain] Point Pipeline",
            &pipeline_layout,
            config.format,
            &vertex_buffers,
            &point_shader,
            wgpu::PrimitiveTopology::TriangleList,
        );
        let line_pipeline = create_render_pipeline(
            device,
            "[Chain] Line Pipeline",
            &pipeline_layout,
            config.format,
            &vertex_buffers,
            &line_shader,
            wgpu::PrimitiveTopology::LineList,
        );

        let point_mesh = PrimitiveMesh::new(device, "Point Mesh", &point_vertices());
        let segment_mesh = PrimitiveMesh::new(device, "Segment Mesh", &segment_vertices());

        queue.write_buffer(&global_uniform_buffer, 0, bytemuck::bytes_of(&globals));

        ChainPass {
            point_size: chain_config.point_size,
            draw_lines: chain_config.draw_lines,
            global_uniform_buffer,
            global_bind_group,
            local_bind_group_layout,
            point_uniforms: UniformPool::new("[Chain] Point Locals", local_size),
            line_uniforms: UniformPool::new("[Chain] Line Locals", local_size),
            point_bind_groups: Default::default(),
            line_bind_groups: Default::default(),
            point_pipeline,
            line_pipeline,
            point_mesh,
            segment_mesh,
        }
    }

    /// Keep circles circular when the surface is resized.
    pub fn resize(&mut self, queue: &Queue, config: &wgpu::SurfaceConfiguration) {
        let globals = Globals {
            view: aspect_matrix(config).into(),
        };
        queue.write_buffer(&self.global_uniform_buffer, 0, bytemuck::bytes_of(&globals));
    }
}

/// Compress x by the surface aspect ratio so a unit of screen space is
/// the same physical length on both axes.
fn aspect_matrix(config: &wgpu::SurfaceConfiguration) -> Matrix4<f32> {
    let aspect = config.width as f32 / config.height as f32;
    Matrix4::from_nonuniform_scale(1.0 / aspect, 1.0, 1.0)
}

/// Model matrix placing the unit point quad: translate to the node's
/// accumulated position, scale to the configured point size.
fn point_transform(position: Vector2<f32>, size: f32) -> Matrix4<f32> {
    Matrix4::from_translation(position.extend(0.0))
        * Matrix4::from_nonuniform_scale(size, size, 1.0)
}

/// Model matrix stretching the unit x-axis segment between two
/// accumulated positions: translate to the start, rotate toward the
/// end, scale x by the separation.
fn segment_transform(start: Vector2<f32>, end: Vector2<f32>) -> Matrix4<f32> {
    let delta = end - start;
    let length = delta.magnitude();
    let angle = delta.y.atan2(delta.x);
    Matrix4::from_translation(start.extend(0.0))
        * Matrix4::from_angle_z(Rad(angle))
        * Matrix4::from_nonuniform_scale(length, 1.0, 1.0)
}

impl Pass for ChainPass {
    fn draw(
        &mut self,
        surface: &Surface,
        device: &Device,
        queue: &Queue,
        chain: &Chain,
    ) -> Result<(), wgpu::SurfaceError> {
        let output = surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        // The accumulation walk restarts from the chain origin here on
        // every draw call; the walk never writes back into the chain
        let positions = chain.positions();

        // Allocate buffers for local uniforms
        // Node count is fixed at construction, so this runs once
        if self.point_uniforms.buffers.len() < positions.len() {
            self.point_uniforms.alloc_buffers(positions.len(), device);
            self.line_uniforms.alloc_buffers(positions.len(), device);
            // Old bind groups point at the replaced buffers
            self.point_bind_groups.clear();
            self.line_bind_groups.clear();
        }

        // One bind group per pooled buffer, created lazily and reused
        for index in 0..positions.len() {
            let point_buffer = &self.point_uniforms.buffers[index];
            self.point_bind_groups.entry(index).or_insert_with(|| {
                device.create_bind_group(&wgpu::BindGroupDescriptor {
                    label: Some("[Chain] Point Locals"),
                    layout: &self.local_bind_group_layout,
                    entries: &[wgpu::BindGroupEntry {
                        binding: 0,
                        resource: point_buffer.as_entire_binding(),
                    }],
                })
            });
            let line_buffer = &self.line_uniforms.buffers[index];
            self.line_bind_groups.entry(index).or_insert_with(|| {
                device.create_bind_group(&wgpu::BindGroupDescriptor {
                    label: Some("[Chain] Line Locals"),
                    layout: &self.local_bind_group_layout,
                    entries: &[wgpu::BindGroupEntry {
                        binding: 0,
                        resource: line_buffer.as_entire_binding(),
                    }],
                })
            });
        }

        // Write this frame's transforms into the pools
        for (index, position) in positions.iter().enumerate() {
            self.point_uniforms.update_uniform(
                index,
                Locals {
                    model: point_transform(*position, self.point_size).into(),
                    color: POINT_COLOR,
                },
                queue,
            );
        }
        if self.draw_lines {
            // Segment i runs from the previous accumulated position
            // (the origin for i = 0) to position i
            let mut start = chain.origin;
            for (index, position) in positions.iter().enumerate() {
                self.line_uniforms.update_uniform(
                    index,
                    Locals {
                        model: segment_transform(start, *position).into(),
                        color: LINE_COLOR,
                    },
                    queue,
                );
                start = *position;
            }
        }

        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("Render Encoder"),
        });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                        store: true,
                    },
                })],
                depth_stencil_attachment: None,
            });

            // Lines first so points sit on top of the joints
            if self.draw_lines {
                render_pass.set_pipeline(&self.line_pipeline);
                for index in 0..positions.len() {
                    render_pass.draw_primitive(
                        &self.segment_mesh,
                        &self.global_bind_group,
                        &self.line_bind_groups[&index],
                    );
                }
            }

            // Draw order follows node order
            render_pass.set_pipeline(&self.point_pipeline);
            for index in 0..positions.len() {
                render_pass.draw_primitive(
                    &self.point_mesh,
                    &self.global_bind_group,
                    &self.point_bind_groups[&index],
                );
            }
        }

        queue.submit(Some(encoder.finish()));
        output.present();

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use cgmath::Vector4;

    const EPS: f32 = 1e-5;

    #[test]
    fn point_transform_centers_quad_on_position() {
        let model = point_transform(Vector2::new(0.3, -0.4), 0.05);
        let center = model * Vector4::new(0.0, 0.0, 0.0, 1.0);
        assert_relative_eq!(center.x, 0.3, epsilon = EPS);
        assert_relative_eq!(center.y, -0.4, epsilon = EPS);

        // A quad corner lands half the point size away from the center
        let corner = model * Vector4::new(0.5, 0.5, 0.0, 1.0);
        assert_relative_eq!(corner.x, 0.3 + 0.025, epsilon = EPS);
        assert_relative_eq!(corner.y, -0.4 + 0.025, epsilon = EPS);
    }

    #[test]
    fn segment_transform_spans_both_endpoints() {
        let start = Vector2::new(0.1, 0.2);
        let end = Vector2::new(-0.3, 0.6);
        let model = segment_transform(start, end);

        let p0 = model * Vector4::new(0.0, 0.0, 0.0, 1.0);
        let p1 = model * Vector4::new(1.0, 0.0, 0.0, 1.0);
        assert_relative_eq!(p0.x, start.x, epsilon = EPS);
        assert_relative_eq!(p0.y, start.y, epsilon = EPS);
        assert_relative_eq!(p1.x, end.x, epsilon = EPS);
        assert_relative_eq!(p1.y, end.y, epsilon = EPS);
    }

    #[test]
    fn degenerate_segment_collapses_to_a_point() {
        let p = Vector2::new(0.25, 0.25);
        let model = segment_transform(p, p);
        let p1 = model * Vector4::new(1.0, 0.0, 0.0, 1.0);
        assert_relative_eq!(p1.x, p.x, epsilon = EPS);
        assert_relative_eq!(p1.y, p.y, epsilon = EPS);
    }
}
