use wgpu::{Device, Queue, Surface};

use crate::chain::Chain;

pub mod chain;

pub trait Pass {
    fn draw(
        &mut self,
        surface: &Surface,
        device: &Device,
        queue: &Queue,
        chain: &Chain,
    ) -> Result<(), wgpu::SurfaceError>;
}

/// One small uniform buffer per drawn primitive, so each draw call in a
/// render pass can carry its own model matrix.
pub struct UniformPool {
    label: &'static str,
    pub buffers: Vec<wgpu::Buffer>,
    size: u64,
}

impl UniformPool {
    pub fn new(label: &'static str, size: u64) -> Self {
        Self {
            label,
            buffers: Vec::new(),
            size,
        }
    }

    /// Grow the pool to `count` buffers. Existing buffers are replaced,
    /// so any bind groups made from them must be rebuilt by the caller.
    pub fn alloc_buffers(&mut self, count: usize, device: &Device) {
        self.buffers = (0..count)
            .map(|_| {
                device.create_buffer(&wgpu::BufferDescriptor {
                    label: Some(self.label),
                    size: self.size,
                    usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
                    mapped_at_creation: false,
                })
            })
            .collect();
    }

    pub fn update_uniform<T: bytemuck::Pod>(&self, index: usize, data: T, queue: &Queue) {
        queue.write_buffer(&self.buffers[index], 0, bytemuck::bytes_of(&data));
    }
}
