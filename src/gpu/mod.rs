//! wgpu upload of packed particle buffers.
//!
//! One vertex buffer per attribute, stepped per instance, so a renderer can
//! draw `draw_count` instances of a point sprite quad. Only the valid prefix
//! is written each frame.
//!
//! | Location | Attribute | Format |
//! |----------|-----------|--------|
//! | 0 | position | `Float32x3` |
//! | 1 | color | `Float32x3` |
//! | 2 | rotation | `Float32` |
//! | 3 | size | `Float32` |
//! | 4 | alpha | `Float32` |

use crate::buffers::{Attribute, ParticleBuffers};
use crate::profile::BlendMode;

const POSITION_ATTRS: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![0 => Float32x3];
const COLOR_ATTRS: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![1 => Float32x3];
const ROTATION_ATTRS: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![2 => Float32];
const SIZE_ATTRS: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![3 => Float32];
const ALPHA_ATTRS: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![4 => Float32];

const FLOAT_SIZE: wgpu::BufferAddress = std::mem::size_of::<f32>() as wgpu::BufferAddress;

fn attributes(attr: Attribute) -> &'static [wgpu::VertexAttribute] {
    match attr {
        Attribute::Position => &POSITION_ATTRS,
        Attribute::Color => &COLOR_ATTRS,
        Attribute::Rotation => &ROTATION_ATTRS,
        Attribute::Size => &SIZE_ATTRS,
        Attribute::Alpha => &ALPHA_ATTRS,
    }
}

/// Per-instance vertex layout for one attribute.
pub fn vertex_layout(attr: Attribute) -> wgpu::VertexBufferLayout<'static> {
    wgpu::VertexBufferLayout {
        array_stride: attr.components() as wgpu::BufferAddress * FLOAT_SIZE,
        step_mode: wgpu::VertexStepMode::Instance,
        attributes: attributes(attr),
    }
}

/// Layouts for every attribute, in the same order as [`Attribute::ALL`].
pub fn vertex_layouts() -> [wgpu::VertexBufferLayout<'static>; 5] {
    Attribute::ALL.map(vertex_layout)
}

/// Blend state matching a profile's blend hint.
pub fn blend_state(mode: BlendMode) -> wgpu::BlendState {
    match mode {
        BlendMode::Additive => wgpu::BlendState {
            color: wgpu::BlendComponent {
                src_factor: wgpu::BlendFactor::SrcAlpha,
                dst_factor: wgpu::BlendFactor::One,
                operation: wgpu::BlendOperation::Add,
            },
            alpha: wgpu::BlendComponent {
                src_factor: wgpu::BlendFactor::One,
                dst_factor: wgpu::BlendFactor::One,
                operation: wgpu::BlendOperation::Add,
            },
        },
        BlendMode::Regular | BlendMode::Unknown => wgpu::BlendState::ALPHA_BLENDING,
    }
}

/// GPU-side copies of the five attribute arrays.
pub struct ParticleVertexBuffers {
    buffers: [wgpu::Buffer; 5],
    capacity: usize,
    instance_count: u32,
}

impl ParticleVertexBuffers {
    /// Allocate vertex buffers for `capacity` particles.
    pub fn new(device: &wgpu::Device, capacity: usize) -> Self {
        let buffers = Attribute::ALL.map(|attr| {
            let size = (capacity * attr.components()) as wgpu::BufferAddress * FLOAT_SIZE;
            device.create_buffer(&wgpu::BufferDescriptor {
                label: Some(attr.name()),
                size: size.max(FLOAT_SIZE),
                usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
                mapped_at_creation: false,
            })
        });
        Self {
            buffers,
            capacity,
            instance_count: 0,
        }
    }

    /// Copy the valid prefix of `packed` and remember its draw count.
    ///
    /// Anything past the GPU capacity is left out.
    pub fn upload(&mut self, queue: &wgpu::Queue, packed: &ParticleBuffers) {
        let count = packed.draw_count().min(self.capacity);
        for (attr, buffer) in Attribute::ALL.iter().zip(&self.buffers) {
            let floats = &packed.valid(*attr)[..count * attr.components()];
            if !floats.is_empty() {
                queue.write_buffer(buffer, 0, bytemuck::cast_slice(floats));
            }
        }
        self.instance_count = count as u32;
    }

    pub fn buffer(&self, attr: Attribute) -> &wgpu::Buffer {
        &self.buffers[attr as usize]
    }

    /// Instances to draw after the last upload.
    #[inline]
    pub fn instance_count(&self) -> u32 {
        self.instance_count
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Bind every attribute buffer to slots `0..5`.
    pub fn bind<'a>(&'a self, pass: &mut wgpu::RenderPass<'a>) {
        for (slot, buffer) in self.buffers.iter().enumerate() {
            pass.set_vertex_buffer(slot as u32, buffer.slice(..));
        }
    }
}
