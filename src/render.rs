use crate::scene::{Color, Surface};
use crate::ShapeInstance;
use cgmath::Vector2;
use std::borrow::Cow;
use wgpu::{util::DeviceExt, PipelineCompilationOptions};

const INITIAL_CAPACITY: usize = 256;
const CLEAR_COLOR: wgpu::Color = wgpu::Color {
  r: 0.02,
  g: 0.02,
  b: 0.05,
  a: 1.0,
};

/// Shapes queued for the next frame.
#[derive(Debug, Default)]
pub struct ShapeBatch {
  shapes: Vec<ShapeInstance>,
}

impl ShapeBatch {
  pub fn clear(&mut self) {
    self.shapes.clear();
  }

  pub fn shapes(&self) -> &[ShapeInstance] {
    &self.shapes
  }
}

fn to_f32(v: Vector2<f64>) -> [f32; 2] {
  [v.x as f32, v.y as f32]
}

impl Surface for ShapeBatch {
  fn draw_circle(&mut self, center: Vector2<f64>, radius: f64, color: Color) {
    let c = to_f32(center);
    self.shapes.push(ShapeInstance {
      start: c,
      end: c,
      radius: radius as f32,
      color,
    });
  }

  fn draw_line(&mut self, start: Vector2<f64>, end: Vector2<f64>, thickness: f64, color: Color) {
    self.shapes.push(ShapeInstance {
      start: to_f32(start),
      end: to_f32(end),
      radius: (thickness * 0.5) as f32,
      color,
    });
  }
}

pub struct Render {
  instance_buffer: wgpu::Buffer,
  instance_capacity: usize,
  vertices_buffer: wgpu::Buffer,
  render_pipeline: wgpu::RenderPipeline,
}

impl Render {
  #[must_use]
  pub fn init(
    config: &wgpu::SurfaceConfiguration,
    device: &wgpu::Device,
    camera_bind_group_layout: &wgpu::BindGroupLayout,
  ) -> Self {
    let draw_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
      label: Some("shape shader"),
      source: wgpu::ShaderSource::Wgsl(Cow::Borrowed(include_str!("shaders/draw.wgsl"))),
    });

    let render_pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
      label: Some("render"),
      bind_group_layouts: &[camera_bind_group_layout],
      push_constant_ranges: &[],
    });
    let instance_layout = wgpu::VertexBufferLayout {
      array_stride: std::mem::size_of::<ShapeInstance>() as wgpu::BufferAddress,
      step_mode: wgpu::VertexStepMode::Instance,
      attributes: &wgpu::vertex_attr_array![0 => Float32x2, 1 => Float32x2, 2 => Float32, 3 => Float32x4],
    };
    let vertex_layout = wgpu::VertexBufferLayout {
      array_stride: 2 * 4, // corner of the unit quad
      step_mode: wgpu::VertexStepMode::Vertex,
      attributes: &wgpu::vertex_attr_array![4 => Float32x2],
    };
    let render_pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
      label: Some("Render Pipeline"),
      layout: Some(&render_pipeline_layout),
      vertex: wgpu::VertexState {
        module: &draw_shader,
        entry_point: "main_vs",
        compilation_options: PipelineCompilationOptions::default(),
        buffers: &[instance_layout, vertex_layout],
      },
      fragment: Some(wgpu::FragmentState {
        module: &draw_shader,
        entry_point: "main_fs",
        compilation_options: PipelineCompilationOptions::default(),
        targets: &[Some(wgpu::ColorTargetState {
          format: config.view_formats[0],
          blend: Some(wgpu::BlendState::ALPHA_BLENDING),
          write_mask: wgpu::ColorWrites::ALL,
        })],
      }),
      primitive: wgpu::PrimitiveState::default(),
      depth_stencil: None,
      multisample: wgpu::MultisampleState::default(),
      multiview: None,
      cache: None,
    });

    // two triangles covering [0, 1] x [0, 1]
    let vertex_buffer_data: [f32; 12] = [
      0.0, 0.0, 1.0, 0.0, 1.0, 1.0, //
      0.0, 0.0, 1.0, 1.0, 0.0, 1.0,
    ];
    let vertices_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
      label: Some("Vertex Buffer"),
      contents: bytemuck::cast_slice(&vertex_buffer_data),
      usage: wgpu::BufferUsages::VERTEX,
    });

    Render {
      instance_buffer: create_instance_buffer(device, INITIAL_CAPACITY),
      instance_capacity: INITIAL_CAPACITY,
      vertices_buffer,
      render_pipeline,
    }
  }

  pub fn render(
    &mut self,
    view: &wgpu::TextureView,
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    camera_bind_group: &wgpu::BindGroup,
    shapes: &[ShapeInstance],
  ) {
    if shapes.len() > self.instance_capacity {
      let capacity = shapes.len().next_power_of_two();
      log::debug!("growing instance buffer to {capacity} shapes");
      self.instance_buffer = create_instance_buffer(device, capacity);
      self.instance_capacity = capacity;
    }
    if !shapes.is_empty() {
      queue.write_buffer(&self.instance_buffer, 0, bytemuck::cast_slice(shapes));
    }

    let color_attachments = [Some(wgpu::RenderPassColorAttachment {
      view,
      resolve_target: None,
      ops: wgpu::Operations {
        load: wgpu::LoadOp::Clear(CLEAR_COLOR),
        store: wgpu::StoreOp::Store,
      },
    })];
    let render_pass_descriptor = wgpu::RenderPassDescriptor {
      label: None,
      color_attachments: &color_attachments,
      depth_stencil_attachment: None,
      timestamp_writes: None,
      occlusion_query_set: None,
    };
    let mut command_encoder =
      device.create_command_encoder(&wgpu::CommandEncoderDescriptor { label: None });
    {
      let mut rpass = command_encoder.begin_render_pass(&render_pass_descriptor);
      rpass.set_pipeline(&self.render_pipeline);
      rpass.set_bind_group(0, camera_bind_group, &[]);
      rpass.set_vertex_buffer(0, self.instance_buffer.slice(..));
      rpass.set_vertex_buffer(1, self.vertices_buffer.slice(..));
      rpass.draw(0..6, 0..shapes.len() as u32);
    }
    queue.submit(Some(command_encoder.finish()));
  }
}

fn create_instance_buffer(device: &wgpu::Device, capacity: usize) -> wgpu::Buffer {
  device.create_buffer(&wgpu::BufferDescriptor {
    label: Some("Shape Instance Buffer"),
    size: (capacity * std::mem::size_of::<ShapeInstance>()) as wgpu::BufferAddress,
    usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
    mapped_at_creation: false,
  })
}
