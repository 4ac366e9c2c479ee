use crate::camera::{Camera, CameraController, CameraUniform};
use crate::clock::FrameClock;
use crate::drag::{DragState, SpawnRequest};
use crate::error::SimError;
use crate::render::{Render, ShapeBatch};
use crate::scene::draw_scene;
use crate::universe::Universe;
use crate::CameraParams;
use cgmath::Vector2;
use std::sync::Arc;
use std::time::Instant;
use thiserror::Error;
use wgpu::util::DeviceExt;
use winit::keyboard::*;
use winit::{
  dpi::PhysicalSize,
  error::{EventLoopError, OsError},
  event::{ElementState, Event, KeyEvent, MouseButton, WindowEvent},
  event_loop::{EventLoop, EventLoopWindowTarget},
  window::Window,
};

pub const WINDOW_WIDTH: u32 = 800;
pub const WINDOW_HEIGHT: u32 = 600;

#[derive(Debug, Error)]
pub enum AppError {
  #[error("event loop error: {0}")]
  EventLoop(#[from] EventLoopError),

  #[error("failed to create window: {0}")]
  Window(#[from] OsError),

  #[error("failed to create surface: {0}")]
  CreateSurface(#[from] wgpu::CreateSurfaceError),

  #[error("no suitable graphics adapter found")]
  NoAdapter,

  #[error("surface is not supported by the adapter")]
  UnsupportedSurface,

  #[error("failed to request device: {0}")]
  RequestDevice(#[from] wgpu::RequestDeviceError),

  #[error(transparent)]
  Sim(#[from] SimError),
}

struct EventLoopWrapper {
  event_loop: EventLoop<()>,
  window: Arc<Window>,
}

impl EventLoopWrapper {
  pub fn new(title: &str) -> Result<Self, AppError> {
    let event_loop = EventLoop::new()?;
    let builder = winit::window::WindowBuilder::new()
      .with_title(title)
      .with_inner_size(PhysicalSize::new(WINDOW_WIDTH, WINDOW_HEIGHT));
    let window = Arc::new(builder.build(&event_loop)?);

    Ok(Self { event_loop, window })
  }
}

struct SurfaceWrapper {
  surface: wgpu::Surface<'static>,
  config: wgpu::SurfaceConfiguration,
}

impl SurfaceWrapper {
  fn resize(&mut self, device: &wgpu::Device, size: PhysicalSize<u32>) {
    self.config.width = size.width.max(1);
    self.config.height = size.height.max(1);
    self.surface.configure(device, &self.config);
  }

  fn acquire(&mut self, device: &wgpu::Device) -> Option<wgpu::SurfaceTexture> {
    match self.surface.get_current_texture() {
      Ok(frame) => Some(frame),
      Err(wgpu::SurfaceError::Timeout) => {
        log::warn!("timed out acquiring surface texture, skipping frame");
        None
      }
      Err(wgpu::SurfaceError::Outdated | wgpu::SurfaceError::Lost) => {
        self.surface.configure(device, &self.config);
        match self.surface.get_current_texture() {
          Ok(frame) => Some(frame),
          Err(e) => {
            log::error!("surface lost after reconfigure: {e}");
            None
          }
        }
      }
      Err(wgpu::SurfaceError::OutOfMemory) => {
        log::error!("out of memory acquiring surface texture");
        None
      }
    }
  }
}

struct State {
  device: wgpu::Device,
  queue: wgpu::Queue,
  surface: SurfaceWrapper,
  camera: Camera,
  camera_uniform: CameraUniform,
  camera_buffer: wgpu::Buffer,
  camera_bind_group: wgpu::BindGroup,
  camera_controller: CameraController,
  render: Render,
}

impl State {
  fn input(&mut self, event: &WindowEvent) -> bool {
    self.camera_controller.process_events(event)
  }

  fn update(&mut self) {
    self.camera_controller.update_camera(&mut self.camera);
    self.camera_uniform.update_view_proj(&self.camera);
    self.queue.write_buffer(
      &self.camera_buffer,
      0,
      bytemuck::cast_slice(&[self.camera_uniform]),
    );
  }

  fn resize(&mut self, size: PhysicalSize<u32>) {
    self.surface.resize(&self.device, size);
    self.camera.resize(size.width, size.height);
  }

  fn draw(&mut self, shapes: &ShapeBatch) {
    let Some(frame) = self.surface.acquire(&self.device) else {
      return;
    };
    let view = frame.texture.create_view(&wgpu::TextureViewDescriptor {
      format: Some(self.surface.config.view_formats[0]),
      ..wgpu::TextureViewDescriptor::default()
    });
    self.render.render(
      &view,
      &self.device,
      &self.queue,
      &self.camera_bind_group,
      shapes.shapes(),
    );
    frame.present();
  }

  async fn init(window: Arc<Window>, camera_params: &CameraParams) -> Result<Self, AppError> {
    let instance = wgpu::Instance::new(wgpu::InstanceDescriptor {
      #[cfg(not(target_arch = "wasm32"))]
      backends: wgpu::Backends::PRIMARY,
      ..Default::default()
    });
    let size = window.inner_size();
    let surface = instance.create_surface(window)?;

    let adapter = instance
      .request_adapter(&wgpu::RequestAdapterOptions {
        power_preference: wgpu::PowerPreference::default(),
        compatible_surface: Some(&surface),
        force_fallback_adapter: false,
      })
      .await
      .ok_or(AppError::NoAdapter)?;
    log::info!("using adapter {:?}", adapter.get_info().name);

    let (device, queue) = adapter
      .request_device(
        &wgpu::DeviceDescriptor {
          label: None,
          required_features: wgpu::Features::empty(),
          required_limits: wgpu::Limits::default(),
          memory_hints: Default::default(),
        },
        None,
      )
      .await?;

    let mut config = surface
      .get_default_config(&adapter, size.width.max(1), size.height.max(1))
      .ok_or(AppError::UnsupportedSurface)?;
    let view_format = config.format.add_srgb_suffix();
    config.view_formats.push(view_format);
    surface.configure(&device, &config);

    let camera = Camera::new(size.width, size.height);
    let mut camera_uniform = CameraUniform::new();
    camera_uniform.update_view_proj(&camera);

    let camera_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
      label: Some("Camera Buffer"),
      contents: bytemuck::cast_slice(&[camera_uniform]),
      usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
    });
    let camera_bind_group_layout =
      device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        entries: &[wgpu::BindGroupLayoutEntry {
          binding: 0,
          visibility: wgpu::ShaderStages::VERTEX,
          ty: wgpu::BindingType::Buffer {
            ty: wgpu::BufferBindingType::Uniform,
            has_dynamic_offset: false,
            min_binding_size: None,
          },
          count: None,
        }],
        label: Some("camera_bind_group_layout"),
      });
    let camera_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
      layout: &camera_bind_group_layout,
      entries: &[wgpu::BindGroupEntry {
        binding: 0,
        resource: camera_buffer.as_entire_binding(),
      }],
      label: Some("camera_bind_group"),
    });
    let render = Render::init(&config, &device, &camera_bind_group_layout);

    Ok(Self {
      device,
      queue,
      surface: SurfaceWrapper { surface, config },
      camera,
      camera_uniform,
      camera_buffer,
      camera_bind_group,
      camera_controller: CameraController::init(camera_params.speed),
      render,
    })
  }
}

/// Simulation state the window drives: bodies, the pending drag and timing.
struct Sandbox {
  universe: Universe,
  drag: DragState,
  clock: FrameClock,
  batch: ShapeBatch,
  paused: bool,
}

impl Sandbox {
  fn spawn(&mut self, request: SpawnRequest) {
    match self.universe.spawn_default(request.position, request.velocity) {
      Ok(()) => log::info!(
        "spawned body at ({:.1}, {:.1}) with velocity ({:.1}, {:.1}), {} bodies",
        request.position.x,
        request.position.y,
        request.velocity.x,
        request.velocity.y,
        self.universe.len()
      ),
      Err(e) => log::error!("failed to spawn body: {e}"),
    }
  }

  fn toggle_pause(&mut self) {
    self.paused = !self.paused;
    if !self.paused {
      self.clock.reset();
    }
    log::info!("simulation {}", if self.paused { "paused" } else { "resumed" });
  }

  fn frame(&mut self) {
    let dt = self.clock.tick(Instant::now());
    if !self.paused {
      self.universe.step(dt);
    }
    self.batch.clear();
    draw_scene(&self.universe, &self.drag, &mut self.batch);
  }
}

async fn start(universe: Universe, max_dt: Option<f64>) -> Result<(), AppError> {
  let clock = FrameClock::new(max_dt)?;
  let window_loop = EventLoopWrapper::new("Gravity Sandbox")?;
  let mut context = State::init(window_loop.window.clone(), &CameraParams::default()).await?;
  let mut sandbox = Sandbox {
    universe,
    drag: DragState::default(),
    clock,
    batch: ShapeBatch::default(),
    paused: false,
  };
  let mut cursor = Vector2::new(0.0, 0.0);
  let window = window_loop.window;

  window_loop.event_loop.run(move |event, target: &EventLoopWindowTarget<()>| match event {
    Event::WindowEvent { event, window_id } if window_id == window.id() => {
      if context.input(&event) {
        return;
      }
      match event {
        WindowEvent::CloseRequested
        | WindowEvent::KeyboardInput {
          event:
            KeyEvent {
              state: ElementState::Pressed,
              physical_key: PhysicalKey::Code(KeyCode::Escape),
              ..
            },
          ..
        } => target.exit(),
        WindowEvent::KeyboardInput {
          event:
            KeyEvent {
              state: ElementState::Pressed,
              physical_key: PhysicalKey::Code(KeyCode::Space),
              repeat: false,
              ..
            },
          ..
        } => sandbox.toggle_pause(),
        WindowEvent::Resized(size) => context.resize(size),
        WindowEvent::CursorMoved { position, .. } => {
          cursor = context.camera.screen_to_world(position.x, position.y);
          sandbox.drag.move_to(cursor);
        }
        WindowEvent::MouseInput {
          state,
          button: MouseButton::Left,
          ..
        } => match state {
          ElementState::Pressed => sandbox.drag.press(cursor),
          ElementState::Released => {
            if let Some(request) = sandbox.drag.release(cursor) {
              sandbox.spawn(request);
            }
          }
        },
        WindowEvent::CursorLeft { .. } => {
          if let Some(request) = sandbox.drag.finish() {
            sandbox.spawn(request);
          }
        }
        WindowEvent::RedrawRequested => {
          context.update();
          sandbox.frame();
          context.draw(&sandbox.batch);
        }
        _ => {}
      }
    }
    Event::AboutToWait => window.request_redraw(),
    _ => {}
  })?;
  Ok(())
}

/// Opens the window and runs the simulation until it is closed.
pub fn run(universe: Universe, max_dt: Option<f64>) -> Result<(), AppError> {
  log::info!("starting window with {} bodies", universe.len());
  pollster::block_on(start(universe, max_dt))
}
