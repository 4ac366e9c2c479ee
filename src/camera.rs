use cgmath::{SquareMatrix, Vector2};
use winit::{
  event::{ElementState, KeyEvent, WindowEvent},
  keyboard::{KeyCode, PhysicalKey},
};

#[rustfmt::skip]
pub const OPENGL_TO_WGPU_MATRIX: cgmath::Matrix4<f32> = cgmath::Matrix4::new(
    1.0, 0.0, 0.0, 0.0,
    0.0, 1.0, 0.0, 0.0,
    0.0, 0.0, 0.5, 0.5,
    0.0, 0.0, 0.0, 1.0,
);

/// Orthographic view in pixel units with y pointing down, panned by `offset`.
pub struct Camera {
  pub offset: Vector2<f32>,
  pub width: f32,
  pub height: f32,
}

impl Camera {
  pub fn new(width: u32, height: u32) -> Self {
    Self {
      offset: Vector2::new(0.0, 0.0),
      width: width.max(1) as f32,
      height: height.max(1) as f32,
    }
  }

  pub fn resize(&mut self, width: u32, height: u32) {
    self.width = width.max(1) as f32;
    self.height = height.max(1) as f32;
  }

  /// World position under a cursor given in window pixels.
  pub fn screen_to_world(&self, x: f64, y: f64) -> Vector2<f64> {
    Vector2::new(x + f64::from(self.offset.x), y + f64::from(self.offset.y))
  }

  fn build_view_projection_matrix(&self) -> cgmath::Matrix4<f32> {
    let left = self.offset.x;
    let top = self.offset.y;
    let proj = cgmath::ortho(left, left + self.width, top + self.height, top, -1.0, 1.0);
    OPENGL_TO_WGPU_MATRIX * proj
  }
}

#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub struct CameraUniform {
  view_proj: [[f32; 4]; 4],
}

impl CameraUniform {
  pub fn new() -> Self {
    Self {
      view_proj: cgmath::Matrix4::identity().into(),
    }
  }

  pub fn update_view_proj(&mut self, camera: &Camera) {
    self.view_proj = camera.build_view_projection_matrix().into();
  }
}

impl Default for CameraUniform {
  fn default() -> Self {
    Self::new()
  }
}

pub struct CameraController {
  speed: f32,
  is_up_pressed: bool,
  is_down_pressed: bool,
  is_left_pressed: bool,
  is_right_pressed: bool,
}

impl CameraController {
  pub fn init(speed: f32) -> Self {
    Self {
      speed,
      is_up_pressed: false,
      is_down_pressed: false,
      is_left_pressed: false,
      is_right_pressed: false,
    }
  }

  pub fn process_events(&mut self, event: &WindowEvent) -> bool {
    match event {
      WindowEvent::KeyboardInput {
        event:
          KeyEvent {
            state,
            physical_key: PhysicalKey::Code(keycode),
            ..
          },
        ..
      } => {
        let is_pressed = *state == ElementState::Pressed;
        match keycode {
          KeyCode::KeyW | KeyCode::ArrowUp => {
            self.is_up_pressed = is_pressed;
            true
          }
          KeyCode::KeyA | KeyCode::ArrowLeft => {
            self.is_left_pressed = is_pressed;
            true
          }
          KeyCode::KeyS | KeyCode::ArrowDown => {
            self.is_down_pressed = is_pressed;
            true
          }
          KeyCode::KeyD | KeyCode::ArrowRight => {
            self.is_right_pressed = is_pressed;
            true
          }
          _ => false,
        }
      }
      _ => false,
    }
  }

  pub fn update_camera(&self, camera: &mut Camera) {
    if self.is_up_pressed {
      camera.offset.y -= self.speed;
    }
    if self.is_down_pressed {
      camera.offset.y += self.speed;
    }
    if self.is_left_pressed {
      camera.offset.x -= self.speed;
    }
    if self.is_right_pressed {
      camera.offset.x += self.speed;
    }
  }
}
