pub mod body;
pub mod camera;
pub mod clock;
pub mod drag;
pub mod error;
pub mod headless;
pub mod initialize;
pub mod render;
pub mod scene;
pub mod state;
pub mod universe;

pub use body::{radius_for_mass, Body};
pub use error::SimError;
pub use universe::Universe;

use error::Result;

/// Physical constants and spawn settings handed to a [`Universe`].
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SimConfig {
  /// Gravitational constant, scaled for pixel-space visuals.
  pub gravity: f64,
  /// Mass-to-radius scaling.
  pub density: f64,
  /// Mass given to bodies spawned by a drag gesture.
  pub spawn_mass: f64,
}

impl Default for SimConfig {
  fn default() -> Self {
    Self {
      gravity: 10000.0,
      density: 0.1,
      spawn_mass: 100.0,
    }
  }
}

impl SimConfig {
  pub fn validate(&self) -> Result<()> {
    if !self.gravity.is_finite() || self.gravity < 0.0 {
      return Err(SimError::InvalidConfig(format!(
        "gravity must be finite and non-negative, got {}",
        self.gravity
      )));
    }
    if !self.density.is_finite() || self.density <= 0.0 {
      return Err(SimError::InvalidConfig(format!(
        "density must be finite and positive, got {}",
        self.density
      )));
    }
    if !self.spawn_mass.is_finite() || self.spawn_mass <= 0.0 {
      return Err(SimError::InvalidConfig(format!(
        "spawn mass must be finite and positive, got {}",
        self.spawn_mass
      )));
    }
    Ok(())
  }
}

/// Layout of the randomly generated starting bodies.
#[derive(Copy, Clone, Debug)]
pub struct ScenarioParams {
  pub num_bodies: u32,
  pub seed: u64,
  pub center: [f64; 2],
  pub min_radius: f64,
  pub max_radius: f64,
  /// Standard deviation of the random velocity kick added to the orbit.
  pub velocity_jitter: f64,
}

impl Default for ScenarioParams {
  fn default() -> Self {
    Self {
      num_bodies: 0,
      seed: 42,
      center: [400.0, 300.0],
      min_radius: 60.0,
      max_radius: 250.0,
      velocity_jitter: 5.0,
    }
  }
}

pub struct CameraParams {
  /// Pan distance in pixels per frame while a key is held.
  pub speed: f32,
}

impl Default for CameraParams {
  fn default() -> Self {
    Self { speed: 8.0 }
  }
}

/// One instanced shape on the GPU: a capsule from `start` to `end`.
/// A circle is a capsule whose endpoints coincide.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ShapeInstance {
  pub start: [f32; 2],
  pub end: [f32; 2],
  pub radius: f32,
  pub color: [f32; 4],
}
