use crate::body::{radius_for_mass, Body};
use crate::error::{Result, SimError};
use crate::SimConfig;
use cgmath::{Vector2, Zero};

/// Owns every body and advances them together, one step at a time.
#[derive(Clone, Debug)]
pub struct Universe {
  config: SimConfig,
  bodies: Vec<Body>,
}

impl Universe {
  pub fn new(config: SimConfig) -> Result<Self> {
    Self::with_bodies(config, Vec::new())
  }

  /// Builds a universe around existing bodies. Every body must have been
  /// created with `config.density`, so its radius matches its mass here.
  pub fn with_bodies(config: SimConfig, bodies: Vec<Body>) -> Result<Self> {
    config.validate()?;
    if let Some(body) = bodies
      .iter()
      .find(|b| b.radius() != radius_for_mass(b.mass(), config.density))
    {
      return Err(SimError::InvalidConfig(format!(
        "body of mass {} has radius {}, expected density {}",
        body.mass(),
        body.radius(),
        config.density
      )));
    }
    Ok(Self { config, bodies })
  }

  pub fn config(&self) -> &SimConfig {
    &self.config
  }

  pub fn spawn(&mut self, mass: f64, position: Vector2<f64>, velocity: Vector2<f64>) -> Result<()> {
    let body = Body::new(mass, position, velocity, self.config.density)?;
    self.bodies.push(body);
    Ok(())
  }

  /// Spawns a body with the configured spawn mass.
  pub fn spawn_default(&mut self, position: Vector2<f64>, velocity: Vector2<f64>) -> Result<()> {
    self.spawn(self.config.spawn_mass, position, velocity)
  }

  /// Advances the universe by `dt` seconds.
  ///
  /// Every ordered pair is visited before any position moves, so each pull
  /// is computed from the positions at the start of the step.
  pub fn step(&mut self, dt: f64) {
    let gravity = self.config.gravity;
    let n = self.bodies.len();
    let mut skipped = 0usize;

    for i in 0..n {
      for j in 0..n {
        if i == j {
          continue;
        }
        let other = self.bodies[j];
        if self.bodies[i].accelerate(dt, &other, gravity).is_err() {
          skipped += 1;
        }
      }
    }

    for body in self.bodies.iter_mut() {
      body.integrate_position(dt);
    }

    if skipped > 0 {
      log::trace!("skipped {skipped} degenerate body pairs");
    }
  }

  pub fn for_each_body<F: FnMut(&Body)>(&self, f: F) {
    self.bodies.iter().for_each(f);
  }

  pub fn bodies(&self) -> &[Body] {
    &self.bodies
  }

  pub fn len(&self) -> usize {
    self.bodies.len()
  }

  pub fn is_empty(&self) -> bool {
    self.bodies.is_empty()
  }

  pub fn total_momentum(&self) -> Vector2<f64> {
    self
      .bodies
      .iter()
      .fold(Vector2::zero(), |acc, body| acc + body.momentum())
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use approx::assert_relative_eq;

  fn v(x: f64, y: f64) -> Vector2<f64> {
    Vector2::new(x, y)
  }

  #[test]
  fn spawn_appends_in_order() {
    let mut universe = Universe::new(SimConfig::default()).unwrap();
    universe.spawn(10.0, v(1.0, 0.0), v(0.0, 0.0)).unwrap();
    universe.spawn_default(v(2.0, 0.0), v(0.0, 0.0)).unwrap();

    let xs: Vec<f64> = universe.bodies().iter().map(|b| b.position().x).collect();
    assert_eq!(xs, vec![1.0, 2.0]);
    assert_eq!(universe.bodies()[1].mass(), 100.0);
  }

  #[test]
  fn rejects_invalid_config() {
    for config in [
      SimConfig { density: 0.0, ..Default::default() },
      SimConfig { density: -0.1, ..Default::default() },
      SimConfig { spawn_mass: 0.0, ..Default::default() },
    ] {
      assert!(matches!(Universe::new(config), Err(SimError::InvalidConfig(_))));
    }
  }

  #[test]
  fn with_bodies_requires_matching_density() {
    let config = SimConfig::default();
    let matching = Body::new(100.0, v(0.0, 0.0), v(0.0, 0.0), config.density).unwrap();
    let universe = Universe::with_bodies(config, vec![matching]).unwrap();
    assert_eq!(universe.len(), 1);

    let foreign = Body::new(100.0, v(0.0, 0.0), v(0.0, 0.0), 2.0).unwrap();
    assert!(matches!(
      Universe::with_bodies(config, vec![matching, foreign]),
      Err(SimError::InvalidConfig(_))
    ));
  }

  #[test]
  fn spawn_rejects_invalid_mass() {
    let mut universe = Universe::new(SimConfig::default()).unwrap();
    assert_eq!(
      universe.spawn(0.0, v(0.0, 0.0), v(0.0, 0.0)),
      Err(SimError::InvalidMass(0.0))
    );
    assert!(universe.is_empty());
  }

  #[test]
  fn empty_step_is_noop() {
    let mut universe = Universe::new(SimConfig::default()).unwrap();
    universe.step(0.016);
    assert!(universe.is_empty());
  }

  #[test]
  fn lone_body_drifts() {
    let mut universe = Universe::new(SimConfig::default()).unwrap();
    universe.spawn(100.0, v(10.0, 10.0), v(2.0, -1.0)).unwrap();
    universe.step(0.5);

    let body = universe.bodies()[0];
    assert_relative_eq!(body.position().x, 11.0);
    assert_relative_eq!(body.position().y, 9.5);
    assert_eq!(body.velocity(), v(2.0, -1.0));
  }

  #[test]
  fn velocities_update_before_positions() {
    // With a fused loop the second body would see the first one already moved.
    let mut universe = Universe::new(SimConfig::default()).unwrap();
    universe.spawn(100.0, v(0.0, 0.0), v(0.0, 0.0)).unwrap();
    universe.spawn(100.0, v(100.0, 0.0), v(0.0, 0.0)).unwrap();
    universe.step(0.01);

    let a = universe.bodies()[0];
    let b = universe.bodies()[1];
    assert_relative_eq!(a.velocity().x, 1.0, epsilon = 1e-12);
    assert_relative_eq!(b.velocity().x, -1.0, epsilon = 1e-12);
  }

  #[test]
  fn for_each_body_visits_all() {
    let mut universe = Universe::new(SimConfig::default()).unwrap();
    for i in 0..5 {
      universe.spawn(1.0 + i as f64, v(i as f64 * 10.0, 0.0), v(0.0, 0.0)).unwrap();
    }
    let mut total_mass = 0.0;
    universe.for_each_body(|b| total_mass += b.mass());
    assert_relative_eq!(total_mass, 15.0);
  }
}
