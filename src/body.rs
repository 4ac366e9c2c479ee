use crate::error::{Result, SimError};
use cgmath::{InnerSpace, Vector2};
use std::f64::consts::PI;

/// Radius of a body of `mass` at the given `density`.
pub fn radius_for_mass(mass: f64, density: f64) -> f64 {
  (mass / (0.75 * PI * density)).cbrt()
}

/// A circular point mass. Mass (and so radius) is fixed once created.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Body {
  mass: f64,
  radius: f64,
  position: Vector2<f64>,
  velocity: Vector2<f64>,
}

impl Body {
  pub fn new(
    mass: f64,
    position: Vector2<f64>,
    velocity: Vector2<f64>,
    density: f64,
  ) -> Result<Self> {
    if !mass.is_finite() || mass <= 0.0 {
      return Err(SimError::InvalidMass(mass));
    }
    Ok(Self {
      mass,
      radius: radius_for_mass(mass, density),
      position,
      velocity,
    })
  }

  /// Applies the pull of `other` to this body's velocity over `dt`.
  ///
  /// Position is left alone, and so is `other`. Returns
  /// [`SimError::DegenerateDistance`] without touching the velocity when the
  /// two bodies coincide or the resulting change is not finite.
  pub fn accelerate(&mut self, dt: f64, other: &Body, gravity: f64) -> Result<()> {
    let d = other.position - self.position;
    let dist2 = d.magnitude2();
    if dist2 == 0.0 {
      return Err(SimError::DegenerateDistance);
    }
    let accel = gravity * other.mass * dt / dist2;
    let delta = d / dist2.sqrt() * accel;
    if !(delta.x.is_finite() && delta.y.is_finite()) {
      return Err(SimError::DegenerateDistance);
    }
    self.velocity += delta;
    Ok(())
  }

  /// Explicit Euler position update. Call only after every `accelerate`
  /// of the step has been applied.
  pub fn integrate_position(&mut self, dt: f64) {
    self.position += self.velocity * dt;
  }

  pub fn mass(&self) -> f64 {
    self.mass
  }

  pub fn radius(&self) -> f64 {
    self.radius
  }

  pub fn position(&self) -> Vector2<f64> {
    self.position
  }

  pub fn velocity(&self) -> Vector2<f64> {
    self.velocity
  }

  pub fn momentum(&self) -> Vector2<f64> {
    self.velocity * self.mass
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use approx::assert_relative_eq;

  const DENSITY: f64 = 0.1;

  fn body_at(x: f64, y: f64, mass: f64) -> Body {
    Body::new(mass, Vector2::new(x, y), Vector2::new(0.0, 0.0), DENSITY).unwrap()
  }

  #[test]
  fn radius_follows_density_formula() {
    let body = body_at(0.0, 0.0, 100.0);
    let expected = (100.0 / (0.75 * PI * DENSITY)).cbrt();
    assert_relative_eq!(body.radius(), expected, epsilon = 1e-12);
    assert_relative_eq!(body.radius(), radius_for_mass(100.0, DENSITY), epsilon = 1e-12);
  }

  #[test]
  fn radius_grows_with_mass() {
    let masses = [0.001, 0.5, 1.0, 10.0, 100.0, 1e4, 1e8];
    for pair in masses.windows(2) {
      assert!(radius_for_mass(pair[0], DENSITY) < radius_for_mass(pair[1], DENSITY));
    }
  }

  #[test]
  fn rejects_non_positive_mass() {
    for mass in [0.0, -1.0, f64::NAN, f64::INFINITY] {
      let result = Body::new(mass, Vector2::new(0.0, 0.0), Vector2::new(0.0, 0.0), DENSITY);
      assert!(matches!(result, Err(SimError::InvalidMass(_))));
    }
  }

  #[test]
  fn accelerate_pulls_toward_other() {
    let mut a = body_at(0.0, 0.0, 100.0);
    let b = body_at(100.0, 0.0, 100.0);
    a.accelerate(0.01, &b, 10000.0).unwrap();

    // G * m * dt / d^2 = 10000 * 100 * 0.01 / 10000
    assert_relative_eq!(a.velocity().x, 1.0, epsilon = 1e-12);
    assert_eq!(a.velocity().y, 0.0);
    assert_eq!(a.position(), Vector2::new(0.0, 0.0));
    assert_eq!(b.velocity(), Vector2::new(0.0, 0.0));
  }

  #[test]
  fn accelerate_scales_with_inverse_square() {
    let mut near = body_at(0.0, 0.0, 1.0);
    let mut far = body_at(0.0, 0.0, 1.0);
    near.accelerate(1.0, &body_at(0.0, 10.0, 1.0), 1.0).unwrap();
    far.accelerate(1.0, &body_at(0.0, 20.0, 1.0), 1.0).unwrap();
    assert_relative_eq!(near.velocity().y / far.velocity().y, 4.0, epsilon = 1e-12);
  }

  #[test]
  fn coincident_bodies_are_skipped() {
    let mut a = body_at(5.0, 5.0, 100.0);
    let b = body_at(5.0, 5.0, 100.0);
    assert_eq!(a.accelerate(0.01, &b, 10000.0), Err(SimError::DegenerateDistance));
    assert_eq!(a.velocity(), Vector2::new(0.0, 0.0));
  }

  #[test]
  fn near_coincident_bodies_are_skipped() {
    // dist2 underflows to a subnormal, so the pull overflows to infinity
    let mut a = body_at(0.0, 0.0, 100.0);
    let b = body_at(1e-160, 0.0, 100.0);
    assert_eq!(a.accelerate(0.01, &b, 10000.0), Err(SimError::DegenerateDistance));
    assert_eq!(a.velocity(), Vector2::new(0.0, 0.0));
  }

  #[test]
  fn integrate_moves_along_velocity() {
    let mut body = Body::new(1.0, Vector2::new(1.0, 2.0), Vector2::new(3.0, -4.0), DENSITY).unwrap();
    body.integrate_position(0.5);
    assert_relative_eq!(body.position().x, 2.5);
    assert_relative_eq!(body.position().y, 0.0);
  }
}
