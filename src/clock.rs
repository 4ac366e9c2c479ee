use crate::error::{Result, SimError};
use std::time::Instant;

/// Rejects a time step that is not a finite, positive number of seconds.
pub fn check_time_step(name: &str, dt: f64) -> Result<()> {
  if !dt.is_finite() || dt <= 0.0 {
    return Err(SimError::InvalidConfig(format!(
      "{name} must be finite and positive, got {dt}"
    )));
  }
  Ok(())
}

/// Turns frame timestamps into simulation time steps.
#[derive(Debug, Clone, Default)]
pub struct FrameClock {
  last: Option<Instant>,
  max_dt: Option<f64>,
}

impl FrameClock {
  pub fn new(max_dt: Option<f64>) -> Result<Self> {
    if let Some(max) = max_dt {
      check_time_step("max dt", max)?;
    }
    Ok(Self { last: None, max_dt })
  }

  /// Seconds since the previous tick. The first tick after construction or
  /// [`reset`](Self::reset) has nothing to measure against and yields `0.0`.
  pub fn tick(&mut self, now: Instant) -> f64 {
    let dt = match self.last {
      Some(last) => now.saturating_duration_since(last).as_secs_f64(),
      None => 0.0,
    };
    self.last = Some(now);
    match self.max_dt {
      Some(max) => dt.min(max),
      None => dt,
    }
  }

  pub fn reset(&mut self) {
    self.last = None;
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use approx::assert_relative_eq;
  use std::time::Duration;

  #[test]
  fn first_tick_is_zero() {
    let mut clock = FrameClock::new(None).unwrap();
    assert_eq!(clock.tick(Instant::now()), 0.0);
  }

  #[test]
  fn measures_elapsed_seconds() {
    let start = Instant::now();
    let mut clock = FrameClock::new(None).unwrap();
    clock.tick(start);
    let dt = clock.tick(start + Duration::from_millis(16));
    assert_relative_eq!(dt, 0.016, epsilon = 1e-9);
  }

  #[test]
  fn clamps_to_max_dt() {
    let start = Instant::now();
    let mut clock = FrameClock::new(Some(0.05)).unwrap();
    clock.tick(start);
    assert_eq!(clock.tick(start + Duration::from_secs(3)), 0.05);
  }

  #[test]
  fn rejects_bad_max_dt() {
    for max in [-0.5, 0.0, f64::NAN, f64::INFINITY] {
      assert!(matches!(FrameClock::new(Some(max)), Err(SimError::InvalidConfig(_))));
    }
  }

  #[test]
  fn tick_is_never_negative_with_max_dt() {
    let start = Instant::now();
    let mut clock = FrameClock::new(Some(0.5)).unwrap();
    clock.tick(start);
    assert!(clock.tick(start + Duration::from_millis(16)) >= 0.0);
  }

  #[test]
  fn check_time_step_accepts_positive_finite() {
    assert!(check_time_step("dt", 0.01).is_ok());
    for dt in [0.0, -0.01, f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
      assert!(matches!(check_time_step("dt", dt), Err(SimError::InvalidConfig(_))));
    }
  }

  #[test]
  fn backwards_time_never_goes_negative() {
    let start = Instant::now();
    let mut clock = FrameClock::new(None).unwrap();
    clock.tick(start + Duration::from_millis(10));
    assert_eq!(clock.tick(start), 0.0);
  }

  #[test]
  fn reset_restarts_measurement() {
    let start = Instant::now();
    let mut clock = FrameClock::new(None).unwrap();
    clock.tick(start);
    clock.reset();
    assert_eq!(clock.tick(start + Duration::from_secs(10)), 0.0);
  }
}
