use crate::body::Body;
use crate::error::{Result, SimError};
use crate::{ScenarioParams, SimConfig};
use cgmath::{InnerSpace, Vector2};
use rand::{rngs::SmallRng, Rng, SeedableRng};
use rand_distr::{Distribution, Normal};
use std::f64::consts::PI;

/// Scatters `num_bodies` bodies over an annulus around `params.center`, each
/// on a roughly circular orbit about the mass enclosed inside it.
pub fn create_bodies(params: &ScenarioParams, config: &SimConfig) -> Result<Vec<Body>> {
  let mut rng = SmallRng::seed_from_u64(params.seed);
  let mut bodies = Vec::with_capacity(params.num_bodies as usize);
  let jitter = Normal::new(0.0, params.velocity_jitter.max(0.0))
    .map_err(|e| SimError::InvalidConfig(format!("velocity jitter: {e}")))?;
  let center = Vector2::new(params.center[0], params.center[1]);
  let total_mass = config.spawn_mass * params.num_bodies as f64;

  for _ in 0..params.num_bodies {
    // sqrt keeps the surface density roughly uniform across the annulus
    let t: f64 = rng.gen();
    let r = params.min_radius + (params.max_radius - params.min_radius) * t.sqrt();
    let theta = rng.gen::<f64>() * 2.0 * PI;
    let offset = Vector2::new(theta.cos(), theta.sin()) * r;

    let enclosed = total_mass * t.max(0.05);
    let speed = (config.gravity * enclosed / r.max(1.0)).sqrt();
    let tangent = Vector2::new(-offset.y, offset.x).normalize();
    let kick = Vector2::new(jitter.sample(&mut rng), jitter.sample(&mut rng));

    bodies.push(Body::new(
      config.spawn_mass,
      center + offset,
      tangent * speed + kick,
      config.density,
    )?);
  }

  log::debug!("generated {} bodies with seed {}", bodies.len(), params.seed);
  Ok(bodies)
}
