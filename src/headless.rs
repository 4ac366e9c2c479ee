use crate::clock::check_time_step;
use crate::error::Result;
use crate::universe::Universe;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Steps taken between progress log lines.
const REPORT_INTERVAL: u64 = 1000;

#[derive(Copy, Clone, Debug)]
pub struct HeadlessParams {
  pub steps: u64,
  pub dt: f64,
}

impl HeadlessParams {
  pub fn validate(&self) -> Result<()> {
    check_time_step("dt", self.dt)
  }
}

/// Steps `universe` without a window, stopping early once `stop` is set.
/// Returns the number of steps taken.
pub fn simulate(universe: &mut Universe, params: HeadlessParams, stop: &AtomicBool) -> u64 {
  let mut taken = 0;
  while taken < params.steps && !stop.load(Ordering::Relaxed) {
    universe.step(params.dt);
    taken += 1;
    if taken % REPORT_INTERVAL == 0 {
      let p = universe.total_momentum();
      log::debug!("step {taken}: {} bodies, momentum ({:.4}, {:.4})", universe.len(), p.x, p.y);
    }
  }
  taken
}

/// Runs [`simulate`] with a Ctrl-C handler installed.
pub fn run(mut universe: Universe, params: HeadlessParams) -> Result<Universe> {
  params.validate()?;
  let stop = Arc::new(AtomicBool::new(false));
  let handler_stop = stop.clone();
  if let Err(e) = ctrlc::set_handler(move || handler_stop.store(true, Ordering::Relaxed)) {
    log::warn!("could not install Ctrl-C handler: {e}");
  }

  log::info!(
    "running headless: {} bodies, {} steps of {}s",
    universe.len(),
    params.steps,
    params.dt
  );
  let taken = simulate(&mut universe, params, &stop);
  let p = universe.total_momentum();
  log::info!(
    "finished after {taken} steps, total momentum ({:.4}, {:.4})",
    p.x,
    p.y
  );
  Ok(universe)
}
