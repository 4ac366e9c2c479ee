use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use gravity_sandbox::clock::check_time_step;
use gravity_sandbox::headless::{self, HeadlessParams};
use gravity_sandbox::initialize::create_bodies;
use gravity_sandbox::state::{self, AppError, WINDOW_HEIGHT, WINDOW_WIDTH};
use gravity_sandbox::{ScenarioParams, SimConfig, Universe};
use std::io;
use std::process::ExitCode;

/// Interactive n-body gravity sandbox. Click and drag to launch a body.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
  /// Gravitational constant
  #[arg(long, default_value_t = SimConfig::default().gravity)]
  gravity: f64,
  /// Density used to derive a body's radius from its mass
  #[arg(long, default_value_t = SimConfig::default().density)]
  density: f64,
  /// Mass of bodies spawned by dragging
  #[arg(short, long, default_value_t = SimConfig::default().spawn_mass)]
  mass: f64,
  /// Number of randomly placed bodies to start with
  #[arg(short, long, default_value_t = 0)]
  bodies: u32,
  /// Seed for the starting bodies
  #[arg(long, default_value_t = 42)]
  seed: u64,
  /// Upper bound on a single frame's time step in seconds
  #[arg(long)]
  max_dt: Option<f64>,
  /// Run in headless mode (no window)
  #[arg(long, default_value_t = false)]
  headless: bool,
  /// Steps to run in headless mode
  #[arg(long, default_value_t = 10_000)]
  steps: u64,
  /// Fixed time step for headless mode in seconds
  #[arg(long, default_value_t = 0.01)]
  dt: f64,
  #[command(subcommand)]
  command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
  /// Generate shell completion scripts
  Completions {
    /// The shell to generate the script for
    #[arg(value_enum)]
    shell: Shell,
  },
}

fn build_universe(args: &Args) -> Result<Universe, AppError> {
  let config = SimConfig {
    gravity: args.gravity,
    density: args.density,
    spawn_mass: args.mass,
  };
  config.validate()?;

  let scenario = ScenarioParams {
    num_bodies: args.bodies,
    seed: args.seed,
    center: [f64::from(WINDOW_WIDTH) / 2.0, f64::from(WINDOW_HEIGHT) / 2.0],
    ..Default::default()
  };
  let bodies = create_bodies(&scenario, &config)?;
  Ok(Universe::with_bodies(config, bodies)?)
}

fn run(args: Args) -> Result<(), AppError> {
  let params = HeadlessParams {
    steps: args.steps,
    dt: args.dt,
  };
  params.validate()?;
  if let Some(max_dt) = args.max_dt {
    check_time_step("max dt", max_dt)?;
  }

  let universe = build_universe(&args)?;
  if args.headless {
    headless::run(universe, params)?;
    Ok(())
  } else {
    state::run(universe, args.max_dt)
  }
}

fn main() -> ExitCode {
  env_logger::init();
  let args = Args::parse();

  if let Some(Commands::Completions { shell }) = args.command {
    let mut cmd = Args::command();
    let name = cmd.get_name().to_string();
    generate(shell, &mut cmd, name, &mut io::stdout());
    return ExitCode::SUCCESS;
  }

  match run(args) {
    Ok(()) => ExitCode::SUCCESS,
    Err(e) => {
      log::error!("{e}");
      ExitCode::FAILURE
    }
  }
}
