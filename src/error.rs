use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SimError {
  /// Mass must be strictly positive and finite for the radius to be defined.
  #[error("invalid mass {0}: must be positive and finite")]
  InvalidMass(f64),

  /// Two bodies share a position, so the pull between them has no direction.
  #[error("bodies coincide, gravitational direction is undefined")]
  DegenerateDistance,

  #[error("invalid configuration: {0}")]
  InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, SimError>;
