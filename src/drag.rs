//! Click-and-drag gesture tracking for spawning bodies.

use cgmath::Vector2;

/// A body the user asked for: placed at the drag start, moving with the drag
/// displacement (pixels per second, no unit conversion).
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SpawnRequest {
  pub position: Vector2<f64>,
  pub velocity: Vector2<f64>,
}

#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub enum DragState {
  #[default]
  NotDragging,
  Dragging {
    start: Vector2<f64>,
    current: Vector2<f64>,
  },
}

impl DragState {
  pub fn press(&mut self, at: Vector2<f64>) {
    *self = DragState::Dragging {
      start: at,
      current: at,
    };
  }

  pub fn move_to(&mut self, at: Vector2<f64>) {
    if let DragState::Dragging { current, .. } = self {
      *current = at;
    }
  }

  /// Ends the gesture at `at`. Returns nothing if no drag was in progress.
  pub fn release(&mut self, at: Vector2<f64>) -> Option<SpawnRequest> {
    match std::mem::take(self) {
      DragState::Dragging { start, .. } => Some(SpawnRequest {
        position: start,
        velocity: at - start,
      }),
      DragState::NotDragging => None,
    }
  }

  /// Ends the gesture at the last tracked cursor position, as when the
  /// pointer leaves the window.
  pub fn finish(&mut self) -> Option<SpawnRequest> {
    match *self {
      DragState::Dragging { current, .. } => self.release(current),
      DragState::NotDragging => None,
    }
  }

  pub fn preview(&self) -> Option<(Vector2<f64>, Vector2<f64>)> {
    match *self {
      DragState::Dragging { start, current } => Some((start, current)),
      DragState::NotDragging => None,
    }
  }
}
