use crate::drag::DragState;
use crate::universe::Universe;
use cgmath::Vector2;

pub type Color = [f32; 4];

pub const BODY_COLOR: Color = [1.0, 1.0, 1.0, 1.0];
pub const DRAG_LINE_COLOR: Color = [0.4, 0.7, 1.0, 1.0];
pub const DRAG_LINE_THICKNESS: f64 = 2.0;

/// Anything that can draw the scene's two primitives.
pub trait Surface {
  fn draw_circle(&mut self, center: Vector2<f64>, radius: f64, color: Color);
  fn draw_line(&mut self, start: Vector2<f64>, end: Vector2<f64>, thickness: f64, color: Color);
}

/// Draws every body, then the drag preview line if a drag is in progress.
pub fn draw_scene<S: Surface>(universe: &Universe, drag: &DragState, surface: &mut S) {
  universe.for_each_body(|body| surface.draw_circle(body.position(), body.radius(), BODY_COLOR));

  if let Some((start, current)) = drag.preview() {
    surface.draw_line(start, current, DRAG_LINE_THICKNESS, DRAG_LINE_COLOR);
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::SimConfig;

  #[derive(Debug, PartialEq)]
  enum Call {
    Circle(Vector2<f64>, f64),
    Line(Vector2<f64>, Vector2<f64>),
  }

  #[derive(Default)]
  struct Recorder {
    calls: Vec<Call>,
  }

  impl Surface for Recorder {
    fn draw_circle(&mut self, center: Vector2<f64>, radius: f64, _color: Color) {
      self.calls.push(Call::Circle(center, radius));
    }

    fn draw_line(&mut self, start: Vector2<f64>, end: Vector2<f64>, _thickness: f64, _color: Color) {
      self.calls.push(Call::Line(start, end));
    }
  }

  fn two_bodies() -> Universe {
    let mut universe = Universe::new(SimConfig::default()).unwrap();
    universe.spawn(100.0, Vector2::new(0.0, 0.0), Vector2::new(0.0, 0.0)).unwrap();
    universe.spawn(200.0, Vector2::new(50.0, 0.0), Vector2::new(0.0, 0.0)).unwrap();
    universe
  }

  #[test]
  fn draws_one_circle_per_body() {
    let universe = two_bodies();
    let mut recorder = Recorder::default();
    draw_scene(&universe, &DragState::NotDragging, &mut recorder);

    assert_eq!(
      recorder.calls,
      vec![
        Call::Circle(Vector2::new(0.0, 0.0), universe.bodies()[0].radius()),
        Call::Circle(Vector2::new(50.0, 0.0), universe.bodies()[1].radius()),
      ]
    );
  }

  #[test]
  fn draws_preview_line_while_dragging() {
    let universe = Universe::new(SimConfig::default()).unwrap();
    let mut drag = DragState::default();
    drag.press(Vector2::new(1.0, 2.0));
    drag.move_to(Vector2::new(3.0, 4.0));

    let mut recorder = Recorder::default();
    draw_scene(&universe, &drag, &mut recorder);
    assert_eq!(
      recorder.calls,
      vec![Call::Line(Vector2::new(1.0, 2.0), Vector2::new(3.0, 4.0))]
    );
  }
}
