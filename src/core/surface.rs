//! Drawing surface abstraction
//!
//! The simulation only ever clears the surface, fills circles and strokes
//! lines. The egui app implements this on top of a `Painter`; tests and the
//! CLI record the calls instead.

use super::math::Vec2;
use super::palette::Rgba;

pub trait Surface {
    /// Erase everything drawn in the previous frame
    fn clear(&mut self);

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Rgba);

    fn stroke_line(&mut self, from: Vec2, to: Vec2, width: f32, color: Rgba);
}

#[derive(Clone, Debug, PartialEq)]
pub enum DrawCommand {
    Clear,
    Circle { center: Vec2, radius: f32, color: Rgba },
    Line { from: Vec2, to: Vec2, width: f32, color: Rgba },
}

/// Surface that keeps the commands of the current frame in memory
#[derive(Debug, Default)]
pub struct RecordingSurface {
    commands: Vec<DrawCommand>,
    /// Total commands since creation, across clears
    total: u64,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Commands recorded since the last clear (the clear itself included)
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn circles(&self) -> impl Iterator<Item = (Vec2, f32, Rgba)> + '_ {
        self.commands.iter().filter_map(|c| match *c {
            DrawCommand::Circle { center, radius, color } => Some((center, radius, color)),
            _ => None,
        })
    }

    pub fn lines(&self) -> impl Iterator<Item = (Vec2, Vec2, f32, Rgba)> + '_ {
        self.commands.iter().filter_map(|c| match *c {
            DrawCommand::Line { from, to, width, color } => Some((from, to, width, color)),
            _ => None,
        })
    }

    pub fn total_commands(&self) -> u64 {
        self.total
    }
}

impl Surface for RecordingSurface {
    fn clear(&mut self) {
        self.commands.clear();
        self.commands.push(DrawCommand::Clear);
        self.total += 1;
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Rgba) {
        self.commands.push(DrawCommand::Circle { center, radius, color });
        self.total += 1;
    }

    fn stroke_line(&mut self, from: Vec2, to: Vec2, width: f32, color: Rgba) {
        self.commands.push(DrawCommand::Line { from, to, width, color });
        self.total += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clear_resets_frame_but_not_total() {
        let mut surface = RecordingSurface::new();
        surface.clear();
        surface.fill_circle(Vec2::new(1.0, 1.0), 2.0, Rgba::new(0, 0, 0, 255));
        surface.stroke_line(Vec2::ZERO, Vec2::new(5.0, 5.0), 1.0, Rgba::new(0, 0, 0, 255));
        assert_eq!(surface.commands().len(), 3);
        assert_eq!(surface.circles().count(), 1);
        assert_eq!(surface.lines().count(), 1);

        surface.clear();
        assert_eq!(surface.commands(), &[DrawCommand::Clear]);
        assert_eq!(surface.total_commands(), 4);
    }
}
