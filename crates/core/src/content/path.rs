//! Vector paths built by path construction operators.
//!
//! Points are stored in device space: construction operators transform
//! their operands by the CTM in effect when they run.

use crate::model::state::{Color, LineStyle};
use crate::utils::{Point, Rect, get_bound};

/// A single drawing command inside a subpath.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PathCommand {
    Move(Point),
    Line(Point),
    Cubic { c1: Point, c2: Point, end: Point },
    Close,
}

/// A run of commands starting with a move.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Subpath {
    commands: Vec<PathCommand>,
}

impl Subpath {
    pub fn new(start: Point) -> Self {
        Self {
            commands: vec![PathCommand::Move(start)],
        }
    }

    pub fn commands(&self) -> &[PathCommand] {
        &self.commands
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn is_closed(&self) -> bool {
        matches!(self.commands.last(), Some(PathCommand::Close))
    }

    pub fn line_to(&mut self, p: Point) {
        self.commands.push(PathCommand::Line(p));
    }

    pub fn cubic_to(&mut self, c1: Point, c2: Point, end: Point) {
        self.commands.push(PathCommand::Cubic { c1, c2, end });
    }

    pub fn close(&mut self) {
        if !self.is_closed() {
            self.commands.push(PathCommand::Close);
        }
    }

    /// The point the subpath started at.
    pub fn start_point(&self) -> Option<Point> {
        match self.commands.first() {
            Some(PathCommand::Move(p)) => Some(*p),
            _ => None,
        }
    }

    /// The pen position after the last command.
    pub fn current_point(&self) -> Option<Point> {
        match self.commands.last()? {
            PathCommand::Move(p) | PathCommand::Line(p) => Some(*p),
            PathCommand::Cubic { end, .. } => Some(*end),
            PathCommand::Close => self.start_point(),
        }
    }

    /// Bounds of all points, control points included.
    pub fn bounds(&self) -> Rect {
        get_bound(self.commands.iter().flat_map(|c| match *c {
            PathCommand::Move(p) | PathCommand::Line(p) => vec![p],
            PathCommand::Cubic { c1, c2, end } => vec![c1, c2, end],
            PathCommand::Close => vec![],
        }))
    }
}

/// Winding rule used to fill or clip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FillingRule {
    #[default]
    NonZeroWinding,
    EvenOdd,
}

/// A painted (or clipping) path with the state it was painted in.
#[derive(Debug, Clone, PartialEq)]
pub struct PdfPath {
    pub subpaths: Vec<Subpath>,
    pub filling_rule: FillingRule,
    pub is_filled: bool,
    pub is_stroked: bool,
    pub is_clipping: bool,
    pub line: LineStyle,
    pub stroke_color: Color,
    pub fill_color: Color,
}

impl PdfPath {
    pub fn bounds(&self) -> Rect {
        get_bound(self.subpaths.iter().flat_map(|s| {
            let (x0, y0, x1, y1) = s.bounds();
            [(x0, y0), (x1, y1)]
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn close_returns_to_start() {
        let mut sp = Subpath::new((1.0, 2.0));
        sp.line_to((5.0, 2.0));
        assert_eq!(sp.current_point(), Some((5.0, 2.0)));
        sp.close();
        sp.close();
        assert_eq!(sp.commands().len(), 3);
        assert_eq!(sp.current_point(), Some((1.0, 2.0)));
    }

    #[test]
    fn bounds_include_control_points() {
        let mut sp = Subpath::new((0.0, 0.0));
        sp.cubic_to((0.0, 10.0), (5.0, -3.0), (4.0, 0.0));
        assert_eq!(sp.bounds(), (0.0, -3.0, 5.0, 10.0));
    }
}
