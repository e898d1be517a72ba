//! Integer pixel geometry: top-left origin, y-down, the coordinate space
//! every `Container` and `Output` rectangle is expressed in.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Size {
    pub width: i32,
    pub height: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rectangle {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rectangle {
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self { x, y, width, height }
    }

    pub fn top_left(&self) -> Point {
        Point { x: self.x, y: self.y }
    }

    pub fn size(&self) -> Size {
        Size { width: self.width, height: self.height }
    }

    pub fn right(&self) -> i32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> i32 {
        self.y + self.height
    }

    pub fn translated(&self, dx: i32, dy: i32) -> Self {
        Self { x: self.x + dx, y: self.y + dy, ..*self }
    }

    /// Shrinks this rectangle by `amount` on each side it shares with a
    /// neighbor, per spec's "visible area = logical area minus half-gaps"
    /// rule. `half_gap_x`/`half_gap_y` are already-halved gap sizes; the
    /// `has_*_neighbor` flags say whether that side actually borders
    /// another Leaf (edge-of-parent sides keep the outer gap instead, which
    /// callers apply separately).
    pub fn shrink_by_gaps(
        &self,
        half_gap_x: i32,
        half_gap_y: i32,
        has_left: bool,
        has_right: bool,
        has_top: bool,
        has_bottom: bool,
    ) -> Rectangle {
        let left = if has_left { half_gap_x } else { 0 };
        let right = if has_right { half_gap_x } else { 0 };
        let top = if has_top { half_gap_y } else { 0 };
        let bottom = if has_bottom { half_gap_y } else { 0 };
        Rectangle {
            x: self.x + left,
            y: self.y + top,
            width: (self.width - left - right).max(0),
            height: (self.height - top - bottom).max(0),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Horizontal,
    Vertical,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Left,
    Right,
    Up,
    Down,
}

impl Direction {
    pub fn axis(self) -> Axis {
        match self {
            Direction::Left | Direction::Right => Axis::Horizontal,
            Direction::Up | Direction::Down => Axis::Vertical,
        }
    }

    /// `true` for the direction that increases the main-axis coordinate
    /// (right, down).
    pub fn is_positive(self) -> bool {
        matches!(self, Direction::Right | Direction::Down)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shrink_by_gaps_only_touches_bordered_sides() {
        let r = Rectangle::new(0, 0, 100, 100);
        let shrunk = r.shrink_by_gaps(5, 5, false, true, false, false);
        assert_eq!(shrunk, Rectangle::new(0, 0, 95, 100));
    }

    #[test]
    fn direction_axis_mapping() {
        assert_eq!(Direction::Left.axis(), Axis::Horizontal);
        assert_eq!(Direction::Up.axis(), Axis::Vertical);
        assert!(Direction::Right.is_positive());
        assert!(!Direction::Left.is_positive());
    }
}
