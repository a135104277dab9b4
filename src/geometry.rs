use std::ops::Add;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub const fn new(x: i32, y: i32) -> Self {
        Position { x, y }
    }
}

impl Add for Position {
    type Output = Position;

    fn add(self, other: Position) -> Position {
        Position::new(self.x + other.x, self.y + other.y)
    }
}

/// Axis-aligned rectangle with inclusive `start` (top-left) and `end`
/// (bottom-right) corners.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Rectangle {
    pub start: Position,
    pub end: Position,
}

/// Rows the frame uses below the board: bottom border, score and status.
pub const FRAME_ROWS_BELOW: i32 = 3;

impl Rectangle {
    pub const fn new(start: Position, end: Position) -> Self {
        Rectangle { start, end }
    }

    pub fn width(&self) -> i32 {
        self.end.x - self.start.x + 1
    }

    pub fn height(&self) -> i32 {
        self.end.y - self.start.y + 1
    }

    pub fn area(&self) -> usize {
        self.width() as usize * self.height() as usize
    }

    pub fn contains(&self, pos: Position) -> bool {
        pos.x >= self.start.x && pos.x <= self.end.x && pos.y >= self.start.y && pos.y <= self.end.y
    }

    /// Centers a `board_w` x `board_h` board on a surface, keeping room for
    /// the border around it and the status rows under it.
    pub fn centered(surface_w: u16, surface_h: u16, board_w: u16, board_h: u16) -> Self {
        let (surface_w, surface_h) = (surface_w as i32, surface_h as i32);
        let (board_w, board_h) = (board_w as i32, board_h as i32);

        let frame_w = board_w + 2;
        let frame_h = board_h + 1 + FRAME_ROWS_BELOW;

        let start = Position::new(
            (surface_w - frame_w).max(0) / 2 + 1,
            (surface_h - frame_h).max(0) / 2 + 1,
        );
        let end = Position::new(start.x + board_w - 1, start.y + board_h - 1);

        Rectangle::new(start, end)
    }
}
