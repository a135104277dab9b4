use crate::geometry::Position;
use Direction::*;

pub const UNDEFINED_HEAD_CHAR: char = 'X';

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right
}

impl Direction {
    pub fn delta(self) -> Position {
        match self {
            Up => Position::new(0, -1),
            Down => Position::new(0, 1),
            Left => Position::new(-1, 0),
            Right => Position::new(1, 0),
        }
    }

    pub fn opposite(self) -> Direction {
        match self {
            Up => Down,
            Down => Up,
            Left => Right,
            Right => Left,
        }
    }

    pub fn head_char(self) -> char {
        match self {
            Up => '^',
            Down => 'v',
            Left => '<',
            Right => '>',
        }
    }
}

/// The player's body, head first. `direction` is `None` until the first turn,
/// during which the snake stands still.
#[derive(Clone, Debug)]
pub struct Player {
    body: Vec<Position>,
    direction: Option<Direction>,
}

impl Player {
    pub fn spawn(pos: Position) -> Self {
        Player { body: vec![pos], direction: None }
    }

    #[cfg(test)]
    pub fn with_body(body: Vec<Position>, direction: Option<Direction>) -> Self {
        assert!(!body.is_empty(), "a player needs at least one segment");
        Player { body, direction }
    }

    pub fn body(&self) -> &[Position] {
        &self.body
    }

    pub fn head(&self) -> Position {
        self.body[0]
    }

    pub fn len(&self) -> usize {
        self.body.len()
    }

    pub fn direction(&self) -> Option<Direction> {
        self.direction
    }

    /// Applies `new_direction` unless it would reverse the snake onto itself.
    pub fn turn(&mut self, new_direction: Direction) -> bool {
        match self.direction {
            Some(current) if current.opposite() == new_direction => false,
            _ => {
                self.direction = Some(new_direction);
                true
            }
        }
    }

    /// Moves one step. The tail is kept when the new head lands on `pellet`,
    /// which is how the snake grows.
    pub fn advance(&mut self, pellet: Position) {
        let dir = match self.direction {
            Some(dir) => dir,
            None => return,
        };

        let new_head = self.head() + dir.delta();
        self.body.insert(0, new_head);

        if new_head != pellet {
            self.body.pop();
        }
    }

    pub fn collides_with_self(&self) -> bool {
        self.body[1..].contains(&self.head())
    }

    pub fn head_char(&self) -> char {
        self.direction().map_or(UNDEFINED_HEAD_CHAR, Direction::head_char)
    }
}
