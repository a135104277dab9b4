use std::collections::HashSet;

use rand::Rng;

use crate::geometry::{Position, Rectangle};

/// Picks a cell inside `board` that no body segment occupies.
///
/// Draws uniformly over the board and redraws on overlap. Returns `None`
/// only when the body already covers every cell.
pub fn generate<R: Rng + ?Sized>(board: &Rectangle, body: &[Position], rng: &mut R) -> Option<Position> {
    if is_board_full(board, body) {
        return None;
    }

    loop {
        let candidate = Position::new(
            rng.gen_range(board.start.x..=board.end.x),
            rng.gen_range(board.start.y..=board.end.y),
        );

        if !body.contains(&candidate) {
            return Some(candidate);
        }
    }
}

fn is_board_full(board: &Rectangle, body: &[Position]) -> bool {
    if body.len() < board.area() {
        return false;
    }

    let covered: HashSet<Position> = body.iter().copied().filter(|pos| board.contains(*pos)).collect();
    covered.len() >= board.area()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    fn board() -> Rectangle {
        Rectangle::new(Position::new(0, 0), Position::new(4, 4))
    }

    #[test]
    fn test_pellet_inside_board_and_off_body() {
        let mut rng = StdRng::seed_from_u64(42);
        let body = vec![Position::new(2, 2), Position::new(2, 3), Position::new(2, 4), Position::new(3, 4)];

        for _ in 0..500 {
            let pellet = generate(&board(), &body, &mut rng).unwrap();
            assert!(board().contains(pellet));
            assert!(!body.contains(&pellet));
        }
    }

    #[test]
    fn test_offset_board_bounds() {
        let mut rng = StdRng::seed_from_u64(1);
        let board = Rectangle::new(Position::new(10, 5), Position::new(12, 6));

        for _ in 0..200 {
            let pellet = generate(&board, &[], &mut rng).unwrap();
            assert!(board.contains(pellet), "{:?} outside {:?}", pellet, board);
        }
    }

    #[test]
    fn test_finds_last_free_cell() {
        let mut rng = StdRng::seed_from_u64(7);
        let board = Rectangle::new(Position::new(0, 0), Position::new(2, 2));
        let body: Vec<Position> = (0..3)
            .flat_map(|y| (0..3).map(move |x| Position::new(x, y)))
            .filter(|pos| *pos != Position::new(1, 1))
            .collect();

        assert_eq!(generate(&board, &body, &mut rng), Some(Position::new(1, 1)));
    }

    #[test]
    fn test_full_board_yields_none() {
        let mut rng = StdRng::seed_from_u64(7);
        let board = Rectangle::new(Position::new(0, 0), Position::new(1, 1));
        let body = vec![Position::new(0, 0), Position::new(1, 0), Position::new(1, 1), Position::new(0, 1)];

        assert_eq!(generate(&board, &body, &mut rng), None);
    }

    #[test]
    fn test_segments_outside_board_do_not_count_as_filling_it() {
        let mut rng = StdRng::seed_from_u64(3);
        let board = Rectangle::new(Position::new(0, 0), Position::new(1, 0));
        let body = vec![Position::new(0, 0), Position::new(-1, 0), Position::new(-2, 0)];

        assert_eq!(generate(&board, &body, &mut rng), Some(Position::new(1, 0)));
    }
}
