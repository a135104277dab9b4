//! Key mapping from terminal events to game input.

use std::time::Duration;

use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::snake::Direction;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Input {
    Turn(Direction),
    Quit,
    Restart,
    /// Nothing arrived before the timeout.
    Tick,
    Ignored,
}

/// Source of game input.
pub trait InputSource {
    /// Blocks for at most `timeout`, returning `Input::Tick` if no event arrived.
    fn next_input(&mut self, timeout: Duration) -> Result<Input>;
}

pub fn map_key(key: KeyEvent) -> Input {
    if is_ctrl_c(&key) {
        return Input::Quit;
    }

    match key.code {
        KeyCode::Char('w') | KeyCode::Char('W') | KeyCode::Up => Input::Turn(Direction::Up),
        KeyCode::Char('a') | KeyCode::Char('A') | KeyCode::Left => Input::Turn(Direction::Left),
        KeyCode::Char('s') | KeyCode::Char('S') | KeyCode::Down => Input::Turn(Direction::Down),
        KeyCode::Char('d') | KeyCode::Char('D') | KeyCode::Right => Input::Turn(Direction::Right),
        KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('Q') => Input::Quit,
        KeyCode::Char('r') | KeyCode::Char('R') => Input::Restart,
        _ => Input::Ignored,
    }
}

fn is_ctrl_c(ev: &KeyEvent) -> bool {
    ev.code == KeyCode::Char('c') && ev.modifiers.contains(KeyModifiers::CONTROL)
}
