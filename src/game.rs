use std::time::{Duration, Instant};

use anyhow::Result;
use crossterm::style::Color;
use log::{debug, info};
use rand::{rngs::StdRng, SeedableRng};

use crate::geometry::{Position, Rectangle};
use crate::input::{Input, InputSource};
use crate::pellet;
use crate::snake::{Direction, Player};
use crate::term::RenderSink;

const SNAKE_BODY_CHAR: char = '*';
const DEAD_SNAKE_CHAR: char = 'X';
const PELLET_CHAR: char = 'O';
const HORIZONTAL_BORDER_CHAR: char = '-';
const VERTICAL_BORDER_CHAR: char = '|';
const CORNER_CHAR: char = '+';

const SNAKE_COLOR: Color = Color::Green;
const PELLET_COLOR: Color = Color::Red;
const BORDER_COLOR: Color = Color::White;
const TEXT_COLOR: Color = Color::White;

/// What a single tick did.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Step {
    Moved,
    Ate,
    Over,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum RoundOutcome {
    Quit,
    Finished { score: u32, won: bool },
}

pub struct GameState {
    board: Rectangle,
    player: Player,
    pellet: Position,
    score: u32,
    over: bool,
    won: bool,
    rng: StdRng,
}

impl GameState {
    pub fn new(board: Rectangle) -> Self {
        GameState::with_rng(board, StdRng::from_entropy())
    }

    pub fn with_rng(board: Rectangle, rng: StdRng) -> Self {
        let player = Player::spawn(spawn_point(&board));
        let mut state = GameState::from_parts(board, player, Position::default(), rng);
        state.respawn_pellet();
        state
    }

    pub fn from_parts(board: Rectangle, player: Player, pellet: Position, rng: StdRng) -> Self {
        GameState { board, player, pellet, score: 0, over: false, won: false, rng }
    }

    /// Starts over on the same board, keeping the random generator.
    pub fn restart(&mut self) {
        self.player = Player::spawn(spawn_point(&self.board));
        self.score = 0;
        self.over = false;
        self.won = false;
        self.respawn_pellet();
    }

    pub fn board(&self) -> &Rectangle {
        &self.board
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn pellet(&self) -> Position {
        self.pellet
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn is_over(&self) -> bool {
        self.over
    }

    /// True when the game ended because the snake filled the whole board.
    pub fn won(&self) -> bool {
        self.won
    }

    /// Advances the game by one step: turn, move, eat, then check for the end.
    pub fn tick(&mut self, turn: Option<Direction>) -> Step {
        if self.over {
            return Step::Over;
        }

        if let Some(dir) = turn {
            if !self.player.turn(dir) {
                debug!("ignored reversal to {:?}", dir);
            }
        }

        self.player.advance(self.pellet);

        let mut step = Step::Moved;
        if self.player.head() == self.pellet {
            self.score += 1;
            step = Step::Ate;
            self.respawn_pellet();
        }

        if self.is_game_over() {
            self.over = true;
        }

        if self.over {
            Step::Over
        } else {
            step
        }
    }

    /// Whether the head has left the board or run into the body.
    pub fn is_game_over(&self) -> bool {
        !self.board.contains(self.player.head()) || self.player.collides_with_self()
    }

    pub fn draw<S: RenderSink + ?Sized>(&self, sink: &mut S) -> Result<()> {
        sink.clear_all()?;
        self.draw_borders(sink)?;

        if !self.won {
            sink.set_glyph(self.pellet(), PELLET_CHAR, PELLET_COLOR)?;
        }

        let player = self.player();
        if self.over && !self.won {
            // Head last, so a crash cell on the border shows the marker
            for pos in player.body().iter().rev() {
                sink.set_glyph(*pos, DEAD_SNAKE_CHAR, SNAKE_COLOR)?;
            }
        } else {
            for pos in player.body() {
                sink.set_glyph(*pos, SNAKE_BODY_CHAR, SNAKE_COLOR)?;
            }
            sink.set_glyph(player.head(), player.head_char(), SNAKE_COLOR)?;
        }

        let text_x = self.board.start.x;
        draw_text(sink, Position::new(text_x, self.board.end.y + 2), &format!("Score: {}", self.score))?;

        if self.over {
            let status = if self.won { "You won!" } else { "Game Over" };
            let line = format!("{}  r to restart, q to quit", status);
            draw_text(sink, Position::new(text_x, self.board.end.y + 3), &line)?;
        }

        sink.present()
    }

    ///////////////////////////////////////////////////////////////////////////

    fn respawn_pellet(&mut self) {
        match pellet::generate(&self.board, self.player.body(), &mut self.rng) {
            Some(pos) => self.pellet = pos,
            None => {
                // No free cell left
                info!("board filled at length {}", self.player().len());
                self.won = true;
                self.over = true;
            }
        }
    }

    fn draw_borders<S: RenderSink + ?Sized>(&self, sink: &mut S) -> Result<()> {
        let Rectangle { start, end } = self.board;

        for x in start.x..=end.x {
            sink.set_glyph(Position::new(x, start.y - 1), HORIZONTAL_BORDER_CHAR, BORDER_COLOR)?;
            sink.set_glyph(Position::new(x, end.y + 1), HORIZONTAL_BORDER_CHAR, BORDER_COLOR)?;
        }

        for y in start.y..=end.y {
            sink.set_glyph(Position::new(start.x - 1, y), VERTICAL_BORDER_CHAR, BORDER_COLOR)?;
            sink.set_glyph(Position::new(end.x + 1, y), VERTICAL_BORDER_CHAR, BORDER_COLOR)?;
        }

        for corner in [
            Position::new(start.x - 1, start.y - 1),
            Position::new(end.x + 1, start.y - 1),
            Position::new(start.x - 1, end.y + 1),
            Position::new(end.x + 1, end.y + 1),
        ]
        .iter()
        {
            sink.set_glyph(*corner, CORNER_CHAR, BORDER_COLOR)?;
        }

        Ok(())
    }
}

fn spawn_point(board: &Rectangle) -> Position {
    board.start + Position::new(board.width() / 2, board.height() / 2)
}

fn draw_text<S: RenderSink + ?Sized>(sink: &mut S, at: Position, text: &str) -> Result<()> {
    for (i, ch) in text.chars().enumerate() {
        sink.set_glyph(Position::new(at.x + i as i32, at.y), ch, TEXT_COLOR)?;
    }
    Ok(())
}

/// Input gathered while waiting for the next tick.
enum Control {
    Quit,
    Tick(Option<Direction>),
}

/// Drives a `GameState` against a terminal at a fixed tick interval.
pub struct Session<T: RenderSink + InputSource> {
    term: T,
    state: GameState,
    interval: Duration,
}

impl<T: RenderSink + InputSource> Session<T> {
    pub fn new(term: T, state: GameState, interval: Duration) -> Self {
        Session { term, state, interval }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn into_inner(self) -> T {
        self.term
    }

    /// Plays rounds until the player quits.
    pub fn run(&mut self) -> Result<()> {
        loop {
            match self.play_round()? {
                RoundOutcome::Quit => return Ok(()),
                RoundOutcome::Finished { .. } => {
                    if !self.wait_for_restart()? {
                        return Ok(());
                    }
                    self.state.restart();
                }
            }
        }
    }

    /// Ticks the current game until it ends or the player quits.
    pub fn play_round(&mut self) -> Result<RoundOutcome> {
        let board = self.state.board();
        info!("round started on a {}x{} board", board.width(), board.height());

        while !self.state.is_over() {
            self.state.draw(&mut self.term)?;

            let turn = match self.collect_input()? {
                Control::Quit => {
                    info!("quit with score {}", self.state.score());
                    return Ok(RoundOutcome::Quit);
                }
                Control::Tick(turn) => turn,
            };

            match self.state.tick(turn) {
                Step::Ate => debug!("pellet eaten, score {}, length {}", self.state.score(), self.state.player().len()),
                Step::Over => debug!("round ended heading {:?}", self.state.player().direction()),
                Step::Moved => {}
            }
        }

        self.state.draw(&mut self.term)?;

        let (score, won) = (self.state.score(), self.state.won());
        info!("round over, score {}, won {}", score, won);
        Ok(RoundOutcome::Finished { score, won })
    }

    ///////////////////////////////////////////////////////////////////////////

    /// Reads input until the next tick is due. The last turn wins.
    fn collect_input(&mut self) -> Result<Control> {
        let deadline = Instant::now() + self.interval;
        let mut turn = None;

        loop {
            let timeout = deadline.saturating_duration_since(Instant::now());
            match self.term.next_input(timeout)? {
                Input::Quit => return Ok(Control::Quit),
                Input::Turn(dir) => turn = Some(dir),
                Input::Tick => return Ok(Control::Tick(turn)),
                Input::Restart | Input::Ignored => {}
            }
        }
    }

    fn wait_for_restart(&mut self) -> Result<bool> {
        loop {
            match self.term.next_input(self.interval)? {
                Input::Restart => return Ok(true),
                Input::Quit => return Ok(false),
                // Keep the final frame up, e.g. after a resize
                _ => self.state.draw(&mut self.term)?,
            }
        }
    }
}
