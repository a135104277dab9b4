use std::io::{stdout, Stdout, Write};
use std::time::Duration;

use anyhow::Result;
use crossterm::event::{poll, read, Event};
use crossterm::style::{Color, Print, ResetColor, SetForegroundColor};
use crossterm::terminal::{ClearType, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::{cursor, execute, queue, terminal};
use log::debug;

use crate::geometry::Position;
use crate::input::{map_key, Input, InputSource};

/// Glyph output used by the game. Nothing is visible until `present`.
pub trait RenderSink {
    fn clear_all(&mut self) -> Result<()>;
    fn set_glyph(&mut self, pos: Position, ch: char, color: Color) -> Result<()>;
    fn present(&mut self) -> Result<()>;
}

#[derive(Copy, Clone, Debug, PartialEq)]
struct Cell {
    ch: char,
    color: Color,
}

const BLANK: Cell = Cell { ch: ' ', color: Color::Reset };

pub struct TermManager<W: Write = Stdout> {
    width: u16,
    height: u16,
    out: W,
    // The frame being drawn, and the frame the terminal currently shows
    screen: Vec<Cell>,
    shown: Vec<Cell>,
}

impl TermManager<Stdout> {
    pub fn new() -> Result<Self> {
        let (width, height) = terminal::size()?;
        Ok(TermManager::with_writer(stdout(), width, height))
    }

    pub fn setup(&mut self) -> Result<()> {
        execute!(self.out, EnterAlternateScreen)?;
        terminal::enable_raw_mode()?;
        execute!(self.out, cursor::Hide, cursor::DisableBlinking, terminal::Clear(ClearType::All))?;
        Ok(())
    }

    pub fn restore(&mut self) -> Result<()> {
        terminal::disable_raw_mode()?;
        execute!(self.out, ResetColor, cursor::Show, cursor::EnableBlinking, LeaveAlternateScreen)?;
        Ok(())
    }
}

impl<W: Write> TermManager<W> {
    pub fn with_writer(out: W, width: u16, height: u16) -> Self {
        let cells = width as usize * height as usize;
        TermManager { width, height, out, screen: vec![BLANK; cells], shown: vec![BLANK; cells] }
    }

    pub fn size(&self) -> (u16, u16) {
        (self.width, self.height)
    }

    /// Adopts a new surface size. The next `present` redraws from scratch.
    pub fn resize(&mut self, width: u16, height: u16) -> Result<()> {
        let cells = width as usize * height as usize;
        self.width = width;
        self.height = height;
        self.screen = vec![BLANK; cells];
        self.shown = vec![BLANK; cells];
        queue!(self.out, terminal::Clear(ClearType::All))?;
        Ok(())
    }

    fn index(&self, pos: Position) -> Option<usize> {
        if pos.x < 0 || pos.y < 0 || pos.x >= self.width as i32 || pos.y >= self.height as i32 {
            return None;
        }

        Some(self.width as usize * pos.y as usize + pos.x as usize)
    }
}

impl<W: Write> RenderSink for TermManager<W> {
    fn clear_all(&mut self) -> Result<()> {
        for cell in self.screen.iter_mut() {
            *cell = BLANK;
        }
        Ok(())
    }

    fn set_glyph(&mut self, pos: Position, ch: char, color: Color) -> Result<()> {
        // Glyphs off the surface are dropped
        if let Some(i) = self.index(pos) {
            self.screen[i] = Cell { ch, color };
        }
        Ok(())
    }

    fn present(&mut self) -> Result<()> {
        let TermManager { width, out, screen, shown, .. } = self;
        let width = *width as usize;
        let mut current_color = None;

        for (i, (next, old)) in screen.iter().zip(shown.iter_mut()).enumerate() {
            if *next == *old {
                continue;
            }

            let (x, y) = ((i % width) as u16, (i / width) as u16);
            queue!(out, cursor::MoveTo(x, y))?;
            if current_color != Some(next.color) {
                queue!(out, SetForegroundColor(next.color))?;
                current_color = Some(next.color);
            }
            queue!(out, Print(next.ch))?;

            *old = *next;
        }

        if current_color.is_some() {
            queue!(out, ResetColor)?;
        }

        out.flush()?;
        Ok(())
    }
}

impl InputSource for TermManager<Stdout> {
    fn next_input(&mut self, timeout: Duration) -> Result<Input> {
        if !poll(timeout)? {
            return Ok(Input::Tick);
        }

        match read()? {
            Event::Key(ev) => Ok(map_key(ev)),
            Event::Resize(width, height) => {
                debug!("terminal resized to {}x{}", width, height);
                self.resize(width, height)?;
                Ok(Input::Ignored)
            }
            _ => Ok(Input::Ignored),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn term() -> TermManager<Vec<u8>> {
        TermManager::with_writer(Vec::new(), 10, 4)
    }

    fn output(term: &TermManager<Vec<u8>>) -> String {
        String::from_utf8_lossy(&term.out).into_owned()
    }

    #[test]
    fn test_nothing_written_before_present() {
        let mut term = term();
        term.set_glyph(Position::new(1, 1), 'O', Color::Red).unwrap();

        assert!(term.out.is_empty());
        term.present().unwrap();
        assert!(output(&term).contains('O'));
    }

    #[test]
    fn test_unchanged_frame_writes_nothing() {
        let mut term = term();
        term.set_glyph(Position::new(2, 3), '*', Color::Green).unwrap();
        term.present().unwrap();
        let written = term.out.len();

        term.clear_all().unwrap();
        term.set_glyph(Position::new(2, 3), '*', Color::Green).unwrap();
        term.present().unwrap();

        assert_eq!(term.out.len(), written);
    }

    #[test]
    fn test_cleared_cell_is_blanked() {
        let mut term = term();
        term.set_glyph(Position::new(0, 0), 'X', Color::Green).unwrap();
        term.present().unwrap();
        term.out.clear();

        term.clear_all().unwrap();
        term.present().unwrap();

        assert!(output(&term).contains(' '));
        assert!(!output(&term).contains('X'));
        assert_eq!(term.shown[0], BLANK);
    }

    #[test]
    fn test_offscreen_glyphs_are_dropped() {
        let mut term = term();
        term.set_glyph(Position::new(-1, 0), '|', Color::White).unwrap();
        term.set_glyph(Position::new(10, 0), '|', Color::White).unwrap();
        term.set_glyph(Position::new(0, 4), '-', Color::White).unwrap();
        term.present().unwrap();

        assert!(term.out.is_empty());
    }

    #[test]
    fn test_resize_forces_full_redraw() {
        let mut term = term();
        term.set_glyph(Position::new(0, 0), '+', Color::White).unwrap();
        term.present().unwrap();

        term.resize(20, 8).unwrap();
        assert_eq!(term.size(), (20, 8));
        term.out.clear();

        term.set_glyph(Position::new(0, 0), '+', Color::White).unwrap();
        term.set_glyph(Position::new(19, 7), '+', Color::White).unwrap();
        term.present().unwrap();

        assert_eq!(output(&term).matches('+').count(), 2);
    }
}
