use std::path::PathBuf;
use std::time::Duration;

use structopt::StructOpt;
use thiserror::Error;

use crate::geometry::FRAME_ROWS_BELOW;

/// Terminal snake.
#[derive(Clone, Debug, StructOpt)]
#[structopt(name = "snake")]
pub struct GameSettings {
    /// Width of the game board, in cells.
    #[structopt(short = "W", long = "board-width", default_value = "71")]
    pub board_width: u16,

    /// Height of the game board, in cells.
    #[structopt(short = "H", long = "board-height", default_value = "17")]
    pub board_height: u16,

    /// Milliseconds between game ticks.
    #[structopt(short = "s", long = "game-speed", default_value = "100")]
    pub game_speed: u64,

    /// Write a log to this file. Nothing is logged otherwise.
    #[structopt(long = "log-file", parse(from_os_str))]
    pub log_file: Option<PathBuf>,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SettingsError {
    #[error("board dimensions must be positive, got {width}x{height}")]
    EmptyBoard { width: u16, height: u16 },
    #[error("game speed must be at least 1 ms")]
    ZeroSpeed,
    #[error("a {board_w}x{board_h} board needs a {need_w}x{need_h} terminal, this one is {have_w}x{have_h}")]
    BoardTooLarge { board_w: u16, board_h: u16, need_w: u32, need_h: u32, have_w: u16, have_h: u16 },
}

impl Default for GameSettings {
    fn default() -> Self {
        GameSettings { board_width: 71, board_height: 17, game_speed: 100, log_file: None }
    }
}

impl GameSettings {
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.game_speed)
    }

    /// Checks the settings against a render surface of `surface` columns and rows.
    pub fn validate(&self, surface: (u16, u16)) -> Result<(), SettingsError> {
        if self.board_width == 0 || self.board_height == 0 {
            return Err(SettingsError::EmptyBoard { width: self.board_width, height: self.board_height });
        }

        if self.game_speed == 0 {
            return Err(SettingsError::ZeroSpeed);
        }

        let need_w = self.board_width as u32 + 2;
        let need_h = self.board_height as u32 + 1 + FRAME_ROWS_BELOW as u32;
        let (have_w, have_h) = surface;

        if need_w > have_w as u32 || need_h > have_h as u32 {
            return Err(SettingsError::BoardTooLarge {
                board_w: self.board_width,
                board_h: self.board_height,
                need_w,
                need_h,
                have_w,
                have_h,
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_cli_defaults() {
        let parsed = GameSettings::from_iter(vec!["snake"]);
        let defaults = GameSettings::default();

        assert_eq!(parsed.board_width, defaults.board_width);
        assert_eq!(parsed.board_height, defaults.board_height);
        assert_eq!(parsed.game_speed, defaults.game_speed);
        assert_eq!(parsed.log_file, None);
    }

    #[test]
    fn test_parse_flags() {
        let parsed = GameSettings::from_iter(vec![
            "snake", "-W", "20", "--board-height", "10", "-s", "50", "--log-file", "snake.log",
        ]);

        assert_eq!(parsed.board_width, 20);
        assert_eq!(parsed.board_height, 10);
        assert_eq!(parsed.tick_interval(), Duration::from_millis(50));
        assert_eq!(parsed.log_file, Some(PathBuf::from("snake.log")));
    }

    #[test]
    fn test_validate() {
        let settings = GameSettings { board_width: 10, board_height: 10, ..GameSettings::default() };
        assert_eq!(settings.validate((12, 14)), Ok(()));
        assert!(matches!(settings.validate((11, 14)), Err(SettingsError::BoardTooLarge { need_w: 12, .. })));
        assert!(matches!(settings.validate((12, 13)), Err(SettingsError::BoardTooLarge { need_h: 14, .. })));

        let empty = GameSettings { board_width: 0, ..settings.clone() };
        assert_eq!(empty.validate((80, 24)), Err(SettingsError::EmptyBoard { width: 0, height: 10 }));

        let frozen = GameSettings { game_speed: 0, ..settings };
        assert_eq!(frozen.validate((80, 24)), Err(SettingsError::ZeroSpeed));
    }
}
