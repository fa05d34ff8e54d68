// config.rs — server command-line configuration
// Converted from: screen-worms-server.c parse_program_arguments()/main()
// argument validation; parsed with clap instead of getopt.

use std::time::{SystemTime, UNIX_EPOCH};

use clap::Parser;
use worms_common::constants::{
    DEFAULT_BOARD_HEIGHT, DEFAULT_BOARD_WIDTH, DEFAULT_ROUNDS_PER_SEC, DEFAULT_SERVER_PORT,
    DEFAULT_TURNING_SPEED, MAX_ROUNDS_PER_SEC, MAX_TURNING_SPEED, MAX_X_SIZE, MAX_Y_SIZE,
};

#[derive(Parser, Debug)]
#[command(
    name = "screen-worms-server",
    disable_help_flag = true,
    about = "Authoritative screen-worms game server"
)]
pub struct ServerConfig {
    /// UDP port to listen on.
    #[arg(short = 'p', long = "port", default_value_t = DEFAULT_SERVER_PORT)]
    pub port: u16,

    /// Seed for the deterministic PRNG; defaults to the current time.
    #[arg(short = 's', long = "seed")]
    pub seed: Option<u32>,

    /// Per-round turning speed in degrees, 1..=90.
    #[arg(short = 't', long = "turning-speed", default_value_t = DEFAULT_TURNING_SPEED)]
    pub turning_speed: u8,

    /// Rounds simulated per second, 1..=100.
    #[arg(short = 'v', long = "rounds-per-sec", default_value_t = DEFAULT_ROUNDS_PER_SEC)]
    pub rounds_per_sec: u32,

    /// Board width in pixels, 1..=1920.
    #[arg(short = 'w', long = "width", default_value_t = DEFAULT_BOARD_WIDTH)]
    pub board_width: u32,

    /// Board height in pixels, 1..=1440.
    #[arg(short = 'h', long = "height", default_value_t = DEFAULT_BOARD_HEIGHT)]
    pub board_height: u32,

    #[arg(long = "help", action = clap::ArgAction::Help, hide = true)]
    help: Option<bool>,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("board dimensions must be positive and at most {MAX_X_SIZE}x{MAX_Y_SIZE}")]
    BadBoardDimensions,
    #[error("turning speed must be in 1..={MAX_TURNING_SPEED}")]
    BadTurningSpeed,
    #[error("rounds per second must be in 1..={MAX_ROUNDS_PER_SEC}")]
    BadRoundsPerSec,
}

impl ServerConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.board_width == 0
            || self.board_height == 0
            || self.board_width > MAX_X_SIZE
            || self.board_height > MAX_Y_SIZE
        {
            return Err(ConfigError::BadBoardDimensions);
        }
        if self.turning_speed == 0 || self.turning_speed > MAX_TURNING_SPEED {
            return Err(ConfigError::BadTurningSpeed);
        }
        if self.rounds_per_sec == 0 || self.rounds_per_sec > MAX_ROUNDS_PER_SEC {
            return Err(ConfigError::BadRoundsPerSec);
        }
        Ok(())
    }

    pub fn effective_seed(&self) -> u32 {
        self.seed.unwrap_or_else(|| {
            SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_secs() as u32)
                .unwrap_or(0)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> ServerConfig {
        ServerConfig {
            port: DEFAULT_SERVER_PORT,
            seed: Some(1),
            turning_speed: DEFAULT_TURNING_SPEED,
            rounds_per_sec: DEFAULT_ROUNDS_PER_SEC,
            board_width: DEFAULT_BOARD_WIDTH,
            board_height: DEFAULT_BOARD_HEIGHT,
            help: None,
        }
    }

    #[test]
    fn defaults_validate() {
        assert!(base().validate().is_ok());
    }

    #[test]
    fn rejects_zero_board_dimensions() {
        let mut cfg = base();
        cfg.board_width = 0;
        assert!(matches!(cfg.validate(), Err(ConfigError::BadBoardDimensions)));
    }

    #[test]
    fn rejects_oversized_turning_speed() {
        let mut cfg = base();
        cfg.turning_speed = MAX_TURNING_SPEED + 1;
        assert!(matches!(cfg.validate(), Err(ConfigError::BadTurningSpeed)));
    }

    #[test]
    fn explicit_seed_is_used_verbatim() {
        let cfg = base();
        assert_eq!(cfg.effective_seed(), 1);
    }
}
