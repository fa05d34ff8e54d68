// config.rs — client command-line configuration
// Converted from: screen-worms-client.c parse_program_arguments()

use clap::Parser;
use worms_common::constants::{DEFAULT_GUI_ADDRESS, DEFAULT_GUI_PORT, DEFAULT_SERVER_PORT};
use worms_common::names;

#[derive(Parser, Debug)]
#[command(
    name = "screen-worms-client",
    disable_help_flag = true,
    about = "Screen-worms client mediating between a game server and a local GUI"
)]
pub struct ClientConfig {
    /// Address of the game server to connect to.
    pub server_address: String,

    /// Player name; empty means spectator.
    #[arg(short = 'n', long = "name", default_value = "")]
    pub player_name: String,

    /// Game server UDP port.
    #[arg(short = 'p', long = "port", default_value_t = DEFAULT_SERVER_PORT)]
    pub server_port: u16,

    /// Address of the local GUI server.
    #[arg(short = 'i', long = "gui-address", default_value = DEFAULT_GUI_ADDRESS)]
    pub gui_address: String,

    /// TCP port of the local GUI server.
    #[arg(short = 'r', long = "gui-port", default_value_t = DEFAULT_GUI_PORT)]
    pub gui_port: u16,

    #[arg(long = "help", action = clap::ArgAction::Help, hide = true)]
    help: Option<bool>,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("player name either too long or contains illegal characters")]
    BadPlayerName,
}

impl ClientConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !names::is_legal_name(self.player_name.as_bytes()) {
            return Err(ConfigError::BadPlayerName);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> ClientConfig {
        ClientConfig {
            server_address: "example.org".into(),
            player_name: "alice".into(),
            server_port: DEFAULT_SERVER_PORT,
            gui_address: DEFAULT_GUI_ADDRESS.into(),
            gui_port: DEFAULT_GUI_PORT,
            help: None,
        }
    }

    #[test]
    fn empty_player_name_is_allowed_as_a_spectator() {
        let mut cfg = base();
        cfg.player_name.clear();
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn rejects_illegal_characters_in_player_name() {
        let mut cfg = base();
        cfg.player_name = "bad name".into();
        assert!(matches!(cfg.validate(), Err(ConfigError::BadPlayerName)));
    }
}
