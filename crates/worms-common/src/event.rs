// event.rs — event record types exchanged between server and client
// Converted from: game_server_protocol.h event_data_t / EVENT_* constants

use crate::constants::{
    EVENT_FIELDS_LENGTH_GAME_OVER, EVENT_FIELDS_LENGTH_NEW_GAME_RAW,
    EVENT_FIELDS_LENGTH_PIXEL, EVENT_FIELDS_LENGTH_PLAYER_ELIMINATED,
};

pub const EVENT_TYPE_NEW_GAME: u8 = 0;
pub const EVENT_TYPE_PIXEL: u8 = 1;
pub const EVENT_TYPE_PLAYER_ELIMINATED: u8 = 2;
pub const EVENT_TYPE_GAME_OVER: u8 = 3;

/// One entry of the server's append-only event log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventRecord {
    NewGame {
        board_width: u32,
        board_height: u32,
        /// Names of players taking part in the game, in the order they
        /// were assigned their player numbers (player 0 first).
        player_names: Vec<String>,
    },
    Pixel {
        player_no: u8,
        x: u32,
        y: u32,
    },
    PlayerEliminated {
        player_no: u8,
    },
    GameOver,
}

impl EventRecord {
    pub fn event_type(&self) -> u8 {
        match self {
            EventRecord::NewGame { .. } => EVENT_TYPE_NEW_GAME,
            EventRecord::Pixel { .. } => EVENT_TYPE_PIXEL,
            EventRecord::PlayerEliminated { .. } => EVENT_TYPE_PLAYER_ELIMINATED,
            EventRecord::GameOver => EVENT_TYPE_GAME_OVER,
        }
    }

    /// Length (in bytes) of the `event_` fields of this record, not
    /// including the leading `len`/`event_no` header nor the trailing CRC.
    pub fn event_fields_length(&self) -> usize {
        match self {
            EventRecord::NewGame { player_names, .. } => {
                EVENT_FIELDS_LENGTH_NEW_GAME_RAW
                    + player_names.iter().map(|n| n.len() + 1).sum::<usize>()
            }
            EventRecord::Pixel { .. } => EVENT_FIELDS_LENGTH_PIXEL,
            EventRecord::PlayerEliminated { .. } => EVENT_FIELDS_LENGTH_PLAYER_ELIMINATED,
            EventRecord::GameOver => EVENT_FIELDS_LENGTH_GAME_OVER,
        }
    }

    /// Total length of the serialized record, header through CRC.
    pub fn record_length(&self) -> usize {
        4 + self.event_fields_length() + 4
    }
}
