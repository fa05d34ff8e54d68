// state.rs — server-side per-slot and aggregate game state
// Converted from: game_server_protocol.h (client_t, server_game_state_t)
//
// Mirrors the teacher's pattern of a single mutable context struct
// standing in for what the original implementation keeps as globals.

use std::net::SocketAddr;
use std::time::Instant;

use worms_common::constants::MAX_PLAYERS;
use worms_common::event::EventRecord;
use worms_common::prng::PrngState;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GameStatus {
    #[default]
    WaitingForPlayers,
    GameStarted,
}

#[derive(Debug, Clone, Copy)]
pub struct GameParams {
    pub turning_speed: u8,
    pub rounds_per_sec: u32,
    pub board_dimension_x: u32,
    pub board_dimension_y: u32,
}

/// Connection identity for one slot: address, session id, and whether the
/// slot currently holds a live client.
#[derive(Debug, Clone)]
pub struct ConnectionData {
    pub session_id: u64,
    pub is_connection_active: bool,
    pub address: Option<SocketAddr>,
}

impl Default for ConnectionData {
    fn default() -> Self {
        Self {
            session_id: 0,
            is_connection_active: false,
            address: None,
        }
    }
}

/// One of the `MAX_PLAYERS` connection slots the server arbitrates
/// between new and reconnecting clients.
#[derive(Debug, Clone, Default)]
pub struct Slot {
    pub conn: ConnectionData,
    pub direction: i32,
    pub player_number: u8,
    pub turn_direction: u8,
    pub name: String,
    pub x_pos: f64,
    pub y_pos: f64,
    pub ready: bool,
    pub is_playing: bool,
    pub is_spectator: bool,
    /// Set whenever a datagram arrives from this slot; cleared by the
    /// periodic timeout sweep. Equivalent to the original's per-slot
    /// `message` flag checked by its timerfd handler.
    pub message: bool,
    pub last_message_at: Option<Instant>,
}

pub struct ServerGameState {
    pub game_id: u32,
    pub ready_players: u8,
    pub game_status: GameStatus,
    pub connected_players: u8,
    pub slots: Vec<Slot>,
    pub players_count: u8,
    pub game_primary_player_names: Vec<String>,
    pub alive: Vec<bool>,
    pub alive_players_count: u8,
    pub game_params: GameParams,
    pub game_board: Vec<Vec<bool>>,
    pub events: Vec<EventRecord>,
    pub random: PrngState,
}

impl ServerGameState {
    pub fn new(seed: u32, game_params: GameParams) -> Self {
        let board_w = game_params.board_dimension_x as usize;
        let board_h = game_params.board_dimension_y as usize;

        Self {
            game_id: 0,
            ready_players: 0,
            game_status: GameStatus::WaitingForPlayers,
            connected_players: 0,
            slots: vec![Slot::default(); MAX_PLAYERS],
            players_count: 0,
            game_primary_player_names: vec![String::new(); MAX_PLAYERS],
            alive: vec![true; MAX_PLAYERS],
            alive_players_count: 0,
            game_params,
            game_board: vec![vec![false; board_h]; board_w],
            events: Vec::new(),
            random: PrngState::new(seed),
        }
    }

    pub fn events_count(&self) -> u32 {
        self.events.len() as u32
    }

    pub fn find_free_slot(&self) -> Option<usize> {
        self.slots.iter().position(|s| !s.conn.is_connection_active)
    }

    pub fn find_slot_by_address(&self, addr: SocketAddr) -> Option<usize> {
        self.slots
            .iter()
            .position(|s| s.conn.is_connection_active && s.conn.address == Some(addr))
    }

    pub fn name_in_use(&self, name: &str) -> bool {
        !name.is_empty() && self.slots.iter().any(|s| s.name == name)
    }
}
