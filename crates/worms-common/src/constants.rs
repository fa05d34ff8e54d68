// constants.rs — numeric limits shared by server and client
// Converted from: utils.h

pub const MAX_PLAYERS: usize = 25;
pub const MAX_PLAYER_NAME_LENGTH: usize = 20;

pub const DEFAULT_TURNING_SPEED: u8 = 6;
pub const DEFAULT_ROUNDS_PER_SEC: u32 = 50;
pub const DEFAULT_BOARD_WIDTH: u32 = 640;
pub const DEFAULT_BOARD_HEIGHT: u32 = 480;

pub const MAX_X_SIZE: u32 = 1920;
pub const MAX_Y_SIZE: u32 = 1440;
pub const MAX_TURNING_SPEED: u8 = 90;
pub const MAX_ROUNDS_PER_SEC: u32 = 100;

pub const PLAYER_NAME_MINIMAL_ASCII: u8 = 33;
pub const PLAYER_NAME_MAXIMAL_ASCII: u8 = 126;

pub const SEED_MULTIPLIER: u64 = 279_410_273;
pub const SEED_MODULUS: u64 = 4_294_967_291;

pub const DEFAULT_SERVER_PORT: u16 = 2021;
pub const DEFAULT_GUI_PORT: u16 = 20210;
pub const DEFAULT_GUI_ADDRESS: &str = "localhost";

pub const CLIENT_KEEPALIVE_MILLIS: u64 = 30;
pub const CLIENT_TIMEOUT_SECS: u64 = 2;

/// Exact summary size of the integer fields stored in a client datagram.
pub const CLIENT_DGRAM_INTEGERS_LEN: usize = 13;
/// Maximum length of a client datagram (integers + longest legal name).
pub const MAX_CLIENT_DGRAM_LENGTH: usize = 33;

/// Minimal length of a single UDP datagram a well-behaved server sends.
pub const MIN_SERVER_UDP_DGRAM_LENGTH: usize = 17;
/// Maximum length of a single UDP datagram the game server may send.
pub const MAX_SERVER_UDP_DGRAM_LENGTH: usize = 550;

pub const MINIMAL_EVENT_RECORD_LENGTH: usize = 13;

pub const EVENT_RECORD_LENGTH_PIXEL: usize = 22;
pub const EVENT_RECORD_LENGTH_PLAYER_ELIMINATED: usize = 14;
pub const EVENT_RECORD_LENGTH_GAME_OVER: usize = 13;

pub const EVENT_FIELDS_LENGTH_PIXEL: usize = 14;
pub const EVENT_FIELDS_LENGTH_PLAYER_ELIMINATED: usize = 6;
pub const EVENT_FIELDS_LENGTH_GAME_OVER: usize = 5;
pub const EVENT_FIELDS_LENGTH_NEW_GAME_RAW: usize = 13;

pub const DEFAULT_EVENTS_QUEUE_CAPACITY: usize = 4096;
