// lib.rs — wire protocol, PRNG and validation shared by the game server
// and its clients.
// Converted from: utils.h/.c, game_server_protocol.h/.c, client_protocol.h/.c

pub mod codec;
pub mod constants;
pub mod crc;
pub mod error;
pub mod event;
pub mod names;
pub mod prng;

pub use codec::{
    decode_client_dgram, decode_event_record, encode_client_dgram, encode_event_record,
    pack_events, ClientDgram, DecodedEventKind, DecodedEventRecord,
};
pub use error::{ClientDgramError, EventDecodeError};
pub use event::EventRecord;
pub use prng::PrngState;
