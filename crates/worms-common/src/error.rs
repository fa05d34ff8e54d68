// error.rs — fatal / non-fatal error taxonomy shared by server and client
// Converted from: the -1 / -2 sentinel returns of client_protocol.c
// deserialize_event_record() and deserialize_client_dgram()

use thiserror::Error;

/// A client→server datagram that could not be interpreted at all. The
/// server silently discards these; they are never fatal.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ClientDgramError {
    #[error("datagram length {0} outside the legal client datagram range")]
    BadLength(usize),
    #[error("turn_direction {0} is not one of 0, 1, 2")]
    BadTurnDirection(u8),
    #[error("player name contains a byte outside the printable ASCII range")]
    BadNameCharacter,
}

/// Outcome of decoding one event record on the client. `Crc` is
/// non-fatal — the client simply stops parsing the current datagram.
/// `Nonsense` is fatal and terminates the client process.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EventDecodeError {
    #[error("CRC-32 checksum mismatch")]
    Crc,
    #[error("nonsense event record: {0}")]
    Nonsense(String),
}

impl EventDecodeError {
    pub fn is_fatal(&self) -> bool {
        matches!(self, EventDecodeError::Nonsense(_))
    }
}
