// codec.rs — binary wire framing for both the client->server datagram and
// the server->client event stream.
// Converted from: game_server_protocol.c (serialize_event_record,
// pack_events) and client_protocol.c (serialize_client_dgram,
// deserialize_client_dgram, deserialize_event_record)

use crate::constants::{
    CLIENT_DGRAM_INTEGERS_LEN, EVENT_FIELDS_LENGTH_NEW_GAME_RAW, EVENT_RECORD_LENGTH_GAME_OVER,
    EVENT_RECORD_LENGTH_PIXEL, EVENT_RECORD_LENGTH_PLAYER_ELIMINATED, MAX_CLIENT_DGRAM_LENGTH,
    MAX_PLAYER_NAME_LENGTH, MINIMAL_EVENT_RECORD_LENGTH,
};
use crate::crc::crc_32;
use crate::error::{ClientDgramError, EventDecodeError};
use crate::event::{
    EventRecord, EVENT_TYPE_GAME_OVER, EVENT_TYPE_NEW_GAME, EVENT_TYPE_PIXEL,
    EVENT_TYPE_PLAYER_ELIMINATED,
};
use crate::names::{is_legal_name_byte, names_strictly_ascending};

/// A parsed client->server keepalive/control datagram.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientDgram {
    pub session_id: u64,
    pub turn_direction: u8,
    pub next_expected_event_no: u32,
    pub player_name: String,
}

pub fn encode_client_dgram(dgram: &ClientDgram) -> Vec<u8> {
    let mut buf = Vec::with_capacity(CLIENT_DGRAM_INTEGERS_LEN + dgram.player_name.len());
    buf.extend_from_slice(&dgram.session_id.to_be_bytes());
    buf.push(dgram.turn_direction);
    buf.extend_from_slice(&dgram.next_expected_event_no.to_be_bytes());
    buf.extend_from_slice(dgram.player_name.as_bytes());
    buf
}

pub fn decode_client_dgram(buf: &[u8]) -> Result<ClientDgram, ClientDgramError> {
    if buf.len() > MAX_CLIENT_DGRAM_LENGTH || buf.len() < CLIENT_DGRAM_INTEGERS_LEN {
        return Err(ClientDgramError::BadLength(buf.len()));
    }

    let session_id = u64::from_be_bytes(buf[0..8].try_into().unwrap());
    let turn_direction = buf[8];
    if !matches!(turn_direction, 0 | 1 | 2) {
        return Err(ClientDgramError::BadTurnDirection(turn_direction));
    }
    let next_expected_event_no = u32::from_be_bytes(buf[9..13].try_into().unwrap());

    let name_bytes = &buf[CLIENT_DGRAM_INTEGERS_LEN..];
    if !name_bytes.iter().all(|&b| is_legal_name_byte(b)) {
        return Err(ClientDgramError::BadNameCharacter);
    }
    let player_name = String::from_utf8(name_bytes.to_vec()).expect("validated ASCII range");

    Ok(ClientDgram {
        session_id,
        turn_direction,
        next_expected_event_no,
        player_name,
    })
}

/// Serialize one event record with its `event_no` header and trailing
/// CRC-32, in the exact layout `send_game_data`/`broadcast_events` expect.
pub fn encode_event_record(event_no: u32, record: &EventRecord) -> Vec<u8> {
    let fields_len = record.event_fields_length() as u32;
    let mut buf = Vec::with_capacity(4 + fields_len as usize + 4);
    buf.extend_from_slice(&fields_len.to_be_bytes());
    buf.extend_from_slice(&event_no.to_be_bytes());

    match record {
        EventRecord::NewGame {
            board_width,
            board_height,
            player_names,
        } => {
            buf.push(EVENT_TYPE_NEW_GAME);
            buf.extend_from_slice(&board_width.to_be_bytes());
            buf.extend_from_slice(&board_height.to_be_bytes());
            for name in player_names {
                buf.extend_from_slice(name.as_bytes());
                buf.push(0);
            }
        }
        EventRecord::Pixel { player_no, x, y } => {
            buf.push(EVENT_TYPE_PIXEL);
            buf.push(*player_no);
            buf.extend_from_slice(&x.to_be_bytes());
            buf.extend_from_slice(&y.to_be_bytes());
        }
        EventRecord::PlayerEliminated { player_no } => {
            buf.push(EVENT_TYPE_PLAYER_ELIMINATED);
            buf.push(*player_no);
        }
        EventRecord::GameOver => {
            buf.push(EVENT_TYPE_GAME_OVER);
        }
    }

    let crc = crc_32(&buf);
    buf.extend_from_slice(&crc.to_be_bytes());
    buf
}

/// Pack as many events starting at `from` as fit in `budget` bytes,
/// prefixing the datagram with `game_id`. Returns the encoded datagram and
/// the event_no of the first event that was *not* packed (== `events.len()`
/// once the whole log has been sent). Packing stops as soon as the next
/// record would overflow the budget, for every record type alike.
pub fn pack_events(events: &[EventRecord], game_id: u32, from: u32, budget: usize) -> (Vec<u8>, u32) {
    let mut buf = Vec::with_capacity(budget);
    buf.extend_from_slice(&game_id.to_be_bytes());
    let mut free_space = budget.saturating_sub(4);

    let mut event_no = from;
    while (event_no as usize) < events.len() {
        let record = &events[event_no as usize];

        if record.record_length() > free_space {
            break;
        }

        let encoded = encode_event_record(event_no, record);
        free_space = free_space.saturating_sub(encoded.len());
        buf.extend_from_slice(&encoded);
        event_no += 1;
    }

    (buf, event_no)
}

/// Decoded form of one wire event record, independent of client-side
/// session state (board dimensions, alive/player tables) — those checks
/// happen in the reassembler, which has that state available.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedEventRecord {
    pub event_no: u32,
    pub record_len: usize,
    pub kind: DecodedEventKind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodedEventKind {
    NewGame {
        board_width: u32,
        board_height: u32,
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

fn parse_player_names(buf: &[u8]) -> Result<Vec<String>, EventDecodeError> {
    let mut names = Vec::new();
    let mut current = Vec::new();

    for &b in buf {
        if is_legal_name_byte(b) {
            current.push(b);
        } else if b == 0 {
            if current.is_empty() {
                return Err(EventDecodeError::Nonsense("empty player name".into()));
            }
            names.push(String::from_utf8(std::mem::take(&mut current)).unwrap());
        } else {
            return Err(EventDecodeError::Nonsense(
                "illegal character in player name".into(),
            ));
        }

        if current.len() > MAX_PLAYER_NAME_LENGTH {
            return Err(EventDecodeError::Nonsense("player name too long".into()));
        }
    }

    if !current.is_empty() {
        return Err(EventDecodeError::Nonsense(
            "player name not NUL-terminated".into(),
        ));
    }

    Ok(names)
}

/// Decode one event record from `buf`, validating its CRC and wire-level
/// shape only. `buf` may contain trailing bytes belonging to later
/// records in the same datagram.
pub fn decode_event_record(buf: &[u8]) -> Result<DecodedEventRecord, EventDecodeError> {
    if buf.len() < MINIMAL_EVENT_RECORD_LENGTH {
        return Err(EventDecodeError::Nonsense(
            "record shorter than the minimal event record length".into(),
        ));
    }

    let event_fields_len = u32::from_be_bytes(buf[0..4].try_into().unwrap()) as usize;
    let event_no = u32::from_be_bytes(buf[4..8].try_into().unwrap());
    let event_type = buf[8];

    let record_len = event_fields_len + 8;
    if record_len > buf.len() {
        return Err(EventDecodeError::Nonsense(
            "record length exceeds remaining datagram bytes".into(),
        ));
    }

    let crc_expected = u32::from_be_bytes(
        buf[4 + event_fields_len..4 + event_fields_len + 4]
            .try_into()
            .unwrap(),
    );
    if crc_32(&buf[..4 + event_fields_len]) != crc_expected {
        return Err(EventDecodeError::Crc);
    }

    let kind = match event_type {
        EVENT_TYPE_NEW_GAME => {
            if event_no != 0 {
                return Err(EventDecodeError::Nonsense(
                    "NEW_GAME record with nonzero event_no".into(),
                ));
            }
            if event_fields_len < EVENT_FIELDS_LENGTH_NEW_GAME_RAW {
                return Err(EventDecodeError::Nonsense(
                    "NEW_GAME fields shorter than the minimal raw length".into(),
                ));
            }

            let board_width = u32::from_be_bytes(buf[9..13].try_into().unwrap());
            let board_height = u32::from_be_bytes(buf[13..17].try_into().unwrap());
            let names_total = event_fields_len - EVENT_FIELDS_LENGTH_NEW_GAME_RAW;

            let player_names = parse_player_names(&buf[17..17 + names_total])?;
            if player_names.len() < 2 {
                return Err(EventDecodeError::Nonsense(
                    "NEW_GAME must list at least two player names".into(),
                ));
            }
            if !names_strictly_ascending(&player_names) {
                return Err(EventDecodeError::Nonsense(
                    "player names not in strictly ascending order".into(),
                ));
            }

            DecodedEventKind::NewGame {
                board_width,
                board_height,
                player_names,
            }
        }
        EVENT_TYPE_PIXEL => {
            if record_len != EVENT_RECORD_LENGTH_PIXEL {
                return Err(EventDecodeError::Nonsense(
                    "PIXEL record has the wrong length".into(),
                ));
            }
            let player_no = buf[9];
            let x = u32::from_be_bytes(buf[10..14].try_into().unwrap());
            let y = u32::from_be_bytes(buf[14..18].try_into().unwrap());
            DecodedEventKind::Pixel { player_no, x, y }
        }
        EVENT_TYPE_PLAYER_ELIMINATED => {
            if record_len != EVENT_RECORD_LENGTH_PLAYER_ELIMINATED {
                return Err(EventDecodeError::Nonsense(
                    "PLAYER_ELIMINATED record has the wrong length".into(),
                ));
            }
            let player_no = buf[9];
            DecodedEventKind::PlayerEliminated { player_no }
        }
        EVENT_TYPE_GAME_OVER => {
            if record_len != EVENT_RECORD_LENGTH_GAME_OVER {
                return Err(EventDecodeError::Nonsense(
                    "GAME_OVER record has the wrong length".into(),
                ));
            }
            DecodedEventKind::GameOver
        }
        other => {
            return Err(EventDecodeError::Nonsense(format!(
                "unknown event type {other}"
            )));
        }
    };

    Ok(DecodedEventRecord {
        event_no,
        record_len,
        kind,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_game_round_trips_and_matches_expected_length() {
        let record = EventRecord::NewGame {
            board_width: 640,
            board_height: 480,
            player_names: vec!["alice".to_string(), "bob".to_string()],
        };
        let encoded = encode_event_record(0, &record);
        // header(8) + type(1) + x(4) + y(4) + "alice\0"(6) + "bob\0"(4) + crc(4)
        assert_eq!(encoded.len(), 8 + 1 + 4 + 4 + 6 + 4 + 4);

        let decoded = decode_event_record(&encoded).unwrap();
        assert_eq!(decoded.event_no, 0);
        assert_eq!(decoded.record_len, encoded.len());
        match decoded.kind {
            DecodedEventKind::NewGame {
                board_width,
                board_height,
                player_names,
            } => {
                assert_eq!(board_width, 640);
                assert_eq!(board_height, 480);
                assert_eq!(player_names, vec!["alice", "bob"]);
            }
            other => panic!("unexpected kind: {other:?}"),
        }
    }

    #[test]
    fn pixel_record_is_exactly_22_bytes() {
        let record = EventRecord::Pixel {
            player_no: 3,
            x: 100,
            y: 200,
        };
        let encoded = encode_event_record(5, &record);
        assert_eq!(encoded.len(), EVENT_RECORD_LENGTH_PIXEL);

        let decoded = decode_event_record(&encoded).unwrap();
        assert_eq!(decoded.event_no, 5);
        assert_eq!(
            decoded.kind,
            DecodedEventKind::Pixel {
                player_no: 3,
                x: 100,
                y: 200
            }
        );
    }

    #[test]
    fn corrupted_crc_is_rejected_non_fatally() {
        let record = EventRecord::GameOver;
        let mut encoded = encode_event_record(7, &record);
        let last = encoded.len() - 1;
        encoded[last] ^= 0xFF;
        assert_eq!(decode_event_record(&encoded), Err(EventDecodeError::Crc));
    }

    #[test]
    fn wrong_length_pixel_record_is_fatal_nonsense() {
        let record = EventRecord::Pixel {
            player_no: 0,
            x: 1,
            y: 1,
        };
        let mut encoded = encode_event_record(0, &record);
        // Lie about the fields length so the fixed-size check fails.
        let bad_len: u32 = (encoded.len() as u32 - 8) + 1;
        encoded[0..4].copy_from_slice(&bad_len.to_be_bytes());
        let err = decode_event_record(&encoded[..encoded.len() - 1]);
        assert!(matches!(err, Err(EventDecodeError::Nonsense(_))));
    }

    #[test]
    fn new_game_with_fewer_than_two_names_is_fatal_nonsense() {
        let record = EventRecord::NewGame {
            board_width: 640,
            board_height: 480,
            player_names: vec!["alice".to_string()],
        };
        let encoded = encode_event_record(0, &record);
        assert!(matches!(
            decode_event_record(&encoded),
            Err(EventDecodeError::Nonsense(_))
        ));
    }

    #[test]
    fn client_dgram_round_trips() {
        let dgram = ClientDgram {
            session_id: 0x0102030405060708,
            turn_direction: 1,
            next_expected_event_no: 42,
            player_name: "alice".to_string(),
        };
        let encoded = encode_client_dgram(&dgram);
        assert_eq!(encoded.len(), CLIENT_DGRAM_INTEGERS_LEN + 5);
        assert_eq!(decode_client_dgram(&encoded).unwrap(), dgram);
    }

    #[test]
    fn client_dgram_rejects_bad_turn_direction() {
        let mut encoded = encode_client_dgram(&ClientDgram {
            session_id: 1,
            turn_direction: 0,
            next_expected_event_no: 0,
            player_name: String::new(),
        });
        encoded[8] = 9;
        assert_eq!(
            decode_client_dgram(&encoded),
            Err(ClientDgramError::BadTurnDirection(9))
        );
    }

    #[test]
    fn pack_events_respects_budget_and_resumes_from_cutoff() {
        let events: Vec<EventRecord> = (0..10)
            .map(|i| EventRecord::Pixel {
                player_no: 0,
                x: i,
                y: i,
            })
            .collect();
        let (buf, next) = pack_events(&events, 99, 0, 4 + 3 * EVENT_RECORD_LENGTH_PIXEL);
        assert_eq!(next, 3);
        assert_eq!(buf.len(), 4 + 3 * EVENT_RECORD_LENGTH_PIXEL);

        let (buf2, next2) = pack_events(&events, 99, next, 4 + 3 * EVENT_RECORD_LENGTH_PIXEL);
        assert_eq!(next2, 6);
        assert_eq!(&buf2[0..4], &99u32.to_be_bytes());
    }

    #[test]
    fn pack_events_withholds_a_new_game_record_that_would_overflow_the_budget() {
        let events = vec![EventRecord::NewGame {
            board_width: 640,
            board_height: 480,
            player_names: vec!["alice".to_string(), "bob".to_string()],
        }];
        let too_small = 4 + events[0].record_length() - 1;
        let (buf, next) = pack_events(&events, 1, 0, too_small);
        assert_eq!(next, 0);
        assert_eq!(buf.len(), 4);
    }
}
