// reassembler.rs — client-side session state and catch-up stream ingestion
// Converted from: client_protocol.h/.c (client_game_state_t,
// deserialize_event_record) and the dispatch loop in
// screen-worms-client.c's handle_server_message()

use worms_common::codec::{decode_event_record, DecodedEventKind};
use worms_common::constants::{MAX_PLAYERS, MAX_SERVER_UDP_DGRAM_LENGTH, MIN_SERVER_UDP_DGRAM_LENGTH};
use worms_common::error::EventDecodeError;

/// One fully-applied event, ready to be rendered as a line for the GUI
/// frontend. `GameOver` never reaches the frontend in the original
/// protocol, so it has no variant here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuiEvent {
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
}

/// Per-session client state: tracks which game is in progress, which
/// event is expected next, and the roster needed to validate incoming
/// events against. One fatal ("nonsense") event terminates the client.
pub struct ClientGameState {
    pub game_id: u32,
    pub next_expected: u32,
    pub board_dimension_x: u32,
    pub board_dimension_y: u32,
    pub players_count: u8,
    pub client_turn_direction: u8,
    pub played_any: bool,
    pub game_over: bool,
    pub is_alive: Vec<bool>,
    pub game_players: Vec<String>,
}

impl ClientGameState {
    pub fn new() -> Self {
        Self {
            game_id: 0,
            next_expected: 0,
            board_dimension_x: 0,
            board_dimension_y: 0,
            players_count: 0,
            client_turn_direction: 0,
            played_any: false,
            game_over: true,
            is_alive: vec![true; MAX_PLAYERS],
            game_players: Vec::new(),
        }
    }

    fn begin_new_game(&mut self, game_id: u32) {
        self.game_id = game_id;
        self.next_expected = 0;
        self.players_count = 0;
        self.played_any = true;
        self.game_over = false;
        self.is_alive = vec![true; MAX_PLAYERS];
        self.game_players.clear();
    }

    /// Ingests one UDP datagram from the server. Returns the GUI events to
    /// forward, in order, or an error if the datagram contained nonsense
    /// that should terminate the client. Datagrams too short, too long,
    /// or carrying a stale game id (while a game is still in progress)
    /// are silently ignored, as the reference client does.
    pub fn ingest_datagram(&mut self, buf: &[u8]) -> Result<Vec<GuiEvent>, EventDecodeError> {
        if buf.len() > MAX_SERVER_UDP_DGRAM_LENGTH || buf.len() < MIN_SERVER_UDP_DGRAM_LENGTH {
            return Ok(Vec::new());
        }

        let received_game_id = u32::from_be_bytes(buf[0..4].try_into().unwrap());

        if received_game_id != self.game_id || !self.played_any {
            if self.game_over {
                self.begin_new_game(received_game_id);
            } else {
                return Ok(Vec::new());
            }
        }

        let mut events = Vec::new();
        let mut offset = 4;

        while buf.len() - offset >= worms_common::constants::MINIMAL_EVENT_RECORD_LENGTH {
            match decode_event_record(&buf[offset..]) {
                Err(EventDecodeError::Crc) => break,
                Err(err @ EventDecodeError::Nonsense(_)) => return Err(err),
                Ok(record) => {
                    if let Some(event) = self.apply(record.event_no, &record.kind)? {
                        events.push(event);
                    }
                    offset += record.record_len;
                }
            }
        }

        Ok(events)
    }

    fn apply(
        &mut self,
        event_no: u32,
        kind: &DecodedEventKind,
    ) -> Result<Option<GuiEvent>, EventDecodeError> {
        match kind {
            DecodedEventKind::NewGame {
                board_width,
                board_height,
                player_names,
            } => {
                self.board_dimension_x = *board_width;
                self.board_dimension_y = *board_height;

                if event_no != self.next_expected {
                    return Ok(None);
                }

                self.players_count = player_names.len() as u8;
                self.game_players = player_names.clone();
                self.next_expected += 1;

                Ok(Some(GuiEvent::NewGame {
                    board_width: *board_width,
                    board_height: *board_height,
                    player_names: player_names.clone(),
                }))
            }
            DecodedEventKind::Pixel { player_no, x, y } => {
                if *x >= self.board_dimension_x || *y >= self.board_dimension_y {
                    return Err(EventDecodeError::Nonsense(
                        "PIXEL coordinate outside the board".into(),
                    ));
                }
                if *player_no >= self.players_count {
                    return Err(EventDecodeError::Nonsense(
                        "PIXEL player_no exceeds the player count".into(),
                    ));
                }

                if event_no != self.next_expected {
                    return Ok(None);
                }
                self.next_expected += 1;

                Ok(Some(GuiEvent::Pixel {
                    player_no: *player_no,
                    x: *x,
                    y: *y,
                }))
            }
            DecodedEventKind::PlayerEliminated { player_no } => {
                if *player_no >= self.players_count {
                    return Err(EventDecodeError::Nonsense(
                        "PLAYER_ELIMINATED player_no exceeds the player count".into(),
                    ));
                }

                if event_no != self.next_expected {
                    return Ok(None);
                }

                if !self.is_alive[*player_no as usize] {
                    return Err(EventDecodeError::Nonsense(
                        "PLAYER_ELIMINATED for an already-eliminated player".into(),
                    ));
                }
                self.is_alive[*player_no as usize] = false;
                self.next_expected += 1;

                Ok(Some(GuiEvent::PlayerEliminated {
                    player_no: *player_no,
                }))
            }
            DecodedEventKind::GameOver => {
                if event_no != self.next_expected {
                    return Ok(None);
                }
                self.game_over = true;
                self.next_expected += 1;
                Ok(None)
            }
        }
    }
}

impl Default for ClientGameState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use worms_common::codec::{encode_event_record, pack_events};
    use worms_common::event::EventRecord;

    fn new_game(names: &[&str]) -> EventRecord {
        EventRecord::NewGame {
            board_width: 100,
            board_height: 100,
            player_names: names.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn fresh_game_is_accepted_while_game_over_is_set() {
        let mut state = ClientGameState::new();
        let events = vec![new_game(&["alice", "bob"])];
        let (buf, _) = pack_events(&events, 42, 0, MAX_SERVER_UDP_DGRAM_LENGTH);

        let gui_events = state.ingest_datagram(&buf).unwrap();

        assert_eq!(gui_events.len(), 1);
        assert_eq!(state.game_id, 42);
        assert_eq!(state.players_count, 2);
        assert!(!state.game_over);
    }

    #[test]
    fn datagram_for_a_different_game_is_ignored_mid_game() {
        let mut state = ClientGameState::new();
        let events = vec![new_game(&["alice", "bob"])];
        let (buf, _) = pack_events(&events, 1, 0, MAX_SERVER_UDP_DGRAM_LENGTH);
        state.ingest_datagram(&buf).unwrap();

        let other_events = vec![new_game(&["carol", "dave"])];
        let (other_buf, _) = pack_events(&other_events, 2, 0, MAX_SERVER_UDP_DGRAM_LENGTH);
        let gui_events = state.ingest_datagram(&other_buf).unwrap();

        assert!(gui_events.is_empty());
        assert_eq!(state.game_id, 1);
    }

    #[test]
    fn pixel_outside_board_bounds_is_fatal() {
        let mut state = ClientGameState::new();
        let events = vec![new_game(&["alice", "bob"])];
        let (buf, _) = pack_events(&events, 7, 0, MAX_SERVER_UDP_DGRAM_LENGTH);
        state.ingest_datagram(&buf).unwrap();

        let mut bad = Vec::new();
        bad.extend_from_slice(&7u32.to_be_bytes());
        bad.extend_from_slice(&encode_event_record(
            1,
            &EventRecord::Pixel {
                player_no: 0,
                x: 999,
                y: 0,
            },
        ));

        assert!(state.ingest_datagram(&bad).is_err());
    }

    #[test]
    fn repeated_player_eliminated_is_fatal() {
        let mut state = ClientGameState::new();
        let events = vec![new_game(&["alice", "bob"])];
        let (buf, _) = pack_events(&events, 3, 0, MAX_SERVER_UDP_DGRAM_LENGTH);
        state.ingest_datagram(&buf).unwrap();

        let mut elim = Vec::new();
        elim.extend_from_slice(&3u32.to_be_bytes());
        elim.extend_from_slice(&encode_event_record(
            1,
            &EventRecord::PlayerEliminated { player_no: 0 },
        ));
        state.ingest_datagram(&elim).unwrap();

        let mut elim_again = Vec::new();
        elim_again.extend_from_slice(&3u32.to_be_bytes());
        elim_again.extend_from_slice(&encode_event_record(
            2,
            &EventRecord::PlayerEliminated { player_no: 0 },
        ));
        assert!(state.ingest_datagram(&elim_again).is_err());
    }
}
