// event_log.rs — game lifecycle and the append-only event log
// Converted from: game_server_protocol.c (sort_players, initiate_game,
// enqueue_event, update_players_after_game) and the board-update portion
// of screen-worms-server.c (handle_board_update)

use worms_common::constants::MAX_PLAYERS;
use worms_common::event::EventRecord;

use crate::state::{GameStatus, ServerGameState};

/// Reorders slots in ascending name order. Spectator slots (empty name)
/// sort first, exactly as an empty C string is the smallest under
/// `strcmp`. The whole slot (including its live connection) moves as a
/// unit, so in-flight client lookups by address stay correct afterwards.
fn sort_players(state: &mut ServerGameState) {
    state.slots.sort_by(|a, b| a.name.cmp(&b.name));
}

/// Starts a new game once every connected, non-spectator player has
/// marked themselves ready. Assigns player numbers in sorted-name order,
/// draws starting positions/directions from the PRNG, and seeds the
/// event log with `NEW_GAME` followed by one placement event per player.
pub fn initiate_game(state: &mut ServerGameState) {
    sort_players(state);

    for column in state.game_board.iter_mut() {
        column.iter_mut().for_each(|cell| *cell = false);
    }

    state.players_count = state.ready_players;
    state.alive_players_count = state.players_count;
    state.events.clear();

    let mut player_no = 0u8;
    let mut playing_names = Vec::new();
    for slot in state.slots.iter_mut() {
        if slot.is_playing {
            slot.player_number = player_no;
            playing_names.push(slot.name.clone());
            player_no += 1;
        }
    }
    for i in 0..MAX_PLAYERS.min(state.alive.len()) {
        state.alive[i] = true;
    }
    state.game_primary_player_names = playing_names.clone();

    state.game_id = state.random.next();

    state.events.push(EventRecord::NewGame {
        board_width: state.game_params.board_dimension_x,
        board_height: state.game_params.board_dimension_y,
        player_names: playing_names,
    });

    let board_w = state.game_params.board_dimension_x;
    let board_h = state.game_params.board_dimension_y;

    for i in 0..state.slots.len() {
        if !state.slots[i].is_playing {
            continue;
        }

        let x_pos = (state.random.next() % board_w) as f64 + 0.5;
        let y_pos = (state.random.next() % board_h) as f64 + 0.5;
        let direction = (state.random.next() % 360) as i32;

        state.slots[i].x_pos = x_pos;
        state.slots[i].y_pos = y_pos;
        state.slots[i].direction = direction;

        let coord_x = x_pos as i64;
        let coord_y = y_pos as i64;
        let player_number = state.slots[i].player_number;

        let out_of_bounds = coord_x < 0
            || coord_y < 0
            || coord_x as u32 >= board_w
            || coord_y as u32 >= board_h;
        let occupied = !out_of_bounds && state.game_board[coord_x as usize][coord_y as usize];

        if out_of_bounds || occupied {
            state.events.push(EventRecord::PlayerEliminated {
                player_no: player_number,
            });
        } else {
            state.game_board[coord_x as usize][coord_y as usize] = true;
            state.events.push(EventRecord::Pixel {
                player_no: player_number,
                x: coord_x as u32,
                y: coord_y as u32,
            });
        }
    }

    state.game_status = GameStatus::GameStarted;
}

/// Resets per-game bookkeeping once a round ends: every connection with a
/// non-empty name becomes a ready-to-play participant again, and every
/// slot's `ready` flag is cleared for the next lobby phase.
pub fn update_players_after_game(state: &mut ServerGameState) {
    state.ready_players = 0;
    state.players_count = 0;

    for slot in state.slots.iter_mut() {
        slot.ready = false;

        if slot.conn.is_connection_active {
            if !slot.name.is_empty() {
                state.players_count += 1;
                slot.is_playing = true;
                slot.is_spectator = false;
            } else {
                slot.is_playing = false;
                slot.is_spectator = true;
            }
        }
    }
}

/// Advances the simulation by one round: turns, moves, collisions,
/// elimination and (when only one player remains) game-over. Returns the
/// index of the first event appended this round, for broadcast purposes.
pub fn advance_round(state: &mut ServerGameState) -> u32 {
    let first_new_event = state.events_count();
    let board_w = state.game_params.board_dimension_x;
    let board_h = state.game_params.board_dimension_y;
    let turning_speed = state.game_params.turning_speed as i32;

    for i in 0..state.slots.len() {
        if !state.slots[i].is_playing {
            continue;
        }
        if !state.alive[i] {
            continue;
        }

        match state.slots[i].turn_direction {
            1 => state.slots[i].direction += turning_speed,
            2 => state.slots[i].direction -= turning_speed,
            _ => {}
        }
        if state.slots[i].direction < 0 {
            state.slots[i].direction += 360;
        }

        let old_x = state.slots[i].x_pos.floor() as i64;
        let old_y = state.slots[i].y_pos.floor() as i64;

        let radians = state.slots[i].direction as f64 * std::f64::consts::PI / 180.0;
        state.slots[i].x_pos += radians.cos();
        state.slots[i].y_pos += radians.sin();

        let new_x = state.slots[i].x_pos.floor() as i64;
        let new_y = state.slots[i].y_pos.floor() as i64;

        if new_x == old_x && new_y == old_y {
            continue;
        }

        let player_number = state.slots[i].player_number;
        let out_of_bounds =
            new_x < 0 || new_y < 0 || new_x as u32 >= board_w || new_y as u32 >= board_h;
        let occupied = !out_of_bounds && state.game_board[new_x as usize][new_y as usize];

        if out_of_bounds || occupied {
            state.alive_players_count -= 1;
            state.alive[i] = false;
            state.events.push(EventRecord::PlayerEliminated {
                player_no: player_number,
            });
        } else {
            state.game_board[new_x as usize][new_y as usize] = true;
            state.events.push(EventRecord::Pixel {
                player_no: player_number,
                x: new_x as u32,
                y: new_y as u32,
            });
        }

        if state.alive_players_count == 1 {
            state.game_status = GameStatus::WaitingForPlayers;
            state.events.push(EventRecord::GameOver);
            update_players_after_game(state);
            break;
        }
    }

    first_new_event
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{ConnectionData, GameParams, Slot};
    use std::net::{IpAddr, Ipv4Addr, SocketAddr};

    fn params() -> GameParams {
        GameParams {
            turning_speed: 6,
            rounds_per_sec: 50,
            board_dimension_x: 10,
            board_dimension_y: 10,
        }
    }

    fn playing_slot(name: &str) -> Slot {
        Slot {
            conn: ConnectionData {
                session_id: 1,
                is_connection_active: true,
                address: Some(SocketAddr::new(IpAddr::V4(Ipv4Addr::LOCALHOST), 1)),
            },
            name: name.to_string(),
            is_playing: true,
            ready: true,
            ..Default::default()
        }
    }

    #[test]
    fn initiate_game_sorts_names_ascending_and_numbers_players_in_order() {
        let mut state = ServerGameState::new(77, params());
        state.slots[0] = playing_slot("bob");
        state.slots[1] = playing_slot("alice");
        state.ready_players = 2;

        initiate_game(&mut state);

        assert_eq!(state.game_primary_player_names, vec!["alice", "bob"]);
        match &state.events[0] {
            EventRecord::NewGame { player_names, .. } => {
                assert_eq!(player_names, &vec!["alice".to_string(), "bob".to_string()]);
            }
            other => panic!("expected NewGame, got {other:?}"),
        }
    }

    #[test]
    fn initiate_game_emits_one_placement_event_per_player() {
        let mut state = ServerGameState::new(1, params());
        state.slots[0] = playing_slot("alice");
        state.slots[1] = playing_slot("bob");
        state.ready_players = 2;

        initiate_game(&mut state);

        // NEW_GAME + one placement event per player.
        assert_eq!(state.events.len(), 3);
    }

    #[test]
    fn round_with_one_survivor_ends_the_game() {
        let mut state = ServerGameState::new(1, params());
        state.slots[0] = playing_slot("alice");
        state.slots[1] = playing_slot("bob");
        state.ready_players = 2;
        initiate_game(&mut state);

        // Pin alice's position/heading so her next move deterministically
        // crosses into a new, already-occupied cell.
        state.slots[0].x_pos = 4.9;
        state.slots[0].y_pos = 4.9;
        state.slots[0].direction = 0;
        state.alive_players_count = 2;
        state.game_board = vec![vec![true; 10]; 10];

        advance_round(&mut state);
        assert_eq!(state.game_status, GameStatus::WaitingForPlayers);
        assert!(matches!(state.events.last(), Some(EventRecord::GameOver)));
    }
}
