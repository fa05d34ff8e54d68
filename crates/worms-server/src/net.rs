// net.rs — single-task UDP event loop: admission, reconnection
// arbitration, round ticking and catch-up resend.
// Converted from: screen-worms-server.c (handle_timers, handle_new_client,
// handle_existing_client, handle_client_datagram, handle_board_update, main)

use std::net::SocketAddr;
use std::time::{Duration, Instant};

use tokio::net::UdpSocket;
use tokio::time::{interval, Interval, MissedTickBehavior};
use tracing::{info, warn};

use worms_common::codec::{decode_client_dgram, ClientDgram};
use worms_common::constants::{
    CLIENT_DGRAM_INTEGERS_LEN, CLIENT_TIMEOUT_SECS, MAX_PLAYERS, MAX_SERVER_UDP_DGRAM_LENGTH,
};
use worms_common::pack_events;

use crate::event_log::{advance_round, initiate_game};
use crate::state::{GameStatus, ServerGameState, Slot};

fn round_period(state: &ServerGameState) -> Duration {
    let relay_millis = (1000.0 / state.game_params.rounds_per_sec as f64) as u64;
    Duration::from_millis(relay_millis.max(1))
}

fn sync_round_timer(state: &ServerGameState, round_timer: &mut Option<Interval>) {
    match state.game_status {
        GameStatus::GameStarted if round_timer.is_none() => {
            let mut iv = interval(round_period(state));
            iv.set_missed_tick_behavior(MissedTickBehavior::Delay);
            *round_timer = Some(iv);
        }
        GameStatus::WaitingForPlayers => *round_timer = None,
        _ => {}
    }
}

async fn send_datagram(socket: &UdpSocket, buf: &[u8], addr: SocketAddr) {
    if let Err(e) = socket.send_to(buf, addr).await {
        warn!(%addr, error = %e, "sendto failed");
    }
}

async fn send_game_data(state: &ServerGameState, socket: &UdpSocket, since_event: u32, slot_idx: usize) {
    let Some(addr) = state.slots[slot_idx].conn.address else {
        return;
    };

    let mut first_not_sent = since_event;
    while (first_not_sent as usize) < state.events.len() {
        let (buf, next) = pack_events(
            &state.events,
            state.game_id,
            first_not_sent,
            MAX_SERVER_UDP_DGRAM_LENGTH,
        );
        send_datagram(socket, &buf, addr).await;
        first_not_sent = next;
    }
}

async fn broadcast_events(state: &ServerGameState, socket: &UdpSocket, since_event: u32) {
    let mut first_not_sent = since_event;
    while (first_not_sent as usize) < state.events.len() {
        let (buf, next) = pack_events(
            &state.events,
            state.game_id,
            first_not_sent,
            MAX_SERVER_UDP_DGRAM_LENGTH,
        );
        for slot in &state.slots {
            if let Some(addr) = slot.conn.address.filter(|_| slot.conn.is_connection_active) {
                send_datagram(socket, &buf, addr).await;
            }
        }
        first_not_sent = next;
    }
}

/// A slot's 2-second timeout has elapsed without a datagram: evict it and,
/// if the lobby is left with enough ready players, start the game.
fn disconnect_timed_out_slot(state: &mut ServerGameState, idx: usize) {
    let slot = &mut state.slots[idx];
    slot.conn.is_connection_active = false;
    state.connected_players -= 1;

    let had_name = !slot.name.is_empty();
    slot.name.clear();

    if state.game_status == GameStatus::WaitingForPlayers {
        if slot.ready {
            slot.ready = false;
            state.ready_players -= 1;
        }
        if had_name {
            state.players_count -= 1;
        }

        if state.ready_players == state.players_count && state.ready_players > 1 {
            initiate_game(state);
        }
    }
}

fn handle_timers(state: &mut ServerGameState, now: Instant) {
    for i in 0..state.slots.len() {
        if !state.slots[i].conn.is_connection_active {
            continue;
        }

        let timed_out = match state.slots[i].last_message_at {
            Some(t) => now.duration_since(t) >= Duration::from_secs(CLIENT_TIMEOUT_SECS),
            None => false,
        };

        if timed_out && !state.slots[i].message {
            disconnect_timed_out_slot(state, i);
        }
        state.slots[i].message = false;
    }
}

fn handle_new_client(state: &mut ServerGameState, addr: SocketAddr, dgram: &ClientDgram, now: Instant) {
    if state.connected_players as usize == MAX_PLAYERS {
        return;
    }

    let Some(idx) = state.find_free_slot() else {
        return;
    };

    let name = dgram.player_name.clone();
    let slot = &mut state.slots[idx];
    *slot = Slot::default();
    slot.conn.session_id = dgram.session_id;
    slot.conn.is_connection_active = true;
    slot.conn.address = Some(addr);
    slot.last_message_at = Some(now);

    state.connected_players += 1;

    if state.game_status == GameStatus::GameStarted {
        slot.is_spectator = true;
    } else if !name.is_empty() {
        slot.is_playing = true;
        state.players_count += 1;

        if dgram.turn_direction != 0 {
            slot.ready = true;
            state.ready_players += 1;
        }
        slot.turn_direction = dgram.turn_direction;
    } else {
        slot.is_spectator = true;
    }

    slot.name = name;

    info!(%addr, slot = idx, "client connected");

    if state.game_status == GameStatus::WaitingForPlayers
        && state.ready_players == state.players_count
        && state.players_count > 1
    {
        initiate_game(state);
    }
}

fn handle_existing_client(state: &mut ServerGameState, idx: usize, dgram: &ClientDgram, now: Instant) {
    let name = &dgram.player_name;

    if dgram.session_id > state.slots[idx].conn.session_id {
        state.slots[idx].conn.session_id = dgram.session_id;

        if state.game_status == GameStatus::GameStarted {
            state.slots[idx].is_spectator = true;
            state.slots[idx].name = name.clone();
        } else if state.slots[idx].name.is_empty() {
            if !name.is_empty() {
                state.slots[idx].is_spectator = false;
                state.players_count += 1;

                if dgram.turn_direction != 0 {
                    state.ready_players += 1;
                }
            }
            state.slots[idx].name = name.clone();
        } else if name.is_empty() {
            state.slots[idx].is_spectator = true;
            state.players_count -= 1;

            if state.slots[idx].ready {
                state.slots[idx].ready = false;
                state.ready_players -= 1;
            }
            state.slots[idx].name.clear();
        } else {
            state.slots[idx].name = name.clone();
        }

        state.slots[idx].last_message_at = Some(now);
    } else if dgram.session_id < state.slots[idx].conn.session_id {
        // Ignore datagrams carrying a smaller session id.
    } else if &state.slots[idx].name == name {
        if state.game_status == GameStatus::WaitingForPlayers {
            if dgram.turn_direction != 0 && !state.slots[idx].ready {
                state.slots[idx].ready = true;
                state.ready_players += 1;
            }
            state.slots[idx].turn_direction = dgram.turn_direction;
        } else if !state.slots[idx].is_spectator && state.alive[idx] {
            state.slots[idx].turn_direction = dgram.turn_direction;
        }

        state.slots[idx].message = true;
        state.slots[idx].last_message_at = Some(now);
    }
}

async fn handle_client_datagram(
    state: &mut ServerGameState,
    socket: &UdpSocket,
    buf: &[u8],
    addr: SocketAddr,
    now: Instant,
) {
    let Ok(dgram) = decode_client_dgram(buf) else {
        return;
    };

    let name_len = buf.len() - CLIENT_DGRAM_INTEGERS_LEN;
    let exists_name = name_len > 0 && state.name_in_use(&dgram.player_name);
    let addr_index = state.find_slot_by_address(addr);

    if let Some(idx) = addr_index {
        handle_existing_client(state, idx, &dgram, now);
        send_game_data(state, socket, dgram.next_expected_event_no, idx).await;
    } else if !exists_name {
        handle_new_client(state, addr, &dgram, now);
        if let Some(idx) = state.find_slot_by_address(addr) {
            send_game_data(state, socket, dgram.next_expected_event_no, idx).await;
        }
    }
}

/// Drives the server's single event loop: round ticking, the per-slot
/// timeout sweep, and one inbound datagram per iteration, in that
/// priority order.
pub async fn run(socket: UdpSocket, mut state: ServerGameState) -> anyhow::Result<()> {
    let mut round_timer: Option<Interval> = None;
    let mut sweep = interval(Duration::from_millis(250));
    sweep.set_missed_tick_behavior(MissedTickBehavior::Delay);

    let mut buf = vec![0u8; MAX_SERVER_UDP_DGRAM_LENGTH + 1];

    loop {
        tokio::select! {
            biased;

            _ = async { round_timer.as_mut().unwrap().tick().await }, if round_timer.is_some() => {
                if state.game_status == GameStatus::GameStarted {
                    let first_new = advance_round(&mut state);
                    broadcast_events(&state, &socket, first_new).await;
                }
                sync_round_timer(&state, &mut round_timer);
            }

            _ = sweep.tick() => {
                handle_timers(&mut state, Instant::now());
                sync_round_timer(&state, &mut round_timer);
            }

            res = socket.recv_from(&mut buf) => {
                let (len, addr) = res?;
                let first_before = state.events_count();
                handle_client_datagram(&mut state, &socket, &buf[..len], addr, Instant::now()).await;
                if state.events_count() > first_before {
                    broadcast_events(&state, &socket, first_before).await;
                }
                sync_round_timer(&state, &mut round_timer);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::GameParams;

    fn params() -> GameParams {
        GameParams {
            turning_speed: 6,
            rounds_per_sec: 50,
            board_dimension_x: 100,
            board_dimension_y: 100,
        }
    }

    #[test]
    fn round_period_truncates_like_the_reference_implementation() {
        let mut state = ServerGameState::new(1, params());
        state.game_params.rounds_per_sec = 50;
        assert_eq!(round_period(&state), Duration::from_millis(20));
    }

    #[test]
    fn disconnect_during_lobby_starts_game_if_ready_players_remain() {
        let mut state = ServerGameState::new(1, params());
        state.slots[0].conn.is_connection_active = true;
        state.slots[0].name = "alice".into();
        state.slots[0].is_playing = true;
        state.slots[0].ready = true;

        state.slots[1].conn.is_connection_active = true;
        state.slots[1].name = "bob".into();
        state.slots[1].is_playing = true;
        state.slots[1].ready = true;

        state.slots[2].conn.is_connection_active = true;
        state.slots[2].name = "carol".into();
        state.slots[2].is_playing = true;
        state.slots[2].ready = false;

        state.connected_players = 3;
        state.players_count = 3;
        state.ready_players = 2;

        disconnect_timed_out_slot(&mut state, 2);

        assert_eq!(state.game_status, GameStatus::GameStarted);
    }
}
