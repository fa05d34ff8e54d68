// net.rs — client event loop: keepalive timer, server datagrams, and the
// local GUI TCP connection, in that priority order.
// Converted from: screen-worms-client.c main()'s poll() loop,
// handle_keepalive(), handle_server_message(), handle_gui_message()

use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpStream, UdpSocket};
use tokio::time::{interval, MissedTickBehavior};
use tracing::{error, warn};

use worms_common::codec::{encode_client_dgram, ClientDgram};
use worms_common::constants::{CLIENT_KEEPALIVE_MILLIS, MAX_SERVER_UDP_DGRAM_LENGTH};

use crate::frontend::{render_line, LineAccumulator};
use crate::reassembler::ClientGameState;

/// Drives the client's single event loop. `session_id` identifies this
/// run to the server across reconnects; `player_name` is sent on every
/// keepalive datagram.
pub async fn run(
    server_socket: UdpSocket,
    mut gui_socket: TcpStream,
    session_id: u64,
    player_name: String,
) -> anyhow::Result<()> {
    let mut state = ClientGameState::new();
    let mut line_acc = LineAccumulator::new();

    let mut keepalive = interval(Duration::from_millis(CLIENT_KEEPALIVE_MILLIS));
    keepalive.set_missed_tick_behavior(MissedTickBehavior::Delay);

    let mut server_buf = vec![0u8; MAX_SERVER_UDP_DGRAM_LENGTH + 1];
    let mut gui_buf = vec![0u8; 1024];

    loop {
        tokio::select! {
            biased;

            _ = keepalive.tick() => {
                let dgram = ClientDgram {
                    session_id,
                    turn_direction: state.client_turn_direction,
                    next_expected_event_no: state.next_expected,
                    player_name: player_name.clone(),
                };
                let buf = encode_client_dgram(&dgram);
                if let Err(e) = server_socket.send(&buf).await {
                    warn!(error = %e, "sendto failed");
                }
            }

            res = server_socket.recv(&mut server_buf) => {
                let len = res?;
                match state.ingest_datagram(&server_buf[..len]) {
                    Ok(events) => {
                        for event in &events {
                            let line = render_line(event, &state.game_players);
                            if let Err(e) = gui_socket.write_all(line.as_bytes()).await {
                                error!(error = %e, "write to GUI server failed");
                                return Err(e.into());
                            }
                        }
                    }
                    Err(err) => {
                        error!(%err, "strange data from game server... terminating");
                        return Err(err.into());
                    }
                }
            }

            res = gui_socket.read(&mut gui_buf) => {
                let len = res?;
                if len == 0 {
                    error!("connection to GUI server lost");
                    return Err(anyhow::anyhow!("frontend disconnected"));
                }
                for turn in line_acc.feed(&gui_buf[..len]) {
                    state.client_turn_direction = turn.as_wire_value();
                }
            }
        }
    }
}
