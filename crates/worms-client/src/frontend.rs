// frontend.rs — line-based protocol between the client and the local GUI
// Converted from: client_protocol.c (prepare_message) and the
// key-event parsing in screen-worms-client.c's handle_gui_message()

use crate::reassembler::GuiEvent;

/// Turn direction requested by the GUI, mirrored onto the next keepalive
/// datagram sent to the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnDirection {
    Straight,
    Left,
    Right,
}

impl TurnDirection {
    pub fn as_wire_value(self) -> u8 {
        match self {
            TurnDirection::Straight => 0,
            TurnDirection::Right => 1,
            TurnDirection::Left => 2,
        }
    }
}

/// Renders one applied server event as the line the frontend expects.
/// `GameOver` never reaches the frontend, matching the reference client.
pub fn render_line(event: &GuiEvent, game_players: &[String]) -> String {
    match event {
        GuiEvent::NewGame {
            board_width,
            board_height,
            player_names,
        } => {
            let mut line = format!("NEW_GAME {board_width} {board_height}");
            for name in player_names {
                line.push(' ');
                line.push_str(name);
            }
            line.push('\n');
            line
        }
        GuiEvent::Pixel { player_no, x, y } => {
            format!("PIXEL {x} {y} {}\n", game_players[*player_no as usize])
        }
        GuiEvent::PlayerEliminated { player_no } => {
            format!("PLAYER_ELIMINATED {}\n", game_players[*player_no as usize])
        }
    }
}

/// Accumulates bytes read from the GUI TCP connection, splitting off
/// complete (newline-terminated) lines. Mirrors the reference client's
/// fixed-size partial-message buffer: a line whose accumulated length
/// would overflow that buffer is silently dropped rather than acted on.
const PARTIAL_MSG_BUFFER_LENGTH: usize = 32;

#[derive(Default)]
pub struct LineAccumulator {
    partial: Vec<u8>,
}

impl LineAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feeds newly-read bytes in, returning any key events recognised in
    /// complete lines. Unrecognised lines are ignored, as in the original.
    pub fn feed(&mut self, chunk: &[u8]) -> Vec<TurnDirection> {
        let mut turns = Vec::new();
        let mut start = 0;

        for (i, &b) in chunk.iter().enumerate() {
            if b == b'\n' {
                self.partial.extend_from_slice(&chunk[start..=i]);
                start = i + 1;

                if self.partial.len() < PARTIAL_MSG_BUFFER_LENGTH {
                    if let Some(turn) = parse_key_line(&self.partial) {
                        turns.push(turn);
                    }
                }
                self.partial.clear();
            }
        }
        self.partial.extend_from_slice(&chunk[start..]);

        turns
    }
}

fn parse_key_line(line: &[u8]) -> Option<TurnDirection> {
    match line {
        b"LEFT_KEY_DOWN\n" => Some(TurnDirection::Left),
        b"RIGHT_KEY_DOWN\n" => Some(TurnDirection::Right),
        b"LEFT_KEY_UP\n" | b"RIGHT_KEY_UP\n" => Some(TurnDirection::Straight),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_new_game_line() {
        let event = GuiEvent::NewGame {
            board_width: 640,
            board_height: 480,
            player_names: vec!["alice".into(), "bob".into()],
        };
        assert_eq!(render_line(&event, &[]), "NEW_GAME 640 480 alice bob\n");
    }

    #[test]
    fn renders_pixel_line_using_the_roster() {
        let names = vec!["alice".to_string(), "bob".to_string()];
        let event = GuiEvent::Pixel { player_no: 1, x: 3, y: 4 };
        assert_eq!(render_line(&event, &names), "PIXEL 3 4 bob\n");
    }

    #[test]
    fn recognises_key_events_split_across_reads() {
        let mut acc = LineAccumulator::new();
        assert!(acc.feed(b"LEFT_KEY_").is_empty());
        let turns = acc.feed(b"DOWN\n");
        assert_eq!(turns, vec![TurnDirection::Left]);
    }

    #[test]
    fn ignores_unrecognised_lines() {
        let mut acc = LineAccumulator::new();
        assert!(acc.feed(b"SOMETHING_ELSE\n").is_empty());
    }
}
