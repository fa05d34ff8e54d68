// names.rs — player name validation shared by server and client
// Converted from: utils.c check_player_name()/check_player_name_character(),
// client_protocol.c parse_player_names()/check_names_order()

use crate::constants::{
    MAX_PLAYER_NAME_LENGTH, PLAYER_NAME_MAXIMAL_ASCII, PLAYER_NAME_MINIMAL_ASCII,
};

/// A name byte must be printable ASCII in `[33, 126]`.
pub fn is_legal_name_byte(b: u8) -> bool {
    (PLAYER_NAME_MINIMAL_ASCII..=PLAYER_NAME_MAXIMAL_ASCII).contains(&b)
}

/// A player name is legal if every byte is legal and the name is no
/// longer than `MAX_PLAYER_NAME_LENGTH`. An empty name is legal: it marks
/// a spectator.
pub fn is_legal_name(name: &[u8]) -> bool {
    name.len() <= MAX_PLAYER_NAME_LENGTH && name.iter().all(|&b| is_legal_name_byte(b))
}

/// Names sent in a `NEW_GAME` event must be in strict ascending
/// lexicographic order, matching the `strcmp` comparison the server uses
/// to sort players before a game starts.
pub fn names_strictly_ascending<S: AsRef<str>>(names: &[S]) -> bool {
    names
        .windows(2)
        .all(|pair| pair[0].as_ref() < pair[1].as_ref())
}
