use std::net::Ipv4Addr;

use glam::Vec2;

use super::cursor::PacketCursor;

/// Capacity of the player table; ids are assigned by the server.
pub const MAX_PLAYERS: usize = 8;

pub const DEFAULT_SERVER_ADDR: Ipv4Addr = Ipv4Addr::LOCALHOST;
pub const DEFAULT_PORT: u16 = 4545;

/// Playfield bounds, in pixels. Both ends stay in sync on these by build,
/// not by negotiation.
pub const FIELD_WIDTH: f32 = 800.0;
pub const FIELD_HEIGHT: f32 = 450.0;
pub const PLAYER_SIZE: f32 = 10.0;

/// Where the server drops every freshly accepted player.
pub const SPAWN_POSITION: Vec2 = Vec2::new(100.0, 100.0);

/// Seconds between local input updates (20 ticks a second). Sending every
/// render frame would just spam the server.
pub const INPUT_UPDATE_INTERVAL: f64 = 1.0 / 20.0;

/// Server-assigned slot id, valid in `[0, MAX_PLAYERS)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlayerId(pub u8);

impl PlayerId {
    pub fn index(self) -> usize {
        self.0 as usize
    }

    pub fn in_range(self) -> bool {
        (self.0 as usize) < MAX_PLAYERS
    }
}

impl std::fmt::Display for PlayerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum DecodeError {
    #[error("empty packet")]
    Empty,
    #[error("unknown command byte {0}")]
    UnknownCommand(u8),
}

/// The five commands that cross the wire. The first byte of every packet is
/// the command, the payload follows in field order.
///
/// Coordinates travel as signed shorts in host byte order. That is fine
/// while client and server run on same-endian hardware; cross-endian play
/// would need `to_be`/`from_be` at this boundary.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Message {
    /// Server -> client: you are in, and this is your id.
    AcceptPlayer { id: PlayerId },
    /// Server -> client: add a remote player to the local simulation.
    AddPlayer { id: PlayerId, position: Vec2 },
    /// Server -> client: a player left, drop their slot.
    RemovePlayer { id: PlayerId },
    /// Server -> client: last known position for a remote player.
    UpdatePlayer { id: PlayerId, position: Vec2 },
    /// Client -> server: where our own player is now. The sender is implicit
    /// so no id travels with it.
    UpdateInput { position: Vec2 },
}

impl Message {
    pub const CMD_ACCEPT_PLAYER: u8 = 1;
    pub const CMD_ADD_PLAYER: u8 = 2;
    pub const CMD_REMOVE_PLAYER: u8 = 3;
    pub const CMD_UPDATE_PLAYER: u8 = 4;
    pub const CMD_UPDATE_INPUT: u8 = 5;

    pub fn command(&self) -> u8 {
        match self {
            Message::AcceptPlayer { .. } => Self::CMD_ACCEPT_PLAYER,
            Message::AddPlayer { .. } => Self::CMD_ADD_PLAYER,
            Message::RemovePlayer { .. } => Self::CMD_REMOVE_PLAYER,
            Message::UpdatePlayer { .. } => Self::CMD_UPDATE_PLAYER,
            Message::UpdateInput { .. } => Self::CMD_UPDATE_INPUT,
        }
    }

    pub fn encode(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(6);
        buf.push(self.command());

        match *self {
            Message::AcceptPlayer { id } | Message::RemovePlayer { id } => {
                buf.push(id.0);
            }
            Message::AddPlayer { id, position } | Message::UpdatePlayer { id, position } => {
                buf.push(id.0);
                write_position(&mut buf, position);
            }
            Message::UpdateInput { position } => {
                write_position(&mut buf, position);
            }
        }

        buf
    }

    /// Decode one packet. Truncated payloads are not an error: missing
    /// fields read back as zero through the cursor.
    pub fn decode(data: &[u8]) -> Result<Self, DecodeError> {
        if data.is_empty() {
            return Err(DecodeError::Empty);
        }

        let mut cursor = PacketCursor::new(data);
        let message = match cursor.read_u8() {
            Self::CMD_ACCEPT_PLAYER => Message::AcceptPlayer {
                id: PlayerId(cursor.read_u8()),
            },
            Self::CMD_ADD_PLAYER => Message::AddPlayer {
                id: PlayerId(cursor.read_u8()),
                position: cursor.read_position(),
            },
            Self::CMD_REMOVE_PLAYER => Message::RemovePlayer {
                id: PlayerId(cursor.read_u8()),
            },
            Self::CMD_UPDATE_PLAYER => Message::UpdatePlayer {
                id: PlayerId(cursor.read_u8()),
                position: cursor.read_position(),
            },
            Self::CMD_UPDATE_INPUT => Message::UpdateInput {
                position: cursor.read_position(),
            },
            other => return Err(DecodeError::UnknownCommand(other)),
        };

        Ok(message)
    }
}

/// Positions travel truncated to whole pixels; the fractional part of the
/// float position is dropped, not rounded.
fn write_position(buf: &mut Vec<u8>, position: Vec2) {
    buf.extend_from_slice(&(position.x as i16).to_ne_bytes());
    buf.extend_from_slice(&(position.y as i16).to_ne_bytes());
}
