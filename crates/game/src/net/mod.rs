mod clock;
mod cursor;
mod protocol;
mod registry;
mod session;
mod transport;

pub use clock::SendClock;
pub use cursor::PacketCursor;
pub use protocol::{
    DEFAULT_PORT, DEFAULT_SERVER_ADDR, DecodeError, FIELD_HEIGHT, FIELD_WIDTH,
    INPUT_UPDATE_INTERVAL, MAX_PLAYERS, Message, PLAYER_SIZE, PlayerId, SPAWN_POSITION,
};
pub use registry::PlayerRegistry;
pub use session::{ConnectionState, NetSession, SessionConfig};
pub use transport::{NetworkStats, Transport, TransportEvent, UdpTransport};
