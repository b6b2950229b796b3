pub mod net;

pub use net::{
    ConnectionState, DEFAULT_PORT, DEFAULT_SERVER_ADDR, DecodeError, FIELD_HEIGHT, FIELD_WIDTH,
    INPUT_UPDATE_INTERVAL, MAX_PLAYERS, Message, NetSession, NetworkStats, PLAYER_SIZE,
    PacketCursor, PlayerId, PlayerRegistry, SPAWN_POSITION, SendClock, SessionConfig, Transport,
    TransportEvent, UdpTransport,
};
