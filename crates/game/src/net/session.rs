//! Client session: connection state machine plus the per-frame entry point.
//!
//! # Connection lifecycle
//! ```text
//! ┌──────────────┐      connect()       ┌─────────┐
//! │ Disconnected │ ────────────────────▶│ Pending │
//! └──────────────┘                      └─────────┘
//!        ▲                                   │
//!        │ transport disconnect              │ AcceptPlayer
//!        │ or disconnect()                   ▼
//!        │                             ┌──────────┐
//!        └─────────────────────────────│ Accepted │
//!                                      └──────────┘
//! ```
//! While pending, `AcceptPlayer` is the only command the server may send;
//! everything else is dropped. Once accepted, the add/remove/update commands
//! drive the player registry, and the local player's position goes out as an
//! `UpdateInput` at the tick rate.

use std::io;
use std::net::SocketAddr;

use glam::Vec2;

use super::clock::SendClock;
use super::protocol::{
    DEFAULT_PORT, DEFAULT_SERVER_ADDR, INPUT_UPDATE_INTERVAL, MAX_PLAYERS, Message, PlayerId,
    SPAWN_POSITION,
};
use super::registry::PlayerRegistry;
use super::transport::{NetworkStats, Transport, TransportEvent};

/// Channel the game protocol runs on. There is only the one.
const GAME_CHANNEL: u8 = 0;

/// Where the session is in the connection handshake. The local player id
/// only exists in the accepted state, so it cannot leak across a disconnect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Disconnected,
    /// Endpoint is up, waiting for the server to accept us.
    Pending,
    /// Accepted, carrying the server-assigned local player id.
    Accepted(PlayerId),
}

/// Session configuration.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub server_addr: SocketAddr,
    /// Seconds between local input updates.
    pub input_interval: f64,
    /// Where an accepted player first appears on the field.
    pub spawn_position: Vec2,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            server_addr: SocketAddr::from((DEFAULT_SERVER_ADDR, DEFAULT_PORT)),
            input_interval: INPUT_UPDATE_INTERVAL,
            spawn_position: SPAWN_POSITION,
        }
    }
}

/// The client-side synchronization layer, owned by the frame loop and driven
/// once per frame through [`update`](NetSession::update).
pub struct NetSession<T: Transport> {
    transport: T,
    config: SessionConfig,
    state: ConnectionState,
    registry: PlayerRegistry,
    send_clock: SendClock,
}

impl<T: Transport> NetSession<T> {
    pub fn new(transport: T, config: SessionConfig) -> Self {
        let send_clock = SendClock::new(config.input_interval);
        Self {
            transport,
            config,
            state: ConnectionState::Disconnected,
            registry: PlayerRegistry::new(),
            send_clock,
        }
    }

    /// Begin connecting to the configured server. Acceptance arrives later
    /// through [`update`](NetSession::update).
    pub fn connect(&mut self) -> io::Result<()> {
        log::info!("connecting to {}", self.config.server_addr);

        self.transport.connect(self.config.server_addr)?;
        self.state = ConnectionState::Pending;
        Ok(())
    }

    /// Drop the connection immediately. The player registry keeps whatever
    /// remote slots it had; a reconnect repopulates or overwrites them.
    pub fn disconnect(&mut self) {
        self.transport.disconnect();
        self.state = ConnectionState::Disconnected;
    }

    /// Process one frame: send the local input update if one is due, then
    /// consume at most one transport event. `now` is seconds on the frame
    /// loop's clock.
    pub fn update(&mut self, now: f64) -> io::Result<()> {
        if !self.transport.is_connected() {
            return Ok(());
        }

        if let ConnectionState::Accepted(local) = self.state {
            if self.send_clock.is_due(now) {
                self.send_input_update(local)?;
                self.send_clock.mark(now);
            }
        }

        match self.transport.poll() {
            Some(TransportEvent::Receive(data)) => self.handle_receive(&data),
            Some(TransportEvent::Disconnect) => {
                log::info!("disconnected by server");
                self.state = ConnectionState::Disconnected;
            }
            None => {}
        }

        Ok(())
    }

    /// Move the local player and clamp the result onto the field. No-op
    /// until the server has accepted us.
    pub fn update_local_player(&mut self, delta: Vec2) {
        if let ConnectionState::Accepted(local) = self.state {
            self.registry.apply_movement(local, delta);
        }
    }

    /// Last known position for any player, local included. `None` for
    /// out-of-range ids and empty slots.
    pub fn player_position(&self, id: PlayerId) -> Option<Vec2> {
        self.registry.position(id)
    }

    /// All live players and their positions, for drawing.
    pub fn players(&self) -> impl Iterator<Item = (PlayerId, Vec2)> + '_ {
        self.registry.iter_active()
    }

    /// True once the transport is up and the server has accepted us.
    pub fn is_connected(&self) -> bool {
        self.transport.is_connected() && matches!(self.state, ConnectionState::Accepted(_))
    }

    pub fn local_player_id(&self) -> Option<PlayerId> {
        match self.state {
            ConnectionState::Accepted(id) => Some(id),
            _ => None,
        }
    }

    pub fn state(&self) -> ConnectionState {
        self.state
    }

    pub fn stats(&self) -> &NetworkStats {
        self.transport.stats()
    }

    fn send_input_update(&mut self, local: PlayerId) -> io::Result<()> {
        let position = self.registry.position(local).unwrap_or(Vec2::ZERO);
        let message = Message::UpdateInput { position };

        self.transport
            .send(GAME_CHANNEL, &message.encode(), true)
    }

    fn handle_receive(&mut self, data: &[u8]) {
        // All valid packets carry at least the command byte.
        let message = match Message::decode(data) {
            Ok(message) => message,
            Err(e) => {
                log::debug!("dropping packet: {}", e);
                return;
            }
        };

        match self.state {
            ConnectionState::Pending => {
                // The only thing the server may tell us before acceptance.
                if let Message::AcceptPlayer { id } = message {
                    self.handle_accept(id);
                }
            }
            ConnectionState::Accepted(local) => match message {
                Message::AddPlayer { id, position } => self.handle_add_player(local, id, position),
                Message::RemovePlayer { id } => self.handle_remove_player(local, id),
                Message::UpdatePlayer { id, position } => {
                    self.handle_update_player(local, id, position)
                }
                _ => {}
            },
            ConnectionState::Disconnected => {}
        }
    }

    fn handle_accept(&mut self, id: PlayerId) {
        // Legacy inclusive bound: id == MAX_PLAYERS slips through here, and
        // the registry's own range checks turn that slot into a no-op.
        if id.index() > MAX_PLAYERS {
            log::warn!("server assigned out-of-range player id {}", id);
            return;
        }

        log::info!("accepted as player {}", id);

        self.state = ConnectionState::Accepted(id);
        self.registry.activate(id, self.config.spawn_position);

        // Don't wait out a full interval before telling the server where we
        // spawned.
        self.send_clock.arm();
    }

    fn handle_add_player(&mut self, local: PlayerId, id: PlayerId, position: Vec2) {
        if !id.in_range() || id == local {
            return;
        }

        log::debug!("player {} joined at {:?}", id, position);
        self.registry.activate(id, position);
    }

    fn handle_remove_player(&mut self, local: PlayerId, id: PlayerId) {
        if !id.in_range() || id == local {
            return;
        }

        log::debug!("player {} left", id);
        self.registry.deactivate(id);
    }

    fn handle_update_player(&mut self, local: PlayerId, id: PlayerId, position: Vec2) {
        // Never let a remote-player message steer our own slot, and never
        // let an update implicitly add a player.
        if !id.in_range() || id == local || !self.registry.is_active(id) {
            return;
        }

        self.registry.set_position(id, position);
    }
}
