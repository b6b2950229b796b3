//! End-to-end exercise of the session over loopback UDP, with the test
//! playing the server.

use std::net::{SocketAddr, UdpSocket};
use std::time::{Duration, Instant};

use glam::Vec2;

use arena::{
    ConnectionState, Message, NetSession, PlayerId, SPAWN_POSITION, SessionConfig, UdpTransport,
};

struct TestServer {
    socket: UdpSocket,
    client_addr: Option<SocketAddr>,
}

impl TestServer {
    fn start() -> Self {
        let socket = UdpSocket::bind("127.0.0.1:0").unwrap();
        socket
            .set_read_timeout(Some(Duration::from_millis(500)))
            .unwrap();
        Self {
            socket,
            client_addr: None,
        }
    }

    fn addr(&self) -> SocketAddr {
        self.socket.local_addr().unwrap()
    }

    fn recv(&mut self) -> Vec<u8> {
        let mut buf = [0u8; 64];
        let (size, addr) = self.socket.recv_from(&mut buf).unwrap();
        self.client_addr = Some(addr);
        buf[..size].to_vec()
    }

    fn send(&self, message: &Message) {
        let addr = self.client_addr.expect("no client seen yet");
        self.socket.send_to(&message.encode(), addr).unwrap();
    }
}

/// Drive session frames until `done` holds or the deadline passes.
fn pump<F>(session: &mut NetSession<UdpTransport>, clock: &Instant, mut done: F) -> bool
where
    F: FnMut(&NetSession<UdpTransport>) -> bool,
{
    let deadline = Instant::now() + Duration::from_secs(2);
    while Instant::now() < deadline {
        session.update(clock.elapsed().as_secs_f64()).unwrap();
        if done(session) {
            return true;
        }
        std::thread::sleep(Duration::from_millis(1));
    }
    false
}

#[test]
fn test_full_session_against_scripted_server() {
    let mut server = TestServer::start();
    let clock = Instant::now();

    let config = SessionConfig {
        server_addr: server.addr(),
        ..Default::default()
    };
    let mut session = NetSession::new(UdpTransport::new(), config);
    session.connect().unwrap();
    assert_eq!(session.state(), ConnectionState::Pending);

    // The connection announcement tells the server who we are.
    assert!(server.recv().is_empty());

    // Accept the client as player 7 and wait for the session to see it.
    server.send(&Message::AcceptPlayer { id: PlayerId(7) });
    assert!(pump(&mut session, &clock, |s| s.is_connected()));
    assert_eq!(session.local_player_id(), Some(PlayerId(7)));
    assert_eq!(session.player_position(PlayerId(7)), Some(SPAWN_POSITION));

    // Acceptance arms the send clock, so the very next frame sends an
    // input update.
    session.update(clock.elapsed().as_secs_f64()).unwrap();
    let packet = server.recv();
    match Message::decode(&packet).unwrap() {
        Message::UpdateInput { position } => assert_eq!(position, SPAWN_POSITION),
        other => panic!("expected an input update, got {:?}", other),
    }

    // A remote player joins and moves.
    server.send(&Message::AddPlayer {
        id: PlayerId(3),
        position: Vec2::new(10.0, 20.0),
    });
    assert!(pump(&mut session, &clock, |s| {
        s.player_position(PlayerId(3)) == Some(Vec2::new(10.0, 20.0))
    }));

    server.send(&Message::UpdatePlayer {
        id: PlayerId(3),
        position: Vec2::new(30.0, 40.0),
    });
    assert!(pump(&mut session, &clock, |s| {
        s.player_position(PlayerId(3)) == Some(Vec2::new(30.0, 40.0))
    }));

    // Local movement shows up in the next input updates.
    session.update_local_player(Vec2::new(25.0, 0.0));
    let moved = Vec2::new(125.0, 100.0);
    let deadline = Instant::now() + Duration::from_secs(2);
    let mut seen = false;
    while Instant::now() < deadline && !seen {
        session.update(clock.elapsed().as_secs_f64()).unwrap();
        if let Ok(Message::UpdateInput { position }) = Message::decode(&server.recv()) {
            seen = position == moved;
        }
    }
    assert!(seen, "server never saw the moved position");

    // And the remote player leaves again.
    server.send(&Message::RemovePlayer { id: PlayerId(3) });
    assert!(pump(&mut session, &clock, |s| {
        s.player_position(PlayerId(3)).is_none()
    }));

    session.disconnect();
    assert!(!session.is_connected());
    assert_eq!(session.local_player_id(), None);
}
