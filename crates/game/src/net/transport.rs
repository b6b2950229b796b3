use std::io;
use std::net::{SocketAddr, UdpSocket};
use std::time::{Duration, Instant};

const MAX_PACKET_SIZE: usize = 1200;
const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// One event taken off the wire. At most one is consumed per frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportEvent {
    /// A datagram arrived from the server. The buffer is owned by the
    /// receiver and dropped once dispatch is done with it.
    Receive(Vec<u8>),
    /// The server went away; the session should fall back to disconnected.
    Disconnect,
}

/// Counters kept by the transport, mirrored out through the session.
#[derive(Debug, Clone, Default)]
pub struct NetworkStats {
    pub packets_sent: u64,
    pub packets_received: u64,
    pub bytes_sent: u64,
    pub bytes_received: u64,
}

/// The plumbing the session talks through.
///
/// `poll` must never block: a zero-timeout check that yields `None` when
/// nothing is pending is the normal idle path. `reliable` is a delivery
/// hint; transports without a reliability layer send best-effort.
pub trait Transport {
    /// Create the local endpoint and start connecting to `addr`.
    fn connect(&mut self, addr: SocketAddr) -> io::Result<()>;

    /// True while an endpoint with a server peer exists.
    fn is_connected(&self) -> bool;

    fn send(&mut self, channel: u8, data: &[u8], reliable: bool) -> io::Result<()>;

    /// Take at most one pending event, without waiting.
    fn poll(&mut self) -> Option<TransportEvent>;

    /// Tear the endpoint down. Synchronous; the peer handle is gone on
    /// return.
    fn disconnect(&mut self);

    fn stats(&self) -> &NetworkStats;
}

/// Plain UDP transport: a non-blocking socket pointed at one server.
///
/// UDP has no session layer, so "connected" means the socket exists and a
/// remote is set, and a disconnect event is synthesized when nothing has
/// been heard from the server for the timeout window.
pub struct UdpTransport {
    socket: Option<UdpSocket>,
    remote_addr: Option<SocketAddr>,
    stats: NetworkStats,
    recv_buffer: [u8; MAX_PACKET_SIZE],
    timeout: Duration,
    last_receive_time: Instant,
}

impl UdpTransport {
    pub fn new() -> Self {
        Self {
            socket: None,
            remote_addr: None,
            stats: NetworkStats::default(),
            recv_buffer: [0u8; MAX_PACKET_SIZE],
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            last_receive_time: Instant::now(),
        }
    }

    pub fn set_timeout(&mut self, timeout: Duration) {
        self.timeout = timeout;
    }

    pub fn local_addr(&self) -> Option<SocketAddr> {
        self.socket.as_ref().and_then(|s| s.local_addr().ok())
    }

    fn is_timed_out(&self) -> bool {
        self.last_receive_time.elapsed() > self.timeout
    }
}

impl Default for UdpTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl Transport for UdpTransport {
    fn connect(&mut self, addr: SocketAddr) -> io::Result<()> {
        let socket = UdpSocket::bind("0.0.0.0:0")?;
        socket.set_nonblocking(true)?;

        // Raw UDP has no handshake, so announce ourselves with an empty
        // datagram; the server learns our address from it and can start the
        // acceptance exchange. Empty payloads are never valid game packets,
        // so the other side cannot mistake it for one.
        socket.send_to(&[], addr)?;

        self.socket = Some(socket);
        self.remote_addr = Some(addr);
        self.last_receive_time = Instant::now();

        log::debug!("udp endpoint bound, remote {}", addr);
        Ok(())
    }

    fn is_connected(&self) -> bool {
        self.socket.is_some() && self.remote_addr.is_some()
    }

    fn send(&mut self, _channel: u8, data: &[u8], _reliable: bool) -> io::Result<()> {
        let socket = self
            .socket
            .as_ref()
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotConnected, "no endpoint"))?;
        let addr = self
            .remote_addr
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotConnected, "no remote address set"))?;

        let bytes = socket.send_to(data, addr)?;
        self.stats.packets_sent += 1;
        self.stats.bytes_sent += bytes as u64;

        Ok(())
    }

    fn poll(&mut self) -> Option<TransportEvent> {
        let socket = self.socket.as_ref()?;
        let remote = self.remote_addr?;

        loop {
            match socket.recv_from(&mut self.recv_buffer) {
                Ok((size, addr)) => {
                    // Not our server; drop and keep looking.
                    if addr != remote {
                        continue;
                    }

                    self.stats.packets_received += 1;
                    self.stats.bytes_received += size as u64;
                    self.last_receive_time = Instant::now();

                    return Some(TransportEvent::Receive(self.recv_buffer[..size].to_vec()));
                }
                Err(ref e) if e.kind() == io::ErrorKind::WouldBlock => break,
                Err(e) => {
                    log::warn!("udp receive failed: {}", e);
                    break;
                }
            }
        }

        if self.is_timed_out() {
            log::info!("server silent for {:?}, treating as disconnect", self.timeout);
            self.disconnect();
            return Some(TransportEvent::Disconnect);
        }

        None
    }

    fn disconnect(&mut self) {
        self.socket = None;
        self.remote_addr = None;
    }

    fn stats(&self) -> &NetworkStats {
        &self.stats
    }
}
