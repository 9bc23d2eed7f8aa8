use std::fmt;
use std::net::SocketAddr;

/// Remote end of a connection as reported on spans
///
/// `host` is kept as given: an IP literal for resolved sockets, or the
/// configured host name when the client never resolved it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PeerAddress {
    host: String,
    port: u16,
}

impl PeerAddress {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        PeerAddress {
            host: host.into(),
            port,
        }
    }

    #[inline]
    pub fn host(&self) -> &str {
        &self.host
    }

    #[inline]
    pub fn port(&self) -> u16 {
        self.port
    }
}

impl From<SocketAddr> for PeerAddress {
    fn from(addr: SocketAddr) -> Self {
        PeerAddress {
            host: addr.ip().to_string(),
            port: addr.port(),
        }
    }
}

/// `host:port`, IPv6 hosts are not bracketed
impl fmt::Display for PeerAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}

/// Anything that can report the address of the server it talks to
pub trait RemoteConnection {
    /// `None` when the connection is not (or no longer) connected
    fn remote_addr(&self) -> Option<PeerAddress>;
}

impl RemoteConnection for SocketAddr {
    fn remote_addr(&self) -> Option<PeerAddress> {
        Some(PeerAddress::from(*self))
    }
}

impl RemoteConnection for tokio::net::TcpStream {
    fn remote_addr(&self) -> Option<PeerAddress> {
        self.peer_addr().ok().map(PeerAddress::from)
    }
}

impl<C: RemoteConnection + ?Sized> RemoteConnection for &C {
    fn remote_addr(&self) -> Option<PeerAddress> {
        (**self).remote_addr()
    }
}

/// Connection metadata for a Redis client connection
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RedisConnection {
    peer: Option<PeerAddress>,
}

impl RedisConnection {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        RedisConnection {
            peer: Some(PeerAddress::new(host, port)),
        }
    }

    /// A connection whose channel has no remote address yet
    pub fn unconnected() -> Self {
        RedisConnection { peer: None }
    }
}

impl From<SocketAddr> for RedisConnection {
    fn from(addr: SocketAddr) -> Self {
        RedisConnection {
            peer: Some(addr.into()),
        }
    }
}

impl RemoteConnection for RedisConnection {
    fn remote_addr(&self) -> Option<PeerAddress> {
        self.peer.clone()
    }
}
