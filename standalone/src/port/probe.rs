//! Port availability probing.
//!
//! A port is available when a TCP listener and a UDP socket can both be bound
//! to it on the wildcard IPv4 address, each with `SO_REUSEADDR` set so that a
//! port left in `TIME_WAIT` by a stopped server still counts as free. The
//! probe is trait-based so the
//! orchestration code and the CLI can be exercised against a deterministic
//! mock.

use std::collections::HashSet;
use std::io;
use std::net::{Ipv4Addr, SocketAddrV4};

use socket2::{Domain, Protocol, SockAddr, Socket, Type};

use crate::error::Error;
use crate::port::Port;

/// Trait for checking whether a port is free on this machine.
///
/// # Examples
///
/// ```
/// use standalone::port::{PortProbe, SystemPortProbe};
///
/// let probe = SystemPortProbe;
///
/// // Outside the assignable range, never available.
/// assert!(!probe.is_available(0));
/// assert!(!probe.is_available(50000));
/// ```
pub trait PortProbe: Send + Sync {
    /// Returns `true` if `port` is assignable and free for both stream and
    /// datagram binding.
    fn is_available(&self, port: u16) -> bool;

    /// Returns the first available port at or above `start`.
    ///
    /// Scanning stops at [`Port::MAX`]; `None` means nothing in
    /// `start..=Port::MAX` is free.
    fn first_available(&self, start: Port) -> Option<Port> {
        let mut candidate = Some(start);
        while let Some(port) = candidate {
            if self.is_available(port.value()) {
                return Some(port);
            }
            candidate = port.next();
        }
        None
    }
}

/// Probe that binds real sockets.
///
/// Each check is a single attempt. Both sockets are dropped before
/// `is_available` returns, whichever bind failed.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemPortProbe;

impl SystemPortProbe {
    fn try_bind(port: Port) -> Result<(), Error> {
        let addr = SockAddr::from(SocketAddrV4::new(Ipv4Addr::UNSPECIFIED, port.value()));
        let to_error = |source| Error::PortProbe {
            port: port.value(),
            source,
        };

        let listener = bind_reusable(Type::STREAM, Protocol::TCP, &addr).map_err(to_error)?;
        listener.listen(1).map_err(to_error)?;
        let _datagram = bind_reusable(Type::DGRAM, Protocol::UDP, &addr).map_err(to_error)?;
        Ok(())
    }
}

/// Open an IPv4 socket with `SO_REUSEADDR` set and bind it to `addr`.
///
/// The socket is closed when the returned value is dropped, including when
/// the bind fails.
fn bind_reusable(ty: Type, protocol: Protocol, addr: &SockAddr) -> io::Result<Socket> {
    let socket = Socket::new(Domain::IPV4, ty, Some(protocol))?;
    socket.set_reuse_address(true)?;
    socket.bind(addr)?;
    Ok(socket)
}

impl PortProbe for SystemPortProbe {
    fn is_available(&self, port: u16) -> bool {
        let Ok(port) = Port::try_from(port) else {
            return false;
        };

        match Self::try_bind(port) {
            Ok(()) => true,
            Err(e) => {
                log::debug!("{e}");
                false
            }
        }
    }
}

/// Mock probe with a configurable set of taken ports.
///
/// The assignable range is still enforced, so the mock agrees with
/// [`SystemPortProbe`] about ports outside 1-49151.
///
/// # Examples
///
/// ```
/// use standalone::port::{MockPortProbe, PortProbe};
///
/// let mut probe = MockPortProbe::empty();
/// probe.mark_taken(3306);
///
/// assert!(!probe.is_available(3306));
/// assert!(probe.is_available(3307));
/// ```
#[derive(Debug, Clone, Default)]
pub struct MockPortProbe {
    taken: HashSet<u16>,
}

impl MockPortProbe {
    /// Create a mock with the given ports already taken.
    #[must_use]
    pub fn new(taken: HashSet<u16>) -> Self {
        Self { taken }
    }

    /// Create a mock where every assignable port is free.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Mark a port as taken.
    pub fn mark_taken(&mut self, port: u16) {
        self.taken.insert(port);
    }

    /// Mark a port as free again.
    pub fn mark_free(&mut self, port: u16) {
        self.taken.remove(&port);
    }
}

impl PortProbe for MockPortProbe {
    fn is_available(&self, port: u16) -> bool {
        Port::try_from(port).is_ok() && !self.taken.contains(&port)
    }
}
