//! TCP transport layer for SRTP communication.
//!
//! The [`Transport`] trait is the seam between the protocol and the socket:
//! the session knows SRTP frames, the transport only moves bytes. The
//! [`TcpTransport`] implementation is blocking, with the same timeout applied
//! to connect, send and receive.
//!
//! A reply may arrive split over several TCP segments. [`Transport::receive`]
//! therefore takes the minimum reply length the caller needs and keeps reading
//! until that many bytes are in, so no part of one reply is left in the stream
//! to be mistaken for the next.
//!
//! # Example
//!
//! The transport is normally driven by a [`Session`](crate::Session), but can be
//! used directly:
//!
//! ```no_run
//! use ge_srtp::{TcpTransport, Transport, FRAME_SIZE, INIT_MSG, RECEIVE_TIMEOUT};
//!
//! let mut transport = TcpTransport::connect(
//!     "192.168.0.10:18245".parse().unwrap(),
//!     RECEIVE_TIMEOUT,
//! )?;
//! let reply = transport.send_receive(&INIT_MSG, FRAME_SIZE)?;
//! # Ok::<(), ge_srtp::SrtpError>(())
//! ```

use std::io::{self, Read, Write};
use std::net::{Shutdown, SocketAddr, TcpStream};
use std::time::{Duration, Instant};

use crate::error::{map_io_error, Result, SrtpError};
use crate::messages::MAX_RESPONSE_SIZE;

/// Byte transport used by a [`Session`](crate::Session).
///
/// Implementations must map expired timeouts to `SrtpError::Timeout` and a
/// closed stream to `SrtpError::ConnectionClosed`.
pub trait Transport {
    /// Writes one complete frame.
    fn send(&mut self, frame: &[u8]) -> Result<()>;

    /// Blocks until at least `min_len` reply bytes have arrived and returns them.
    ///
    /// A reply that stays shorter than `min_len` ends in `SrtpError::Timeout`
    /// or `SrtpError::ConnectionClosed`, never in a short `Ok`.
    fn receive(&mut self, min_len: usize) -> Result<Vec<u8>>;

    /// Releases the underlying connection. Must be safe to call more than once.
    fn shutdown(&mut self);

    /// Sends a frame and waits for a reply of at least `min_len` bytes.
    fn send_receive(&mut self, frame: &[u8], min_len: usize) -> Result<Vec<u8>> {
        self.send(frame)?;
        self.receive(min_len)
    }
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn send(&mut self, frame: &[u8]) -> Result<()> {
        (**self).send(frame)
    }

    fn receive(&mut self, min_len: usize) -> Result<Vec<u8>> {
        (**self).receive(min_len)
    }

    fn shutdown(&mut self) {
        (**self).shutdown()
    }
}

/// Blocking TCP transport to one PLC.
pub struct TcpTransport {
    stream: TcpStream,
    peer_addr: SocketAddr,
    timeout: Duration,
}

impl TcpTransport {
    /// Opens a TCP connection to the PLC.
    ///
    /// # Arguments
    ///
    /// * `addr` - Socket address of the PLC (IP:port)
    /// * `timeout` - Bound for the connect, every send, and every whole reply
    ///
    /// # Errors
    ///
    /// Returns `SrtpError::Connect` if the connection cannot be established,
    /// or `SrtpError::Io` if the socket cannot be configured.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use ge_srtp::{TcpTransport, RECEIVE_TIMEOUT};
    ///
    /// let transport = TcpTransport::connect(
    ///     "192.168.0.10:18245".parse().unwrap(),
    ///     RECEIVE_TIMEOUT,
    /// ).unwrap();
    /// ```
    pub fn connect(addr: SocketAddr, timeout: Duration) -> Result<Self> {
        let stream = TcpStream::connect_timeout(&addr, timeout)
            .map_err(|source| SrtpError::Connect { addr, source })?;
        stream.set_read_timeout(Some(timeout))?;
        stream.set_write_timeout(Some(timeout))?;
        stream.set_nodelay(true)?;

        Ok(Self {
            stream,
            peer_addr: addr,
            timeout,
        })
    }

    /// Returns the PLC address.
    pub fn peer_addr(&self) -> SocketAddr {
        self.peer_addr
    }
}

impl Transport for TcpTransport {
    fn send(&mut self, frame: &[u8]) -> Result<()> {
        self.stream.write_all(frame).map_err(map_io_error)
    }

    fn receive(&mut self, min_len: usize) -> Result<Vec<u8>> {
        // One deadline for the whole reply, however many segments it takes.
        let deadline = Instant::now() + self.timeout;
        let mut reply = Vec::with_capacity(min_len.max(MAX_RESPONSE_SIZE));
        let mut chunk = [0u8; MAX_RESPONSE_SIZE];

        loop {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                return Err(SrtpError::Timeout);
            }
            self.stream.set_read_timeout(Some(remaining))?;

            match self.stream.read(&mut chunk) {
                Ok(0) => return Err(SrtpError::ConnectionClosed),
                Ok(size) => reply.extend_from_slice(&chunk[..size]),
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(map_io_error(e)),
            }
            if reply.len() >= min_len {
                return Ok(reply);
            }
        }
    }

    fn shutdown(&mut self) {
        // Already-closed sockets report NotConnected; nothing left to release.
        let _ = self.stream.shutdown(Shutdown::Both);
    }
}

impl std::fmt::Debug for TcpTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TcpTransport")
            .field("peer_addr", &self.peer_addr)
            .field("local_addr", &self.stream.local_addr().ok())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::TcpListener;
    use std::thread;

    fn listener() -> (TcpListener, SocketAddr) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        (listener, addr)
    }

    #[test]
    fn test_send_receive() {
        let (listener, addr) = listener();
        let server = thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let mut buf = [0u8; 4];
            stream.read_exact(&mut buf).unwrap();
            stream.write_all(&[buf[3], buf[2], buf[1], buf[0]]).unwrap();
        });

        let mut transport = TcpTransport::connect(addr, Duration::from_secs(2)).unwrap();
        assert_eq!(transport.peer_addr(), addr);
        let reply = transport.send_receive(&[1, 2, 3, 4], 4).unwrap();
        assert_eq!(reply, vec![4, 3, 2, 1]);
        server.join().unwrap();
    }

    #[test]
    fn test_receive_joins_segments() {
        let (listener, addr) = listener();
        let server = thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            stream.write_all(&[0xAA; 10]).unwrap();
            thread::sleep(Duration::from_millis(200));
            stream.write_all(&[0xBB; 46]).unwrap();
        });

        let mut transport = TcpTransport::connect(addr, Duration::from_secs(2)).unwrap();
        let reply = transport.receive(56).unwrap();
        assert_eq!(reply.len(), 56);
        assert_eq!(reply[9], 0xAA);
        assert_eq!(reply[10], 0xBB);
        server.join().unwrap();
    }

    #[test]
    fn test_receive_short_reply_times_out() {
        let (listener, addr) = listener();
        let server = thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            stream.write_all(&[0x03; 45]).unwrap();
            thread::sleep(Duration::from_millis(500));
        });

        let mut transport = TcpTransport::connect(addr, Duration::from_millis(150)).unwrap();
        let err = transport.receive(46).unwrap_err();
        assert!(matches!(err, SrtpError::Timeout));
        server.join().unwrap();
    }

    #[test]
    fn test_receive_timeout() {
        let (listener, addr) = listener();
        let server = thread::spawn(move || {
            let (stream, _) = listener.accept().unwrap();
            thread::sleep(Duration::from_millis(500));
            drop(stream);
        });

        let mut transport = TcpTransport::connect(addr, Duration::from_millis(100)).unwrap();
        let err = transport.receive(1).unwrap_err();
        assert!(matches!(err, SrtpError::Timeout));
        server.join().unwrap();
    }

    #[test]
    fn test_receive_after_peer_close() {
        let (listener, addr) = listener();
        let server = thread::spawn(move || {
            let (stream, _) = listener.accept().unwrap();
            drop(stream);
        });

        let mut transport = TcpTransport::connect(addr, Duration::from_secs(2)).unwrap();
        server.join().unwrap();
        let err = transport.receive(1).unwrap_err();
        assert!(err.is_connection_error());
    }

    #[test]
    fn test_connect_refused() {
        let (listener, addr) = listener();
        drop(listener);

        let err = TcpTransport::connect(addr, Duration::from_millis(500)).unwrap_err();
        assert!(matches!(err, SrtpError::Connect { addr: a, .. } if a == addr));
    }

    #[test]
    fn test_shutdown_twice() {
        let (listener, addr) = listener();
        let server = thread::spawn(move || {
            let _ = listener.accept().unwrap();
        });

        let mut transport = TcpTransport::connect(addr, Duration::from_secs(2)).unwrap();
        transport.shutdown();
        transport.shutdown();
        server.join().unwrap();
    }

    #[test]
    fn test_transport_debug() {
        let (listener, addr) = listener();
        let _server = thread::spawn(move || {
            let _ = listener.accept();
        });

        let transport = TcpTransport::connect(addr, Duration::from_secs(2)).unwrap();
        let debug_str = format!("{:?}", transport);
        assert!(debug_str.contains("TcpTransport"));
        assert!(debug_str.contains(&addr.to_string()));
    }
}
