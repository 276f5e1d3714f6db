//! UDP sink for statsite.

use std::io;
use std::net::{Ipv4Addr, Ipv6Addr, SocketAddr, ToSocketAddrs, UdpSocket};

use super::MetricSink;
use crate::config::{format_destination, SloSettings};

/// Sends each line as a single UDP datagram.
///
/// A fresh socket is opened per send. Nothing is awaited after the
/// datagram leaves, so delivery is not confirmed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UdpSink {
    host: String,
    port: u16,
}

impl UdpSink {
    /// Creates a sink sending to `host:port`.
    #[must_use]
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }

    /// Creates a sink sending to the configured statsite address.
    #[must_use]
    pub fn from_settings(settings: &SloSettings) -> Self {
        Self::new(settings.statsite_host.clone(), settings.statsite_port)
    }

    fn resolve(&self) -> io::Result<SocketAddr> {
        let host = self
            .host
            .strip_prefix('[')
            .and_then(|h| h.strip_suffix(']'))
            .unwrap_or(self.host.as_str());

        (host, self.port)
            .to_socket_addrs()?
            .next()
            .ok_or_else(|| {
                io::Error::new(
                    io::ErrorKind::AddrNotAvailable,
                    format!("{} did not resolve to any address", self.host),
                )
            })
    }
}

impl MetricSink for UdpSink {
    fn send(&self, line: &str) -> io::Result<usize> {
        let target = self.resolve()?;
        let local: SocketAddr = if target.is_ipv4() {
            (Ipv4Addr::UNSPECIFIED, 0).into()
        } else {
            (Ipv6Addr::UNSPECIFIED, 0).into()
        };

        let socket = UdpSocket::bind(local)?;
        socket.send_to(line.as_bytes(), target)
    }

    fn destination(&self) -> String {
        format_destination(&self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_send_delivers_single_datagram() {
        let receiver = UdpSocket::bind("127.0.0.1:0").unwrap();
        receiver
            .set_read_timeout(Some(Duration::from_secs(5)))
            .unwrap();
        let port = receiver.local_addr().unwrap().port();

        let sink = UdpSink::new("127.0.0.1", port);
        let sent = sink.send("[]:1|g").unwrap();
        assert_eq!(sent, 6);

        let mut buf = [0u8; 512];
        let (len, _) = receiver.recv_from(&mut buf).unwrap();
        assert_eq!(&buf[..len], b"[]:1|g");
    }

    #[test]
    fn test_from_settings() {
        let settings = SloSettings::default().with_statsite_port(9125);
        let sink = UdpSink::from_settings(&settings);
        assert_eq!(sink.destination(), "127.0.0.1:9125");
    }

    #[test]
    fn test_ipv6_destination_display() {
        assert_eq!(UdpSink::new("::1", 8125).destination(), "[::1]:8125");
        assert_eq!(UdpSink::new("[::1]", 8125).destination(), "[::1]:8125");
    }

    #[test]
    fn test_bracketed_ipv6_host_resolves() {
        let addr = UdpSink::new("[::1]", 8125).resolve().unwrap();
        assert_eq!(addr, SocketAddr::from((Ipv6Addr::LOCALHOST, 8125)));

        let addr = UdpSink::new("::1", 8126).resolve().unwrap();
        assert_eq!(addr, SocketAddr::from((Ipv6Addr::LOCALHOST, 8126)));
    }
}
