//! Metric sinks.
//!
//! A sink delivers a rendered statsite line somewhere. The handler uses
//! [`UdpSink`]; tests substitute their own implementations.

pub mod udp;

pub use udp::UdpSink;

use std::io;

/// Destination for rendered metric lines.
pub trait MetricSink {
    /// Sends one line and returns the number of bytes written.
    ///
    /// # Errors
    ///
    /// Returns an error if the line could not be handed to the transport.
    fn send(&self, line: &str) -> io::Result<usize>;

    /// Describes where lines are sent, for log messages.
    fn destination(&self) -> String;
}
