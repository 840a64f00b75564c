//! UDP telemetry adapter.
//!
//! Implements [`DatagramPort`] over a `std::net::UdpSocket` (ESP-IDF ships
//! lwIP behind the std socket API, so the same code runs on the chip and
//! on the host).  The socket is bound to an ephemeral local port and put in
//! non-blocking mode: a full transmit buffer surfaces as `WouldBlock`
//! instead of stalling the control loop.

use std::net::{Ipv4Addr, SocketAddr, SocketAddrV4, UdpSocket};

use log::info;

use crate::app::ports::DatagramPort;
use crate::error::TelemetryError;

pub struct UdpDatagram {
    socket: UdpSocket,
    dest: SocketAddrV4,
}

impl UdpDatagram {
    /// Bind an unspecified local port and fix the destination.
    pub fn bind(dest: SocketAddrV4) -> Result<Self, TelemetryError> {
        let socket = UdpSocket::bind((Ipv4Addr::UNSPECIFIED, 0))?;
        socket.set_nonblocking(true)?;
        info!(
            "UDP: telemetry socket {} -> {}",
            socket.local_addr()?,
            dest
        );
        Ok(Self { socket, dest })
    }

    pub fn destination(&self) -> SocketAddrV4 {
        self.dest
    }

    pub fn local_addr(&self) -> Result<SocketAddr, TelemetryError> {
        Ok(self.socket.local_addr()?)
    }
}

impl DatagramPort for UdpDatagram {
    fn send(&mut self, payload: &[u8]) -> Result<usize, TelemetryError> {
        Ok(self.socket.send_to(payload, self.dest)?)
    }
}
