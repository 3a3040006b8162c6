//! EDMCOverlay wire protocol and TCP transport

use std::io::Write;
use std::net::{TcpStream, ToSocketAddrs};
use std::time::Duration;

use serde::Serialize;

use crate::config::OverlayConfig;
use crate::error::{Error, Result};

/// A text message for the overlay
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OverlayMessage {
    /// Slot identifier; a new message with the same id replaces the old one
    pub id: String,
    pub text: String,
    pub color: String,
    pub x: u32,
    pub y: u32,
    /// Seconds until the overlay removes the message
    pub ttl: u64,
    pub size: String,
}

/// Anything the overlay service accepts on its socket
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum OverlayCommand {
    Message(OverlayMessage),
    Control { command: String },
}

impl OverlayCommand {
    /// Ask the overlay process to shut down
    pub fn exit() -> Self {
        OverlayCommand::Control {
            command: "exit".to_string(),
        }
    }

    /// Encode as a single newline-terminated JSON line
    pub fn to_line(&self) -> Result<Vec<u8>> {
        let mut line = serde_json::to_vec(self)?;
        line.push(b'\n');
        Ok(line)
    }
}

/// Destination for overlay commands
pub trait OverlaySink {
    /// Acquire the underlying connection ahead of the first message
    fn connect(&mut self) -> Result<()> {
        Ok(())
    }

    /// Deliver one command
    fn send(&mut self, command: &OverlayCommand) -> Result<()>;
}

impl<S: OverlaySink + ?Sized> OverlaySink for Box<S> {
    fn connect(&mut self) -> Result<()> {
        (**self).connect()
    }

    fn send(&mut self, command: &OverlayCommand) -> Result<()> {
        (**self).send(command)
    }
}

/// TCP connection to an EDMCOverlay listener
///
/// Connects on first use and after any failed write, so an overlay started
/// after the plugin is picked up by the next message.
pub struct TcpOverlay {
    address: String,
    connect_timeout: Duration,
    stream: Option<TcpStream>,
}

impl TcpOverlay {
    /// Create an unconnected overlay client from configuration
    pub fn new(config: &OverlayConfig) -> Self {
        Self {
            address: config.address.clone(),
            connect_timeout: Duration::from_millis(config.connect_timeout_ms),
            stream: None,
        }
    }

    /// Whether a connection is currently held
    #[cfg(test)]
    fn is_connected(&self) -> bool {
        self.stream.is_some()
    }

    fn stream(&mut self) -> Result<&mut TcpStream> {
        if self.stream.is_none() {
            let addr = self
                .address
                .to_socket_addrs()?
                .next()
                .ok_or_else(|| Error::Overlay(format!("no address for {}", self.address)))?;

            let stream = TcpStream::connect_timeout(&addr, self.connect_timeout)?;
            stream.set_write_timeout(Some(self.connect_timeout))?;
            stream.set_nodelay(true)?;

            tracing::debug!(address = %self.address, "Connected to overlay");
            self.stream = Some(stream);
        }

        self.stream
            .as_mut()
            .ok_or_else(|| Error::Overlay("overlay not connected".to_string()))
    }
}

impl OverlaySink for TcpOverlay {
    fn connect(&mut self) -> Result<()> {
        self.stream()?;
        Ok(())
    }

    fn send(&mut self, command: &OverlayCommand) -> Result<()> {
        let line = command.to_line()?;
        let stream = self.stream()?;

        let result = stream.write_all(&line).and_then(|()| stream.flush());
        if let Err(e) = result {
            // Reconnect on the next send
            self.stream = None;
            return Err(e.into());
        }

        Ok(())
    }
}
