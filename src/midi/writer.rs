use std::{error::Error, fmt};

use midir::{MidiOutput, MidiOutputConnection};
use tracing::warn;

use crate::dispatch::Transmit;

const CLIENT_NAME: &str = "jv-remote";

pub type Result<T> = std::result::Result<T, WriterError>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriterError {
    ConnectError,
    PortNotFound(String),
    NotConnected,
    SendError(String),
}

impl Error for WriterError {}

impl fmt::Display for WriterError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            WriterError::ConnectError => f.write_str("Failed to connect MIDI output port."),
            WriterError::PortNotFound(name) => write!(f, "MIDI output port not found: {name}"),
            WriterError::NotConnected => f.write_str("No MIDI output port connected."),
            WriterError::SendError(e) => write!(f, "Failed to send MIDI message: {e}"),
        }
    }
}

pub struct MidiWriter {
    connection: Option<(String, MidiOutputConnection)>,
}

impl MidiWriter {
    pub fn new() -> Self {
        Self { connection: None }
    }

    pub fn get_available_ports() -> Vec<String> {
        MidiOutput::new(CLIENT_NAME)
            .map(|midi_out| super::port_names(&midi_out))
            .unwrap_or_default()
    }

    pub fn connect_output(&mut self, port_name: &str) -> Result<()> {
        let midi_out = MidiOutput::new(CLIENT_NAME).map_err(|_| WriterError::ConnectError)?;
        let port = super::find_port(&midi_out, port_name)
            .ok_or_else(|| WriterError::PortNotFound(port_name.to_owned()))?;
        let conn = midi_out
            .connect(&port, "jv-remote-out")
            .map_err(|_| WriterError::ConnectError)?;
        self.connection = Some((port_name.to_owned(), conn));
        Ok(())
    }

    pub fn disconnect(&mut self) {
        if let Some((_, conn)) = self.connection.take() {
            conn.close();
        }
    }

    pub fn connected_port_name(&self) -> Option<&str> {
        self.connection.as_ref().map(|(name, _)| name.as_str())
    }

    pub fn send(&mut self, bytes: &[u8]) -> Result<()> {
        let (_, conn) = self.connection.as_mut().ok_or(WriterError::NotConnected)?;
        conn.send(bytes)
            .map_err(|e| WriterError::SendError(e.to_string()))
    }
}

impl Default for MidiWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl Transmit for MidiWriter {
    // Single output port, so the destination tag has nothing to select.
    fn transmit(&mut self, bytes: &[u8], _dest: Option<&str>) {
        if let Err(e) = self.send(bytes) {
            warn!("{e}");
        }
    }
}
