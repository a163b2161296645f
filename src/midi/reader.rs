use std::{error::Error, fmt};

use midir::{MidiInput, MidiInputConnection};
use tracing::debug;

use super::{Message, Sender};

const CLIENT_NAME: &str = "jv-remote monitor";

pub type Result<T> = std::result::Result<T, ReaderError>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReaderError {
    ConnectError,
    PortNotFound(String),
}

impl Error for ReaderError {}

impl fmt::Display for ReaderError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ReaderError::ConnectError => f.write_str("Failed to connect MIDI input port."),
            ReaderError::PortNotFound(name) => write!(f, "MIDI input port not found: {name}"),
        }
    }
}

/// Listens on one input port and republishes decodable channel messages.
pub struct MidiReader {
    connection: Option<(String, MidiInputConnection<()>)>,
    tx: Sender,
}

impl MidiReader {
    pub fn new(tx: Sender) -> Self {
        Self {
            connection: None,
            tx,
        }
    }

    pub fn get_available_ports() -> Vec<String> {
        MidiInput::new(CLIENT_NAME)
            .map(|midi_in| super::port_names(&midi_in))
            .unwrap_or_default()
    }

    pub fn connect_input(&mut self, port_name: &str) -> Result<()> {
        let midi_in = MidiInput::new(CLIENT_NAME).map_err(|_| ReaderError::ConnectError)?;
        let port = super::find_port(&midi_in, port_name)
            .ok_or_else(|| ReaderError::PortNotFound(port_name.to_owned()))?;
        let tx = self.tx.clone();
        let conn = midi_in
            .connect(
                &port,
                "jv-remote-in",
                move |_, message, _| match Message::decode(message) {
                    Some(msg) => {
                        _ = tx.send(msg);
                    }
                    None => debug!("Ignored inbound message: {message:02X?}"),
                },
                (),
            )
            .map_err(|_| ReaderError::ConnectError)?;
        self.connection = Some((port_name.to_owned(), conn));
        Ok(())
    }

    pub fn disconnect_input(&mut self) {
        self.connection = None;
    }

    pub fn connected_input_name(&self) -> Option<&str> {
        self.connection.as_ref().map(|(name, _)| name.as_str())
    }
}
