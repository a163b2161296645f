mod msg;
mod reader;
mod writer;

pub use msg::{Message, MessageKind, NUM_CHANNELS};
pub use reader::{MidiReader, ReaderError};
pub use writer::{MidiWriter, WriterError};

use midir::MidiIO;
use tokio::sync::broadcast;

pub type Sender = broadcast::Sender<Message>;
pub type Receiver = broadcast::Receiver<Message>;

pub fn create_channel(buffer: usize) -> (Sender, Receiver) {
    broadcast::channel(buffer)
}

fn port_names<T: MidiIO>(io: &T) -> Vec<String> {
    io.ports()
        .iter()
        .filter_map(|port| io.port_name(port).ok())
        .collect()
}

fn find_port<T: MidiIO>(io: &T, port_name: &str) -> Option<T::Port> {
    io.ports()
        .into_iter()
        .find(|port| io.port_name(port).map_or(false, |name| name == port_name))
}
