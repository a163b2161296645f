mod fanout;
mod queue;

pub use fanout::{is_sysex, Fanout, HOST_DESTINATION};
pub use queue::{Dispatch, DispatchQueue, QueueKey, DEFAULT_THROTTLE};

/// Outbound MIDI sink. Sends are fire-and-forget: an implementor logs its own
/// failures and never reports them back.
pub trait Transmit {
    fn transmit(&mut self, bytes: &[u8], dest: Option<&str>);
}

#[cfg(test)]
pub mod testing {
    use super::Transmit;

    #[derive(Default)]
    pub struct Recorder {
        pub sent: Vec<(Vec<u8>, Option<String>)>,
    }

    impl Recorder {
        pub fn frames(&self) -> Vec<&[u8]> {
            self.sent.iter().map(|(bytes, _)| bytes.as_slice()).collect()
        }

        pub fn clear(&mut self) {
            self.sent.clear();
        }
    }

    impl Transmit for Recorder {
        fn transmit(&mut self, bytes: &[u8], dest: Option<&str>) {
            self.sent.push((bytes.to_vec(), dest.map(str::to_owned)));
        }
    }
}
