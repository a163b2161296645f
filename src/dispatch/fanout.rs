use tracing::trace;

use super::Transmit;
use crate::sysex::{frame::DEVICE_ID_INDEX, SYSEX_START};

pub const HOST_DESTINATION: &str = "host";

const MIN_SYSEX_LEN: usize = 6;

pub fn is_sysex(bytes: &[u8]) -> bool {
    bytes.len() >= MIN_SYSEX_LEN && bytes[0] == SYSEX_START
}

/// Sends every SysEx frame once per candidate device id. A JV-880 ignores
/// frames addressed to another id, so the copies are harmless.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fanout {
    device_ids: Vec<u8>,
}

impl Fanout {
    pub fn new(device_ids: Vec<u8>) -> Self {
        Self { device_ids }
    }

    pub fn single(device_id: u8) -> Self {
        Self::new(vec![device_id])
    }

    pub fn device_ids(&self) -> &[u8] {
        &self.device_ids
    }

    /// Returns the number of messages handed to `sink`.
    pub fn send<T: Transmit + ?Sized>(&self, sink: &mut T, bytes: &[u8]) -> usize {
        if !is_sysex(bytes) {
            sink.transmit(bytes, Some(HOST_DESTINATION));
            return 1;
        }

        // The device id sits outside the checksummed region, so the checksum stays valid.
        let mut out = bytes.to_vec();
        for device_id in &self.device_ids {
            out[DEVICE_ID_INDEX] = *device_id;
            trace!("SysEx -> {device_id:#04X}: {out:02X?}");
            sink.transmit(&out, None);
        }
        self.device_ids.len()
    }
}

impl Default for Fanout {
    fn default() -> Self {
        Self::new((0x10..=0x1F).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatch::testing::Recorder;
    use crate::sysex::{build_system_mode, SystemMode};

    #[test]
    fn sysex_goes_to_every_id() {
        let fanout = Fanout::default();
        let mut sink = Recorder::default();
        let frame = build_system_mode(SystemMode::Patch, 0x10);

        assert_eq!(fanout.send(&mut sink, frame.bytes()), 16);
        assert_eq!(sink.sent.len(), 16);

        for (i, (bytes, dest)) in sink.sent.iter().enumerate() {
            assert_eq!(*dest, None);
            assert_eq!(bytes[DEVICE_ID_INDEX], 0x10 + i as u8);
            assert_eq!(bytes[..DEVICE_ID_INDEX], frame.bytes()[..DEVICE_ID_INDEX]);
            assert_eq!(bytes[DEVICE_ID_INDEX + 1..], frame.bytes()[DEVICE_ID_INDEX + 1..]);
        }
    }

    #[test]
    fn channel_message_is_sent_once() {
        let fanout = Fanout::default();
        let mut sink = Recorder::default();

        assert_eq!(fanout.send(&mut sink, &[0xB0, 123, 0]), 1);
        assert_eq!(sink.sent, vec![(vec![0xB0, 123, 0], Some("host".to_owned()))]);
    }

    #[test]
    fn short_sysex_bypasses_fanout() {
        let fanout = Fanout::new(vec![0x10, 0x11]);
        let mut sink = Recorder::default();

        fanout.send(&mut sink, &[0xF0, 0x7E, 0x7F, 0x06, 0xF7]);
        assert_eq!(sink.sent.len(), 1);
    }

    #[test]
    fn configured_ids() {
        let fanout = Fanout::new(vec![0x11, 0x17]);
        let mut sink = Recorder::default();
        let frame = build_system_mode(SystemMode::Performance, 0x10);

        fanout.send(&mut sink, frame.bytes());
        let ids: Vec<u8> = sink.sent.iter().map(|(b, _)| b[DEVICE_ID_INDEX]).collect();
        assert_eq!(ids, vec![0x11, 0x17]);
        assert_eq!(Fanout::single(0x12).device_ids(), &[0x12]);
    }
}
