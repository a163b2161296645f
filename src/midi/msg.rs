// Channel voice messages. SysEx is handled by `crate::sysex` and never decoded here.
// Resources:
// https://www.songstuff.com/recording/article/midi_message_format/

pub const NUM_CHANNELS: u8 = 16;

pub const CC_SUSTAIN: u8 = 64;
pub const CC_RESET_ALL_CONTROLLERS: u8 = 121;
pub const CC_ALL_NOTES_OFF: u8 = 123;

#[derive(Debug, Clone, PartialEq, Copy)]
pub enum MessageKind {
    NoteOff { note: u8, velocity: u8 },
    NoteOn { note: u8, velocity: u8 },
    PolyphonicAftertouch { note: u8, pressure: u8 },
    ControlChange { control: u8, value: u8 },
    ProgramChange { program: u8 },
    ChannelAftertouch { pressure: u8 },
    PitchWheel { value: u16 },
}

impl MessageKind {
    pub fn as_number(&self) -> u8 {
        match *self {
            MessageKind::NoteOff { .. } => 0x80,
            MessageKind::NoteOn { .. } => 0x90,
            MessageKind::PolyphonicAftertouch { .. } => 0xA0,
            MessageKind::ControlChange { .. } => 0xB0,
            MessageKind::ProgramChange { .. } => 0xC0,
            MessageKind::ChannelAftertouch { .. } => 0xD0,
            MessageKind::PitchWheel { .. } => 0xE0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Copy)]
pub struct Message {
    pub kind: MessageKind,
    pub channel: u8,
}

impl Message {
    pub fn new(channel: u8, kind: MessageKind) -> Self {
        Self {
            kind,
            channel: channel & 0x0F,
        }
    }

    pub fn control_change(channel: u8, control: u8, value: u8) -> Self {
        Self::new(channel, MessageKind::ControlChange { control, value })
    }

    pub fn all_notes_off(channel: u8) -> Self {
        Self::control_change(channel, CC_ALL_NOTES_OFF, 0)
    }

    pub fn reset_all_controllers(channel: u8) -> Self {
        Self::control_change(channel, CC_RESET_ALL_CONTROLLERS, 0)
    }

    pub fn sustain(channel: u8, on: bool) -> Self {
        Self::control_change(channel, CC_SUSTAIN, if on { 127 } else { 0 })
    }

    pub fn decode(bytes: &[u8]) -> Option<Self> {
        if bytes.is_empty() {
            None
        } else {
            decode_non_empty_message(bytes)
        }
    }

    pub fn encode(&self) -> Vec<u8> {
        let status = self.kind.as_number() | (self.channel & 0x0F);
        match self.kind {
            MessageKind::NoteOff { note, velocity } | MessageKind::NoteOn { note, velocity } => {
                vec![status, note & 0x7F, velocity & 0x7F]
            }
            MessageKind::PolyphonicAftertouch { note, pressure } => {
                vec![status, note & 0x7F, pressure & 0x7F]
            }
            MessageKind::ControlChange { control, value } => {
                vec![status, control & 0x7F, value & 0x7F]
            }
            MessageKind::ProgramChange { program } => vec![status, program & 0x7F],
            MessageKind::ChannelAftertouch { pressure } => vec![status, pressure & 0x7F],
            MessageKind::PitchWheel { value } => {
                vec![status, (value & 0x7F) as u8, ((value >> 7) & 0x7F) as u8]
            }
        }
    }
}

fn decode_non_empty_message(bytes: &[u8]) -> Option<Message> {
    let cmd = bytes[0] & 0xF0;
    let channel = bytes[0] & 0x0F;
    let kind = match cmd {
        0x80 => parse_note_off(bytes)?,
        0x90 => parse_note_on(bytes)?,
        0xA0 => parse_polyphonic_aftertouch(bytes)?,
        0xB0 => parse_control_change(bytes)?,
        0xC0 => parse_program_change(bytes)?,
        0xD0 => parse_channel_aftertouch(bytes)?,
        0xE0 => parse_pitch_wheel(bytes)?,
        _ => None?,
    };
    Some(Message { kind, channel })
}

fn parse_note_on(bytes: &[u8]) -> Option<MessageKind> {
    let [_, note, velocity, ..] = *bytes else {
        return None;
    };
    if velocity == 0 {
        Some(MessageKind::NoteOff { note, velocity })
    } else {
        Some(MessageKind::NoteOn { note, velocity })
    }
}

fn parse_note_off(bytes: &[u8]) -> Option<MessageKind> {
    let [_, note, velocity, ..] = *bytes else {
        return None;
    };
    Some(MessageKind::NoteOff { note, velocity })
}

fn parse_polyphonic_aftertouch(bytes: &[u8]) -> Option<MessageKind> {
    let [_, note, pressure, ..] = *bytes else {
        return None;
    };
    Some(MessageKind::PolyphonicAftertouch { note, pressure })
}

fn parse_control_change(bytes: &[u8]) -> Option<MessageKind> {
    let [_, control, value, ..] = *bytes else {
        return None;
    };
    Some(MessageKind::ControlChange { control, value })
}

fn parse_program_change(bytes: &[u8]) -> Option<MessageKind> {
    let [_, program, ..] = *bytes else {
        return None;
    };
    Some(MessageKind::ProgramChange { program })
}

fn parse_channel_aftertouch(bytes: &[u8]) -> Option<MessageKind> {
    let [_, pressure, ..] = *bytes else {
        return None;
    };
    Some(MessageKind::ChannelAftertouch { pressure })
}

fn parse_pitch_wheel(bytes: &[u8]) -> Option<MessageKind> {
    let [_, lsb, msb, ..] = *bytes else {
        return None;
    };
    let value = ((lsb as u16) & 0x7F) | (((msb as u16) & 0x7F) << 7);
    Some(MessageKind::PitchWheel { value })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn panic_helpers() {
        assert_eq!(Message::all_notes_off(3).encode(), vec![0xB3, 123, 0]);
        assert_eq!(Message::reset_all_controllers(15).encode(), vec![0xBF, 121, 0]);
        assert_eq!(Message::sustain(0, true).encode(), vec![0xB0, 64, 127]);
        assert_eq!(Message::sustain(0, false).encode(), vec![0xB0, 64, 0]);
    }

    #[test]
    fn decode_note_on_zero_velocity_is_note_off() {
        let msg = Message::decode(&[0x91, 60, 0]).unwrap();
        assert_eq!(msg.channel, 1);
        assert_eq!(msg.kind, MessageKind::NoteOff { note: 60, velocity: 0 });
    }

    #[test]
    fn decode_rejects_short_and_sysex() {
        assert_eq!(Message::decode(&[]), None);
        assert_eq!(Message::decode(&[0x90, 60]), None);
        assert_eq!(Message::decode(&[0xF0, 0x41, 0x10, 0x46, 0x12, 0xF7]), None);
    }

    #[test]
    fn pitch_wheel() {
        let msg = Message::new(2, MessageKind::PitchWheel { value: 8192 });
        assert_eq!(msg.encode(), vec![0xE2, 0x00, 0x40]);
        assert_eq!(Message::decode(&msg.encode()), Some(msg));
    }

    #[test]
    fn program_change() {
        let msg = Message::decode(&[0xC4, 17]).unwrap();
        assert_eq!(msg.kind, MessageKind::ProgramChange { program: 17 });
        assert_eq!(msg.encode(), vec![0xC4, 17]);
    }
}
