use std::{error::Error, fmt};

use super::{encode::clamp_value, params::Group};

pub const DRUM_NOTE_MIN: u8 = 36;
pub const DRUM_NOTE_MAX: u8 = 96;

const PATCH_BASE: u8 = 0x20;
const PERFORMANCE_BASE: u8 = 0x10;
const INSTANCE_OFFSET: u8 = 0x08;
const DRUM_BANK: u8 = 0x40;

pub type Result<T> = std::result::Result<T, AddressError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddressError {
    MalformedAddress { index: usize, byte: u16 },
}

impl Error for AddressError {}

impl fmt::Display for AddressError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            AddressError::MalformedAddress { index, byte } => {
                write!(f, "Address byte {index} out of 7-bit range: {byte:#04X}")
            }
        }
    }
}

/// Four 7-bit bytes naming one location in device memory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Address([u8; 4]);

impl Address {
    /// System area, where the patch/performance mode switch lives.
    pub const SYSTEM: Address = Address([0x00, 0x00, 0x00, 0x00]);

    pub fn new(bytes: [u16; 4]) -> Result<Self> {
        let mut out = [0u8; 4];
        for (index, byte) in bytes.into_iter().enumerate() {
            if byte > 0x7F {
                return Err(AddressError::MalformedAddress { index, byte });
            }
            out[index] = byte as u8;
        }
        Ok(Self(out))
    }

    pub fn bytes(&self) -> &[u8; 4] {
        &self.0
    }
}

/// Where a parameter lives: its group plus the tone, part or drum note it belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Target {
    PatchCommon,
    Tone(u8),
    PerformanceCommon,
    Part(u8),
    Drum(u8),
}

impl Target {
    pub fn group(&self) -> Group {
        match self {
            Target::PatchCommon => Group::PatchCommon,
            Target::Tone(_) => Group::Tone,
            Target::PerformanceCommon => Group::PerformanceCommon,
            Target::Part(_) => Group::Part,
            Target::Drum(_) => Group::Drum,
        }
    }

    pub fn from_group(group: Group, instance: u8) -> Self {
        match group {
            Group::PatchCommon => Target::PatchCommon,
            Group::Tone => Target::Tone(instance),
            Group::PerformanceCommon => Target::PerformanceCommon,
            Group::Part => Target::Part(instance),
            Group::Drum => Target::Drum(instance),
        }
    }

    pub fn instance(&self) -> u8 {
        match *self {
            Target::PatchCommon | Target::PerformanceCommon => 0,
            Target::Tone(i) | Target::Part(i) | Target::Drum(i) => i,
        }
    }

    pub fn address(&self, ordinal: u8) -> Result<Address> {
        let ordinal = ordinal as u16;
        let bytes = match *self {
            Target::PatchCommon => [0x00, 0x08, PATCH_BASE as u16, ordinal],
            Target::Tone(tone) => [
                0x00,
                0x08,
                (PATCH_BASE + INSTANCE_OFFSET) as u16 + tone as u16,
                ordinal,
            ],
            Target::PerformanceCommon => [0x00, 0x00, PERFORMANCE_BASE as u16, ordinal],
            Target::Part(part) => [
                0x00,
                0x00,
                (PERFORMANCE_BASE + INSTANCE_OFFSET) as u16 + part as u16,
                ordinal,
            ],
            Target::Drum(note) => [
                0x00,
                0x07,
                clamp_value(note, DRUM_NOTE_MIN, DRUM_NOTE_MAX) as u16 + DRUM_BANK as u16,
                ordinal,
            ],
        };
        Address::new(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn patch_common() {
        let address = Target::PatchCommon.address(24).unwrap();
        assert_eq!(address.bytes(), &[0x00, 0x08, 0x20, 0x18]);
    }

    #[test]
    fn tone() {
        let address = Target::Tone(1).address(1).unwrap();
        assert_eq!(address.bytes(), &[0x00, 0x08, 0x29, 0x01]);
        assert_eq!(Target::Tone(3).address(0).unwrap().bytes()[2], 0x2B);
    }

    #[test]
    fn performance_and_part() {
        assert_eq!(
            Target::PerformanceCommon.address(12).unwrap().bytes(),
            &[0x00, 0x00, 0x10, 0x0C]
        );
        assert_eq!(
            Target::Part(7).address(25).unwrap().bytes(),
            &[0x00, 0x00, 0x1F, 0x19]
        );
    }

    #[test]
    fn drum_note_clamped_low() {
        assert_eq!(Target::Drum(36).address(0).unwrap().bytes()[2], 0x64);
        assert_eq!(Target::Drum(10).address(0).unwrap().bytes()[2], 0x64);
        assert_eq!(Target::Drum(63).address(0).unwrap().bytes()[2], 0x7F);
    }

    #[test]
    fn drum_note_past_seven_bits_is_malformed() {
        assert_eq!(
            Target::Drum(64).address(0),
            Err(AddressError::MalformedAddress {
                index: 2,
                byte: 0x80
            })
        );
        assert_eq!(
            Target::Drum(120).address(0),
            Err(AddressError::MalformedAddress {
                index: 2,
                byte: 96 + 0x40
            })
        );
    }

    #[test]
    fn oversized_instance_is_malformed() {
        assert!(Target::Tone(200).address(0).is_err());
        assert!(Target::PatchCommon.address(128).is_err());
    }

    #[test]
    fn group_round_trip() {
        for group in Group::ALL {
            assert_eq!(Target::from_group(group, 2).group(), group);
        }
        assert_eq!(Target::from_group(Group::PatchCommon, 5).instance(), 0);
    }
}
