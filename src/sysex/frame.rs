use std::fmt;

use serde::{Deserialize, Serialize};

use super::{
    address::{self, Address, Target},
    encode::{encode_value, EncodedValue},
    params::ParamRegistry,
    DT1_COMMAND, MODEL_ID, ROLAND_ID, SYSEX_END, SYSEX_START,
};

pub const DEVICE_ID_INDEX: usize = 2;

/// `F0 41 <dev> 46 12 <addr x4> <data x1-2> <sum> F7`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame(Vec<u8>);

impl Frame {
    pub fn bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn device_id(&self) -> u8 {
        self.0[DEVICE_ID_INDEX]
    }

    /// Address, data and checksum bytes.
    pub fn body(&self) -> &[u8] {
        &self.0[5..self.0.len() - 1]
    }

    /// Data bytes alone, without address or checksum.
    pub fn data(&self) -> &[u8] {
        let body = self.body();
        &body[4..body.len() - 1]
    }

    pub fn verify_checksum(&self) -> bool {
        self.body().iter().map(|b| *b as u32).sum::<u32>() % 128 == 0
    }
}

impl fmt::Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for (i, b) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{b:02X}")?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SystemMode {
    Performance,
    Patch,
}

impl SystemMode {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "performance" | "perf" => Some(Self::Performance),
            "patch" => Some(Self::Patch),
            _ => None,
        }
    }

    fn value(&self) -> u8 {
        match self {
            SystemMode::Performance => 0x00,
            SystemMode::Patch => 0x01,
        }
    }
}

pub fn checksum(bytes: &[u8]) -> u8 {
    let sum = bytes.iter().fold(0u8, |acc, b| acc.wrapping_add(*b)) & 0x7F;
    let chk = 0x80 - sum;
    if chk == 0x80 {
        0
    } else {
        chk
    }
}

pub fn build_dt1(address: &Address, data: &[u8], device_id: u8) -> Frame {
    debug_assert!(device_id <= 0x7F, "device id {device_id:#04X} is not a data byte");
    let mut msg = Vec::with_capacity(5 + address.bytes().len() + data.len() + 2);
    msg.extend_from_slice(&[SYSEX_START, ROLAND_ID, device_id, MODEL_ID, DT1_COMMAND]);
    msg.extend_from_slice(address.bytes());
    msg.extend_from_slice(data);
    msg.push(checksum(&msg[5..]));
    msg.push(SYSEX_END);
    Frame(msg)
}

pub fn build_system_mode(mode: SystemMode, device_id: u8) -> Frame {
    build_dt1(&Address::SYSTEM, &[mode.value()], device_id)
}

/// `Ok(None)` when `name` is not a parameter of the target's group. Otherwise
/// the frame comes back with the table's own copy of the name.
pub fn build_param(
    registry: &ParamRegistry,
    target: Target,
    name: &str,
    value: i32,
    device_id: u8,
) -> address::Result<Option<(&'static str, Frame)>> {
    let group = target.group();
    let Some(ordinal) = registry.resolve(group, name).ordinal() else {
        return Ok(None);
    };
    let name = registry.table(group).name(ordinal);
    let address = target.address(ordinal)?;
    let data: EncodedValue = encode_value(registry, name, value);
    Ok(Some((name, build_dt1(&address, data.as_slice(), device_id))))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sysex::{address::AddressError, DEFAULT_DEVICE_ID};

    #[test]
    fn checksum_values() {
        assert_eq!(checksum(&[0x00, 0x08, 0x20, 0x18, 0x64]), 0x5C);
        assert_eq!(checksum(&[0x00, 0x00, 0x00, 0x00, 0x00]), 0x00);
        assert_eq!(checksum(&[0x40, 0x00, 0x7F, 0x00, 0x41]), 0x00);
        assert_eq!(checksum(&[0x40, 0x41, 0x22, 0x01]), 0x5C);
    }

    #[test]
    fn checksum_round_trip() {
        let mut seed: u32 = 0x1234_5678;
        for len in 5..=6 {
            for _ in 0..2000 {
                let bytes: Vec<u8> = (0..len)
                    .map(|_| {
                        seed = seed.wrapping_mul(1_103_515_245).wrapping_add(12345);
                        ((seed >> 16) & 0x7F) as u8
                    })
                    .collect();
                let chk = checksum(&bytes);
                assert!(chk <= 0x7F);
                let sum: u32 = bytes.iter().map(|b| *b as u32).sum::<u32>() + chk as u32;
                assert_eq!(sum % 128, 0);
            }
        }
    }

    #[test]
    fn patch_level_frame() {
        let registry = ParamRegistry::new();
        let frame = build_param(&registry, Target::PatchCommon, "patchlevel", 100, DEFAULT_DEVICE_ID)
            .unwrap()
            .unwrap()
            .1;
        assert_eq!(
            frame.bytes(),
            &[0xF0, 0x41, 0x10, 0x46, 0x12, 0x00, 0x08, 0x20, 0x18, 0x64, 0x5C, 0xF7]
        );
        assert!(frame.verify_checksum());
        assert_eq!(frame.data(), &[0x64]);
    }

    #[test]
    fn tone_wavenumber_frame() {
        let registry = ParamRegistry::new();
        let (name, frame) = build_param(&registry, Target::Tone(1), "wavenumber", 1000, 0x10)
            .unwrap()
            .unwrap();
        assert_eq!(name, "wavenumber");
        assert_eq!(
            frame.bytes(),
            &[0xF0, 0x41, 0x10, 0x46, 0x12, 0x00, 0x08, 0x29, 0x01, 0x3E, 0x08, 0x08, 0xF7]
        );
        assert!(frame.verify_checksum());
        assert_eq!(frame.data(), &[0x3E, 0x08]);
    }

    #[test]
    fn unknown_param_builds_nothing() {
        let registry = ParamRegistry::new();
        assert_eq!(
            build_param(&registry, Target::Part(0), "wavenumber", 10, 0x10),
            Ok(None)
        );
        assert_eq!(build_param(&registry, Target::Tone(0), "-", 10, 0x10), Ok(None));
    }

    #[test]
    fn malformed_drum_address_is_an_error() {
        let registry = ParamRegistry::new();
        assert!(matches!(
            build_param(&registry, Target::Drum(80), "level", 10, 0x10),
            Err(AddressError::MalformedAddress { .. })
        ));
    }

    #[test]
    fn system_mode() {
        let frame = build_system_mode(SystemMode::Patch, 0x10);
        assert_eq!(
            frame.bytes(),
            &[0xF0, 0x41, 0x10, 0x46, 0x12, 0x00, 0x00, 0x00, 0x00, 0x01, 0x7F, 0xF7]
        );
        let frame = build_system_mode(SystemMode::Performance, 0x11);
        assert_eq!(frame.device_id(), 0x11);
        assert_eq!(frame.data(), &[0x00]);
        assert!(frame.verify_checksum());
    }

    #[test]
    #[should_panic]
    fn device_id_past_seven_bits_panics() {
        build_system_mode(SystemMode::Patch, 0x90);
    }

    #[test]
    fn display_as_hex() {
        let frame = build_system_mode(SystemMode::Patch, 0x10);
        assert_eq!(frame.to_string(), "F0 41 10 46 12 00 00 00 00 01 7F F7");
    }
}
