use super::{params::ParamRegistry, MAX_VALUE};

/// One or two data bytes, high bit always clear.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncodedValue {
    bytes: [u8; 2],
    len: usize,
}

impl EncodedValue {
    pub fn single(value: u8) -> Self {
        Self {
            bytes: [value & 0x7F, 0],
            len: 1,
        }
    }

    pub fn double(hi: u8, lo: u8) -> Self {
        Self {
            bytes: [hi & 0x7F, lo & 0x7F],
            len: 2,
        }
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.bytes[..self.len]
    }
}

pub fn clamp_value<T: PartialOrd>(value: T, min: T, max: T) -> T {
    if value < min {
        min
    } else if value > max {
        max
    } else {
        value
    }
}

/// Clamps to `[0, MAX_VALUE]` regardless of width, then serializes.
/// Single-byte parameters keep only the low 7 bits; range checking them is the UI's job.
pub fn encode_value(registry: &ParamRegistry, name: &str, value: i32) -> EncodedValue {
    let v = clamp_value(value, 0, MAX_VALUE as i32) as u16;
    if registry.is_two_byte(name) {
        encode_two_byte(v)
    } else {
        EncodedValue::single((v & 0x7F) as u8)
    }
}

// Nibble split, not 7+7: the device reads `hi << 4 | lo`.
pub fn encode_two_byte(v: u16) -> EncodedValue {
    EncodedValue::double(((v >> 4) & 0x7F) as u8, (v & 0x0F) as u8)
}

pub fn decode_two_byte(hi: u8, lo: u8) -> u16 {
    ((hi as u16 & 0x7F) << 4) | (lo as u16 & 0x0F)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamp() {
        assert_eq!(clamp_value(-5, 0, 10), 0);
        assert_eq!(clamp_value(15, 0, 10), 10);
        assert_eq!(clamp_value(7, 0, 10), 7);
    }

    #[test]
    fn clamp_is_idempotent() {
        for x in -300..3000 {
            let once = clamp_value(x, 36, 96);
            assert_eq!(clamp_value(once, 36, 96), once);
        }
    }

    #[test]
    fn single_byte() {
        let registry = ParamRegistry::new();
        assert_eq!(encode_value(&registry, "patchlevel", 100).as_slice(), &[0x64]);
        assert_eq!(encode_value(&registry, "patchlevel", -20).as_slice(), &[0x00]);
        // 200 & 0x7F, the UI is expected to keep this in range
        assert_eq!(encode_value(&registry, "patchlevel", 200).as_slice(), &[0x48]);
    }

    #[test]
    fn two_byte_wavenumber() {
        let registry = ParamRegistry::new();
        assert_eq!(encode_value(&registry, "wavenumber", 1000).as_slice(), &[0x3E, 0x08]);
        assert_eq!(encode_value(&registry, "wavenumber", 0).as_slice(), &[0x00, 0x00]);
        assert_eq!(encode_value(&registry, "wavenumber", 5000).as_slice(), &[0x7E, 0x0F]);
    }

    #[test]
    fn two_byte_inverse() {
        for v in 0..=MAX_VALUE {
            let encoded = encode_two_byte(v);
            let bytes = encoded.as_slice();
            assert_eq!(bytes.len(), 2);
            assert!(bytes.iter().all(|b| *b <= 0x7F));
            assert_eq!(decode_two_byte(bytes[0], bytes[1]), v);
        }
    }

    #[test]
    fn bytes_have_high_bit_clear() {
        let registry = ParamRegistry::new();
        for value in [-1, 0, 127, 128, 255, 2031, 2032, i32::MAX] {
            for name in ["pan", "level"] {
                let encoded = encode_value(&registry, name, value);
                assert!(encoded.as_slice().iter().all(|b| *b & 0x80 == 0));
            }
        }
    }
}
