// Roland DT1 ("data set 1") messages for the JV-880.
// Resources:
// JV-880 owner's manual, MIDI implementation chart (address map and checksum)

pub mod address;
pub mod encode;
pub mod frame;
pub mod params;

pub use address::{Address, AddressError, Target};
pub use encode::{clamp_value, encode_value, EncodedValue};
pub use frame::{build_dt1, build_param, build_system_mode, checksum, Frame, SystemMode};
pub use params::{Group, Lookup, ParamRegistry, ParamTable};

pub const SYSEX_START: u8 = 0xF0;
pub const SYSEX_END: u8 = 0xF7;
pub const ROLAND_ID: u8 = 0x41;
pub const MODEL_ID: u8 = 0x46;
pub const DT1_COMMAND: u8 = 0x12;
pub const DEFAULT_DEVICE_ID: u8 = 0x10;

/// Largest value the nibble-split encoding can carry (127 * 16 - 1).
pub const MAX_VALUE: u16 = 2031;
