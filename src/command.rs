// Line commands read from stdin by the binary, e.g. `tone 2 cutofffrequency 90`.

use std::{error::Error, fmt};

use crate::sysex::{Group, SystemMode, Target};

pub const NUM_TONES: u8 = 4;
pub const NUM_PARTS: u8 = 8;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    SetParam {
        target: Target,
        name: String,
        value: i32,
    },
    Mode(SystemMode),
    Panic,
    Sustain(bool),
    ListParams(Group),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    Empty,
    UnknownCommand(String),
    MissingArgument(&'static str),
    InvalidNumber(String),
    InstanceOutOfRange { group: Group, instance: u8 },
    InvalidArgument(String),
}

impl Error for ParseError {}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ParseError::Empty => f.write_str("Empty command."),
            ParseError::UnknownCommand(word) => write!(f, "Unknown command: {word}"),
            ParseError::MissingArgument(what) => write!(f, "Missing {what}"),
            ParseError::InvalidNumber(word) => write!(f, "Not a number: {word}"),
            ParseError::InstanceOutOfRange { group, instance } => {
                write!(f, "No {group:?} number {instance}")
            }
            ParseError::InvalidArgument(word) => write!(f, "Invalid argument: {word}"),
        }
    }
}

impl Command {
    pub fn parse(line: &str) -> Result<Self, ParseError> {
        let mut words = line.split_whitespace();
        let head = words.next().ok_or(ParseError::Empty)?;

        match head {
            "mode" => {
                let word = words.next().ok_or(ParseError::MissingArgument("mode"))?;
                SystemMode::from_name(word)
                    .map(Command::Mode)
                    .ok_or_else(|| ParseError::InvalidArgument(word.to_owned()))
            }
            "panic" => Ok(Command::Panic),
            "sustain" => match words.next() {
                Some("on") => Ok(Command::Sustain(true)),
                Some("off") => Ok(Command::Sustain(false)),
                Some(word) => Err(ParseError::InvalidArgument(word.to_owned())),
                None => Err(ParseError::MissingArgument("on/off")),
            },
            "params" => {
                let word = words.next().ok_or(ParseError::MissingArgument("group"))?;
                Group::from_name(word)
                    .map(Command::ListParams)
                    .ok_or_else(|| ParseError::InvalidArgument(word.to_owned()))
            }
            _ => {
                let group = Group::from_name(head)
                    .ok_or_else(|| ParseError::UnknownCommand(head.to_owned()))?;
                parse_set_param(group, words)
            }
        }
    }
}

fn parse_set_param<'a>(
    group: Group,
    mut words: impl Iterator<Item = &'a str>,
) -> Result<Command, ParseError> {
    let target = match group {
        Group::PatchCommon | Group::PerformanceCommon => Target::from_group(group, 0),
        Group::Tone | Group::Part | Group::Drum => {
            let word = words.next().ok_or(ParseError::MissingArgument("instance"))?;
            let number: u8 = parse_number(word)?;
            Target::from_group(group, instance_index(group, number)?)
        }
    };
    let name = words.next().ok_or(ParseError::MissingArgument("parameter"))?;
    let word = words.next().ok_or(ParseError::MissingArgument("value"))?;
    let value = parse_number(word)?;

    Ok(Command::SetParam {
        target,
        name: name.to_ascii_lowercase(),
        value,
    })
}

// Tones and parts are numbered from 1 on the panel; drums by MIDI note.
fn instance_index(group: Group, number: u8) -> Result<u8, ParseError> {
    let count = match group {
        Group::Tone => NUM_TONES,
        Group::Part => NUM_PARTS,
        _ => return Ok(number),
    };
    if (1..=count).contains(&number) {
        Ok(number - 1)
    } else {
        Err(ParseError::InstanceOutOfRange {
            group,
            instance: number,
        })
    }
}

fn parse_number<T: std::str::FromStr>(word: &str) -> Result<T, ParseError> {
    word.parse()
        .map_err(|_| ParseError::InvalidNumber(word.to_owned()))
}
