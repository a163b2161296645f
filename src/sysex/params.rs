// Parameter tables follow the JV-880 MIDI implementation chart.
// A table entry's position is the last byte of its address; "-" marks reserved
// offsets (usually the second byte of a two-byte parameter).

use std::collections::{HashMap, HashSet};

use super::MAX_VALUE;

pub const RESERVED: &str = "-";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Group {
    PatchCommon,
    Tone,
    PerformanceCommon,
    Part,
    Drum,
}

impl Group {
    pub const ALL: [Group; 5] = [
        Group::PatchCommon,
        Group::Tone,
        Group::PerformanceCommon,
        Group::Part,
        Group::Drum,
    ];

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "patch" | "patchcommon" => Some(Self::PatchCommon),
            "tone" => Some(Self::Tone),
            "perf" | "performance" | "performancecommon" => Some(Self::PerformanceCommon),
            "part" => Some(Self::Part),
            "drum" | "rhythm" => Some(Self::Drum),
            _ => None,
        }
    }

    pub fn params(&self) -> &'static [&'static str] {
        match self {
            Group::PatchCommon => PATCH_COMMON_PARAMS,
            Group::Tone => TONE_PARAMS,
            Group::PerformanceCommon => PERFORMANCE_COMMON_PARAMS,
            Group::Part => PART_PARAMS,
            Group::Drum => DRUM_PARAMS,
        }
    }
}

/// Result of a name lookup. A missing name is not ordinal 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lookup {
    Found(u8),
    NotFound,
}

impl Lookup {
    pub fn ordinal(self) -> Option<u8> {
        match self {
            Lookup::Found(ordinal) => Some(ordinal),
            Lookup::NotFound => None,
        }
    }
}

pub struct ParamTable {
    names: &'static [&'static str],
    index: HashMap<&'static str, u8>,
}

impl ParamTable {
    pub fn new(names: &'static [&'static str]) -> Self {
        let index = names
            .iter()
            .enumerate()
            .filter(|(_, name)| **name != RESERVED)
            .map(|(ordinal, name)| (*name, ordinal as u8))
            .collect();
        Self { names, index }
    }

    pub fn resolve(&self, name: &str) -> Lookup {
        match self.index.get(name) {
            Some(ordinal) => Lookup::Found(*ordinal),
            None => Lookup::NotFound,
        }
    }

    /// The table's spelling of the parameter at `ordinal`, as returned by `resolve`.
    pub fn name(&self, ordinal: u8) -> &'static str {
        self.names[ordinal as usize]
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.names.iter().copied().filter(|name| *name != RESERVED)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

pub struct ParamRegistry {
    patch_common: ParamTable,
    tone: ParamTable,
    performance_common: ParamTable,
    part: ParamTable,
    drum: ParamTable,
    two_byte: HashSet<&'static str>,
}

impl ParamRegistry {
    pub fn new() -> Self {
        Self {
            patch_common: ParamTable::new(PATCH_COMMON_PARAMS),
            tone: ParamTable::new(TONE_PARAMS),
            performance_common: ParamTable::new(PERFORMANCE_COMMON_PARAMS),
            part: ParamTable::new(PART_PARAMS),
            drum: ParamTable::new(DRUM_PARAMS),
            two_byte: TWO_BYTE_PARAMS.iter().copied().collect(),
        }
    }

    pub fn table(&self, group: Group) -> &ParamTable {
        match group {
            Group::PatchCommon => &self.patch_common,
            Group::Tone => &self.tone,
            Group::PerformanceCommon => &self.performance_common,
            Group::Part => &self.part,
            Group::Drum => &self.drum,
        }
    }

    pub fn resolve(&self, group: Group, name: &str) -> Lookup {
        if name.is_empty() {
            return Lookup::NotFound;
        }
        self.table(group).resolve(name)
    }

    pub fn is_two_byte(&self, name: &str) -> bool {
        self.two_byte.contains(name)
    }

    /// Upper bound a UI should offer for `name`.
    pub fn max_value(&self, name: &str) -> u16 {
        if self.is_two_byte(name) {
            MAX_VALUE
        } else {
            0x7F
        }
    }
}

impl Default for ParamRegistry {
    fn default() -> Self {
        Self::new()
    }
}

pub const TWO_BYTE_PARAMS: &[&str] = &[
    "lfo1delay",
    "lfo2delay",
    "pan",
    "patchnumber",
    "tonedelaytime",
    "transmitpan",
    "transmitprogramchange",
    "transmitvolume",
    "wavenumber",
];

pub const PATCH_COMMON_PARAMS: &[&str] = &[
    "patchname1",
    "patchname2",
    "patchname3",
    "patchname4",
    "patchname5",
    "patchname6",
    "patchname7",
    "patchname8",
    "patchname9",
    "patchname10",
    "patchname11",
    "patchname12",
    "velocityswitch",
    "reverbtype",
    "reverblevel",
    "reverbtime",
    "reverbfeedback",
    "chorustype",
    "choruslevel",
    "chorusdepth",
    "chorusrate",
    "chorusfeedback",
    "chorusoutput",
    "analogfeel",
    "patchlevel",
    "patchpanning",
    "patchpan",
    "bendrangedown",
    "bendrangeup",
    "keyassign",
    "sololegato",
    "portamentoswitch",
    "portamentomode",
    "portamentotype",
    "portamentotime",
];

pub const TONE_PARAMS: &[&str] = &[
    "wavegroup",
    "wavenumber",
    RESERVED,
    "toneswitch",
    "fxmswitch",
    "fxmdepth",
    "velocityrangelower",
    "velocityrangeupper",
    "volumeswitch",
    "hold1switch",
    "modulationdestination1",
    "modulationsense1",
    "modulationdestination2",
    "modulationsense2",
    "modulationdestination3",
    "modulationsense3",
    "modulationdestination4",
    "modulationsense4",
    "aftertouchdestination1",
    "aftertouchsense1",
    "aftertouchdestination2",
    "aftertouchsense2",
    "aftertouchdestination3",
    "aftertouchsense3",
    "aftertouchdestination4",
    "aftertouchsense4",
    "expressiondestination1",
    "expressionsense1",
    "expressiondestination2",
    "expressionsense2",
    "expressiondestination3",
    "expressionsense3",
    "expressiondestination4",
    "expressionsense4",
    "lfo1form",
    "lfo1offset",
    "lfo1synchro",
    "lfo1rate",
    "lfo1delay",
    RESERVED,
    "lfo1fadepolarity",
    "lfo1fadetime",
    "lfo1pitchdepth",
    "lfo1tvfdepth",
    "lfo1tvadepth",
    "lfo2form",
    "lfo2offset",
    "lfo2synchro",
    "lfo2rate",
    "lfo2delay",
    RESERVED,
    "lfo2fadepolarity",
    "lfo2fadetime",
    "lfo2pitchdepth",
    "lfo2tvfdepth",
    "lfo2tvadepth",
    "pitchcoarse",
    "pitchfine",
    "randompitchdepth",
    "pitchkeyfollow",
    "penvvelocitylevelsense",
    "penvvelocityontimesense",
    "penvvelocityofftimesense",
    "penvtimekeyfollow",
    "penvdepth",
    "penvtime1",
    "penvlevel1",
    "penvtime2",
    "penvlevel2",
    "penvtime3",
    "penvlevel3",
    "penvtime4",
    "penvlevel4",
    "filtermode",
    "cutofffrequency",
    "resonance",
    "resonancemode",
    "cutoffkeyfollow",
    "tvfenvvelocitycurve",
    "tvfenvvelocitylevelsense",
    "tvfenvvelocityontimesense",
    "tvfenvvelocityofftimesense",
    "tvfenvtimekeyfollow",
    "tvfenvdepth",
    "tvfenvtime1",
    "tvfenvlevel1",
    "tvfenvtime2",
    "tvfenvlevel2",
    "tvfenvtime3",
    "tvfenvlevel3",
    "tvfenvtime4",
    "tvfenvlevel4",
    "level",
    "levelkeyfollow",
    "pan",
    RESERVED,
    "panningkeyfollow",
    "tonedelaymode",
    "tonedelaytime",
    RESERVED,
    "tvaenvvelocitycurve",
    "tvaenvvelocitylevelsense",
    "tvaenvvelocityontimesense",
    "tvaenvvelocityofftimesense",
    "tvaenvtimekeyfollow",
    "tvaenvtime1",
    "tvaenvlevel1",
    "tvaenvtime2",
    "tvaenvlevel2",
    "tvaenvtime3",
    "tvaenvlevel3",
    "tvaenvtime4",
    "drylevel",
    "reverbsendlevel",
    "chorussendlevel",
    "outputselect",
];

pub const PERFORMANCE_COMMON_PARAMS: &[&str] = &[
    "performancename1",
    "performancename2",
    "performancename3",
    "performancename4",
    "performancename5",
    "performancename6",
    "performancename7",
    "performancename8",
    "performancename9",
    "performancename10",
    "performancename11",
    "performancename12",
    "keymode",
    "reverbtype",
    "reverblevel",
    "reverbtime",
    "reverbfeedback",
    "chorustype",
    "choruslevel",
    "chorusdepth",
    "chorusrate",
    "chorusfeedback",
    "chorusoutput",
    "voicereserve1",
    "voicereserve2",
    "voicereserve3",
    "voicereserve4",
    "voicereserve5",
    "voicereserve6",
    "voicereserve7",
    "voicereserve8",
];

pub const PART_PARAMS: &[&str] = &[
    "transmitswitch",
    "transmitchannel",
    "transmitprogramchange",
    RESERVED,
    "transmitvolume",
    RESERVED,
    "transmitpan",
    RESERVED,
    "transmitkeyrangelower",
    "transmitkeyrangeupper",
    "transmitkeytranspose",
    "transmitvelocitysense",
    "transmitvelocitymax",
    "transmitvelocitycurve",
    "internalswitch",
    "internalkeyrangelower",
    "internalkeyrangeupper",
    "internalkeytranspose",
    "internalvelocitysense",
    "internalvelocitymax",
    "internalvelocitycurve",
    "receiveswitch",
    "receivechannel",
    "patchnumber",
    RESERVED,
    "partlevel",
    "partpan",
    "partcoarsetune",
    "partfinetune",
    "reverbswitch",
    "chorusswitch",
    "receiveprogramchange",
    "receivevolume",
    "receivehold1",
    "outputselect",
];

pub const DRUM_PARAMS: &[&str] = &[
    "wavegroup",
    "wavenumber",
    RESERVED,
    "toneswitch",
    "coarsetune",
    "mutegroup",
    "envelopemode",
    "pitchfine",
    "randompitchdepth",
    "pitchbendrange",
    "penvvelocitylevelsense",
    "penvvelocitytimesense",
    "penvdepth",
    "penvtime1",
    "penvlevel1",
    "penvtime2",
    "penvlevel2",
    "penvtime3",
    "penvlevel3",
    "penvtime4",
    "penvlevel4",
    "filtermode",
    "cutoff",
    "resonance",
    "resonancemode",
    "tvfenvvelocitylevelsense",
    "tvfenvvelocitytimesense",
    "tvfenvdepth",
    "tvfenvtime1",
    "tvfenvlevel1",
    "tvfenvtime2",
    "tvfenvlevel2",
    "tvfenvtime3",
    "tvfenvlevel3",
    "tvfenvtime4",
    "tvfenvlevel4",
    "level",
    "pan",
    RESERVED,
    "tvaenvvelocitylevelsense",
    "tvaenvvelocitytimesense",
    "tvaenvtime1",
    "tvaenvlevel1",
    "tvaenvtime2",
    "tvaenvlevel2",
    "tvaenvtime3",
    "tvaenvlevel3",
    "tvaenvtime4",
    "drylevel",
    "reverbsendlevel",
    "chorussendlevel",
    "outputselect",
];
