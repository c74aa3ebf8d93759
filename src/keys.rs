#[repr(transparent)]
#[derive(Copy, Clone, Debug, Eq, Hash, PartialEq, PartialOrd)]
pub struct KeyId(pub u8); // 1..=14, left to right across two octaves

#[repr(transparent)]
#[derive(Copy, Clone, Debug, Eq, Hash, PartialEq, PartialOrd)]
pub struct MidiNote(pub u8);

#[derive(Copy, Clone, Debug, Eq, Hash, PartialEq)]
pub enum KeyColor {
    White,
    Black,
}

/// One of the 24 fixed pitch samples: 14 naturals and 10 accidentals across
/// two octaves. The four semitone positions with no accidental (after E and B
/// in each octave) have no variant, matching the keyboard's gap pattern.
#[derive(Copy, Clone, Debug, Eq, Hash, PartialEq)]
pub enum SampleId {
    C2,
    Db2,
    D2,
    Eb2,
    E2,
    F2,
    Gb2,
    G2,
    Ab2,
    A2,
    Bb2,
    B2,
    C3,
    Db3,
    D3,
    Eb3,
    E3,
    F3,
    Gb3,
    G3,
    Ab3,
    A3,
    Bb3,
    B3,
}

pub const NUM_WHITE_KEYS: usize = 14;
pub const NUM_BLACK_KEYS: usize = 10;

/// Sample for white key id i+1 (0-based index i).
pub const WHITE_SAMPLES: [SampleId; NUM_WHITE_KEYS] = [
    SampleId::C2,
    SampleId::D2,
    SampleId::E2,
    SampleId::F2,
    SampleId::G2,
    SampleId::A2,
    SampleId::B2,
    SampleId::C3,
    SampleId::D3,
    SampleId::E3,
    SampleId::F3,
    SampleId::G3,
    SampleId::A3,
    SampleId::B3,
];

/// Black keys by id and sample. The black key with id k straddles the
/// boundary between white keys k-1 and k; ids 4, 8 and 11 are absent (no
/// accidental after E2, B2 and E3).
pub const BLACK_SAMPLES: [(u8, SampleId); NUM_BLACK_KEYS] = [
    (2, SampleId::Db2),
    (3, SampleId::Eb2),
    (5, SampleId::Gb2),
    (6, SampleId::Ab2),
    (7, SampleId::Bb2),
    (9, SampleId::Db3),
    (10, SampleId::Eb3),
    (12, SampleId::Gb3),
    (13, SampleId::Ab3),
    (14, SampleId::Bb3),
];

/// Direct (color, key id) -> sample lookup. Total over exactly the keys the
/// layout can construct; anything else is None, never a fallthrough.
pub fn sample_for(color: KeyColor, id: KeyId) -> Option<SampleId> {
    match color {
        KeyColor::White => {
            let i = id.0.checked_sub(1)? as usize;
            WHITE_SAMPLES.get(i).copied()
        }
        KeyColor::Black => BLACK_SAMPLES
            .iter()
            .find(|(k, _)| *k == id.0)
            .map(|(_, s)| *s),
    }
}

const MIDI_BASE: u8 = 48; // MIDI note 48 = the low C of the keyboard

impl SampleId {
    /// Semitone offset from the keyboard's low C (0..=23).
    pub fn semitone(self) -> u8 {
        match self {
            SampleId::C2 => 0,
            SampleId::Db2 => 1,
            SampleId::D2 => 2,
            SampleId::Eb2 => 3,
            SampleId::E2 => 4,
            SampleId::F2 => 5,
            SampleId::Gb2 => 6,
            SampleId::G2 => 7,
            SampleId::Ab2 => 8,
            SampleId::A2 => 9,
            SampleId::Bb2 => 10,
            SampleId::B2 => 11,
            SampleId::C3 => 12,
            SampleId::Db3 => 13,
            SampleId::D3 => 14,
            SampleId::Eb3 => 15,
            SampleId::E3 => 16,
            SampleId::F3 => 17,
            SampleId::Gb3 => 18,
            SampleId::G3 => 19,
            SampleId::Ab3 => 20,
            SampleId::A3 => 21,
            SampleId::Bb3 => 22,
            SampleId::B3 => 23,
        }
    }

    pub fn midi_note(self) -> MidiNote {
        MidiNote(MIDI_BASE + self.semitone())
    }

    pub fn name(self) -> &'static str {
        match self {
            SampleId::C2 => "C2",
            SampleId::Db2 => "Db2",
            SampleId::D2 => "D2",
            SampleId::Eb2 => "Eb2",
            SampleId::E2 => "E2",
            SampleId::F2 => "F2",
            SampleId::Gb2 => "Gb2",
            SampleId::G2 => "G2",
            SampleId::Ab2 => "Ab2",
            SampleId::A2 => "A2",
            SampleId::Bb2 => "Bb2",
            SampleId::B2 => "B2",
            SampleId::C3 => "C3",
            SampleId::Db3 => "Db3",
            SampleId::D3 => "D3",
            SampleId::Eb3 => "Eb3",
            SampleId::E3 => "E3",
            SampleId::F3 => "F3",
            SampleId::Gb3 => "Gb3",
            SampleId::G3 => "G3",
            SampleId::Ab3 => "Ab3",
            SampleId::A3 => "A3",
            SampleId::Bb3 => "Bb3",
            SampleId::B3 => "B3",
        }
    }
}

/// Bitmask over key ids 1..=14. One per key color.
#[repr(transparent)]
#[derive(Clone, Copy, Eq, PartialEq)]
pub struct KeySet(pub u16);

impl KeySet {
    pub const EMPTY: KeySet = KeySet(0);

    pub fn contains(&self, id: KeyId) -> bool {
        self.0 & (1 << id.0) != 0
    }

    pub fn insert(&mut self, id: KeyId) {
        self.0 |= 1 << id.0;
    }

    pub fn remove(&mut self, id: KeyId) {
        self.0 &= !(1 << id.0);
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub fn len(&self) -> usize {
        self.0.count_ones() as usize
    }
}

impl std::fmt::Debug for KeySet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "KeySet({:015b})", self.0)
    }
}
