//! Beat events and per-run beat counting

/// One metronome tick, classified by its position in the measure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Beat {
    /// First beat of a measure (accented)
    First,
    Regular,
}

impl Beat {
    /// Cue identifier an audio back end keys its samples on
    pub fn cue_name(&self) -> &'static str {
        match self {
            Beat::First => "first",
            Beat::Regular => "regular",
        }
    }
}

/// Alternating classification of beats, independent of measure position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BeatParity {
    Even,
    Odd,
}

impl BeatParity {
    pub fn of(total_beats: u64) -> Self {
        if total_beats % 2 == 0 {
            BeatParity::Even
        } else {
            BeatParity::Odd
        }
    }
}

/// Position of the metronome face (pendulum image)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Face {
    Left,
    Right,
    /// At rest, shown while stopped
    #[default]
    Center,
}

impl From<BeatParity> for Face {
    fn from(parity: BeatParity) -> Self {
        match parity {
            BeatParity::Even => Face::Left,
            BeatParity::Odd => Face::Right,
        }
    }
}

/// Running counters for one timer run.
///
/// Both counters conceptually start at -1 so the first tick of a run lands on
/// index 0 (a [`Beat::First`]) with an even total.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BeatCounter {
    index: Option<u32>,
    total: Option<u64>,
}

impl BeatCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance by one tick within a measure of `numerator` beats.
    ///
    /// The numerator is sampled per tick, so a meter change mid-run wraps the
    /// existing index instead of restarting the measure.
    pub fn advance(&mut self, numerator: u32) -> (Beat, BeatParity) {
        let numerator = numerator.max(1);
        let index = self.index.map_or(0, |i| (i + 1) % numerator);
        let total = self.total.map_or(0, |t| t + 1);
        self.index = Some(index);
        self.total = Some(total);

        let beat = if index == 0 { Beat::First } else { Beat::Regular };
        (beat, BeatParity::of(total))
    }

    /// Index of the last emitted beat within its measure
    pub fn index(&self) -> Option<u32> {
        self.index
    }

    /// Number of beats emitted this run
    pub fn total_beats(&self) -> u64 {
        self.total.map_or(0, |t| t + 1)
    }
}
