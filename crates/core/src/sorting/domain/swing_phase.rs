use std::fmt;

/// One of the eight canonical golf swing stages, in swing order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SwingPhase {
    Address,
    ToeUp,
    MidBackswing,
    Top,
    MidDownswing,
    Impact,
    MidFollowThrough,
    Finish,
}

impl SwingPhase {
    pub const ALL: [SwingPhase; 8] = [
        SwingPhase::Address,
        SwingPhase::ToeUp,
        SwingPhase::MidBackswing,
        SwingPhase::Top,
        SwingPhase::MidDownswing,
        SwingPhase::Impact,
        SwingPhase::MidFollowThrough,
        SwingPhase::Finish,
    ];

    pub const COUNT: usize = Self::ALL.len();

    /// Phase at position `index` of a frame sequence sorted by frame number.
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    pub fn index(self) -> usize {
        self as usize
    }

    /// Name of the category directory, e.g. `"3.Top"`.
    pub fn dir_name(self) -> &'static str {
        match self {
            SwingPhase::Address => "0.Address",
            SwingPhase::ToeUp => "1.Toe-up",
            SwingPhase::MidBackswing => "2.Mid-backswing",
            SwingPhase::Top => "3.Top",
            SwingPhase::MidDownswing => "4.Mid-downswing",
            SwingPhase::Impact => "5.Impact",
            SwingPhase::MidFollowThrough => "6.Mid-follow-through",
            SwingPhase::Finish => "7.Finish",
        }
    }
}

impl fmt::Display for SwingPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.dir_name())
    }
}
