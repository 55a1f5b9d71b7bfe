/// Positional label around the table, assigned clockwise from the button
/// at each hand start.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Spot {
    Button,
    SmallBlind,
    BigBlind,
    UnderTheGun,
    Hijack,
    Cutoff,
}

impl Spot {
    /// Label for the i'th live seat clockwise from the button at an
    /// n-handed table. Heads-up the button is also the small blind.
    pub fn ring(i: usize, n: usize) -> Self {
        debug_assert!(n >= 2 && i < n);
        match (n, i) {
            (2, 0) => Self::Button,
            (2, 1) => Self::BigBlind,
            (_, 0) => Self::Button,
            (_, 1) => Self::SmallBlind,
            (_, 2) => Self::BigBlind,
            (_, 3) => Self::UnderTheGun,
            (_, 4) => Self::Hijack,
            (_, 5) => Self::Cutoff,
            _ => unreachable!("six-max table"),
        }
    }
    /// Later position acts later postflop and gets a wider playbook.
    pub fn is_late(&self) -> bool {
        matches!(self, Self::Button | Self::Cutoff)
    }
}

impl std::fmt::Display for Spot {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::Button => write!(f, "BTN"),
            Self::SmallBlind => write!(f, "SB"),
            Self::BigBlind => write!(f, "BB"),
            Self::UnderTheGun => write!(f, "UTG"),
            Self::Hijack => write!(f, "HJ"),
            Self::Cutoff => write!(f, "CO"),
        }
    }
}
