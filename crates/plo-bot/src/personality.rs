/// Tunable decision weights for a bot seat.
///
/// All factors are multipliers around 1.0; the decision function owns the
/// base rates. Personalities are plain values so tables can seat bots
/// without any dynamic dispatch.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Personality {
    /// Scales bet/raise frequency and sizing.
    pub aggression: f64,
    /// Scales how wide the bot calls and defends.
    pub looseness: f64,
    /// Base probability of betting with nothing when checked to.
    pub bluff: f64,
}

impl Default for Personality {
    fn default() -> Self {
        Self::from(Style::Balanced)
    }
}

/// Registry of built-in personalities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Style {
    Balanced,
    Rock,
    Station,
    Maniac,
}

impl From<Style> for Personality {
    fn from(style: Style) -> Self {
        match style {
            Style::Balanced => Personality {
                aggression: 1.0,
                looseness: 1.0,
                bluff: 0.25,
            },
            Style::Rock => Personality {
                aggression: 0.7,
                looseness: 0.6,
                bluff: 0.05,
            },
            Style::Station => Personality {
                aggression: 0.6,
                looseness: 1.5,
                bluff: 0.10,
            },
            Style::Maniac => Personality {
                aggression: 1.6,
                looseness: 1.4,
                bluff: 0.45,
            },
        }
    }
}
