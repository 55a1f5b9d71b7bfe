use super::rank::Rank;

/// A poker hand's category and defining ranks.
///
/// Ordered by hand category; kicker cards break ties within a category.
#[derive(Debug, Clone, Copy, Eq, PartialEq, PartialOrd, Ord)]
pub enum Ranking {
    HighCard(Rank),        // 4 kickers
    OnePair(Rank),         // 3 kickers
    TwoPair(Rank, Rank),   // 1 kicker
    ThreeOAK(Rank),        // 2 kickers
    Straight(Rank),        // 0 kickers
    Flush(Rank),           // 4 kickers
    FullHouse(Rank, Rank), // 0 kickers
    FourOAK(Rank),         // 1 kicker
    StraightFlush(Rank),   // 0 kickers
    MAX,                   // useful for showdown implementation
}

impl Ranking {
    /// Category strength 1 (high card) through 9 (straight flush).
    pub fn class(&self) -> u8 {
        match self {
            Ranking::HighCard(_) => 1,
            Ranking::OnePair(_) => 2,
            Ranking::TwoPair(_, _) => 3,
            Ranking::ThreeOAK(_) => 4,
            Ranking::Straight(_) => 5,
            Ranking::Flush(_) => 6,
            Ranking::FullHouse(_, _) => 7,
            Ranking::FourOAK(_) => 8,
            Ranking::StraightFlush(_) => 9,
            Ranking::MAX => unreachable!(),
        }
    }
    pub fn n_kickers(&self) -> usize {
        match self {
            Ranking::HighCard(_) | Ranking::Flush(_) => 4,
            Ranking::OnePair(_) => 3,
            Ranking::ThreeOAK(_) => 2,
            Ranking::FourOAK(_) | Ranking::TwoPair(_, _) => 1,
            _ => 0,
        }
    }
}

impl std::fmt::Display for Ranking {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Ranking::MAX => unreachable!(),
            Ranking::HighCard(r) => write!(f, "{} High", r),
            Ranking::OnePair(r) => write!(f, "Pair of {}s", r),
            Ranking::TwoPair(hi, lo) => write!(f, "Two Pair, {}s and {}s", hi, lo),
            Ranking::ThreeOAK(r) => write!(f, "Three of a Kind, {}s", r),
            Ranking::Straight(r) => write!(f, "Straight to the {}", r),
            Ranking::Flush(r) => write!(f, "Flush, {} High", r),
            Ranking::FullHouse(t, p) => write!(f, "Full House, {}s over {}s", t, p),
            Ranking::FourOAK(r) => write!(f, "Four of a Kind, {}s", r),
            Ranking::StraightFlush(r) => write!(f, "Straight Flush to the {}", r),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    #[test]
    fn category_total_order() {
        let ladder = [
            Ranking::HighCard(Rank::Ace),
            Ranking::OnePair(Rank::Two),
            Ranking::TwoPair(Rank::Three, Rank::Two),
            Ranking::ThreeOAK(Rank::Two),
            Ranking::Straight(Rank::Six),
            Ranking::Flush(Rank::Seven),
            Ranking::FullHouse(Rank::Two, Rank::Three),
            Ranking::FourOAK(Rank::Two),
            Ranking::StraightFlush(Rank::Five),
        ];
        for pair in ladder.windows(2) {
            assert!(pair[0] < pair[1]);
        }
        for (i, ranking) in ladder.iter().enumerate() {
            assert_eq!(ranking.class() as usize, i + 1);
        }
    }
    #[test]
    fn within_category_by_rank() {
        assert!(Ranking::OnePair(Rank::King) < Ranking::OnePair(Rank::Ace));
        assert!(
            Ranking::TwoPair(Rank::King, Rank::Queen) < Ranking::TwoPair(Rank::Ace, Rank::Two)
        );
        assert!(Ranking::Straight(Rank::Five) < Ranking::Straight(Rank::Six));
    }
}
