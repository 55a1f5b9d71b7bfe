use super::board::Board;
use super::evaluator::Evaluator;
use super::hand::Hand;
use super::hole::Hole;
use super::kicks::Kickers;
use super::ranking::Ranking;

/// A hand's strength: category plus kickers, totally ordered.
///
/// Construct from an exact five-card [`Hand`], or through [`Strength::omaha`]
/// which searches all legal hole/board combinations.
#[derive(Debug, Clone, Copy, Eq, PartialEq, PartialOrd, Ord)]
pub struct Strength {
    value: Ranking,
    kicks: Kickers,
}

impl From<Hand> for Strength {
    fn from(hand: Hand) -> Self {
        Self::from(Evaluator::from(hand))
    }
}

impl From<Evaluator> for Strength {
    fn from(e: Evaluator) -> Self {
        let value = e.find_ranking();
        let kicks = e.find_kickers(value);
        Self::from((value, kicks))
    }
}

impl From<(Ranking, Kickers)> for Strength {
    fn from((value, kicks): (Ranking, Kickers)) -> Self {
        Self { value, kicks }
    }
}

impl Strength {
    /// Best Omaha hand: exactly two hole cards with exactly three board
    /// cards, maximized over all C(4,2) x C(n,3) combinations.
    ///
    /// The board must show at least a flop.
    pub fn omaha(hole: &Hole, board: &Board) -> Self {
        debug_assert!(board.size() >= 3);
        hole.pairs()
            .flat_map(|(a, b)| {
                board.triples().into_iter().map(move |trio| {
                    trio.iter()
                        .copied()
                        .chain([a, b])
                        .collect::<Hand>()
                })
            })
            .map(Strength::from)
            .max()
            .expect("non-empty combination set")
    }
    pub fn ranking(&self) -> Ranking {
        self.value
    }
    pub fn kickers(&self) -> Kickers {
        self.kicks
    }
}

impl std::fmt::Display for Strength {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rank::Rank;

    fn hole(s: &str) -> Hole {
        Hole::try_from(s).unwrap()
    }
    fn board(s: &str) -> Board {
        Board::try_from(s).unwrap()
    }

    #[test]
    fn flush_beats_trips_on_same_board() {
        let b = board("2h 5h 9h Kc 3d");
        let flush = Strength::omaha(&hole("Ah Th Jc Qc"), &b);
        let trips = Strength::omaha(&hole("Kd Ks 4c 6c"), &b);
        assert_eq!(flush.ranking(), Ranking::Flush(Rank::Ace));
        assert_eq!(trips.ranking(), Ranking::ThreeOAK(Rank::King));
        assert!(flush > trips);
    }

    #[test]
    fn aces_chop_on_dry_board() {
        let b = board("2h 5d 9c Kh 3s");
        let a = Strength::omaha(&hole("Ac Ad 7h 8h"), &b);
        let c = Strength::omaha(&hole("Ah As 7c 8c"), &b);
        assert_eq!(a, c);
        assert_eq!(a.ranking(), Ranking::OnePair(Rank::Ace));
    }

    /// Exactly two hole cards must play: a board straight does not play
    /// on its own, so 98xx holes all make the queen-high straight.
    #[test]
    fn broadway_board_caps_at_queen_high() {
        let b = board("Ah Kd Qc Js Th");
        let p0 = Strength::omaha(&hole("9h 8h 2c 3c"), &b);
        let p1 = Strength::omaha(&hole("9d 8d 4c 5c"), &b);
        let p2 = Strength::omaha(&hole("9c 8c 6d 7d"), &b);
        assert_eq!(p0.ranking(), Ranking::Straight(Rank::Queen));
        assert_eq!(p0, p1);
        assert_eq!(p1, p2);
    }

    /// Four hearts in the hole with one on the board is no flush:
    /// only two hole cards may play.
    #[test]
    fn no_flush_with_one_board_heart() {
        let b = board("Kh 9c 4d 2s 7c");
        let s = Strength::omaha(&hole("Ah Th 5h 3h"), &b);
        assert!(s.ranking() < Ranking::Flush(Rank::Two));
    }

    #[test]
    fn permutation_invariant() {
        let b1 = board("2h 5h 9h Kc 3d");
        let b2 = board("3d Kc 9h 5h 2h");
        let h1 = hole("Ah Th Jc Qc");
        let h2 = hole("Qc Jc Th Ah");
        assert_eq!(Strength::omaha(&h1, &b1), Strength::omaha(&h2, &b2));
    }

    #[test]
    fn comparator_is_total_on_distinct_hands() {
        let b = board("2h 5h 9h Kc 3d");
        let hands = [
            Strength::omaha(&hole("Ah Th Jc Qc"), &b),
            Strength::omaha(&hole("Kd Ks 4c 6c"), &b),
            Strength::omaha(&hole("7c 8d 2c 2d"), &b),
        ];
        for a in &hands {
            assert!(a <= a);
            for b in &hands {
                assert!(a <= b || b <= a);
            }
        }
    }

    #[test]
    fn omaha_on_flop_only() {
        let b = board("Ah Kh Qh");
        let s = Strength::omaha(&hole("Jh Th 2c 3c"), &b);
        assert_eq!(s.ranking(), Ranking::StraightFlush(Rank::Ace));
    }
}
