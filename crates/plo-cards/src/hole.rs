use super::card::Card;
use super::hand::Hand;

/// Four hole cards, as dealt in Omaha.
///
/// Exactly two of these combine with exactly three board cards at showdown;
/// the evaluator enforces that rule, this type only carries the cards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Hole([Card; 4]);

impl Hole {
    pub fn cards(&self) -> &[Card; 4] {
        &self.0
    }
    /// All C(4,2) = 6 two-card combinations.
    pub fn pairs(&self) -> impl Iterator<Item = (Card, Card)> + '_ {
        const PAIRS: [(usize, usize); 6] = [(0, 1), (0, 2), (0, 3), (1, 2), (1, 3), (2, 3)];
        PAIRS.iter().map(|&(i, j)| (self.0[i], self.0[j]))
    }
}

impl From<[Card; 4]> for Hole {
    fn from(cards: [Card; 4]) -> Self {
        Self(cards)
    }
}
impl From<Hole> for Hand {
    fn from(hole: Hole) -> Self {
        hole.0.iter().copied().collect()
    }
}

impl TryFrom<&str> for Hole {
    type Error = anyhow::Error;
    /// Parses space-separated cards, e.g. "Ah Th Jc Qc".
    fn try_from(s: &str) -> Result<Self, Self::Error> {
        let cards = s
            .split_whitespace()
            .map(Card::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        let cards: [Card; 4] = cards
            .try_into()
            .map_err(|_| anyhow::anyhow!("omaha hole takes exactly 4 cards: {}", s))?;
        anyhow::ensure!(
            Hand::from_iter(cards.iter().copied()).size() == 4,
            "duplicate cards in {}",
            s
        );
        Ok(Self(cards))
    }
}

impl std::fmt::Display for Hole {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{} {} {} {}", self.0[0], self.0[1], self.0[2], self.0[3])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    #[test]
    fn six_pairs() {
        let hole = Hole::try_from("Ah Th Jc Qc").unwrap();
        assert_eq!(hole.pairs().count(), 6);
    }
    #[test]
    fn rejects_duplicates_and_wrong_counts() {
        assert!(Hole::try_from("Ah Ah Jc Qc").is_err());
        assert!(Hole::try_from("Ah Th Jc").is_err());
        assert!(Hole::try_from("Ah Th Jc Qc Kc").is_err());
    }
}
