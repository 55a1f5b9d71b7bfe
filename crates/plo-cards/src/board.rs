use super::card::Card;
use super::hand::Hand;
use super::street::Street;

/// Community cards, zero through five.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Board {
    cards: Vec<Card>,
}

impl Board {
    pub fn empty() -> Self {
        Self { cards: Vec::new() }
    }
    pub fn cards(&self) -> &[Card] {
        &self.cards
    }
    pub fn size(&self) -> usize {
        self.cards.len()
    }
    /// Street implied by the number of dealt cards.
    pub fn street(&self) -> Street {
        Street::from(self.cards.len())
    }
    pub fn add(&mut self, card: Card) {
        debug_assert!(self.cards.len() < 5);
        debug_assert!(!self.cards.contains(&card));
        self.cards.push(card);
    }
    pub fn clear(&mut self) {
        self.cards.clear();
    }
    /// All C(n,3) three-card combinations of the dealt board.
    pub fn triples(&self) -> Vec<[Card; 3]> {
        let n = self.cards.len();
        let mut out = Vec::new();
        for i in 0..n {
            for j in i + 1..n {
                for k in j + 1..n {
                    out.push([self.cards[i], self.cards[j], self.cards[k]]);
                }
            }
        }
        out
    }
}

impl From<&Board> for Hand {
    fn from(board: &Board) -> Self {
        board.cards.iter().copied().collect()
    }
}

impl TryFrom<&str> for Board {
    type Error = anyhow::Error;
    /// Parses space-separated cards, e.g. "2h 5h 9h Kc 3d".
    fn try_from(s: &str) -> Result<Self, Self::Error> {
        let cards = s
            .split_whitespace()
            .map(Card::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        anyhow::ensure!(
            matches!(cards.len(), 0 | 3 | 4 | 5),
            "invalid board size {}",
            cards.len()
        );
        Ok(Self { cards })
    }
}

impl std::fmt::Display for Board {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        for card in &self.cards {
            write!(f, "{} ", card)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    #[test]
    fn street_tracks_size() {
        let mut board = Board::empty();
        assert_eq!(board.street(), Street::Pref);
        for s in ["2h", "5h", "9h"] {
            board.add(Card::try_from(s).unwrap());
        }
        assert_eq!(board.street(), Street::Flop);
        board.add(Card::try_from("Kc").unwrap());
        assert_eq!(board.street(), Street::Turn);
        board.add(Card::try_from("3d").unwrap());
        assert_eq!(board.street(), Street::Rive);
        assert_eq!(board.triples().len(), 10);
    }
}
