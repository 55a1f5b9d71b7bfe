use super::card::Card;

/// An unordered set of cards as a 52-bit mask.
///
/// Bit i set means `Card::from(i as u8)` is present. Set algebra over
/// hands is how the evaluator and equity enumeration stay cheap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Hand(u64);

/// All 52 bits set.
const MASK: u64 = (1 << 52) - 1;

impl Hand {
    pub const fn empty() -> Self {
        Self(0)
    }
    /// The full 52-card universe.
    pub const fn mask() -> Self {
        Self(MASK)
    }
    pub fn size(&self) -> usize {
        self.0.count_ones() as usize
    }
    pub fn contains(&self, card: &Card) -> bool {
        self.0 & u64::from(*card) != 0
    }
    pub fn add(&mut self, card: Card) {
        self.0 |= u64::from(card);
    }
    pub fn remove(&mut self, card: Card) {
        self.0 &= !u64::from(card);
    }
    /// Set union.
    pub fn or(a: Self, b: Self) -> Self {
        Self(a.0 | b.0)
    }
    /// The cards not in this hand.
    pub fn complement(&self) -> Self {
        Self(!self.0 & MASK)
    }
}

impl From<Hand> for u64 {
    fn from(hand: Hand) -> Self {
        hand.0
    }
}
impl From<u64> for Hand {
    fn from(bits: u64) -> Self {
        Self(bits & MASK)
    }
}
impl From<Card> for Hand {
    fn from(card: Card) -> Self {
        Self(u64::from(card))
    }
}
impl FromIterator<Card> for Hand {
    fn from_iter<T: IntoIterator<Item = Card>>(iter: T) -> Self {
        iter.into_iter().fold(Self::empty(), |mut hand, card| {
            hand.add(card);
            hand
        })
    }
}
impl From<Hand> for Vec<Card> {
    fn from(hand: Hand) -> Self {
        hand.into_iter().collect()
    }
}

impl Iterator for Hand {
    type Item = Card;
    fn next(&mut self) -> Option<Self::Item> {
        match self.0 {
            0 => None,
            bits => {
                let card = Card::from(bits.trailing_zeros() as u8);
                self.remove(card);
                Some(card)
            }
        }
    }
}

impl std::fmt::Display for Hand {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        for card in *self {
            write!(f, "{} ", card)?;
        }
        Ok(())
    }
}
