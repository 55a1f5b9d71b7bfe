use plo_core::Chips;
use plo_core::Position;
use plo_core::RAKE_CAP_BBS;
use plo_core::RAKE_PERCENT;

/// One tier of the pot, eligible only to seats that matched its level.
///
/// Tiers partition the total pot exactly: folded players' chips flow into
/// the tiers they contributed to without granting them eligibility.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pot {
    amount: Chips,
    eligible: Vec<Position>,
}

impl Pot {
    pub fn new(amount: Chips, eligible: Vec<Position>) -> Self {
        debug_assert!(!eligible.is_empty());
        Self { amount, eligible }
    }
    pub fn amount(&self) -> Chips {
        self.amount
    }
    pub fn eligible(&self) -> &[Position] {
        &self.eligible
    }
    /// A single eligible seat collects without a showdown comparison.
    pub fn is_uncontested(&self) -> bool {
        self.eligible.len() == 1
    }
}

impl std::fmt::Display for Pot {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{} [", self.amount)?;
        for p in &self.eligible {
            write!(f, "P{} ", p)?;
        }
        write!(f, "]")
    }
}

/// House take on contested showdowns.
///
/// Charged per contested pot, only when a flop was dealt, capped across
/// the whole hand. Fold-wins and uncontested side pots are never raked.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rake {
    percent: f64,
    cap_bbs: Chips,
}

impl Default for Rake {
    fn default() -> Self {
        Self {
            percent: RAKE_PERCENT,
            cap_bbs: RAKE_CAP_BBS,
        }
    }
}

impl Rake {
    /// No rake, for tests and play-money tables.
    pub fn none() -> Self {
        Self {
            percent: 0.0,
            cap_bbs: 0,
        }
    }
    pub fn percent(&self) -> f64 {
        self.percent
    }
    /// Hand-level rake ceiling at the given big blind.
    pub fn cap(&self, bblind: Chips) -> Chips {
        self.cap_bbs * bblind
    }
    /// Rake owed on one contested pot, bounded by the remaining cap.
    pub fn take(&self, pot: Chips, cap_left: Chips) -> Chips {
        cap_left.min((pot as f64 * self.percent).floor() as Chips)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    #[test]
    fn rake_respects_cap() {
        let rake = Rake::default();
        let cap = rake.cap(3);
        assert_eq!(cap, 9);
        assert_eq!(rake.take(1000, cap), 9);
        assert_eq!(rake.take(100, cap), 5);
        assert_eq!(rake.take(100, 2), 2);
        assert_eq!(Rake::none().take(1000, 0), 0);
    }
    #[test]
    fn uncontested_pot() {
        let pot = Pot::new(30, vec![2]);
        assert!(pot.is_uncontested());
        assert!(!Pot::new(90, vec![0, 1, 2]).is_uncontested());
    }
}
