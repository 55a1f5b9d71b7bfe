use plo_cards::Street;
use plo_core::Chips;
use plo_core::Position;

/// A betting decision, carrying the chips moved by this action.
///
/// Bet and Raise amounts are the additional chips pushed, not the level
/// being raised to. Blind is engine-generated during hand setup and is
/// never accepted from a client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Blind(Chips),
    Fold,
    Check,
    Call(Chips),
    Bet(Chips),
    Raise(Chips),
    Shove(Chips),
}

impl Action {
    /// Chips moved by this action.
    pub fn amount(&self) -> Chips {
        match self {
            Action::Fold | Action::Check => 0,
            Action::Blind(x)
            | Action::Call(x)
            | Action::Bet(x)
            | Action::Raise(x)
            | Action::Shove(x) => *x,
        }
    }
    /// Wire name of the action kind.
    pub fn kind(&self) -> &'static str {
        match self {
            Action::Blind(_) => "blind",
            Action::Fold => "fold",
            Action::Check => "check",
            Action::Call(_) => "call",
            Action::Bet(_) => "bet",
            Action::Raise(_) => "raise",
            Action::Shove(_) => "allin",
        }
    }
    /// True for decisions a player can submit (everything but blinds).
    pub fn is_choice(&self) -> bool {
        !matches!(self, Action::Blind(_))
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Action::Fold => write!(f, "fold"),
            Action::Check => write!(f, "check"),
            Action::Blind(x) => write!(f, "blind {}", x),
            Action::Call(x) => write!(f, "call {}", x),
            Action::Bet(x) => write!(f, "bet {}", x),
            Action::Raise(x) => write!(f, "raise {}", x),
            Action::Shove(x) => write!(f, "allin {}", x),
        }
    }
}

/// One entry of a hand's ordered history.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Play {
    pub seat: Position,
    pub action: Action,
    pub street: Street,
}

impl std::fmt::Display for Play {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "P{} {} ({})", self.seat, self.action, self.street)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    #[test]
    fn amounts_and_kinds() {
        assert_eq!(Action::Fold.amount(), 0);
        assert_eq!(Action::Raise(30).amount(), 30);
        assert_eq!(Action::Shove(99).kind(), "allin");
        assert!(!Action::Blind(1).is_choice());
        assert!(Action::Check.is_choice());
    }
}
