use plo_core::Chips;
use plo_core::Position;
use serde::Deserialize;
use serde::Serialize;

/// One ordered action within a recorded hand, blinds included.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Play {
    seat: Position,
    /// Action kind: blind, fold, check, call, bet, raise, allin.
    action: String,
    amount: Chips,
    /// Street the action was taken on.
    street: String,
}

impl Play {
    pub fn new(seat: Position, action: String, amount: Chips, street: String) -> Self {
        Self {
            seat,
            action,
            amount,
            street,
        }
    }
    pub fn seat(&self) -> Position {
        self.seat
    }
    pub fn action(&self) -> &str {
        &self.action
    }
    pub fn amount(&self) -> Chips {
        self.amount
    }
    pub fn street(&self) -> &str {
        &self.street
    }
}
