use plo_core::Chips;
use plo_core::ID;
use plo_core::Player;
use plo_core::Position;
use serde::Deserialize;
use serde::Serialize;

/// A seat's involvement in a recorded hand.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Participant {
    player: ID<Player>,
    name: String,
    seat: Position,
    /// Hole cards as display strings; empty if never dealt in.
    hole: Vec<String>,
    /// Stack at hand start.
    stack: Chips,
    /// Net result: winnings minus chips invested.
    profit: Chips,
}

impl Participant {
    pub fn new(
        player: ID<Player>,
        name: String,
        seat: Position,
        hole: Vec<String>,
        stack: Chips,
        profit: Chips,
    ) -> Self {
        Self {
            player,
            name,
            seat,
            hole,
            stack,
            profit,
        }
    }
    pub fn player(&self) -> ID<Player> {
        self.player
    }
    pub fn name(&self) -> &str {
        &self.name
    }
    pub fn seat(&self) -> Position {
        self.seat
    }
    pub fn hole(&self) -> &[String] {
        &self.hole
    }
    pub fn stack(&self) -> Chips {
        self.stack
    }
    pub fn profit(&self) -> Chips {
        self.profit
    }
}
