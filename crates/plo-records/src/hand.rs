use super::participant::Participant;
use super::play::Play;
use plo_core::Chips;
use plo_core::ID;
use plo_core::Position;
use plo_core::Unique;
use serde::Deserialize;
use serde::Serialize;

/// Marker type for table identity in records.
pub struct Table;

/// Complete record of one finished hand, emitted for the storage sink.
///
/// The core produces these and forgets them; persistence, hand-history
/// queries, and player stats live downstream.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Hand {
    id: ID<Self>,
    table: ID<Table>,
    number: u64,
    sblind: Chips,
    bblind: Chips,
    /// Unix epoch milliseconds.
    started_at: u64,
    ended_at: u64,
    dealer: Position,
    /// Community cards as display strings, in deal order.
    board: Vec<String>,
    pot: Chips,
    rake: Chips,
    participants: Vec<Participant>,
    plays: Vec<Play>,
}

impl Hand {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: ID<Self>,
        table: ID<Table>,
        number: u64,
        sblind: Chips,
        bblind: Chips,
        started_at: u64,
        ended_at: u64,
        dealer: Position,
        board: Vec<String>,
        pot: Chips,
        rake: Chips,
        participants: Vec<Participant>,
        plays: Vec<Play>,
    ) -> Self {
        Self {
            id,
            table,
            number,
            sblind,
            bblind,
            started_at,
            ended_at,
            dealer,
            board,
            pot,
            rake,
            participants,
            plays,
        }
    }
    pub fn table(&self) -> ID<Table> {
        self.table
    }
    pub fn number(&self) -> u64 {
        self.number
    }
    pub fn blinds(&self) -> (Chips, Chips) {
        (self.sblind, self.bblind)
    }
    pub fn started_at(&self) -> u64 {
        self.started_at
    }
    pub fn ended_at(&self) -> u64 {
        self.ended_at
    }
    pub fn dealer(&self) -> Position {
        self.dealer
    }
    pub fn board(&self) -> &[String] {
        &self.board
    }
    pub fn pot(&self) -> Chips {
        self.pot
    }
    pub fn rake(&self) -> Chips {
        self.rake
    }
    pub fn participants(&self) -> &[Participant] {
        &self.participants
    }
    pub fn plays(&self) -> &[Play] {
        &self.plays
    }
}

impl Unique for Hand {
    fn id(&self) -> ID<Self> {
        self.id
    }
}
