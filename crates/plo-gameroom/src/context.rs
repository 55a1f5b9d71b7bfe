use super::seat::SeatInfo;
use super::timer::now_ms;
use plo_core::Chips;
use plo_core::ID;
use plo_core::Position;
use plo_core::SEATS;
use plo_gameplay::Game;
use plo_records::Hand as HandRecord;
use plo_records::Participant;
use plo_records::Play as PlayRecord;
use plo_records::Table as TableMarker;

/// Accumulates everything the hand-completion record needs.
///
/// Opened right after the deal so identities and starting stacks are
/// captured even if a player stands mid-hand; closed at settlement into
/// the record the storage sink consumes.
#[derive(Debug)]
pub struct HandContext {
    id: ID<HandRecord>,
    number: u64,
    started_at: u64,
    dealer: Position,
    entries: Vec<Entry>,
}

#[derive(Debug)]
struct Entry {
    seat: Position,
    player: ID<plo_core::Player>,
    name: String,
    hole: Vec<String>,
    stack: Chips,
}

impl HandContext {
    /// Captures the post-deal state of a fresh hand.
    pub fn open(number: u64, game: &Game, seats: &[Option<SeatInfo>; SEATS]) -> Self {
        let entries = (0..SEATS)
            .filter_map(|pos| seats[pos].as_ref().map(|info| (pos, info)))
            .map(|(pos, info)| Entry {
                seat: pos,
                player: info.id(),
                name: info.identity().name.clone(),
                hole: game
                    .seat(pos)
                    .cards()
                    .map(|h| h.cards().iter().map(|c| c.to_string()).collect())
                    .unwrap_or_default(),
                // blinds are already posted: starting stack includes them
                stack: game.seat(pos).stack() + game.seat(pos).spent(),
            })
            .collect();
        Self {
            id: ID::default(),
            number,
            started_at: now_ms(),
            dealer: game.dealer(),
            entries,
        }
    }
    pub fn number(&self) -> u64 {
        self.number
    }
    /// True if the seat has made a voluntary decision this hand.
    pub fn has_acted(&self, game: &Game, pos: Position) -> bool {
        game.history()
            .iter()
            .any(|p| p.seat == pos && p.action.is_choice())
    }
    /// Builds the emitted record from the settled game.
    pub fn close(self, table: ID<TableMarker>, game: &Game) -> HandRecord {
        debug_assert!(game.complete());
        let participants = self
            .entries
            .iter()
            .map(|e| {
                // winnings minus commitments; robust to seats whose
                // behind-stack left the table mid-hand
                let won = game
                    .winners()
                    .iter()
                    .find(|w| w.seat == e.seat)
                    .map(|w| w.amount)
                    .unwrap_or(0);
                Participant::new(
                    e.player,
                    e.name.clone(),
                    e.seat,
                    e.hole.clone(),
                    e.stack,
                    won - game.seat(e.seat).spent(),
                )
            })
            .collect();
        let plays = game
            .history()
            .iter()
            .map(|p| {
                PlayRecord::new(
                    p.seat,
                    p.action.kind().to_string(),
                    p.action.amount(),
                    p.street.to_string(),
                )
            })
            .collect();
        HandRecord::new(
            self.id,
            table,
            self.number,
            game.sblind(),
            game.bblind(),
            self.started_at,
            now_ms(),
            self.dealer,
            game.board().cards().iter().map(|c| c.to_string()).collect(),
            game.pot(),
            game.raked(),
            participants,
            plays,
        )
    }
}
