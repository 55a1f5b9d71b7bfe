use super::message::GameView;
use super::message::PotView;
use super::message::RevealView;
use super::message::SeatView;
use super::message::WinnerView;
use super::seat::SeatInfo;
use plo_core::Position;
use plo_core::SEATS;
use plo_gameplay::Game;
use plo_gameplay::State;

/// Who a snapshot is being built for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Viewer {
    /// A seated player: sees their own hole cards.
    Seat(Position),
    /// A spectator: hole cards arrive separately via `game:all_hole_cards`.
    Spectator,
}

/// Projects the table state for one recipient.
///
/// Every recipient sees stacks, bets, the board, pots, and the acting
/// seat; hole cards are stripped for everyone except the viewing seat.
/// Masked names are obfuscated for everyone but their owner.
#[allow(clippy::too_many_arguments)]
pub fn project(
    table_id: &str,
    hand_number: u64,
    game: &Game,
    seats: &[Option<SeatInfo>; SEATS],
    timeout: Option<(u64, u64)>,
    viewer: Viewer,
) -> GameView {
    let live = !game.complete();
    let seat_views = (0..SEATS)
        .map(|pos| {
            seats[pos].as_ref().map(|info| {
                let own = viewer == Viewer::Seat(pos);
                seat_view(game, pos, info, own, live)
            })
        })
        .collect();
    GameView {
        table_id: table_id.to_string(),
        hand_number,
        seats: seat_views,
        board: game
            .board()
            .cards()
            .iter()
            .map(|c| c.to_string())
            .collect(),
        pot: game.pot(),
        side_pots: game
            .side_pots()
            .iter()
            .map(|p| PotView {
                amount: p.amount(),
                eligible: p.eligible().to_vec(),
            })
            .collect(),
        current_seat: live.then(|| game.actor()),
        current_bet: game.bet(),
        min_raise: game.min_raise(),
        action_timeout_at: timeout.map(|(at, _)| at),
        action_timeout_ms: timeout.map(|(_, ms)| ms),
        is_hand_in_progress: live,
    }
}

fn seat_view(game: &Game, pos: Position, info: &SeatInfo, own: bool, live: bool) -> SeatView {
    let seat = game.seat(pos);
    let identity = info.identity();
    let cards = (own && live)
        .then(|| seat.cards().map(hole_strings))
        .flatten();
    SeatView {
        seat: pos,
        player_id: identity.id.to_string(),
        name: match own {
            true => identity.name.clone(),
            false => identity.shown_name(),
        },
        stack: seat.stack(),
        bet: seat.stake(),
        folded: seat.state() == State::Folding,
        all_in: seat.state() == State::Shoving,
        sitting_out: seat.state() == State::Sitout,
        connected: info.connected(),
        position: seat.spot().map(|s| s.to_string()),
        cards,
    }
}

fn hole_strings(hole: &plo_cards::Hole) -> Vec<String> {
    hole.cards().iter().map(|c| c.to_string()).collect()
}

/// Winner views from the engine's settlement.
pub fn winners(game: &Game, seats: &[Option<SeatInfo>; SEATS]) -> Vec<WinnerView> {
    game.winners()
        .iter()
        .map(|w| WinnerView {
            player_id: seats[w.seat]
                .as_ref()
                .map(|s| s.id().to_string())
                .unwrap_or_default(),
            seat: w.seat,
            amount: w.amount,
            hand_name: w.strength.map(|s| s.to_string()),
        })
        .collect()
}

/// Showdown reveals: every live seat's cards, with the hand name for
/// seats that won something.
pub fn reveals(game: &Game) -> Vec<RevealView> {
    (0..SEATS)
        .filter(|&pos| game.seat(pos).state().is_live())
        .filter_map(|pos| game.seat(pos).cards().map(|hole| (pos, hole)))
        .map(|(pos, hole)| RevealView {
            seat_index: pos,
            cards: hole_strings(hole),
            hand_name: game
                .winners()
                .iter()
                .find(|w| w.seat == pos)
                .and_then(|w| w.strength)
                .map(|s| s.to_string()),
        })
        .collect()
}

/// Every dealt hand, for spectators.
pub fn all_holes(game: &Game) -> Vec<RevealView> {
    (0..SEATS)
        .filter_map(|pos| game.seat(pos).cards().map(|hole| (pos, hole)))
        .map(|(pos, hole)| RevealView {
            seat_index: pos,
            cards: hole_strings(hole),
            hand_name: None,
        })
        .collect()
}
