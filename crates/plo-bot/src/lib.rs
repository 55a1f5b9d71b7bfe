//! Heuristic PLO bot decision function.
//!
//! [`decide`] is a pure function of the public game state, a seat, a
//! [`Personality`], and an injected random source. Tables seat bots by
//! calling it wherever a human would be asked to act; tests pin its
//! behavior by seeding the RNG.
//!
//! - Preflop: hole scoring (see [`preflop`]) against thresholded plans
//! - Postflop: board texture plus made-hand/draw branching (see
//!   [`postflop`]), bets sized as pot fractions
pub mod personality;
pub mod postflop;
pub mod preflop;

pub use personality::*;

use plo_core::Chips;
use plo_core::Position;
use plo_gameplay::Action;
use plo_gameplay::Game;
use plo_cards::Strength;
use rand::Rng;

/// Chooses an action for the seat. Always returns a legal action; folds
/// if the seat has no options at all.
pub fn decide(
    game: &Game,
    pos: Position,
    personality: &Personality,
    rng: &mut impl Rng,
) -> Action {
    let legal = game.legal_for(pos);
    if legal.is_empty() {
        return Action::Fold;
    }
    let choice = match game.board().size() {
        0 => preflop_plan(game, pos, personality, rng),
        _ => postflop_plan(game, pos, personality, rng),
    };
    match game.is_allowed(pos, &choice) {
        true => choice,
        false => {
            log::debug!("[bot] snapped {} to a passive line", choice);
            passive(&legal)
        }
    }
}

/// Check if possible, call otherwise, fold as a last resort.
fn passive(legal: &[Action]) -> Action {
    legal
        .iter()
        .find(|a| matches!(a, Action::Check))
        .or_else(|| legal.iter().find(|a| matches!(a, Action::Call(_))))
        .copied()
        .unwrap_or(Action::Fold)
}

fn preflop_plan(
    game: &Game,
    pos: Position,
    personality: &Personality,
    rng: &mut impl Rng,
) -> Action {
    let seat = game.seat(pos);
    let hole = match seat.cards() {
        Some(hole) => hole,
        None => return game.passive(pos),
    };
    let score = preflop::score(hole) + preflop::position_bonus(seat.spot());
    let to_call = game.to_call(pos);
    let raise_bar = 0.75 - 0.08 * (personality.aggression - 1.0);
    let play_bar = 0.55 - 0.10 * (personality.looseness - 1.0);
    // a raise this big folds out the speculative range
    let big = to_call > game.pot().max(3 * game.bblind());
    if score >= raise_bar {
        // mix in flats to stay unpredictable
        match rng.random::<f64>() < (0.75 * personality.aggression).min(0.95) {
            true => sized_raise(game, pos, 1.0),
            false => flat(game, pos),
        }
    } else if score >= play_bar {
        if big && score < raise_bar - 0.05 {
            return match to_call == 0 {
                true => Action::Check,
                false => Action::Fold,
            };
        }
        match to_call == 0 && rng.random::<f64>() < 0.25 * personality.aggression {
            true => sized_raise(game, pos, 0.6),
            false => flat(game, pos),
        }
    } else {
        match to_call {
            0 => Action::Check,
            x if x <= game.bblind() && rng.random::<f64>() < 0.25 * personality.looseness => {
                flat(game, pos)
            }
            _ => Action::Fold,
        }
    }
}

fn postflop_plan(
    game: &Game,
    pos: Position,
    personality: &Personality,
    rng: &mut impl Rng,
) -> Action {
    let seat = game.seat(pos);
    let hole = match seat.cards() {
        Some(hole) => hole,
        None => return game.passive(pos),
    };
    let board = game.board();
    let tex = postflop::texture(board);
    let class = Strength::omaha(hole, board).ranking().class();
    let to_call = game.to_call(pos);
    let pot = game.pot();
    let late = seat.spot().map(|s| s.is_late()).unwrap_or(false);
    let nutted = class >= 7
        || (class == 6 && !tex.paired)
        || (class == 5 && !tex.paired && !tex.suited);
    let medium = class >= 3;
    let drawing = postflop::flush_draw(hole, board) || postflop::straight_draw(hole, board);
    if nutted {
        return match rng.random::<f64>() < (0.85 * personality.aggression).min(0.97) {
            true => sized_raise(game, pos, 0.7 + 0.3 * rng.random::<f64>()),
            false => flat(game, pos),
        };
    }
    if medium {
        return match to_call {
            0 => match rng.random::<f64>() < 0.5 * personality.aggression {
                true => sized_raise(game, pos, 0.5),
                false => Action::Check,
            },
            x if x * 2 <= pot_price(pot, personality) => flat(game, pos),
            _ => Action::Fold,
        };
    }
    if drawing {
        return match to_call {
            0 => match late && rng.random::<f64>() < 0.4 * personality.aggression {
                true => sized_raise(game, pos, 0.6),
                false => Action::Check,
            },
            x if x * 3 <= pot_price(pot, personality) => flat(game, pos),
            _ => Action::Fold,
        };
    }
    // air: only bluff with no live bet in front, more from late position
    // on boards that hit a perceived range
    match to_call {
        0 => {
            let scary = if tex.suited || tex.connected { 1.2 } else { 0.8 };
            let weight = personality.bluff * scary * if late { 1.0 } else { 0.4 };
            match rng.random::<f64>() < weight {
                true => sized_raise(game, pos, 0.6),
                false => Action::Check,
            }
        }
        _ => Action::Fold,
    }
}

/// Call price threshold scaled by looseness.
fn pot_price(pot: Chips, personality: &Personality) -> Chips {
    (pot as f64 * personality.looseness) as Chips
}

/// The canonical matching action: call when facing a bet, else check.
fn flat(game: &Game, pos: Position) -> Action {
    match game.to_call(pos) {
        0 => Action::Check,
        x => Action::Call(x.min(game.seat(pos).stack())),
    }
}

/// A bet or raise sized as a fraction of the pot-limit ceiling, clamped
/// to legal bounds; degrades to all-in or a flat when the stack is short.
fn sized_raise(game: &Game, pos: Position, fraction: f64) -> Action {
    let seat = game.seat(pos);
    let cap = game.to_pot_raise(pos);
    let target = (cap as f64 * fraction.clamp(0.0, 1.0)) as Chips;
    let (min, max) = match game.bet() {
        0 => (game.to_min_bet(), game.to_pot_bet()),
        _ => (game.to_min_raise(pos), cap),
    };
    let amount = target.clamp(min, max);
    if amount >= seat.stack() {
        match game.is_allowed(pos, &Action::Shove(seat.stack())) {
            true => Action::Shove(seat.stack()),
            false => flat(game, pos),
        }
    } else {
        let action = match game.bet() {
            0 => Action::Bet(amount),
            _ => Action::Raise(amount),
        };
        match game.is_allowed(pos, &action) {
            true => action,
            false => flat(game, pos),
        }
    }
}
