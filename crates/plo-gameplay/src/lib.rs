//! Pot-Limit Omaha hand engine.
//!
//! This crate implements the rules and mechanics of six-max PLO cash
//! hands, tracking state across betting rounds and resolving showdowns.
//!
//! ## State Representation
//!
//! - [`Game`] — The live hand: stacks, pot, board, betting levels
//! - [`Seat`] — A player's in-hand chips, status, and hole cards
//! - [`Play`] — One entry of the ordered hand history
//!
//! ## Actions
//!
//! - [`Action`] — A decision: fold, check, call, bet, raise, all-in
//! - [`Spot`] — Positional label assigned clockwise from the button
//!
//! ## Resolution
//!
//! - [`Pot`] — Side-pot tiers partitioning the total pot
//! - [`Rake`] — House take on contested showdowns
//! - [`Winning`] — Per-seat credit at hand end
//!
//! ## Probability
//!
//! - [`equities`] — Win probabilities under random run-outs
//! - [`allin_ev_profits`] — Side-pot-aware expected profit
mod action;
mod equity;
mod game;
mod pot;
mod seat;
mod spot;

pub use action::*;
pub use equity::*;
pub use game::*;
pub use pot::*;
pub use seat::*;
pub use spot::*;
