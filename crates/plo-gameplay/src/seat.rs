use super::spot::Spot;
use plo_cards::Hole;
use plo_core::Chips;

/// A player's in-hand state at the table.
///
/// - `stack` — chips behind, not yet committed
/// - `stake` — chips committed this street
/// - `spent` — total chips committed this hand
/// - `acted` — has made a voluntary decision this street
/// - `away`  — persistently out of hands (empty seat or waiting player)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Seat {
    state: State,
    stack: Chips,
    stake: Chips,
    spent: Chips,
    acted: bool,
    away: bool,
    spot: Option<Spot>,
    cards: Option<Hole>,
}

impl Default for Seat {
    fn default() -> Self {
        Self {
            state: State::Sitout,
            stack: 0,
            stake: 0,
            spent: 0,
            acted: true,
            away: true,
            spot: None,
            cards: None,
        }
    }
}

impl Seat {
    pub fn stack(&self) -> Chips {
        self.stack
    }
    pub fn stake(&self) -> Chips {
        self.stake
    }
    pub fn spent(&self) -> Chips {
        self.spent
    }
    pub fn state(&self) -> State {
        self.state
    }
    pub fn acted(&self) -> bool {
        self.acted
    }
    pub fn away(&self) -> bool {
        self.away
    }
    pub fn spot(&self) -> Option<Spot> {
        self.spot
    }
    pub fn cards(&self) -> Option<&Hole> {
        self.cards.as_ref()
    }

    /// Commits chips from stack toward the pot.
    pub fn bet(&mut self, bet: Chips) {
        debug_assert!(bet <= self.stack);
        self.stack -= bet;
        self.stake += bet;
        self.spent += bet;
    }
    /// Adds winnings (or returned bets) to stack.
    pub fn win(&mut self, win: Chips) {
        self.stack += win;
    }
    pub fn fold(&mut self) {
        self.state = State::Folding;
    }
    pub fn shove(&mut self) {
        self.state = State::Shoving;
    }
    /// Marks the seat as having made a voluntary decision this street.
    pub fn touch(&mut self) {
        self.acted = true;
    }

    /// Seats a player's chips; the seat joins play at the next hand start.
    pub fn occupy(&mut self, stack: Chips) {
        debug_assert!(self.away);
        self.stack = stack;
        self.away = false;
    }
    /// Empties the seat, returning the remaining stack.
    pub fn vacate(&mut self) -> Chips {
        let stack = self.stack;
        *self = Self::default();
        stack
    }
    /// Takes the behind-stack without disturbing in-hand commitments.
    pub fn withdraw(&mut self) -> Chips {
        std::mem::take(&mut self.stack)
    }
    /// Parks or unparks the seat (waiting-for-next-hand, sit-out).
    pub fn park(&mut self, away: bool) {
        self.away = away;
    }

    /// Hand-start reset: deals the seat in unless parked or unfunded.
    pub fn renew(&mut self) {
        self.stake = 0;
        self.spent = 0;
        self.cards = None;
        self.spot = None;
        self.state = match self.away || self.stack == 0 {
            true => State::Sitout,
            false => State::Betting,
        };
        self.acted = self.state == State::Sitout;
    }
    /// Street-start reset.
    pub fn refresh(&mut self) {
        self.stake = 0;
        self.acted = self.state != State::Betting;
    }
    pub fn set_cards(&mut self, cards: Hole) {
        self.cards = Some(cards);
    }
    pub fn set_spot(&mut self, spot: Spot) {
        self.spot = Some(spot);
    }
}

impl std::fmt::Display for Seat {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{} ${:>6} ({})", self.state, self.stack, self.stake)
    }
}

/// Betting status within a hand.
///
/// - `Betting` — active and can still make decisions
/// - `Shoving` — all-in, no more decisions but still in the pot
/// - `Folding` — out of the hand, chips stay in the pot
/// - `Sitout`  — not dealt in (empty seat, waiting, or busted)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum State {
    Betting,
    Shoving,
    Folding,
    Sitout,
}

impl State {
    /// True if the seat is competing for the pot.
    pub fn is_live(&self) -> bool {
        matches!(self, Self::Betting | Self::Shoving)
    }
}

impl std::fmt::Display for State {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            State::Betting => write!(f, "P"),
            State::Shoving => write!(f, "S"),
            State::Folding => write!(f, "F"),
            State::Sitout => write!(f, "-"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    #[test]
    fn bet_moves_stack_to_stake() {
        let mut seat = Seat::default();
        seat.occupy(100);
        seat.renew();
        seat.bet(30);
        assert_eq!(seat.stack(), 70);
        assert_eq!(seat.stake(), 30);
        assert_eq!(seat.spent(), 30);
        seat.refresh();
        assert_eq!(seat.stake(), 0);
        assert_eq!(seat.spent(), 30);
    }
    #[test]
    fn parked_seat_sits_out() {
        let mut seat = Seat::default();
        seat.occupy(100);
        seat.park(true);
        seat.renew();
        assert_eq!(seat.state(), State::Sitout);
        assert!(seat.acted());
        seat.park(false);
        seat.renew();
        assert_eq!(seat.state(), State::Betting);
        assert!(!seat.acted());
    }
    #[test]
    fn vacate_returns_stack() {
        let mut seat = Seat::default();
        seat.occupy(250);
        assert_eq!(seat.vacate(), 250);
        assert!(seat.away());
        assert_eq!(seat.stack(), 0);
    }
}
