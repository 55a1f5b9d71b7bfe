use super::action::Action;
use super::action::Play;
use super::pot::Pot;
use super::pot::Rake;
use super::seat::Seat;
use super::seat::State;
use super::spot::Spot;
use plo_cards::Board;
use plo_cards::Deck;
use plo_cards::Street;
use plo_cards::Strength;
use plo_core::Chips;
use plo_core::Position;
use plo_core::SEATS;
use rand::Rng;

/// The state machine for one six-max Pot-Limit Omaha table.
///
/// `Game` owns the seats' chips and the live hand: blinds, betting rounds,
/// pot-limit sizing, the raise-reopen rule, side pots, rake, and settlement.
/// It is purely synchronous; the table actor drives it and owns all timing
/// and I/O. Seat occupancy changes (`occupy`/`vacate`/`park`) take effect
/// at the next [`begin`](Self::begin).
///
/// # Betting model
///
/// - `bet` — the level every live seat must match this street
/// - `min_raise` — the smallest legal raise increment
/// - `last_full_raise` — the bet level set by the last full raise; an
///   all-in raise smaller than `min_raise` moves `bet` past this level
///   without re-opening the action
///
/// A seat may raise iff it has not yet acted this street, or the current
/// bet level is still the last full-raise level. Once a short all-in
/// pushes `bet` beyond `last_full_raise`, seats that already acted may
/// only call or fold.
#[derive(Debug, Clone)]
pub struct Game {
    seats: [Seat; SEATS],
    deck: Deck,
    board: Board,
    pot: Chips,
    dealer: Position,
    actor: Position,
    bet: Chips,
    min_raise: Chips,
    last_full_raise: Chips,
    raiser: Option<Position>,
    sblind: Chips,
    bblind: Chips,
    rake: Rake,
    raked: Chips,
    history: Vec<Play>,
    winners: Vec<Winning>,
    complete: bool,
    baseline: Chips,
}

/// A seat's credit at hand end.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Winning {
    pub seat: Position,
    pub amount: Chips,
    /// Absent on fold-wins, where no hand is revealed.
    pub strength: Option<Strength>,
}

impl Game {
    pub fn new(sblind: Chips, bblind: Chips, rake: Rake) -> Self {
        debug_assert!(0 < sblind && sblind <= bblind);
        Self {
            seats: [Seat::default(); SEATS],
            deck: Deck::new(),
            board: Board::empty(),
            pot: 0,
            dealer: SEATS - 1,
            actor: 0,
            bet: 0,
            min_raise: bblind,
            last_full_raise: 0,
            raiser: None,
            sblind,
            bblind,
            rake,
            raked: 0,
            history: Vec::new(),
            winners: Vec::new(),
            complete: true,
            baseline: 0,
        }
    }
}

/// Public state accessors.
impl Game {
    pub fn pot(&self) -> Chips {
        self.pot
    }
    pub fn bet(&self) -> Chips {
        self.bet
    }
    pub fn min_raise(&self) -> Chips {
        self.min_raise
    }
    pub fn board(&self) -> &Board {
        &self.board
    }
    pub fn seats(&self) -> &[Seat; SEATS] {
        &self.seats
    }
    pub fn seat(&self, pos: Position) -> &Seat {
        &self.seats[pos]
    }
    pub fn dealer(&self) -> Position {
        self.dealer
    }
    /// The seat to act, meaningful only while the hand is live.
    pub fn actor(&self) -> Position {
        self.actor
    }
    pub fn sblind(&self) -> Chips {
        self.sblind
    }
    pub fn bblind(&self) -> Chips {
        self.bblind
    }
    pub fn history(&self) -> &[Play] {
        &self.history
    }
    pub fn winners(&self) -> &[Winning] {
        &self.winners
    }
    pub fn complete(&self) -> bool {
        self.complete
    }
    pub fn raked(&self) -> Chips {
        self.raked
    }
    /// The seat that made the last full bet or raise this street.
    pub fn raiser(&self) -> Option<Position> {
        self.raiser
    }
    /// Current street; Show once the hand has completed.
    pub fn street(&self) -> Street {
        match self.complete {
            true => Street::Show,
            false => self.board.street(),
        }
    }
    /// Seats that would be dealt into the next hand.
    pub fn eligible(&self) -> usize {
        self.seats
            .iter()
            .filter(|s| !s.away() && s.stack() > 0)
            .count()
    }
}

/// Seat occupancy, effective at the next hand start.
impl Game {
    pub fn occupy(&mut self, pos: Position, stack: Chips) {
        self.seats[pos].occupy(stack);
        // chips arriving mid-hand move the conservation baseline
        if !self.complete {
            self.baseline += stack;
        }
    }
    pub fn vacate(&mut self, pos: Position) -> Chips {
        debug_assert!(self.complete || !self.seats[pos].state().is_live());
        let chips = self.seats[pos].vacate();
        if !self.complete {
            self.baseline -= chips;
        }
        chips
    }
    pub fn park(&mut self, pos: Position, away: bool) {
        self.seats[pos].park(away);
    }
    /// Folds a seat out of turn (stand, fast-fold). The seat's chips in
    /// the pot stay there; the hand advances if it was their turn.
    pub fn surrender(&mut self, pos: Position) -> anyhow::Result<()> {
        anyhow::ensure!(!self.complete, "no live hand");
        anyhow::ensure!(
            self.seats[pos].state() == State::Betting,
            "seat {} has no live decision to surrender",
            pos
        );
        self.seats[pos].fold();
        self.history.push(Play {
            seat: pos,
            action: Action::Fold,
            street: self.board.street(),
        });
        if pos == self.actor {
            self.advance();
        } else if self.survivors().len() == 1 {
            self.fold_win();
        }
        Ok(())
    }
    /// Takes the behind-stack off the table mid-hand and parks the seat.
    /// In-hand commitments stay and resolve with the hand.
    pub fn withdraw(&mut self, pos: Position) -> Chips {
        let chips = self.seats[pos].withdraw();
        self.baseline -= chips;
        self.seats[pos].park(true);
        chips
    }
}

/// Hand lifecycle.
impl Game {
    /// Starts a new hand with a freshly shuffled deck.
    pub fn begin(&mut self, rng: &mut impl Rng) -> anyhow::Result<()> {
        let mut deck = Deck::new();
        deck.shuffle(rng);
        self.begin_with(deck)
    }
    /// Starts a new hand dealing from the given deck. The deck must be
    /// already shuffled; the engine never reshuffles behind the caller.
    pub fn begin_with(&mut self, deck: Deck) -> anyhow::Result<()> {
        anyhow::ensure!(self.complete, "hand already in progress");
        anyhow::ensure!(self.eligible() >= 2, "need two seats to start a hand");
        self.deck = deck;
        self.board.clear();
        self.pot = 0;
        self.raked = 0;
        self.history.clear();
        self.winners.clear();
        self.complete = false;
        self.raiser = None;
        for seat in self.seats.iter_mut() {
            seat.renew();
        }
        self.baseline = self.seats.iter().map(Seat::stack).sum();
        self.dealer = self
            .next_betting(self.dealer)
            .expect("two eligible seats were dealt in");
        let order = self.ring();
        for (i, &pos) in order.iter().enumerate() {
            self.seats[pos].set_spot(Spot::ring(i, order.len()));
        }
        let (sb, bb) = match order.len() {
            2 => (order[0], order[1]),
            _ => (order[1], order[2]),
        };
        self.post(sb, self.sblind);
        self.post(bb, self.bblind);
        self.bet = self.bblind;
        self.min_raise = self.bblind;
        self.last_full_raise = self.bblind;
        for &pos in order.iter() {
            let hole = self.deck.hole();
            self.seats[pos].set_cards(hole);
        }
        let start = match order.len() {
            2 => sb,
            _ => self.next_betting(bb).unwrap_or(bb),
        };
        match self.seats[start].state() {
            State::Betting => self.actor = start,
            _ => match self.next_betting(start) {
                Some(pos) => self.actor = pos,
                None => {
                    self.runout();
                    self.settle();
                }
            },
        }
        Ok(())
    }

    fn post(&mut self, pos: Position, blind: Chips) {
        let amount = blind.min(self.seats[pos].stack());
        self.commit(pos, amount);
        self.history.push(Play {
            seat: pos,
            action: Action::Blind(amount),
            street: Street::Pref,
        });
    }
    /// Live seats clockwise from the dealer.
    fn ring(&self) -> Vec<Position> {
        (0..SEATS)
            .map(|i| (self.dealer + i) % SEATS)
            .filter(|&p| self.seats[p].state() == State::Betting)
            .collect()
    }
    /// Next seat after `from` that can still make decisions.
    fn next_betting(&self, from: Position) -> Option<Position> {
        (1..=SEATS)
            .map(|i| (from + i) % SEATS)
            .find(|&p| self.seats[p].state() == State::Betting)
    }
}

/// Action legality and sizing.
impl Game {
    /// Chips `pos` must add to match the current bet.
    pub fn to_call(&self, pos: Position) -> Chips {
        self.bet - self.seats[pos].stake()
    }
    /// Minimum opening bet.
    pub fn to_min_bet(&self) -> Chips {
        self.bblind
    }
    /// Maximum opening bet under pot limit.
    pub fn to_pot_bet(&self) -> Chips {
        self.pot
    }
    /// Minimum raise: call plus the minimum increment.
    pub fn to_min_raise(&self, pos: Position) -> Chips {
        self.to_call(pos) + self.min_raise
    }
    /// Pot-limit ceiling on chips added: the call plus the pot as it
    /// would stand after that call.
    pub fn to_pot_raise(&self, pos: Position) -> Chips {
        let to_call = self.to_call(pos);
        to_call + self.pot + to_call
    }
    /// Raise eligibility. A seat that already acted this street lost the
    /// right to raise once a short all-in pushed the bet level past the
    /// last full raise.
    pub fn may_raise(&self, pos: Position) -> bool {
        !self.seats[pos].acted() || self.bet <= self.last_full_raise
    }

    /// Canonical legal actions for a seat, minimum sizes for bet/raise.
    /// Empty unless the hand is live and the seat can make decisions.
    pub fn legal_for(&self, pos: Position) -> Vec<Action> {
        let seat = &self.seats[pos];
        if self.complete || seat.state() != State::Betting {
            return Vec::new();
        }
        let mut options = vec![Action::Fold];
        let to_call = self.to_call(pos);
        match to_call {
            0 => options.push(Action::Check),
            _ => options.push(Action::Call(to_call.min(seat.stack()))),
        }
        if self.may_raise(pos) && seat.stack() > to_call {
            match self.bet {
                0 => {
                    if seat.stack() > self.to_min_bet() {
                        options.push(Action::Bet(self.to_min_bet()));
                    }
                }
                _ => {
                    if seat.stack() > self.to_min_raise(pos) {
                        options.push(Action::Raise(self.to_min_raise(pos)));
                    }
                }
            }
        }
        if seat.stack() > 0
            && seat.stack() <= self.to_pot_raise(pos)
            && (seat.stack() <= to_call || self.may_raise(pos))
        {
            options.push(Action::Shove(seat.stack()));
        }
        options
    }
    /// Legal actions for the seat to act.
    pub fn legal(&self) -> Vec<Action> {
        match self.complete {
            true => Vec::new(),
            false => self.legal_for(self.actor),
        }
    }
    /// Bounds checking for the two actions with degrees of freedom;
    /// everything else must match the canonical option exactly.
    pub fn is_allowed(&self, pos: Position, action: &Action) -> bool {
        let seat = &self.seats[pos];
        if self.complete || seat.state() != State::Betting {
            return false;
        }
        let to_call = self.to_call(pos);
        match action {
            Action::Blind(_) => false,
            Action::Fold => true,
            Action::Check => to_call == 0,
            Action::Call(x) => to_call > 0 && *x == to_call.min(seat.stack()),
            Action::Bet(x) => {
                self.bet == 0
                    && self.may_raise(pos)
                    && *x >= self.to_min_bet()
                    && *x <= self.to_pot_bet()
                    && *x < seat.stack()
            }
            Action::Raise(x) => {
                self.bet > 0
                    && self.may_raise(pos)
                    && *x >= self.to_min_raise(pos)
                    && *x <= self.to_pot_raise(pos)
                    && *x < seat.stack()
            }
            Action::Shove(x) => {
                *x == seat.stack()
                    && *x > 0
                    && *x <= self.to_pot_raise(pos)
                    && (*x <= to_call || self.may_raise(pos))
            }
        }
    }
    /// Default action injected on timeout: check if legal, otherwise fold.
    pub fn passive(&self, pos: Position) -> Action {
        match self.to_call(pos) {
            0 => Action::Check,
            _ => Action::Fold,
        }
    }
}

/// Action application.
impl Game {
    /// Applies a seat's action, then advances the turn, the street, or the
    /// hand. Rejects without mutation unless it is `pos`'s turn and the
    /// action passes [`is_allowed`](Self::is_allowed).
    pub fn apply(&mut self, pos: Position, action: Action) -> anyhow::Result<()> {
        anyhow::ensure!(!self.complete, "hand is complete");
        anyhow::ensure!(pos == self.actor, "seat {} is not to act", pos);
        anyhow::ensure!(
            self.is_allowed(pos, &action),
            "illegal action {} for seat {}",
            action,
            pos
        );
        let street = self.board.street();
        match action {
            Action::Blind(_) => unreachable!("rejected by is_allowed"),
            Action::Fold => self.seats[pos].fold(),
            Action::Check => {}
            Action::Call(x) => self.commit(pos, x),
            Action::Bet(x) | Action::Raise(x) => {
                self.commit(pos, x);
                let level = self.seats[pos].stake();
                let raise_by = level - self.bet;
                if raise_by > self.min_raise {
                    self.min_raise = raise_by;
                }
                self.last_full_raise = level;
                self.raiser = Some(pos);
                self.bet = level;
            }
            Action::Shove(x) => {
                self.commit(pos, x);
                let level = self.seats[pos].stake();
                if level > self.bet {
                    let raise_by = level - self.bet;
                    if raise_by >= self.min_raise {
                        self.min_raise = raise_by;
                        self.last_full_raise = level;
                        self.raiser = Some(pos);
                    }
                    self.bet = level;
                }
            }
        }
        self.seats[pos].touch();
        self.history.push(Play {
            seat: pos,
            action,
            street,
        });
        self.advance();
        debug_assert!(self.verify().is_ok(), "chip conservation after {}", action);
        Ok(())
    }

    fn commit(&mut self, pos: Position, amount: Chips) {
        self.seats[pos].bet(amount);
        self.pot += amount;
        if self.seats[pos].stack() == 0 {
            self.seats[pos].shove();
        }
    }
    fn advance(&mut self) {
        if self.survivors().len() == 1 {
            return self.fold_win();
        }
        match self.next_actionable() {
            Some(pos) => self.actor = pos,
            None => self.end_street(),
        }
    }
    /// Next seat owing a decision: live, and either unmatched or unacted.
    fn next_actionable(&self) -> Option<Position> {
        (1..=SEATS)
            .map(|i| (self.actor + i) % SEATS)
            .filter(|&p| self.seats[p].state() == State::Betting)
            .find(|&p| !self.seats[p].acted() || self.seats[p].stake() < self.bet)
    }
    fn end_street(&mut self) {
        if self.board.street() == Street::Rive {
            return self.settle();
        }
        self.bet = 0;
        self.min_raise = self.bblind;
        self.last_full_raise = 0;
        self.raiser = None;
        for seat in self.seats.iter_mut() {
            seat.refresh();
        }
        for card in self.deck.deal(self.board.street().n_revealed()) {
            self.board.add(card);
        }
        let betting = self
            .seats
            .iter()
            .filter(|s| s.state() == State::Betting)
            .count();
        match betting {
            0 | 1 => {
                self.runout();
                self.settle();
            }
            _ => {
                self.actor = self
                    .next_betting(self.dealer)
                    .expect("betting seats exist");
            }
        }
    }
    fn runout(&mut self) {
        while self.board.street() < Street::Rive {
            for card in self.deck.deal(self.board.street().n_revealed()) {
                self.board.add(card);
            }
        }
    }
    fn survivors(&self) -> Vec<Position> {
        (0..SEATS)
            .filter(|&p| self.seats[p].state().is_live())
            .collect()
    }
}

/// Side pots and settlement.
impl Game {
    /// Pot tiers over the distinct commitment levels of live seats.
    /// Folded seats' chips flow into the tiers they reached; the tiers
    /// partition the pot exactly.
    pub fn side_pots(&self) -> Vec<Pot> {
        let mut levels: Vec<Chips> = self
            .seats
            .iter()
            .filter(|s| s.state().is_live())
            .map(Seat::spent)
            .filter(|&x| x > 0)
            .collect();
        levels.sort_unstable();
        levels.dedup();
        let mut pots = Vec::new();
        let mut prev = 0;
        for &level in levels.iter() {
            let amount = self
                .seats
                .iter()
                .map(|s| s.spent().min(level) - s.spent().min(prev))
                .sum::<Chips>();
            let eligible = (0..SEATS)
                .filter(|&p| self.seats[p].state().is_live())
                .filter(|&p| self.seats[p].spent() >= level)
                .collect::<Vec<_>>();
            if amount > 0 {
                pots.push(Pot::new(amount, eligible));
            }
            prev = level;
        }
        pots
    }

    /// Everyone folded to one seat: whole pot, no reveal, no rake.
    fn fold_win(&mut self) {
        let pos = self.survivors()[0];
        self.seats[pos].win(self.pot);
        self.winners = vec![Winning {
            seat: pos,
            amount: self.pot,
            strength: None,
        }];
        self.complete = true;
    }
    /// Showdown: rank each pot's eligible seats, split ties evenly with
    /// the odd chip to the first winner in seat order, rake contested
    /// pots against the hand-level cap.
    fn settle(&mut self) {
        debug_assert!(self.board.size() == 5);
        let pots = self.side_pots();
        let mut cap = self.rake.cap(self.bblind);
        let mut credits: Vec<(Position, Chips, Option<Strength>)> = Vec::new();
        for pot in pots.iter() {
            if pot.is_uncontested() {
                credits.push((pot.eligible()[0], pot.amount(), None));
                continue;
            }
            let ranked = pot
                .eligible()
                .iter()
                .map(|&p| {
                    let hole = self.seats[p].cards().expect("live seats hold cards");
                    (p, Strength::omaha(hole, &self.board))
                })
                .collect::<Vec<_>>();
            let best = ranked.iter().map(|(_, s)| *s).max().expect("contested pot");
            let tied = ranked
                .iter()
                .filter(|(_, s)| *s == best)
                .map(|(p, _)| *p)
                .collect::<Vec<_>>();
            let rake = self.rake.take(pot.amount(), cap);
            cap -= rake;
            self.raked += rake;
            let paid = pot.amount() - rake;
            let share = paid / tied.len() as Chips;
            let remainder = paid % tied.len() as Chips;
            for (i, &p) in tied.iter().enumerate() {
                let amount = share + if i == 0 { remainder } else { 0 };
                credits.push((p, amount, Some(best)));
            }
        }
        let mut winners: Vec<Winning> = Vec::new();
        for (pos, amount, strength) in credits {
            self.seats[pos].win(amount);
            match winners.iter().position(|w| w.seat == pos) {
                Some(i) => {
                    winners[i].amount += amount;
                    winners[i].strength = winners[i].strength.max(strength);
                }
                None => winners.push(Winning {
                    seat: pos,
                    amount,
                    strength,
                }),
            }
        }
        winners.sort_by_key(|w| w.seat);
        self.winners = winners;
        self.complete = true;
    }
}

/// Integrity checks and recovery.
impl Game {
    /// Chip conservation: during a hand, stacks plus pot equal the chips
    /// at hand start; afterwards only the rake has left the table.
    pub fn verify(&self) -> anyhow::Result<()> {
        let stacks = self.seats.iter().map(Seat::stack).sum::<Chips>();
        let spent = self.seats.iter().map(Seat::spent).sum::<Chips>();
        match self.complete {
            false => {
                anyhow::ensure!(self.pot == spent, "pot does not match commitments");
                anyhow::ensure!(
                    stacks + self.pot == self.baseline,
                    "chips created or destroyed mid-hand"
                );
            }
            true if self.baseline > 0 => {
                anyhow::ensure!(
                    stacks + self.raked == self.baseline,
                    "settlement does not balance"
                );
            }
            true => {}
        }
        Ok(())
    }
    /// Aborts the live hand, returning every seat's commitment.
    /// Used when an invariant violation is detected mid-hand.
    pub fn abort(&mut self) {
        for seat in self.seats.iter_mut() {
            let spent = seat.spent();
            seat.win(spent);
        }
        self.pot = 0;
        self.raked = 0;
        self.winners.clear();
        self.complete = true;
        log::error!("[game] hand aborted, bets returned");
    }
}

impl std::fmt::Display for Game {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        for seat in self.seats.iter() {
            writeln!(f, "{}", seat)?;
        }
        writeln!(f, "Pot   {}", self.pot)?;
        writeln!(f, "Board {}", self.board)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use plo_cards::Card;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    fn rng() -> SmallRng {
        SmallRng::seed_from_u64(0xB0A7)
    }

    /// Two live seats, 1/3 blinds, no rake, seat 0 on the button.
    fn heads_up() -> Game {
        let mut game = Game::new(1, 3, Rake::none());
        game.occupy(0, 300);
        game.occupy(1, 300);
        game.begin(&mut rng()).unwrap();
        game
    }

    fn three_way(stacks: [Chips; 3]) -> Game {
        let mut game = Game::new(1, 3, Rake::none());
        for (pos, stack) in stacks.into_iter().enumerate() {
            game.occupy(pos, stack);
        }
        game.begin(&mut rng()).unwrap();
        game
    }

    /// Repeatedly jam the pot until every live seat is all-in.
    fn jam_all(game: &mut Game) {
        while !game.complete() {
            let pos = game.actor();
            let legal = game.legal();
            if let Some(shove) = legal.iter().find(|a| matches!(a, Action::Shove(_))) {
                game.apply(pos, *shove).unwrap();
            } else if legal.iter().any(|a| matches!(a, Action::Raise(_))) {
                game.apply(pos, Action::Raise(game.to_pot_raise(pos))).unwrap();
            } else if let Some(call) = legal.iter().find(|a| matches!(a, Action::Call(_))) {
                game.apply(pos, *call).unwrap();
            } else {
                game.apply(pos, Action::Check).unwrap();
            }
        }
    }

    /// A deck whose first deals are exactly `top` (space-separated cards).
    fn stacked(top: &str) -> Deck {
        let named = top
            .split_whitespace()
            .map(|s| Card::try_from(s).unwrap())
            .collect::<Vec<_>>();
        let rest = (0..52u8)
            .map(Card::from)
            .filter(|c| !named.contains(c))
            .collect::<Vec<_>>();
        // Deck deals from the back of its card vector.
        let cards = rest
            .into_iter()
            .chain(named.into_iter().rev())
            .collect::<Vec<_>>();
        Deck::from(cards)
    }

    #[test]
    fn heads_up_geometry() {
        let game = heads_up();
        // dealer posts SB and acts first preflop
        assert_eq!(game.dealer(), 0);
        assert_eq!(game.actor(), 0);
        assert_eq!(game.seat(0).stake(), 1);
        assert_eq!(game.seat(1).stake(), 3);
        assert_eq!(game.pot(), 4);
        assert_eq!(game.bet(), 3);
        assert_eq!(game.min_raise(), 3);
    }

    /// Scenario: heads-up walkover. SB folds preflop, BB collects the
    /// blinds without rake.
    #[test]
    fn heads_up_walkover() {
        let mut game = heads_up();
        game.apply(0, Action::Fold).unwrap();
        assert!(game.complete());
        assert_eq!(game.winners(), &[Winning { seat: 1, amount: 4, strength: None }]);
        assert_eq!(game.seat(0).stack(), 299);
        assert_eq!(game.seat(1).stack(), 301);
        assert_eq!(game.raked(), 0);
    }

    #[test]
    fn heads_up_postflop_order() {
        let mut game = heads_up();
        game.apply(0, Action::Call(2)).unwrap();
        game.apply(1, Action::Check).unwrap();
        // BB acts first on every postflop street
        assert_eq!(game.street(), Street::Flop);
        assert_eq!(game.actor(), 1);
    }

    #[test]
    fn chip_conservation_through_betting() {
        let mut game = heads_up();
        game.apply(0, Action::Raise(8)).unwrap();
        game.verify().unwrap();
        game.apply(1, Action::Call(6)).unwrap();
        game.verify().unwrap();
        game.apply(1, Action::Bet(9)).unwrap();
        game.verify().unwrap();
        game.apply(0, Action::Fold).unwrap();
        game.verify().unwrap();
        assert_eq!(game.seat(0).stack() + game.seat(1).stack(), 600);
    }

    #[test]
    fn bb_gets_the_option() {
        let mut game = heads_up();
        game.apply(0, Action::Call(2)).unwrap();
        // BB has not acted: may check or raise despite matched bets
        let legal = game.legal_for(1);
        assert!(legal.contains(&Action::Check));
        assert!(legal.iter().any(|a| matches!(a, Action::Raise(_))));
    }

    #[test]
    fn pot_limit_caps_preflop_open() {
        let game = heads_up();
        // SB: call 2 more, pot after call is 6, cap = 2 + 6 = 8
        assert_eq!(game.to_pot_raise(0), 8);
        assert!(game.is_allowed(0, &Action::Raise(8)));
        assert!(!game.is_allowed(0, &Action::Raise(9)));
        // min raise: call 2 + increment 3
        assert_eq!(game.to_min_raise(0), 5);
        assert!(!game.is_allowed(0, &Action::Raise(4)));
    }

    #[test]
    fn pot_limit_caps_postflop_bet() {
        let mut game = heads_up();
        game.apply(0, Action::Call(2)).unwrap();
        game.apply(1, Action::Check).unwrap();
        assert_eq!(game.street(), Street::Flop);
        // pot bet equals the pot, opening bet at least the big blind
        assert!(game.is_allowed(1, &Action::Bet(6)));
        assert!(!game.is_allowed(1, &Action::Bet(7)));
        assert!(!game.is_allowed(1, &Action::Bet(2)));
    }

    #[test]
    fn dealer_rotation_skips_busted_seats() {
        let mut game = Game::new(1, 3, Rake::none());
        game.occupy(0, 300);
        game.occupy(2, 300);
        game.occupy(4, 300);
        game.begin(&mut rng()).unwrap();
        assert_eq!(game.dealer(), 0);
        let fold_out = |game: &mut Game| {
            while !game.complete() {
                let pos = game.actor();
                game.apply(pos, game.passive(pos)).unwrap();
            }
        };
        fold_out(&mut game);
        game.begin(&mut rng()).unwrap();
        assert_eq!(game.dealer(), 2);
        fold_out(&mut game);
        game.begin(&mut rng()).unwrap();
        assert_eq!(game.dealer(), 4);
        fold_out(&mut game);
        game.begin(&mut rng()).unwrap();
        assert_eq!(game.dealer(), 0);
    }

    /// Scenario: three-way chop. Broadway board, every hole makes the
    /// queen-high straight, pot splits evenly.
    #[test]
    fn three_way_board_straight_chops() {
        let deck = stacked("9h 8h 2c 3c  9d 8d 4c 5c  9c 8c 6d 7d  Ah Kd Qc Js Th");
        let mut game = Game::new(1, 3, Rake::none());
        for pos in 0..3 {
            game.occupy(pos, 100);
        }
        game.begin_with(deck).unwrap();
        jam_all(&mut game);
        assert!(game.complete());
        assert_eq!(game.winners().len(), 3);
        for w in game.winners() {
            assert_eq!(w.amount, 100);
        }
        for pos in 0..3 {
            assert_eq!(game.seat(pos).stack(), 100);
        }
    }

    /// Scenario: short-stack side pots. Tiers partition total commitments
    /// and each tier is eligible only to seats that matched it.
    #[test]
    fn side_pot_tiers_partition_commitments() {
        let mut game = three_way([30, 100, 200]);
        jam_all(&mut game);
        assert!(game.complete());
        let spent: Chips = game.seats().iter().map(Seat::spent).sum();
        // all three seats are all-in or have matched the largest stack
        assert_eq!(game.seat(0).spent(), 30);
        assert_eq!(game.seat(1).spent(), 100);
        let pots = game.side_pots();
        assert_eq!(pots.iter().map(Pot::amount).sum::<Chips>(), spent);
        assert_eq!(pots[0].amount(), 90);
        assert_eq!(pots[0].eligible(), &[0, 1, 2]);
        assert_eq!(pots[1].amount(), 140);
        assert_eq!(pots[1].eligible(), &[1, 2]);
        if let Some(excess) = pots.get(2) {
            assert_eq!(excess.eligible(), &[2]);
        }
        // settlement conserves chips
        let stacks: Chips = game.seats().iter().map(Seat::stack).sum();
        assert_eq!(stacks, 330);
    }

    #[test]
    fn folded_chips_stay_in_the_pot() {
        let mut game = three_way([200, 200, 200]);
        // UTG (seat 0 is dealer; actor is seat 0 three-handed) raises,
        // SB re-raises, original raiser folds: dead chips remain
        assert_eq!(game.actor(), 0);
        game.apply(0, Action::Raise(10)).unwrap();
        game.apply(1, Action::Raise(32)).unwrap();
        game.apply(2, Action::Fold).unwrap();
        game.apply(0, Action::Fold).unwrap();
        assert!(game.complete());
        assert_eq!(game.winners()[0].seat, 1);
        assert_eq!(game.winners()[0].amount, 46);
    }

    /// Scenario: fold re-open rule. A short all-in that is not a full
    /// raise does not restore the raise right to seats that already acted.
    #[test]
    fn short_allin_does_not_reopen() {
        let mut game = Game::new(1, 3, Rake::none());
        game.occupy(0, 500); // dealer
        game.occupy(1, 35); // SB, the short stack
        game.occupy(2, 500); // BB
        game.occupy(3, 500); // UTG, first to act
        game.begin(&mut rng()).unwrap();
        assert_eq!(game.actor(), 3);
        // UTG opens to 10
        game.apply(3, Action::Raise(10)).unwrap();
        // dealer raises to 30: full raise, increment 20
        game.apply(0, Action::Raise(30)).unwrap();
        assert_eq!(game.min_raise(), 20);
        // SB jams 34 more for a 35 level: increment 5, not full
        game.apply(1, Action::Shove(34)).unwrap();
        assert_eq!(game.bet(), 35);
        assert_eq!(game.min_raise(), 20);
        // BB never acted: may still raise
        assert!(game.legal_for(2).iter().any(|a| matches!(a, Action::Raise(_))));
        game.apply(2, Action::Call(32)).unwrap();
        // UTG already acted: call or fold only
        let legal = game.legal_for(3);
        assert!(legal.contains(&Action::Fold));
        assert!(legal.contains(&Action::Call(25)));
        assert!(!legal.iter().any(|a| matches!(a, Action::Raise(_) | Action::Bet(_))));
        assert!(!game.is_allowed(3, &Action::Raise(45)));
        game.apply(3, Action::Call(25)).unwrap();
        // dealer faces the same lock
        let legal = game.legal_for(0);
        assert!(!legal.iter().any(|a| matches!(a, Action::Raise(_))));
    }

    /// A full-sized all-in raise re-opens the betting for everyone.
    #[test]
    fn full_allin_reopens() {
        let mut game = Game::new(1, 3, Rake::none());
        game.occupy(0, 500);
        game.occupy(1, 60);
        game.occupy(2, 500);
        game.occupy(3, 500);
        game.begin(&mut rng()).unwrap();
        game.apply(3, Action::Raise(10)).unwrap();
        game.apply(0, Action::Raise(30)).unwrap();
        // SB jams to a 60 level: increment 30 >= min raise 20, full
        game.apply(1, Action::Shove(59)).unwrap();
        assert_eq!(game.min_raise(), 30);
        game.apply(2, Action::Fold).unwrap();
        // UTG may re-raise again
        assert!(game.legal_for(3).iter().any(|a| matches!(a, Action::Raise(_))));
    }

    #[test]
    fn partial_blind_post_goes_all_in() {
        let mut game = Game::new(1, 3, Rake::none());
        game.occupy(0, 300);
        game.occupy(1, 2); // cannot cover the big blind
        game.begin(&mut rng()).unwrap();
        assert_eq!(game.seat(1).state(), State::Shoving);
        assert_eq!(game.seat(1).spent(), 2);
        // table bet level stays at the full big blind
        assert_eq!(game.bet(), 3);
        // SB still gets a decision against the short post
        assert_eq!(game.actor(), 0);
    }

    #[test]
    fn allin_runout_reaches_showdown() {
        let mut game = heads_up();
        jam_all(&mut game);
        assert!(game.complete());
        assert_eq!(game.board().size(), 5);
        assert_eq!(game.street(), Street::Show);
        let stacks: Chips = game.seats().iter().map(Seat::stack).sum();
        assert_eq!(stacks, 600);
    }

    #[test]
    fn rake_only_on_contested_showdown() {
        // fold win: no rake even with rake configured
        let mut game = Game::new(1, 3, Rake::default());
        game.occupy(0, 300);
        game.occupy(1, 300);
        game.begin(&mut rng()).unwrap();
        game.apply(0, Action::Fold).unwrap();
        assert_eq!(game.raked(), 0);
        // contested showdown: rake bounded by min(cap, pot * percent)
        let mut game = Game::new(1, 3, Rake::default());
        game.occupy(0, 300);
        game.occupy(1, 300);
        game.begin(&mut rng()).unwrap();
        jam_all(&mut game);
        assert!(game.raked() <= 9);
        assert!(game.raked() <= (600 as f64 * 0.05) as Chips);
        let stacks: Chips = game.seats().iter().map(Seat::stack).sum();
        assert_eq!(stacks + game.raked(), 600);
    }

    #[test]
    fn waiting_seat_is_skipped_and_joins_next_hand() {
        let mut game = Game::new(1, 3, Rake::none());
        game.occupy(0, 300);
        game.occupy(1, 300);
        game.occupy(2, 300);
        game.park(2, true); // joined mid-hand, waiting
        game.begin(&mut rng()).unwrap();
        assert_eq!(game.seat(2).state(), State::Sitout);
        assert!(game.legal_for(2).is_empty());
        game.apply(0, Action::Fold).unwrap();
        assert!(game.complete());
        game.park(2, false);
        game.begin(&mut rng()).unwrap();
        assert_eq!(game.seat(2).state(), State::Betting);
    }

    #[test]
    fn rejects_out_of_turn_and_illegal_actions() {
        let mut game = heads_up();
        assert!(game.apply(1, Action::Fold).is_err());
        assert!(game.apply(0, Action::Check).is_err());
        assert!(game.apply(0, Action::Call(99)).is_err());
        // state unchanged after rejections
        assert_eq!(game.pot(), 4);
        assert_eq!(game.actor(), 0);
        assert_eq!(game.history().len(), 2); // the two blinds
    }

    #[test]
    fn history_records_blinds_and_streets() {
        let mut game = heads_up();
        game.apply(0, Action::Call(2)).unwrap();
        game.apply(1, Action::Check).unwrap();
        game.apply(1, Action::Check).unwrap();
        game.apply(0, Action::Check).unwrap();
        let history = game.history();
        assert!(matches!(history[0].action, Action::Blind(1)));
        assert!(matches!(history[1].action, Action::Blind(3)));
        assert_eq!(history[2].street, Street::Pref);
        assert_eq!(history[4].street, Street::Flop);
    }

    /// Street-by-street walkthrough of a checked-down heads-up hand,
    /// pinning the betting-state fields at every step.
    #[test]
    fn history_of_checks() {
        // Blinds
        let mut game = heads_up();
        assert!(game.street() == Street::Pref);
        assert!(game.pot() == 4);
        assert!(game.bet() == 3);
        assert!(game.min_raise() == 3);
        assert!(game.actor() == 0);
        assert!(game.raiser().is_none());

        // SB completes
        game.apply(0, Action::Call(2)).unwrap();
        assert!(game.street() == Street::Pref);
        assert!(game.pot() == 6); //
        assert!(game.actor() == 1); //
        assert!(game.seat(0).acted());
        assert!(!game.seat(1).acted());

        // BB takes the option, checks
        game.apply(1, Action::Check).unwrap();
        assert!(game.street() == Street::Flop); //
        assert!(game.board().size() == 3); //
        assert!(game.pot() == 6);
        assert!(game.bet() == 0); //
        assert!(game.min_raise() == 3); //
        assert!(game.actor() == 1); // BB first postflop
        assert!(!game.seat(0).acted()); //
        assert!(!game.seat(1).acted()); //

        // Flop checks through
        game.apply(1, Action::Check).unwrap();
        assert!(game.actor() == 0);
        game.apply(0, Action::Check).unwrap();
        assert!(game.street() == Street::Turn); //
        assert!(game.board().size() == 4); //
        assert!(game.pot() == 6);

        // Turn: BB bets, SB calls
        game.apply(1, Action::Bet(6)).unwrap();
        assert!(game.bet() == 6); //
        assert!(game.min_raise() == 6); //
        assert!(game.raiser() == Some(1)); //
        assert!(game.actor() == 0);
        game.apply(0, Action::Call(6)).unwrap();
        assert!(game.street() == Street::Rive); //
        assert!(game.board().size() == 5); //
        assert!(game.pot() == 18); //
        assert!(game.bet() == 0); //

        // River checks through to showdown
        game.apply(1, Action::Check).unwrap();
        game.apply(0, Action::Check).unwrap();
        assert!(game.complete()); //
        assert!(game.street() == Street::Show); //
        assert!(!game.winners().is_empty());
        let stacks: Chips = game.seats().iter().map(Seat::stack).sum();
        assert_eq!(stacks, 600);
        // every winner revealed a ranked hand
        assert!(game.winners().iter().all(|w| w.strength.is_some()));
    }

    /// Full-ring hand: six seats, positional labels, preflop order.
    #[test]
    fn six_handed_geometry() {
        let mut game = Game::new(1, 3, Rake::none());
        for pos in 0..SEATS {
            game.occupy(pos, 300);
        }
        game.begin(&mut rng()).unwrap();
        assert_eq!(game.dealer(), 0);
        assert_eq!(game.seat(1).stake(), 1);
        assert_eq!(game.seat(2).stake(), 3);
        // UTG opens the action
        assert_eq!(game.actor(), 3);
        let spots: Vec<_> = (0..SEATS)
            .map(|p| game.seat(p).spot().unwrap().to_string())
            .collect();
        assert_eq!(spots, ["BTN", "SB", "BB", "UTG", "HJ", "CO"]);
        // everyone folds to the big blind
        for pos in [3, 4, 5, 0, 1] {
            assert_eq!(game.actor(), pos);
            game.apply(pos, game.passive(pos)).unwrap();
        }
        assert!(game.complete());
        assert_eq!(game.winners(), &[Winning { seat: 2, amount: 4, strength: None }]);
    }

    #[test]
    fn mid_hand_occupancy_keeps_conservation() {
        let mut game = heads_up();
        // a third player buys in while the hand runs, then changes their
        // mind; a fourth joins and stays
        game.occupy(3, 500);
        game.park(3, true);
        game.verify().unwrap();
        assert_eq!(game.vacate(3), 500);
        game.verify().unwrap();
        game.occupy(4, 250);
        game.park(4, true);
        game.apply(0, Action::Call(2)).unwrap();
        game.verify().unwrap();
    }

    #[test]
    fn surrender_folds_out_of_turn() {
        let mut game = three_way([200, 200, 200]);
        assert_eq!(game.actor(), 0);
        // the big blind stands up mid-hand; their blind stays in the pot
        game.surrender(2).unwrap();
        assert_eq!(game.seat(2).state(), State::Folding);
        assert_eq!(game.actor(), 0);
        let chips = game.withdraw(2);
        assert_eq!(chips, 197);
        game.verify().unwrap();
        // the hand plays on heads-up over the dead blind
        game.apply(0, Action::Fold).unwrap();
        assert!(game.complete());
        assert_eq!(game.winners()[0].seat, 1);
        assert_eq!(game.winners()[0].amount, 4);
    }

    #[test]
    fn surrender_by_actor_advances_the_hand() {
        let mut game = three_way([200, 200, 200]);
        game.surrender(0).unwrap();
        assert_eq!(game.actor(), 1);
    }

    #[test]
    fn abort_returns_all_bets() {
        let mut game = heads_up();
        game.apply(0, Action::Raise(8)).unwrap();
        game.abort();
        assert!(game.complete());
        assert_eq!(game.seat(0).stack(), 300);
        assert_eq!(game.seat(1).stack(), 300);
        assert_eq!(game.pot(), 0);
    }
}
