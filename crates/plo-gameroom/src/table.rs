use super::context::HandContext;
use super::error::TableError;
use super::event::Event;
use super::message::ServerMessage;
use super::protocol::Protocol;
use super::queue::Queue;
use super::queue::Serial;
use super::seat::Conn;
use super::seat::SeatInfo;
use super::timer::TimerConfig;
use super::timer::now_ms;
use super::view;
use super::view::Viewer;
use async_trait::async_trait;
use plo_bot::Personality;
use plo_bot::Style;
use plo_core::Chips;
use plo_core::ID;
use plo_core::Player;
use plo_core::PlayerIdentity;
use plo_core::Position;
use plo_core::SEATS;
use plo_cards::Street;
use plo_gameplay::Action;
use plo_gameplay::Game;
use plo_gameplay::Rake;
use plo_gameplay::State;
use plo_records::Hand as HandRecord;
use rand::SeedableRng;
use rand::rngs::SmallRng;
use tokio::sync::mpsc::UnboundedSender;
use tokio::sync::oneshot;

/// Game variant hosted by a table. The engine is parameterized enough
/// to host others; only PLO is wired up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Variant {
    Plo,
}

/// Matchmaking bucket: players join by stakes and fast-fold preference,
/// and only tables sharing the key are interchangeable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TableKey {
    pub variant: Variant,
    pub sblind: Chips,
    pub bblind: Chips,
    pub fast_fold: bool,
}

impl TableKey {
    pub fn plo(sblind: Chips, bblind: Chips, fast_fold: bool) -> Self {
        Self {
            variant: Variant::Plo,
            sblind,
            bblind,
            fast_fold,
        }
    }
    /// Parses an "sb/bb" stakes string.
    pub fn parse(blinds: &str, fast_fold: bool) -> anyhow::Result<Self> {
        let (sb, bb) = blinds
            .split_once('/')
            .ok_or_else(|| anyhow::anyhow!("blinds not sb/bb: {}", blinds))?;
        let sblind = sb.trim().parse::<Chips>()?;
        let bblind = bb.trim().parse::<Chips>()?;
        anyhow::ensure!(0 < sblind && sblind <= bblind, "bad stakes {}", blinds);
        Ok(Self::plo(sblind, bblind, fast_fold))
    }
}

impl std::fmt::Display for TableKey {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(
            f,
            "plo {}/{}{}",
            self.sblind,
            self.bblind,
            if self.fast_fold { " fast" } else { "" }
        )
    }
}

/// Table-to-lobby notifications.
#[derive(Debug)]
pub enum TableNotice {
    /// A seat emptied (stand, bust, grace expiry).
    Vacated {
        table: ID<Table>,
        player: ID<Player>,
    },
    /// A fast-folding player needs a sibling table with the same key.
    FastFolded {
        table: ID<Table>,
        identity: PlayerIdentity,
        stack: Chips,
        conn: Option<Conn>,
    },
    /// The table has sat empty past its timeout and can be reaped.
    Idle { table: ID<Table> },
}

pub type NoticeSender = UnboundedSender<TableNotice>;
pub type RecordSink = UnboundedSender<HandRecord>;
pub type Reply<T> = oneshot::Sender<Result<T, TableError>>;

/// Commands accepted by a table's serial queue.
///
/// Every externally visible mutation of table state travels through
/// here; deadline and scheduling timers enqueue commands of their own
/// rather than touching state, which makes the queue the single writer.
pub enum TableCommand {
    Sit {
        identity: PlayerIdentity,
        buyin: Chips,
        seat: Option<Position>,
        conn: Option<Conn>,
        reply: Reply<Position>,
    },
    SitBot {
        style: Style,
        buyin: Chips,
        reply: Reply<Position>,
    },
    Stand {
        player: ID<Player>,
        reply: Reply<Chips>,
    },
    Act {
        player: ID<Player>,
        action: String,
        amount: Option<Chips>,
        reply: Reply<()>,
    },
    FastFold {
        player: ID<Player>,
        reply: Reply<()>,
    },
    Spectate {
        conn: Conn,
    },
    Reconnect {
        player: ID<Player>,
        conn: Conn,
        reply: Reply<Position>,
    },
    Disconnect {
        player: ID<Player>,
    },
    /// Action deadline expiry; validated against the live decision point.
    Deadline {
        seat: Position,
        hand: u64,
        street: Street,
    },
    /// A bot seat's turn, run through the queue like any other input.
    BotTurn {
        seat: Position,
        hand: u64,
        street: Street,
    },
    /// Inter-hand delay elapsed; try to deal the next hand.
    Advance {
        hand: u64,
    },
    /// Empty-table probe.
    IdleCheck,
    Shutdown,
}

/// A pending action request and its deadline.
#[derive(Debug, Clone, Copy)]
struct Pending {
    seat: Position,
    hand: u64,
    street: Street,
    /// Wall-clock deadline, echoed into snapshots for client countdowns.
    at: u64,
    timeout_ms: u64,
}

/// One live table: six seats, one hand at a time, one writer.
///
/// The table owns its engine, its seats' identities and connections,
/// its PRNG, and its pending action request. It runs as the state of a
/// [`Queue`]; everything it does happens inside `handle`, so state
/// transitions and their broadcasts are atomic and ordered.
pub struct Table {
    id: ID<Table>,
    key: TableKey,
    game: Game,
    seats: [Option<SeatInfo>; SEATS],
    bots: [Option<Personality>; SEATS],
    spectators: Vec<Conn>,
    hand_number: u64,
    pending: Option<Pending>,
    context: Option<HandContext>,
    advance_scheduled: bool,
    timers: TimerConfig,
    rng: SmallRng,
    queue: Option<Queue<TableCommand>>,
    records: RecordSink,
    notices: NoticeSender,
    closed: bool,
}

impl Table {
    pub fn new(
        key: TableKey,
        rake: Rake,
        timers: TimerConfig,
        records: RecordSink,
        notices: NoticeSender,
        seed: u64,
    ) -> Self {
        Self {
            id: ID::default(),
            key,
            game: Game::new(key.sblind, key.bblind, rake),
            seats: Default::default(),
            bots: Default::default(),
            spectators: Vec::new(),
            hand_number: 0,
            pending: None,
            context: None,
            advance_scheduled: false,
            timers,
            rng: SmallRng::seed_from_u64(seed),
            queue: None,
            records,
            notices,
            closed: false,
        }
    }
    pub fn id(&self) -> ID<Table> {
        self.id
    }
    pub fn key(&self) -> TableKey {
        self.key
    }
}

#[async_trait]
impl Serial for Table {
    type Command = TableCommand;
    fn attach(&mut self, queue: Queue<TableCommand>) {
        self.queue = Some(queue);
    }
    async fn handle(&mut self, command: TableCommand) {
        match command {
            TableCommand::Sit {
                identity,
                buyin,
                seat,
                conn,
                reply,
            } => {
                let result = self.sit(identity, buyin, seat, conn);
                let _ = reply.send(result);
            }
            TableCommand::SitBot {
                style,
                buyin,
                reply,
            } => {
                let result = self.sit_bot(style, buyin);
                let _ = reply.send(result);
            }
            TableCommand::Stand { player, reply } => {
                let result = self.stand(player);
                let _ = reply.send(result);
            }
            TableCommand::Act {
                player,
                action,
                amount,
                reply,
            } => {
                let result = self.act(player, &action, amount);
                if let Err(e) = &result {
                    self.complain(player, e);
                }
                let _ = reply.send(result);
            }
            TableCommand::FastFold { player, reply } => {
                let result = self.fast_fold(player);
                if let Err(e) = &result {
                    self.complain(player, e);
                }
                let _ = reply.send(result);
            }
            TableCommand::Spectate { conn } => self.spectate(conn),
            TableCommand::Reconnect {
                player,
                conn,
                reply,
            } => {
                let result = self.reconnect(player, conn);
                let _ = reply.send(result);
            }
            TableCommand::Disconnect { player } => self.disconnect(player),
            TableCommand::Deadline { seat, hand, street } => self.deadline(seat, hand, street),
            TableCommand::BotTurn { seat, hand, street } => self.bot_turn(seat, hand, street),
            TableCommand::Advance { hand } => self.advance(hand),
            TableCommand::IdleCheck => self.idle_check(),
            TableCommand::Shutdown => self.shutdown(),
        }
    }
    fn done(&self) -> bool {
        self.closed
    }
    async fn finish(&mut self) {
        log::info!("[table {}] closed", self.id);
    }
}

/// Seating.
impl Table {
    fn sit(
        &mut self,
        identity: PlayerIdentity,
        buyin: Chips,
        want: Option<Position>,
        conn: Option<Conn>,
    ) -> Result<Position, TableError> {
        if self.closed {
            return Err(TableError::TableClosed);
        }
        if self.find(identity.id).is_some() {
            return Err(TableError::AlreadySeated);
        }
        let pos = match want {
            Some(p) if p >= SEATS => return Err(TableError::SeatTaken),
            Some(p) => match self.seats[p].is_none() {
                true => p,
                false => return Err(TableError::SeatTaken),
            },
            None => self
                .seats
                .iter()
                .position(|s| s.is_none())
                .ok_or(TableError::TableFull)?,
        };
        let mid_hand = !self.game.complete();
        let mut info = SeatInfo::new(identity, buyin, conn);
        info.set_waiting(mid_hand);
        self.game.occupy(pos, buyin);
        self.game.park(pos, mid_hand);
        log::info!(
            "[table {}] {} sits P{} for {}",
            self.id,
            info.identity().name,
            pos,
            buyin
        );
        self.seats[pos] = Some(info);
        self.unicast(
            pos,
            ServerMessage::TableJoined {
                table_id: self.id.to_string(),
                seat: pos,
            },
        );
        let joined = Event::PlayerJoined {
            seat: pos,
            view: self.snapshot_for(Viewer::Spectator).seats[pos]
                .clone()
                .expect("just seated"),
        };
        self.broadcast(&joined);
        self.broadcast_snapshots();
        self.maybe_deal();
        Ok(pos)
    }
    fn sit_bot(&mut self, style: Style, buyin: Chips) -> Result<Position, TableError> {
        let n = self.bots.iter().flatten().count();
        let identity = PlayerIdentity::new(format!("cpu-{}", n + 1));
        let pos = self.sit(identity, buyin, None, None)?;
        self.bots[pos] = Some(Personality::from(style));
        Ok(pos)
    }
    fn stand(&mut self, player: ID<Player>) -> Result<Chips, TableError> {
        let pos = self.find(player).ok_or(TableError::NotSeated)?;
        let state = self.game.seat(pos).state();
        let live = !self.game.complete() && state.is_live();
        if !live {
            let chips = match self.game.complete() || state == State::Sitout {
                true => self.game.vacate(pos),
                false => self.game.withdraw(pos),
            };
            self.clear_seat(pos, true);
            self.broadcast_snapshots();
            self.maybe_idle();
            return Ok(chips);
        }
        // mid-hand: fold first, withdraw the behind-stack; an all-in
        // seat stays for the runout and is cleared at the next safe point
        if state == State::Betting {
            let _ = self.game.surrender(pos);
        }
        let chips = self.game.withdraw(pos);
        match self.game.seat(pos).state() {
            State::Shoving => {
                if let Some(info) = self.seats[pos].as_mut() {
                    info.set_leaving();
                }
            }
            _ => self.clear_seat(pos, true),
        }
        self.sync();
        self.broadcast_snapshots();
        Ok(chips)
    }
    /// Removes the seat record, announcing the departure.
    fn clear_seat(&mut self, pos: Position, notify_lobby: bool) {
        if let Some(info) = self.seats[pos].take() {
            log::info!("[table {}] {} leaves P{}", self.id, info.identity().name, pos);
            let player = info.id();
            let bot = self.bots[pos].take().is_some();
            self.broadcast(&Event::PlayerLeft { seat: pos, player });
            if notify_lobby && !bot {
                let _ = self.notices.send(TableNotice::Vacated {
                    table: self.id,
                    player,
                });
            }
        }
    }
    fn find(&self, player: ID<Player>) -> Option<Position> {
        self.seats
            .iter()
            .position(|s| s.as_ref().map(|i| i.id() == player).unwrap_or(false))
    }
    fn occupied(&self) -> usize {
        self.seats.iter().flatten().count()
    }
}

/// Player input.
impl Table {
    fn act(
        &mut self,
        player: ID<Player>,
        action: &str,
        amount: Option<Chips>,
    ) -> Result<(), TableError> {
        let pos = self.find(player).ok_or(TableError::NotSeated)?;
        if self.game.complete() || self.game.actor() != pos {
            return Err(TableError::NotYourTurn);
        }
        let action = Protocol::decode(&self.game, pos, action, amount)?;
        let action = Protocol::validate(&self.game, pos, action)?;
        self.game
            .apply(pos, action)
            .map_err(|e| TableError::IllegalAction(e.to_string()))?;
        self.after_action(pos, action);
        Ok(())
    }
    fn fast_fold(&mut self, player: ID<Player>) -> Result<(), TableError> {
        if !self.key.fast_fold {
            return Err(TableError::FastFoldUnavailable);
        }
        let pos = self.find(player).ok_or(TableError::NotSeated)?;
        let state = self.game.seat(pos).state();
        let stack = match (self.game.complete(), state) {
            // between hands or never dealt in: a plain move
            (true, _) | (false, State::Sitout) => self.game.vacate(pos),
            // pre-commit only: preflop and no voluntary action yet
            (false, State::Betting) => {
                let acted = self
                    .context
                    .as_ref()
                    .map(|c| c.has_acted(&self.game, pos))
                    .unwrap_or(false);
                if self.game.street() != Street::Pref || acted {
                    return Err(TableError::FastFoldUnavailable);
                }
                let _ = self.game.surrender(pos);
                self.game.withdraw(pos)
            }
            (false, _) => return Err(TableError::FastFoldUnavailable),
        };
        let info = self.seats[pos].take().expect("found above");
        let player_id = info.id();
        log::info!(
            "[table {}] {} fast-folds P{}",
            self.id,
            info.identity().name,
            pos
        );
        self.bots[pos] = None;
        self.broadcast(&Event::PlayerLeft {
            seat: pos,
            player: player_id,
        });
        let _ = self.notices.send(TableNotice::FastFolded {
            table: self.id,
            identity: info.identity().clone(),
            stack,
            conn: info.into_conn(),
        });
        self.sync();
        self.broadcast_snapshots();
        self.maybe_idle();
        Ok(())
    }
    fn spectate(&mut self, conn: Conn) {
        let _ = conn.send(ServerMessage::Spectating {
            table_id: self.id.to_string(),
        });
        let _ = conn.send(ServerMessage::State {
            state: self.snapshot_for(Viewer::Spectator),
        });
        if !self.game.complete() {
            let _ = conn.send(ServerMessage::AllHoleCards {
                players: view::all_holes(&self.game),
            });
        }
        self.spectators.push(conn);
    }
    fn reconnect(&mut self, player: ID<Player>, conn: Conn) -> Result<Position, TableError> {
        let pos = self.find(player).ok_or(TableError::NotSeated)?;
        self.seats[pos]
            .as_mut()
            .expect("found above")
            .connect(conn);
        log::info!("[table {}] P{} reconnected", self.id, pos);
        self.unicast(
            pos,
            ServerMessage::TableJoined {
                table_id: self.id.to_string(),
                seat: pos,
            },
        );
        self.unicast(
            pos,
            ServerMessage::State {
                state: self.snapshot_for(Viewer::Seat(pos)),
            },
        );
        if !self.game.complete() {
            if let Some(hole) = self.game.seat(pos).cards() {
                let cards = hole.cards().iter().map(|c| c.to_string()).collect();
                self.unicast(pos, ServerMessage::HoleCards { cards });
            }
        }
        if let Some(pending) = self.pending.filter(|p| p.seat == pos) {
            let message = ServerMessage::ActionRequired {
                player_id: player.to_string(),
                valid_actions: Protocol::options(&self.game, pos),
                timeout_ms: pending.at.saturating_sub(now_ms()),
            };
            self.unicast(pos, message);
        }
        self.broadcast_snapshots();
        Ok(pos)
    }
    fn disconnect(&mut self, player: ID<Player>) {
        if let Some(pos) = self.find(player) {
            // the seat stays: mid-hand it acts via timeout defaults
            if let Some(info) = self.seats[pos].as_mut() {
                info.disconnect(now_ms());
            }
            log::info!("[table {}] P{} disconnected", self.id, pos);
            self.broadcast_snapshots();
        }
    }
    /// Protocol errors go back to the offender; state is untouched.
    fn complain(&mut self, player: ID<Player>, error: &TableError) {
        if let Some(pos) = self.find(player) {
            self.unicast(
                pos,
                ServerMessage::Error {
                    message: error.to_string(),
                },
            );
        }
    }
}

/// Timers.
impl Table {
    fn deadline(&mut self, seat: Position, hand: u64, street: Street) {
        if !self.due(seat, hand, street) {
            return;
        }
        let action = self.game.passive(seat);
        log::info!(
            "[table {}] P{} timed out, injecting {}",
            self.id,
            seat,
            action
        );
        match self.game.apply(seat, action) {
            Ok(()) => self.after_action(seat, action),
            Err(e) => log::error!("[table {}] default action rejected: {}", self.id, e),
        }
    }
    fn bot_turn(&mut self, seat: Position, hand: u64, street: Street) {
        if !self.due(seat, hand, street) {
            return;
        }
        let personality = match self.bots[seat] {
            Some(p) => p,
            None => return,
        };
        let action = plo_bot::decide(&self.game, seat, &personality, &mut self.rng);
        match self.game.apply(seat, action) {
            Ok(()) => self.after_action(seat, action),
            Err(e) => {
                log::error!("[table {}] bot action rejected: {}", self.id, e);
                let passive = self.game.passive(seat);
                if self.game.apply(seat, passive).is_ok() {
                    self.after_action(seat, passive);
                }
            }
        }
    }
    /// A timer event is live only if the decision point it was armed for
    /// is still the one on the clock.
    fn due(&self, seat: Position, hand: u64, street: Street) -> bool {
        !self.game.complete()
            && self.hand_number == hand
            && self.game.actor() == seat
            && self.game.street() == street
            && self.pending.map(|p| p.seat == seat).unwrap_or(false)
    }
    fn advance(&mut self, hand: u64) {
        self.advance_scheduled = false;
        if hand != self.hand_number || !self.game.complete() {
            return;
        }
        self.settle_departures();
        for pos in 0..SEATS {
            if let Some(info) = self.seats[pos].as_mut() {
                if info.waiting() {
                    info.set_waiting(false);
                    self.game.park(pos, false);
                }
            }
        }
        match self.game.eligible() >= 2 {
            true => self.start_hand(),
            false => {
                self.broadcast_snapshots();
                self.maybe_idle();
            }
        }
    }
    fn idle_check(&mut self) {
        if self.occupied() == 0 && self.game.complete() {
            let _ = self.notices.send(TableNotice::Idle { table: self.id });
        }
    }
    fn shutdown(&mut self) {
        log::info!("[table {}] shutting down", self.id);
        for pos in 0..SEATS {
            if self.seats[pos].is_some() && self.game.complete() {
                let chips = self.game.vacate(pos);
                log::info!("[table {}] returning {} chips from P{}", self.id, chips, pos);
                self.unicast(pos, ServerMessage::TableLeft);
                self.clear_seat(pos, true);
            }
        }
        self.closed = true;
    }
}

/// Hand lifecycle.
impl Table {
    /// Schedules the next deal attempt if one is not already pending.
    fn maybe_deal(&mut self) {
        if !self.game.complete() || self.advance_scheduled {
            return;
        }
        if self.game.eligible() < 2 {
            return;
        }
        self.schedule_advance();
    }
    fn schedule_advance(&mut self) {
        if self.advance_scheduled {
            return;
        }
        self.advance_scheduled = true;
        let queue = self.queue.clone().expect("attached");
        let hand = self.hand_number;
        let delay = self.timers.inter_hand;
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            queue.send(TableCommand::Advance { hand });
        });
    }
    fn start_hand(&mut self) {
        if let Err(e) = self.game.begin(&mut self.rng) {
            log::warn!("[table {}] cannot deal: {}", self.id, e);
            return;
        }
        self.hand_number += 1;
        log::info!(
            "[table {}] hand #{} dealt, dealer P{}",
            self.id,
            self.hand_number,
            self.game.dealer()
        );
        self.context = Some(HandContext::open(self.hand_number, &self.game, &self.seats));
        for pos in 0..SEATS {
            if self.seats[pos].is_none() {
                continue;
            }
            if let Some(hole) = self.game.seat(pos).cards() {
                let cards = hole.cards().iter().map(|c| c.to_string()).collect();
                self.unicast(pos, ServerMessage::HoleCards { cards });
            }
        }
        let rail = ServerMessage::AllHoleCards {
            players: view::all_holes(&self.game),
        };
        self.spectators.retain(|conn| conn.send(rail.clone()).is_ok());
        self.sync();
    }
    /// Drives the table toward its next stable point: verifies the
    /// engine, finishes settled hands, or (re)issues the action request
    /// for the seat on the clock.
    fn sync(&mut self) {
        if let Err(e) = self.game.verify() {
            log::error!("[table {}] invariant violation: {}", self.id, e);
            self.game.abort();
            self.pending = None;
            self.context = None;
            self.everyone(ServerMessage::Error {
                message: "hand aborted".into(),
            });
            self.broadcast_snapshots();
            self.schedule_advance();
            return;
        }
        if self.game.complete() {
            if self.context.is_some() {
                self.finish_hand();
            }
            return;
        }
        let actor = self.game.actor();
        let current = self
            .pending
            .map(|p| {
                p.seat == actor && p.hand == self.hand_number && p.street == self.game.street()
            })
            .unwrap_or(false);
        if !current {
            self.request_action();
        }
    }
    fn request_action(&mut self) {
        let pos = self.game.actor();
        let street = self.game.street();
        let timeout_ms = self.timers.action.as_millis() as u64;
        self.pending = Some(Pending {
            seat: pos,
            hand: self.hand_number,
            street,
            at: now_ms() + timeout_ms,
            timeout_ms,
        });
        let queue = self.queue.clone().expect("attached");
        let hand = self.hand_number;
        match self.bots[pos].is_some() {
            true => {
                queue.send(TableCommand::BotTurn { seat: pos, hand, street });
            }
            false => {
                let player = self.seats[pos].as_ref().map(|info| info.id());
                if let Some(player) = player {
                    let message = ServerMessage::ActionRequired {
                        player_id: player.to_string(),
                        valid_actions: Protocol::options(&self.game, pos),
                        timeout_ms,
                    };
                    self.unicast(pos, message);
                }
                let timeout = self.timers.action;
                tokio::spawn(async move {
                    tokio::time::sleep(timeout).await;
                    queue.send(TableCommand::Deadline { seat: pos, hand, street });
                });
            }
        }
        self.broadcast_snapshots();
    }
    fn after_action(&mut self, pos: Position, action: Action) {
        self.pending = None;
        let player = self.seats[pos].as_ref().map(|info| info.id());
        if let Some(player) = player {
            self.broadcast(&Event::ActionTaken { player, action });
        }
        // sync finishes the hand or re-issues the action request;
        // either path broadcasts the fresh snapshot
        self.sync();
    }
    fn finish_hand(&mut self) {
        self.pending = None;
        let winners = view::winners(&self.game, &self.seats);
        let showdown = self.game.winners().iter().any(|w| w.strength.is_some());
        if showdown {
            self.broadcast(&Event::Showdown {
                winners: winners.clone(),
                reveals: view::reveals(&self.game),
            });
        }
        self.broadcast(&Event::HandComplete { winners });
        if let Some(context) = self.context.take() {
            let record = context.close(self.id.cast(), &self.game);
            let _ = self.records.send(record);
        }
        for pos in 0..SEATS {
            let busted = self.seats[pos].is_some()
                && !self.game.seat(pos).away()
                && self.game.seat(pos).stack() == 0;
            if busted {
                self.unicast(
                    pos,
                    ServerMessage::Busted {
                        message: "you are out of chips".into(),
                    },
                );
                let _ = self.game.vacate(pos);
                self.clear_seat(pos, true);
            }
        }
        self.broadcast_snapshots();
        self.schedule_advance();
        self.maybe_idle();
    }
    /// Clears seats that stood mid-hand or overstayed the disconnect
    /// grace window. Runs between hands, the next safe point.
    fn settle_departures(&mut self) {
        let now = now_ms();
        let grace = self.timers.grace.as_millis() as u64;
        for pos in 0..SEATS {
            let Some(info) = self.seats[pos].as_ref() else {
                continue;
            };
            let overdue = info
                .disconnected_at()
                .map(|t| now >= t + grace)
                .unwrap_or(false);
            if info.leaving() || overdue {
                let chips = self.game.vacate(pos);
                log::info!(
                    "[table {}] returning {} chips from P{}",
                    self.id,
                    chips,
                    pos
                );
                self.clear_seat(pos, true);
            }
        }
    }
    fn maybe_idle(&mut self) {
        if self.occupied() > 0 {
            return;
        }
        let queue = self.queue.clone().expect("attached");
        let delay = self.timers.empty;
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            queue.send(TableCommand::IdleCheck);
        });
    }
}

/// Broadcast plumbing. Everything here is fire-and-forget: a dead
/// connection only ever loses itself.
impl Table {
    fn unicast(&mut self, pos: Position, message: ServerMessage) {
        if let Some(info) = self.seats[pos].as_mut() {
            info.send(message);
        }
    }
    fn everyone(&mut self, message: ServerMessage) {
        for info in self.seats.iter_mut().flatten() {
            info.send(message.clone());
        }
        self.spectators
            .retain(|conn| conn.send(message.clone()).is_ok());
    }
    fn broadcast(&mut self, event: &Event) {
        log::debug!("[table {}] broadcast: {}", self.id, event);
        self.everyone(Protocol::encode(event));
    }
    fn snapshot_for(&self, viewer: Viewer) -> super::message::GameView {
        let timeout = self.pending.map(|p| (p.at, p.timeout_ms));
        view::project(
            &self.id.to_string(),
            self.hand_number,
            &self.game,
            &self.seats,
            timeout,
            viewer,
        )
    }
    fn broadcast_snapshots(&mut self) {
        let views = (0..SEATS)
            .filter(|&pos| self.seats[pos].is_some())
            .map(|pos| (pos, self.snapshot_for(Viewer::Seat(pos))))
            .collect::<Vec<_>>();
        for (pos, state) in views {
            self.unicast(pos, ServerMessage::State { state });
        }
        if !self.spectators.is_empty() {
            let state = self.snapshot_for(Viewer::Spectator);
            self.spectators
                .retain(|conn| conn.send(ServerMessage::State { state: state.clone() }).is_ok());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tokio::sync::mpsc;
    use tokio::sync::mpsc::UnboundedReceiver;
    use tokio::time::timeout;

    struct Rig {
        queue: Queue<TableCommand>,
        records: UnboundedReceiver<HandRecord>,
        notices: UnboundedReceiver<TableNotice>,
    }

    fn rig(key: TableKey) -> Rig {
        let (records_tx, records) = mpsc::unbounded_channel();
        let (notices_tx, notices) = mpsc::unbounded_channel();
        let table = Table::new(
            key,
            Rake::none(),
            TimerConfig::fast(),
            records_tx,
            notices_tx,
            7,
        );
        Rig {
            queue: Queue::spawn(table),
            records,
            notices,
        }
    }

    async fn sit(rig: &Rig, name: &str) -> (PlayerIdentity, UnboundedReceiver<ServerMessage>, Position) {
        let identity = PlayerIdentity::new(name);
        let (conn, inbox) = mpsc::unbounded_channel();
        let (reply, result) = oneshot::channel();
        rig.queue.send(TableCommand::Sit {
            identity: identity.clone(),
            buyin: 300,
            seat: None,
            conn: Some(conn),
            reply,
        });
        let pos = result.await.unwrap().unwrap();
        (identity, inbox, pos)
    }

    async fn next_matching<F>(inbox: &mut UnboundedReceiver<ServerMessage>, mut pred: F) -> ServerMessage
    where
        F: FnMut(&ServerMessage) -> bool,
    {
        timeout(Duration::from_secs(5), async {
            loop {
                let message = inbox.recv().await.expect("channel open");
                if pred(&message) {
                    return message;
                }
            }
        })
        .await
        .expect("expected message in time")
    }

    async fn submit(
        rig: &Rig,
        player: &PlayerIdentity,
        action: &str,
        amount: Option<Chips>,
    ) -> Result<(), TableError> {
        let (reply, result) = oneshot::channel();
        rig.queue.send(TableCommand::Act {
            player: player.id,
            action: action.into(),
            amount,
            reply,
        });
        result.await.unwrap()
    }

    #[tokio::test]
    async fn two_sits_deal_a_hand() {
        let rig = rig(TableKey::plo(1, 3, false));
        let (_anna, mut anna_inbox, p0) = sit(&rig, "anna").await;
        let (_bob, _bob_inbox, p1) = sit(&rig, "bob").await;
        assert_eq!(p0, 0);
        assert_eq!(p1, 1);
        let hole = next_matching(&mut anna_inbox, |m| matches!(m, ServerMessage::HoleCards { .. })).await;
        match hole {
            ServerMessage::HoleCards { cards } => assert_eq!(cards.len(), 4),
            _ => unreachable!(),
        }
        let state = next_matching(
            &mut anna_inbox,
            |m| matches!(m, ServerMessage::State { state } if state.is_hand_in_progress),
        )
        .await;
        match state {
            ServerMessage::State { state } => {
                assert_eq!(state.pot, 4);
                assert_eq!(state.current_seat, Some(0));
                assert!(state.action_timeout_at.is_some());
            }
            _ => unreachable!(),
        }
    }

    #[tokio::test]
    async fn exactly_one_of_competing_actions_wins() {
        let rig = rig(TableKey::plo(1, 3, false));
        let (anna, mut anna_inbox, _) = sit(&rig, "anna").await;
        let (bob, _bob_inbox, _) = sit(&rig, "bob").await;
        next_matching(&mut anna_inbox, |m| {
            matches!(m, ServerMessage::ActionRequired { .. })
        })
        .await;
        // anna (button) is to act; a burst of submissions resolves FIFO
        // with exactly one winner for the decision point
        let wrong = submit(&rig, &bob, "check", None).await;
        let first = submit(&rig, &anna, "call", None).await;
        let late = submit(&rig, &anna, "call", None).await;
        assert_eq!(wrong, Err(TableError::NotYourTurn));
        assert_eq!(first, Ok(()));
        assert_eq!(late, Err(TableError::NotYourTurn));
    }

    #[tokio::test]
    async fn timeout_injects_the_default_action() {
        let rig = rig(TableKey::plo(1, 3, false));
        let (_anna, mut anna_inbox, _) = sit(&rig, "anna").await;
        let (_bob, _bob_inbox, _) = sit(&rig, "bob").await;
        // let the 40ms action clock expire: button faces a bet, folds
        let taken = next_matching(&mut anna_inbox, |m| {
            matches!(m, ServerMessage::ActionTaken { .. })
        })
        .await;
        match taken {
            ServerMessage::ActionTaken { action, .. } => assert_eq!(action, "fold"),
            _ => unreachable!(),
        }
        next_matching(&mut anna_inbox, |m| {
            matches!(m, ServerMessage::HandComplete { .. })
        })
        .await;
    }

    /// A deadline and a user action for the same decision point resolve
    /// FIFO: the one processed first wins, the other is a no-op, and the
    /// history records exactly one entry.
    #[tokio::test]
    async fn stale_deadline_is_a_no_op() {
        let mut rig = rig(TableKey::plo(1, 3, false));
        let (anna, mut anna_inbox, _) = sit(&rig, "anna").await;
        let (_bob, _bob_inbox, _) = sit(&rig, "bob").await;
        next_matching(&mut anna_inbox, |m| {
            matches!(m, ServerMessage::ActionRequired { .. })
        })
        .await;
        submit(&rig, &anna, "call", None).await.unwrap();
        // replay the deadline that was armed for anna's decision point
        rig.queue.send(TableCommand::Deadline {
            seat: 0,
            hand: 1,
            street: Street::Pref,
        });
        // the hand finishes on bob's clock; anna acted exactly once
        let record = timeout(Duration::from_secs(5), rig.records.recv())
            .await
            .unwrap()
            .unwrap();
        let annas = record
            .plays()
            .iter()
            .filter(|p| p.seat() == 0 && p.street() == "preflop" && p.action() != "blind")
            .count();
        assert_eq!(annas, 1);
    }

    #[tokio::test]
    async fn hand_record_is_emitted() {
        let mut rig = rig(TableKey::plo(1, 3, false));
        let (anna, mut anna_inbox, _) = sit(&rig, "anna").await;
        let (_bob, _bob_inbox, _) = sit(&rig, "bob").await;
        next_matching(&mut anna_inbox, |m| {
            matches!(m, ServerMessage::ActionRequired { .. })
        })
        .await;
        submit(&rig, &anna, "fold", None).await.unwrap();
        let record = timeout(Duration::from_secs(5), rig.records.recv())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(record.number(), 1);
        assert_eq!(record.pot(), 4);
        assert_eq!(record.participants().len(), 2);
        assert_eq!(record.plays().last().unwrap().action(), "fold");
    }

    #[tokio::test]
    async fn wrong_seat_gets_a_protocol_error() {
        let rig = rig(TableKey::plo(1, 3, false));
        let (_anna, mut anna_inbox, _) = sit(&rig, "anna").await;
        let (bob, mut bob_inbox, _) = sit(&rig, "bob").await;
        next_matching(&mut anna_inbox, |m| {
            matches!(m, ServerMessage::ActionRequired { .. })
        })
        .await;
        let result = submit(&rig, &bob, "check", None).await;
        assert_eq!(result, Err(TableError::NotYourTurn));
        next_matching(&mut bob_inbox, |m| matches!(m, ServerMessage::Error { .. })).await;
    }

    #[tokio::test]
    async fn disconnect_folds_by_timeout_and_reconnect_restores() {
        let rig = rig(TableKey::plo(1, 3, false));
        let (anna, mut anna_inbox, _) = sit(&rig, "anna").await;
        let (_bob, _bob_inbox, _) = sit(&rig, "bob").await;
        next_matching(&mut anna_inbox, |m| {
            matches!(m, ServerMessage::ActionRequired { .. })
        })
        .await;
        rig.queue.send(TableCommand::Disconnect { player: anna.id });
        // the hand resolves without anna: her seat folds on the clock
        let (conn, mut inbox) = mpsc::unbounded_channel();
        let (reply, result) = oneshot::channel();
        rig.queue.send(TableCommand::Reconnect {
            player: anna.id,
            conn,
            reply,
        });
        assert!(result.await.unwrap().is_ok());
        next_matching(&mut inbox, |m| matches!(m, ServerMessage::State { .. })).await;
    }

    #[tokio::test]
    async fn fast_fold_reseats_through_the_lobby() {
        let mut rig = rig(TableKey::plo(1, 3, true));
        let (anna, mut anna_inbox, _) = sit(&rig, "anna").await;
        let (_bob, _bob_inbox, _) = sit(&rig, "bob").await;
        next_matching(&mut anna_inbox, |m| {
            matches!(m, ServerMessage::ActionRequired { .. })
        })
        .await;
        let (reply, result) = oneshot::channel();
        rig.queue.send(TableCommand::FastFold {
            player: anna.id,
            reply,
        });
        assert!(result.await.unwrap().is_ok());
        let notice = timeout(Duration::from_secs(5), async {
            loop {
                match rig.notices.recv().await.expect("notices open") {
                    TableNotice::FastFolded { identity, stack, .. } => return (identity, stack),
                    _ => continue,
                }
            }
        })
        .await
        .unwrap();
        assert_eq!(notice.0.id, anna.id);
        // the posted blind stays behind
        assert_eq!(notice.1, 299);
    }

    #[tokio::test]
    async fn fast_fold_requires_a_fast_table() {
        let rig = rig(TableKey::plo(1, 3, false));
        let (anna, _inbox, _) = sit(&rig, "anna").await;
        let (reply, result) = oneshot::channel();
        rig.queue.send(TableCommand::FastFold {
            player: anna.id,
            reply,
        });
        assert_eq!(result.await.unwrap(), Err(TableError::FastFoldUnavailable));
    }

    #[tokio::test]
    async fn bots_play_hands_to_completion() {
        let mut rig = rig(TableKey::plo(1, 3, false));
        for _ in 0..3 {
            let (reply, result) = oneshot::channel();
            rig.queue.send(TableCommand::SitBot {
                style: Style::Balanced,
                buyin: 300,
                reply,
            });
            result.await.unwrap().unwrap();
        }
        // hands deal and resolve on their own
        let record = timeout(Duration::from_secs(10), rig.records.recv())
            .await
            .expect("bots finish a hand")
            .unwrap();
        assert_eq!(record.participants().len(), 3);
        let profits: Chips = record.participants().iter().map(|p| p.profit()).sum();
        assert_eq!(profits + record.rake(), 0);
    }

    #[tokio::test]
    async fn spectators_see_state_but_not_a_seat() {
        let rig = rig(TableKey::plo(1, 3, false));
        let (_anna, _anna_inbox, _) = sit(&rig, "anna").await;
        let (_bob, _bob_inbox, _) = sit(&rig, "bob").await;
        let (conn, mut inbox) = mpsc::unbounded_channel();
        rig.queue.send(TableCommand::Spectate { conn });
        next_matching(&mut inbox, |m| matches!(m, ServerMessage::Spectating { .. })).await;
        let state = next_matching(&mut inbox, |m| matches!(m, ServerMessage::State { .. })).await;
        match state {
            ServerMessage::State { state } => {
                assert!(state.seats.iter().flatten().all(|s| s.cards.is_none()));
            }
            _ => unreachable!(),
        }
    }
}
