use super::message::ServerMessage;
use plo_core::Chips;
use plo_core::ID;
use plo_core::Player;
use plo_core::PlayerIdentity;
use tokio::sync::mpsc::UnboundedSender;

/// Outbound message channel for one connection.
pub type Conn = UnboundedSender<ServerMessage>;

/// Persistent occupancy of a table seat.
///
/// Chips live in the engine seat; this record carries identity and
/// connection state. Mutated only by the owning table's command queue.
#[derive(Debug)]
pub struct SeatInfo {
    identity: PlayerIdentity,
    buyin: Chips,
    /// Joined mid-hand; dealt in at the next hand start.
    waiting: bool,
    /// Mid-hand stand: cleared at the next safe point.
    leaving: bool,
    conn: Option<Conn>,
    /// When the connection dropped, for the reconnect grace window.
    disconnected_at: Option<u64>,
}

impl SeatInfo {
    pub fn new(identity: PlayerIdentity, buyin: Chips, conn: Option<Conn>) -> Self {
        Self {
            identity,
            buyin,
            waiting: false,
            leaving: false,
            conn,
            disconnected_at: None,
        }
    }
    pub fn id(&self) -> ID<Player> {
        self.identity.id
    }
    pub fn identity(&self) -> &PlayerIdentity {
        &self.identity
    }
    pub fn buyin(&self) -> Chips {
        self.buyin
    }
    pub fn waiting(&self) -> bool {
        self.waiting
    }
    pub fn set_waiting(&mut self, waiting: bool) {
        self.waiting = waiting;
    }
    pub fn leaving(&self) -> bool {
        self.leaving
    }
    pub fn set_leaving(&mut self) {
        self.leaving = true;
    }
    pub fn connected(&self) -> bool {
        self.conn.is_some()
    }
    pub fn disconnected_at(&self) -> Option<u64> {
        self.disconnected_at
    }
    /// Attaches a connection (sit or reconnect).
    pub fn connect(&mut self, conn: Conn) {
        self.conn = Some(conn);
        self.disconnected_at = None;
    }
    /// Drops the connection handle; the seat keeps playing via timeouts.
    pub fn disconnect(&mut self, at: u64) {
        self.conn = None;
        self.disconnected_at = Some(at);
    }
    /// Surrenders the connection handle, e.g. to carry it to another
    /// table on a fast-fold reseat.
    pub fn into_conn(self) -> Option<Conn> {
        self.conn
    }
    /// Fire-and-forget unicast. A dead channel drops the handle so the
    /// seat counts as disconnected from here on.
    pub fn send(&mut self, message: ServerMessage) {
        if let Some(conn) = &self.conn {
            if conn.send(message).is_err() {
                log::warn!("[seat] dropping dead connection for {}", self.identity.name);
                self.conn = None;
            }
        }
    }
}
