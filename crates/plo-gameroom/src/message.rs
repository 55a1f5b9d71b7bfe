use plo_core::Chips;
use plo_core::Position;
use serde::Deserialize;
use serde::Serialize;

/// Messages sent from server to client.
///
/// Tagged with the event names of the client protocol; serialization to
/// JSON happens at the transport edge. Snapshots are per-recipient (see
/// [`GameView`](crate::GameView)); everything else is uniform.
#[derive(Clone, Debug, Serialize)]
#[serde(tag = "type")]
pub enum ServerMessage {
    #[serde(rename = "connection:established", rename_all = "camelCase")]
    Connected { player_id: String },
    #[serde(rename = "connection:error")]
    ConnectionError { message: String },
    #[serde(rename = "table:joined", rename_all = "camelCase")]
    TableJoined { table_id: String, seat: Position },
    #[serde(rename = "table:left")]
    TableLeft,
    /// Fast-fold reseat onto a sibling table.
    #[serde(rename = "table:change", rename_all = "camelCase")]
    TableChange { table_id: String, seat: Position },
    #[serde(rename = "table:busted")]
    Busted { message: String },
    #[serde(rename = "table:error")]
    Error { message: String },
    #[serde(rename = "table:player_joined")]
    PlayerJoined { seat: Position, player: SeatView },
    #[serde(rename = "table:player_left", rename_all = "camelCase")]
    PlayerLeft { seat: Position, player_id: String },
    #[serde(rename = "game:state")]
    State { state: GameView },
    /// Only to the seat that holds them.
    #[serde(rename = "game:hole_cards")]
    HoleCards { cards: Vec<String> },
    #[serde(rename = "game:action_required", rename_all = "camelCase")]
    ActionRequired {
        player_id: String,
        valid_actions: Vec<ActionOption>,
        timeout_ms: u64,
    },
    #[serde(rename = "game:action_taken", rename_all = "camelCase")]
    ActionTaken {
        player_id: String,
        action: String,
        amount: Chips,
    },
    #[serde(rename = "game:showdown")]
    Showdown {
        winners: Vec<WinnerView>,
        players: Vec<RevealView>,
    },
    #[serde(rename = "game:hand_complete")]
    HandComplete { winners: Vec<WinnerView> },
    #[serde(rename = "table:spectating", rename_all = "camelCase")]
    Spectating { table_id: String },
    /// Spectators see every dealt hand.
    #[serde(rename = "game:all_hole_cards")]
    AllHoleCards { players: Vec<RevealView> },
    #[serde(rename = "maintenance:status", rename_all = "camelCase")]
    Maintenance {
        is_active: bool,
        message: String,
        activated_at: Option<u64>,
    },
}

impl ServerMessage {
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).expect("serialize server message")
    }
}

/// Messages received from clients.
#[derive(Clone, Debug, Deserialize)]
#[serde(tag = "type")]
pub enum ClientMessage {
    #[serde(rename = "matchmaking:join", rename_all = "camelCase")]
    Join {
        /// Stakes as "sb/bb", e.g. "1/3".
        blinds: String,
        #[serde(default)]
        fast_fold: bool,
    },
    #[serde(rename = "matchmaking:leave")]
    LeaveQueue,
    #[serde(rename = "table:leave")]
    Leave,
    #[serde(rename = "table:spectate", rename_all = "camelCase")]
    Spectate { table_id: String },
    #[serde(rename = "game:fast_fold")]
    FastFold,
    #[serde(rename = "game:action")]
    Act {
        action: String,
        #[serde(default)]
        amount: Option<Chips>,
    },
}

// ============================================================================
// PROJECTED VIEWS
// ============================================================================

/// One seat as shown to a recipient. `cards` is present only for the
/// recipient's own seat while a hand is live.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SeatView {
    pub seat: Position,
    pub player_id: String,
    pub name: String,
    pub stack: Chips,
    pub bet: Chips,
    pub folded: bool,
    pub all_in: bool,
    pub sitting_out: bool,
    pub connected: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cards: Option<Vec<String>>,
}

/// One side-pot tier with seat-index eligibility.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PotView {
    pub amount: Chips,
    pub eligible: Vec<Position>,
}

/// The full projected game state for one recipient.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GameView {
    pub table_id: String,
    pub hand_number: u64,
    pub seats: Vec<Option<SeatView>>,
    pub board: Vec<String>,
    pub pot: Chips,
    pub side_pots: Vec<PotView>,
    pub current_seat: Option<Position>,
    pub current_bet: Chips,
    pub min_raise: Chips,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action_timeout_at: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action_timeout_ms: Option<u64>,
    pub is_hand_in_progress: bool,
}

/// An available action with its amount bounds.
#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ActionOption {
    pub action: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_amount: Option<Chips>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_amount: Option<Chips>,
}

/// A winner's credit at hand end.
#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct WinnerView {
    pub player_id: String,
    pub seat: Position,
    pub amount: Chips,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hand_name: Option<String>,
}

/// A seat's cards revealed at showdown or to spectators.
#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RevealView {
    pub seat_index: Position,
    pub cards: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hand_name: Option<String>,
}
