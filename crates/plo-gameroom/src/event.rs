use super::message::RevealView;
use super::message::SeatView;
use super::message::WinnerView;
use plo_core::ID;
use plo_core::Player;
use plo_core::Position;
use plo_gameplay::Action;

/// Events a table emits uniformly to everyone at it.
///
/// Per-recipient payloads (snapshots, hole cards, action requests) are
/// built by the view projection instead; this enum covers the shared
/// announcements, and [`Protocol`](crate::Protocol) turns them into wire
/// messages.
#[derive(Clone, Debug)]
pub enum Event {
    PlayerJoined {
        seat: Position,
        view: SeatView,
    },
    PlayerLeft {
        seat: Position,
        player: ID<Player>,
    },
    ActionTaken {
        player: ID<Player>,
        action: Action,
    },
    Showdown {
        winners: Vec<WinnerView>,
        reveals: Vec<RevealView>,
    },
    HandComplete {
        winners: Vec<WinnerView>,
    },
}

impl std::fmt::Display for Event {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Event::PlayerJoined { seat, view } => write!(f, "P{} joined: {}", seat, view.name),
            Event::PlayerLeft { seat, .. } => write!(f, "P{} left", seat),
            Event::ActionTaken { action, .. } => write!(f, "{}", action),
            Event::Showdown { winners, .. } => write!(f, "showdown, {} winners", winners.len()),
            Event::HandComplete { winners } => {
                write!(f, "hand complete, {} winners", winners.len())
            }
        }
    }
}
