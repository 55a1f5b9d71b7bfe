//! Core type aliases, identifiers, and constants for the PLO game service.
//!
//! This crate provides the foundational types and configuration parameters
//! used throughout the workspace.

// ============================================================================
// TYPE ALIASES
// ============================================================================
/// Chip amounts: stacks, bets, pots, rake.
pub type Chips = i64;
/// Seat index around the table (0..SEATS).
pub type Position = usize;
/// Pot share weights and win probabilities.
pub type Probability = f64;

// ============================================================================
// TRAITS
// ============================================================================
/// Unique identifier trait for domain entities.
pub trait Unique<T = Self> {
    fn id(&self) -> ID<T>;
}

// ============================================================================
// IDENTITY TYPES
// ============================================================================
use std::cmp::Ordering;
use std::fmt::Debug;
use std::fmt::Display;
use std::fmt::Formatter;
use std::hash::Hash;
use std::hash::Hasher;
use std::marker::PhantomData;

/// Generic ID wrapper providing compile-time type safety over uuid::Uuid.
pub struct ID<T> {
    inner: uuid::Uuid,
    marker: PhantomData<T>,
}

impl<T> ID<T> {
    pub fn inner(&self) -> uuid::Uuid {
        self.inner
    }
    /// Cast ID<T> to ID<U> while preserving the underlying UUID.
    pub fn cast<U>(self) -> ID<U> {
        ID {
            inner: self.inner,
            marker: PhantomData,
        }
    }
}

impl<T> From<ID<T>> for uuid::Uuid {
    fn from(id: ID<T>) -> Self {
        id.inner()
    }
}
impl<T> From<uuid::Uuid> for ID<T> {
    fn from(inner: uuid::Uuid) -> Self {
        Self {
            inner,
            marker: PhantomData,
        }
    }
}

impl<T> Default for ID<T> {
    fn default() -> Self {
        Self {
            inner: uuid::Uuid::now_v7(),
            marker: PhantomData,
        }
    }
}

impl<T> Copy for ID<T> {}
impl<T> Clone for ID<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Eq for ID<T> {}
impl<T> PartialEq for ID<T> {
    fn eq(&self, other: &Self) -> bool {
        self.inner == other.inner
    }
}

impl<T> Ord for ID<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.inner.cmp(&other.inner)
    }
}
impl<T> PartialOrd for ID<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> Hash for ID<T> {
    fn hash<H>(&self, state: &mut H)
    where
        H: Hasher,
    {
        self.inner.hash(state);
    }
}

impl<T> Debug for ID<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("ID").field(&self.inner).finish()
    }
}
impl<T> Display for ID<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        Display::fmt(&self.inner, f)
    }
}

impl<T> serde::Serialize for ID<T> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.inner.serialize(serializer)
    }
}
impl<'de, T> serde::Deserialize<'de> for ID<T> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        uuid::Uuid::deserialize(deserializer).map(Self::from)
    }
}

/// Marker type for player identity. The service never sees credentials;
/// authentication happens upstream and hands us an opaque id.
pub struct Player;

/// Opaque identity plus display metadata for a connected player.
#[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct PlayerIdentity {
    pub id: ID<Player>,
    pub name: String,
    /// Display the name obfuscated to other players.
    pub masked: bool,
}

impl PlayerIdentity {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: ID::default(),
            name: name.into(),
            masked: false,
        }
    }
    /// The name as shown to other seats and spectators.
    pub fn shown_name(&self) -> String {
        match self.masked {
            false => self.name.clone(),
            true => {
                let mut chars = self.name.chars();
                let head = chars.next().unwrap_or('?');
                format!("{}{}", head, "*".repeat(chars.count().max(2)))
            }
        }
    }
}

impl Unique<Player> for PlayerIdentity {
    fn id(&self) -> ID<Player> {
        self.id
    }
}

// ============================================================================
// TABLE PARAMETERS
// ============================================================================
/// Number of seats at a table.
pub const SEATS: usize = 6;
/// Default small blind.
pub const S_BLIND: Chips = 1;
/// Default big blind.
pub const B_BLIND: Chips = 3;
/// Default buy-in, in big blinds.
pub const BUYIN_BBS: Chips = 100;

// ============================================================================
// TIMING
// ============================================================================
/// Time a player has to act before the default action is injected (ms).
pub const ACTION_TIMEOUT_MS: u64 = 15_000;
/// Pause between hand completion and the next deal (ms).
pub const INTER_HAND_DELAY_MS: u64 = 2_500;
/// How long a disconnected seat survives between hands before being vacated (ms).
pub const RECONNECT_GRACE_MS: u64 = 30_000;
/// How long a table may sit empty before the lobby reaps it (ms).
pub const EMPTY_TABLE_TIMEOUT_MS: u64 = 60_000;

// ============================================================================
// RAKE
// ============================================================================
/// Fraction of the pot taken on contested post-flop showdowns.
pub const RAKE_PERCENT: f64 = 0.05;
/// Rake ceiling, in big blinds.
pub const RAKE_CAP_BBS: Chips = 3;

// ============================================================================
// EQUITY
// ============================================================================
/// Monte Carlo iterations for preflop and wide-field flop equities.
pub const EQUITY_ITERATIONS: usize = 500;
/// Entrant count above which flop equity falls back to Monte Carlo.
pub const EQUITY_EXACT_FLOP_PLAYERS: usize = 3;

#[cfg(test)]
mod tests {
    use super::*;
    #[test]
    fn id_roundtrip() {
        let id = ID::<Player>::default();
        let uuid = uuid::Uuid::from(id);
        assert_eq!(ID::<Player>::from(uuid), id);
        assert_eq!(id.cast::<()>().inner(), uuid);
    }
    #[test]
    fn masked_name_hides_tail() {
        let mut identity = PlayerIdentity::new("charlie");
        assert_eq!(identity.shown_name(), "charlie");
        identity.masked = true;
        let shown = identity.shown_name();
        assert!(shown.starts_with('c'));
        assert!(!shown.contains("harlie"));
    }
}
