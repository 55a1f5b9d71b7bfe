//! Matchmaking lobby and WebSocket hosting for PLO tables.
//!
//! This crate is the service's outer shell: it buckets joining players
//! into tables by stakes and fast-fold preference, bridges WebSocket
//! connections to table actors, and reaps tables nobody sits at.
//!
//! ## Core Types
//!
//! - [`Lobby`] / [`LobbyHandle`] — the matchmaker actor and its handle
//! - [`TableHandle`] — command access to a running table
//! - [`Maintenance`] — process-wide maintenance announcements
//!
//! ## HTTP surface
//!
//! [`routes`] mounts `/ws` (the game protocol), `/healthz`, and
//! `/maintenance` onto an actix-web app.
mod handle;
mod lobby;
mod maintenance;
mod routes;
mod session;

pub use handle::*;
pub use lobby::*;
pub use maintenance::*;
pub use routes::*;
pub use session::*;
