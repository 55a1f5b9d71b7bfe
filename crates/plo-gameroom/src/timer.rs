use plo_core::ACTION_TIMEOUT_MS;
use plo_core::EMPTY_TABLE_TIMEOUT_MS;
use plo_core::INTER_HAND_DELAY_MS;
use plo_core::RECONNECT_GRACE_MS;
use std::time::Duration;
use std::time::SystemTime;
use std::time::UNIX_EPOCH;

/// Configuration for table timing.
#[derive(Debug, Clone, Copy)]
pub struct TimerConfig {
    /// Time a seat has to act before the default action is injected.
    pub action: Duration,
    /// Pause between hand completion and the next deal.
    pub inter_hand: Duration,
    /// How long a disconnected seat survives between hands.
    pub grace: Duration,
    /// How long an empty table lingers before the lobby reaps it.
    pub empty: Duration,
}

impl Default for TimerConfig {
    fn default() -> Self {
        Self {
            action: Duration::from_millis(ACTION_TIMEOUT_MS),
            inter_hand: Duration::from_millis(INTER_HAND_DELAY_MS),
            grace: Duration::from_millis(RECONNECT_GRACE_MS),
            empty: Duration::from_millis(EMPTY_TABLE_TIMEOUT_MS),
        }
    }
}

impl TimerConfig {
    /// Near-immediate timings for actor tests. The action clock leaves
    /// room for a test to race it deliberately.
    pub fn fast() -> Self {
        Self {
            action: Duration::from_millis(150),
            inter_hand: Duration::from_millis(10),
            grace: Duration::from_millis(100),
            empty: Duration::from_millis(200),
        }
    }
}

/// Wall-clock milliseconds since the Unix epoch, for client countdowns.
pub fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
