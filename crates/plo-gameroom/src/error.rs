/// Rejections surfaced to clients as `table:error`.
///
/// Protocol errors never mutate table state and are never retried by
/// the server; the client must re-issue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableError {
    NotSeated,
    AlreadySeated,
    SeatTaken,
    TableFull,
    NotYourTurn,
    /// Unknown action kind or missing amount.
    InvalidAction(String),
    /// Well-formed but not legal in the current state.
    IllegalAction(String),
    FastFoldUnavailable,
    TableClosed,
}

impl std::fmt::Display for TableError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotSeated => write!(f, "not seated at this table"),
            Self::AlreadySeated => write!(f, "already seated"),
            Self::SeatTaken => write!(f, "seat is taken"),
            Self::TableFull => write!(f, "table is full"),
            Self::NotYourTurn => write!(f, "not your turn"),
            Self::InvalidAction(s) => write!(f, "invalid action: {}", s),
            Self::IllegalAction(s) => write!(f, "illegal action: {}", s),
            Self::FastFoldUnavailable => write!(f, "fast-fold not available"),
            Self::TableClosed => write!(f, "table closed"),
        }
    }
}

impl std::error::Error for TableError {}
