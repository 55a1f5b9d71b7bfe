use plo_core::Chips;
use plo_core::ID;
use plo_core::Player;
use plo_core::PlayerIdentity;
use plo_core::Position;
use plo_bot::Style;
use plo_gameplay::Rake;
use plo_gameroom::Conn;
use plo_gameroom::NoticeSender;
use plo_gameroom::Queue;
use plo_gameroom::RecordSink;
use plo_gameroom::Table;
use plo_gameroom::TableCommand;
use plo_gameroom::TableError;
use plo_gameroom::TableKey;
use plo_gameroom::TimerConfig;
use tokio::sync::oneshot;

/// A cheap, cloneable reference to a running table actor.
///
/// All methods enqueue commands; the round-trip completes when the
/// table's queue processes them. A closed table answers every call
/// with [`TableError::TableClosed`].
#[derive(Clone)]
pub struct TableHandle {
    id: ID<Table>,
    key: TableKey,
    queue: Queue<TableCommand>,
}

impl TableHandle {
    /// Builds the table actor and its queue.
    pub fn spawn(
        key: TableKey,
        rake: Rake,
        timers: TimerConfig,
        records: RecordSink,
        notices: NoticeSender,
        seed: u64,
    ) -> Self {
        let table = Table::new(key, rake, timers, records, notices, seed);
        let id = table.id();
        let queue = Queue::spawn(table);
        log::info!("[lobby] opened table {} ({})", id, key);
        Self { id, key, queue }
    }
    pub fn id(&self) -> ID<Table> {
        self.id
    }
    pub fn key(&self) -> TableKey {
        self.key
    }

    async fn round_trip<T>(
        &self,
        build: impl FnOnce(oneshot::Sender<Result<T, TableError>>) -> TableCommand,
    ) -> Result<T, TableError> {
        let (reply, result) = oneshot::channel();
        if !self.queue.send(build(reply)) {
            return Err(TableError::TableClosed);
        }
        result.await.map_err(|_| TableError::TableClosed)?
    }

    pub async fn sit(
        &self,
        identity: PlayerIdentity,
        buyin: Chips,
        seat: Option<Position>,
        conn: Option<Conn>,
    ) -> Result<Position, TableError> {
        self.round_trip(|reply| TableCommand::Sit {
            identity,
            buyin,
            seat,
            conn,
            reply,
        })
        .await
    }
    pub async fn sit_bot(&self, style: Style, buyin: Chips) -> Result<Position, TableError> {
        self.round_trip(|reply| TableCommand::SitBot {
            style,
            buyin,
            reply,
        })
        .await
    }
    pub async fn stand(&self, player: ID<Player>) -> Result<Chips, TableError> {
        self.round_trip(|reply| TableCommand::Stand { player, reply })
            .await
    }
    pub async fn act(
        &self,
        player: ID<Player>,
        action: String,
        amount: Option<Chips>,
    ) -> Result<(), TableError> {
        self.round_trip(|reply| TableCommand::Act {
            player,
            action,
            amount,
            reply,
        })
        .await
    }
    pub async fn fast_fold(&self, player: ID<Player>) -> Result<(), TableError> {
        self.round_trip(|reply| TableCommand::FastFold { player, reply })
            .await
    }
    pub async fn reconnect(&self, player: ID<Player>, conn: Conn) -> Result<Position, TableError> {
        self.round_trip(|reply| TableCommand::Reconnect {
            player,
            conn,
            reply,
        })
        .await
    }
    pub fn spectate(&self, conn: Conn) {
        self.queue.send(TableCommand::Spectate { conn });
    }
    pub fn disconnect(&self, player: ID<Player>) {
        self.queue.send(TableCommand::Disconnect { player });
    }
    pub fn shutdown(&self) {
        self.queue.send(TableCommand::Shutdown);
    }
}
