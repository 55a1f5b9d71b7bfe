use super::handle::TableHandle;
use async_trait::async_trait;
use plo_core::Chips;
use plo_core::ID;
use plo_core::Player;
use plo_core::PlayerIdentity;
use plo_core::Position;
use plo_gameplay::Rake;
use plo_gameroom::Conn;
use plo_gameroom::NoticeSender;
use plo_gameroom::Queue;
use plo_gameroom::RecordSink;
use plo_gameroom::Serial;
use plo_gameroom::ServerMessage;
use plo_gameroom::Table;
use plo_gameroom::TableError;
use plo_gameroom::TableKey;
use plo_gameroom::TableNotice;
use plo_gameroom::TimerConfig;
use rand::Rng;
use rand::SeedableRng;
use rand::rngs::SmallRng;
use std::collections::HashMap;
use tokio::sync::mpsc;
use tokio::sync::oneshot;

/// Where a join landed.
#[derive(Clone)]
pub struct Seating {
    pub table: TableHandle,
    pub seat: Position,
}

/// Commands accepted by the lobby's serial queue.
pub enum LobbyCommand {
    Join {
        identity: PlayerIdentity,
        key: TableKey,
        buyin: Chips,
        conn: Option<Conn>,
        reply: oneshot::Sender<Result<Seating, TableError>>,
    },
    Leave {
        player: ID<Player>,
        reply: oneshot::Sender<Result<Chips, TableError>>,
    },
    Locate {
        player: ID<Player>,
        reply: oneshot::Sender<Option<TableHandle>>,
    },
    Spectate {
        table: ID<Table>,
        conn: Conn,
        reply: oneshot::Sender<Result<(), TableError>>,
    },
    Notice(TableNotice),
}

/// The matchmaker: buckets joiners by table key and fills tables.
///
/// Driven by its own serial queue, so pool membership has a single
/// writer. Invariants: no table exceeds six seats (the table enforces
/// its own capacity), an identity is seated at no more than one table,
/// and empty tables are reaped after their idle timeout.
pub struct Lobby {
    tables: HashMap<ID<Table>, TableHandle>,
    pools: HashMap<TableKey, Vec<ID<Table>>>,
    seated: HashMap<ID<Player>, ID<Table>>,
    records: RecordSink,
    notices: NoticeSender,
    timers: TimerConfig,
    rake: Rake,
    rng: SmallRng,
}

impl Lobby {
    /// Spawns the lobby actor plus the notice pump that feeds table
    /// notifications back into the lobby queue.
    pub fn spawn(
        records: RecordSink,
        rake: Rake,
        timers: TimerConfig,
        seed: u64,
    ) -> LobbyHandle {
        let (notices, mut notice_rx) = mpsc::unbounded_channel();
        let lobby = Self {
            tables: HashMap::new(),
            pools: HashMap::new(),
            seated: HashMap::new(),
            records,
            notices,
            timers,
            rake,
            rng: SmallRng::seed_from_u64(seed),
        };
        let queue = Queue::spawn(lobby);
        let pump = queue.clone();
        tokio::spawn(async move {
            while let Some(notice) = notice_rx.recv().await {
                if !pump.send(LobbyCommand::Notice(notice)) {
                    break;
                }
            }
        });
        LobbyHandle { queue }
    }

    /// Seats a player on some table with the key, excluding one table
    /// (the fast-fold origin), opening a new table when none fit.
    async fn place(
        &mut self,
        identity: PlayerIdentity,
        key: TableKey,
        buyin: Chips,
        conn: Option<Conn>,
        exclude: Option<ID<Table>>,
    ) -> Result<Seating, TableError> {
        if self.seated.contains_key(&identity.id) {
            return Err(TableError::AlreadySeated);
        }
        let candidates = self
            .pools
            .get(&key)
            .map(|ids| ids.clone())
            .unwrap_or_default();
        for id in candidates {
            if Some(id) == exclude {
                continue;
            }
            let Some(handle) = self.tables.get(&id) else {
                continue;
            };
            match handle.sit(identity.clone(), buyin, None, conn.clone()).await {
                Ok(seat) => {
                    self.seated.insert(identity.id, id);
                    return Ok(Seating {
                        table: handle.clone(),
                        seat,
                    });
                }
                Err(TableError::TableFull) | Err(TableError::AlreadySeated) => continue,
                Err(TableError::TableClosed) => {
                    self.forget(id);
                    continue;
                }
                Err(e) => return Err(e),
            }
        }
        let handle = TableHandle::spawn(
            key,
            self.rake,
            self.timers,
            self.records.clone(),
            self.notices.clone(),
            self.rng.random(),
        );
        let id = handle.id();
        self.tables.insert(id, handle.clone());
        self.pools.entry(key).or_default().push(id);
        let seat = handle.sit(identity.clone(), buyin, None, conn).await?;
        self.seated.insert(identity.id, id);
        Ok(Seating {
            table: handle,
            seat,
        })
    }

    fn locate(&self, player: ID<Player>) -> Option<TableHandle> {
        let table = self.seated.get(&player)?;
        self.tables.get(table).cloned()
    }

    async fn leave(&mut self, player: ID<Player>) -> Result<Chips, TableError> {
        let handle = self.locate(player).ok_or(TableError::NotSeated)?;
        let chips = handle.stand(player).await?;
        self.seated.remove(&player);
        Ok(chips)
    }

    fn forget(&mut self, id: ID<Table>) {
        if let Some(handle) = self.tables.remove(&id) {
            if let Some(pool) = self.pools.get_mut(&handle.key()) {
                pool.retain(|t| *t != id);
            }
        }
        self.seated.retain(|_, t| *t != id);
    }

    async fn notice(&mut self, notice: TableNotice) {
        match notice {
            TableNotice::Vacated { player, table } => {
                // only drop the mapping if it still points at that table
                if self.seated.get(&player) == Some(&table) {
                    self.seated.remove(&player);
                }
            }
            TableNotice::FastFolded {
                table,
                identity,
                stack,
                conn,
            } => {
                self.seated.remove(&identity.id);
                let key = match self.tables.get(&table) {
                    Some(handle) => handle.key(),
                    None => return,
                };
                let announce = conn.clone();
                match self
                    .place(identity.clone(), key, stack, conn, Some(table))
                    .await
                {
                    Ok(seating) => {
                        log::info!(
                            "[lobby] fast-fold reseated {} onto {}",
                            identity.name,
                            seating.table.id()
                        );
                        if let Some(conn) = announce {
                            let _ = conn.send(ServerMessage::TableChange {
                                table_id: seating.table.id().to_string(),
                                seat: seating.seat,
                            });
                        }
                    }
                    Err(e) => {
                        log::warn!("[lobby] fast-fold reseat failed: {}", e);
                        if let Some(conn) = announce {
                            let _ = conn.send(ServerMessage::Error {
                                message: e.to_string(),
                            });
                        }
                    }
                }
            }
            TableNotice::Idle { table } => {
                if let Some(handle) = self.tables.get(&table) {
                    log::info!("[lobby] reaping idle table {}", table);
                    handle.shutdown();
                }
                self.forget(table);
            }
        }
    }
}

#[async_trait]
impl Serial for Lobby {
    type Command = LobbyCommand;
    async fn handle(&mut self, command: LobbyCommand) {
        match command {
            LobbyCommand::Join {
                identity,
                key,
                buyin,
                conn,
                reply,
            } => {
                let result = self.place(identity, key, buyin, conn, None).await;
                let _ = reply.send(result);
            }
            LobbyCommand::Leave { player, reply } => {
                let result = self.leave(player).await;
                let _ = reply.send(result);
            }
            LobbyCommand::Locate { player, reply } => {
                let _ = reply.send(self.locate(player));
            }
            LobbyCommand::Spectate { table, conn, reply } => {
                let result = match self.tables.get(&table) {
                    Some(handle) => {
                        handle.spectate(conn);
                        Ok(())
                    }
                    None => Err(TableError::TableClosed),
                };
                let _ = reply.send(result);
            }
            LobbyCommand::Notice(notice) => self.notice(notice).await,
        }
    }
}

/// Cloneable reference to the lobby actor.
#[derive(Clone)]
pub struct LobbyHandle {
    queue: Queue<LobbyCommand>,
}

impl LobbyHandle {
    pub async fn join(
        &self,
        identity: PlayerIdentity,
        key: TableKey,
        buyin: Chips,
        conn: Option<Conn>,
    ) -> Result<Seating, TableError> {
        let (reply, result) = oneshot::channel();
        self.queue.send(LobbyCommand::Join {
            identity,
            key,
            buyin,
            conn,
            reply,
        });
        result.await.map_err(|_| TableError::TableClosed)?
    }
    pub async fn leave(&self, player: ID<Player>) -> Result<Chips, TableError> {
        let (reply, result) = oneshot::channel();
        self.queue.send(LobbyCommand::Leave { player, reply });
        result.await.map_err(|_| TableError::TableClosed)?
    }
    pub async fn locate(&self, player: ID<Player>) -> Option<TableHandle> {
        let (reply, result) = oneshot::channel();
        self.queue.send(LobbyCommand::Locate { player, reply });
        result.await.ok().flatten()
    }
    pub async fn spectate(&self, table: ID<Table>, conn: Conn) -> Result<(), TableError> {
        let (reply, result) = oneshot::channel();
        self.queue.send(LobbyCommand::Spectate {
            table,
            conn,
            reply,
        });
        result.await.map_err(|_| TableError::TableClosed)?
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use plo_core::SEATS;
    use std::time::Duration;
    use tokio::time::timeout;

    fn lobby() -> (LobbyHandle, mpsc::UnboundedReceiver<plo_records::Hand>) {
        let (records, record_rx) = mpsc::unbounded_channel();
        (
            Lobby::spawn(records, Rake::none(), TimerConfig::fast(), 11),
            record_rx,
        )
    }

    fn conn() -> (Conn, mpsc::UnboundedReceiver<ServerMessage>) {
        mpsc::unbounded_channel()
    }

    #[tokio::test]
    async fn joiners_with_one_key_share_a_table() {
        let (lobby, _records) = lobby();
        let key = TableKey::plo(1, 3, false);
        let a = lobby
            .join(PlayerIdentity::new("anna"), key, 300, None)
            .await
            .unwrap();
        let b = lobby
            .join(PlayerIdentity::new("bob"), key, 300, None)
            .await
            .unwrap();
        assert_eq!(a.table.id(), b.table.id());
        assert_ne!(a.seat, b.seat);
    }

    #[tokio::test]
    async fn different_keys_get_different_tables() {
        let (lobby, _records) = lobby();
        let a = lobby
            .join(PlayerIdentity::new("anna"), TableKey::plo(1, 3, false), 300, None)
            .await
            .unwrap();
        let b = lobby
            .join(PlayerIdentity::new("bob"), TableKey::plo(5, 10, false), 1000, None)
            .await
            .unwrap();
        assert_ne!(a.table.id(), b.table.id());
    }

    #[tokio::test]
    async fn seventh_joiner_overflows_to_a_new_table() {
        let (lobby, _records) = lobby();
        let key = TableKey::plo(1, 3, false);
        let mut tables = Vec::new();
        for i in 0..SEATS + 1 {
            let seating = lobby
                .join(PlayerIdentity::new(format!("p{}", i)), key, 300, None)
                .await
                .unwrap();
            tables.push(seating.table.id());
        }
        let first = tables[0];
        assert!(tables[..SEATS].iter().all(|t| *t == first));
        assert_ne!(tables[SEATS], first);
    }

    #[tokio::test]
    async fn double_join_is_rejected() {
        let (lobby, _records) = lobby();
        let key = TableKey::plo(1, 3, false);
        let anna = PlayerIdentity::new("anna");
        lobby.join(anna.clone(), key, 300, None).await.unwrap();
        let dup = lobby.join(anna, key, 300, None).await;
        assert!(matches!(dup, Err(TableError::AlreadySeated)));
    }

    #[tokio::test]
    async fn leave_frees_the_identity() {
        let (lobby, _records) = lobby();
        let key = TableKey::plo(1, 3, false);
        let anna = PlayerIdentity::new("anna");
        lobby.join(anna.clone(), key, 300, None).await.unwrap();
        let chips = lobby.leave(anna.id).await.unwrap();
        assert_eq!(chips, 300);
        // free to join again
        lobby.join(anna, key, 300, None).await.unwrap();
    }

    /// Fast-fold reseat: the folder moves to a sibling table with the
    /// same key, never back onto the origin, with no duplicate seating.
    #[tokio::test]
    async fn fast_fold_reseats_on_a_sibling_table() {
        let (lobby, _records) = lobby();
        let key = TableKey::plo(1, 3, true);
        let anna = PlayerIdentity::new("anna");
        let bob = PlayerIdentity::new("bob");
        let (anna_conn, mut anna_inbox) = conn();
        let a = lobby
            .join(anna.clone(), key, 300, Some(anna_conn))
            .await
            .unwrap();
        let b = lobby.join(bob.clone(), key, 300, None).await.unwrap();
        assert_eq!(a.table.id(), b.table.id());
        let origin = a.table.id();
        // wait for the hand to deal so the fast-fold is a real fold
        timeout(Duration::from_secs(5), async {
            loop {
                match anna_inbox.recv().await.expect("open") {
                    ServerMessage::HoleCards { .. } => break,
                    _ => continue,
                }
            }
        })
        .await
        .unwrap();
        a.table.fast_fold(anna.id).await.unwrap();
        // the lobby reseats her; the client hears table:change
        let change = timeout(Duration::from_secs(5), async {
            loop {
                match anna_inbox.recv().await.expect("open") {
                    ServerMessage::TableChange { table_id, .. } => return table_id,
                    _ => continue,
                }
            }
        })
        .await
        .unwrap();
        assert_ne!(change, origin.to_string());
        let reseated = lobby.locate(anna.id).await.expect("seated somewhere");
        assert_ne!(reseated.id(), origin);
        // exactly one seat: joining again is rejected
        assert!(matches!(
            lobby.join(anna, key, 300, None).await,
            Err(TableError::AlreadySeated)
        ));
        // a second fast-folder lands on the same sibling and play resumes
        timeout(Duration::from_secs(5), async {
            b.table.fast_fold(bob.id).await.unwrap();
        })
        .await
        .unwrap();
        tokio::time::sleep(Duration::from_millis(50)).await;
        let bob_table = lobby.locate(bob.id).await.expect("reseated");
        assert_eq!(bob_table.id(), reseated.id());
    }
}
