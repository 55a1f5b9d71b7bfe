use super::handle::TableHandle;
use super::lobby::LobbyHandle;
use super::maintenance::Maintenance;
use actix_web::HttpRequest;
use actix_web::HttpResponse;
use actix_web::web;
use futures::StreamExt;
use plo_core::BUYIN_BBS;
use plo_core::ID;
use plo_core::PlayerIdentity;
use plo_gameroom::ClientMessage;
use plo_gameroom::ServerMessage;
use plo_gameroom::TableError;
use plo_gameroom::TableKey;
use std::collections::HashMap;
use tokio::sync::mpsc;

/// Upgrades the request and spawns the per-connection pump.
///
/// Query parameters: `name` for the display name, `player` to resume a
/// prior identity (reconnect routing), `masked` to obfuscate the name
/// to other seats.
pub async fn serve(
    req: HttpRequest,
    body: web::Payload,
    query: web::Query<HashMap<String, String>>,
    lobby: web::Data<LobbyHandle>,
    maintenance: web::Data<Maintenance>,
) -> actix_web::Result<HttpResponse> {
    let (response, session, stream) = actix_ws::handle(&req, body)?;
    let mut identity = PlayerIdentity::new(
        query
            .get("name")
            .cloned()
            .unwrap_or_else(|| "guest".to_string()),
    );
    if let Some(prior) = query.get("player").and_then(|s| uuid::Uuid::parse_str(s).ok()) {
        identity.id = ID::from(prior);
    }
    identity.masked = query.get("masked").map(|v| v == "1").unwrap_or(false);
    let lobby = lobby.get_ref().clone();
    let maintenance = maintenance.get_ref().clone();
    actix_web::rt::spawn(pump(session, stream, lobby, maintenance, identity));
    Ok(response)
}

/// One connected client: bridges the WebSocket to the lobby and the
/// player's current table. Transport failures end the session; the seat
/// itself survives and plays on via timeouts until the grace window
/// runs out or the player reconnects.
async fn pump(
    mut session: actix_ws::Session,
    mut stream: actix_ws::MessageStream,
    lobby: LobbyHandle,
    maintenance: Maintenance,
    identity: PlayerIdentity,
) {
    let (conn, mut outbox) = mpsc::unbounded_channel::<ServerMessage>();
    let player = identity.id;
    let _ = conn.send(ServerMessage::Connected {
        player_id: player.to_string(),
    });
    let _ = conn.send(maintenance.announcement());
    // resume a live seat if this identity already has one
    let mut current: Option<TableHandle> = lobby.locate(player).await;
    if let Some(table) = &current {
        let _ = table.reconnect(player, conn.clone()).await;
    }
    log::debug!("[session {}] connected", player);
    'sesh: loop {
        tokio::select! {
            biased;
            message = outbox.recv() => match message {
                Some(message) => {
                    // fast-fold reseats arrive as table:change: follow them
                    if matches!(message, ServerMessage::TableChange { .. }) {
                        current = lobby.locate(player).await;
                    }
                    if session.text(message.to_json()).await.is_err() {
                        break 'sesh;
                    }
                }
                None => break 'sesh,
            },
            frame = stream.next() => match frame {
                Some(Ok(actix_ws::Message::Text(text))) => {
                    match serde_json::from_str::<ClientMessage>(&text) {
                        Ok(message) => {
                            dispatch(message, &lobby, &mut current, &identity, &conn).await;
                        }
                        Err(e) => {
                            let _ = conn.send(ServerMessage::ConnectionError {
                                message: format!("unreadable message: {}", e),
                            });
                        }
                    }
                }
                Some(Ok(actix_ws::Message::Ping(bytes))) => {
                    if session.pong(&bytes).await.is_err() {
                        break 'sesh;
                    }
                }
                Some(Ok(actix_ws::Message::Close(_))) => break 'sesh,
                Some(Err(_)) => break 'sesh,
                None => break 'sesh,
                _ => continue 'sesh,
            },
        }
    }
    if let Some(table) = &current {
        table.disconnect(player);
    }
    log::debug!("[session {}] disconnected", player);
}

async fn dispatch(
    message: ClientMessage,
    lobby: &LobbyHandle,
    current: &mut Option<TableHandle>,
    identity: &PlayerIdentity,
    conn: &plo_gameroom::Conn,
) {
    let player = identity.id;
    match message {
        ClientMessage::Join { blinds, fast_fold } => {
            let key = match TableKey::parse(&blinds, fast_fold) {
                Ok(key) => key,
                Err(e) => {
                    let _ = conn.send(ServerMessage::Error {
                        message: e.to_string(),
                    });
                    return;
                }
            };
            let buyin = key.bblind * BUYIN_BBS;
            match lobby
                .join(identity.clone(), key, buyin, Some(conn.clone()))
                .await
            {
                Ok(seating) => *current = Some(seating.table),
                Err(e) => {
                    let _ = conn.send(ServerMessage::Error {
                        message: e.to_string(),
                    });
                }
            }
        }
        ClientMessage::LeaveQueue | ClientMessage::Leave => {
            match lobby.leave(player).await {
                Ok(_) => {
                    *current = None;
                    let _ = conn.send(ServerMessage::TableLeft);
                }
                Err(TableError::NotSeated) => {
                    *current = None;
                }
                Err(e) => {
                    let _ = conn.send(ServerMessage::Error {
                        message: e.to_string(),
                    });
                }
            }
        }
        ClientMessage::Spectate { table_id } => {
            let Ok(uuid) = uuid::Uuid::parse_str(&table_id) else {
                let _ = conn.send(ServerMessage::Error {
                    message: "unknown table".into(),
                });
                return;
            };
            if let Err(e) = lobby.spectate(ID::from(uuid), conn.clone()).await {
                let _ = conn.send(ServerMessage::Error {
                    message: e.to_string(),
                });
            }
        }
        ClientMessage::FastFold => match current {
            Some(table) => {
                // rejections come back on the conn as table:error
                let _ = table.fast_fold(player).await;
            }
            None => {
                let _ = conn.send(ServerMessage::Error {
                    message: TableError::NotSeated.to_string(),
                });
            }
        },
        ClientMessage::Act { action, amount } => match current {
            Some(table) => {
                let _ = table.act(player, action, amount).await;
            }
            None => {
                let _ = conn.send(ServerMessage::Error {
                    message: TableError::NotSeated.to_string(),
                });
            }
        },
    }
}
