//! The game worker owns every room and every connection's session. Commands
//! are handled one at a time on a single task, so a room never sees two
//! actions interleaved and no locking is needed.

use std::collections::HashMap;

use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info, warn};

use crate::{
    app_metrics::{metrics_labels, Metrics},
    config::RoomConfig,
    game::{GameError, Notifications, Recipient},
    models::{ClientMessage, ServerMessage, ServerStats},
    state::{PlayerId, RoomKey, RoomRegistry},
};

pub const MAX_NAME_LEN: usize = 24;
pub const DEFAULT_HOST_NAME: &str = "Host";
pub const DEFAULT_GUEST_NAME: &str = "Anonymous";

pub type Outbox = mpsc::UnboundedSender<ServerMessage>;

#[derive(Debug)]
pub enum Command {
    Connect {
        id: PlayerId,
        outbox: Outbox,
    },
    Action {
        id: PlayerId,
        message: ClientMessage,
    },
    Disconnect {
        id: PlayerId,
    },
    /// Sends a message straight back to one connection, keeping it in line
    /// with everything else queued for it.
    Reply {
        id: PlayerId,
        message: ServerMessage,
    },
    Stats {
        reply: oneshot::Sender<ServerStats>,
    },
}

/// Cheap, cloneable sender side of the worker.
#[derive(Clone)]
pub struct GameHandle {
    tx: mpsc::UnboundedSender<Command>,
}

impl GameHandle {
    /// Registers a new connection and returns the stream of messages for it.
    pub fn connect(&self, id: PlayerId) -> mpsc::UnboundedReceiver<ServerMessage> {
        let (outbox, inbox) = mpsc::unbounded_channel();
        self.send(Command::Connect { id, outbox });
        inbox
    }

    pub fn act(&self, id: PlayerId, message: ClientMessage) {
        self.send(Command::Action { id, message });
    }

    pub fn disconnect(&self, id: PlayerId) {
        self.send(Command::Disconnect { id });
    }

    pub fn reply(&self, id: PlayerId, message: ServerMessage) {
        self.send(Command::Reply { id, message });
    }

    pub async fn stats(&self) -> Option<ServerStats> {
        let (reply, rx) = oneshot::channel();
        self.send(Command::Stats { reply });
        rx.await.ok()
    }

    fn send(&self, command: Command) {
        if self.tx.send(command).is_err() {
            warn!("Game worker is gone, dropping command");
        }
    }
}

pub fn spawn_game_worker(config: RoomConfig) -> (GameHandle, tokio::task::JoinHandle<()>) {
    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut worker = GameWorker::new(config);

    let handle = tokio::spawn(async move {
        while let Some(command) = rx.recv().await {
            worker.handle(command);
        }
        info!("Game worker stopped");
    });

    (GameHandle { tx }, handle)
}

struct Session {
    name: Option<String>,
    room: Option<RoomKey>,
    outbox: Outbox,
}

pub struct GameWorker {
    registry: RoomRegistry,
    sessions: HashMap<PlayerId, Session>,
}

impl GameWorker {
    pub fn new(config: RoomConfig) -> Self {
        GameWorker {
            registry: RoomRegistry::new(config),
            sessions: HashMap::new(),
        }
    }

    pub fn handle(&mut self, command: Command) {
        match command {
            Command::Connect { id, outbox } => self.on_connect(id, outbox),
            Command::Action { id, message } => self.on_action(id, message),
            Command::Disconnect { id } => self.on_disconnect(id),
            Command::Reply { id, message } => self.send(&id, message),
            Command::Stats { reply } => {
                let _ = reply.send(self.stats());
            }
        }
    }

    pub fn registry(&self) -> &RoomRegistry {
        &self.registry
    }

    pub fn stats(&self) -> ServerStats {
        ServerStats {
            rooms: self.registry.len(),
            players: self.registry.player_count(),
            active_games: self.registry.active_games(),
        }
    }

    fn on_connect(&mut self, id: PlayerId, outbox: Outbox) {
        let session = Session {
            name: None,
            room: None,
            outbox,
        };
        self.sessions.insert(id, session);
        self.send(&id, ServerMessage::Connected { id });
        Metrics::g_connections_total_set(self.sessions.len());
        info!("Player connected: {}", id);
    }

    fn on_disconnect(&mut self, id: PlayerId) {
        self.leave_room(id);
        self.sessions.remove(&id);
        Metrics::g_connections_total_set(self.sessions.len());
        info!("Player disconnected: {}", id);
    }

    fn on_action(&mut self, id: PlayerId, message: ClientMessage) {
        let action = message.action();
        let outcome = match self.apply(id, message) {
            Ok(()) => "ok",
            Err(reply) => {
                debug!("Player {} failed to {}: {:?}", id, action, reply);
                self.send(&id, reply);
                "rejected"
            }
        };
        Metrics::c_player_actions_total_incr(metrics_labels::player_action(action, outcome));
    }

    fn apply(&mut self, id: PlayerId, message: ClientMessage) -> Result<(), ServerMessage> {
        self.session_mut(&id)?;

        match message {
            ClientMessage::SetDisplayName { name } => {
                let name = normalize_name(&name)
                    .ok_or_else(|| ServerMessage::bad_request("Display name is invalid."))?;
                if self.registry.name_in_use(&name, &id) {
                    return Err(GameError::NameTaken.into());
                }
                let session = self.session_mut(&id)?;
                session.name = Some(name.clone());
                info!("Player {} set display name to: {}", id, name);
                self.send(&id, ServerMessage::NameAccepted { name });
            }
            ClientMessage::CreateRoom => {
                self.leave_room(id);
                let name = self.display_name(&id, DEFAULT_HOST_NAME);
                let (key, out) = self.registry.create_room(id, name);
                self.session_mut(&id)?.room = Some(key.clone());
                Metrics::c_players_total_incr();
                self.deliver(&key, out);
            }
            ClientMessage::JoinRoom { room_key } => {
                let key = RoomKey::from(room_key.as_str());
                let name = self.display_name(&id, DEFAULT_GUEST_NAME);
                let room = self.registry.room(&key).ok_or(GameError::RoomNotFound)?;
                if room.contains(&id) {
                    let welcome = room.welcome(id);
                    self.deliver(&key, vec![welcome]);
                    return Ok(());
                }
                if room.has_name(&name) {
                    return Err(GameError::NameTaken.into());
                }

                self.leave_room(id);
                let out = self.registry.join_room(&key, id, name)?;
                self.session_mut(&id)?.room = Some(key.clone());
                Metrics::c_players_total_incr();
                self.deliver(&key, out);
            }
            ClientMessage::StartGame => {
                let key = self.room_of(&id)?;
                let out = self.registry.start_game(&key, id)?;
                self.deliver(&key, out);
            }
            ClientMessage::PlayCard { card } => {
                let key = self.room_of(&id)?;
                let out = self.registry.play_card(&key, id, card)?;
                self.deliver(&key, out);
            }
            ClientMessage::RestartGame => {
                let key = self.room_of(&id)?;
                let out = self.registry.restart_game(&key, id)?;
                self.deliver(&key, out);
            }
            ClientMessage::HigherLowerComplete => {
                let key = self.room_of(&id)?;
                let out = self.registry.notify_mini_game_complete(&key, id)?;
                self.deliver(&key, out);
            }
        }
        Ok(())
    }

    fn leave_room(&mut self, id: PlayerId) {
        let Some(key) = self.sessions.get_mut(&id).and_then(|s| s.room.take()) else {
            return;
        };
        let out = self.registry.remove_player(&key, &id);
        self.deliver(&key, out);
    }

    fn deliver(&self, key: &RoomKey, out: Notifications) {
        let members = self
            .registry
            .room(key)
            .map(|room| room.turn_order().to_vec())
            .unwrap_or_default();

        for notification in out {
            match notification.to {
                Recipient::Room => {
                    for member in &members {
                        self.send(member, notification.message.clone());
                    }
                }
                Recipient::Player(id) => self.send(&id, notification.message),
            }
        }
    }

    fn send(&self, id: &PlayerId, message: ServerMessage) {
        if let Some(session) = self.sessions.get(id) {
            // a closed outbox means the connection is already going away
            let _ = session.outbox.send(message);
        }
    }

    fn room_of(&self, id: &PlayerId) -> Result<RoomKey, GameError> {
        self.sessions
            .get(id)
            .and_then(|s| s.room.clone())
            .ok_or(GameError::RoomNotFound)
    }

    fn display_name(&self, id: &PlayerId, fallback: &str) -> String {
        self.sessions
            .get(id)
            .and_then(|s| s.name.clone())
            .unwrap_or_else(|| fallback.to_string())
    }

    fn session_mut(&mut self, id: &PlayerId) -> Result<&mut Session, ServerMessage> {
        self.sessions
            .get_mut(id)
            .ok_or_else(|| ServerMessage::bad_request("Unknown connection."))
    }
}

/// Maps any whitespace to plain spaces and trims. Empty, over-long and
/// control character names are rejected.
fn normalize_name(name: &str) -> Option<String> {
    if name.len() > MAX_NAME_LEN || name.contains(|c: char| c.is_control()) {
        return None;
    }
    let name = name.replace(char::is_whitespace, " ");
    let name = name.trim();
    if name.is_empty() {
        return None;
    }
    Some(name.to_string())
}
