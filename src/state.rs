use std::collections::HashMap;

use rand::Rng;
use serde::Serialize;
use tracing::info;

use crate::{
    app_metrics::Metrics,
    cards::Card,
    config::RoomConfig,
    game::{ActionResult, GameError, Notifications, Room},
};

pub const ROOM_KEY_LEN: usize = 6;
const ROOM_KEY_ALPHABET: &[u8] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Identity of one connection, stable until it disconnects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct PlayerId(uuid::Uuid);

impl PlayerId {
    pub fn random() -> Self {
        PlayerId(uuid::Uuid::new_v4())
    }
}

impl std::fmt::Display for PlayerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

impl std::str::FromStr for PlayerId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        uuid::Uuid::parse_str(s).map(PlayerId)
    }
}

/// Short code players type in to join a room.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct RoomKey(String);

impl RoomKey {
    pub fn random() -> Self {
        let mut rng = rand::thread_rng();
        let key = (0..ROOM_KEY_LEN)
            .map(|_| ROOM_KEY_ALPHABET[rng.gen_range(0..ROOM_KEY_ALPHABET.len())] as char)
            .collect();
        RoomKey(key)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for RoomKey {
    fn from(key: &str) -> Self {
        RoomKey(key.trim().to_uppercase())
    }
}

impl std::fmt::Display for RoomKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Every live room in the process, by key. Rooms are dropped as soon as the
/// last player leaves.
#[derive(Debug, Default)]
pub struct RoomRegistry {
    rooms: HashMap<RoomKey, Room>,
    config: RoomConfig,
}

impl RoomRegistry {
    pub fn new(config: RoomConfig) -> Self {
        RoomRegistry {
            rooms: HashMap::new(),
            config,
        }
    }

    pub fn create_room(&mut self, creator: PlayerId, name: String) -> (RoomKey, Notifications) {
        let key = loop {
            let key = RoomKey::random();
            if !self.rooms.contains_key(&key) {
                break key;
            }
        };

        let room = Room::new(key.clone(), creator, name, self.config.clone());
        let out = room.created();
        self.rooms.insert(key.clone(), room);
        info!("Room {} created by {}", key, creator);
        Metrics::g_rooms_total_set(self.rooms.len());

        (key, out)
    }

    pub fn join_room(&mut self, key: &RoomKey, id: PlayerId, name: String) -> ActionResult {
        self.room_mut(key)?.join(id, name)
    }

    pub fn start_game(&mut self, key: &RoomKey, id: PlayerId) -> ActionResult {
        self.room_mut(key)?.start_game(id)
    }

    pub fn play_card(&mut self, key: &RoomKey, id: PlayerId, card: Card) -> ActionResult {
        self.room_mut(key)?.play_card(id, card)
    }

    pub fn restart_game(&mut self, key: &RoomKey, id: PlayerId) -> ActionResult {
        self.room_mut(key)?.restart_game(id)
    }

    pub fn notify_mini_game_complete(&mut self, key: &RoomKey, id: PlayerId) -> ActionResult {
        self.room_mut(key)?.mini_game_complete(id)
    }

    /// Unseats `id` and drops the room once nobody is left in it.
    pub fn remove_player(&mut self, key: &RoomKey, id: &PlayerId) -> Notifications {
        let Some(room) = self.rooms.get_mut(key) else {
            return vec![];
        };

        let out = room.remove_player(id);
        if room.is_empty() {
            self.rooms.remove(key);
            info!("Room {} destroyed, no players left", key);
            Metrics::g_rooms_total_set(self.rooms.len());
        }
        out
    }

    pub fn room(&self, key: &RoomKey) -> Option<&Room> {
        self.rooms.get(key)
    }

    fn room_mut(&mut self, key: &RoomKey) -> Result<&mut Room, GameError> {
        self.rooms.get_mut(key).ok_or(GameError::RoomNotFound)
    }

    /// True when anyone other than `id`, in any room, already goes by `name`.
    pub fn name_in_use(&self, name: &str, id: &PlayerId) -> bool {
        self.rooms
            .values()
            .filter_map(|room| room.name_holder(name))
            .any(|holder| holder != *id)
    }

    pub fn len(&self) -> usize {
        self.rooms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rooms.is_empty()
    }

    pub fn player_count(&self) -> usize {
        self.rooms.values().map(Room::len).sum()
    }

    pub fn active_games(&self) -> usize {
        self.rooms.values().filter(|room| room.is_active()).count()
    }
}
