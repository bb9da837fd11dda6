use serde::{Deserialize, Serialize};

use crate::{
    cards::Card,
    config::RoomRules,
    game::GameError,
    state::{PlayerId, RoomKey},
};

/// Frames a client may send over its WebSocket. The acting identity and room
/// come from the connection itself.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum ClientMessage {
    SetDisplayName { name: String },
    CreateRoom,
    JoinRoom { room_key: String },
    StartGame,
    PlayCard { card: Card },
    RestartGame,
    HigherLowerComplete,
}

impl ClientMessage {
    pub fn action(&self) -> &'static str {
        match self {
            ClientMessage::SetDisplayName { .. } => "set_display_name",
            ClientMessage::CreateRoom => "create_room",
            ClientMessage::JoinRoom { .. } => "join_room",
            ClientMessage::StartGame => "start_game",
            ClientMessage::PlayCard { .. } => "play_card",
            ClientMessage::RestartGame => "restart_game",
            ClientMessage::HigherLowerComplete => "higher_lower_complete",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum ServerMessage {
    Connected {
        id: PlayerId,
    },
    NameAccepted {
        name: String,
    },
    LobbyCreated {
        room_key: RoomKey,
        host: PlayerId,
        rules: RoomRules,
    },
    JoinSuccess {
        room_key: RoomKey,
        players: Vec<PlayerView>,
        host: PlayerId,
        rules: RoomRules,
    },
    PlayerJoined {
        players: Vec<PlayerView>,
        host: PlayerId,
    },
    GameStarted {
        players: Vec<PlayerView>,
    },
    UpdateTurn {
        player: String,
    },
    YourTurn {
        total: i32,
    },
    CardPlayed {
        player: String,
        card: Card,
        total: i32,
        new_card: Option<DrawnCard>,
        special_effect: Option<String>,
    },
    GameOver {
        loser: Option<String>,
    },
    StartHigherLower,
    GameRestarted {
        players: Vec<PlayerView>,
        total: i32,
        current_turn: Option<PlayerId>,
    },
    HigherLowerComplete {
        player: PlayerId,
    },
    Error {
        kind: ErrorKind,
        message: String,
    },
}

impl ServerMessage {
    pub fn bad_request(message: impl Into<String>) -> Self {
        ServerMessage::Error {
            kind: ErrorKind::BadRequest,
            message: message.into(),
        }
    }
}

impl From<GameError> for ServerMessage {
    fn from(err: GameError) -> Self {
        ServerMessage::Error {
            kind: err.into(),
            message: err.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ErrorKind {
    RoomNotFound,
    NameTaken,
    Forbidden,
    NotYourTurn,
    NotAllowed,
    CardNotInHand,
    BadRequest,
}

impl From<GameError> for ErrorKind {
    fn from(err: GameError) -> Self {
        match err {
            GameError::RoomNotFound => ErrorKind::RoomNotFound,
            GameError::NameTaken => ErrorKind::NameTaken,
            GameError::Forbidden => ErrorKind::Forbidden,
            GameError::NotYourTurn => ErrorKind::NotYourTurn,
            GameError::NotAllowed => ErrorKind::NotAllowed,
            GameError::CardNotInHand => ErrorKind::CardNotInHand,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerView {
    pub id: PlayerId,
    pub name: String,
    pub hand: Vec<Card>,
    pub can_play: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DrawnCard {
    pub player: String,
    pub card: Card,
}

#[derive(Debug, Clone, Default, Serialize, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ServerStats {
    pub rooms: usize,
    pub players: usize,
    pub active_games: usize,
}
