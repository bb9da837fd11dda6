use serde::Serialize;

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_HAND_SIZE: usize = 3;
pub const DEFAULT_BUST_THRESHOLD: i32 = 94;

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub port: u16,
    pub room: RoomConfig,
}

impl ServerConfig {
    /// Reads `PORT`, falling back to 3000.
    pub fn from_env() -> Self {
        let port = std::env::var("PORT")
            .ok()
            .and_then(|port| port.parse().ok())
            .unwrap_or(DEFAULT_PORT);

        ServerConfig {
            port,
            room: RoomConfig::default(),
        }
    }
}

/// Settings every new room is created with. The hand size lives in
/// `rules.cards` so what clients are told always matches the deal.
#[derive(Debug, Clone, PartialEq)]
pub struct RoomConfig {
    pub bust_threshold: i32,
    pub rules: RoomRules,
}

impl Default for RoomConfig {
    fn default() -> Self {
        RoomConfig {
            bust_threshold: DEFAULT_BUST_THRESHOLD,
            rules: RoomRules::default(),
        }
    }
}

impl RoomConfig {
    pub fn hand_size(&self) -> usize {
        self.rules.cards
    }

    pub fn with_hand_size(mut self, hand_size: usize) -> Self {
        self.rules.cards = hand_size;
        self
    }

    pub fn with_bust_threshold(mut self, bust_threshold: i32) -> Self {
        self.bust_threshold = bust_threshold;
        self
    }

    pub fn with_rules(mut self, rules: RoomRules) -> Self {
        self.rules = rules;
        self
    }
}

/// House rules a lobby advertises. Only `cards`, the hand size, changes how
/// the game plays; the rest is stored and reported to clients.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomRules {
    pub first_joker: bool,
    pub second_joker: bool,
    pub hourglass: bool,
    pub autoroute: u8,
    pub exchanges: bool,
    pub cards: usize,
    pub face_up_pile: bool,
    pub tokens: bool,
}

impl Default for RoomRules {
    fn default() -> Self {
        RoomRules {
            first_joker: false,
            second_joker: false,
            hourglass: false,
            autoroute: 5,
            exchanges: false,
            cards: DEFAULT_HAND_SIZE,
            face_up_pile: false,
            tokens: false,
        }
    }
}
