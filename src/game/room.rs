use std::collections::HashMap;

use tracing::{debug, info};

use crate::{
    cards::{Card, Deck},
    config::{RoomConfig, RoomRules},
    models::{DrawnCard, PlayerView, ServerMessage},
    state::{PlayerId, RoomKey},
};

use super::{
    scoring::next_total, turns::TurnOrder, ActionResult, GameError, Notification, Notifications,
    JACK_EFFECT,
};

#[derive(Debug, Clone, PartialEq)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    pub hand: Vec<Card>,
    pub can_play: bool,
    seat: u64,
}

impl Player {
    fn new(id: PlayerId, name: String, seat: u64) -> Self {
        Player {
            id,
            name,
            hand: vec![],
            can_play: false,
            seat,
        }
    }

    /// Still in the round and holding something to play.
    pub fn is_eligible(&self) -> bool {
        self.can_play && !self.hand.is_empty()
    }

    fn take_card(&mut self, card: &Card) -> Option<Card> {
        let idx = self.hand.iter().position(|c| c == card)?;
        Some(self.hand.remove(idx))
    }

    fn view(&self) -> PlayerView {
        PlayerView {
            id: self.id,
            name: self.name.clone(),
            hand: self.hand.clone(),
            can_play: self.can_play,
        }
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum GameStatus {
    #[default]
    Lobby,
    Active,
    /// Nobody is left who can play; waiting for the host to restart.
    Exhausted,
}

/// One game session. Every mutation goes through the action methods below,
/// each of which either rejects the action without touching anything or
/// applies it and returns the messages to deliver.
#[derive(Debug, Clone, PartialEq)]
pub struct Room {
    key: RoomKey,
    players: HashMap<PlayerId, Player>,
    turns: TurnOrder,
    total: i32,
    deck: Deck,
    host: PlayerId,
    status: GameStatus,
    config: RoomConfig,
    next_seat: u64,
}

impl Room {
    pub fn new(key: RoomKey, host: PlayerId, host_name: String, config: RoomConfig) -> Self {
        let mut room = Room {
            key,
            players: HashMap::new(),
            turns: TurnOrder::default(),
            total: 0,
            deck: Deck::ordered(),
            host,
            status: GameStatus::Lobby,
            config,
            next_seat: 0,
        };
        room.seat_player(host, host_name);
        room
    }

    /// Messages announcing the freshly created lobby to its host.
    pub fn created(&self) -> Notifications {
        vec![
            Notification::player(
                self.host,
                ServerMessage::LobbyCreated {
                    room_key: self.key.clone(),
                    host: self.host,
                    rules: self.config.rules.clone(),
                },
            ),
            self.roster_update(),
        ]
    }

    pub fn join(&mut self, id: PlayerId, name: String) -> ActionResult {
        if self.has_name(&name) {
            return Err(GameError::NameTaken);
        }

        self.seat_player(id, name);
        info!("Player {} joined room {}", id, self.key);

        Ok(vec![self.welcome(id), self.roster_update()])
    }

    /// The `joinSuccess` reply for a seated player.
    pub fn welcome(&self, id: PlayerId) -> Notification {
        Notification::player(
            id,
            ServerMessage::JoinSuccess {
                room_key: self.key.clone(),
                players: self.roster(),
                host: self.host,
                rules: self.config.rules.clone(),
            },
        )
    }

    pub fn start_game(&mut self, id: PlayerId) -> ActionResult {
        if id != self.host || self.status == GameStatus::Active {
            return Err(GameError::Forbidden);
        }

        self.deal_fresh_hands();
        info!(
            "Room {} started a game with {} players",
            self.key,
            self.players.len()
        );

        let mut out = vec![Notification::room(ServerMessage::GameStarted {
            players: self.roster(),
        })];
        self.notify_turn(&mut out);
        Ok(out)
    }

    pub fn play_card(&mut self, id: PlayerId, card: Card) -> ActionResult {
        if self.status != GameStatus::Active {
            return Err(GameError::Forbidden);
        }
        if !self.turns.is_current(&id) {
            return Err(GameError::NotYourTurn);
        }

        let player = self.players.get_mut(&id).ok_or(GameError::NotYourTurn)?;
        if !player.can_play {
            return Err(GameError::NotAllowed);
        }
        let card = player.take_card(&card).ok_or(GameError::CardNotInHand)?;
        let name = player.name.clone();
        let deck_empty = self.deck.is_empty();

        if card.is_jack() {
            self.turns.reverse();
            let new_card = self.draw_replacement(&id);
            info!("Player {} played {} in room {}", name, card, self.key);

            let mut out = vec![Notification::room(ServerMessage::CardPlayed {
                player: name,
                card,
                total: self.total,
                new_card,
                special_effect: Some(JACK_EFFECT.to_string()),
            })];
            self.advance_turn(&mut out);
            return Ok(out);
        }

        let new_total = next_total(self.total, &card, deck_empty);

        if new_total > self.config.bust_threshold {
            info!(
                "Player {} went bust in room {} ({} -> {})",
                name, self.key, self.total, new_total
            );
            if let Some(player) = self.players.get_mut(&id) {
                player.can_play = false;
            }

            let mut out = vec![
                Notification::room(ServerMessage::GameOver {
                    loser: Some(name),
                }),
                Notification::player(id, ServerMessage::StartHigherLower),
            ];
            // the named loser already closes the game if nobody is left
            match self.next_eligible() {
                Some(idx) => {
                    self.turns.set_current(idx);
                    self.notify_turn(&mut out);
                }
                None => self.exhaust(),
            }
            return Ok(out);
        }

        self.total = new_total;
        let new_card = self.draw_replacement(&id);
        info!(
            "Player {} played {} in room {}, total is {}",
            name, card, self.key, self.total
        );

        let mut out = vec![Notification::room(ServerMessage::CardPlayed {
            player: name,
            card,
            total: self.total,
            new_card,
            special_effect: None,
        })];
        self.advance_turn(&mut out);
        Ok(out)
    }

    pub fn restart_game(&mut self, id: PlayerId) -> ActionResult {
        if id != self.host {
            return Err(GameError::Forbidden);
        }

        self.deal_fresh_hands();
        info!("Room {} restarted", self.key);

        let mut out = vec![Notification::room(ServerMessage::GameRestarted {
            players: self.roster(),
            total: self.total,
            current_turn: self.turns.current().copied(),
        })];
        self.notify_turn(&mut out);
        Ok(out)
    }

    pub fn mini_game_complete(&mut self, id: PlayerId) -> ActionResult {
        if !self.players.contains_key(&id) {
            return Err(GameError::RoomNotFound);
        }
        debug!("Player {} finished higher or lower in room {}", id, self.key);

        Ok(vec![Notification::room(ServerMessage::HigherLowerComplete {
            player: id,
        })])
    }

    /// Unseats a player. An empty room produces nothing; the caller is
    /// expected to drop it.
    pub fn remove_player(&mut self, id: &PlayerId) -> Notifications {
        if self.players.remove(id).is_none() {
            return vec![];
        }
        let was_current = self.turns.is_current(id);
        self.turns.remove(id);
        info!("Player {} left room {}", id, self.key);

        if self.players.is_empty() {
            return vec![];
        }

        if self.host == *id {
            if let Some(next_host) = self.players.values().min_by_key(|p| p.seat) {
                self.host = next_host.id;
                info!("Player {} is now host of room {}", self.host, self.key);
            }
        }

        let mut out = vec![self.roster_update()];

        if self.status == GameStatus::Active && was_current {
            let players = &self.players;
            let next = self.turns.scan_from(self.turns.current_index(), |id| {
                players.get(id).map_or(false, Player::is_eligible)
            });
            self.pass_turn(next, &mut out);
        }

        out
    }

    pub fn key(&self) -> &RoomKey {
        &self.key
    }

    pub fn host(&self) -> PlayerId {
        self.host
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn is_active(&self) -> bool {
        self.status == GameStatus::Active
    }

    pub fn total(&self) -> i32 {
        self.total
    }

    pub fn rules(&self) -> &RoomRules {
        &self.config.rules
    }

    pub fn player(&self, id: &PlayerId) -> Option<&Player> {
        self.players.get(id)
    }

    pub fn contains(&self, id: &PlayerId) -> bool {
        self.players.contains_key(id)
    }

    pub fn has_name(&self, name: &str) -> bool {
        self.name_holder(name).is_some()
    }

    pub fn name_holder(&self, name: &str) -> Option<PlayerId> {
        self.players.values().find(|p| p.name == name).map(|p| p.id)
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    pub fn turn_order(&self) -> &[PlayerId] {
        self.turns.seats()
    }

    pub fn current_player(&self) -> Option<&PlayerId> {
        self.turns.current()
    }

    pub fn deck_len(&self) -> usize {
        self.deck.len()
    }

    /// Players in the order they joined.
    pub fn roster(&self) -> Vec<PlayerView> {
        let mut players: Vec<_> = self.players.values().collect();
        players.sort_by_key(|p| p.seat);
        players.into_iter().map(Player::view).collect()
    }

    fn roster_update(&self) -> Notification {
        Notification::room(ServerMessage::PlayerJoined {
            players: self.roster(),
            host: self.host,
        })
    }

    fn seat_player(&mut self, id: PlayerId, name: String) {
        let seat = self.next_seat;
        self.next_seat += 1;
        self.players.insert(id, Player::new(id, name, seat));
        self.turns.push(id);
    }

    fn deal_fresh_hands(&mut self) {
        let mut deck = Deck::shuffled();
        for id in self.turns.seats() {
            if let Some(player) = self.players.get_mut(id) {
                player.hand = deck.deal(self.config.hand_size());
                player.can_play = true;
            }
        }
        self.deck = deck;
        self.total = 0;
        self.turns.reset();
        self.status = GameStatus::Active;
    }

    fn draw_replacement(&mut self, id: &PlayerId) -> Option<DrawnCard> {
        let player = self.players.get_mut(id)?;
        let card = self.deck.draw()?;
        player.hand.push(card);
        Some(DrawnCard {
            player: player.name.clone(),
            card,
        })
    }

    fn next_eligible(&self) -> Option<usize> {
        self.turns
            .next_eligible(|id| self.players.get(id).map_or(false, Player::is_eligible))
    }

    fn advance_turn(&mut self, out: &mut Notifications) {
        let next = self.next_eligible();
        self.pass_turn(next, out);
    }

    fn pass_turn(&mut self, next: Option<usize>, out: &mut Notifications) {
        match next {
            Some(idx) => {
                self.turns.set_current(idx);
                self.notify_turn(out);
            }
            None => {
                self.exhaust();
                out.push(Notification::room(ServerMessage::GameOver { loser: None }));
            }
        }
    }

    fn exhaust(&mut self) {
        info!("No players left to play in room {}", self.key);
        self.status = GameStatus::Exhausted;
    }

    fn notify_turn(&self, out: &mut Notifications) {
        let Some(player) = self.turns.current().and_then(|id| self.players.get(id)) else {
            return;
        };
        out.push(Notification::room(ServerMessage::UpdateTurn {
            player: player.name.clone(),
        }));
        out.push(Notification::player(
            player.id,
            ServerMessage::YourTurn { total: self.total },
        ));
    }
}
