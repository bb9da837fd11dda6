//! The 99 rules engine: scoring, seating and the per-room state machine.

use crate::{models::ServerMessage, state::PlayerId};

pub use error::GameError;
pub use room::{GameStatus, Player, Room};
pub use scoring::{next_total, KING_TOTAL};
pub use turns::TurnOrder;

mod error;
mod room;
mod scoring;
mod turns;

pub const JACK_EFFECT: &str = "Jack reversed the turn order!";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Recipient {
    /// Everyone still seated in the room once the action has been applied.
    Room,
    Player(PlayerId),
}

/// Message produced by a room action, waiting to be delivered.
#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
    pub to: Recipient,
    pub message: ServerMessage,
}

impl Notification {
    pub fn room(message: ServerMessage) -> Self {
        Notification {
            to: Recipient::Room,
            message,
        }
    }

    pub fn player(id: PlayerId, message: ServerMessage) -> Self {
        Notification {
            to: Recipient::Player(id),
            message,
        }
    }
}

pub type Notifications = Vec<Notification>;

pub type ActionResult = Result<Notifications, GameError>;
