use serde::Serialize;

/// Rejections of a player action. The room is left untouched and only the
/// acting connection hears about it.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum GameError {
    #[error("Lobby does not exist.")]
    RoomNotFound,
    #[error("This name is already used, please choose another one.")]
    NameTaken,
    #[error("You are not allowed to do that right now.")]
    Forbidden,
    #[error("It's not your turn!")]
    NotYourTurn,
    #[error("You cannot play in the current game.")]
    NotAllowed,
    #[error("You do not have this card.")]
    CardNotInHand,
}
