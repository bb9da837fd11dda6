use crate::cards::{Card, CardValue};

/// A king pins the total to this value instead of adding to it.
pub const KING_TOTAL: i32 = 70;

/// Running total after `card` is played on `total`.
///
/// Once the deck runs dry queens and kings only add one and jacks stay
/// neutral; every other card keeps its usual effect. Jacks never move the
/// total, their effect is on the turn order.
pub fn next_total(total: i32, card: &Card, deck_empty: bool) -> i32 {
    if deck_empty {
        match card.value {
            CardValue::Queen | CardValue::King => return total + 1,
            CardValue::Jack => return total,
            _ => {}
        }
    }

    if let Some(pips) = card.value.pips() {
        return total + pips;
    }

    match card.value {
        CardValue::Queen => total - 10,
        CardValue::King => KING_TOTAL,
        CardValue::Ace => total + 1,
        _ => total,
    }
}
