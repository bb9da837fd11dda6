use rand::prelude::*;
use serde::{Deserialize, Serialize};

pub const DECK_SIZE: usize = 52;

/// Ordered pile of cards. The end of the vector is the top of the pile, so
/// `draw` and `return_card` work on the same end.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Deck(Vec<Card>);

impl Deck {
    /// All 52 cards, suit by suit, values from two to ace.
    pub fn ordered() -> Self {
        let mut deck = Vec::with_capacity(DECK_SIZE);
        for suit in CardSuit::ALL {
            for value in CardValue::ALL {
                deck.push(Card { suit, value });
            }
        }
        Deck(deck)
    }

    pub fn shuffled() -> Self {
        let mut deck = Self::ordered();
        deck.shuffle();
        deck
    }

    pub fn shuffle(&mut self) {
        let mut rng = rand::thread_rng();
        self.shuffle_with(&mut rng);
    }

    pub fn shuffle_with<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.0.shuffle(rng);
    }

    /// Removes the first `count` cards. Takes whatever is left when the deck
    /// holds fewer.
    pub fn deal(&mut self, count: usize) -> Vec<Card> {
        let count = count.min(self.0.len());
        self.0.drain(..count).collect()
    }

    pub fn draw(&mut self) -> Option<Card> {
        self.0.pop()
    }

    pub fn return_card(&mut self, card: Card) {
        self.0.push(card);
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn cards(&self) -> &[Card] {
        &self.0
    }
}

impl From<Vec<Card>> for Deck {
    fn from(cards: Vec<Card>) -> Self {
        Deck(cards)
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, schemars::JsonSchema,
)]
pub struct Card {
    pub suit: CardSuit,
    pub value: CardValue,
}

impl Card {
    pub fn new(suit: CardSuit, value: CardValue) -> Self {
        Card { suit, value }
    }

    pub fn is_jack(&self) -> bool {
        self.value == CardValue::Jack
    }
}

impl std::fmt::Display for Card {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.value, self.suit)
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, schemars::JsonSchema,
)]
#[serde(rename_all = "camelCase")]
pub enum CardSuit {
    Hearts,
    Diamonds,
    Clubs,
    Spades,
}

impl CardSuit {
    pub const ALL: [CardSuit; 4] = [
        CardSuit::Hearts,
        CardSuit::Diamonds,
        CardSuit::Clubs,
        CardSuit::Spades,
    ];
}

impl std::fmt::Display for CardSuit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let symbol = match self {
            CardSuit::Hearts => "♥",
            CardSuit::Diamonds => "♦",
            CardSuit::Clubs => "♣",
            CardSuit::Spades => "♠",
        };
        f.write_str(symbol)
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, schemars::JsonSchema,
)]
pub enum CardValue {
    #[serde(rename = "2")]
    Two,
    #[serde(rename = "3")]
    Three,
    #[serde(rename = "4")]
    Four,
    #[serde(rename = "5")]
    Five,
    #[serde(rename = "6")]
    Six,
    #[serde(rename = "7")]
    Seven,
    #[serde(rename = "8")]
    Eight,
    #[serde(rename = "9")]
    Nine,
    #[serde(rename = "10")]
    Ten,
    #[serde(rename = "J")]
    Jack,
    #[serde(rename = "Q")]
    Queen,
    #[serde(rename = "K")]
    King,
    #[serde(rename = "A")]
    Ace,
}

impl CardValue {
    pub const ALL: [CardValue; 13] = [
        CardValue::Two,
        CardValue::Three,
        CardValue::Four,
        CardValue::Five,
        CardValue::Six,
        CardValue::Seven,
        CardValue::Eight,
        CardValue::Nine,
        CardValue::Ten,
        CardValue::Jack,
        CardValue::Queen,
        CardValue::King,
        CardValue::Ace,
    ];

    /// Face value of the numbered cards; `None` for court cards and aces.
    pub fn pips(&self) -> Option<i32> {
        match self {
            CardValue::Two => Some(2),
            CardValue::Three => Some(3),
            CardValue::Four => Some(4),
            CardValue::Five => Some(5),
            CardValue::Six => Some(6),
            CardValue::Seven => Some(7),
            CardValue::Eight => Some(8),
            CardValue::Nine => Some(9),
            CardValue::Ten => Some(10),
            CardValue::Jack | CardValue::Queen | CardValue::King | CardValue::Ace => None,
        }
    }
}

impl std::fmt::Display for CardValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.pips() {
            Some(pips) => write!(f, "{}", pips),
            None => {
                let face = match self {
                    CardValue::Jack => "J",
                    CardValue::Queen => "Q",
                    CardValue::King => "K",
                    _ => "A",
                };
                f.write_str(face)
            }
        }
    }
}
