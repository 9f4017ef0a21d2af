use crate::{Card, Character, STARTING_COINS};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Player {
    pub name: String,
    pub coins: u8,
    pub(crate) hand: Vec<Card>,
}

impl Player {
    pub fn new(name: impl Into<String>, hand: Vec<Card>) -> Self {
        Self {
            name: name.into(),
            coins: STARTING_COINS,
            hand,
        }
    }

    pub fn hand(&self) -> &[Card] {
        &self.hand
    }

    pub fn influence(&self) -> usize {
        self.hand.iter().filter(|card| card.is_hidden()).count()
    }

    /// A player is out exactly when every card in their hand is revealed.
    pub fn is_eliminated(&self) -> bool {
        self.hand.iter().all(|card| card.revealed)
    }

    pub fn unrevealed_indexes(&self) -> Vec<usize> {
        self.hand
            .iter()
            .enumerate()
            .filter_map(|(idx, card)| if card.revealed { None } else { Some(idx) })
            .collect()
    }

    pub fn unrevealed_characters(&self) -> Vec<Character> {
        self.hand
            .iter()
            .filter(|card| card.is_hidden())
            .map(|card| card.character)
            .collect()
    }

    pub fn revealed_characters(&self) -> Vec<Character> {
        self.hand
            .iter()
            .filter(|card| card.revealed)
            .map(|card| card.character)
            .collect()
    }

    // not revealed and is the claimed character
    pub fn find_unrevealed(&self, character: Character) -> Option<usize> {
        self.hand.iter().position(|card| card.is_hidden() && card.character == character)
    }

    pub(crate) fn reveal(&mut self, card_idx: usize) -> Option<Character> {
        let card = self.hand.get_mut(card_idx)?;
        if card.revealed {
            return None;
        }
        card.revealed = true;
        Some(card.character)
    }

    pub(crate) fn gain(&mut self, coins: u8) {
        self.coins = self.coins.saturating_add(coins);
    }

    pub(crate) fn take_up_to(&mut self, coins: u8) -> u8 {
        let taken = self.coins.min(coins);
        self.coins -= taken;
        taken
    }
}
