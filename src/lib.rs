pub mod action;
pub mod ai;
pub mod config;
pub mod console;
pub mod deck;
pub mod decision;
pub mod error;
pub mod event;
pub mod exchange;
pub mod game;
pub mod player;
pub mod protocol;
pub mod state;

#[cfg(test)]
mod testing;

pub use action::{Action, ActionRules};
pub use ai::{BotWeights, WeightedBot};
pub use config::{GameConfig, SeatConfig, SeatKind};
pub use console::Console;
pub use deck::Deck;
pub use decision::{ClaimPurpose, DecisionSource, Prompt};
pub use error::{CoupError, Result};
pub use event::Event;
pub use game::{Declaration, Game, Phase, Seat};
pub use player::Player;
pub use protocol::{Claim, Verdict};
pub use state::{GameState, GameView, Perspective, PlayerView};

use std::fmt::{Display, Formatter};
use serde::{Deserialize, Serialize};
use crate::Character::{Ambassador, Assassin, Captain, Contessa, Duke};

/// Seat index in turn order, fixed at deal time.
pub type PlayerId = usize;

pub const COPIES_PER_CHARACTER: usize = 3;
pub const DECK_SIZE: usize = COPIES_PER_CHARACTER * CHARACTER_VARIANTS.len();
pub const STARTING_COINS: u8 = 2;
pub const HAND_SIZE: usize = 2;
pub const MIN_PLAYERS: usize = 2;
pub const MAX_PLAYERS: usize = 6;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Character {
    Duke,
    Assassin,
    Captain,
    Ambassador,
    Contessa,
}

pub static CHARACTER_VARIANTS: [Character; 5] = [
    Duke,
    Assassin,
    Captain,
    Ambassador,
    Contessa,
];

impl Display for Character {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Duke => "Duke",
            Assassin => "Assassin",
            Captain => "Captain",
            Ambassador => "Ambassador",
            Contessa => "Contessa",
        };
        f.write_str(name)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    pub character: Character,
    pub revealed: bool,
}

impl Card {
    pub fn hidden(character: Character) -> Self {
        Self { character, revealed: false }
    }

    pub fn is_hidden(&self) -> bool {
        !self.revealed
    }
}
