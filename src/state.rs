use std::fmt::{Debug, Formatter};
use rand::SeedableRng;
use rand_pcg::Pcg64;
use serde::Serialize;
use tracing::{debug, warn};
use crate::action::{Action, FORCED_COUP_COINS};
use crate::deck::Deck;
use crate::error::{CoupError, Result};
use crate::player::Player;
use crate::{Card, Character, PlayerId, CHARACTER_VARIANTS, COPIES_PER_CHARACTER, DECK_SIZE, HAND_SIZE, MAX_PLAYERS, MIN_PLAYERS};

#[derive(Clone)]
pub struct GameState {
    pub(crate) players: Vec<Player>,
    pub(crate) deck: Deck,
    pub(crate) current_player_idx: PlayerId,
    pub(crate) turn: usize,
    pub(crate) rng: Pcg64,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PlayerView {
    pub id: PlayerId,
    pub name: String,
    pub coins: u8,
    pub influence: usize,
    pub revealed: Vec<Character>,
    pub eliminated: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct GameView {
    pub turn: usize,
    pub current_player: PlayerId,
    pub deck_size: usize,
    pub players: Vec<PlayerView>,
    pub winner: Option<PlayerId>,
}

impl GameView {
    pub fn name(&self, player_idx: PlayerId) -> &str {
        self.players.get(player_idx).map(|p| p.name.as_str()).unwrap_or("?")
    }
}

/// The game from the point of view of one seat: the public table plus its own hand.
#[derive(Clone, Debug)]
pub struct Perspective<'a> {
    pub me: PlayerId,
    pub hand: &'a [Card],
    pub table: GameView,
}

impl Perspective<'_> {
    pub fn coins(&self) -> u8 {
        self.table.players[self.me].coins
    }

    pub fn holds(&self, character: Character) -> bool {
        self.hand.iter().any(|card| card.is_hidden() && card.character == character)
    }
}

impl Debug for GameState {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(format!("T {} | P {} | deck {}\n", self.turn, self.current_player_idx, self.deck.len()).as_str())?;
        for (player_idx, player) in self.players.iter().enumerate() {
            f.write_str(format!("\tP {player_idx}: ${} | {:?}\n", player.coins, player.hand).as_str())?;
        }
        Ok(())
    }
}

impl GameState {
    pub fn new(names: &[String], mut rng: Pcg64) -> Result<Self> {
        if !(MIN_PLAYERS..=MAX_PLAYERS).contains(&names.len()) {
            return Err(CoupError::InvalidConfig {
                field: "seats",
                reason: format!("{} players requested, need {MIN_PLAYERS} to {MAX_PLAYERS}", names.len()),
            });
        }

        let mut deck = Deck::new(&mut rng);

        let players = names
            .iter()
            .map(|name| {
                let hand = deck.draw_many(HAND_SIZE)?;
                Ok(Player::new(name.clone(), hand))
            })
            .collect::<Result<Vec<Player>>>()?;

        Ok(Self {
            players,
            deck,
            current_player_idx: 0,
            turn: 0,
            rng,
        })
    }

    pub fn with_seed(names: &[String], seed: u64) -> Result<Self> {
        Self::new(names, Pcg64::seed_from_u64(seed))
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn player(&self, player_idx: PlayerId) -> &Player {
        &self.players[player_idx]
    }

    pub fn deck(&self) -> &Deck {
        &self.deck
    }

    pub fn current_player(&self) -> PlayerId {
        self.current_player_idx
    }

    pub fn turn(&self) -> usize {
        self.turn
    }

    pub fn is_player_dead(&self, player_idx: PlayerId) -> bool {
        self.players[player_idx].is_eliminated()
    }

    pub fn living_players(&self) -> Vec<PlayerId> {
        (0..self.players.len())
            .filter(|&player_idx| !self.is_player_dead(player_idx))
            .collect()
    }

    /// Living players other than `exclude_idx`, in turn order starting just after them.
    pub fn other_player_indexes(&self, exclude_idx: PlayerId) -> Vec<PlayerId> {
        (1..self.players.len())
            .map(|n| (exclude_idx + n) % self.players.len())
            .filter(|player_idx| !self.is_player_dead(*player_idx))
            .collect()
    }

    pub fn next_living_player(&self) -> PlayerId {
        let mut idx = (self.current_player_idx + 1) % self.players.len();
        while self.is_player_dead(idx) && idx != self.current_player_idx {
            idx = (idx + 1) % self.players.len();
        }

        idx
    }

    pub(crate) fn advance_turn(&mut self) {
        self.turn += 1;
        self.current_player_idx = self.next_living_player();
    }

    pub fn winner(&self) -> Option<PlayerId> {
        match self.living_players().as_slice() {
            [winner] => Some(*winner),
            _ => None,
        }
    }

    pub fn is_over(&self) -> bool {
        self.living_players().len() <= 1
    }

    pub fn validate_target(&self, player_idx: PlayerId, target_idx: PlayerId) -> Result<()> {
        if target_idx == player_idx || target_idx >= self.players.len() || self.is_player_dead(target_idx) {
            return Err(CoupError::InvalidTarget { player: player_idx, target: target_idx });
        }
        Ok(())
    }

    pub fn validate_action(&self, player_idx: PlayerId, action: Action) -> Result<()> {
        let coins = self.players[player_idx].coins;

        if coins >= FORCED_COUP_COINS && action != Action::Coup {
            return Err(CoupError::IllegalAction {
                player: player_idx,
                action,
                reason: "a coup is forced at 10 or more coins",
            });
        }

        if coins < action.cost() {
            return Err(CoupError::IllegalAction {
                player: player_idx,
                action,
                reason: "not enough coins",
            });
        }

        Ok(())
    }

    /// Returns a proven card to the deck, reshuffles, and deals the player a
    /// replacement into the same hand position.
    pub(crate) fn swap_proven_card(&mut self, player_idx: PlayerId, card_idx: usize) -> Result<()> {
        if self.players[player_idx].hand.get(card_idx).map_or(true, |card| card.revealed) {
            return Err(CoupError::InvalidChoice {
                player: player_idx,
                detail: format!("card {card_idx} is not a face down card"),
            });
        }

        let card = self.players[player_idx].hand.remove(card_idx);
        self.deck.return_and_shuffle([card], &mut self.rng);

        let excluding = self.players[player_idx].unrevealed_characters();
        let replacement = match self.deck.draw_unique(&excluding) {
            Ok(replacement) => replacement,
            Err(CoupError::DeckExhausted) => {
                warn!(player = player_idx, ?excluding, "no unique card left, drawing from the top");
                self.deck.draw().ok_or(CoupError::DeckExhausted)?
            }
            Err(err) => return Err(err),
        };

        debug!(player = player_idx, returned = %card.character, "proven card swapped");
        self.players[player_idx].hand.insert(card_idx, replacement);

        Ok(())
    }

    pub fn view(&self) -> GameView {
        GameView {
            turn: self.turn,
            current_player: self.current_player_idx,
            deck_size: self.deck.len(),
            players: self.players
                .iter()
                .enumerate()
                .map(|(id, player)| PlayerView {
                    id,
                    name: player.name.clone(),
                    coins: player.coins,
                    influence: player.influence(),
                    revealed: player.revealed_characters(),
                    eliminated: player.is_eliminated(),
                })
                .collect(),
            winner: self.winner(),
        }
    }

    pub fn perspective(&self, player_idx: PlayerId) -> Perspective<'_> {
        Perspective {
            me: player_idx,
            hand: &self.players[player_idx].hand,
            table: self.view(),
        }
    }

    /// Card conservation: 15 cards in total, three of each character, counting
    /// the deck and every hand, revealed or not.
    pub fn check_invariants(&self) -> std::result::Result<(), String> {
        let in_hands: usize = self.players.iter().map(|player| player.hand.len()).sum();
        if self.deck.len() + in_hands != DECK_SIZE {
            return Err(format!("{} cards in deck + {in_hands} in hands != {DECK_SIZE}", self.deck.len()));
        }

        for character in CHARACTER_VARIANTS {
            let held = self.players
                .iter()
                .flat_map(|player| player.hand.iter())
                .filter(|card| card.character == character)
                .count();
            let total = held + self.deck.count(character);
            if total != COPIES_PER_CHARACTER {
                return Err(format!("{total} copies of {character}, expected {COPIES_PER_CHARACTER}"));
            }
        }

        for (player_idx, player) in self.players.iter().enumerate() {
            if player.is_eliminated() != (player.influence() == 0) {
                return Err(format!("player {player_idx} elimination flag disagrees with their hand"));
            }
        }

        Ok(())
    }
}
