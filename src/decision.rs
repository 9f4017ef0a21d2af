use serde::Serialize;
use crate::error::Result;
use crate::event::Event;
use crate::state::{GameView, Perspective};
use crate::{Action, Card, Character, PlayerId};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize)]
pub enum ClaimPurpose {
    Action(Action),
    Block(Action),
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize)]
pub enum Prompt {
    /// Challenge `claimant`'s claim to hold `character`?
    Challenge {
        claimant: PlayerId,
        character: Character,
        purpose: ClaimPurpose,
    },
    /// Block `actor`'s `action` by claiming `character`?
    Block {
        actor: PlayerId,
        action: Action,
        character: Character,
    },
}

impl Prompt {
    pub fn describe(&self, view: &GameView) -> String {
        match *self {
            Prompt::Challenge { claimant, character, purpose: ClaimPurpose::Action(action) } => {
                format!("Challenge {}'s claim of {character} to {action}?", view.name(claimant))
            }
            Prompt::Challenge { claimant, character, purpose: ClaimPurpose::Block(action) } => {
                format!("Challenge {}'s claim of {character} to block {}?", view.name(claimant), action.name())
            }
            Prompt::Block { actor, action, character } => {
                format!("Block {}'s {} with {character}?", view.name(actor), action.name())
            }
        }
    }
}

/// Answers the engine's queries for one seat.
pub trait DecisionSource {
    fn choose_action(&mut self, view: &Perspective<'_>, options: &[Action]) -> Result<Action>;

    fn choose_target(&mut self, view: &Perspective<'_>, action: Action, candidates: &[PlayerId]) -> Result<PlayerId>;

    fn respond_yes_no(&mut self, view: &Perspective<'_>, prompt: &Prompt) -> Result<bool>;

    /// Index into `unrevealed` of the card to give up.
    fn choose_card_to_lose(&mut self, view: &Perspective<'_>, unrevealed: &[Card]) -> Result<usize>;

    /// Exactly `keep` distinct indexes into `candidates`.
    fn choose_exchange_keep(&mut self, view: &Perspective<'_>, candidates: &[Card], keep: usize) -> Result<Vec<usize>>;

    /// Offered to whoever may block `actor`'s `action`. `None` allows it.
    fn choose_block(
        &mut self,
        view: &Perspective<'_>,
        actor: PlayerId,
        action: Action,
        options: &[Character],
    ) -> Result<Option<Character>> {
        for &character in options {
            if self.respond_yes_no(view, &Prompt::Block { actor, action, character })? {
                return Ok(Some(character));
            }
        }
        Ok(None)
    }

    /// Called after every narrated state change, with this seat's own hand.
    fn observe(&mut self, _view: &Perspective<'_>, _event: &Event) {}
}
