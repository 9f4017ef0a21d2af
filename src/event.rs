use serde::Serialize;
use crate::decision::ClaimPurpose;
use crate::state::GameView;
use crate::{Action, Character, PlayerId};

// public information only
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub enum Event {
    TurnStarted { player: PlayerId, coins: u8 },
    ForcedCoup { player: PlayerId },
    ActionDeclared { player: PlayerId, action: Action, target: Option<PlayerId> },
    Challenged { challenger: PlayerId, claimant: PlayerId, character: Character, purpose: ClaimPurpose },
    ClaimProven { claimant: PlayerId, character: Character },
    BluffCaught { claimant: PlayerId, character: Character },
    CardSwapped { player: PlayerId, returned: Character, slot: usize },
    BlockDeclared { blocker: PlayerId, actor: PlayerId, action: Action, character: Character },
    ActionBlocked { actor: PlayerId, action: Action, blocker: PlayerId },
    ActionFailed { player: PlayerId, action: Action },
    CoinsGained { player: PlayerId, amount: u8, total: u8 },
    CoinsStolen { thief: PlayerId, victim: PlayerId, amount: u8 },
    InfluenceLost { player: PlayerId, character: Character },
    Exchanged { player: PlayerId },
    ExchangeSkipped { player: PlayerId, reason: String },
    Eliminated { player: PlayerId },
    GameOver { winner: PlayerId },
}

impl Event {
    pub fn narrate(&self, view: &GameView) -> String {
        let name = |player_idx: PlayerId| view.name(player_idx).to_string();

        match self {
            Event::TurnStarted { player, coins } => {
                format!("{}'s turn ({coins} coins)", name(*player))
            }
            Event::ForcedCoup { player } => {
                format!("{} has 10 or more coins and must perform a Coup", name(*player))
            }
            Event::ActionDeclared { player, action, target: Some(target) } => {
                format!("{} declares {} against {}", name(*player), action.name(), name(*target))
            }
            Event::ActionDeclared { player, action, target: None } => {
                format!("{} declares {}", name(*player), action.name())
            }
            Event::Challenged { challenger, claimant, character, purpose } => {
                let why = match purpose {
                    ClaimPurpose::Action(action) => format!("to {action}"),
                    ClaimPurpose::Block(action) => format!("to block {}", action.name()),
                };
                format!("{} challenges {}'s claim of {character} {why}", name(*challenger), name(*claimant))
            }
            Event::ClaimProven { claimant, character } => {
                format!("{} was truthful and reveals a {character}", name(*claimant))
            }
            Event::BluffCaught { claimant, character } => {
                format!("{} was bluffing about having a {character}", name(*claimant))
            }
            Event::CardSwapped { player, returned, .. } => {
                format!("{} shuffles their {returned} into the deck and draws a new card", name(*player))
            }
            Event::BlockDeclared { blocker, actor, action, character } => {
                format!("{} blocks {}'s {} with {character}", name(*blocker), name(*actor), action.name())
            }
            Event::ActionBlocked { actor, action, blocker } => {
                format!("{}'s {} is blocked by {}", name(*actor), action.name(), name(*blocker))
            }
            Event::ActionFailed { player, action } => {
                format!("{} failed to {action}", name(*player))
            }
            Event::CoinsGained { player, amount, total } => {
                format!("{} takes {amount} coin(s) and now has {total}", name(*player))
            }
            Event::CoinsStolen { thief, victim, amount } => {
                format!("{} steals {amount} coin(s) from {}", name(*thief), name(*victim))
            }
            Event::InfluenceLost { player, character } => {
                format!("{} has lost influence: {character}", name(*player))
            }
            Event::Exchanged { player } => {
                format!("{} has exchanged cards with the deck", name(*player))
            }
            Event::ExchangeSkipped { player, reason } => {
                format!("{}'s exchange skipped: {reason}", name(*player))
            }
            Event::Eliminated { player } => {
                format!("{} has been eliminated", name(*player))
            }
            Event::GameOver { winner } => {
                format!("{} is the winner!", name(*winner))
            }
        }
    }
}
