// claim
//     - (everyone passes) succeeded
//     - (challenge) truth check
//         - (holds the character) challenger loses influence,
//           claimant swaps the card with the deck, succeeded
//         - (bluff) claimant loses influence, failed
//
// a block is the same claim made by the blocker; when it fails the blocked
// action goes ahead

use serde::Serialize;
use tracing::{debug, instrument};
use crate::decision::{ClaimPurpose, Prompt};
use crate::error::Result;
use crate::event::Event;
use crate::game::{Declaration, Game};
use crate::{Action, Character, PlayerId};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Claim {
    pub claimant: PlayerId,
    pub character: Character,
    pub purpose: ClaimPurpose,
}

impl Claim {
    pub fn action(claimant: PlayerId, character: Character, action: Action) -> Self {
        Self { claimant, character, purpose: ClaimPurpose::Action(action) }
    }

    pub fn block(blocker: PlayerId, character: Character, action: Action) -> Self {
        Self { claimant: blocker, character, purpose: ClaimPurpose::Block(action) }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize)]
pub enum Verdict {
    Succeeded,
    Failed,
}

impl Game {
    /// Offers every living opponent of the claimant, in turn order after them,
    /// the chance to challenge. At most one challenge happens per claim.
    #[instrument(skip(self))]
    pub fn resolve_claim(&mut self, claim: Claim) -> Result<Verdict> {
        let prompt = Prompt::Challenge {
            claimant: claim.claimant,
            character: claim.character,
            purpose: claim.purpose,
        };

        for challenger in self.state.other_player_indexes(claim.claimant) {
            if self.state.is_player_dead(challenger) {
                continue;
            }

            if self.ask_yes_no(challenger, &prompt)? {
                self.emit(Event::Challenged {
                    challenger,
                    claimant: claim.claimant,
                    character: claim.character,
                    purpose: claim.purpose,
                });
                return self.settle_challenge(claim, challenger);
            }
        }

        debug!("claim unchallenged");
        Ok(Verdict::Succeeded)
    }

    pub fn resolve_block(&mut self, blocker: PlayerId, character: Character, action: Action) -> Result<Verdict> {
        self.resolve_claim(Claim::block(blocker, character, action))
    }

    fn settle_challenge(&mut self, claim: Claim, challenger: PlayerId) -> Result<Verdict> {
        let Claim { claimant, character, .. } = claim;

        match self.state.players[claimant].find_unrevealed(character) {
            Some(card_idx) => {
                self.emit(Event::ClaimProven { claimant, character });
                self.lose_influence(challenger)?;
                self.state.swap_proven_card(claimant, card_idx)?;
                self.emit(Event::CardSwapped { player: claimant, returned: character, slot: card_idx });
                Ok(Verdict::Succeeded)
            }
            None => {
                self.emit(Event::BluffCaught { claimant, character });
                self.lose_influence(claimant)?;
                Ok(Verdict::Failed)
            }
        }
    }

    /// Offers the block step the action's rules call for and returns whether
    /// the action ended up blocked. Table-wide blocks go round every living
    /// opponent, and a disproved block leaves the rest free to try.
    pub(crate) fn action_blocked(&mut self, declaration: Declaration) -> Result<bool> {
        let Declaration { actor, action, .. } = declaration;
        let rules = action.rules();
        if rules.blocked_by.is_empty() {
            return Ok(false);
        }

        let blockers = if rules.blockable_by_anyone {
            self.state.other_player_indexes(actor)
        } else {
            vec![declaration.target()?]
        };

        for blocker in blockers {
            // may have died to a challenge earlier in the turn
            if self.state.is_player_dead(blocker) {
                continue;
            }

            if let Some(character) = self.ask_block(blocker, actor, action, rules.blocked_by)? {
                if self.contest_block(blocker, actor, action, character)? {
                    return Ok(true);
                }
            }
        }

        Ok(false)
    }

    fn contest_block(&mut self, blocker: PlayerId, actor: PlayerId, action: Action, character: Character) -> Result<bool> {
        self.emit(Event::BlockDeclared { blocker, actor, action, character });

        match self.resolve_block(blocker, character, action)? {
            Verdict::Succeeded => {
                self.emit(Event::ActionBlocked { actor, action, blocker });
                Ok(true)
            }
            Verdict::Failed => Ok(false),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::action::Action;
    use crate::protocol::{Claim, Verdict};
    use crate::testing::{rigged_game, Script};
    use crate::Character::{Ambassador, Assassin, Captain, Contessa, Duke};

    #[test]
    fn unchallenged_claim_succeeds() {
        let (mut game, _) = rigged_game(&[[Duke, Assassin], [Contessa, Captain]], vec![Script::default(), Script::default()]);

        let verdict = game.resolve_claim(Claim::action(0, Ambassador, Action::Exchange)).unwrap();
        assert_eq!(verdict, Verdict::Succeeded);
        assert_eq!(game.state().player(0).influence(), 2);
    }

    #[test]
    fn truthful_claim_punishes_challenger() {
        let (mut game, _) = rigged_game(&[[Duke, Assassin], [Contessa, Captain]], vec![Script::default(), Script::default().yes_no([true])]);
        let deck_before = game.state().deck().len();

        let verdict = game.resolve_claim(Claim::action(0, Duke, Action::Tax)).unwrap();

        assert_eq!(verdict, Verdict::Succeeded);
        assert_eq!(game.state().player(1).influence(), 1);
        assert_eq!(game.state().player(0).influence(), 2);
        assert_eq!(game.state().player(0).hand().len(), 2);
        assert_eq!(game.state().deck().len(), deck_before);
        assert!(game.state().check_invariants().is_ok());
    }

    #[test]
    fn bluff_punishes_claimant() {
        let (mut game, _) = rigged_game(&[[Duke, Assassin], [Contessa, Captain]], vec![Script::default(), Script::default().yes_no([true])]);

        let verdict = game.resolve_claim(Claim::action(0, Captain, Action::Steal)).unwrap();

        assert_eq!(verdict, Verdict::Failed);
        assert_eq!(game.state().player(0).influence(), 1);
        assert_eq!(game.state().player(1).influence(), 2);
    }

    #[test]
    fn only_the_first_challenge_counts() {
        let (mut game, _) = rigged_game(
            &[[Duke, Assassin], [Contessa, Captain], [Ambassador, Captain], [Duke, Contessa]],
            vec![
                Script::default(),
                Script::default(),
                Script::default().yes_no([true]),
                Script::default().yes_no([true]),
            ],
        );

        game.resolve_claim(Claim::action(0, Duke, Action::Tax)).unwrap();

        assert_eq!(game.state().player(1).influence(), 2);
        assert_eq!(game.state().player(2).influence(), 1);
        assert_eq!(game.state().player(3).influence(), 2);
    }

    #[test]
    fn challengers_start_after_the_claimant() {
        let (mut game, _) = rigged_game(
            &[[Duke, Assassin], [Contessa, Captain], [Ambassador, Captain]],
            // both would challenge; p0 is first after p2
            vec![Script::default().yes_no([true]), Script::default().yes_no([true]), Script::default()],
        );

        let verdict = game.resolve_block(2, Duke, Action::ForeignAid).unwrap();

        assert_eq!(verdict, Verdict::Failed);
        assert_eq!(game.state().player(2).influence(), 1);
        assert_eq!(game.state().player(0).influence(), 2);
        assert_eq!(game.state().player(1).influence(), 2);
    }

    #[test]
    fn truthful_block_holds() {
        let (mut game, _) = rigged_game(
            &[[Captain, Assassin], [Contessa, Captain]],
            vec![Script::default().yes_no([true]), Script::default()],
        );

        let verdict = game.resolve_block(1, Contessa, Action::Assassinate).unwrap();

        assert_eq!(verdict, Verdict::Succeeded);
        assert_eq!(game.state().player(0).influence(), 1);
        assert_eq!(game.state().player(1).influence(), 2);
    }
}
