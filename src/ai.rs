// probabilistic bot policy

use std::time::Duration;
use rand::distributions::WeightedIndex;
use rand::prelude::Distribution;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg64;
use serde::{Deserialize, Serialize};
use tracing::debug;
use crate::action::{Action, COUP_COST, ASSASSINATE_COST};
use crate::decision::{ClaimPurpose, DecisionSource, Prompt};
use crate::error::{CoupError, Result};
use crate::state::Perspective;
use crate::{Card, Character, PlayerId};

// action weights follow the order of Action::ALL
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BotWeights {
    pub challenge_action: f64,
    pub challenge_block: f64,
    pub block_foreign_aid: f64,
    /// Chance to claim Contessa against an assassination without holding one.
    pub bluff_contessa: f64,
    /// Allow, block as Captain, block as Ambassador.
    pub steal_response: [u32; 3],
    // 7 coins or more
    pub rich: [u32; 7],
    // 3 to 6
    pub comfortable: [u32; 7],
    pub poor: [u32; 7],
}

impl Default for BotWeights {
    fn default() -> Self {
        Self {
            challenge_action: 0.3,
            challenge_block: 0.2,
            block_foreign_aid: 0.3,
            bluff_contessa: 0.3,
            steal_response: [50, 25, 25],
            rich: [0, 0, 70, 0, 30, 0, 0],
            comfortable: [20, 20, 0, 10, 40, 10, 10],
            poor: [20, 20, 0, 20, 0, 20, 20],
        }
    }
}

impl BotWeights {
    pub fn validate(&self) -> Result<()> {
        let chances = [
            ("bot.challenge_action", self.challenge_action),
            ("bot.challenge_block", self.challenge_block),
            ("bot.block_foreign_aid", self.block_foreign_aid),
            ("bot.bluff_contessa", self.bluff_contessa),
        ];

        for (field, chance) in chances {
            if !(0.0..=1.0).contains(&chance) {
                return Err(CoupError::InvalidConfig {
                    field,
                    reason: format!("{chance} is not a probability"),
                });
            }
        }

        if self.steal_response.iter().all(|&weight| weight == 0) {
            return Err(CoupError::InvalidConfig {
                field: "bot.steal_response",
                reason: "at least one weight must be positive".into(),
            });
        }

        Ok(())
    }

    fn action_weights(&self, coins: u8) -> &[u32; 7] {
        if coins >= COUP_COST {
            &self.rich
        } else if coins >= ASSASSINATE_COST {
            &self.comfortable
        } else {
            &self.poor
        }
    }
}

pub struct WeightedBot {
    weights: BotWeights,
    delay: Duration,
    rng: Pcg64,
}

impl WeightedBot {
    pub fn new(weights: BotWeights, seed: u64) -> Self {
        Self {
            weights,
            delay: Duration::ZERO,
            rng: Pcg64::seed_from_u64(seed),
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    fn chance(&mut self, probability: f64) -> bool {
        self.rng.gen_bool(probability.clamp(0.0, 1.0))
    }

    fn pick<T: Copy>(&mut self, options: &[T], weights: &[u32]) -> Option<T> {
        let index = WeightedIndex::new(weights).ok()?;
        options.get(index.sample(&mut self.rng)).copied()
    }
}

impl DecisionSource for WeightedBot {
    fn choose_action(&mut self, view: &Perspective<'_>, options: &[Action]) -> Result<Action> {
        if !self.delay.is_zero() {
            std::thread::sleep(self.delay);
        }

        let table = self.weights.action_weights(view.coins());
        let weights: Vec<u32> = options
            .iter()
            .map(|option| {
                let idx = Action::ALL.iter().position(|action| action == option).unwrap_or(0);
                table[idx]
            })
            .collect();

        let action = match self.pick(options, &weights) {
            Some(action) => action,
            // nothing weighted is on offer
            None => *options.choose(&mut self.rng).ok_or(CoupError::Aborted { player: view.me, query: "choose an action" })?,
        };

        debug!(bot = view.me, ?action, "bot chose action");
        Ok(action)
    }

    fn choose_target(&mut self, view: &Perspective<'_>, _action: Action, candidates: &[PlayerId]) -> Result<PlayerId> {
        candidates
            .choose(&mut self.rng)
            .copied()
            .ok_or(CoupError::Aborted { player: view.me, query: "choose a target" })
    }

    fn respond_yes_no(&mut self, view: &Perspective<'_>, prompt: &Prompt) -> Result<bool> {
        let answer = match *prompt {
            Prompt::Challenge { purpose: ClaimPurpose::Action(_), .. } => self.chance(self.weights.challenge_action),
            Prompt::Challenge { purpose: ClaimPurpose::Block(_), .. } => self.chance(self.weights.challenge_block),
            Prompt::Block { action: Action::ForeignAid, .. } => self.chance(self.weights.block_foreign_aid),
            Prompt::Block { character: Character::Contessa, .. } => {
                view.holds(Character::Contessa) || self.chance(self.weights.bluff_contessa)
            }
            Prompt::Block { character, .. } => view.holds(character),
        };

        Ok(answer)
    }

    fn choose_card_to_lose(&mut self, _view: &Perspective<'_>, unrevealed: &[Card]) -> Result<usize> {
        Ok(self.rng.gen_range(0..unrevealed.len().max(1)))
    }

    fn choose_exchange_keep(&mut self, _view: &Perspective<'_>, candidates: &[Card], keep: usize) -> Result<Vec<usize>> {
        Ok(rand::seq::index::sample(&mut self.rng, candidates.len(), keep.min(candidates.len())).into_vec())
    }

    fn choose_block(
        &mut self,
        view: &Perspective<'_>,
        actor: PlayerId,
        action: Action,
        options: &[Character],
    ) -> Result<Option<Character>> {
        if let [first, second] = options {
            let steal_response = self.weights.steal_response;
            return Ok(self.pick(&[None, Some(*first), Some(*second)], &steal_response).flatten());
        }

        for &character in options {
            if self.respond_yes_no(view, &Prompt::Block { actor, action, character })? {
                return Ok(Some(character));
            }
        }
        Ok(None)
    }
}
