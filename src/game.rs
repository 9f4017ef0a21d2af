use rand::SeedableRng;
use rand_pcg::Pcg64;
use serde::Serialize;
use tracing::{debug, info, instrument, warn};
use crate::action::{Action, FORCED_COUP_COINS, MAX_STEAL};
use crate::decision::{DecisionSource, Prompt};
use crate::error::{CoupError, Result};
use crate::event::Event;
use crate::exchange::validate_keep;
use crate::protocol::{Claim, Verdict};
use crate::state::{GameState, GameView, Perspective};
use crate::{Card, Character, PlayerId};

/// How many times a query is re-issued after an invalid answer before the
/// engine picks the first legal answer itself.
pub const MAX_DECISION_RETRIES: usize = 8;

pub struct Seat {
    pub name: String,
    pub decider: Box<dyn DecisionSource>,
}

impl Seat {
    pub fn new(name: impl Into<String>, decider: impl DecisionSource + 'static) -> Self {
        Self {
            name: name.into(),
            decider: Box::new(decider),
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Declaration {
    pub actor: PlayerId,
    pub action: Action,
    pub target: Option<PlayerId>,
}

impl Declaration {
    pub(crate) fn target(&self) -> Result<PlayerId> {
        self.target.ok_or(CoupError::IllegalAction {
            player: self.actor,
            action: self.action,
            reason: "a target is required",
        })
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize)]
pub enum Phase {
    ForcedCoup,
    ActionSelect,
    ActionResolve(Declaration),
    EliminationCheck,
    WinCheck,
    GameOver(PlayerId),
}

pub struct Game {
    pub(crate) state: GameState,
    seats: Vec<Box<dyn DecisionSource>>,
    phase: Phase,
    // players whose elimination has already been announced
    announced_out: Vec<bool>,
}

impl Game {
    pub fn new(seats: Vec<Seat>, rng: Pcg64) -> Result<Self> {
        let names: Vec<String> = seats.iter().map(|seat| seat.name.clone()).collect();
        let state = GameState::new(&names, rng)?;
        Self::from_state(state, seats.into_iter().map(|seat| seat.decider).collect())
    }

    pub fn with_seed(seats: Vec<Seat>, seed: u64) -> Result<Self> {
        Self::new(seats, Pcg64::seed_from_u64(seed))
    }

    pub fn from_state(state: GameState, seats: Vec<Box<dyn DecisionSource>>) -> Result<Self> {
        if seats.len() != state.players.len() {
            return Err(CoupError::InvalidConfig {
                field: "seats",
                reason: format!("{} decision sources for {} players", seats.len(), state.players.len()),
            });
        }

        let announced_out = state.players.iter().map(|player| player.is_eliminated()).collect();
        let phase = match state.winner() {
            Some(winner) => Phase::GameOver(winner),
            None => Phase::ForcedCoup,
        };

        Ok(Self {
            state,
            seats,
            phase,
            announced_out,
        })
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn view(&self) -> GameView {
        self.state.view()
    }

    pub fn play(&mut self) -> Result<PlayerId> {
        loop {
            if let Phase::GameOver(winner) = self.play_turn()? {
                return Ok(winner);
            }
        }
    }

    pub fn play_turn(&mut self) -> Result<Phase> {
        loop {
            match self.step()? {
                phase @ (Phase::ForcedCoup | Phase::GameOver(_)) => return Ok(phase),
                _ => {}
            }
        }
    }

    #[instrument(skip(self), fields(turn = self.state.turn, player = self.state.current_player_idx))]
    pub fn step(&mut self) -> Result<Phase> {
        let actor = self.state.current_player_idx;

        let next = match self.phase {
            Phase::ForcedCoup => {
                let coins = self.state.players[actor].coins;
                self.emit(Event::TurnStarted { player: actor, coins });

                if coins >= FORCED_COUP_COINS {
                    self.emit(Event::ForcedCoup { player: actor });
                    let target = self.ask_target(actor, Action::Coup)?;
                    Phase::ActionResolve(Declaration { actor, action: Action::Coup, target: Some(target) })
                } else {
                    Phase::ActionSelect
                }
            }
            Phase::ActionSelect => {
                let action = self.ask_action(actor)?;
                let target = if action.is_targeted() {
                    Some(self.ask_target(actor, action)?)
                } else {
                    None
                };
                Phase::ActionResolve(Declaration { actor, action, target })
            }
            Phase::ActionResolve(declaration) => {
                self.emit(Event::ActionDeclared {
                    player: declaration.actor,
                    action: declaration.action,
                    target: declaration.target,
                });

                match self.resolve_action(declaration) {
                    Ok(()) => {}
                    Err(err) if err.is_recoverable() => {
                        warn!(%err, "action aborted");
                        self.emit(Event::ActionFailed { player: declaration.actor, action: declaration.action });
                    }
                    Err(err) => return Err(err),
                }
                Phase::EliminationCheck
            }
            Phase::EliminationCheck => {
                for player_idx in 0..self.state.players.len() {
                    if self.state.is_player_dead(player_idx) && !self.announced_out[player_idx] {
                        self.announced_out[player_idx] = true;
                        self.emit(Event::Eliminated { player: player_idx });
                    }
                }
                Phase::WinCheck
            }
            Phase::WinCheck => match self.state.winner() {
                Some(winner) => {
                    self.emit(Event::GameOver { winner });
                    Phase::GameOver(winner)
                }
                None => {
                    self.state.advance_turn();
                    Phase::ForcedCoup
                }
            },
            Phase::GameOver(winner) => Phase::GameOver(winner),
        };

        debug_assert!(
            self.state.check_invariants().is_ok(),
            "{:?}\n{:?}",
            self.state.check_invariants(),
            self.state
        );

        self.phase = next;
        Ok(next)
    }

    fn resolve_action(&mut self, declaration: Declaration) -> Result<()> {
        let Declaration { actor, action, .. } = declaration;

        self.state.validate_action(actor, action)?;
        if let Some(target) = declaration.target {
            self.state.validate_target(actor, target)?;
        }

        // paid up front and kept even if the claim turns out to be a bluff
        self.state.players[actor].coins -= action.cost();

        if let Some(character) = action.claim() {
            if self.resolve_claim(Claim::action(actor, character, action))? == Verdict::Failed {
                self.emit(Event::ActionFailed { player: actor, action });
                return Ok(());
            }
        }

        if self.action_blocked(declaration)? {
            return Ok(());
        }

        match action {
            Action::Income => self.gain(actor, 1),
            Action::ForeignAid => self.gain(actor, 2),
            Action::Tax => self.gain(actor, 3),
            // a target already out of the game has nothing left to lose
            Action::Coup | Action::Assassinate => self.lose_influence(declaration.target()?)?,
            Action::Exchange => self.exchange(actor)?,
            Action::Steal => {
                let target = declaration.target()?;
                let amount = self.state.players[target].take_up_to(MAX_STEAL);
                self.state.players[actor].gain(amount);
                self.emit(Event::CoinsStolen { thief: actor, victim: target, amount });
            }
        }

        Ok(())
    }

    fn gain(&mut self, player_idx: PlayerId, amount: u8) {
        self.state.players[player_idx].gain(amount);
        let total = self.state.players[player_idx].coins;
        self.emit(Event::CoinsGained { player: player_idx, amount, total });
    }

    /// Reveals one of the player's face down cards, chosen by the player.
    /// Does nothing if they have none left.
    pub fn lose_influence(&mut self, player_idx: PlayerId) -> Result<()> {
        let unrevealed = self.state.players[player_idx].unrevealed_indexes();

        let choice = match unrevealed.len() {
            0 => return Ok(()),
            1 => 0,
            _ => {
                let cards: Vec<Card> = unrevealed
                    .iter()
                    .map(|&card_idx| self.state.players[player_idx].hand[card_idx])
                    .collect();
                self.ask_card_to_lose(player_idx, &cards)?
            }
        };

        if let Some(character) = self.state.players[player_idx].reveal(unrevealed[choice]) {
            self.emit(Event::InfluenceLost { player: player_idx, character });
        }

        Ok(())
    }

    pub(crate) fn emit(&mut self, event: Event) {
        let view = self.state.view();
        info!(turn = view.turn, "{}", event.narrate(&view));

        for (player_idx, seat) in self.seats.iter_mut().enumerate() {
            let perspective = Perspective {
                me: player_idx,
                hand: &self.state.players[player_idx].hand,
                table: view.clone(),
            };
            seat.observe(&perspective, &event);
        }
    }

    fn ask<T: std::fmt::Debug>(
        &mut self,
        player_idx: PlayerId,
        query: &'static str,
        mut ask: impl FnMut(&mut Box<dyn DecisionSource>, &Perspective<'_>) -> Result<T>,
        check: impl Fn(&GameState, &T) -> Result<()>,
        fallback: impl FnOnce() -> T,
    ) -> Result<T> {
        for attempt in 0..MAX_DECISION_RETRIES {
            let perspective = self.state.perspective(player_idx);
            let answer = ask(&mut self.seats[player_idx], &perspective)
                .and_then(|answer| check(&self.state, &answer).map(|_| answer));

            match answer {
                Ok(answer) => {
                    debug!(player = player_idx, query, ?answer, "answered");
                    return Ok(answer);
                }
                Err(err) if err.is_recoverable() => {
                    warn!(player = player_idx, query, attempt, %err, "invalid answer, asking again");
                }
                Err(err) => return Err(err),
            }
        }

        let answer = fallback();
        warn!(player = player_idx, query, ?answer, "too many invalid answers, using the first legal one");
        Ok(answer)
    }

    fn ask_action(&mut self, player_idx: PlayerId) -> Result<Action> {
        let options = Action::affordable(self.state.players[player_idx].coins);
        let fallback = options[0];

        self.ask(
            player_idx,
            "choose an action",
            |seat, view| seat.choose_action(view, &options),
            |state, action| {
                if !options.contains(action) {
                    return Err(CoupError::IllegalAction {
                        player: player_idx,
                        action: *action,
                        reason: "not one of the offered actions",
                    });
                }
                state.validate_action(player_idx, *action)
            },
            || fallback,
        )
    }

    fn ask_target(&mut self, player_idx: PlayerId, action: Action) -> Result<PlayerId> {
        let candidates = self.state.other_player_indexes(player_idx);
        let fallback = candidates[0];

        self.ask(
            player_idx,
            "choose a target",
            |seat, view| seat.choose_target(view, action, &candidates),
            |state, target| state.validate_target(player_idx, *target),
            || fallback,
        )
    }

    pub(crate) fn ask_yes_no(&mut self, player_idx: PlayerId, prompt: &Prompt) -> Result<bool> {
        self.ask(
            player_idx,
            "answer yes or no",
            |seat, view| seat.respond_yes_no(view, prompt),
            |_, _| Ok(()),
            || false,
        )
    }

    pub(crate) fn ask_block(
        &mut self,
        player_idx: PlayerId,
        actor: PlayerId,
        action: Action,
        options: &[Character],
    ) -> Result<Option<Character>> {
        self.ask(
            player_idx,
            "decide whether to block",
            |seat, view| seat.choose_block(view, actor, action, options),
            |_, block| match block {
                Some(character) if !options.contains(character) => Err(CoupError::InvalidChoice {
                    player: player_idx,
                    detail: format!("{character} cannot block {}", action.name()),
                }),
                _ => Ok(()),
            },
            || None,
        )
    }

    fn ask_card_to_lose(&mut self, player_idx: PlayerId, unrevealed: &[Card]) -> Result<usize> {
        self.ask(
            player_idx,
            "choose a card to lose",
            |seat, view| seat.choose_card_to_lose(view, unrevealed),
            |_, card_idx| {
                if *card_idx >= unrevealed.len() {
                    return Err(CoupError::InvalidChoice {
                        player: player_idx,
                        detail: format!("card {card_idx} out of {}", unrevealed.len()),
                    });
                }
                Ok(())
            },
            || 0,
        )
    }

    pub(crate) fn ask_exchange_keep(&mut self, player_idx: PlayerId, candidates: &[Card], keep: usize) -> Result<Vec<usize>> {
        self.ask(
            player_idx,
            "choose cards to keep",
            |seat, view| seat.choose_exchange_keep(view, candidates, keep),
            |_, chosen| validate_keep(player_idx, chosen, candidates.len(), keep),
            || (0..keep).collect(),
        )
    }
}
