use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;
use crate::decision::{DecisionSource, Prompt};
use crate::error::Result;
use crate::event::Event;
use crate::game::Game;
use crate::state::{GameState, Perspective};
use crate::{Action, Card, Character, PlayerId};

pub(crate) type EventLog = Rc<RefCell<Vec<Event>>>;

pub(crate) fn names(n: usize) -> Vec<String> {
    (0..n).map(|player_idx| format!("p{player_idx}")).collect()
}

/// Deals the given hands, keeping every other card in the deck.
pub(crate) fn rig(state: &mut GameState, hands: &[[Character; 2]]) {
    assert_eq!(hands.len(), state.players.len(), "one hand per player");

    let GameState { players, deck, rng, .. } = state;
    for player in players.iter_mut() {
        let hand = std::mem::take(&mut player.hand);
        deck.return_and_shuffle(hand, &mut *rng);
    }

    for (player, wanted) in players.iter_mut().zip(hands) {
        player.hand = wanted
            .iter()
            .map(|&character| deck.take(character).unwrap_or_else(|| panic!("no {character} left to rig")))
            .collect();
    }
}

pub(crate) fn rigged_game(hands: &[[Character; 2]], mut scripts: Vec<Script>) -> (Game, EventLog) {
    let mut state = GameState::with_seed(&names(hands.len()), 42).unwrap();
    rig(&mut state, hands);

    let log = EventLog::default();
    scripts[0].log = Some(log.clone());

    let seats = scripts
        .into_iter()
        .map(|script| Box::new(script) as Box<dyn DecisionSource>)
        .collect();

    (Game::from_state(state, seats).unwrap(), log)
}

/// Answers from queues, falling back to a passive default when a queue runs dry:
/// Income, the first candidate, "no", the first card, the first cards.
#[derive(Default)]
pub(crate) struct Script {
    actions: VecDeque<Action>,
    targets: VecDeque<PlayerId>,
    yes_no: VecDeque<bool>,
    lose: VecDeque<usize>,
    keep: VecDeque<Vec<usize>>,
    log: Option<EventLog>,
}

impl Script {
    pub(crate) fn actions(mut self, actions: impl IntoIterator<Item = Action>) -> Self {
        self.actions.extend(actions);
        self
    }

    pub(crate) fn targets(mut self, targets: impl IntoIterator<Item = PlayerId>) -> Self {
        self.targets.extend(targets);
        self
    }

    pub(crate) fn yes_no(mut self, answers: impl IntoIterator<Item = bool>) -> Self {
        self.yes_no.extend(answers);
        self
    }

    pub(crate) fn lose(mut self, card_idxs: impl IntoIterator<Item = usize>) -> Self {
        self.lose.extend(card_idxs);
        self
    }

    pub(crate) fn keep(mut self, keeps: impl IntoIterator<Item = Vec<usize>>) -> Self {
        self.keep.extend(keeps);
        self
    }
}

impl DecisionSource for Script {
    fn choose_action(&mut self, _view: &Perspective<'_>, _options: &[Action]) -> Result<Action> {
        Ok(self.actions.pop_front().unwrap_or(Action::Income))
    }

    fn choose_target(&mut self, _view: &Perspective<'_>, _action: Action, candidates: &[PlayerId]) -> Result<PlayerId> {
        Ok(self.targets.pop_front().unwrap_or(candidates[0]))
    }

    fn respond_yes_no(&mut self, _view: &Perspective<'_>, _prompt: &Prompt) -> Result<bool> {
        Ok(self.yes_no.pop_front().unwrap_or(false))
    }

    fn choose_card_to_lose(&mut self, _view: &Perspective<'_>, _unrevealed: &[Card]) -> Result<usize> {
        Ok(self.lose.pop_front().unwrap_or(0))
    }

    fn choose_exchange_keep(&mut self, _view: &Perspective<'_>, _candidates: &[Card], keep: usize) -> Result<Vec<usize>> {
        Ok(self.keep.pop_front().unwrap_or_else(|| (0..keep).collect()))
    }

    fn observe(&mut self, _view: &Perspective<'_>, event: &Event) {
        if let Some(log) = &self.log {
            log.borrow_mut().push(event.clone());
        }
    }
}
