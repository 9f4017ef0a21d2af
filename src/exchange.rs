use tracing::{instrument, warn};
use crate::error::{CoupError, Result};
use crate::event::Event;
use crate::game::Game;
use crate::{Card, PlayerId};

pub const EXCHANGE_DRAW: usize = 2;

/// `chosen` must be exactly `keep` distinct indexes below `candidates`.
pub fn validate_keep(player_idx: PlayerId, chosen: &[usize], candidates: usize, keep: usize) -> Result<()> {
    if chosen.len() != keep {
        return Err(CoupError::InvalidChoice {
            player: player_idx,
            detail: format!("kept {} cards, must keep {keep}", chosen.len()),
        });
    }

    for (n, card_idx) in chosen.iter().enumerate() {
        if *card_idx >= candidates {
            return Err(CoupError::InvalidChoice {
                player: player_idx,
                detail: format!("card {card_idx} out of {candidates}"),
            });
        }
        if chosen[..n].contains(card_idx) {
            return Err(CoupError::InvalidChoice {
                player: player_idx,
                detail: format!("card {card_idx} chosen twice"),
            });
        }
    }

    Ok(())
}

impl Game {
    #[instrument(skip(self))]
    pub fn exchange(&mut self, player_idx: PlayerId) -> Result<()> {
        let drawn = match self.state.deck.draw_many(EXCHANGE_DRAW) {
            Ok(drawn) => drawn,
            Err(CoupError::DeckExhausted) => {
                let left = self.state.deck.len();
                warn!(player = player_idx, left, "exchange skipped");
                self.emit(Event::ExchangeSkipped {
                    player: player_idx,
                    reason: format!("only {left} card(s) left in the deck"),
                });
                return Ok(());
            }
            Err(err) => return Err(err),
        };

        // revealed cards never take part
        let mut candidates: Vec<Card> = self.state.players[player_idx]
            .hand
            .iter()
            .filter(|card| card.is_hidden())
            .copied()
            .collect();
        let keep = candidates.len();
        candidates.extend(drawn);

        let chosen = match self.ask_exchange_keep(player_idx, &candidates, keep) {
            Ok(chosen) => chosen,
            Err(err) => {
                // put the drawn cards back before giving up
                let drawn = candidates.split_off(keep);
                self.state.deck.return_and_shuffle(drawn, &mut self.state.rng);
                return Err(err);
            }
        };

        let (kept, returned): (Vec<(usize, Card)>, Vec<(usize, Card)>) = candidates
            .into_iter()
            .enumerate()
            .partition(|(card_idx, _)| chosen.contains(card_idx));

        let hand = &mut self.state.players[player_idx].hand;
        hand.retain(|card| card.revealed);
        hand.extend(kept.into_iter().map(|(_, card)| card));

        self.state.deck.return_and_shuffle(returned.into_iter().map(|(_, card)| card), &mut self.state.rng);
        self.emit(Event::Exchanged { player: player_idx });

        Ok(())
    }
}
