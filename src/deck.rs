use rand::seq::SliceRandom;
use rand::Rng;
use tracing::debug;
use crate::error::{CoupError, Result};
use crate::{Card, Character, CHARACTER_VARIANTS, COPIES_PER_CHARACTER};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Deck {
    // the top of the deck is the end of the vec
    cards: Vec<Card>,
}

impl Deck {
    pub fn new<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let mut cards: Vec<Card> = CHARACTER_VARIANTS
            .iter()
            .flat_map(|&character| std::iter::repeat(Card::hidden(character)).take(COPIES_PER_CHARACTER))
            .collect();

        cards.shuffle(rng);

        Self { cards }
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn count(&self, character: Character) -> usize {
        self.cards.iter().filter(|card| card.character == character).count()
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn draw(&mut self) -> Option<Card> {
        self.cards.pop()
    }

    /// Draws `n` cards from the top, or nothing at all if fewer than `n` remain.
    pub fn draw_many(&mut self, n: usize) -> Result<Vec<Card>> {
        if self.cards.len() < n {
            return Err(CoupError::DeckExhausted);
        }

        let split_at = self.cards.len() - n;
        Ok(self.cards.split_off(split_at))
    }

    /// Draws the topmost card whose character is not in `excluding`.
    ///
    /// Looks at each card at most once, so the search is bounded by the deck size.
    /// Skipped cards stay in the deck.
    pub fn draw_unique(&mut self, excluding: &[Character]) -> Result<Card> {
        let position = self.cards
            .iter()
            .rposition(|card| !excluding.contains(&card.character))
            .ok_or(CoupError::DeckExhausted)?;

        Ok(self.cards.remove(position))
    }

    pub fn return_and_shuffle<R, I>(&mut self, cards: I, rng: &mut R)
    where
        R: Rng + ?Sized,
        I: IntoIterator<Item = Card>,
    {
        let before = self.cards.len();
        self.cards.extend(cards.into_iter().map(|card| {
            debug_assert!(card.is_hidden(), "revealed cards never go back to the deck");
            Card::hidden(card.character)
        }));
        self.cards.shuffle(rng);

        debug!(returned = self.cards.len() - before, size = self.cards.len(), "deck reshuffled");
    }

    #[cfg(test)]
    pub(crate) fn take(&mut self, character: Character) -> Option<Card> {
        let position = self.cards.iter().position(|card| card.character == character)?;
        Some(self.cards.remove(position))
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand_pcg::Pcg64;
    use crate::deck::Deck;
    use crate::error::CoupError;
    use crate::{Card, CHARACTER_VARIANTS};
    use crate::Character::{Ambassador, Assassin, Captain, Contessa, Duke};

    #[test]
    fn new_deck_has_three_of_each() {
        let mut rng = Pcg64::seed_from_u64(7);
        let deck = Deck::new(&mut rng);
        assert_eq!(deck.len(), 15);
        for character in CHARACTER_VARIANTS {
            assert_eq!(deck.count(character), 3);
        }
        assert!(deck.cards().iter().all(|card| card.is_hidden()));
    }

    #[test]
    fn draw_unique_skips_excluded() {
        let mut deck = Deck { cards: vec![Card::hidden(Captain), Card::hidden(Duke), Card::hidden(Duke)] };
        let card = deck.draw_unique(&[Duke]).unwrap();
        assert_eq!(card.character, Captain);
        // skipped cards stay put
        assert_eq!(deck.len(), 2);
        assert_eq!(deck.count(Duke), 2);
    }

    #[test]
    fn draw_unique_exhausted() {
        let mut deck = Deck { cards: vec![Card::hidden(Duke), Card::hidden(Assassin)] };
        assert!(matches!(deck.draw_unique(&[Duke, Assassin]), Err(CoupError::DeckExhausted)));
        assert_eq!(deck.len(), 2);

        let mut empty = Deck { cards: vec![] };
        assert!(matches!(empty.draw_unique(&[]), Err(CoupError::DeckExhausted)));
    }

    #[test]
    fn draw_many_is_all_or_nothing() {
        let mut deck = Deck { cards: vec![Card::hidden(Contessa)] };
        assert!(matches!(deck.draw_many(2), Err(CoupError::DeckExhausted)));
        assert_eq!(deck.len(), 1);

        let mut deck = Deck { cards: vec![Card::hidden(Contessa), Card::hidden(Ambassador), Card::hidden(Duke)] };
        let drawn = deck.draw_many(2).unwrap();
        assert_eq!(drawn.len(), 2);
        assert_eq!(deck.len(), 1);
        assert_eq!(deck.cards()[0].character, Contessa);
    }

    #[test]
    fn returned_cards_never_exceed_cap() {
        let mut rng = Pcg64::seed_from_u64(99);
        let mut deck = Deck::new(&mut rng);

        for _ in 0..50 {
            let drawn = deck.draw_many(4).unwrap();
            deck.return_and_shuffle(drawn, &mut rng);
            for character in CHARACTER_VARIANTS {
                assert_eq!(deck.count(character), 3);
            }
        }

        let mut drawn = vec![];
        while let Some(card) = deck.draw() {
            drawn.push(card);
        }
        for character in CHARACTER_VARIANTS {
            assert_eq!(drawn.iter().filter(|card| card.character == character).count(), 3);
        }
    }
}
