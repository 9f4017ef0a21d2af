use std::io::{BufRead, Stdout, StdinLock, Write};
use tracing::warn;
use crate::decision::{DecisionSource, Prompt};
use crate::error::{CoupError, Result};
use crate::event::Event;
use crate::exchange::validate_keep;
use crate::state::Perspective;
use crate::{Action, Card, Character, PlayerId};

pub struct Console<R, W> {
    input: R,
    output: W,
}

impl Console<StdinLock<'static>, Stdout> {
    pub fn stdio() -> Self {
        Self::new(std::io::stdin().lock(), std::io::stdout())
    }
}

impl<R: BufRead, W: Write> Console<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    pub fn into_inner(self) -> (R, W) {
        (self.input, self.output)
    }

    fn say(&mut self, text: impl AsRef<str>) -> Result<()> {
        writeln!(self.output, "{}", text.as_ref())
            .map_err(|source| CoupError::Io { context: "writing to the console", source })
    }

    /// Reads one trimmed line. End of input aborts the game.
    fn read_line(&mut self, player: PlayerId, query: &'static str) -> Result<String> {
        write!(self.output, "> ")
            .and_then(|_| self.output.flush())
            .map_err(|source| CoupError::Io { context: "writing to the console", source })?;

        let mut line = String::new();
        let read = self
            .input
            .read_line(&mut line)
            .map_err(|source| CoupError::Io { context: "reading from the console", source })?;

        if read == 0 {
            return Err(CoupError::Aborted { player, query });
        }
        Ok(line.trim().to_string())
    }

    /// Asks until the answer is a number between 1 and `count`, returns it zero based.
    fn read_choice(&mut self, player: PlayerId, query: &'static str, count: usize) -> Result<usize> {
        loop {
            let line = self.read_line(player, query)?;
            match line.parse::<usize>() {
                Ok(choice) if (1..=count).contains(&choice) => return Ok(choice - 1),
                _ => self.say(format!("Invalid choice. Please choose a number between 1 and {count}."))?,
            }
        }
    }

    fn show_hand(&mut self, view: &Perspective<'_>) -> Result<()> {
        let cards = view
            .hand
            .iter()
            .map(|card| if card.revealed { format!("{} (revealed)", card.character) } else { card.character.to_string() })
            .collect::<Vec<_>>()
            .join(", ");
        self.say(format!("Your cards: {cards} | coins: {}", view.coins()))
    }

    fn list_cards(&mut self, cards: &[Card]) -> Result<()> {
        for (n, card) in cards.iter().enumerate() {
            self.say(format!("{}. {}", n + 1, card.character))?;
        }
        Ok(())
    }
}

impl<R: BufRead, W: Write> DecisionSource for Console<R, W> {
    fn choose_action(&mut self, view: &Perspective<'_>, options: &[Action]) -> Result<Action> {
        self.show_hand(view)?;
        self.say("Choose an action:")?;
        for (n, action) in options.iter().enumerate() {
            self.say(format!("{}. {}", n + 1, action.describe()))?;
        }

        let choice = self.read_choice(view.me, "choose an action", options.len())?;
        Ok(options[choice])
    }

    fn choose_target(&mut self, view: &Perspective<'_>, action: Action, candidates: &[PlayerId]) -> Result<PlayerId> {
        self.say(format!("Choose a player to {action}:"))?;
        for (n, &target) in candidates.iter().enumerate() {
            let player = &view.table.players[target];
            self.say(format!("{}. {} ({} coins, {} influence)", n + 1, player.name, player.coins, player.influence))?;
        }

        loop {
            let line = self.read_line(view.me, "choose a target")?;
            if let Ok(choice) = line.parse::<usize>() {
                if let Some(&target) = choice.checked_sub(1).and_then(|idx| candidates.get(idx)) {
                    return Ok(target);
                }
            }
            if let Some(&target) = candidates.iter().find(|&&target| view.table.name(target).eq_ignore_ascii_case(&line)) {
                return Ok(target);
            }
            self.say("Invalid target. Enter a number or a player's name.")?;
        }
    }

    fn respond_yes_no(&mut self, view: &Perspective<'_>, prompt: &Prompt) -> Result<bool> {
        self.show_hand(view)?;
        self.say(format!("{} (yes/no)", prompt.describe(&view.table)))?;

        loop {
            let line = self.read_line(view.me, "answer yes or no")?;
            match line.to_ascii_lowercase().as_str() {
                "y" | "yes" => return Ok(true),
                "n" | "no" => return Ok(false),
                _ => self.say("Please answer yes or no.")?,
            }
        }
    }

    fn choose_card_to_lose(&mut self, view: &Perspective<'_>, unrevealed: &[Card]) -> Result<usize> {
        self.say("You must lose an influence. Choose a card to reveal:")?;
        self.list_cards(unrevealed)?;
        self.read_choice(view.me, "choose a card to lose", unrevealed.len())
    }

    fn choose_exchange_keep(&mut self, view: &Perspective<'_>, candidates: &[Card], keep: usize) -> Result<Vec<usize>> {
        self.say(format!("Choose {keep} card(s) to keep:"))?;
        self.list_cards(candidates)?;

        loop {
            self.say(format!("Enter the numbers of the {keep} card(s) you want to keep, separated by space:"))?;
            let line = self.read_line(view.me, "choose cards to keep")?;
            let chosen: Option<Vec<usize>> = line
                .split_whitespace()
                .map(|word| word.parse::<usize>().ok().and_then(|n| n.checked_sub(1)))
                .collect();

            match chosen {
                Some(chosen) if validate_keep(view.me, &chosen, candidates.len(), keep).is_ok() => return Ok(chosen),
                _ => self.say(format!("Invalid selection. Pick {keep} different card number(s)."))?,
            }
        }
    }

    fn choose_block(
        &mut self,
        view: &Perspective<'_>,
        actor: PlayerId,
        action: Action,
        options: &[Character],
    ) -> Result<Option<Character>> {
        if let [only] = options {
            let prompt = Prompt::Block { actor, action, character: *only };
            return Ok(self.respond_yes_no(view, &prompt)?.then_some(*only));
        }

        self.show_hand(view)?;
        self.say(format!("{} wants to {action}. How do you respond?", view.table.name(actor)))?;
        self.say("1. Allow")?;
        for (n, character) in options.iter().enumerate() {
            self.say(format!("{}. Block with {character}", n + 2))?;
        }

        let choice = self.read_choice(view.me, "choose a block", options.len() + 1)?;
        Ok(choice.checked_sub(1).map(|idx| options[idx]))
    }

    fn observe(&mut self, view: &Perspective<'_>, event: &Event) {
        let mut lines = vec![event.narrate(&view.table)];
        if let Event::CardSwapped { player, returned, slot } = *event {
            if let Some(drawn) = view.hand.get(slot).filter(|_| player == view.me) {
                lines.push(format!("You swap out {returned} for a new card: {}", drawn.character));
            }
        }

        for line in lines {
            if let Err(err) = self.say(line) {
                // the game goes on without narration
                warn!(%err, "could not narrate event");
                return;
            }
        }
    }
}
