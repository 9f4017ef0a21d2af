use std::collections::HashSet;
use std::path::Path;
use std::time::Duration;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg64;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};
use crate::ai::{BotWeights, WeightedBot};
use crate::console::Console;
use crate::error::{CoupError, Result};
use crate::game::{Game, Seat};
use crate::{MAX_PLAYERS, MIN_PLAYERS};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SeatKind {
    Human,
    Bot,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeatConfig {
    pub name: String,
    pub kind: SeatKind,
}

impl SeatConfig {
    pub fn bot(name: impl Into<String>) -> Self {
        Self { name: name.into(), kind: SeatKind::Bot }
    }

    pub fn human(name: impl Into<String>) -> Self {
        Self { name: name.into(), kind: SeatKind::Human }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameConfig {
    pub seats: Vec<SeatConfig>,

    /// Fixed seed for the deck and every bot. Fresh entropy when absent.
    #[serde(default)]
    pub seed: Option<u64>,

    #[serde(default)]
    pub bot_delay_ms: u64,

    #[serde(default)]
    pub bot: BotWeights,
}

impl GameConfig {
    /// `players` seats. With a `human` name that player sits first and the
    /// rest are bots.
    pub fn quick(players: usize, human: Option<String>) -> Self {
        let seats = match human {
            Some(name) => std::iter::once(SeatConfig::human(name))
                .chain((1..players).map(|n| SeatConfig::bot(format!("Bot {n}"))))
                .collect(),
            None => (1..=players).map(|n| SeatConfig::bot(format!("Bot {n}"))).collect(),
        };

        Self {
            seats,
            seed: None,
            bot_delay_ms: 0,
            bot: BotWeights::default(),
        }
    }

    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|source| CoupError::Io { context: "reading the config file", source })?;

        let config: Self = serde_json::from_str(&content).map_err(|source| CoupError::ConfigParse {
            path: path.display().to_string(),
            source,
        })?;

        config.validate()?;
        info!(seats = config.seats.len(), "config loaded");
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if !(MIN_PLAYERS..=MAX_PLAYERS).contains(&self.seats.len()) {
            return Err(CoupError::InvalidConfig {
                field: "seats",
                reason: format!("{} seats, need {MIN_PLAYERS} to {MAX_PLAYERS}", self.seats.len()),
            });
        }

        let mut names = HashSet::new();
        for seat in &self.seats {
            let name = seat.name.trim();
            if name.is_empty() {
                return Err(CoupError::InvalidConfig { field: "seats.name", reason: "names cannot be empty".into() });
            }
            if !names.insert(name) {
                return Err(CoupError::InvalidConfig { field: "seats.name", reason: format!("`{name}` is taken") });
            }
        }

        // every console seat reads the same stdin
        if self.seats.iter().filter(|seat| seat.kind == SeatKind::Human).count() > 1 {
            return Err(CoupError::InvalidConfig { field: "seats.kind", reason: "at most one human seat".into() });
        }

        self.bot.validate()
    }

    /// Seats every player and deals. Bots and the deck draw their seeds from
    /// one generator, so a fixed `seed` replays the same game.
    pub fn into_game(self) -> Result<Game> {
        self.validate()?;

        let mut seeder = match self.seed {
            Some(seed) => Pcg64::seed_from_u64(seed),
            None => Pcg64::from_entropy(),
        };
        let delay = Duration::from_millis(self.bot_delay_ms);

        let seats = self
            .seats
            .into_iter()
            .map(|seat| match seat.kind {
                SeatKind::Human => Seat::new(seat.name, Console::stdio()),
                SeatKind::Bot => {
                    let bot = WeightedBot::new(self.bot.clone(), seeder.gen()).with_delay(delay);
                    Seat::new(seat.name, bot)
                }
            })
            .collect();

        debug!(seed = ?self.seed, "dealing");
        Game::new(seats, Pcg64::seed_from_u64(seeder.gen()))
    }
}

#[cfg(test)]
mod tests {
    use crate::ai::BotWeights;
    use crate::config::{GameConfig, SeatConfig, SeatKind};
    use crate::error::CoupError;

    #[test]
    fn quick_tables() {
        let config = GameConfig::quick(4, Some("Ada".into()));
        assert_eq!(config.seats.len(), 4);
        assert_eq!(config.seats[0], SeatConfig::human("Ada"));
        assert_eq!(config.seats[3], SeatConfig::bot("Bot 3"));

        let config = GameConfig::quick(3, None);
        assert!(config.seats.iter().all(|seat| seat.kind == SeatKind::Bot));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn parses_with_defaults() {
        let json = r#"{
            "seats": [
                { "name": "Ada", "kind": "human" },
                { "name": "Bob", "kind": "bot" }
            ],
            "seed": 7,
            "bot": { "challenge_action": 0.5 }
        }"#;

        let config: GameConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.seed, Some(7));
        assert_eq!(config.bot_delay_ms, 0);
        assert_eq!(config.bot.challenge_action, 0.5);
        assert_eq!(config.bot.challenge_block, BotWeights::default().challenge_block);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn rejects_bad_tables() {
        let field = |config: GameConfig| match config.validate() {
            Err(CoupError::InvalidConfig { field, .. }) => field,
            other => panic!("expected invalid config, got {other:?}"),
        };

        assert_eq!(field(GameConfig::quick(1, None)), "seats");
        assert_eq!(field(GameConfig::quick(7, None)), "seats");

        let mut config = GameConfig::quick(3, None);
        config.seats[1].name = "Bot 1".into();
        assert_eq!(field(config), "seats.name");

        let mut config = GameConfig::quick(3, None);
        config.seats[2].name = "  ".into();
        assert_eq!(field(config), "seats.name");

        let mut config = GameConfig::quick(3, Some("Ada".into()));
        config.seats[1].kind = SeatKind::Human;
        assert_eq!(field(config), "seats.kind");

        let mut config = GameConfig::quick(3, None);
        config.bot.bluff_contessa = -0.1;
        assert_eq!(field(config), "bot.bluff_contessa");
    }

    #[test]
    fn load_reports_missing_and_malformed_files() {
        let missing = GameConfig::load("/definitely/not/here.json").unwrap_err();
        assert!(matches!(missing, CoupError::Io { .. }));

        let path = std::env::temp_dir().join(format!("coup-config-{}.json", std::process::id()));
        std::fs::write(&path, "{ not json").unwrap();
        let malformed = GameConfig::load(&path).unwrap_err();
        std::fs::remove_file(&path).unwrap();
        assert!(matches!(malformed, CoupError::ConfigParse { .. }));
    }

    #[test]
    fn seeded_bot_games_replay() {
        let play = || {
            let mut config = GameConfig::quick(5, None);
            config.seed = Some(99);
            let mut game = config.into_game().unwrap();
            let winner = game.play().unwrap();
            (winner, game.view())
        };

        assert_eq!(play(), play());
    }
}
