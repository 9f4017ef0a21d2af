use derive_more::{Display, Error};
use crate::{Action, PlayerId};

pub type Result<T> = std::result::Result<T, CoupError>;

#[derive(Debug, Display, Error)]
pub enum CoupError {
    #[display("deck exhausted: no eligible card left to draw")]
    DeckExhausted,

    #[display("player {player} cannot target player {target}")]
    InvalidTarget { player: PlayerId, target: PlayerId },

    #[display("player {player} cannot {action}: {reason}")]
    IllegalAction {
        player: PlayerId,
        action: Action,
        reason: &'static str,
    },

    #[display("invalid choice from player {player}: {detail}")]
    InvalidChoice { player: PlayerId, detail: String },

    #[display("player {player} aborted while asked to {query}")]
    Aborted { player: PlayerId, query: &'static str },

    #[display("invalid configuration for `{field}`: {reason}")]
    InvalidConfig { field: &'static str, reason: String },

    #[display("i/o error while {context}: {source}")]
    Io {
        context: &'static str,
        source: std::io::Error,
    },

    #[display("could not parse config {path}: {source}")]
    ConfigParse {
        path: String,
        source: serde_json::Error,
    },
}

impl CoupError {
    /// Errors the turn loop recovers from by re-asking or skipping a sub-action.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            CoupError::DeckExhausted
                | CoupError::InvalidTarget { .. }
                | CoupError::IllegalAction { .. }
                | CoupError::InvalidChoice { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use std::error::Error;
    use crate::{Action, CoupError};

    #[test]
    fn display() {
        let err = CoupError::IllegalAction {
            player: 0,
            action: Action::Income,
            reason: "a coup is forced at 10 coins",
        };
        assert_eq!(err.to_string(), "player 0 cannot take Income: a coup is forced at 10 coins");
        assert!(err.is_recoverable());
    }

    #[test]
    fn io_keeps_source() {
        let err = CoupError::Io {
            context: "reading input",
            source: std::io::Error::new(std::io::ErrorKind::UnexpectedEof, "eof"),
        };
        assert!(err.source().is_some());
        assert!(!err.is_recoverable());
    }
}
