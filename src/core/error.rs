//! Engine error type.
//!
//! Only board mutation and configuration parsing can fail. The round
//! engine recovers from every variant internally; none of them is fatal.

use crate::cards::CardId;

/// Errors produced by the card, board and configuration layers.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EngineError {
    #[error("card id {0} is outside the universe 1..=27")]
    InvalidCardId(u8),
    #[error("{0} is not on the board")]
    CardNotOnBoard(CardId),
    #[error("board holds {0} cards, expected 9")]
    BoardSize(usize),
    #[error("not enough eligible cards: needed {needed}, drew {drawn}")]
    DeckExhausted { needed: usize, drawn: usize },
    #[error("duplicate ids survived repair: {0:?}")]
    DuplicateIds(Vec<CardId>),
    #[error("computer committed an invalid triple {0:?}")]
    InvalidComputerTriple([CardId; 3]),
    #[error("unknown difficulty tier `{0}`")]
    UnknownDifficulty(String),
}
