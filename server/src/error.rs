use std::io;
use std::time::Duration;
use thiserror::Error;

/// 單一連線的錯誤
#[derive(Debug, Error)]
pub enum ConnectionError {
    #[error("connection closed")]
    Closed,

    #[error("no reply within {0:?}")]
    Timeout(Duration),

    #[error("transport error: {0}")]
    Io(#[from] io::Error),
}

/// 讓整場遊戲中止的錯誤
#[derive(Debug, Error)]
pub enum GameError {
    #[error("seat {seat} ({name}) lost: {source}")]
    SeatLost {
        seat: usize,
        name: String,
        #[source]
        source: ConnectionError,
    },

    #[error("deck ran out of cards")]
    DeckExhausted,

    #[error("internal error: {0}")]
    Internal(&'static str),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// 設定錯誤
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("player count must be between {min} and {max}, got {got}")]
    PlayerCount { got: usize, min: usize, max: usize },

    #[error("expected {expected} player names, got {got}")]
    NameCount { expected: usize, got: usize },

    #[error("player names must be non-empty and unique")]
    InvalidNames,

    #[error("round count must be between 1 and {max}, got {got}")]
    RoundCount { got: u32, max: u32 },

    #[error("players must occupy seats 0..{0} exactly once")]
    SeatNumbers(usize),
}
