pub mod card;
pub mod deck;
pub mod engine;
pub mod hand;
pub mod player;
pub mod round;
pub mod score;
pub mod trick;

pub use card::{Card, Color, InvalidCard};
pub use deck::{DECK_SIZE, Deck};
pub use engine::{Game, GameConfig, MAX_PLAYERS, MIN_PLAYERS, round_count};
pub use hand::Hand;
pub use player::{Player, Rejection};
pub use round::{Round, RoundPhase};
pub use score::{ScoreBoard, round_score};
pub use trick::Trick;
