pub mod codec;
pub mod messages;

pub use codec::{MessageReader, MessageWriter};
pub use messages::{ClientMessage, GameStatus, ReplyKind, ScoreEntry, ServerMessage, Standing};
