pub mod room;

pub use room::{Room, accept_players};
