pub mod config;
pub mod error;
pub mod game;
pub mod lobby;
pub mod net;
pub mod protocol;
