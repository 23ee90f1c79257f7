use crate::error::ConfigError;
use crate::game::{GameConfig, MAX_PLAYERS, MIN_PLAYERS, round_count};
use clap::Parser;
use std::collections::HashSet;
use std::net::{Ipv4Addr, SocketAddr};
use std::time::Duration;

pub const DEFAULT_PORT: u16 = 2000;

/// 沒有指定名稱時依座位使用的預設名稱
pub const DEFAULT_NAMES: [&str; MAX_PLAYERS] = [
    "Player Alfa",
    "Player Bravo",
    "Player Charlie",
    "Player Delta",
    "Player Echo",
    "Player Foxtrot",
];

/// 伺服器設定 (命令列參數或環境變數)
#[derive(Debug, Clone, Parser)]
#[command(name = "wizard-server")]
#[command(about = "Wizard trick-taking card game server")]
pub struct ServerConfig {
    /// TCP port to listen on
    #[arg(short, long, env = "WIZARD_PORT", default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// Number of seats at the table
    #[arg(long, env = "WIZARD_PLAYERS", default_value_t = 3)]
    pub players: usize,

    /// Comma-separated player names, one per seat
    #[arg(long, env = "WIZARD_NAMES", value_delimiter = ',')]
    pub names: Vec<String>,

    /// Play only this many rounds
    #[arg(long, env = "WIZARD_ROUNDS")]
    pub rounds: Option<u32>,

    /// Seconds to wait for each answer (0 waits forever)
    #[arg(long, env = "WIZARD_ASK_TIMEOUT_SECS", default_value_t = 300)]
    pub ask_timeout_secs: u64,

    /// Deck seed for reproducible games
    #[arg(long, env = "WIZARD_SEED")]
    pub seed: Option<u64>,

    /// Reject cards that do not follow the lead color when the hand holds it
    #[arg(long, env = "WIZARD_FOLLOW_SUIT")]
    pub follow_suit: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            players: 3,
            names: Vec::new(),
            rounds: None,
            ask_timeout_secs: 300,
            seed: None,
            follow_suit: false,
        }
    }
}

impl ServerConfig {
    /// 檢查座位數、名稱與回合數
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(MIN_PLAYERS..=MAX_PLAYERS).contains(&self.players) {
            return Err(ConfigError::PlayerCount {
                got: self.players,
                min: MIN_PLAYERS,
                max: MAX_PLAYERS,
            });
        }

        let names = self.seat_names()?;
        let mut seen = HashSet::new();
        if names.iter().any(|n| n.is_empty() || !seen.insert(n.as_str())) {
            return Err(ConfigError::InvalidNames);
        }

        round_count(self.players, self.rounds)?;
        Ok(())
    }

    /// 每個座位的名稱
    pub fn seat_names(&self) -> Result<Vec<String>, ConfigError> {
        if self.names.is_empty() {
            return Ok(DEFAULT_NAMES
                .iter()
                .take(self.players)
                .map(|n| n.to_string())
                .collect());
        }

        if self.names.len() != self.players {
            return Err(ConfigError::NameCount {
                expected: self.players,
                got: self.names.len(),
            });
        }
        Ok(self.names.iter().map(|n| n.trim().to_string()).collect())
    }

    pub fn ask_timeout(&self) -> Option<Duration> {
        match self.ask_timeout_secs {
            0 => None,
            secs => Some(Duration::from_secs(secs)),
        }
    }

    pub fn game_config(&self) -> GameConfig {
        GameConfig {
            rounds: self.rounds,
            seed: self.seed,
            follow_suit: self.follow_suit,
        }
    }

    pub fn listen_addr(&self) -> SocketAddr {
        SocketAddr::from((Ipv4Addr::UNSPECIFIED, self.port))
    }
}
