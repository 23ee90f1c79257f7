use super::deck::DECK_SIZE;
use super::player::Player;
use super::round::Round;
use super::score::ScoreBoard;
use crate::error::{ConfigError, GameError};
use crate::protocol::{ServerMessage, Standing};
use log::{error, info};
use rand::SeedableRng;
use rand::rngs::StdRng;

pub const MIN_PLAYERS: usize = 2;
pub const MAX_PLAYERS: usize = 6;

/// 一場遊戲的設定 (由 ServerConfig 產生)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GameConfig {
    /// 回合數上限，None 時打滿整副牌支援的回合
    pub rounds: Option<u32>,
    /// 固定亂數種子 (重現同樣的發牌)
    pub seed: Option<u64>,
    /// 是否強制跟牌
    pub follow_suit: bool,
}

/// 總回合數: 每回合要留一張牌翻王牌，上限可再由設定壓低
pub fn round_count(num_players: usize, cap: Option<u32>) -> Result<u32, ConfigError> {
    if !(MIN_PLAYERS..=MAX_PLAYERS).contains(&num_players) {
        return Err(ConfigError::PlayerCount {
            got: num_players,
            min: MIN_PLAYERS,
            max: MAX_PLAYERS,
        });
    }

    let max = ((DECK_SIZE - 1) / num_players) as u32;
    match cap {
        None => Ok(max),
        Some(rounds) if (1..=max).contains(&rounds) => Ok(rounds),
        Some(rounds) => Err(ConfigError::RoundCount { got: rounds, max }),
    }
}

/// 整場遊戲: 依序進行 1..=K 回合，記分表跨回合保存
pub struct Game {
    players: Vec<Player>,
    scores: ScoreBoard,
    rounds: u32,
    follow_suit: bool,
    rng: StdRng,
}

impl Game {
    pub fn new(config: GameConfig, mut players: Vec<Player>) -> Result<Self, ConfigError> {
        let rounds = round_count(players.len(), config.rounds)?;

        players.sort_by_key(Player::seat);
        if players.iter().enumerate().any(|(i, p)| p.seat() != i) {
            return Err(ConfigError::SeatNumbers(players.len()));
        }

        let names: Vec<&str> = players.iter().map(Player::name).collect();
        let scores = ScoreBoard::new(&names);

        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        Ok(Self {
            players,
            scores,
            rounds,
            follow_suit: config.follow_suit,
            rng,
        })
    }

    pub fn rounds(&self) -> u32 {
        self.rounds
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn scores(&self) -> &ScoreBoard {
        &self.scores
    }

    /// 打完所有回合並回傳最終排名
    ///
    /// 任何座位斷線或逾時都會中止整場遊戲，其他座位會收到 GAME_ERROR。
    pub fn play(mut self) -> Result<Vec<Standing>, GameError> {
        info!(
            "[GAME] Starting game with {} players, {} rounds",
            self.players.len(),
            self.rounds
        );

        let mut first_seat = 0;
        for number in 1..=self.rounds {
            let mut round = Round::new(number, first_seat, self.follow_suit);
            match round.play(&mut self.players, &mut self.scores, &mut self.rng) {
                Ok(next_first) => first_seat = next_first,
                Err(e) => {
                    error!("[GAME] Round {} aborted: {}", number, e);
                    self.abort(&e);
                    return Err(e);
                }
            }
        }

        let standings = self.scores.standings();
        for standing in &standings {
            info!(
                "[GAME] #{} {} ({} points)",
                standing.rank, standing.name, standing.score
            );
        }

        let msg = ServerMessage::GameOver(standings.clone());
        for player in self.players.iter_mut() {
            player.notify(&msg);
        }
        Ok(standings)
    }

    fn abort(&mut self, cause: &GameError) {
        let msg = ServerMessage::GameError(format!("Game aborted: {}", cause));
        for player in self.players.iter_mut().filter(|p| p.is_connected()) {
            player.notify(&msg);
        }
    }
}
