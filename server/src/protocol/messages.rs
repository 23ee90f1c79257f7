use crate::game::{Card, Color};
use serde::{Deserialize, Serialize};
use std::fmt;

/// 遊戲狀態 (告訴客戶端現在在等誰)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GameStatus {
    WaitingTrumpDecision,
    WaitingTrumpDecisionOther,
    WaitingPrediction,
    WaitingPredictionOther,
    WaitingCard,
    WaitingCardOther,
    Unknown,
}

impl GameStatus {
    /// 其他玩家看到的對應狀態
    pub fn other(self) -> Self {
        match self {
            GameStatus::WaitingTrumpDecision => GameStatus::WaitingTrumpDecisionOther,
            GameStatus::WaitingPrediction => GameStatus::WaitingPredictionOther,
            GameStatus::WaitingCard => GameStatus::WaitingCardOther,
            other => other,
        }
    }
}

/// 記分表中的一列
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreEntry {
    pub seat: usize,
    pub name: String,
    /// 尚未叫墩時為 None
    pub prediction: Option<u32>,
    pub tricks: u32,
    pub score: i32,
}

/// 最終排名
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Standing {
    pub rank: usize,
    pub name: String,
    pub score: i32,
}

/// 伺服器到客戶端的訊息
///
/// 線上格式為 {"type": "...", "data": ...}，無內容的訊息省略 data。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ServerMessage {
    /// 規則錯誤說明 (之後會重新詢問)
    GameError(String),
    GameStatus(GameStatus),
    UpdateHand(Vec<Card>),
    UpdateTrumpCard(Card),
    /// None 表示本回合沒有王牌
    UpdateTrumpColor(Option<Color>),
    UpdateTrick(Vec<Card>),
    UpdateScores(Vec<ScoreEntry>),
    GameOver(Vec<Standing>),
    AskPrediction,
    AskTrickCard,
    AskTrumpColor,
}

impl ServerMessage {
    /// 訊息類型標籤 (用於 log)
    pub fn tag(&self) -> &'static str {
        match self {
            ServerMessage::GameError(_) => "GAME_ERROR",
            ServerMessage::GameStatus(_) => "GAME_STATUS",
            ServerMessage::UpdateHand(_) => "UPDATE_HAND",
            ServerMessage::UpdateTrumpCard(_) => "UPDATE_TRUMP_CARD",
            ServerMessage::UpdateTrumpColor(_) => "UPDATE_TRUMP_COLOR",
            ServerMessage::UpdateTrick(_) => "UPDATE_TRICK",
            ServerMessage::UpdateScores(_) => "UPDATE_SCORES",
            ServerMessage::GameOver(_) => "GAME_OVER",
            ServerMessage::AskPrediction => "ASK_PREDICTION",
            ServerMessage::AskTrickCard => "ASK_TRICK_CARD",
            ServerMessage::AskTrumpColor => "ASK_TRUMP_COLOR",
        }
    }
}

/// 客戶端到伺服器的訊息
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ClientMessage {
    AnswerPrediction(i32),
    AnswerTrickCard(Card),
    AnswerTrumpColor(Color),
}

impl ClientMessage {
    pub fn kind(&self) -> ReplyKind {
        match self {
            ClientMessage::AnswerPrediction(_) => ReplyKind::AnswerPrediction,
            ClientMessage::AnswerTrickCard(_) => ReplyKind::AnswerTrickCard,
            ClientMessage::AnswerTrumpColor(_) => ReplyKind::AnswerTrumpColor,
        }
    }
}

/// 客戶端回覆的類型 (ask_and_await 用來比對)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReplyKind {
    AnswerPrediction,
    AnswerTrickCard,
    AnswerTrumpColor,
}

impl fmt::Display for ReplyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self {
            ReplyKind::AnswerPrediction => "ANSWER_PREDICTION",
            ReplyKind::AnswerTrickCard => "ANSWER_TRICK_CARD",
            ReplyKind::AnswerTrumpColor => "ANSWER_TRUMP_COLOR",
        };
        f.write_str(tag)
    }
}
