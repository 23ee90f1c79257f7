use super::card::{Card, Color};
use super::hand::Hand;
use super::trick::Trick;
use crate::error::ConnectionError;
use crate::net::ConnectionHandler;
use crate::protocol::{ClientMessage, GameStatus, ReplyKind, ServerMessage};
use log::{info, warn};
use thiserror::Error;

/// 不合規則的回覆 (說明文字會以 GAME_ERROR 送回給該玩家)
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Rejection {
    #[error("You cannot take less than 0 tricks!")]
    NegativePrediction,

    #[error("You cannot take {0} tricks in this round!")]
    PredictionTooHigh(i32),

    #[error("You must not predict taking {0} tricks")]
    ForbiddenPrediction(u32),

    #[error("You have selected card '{0}', which is not on your hand!")]
    NotInHand(Card),

    #[error("You must follow {0} while you still hold it!")]
    MustFollowSuit(Color),
}

/// 驗證叫墩數: 0 <= value <= upper_bound，且不可等於 forbidden
pub fn check_prediction(
    value: i32,
    upper_bound: u32,
    forbidden: Option<u32>,
) -> Result<u32, Rejection> {
    let Ok(prediction) = u32::try_from(value) else {
        return Err(Rejection::NegativePrediction);
    };
    if prediction > upper_bound {
        return Err(Rejection::PredictionTooHigh(value));
    }
    if forbidden == Some(prediction) {
        return Err(Rejection::ForbiddenPrediction(prediction));
    }
    Ok(prediction)
}

/// 驗證出牌: 必須在手牌中；啟用跟牌規則時還必須跟領牌花色
pub fn check_card(
    card: &Card,
    hand: &Hand,
    trick: &Trick,
    follow_suit: bool,
) -> Result<(), Rejection> {
    if !hand.contains(card) {
        return Err(Rejection::NotInHand(*card));
    }
    if follow_suit && !trick.follows_suit(card, hand) {
        if let Some(lead) = trick.lead_color() {
            return Err(Rejection::MustFollowSuit(lead));
        }
    }
    Ok(())
}

/// 一個座位: 名稱 + 連線 + 目前手牌
///
/// 所有 ask_* 都是「詢問 / 驗證 / 說明 / 重問」迴圈，只有在連線失效時才會放棄。
pub struct Player {
    seat: usize,
    name: String,
    conn: ConnectionHandler,
    hand: Hand,
}

impl Player {
    pub fn new(seat: usize, name: impl Into<String>, conn: ConnectionHandler) -> Self {
        Self {
            seat,
            name: name.into(),
            conn,
            hand: Hand::default(),
        }
    }

    pub fn seat(&self) -> usize {
        self.seat
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn hand(&self) -> &Hand {
        &self.hand
    }

    pub fn is_connected(&self) -> bool {
        !self.conn.is_closed()
    }

    /// 發一手新牌 (覆蓋舊的) 並推送給客戶端
    pub fn give_hand(&mut self, hand: Hand) -> Result<(), ConnectionError> {
        self.hand = hand;
        self.push_hand()
    }

    pub fn send(&mut self, msg: &ServerMessage) -> Result<(), ConnectionError> {
        self.conn.send(msg)
    }

    /// 單向推送，失敗只記錄 (之後的 ask 會回報連線錯誤)
    pub fn notify(&mut self, msg: &ServerMessage) {
        if let Err(e) = self.conn.send(msg) {
            warn!(
                "[PLAYER] Failed to send {} to {} (seat {}): {}",
                msg.tag(),
                self.name,
                self.seat,
                e
            );
        }
    }

    pub fn update_status(&mut self, status: GameStatus) {
        self.notify(&ServerMessage::GameStatus(status));
    }

    /// 詢問叫墩數直到合法
    pub fn ask_prediction(
        &mut self,
        upper_bound: u32,
        forbidden: Option<u32>,
    ) -> Result<u32, ConnectionError> {
        loop {
            let reply = self
                .conn
                .ask_and_await(&ServerMessage::AskPrediction, ReplyKind::AnswerPrediction)?;
            let ClientMessage::AnswerPrediction(value) = reply else {
                continue;
            };

            match check_prediction(value, upper_bound, forbidden) {
                Ok(prediction) => {
                    info!("[PLAYER] {} predicts {} tricks", self.name, prediction);
                    return Ok(prediction);
                }
                Err(rejection) => {
                    info!("[PLAYER] {} prediction {} rejected: {}", self.name, value, rejection);
                    self.conn.send(&ServerMessage::GameError(rejection.to_string()))?;
                }
            }
        }
    }

    /// 詢問要出的牌直到合法，接受後從手牌移除並推送新手牌
    pub fn ask_trick_card(
        &mut self,
        trick: &Trick,
        follow_suit: bool,
    ) -> Result<Card, ConnectionError> {
        loop {
            let reply = self
                .conn
                .ask_and_await(&ServerMessage::AskTrickCard, ReplyKind::AnswerTrickCard)?;
            let ClientMessage::AnswerTrickCard(card) = reply else {
                continue;
            };

            match check_card(&card, &self.hand, trick, follow_suit) {
                Ok(()) => {
                    self.hand.remove(&card);
                    self.push_hand()?;
                    return Ok(card);
                }
                Err(rejection) => {
                    info!("[PLAYER] {} card {} rejected: {}", self.name, card, rejection);
                    // 先重送手牌讓客戶端同步
                    self.push_hand()?;
                    self.conn.send(&ServerMessage::GameError(rejection.to_string()))?;
                }
            }
        }
    }

    /// 翻出巫師時由此玩家決定王牌花色
    pub fn ask_trump_color(&mut self) -> Result<Color, ConnectionError> {
        loop {
            let reply = self
                .conn
                .ask_and_await(&ServerMessage::AskTrumpColor, ReplyKind::AnswerTrumpColor)?;
            if let ClientMessage::AnswerTrumpColor(color) = reply {
                info!("[PLAYER] {} chooses {} as trump", self.name, color);
                return Ok(color);
            }
        }
    }

    fn push_hand(&mut self) -> Result<(), ConnectionError> {
        self.conn.send(&ServerMessage::UpdateHand(self.hand.to_vec()))
    }
}
