use super::card::{Card, Color};
use super::deck::Deck;
use super::player::Player;
use super::score::ScoreBoard;
use super::trick::{Trick, seat_of};
use crate::error::{ConnectionError, GameError};
use crate::protocol::{GameStatus, ServerMessage};
use log::{debug, info};
use rand::Rng;

/// 回合階段
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundPhase {
    Dealing,
    TrumpSelection,
    Predicting,
    Playing { trick: u32 },
    Scoring,
    Done,
}

/// 最後一位叫墩者不能叫的數字 (會讓總和剛好等於本回合墩數)
///
/// 前面的總和已經超過墩數時沒有任何限制。
pub fn forbidden_prediction(cards_per_player: u32, predicted_so_far: u32) -> Option<u32> {
    cards_per_player.checked_sub(predicted_so_far)
}

/// 本回合最後出牌的座位 (翻出巫師時由他決定王牌)
pub fn dealer_seat(first_seat: usize, num_players: usize) -> usize {
    (first_seat + num_players - 1) % num_players
}

fn seat_lost(player: &Player, source: ConnectionError) -> GameError {
    GameError::SeatLost {
        seat: player.seat(),
        name: player.name().to_string(),
        source,
    }
}

fn broadcast(players: &mut [Player], msg: &ServerMessage) {
    for player in players.iter_mut() {
        player.notify(msg);
    }
}

/// 輪到 `active` 時: 他收到 status，其他人收到對應的 *_OTHER
fn announce(players: &mut [Player], active: usize, status: GameStatus) {
    for player in players.iter_mut() {
        if player.seat() == active {
            player.update_status(status);
        } else {
            player.update_status(status.other());
        }
    }
}

/// 一個回合: 每人 `number` 張牌，打 `number` 墩
///
/// `players` 必須依座位排序 (players[i].seat() == i)。
pub struct Round {
    number: u32,
    first_seat: usize,
    follow_suit: bool,
    phase: RoundPhase,
    trump_card: Option<Card>,
    trump: Option<Color>,
}

impl Round {
    pub fn new(number: u32, first_seat: usize, follow_suit: bool) -> Self {
        Self {
            number,
            first_seat,
            follow_suit,
            phase: RoundPhase::Dealing,
            trump_card: None,
            trump: None,
        }
    }

    pub fn number(&self) -> u32 {
        self.number
    }

    pub fn phase(&self) -> RoundPhase {
        self.phase
    }

    pub fn trump_card(&self) -> Option<Card> {
        self.trump_card
    }

    pub fn trump(&self) -> Option<Color> {
        self.trump
    }

    /// 跑完整個回合，回傳下一回合的起始座位 (最後一墩的贏家)
    pub fn play<R: Rng + ?Sized>(
        &mut self,
        players: &mut [Player],
        scores: &mut ScoreBoard,
        rng: &mut R,
    ) -> Result<usize, GameError> {
        info!(
            "[ROUND] Round {} starts, seat {} ({}) leads",
            self.number,
            self.first_seat,
            players.get(self.first_seat).map_or("?", |p| p.name())
        );

        let trump_card = self.deal(players, rng)?;
        self.select_trump(players, trump_card)?;
        self.collect_predictions(players, scores)?;
        let next_first = self.play_tricks(players, scores)?;
        self.score(players, scores);

        Ok(next_first)
    }

    fn enter(&mut self, phase: RoundPhase) {
        debug!("[ROUND] Round {}: {:?} -> {:?}", self.number, self.phase, phase);
        self.phase = phase;
    }

    /// 發牌後再翻一張牌決定王牌
    fn deal<R: Rng + ?Sized>(
        &mut self,
        players: &mut [Player],
        rng: &mut R,
    ) -> Result<Card, GameError> {
        self.enter(RoundPhase::Dealing);

        let mut deck = Deck::new();
        let hands = deck
            .deal(rng, players.len(), self.number as usize)
            .ok_or(GameError::DeckExhausted)?;

        for (player, hand) in players.iter_mut().zip(hands) {
            player.give_hand(hand).map_err(|e| seat_lost(player, e))?;
        }

        let trump_card = deck.draw(rng).ok_or(GameError::DeckExhausted)?;
        debug!("[ROUND] {} cards left in deck", deck.len());
        self.trump_card = Some(trump_card);
        info!("[ROUND] Trump card: {}", trump_card);
        broadcast(players, &ServerMessage::UpdateTrumpCard(trump_card));

        Ok(trump_card)
    }

    fn select_trump(&mut self, players: &mut [Player], trump_card: Card) -> Result<(), GameError> {
        self.enter(RoundPhase::TrumpSelection);

        self.trump = match trump_card {
            Card::Number { color, .. } => Some(color),
            Card::Jester => None,
            Card::Wizard => {
                let dealer = dealer_seat(self.first_seat, players.len());
                announce(players, dealer, GameStatus::WaitingTrumpDecision);
                let player = players
                    .get_mut(dealer)
                    .ok_or(GameError::Internal("dealer seat out of range"))?;
                let color = player.ask_trump_color().map_err(|e| seat_lost(player, e))?;
                Some(color)
            }
        };

        match self.trump {
            Some(color) => info!("[ROUND] Trump color: {}", color),
            None => info!("[ROUND] No trump this round"),
        }
        broadcast(players, &ServerMessage::UpdateTrumpColor(self.trump));
        Ok(())
    }

    fn collect_predictions(
        &mut self,
        players: &mut [Player],
        scores: &mut ScoreBoard,
    ) -> Result<(), GameError> {
        self.enter(RoundPhase::Predicting);
        broadcast(players, &ServerMessage::UpdateScores(scores.snapshot()));

        let num_players = players.len();
        for position in 0..num_players {
            let seat = seat_of(self.first_seat, position, num_players);
            let forbidden = if position + 1 == num_players {
                forbidden_prediction(self.number, scores.predicted_total())
            } else {
                None
            };

            announce(players, seat, GameStatus::WaitingPrediction);
            let player = players.get_mut(seat).ok_or(GameError::Internal("seat out of range"))?;
            let prediction = player
                .ask_prediction(self.number, forbidden)
                .map_err(|e| seat_lost(player, e))?;

            scores.set_prediction(seat, prediction);
            broadcast(players, &ServerMessage::UpdateScores(scores.snapshot()));
        }

        info!(
            "[ROUND] Predictions total {} for {} tricks",
            scores.predicted_total(),
            self.number
        );
        Ok(())
    }

    fn play_tricks(
        &mut self,
        players: &mut [Player],
        scores: &mut ScoreBoard,
    ) -> Result<usize, GameError> {
        let num_players = players.len();
        let mut lead = self.first_seat;

        for trick_no in 1..=self.number {
            self.enter(RoundPhase::Playing { trick: trick_no });
            let mut trick = Trick::new(self.trump);

            for position in 0..num_players {
                let seat = seat_of(lead, position, num_players);
                announce(players, seat, GameStatus::WaitingCard);

                let player = players.get_mut(seat).ok_or(GameError::Internal("seat out of range"))?;
                let card = player
                    .ask_trick_card(&trick, self.follow_suit)
                    .map_err(|e| seat_lost(player, e))?;

                trick.push(card);
                broadcast(players, &ServerMessage::UpdateTrick(trick.cards().to_vec()));
            }

            let position = trick
                .taken_by()
                .ok_or(GameError::Internal("trick resolved without cards"))?;
            let winner = seat_of(lead, position, num_players);
            info!(
                "[ROUND] {} taken by seat {} ({})",
                trick,
                winner,
                players[winner].name()
            );

            scores.add_trick(winner);
            broadcast(players, &ServerMessage::UpdateScores(scores.snapshot()));
            broadcast(players, &ServerMessage::UpdateTrick(Vec::new()));
            lead = winner;
        }

        Ok(lead)
    }

    fn score(&mut self, players: &mut [Player], scores: &mut ScoreBoard) {
        self.enter(RoundPhase::Scoring);

        let deltas = scores.apply_round();
        for (seat, delta) in deltas.iter().enumerate() {
            debug!("[ROUND] Seat {} {:+} -> {}", seat, delta, scores.score(seat));
        }
        broadcast(players, &ServerMessage::UpdateScores(scores.snapshot()));

        self.enter(RoundPhase::Done);
        info!("[ROUND] Round {} done", self.number);
    }
}
