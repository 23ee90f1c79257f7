use super::card::{Card, Color, MAX_NUMBER, MIN_NUMBER};
use super::hand::Hand;
use rand::Rng;

/// 一副完整牌組的張數: 13 x 4 數字牌 + 4 巫師 + 4 小丑
pub const DECK_SIZE: usize = 60;
const SPECIALS_PER_KIND: usize = 4;

/// 牌組 (抽出不放回)
///
/// 每一回合建立一副新的牌組，回合結束後丟棄。
pub struct Deck {
    cards: Vec<Card>,
}

impl Deck {
    /// 建立完整的 60 張牌
    pub fn new() -> Self {
        let mut cards = Vec::with_capacity(DECK_SIZE);
        for color in Color::all() {
            for value in MIN_NUMBER..=MAX_NUMBER {
                cards.push(Card::number(value, color));
            }
        }
        for _ in 0..SPECIALS_PER_KIND {
            cards.push(Card::Wizard);
            cards.push(Card::Jester);
        }
        Self { cards }
    }

    /// 隨機抽出一張牌並從牌組移除，牌組空時回傳 None
    pub fn draw<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Option<Card> {
        if self.cards.is_empty() {
            return None;
        }
        let idx = rng.gen_range(0..self.cards.len());
        Some(self.cards.swap_remove(idx))
    }

    /// 發牌給 n 位玩家，每人 cards_per_player 張
    ///
    /// 依座位順序每人一次抽滿；牌不夠時回傳 None，且牌組狀態不保證。
    pub fn deal<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
        num_players: usize,
        cards_per_player: usize,
    ) -> Option<Vec<Hand>> {
        if self.cards.len() < num_players * cards_per_player {
            return None;
        }

        let mut hands = Vec::with_capacity(num_players);
        for _ in 0..num_players {
            let mut cards = Vec::with_capacity(cards_per_player);
            for _ in 0..cards_per_player {
                cards.push(self.draw(rng)?);
            }
            hands.push(Hand::new(cards));
        }
        Some(hands)
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// 取得所有剩餘的牌
    pub fn cards(&self) -> &[Card] {
        &self.cards
    }
}

impl Default for Deck {
    fn default() -> Self {
        Self::new()
    }
}
