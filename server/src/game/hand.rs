use super::card::{Card, Color};

/// 玩家手牌
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Hand {
    cards: Vec<Card>,
}

impl Hand {
    /// 建立手牌並排序 (方便玩家閱讀)
    pub fn new(mut cards: Vec<Card>) -> Self {
        cards.sort_by_key(|c| c.sort_key());
        Self { cards }
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn to_vec(&self) -> Vec<Card> {
        self.cards.clone()
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn contains(&self, card: &Card) -> bool {
        self.cards.contains(card)
    }

    /// 手中是否還有該花色的牌
    pub fn has_color(&self, color: Color) -> bool {
        self.cards.iter().any(|c| c.color() == Some(color))
    }

    /// 移除一張牌，不在手牌中時回傳 false
    pub fn remove(&mut self, card: &Card) -> bool {
        match self.cards.iter().position(|c| c == card) {
            Some(pos) => {
                self.cards.remove(pos);
                true
            }
            None => false,
        }
    }
}
