use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// 小丑牌的點數
pub const JESTER_VALUE: u8 = 0;
/// 巫師牌的點數
pub const WIZARD_VALUE: u8 = 14;
/// 數字牌的點數範圍 (1-13)
pub const MIN_NUMBER: u8 = 1;
pub const MAX_NUMBER: u8 = 13;

/// 花色 (巫師與小丑沒有花色，以 `None` 表示)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Color {
    Blue,
    Green,
    Red,
    Yellow,
}

impl Color {
    pub fn all() -> [Color; 4] {
        [Color::Blue, Color::Green, Color::Red, Color::Yellow]
    }

    pub fn symbol(&self) -> char {
        match self {
            Color::Blue => 'B',
            Color::Green => 'G',
            Color::Red => 'R',
            Color::Yellow => 'Y',
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Color::Blue => "Blue",
            Color::Green => "Green",
            Color::Red => "Red",
            Color::Yellow => "Yellow",
        };
        f.write_str(name)
    }
}

/// 一張牌
///
/// 同一副牌中四張巫師 (或四張小丑) 彼此無法區分，因此相等比較只看種類。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "WireCard", into = "WireCard")]
pub enum Card {
    Number { value: u8, color: Color },
    Wizard,
    Jester,
}

impl Card {
    /// 建立數字牌，不檢查點數範圍 (解碼時才做驗證)
    pub const fn number(value: u8, color: Color) -> Card {
        Card::Number { value, color }
    }

    /// 建立數字牌，點數必須在 1-13 之間
    pub fn try_number(value: u8, color: Color) -> Result<Card, InvalidCard> {
        if (MIN_NUMBER..=MAX_NUMBER).contains(&value) {
            Ok(Card::Number { value, color })
        } else {
            Err(InvalidCard(value))
        }
    }

    /// 點數: 小丑 0、數字牌 1-13、巫師 14
    pub fn value(&self) -> u8 {
        match self {
            Card::Number { value, .. } => *value,
            Card::Wizard => WIZARD_VALUE,
            Card::Jester => JESTER_VALUE,
        }
    }

    pub fn color(&self) -> Option<Color> {
        match self {
            Card::Number { color, .. } => Some(*color),
            Card::Wizard | Card::Jester => None,
        }
    }

    pub fn is_wizard(&self) -> bool {
        matches!(self, Card::Wizard)
    }

    pub fn is_jester(&self) -> bool {
        matches!(self, Card::Jester)
    }

    /// 依點數比較 (不同花色之間也可比)
    pub fn cmp_value(&self, other: &Card) -> Ordering {
        self.value().cmp(&other.value())
    }

    /// 手牌排序用的鍵：先花色再點數，巫師與小丑排最後
    pub fn sort_key(&self) -> (u8, u8) {
        match self {
            Card::Number { value, color } => (*color as u8, *value),
            Card::Wizard => (4, WIZARD_VALUE),
            Card::Jester => (5, JESTER_VALUE),
        }
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Card::Number { value, color } => write!(f, "{}{}", color.symbol(), value),
            Card::Wizard => f.write_str("Wizard"),
            Card::Jester => f.write_str("Jester"),
        }
    }
}

/// 點數超出範圍的數字牌
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("number card value must be 1-13, got {0}")]
pub struct InvalidCard(pub u8);

/// 線上格式: {"kind":"NUMBER","value":7,"color":"RED"} / {"kind":"WIZARD"} / {"kind":"JESTER"}
#[derive(Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "UPPERCASE")]
enum WireCard {
    Number { value: u8, color: Color },
    Wizard,
    Jester,
}

impl TryFrom<WireCard> for Card {
    type Error = InvalidCard;

    fn try_from(wire: WireCard) -> Result<Self, Self::Error> {
        match wire {
            WireCard::Number { value, color } => Card::try_number(value, color),
            WireCard::Wizard => Ok(Card::Wizard),
            WireCard::Jester => Ok(Card::Jester),
        }
    }
}

impl From<Card> for WireCard {
    fn from(card: Card) -> Self {
        match card {
            Card::Number { value, color } => WireCard::Number { value, color },
            Card::Wizard => WireCard::Wizard,
            Card::Jester => WireCard::Jester,
        }
    }
}
