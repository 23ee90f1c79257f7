use super::card::{Card, Color};
use super::hand::Hand;
use std::fmt;

/// 一墩: 依出牌順序排列的牌，加上本回合固定的王牌花色
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Trick {
    trump: Option<Color>,
    cards: Vec<Card>,
}

impl Trick {
    pub fn new(trump: Option<Color>) -> Self {
        Self {
            trump,
            cards: Vec::new(),
        }
    }

    pub fn trump(&self) -> Option<Color> {
        self.trump
    }

    pub fn push(&mut self, card: Card) {
        self.cards.push(card);
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// 領牌花色: 第一張有花色的牌；全是巫師/小丑時為 None
    pub fn lead_color(&self) -> Option<Color> {
        self.cards.iter().find_map(|c| c.color())
    }

    /// 判定這一墩由第幾張牌 (出牌順序, 0-based) 吃下
    ///
    /// 1. 空墩沒有贏家
    /// 2. 第一張巫師直接獲勝
    /// 3. 否則最大的王牌獲勝
    /// 4. 全部都是小丑時，最後一張獲勝
    /// 5. 否則領牌花色中最大的牌獲勝
    pub fn taken_by(&self) -> Option<usize> {
        if self.cards.is_empty() {
            return None;
        }

        if let Some(pos) = self.cards.iter().position(Card::is_wizard) {
            return Some(pos);
        }

        if let Some(pos) = self.trump.and_then(|trump| self.highest_of(trump)) {
            return Some(pos);
        }

        match self.lead_color() {
            None => Some(self.cards.len() - 1),
            Some(lead) => self.highest_of(lead),
        }
    }

    /// 吃下這一墩的牌
    pub fn winning_card(&self) -> Option<Card> {
        self.taken_by().map(|pos| self.cards[pos])
    }

    /// 跟牌規則: 有領牌花色時不得出其他花色 (巫師與小丑永遠可出)
    ///
    /// 以巫師領牌的墩已經確定由他吃下，之後出什麼牌都可以。
    pub fn follows_suit(&self, card: &Card, hand: &Hand) -> bool {
        if self.cards.first().is_some_and(Card::is_wizard) {
            return true;
        }
        match (self.lead_color(), card.color()) {
            (Some(lead), Some(color)) if color != lead => !hand.has_color(lead),
            _ => true,
        }
    }

    fn highest_of(&self, color: Color) -> Option<usize> {
        self.cards
            .iter()
            .enumerate()
            .filter(|(_, c)| c.color() == Some(color))
            .max_by(|(_, a), (_, b)| a.cmp_value(b))
            .map(|(pos, _)| pos)
    }
}

impl fmt::Display for Trick {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Trick:")?;
        for (i, card) in self.cards.iter().enumerate() {
            if i == 0 {
                write!(f, " {}", card)?;
            } else {
                write!(f, " -> {}", card)?;
            }
        }
        Ok(())
    }
}

/// 出牌順序位置換算成絕對座位
pub fn seat_of(lead_seat: usize, position: usize, num_players: usize) -> usize {
    (lead_seat + position) % num_players
}

#[cfg(test)]
mod tests {
    use super::*;

    fn trick_of(trump: Option<Color>, cards: &[Card]) -> Trick {
        let mut trick = Trick::new(trump);
        for card in cards {
            trick.push(*card);
        }
        trick
    }

    #[test]
    fn test_empty_trick_has_no_winner() {
        let trick = Trick::new(Some(Color::Red));
        assert_eq!(trick.taken_by(), None);
        assert_eq!(trick.winning_card(), None);
    }

    #[test]
    fn test_wizard_wins() {
        let trick = trick_of(
            Some(Color::Blue),
            &[
                Card::number(10, Color::Red),
                Card::number(13, Color::Yellow),
                Card::Wizard,
                Card::number(15, Color::Red),
            ],
        );
        assert_eq!(trick.taken_by(), Some(2));
        assert_eq!(trick.winning_card(), Some(Card::Wizard));
    }

    #[test]
    fn test_first_wizard_beats_later_wizards() {
        let trick = trick_of(
            Some(Color::Blue),
            &[Card::number(13, Color::Blue), Card::Wizard, Card::Wizard],
        );
        assert_eq!(trick.taken_by(), Some(1));
    }

    #[test]
    fn test_highest_trump_wins() {
        let trick = trick_of(
            Some(Color::Blue),
            &[
                Card::number(6, Color::Red),
                Card::number(7, Color::Yellow),
                Card::Jester,
                Card::number(2, Color::Blue),
                Card::Jester,
                Card::number(1, Color::Blue),
                Card::number(8, Color::Red),
                Card::number(3, Color::Blue),
                Card::number(9, Color::Green),
            ],
        );
        assert_eq!(trick.taken_by(), Some(7));
        assert_eq!(trick.winning_card(), Some(Card::number(3, Color::Blue)));
    }

    #[test]
    fn test_highest_lead_color_wins() {
        let trick = trick_of(
            Some(Color::Blue),
            &[
                Card::Jester,
                Card::number(1, Color::Red),
                Card::number(5, Color::Yellow),
                Card::Jester,
                Card::number(7, Color::Green),
                Card::number(2, Color::Red),
                Card::number(10, Color::Yellow),
                Card::number(12, Color::Green),
            ],
        );
        assert_eq!(trick.lead_color(), Some(Color::Red));
        assert_eq!(trick.taken_by(), Some(5));
    }

    #[test]
    fn test_all_jesters_last_wins() {
        let trick = trick_of(Some(Color::Blue), &[Card::Jester, Card::Jester, Card::Jester]);
        assert_eq!(trick.lead_color(), None);
        assert_eq!(trick.taken_by(), Some(2));
    }

    #[test]
    fn test_no_trump_round() {
        // 小丑翻成王牌: 沒有王牌，小丑不會因此獲勝
        let trick = trick_of(
            None,
            &[Card::number(4, Color::Green), Card::Jester, Card::number(9, Color::Green)],
        );
        assert_eq!(trick.taken_by(), Some(2));
    }

    #[test]
    fn test_follows_suit() {
        let hand = Hand::new(vec![
            Card::number(3, Color::Red),
            Card::number(8, Color::Green),
            Card::Jester,
        ]);
        let trick = trick_of(Some(Color::Blue), &[Card::number(5, Color::Red)]);

        assert!(trick.follows_suit(&Card::number(3, Color::Red), &hand));
        assert!(!trick.follows_suit(&Card::number(8, Color::Green), &hand));
        assert!(trick.follows_suit(&Card::Jester, &hand));

        // 沒有領牌花色時任何牌都可出
        let opening = trick_of(Some(Color::Blue), &[Card::Wizard]);
        assert!(opening.follows_suit(&Card::number(8, Color::Green), &hand));
    }

    #[test]
    fn test_wizard_lead_frees_the_trick() {
        let hand = Hand::new(vec![Card::number(3, Color::Red), Card::number(8, Color::Green)]);
        let trick = trick_of(Some(Color::Blue), &[Card::Wizard, Card::number(5, Color::Red)]);

        // 紅色是第一張有花色的牌，但巫師領牌後不用跟
        assert_eq!(trick.lead_color(), Some(Color::Red));
        assert!(trick.follows_suit(&Card::number(8, Color::Green), &hand));

        // 小丑領牌不影響跟牌
        let jester_lead = trick_of(None, &[Card::Jester, Card::number(5, Color::Red)]);
        assert!(!jester_lead.follows_suit(&Card::number(8, Color::Green), &hand));
    }

    #[test]
    fn test_seat_of_wraps() {
        assert_eq!(seat_of(2, 0, 3), 2);
        assert_eq!(seat_of(2, 1, 3), 0);
        assert_eq!(seat_of(1, 3, 4), 0);
    }
}
