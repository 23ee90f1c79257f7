use crate::protocol::{ScoreEntry, Standing};

const EXACT_BONUS: i32 = 20;
const POINTS_PER_TRICK: i32 = 10;

/// 一回合的得分
///
/// 叫中: 20 + 10 x 吃墩數；沒叫中: 每差一墩扣 10 分。
pub fn round_score(prediction: u32, tricks: u32) -> i32 {
    if prediction == tricks {
        EXACT_BONUS + POINTS_PER_TRICK * tricks as i32
    } else {
        -POINTS_PER_TRICK * tricks.abs_diff(prediction) as i32
    }
}

/// 記分表 (依座位排序)
///
/// 叫墩與吃墩數每回合結算後重設，總分跨回合累加。
#[derive(Debug, Clone)]
pub struct ScoreBoard {
    entries: Vec<ScoreEntry>,
}

impl ScoreBoard {
    pub fn new<S: AsRef<str>>(names: &[S]) -> Self {
        let entries = names
            .iter()
            .enumerate()
            .map(|(seat, name)| ScoreEntry {
                seat,
                name: name.as_ref().to_string(),
                prediction: None,
                tricks: 0,
                score: 0,
            })
            .collect();
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn set_prediction(&mut self, seat: usize, prediction: u32) {
        if let Some(entry) = self.entries.get_mut(seat) {
            entry.prediction = Some(prediction);
        }
    }

    pub fn prediction(&self, seat: usize) -> Option<u32> {
        self.entries.get(seat).and_then(|e| e.prediction)
    }

    /// 目前已叫墩數的總和
    pub fn predicted_total(&self) -> u32 {
        self.entries.iter().filter_map(|e| e.prediction).sum()
    }

    pub fn add_trick(&mut self, seat: usize) {
        if let Some(entry) = self.entries.get_mut(seat) {
            entry.tricks += 1;
        }
    }

    pub fn tricks(&self, seat: usize) -> u32 {
        self.entries.get(seat).map_or(0, |e| e.tricks)
    }

    pub fn score(&self, seat: usize) -> i32 {
        self.entries.get(seat).map_or(0, |e| e.score)
    }

    /// 回合結算: 把叫墩與吃墩換算成分數，回傳每個座位的分數變化
    pub fn apply_round(&mut self) -> Vec<i32> {
        self.entries
            .iter_mut()
            .map(|entry| {
                // 沒叫墩的座位視為叫 0
                let delta = round_score(entry.prediction.unwrap_or(0), entry.tricks);
                entry.score += delta;
                entry.prediction = None;
                entry.tricks = 0;
                delta
            })
            .collect()
    }

    /// 快照 (用於廣播)
    pub fn snapshot(&self) -> Vec<ScoreEntry> {
        self.entries.clone()
    }

    /// 最終排名: 分數高者在前，同分同名次，同分時依座位排列
    pub fn standings(&self) -> Vec<Standing> {
        let mut sorted: Vec<&ScoreEntry> = self.entries.iter().collect();
        sorted.sort_by(|a, b| b.score.cmp(&a.score).then(a.seat.cmp(&b.seat)));

        let mut standings: Vec<Standing> = Vec::with_capacity(sorted.len());
        for (i, entry) in sorted.into_iter().enumerate() {
            let rank = match standings.last() {
                Some(prev) if prev.score == entry.score => prev.rank,
                _ => i + 1,
            };
            standings.push(Standing {
                rank,
                name: entry.name.clone(),
                score: entry.score,
            });
        }
        standings
    }
}
