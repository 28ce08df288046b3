//! Historical draw results

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::Draw;

/// Owned store of historical draws, newest first
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DrawHistory {
    draws: Vec<Draw>,
}

impl DrawHistory {
    pub fn new(draws: Vec<Draw>) -> Self {
        Self { draws }
    }

    /// The draw history the app ships with
    pub fn with_seed() -> Self {
        Self::new(vec![
            Draw {
                date: ymd(2024, 2, 20),
                numbers: vec![7, 14, 21, 28, 35, 40, 11, 11],
            },
            Draw {
                date: ymd(2024, 2, 19),
                numbers: vec![3, 9, 15, 27, 33, 39, 2, 5],
            },
            Draw {
                date: ymd(2024, 2, 18),
                numbers: vec![5, 12, 19, 26, 38, 40, 8, 10],
            },
        ])
    }

    /// Record a new draw ahead of the existing ones
    pub fn add_draw(&mut self, draw: Draw) {
        self.draws.insert(0, draw);
    }

    pub fn draws(&self) -> &[Draw] {
        &self.draws
    }

    pub fn latest(&self) -> Option<&Draw> {
        self.draws.first()
    }

    pub fn len(&self) -> usize {
        self.draws.len()
    }

    pub fn is_empty(&self) -> bool {
        self.draws.is_empty()
    }
}

impl Default for DrawHistory {
    fn default() -> Self {
        Self::with_seed()
    }
}

fn ymd(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seed_is_newest_first() {
        let history = DrawHistory::with_seed();
        assert_eq!(history.len(), 3);

        let dates: Vec<NaiveDate> = history.draws().iter().map(|d| d.date).collect();
        let mut sorted = dates.clone();
        sorted.sort_by(|a, b| b.cmp(a));
        assert_eq!(dates, sorted);
    }

    #[test]
    fn test_add_draw_prepends() {
        let mut history = DrawHistory::with_seed();
        let draw = Draw {
            date: ymd(2024, 2, 21),
            numbers: vec![1, 2, 3, 4, 5, 6],
        };

        history.add_draw(draw.clone());

        assert_eq!(history.len(), 4);
        assert_eq!(history.latest(), Some(&draw));
    }

    #[test]
    fn test_empty_history() {
        let history = DrawHistory::new(Vec::new());
        assert!(history.is_empty());
        assert!(history.latest().is_none());
    }
}
