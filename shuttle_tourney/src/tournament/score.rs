//! Set scores and the rules for deriving a match result from them.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Side of a match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Side {
    Player1,
    Player2,
}

/// Best-of-three set score. Unplayed sets are `None`.
///
/// Sets won are never stored; use [`Score::sets_won`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Score {
    pub set1_player1: Option<u32>,
    pub set1_player2: Option<u32>,
    pub set2_player1: Option<u32>,
    pub set2_player2: Option<u32>,
    pub set3_player1: Option<u32>,
    pub set3_player2: Option<u32>,
}

impl Score {
    /// Build a score from up to three `(player1, player2)` set results
    pub fn from_sets(sets: &[(u32, u32)]) -> Self {
        let mut score = Score::default();
        let mut slots = [
            (&mut score.set1_player1, &mut score.set1_player2),
            (&mut score.set2_player1, &mut score.set2_player2),
            (&mut score.set3_player1, &mut score.set3_player2),
        ];
        for ((p1, p2), &(a, b)) in slots.iter_mut().zip(sets) {
            **p1 = Some(a);
            **p2 = Some(b);
        }
        score
    }

    pub fn sets(&self) -> [(Option<u32>, Option<u32>); 3] {
        [
            (self.set1_player1, self.set1_player2),
            (self.set2_player1, self.set2_player2),
            (self.set3_player1, self.set3_player2),
        ]
    }

    /// Sets won by (player1, player2).
    ///
    /// A set counts only when both values are present; a tied set counts for neither.
    pub fn sets_won(&self) -> (u8, u8) {
        self.sets()
            .iter()
            .fold((0, 0), |(p1, p2), set| match set {
                (Some(a), Some(b)) if a > b => (p1 + 1, p2),
                (Some(a), Some(b)) if b > a => (p1, p2 + 1),
                _ => (p1, p2),
            })
    }

    /// Side with more sets won, if the score is decisive
    pub fn implied_winner(&self) -> Option<Side> {
        let (p1, p2) = self.sets_won();
        match p1.cmp(&p2) {
            std::cmp::Ordering::Greater => Some(Side::Player1),
            std::cmp::Ordering::Less => Some(Side::Player2),
            std::cmp::Ordering::Equal => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.sets().iter().all(|(a, b)| a.is_none() && b.is_none())
    }
}

impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value = |v: Option<u32>| v.map_or_else(|| "-".to_string(), |v| v.to_string());
        let sets = self.sets();
        write!(
            f,
            "{}-{}, {}-{}",
            value(sets[0].0),
            value(sets[0].1),
            value(sets[1].0),
            value(sets[1].1)
        )?;
        if sets[2].0.is_some() || sets[2].1.is_some() {
            write!(f, ", {}-{}", value(sets[2].0), value(sets[2].1))?;
        }
        Ok(())
    }
}
