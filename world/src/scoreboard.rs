//! Running score tally.

/// Accumulates points awarded for correct catches.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Scoreboard {
    score: i64,
}

impl Scoreboard {
    /// Adds `points` to the tally, saturating at the numeric bounds.
    pub(crate) fn award(&mut self, points: i32) {
        self.score = self.score.saturating_add(i64::from(points));
    }

    /// Current tally.
    #[must_use]
    pub const fn score(&self) -> i64 {
        self.score
    }

    /// Text shown on the score display.
    #[must_use]
    pub fn score_text(&self) -> String {
        self.score.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::Scoreboard;

    #[test]
    fn award_accumulates_and_saturates() {
        let mut scoreboard = Scoreboard::default();
        scoreboard.award(10);
        scoreboard.award(-3);
        assert_eq!(scoreboard.score(), 7);
        assert_eq!(scoreboard.score_text(), "7");

        let mut saturated = Scoreboard {
            score: i64::MAX - 1,
        };
        saturated.award(50);
        assert_eq!(saturated.score(), i64::MAX);
    }
}
