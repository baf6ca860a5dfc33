/// Participants, round score and final match outcome.

/// Who holds the turn / who won a round.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Side {
    Player,
    Opponent,
}

impl Side {
    pub fn other(self) -> Side {
        match self {
            Side::Player => Side::Opponent,
            Side::Opponent => Side::Player,
        }
    }
}

/// Round wins per participant.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct Score {
    pub player: u32,
    pub opponent: u32,
}

impl Score {
    pub fn award(&mut self, side: Side) {
        match side {
            Side::Player => self.player += 1,
            Side::Opponent => self.opponent += 1,
        }
    }

    pub fn of(&self, side: Side) -> u32 {
        match side {
            Side::Player => self.player,
            Side::Opponent => self.opponent,
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum MatchResult {
    Win,
    Lose,
}

impl MatchResult {
    /// Strictly more round wins is a win. A tied score is reported as a loss.
    pub fn from_score(score: &Score) -> MatchResult {
        if score.player > score.opponent {
            MatchResult::Win
        } else {
            MatchResult::Lose
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            MatchResult::Win => "win",
            MatchResult::Lose => "lose",
        }
    }
}
