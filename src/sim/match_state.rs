/// Match: the complete state of one game between the player and the
/// simulated opponent.
///
/// ## Rounds
///
/// A match is `rounds_total` timed rounds. Each round owns its word chain,
/// turn, countdown and phase. Only timer expiry ends a round; the side that
/// was NOT on turn when the timer ran out takes the point.
///
/// ## Timeline
///
/// The match keeps its own virtual clock (`clock_ms`). Callers feed elapsed
/// time through `step::advance`, which fires due entries from `schedule` and
/// turns whole seconds into countdown ticks. Nothing here reads wall time,
/// so tests drive the clock directly.
///
/// ## Generations
///
/// `generation` increases every time the match leaves a round. Scheduled
/// effects carry the generation they were created under and are dropped if
/// it no longer matches.

use rand::rngs::StdRng;

use crate::config::MatchConfig;
use crate::domain::opponent::Opponent;
use crate::domain::rules;
use crate::domain::side::{MatchResult, Score, Side};
use super::schedule::Schedule;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum MatchStatus {
    InProgress,
    Concluded,
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub enum RoundPhase {
    AwaitingInput,
    /// Valid word is being "checked"; lands when the validate delay ends.
    Validating { word: String },
    /// Invalid word; the reason is shown until the reject delay ends.
    Rejected { reason: String },
    Concluded,
}

#[derive(Clone, Debug)]
pub struct Round {
    pub theme: String,
    pub chain: Vec<String>,
    pub turn: Side,
    pub timer_seconds_remaining: u32,
    pub phase: RoundPhase,
}

impl Round {
    pub fn new(theme: &str, seed_word: &str, seconds: u32) -> Self {
        Round {
            theme: theme.to_string(),
            chain: vec![seed_word.to_string()],
            turn: Side::Player,
            timer_seconds_remaining: seconds,
            phase: RoundPhase::AwaitingInput,
        }
    }

    pub fn last_word(&self) -> &str {
        self.chain.last().map(String::as_str).unwrap_or("")
    }

    pub fn required_letter(&self) -> Option<char> {
        rules::required_letter(self.last_word())
    }

    pub fn rejection(&self) -> Option<&str> {
        match &self.phase {
            RoundPhase::Rejected { reason } => Some(reason),
            _ => None,
        }
    }

    pub fn is_validating(&self) -> bool {
        matches!(self.phase, RoundPhase::Validating { .. })
    }
}

/// Summary of a finished round, kept for the results screen.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RoundRecord {
    pub number: u32,
    pub winner: Side,
    pub chain: Vec<String>,
}

pub struct Match {
    pub theme: String,
    pub rules: MatchConfig,
    pub current_round: u32,
    pub score: Score,
    pub status: MatchStatus,
    pub result: Option<MatchResult>,
    pub round: Round,
    pub history: Vec<RoundRecord>,

    // ── Timeline ──
    pub generation: u64,
    pub clock_ms: u64,
    /// Clock time of the next countdown tick.
    pub next_tick_ms: u64,
    pub schedule: Schedule,

    // ── Opponent simulation ──
    pub opponent: Opponent,
    pub rng: StdRng,
}

impl Match {
    pub fn new(theme: &str, rules: MatchConfig, rng: StdRng) -> Self {
        let round = Round::new(theme, &rules.seed_word, rules.round_seconds);
        let opponent = Opponent::from_config(&rules);
        Match {
            theme: theme.to_string(),
            current_round: 1,
            score: Score::default(),
            status: MatchStatus::InProgress,
            result: None,
            round,
            history: vec![],
            generation: 0,
            clock_ms: 0,
            next_tick_ms: 1000,
            schedule: Schedule::new(),
            opponent,
            rng,
            rules,
        }
    }

    pub fn is_over(&self) -> bool {
        self.status == MatchStatus::Concluded
    }

    /// Round number for display; never exceeds `rounds_total`.
    pub fn display_round(&self) -> u32 {
        self.current_round.min(self.rules.rounds_total)
    }

    pub fn is_player_turn(&self) -> bool {
        self.round.turn == Side::Player
    }

    /// Can the player type a word right now?
    pub fn accepts_player_input(&self) -> bool {
        !self.is_over()
            && self.is_player_turn()
            && self.round.phase == RoundPhase::AwaitingInput
    }

    /// Full countdown for the active round, restarting the tick cadence.
    pub fn reset_timer(&mut self) {
        self.round.timer_seconds_remaining = self.rules.round_seconds;
        self.next_tick_ms = self.clock_ms + 1000;
    }
}
