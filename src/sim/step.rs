/// Match operations: everything that moves a match forward.
///
/// Entry points:
///   - `start_match`            new match on round 1
///   - `submit_word[_as]`       a participant proposes a word
///   - `tick`                   one second of countdown
///   - `resolve_round_timeout`  score the round, start the next or conclude
///   - `advance`                feed elapsed time: due effects + ticks
///
/// Timer policy: the countdown only runs while the round is awaiting input.
/// The "checking" pause and the rejection display freeze it.

use rand::rngs::StdRng;

use crate::config::MatchConfig;
use crate::domain::rules::{self, SubmitError};
use crate::domain::side::{MatchResult, Side};
use super::event::MatchEvent;
use super::match_state::{Match, MatchStatus, Round, RoundPhase, RoundRecord};
use super::schedule::Effect;

/// Countdown values at or below this emit a warning on the player's turn.
pub const COUNTDOWN_WARNING_SECS: u32 = 5;

// ══════════════════════════════════════════════════════════════
// Start
// ══════════════════════════════════════════════════════════════

pub fn start_match(theme: &str, rules: &MatchConfig, rng: StdRng) -> Match {
    log::info!("match started: theme={theme:?} rounds={}", rules.rounds_total);
    Match::new(theme, rules.clone(), rng)
}

// ══════════════════════════════════════════════════════════════
// Submissions
// ══════════════════════════════════════════════════════════════

/// The player submits a word.
pub fn submit_word(m: &mut Match, candidate: &str) -> Result<(), SubmitError> {
    submit_word_as(m, Side::Player, candidate)
}

/// `side` submits a word.
///
/// Rejected words leave chain and turn untouched and freeze the round in
/// `Rejected` until the reject delay ends. Valid words enter `Validating`
/// and land when the validate delay ends.
pub fn submit_word_as(m: &mut Match, side: Side, candidate: &str) -> Result<(), SubmitError> {
    if m.status == MatchStatus::Concluded {
        return Err(SubmitError::MatchOver);
    }
    if m.round.phase != RoundPhase::AwaitingInput {
        log::debug!("submission {candidate:?} ignored: phase {:?}", m.round.phase);
        return Err(SubmitError::NotAccepting);
    }
    if m.round.turn != side {
        log::debug!("submission {candidate:?} from {side:?} ignored: out of turn");
        return Err(SubmitError::OutOfTurn);
    }

    match rules::check_submission(m.round.last_word(), candidate) {
        Ok(word) => {
            log::debug!("{side:?} submitted {word}, validating");
            m.round.phase = RoundPhase::Validating { word: word.clone() };
            let due = m.clock_ms + m.rules.validate_delay_ms;
            m.schedule.push(due, m.generation, Effect::FinishValidation { side, word });
            Ok(())
        }
        Err(SubmitError::Empty) => Err(SubmitError::Empty),
        Err(err) => {
            log::debug!("{side:?} submission {candidate:?} rejected: {err}");
            m.round.phase = RoundPhase::Rejected { reason: err.to_string() };
            let due = m.clock_ms + m.rules.reject_delay_ms;
            m.schedule.push(due, m.generation, Effect::ClearRejection);
            Err(err)
        }
    }
}

// ══════════════════════════════════════════════════════════════
// Countdown
// ══════════════════════════════════════════════════════════════

/// One second of countdown. Only runs while awaiting input in an
/// unfinished match. Reaching zero resolves the round.
pub fn tick(m: &mut Match) -> Vec<MatchEvent> {
    if m.status != MatchStatus::InProgress || m.round.phase != RoundPhase::AwaitingInput {
        return vec![];
    }
    let mut events = vec![];
    m.round.timer_seconds_remaining = m.round.timer_seconds_remaining.saturating_sub(1);
    let left = m.round.timer_seconds_remaining;

    if left == 0 {
        events.extend(resolve_round_timeout(m));
    } else if left <= COUNTDOWN_WARNING_SECS && m.round.turn == Side::Player {
        events.push(MatchEvent::CountdownWarning { seconds: left });
    }
    events
}

/// The side not on turn wins the round. Starts the next round or, after the
/// last one, concludes the match.
pub fn resolve_round_timeout(m: &mut Match) -> Vec<MatchEvent> {
    if m.status == MatchStatus::Concluded {
        return vec![];
    }
    let mut events = vec![];
    let round_no = m.current_round;
    let winner = m.round.turn.other();

    m.score.award(winner);
    m.round.phase = RoundPhase::Concluded;
    m.history.push(RoundRecord {
        number: round_no,
        winner,
        chain: m.round.chain.clone(),
    });
    events.push(MatchEvent::RoundWon { round: round_no, winner });
    log::info!(
        "round {round_no} to {winner:?} (score {}-{})",
        m.score.player, m.score.opponent,
    );

    // Leaving the round: invalidate everything it scheduled.
    m.generation += 1;
    m.schedule.discard_stale(m.generation);
    m.current_round += 1;

    if m.current_round > m.rules.rounds_total {
        let result = MatchResult::from_score(&m.score);
        m.status = MatchStatus::Concluded;
        m.result = Some(result);
        events.push(MatchEvent::MatchConcluded { result });
        log::info!("match concluded: {}", result.label());
    } else {
        m.round = Round::new(&m.theme, &m.rules.seed_word, m.rules.round_seconds);
        m.reset_timer();
        events.push(MatchEvent::RoundStarted { round: m.current_round });
    }
    events
}

// ══════════════════════════════════════════════════════════════
// Timeline
// ══════════════════════════════════════════════════════════════

/// Move the match clock forward by `elapsed_ms`.
///
/// Due effects and second ticks are applied in clock order; an effect and a
/// tick at the same instant run effect first.
pub fn advance(m: &mut Match, elapsed_ms: u64) -> Vec<MatchEvent> {
    let target = m.clock_ms + elapsed_ms;
    let mut events = vec![];

    while m.status == MatchStatus::InProgress {
        let tick_at = m.next_tick_ms;
        let (at, is_effect) = match m.schedule.next_due() {
            Some(due) if due <= tick_at => (due, true),
            _ => (tick_at, false),
        };
        if at > target {
            break;
        }
        m.clock_ms = m.clock_ms.max(at);

        if is_effect {
            if let Some((generation, effect)) = m.schedule.pop_due(at) {
                apply_effect(m, generation, effect, &mut events);
            }
        } else {
            m.next_tick_ms = at + 1000;
            events.extend(tick(m));
        }
    }

    m.clock_ms = target;
    events
}

fn apply_effect(m: &mut Match, generation: u64, effect: Effect, events: &mut Vec<MatchEvent>) {
    if generation != m.generation {
        log::trace!("dropping stale {effect:?} (gen {generation} != {})", m.generation);
        return;
    }
    match effect {
        Effect::FinishValidation { side, word } => {
            if !m.round.is_validating() || m.round.turn != side {
                return;
            }
            m.round.chain.push(word.clone());
            m.round.turn = side.other();
            m.round.phase = RoundPhase::AwaitingInput;
            m.reset_timer();
            events.push(MatchEvent::WordAccepted { side, word });

            if m.round.turn == Side::Opponent {
                let delay = m.opponent.think_delay_ms(&mut m.rng);
                m.schedule.push(m.clock_ms + delay, m.generation, Effect::OpponentMove);
                log::debug!("{} thinking for {delay}ms", m.opponent.name);
            }
        }
        Effect::ClearRejection => {
            if m.round.rejection().is_some() {
                m.round.phase = RoundPhase::AwaitingInput;
                events.push(MatchEvent::RejectionCleared);
            }
        }
        Effect::OpponentMove => {
            if m.round.turn != Side::Opponent {
                return;
            }
            match m.round.phase {
                RoundPhase::AwaitingInput => {}
                // Still the opponent's turn: play right after the rejection clears.
                RoundPhase::Rejected { .. } => {
                    let due = m.schedule.due_of(&Effect::ClearRejection)
                        .unwrap_or(m.clock_ms + m.rules.reject_delay_ms);
                    m.schedule.push(due, m.generation, Effect::OpponentMove);
                    log::debug!("{} move deferred to {due}ms", m.opponent.name);
                    return;
                }
                // A validating word passes the turn when it lands.
                RoundPhase::Validating { .. } | RoundPhase::Concluded => return,
            }
            // No chain-letter check here unless the opponent is configured to follow it.
            let word = m.opponent.choose_word(m.round.last_word(), &mut m.rng);
            log::debug!("{} plays {word}", m.opponent.name);
            m.round.chain.push(word.clone());
            m.round.turn = Side::Player;
            m.reset_timer();
            events.push(MatchEvent::OpponentPlayed { word });
        }
    }
}

// ══════════════════════════════════════════════════════════════
// Unit tests
// ══════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::side::Score;
    use rand::SeedableRng;

    fn new_match() -> Match {
        start_match("Animals", &MatchConfig::default(), StdRng::seed_from_u64(42))
    }

    /// Submit and let the validate delay run out.
    fn play(m: &mut Match, word: &str) {
        submit_word(m, word).unwrap();
        advance(m, m.rules.validate_delay_ms);
    }

    #[test]
    fn lion_then_cat_scenario() {
        let mut m = new_match();
        play(&mut m, "LION");
        assert_eq!(m.round.chain, vec!["ANIMAL", "LION"]);
        assert_eq!(m.round.turn, Side::Opponent);

        // Opponent side submits a mismatching word
        let err = submit_word_as(&mut m, Side::Opponent, "CAT").unwrap_err();
        assert_eq!(err.to_string(), "word must start with 'N'");
        assert_eq!(m.round.rejection(), Some("word must start with 'N'"));
        assert_eq!(m.round.chain, vec!["ANIMAL", "LION"]);
        assert_eq!(m.round.turn, Side::Opponent);
    }

    #[test]
    fn valid_word_waits_in_validating() {
        let mut m = new_match();
        submit_word(&mut m, "lion").unwrap();
        assert_eq!(m.round.phase, RoundPhase::Validating { word: "LION".into() });
        assert_eq!(m.round.chain.len(), 1);

        let ev = advance(&mut m, 999);
        assert!(ev.is_empty());
        assert!(m.round.is_validating());

        let ev = advance(&mut m, 1);
        assert_eq!(ev, vec![MatchEvent::WordAccepted { side: Side::Player, word: "LION".into() }]);
        assert_eq!(m.round.phase, RoundPhase::AwaitingInput);
        assert_eq!(m.round.timer_seconds_remaining, 45);
    }

    #[test]
    fn rejection_reverts_after_delay() {
        let mut m = new_match();
        assert_eq!(submit_word(&mut m, "CAT"), Err(SubmitError::WrongLetter { expected: 'L' }));
        assert_eq!(m.round.turn, Side::Player);

        // Blocked while rejected
        assert_eq!(submit_word(&mut m, "LION"), Err(SubmitError::NotAccepting));

        advance(&mut m, 1999);
        assert!(m.round.rejection().is_some());
        let ev = advance(&mut m, 1);
        assert_eq!(ev, vec![MatchEvent::RejectionCleared]);
        assert_eq!(m.round.phase, RoundPhase::AwaitingInput);
        assert_eq!(m.round.turn, Side::Player);
        assert_eq!(m.round.chain, vec!["ANIMAL"]);
    }

    #[test]
    fn timer_frozen_while_rejected_or_validating() {
        let mut m = new_match();
        assert_eq!(submit_word(&mut m, "CAT"), Err(SubmitError::WrongLetter { expected: 'L' }));
        advance(&mut m, 1500);
        assert_eq!(m.round.timer_seconds_remaining, 45);

        advance(&mut m, 500); // rejection clears at 2000
        let left = m.round.timer_seconds_remaining;
        submit_word(&mut m, "LEMUR").unwrap();
        assert!(tick(&mut m).is_empty());
        assert_eq!(m.round.timer_seconds_remaining, left);
    }

    #[test]
    fn blank_submission_is_a_no_op() {
        let mut m = new_match();
        assert_eq!(submit_word(&mut m, "   "), Err(SubmitError::Empty));
        assert_eq!(m.round.phase, RoundPhase::AwaitingInput);
        assert!(m.schedule.is_empty());
    }

    #[test]
    fn out_of_turn_is_ignored() {
        let mut m = new_match();
        assert_eq!(submit_word_as(&mut m, Side::Opponent, "LION"), Err(SubmitError::OutOfTurn));
        assert_eq!(m.round.phase, RoundPhase::AwaitingInput);
        assert_eq!(m.round.chain.len(), 1);
    }

    #[test]
    fn opponent_replies_within_think_window() {
        let mut m = new_match();
        play(&mut m, "LION");
        assert_eq!(m.round.turn, Side::Opponent);

        // Nothing before the minimum think time
        let ev = advance(&mut m, 1999);
        assert!(!ev.iter().any(|e| matches!(e, MatchEvent::OpponentPlayed { .. })));

        let ev = advance(&mut m, 3001);
        let played: Vec<_> = ev.iter()
            .filter(|e| matches!(e, MatchEvent::OpponentPlayed { .. }))
            .collect();
        assert_eq!(played.len(), 1);
        assert_eq!(m.round.turn, Side::Player);
        assert_eq!(m.round.chain.len(), 3);
        assert!(m.round.timer_seconds_remaining >= 42);
    }

    #[test]
    fn accepted_words_follow_the_chain() {
        let mut m = new_match();
        for _ in 0..4 {
            let letter = m.round.required_letter().unwrap();
            let word = format!("{letter}ZEBRA");
            play(&mut m, &word);
            let n = m.round.chain.len();
            assert!(rules::follows(&m.round.chain[n - 2], &m.round.chain[n - 1]));
            advance(&mut m, 5000); // opponent answers
            assert_eq!(m.round.turn, Side::Player);
        }
    }

    #[test]
    fn mismatch_never_mutates_chain_or_turn() {
        let mut m = new_match();
        for bad in ["CAT", "dog", "  Zebra", "kiwi"] {
            let chain = m.round.chain.clone();
            assert!(submit_word(&mut m, bad).is_err());
            assert_eq!(m.round.chain, chain);
            assert_eq!(m.round.turn, Side::Player);
            advance(&mut m, 2000);
        }
    }

    #[test]
    fn forty_five_ticks_resolve_exactly_once() {
        let mut m = new_match();
        let mut won = 0;
        for _ in 0..45 {
            won += tick(&mut m).iter()
                .filter(|e| matches!(e, MatchEvent::RoundWon { .. }))
                .count();
        }
        assert_eq!(won, 1);
        assert_eq!(m.current_round, 2);
        assert_eq!(m.round.timer_seconds_remaining, 45);
    }

    #[test]
    fn advance_45_seconds_times_out_player() {
        let mut m = new_match();
        let ev = advance(&mut m, 45_000);
        assert!(ev.contains(&MatchEvent::RoundWon { round: 1, winner: Side::Opponent }));
        assert_eq!(m.score, Score { player: 0, opponent: 1 });
        assert_eq!(m.current_round, 2);
        assert_eq!(m.round.chain, vec!["ANIMAL"]);
        assert_eq!(m.round.turn, Side::Player);
    }

    #[test]
    fn countdown_warning_on_player_turn() {
        let mut m = new_match();
        let ev = advance(&mut m, 40_000);
        assert!(ev.contains(&MatchEvent::CountdownWarning { seconds: 5 }));
        assert!(!ev.iter().any(|e| matches!(e, MatchEvent::CountdownWarning { seconds: 6 })));
    }

    #[test]
    fn opponent_timeout_gives_player_the_round() {
        let mut m = new_match();
        m.round.turn = Side::Opponent;
        let ev = resolve_round_timeout(&mut m);
        assert!(ev.contains(&MatchEvent::RoundWon { round: 1, winner: Side::Player }));
        assert_eq!(m.score.player, 1);
        assert_eq!(m.round.turn, Side::Player);
    }

    #[test]
    fn stale_opponent_move_does_not_leak_into_next_round() {
        let mut cfg = MatchConfig::default();
        cfg.round_seconds = 3;
        cfg.opponent_think_min_ms = 10_000;
        cfg.opponent_think_max_ms = 10_000;
        let mut m = start_match("Animals", &cfg, StdRng::seed_from_u64(1));

        play(&mut m, "LION");
        assert_eq!(m.round.turn, Side::Opponent);
        // Opponent times out after 3 s, long before its 10 s think time
        let ev = advance(&mut m, 3000);
        assert!(ev.contains(&MatchEvent::RoundWon { round: 1, winner: Side::Player }));
        assert_eq!(m.current_round, 2);

        let ev = advance(&mut m, 2000);
        assert!(!ev.iter().any(|e| matches!(e, MatchEvent::OpponentPlayed { .. })));
        assert_eq!(m.round.chain, vec!["ANIMAL"]);
    }

    #[test]
    fn opponent_move_waits_out_a_rejection() {
        let mut cfg = MatchConfig::default();
        cfg.opponent_think_min_ms = 2000;
        cfg.opponent_think_max_ms = 2000;
        let mut m = start_match("Animals", &cfg, StdRng::seed_from_u64(3));

        play(&mut m, "LION");
        advance(&mut m, 1500);
        assert_eq!(
            submit_word_as(&mut m, Side::Opponent, "CAT"),
            Err(SubmitError::WrongLetter { expected: 'N' })
        );

        // The move due at 3 s is held until the rejection clears at 4.5 s
        let ev = advance(&mut m, 1999);
        assert!(ev.is_empty());
        assert_eq!(m.round.turn, Side::Opponent);
        let ev = advance(&mut m, 1);
        assert_eq!(ev.first(), Some(&MatchEvent::RejectionCleared));
        assert!(ev.iter().any(|e| matches!(e, MatchEvent::OpponentPlayed { .. })));
        assert_eq!(m.round.chain.len(), 3);
        assert_eq!(m.round.turn, Side::Player);
    }

    #[test]
    fn stale_entry_is_dropped_by_generation() {
        let mut m = new_match();
        m.round.turn = Side::Opponent;
        m.schedule.push(10, m.generation, Effect::OpponentMove);
        m.generation += 1;
        let ev = advance(&mut m, 20);
        assert!(ev.is_empty());
        assert_eq!(m.round.chain.len(), 1);
    }

    #[test]
    fn match_concludes_after_all_rounds() {
        let mut m = new_match();
        for _ in 0..5 {
            resolve_round_timeout(&mut m);
        }
        assert_eq!(m.status, MatchStatus::Concluded);
        assert_eq!(m.current_round, 6);
        assert_eq!(m.result, Some(MatchResult::Lose));
        assert_eq!(m.history.len(), 5);

        // Nothing moves after the end
        assert!(resolve_round_timeout(&mut m).is_empty());
        assert!(tick(&mut m).is_empty());
        assert!(advance(&mut m, 100_000).is_empty());
        assert_eq!(submit_word(&mut m, "LION"), Err(SubmitError::MatchOver));
        assert_eq!(m.current_round, 6);
        assert_eq!(m.score.opponent, 5);
    }

    #[test]
    fn final_result_win_and_lose() {
        let mut m = new_match();
        for winner in [Side::Player, Side::Opponent, Side::Player, Side::Opponent, Side::Player] {
            m.round.turn = winner.other();
            resolve_round_timeout(&mut m);
        }
        assert_eq!(m.score, Score { player: 3, opponent: 2 });
        assert_eq!(m.result, Some(MatchResult::Win));

        let mut m = new_match();
        for winner in [Side::Opponent, Side::Player, Side::Opponent, Side::Player, Side::Opponent] {
            m.round.turn = winner.other();
            resolve_round_timeout(&mut m);
        }
        assert_eq!(m.score, Score { player: 2, opponent: 3 });
        assert_eq!(m.result, Some(MatchResult::Lose));
    }

    #[test]
    fn history_keeps_round_chains() {
        let mut m = new_match();
        play(&mut m, "LLAMA");
        m.round.turn = Side::Player;
        resolve_round_timeout(&mut m);
        assert_eq!(m.history[0].chain, vec!["ANIMAL", "LLAMA"]);
        assert_eq!(m.history[0].number, 1);
        assert_eq!(m.history[0].winner, Side::Opponent);
    }

    #[test]
    fn full_match_by_clock_alone() {
        let mut m = new_match();
        let ev = advance(&mut m, 5 * 45_000);
        let rounds = ev.iter().filter(|e| matches!(e, MatchEvent::RoundWon { .. })).count();
        assert_eq!(rounds, 5);
        assert!(ev.contains(&MatchEvent::MatchConcluded { result: MatchResult::Lose }));
        assert!(m.is_over());
    }
}
