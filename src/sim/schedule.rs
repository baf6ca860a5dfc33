/// Deferred effects on the match timeline.
///
/// Every entry records the round generation it was scheduled under.
/// The match bumps its generation whenever it leaves a round, so an entry
/// that survives into a later round is recognised as stale and dropped
/// instead of mutating the new round.
///
/// Entries fire in `(due_ms, insertion order)` order.

use crate::domain::side::Side;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Effect {
    /// End of the "checking" pause: append the word and pass the turn.
    FinishValidation { side: Side, word: String },
    /// End of the rejection display.
    ClearRejection,
    /// The simulated opponent finishes thinking.
    OpponentMove,
}

#[derive(Clone, Debug)]
struct Entry {
    due_ms: u64,
    seq: u64,
    generation: u64,
    effect: Effect,
}

#[derive(Clone, Debug, Default)]
pub struct Schedule {
    entries: Vec<Entry>,
    next_seq: u64,
}

impl Schedule {
    pub fn new() -> Self {
        Schedule::default()
    }

    pub fn push(&mut self, due_ms: u64, generation: u64, effect: Effect) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.entries.push(Entry { due_ms, seq, generation, effect });
    }

    /// Earliest due time, if anything is pending.
    pub fn next_due(&self) -> Option<u64> {
        self.entries.iter().map(|e| e.due_ms).min()
    }

    /// Remove and return the earliest entry due at or before `now_ms`,
    /// as `(generation, effect)`.
    pub fn pop_due(&mut self, now_ms: u64) -> Option<(u64, Effect)> {
        let idx = self.entries.iter()
            .enumerate()
            .filter(|(_, e)| e.due_ms <= now_ms)
            .min_by_key(|(_, e)| (e.due_ms, e.seq))
            .map(|(i, _)| i)?;
        let entry = self.entries.remove(idx);
        Some((entry.generation, entry.effect))
    }

    /// Earliest due time of a pending `effect`.
    pub fn due_of(&self, effect: &Effect) -> Option<u64> {
        self.entries.iter().filter(|e| &e.effect == effect).map(|e| e.due_ms).min()
    }

    /// Drop every entry scheduled under an older generation.
    pub fn discard_stale(&mut self, current_generation: u64) {
        self.entries.retain(|e| e.generation == current_generation);
    }
}

#[cfg(test)]
impl Schedule {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, effect: &Effect) -> bool {
        self.entries.iter().any(|e| &e.effect == effect)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pops_in_due_order() {
        let mut s = Schedule::new();
        s.push(300, 0, Effect::OpponentMove);
        s.push(100, 0, Effect::ClearRejection);
        assert_eq!(s.next_due(), Some(100));
        assert_eq!(s.pop_due(50), None);
        assert_eq!(s.pop_due(1000), Some((0, Effect::ClearRejection)));
        assert_eq!(s.pop_due(1000), Some((0, Effect::OpponentMove)));
        assert!(s.is_empty());
    }

    #[test]
    fn equal_due_keeps_insertion_order() {
        let mut s = Schedule::new();
        s.push(100, 0, Effect::OpponentMove);
        s.push(100, 0, Effect::ClearRejection);
        assert_eq!(s.pop_due(100).map(|(_, e)| e), Some(Effect::OpponentMove));
        assert_eq!(s.pop_due(100).map(|(_, e)| e), Some(Effect::ClearRejection));
    }

    #[test]
    fn discard_stale_keeps_current_generation() {
        let mut s = Schedule::new();
        s.push(10, 1, Effect::OpponentMove);
        s.push(20, 2, Effect::ClearRejection);
        s.discard_stale(2);
        assert_eq!(s.len(), 1);
        assert!(s.contains(&Effect::ClearRejection));
        assert!(!s.contains(&Effect::OpponentMove));
    }
}
