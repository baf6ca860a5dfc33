/// Events emitted by match operations.
/// The presentation layer consumes these for messages and sound.

use crate::domain::side::{MatchResult, Side};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MatchEvent {
    /// A validated submission landed in the chain.
    WordAccepted { side: Side, word: String },
    /// The simulated opponent played (unvalidated unless configured).
    OpponentPlayed { word: String },
    RejectionCleared,
    CountdownWarning { seconds: u32 },
    RoundWon { round: u32, winner: Side },
    RoundStarted { round: u32 },
    MatchConcluded { result: MatchResult },
}
