/// Chain-letter rule (pure, no match state).
///
/// A word may extend the chain when its first letter equals the last letter
/// of the previous word, compared case-insensitively. Accepted words are
/// stored trimmed and upper-cased.

use thiserror::Error;

/// Why a submission did not enter the chain.
///
/// `WrongLetter` is shown to the player. The rest are dropped quietly:
/// the input layer is expected to gate them before they reach the engine.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum SubmitError {
    #[error("word is empty")]
    Empty,
    #[error("word must start with '{expected}'")]
    WrongLetter { expected: char },
    #[error("not your turn")]
    OutOfTurn,
    #[error("round is not accepting words right now")]
    NotAccepting,
    #[error("match is already over")]
    MatchOver,
}

impl SubmitError {
    /// Should the player see this error?
    pub fn is_surfaced(&self) -> bool {
        matches!(self, SubmitError::WrongLetter { .. })
    }
}

fn upper(c: char) -> char {
    c.to_uppercase().next().unwrap_or(c)
}

/// The letter the next word has to start with (upper case).
pub fn required_letter(last_word: &str) -> Option<char> {
    last_word.trim().chars().last().map(upper)
}

/// Trim and upper-case a candidate. `None` when nothing is left.
pub fn normalize(candidate: &str) -> Option<String> {
    let trimmed = candidate.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_uppercase())
    }
}

/// Does `next` legally follow `prev`?
pub fn follows(prev: &str, next: &str) -> bool {
    match (required_letter(prev), next.trim().chars().next()) {
        (Some(need), Some(first)) => upper(first) == need,
        _ => false,
    }
}

/// Validate `candidate` against the last chain word.
/// Returns the normalized word to append.
pub fn check_submission(last_word: &str, candidate: &str) -> Result<String, SubmitError> {
    let word = normalize(candidate).ok_or(SubmitError::Empty)?;
    if follows(last_word, &word) {
        Ok(word)
    } else {
        let expected = required_letter(last_word).unwrap_or('?');
        Err(SubmitError::WrongLetter { expected })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn required_letter_is_upper_last_char() {
        assert_eq!(required_letter("ANIMAL"), Some('L'));
        assert_eq!(required_letter("lion"), Some('N'));
        assert_eq!(required_letter("  tiger \n"), Some('R'));
        assert_eq!(required_letter(""), None);
    }

    #[test]
    fn accepts_matching_letter_any_case() {
        assert_eq!(check_submission("ANIMAL", "lion").unwrap(), "LION");
        assert_eq!(check_submission("ANIMAL", "  Llama ").unwrap(), "LLAMA");
        assert_eq!(check_submission("lion", "NEWT").unwrap(), "NEWT");
    }

    #[test]
    fn rejects_wrong_letter_with_message() {
        let err = check_submission("LION", "CAT").unwrap_err();
        assert_eq!(err, SubmitError::WrongLetter { expected: 'N' });
        assert_eq!(err.to_string(), "word must start with 'N'");
        assert!(err.is_surfaced());
    }

    #[test]
    fn rejects_blank_input() {
        assert_eq!(check_submission("ANIMAL", "   "), Err(SubmitError::Empty));
        assert_eq!(check_submission("ANIMAL", ""), Err(SubmitError::Empty));
        assert!(!SubmitError::Empty.is_surfaced());
    }

    #[test]
    fn turn_errors_are_quiet() {
        assert!(!SubmitError::OutOfTurn.is_surfaced());
        assert!(!SubmitError::NotAccepting.is_surfaced());
        assert!(!SubmitError::MatchOver.is_surfaced());
    }

    #[test]
    fn follows_checks_first_against_last() {
        assert!(follows("EAGLE", "elephant"));
        assert!(!follows("EAGLE", "TIGER"));
        assert!(!follows("", "TIGER"));
        assert!(!follows("EAGLE", ""));
    }
}
