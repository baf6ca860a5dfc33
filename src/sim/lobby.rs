/// Lobby simulations: everything between the home menu and a match.
///
/// Nothing here talks to a network. "Searching", "joining" and the
/// opponent's theme vote are timers fed by `update(dt_ms)`; randomness
/// comes from the caller's RNG so tests can seed it.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::config::LobbyConfig;
use crate::domain::catalog::{ROOM_CODE_CHARS, ROOM_CODE_LEN, SEARCH_TEXTS, SYSTEM_THEMES};

pub const JOIN_CODE_ERROR: &str = "Please enter a 6-character room code";
pub const CUSTOM_THEME_MAX_LEN: usize = 30;

const DOTS_MS: u64 = 500;
const SEARCH_TEXT_MS: u64 = 2000;

/// "." .. "..." cycling every half second.
pub fn dots(elapsed_ms: u64) -> &'static str {
    match (elapsed_ms / DOTS_MS) % 4 {
        0 => "",
        1 => ".",
        2 => "..",
        _ => "...",
    }
}

// ══════════════════════════════════════════════════════════════
// Flash: short-lived status text
// ══════════════════════════════════════════════════════════════

#[derive(Clone, Debug, Default)]
pub struct Flash {
    text: String,
    remaining_ms: u64,
}

impl Flash {
    pub fn show(&mut self, text: &str, duration_ms: u64) {
        self.text = text.to_string();
        self.remaining_ms = duration_ms;
    }

    pub fn update(&mut self, dt_ms: u64) {
        self.remaining_ms = self.remaining_ms.saturating_sub(dt_ms);
        if self.remaining_ms == 0 {
            self.text.clear();
        }
    }

    pub fn text(&self) -> Option<&str> {
        if self.remaining_ms > 0 { Some(&self.text) } else { None }
    }
}

// ══════════════════════════════════════════════════════════════
// Quick match
// ══════════════════════════════════════════════════════════════

#[derive(Debug)]
pub struct QuickMatch {
    elapsed_ms: u64,
    found_after_ms: u64,
    found: bool,
}

impl QuickMatch {
    pub fn new(cfg: &LobbyConfig) -> Self {
        QuickMatch { elapsed_ms: 0, found_after_ms: cfg.quick_match_ms, found: false }
    }

    /// Returns true exactly once, when the simulated opponent is found.
    pub fn update(&mut self, dt_ms: u64) -> bool {
        self.elapsed_ms += dt_ms;
        if !self.found && self.elapsed_ms >= self.found_after_ms {
            self.found = true;
            log::info!("quick match: opponent found after {}ms", self.elapsed_ms);
            return true;
        }
        false
    }

    pub fn search_text(&self) -> &'static str {
        SEARCH_TEXTS[((self.elapsed_ms / SEARCH_TEXT_MS) as usize) % SEARCH_TEXTS.len()]
    }

    pub fn elapsed_ms(&self) -> u64 {
        self.elapsed_ms
    }
}

// ══════════════════════════════════════════════════════════════
// Create room
// ══════════════════════════════════════════════════════════════

pub fn generate_room_code<R: Rng>(rng: &mut R) -> String {
    (0..ROOM_CODE_LEN)
        .map(|_| ROOM_CODE_CHARS[rng.gen_range(0..ROOM_CODE_CHARS.len())] as char)
        .collect()
}

#[derive(Debug)]
pub struct CreateRoom {
    pub code: String,
    pub flash: Flash,
    flash_ms: u64,
    elapsed_ms: u64,
}

impl CreateRoom {
    pub fn new<R: Rng>(cfg: &LobbyConfig, rng: &mut R) -> Self {
        let code = generate_room_code(rng);
        log::info!("room {code} created");
        CreateRoom { code, flash: Flash::default(), flash_ms: cfg.flash_ms, elapsed_ms: 0 }
    }

    /// No clipboard in a terminal; the flash is the feedback.
    pub fn copy_code(&mut self) {
        self.flash.show("Copied!", self.flash_ms);
    }

    pub fn share(&mut self) {
        self.flash.show("Invite copied!", self.flash_ms);
    }

    pub fn update(&mut self, dt_ms: u64) {
        self.elapsed_ms += dt_ms;
        self.flash.update(dt_ms);
    }

    pub fn elapsed_ms(&self) -> u64 {
        self.elapsed_ms
    }
}

// ══════════════════════════════════════════════════════════════
// Join room
// ══════════════════════════════════════════════════════════════

#[derive(Debug)]
pub struct JoinRoom {
    pub code: String,
    pub error: Option<&'static str>,
    search_ms: u64,
    /// Remaining search time while a join is in flight.
    searching: Option<u64>,
}

impl JoinRoom {
    pub fn new(cfg: &LobbyConfig) -> Self {
        JoinRoom { code: String::new(), error: None, search_ms: cfg.join_search_ms, searching: None }
    }

    /// Upper-cased ASCII alphanumerics only, at most six.
    pub fn push_char(&mut self, c: char) {
        if self.is_searching() || !c.is_ascii_alphanumeric() || self.code.len() >= ROOM_CODE_LEN {
            return;
        }
        self.code.push(c.to_ascii_uppercase());
        self.error = None;
    }

    pub fn backspace(&mut self) {
        if !self.is_searching() {
            self.code.pop();
            self.error = None;
        }
    }

    /// Replace the code with a filtered copy of `text`.
    pub fn set_code(&mut self, text: &str) {
        self.code.clear();
        for c in text.chars() {
            self.push_char(c);
        }
        self.error = None;
    }

    pub fn join(&mut self) -> Result<(), &'static str> {
        if self.is_searching() {
            return Ok(());
        }
        if self.code.len() != ROOM_CODE_LEN {
            self.error = Some(JOIN_CODE_ERROR);
            return Err(JOIN_CODE_ERROR);
        }
        log::info!("joining room {}", self.code);
        self.searching = Some(self.search_ms);
        Ok(())
    }

    /// Returns true exactly once, when the simulated search finishes.
    pub fn update(&mut self, dt_ms: u64) -> bool {
        match self.searching {
            Some(left) if left <= dt_ms => {
                self.searching = None;
                true
            }
            Some(left) => {
                self.searching = Some(left - dt_ms);
                false
            }
            None => false,
        }
    }

    pub fn is_searching(&self) -> bool {
        self.searching.is_some()
    }
}

// ══════════════════════════════════════════════════════════════
// Theme selection
// ══════════════════════════════════════════════════════════════

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum VoteDecision {
    Pending,
    Accepted,
    Declined,
}

#[derive(Debug)]
pub struct CustomVote {
    pub theme: String,
    pub decision: VoteDecision,
    pub countdown: u32,
    countdown_total: u32,
    vote_in_ms: u64,
    tick_accum_ms: u64,
}

impl CustomVote {
    fn new(theme: String, cfg: &LobbyConfig) -> Self {
        CustomVote {
            theme,
            decision: VoteDecision::Pending,
            countdown: cfg.theme_vote_seconds,
            countdown_total: cfg.theme_vote_seconds,
            vote_in_ms: cfg.theme_vote_ms,
            tick_accum_ms: 0,
        }
    }

    /// Fraction of the countdown left, for the progress bar.
    pub fn fraction_left(&self) -> f32 {
        if self.countdown_total == 0 {
            return 0.0;
        }
        self.countdown as f32 / self.countdown_total as f32
    }

    /// Returns the decision if it changed during this update.
    fn update<R: Rng>(&mut self, dt_ms: u64, rng: &mut R) -> Option<VoteDecision> {
        if self.decision != VoteDecision::Pending {
            return None;
        }
        self.vote_in_ms = self.vote_in_ms.saturating_sub(dt_ms);
        if self.vote_in_ms == 0 {
            self.decision = if rng.gen_bool(0.5) { VoteDecision::Accepted } else { VoteDecision::Declined };
            log::info!("opponent vote on {:?}: {:?}", self.theme, self.decision);
            return Some(self.decision);
        }

        self.tick_accum_ms += dt_ms;
        while self.tick_accum_ms >= 1000 && self.countdown > 0 {
            self.tick_accum_ms -= 1000;
            self.countdown -= 1;
        }
        if self.countdown == 0 {
            self.decision = VoteDecision::Declined;
            log::info!("opponent vote on {:?} expired", self.theme);
            return Some(self.decision);
        }
        None
    }
}

#[derive(Debug)]
pub enum ThemeMode {
    Browse,
    CustomEntry { text: String },
    Vote(CustomVote),
}

/// Outcome of a confirm on the theme screen.
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum ThemeAction {
    None,
    /// Start the match with this theme.
    Start(String),
}

#[derive(Debug)]
pub struct ThemePicker {
    /// 0..SYSTEM_THEMES.len() are themes; the last two rows are
    /// "Random" and "Custom".
    pub cursor: usize,
    pub mode: ThemeMode,
    cfg: LobbyConfig,
}

pub const THEME_ROW_RANDOM: usize = SYSTEM_THEMES.len();
pub const THEME_ROW_CUSTOM: usize = SYSTEM_THEMES.len() + 1;
const THEME_ROWS: usize = SYSTEM_THEMES.len() + 2;

pub fn random_theme<R: Rng>(rng: &mut R) -> String {
    SYSTEM_THEMES.choose(rng).map(|t| t.name).unwrap_or("Animals").to_string()
}

impl ThemePicker {
    pub fn new(cfg: &LobbyConfig) -> Self {
        ThemePicker { cursor: 0, mode: ThemeMode::Browse, cfg: cfg.clone() }
    }

    /// Move the cursor; returns whether it moved.
    pub fn move_cursor(&mut self, delta: isize) -> bool {
        if !matches!(self.mode, ThemeMode::Browse) {
            return false;
        }
        let next = (self.cursor as isize + delta).rem_euclid(THEME_ROWS as isize) as usize;
        let moved = next != self.cursor;
        self.cursor = next;
        moved
    }

    pub fn confirm<R: Rng>(&mut self, rng: &mut R) -> ThemeAction {
        match &mut self.mode {
            ThemeMode::Browse => match self.cursor {
                c if c < SYSTEM_THEMES.len() => ThemeAction::Start(SYSTEM_THEMES[c].name.to_string()),
                THEME_ROW_RANDOM => ThemeAction::Start(random_theme(rng)),
                _ => {
                    self.mode = ThemeMode::CustomEntry { text: String::new() };
                    ThemeAction::None
                }
            },
            ThemeMode::CustomEntry { text } => {
                let theme = text.trim().to_string();
                if theme.is_empty() {
                    return ThemeAction::None;
                }
                log::info!("custom theme {theme:?} proposed");
                self.mode = ThemeMode::Vote(CustomVote::new(theme, &self.cfg));
                ThemeAction::None
            }
            ThemeMode::Vote(vote) => match vote.decision {
                VoteDecision::Pending => ThemeAction::None,
                VoteDecision::Accepted => ThemeAction::Start(vote.theme.clone()),
                VoteDecision::Declined => ThemeAction::Start(random_theme(rng)),
            },
        }
    }

    /// Leave custom entry or a vote. Returns false when already browsing,
    /// so the caller can route back instead.
    pub fn back(&mut self) -> bool {
        if matches!(self.mode, ThemeMode::Browse) {
            return false;
        }
        self.mode = ThemeMode::Browse;
        true
    }

    pub fn push_char(&mut self, c: char) {
        if let ThemeMode::CustomEntry { text } = &mut self.mode {
            if (c == ' ' || c.is_ascii_graphic()) && text.len() < CUSTOM_THEME_MAX_LEN {
                text.push(c);
            }
        }
    }

    pub fn backspace(&mut self) {
        if let ThemeMode::CustomEntry { text } = &mut self.mode {
            text.pop();
        }
    }

    #[cfg(test)]
    pub fn is_typing(&self) -> bool {
        matches!(self.mode, ThemeMode::CustomEntry { .. })
    }

    pub fn update<R: Rng>(&mut self, dt_ms: u64, rng: &mut R) -> Option<VoteDecision> {
        match &mut self.mode {
            ThemeMode::Vote(vote) => vote.update(dt_ms, rng),
            _ => None,
        }
    }
}
