/// Application state: the session around the match engine.
///
/// `App` owns the router, the lobby simulations, the active match and the
/// sound-test panel. It is driven by two calls per frame:
///   - `handle(cmd, audio)` for each input command
///   - `update(dt_ms, audio)` for the passage of time
///
/// Audio is passed in on every call rather than stored, so tests hand in a
/// recorder and the binary hands in whatever `open_player` produced.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::config::GameConfig;
use crate::domain::catalog::{TimeFilter, RECENT_ROOMS};
use crate::domain::side::{MatchResult, Side};
use crate::sim::event::MatchEvent;
use crate::sim::lobby::{CreateRoom, Flash, JoinRoom, QuickMatch, ThemeAction, ThemePicker, VoteDecision};
use crate::sim::match_state::Match;
use crate::sim::router::{Nav, Router, Screen};
use crate::sim::step;
use crate::ui::sound::{SoundEffect, SoundPlayer};

pub const DEFAULT_USERNAME: &str = "Player";
pub const GUEST_USERNAME: &str = "Guest";
pub const MAX_NAME_LEN: usize = 16;
pub const MAX_WORD_LEN: usize = 20;
const VOLUME_STEP: f32 = 0.05;
const MESSAGE_MS: u64 = 2000;
const INVITE_MS: u64 = 3000;

/// Input, already translated from keyboard or gamepad.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Command {
    Up,
    Down,
    Left,
    Right,
    Confirm,
    Back,
    Char(char),
    Backspace,
    ToggleSoundPanel,
    Quit,
}

// ── Menus ──

pub const LOGIN_ITEMS: [&str; 2] = ["Sign In", "Play as Guest"];
pub const HOME_ITEMS: [&str; 7] = [
    "Quick Match", "Create Room", "Join Room", "Leaderboard", "Profile", "Dark Mode", "Quit",
];
pub const CREATE_ROOM_ITEMS: [&str; 3] = ["Copy Code", "Share", "Start Game"];
pub const RESULTS_ITEMS: [&str; 2] = ["Play Again", "Home"];
pub const PROFILE_ITEMS: [&str; 8] = [
    "Edit Username", "Dark Mode", "Sound", "Music", "Notifications",
    "Detailed Stats", "Invite Friends", "Sign Out",
];

fn menu_len(screen: Screen) -> usize {
    match screen {
        Screen::Login => LOGIN_ITEMS.len(),
        Screen::Home => HOME_ITEMS.len(),
        Screen::CreateRoom => CREATE_ROOM_ITEMS.len(),
        Screen::Results => RESULTS_ITEMS.len(),
        Screen::Profile => PROFILE_ITEMS.len(),
        _ => 0,
    }
}

// ── Sound test panel ──

/// Rows: volume, mute, then one per effect.
#[derive(Debug, Default)]
pub struct SoundPanel {
    pub open: bool,
    pub cursor: usize,
}

impl SoundPanel {
    pub const ROW_VOLUME: usize = 0;
    pub const ROW_MUTE: usize = 1;
    pub const ROWS: usize = 2 + SoundEffect::ALL.len();

    pub fn effect_at(&self, row: usize) -> Option<SoundEffect> {
        row.checked_sub(2).and_then(|i| SoundEffect::ALL.get(i).copied())
    }
}

// ══════════════════════════════════════════════════════════════
// App
// ══════════════════════════════════════════════════════════════

pub struct App {
    pub config: GameConfig,
    pub router: Router,
    pub username: String,
    pub dark_mode: bool,
    pub menu_cursor: usize,
    /// Text being typed on the login screen or in the profile name editor.
    pub name_input: String,
    pub editing_name: bool,

    // ── Lobby ──
    pub quick: Option<QuickMatch>,
    pub room: Option<CreateRoom>,
    pub join: Option<JoinRoom>,
    pub picker: ThemePicker,
    pub selected_theme: Option<String>,

    // ── Match ──
    pub game: Option<Match>,
    pub word_input: String,
    pub last_result: Option<MatchResult>,
    /// Counts down from the match's end to the results screen.
    pub results_in_ms: Option<u64>,
    pub message: Flash,

    // ── Stats screens ──
    pub leaderboard_filter: TimeFilter,
    pub stats_filter: TimeFilter,
    pub invite: Flash,
    /// Profile preferences; there is no music track or push service behind them.
    pub music_enabled: bool,
    pub notifications: bool,

    pub sound_panel: SoundPanel,
    pub quit: bool,
    /// Total time fed to `update`, for animations.
    pub elapsed_ms: u64,
    rng: StdRng,
}

impl App {
    pub fn new(config: GameConfig) -> Self {
        let rng = match config.general.rng_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        App {
            router: Router::new(),
            username: config.general.player_name.clone(),
            dark_mode: config.general.dark_mode,
            menu_cursor: 0,
            name_input: String::new(),
            editing_name: false,
            quick: None,
            room: None,
            join: None,
            picker: ThemePicker::new(&config.lobby),
            selected_theme: None,
            game: None,
            word_input: String::new(),
            last_result: None,
            results_in_ms: None,
            message: Flash::default(),
            leaderboard_filter: TimeFilter::AllTime,
            stats_filter: TimeFilter::AllTime,
            invite: Flash::default(),
            music_enabled: true,
            notifications: true,
            sound_panel: SoundPanel::default(),
            quit: false,
            elapsed_ms: 0,
            rng,
            config,
        }
    }

    pub fn screen(&self) -> Screen {
        self.router.current()
    }

    // ── Navigation ──

    /// Follow `nav` and set up the screen we land on.
    fn go(&mut self, nav: Nav) -> bool {
        if !self.router.apply(nav) {
            return false;
        }
        let screen = self.router.current();
        self.menu_cursor = 0;
        self.editing_name = false;
        self.quick = None;
        self.room = None;
        self.join = None;

        match screen {
            Screen::Login => self.name_input.clear(),
            Screen::QuickMatchLoading => self.quick = Some(QuickMatch::new(&self.config.lobby)),
            Screen::CreateRoom => self.room = Some(CreateRoom::new(&self.config.lobby, &mut self.rng)),
            Screen::JoinRoom => self.join = Some(JoinRoom::new(&self.config.lobby)),
            Screen::ThemeSelection => {
                self.picker = ThemePicker::new(&self.config.lobby);
                self.game = None;
                self.results_in_ms = None;
            }
            Screen::Gameplay => self.start_game(),
            Screen::Home => self.game = None,
            _ => {}
        }
        true
    }

    fn start_game(&mut self) {
        let theme = self.selected_theme.clone().unwrap_or_else(|| "Animals".to_string());
        let rng = StdRng::seed_from_u64(self.rng.gen());
        self.game = Some(step::start_match(&theme, &self.config.rules, rng));
        self.word_input.clear();
        self.results_in_ms = None;
        self.message = Flash::default();
    }

    fn move_cursor(&mut self, delta: isize, audio: &mut dyn SoundPlayer) {
        let len = menu_len(self.screen());
        if len == 0 {
            return;
        }
        let next = (self.menu_cursor as isize + delta).rem_euclid(len as isize) as usize;
        if next != self.menu_cursor {
            self.menu_cursor = next;
            audio.play_effect(SoundEffect::Hover);
        }
    }

    // ══════════════════════════════════════════════════════════
    // Input
    // ══════════════════════════════════════════════════════════

    pub fn handle(&mut self, cmd: Command, audio: &mut dyn SoundPlayer) {
        match cmd {
            Command::Quit => {
                self.quit = true;
                return;
            }
            Command::ToggleSoundPanel => {
                self.sound_panel.open = !self.sound_panel.open;
                audio.play_effect(SoundEffect::Popup);
                return;
            }
            _ => {}
        }
        if self.sound_panel.open {
            self.handle_sound_panel(cmd, audio);
            return;
        }

        match self.screen() {
            Screen::Splash => {
                if cmd == Command::Confirm {
                    audio.play_effect(SoundEffect::ButtonClick);
                    self.go(Nav::Continue);
                }
            }
            Screen::Login => self.handle_login(cmd, audio),
            Screen::Home => self.handle_home(cmd, audio),
            Screen::QuickMatchLoading | Screen::Leaderboard | Screen::DetailedStats => {
                self.handle_browse(cmd, audio)
            }
            Screen::CreateRoom => self.handle_create_room(cmd, audio),
            Screen::JoinRoom => self.handle_join_room(cmd, audio),
            Screen::ThemeSelection => self.handle_theme(cmd, audio),
            Screen::Gameplay => self.handle_gameplay(cmd, audio),
            Screen::Results => self.handle_results(cmd, audio),
            Screen::Profile => self.handle_profile(cmd, audio),
        }
    }

    fn handle_login(&mut self, cmd: Command, audio: &mut dyn SoundPlayer) {
        match cmd {
            Command::Up => self.move_cursor(-1, audio),
            Command::Down => self.move_cursor(1, audio),
            Command::Char(c) => push_limited(&mut self.name_input, c, MAX_NAME_LEN),
            Command::Backspace => { self.name_input.pop(); }
            Command::Confirm => {
                audio.play_effect(SoundEffect::ButtonClick);
                self.username = if self.menu_cursor == 1 {
                    GUEST_USERNAME.to_string()
                } else {
                    non_blank_or(&self.name_input, DEFAULT_USERNAME)
                };
                log::info!("signed in as {:?}", self.username);
                self.go(Nav::SignIn);
            }
            _ => {}
        }
    }

    fn handle_home(&mut self, cmd: Command, audio: &mut dyn SoundPlayer) {
        match cmd {
            Command::Up => self.move_cursor(-1, audio),
            Command::Down => self.move_cursor(1, audio),
            Command::Confirm => {
                audio.play_effect(SoundEffect::ButtonClick);
                match self.menu_cursor {
                    0 => { self.go(Nav::QuickMatch); }
                    1 => { self.go(Nav::CreateRoom); }
                    2 => { self.go(Nav::JoinRoom); }
                    3 => { self.go(Nav::Leaderboard); }
                    4 => { self.go(Nav::Profile); }
                    5 => self.dark_mode = !self.dark_mode,
                    _ => self.quit = true,
                }
            }
            _ => {}
        }
    }

    /// Screens with nothing to pick: back, plus filter cycling where shown.
    fn handle_browse(&mut self, cmd: Command, audio: &mut dyn SoundPlayer) {
        let filter = match self.screen() {
            Screen::Leaderboard => Some(&mut self.leaderboard_filter),
            Screen::DetailedStats => Some(&mut self.stats_filter),
            _ => None,
        };
        match cmd {
            Command::Left | Command::Right => {
                if let Some(f) = filter {
                    *f = if cmd == Command::Left { f.prev() } else { f.next() };
                    audio.play_effect(SoundEffect::ButtonClick);
                }
            }
            Command::Back => {
                audio.play_effect(SoundEffect::ButtonClick);
                self.go(Nav::Back);
            }
            _ => {}
        }
    }

    fn handle_create_room(&mut self, cmd: Command, audio: &mut dyn SoundPlayer) {
        match cmd {
            Command::Up => self.move_cursor(-1, audio),
            Command::Down => self.move_cursor(1, audio),
            Command::Back => { self.go(Nav::Back); }
            Command::Confirm => {
                audio.play_effect(SoundEffect::ButtonClick);
                match self.menu_cursor {
                    0 => if let Some(room) = self.room.as_mut() { room.copy_code() },
                    1 => if let Some(room) = self.room.as_mut() { room.share() },
                    _ => {
                        audio.play_effect(SoundEffect::Popup);
                        self.go(Nav::OpponentReady);
                    }
                }
            }
            _ => {}
        }
    }

    fn handle_join_room(&mut self, cmd: Command, audio: &mut dyn SoundPlayer) {
        let Some(join) = self.join.as_mut() else { return };
        match cmd {
            Command::Char(c) => join.push_char(c),
            Command::Backspace => join.backspace(),
            // Recent rooms fill the code field
            Command::Up | Command::Down => {
                if !join.is_searching() {
                    let idx = RECENT_ROOMS.iter().position(|r| *r == join.code);
                    let next = match (idx, cmd) {
                        (Some(i), Command::Down) => (i + 1) % RECENT_ROOMS.len(),
                        (Some(i), _) => (i + RECENT_ROOMS.len() - 1) % RECENT_ROOMS.len(),
                        (None, _) => 0,
                    };
                    join.set_code(RECENT_ROOMS[next]);
                    audio.play_effect(SoundEffect::Hover);
                }
            }
            Command::Confirm => {
                audio.play_effect(SoundEffect::ButtonClick);
                if join.join().is_err() {
                    audio.play_effect(SoundEffect::Error);
                }
            }
            Command::Back => { self.go(Nav::Back); }
            _ => {}
        }
    }

    fn handle_theme(&mut self, cmd: Command, audio: &mut dyn SoundPlayer) {
        match cmd {
            Command::Up => {
                if self.picker.move_cursor(-1) { audio.play_effect(SoundEffect::Hover); }
            }
            Command::Down => {
                if self.picker.move_cursor(1) { audio.play_effect(SoundEffect::Hover); }
            }
            Command::Char(c) => self.picker.push_char(c),
            Command::Backspace => self.picker.backspace(),
            Command::Back => {
                if !self.picker.back() {
                    self.go(Nav::Back);
                }
            }
            Command::Confirm => {
                audio.play_effect(SoundEffect::ButtonClick);
                if let ThemeAction::Start(theme) = self.picker.confirm(&mut self.rng) {
                    log::info!("theme selected: {theme:?}");
                    self.selected_theme = Some(theme);
                    audio.play_effect(SoundEffect::Start);
                    self.go(Nav::StartGame);
                }
            }
            _ => {}
        }
    }

    fn handle_gameplay(&mut self, cmd: Command, audio: &mut dyn SoundPlayer) {
        if cmd == Command::Back {
            log::info!("match abandoned");
            self.go(Nav::Back);
            return;
        }
        let Some(game) = self.game.as_mut() else { return };
        if !game.accepts_player_input() {
            return;
        }
        match cmd {
            Command::Char(c) if c.is_ascii_alphabetic() => {
                push_limited(&mut self.word_input, c.to_ascii_uppercase(), MAX_WORD_LEN);
            }
            Command::Backspace => { self.word_input.pop(); }
            Command::Confirm => match step::submit_word(game, &self.word_input) {
                Ok(()) => {
                    audio.play_effect(SoundEffect::Select);
                    self.word_input.clear();
                }
                Err(e) if e.is_surfaced() => {
                    audio.play_effect(SoundEffect::Error);
                    self.word_input.clear();
                }
                // Blank and out-of-turn submissions are not shown
                Err(_) => {}
            },
            _ => {}
        }
    }

    fn handle_results(&mut self, cmd: Command, audio: &mut dyn SoundPlayer) {
        match cmd {
            Command::Up => self.move_cursor(-1, audio),
            Command::Down => self.move_cursor(1, audio),
            Command::Back => { self.go(Nav::Back); }
            Command::Confirm => {
                audio.play_effect(SoundEffect::ButtonClick);
                let nav = if self.menu_cursor == 0 { Nav::PlayAgain } else { Nav::Home };
                self.go(nav);
            }
            _ => {}
        }
    }

    fn handle_profile(&mut self, cmd: Command, audio: &mut dyn SoundPlayer) {
        if self.editing_name {
            match cmd {
                Command::Char(c) => push_limited(&mut self.name_input, c, MAX_NAME_LEN),
                Command::Backspace => { self.name_input.pop(); }
                Command::Confirm => {
                    if !self.name_input.trim().is_empty() {
                        self.username = self.name_input.trim().to_string();
                        audio.play_effect(SoundEffect::Success);
                    }
                    self.editing_name = false;
                }
                Command::Back => self.editing_name = false,
                _ => {}
            }
            return;
        }
        match cmd {
            Command::Up => self.move_cursor(-1, audio),
            Command::Down => self.move_cursor(1, audio),
            Command::Back => { self.go(Nav::Back); }
            Command::Confirm => {
                audio.play_effect(SoundEffect::ButtonClick);
                match self.menu_cursor {
                    0 => {
                        self.name_input = self.username.clone();
                        self.editing_name = true;
                    }
                    1 => self.dark_mode = !self.dark_mode,
                    2 => audio.toggle_muted(),
                    3 => {
                        self.music_enabled = !self.music_enabled;
                        log::debug!("music {}", if self.music_enabled { "on" } else { "off" });
                    }
                    4 => {
                        self.notifications = !self.notifications;
                        log::debug!("notifications {}", if self.notifications { "on" } else { "off" });
                    }
                    5 => { self.go(Nav::ViewStats); }
                    6 => self.invite.show("Invite link copied! Share it with your friends.", INVITE_MS),
                    _ => {
                        log::info!("{:?} signed out", self.username);
                        self.username = DEFAULT_USERNAME.to_string();
                        self.go(Nav::SignOut);
                    }
                }
            }
            _ => {}
        }
    }

    fn handle_sound_panel(&mut self, cmd: Command, audio: &mut dyn SoundPlayer) {
        let panel = &mut self.sound_panel;
        match cmd {
            Command::Up => panel.cursor = (panel.cursor + SoundPanel::ROWS - 1) % SoundPanel::ROWS,
            Command::Down => panel.cursor = (panel.cursor + 1) % SoundPanel::ROWS,
            Command::Left | Command::Right if panel.cursor == SoundPanel::ROW_VOLUME => {
                let delta = if cmd == Command::Left { -VOLUME_STEP } else { VOLUME_STEP };
                // Round to whole percent so repeated steps land on 0 and 1 exactly
                let v = ((audio.volume() + delta) * 100.0).round() / 100.0;
                audio.set_volume(v);
            }
            Command::Confirm => match panel.cursor {
                SoundPanel::ROW_VOLUME => {}
                SoundPanel::ROW_MUTE => audio.toggle_muted(),
                row => {
                    if let Some(effect) = panel.effect_at(row) {
                        audio.play(effect.id());
                    }
                }
            },
            Command::Back => panel.open = false,
            _ => {}
        }
    }

    // ══════════════════════════════════════════════════════════
    // Time
    // ══════════════════════════════════════════════════════════

    pub fn update(&mut self, dt_ms: u64, audio: &mut dyn SoundPlayer) {
        self.elapsed_ms += dt_ms;
        self.message.update(dt_ms);
        self.invite.update(dt_ms);

        match self.screen() {
            Screen::QuickMatchLoading => {
                if self.quick.as_mut().is_some_and(|q| q.update(dt_ms)) {
                    audio.play_effect(SoundEffect::Popup);
                    self.go(Nav::OpponentReady);
                }
            }
            Screen::CreateRoom => {
                if let Some(room) = self.room.as_mut() {
                    room.update(dt_ms);
                }
            }
            Screen::JoinRoom => {
                if self.join.as_mut().is_some_and(|j| j.update(dt_ms)) {
                    audio.play_effect(SoundEffect::Popup);
                    self.go(Nav::OpponentReady);
                }
            }
            Screen::ThemeSelection => match self.picker.update(dt_ms, &mut self.rng) {
                Some(VoteDecision::Accepted) => audio.play_effect(SoundEffect::Success),
                Some(VoteDecision::Declined) => audio.play_effect(SoundEffect::Error),
                _ => {}
            },
            Screen::Gameplay => self.update_game(dt_ms, audio),
            _ => {}
        }
    }

    fn update_game(&mut self, dt_ms: u64, audio: &mut dyn SoundPlayer) {
        let Some(game) = self.game.as_mut() else { return };

        if let Some(left) = self.results_in_ms {
            if left <= dt_ms {
                self.results_in_ms = None;
                self.last_result = game.result;
                self.go(Nav::MatchFinished);
            } else {
                self.results_in_ms = Some(left - dt_ms);
            }
            return;
        }

        let opponent = game.opponent.name.clone();
        for event in step::advance(game, dt_ms) {
            match event {
                MatchEvent::WordAccepted { side: Side::Player, .. } => {
                    audio.play_effect(SoundEffect::Success);
                }
                MatchEvent::WordAccepted { .. } | MatchEvent::OpponentPlayed { .. } => {
                    audio.play_effect(SoundEffect::Popup);
                }
                MatchEvent::RejectionCleared => {}
                MatchEvent::CountdownWarning { .. } => audio.play_effect(SoundEffect::CountDown),
                MatchEvent::RoundWon { round, winner } => {
                    let text = match winner {
                        Side::Player => format!("Round {round}: {opponent} ran out of time. You win the round!"),
                        Side::Opponent => format!("Round {round}: Time's up! {opponent} wins the round."),
                    };
                    self.message.show(&text, MESSAGE_MS);
                    if winner == Side::Player {
                        audio.play_effect(SoundEffect::LevelUp);
                    }
                }
                MatchEvent::RoundStarted { .. } => audio.play_effect(SoundEffect::Start),
                MatchEvent::MatchConcluded { result } => {
                    audio.play_effect(SoundEffect::Complete);
                    self.message.show(
                        if result == MatchResult::Win { "Victory!" } else { "Defeat!" },
                        self.config.rules.results_delay_ms,
                    );
                    self.results_in_ms = Some(self.config.rules.results_delay_ms);
                }
            }
        }
    }
}

/// The renderer draws one column per char, so text fields take printable ASCII only.
fn push_limited(buf: &mut String, c: char, max: usize) {
    if (c == ' ' || c.is_ascii_graphic()) && buf.len() < max {
        buf.push(c);
    }
}

fn non_blank_or(text: &str, fallback: &str) -> String {
    match text.trim() {
        "" => fallback.to_string(),
        t => t.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::lobby::{ThemeMode, THEME_ROW_CUSTOM};
    use crate::sim::match_state::RoundPhase;
    use crate::ui::sound::AudioSettings;

    /// Remembers every effect it was asked to play.
    #[derive(Default)]
    struct Recorder {
        settings: AudioSettings,
        played: Vec<SoundEffect>,
    }

    impl SoundPlayer for Recorder {
        fn settings(&self) -> &AudioSettings { &self.settings }
        fn settings_mut(&mut self) -> &mut AudioSettings { &mut self.settings }
        fn play_effect(&mut self, effect: SoundEffect) {
            if !self.settings.muted {
                self.played.push(effect);
            }
        }
    }

    fn app() -> App {
        let mut cfg = GameConfig::default();
        cfg.general.rng_seed = Some(7);
        App::new(cfg)
    }

    fn feed(app: &mut App, audio: &mut Recorder, cmds: &[Command]) {
        for &c in cmds {
            app.handle(c, audio);
        }
    }

    fn type_text(app: &mut App, audio: &mut Recorder, text: &str) {
        for c in text.chars() {
            app.handle(Command::Char(c), audio);
        }
    }

    fn to_home(app: &mut App, audio: &mut Recorder) {
        feed(app, audio, &[Command::Confirm, Command::Confirm]);
        assert_eq!(app.screen(), Screen::Home);
    }

    fn to_gameplay(app: &mut App, audio: &mut Recorder) {
        to_home(app, audio);
        app.handle(Command::Confirm, audio); // Quick Match
        assert_eq!(app.screen(), Screen::QuickMatchLoading);
        app.update(3000, audio);
        assert_eq!(app.screen(), Screen::ThemeSelection);
        app.handle(Command::Confirm, audio); // Animals
        assert_eq!(app.screen(), Screen::Gameplay);
    }

    #[test]
    fn login_uses_typed_name_or_default() {
        let mut a = app();
        let mut au = Recorder::default();
        a.handle(Command::Confirm, &mut au);
        type_text(&mut a, &mut au, "  Ada ");
        a.handle(Command::Confirm, &mut au);
        assert_eq!(a.username, "Ada");

        let mut a = app();
        to_home(&mut a, &mut au);
        assert_eq!(a.username, DEFAULT_USERNAME);
    }

    #[test]
    fn guest_login() {
        let mut a = app();
        let mut au = Recorder::default();
        feed(&mut a, &mut au, &[Command::Confirm, Command::Down, Command::Confirm]);
        assert_eq!(a.username, GUEST_USERNAME);
        assert!(au.played.contains(&SoundEffect::Hover));
    }

    #[test]
    fn quick_match_to_gameplay() {
        let mut a = app();
        let mut au = Recorder::default();
        to_gameplay(&mut a, &mut au);
        let game = a.game.as_ref().unwrap();
        assert_eq!(game.theme, "Animals");
        assert!(au.played.contains(&SoundEffect::Start));
    }

    #[test]
    fn typed_word_is_submitted() {
        let mut a = app();
        let mut au = Recorder::default();
        to_gameplay(&mut a, &mut au);
        type_text(&mut a, &mut au, "lion");
        assert_eq!(a.word_input, "LION");
        a.handle(Command::Confirm, &mut au);
        assert!(a.word_input.is_empty());
        a.update(1000, &mut au);
        let game = a.game.as_ref().unwrap();
        assert_eq!(game.round.chain, vec!["ANIMAL", "LION"]);
        assert!(au.played.contains(&SoundEffect::Success));
    }

    #[test]
    fn text_fields_take_printable_ascii_only() {
        let mut a = app();
        let mut au = Recorder::default();
        a.handle(Command::Confirm, &mut au);
        type_text(&mut a, &mut au, "Zoë 名前 Bo\t");
        assert_eq!(a.name_input, "Zo  Bo");

        let mut a = app();
        to_gameplay(&mut a, &mut au);
        type_text(&mut a, &mut au, "lïon🦁");
        assert_eq!(a.word_input, "LON");
    }

    #[test]
    fn wrong_letter_plays_error() {
        let mut a = app();
        let mut au = Recorder::default();
        to_gameplay(&mut a, &mut au);
        type_text(&mut a, &mut au, "CAT");
        a.handle(Command::Confirm, &mut au);
        assert_eq!(au.played.last(), Some(&SoundEffect::Error));
        let game = a.game.as_ref().unwrap();
        assert_eq!(game.round.rejection(), Some("word must start with 'L'"));
        // Typing is blocked while the rejection shows
        type_text(&mut a, &mut au, "X");
        assert!(a.word_input.is_empty());
    }

    #[test]
    fn match_ends_on_results_after_delay() {
        let mut a = app();
        let mut au = Recorder::default();
        to_gameplay(&mut a, &mut au);
        a.update(5 * 45_000, &mut au);
        assert!(a.game.as_ref().unwrap().is_over());
        assert_eq!(a.screen(), Screen::Gameplay);
        assert!(au.played.contains(&SoundEffect::Complete));
        assert!(au.played.contains(&SoundEffect::CountDown));

        a.update(1999, &mut au);
        assert_eq!(a.screen(), Screen::Gameplay);
        a.update(1, &mut au);
        assert_eq!(a.screen(), Screen::Results);
        assert_eq!(a.last_result, Some(MatchResult::Lose));

        a.handle(Command::Confirm, &mut au); // Play Again
        assert_eq!(a.screen(), Screen::ThemeSelection);
        assert!(a.game.is_none());
    }

    #[test]
    fn back_from_gameplay_discards_match() {
        let mut a = app();
        let mut au = Recorder::default();
        to_gameplay(&mut a, &mut au);
        a.handle(Command::Back, &mut au);
        assert_eq!(a.screen(), Screen::ThemeSelection);
        assert!(a.game.is_none());
    }

    #[test]
    fn join_room_flow() {
        let mut a = app();
        let mut au = Recorder::default();
        to_home(&mut a, &mut au);
        feed(&mut a, &mut au, &[Command::Down, Command::Down, Command::Confirm]);
        assert_eq!(a.screen(), Screen::JoinRoom);

        type_text(&mut a, &mut au, "abc");
        a.handle(Command::Confirm, &mut au);
        assert_eq!(a.join.as_ref().unwrap().error, Some(crate::sim::lobby::JOIN_CODE_ERROR));
        assert_eq!(au.played.last(), Some(&SoundEffect::Error));

        type_text(&mut a, &mut au, "123");
        a.handle(Command::Confirm, &mut au);
        a.update(1500, &mut au);
        assert_eq!(a.screen(), Screen::ThemeSelection);
    }

    #[test]
    fn recent_room_fills_code() {
        let mut a = app();
        let mut au = Recorder::default();
        to_home(&mut a, &mut au);
        feed(&mut a, &mut au, &[Command::Down, Command::Down, Command::Confirm, Command::Down]);
        assert_eq!(a.join.as_ref().unwrap().code, RECENT_ROOMS[0]);
        a.handle(Command::Down, &mut au);
        assert_eq!(a.join.as_ref().unwrap().code, RECENT_ROOMS[1]);
    }

    #[test]
    fn create_room_copy_and_start() {
        let mut a = app();
        let mut au = Recorder::default();
        to_home(&mut a, &mut au);
        feed(&mut a, &mut au, &[Command::Down, Command::Confirm]);
        assert_eq!(a.screen(), Screen::CreateRoom);
        assert_eq!(a.room.as_ref().unwrap().code.len(), 6);

        a.handle(Command::Confirm, &mut au);
        assert_eq!(a.room.as_ref().unwrap().flash.text(), Some("Copied!"));
        a.update(2000, &mut au);
        assert_eq!(a.room.as_ref().unwrap().flash.text(), None);

        feed(&mut a, &mut au, &[Command::Down, Command::Down, Command::Confirm]);
        assert_eq!(a.screen(), Screen::ThemeSelection);
        assert!(a.room.is_none());
    }

    #[test]
    fn custom_theme_back_returns_to_list_then_home() {
        let mut a = app();
        let mut au = Recorder::default();
        to_home(&mut a, &mut au);
        a.handle(Command::Confirm, &mut au);
        a.update(3000, &mut au);
        a.picker.cursor = THEME_ROW_CUSTOM;
        a.handle(Command::Confirm, &mut au);
        assert!(a.picker.is_typing());
        a.handle(Command::Back, &mut au);
        assert!(matches!(a.picker.mode, ThemeMode::Browse));
        assert_eq!(a.screen(), Screen::ThemeSelection);
        a.handle(Command::Back, &mut au);
        assert_eq!(a.screen(), Screen::Home);
    }

    #[test]
    fn profile_edit_sign_out_and_stats() {
        let mut a = app();
        let mut au = Recorder::default();
        to_home(&mut a, &mut au);
        a.menu_cursor = 4;
        a.handle(Command::Confirm, &mut au);
        assert_eq!(a.screen(), Screen::Profile);

        a.handle(Command::Confirm, &mut au); // Edit Username
        assert!(a.editing_name);
        for _ in 0..10 {
            a.handle(Command::Backspace, &mut au);
        }
        type_text(&mut a, &mut au, "Zed");
        a.handle(Command::Confirm, &mut au);
        assert_eq!(a.username, "Zed");

        a.menu_cursor = 5;
        a.handle(Command::Confirm, &mut au);
        assert_eq!(a.screen(), Screen::DetailedStats);
        a.handle(Command::Right, &mut au);
        assert_eq!(a.stats_filter, TimeFilter::AllTime.next());
        a.handle(Command::Back, &mut au);
        assert_eq!(a.screen(), Screen::Profile);

        a.menu_cursor = 7;
        a.handle(Command::Confirm, &mut au);
        assert_eq!(a.screen(), Screen::Login);
        assert_eq!(a.username, DEFAULT_USERNAME);
    }

    #[test]
    fn profile_sound_toggle_mutes_player() {
        let mut a = app();
        let mut au = Recorder::default();
        to_home(&mut a, &mut au);
        a.menu_cursor = 4;
        a.handle(Command::Confirm, &mut au);
        a.menu_cursor = 2;
        a.handle(Command::Confirm, &mut au);
        assert!(au.is_muted());
    }

    #[test]
    fn profile_preference_toggles() {
        let mut a = app();
        let mut au = Recorder::default();
        to_home(&mut a, &mut au);
        a.menu_cursor = 4;
        a.handle(Command::Confirm, &mut au);
        assert!(a.music_enabled && a.notifications);

        a.menu_cursor = 3;
        a.handle(Command::Confirm, &mut au);
        a.menu_cursor = 4;
        a.handle(Command::Confirm, &mut au);
        assert!(!a.music_enabled);
        assert!(!a.notifications);
        assert_eq!(a.screen(), Screen::Profile);

        a.menu_cursor = 6;
        a.handle(Command::Confirm, &mut au);
        assert!(a.invite.text().is_some());
    }

    #[test]
    fn sound_panel_controls() {
        let mut a = app();
        let mut au = Recorder::default();
        a.handle(Command::ToggleSoundPanel, &mut au);
        assert!(a.sound_panel.open);

        // Panel swallows input: confirm does not leave the splash
        a.handle(Command::Right, &mut au);
        assert!((au.volume() - 0.55).abs() < 1e-6);
        for _ in 0..20 {
            a.handle(Command::Right, &mut au);
        }
        assert_eq!(au.volume(), 1.0);
        assert_eq!(a.screen(), Screen::Splash);

        feed(&mut a, &mut au, &[Command::Down, Command::Down, Command::Confirm]);
        assert_eq!(au.played.last(), Some(&SoundEffect::ButtonClick));

        feed(&mut a, &mut au, &[Command::Up, Command::Confirm]);
        assert!(au.is_muted());

        a.handle(Command::Back, &mut au);
        assert!(!a.sound_panel.open);
    }

    #[test]
    fn leaderboard_filter_cycles() {
        let mut a = app();
        let mut au = Recorder::default();
        to_home(&mut a, &mut au);
        a.menu_cursor = 3;
        a.handle(Command::Confirm, &mut au);
        assert_eq!(a.screen(), Screen::Leaderboard);
        assert_eq!(a.leaderboard_filter, TimeFilter::AllTime);
        a.handle(Command::Left, &mut au);
        assert_eq!(a.leaderboard_filter, TimeFilter::Weekly);
        a.handle(Command::Back, &mut au);
        assert_eq!(a.screen(), Screen::Home);
    }

    #[test]
    fn round_messages_flash() {
        let mut a = app();
        let mut au = Recorder::default();
        to_gameplay(&mut a, &mut au);
        a.update(45_000, &mut au);
        assert!(a.message.text().is_some_and(|t| t.contains("Time's up")));
        let game = a.game.as_ref().unwrap();
        assert_eq!(game.current_round, 2);
        assert_eq!(game.round.phase, RoundPhase::AwaitingInput);
    }

    #[test]
    fn quit_from_home_menu() {
        let mut a = app();
        let mut au = Recorder::default();
        to_home(&mut a, &mut au);
        a.handle(Command::Up, &mut au);
        a.handle(Command::Confirm, &mut au);
        assert!(a.quit);
    }
}
