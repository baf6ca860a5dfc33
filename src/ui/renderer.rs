/// Presentation layer: double-buffered, diff-based terminal renderer.
///
/// How it works:
///   1. Build the next frame into `front` buffer (array of Cell)
///   2. Compare each cell with `back` buffer (previous frame)
///   3. Only emit terminal commands for cells that changed
///   4. All commands are batched with `queue!`, flushed once at the end
///   5. Swap front/back
///
/// Every screen is drawn into a centred column `PANEL_W` wide. Only
/// single-width characters are used, so one char is one terminal column.

use std::io::{self, BufWriter, Write};

use crossterm::{
    cursor::{self, MoveTo},
    event::{DisableBracketedPaste, EnableBracketedPaste},
    execute, queue,
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    terminal::{self, Clear, ClearType},
};

use crate::app::{
    App, SoundPanel, CREATE_ROOM_ITEMS, HOME_ITEMS, LOGIN_ITEMS, PROFILE_ITEMS, RESULTS_ITEMS,
};
use crate::domain::catalog::{
    TimeFilter, ACHIEVEMENTS, LEADERBOARD, OVERVIEW, PROFILE, RECENT_DAYS, RECENT_ROOMS,
    SYSTEM_THEMES, THEME_STATS, WORD_FACTS,
};
use crate::domain::catalog::ROOM_CODE_LEN;
use crate::domain::side::{MatchResult, Side};
use crate::sim::lobby::{self, ThemeMode, VoteDecision, THEME_ROW_CUSTOM, THEME_ROW_RANDOM};
use crate::sim::match_state::{Match, RoundPhase};
use crate::sim::router::Screen;
use crate::ui::sound::{SoundEffect, SoundPlayer};

const PANEL_W: usize = 64;
const SPINNER: [char; 4] = ['|', '/', '-', '\\'];

// ── Palette ──

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
struct Palette {
    bg: Color,
    fg: Color,
    dim: Color,
    accent: Color,
    good: Color,
    bad: Color,
    warn: Color,
    sel_fg: Color,
    sel_bg: Color,
}

impl Palette {
    const DARK: Palette = Palette {
        bg: Color::Rgb { r: 22, g: 22, b: 35 },
        fg: Color::White,
        dim: Color::DarkGrey,
        accent: Color::Rgb { r: 255, g: 200, b: 50 },
        good: Color::Rgb { r: 80, g: 255, b: 80 },
        bad: Color::Rgb { r: 255, g: 90, b: 90 },
        warn: Color::Rgb { r: 255, g: 160, b: 40 },
        sel_fg: Color::Black,
        sel_bg: Color::Rgb { r: 255, g: 200, b: 50 },
    };

    const LIGHT: Palette = Palette {
        bg: Color::Rgb { r: 235, g: 240, b: 255 },
        fg: Color::Rgb { r: 30, g: 30, b: 50 },
        dim: Color::Rgb { r: 120, g: 120, b: 140 },
        accent: Color::Rgb { r: 40, g: 90, b: 220 },
        good: Color::Rgb { r: 20, g: 140, b: 40 },
        bad: Color::Rgb { r: 200, g: 30, b: 30 },
        warn: Color::Rgb { r: 200, g: 110, b: 0 },
        sel_fg: Color::White,
        sel_bg: Color::Rgb { r: 40, g: 90, b: 220 },
    };

    fn for_mode(dark: bool) -> Palette {
        if dark { Palette::DARK } else { Palette::LIGHT }
    }
}

// ── Cell: the unit of the back-buffer ──

#[derive(Clone, Copy, PartialEq, Eq)]
struct Cell {
    ch: [u8; 4],
    ch_len: u8,
    fg: Color,
    bg: Color,
}

impl Cell {
    /// Sentinel cell used to invalidate the back buffer.
    /// Different from any real cell, so every position will be diff'd.
    const INVALID: Cell = Cell {
        ch: [b'?', 0, 0, 0],
        ch_len: 1,
        fg: Color::Magenta,
        bg: Color::Magenta,
    };

    fn blank(bg: Color) -> Self {
        Cell { ch: [b' ', 0, 0, 0], ch_len: 1, fg: Color::White, bg }
    }

    fn from_char(c: char, fg: Color, bg: Color) -> Self {
        let mut cell = Cell::blank(bg);
        cell.ch_len = c.encode_utf8(&mut cell.ch).len() as u8;
        cell.fg = fg;
        cell
    }

    fn as_str(&self) -> &str {
        std::str::from_utf8(&self.ch[..self.ch_len as usize]).unwrap_or(" ")
    }
}

// ── FrameBuffer: a 2D grid of Cells ──

struct FrameBuffer {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
    bg: Color,
}

impl FrameBuffer {
    fn new(w: usize, h: usize, bg: Color) -> Self {
        FrameBuffer { width: w, height: h, cells: vec![Cell::blank(bg); w * h], bg }
    }

    fn resize(&mut self, w: usize, h: usize) {
        if self.width != w || self.height != h {
            self.width = w;
            self.height = h;
            self.cells = vec![Cell::blank(self.bg); w * h];
        }
    }

    fn clear(&mut self, bg: Color) {
        self.bg = bg;
        self.cells.fill(Cell::blank(bg));
    }

    fn set(&mut self, x: usize, y: usize, cell: Cell) {
        if x < self.width && y < self.height {
            self.cells[y * self.width + x] = cell;
        }
    }

    fn get(&self, x: usize, y: usize) -> Cell {
        if x < self.width && y < self.height {
            self.cells[y * self.width + x]
        } else {
            Cell::blank(self.bg)
        }
    }

    /// Write a string at (x, y). Each char occupies 1 column.
    fn put_str(&mut self, x: usize, y: usize, s: &str, fg: Color, bg: Color) {
        for (i, ch) in s.chars().enumerate() {
            if x + i >= self.width { break; }
            self.set(x + i, y, Cell::from_char(ch, fg, bg));
        }
    }

    fn fill_row(&mut self, x: usize, y: usize, len: usize, fg: Color, bg: Color) {
        for i in 0..len {
            self.set(x + i, y, Cell::from_char(' ', fg, bg));
        }
    }
}

// ── Renderer ──

pub struct Renderer {
    writer: BufWriter<io::Stdout>,
    front: FrameBuffer,
    back: FrameBuffer,
    term_w: usize,
    term_h: usize,
    pal: Palette,
    /// Panel origin for the frame being composed.
    ox: usize,
    last_screen: Option<Screen>,
}

impl Renderer {
    pub fn new() -> Self {
        let pal = Palette::DARK;
        Renderer {
            writer: BufWriter::with_capacity(16384, io::stdout()),
            front: FrameBuffer::new(0, 0, pal.bg),
            back: FrameBuffer::new(0, 0, pal.bg),
            term_w: 0,
            term_h: 0,
            pal,
            ox: 0,
            last_screen: None,
        }
    }

    pub fn init(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(
            self.writer,
            terminal::EnterAlternateScreen,
            EnableBracketedPaste,
            cursor::Hide,
            SetBackgroundColor(self.pal.bg),
            Clear(ClearType::All)
        )?;

        let (tw, th) = terminal::size().unwrap_or((80, 24));
        self.term_w = tw as usize;
        self.term_h = th as usize;
        self.front.resize(self.term_w, self.term_h);
        self.back.resize(self.term_w, self.term_h);
        // Force full repaint on first frame.
        self.back.cells.fill(Cell::INVALID);
        Ok(())
    }

    pub fn cleanup(&mut self) -> io::Result<()> {
        execute!(
            self.writer,
            ResetColor,
            cursor::Show,
            DisableBracketedPaste,
            terminal::LeaveAlternateScreen
        )?;
        terminal::disable_raw_mode()
    }

    pub fn render(&mut self, app: &App, audio: &dyn SoundPlayer) -> io::Result<()> {
        let mut repaint = false;

        let (tw, th) = terminal::size().unwrap_or((80, 24));
        if tw as usize != self.term_w || th as usize != self.term_h {
            self.term_w = tw as usize;
            self.term_h = th as usize;
            self.front.resize(self.term_w, self.term_h);
            self.back.resize(self.term_w, self.term_h);
            repaint = true;
        }

        let pal = Palette::for_mode(app.dark_mode);
        if pal != self.pal {
            self.pal = pal;
            repaint = true;
        }
        if self.last_screen != Some(app.screen()) {
            self.last_screen = Some(app.screen());
            repaint = true;
        }
        if repaint {
            self.back.cells.fill(Cell::INVALID);
            queue!(self.writer, SetBackgroundColor(self.pal.bg), Clear(ClearType::All))?;
        }

        self.front.clear(self.pal.bg);
        self.ox = self.term_w.saturating_sub(PANEL_W) / 2;

        match app.screen() {
            Screen::Splash => self.compose_splash(app),
            Screen::Login => self.compose_login(app),
            Screen::Home => self.compose_home(app),
            Screen::QuickMatchLoading => self.compose_quick_match(app),
            Screen::CreateRoom => self.compose_create_room(app),
            Screen::JoinRoom => self.compose_join_room(app),
            Screen::ThemeSelection => self.compose_theme_selection(app),
            Screen::Gameplay => self.compose_gameplay(app),
            Screen::Results => self.compose_results(app),
            Screen::Profile => self.compose_profile(app),
            Screen::DetailedStats => self.compose_detailed_stats(app),
            Screen::Leaderboard => self.compose_leaderboard(app),
        }

        if app.sound_panel.open {
            self.compose_sound_panel(&app.sound_panel, audio);
        }

        self.flush_diff()?;
        std::mem::swap(&mut self.front, &mut self.back);
        Ok(())
    }

    // ── Diff flush: only write changed cells ──

    fn flush_diff(&mut self) -> io::Result<()> {
        let mut last_fg = self.pal.fg;
        let mut last_bg = self.pal.bg;
        let mut need_move = true;
        let mut last_x: usize = 0;
        let mut last_y: usize = 0;

        queue!(self.writer, SetForegroundColor(last_fg), SetBackgroundColor(last_bg))?;

        for y in 0..self.front.height {
            for x in 0..self.front.width {
                let cell = self.front.get(x, y);
                if cell == self.back.get(x, y) {
                    need_move = true;
                    continue;
                }

                if need_move || x != last_x + 1 || y != last_y {
                    queue!(self.writer, MoveTo(x as u16, y as u16))?;
                    need_move = false;
                }
                if cell.fg != last_fg {
                    queue!(self.writer, SetForegroundColor(cell.fg))?;
                    last_fg = cell.fg;
                }
                if cell.bg != last_bg {
                    queue!(self.writer, SetBackgroundColor(cell.bg))?;
                    last_bg = cell.bg;
                }
                queue!(self.writer, Print(cell.as_str()))?;
                last_x = x;
                last_y = y;
            }
        }

        self.writer.flush()
    }

    // ── Drawing helpers ──

    fn text(&mut self, col: usize, row: usize, s: &str, fg: Color) {
        let bg = self.pal.bg;
        self.front.put_str(self.ox + col, row, &fit(s, PANEL_W.saturating_sub(col)), fg, bg);
    }

    fn centered(&mut self, row: usize, s: &str, fg: Color) {
        let col = PANEL_W.saturating_sub(s.chars().count()) / 2;
        self.text(col, row, s, fg);
    }

    fn header(&mut self, title: &str) {
        let (accent, dim) = (self.pal.accent, self.pal.dim);
        self.centered(1, title, accent);
        self.text(0, 2, &"─".repeat(PANEL_W), dim);
    }

    fn footer(&mut self, help: &str) {
        let row = self.term_h.saturating_sub(1);
        let dim = self.pal.dim;
        self.text(0, row, help, dim);
    }

    /// Full-width status bar just above the footer.
    fn message_bar(&mut self, msg: &str, bg: Color) {
        let row = self.term_h.saturating_sub(3);
        let fg = self.pal.sel_fg;
        self.front.fill_row(self.ox, row, PANEL_W, fg, bg);
        self.front.put_str(self.ox + 1, row, &fit(msg, PANEL_W - 2), fg, bg);
    }

    fn menu(&mut self, col: usize, row: usize, items: &[&str], cursor: usize) {
        for (i, item) in items.iter().enumerate() {
            if i == cursor {
                let (fg, bg) = (self.pal.sel_fg, self.pal.sel_bg);
                let line = format!(" > {item:<24}");
                self.front.put_str(self.ox + col, row + i, &line, fg, bg);
            } else {
                let fg = self.pal.fg;
                self.text(col, row + i, &format!("   {item}"), fg);
            }
        }
    }

    fn input_field(&mut self, col: usize, row: usize, label: &str, value: &str, width: usize, blink: bool) {
        let (fg, accent) = (self.pal.fg, self.pal.accent);
        self.text(col, row, label, fg);
        let caret = if blink { "_" } else { " " };
        let shown = format!("[ {:<w$} ]", format!("{value}{caret}"), w = width + 1);
        self.text(col + label.chars().count() + 1, row, &shown, accent);
    }

    fn filter_tabs(&mut self, row: usize, active: TimeFilter) {
        let mut col = 0;
        for f in [TimeFilter::Daily, TimeFilter::Weekly, TimeFilter::AllTime] {
            let label = format!(" {} ", f.label());
            if f == active {
                let (fg, bg) = (self.pal.sel_fg, self.pal.sel_bg);
                self.front.put_str(self.ox + col, row, &label, fg, bg);
            } else {
                let dim = self.pal.dim;
                self.text(col, row, &label, dim);
            }
            col += label.chars().count() + 1;
        }
    }

    // ── Compose: one function per screen ──

    fn compose_splash(&mut self, app: &App) {
        let title = [
            r" __      __             _ _                 ",
            r" \ \    / /__ _ _ __ __| | |   ___ __ _ ___ ",
            r"  \ \/\/ / _ \ '_/ _` | | |__/ -_) _` / _ \",
            r"   \_/\_/\___/_| \__,_|_|____\___\__, \___/",
            r"                                 |___/     ",
        ];
        let top = self.term_h.saturating_sub(14) / 2;
        let (accent, fg, good) = (self.pal.accent, self.pal.fg, self.pal.good);
        for (i, line) in title.iter().enumerate() {
            self.centered(top + i, line, accent);
        }
        self.centered(top + 6, "Build the longest word chain!", fg);
        self.centered(top + 8, "[A N I M A L] -> [L I O N] -> [N E W T]", good);
        if (app.elapsed_ms / 500) % 2 == 0 {
            self.centered(top + 11, "Press ENTER to start", fg);
        }
        self.footer("ENTER start   F2 sound test   Ctrl+C quit");
    }

    fn compose_login(&mut self, app: &App) {
        self.header("Welcome to WordLego");
        let fg = self.pal.fg;
        self.text(4, 4, "Sign in to track your stats, or jump in as a guest.", fg);
        let blink = app.menu_cursor == 0 && (app.elapsed_ms / 500) % 2 == 0;
        self.input_field(4, 6, "Username", &app.name_input, crate::app::MAX_NAME_LEN, blink);
        self.menu(4, 9, &LOGIN_ITEMS, app.menu_cursor);
        self.footer("type name   up/down choose   ENTER confirm   F2 sound");
    }

    fn compose_home(&mut self, app: &App) {
        self.header(Screen::Splash.title());
        let (fg, dim) = (self.pal.fg, self.pal.dim);
        self.text(4, 4, &format!("Welcome back, {}!", app.username), fg);
        self.text(4, 5, &format!("Rank #{}  -  {} points", PROFILE.rank, PROFILE.points), dim);

        let mut items = HOME_ITEMS;
        let dark_label = if app.dark_mode { "Light Mode" } else { "Dark Mode" };
        items[5] = dark_label;
        self.menu(4, 7, &items, app.menu_cursor);

        self.text(4, 16, "How to play: each word must start with the last", dim);
        self.text(4, 17, "letter of the previous one. Don't run out of time!", dim);
        self.footer("up/down choose   ENTER select   F2 sound   Ctrl+C quit");
    }

    fn compose_quick_match(&mut self, app: &App) {
        self.header(Screen::QuickMatchLoading.title());
        let Some(q) = &app.quick else { return };
        let t = q.elapsed_ms();
        let spin = SPINNER[((t / 150) as usize) % SPINNER.len()];
        let (accent, fg, dim) = (self.pal.accent, self.pal.fg, self.pal.dim);
        self.centered(6, &format!("( {spin} )"), accent);
        self.centered(8, &format!("{}{:<3}", q.search_text(), lobby::dots(t)), fg);
        self.centered(10, &format!("{} players online", 120 + (t / 700) % 50), dim);
        self.footer("ESC cancel");
    }

    fn compose_create_room(&mut self, app: &App) {
        self.header(Screen::CreateRoom.title());
        let Some(room) = &app.room else { return };
        let (fg, accent, dim, good) = (self.pal.fg, self.pal.accent, self.pal.dim, self.pal.good);
        self.centered(4, "Share this code with a friend", fg);
        let spaced: String = room.code.chars().flat_map(|c| [c, ' ']).collect();
        self.centered(6, &format!("[ {} ]", spaced.trim_end()), accent);
        self.centered(8, &format!("Waiting for opponent{:<3}", lobby::dots(room.elapsed_ms())), dim);
        if let Some(flash) = room.flash.text() {
            self.centered(9, flash, good);
        }
        self.menu(4, 11, &CREATE_ROOM_ITEMS, app.menu_cursor);
        self.footer("up/down choose   ENTER select   ESC back");
    }

    fn compose_join_room(&mut self, app: &App) {
        self.header(Screen::JoinRoom.title());
        let Some(join) = &app.join else { return };
        let (fg, accent, dim, bad) = (self.pal.fg, self.pal.accent, self.pal.dim, self.pal.bad);
        self.centered(4, "Enter the 6-character room code", fg);

        let slots: Vec<String> = (0..ROOM_CODE_LEN)
            .map(|i| join.code.chars().nth(i).map(String::from).unwrap_or_else(|| "_".into()))
            .collect();
        self.centered(6, &slots.join(" "), accent);

        if join.is_searching() {
            self.centered(8, &format!("Searching for room{:<3}", lobby::dots(app.elapsed_ms)), fg);
        } else if let Some(err) = join.error {
            self.centered(8, err, bad);
        }

        self.text(4, 11, "Recent rooms", dim);
        for (i, code) in RECENT_ROOMS.iter().enumerate() {
            let color = if join.code == *code { accent } else { fg };
            self.text(6, 12 + i, code, color);
        }
        self.footer("type code   up/down recent rooms   ENTER join   ESC back");
    }

    fn compose_theme_selection(&mut self, app: &App) {
        self.header(Screen::ThemeSelection.title());
        let picker = &app.picker;
        let (fg, accent, dim, good, bad) =
            (self.pal.fg, self.pal.accent, self.pal.dim, self.pal.good, self.pal.bad);

        match &picker.mode {
            ThemeMode::Browse => {
                for (i, theme) in SYSTEM_THEMES.iter().enumerate() {
                    let line = format!("[{}] {:<14} {}", theme.tag, theme.name, theme.description);
                    self.theme_row(4 + i, i == picker.cursor, &line);
                }
                let base = 4 + SYSTEM_THEMES.len() + 1;
                self.theme_row(base, picker.cursor == THEME_ROW_RANDOM, "[?]  Random Theme");
                self.theme_row(base + 1, picker.cursor == THEME_ROW_CUSTOM, "[+]  Custom Theme");
                self.footer("up/down choose   ENTER select   ESC back");
            }
            ThemeMode::CustomEntry { text } => {
                self.text(4, 5, "Propose your own theme. Your opponent has to agree.", fg);
                let blink = (app.elapsed_ms / 500) % 2 == 0;
                self.input_field(4, 7, "Theme", text, lobby::CUSTOM_THEME_MAX_LEN, blink);
                self.text(4, 9, "e.g. Space, Pirates, Desserts", dim);
                self.footer("type theme   ENTER propose   ESC back to list");
            }
            ThemeMode::Vote(vote) => {
                self.centered(5, &format!("Custom theme: \"{}\"", vote.theme), accent);
                match vote.decision {
                    VoteDecision::Pending => {
                        self.centered(7, &format!("Waiting for opponent to vote{:<3}", lobby::dots(app.elapsed_ms)), fg);
                        let bar = progress_bar(vote.fraction_left(), 30);
                        self.centered(9, &format!("{bar} {}s", vote.countdown), dim);
                        self.footer("ESC back to list");
                    }
                    VoteDecision::Accepted => {
                        self.centered(7, "Opponent accepted your theme!", good);
                        self.centered(9, "Press ENTER to start the game", fg);
                        self.footer("ENTER start   ESC back to list");
                    }
                    VoteDecision::Declined => {
                        self.centered(7, "Opponent declined your theme.", bad);
                        self.centered(9, "Press ENTER to play a random theme", fg);
                        self.footer("ENTER random theme   ESC back to list");
                    }
                }
            }
        }
    }

    fn theme_row(&mut self, row: usize, selected: bool, line: &str) {
        if selected {
            let (fg, bg) = (self.pal.sel_fg, self.pal.sel_bg);
            self.front.fill_row(self.ox + 2, row, PANEL_W - 4, fg, bg);
            self.front.put_str(self.ox + 3, row, &fit(line, PANEL_W - 6), fg, bg);
        } else {
            let fg = self.pal.fg;
            self.text(3, row, line, fg);
        }
    }

    fn compose_gameplay(&mut self, app: &App) {
        let Some(game) = &app.game else { return };
        let (fg, accent, dim, good, bad, warn) =
            (self.pal.fg, self.pal.accent, self.pal.dim, self.pal.good, self.pal.bad, self.pal.warn);
        let opponent = game.opponent.name.as_str();

        self.header(&format!("Theme: {}", game.theme));
        self.text(2, 3, &format!("Round {}/{}", game.display_round(), game.rules.rounds_total), fg);
        let score = format!(
            "{} {}  :  {} {}",
            app.username, game.score.of(Side::Player), game.score.of(Side::Opponent), opponent,
        );
        self.text(PANEL_W.saturating_sub(score.chars().count() + 2), 3, &score, accent);

        // Timer
        let secs = game.round.timer_seconds_remaining;
        let frac = secs as f32 / game.rules.round_seconds.max(1) as f32;
        let timer_color = if secs <= 5 { bad } else if secs <= 10 { warn } else { good };
        self.text(2, 5, &format!("{} {:>2}s", progress_bar(frac, 40), secs), timer_color);

        // Turn
        let turn = match game.round.turn {
            Side::Player => "Your turn!".to_string(),
            Side::Opponent => format!("{opponent}'s turn"),
        };
        self.text(2, 6, &turn, if game.is_player_turn() { good } else { dim });

        // Chain
        self.text(2, 8, "Word chain", dim);
        let lines = chain_lines(&game.round.chain, PANEL_W - 4);
        let visible = lines.len().saturating_sub(6);
        for (i, line) in lines[visible..].iter().enumerate() {
            self.text(2, 9 + i, line, accent);
        }

        // Status / input
        let row = 16;
        self.compose_turn_status(app, game, row);

        if let Some(msg) = app.message.text() {
            let bg = if game.is_over() && game.result == Some(MatchResult::Win) { good } else { accent };
            self.message_bar(msg, bg);
        }
        self.footer("type word   ENTER submit   ESC leave match   F2 sound");
    }

    fn compose_turn_status(&mut self, app: &App, game: &Match, row: usize) {
        let (fg, dim, bad) = (self.pal.fg, self.pal.dim, self.pal.bad);
        if game.is_over() {
            return;
        }
        match &game.round.phase {
            RoundPhase::Validating { word } => {
                self.text(2, row, &format!("Checking {word}{}", lobby::dots(app.elapsed_ms)), fg);
            }
            RoundPhase::Rejected { reason } => {
                self.text(2, row, reason, bad);
            }
            RoundPhase::AwaitingInput if game.is_player_turn() => {
                if let Some(letter) = game.round.required_letter() {
                    self.text(2, row, &format!("Next word starts with '{letter}'"), dim);
                }
                let blink = (app.elapsed_ms / 500) % 2 == 0;
                self.input_field(2, row + 1, "Your word", &app.word_input, crate::app::MAX_WORD_LEN, blink);
            }
            RoundPhase::AwaitingInput => {
                self.text(2, row, &format!("{} is thinking{}", game.opponent.name, lobby::dots(app.elapsed_ms)), dim);
            }
            RoundPhase::Concluded => {}
        }
    }

    fn compose_results(&mut self, app: &App) {
        self.header(Screen::Results.title());
        let (fg, accent, dim, good, bad) =
            (self.pal.fg, self.pal.accent, self.pal.dim, self.pal.good, self.pal.bad);
        match app.last_result {
            Some(MatchResult::Win) => self.centered(4, "*** VICTORY! ***", good),
            _ => self.centered(4, "DEFEAT", bad),
        }

        let mut row = 6;
        if let Some(game) = &app.game {
            let score = format!("{} {}  :  {} {}", app.username, game.score.player, game.score.opponent, game.opponent.name);
            self.centered(row, &score, accent);
            row += 2;
            for rec in &game.history {
                let who = match rec.winner {
                    Side::Player => app.username.as_str(),
                    Side::Opponent => game.opponent.name.as_str(),
                };
                let line = format!("Round {}  {:<12} {}", rec.number, who, rec.chain.join(" > "));
                self.text(4, row, &line, if rec.winner == Side::Player { good } else { dim });
                row += 1;
            }
            let words: usize = game.history.iter().map(|r| r.chain.len().saturating_sub(1)).sum();
            row += 1;
            self.text(4, row, &format!("Words played: {words}"), fg);
            row += 2;
        }
        self.menu(4, row, &RESULTS_ITEMS, app.menu_cursor);
        self.footer("up/down choose   ENTER select   ESC home");
    }

    fn compose_profile(&mut self, app: &App) {
        self.header(Screen::Profile.title());
        let (fg, accent, dim, good) = (self.pal.fg, self.pal.accent, self.pal.dim, self.pal.good);
        if app.editing_name {
            let blink = (app.elapsed_ms / 500) % 2 == 0;
            self.input_field(4, 4, "Username", &app.name_input, crate::app::MAX_NAME_LEN, blink);
        } else {
            self.text(4, 4, &app.username, accent);
        }
        self.text(4, 5, &format!("Rank #{}  -  {} points", PROFILE.rank, PROFILE.points), dim);

        let stats = [
            ("Games", PROFILE.games_played.to_string()),
            ("Wins", PROFILE.games_won.to_string()),
            ("Win rate", format!("{}%", PROFILE.win_rate)),
            ("Words", PROFILE.total_words.to_string()),
            ("Best streak", PROFILE.best_streak.to_string()),
        ];
        for (i, (label, value)) in stats.iter().enumerate() {
            self.text(4 + (i % 3) * 20, 7 + i / 3, &format!("{label}: {value}"), fg);
        }

        self.text(4, 9, "Achievements", dim);
        for (i, (name, desc)) in ACHIEVEMENTS.iter().enumerate() {
            self.text(6, 10 + i, &format!("{name} - {desc}"), fg);
        }

        let mut items = PROFILE_ITEMS;
        items[1] = if app.dark_mode { "Light Mode" } else { "Dark Mode" };
        items[3] = if app.music_enabled { "Music: On" } else { "Music: Off" };
        items[4] = if app.notifications { "Notifications: On" } else { "Notifications: Off" };
        self.menu(4, 13, &items, app.menu_cursor);

        if let Some(msg) = app.invite.text() {
            self.message_bar(msg, good);
        }
        let help = if app.editing_name { "type name   ENTER save   ESC cancel" } else { "up/down choose   ENTER select   ESC back" };
        self.footer(help);
    }

    fn compose_detailed_stats(&mut self, app: &App) {
        self.header(Screen::DetailedStats.title());
        let (fg, accent, dim) = (self.pal.fg, self.pal.accent, self.pal.dim);
        self.filter_tabs(3, app.stats_filter);

        for (i, (label, value)) in OVERVIEW.iter().enumerate() {
            self.text(2 + (i % 3) * 21, 5 + i / 3, &format!("{label}: {value}"), fg);
        }

        self.text(2, 9, "By theme", dim);
        for (i, t) in THEME_STATS.iter().enumerate() {
            let line = format!("{:<14} {:>3} played {:>3} won  {}", t.theme, t.played, t.won, progress_bar(t.win_rate as f32 / 100.0, 10));
            self.text(4, 10 + i, &line, fg);
        }

        self.text(2, 17, "Recent activity", dim);
        for (i, (day, games, wins)) in RECENT_DAYS.iter().enumerate() {
            self.text(4, 18 + i, &format!("{day:<11} {games} games, {wins} wins"), fg);
        }

        for (i, (label, value)) in WORD_FACTS.iter().enumerate() {
            self.text(36, 18 + i, &format!("{label}: {value}"), accent);
        }
        self.footer("left/right time window   ESC back");
    }

    fn compose_leaderboard(&mut self, app: &App) {
        self.header(Screen::Leaderboard.title());
        let (fg, dim) = (self.pal.fg, self.pal.dim);
        self.filter_tabs(3, app.leaderboard_filter);
        self.text(2, 5, &format!("{:>4}  {:<18} {:>7} {:>6} {:>6}", "#", "Player", "Points", "Wins", "Rate"), dim);
        for (i, e) in LEADERBOARD.iter().enumerate() {
            let me = e.name == app.username;
            let line = format!(
                "{:>4}  {:<18} {:>7} {:>6} {:>5}%{}",
                e.rank, e.name, e.points, e.wins, e.win_rate, if me { "  < You" } else { "" },
            );
            if me {
                let (sfg, sbg) = (self.pal.sel_fg, self.pal.sel_bg);
                self.front.fill_row(self.ox + 1, 6 + i, PANEL_W - 2, sfg, sbg);
                self.front.put_str(self.ox + 2, 6 + i, &line, sfg, sbg);
            } else {
                self.text(2, 6 + i, &line, fg);
            }
        }
        self.footer("left/right time window   ESC back");
    }

    /// Boxed overlay on top of whatever screen is showing.
    fn compose_sound_panel(&mut self, panel: &SoundPanel, audio: &dyn SoundPlayer) {
        let w = 36;
        let h = SoundPanel::ROWS + 4;
        let x0 = self.ox + (PANEL_W - w) / 2;
        let y0 = 3;
        let (fg, bg, accent) = (self.pal.fg, self.pal.bg, self.pal.accent);
        let (sfg, sbg) = (self.pal.sel_fg, self.pal.sel_bg);

        for y in 0..h {
            self.front.fill_row(x0, y0 + y, w, fg, bg);
            let (l, r) = if y == 0 { ('┌', '┐') } else if y == h - 1 { ('└', '┘') } else { ('│', '│') };
            self.front.set(x0, y0 + y, Cell::from_char(l, accent, bg));
            self.front.set(x0 + w - 1, y0 + y, Cell::from_char(r, accent, bg));
            if y == 0 || y == h - 1 {
                for x in 1..w - 1 {
                    self.front.set(x0 + x, y0 + y, Cell::from_char('─', accent, bg));
                }
            }
        }
        self.front.put_str(x0 + 2, y0, " Sound Test ", accent, bg);

        for row in 0..SoundPanel::ROWS {
            let label = match row {
                SoundPanel::ROW_VOLUME => format!("Volume  < {:>3}% >", (audio.volume() * 100.0).round() as u32),
                SoundPanel::ROW_MUTE => format!("Muted   {}", if audio.is_muted() { "yes" } else { "no" }),
                _ => panel.effect_at(row).map(|e: SoundEffect| format!("Play {}", e.id())).unwrap_or_default(),
            };
            let y = y0 + 2 + row;
            if row == panel.cursor {
                self.front.fill_row(x0 + 1, y, w - 2, sfg, sbg);
                self.front.put_str(x0 + 2, y, &label, sfg, sbg);
            } else {
                self.front.put_str(x0 + 2, y, &label, fg, bg);
            }
        }
        self.front.put_str(x0 + 2, y0 + h - 1, " ESC close ", accent, bg);
    }
}

// ── Text helpers ──

/// Truncate to `width` chars.
fn fit(s: &str, width: usize) -> String {
    s.chars().take(width).collect()
}

/// `[#####-----]` with `width` inner cells.
fn progress_bar(fraction: f32, width: usize) -> String {
    let filled = ((fraction.clamp(0.0, 1.0) * width as f32).round() as usize).min(width);
    format!("[{}{}]", "#".repeat(filled), "-".repeat(width - filled))
}

/// Lay the chain out as `[WORD] > [WORD] > ...`, wrapping at `width`.
fn chain_lines(chain: &[String], width: usize) -> Vec<String> {
    let mut lines = vec![];
    let mut line = String::new();
    for (i, word) in chain.iter().enumerate() {
        let block = if i == 0 { format!("[{word}]") } else { format!(" > [{word}]") };
        if !line.is_empty() && line.chars().count() + block.chars().count() > width {
            lines.push(std::mem::take(&mut line));
            line.push_str(&format!("> [{word}]"));
        } else {
            line.push_str(&block);
        }
    }
    if !line.is_empty() {
        lines.push(line);
    }
    lines
}
