/// External configuration loader.
///
/// Reads `config.toml` from the executable's directory (or CWD), unless an
/// explicit path is given on the command line.
/// Falls back to sensible defaults if the file is missing or incomplete.

use serde::Deserialize;
use std::path::{Path, PathBuf};

// ── Public Config Struct ──

#[derive(Clone, Debug, Default)]
pub struct GameConfig {
    pub rules: MatchConfig,
    pub lobby: LobbyConfig,
    pub audio: AudioConfig,
    pub gamepad: GamepadConfig,
    pub general: GeneralConfig,
}

/// Match engine timings and opponent behaviour.
#[derive(Clone, Debug)]
pub struct MatchConfig {
    pub rounds_total: u32,
    pub round_seconds: u32,
    pub seed_word: String,
    pub validate_delay_ms: u64,   // "checking" pause before a valid word lands
    pub reject_delay_ms: u64,     // how long a rejection stays on screen
    pub results_delay_ms: u64,    // pause between last round and results screen
    pub opponent_name: String,
    pub opponent_think_min_ms: u64,
    pub opponent_think_max_ms: u64,
    pub opponent_follows_chain: bool,
    pub opponent_words: Vec<String>,
}

/// Fake matchmaking delays.
#[derive(Clone, Debug)]
pub struct LobbyConfig {
    pub quick_match_ms: u64,
    pub join_search_ms: u64,
    pub theme_vote_ms: u64,
    pub theme_vote_seconds: u32,
    pub flash_ms: u64,
}

#[derive(Clone, Debug)]
pub struct AudioConfig {
    pub volume: f32,
    pub muted: bool,
}

#[derive(Clone, Debug)]
pub struct GamepadConfig {
    pub confirm: Vec<String>,
    pub cancel: Vec<String>,
    pub sound_panel: Vec<String>,
}

#[derive(Clone, Debug)]
pub struct GeneralConfig {
    pub frame_ms: u64,
    pub player_name: String,
    pub dark_mode: bool,
    pub rng_seed: Option<u64>,
}

// ── TOML Schema (with serde defaults) ──

#[derive(Deserialize, Debug, Default)]
struct TomlConfig {
    #[serde(default, rename = "match")]
    rules: TomlMatch,
    #[serde(default)]
    lobby: TomlLobby,
    #[serde(default)]
    audio: TomlAudio,
    #[serde(default)]
    gamepad: TomlGamepad,
    #[serde(default)]
    general: TomlGeneral,
}

#[derive(Deserialize, Debug)]
struct TomlMatch {
    #[serde(default = "default_rounds")]
    rounds_total: u32,
    #[serde(default = "default_round_seconds")]
    round_seconds: u32,
    #[serde(default = "default_seed_word")]
    seed_word: String,
    #[serde(default = "default_validate_delay")]
    validate_delay_ms: u64,
    #[serde(default = "default_reject_delay")]
    reject_delay_ms: u64,
    #[serde(default = "default_results_delay")]
    results_delay_ms: u64,
    #[serde(default = "default_opponent_name")]
    opponent_name: String,
    #[serde(default = "default_think_min")]
    opponent_think_min_ms: u64,
    #[serde(default = "default_think_max")]
    opponent_think_max_ms: u64,
    #[serde(default)]
    opponent_follows_chain: bool,
    #[serde(default = "default_opponent_words")]
    opponent_words: Vec<String>,
}

#[derive(Deserialize, Debug)]
struct TomlLobby {
    #[serde(default = "default_quick_match")]
    quick_match_ms: u64,
    #[serde(default = "default_join_search")]
    join_search_ms: u64,
    #[serde(default = "default_theme_vote")]
    theme_vote_ms: u64,
    #[serde(default = "default_vote_seconds")]
    theme_vote_seconds: u32,
    #[serde(default = "default_flash")]
    flash_ms: u64,
}

#[derive(Deserialize, Debug)]
struct TomlAudio {
    #[serde(default = "default_volume")]
    volume: f32,
    #[serde(default)]
    muted: bool,
}

#[derive(Deserialize, Debug)]
struct TomlGamepad {
    #[serde(default = "default_confirm")]
    confirm: Vec<String>,
    #[serde(default = "default_cancel")]
    cancel: Vec<String>,
    #[serde(default = "default_sound_panel")]
    sound_panel: Vec<String>,
}

#[derive(Deserialize, Debug)]
struct TomlGeneral {
    #[serde(default = "default_frame")]
    frame_ms: u64,
    #[serde(default = "default_player_name")]
    player_name: String,
    #[serde(default)]
    dark_mode: bool,
    #[serde(default)]
    rng_seed: Option<u64>,
}

// ── Defaults ──

fn default_rounds() -> u32 { 5 }
fn default_round_seconds() -> u32 { 45 }
fn default_seed_word() -> String { "ANIMAL".into() }
fn default_validate_delay() -> u64 { 1000 }
fn default_reject_delay() -> u64 { 2000 }
fn default_results_delay() -> u64 { 2000 }
fn default_opponent_name() -> String { "Alex".into() }
fn default_think_min() -> u64 { 2000 }
fn default_think_max() -> u64 { 5000 }
fn default_opponent_words() -> Vec<String> {
    crate::domain::opponent::DEFAULT_WORDS.iter().map(|w| w.to_string()).collect()
}

fn default_quick_match() -> u64 { 3000 }
fn default_join_search() -> u64 { 1500 }
fn default_theme_vote() -> u64 { 3000 }
fn default_vote_seconds() -> u32 { 15 }
fn default_flash() -> u64 { 2000 }

fn default_volume() -> f32 { 0.5 }

fn default_confirm() -> Vec<String> { vec!["A".into(), "Start".into()] }
fn default_cancel() -> Vec<String> { vec!["B".into(), "Select".into()] }
fn default_sound_panel() -> Vec<String> { vec!["Y".into()] }

fn default_frame() -> u64 { 30 }
fn default_player_name() -> String { "Player".into() }

impl Default for TomlMatch {
    fn default() -> Self {
        TomlMatch {
            rounds_total: default_rounds(),
            round_seconds: default_round_seconds(),
            seed_word: default_seed_word(),
            validate_delay_ms: default_validate_delay(),
            reject_delay_ms: default_reject_delay(),
            results_delay_ms: default_results_delay(),
            opponent_name: default_opponent_name(),
            opponent_think_min_ms: default_think_min(),
            opponent_think_max_ms: default_think_max(),
            opponent_follows_chain: false,
            opponent_words: default_opponent_words(),
        }
    }
}

impl Default for TomlLobby {
    fn default() -> Self {
        TomlLobby {
            quick_match_ms: default_quick_match(),
            join_search_ms: default_join_search(),
            theme_vote_ms: default_theme_vote(),
            theme_vote_seconds: default_vote_seconds(),
            flash_ms: default_flash(),
        }
    }
}

impl Default for TomlAudio {
    fn default() -> Self {
        TomlAudio { volume: default_volume(), muted: false }
    }
}

impl Default for TomlGamepad {
    fn default() -> Self {
        TomlGamepad {
            confirm: default_confirm(),
            cancel: default_cancel(),
            sound_panel: default_sound_panel(),
        }
    }
}

impl Default for TomlGeneral {
    fn default() -> Self {
        TomlGeneral {
            frame_ms: default_frame(),
            player_name: default_player_name(),
            dark_mode: false,
            rng_seed: None,
        }
    }
}

// ── Public defaults (same values as an empty config.toml) ──

impl Default for MatchConfig {
    fn default() -> Self { TomlMatch::default().into() }
}

impl Default for LobbyConfig {
    fn default() -> Self { TomlLobby::default().into() }
}

impl Default for AudioConfig {
    fn default() -> Self { TomlAudio::default().into() }
}

impl Default for GamepadConfig {
    fn default() -> Self { TomlGamepad::default().into() }
}

impl Default for GeneralConfig {
    fn default() -> Self { TomlGeneral::default().into() }
}

// ── Schema → public conversion (with clamping) ──

impl From<TomlMatch> for MatchConfig {
    fn from(t: TomlMatch) -> Self {
        let seed_word = crate::domain::rules::normalize(&t.seed_word)
            .unwrap_or_else(default_seed_word);
        MatchConfig {
            rounds_total: t.rounds_total.max(1),
            round_seconds: t.round_seconds.max(1),
            seed_word,
            validate_delay_ms: t.validate_delay_ms,
            reject_delay_ms: t.reject_delay_ms,
            results_delay_ms: t.results_delay_ms,
            opponent_name: t.opponent_name,
            opponent_think_min_ms: t.opponent_think_min_ms,
            opponent_think_max_ms: t.opponent_think_max_ms,
            opponent_follows_chain: t.opponent_follows_chain,
            opponent_words: t.opponent_words,
        }
    }
}

impl From<TomlLobby> for LobbyConfig {
    fn from(t: TomlLobby) -> Self {
        LobbyConfig {
            quick_match_ms: t.quick_match_ms,
            join_search_ms: t.join_search_ms,
            theme_vote_ms: t.theme_vote_ms,
            theme_vote_seconds: t.theme_vote_seconds,
            flash_ms: t.flash_ms,
        }
    }
}

impl From<TomlAudio> for AudioConfig {
    fn from(t: TomlAudio) -> Self {
        AudioConfig {
            volume: if t.volume.is_finite() { t.volume.clamp(0.0, 1.0) } else { default_volume() },
            muted: t.muted,
        }
    }
}

impl From<TomlGamepad> for GamepadConfig {
    fn from(t: TomlGamepad) -> Self {
        GamepadConfig {
            confirm: t.confirm,
            cancel: t.cancel,
            sound_panel: t.sound_panel,
        }
    }
}

impl From<TomlGeneral> for GeneralConfig {
    fn from(t: TomlGeneral) -> Self {
        let name = t.player_name.trim();
        GeneralConfig {
            frame_ms: t.frame_ms.clamp(5, 250),
            player_name: if name.is_empty() { default_player_name() } else { name.to_string() },
            dark_mode: t.dark_mode,
            rng_seed: t.rng_seed,
        }
    }
}

impl From<TomlConfig> for GameConfig {
    fn from(t: TomlConfig) -> Self {
        GameConfig {
            rules: t.rules.into(),
            lobby: t.lobby.into(),
            audio: t.audio.into(),
            gamepad: t.gamepad.into(),
            general: t.general.into(),
        }
    }
}

// ── Loading ──

impl GameConfig {
    /// Load config from `config.toml`.
    /// An explicit path wins; otherwise search (1) exe directory,
    /// (2) current working directory, (3) ~/.local/share/wordlego.
    /// Missing file or missing keys gracefully fall back to defaults.
    pub fn load(explicit: Option<&Path>) -> Self {
        match explicit {
            Some(path) => read_config(path).unwrap_or_default(),
            None => search_config(&candidate_dirs()),
        }
    }

    /// Parse config text directly (used by tests and `load`).
    pub fn from_toml_str(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str::<TomlConfig>(text).map(GameConfig::from)
    }
}

/// Candidate directories to search: exe dir + CWD + data dir (deduplicated).
fn candidate_dirs() -> Vec<PathBuf> {
    let mut dirs = vec![];

    // 1. Directory of the running executable
    if let Ok(exe) = std::env::current_exe() {
        let resolved = exe.canonicalize().unwrap_or(exe);
        if let Some(parent) = resolved.parent() {
            dirs.push(parent.to_path_buf());
        }
    }

    // 2. Current working directory
    if let Ok(cwd) = std::env::current_dir() {
        if !dirs.iter().any(|d| d == &cwd) {
            dirs.push(cwd);
        }
    }

    // 3. XDG data home (~/.local/share/wordlego)
    if let Ok(home) = std::env::var("HOME") {
        let xdg = PathBuf::from(&home).join(".local/share/wordlego");
        if xdg.is_dir() && !dirs.iter().any(|d| d == &xdg) {
            dirs.push(xdg);
        }
    }

    if dirs.is_empty() {
        dirs.push(PathBuf::from("."));
    }

    dirs
}

/// Search for config.toml in candidate directories.
fn search_config(search_dirs: &[PathBuf]) -> GameConfig {
    for dir in search_dirs {
        let path = dir.join("config.toml");
        if path.exists() {
            return read_config(&path).unwrap_or_default();
        }
    }
    log::info!("no config.toml found, using defaults");
    GameConfig::default()
}

fn read_config(path: &Path) -> Option<GameConfig> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| log::warn!("could not read {}: {e}", path.display()))
        .ok()?;
    match GameConfig::from_toml_str(&text) {
        Ok(cfg) => {
            log::info!("loaded config from {}", path.display());
            Some(cfg)
        }
        Err(e) => {
            log::warn!("config parse error in {}: {e}; using defaults", path.display());
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_gives_defaults() {
        let cfg = GameConfig::from_toml_str("").unwrap();
        assert_eq!(cfg.rules.rounds_total, 5);
        assert_eq!(cfg.rules.round_seconds, 45);
        assert_eq!(cfg.rules.seed_word, "ANIMAL");
        assert_eq!(cfg.rules.validate_delay_ms, 1000);
        assert_eq!(cfg.rules.reject_delay_ms, 2000);
        assert_eq!(cfg.rules.opponent_think_min_ms, 2000);
        assert_eq!(cfg.rules.opponent_think_max_ms, 5000);
        assert!(!cfg.rules.opponent_follows_chain);
        assert_eq!(cfg.lobby.quick_match_ms, 3000);
        assert!((cfg.audio.volume - 0.5).abs() < f32::EPSILON);
        assert_eq!(cfg.general.player_name, "Player");
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let cfg = GameConfig::from_toml_str(
            "[match]\nround_seconds = 30\nseed_word = \"  zebra \"\n\n[audio]\nmuted = true\n",
        ).unwrap();
        assert_eq!(cfg.rules.round_seconds, 30);
        assert_eq!(cfg.rules.seed_word, "ZEBRA");
        assert_eq!(cfg.rules.rounds_total, 5);
        assert!(cfg.audio.muted);
        assert!((cfg.audio.volume - 0.5).abs() < f32::EPSILON);
    }

    #[test]
    fn out_of_range_values_are_clamped() {
        let cfg = GameConfig::from_toml_str(
            "[match]\nrounds_total = 0\nround_seconds = 0\nseed_word = \"\"\n[audio]\nvolume = 3.5\n[general]\nplayer_name = \"   \"\n",
        ).unwrap();
        assert_eq!(cfg.rules.rounds_total, 1);
        assert_eq!(cfg.rules.round_seconds, 1);
        assert_eq!(cfg.rules.seed_word, "ANIMAL");
        assert!((cfg.audio.volume - 1.0).abs() < f32::EPSILON);
        assert_eq!(cfg.general.player_name, "Player");
    }

    #[test]
    fn malformed_text_is_an_error() {
        assert!(GameConfig::from_toml_str("[match\nrounds_total = ").is_err());
    }

    #[test]
    fn explicit_file_is_read() {
        let dir = std::env::temp_dir().join(format!("wordlego-cfg-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("config.toml");
        std::fs::write(&path, "[match]\nrounds_total = 3\n").unwrap();
        assert_eq!(GameConfig::load(Some(&path)).rules.rounds_total, 3);

        std::fs::write(&path, "[match\n").unwrap();
        assert_eq!(GameConfig::load(Some(&path)).rules.rounds_total, 5);
        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn missing_explicit_file_falls_back() {
        let cfg = GameConfig::load(Some(Path::new("/nonexistent/wordlego/config.toml")));
        assert_eq!(cfg.rules.rounds_total, 5);
    }
}
