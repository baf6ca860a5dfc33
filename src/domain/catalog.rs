/// Static display data: themes, leaderboard, profile and stats.
///
/// Everything here is mock content for the menus. Nothing in the match
/// engine reads it except the theme name chosen by the player.

#[derive(Clone, Copy, Debug)]
pub struct ThemeInfo {
    pub name: &'static str,
    pub tag: &'static str,
    pub description: &'static str,
}

pub const SYSTEM_THEMES: [ThemeInfo; 12] = [
    ThemeInfo { name: "Animals",       tag: "ANM", description: "Wild and domestic creatures" },
    ThemeInfo { name: "Food & Drinks", tag: "FOD", description: "Delicious edibles and beverages" },
    ThemeInfo { name: "Countries",     tag: "CTY", description: "Nations from around the world" },
    ThemeInfo { name: "Sports",        tag: "SPT", description: "Athletic activities and games" },
    ThemeInfo { name: "Movies",        tag: "MOV", description: "Films and cinema classics" },
    ThemeInfo { name: "Music",         tag: "MUS", description: "Songs, artists, and instruments" },
    ThemeInfo { name: "Science",       tag: "SCI", description: "Scientific terms and discoveries" },
    ThemeInfo { name: "Technology",    tag: "TEC", description: "Tech, gadgets, and innovations" },
    ThemeInfo { name: "Nature",        tag: "NAT", description: "Plants, landscapes, and natural world" },
    ThemeInfo { name: "Occupations",   tag: "JOB", description: "Jobs and professions" },
    ThemeInfo { name: "Colors",        tag: "COL", description: "Shades, tints, and hues" },
    ThemeInfo { name: "Vehicles",      tag: "VEH", description: "Cars, boats, and transport" },
];

/// Room codes skip look-alike characters (I, O, 0, 1).
pub const ROOM_CODE_CHARS: &[u8] = b"ABCDEFGHJKLMNPQRSTUVWXYZ23456789";
pub const ROOM_CODE_LEN: usize = 6;

pub const SEARCH_TEXTS: [&str; 4] = [
    "Searching for opponent",
    "Finding your match",
    "Looking for players",
    "Matching you up",
];

/// Codes offered as shortcuts on the join screen.
pub const RECENT_ROOMS: [&str; 2] = ["ABC123", "XYZ789"];

// ── Leaderboard ──

#[derive(Clone, Copy, Debug)]
pub struct LeaderEntry {
    pub rank: u32,
    pub name: &'static str,
    pub points: u32,
    pub wins: u32,
    pub win_rate: u32,
}

pub const LEADERBOARD: [LeaderEntry; 15] = [
    LeaderEntry { rank: 1,  name: "WordMaster3000", points: 2847, wins: 156, win_rate: 87 },
    LeaderEntry { rank: 2,  name: "AlphabetKing",   points: 2654, wins: 142, win_rate: 85 },
    LeaderEntry { rank: 3,  name: "VocabQueen",     points: 2531, wins: 138, win_rate: 83 },
    LeaderEntry { rank: 4,  name: "WordNinja",      points: 2387, wins: 129, win_rate: 81 },
    LeaderEntry { rank: 5,  name: "LetterLegend",   points: 2245, wins: 121, win_rate: 79 },
    LeaderEntry { rank: 6,  name: "DictionaryPro",  points: 2103, wins: 115, win_rate: 76 },
    LeaderEntry { rank: 7,  name: "WordWizard",     points: 1987, wins: 108, win_rate: 74 },
    LeaderEntry { rank: 8,  name: "LegoLinguist",   points: 1845, wins: 99,  win_rate: 71 },
    LeaderEntry { rank: 9,  name: "AlphaGamer",     points: 1723, wins: 92,  win_rate: 69 },
    LeaderEntry { rank: 10, name: "WordChampion",   points: 1654, wins: 87,  win_rate: 67 },
    LeaderEntry { rank: 11, name: "VocabVirtuoso",  points: 1543, wins: 81,  win_rate: 65 },
    LeaderEntry { rank: 12, name: "LetterLord",     points: 1432, wins: 76,  win_rate: 63 },
    LeaderEntry { rank: 13, name: "WordSmith99",    points: 1321, wins: 71,  win_rate: 61 },
    LeaderEntry { rank: 14, name: "SpellBound",     points: 1210, wins: 65,  win_rate: 58 },
    LeaderEntry { rank: 15, name: "Player",         points: 847,  wins: 12,  win_rate: 55 },
];

/// Leaderboard / stats time window. Only changes the header; the mock
/// numbers are the same for every window.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum TimeFilter {
    Daily,
    Weekly,
    AllTime,
}

impl TimeFilter {
    pub fn next(self) -> TimeFilter {
        match self {
            TimeFilter::Daily => TimeFilter::Weekly,
            TimeFilter::Weekly => TimeFilter::AllTime,
            TimeFilter::AllTime => TimeFilter::Daily,
        }
    }

    pub fn prev(self) -> TimeFilter {
        match self {
            TimeFilter::Daily => TimeFilter::AllTime,
            TimeFilter::Weekly => TimeFilter::Daily,
            TimeFilter::AllTime => TimeFilter::Weekly,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            TimeFilter::Daily => "Daily",
            TimeFilter::Weekly => "Weekly",
            TimeFilter::AllTime => "All Time",
        }
    }
}

// ── Profile / detailed stats ──

pub struct ProfileStats {
    pub games_played: u32,
    pub games_won: u32,
    pub win_rate: u32,
    pub total_words: u32,
    pub best_streak: u32,
    pub rank: u32,
    pub points: u32,
}

pub const PROFILE: ProfileStats = ProfileStats {
    games_played: 47,
    games_won: 29,
    win_rate: 62,
    total_words: 1247,
    best_streak: 8,
    rank: 15,
    points: 2847,
};

pub const ACHIEVEMENTS: [(&str, &str); 3] = [
    ("Word Master", "Play 50 games"),
    ("Speed Demon", "Average response under 10s"),
    ("Theme Expert", "Win with 5 different themes"),
];

pub struct ThemeStat {
    pub theme: &'static str,
    pub played: u32,
    pub won: u32,
    pub win_rate: u32,
}

pub const THEME_STATS: [ThemeStat; 6] = [
    ThemeStat { theme: "Animals",       played: 15, won: 10, win_rate: 67 },
    ThemeStat { theme: "Food & Drinks", played: 12, won: 8,  win_rate: 67 },
    ThemeStat { theme: "Countries",     played: 8,  won: 5,  win_rate: 63 },
    ThemeStat { theme: "Sports",        played: 6,  won: 3,  win_rate: 50 },
    ThemeStat { theme: "Movies",        played: 4,  won: 2,  win_rate: 50 },
    ThemeStat { theme: "Science",       played: 2,  won: 1,  win_rate: 50 },
];

/// (day label, games, wins)
pub const RECENT_DAYS: [(&str, u32, u32); 5] = [
    ("Today", 5, 3),
    ("Yesterday", 4, 2),
    ("2 days ago", 6, 4),
    ("3 days ago", 3, 2),
    ("4 days ago", 5, 3),
];

pub const OVERVIEW: [(&str, &str); 9] = [
    ("Games played", "47"),
    ("Games won", "29"),
    ("Games lost", "18"),
    ("Win rate", "62%"),
    ("Total words", "1247"),
    ("Best streak", "8"),
    ("Current streak", "3"),
    ("Avg response", "8.5s"),
    ("Play time", "12h 34m"),
];

pub const WORD_FACTS: [(&str, &str); 4] = [
    ("Longest word", "EXTRAORDINARY"),
    ("Most used letter", "A"),
    ("Favorite theme", "Animals"),
    ("Perfect rounds", "23"),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn time_filter_cycles() {
        let mut f = TimeFilter::AllTime;
        for _ in 0..3 { f = f.next(); }
        assert_eq!(f, TimeFilter::AllTime);
        assert_eq!(TimeFilter::Daily.prev(), TimeFilter::AllTime);
        assert_eq!(TimeFilter::Daily.next().prev(), TimeFilter::Daily);
    }

    #[test]
    fn room_code_alphabet_has_no_lookalikes() {
        for c in [b'I', b'O', b'0', b'1'] {
            assert!(!ROOM_CODE_CHARS.contains(&c));
        }
    }

    #[test]
    fn leaderboard_is_rank_ordered() {
        for pair in LEADERBOARD.windows(2) {
            assert_eq!(pair[0].rank + 1, pair[1].rank);
            assert!(pair[0].points > pair[1].points);
        }
    }
}
