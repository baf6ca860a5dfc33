/// Screen router: the typed set of screens and the transitions between them.
///
/// Every move between screens goes through `transition`, so the full
/// navigation graph is the one table below. Anything not listed is refused
/// and the current screen stays.

#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash)]
pub enum Screen {
    Splash,
    Login,
    Home,
    QuickMatchLoading,
    CreateRoom,
    JoinRoom,
    ThemeSelection,
    Gameplay,
    Results,
    Profile,
    DetailedStats,
    Leaderboard,
}

impl Screen {
    #[cfg(test)]
    pub const ALL: [Screen; 12] = [
        Screen::Splash, Screen::Login, Screen::Home,
        Screen::QuickMatchLoading, Screen::CreateRoom, Screen::JoinRoom,
        Screen::ThemeSelection, Screen::Gameplay, Screen::Results,
        Screen::Profile, Screen::DetailedStats, Screen::Leaderboard,
    ];

    pub fn title(self) -> &'static str {
        match self {
            Screen::Splash => "WordLego",
            Screen::Login => "Sign In",
            Screen::Home => "Home",
            Screen::QuickMatchLoading => "Quick Match",
            Screen::CreateRoom => "Create Room",
            Screen::JoinRoom => "Join Room",
            Screen::ThemeSelection => "Choose a Theme",
            Screen::Gameplay => "Match",
            Screen::Results => "Results",
            Screen::Profile => "Profile",
            Screen::DetailedStats => "Detailed Stats",
            Screen::Leaderboard => "Leaderboard",
        }
    }
}

/// Navigation intents. Which ones apply depends on the current screen.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Nav {
    Continue,
    SignIn,
    QuickMatch,
    CreateRoom,
    JoinRoom,
    Leaderboard,
    Profile,
    /// Lobby finished: opponent found, room started, or room joined.
    OpponentReady,
    StartGame,
    MatchFinished,
    PlayAgain,
    Home,
    ViewStats,
    SignOut,
    Back,
}

/// The transition table.
pub fn transition(from: Screen, nav: Nav) -> Option<Screen> {
    use Screen as S;
    let to = match (from, nav) {
        (S::Splash, Nav::Continue) => S::Login,
        (S::Login, Nav::SignIn) => S::Home,

        (S::Home, Nav::QuickMatch) => S::QuickMatchLoading,
        (S::Home, Nav::CreateRoom) => S::CreateRoom,
        (S::Home, Nav::JoinRoom) => S::JoinRoom,
        (S::Home, Nav::Leaderboard) => S::Leaderboard,
        (S::Home, Nav::Profile) => S::Profile,

        (S::QuickMatchLoading | S::CreateRoom | S::JoinRoom, Nav::OpponentReady) => {
            S::ThemeSelection
        }
        (S::ThemeSelection, Nav::StartGame) => S::Gameplay,
        (S::Gameplay, Nav::MatchFinished) => S::Results,

        (S::Results, Nav::PlayAgain) => S::ThemeSelection,
        (S::Results, Nav::Home) => S::Home,

        (S::Profile, Nav::ViewStats) => S::DetailedStats,
        (S::Profile, Nav::SignOut) => S::Login,

        // ── Back ──
        (S::Gameplay, Nav::Back) => S::ThemeSelection,
        (S::DetailedStats, Nav::Back) => S::Profile,
        (S::Splash | S::Login | S::Home, Nav::Back) => return None,
        (_, Nav::Back) => S::Home,

        _ => return None,
    };
    Some(to)
}

#[derive(Debug)]
pub struct Router {
    current: Screen,
}

impl Router {
    pub fn new() -> Self {
        Router { current: Screen::Splash }
    }

    pub fn current(&self) -> Screen {
        self.current
    }

    /// Follow `nav` if the table allows it. Returns whether the screen changed.
    pub fn apply(&mut self, nav: Nav) -> bool {
        match transition(self.current, nav) {
            Some(to) => {
                log::debug!("route {:?} --{nav:?}--> {to:?}", self.current);
                self.current = to;
                true
            }
            None => {
                log::trace!("route {:?} has no {nav:?} transition", self.current);
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn back_table() {
        assert_eq!(transition(Screen::Gameplay, Nav::Back), Some(Screen::ThemeSelection));
        assert_eq!(transition(Screen::DetailedStats, Nav::Back), Some(Screen::Profile));
        for s in [
            Screen::QuickMatchLoading, Screen::CreateRoom, Screen::JoinRoom,
            Screen::ThemeSelection, Screen::Results, Screen::Profile, Screen::Leaderboard,
        ] {
            assert_eq!(transition(s, Nav::Back), Some(Screen::Home), "{s:?}");
        }
        assert_eq!(transition(Screen::Home, Nav::Back), None);
    }

    #[test]
    fn happy_path_to_results_and_again() {
        let mut r = Router::new();
        for nav in [Nav::Continue, Nav::SignIn, Nav::QuickMatch, Nav::OpponentReady,
                    Nav::StartGame, Nav::MatchFinished] {
            assert!(r.apply(nav), "{nav:?} from {:?}", r.current());
        }
        assert_eq!(r.current(), Screen::Results);
        assert!(r.apply(Nav::PlayAgain));
        assert_eq!(r.current(), Screen::ThemeSelection);
    }

    #[test]
    fn undefined_transitions_are_refused() {
        let mut r = Router::new();
        assert!(!r.apply(Nav::StartGame));
        assert_eq!(r.current(), Screen::Splash);
        assert_eq!(transition(Screen::Home, Nav::MatchFinished), None);
        assert_eq!(transition(Screen::Leaderboard, Nav::SignOut), None);
    }

    #[test]
    fn every_screen_is_reachable() {
        use std::collections::HashSet;
        let navs = [
            Nav::Continue, Nav::SignIn, Nav::QuickMatch, Nav::CreateRoom, Nav::JoinRoom,
            Nav::Leaderboard, Nav::Profile, Nav::OpponentReady, Nav::StartGame,
            Nav::MatchFinished, Nav::PlayAgain, Nav::Home, Nav::ViewStats, Nav::SignOut,
            Nav::Back,
        ];
        let mut seen = HashSet::from([Screen::Splash]);
        let mut frontier = vec![Screen::Splash];
        while let Some(s) = frontier.pop() {
            for nav in navs {
                if let Some(to) = transition(s, nav) {
                    if seen.insert(to) {
                        frontier.push(to);
                    }
                }
            }
        }
        assert_eq!(seen.len(), Screen::ALL.len());
    }
}
