/// Simulated opponent.
///
/// There is no word-finding AI: the opponent "thinks" for a random delay and
/// then plays a word from a fixed pool. By default the pick ignores the chain
/// letter, so its words can break the chain. With `follow_chain` enabled it
/// prefers pool words that fit and only falls back to a random one.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::config::MatchConfig;
use super::rules;

pub const DEFAULT_WORDS: [&str; 7] = [
    "TIGER", "ELEPHANT", "TURTLE", "EAGLE", "SNAKE", "KANGAROO", "OCTOPUS",
];

#[derive(Clone, Debug)]
pub struct Opponent {
    pub name: String,
    words: Vec<String>,
    think_min_ms: u64,
    think_max_ms: u64,
    follow_chain: bool,
}

impl Opponent {
    pub fn from_config(cfg: &MatchConfig) -> Self {
        let mut words: Vec<String> = cfg.opponent_words.iter()
            .filter_map(|w| rules::normalize(w))
            .collect();
        if words.is_empty() {
            words = DEFAULT_WORDS.iter().map(|w| w.to_string()).collect();
        }
        let (lo, hi) = if cfg.opponent_think_min_ms <= cfg.opponent_think_max_ms {
            (cfg.opponent_think_min_ms, cfg.opponent_think_max_ms)
        } else {
            (cfg.opponent_think_max_ms, cfg.opponent_think_min_ms)
        };
        Opponent {
            name: cfg.opponent_name.clone(),
            words,
            think_min_ms: lo,
            think_max_ms: hi,
            follow_chain: cfg.opponent_follows_chain,
        }
    }

    /// Delay before the opponent plays, uniform in `[min, max]` ms.
    pub fn think_delay_ms<R: Rng>(&self, rng: &mut R) -> u64 {
        rng.gen_range(self.think_min_ms..=self.think_max_ms)
    }

    pub fn choose_word<R: Rng>(&self, last_word: &str, rng: &mut R) -> String {
        if self.follow_chain {
            let fitting: Vec<&String> = self.words.iter()
                .filter(|w| rules::follows(last_word, w))
                .collect();
            if let Some(w) = fitting.choose(rng) {
                return (*w).clone();
            }
        }
        self.words.choose(rng)
            .cloned()
            .unwrap_or_else(|| DEFAULT_WORDS[0].to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn cfg() -> MatchConfig {
        MatchConfig::default()
    }

    #[test]
    fn delay_stays_in_window() {
        let opp = Opponent::from_config(&cfg());
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..200 {
            let d = opp.think_delay_ms(&mut rng);
            assert!((2000..=5000).contains(&d), "delay {d} out of range");
        }
    }

    #[test]
    fn swapped_window_is_normalized() {
        let mut c = cfg();
        c.opponent_think_min_ms = 900;
        c.opponent_think_max_ms = 100;
        let opp = Opponent::from_config(&c);
        let mut rng = StdRng::seed_from_u64(1);
        let d = opp.think_delay_ms(&mut rng);
        assert!((100..=900).contains(&d));
    }

    #[test]
    fn relaxed_pick_comes_from_pool() {
        let opp = Opponent::from_config(&cfg());
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..50 {
            let w = opp.choose_word("LION", &mut rng);
            assert!(DEFAULT_WORDS.contains(&w.as_str()));
        }
    }

    #[test]
    fn strict_pick_follows_chain_when_possible() {
        let mut c = cfg();
        c.opponent_follows_chain = true;
        let opp = Opponent::from_config(&c);
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..50 {
            // TIGER / TURTLE are the only pool words starting with T
            let w = opp.choose_word("CAT", &mut rng);
            assert!(w == "TIGER" || w == "TURTLE", "got {w}");
        }
    }

    #[test]
    fn strict_pick_falls_back_when_nothing_fits() {
        let mut c = cfg();
        c.opponent_follows_chain = true;
        let opp = Opponent::from_config(&c);
        let mut rng = StdRng::seed_from_u64(5);
        let w = opp.choose_word("ZZZ", &mut rng);
        assert!(DEFAULT_WORDS.contains(&w.as_str()));
    }

    #[test]
    fn empty_configured_pool_uses_defaults() {
        let mut c = cfg();
        c.opponent_words = vec!["  ".into()];
        let opp = Opponent::from_config(&c);
        let mut rng = StdRng::seed_from_u64(2);
        assert!(DEFAULT_WORDS.contains(&opp.choose_word("A", &mut rng).as_str()));
    }
}
