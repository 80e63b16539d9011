use std::collections::BTreeSet;

/// Messages shown when the strongest AI keeps scoring, keyed by streak length
pub const DEFEAT_QUOTES: [(u32, &str); 6] = [
    (5, "Life must go on"),
    (10, "Stop overthinking, you can't control everything, just let it be"),
    (
        15,
        "There are no secrets to success. It is the result of preparation, hard work, and learning from failure",
    ),
    (
        20,
        "NOTHING IS MORE\nDANGEROUS THAN\nSTUPID PEOPLE\nWHO THINK\nTHEY'RE SMART",
    ),
    (
        25,
        "It's amazing how dumb people can impress you with how much stupider they can be when they really assert themselves",
    ),
    (
        30,
        "YOU THINK A PIECE OF SHIT FEELS POPULAR BECAUSE IT'S SURROUNDED BY FLIES?",
    ),
];

/// Streak at which the match is over for good
pub const FORCE_EXIT_THRESHOLD: u32 = 30;

/// A quote surfaced by the gate
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreakQuote {
    pub threshold: u32,
    pub streak: u32,
    pub message: &'static str,
    /// The player has to leave instead of dismissing the quote
    pub force_exit: bool,
}

/// Counts consecutive AI points and decides when to interrupt the match
#[derive(Debug, Clone, Default)]
pub struct StreakGate {
    consecutive_ai_scores: u32,
    displayed: BTreeSet<u32>,
}

impl StreakGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count an AI point; returns the highest reached threshold not yet shown
    pub fn record_ai_score(&mut self) -> Option<StreakQuote> {
        self.consecutive_ai_scores += 1;
        let streak = self.consecutive_ai_scores;

        let (threshold, message) = DEFEAT_QUOTES
            .iter()
            .rev()
            .find(|(threshold, _)| *threshold <= streak && !self.displayed.contains(threshold))
            .copied()?;

        self.displayed.insert(threshold);
        log::info!("AI streak {} reached quote threshold {}", streak, threshold);
        Some(StreakQuote {
            threshold,
            streak,
            message,
            force_exit: threshold >= FORCE_EXIT_THRESHOLD,
        })
    }

    /// Human scored or won
    pub fn reset(&mut self) {
        self.consecutive_ai_scores = 0;
        self.displayed.clear();
    }

    pub fn streak(&self) -> u32 {
        self.consecutive_ai_scores
    }

    pub fn displayed(&self) -> &BTreeSet<u32> {
        &self.displayed
    }
}
