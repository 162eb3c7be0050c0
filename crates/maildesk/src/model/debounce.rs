//! Debouncing of text inputs that trigger filtering or reloads.
//!
//! Each keystroke bumps a generation counter and schedules a delayed
//! message carrying it. Only the message whose generation is still current
//! when it arrives is acted on.

use std::time::Duration;

/// Delay between the last keystroke and applying a search.
pub const SEARCH_DELAY: Duration = Duration::from_millis(300);

/// Delay between the last edit and autosaving a draft.
pub const DRAFT_DELAY: Duration = Duration::from_secs(2);

/// Generation counter for one input.
#[derive(Debug, Clone, Copy, Default)]
pub struct Debounce {
    generation: u64,
}

impl Debounce {
    /// Registers a change and returns its generation.
    pub const fn bump(&mut self) -> u64 {
        self.generation += 1;
        self.generation
    }

    /// Returns true if no change happened after `generation`.
    pub const fn is_current(&self, generation: u64) -> bool {
        self.generation == generation
    }
}

/// Resolves to `generation` after `delay`.
pub async fn settle(delay: Duration, generation: u64) -> u64 {
    tokio::time::sleep(delay).await;
    generation
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_latest_generation_is_current() {
        let mut debounce = Debounce::default();
        let first = debounce.bump();
        let second = debounce.bump();
        assert!(!debounce.is_current(first));
        assert!(debounce.is_current(second));
    }

    #[tokio::test(start_paused = true)]
    async fn test_settle_waits_for_delay() {
        let start = tokio::time::Instant::now();
        assert_eq!(settle(SEARCH_DELAY, 7).await, 7);
        assert!(start.elapsed() >= SEARCH_DELAY);
    }
}
