//! # Feature: Command Cooldowns
//!
//! Sliding-window per-user cooldowns for expensive commands. Uses DashMap for
//! thread-safe concurrent access; keys are (command, user) pairs so cooldowns
//! are independent between commands.
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.5.0
//! - **Toggleable**: false
//!
//! ## Changelog
//! - 1.0.0: Initial release with per-command sliding windows

use dashmap::DashMap;
use std::time::{Duration, Instant};

type CooldownKey = (&'static str, u64);

/// Tracks recent command uses and enforces a use count per time window.
#[derive(Clone)]
pub struct CooldownTracker {
    uses: DashMap<CooldownKey, Vec<Instant>>,
    max_uses: usize,
    window: Duration,
}

impl CooldownTracker {
    pub fn new(max_uses: usize, window: Duration) -> Self {
        CooldownTracker {
            uses: DashMap::new(),
            max_uses,
            window,
        }
    }

    /// Record one use of `command` by `user_id` if the window allows it.
    ///
    /// Returns `Err(remaining)` with the time until the oldest recorded use
    /// falls out of the window when the user is on cooldown.
    pub fn try_acquire(&self, command: &'static str, user_id: u64) -> Result<(), Duration> {
        let now = Instant::now();
        let mut entry = self.uses.entry((command, user_id)).or_default();

        entry.retain(|&used_at| now.duration_since(used_at) < self.window);

        if entry.len() >= self.max_uses {
            let oldest = entry[0];
            let remaining = self.window.saturating_sub(now.duration_since(oldest));
            return Err(remaining);
        }

        entry.push(now);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::sleep;

    #[test]
    fn test_allows_under_limit() {
        let tracker = CooldownTracker::new(2, Duration::from_secs(60));
        assert!(tracker.try_acquire("card", 1).is_ok());
        assert!(tracker.try_acquire("card", 1).is_ok());
    }

    #[test]
    fn test_blocks_over_limit_with_remaining_time() {
        let tracker = CooldownTracker::new(1, Duration::from_secs(60));
        assert!(tracker.try_acquire("card", 1).is_ok());

        let remaining = tracker.try_acquire("card", 1).unwrap_err();
        assert!(remaining <= Duration::from_secs(60));
        assert!(remaining > Duration::from_secs(58));
    }

    #[test]
    fn test_users_are_independent() {
        let tracker = CooldownTracker::new(1, Duration::from_secs(60));
        assert!(tracker.try_acquire("card", 1).is_ok());
        assert!(tracker.try_acquire("card", 2).is_ok());
    }

    #[test]
    fn test_commands_are_independent() {
        let tracker = CooldownTracker::new(1, Duration::from_secs(60));
        assert!(tracker.try_acquire("card", 1).is_ok());
        assert!(tracker.try_acquire("trivia", 1).is_ok());
    }

    #[tokio::test]
    async fn test_window_expires() {
        let tracker = CooldownTracker::new(1, Duration::from_millis(50));
        assert!(tracker.try_acquire("card", 1).is_ok());
        assert!(tracker.try_acquire("card", 1).is_err());

        sleep(Duration::from_millis(60)).await;
        assert!(tracker.try_acquire("card", 1).is_ok());
    }
}
