//! Connection lifecycle of the client.

use std::time::Duration;

use serde::Serialize;

/// Where the client is in its connection lifecycle.
///
/// `Disconnected → Connecting → Connected`; a lost transport goes back to
/// `Disconnected` and is retried. `Offline` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionState {
    Disconnected,
    Connecting,
    /// The server has sent `connected`.
    Connected,
    /// Reconnection gave up.
    Offline,
}

impl ConnectionState {
    pub fn is_connected(&self) -> bool {
        matches!(self, ConnectionState::Connected)
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, ConnectionState::Offline)
    }
}

/// Fixed-delay reconnection with a bounded number of attempts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReconnectPolicy {
    pub max_attempts: u32,
    pub delay: Duration,
}

impl ReconnectPolicy {
    pub const DEFAULT_MAX_ATTEMPTS: u32 = 5;
    pub const DEFAULT_DELAY: Duration = Duration::from_millis(1000);

    pub fn new(max_attempts: u32, delay: Duration) -> Self {
        Self {
            max_attempts,
            delay,
        }
    }

    /// Whether another attempt is allowed after `attempts` retries.
    pub fn allows(&self, attempts: u32) -> bool {
        attempts < self.max_attempts
    }
}

impl Default for ReconnectPolicy {
    fn default() -> Self {
        Self::new(Self::DEFAULT_MAX_ATTEMPTS, Self::DEFAULT_DELAY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_policy_is_five_attempts_one_second_apart() {
        let policy = ReconnectPolicy::default();
        assert_eq!(policy.max_attempts, 5);
        assert_eq!(policy.delay, Duration::from_millis(1000));
    }

    #[test]
    fn policy_stops_at_cap() {
        let policy = ReconnectPolicy::new(2, Duration::ZERO);
        assert!(policy.allows(0));
        assert!(policy.allows(1));
        assert!(!policy.allows(2));
    }

    #[test]
    fn zero_attempts_never_retries() {
        assert!(!ReconnectPolicy::new(0, Duration::ZERO).allows(0));
    }

    #[test]
    fn only_offline_is_terminal() {
        assert!(ConnectionState::Offline.is_terminal());
        assert!(!ConnectionState::Disconnected.is_terminal());
        assert!(ConnectionState::Connected.is_connected());
        assert!(!ConnectionState::Connecting.is_connected());
    }
}
