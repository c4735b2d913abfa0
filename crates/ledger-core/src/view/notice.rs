//! Short-lived success messages.

use std::time::{Duration, Instant};

/// How long a success notice stays visible.
pub const NOTICE_TTL: Duration = Duration::from_secs(3);

/// A success message with an expiry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    message: String,
    expires_at: Instant,
}

impl Notice {
    pub fn new(message: impl Into<String>, now: Instant) -> Self {
        Self {
            message: message.into(),
            expires_at: now + NOTICE_TTL,
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn is_visible(&self, now: Instant) -> bool {
        now < self.expires_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notice_expires_after_ttl() {
        let start = Instant::now();
        let notice = Notice::new("Channel added", start);
        assert_eq!(notice.message(), "Channel added");
        assert!(notice.is_visible(start + Duration::from_millis(2999)));
        assert!(!notice.is_visible(start + NOTICE_TTL));
    }
}
