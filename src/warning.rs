use std::time::{Duration, Instant};

/// How long a rejected-key or read-only notice stays visible.
pub const WARNING_TIMEOUT: Duration = Duration::from_secs(2);

pub const READ_ONLY_WARNING: &str = "This field cannot be modified";

/// Transient message with a single pending expiry.
///
/// Showing a new message replaces the previous one and restarts the timeout.
#[derive(Clone, Debug, Default)]
pub struct Warning {
    message: Option<String>,
    deadline: Option<Instant>,
}

impl Warning {
    pub fn show(&mut self, message: impl Into<String>, now: Instant) {
        let message = message.into();
        tracing::debug!(%message, "warning shown");
        self.message = Some(message);
        self.deadline = Some(now + WARNING_TIMEOUT);
    }

    pub fn clear(&mut self) {
        self.message = None;
        self.deadline = None;
    }

    /// Drop the message once its deadline passed. Returns true if it expired.
    pub fn tick(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.clear();
                true
            }
            _ => false,
        }
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }
}
