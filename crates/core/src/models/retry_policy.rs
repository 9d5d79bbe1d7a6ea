use crate::prelude::*;

use std::time::Duration;

/// Maximal number of connection attempts.
pub const MAX_ATTEMPTS: usize = 10;
/// Delay period between failed connection attempts.
pub const RETRY_DELAY: Duration = Duration::from_secs(1);

/// How often, and how patiently, a connection is (re)established.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Getters, Builder)]
pub struct RetryPolicy {
    /// Zero disables reconnecting after a dropped connection. The initial
    /// connection of a virtual user is always attempted at least once.
    #[getset(get = "pub")]
    #[builder(default = MAX_ATTEMPTS)]
    max_attempts: usize,

    #[getset(get = "pub")]
    #[builder(default = RETRY_DELAY)]
    delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl RetryPolicy {
    pub fn never() -> Self {
        Self::builder().max_attempts(0).build()
    }

    pub fn reconnects(&self) -> bool {
        self.max_attempts > 0
    }
}
