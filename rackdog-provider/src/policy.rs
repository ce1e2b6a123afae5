//! Reconciliation policy.

use serde::{Deserialize, Serialize};

/// What to do with a server that vanished (404) since the last read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissingDisposition {
    /// Drop the local record so the host recreates the server.
    Forget,
    /// Report a fatal error and keep the record.
    Fail,
}

/// Operator-controlled reconciliation settings, resolved once at Configure.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconciliationPolicy {
    pub recreate_on_missing: bool,
}

impl ReconciliationPolicy {
    pub fn new(recreate_on_missing: bool) -> Self {
        Self {
            recreate_on_missing,
        }
    }

    pub fn on_missing(&self) -> MissingDisposition {
        if self.recreate_on_missing {
            MissingDisposition::Forget
        } else {
            MissingDisposition::Fail
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_policy_fails_on_missing() {
        assert_eq!(
            ReconciliationPolicy::default().on_missing(),
            MissingDisposition::Fail
        );
    }

    #[test]
    fn test_recreate_on_missing_forgets() {
        assert_eq!(
            ReconciliationPolicy::new(true).on_missing(),
            MissingDisposition::Forget
        );
    }
}
