use crate::error::{Result, WorklogError};

/// Shared-secret gate in front of the all-reports dashboard.
#[derive(Clone, Debug)]
pub struct AdminGate {
    secret: String,
}

impl AdminGate {
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
        }
    }

    pub fn check(&self, candidate: &str) -> Result<()> {
        if candidate.is_empty() {
            return Err(WorklogError::EmptySecret);
        }
        if candidate != self.secret {
            tracing::warn!("dashboard access denied");
            return Err(WorklogError::Unauthorized);
        }
        Ok(())
    }
}
