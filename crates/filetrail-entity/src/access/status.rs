//! Access request state machine.
//!
//! ```text
//! pending ──approve──▶ approved
//!    └─────deny─────▶ denied
//! ```
//! Both outcomes are terminal.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use filetrail_core::AppError;

/// Lifecycle state of an access request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "access_request_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum AccessRequestStatus {
    /// Waiting for a reviewer.
    Pending,
    /// Granted by a reviewer.
    Approved,
    /// Refused by a reviewer.
    Denied,
}

/// A reviewer's verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReviewDecision {
    /// Move the request to `approved`.
    Approve,
    /// Move the request to `denied`.
    Deny,
}

impl AccessRequestStatus {
    /// Return the status as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Denied => "denied",
        }
    }

    /// Whether no further transition is possible.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Pending)
    }

    /// Apply a review, rejecting transitions out of a terminal state.
    pub fn review(self, decision: ReviewDecision) -> Result<Self, AppError> {
        if self.is_terminal() {
            return Err(AppError::invalid_state(format!(
                "Access request was already {self}"
            )));
        }
        Ok(decision.outcome())
    }
}

impl ReviewDecision {
    /// The status this decision leads to from `pending`.
    pub fn outcome(&self) -> AccessRequestStatus {
        match self {
            Self::Approve => AccessRequestStatus::Approved,
            Self::Deny => AccessRequestStatus::Denied,
        }
    }
}

impl fmt::Display for AccessRequestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ReviewDecision {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "approve" | "approved" => Ok(Self::Approve),
            "deny" | "denied" => Ok(Self::Deny),
            _ => Err(AppError::validation(format!(
                "Review decision must be 'approved' or 'denied', got '{s}'"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use filetrail_core::ErrorKind;

    use super::*;

    #[test]
    fn test_pending_transitions() {
        let s = AccessRequestStatus::Pending;
        assert_eq!(s.review(ReviewDecision::Approve).unwrap(), AccessRequestStatus::Approved);
        assert_eq!(s.review(ReviewDecision::Deny).unwrap(), AccessRequestStatus::Denied);
        assert!(!s.is_terminal());
        assert!(ReviewDecision::Deny.outcome().is_terminal());
    }

    #[test]
    fn test_terminal_states_reject_review() {
        for terminal in [AccessRequestStatus::Approved, AccessRequestStatus::Denied] {
            for decision in [ReviewDecision::Approve, ReviewDecision::Deny] {
                let err = terminal.review(decision).unwrap_err();
                assert_eq!(err.kind, ErrorKind::InvalidState);
            }
        }
    }

    #[test]
    fn test_pending_is_not_a_decision() {
        let err = "pending".parse::<ReviewDecision>().unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);
    }
}
