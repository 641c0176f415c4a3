//! Workflow status and review decision enums.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Lifecycle state of a workflow row. A missing row is the implicit `none` state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "request_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum RequestStatus {
    /// Waiting for a reviewer.
    Requested,
    /// Granted by a reviewer.
    Approved,
    /// Refused by a reviewer; the learner may request again.
    Rejected,
    /// Finished by the learner after approval.
    Completed,
}

impl RequestStatus {
    /// approved or completed.
    pub fn is_granted(&self) -> bool {
        matches!(self, Self::Approved | Self::Completed)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Requested => "requested",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
            Self::Completed => "completed",
        }
    }
}

impl fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A reviewer's decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReviewDecision {
    Approve,
    Reject,
}

impl ReviewDecision {
    /// The status a row lands in after this decision.
    pub fn target_status(&self) -> RequestStatus {
        match self {
            Self::Approve => RequestStatus::Approved,
            Self::Reject => RequestStatus::Rejected,
        }
    }
}
