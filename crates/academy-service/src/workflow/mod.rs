//! Request / review state machines.
//!
//! All three share one shape: `none → requested → approved | rejected`, with
//! `rejected → requested` on a new request and, for courses, `approved →
//! completed`. Learner-triggered transitions notify up; reviewer-triggered
//! transitions notify the affected learner.

pub mod course;
pub mod file_access;
pub mod ladder;

pub use course::CourseAccessService;
pub use file_access::FileAccessService;
pub use ladder::LadderService;

use academy_auth::{GuardContext, Scope};
use academy_core::result::AppResult;
use academy_entity::profile::CanonicalRole;
use academy_entity::workflow::ReviewDecision;

/// Resolves the reviewer's scope for a listing.
///
/// `None` means the caller sees nothing and no query should be issued.
/// `Some(None)` means unrestricted.
pub(crate) async fn listing_filter(ctx: &GuardContext) -> AppResult<Option<Option<Vec<uuid::Uuid>>>> {
    ctx.require_role("manager", CanonicalRole::is_manager)?;
    let scope = ctx.scope().await?;
    if scope.is_empty() {
        return Ok(None);
    }
    Ok(Some(match scope {
        Scope::Unrestricted => None,
        subjects => subjects.subject_ids(),
    }))
}

/// Rejection reason kept for a decision; approvals never carry one.
pub(crate) fn reason_for(decision: ReviewDecision, reason: Option<String>) -> Option<String> {
    match decision {
        ReviewDecision::Approve => None,
        ReviewDecision::Reject => reason
            .map(|r| r.trim().to_string())
            .filter(|r| !r.is_empty()),
    }
}

pub(crate) fn decision_verb(decision: ReviewDecision) -> &'static str {
    match decision {
        ReviewDecision::Approve => "approved",
        ReviewDecision::Reject => "rejected",
    }
}
