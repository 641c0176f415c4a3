//! Course access workflow and progress tracking.

use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use academy_auth::GuardContext;
use academy_core::error::AppError;
use academy_core::result::AppResult;
use academy_core::traits::Clock;
use academy_database::repositories::{CourseAccessRepo, SummaryRepo};
use academy_entity::profile::CanonicalRole;
use academy_entity::workflow::{
    CourseAccessRequest, ProgressSummary, RequestStatus, ReviewDecision,
};

use super::{decision_verb, listing_filter, reason_for};
use crate::notification::NotificationService;

/// Per-lesson access requests, progress, and summaries.
///
/// Lesson `n > 1` can only be requested once a summary for lesson `n - 1`
/// has been submitted.
#[derive(Debug, Clone)]
pub struct CourseAccessService {
    course_access: Arc<dyn CourseAccessRepo>,
    summaries: Arc<dyn SummaryRepo>,
    notifications: Arc<NotificationService>,
    clock: Arc<dyn Clock>,
    course_count: i32,
}

impl CourseAccessService {
    pub fn new(
        course_access: Arc<dyn CourseAccessRepo>,
        summaries: Arc<dyn SummaryRepo>,
        notifications: Arc<NotificationService>,
        clock: Arc<dyn Clock>,
        course_count: i32,
    ) -> Self {
        Self {
            course_access,
            summaries,
            notifications,
            clock,
            course_count,
        }
    }

    fn check_course(&self, course_id: i32) -> AppResult<()> {
        if (1..=self.course_count).contains(&course_id) {
            Ok(())
        } else {
            Err(AppError::invalid_course(format!(
                "Course {course_id} does not exist; valid range is 1..={}",
                self.course_count
            )))
        }
    }

    /// The caller's own row for `course_id`.
    pub async fn get(&self, ctx: &GuardContext, course_id: i32) -> AppResult<Option<CourseAccessRequest>> {
        self.check_course(course_id)?;
        self.course_access.find(ctx.actor.id(), course_id).await
    }

    /// Learner requests lesson `course_id`.
    ///
    /// Creates a `requested` row, resets a `rejected` one, and leaves any
    /// other state untouched.
    pub async fn request(&self, ctx: &GuardContext, course_id: i32) -> AppResult<CourseAccessRequest> {
        ctx.require_role("learner", CanonicalRole::is_learner)?;
        self.check_course(course_id)?;
        let user_id = ctx.actor.id();

        if course_id > 1 && self.summaries.find(user_id, course_id - 1).await?.is_none() {
            return Err(AppError::prev_summary_required(format!(
                "Submit the summary for course {} first",
                course_id - 1
            )));
        }

        let now = self.clock.now();
        let row = match self.course_access.find(user_id, course_id).await? {
            None => CourseAccessRequest::requested(user_id, course_id, now),
            Some(mut row) if row.status == RequestStatus::Rejected => {
                row.reset_to_requested(now);
                row
            }
            Some(row) => return Ok(row),
        };

        self.course_access.save(&row).await?;
        info!(user_id = %user_id, course_id, "Course access requested");

        self.notifications
            .notify_up(
                &ctx.actor.profile,
                "Course access request",
                &format!("{} requested access to course {course_id}", ctx.actor.profile.username),
            )
            .await?;

        Ok(row)
    }

    /// Reviewer approves or rejects a learner's request.
    ///
    /// Re-applying the row's current decision is a no-op. A completed course
    /// stays completed on approval. Rejection drops progress and completion.
    pub async fn review(
        &self,
        ctx: &GuardContext,
        user_id: Uuid,
        course_id: i32,
        decision: ReviewDecision,
        reason: Option<String>,
    ) -> AppResult<CourseAccessRequest> {
        ctx.require_role("manager", CanonicalRole::is_manager)?;
        self.check_course(course_id)?;
        ctx.ensure_in_scope(user_id).await?;

        let mut row = self
            .course_access
            .find(user_id, course_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("No request for course {course_id}")))?;

        let target = decision.target_status();
        let unchanged = row.status == target
            || (row.status == RequestStatus::Completed && decision == ReviewDecision::Approve);
        if unchanged {
            return Ok(row);
        }

        row.status = target;
        row.reviewed_at = Some(self.clock.now());
        row.reviewed_by = Some(ctx.actor.id());
        row.rejection_reason = reason_for(decision, reason);
        if decision == ReviewDecision::Reject {
            row.clear_progress();
        }
        self.course_access.save(&row).await?;

        let verb = decision_verb(decision);
        info!(
            reviewer = %ctx.actor.id(),
            user_id = %user_id,
            course_id,
            decision = verb,
            "Course access reviewed"
        );

        let content = match &row.rejection_reason {
            Some(reason) => format!("Your request for course {course_id} was {verb}: {reason}"),
            None => format!("Your request for course {course_id} was {verb}"),
        };
        self.notifications
            .notify([user_id], Some(ctx.actor.id()), "Course access review", &content)
            .await?;

        Ok(row)
    }

    async fn granted_row(&self, user_id: Uuid, course_id: i32) -> AppResult<CourseAccessRequest> {
        let row = self
            .course_access
            .find(user_id, course_id)
            .await?
            .ok_or_else(|| AppError::no_access(format!("No access to course {course_id}")))?;
        if !row.status.is_granted() {
            return Err(AppError::not_approved(format!(
                "Course {course_id} is {}",
                row.status
            )));
        }
        Ok(row)
    }

    /// Records watch progress. Legal only from approved or completed.
    pub async fn update_progress(
        &self,
        ctx: &GuardContext,
        course_id: i32,
        last_video_sec: i32,
        progress: i32,
    ) -> AppResult<CourseAccessRequest> {
        self.check_course(course_id)?;
        if !(0..=100).contains(&progress) {
            return Err(AppError::invalid_body("progress must be between 0 and 100"));
        }
        if last_video_sec < 0 {
            return Err(AppError::invalid_body("last_video_sec must not be negative"));
        }

        let mut row = self.granted_row(ctx.actor.id(), course_id).await?;
        row.last_video_sec = last_video_sec;
        if row.status != RequestStatus::Completed {
            row.progress = progress;
        }
        self.course_access.save(&row).await?;
        Ok(row)
    }

    /// Marks the course finished: progress 100, `completed_at` stamped.
    pub async fn complete(&self, ctx: &GuardContext, course_id: i32) -> AppResult<CourseAccessRequest> {
        self.check_course(course_id)?;
        let mut row = self.granted_row(ctx.actor.id(), course_id).await?;
        if row.status == RequestStatus::Completed {
            return Ok(row);
        }

        row.status = RequestStatus::Completed;
        row.progress = 100;
        row.completed_at = Some(self.clock.now());
        self.course_access.save(&row).await?;
        info!(user_id = %ctx.actor.id(), course_id, "Course completed");

        self.notifications
            .notify_up(
                &ctx.actor.profile,
                "Course completed",
                &format!("{} completed course {course_id}", ctx.actor.profile.username),
            )
            .await?;

        Ok(row)
    }

    /// Submits or replaces the summary for a granted course.
    pub async fn submit_summary(
        &self,
        ctx: &GuardContext,
        course_id: i32,
        content: &str,
    ) -> AppResult<ProgressSummary> {
        self.check_course(course_id)?;
        let content = content.trim();
        if content.is_empty() {
            return Err(AppError::invalid_body("Summary must not be empty"));
        }
        self.granted_row(ctx.actor.id(), course_id).await?;

        let summary = ProgressSummary {
            user_id: ctx.actor.id(),
            course_id,
            content: content.to_string(),
            submitted_at: self.clock.now(),
        };
        self.summaries.upsert(&summary).await?;
        info!(user_id = %summary.user_id, course_id, "Course summary submitted");

        self.notifications
            .notify_up(
                &ctx.actor.profile,
                "Course summary",
                &format!("{} submitted a summary for course {course_id}", ctx.actor.profile.username),
            )
            .await?;

        Ok(summary)
    }

    /// Pending requests within the reviewer's scope, oldest first.
    pub async fn list_pending(&self, ctx: &GuardContext) -> AppResult<Vec<CourseAccessRequest>> {
        match listing_filter(ctx).await? {
            None => Ok(Vec::new()),
            Some(filter) => {
                self.course_access
                    .list_by_status(RequestStatus::Requested, filter.as_deref())
                    .await
            }
        }
    }
}
