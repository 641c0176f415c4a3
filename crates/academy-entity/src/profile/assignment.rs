//! Coach-to-student assignment.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// An explicit link granting a coach scope over one student.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct CoachAssignment {
    pub coach_id: Uuid,
    pub student_id: Uuid,
    pub created_at: DateTime<Utc>,
}
