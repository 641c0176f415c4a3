use async_trait::async_trait;
use uuid::Uuid;

use academy_core::result::AppResult;
use academy_entity::workflow::{
    CourseAccessRequest, FileAccessRequest, FilePermission, LadderAuthorization, ProgressSummary,
    RequestStatus,
};

use super::{MemoryDatabase, in_subjects};
use crate::repositories::{CourseAccessRepo, FileAccessRepo, LadderRepo, SummaryRepo};

#[async_trait]
impl CourseAccessRepo for MemoryDatabase {
    async fn find(&self, user_id: Uuid, course_id: i32) -> AppResult<Option<CourseAccessRequest>> {
        let tables = self.tables().await?;
        Ok(tables.course_access.get(&(user_id, course_id)).cloned())
    }

    async fn save(&self, row: &CourseAccessRequest) -> AppResult<()> {
        let mut tables = self.tables().await?;
        let key = (row.user_id, row.course_id);
        // Keep the existing id on conflict, as the SQL upsert does.
        let id = tables.course_access.get(&key).map_or(row.id, |r| r.id);
        let mut stored = row.clone();
        stored.id = id;
        tables.course_access.insert(key, stored);
        Ok(())
    }

    async fn list_by_status(
        &self,
        status: RequestStatus,
        user_ids: Option<&[Uuid]>,
    ) -> AppResult<Vec<CourseAccessRequest>> {
        let tables = self.tables().await?;
        let mut rows: Vec<_> = tables
            .course_access
            .values()
            .filter(|r| r.status == status && in_subjects(user_ids, &r.user_id))
            .cloned()
            .collect();
        rows.sort_by_key(|r| r.requested_at);
        Ok(rows)
    }
}

#[async_trait]
impl SummaryRepo for MemoryDatabase {
    async fn find(&self, user_id: Uuid, course_id: i32) -> AppResult<Option<ProgressSummary>> {
        let tables = self.tables().await?;
        Ok(tables.summaries.get(&(user_id, course_id)).cloned())
    }

    async fn upsert(&self, summary: &ProgressSummary) -> AppResult<()> {
        let mut tables = self.tables().await?;
        tables
            .summaries
            .insert((summary.user_id, summary.course_id), summary.clone());
        Ok(())
    }
}

#[async_trait]
impl LadderRepo for MemoryDatabase {
    async fn find(&self, user_id: Uuid) -> AppResult<Option<LadderAuthorization>> {
        Ok(self.tables().await?.ladder.get(&user_id).cloned())
    }

    async fn upsert_many(&self, rows: &[LadderAuthorization]) -> AppResult<()> {
        let mut tables = self.tables().await?;
        for row in rows {
            tables.ladder.insert(row.user_id, row.clone());
        }
        Ok(())
    }

    async fn list_by_status(
        &self,
        status: RequestStatus,
        user_ids: Option<&[Uuid]>,
    ) -> AppResult<Vec<LadderAuthorization>> {
        let tables = self.tables().await?;
        let mut rows: Vec<_> = tables
            .ladder
            .values()
            .filter(|r| r.status == status && in_subjects(user_ids, &r.user_id))
            .cloned()
            .collect();
        rows.sort_by_key(|r| r.requested_at);
        Ok(rows)
    }
}

#[async_trait]
impl FileAccessRepo for MemoryDatabase {
    async fn find(&self, user_id: Uuid, file_id: Uuid) -> AppResult<Option<FileAccessRequest>> {
        let tables = self.tables().await?;
        Ok(tables.file_access.get(&(user_id, file_id)).cloned())
    }

    async fn save(&self, row: &FileAccessRequest) -> AppResult<()> {
        let mut tables = self.tables().await?;
        let key = (row.user_id, row.file_id);
        let id = tables.file_access.get(&key).map_or(row.id, |r| r.id);
        let mut stored = row.clone();
        stored.id = id;
        tables.file_access.insert(key, stored);
        Ok(())
    }

    async fn list_by_status(
        &self,
        status: RequestStatus,
        user_ids: Option<&[Uuid]>,
    ) -> AppResult<Vec<FileAccessRequest>> {
        let tables = self.tables().await?;
        let mut rows: Vec<_> = tables
            .file_access
            .values()
            .filter(|r| r.status == status && in_subjects(user_ids, &r.user_id))
            .cloned()
            .collect();
        rows.sort_by_key(|r| r.requested_at);
        Ok(rows)
    }

    async fn grant(&self, permission: &FilePermission) -> AppResult<()> {
        let mut tables = self.tables().await?;
        tables
            .file_permissions
            .entry((permission.user_id, permission.file_id))
            .or_insert_with(|| permission.clone());
        Ok(())
    }

    async fn revoke(&self, user_id: Uuid, file_id: Uuid) -> AppResult<bool> {
        let mut tables = self.tables().await?;
        Ok(tables.file_permissions.remove(&(user_id, file_id)).is_some())
    }

    async fn has_permission(&self, user_id: Uuid, file_id: Uuid) -> AppResult<bool> {
        let tables = self.tables().await?;
        Ok(tables.file_permissions.contains_key(&(user_id, file_id)))
    }
}
